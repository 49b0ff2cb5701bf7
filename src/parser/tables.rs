//! Character tables: the operator dictionary, delimiters and negations.
use phf::phf_map;

use crate::node::TexClass;

const STRETCHY: u8 = 1;
const MOVABLE: u8 = 2;
const FENCE: u8 = 4;
const SYMMETRIC: u8 = 8;

/// What the operator dictionary knows about a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OperatorInfo {
    pub class: TexClass,
    flags: u8,
}

impl OperatorInfo {
    /// Stretches by default, so a literal occurrence needs `stretchy="false"`.
    pub fn stretchy(self) -> bool {
        self.flags & STRETCHY != 0
    }

    /// Large operator whose limits move under and over in display style.
    pub fn movable(self) -> bool {
        self.flags & MOVABLE != 0
    }

    pub fn fence(self) -> bool {
        self.flags & FENCE != 0
    }

    pub fn symmetric(self) -> bool {
        self.flags & SYMMETRIC != 0
    }
}

const fn op(class: TexClass, flags: u8) -> (TexClass, u8) {
    (class, flags)
}

const DELIM: u8 = STRETCHY | FENCE | SYMMETRIC;

#[rustfmt::skip]
static OPERATORS: phf::Map<char, (TexClass, u8)> = phf_map! {
    '!' => op(TexClass::Close, 0),
    '(' => op(TexClass::Open, DELIM),
    ')' => op(TexClass::Close, DELIM),
    '[' => op(TexClass::Open, DELIM),
    ']' => op(TexClass::Close, DELIM),
    '{' => op(TexClass::Open, DELIM),
    '}' => op(TexClass::Close, DELIM),
    '|' => op(TexClass::Ord, DELIM),
    '+' => op(TexClass::Bin, 0),
    ',' => op(TexClass::Punct, 0),
    '.' => op(TexClass::Punct, 0),
    ';' => op(TexClass::Punct, 0),
    ':' => op(TexClass::Rel, 0),
    '=' => op(TexClass::Rel, 0),
    '<' => op(TexClass::Rel, 0),
    '>' => op(TexClass::Rel, 0),
    '?' => op(TexClass::Close, 0),
    '/' => op(TexClass::Ord, 0),
    '\\' => op(TexClass::Ord, 0),
    '\u{00AC}' => op(TexClass::Ord, 0),
    '\u{00B1}' => op(TexClass::Bin, 0),
    '\u{00B7}' => op(TexClass::Bin, 0),
    '\u{00D7}' => op(TexClass::Bin, 0),
    '\u{00F7}' => op(TexClass::Bin, 0),
    '\u{2016}' => op(TexClass::Ord, STRETCHY | FENCE),
    '\u{2020}' => op(TexClass::Bin, 0),
    '\u{2021}' => op(TexClass::Bin, 0),
    '\u{2026}' => op(TexClass::Inner, 0),
    '\u{2032}' => op(TexClass::Ord, 0),
    '\u{2033}' => op(TexClass::Ord, 0),
    '\u{2034}' => op(TexClass::Ord, 0),
    '\u{2057}' => op(TexClass::Ord, 0),
    '\u{2061}' => op(TexClass::None, 0),
    '\u{2200}' => op(TexClass::Ord, 0),
    '\u{2203}' => op(TexClass::Ord, 0),
    '\u{2204}' => op(TexClass::Ord, 0),
    '\u{2208}' => op(TexClass::Rel, 0),
    '\u{2209}' => op(TexClass::Rel, 0),
    '\u{220B}' => op(TexClass::Rel, 0),
    '\u{220C}' => op(TexClass::Rel, 0),
    '\u{220F}' => op(TexClass::Op, MOVABLE),
    '\u{2210}' => op(TexClass::Op, MOVABLE),
    '\u{2211}' => op(TexClass::Op, MOVABLE),
    '\u{2212}' => op(TexClass::Bin, 0),
    '\u{2213}' => op(TexClass::Bin, 0),
    '\u{2214}' => op(TexClass::Bin, 0),
    '\u{2216}' => op(TexClass::Bin, 0),
    '\u{2217}' => op(TexClass::Bin, 0),
    '\u{2218}' => op(TexClass::Bin, 0),
    '\u{2219}' => op(TexClass::Bin, 0),
    '\u{221D}' => op(TexClass::Rel, 0),
    '\u{2223}' => op(TexClass::Rel, 0),
    '\u{2224}' => op(TexClass::Rel, 0),
    '\u{2225}' => op(TexClass::Rel, 0),
    '\u{2226}' => op(TexClass::Rel, 0),
    '\u{2227}' => op(TexClass::Bin, 0),
    '\u{2228}' => op(TexClass::Bin, 0),
    '\u{2229}' => op(TexClass::Bin, 0),
    '\u{222A}' => op(TexClass::Bin, 0),
    '\u{222B}' => op(TexClass::Op, 0),
    '\u{222C}' => op(TexClass::Op, 0),
    '\u{222D}' => op(TexClass::Op, 0),
    '\u{222E}' => op(TexClass::Op, 0),
    '\u{222F}' => op(TexClass::Op, 0),
    '\u{2230}' => op(TexClass::Op, 0),
    '\u{2236}' => op(TexClass::Rel, 0),
    '\u{223C}' => op(TexClass::Rel, 0),
    '\u{2240}' => op(TexClass::Bin, 0),
    '\u{2241}' => op(TexClass::Rel, 0),
    '\u{2243}' => op(TexClass::Rel, 0),
    '\u{2244}' => op(TexClass::Rel, 0),
    '\u{2245}' => op(TexClass::Rel, 0),
    '\u{2247}' => op(TexClass::Rel, 0),
    '\u{2248}' => op(TexClass::Rel, 0),
    '\u{2249}' => op(TexClass::Rel, 0),
    '\u{224D}' => op(TexClass::Rel, 0),
    '\u{2250}' => op(TexClass::Rel, 0),
    '\u{2260}' => op(TexClass::Rel, 0),
    '\u{2261}' => op(TexClass::Rel, 0),
    '\u{2262}' => op(TexClass::Rel, 0),
    '\u{2264}' => op(TexClass::Rel, 0),
    '\u{2265}' => op(TexClass::Rel, 0),
    '\u{226A}' => op(TexClass::Rel, 0),
    '\u{226B}' => op(TexClass::Rel, 0),
    '\u{226D}' => op(TexClass::Rel, 0),
    '\u{226E}' => op(TexClass::Rel, 0),
    '\u{226F}' => op(TexClass::Rel, 0),
    '\u{2270}' => op(TexClass::Rel, 0),
    '\u{2271}' => op(TexClass::Rel, 0),
    '\u{227A}' => op(TexClass::Rel, 0),
    '\u{227B}' => op(TexClass::Rel, 0),
    '\u{2280}' => op(TexClass::Rel, 0),
    '\u{2281}' => op(TexClass::Rel, 0),
    '\u{2282}' => op(TexClass::Rel, 0),
    '\u{2283}' => op(TexClass::Rel, 0),
    '\u{2284}' => op(TexClass::Rel, 0),
    '\u{2285}' => op(TexClass::Rel, 0),
    '\u{2286}' => op(TexClass::Rel, 0),
    '\u{2287}' => op(TexClass::Rel, 0),
    '\u{2288}' => op(TexClass::Rel, 0),
    '\u{2289}' => op(TexClass::Rel, 0),
    '\u{228E}' => op(TexClass::Bin, 0),
    '\u{228F}' => op(TexClass::Rel, 0),
    '\u{2290}' => op(TexClass::Rel, 0),
    '\u{2291}' => op(TexClass::Rel, 0),
    '\u{2292}' => op(TexClass::Rel, 0),
    '\u{2293}' => op(TexClass::Bin, 0),
    '\u{2294}' => op(TexClass::Bin, 0),
    '\u{2295}' => op(TexClass::Bin, 0),
    '\u{2296}' => op(TexClass::Bin, 0),
    '\u{2297}' => op(TexClass::Bin, 0),
    '\u{2298}' => op(TexClass::Bin, 0),
    '\u{2299}' => op(TexClass::Bin, 0),
    '\u{22A2}' => op(TexClass::Rel, 0),
    '\u{22A3}' => op(TexClass::Rel, 0),
    '\u{22A4}' => op(TexClass::Ord, 0),
    '\u{22A5}' => op(TexClass::Rel, 0),
    '\u{22A8}' => op(TexClass::Rel, 0),
    '\u{22AC}' => op(TexClass::Rel, 0),
    '\u{22AD}' => op(TexClass::Rel, 0),
    '\u{22B2}' => op(TexClass::Bin, 0),
    '\u{22B3}' => op(TexClass::Bin, 0),
    '\u{22C0}' => op(TexClass::Op, MOVABLE),
    '\u{22C1}' => op(TexClass::Op, MOVABLE),
    '\u{22C2}' => op(TexClass::Op, MOVABLE),
    '\u{22C3}' => op(TexClass::Op, MOVABLE),
    '\u{22C4}' => op(TexClass::Bin, 0),
    '\u{22C5}' => op(TexClass::Bin, 0),
    '\u{22C6}' => op(TexClass::Bin, 0),
    '\u{22C8}' => op(TexClass::Rel, 0),
    '\u{22E2}' => op(TexClass::Rel, 0),
    '\u{22E3}' => op(TexClass::Rel, 0),
    '\u{22EE}' => op(TexClass::Ord, 0),
    '\u{22EF}' => op(TexClass::Inner, 0),
    '\u{22F1}' => op(TexClass::Inner, 0),
    '\u{2308}' => op(TexClass::Open, DELIM),
    '\u{2309}' => op(TexClass::Close, DELIM),
    '\u{230A}' => op(TexClass::Open, DELIM),
    '\u{230B}' => op(TexClass::Close, DELIM),
    '\u{2322}' => op(TexClass::Rel, 0),
    '\u{2323}' => op(TexClass::Rel, 0),
    '\u{23B0}' => op(TexClass::Open, DELIM),
    '\u{23B1}' => op(TexClass::Close, DELIM),
    '\u{23DC}' => op(TexClass::Ord, STRETCHY),
    '\u{23DD}' => op(TexClass::Ord, STRETCHY),
    '\u{23DE}' => op(TexClass::Ord, STRETCHY),
    '\u{23DF}' => op(TexClass::Ord, STRETCHY),
    '\u{25B3}' => op(TexClass::Bin, 0),
    '\u{25B9}' => op(TexClass::Bin, 0),
    '\u{25BD}' => op(TexClass::Bin, 0),
    '\u{25C3}' => op(TexClass::Bin, 0),
    '\u{25EF}' => op(TexClass::Bin, 0),
    '\u{27E6}' => op(TexClass::Open, DELIM),
    '\u{27E7}' => op(TexClass::Close, DELIM),
    '\u{27E8}' => op(TexClass::Open, DELIM),
    '\u{27E9}' => op(TexClass::Close, DELIM),
    '\u{27EE}' => op(TexClass::Open, DELIM),
    '\u{27EF}' => op(TexClass::Close, DELIM),
    '\u{2A00}' => op(TexClass::Op, MOVABLE),
    '\u{2A01}' => op(TexClass::Op, MOVABLE),
    '\u{2A02}' => op(TexClass::Op, MOVABLE),
    '\u{2A04}' => op(TexClass::Op, MOVABLE),
    '\u{2A06}' => op(TexClass::Op, MOVABLE),
    '\u{2A0C}' => op(TexClass::Op, 0),
    '\u{2A3F}' => op(TexClass::Bin, 0),
    '\u{2A7D}' => op(TexClass::Rel, 0),
    '\u{2A7E}' => op(TexClass::Rel, 0),
    '\u{2AAF}' => op(TexClass::Rel, 0),
    '\u{2AB0}' => op(TexClass::Rel, 0),
};

/// Look a character up in the operator dictionary.
///
/// Arrows not listed explicitly are relations that stretch.
pub(crate) fn operator(c: char) -> Option<OperatorInfo> {
    if let Some(&(class, flags)) = OPERATORS.get(&c) {
        return Some(OperatorInfo { class, flags });
    }
    match c {
        '\u{2190}'..='\u{21FF}' | '\u{27F0}'..='\u{27FF}' | '\u{2900}'..='\u{297F}' => {
            Some(OperatorInfo {
                class: TexClass::Rel,
                flags: STRETCHY,
            })
        }
        '\u{2266}'..='\u{22AF}' | '\u{2A66}'..='\u{2AFF}' => Some(OperatorInfo {
            class: TexClass::Rel,
            flags: 0,
        }),
        _ => None,
    }
}

/// The spacing class of an `mo` with the given text.
///
/// Runs of one repeated glyph, as produced by relation merging, share the glyph's class.
pub(crate) fn operator_class(text: &str) -> TexClass {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if chars.all(|c| c == first) => {
            operator(first).map_or(TexClass::Ord, |info| info.class)
        }
        _ => TexClass::Ord,
    }
}

/// Characters replaced when typed literally in math.
pub(crate) fn remap(c: char) -> char {
    match c {
        '-' => '\u{2212}',
        '*' => '\u{2217}',
        '`' => '\u{2018}',
        c => c,
    }
}

/// The negated form of a relation, used by `\not`.
pub(crate) fn negation(c: char) -> Option<char> {
    Some(match c {
        '=' => '\u{2260}',
        '<' => '\u{226E}',
        '>' => '\u{226F}',
        '\u{2264}' => '\u{2270}',
        '\u{2265}' => '\u{2271}',
        '\u{2208}' => '\u{2209}',
        '\u{220B}' => '\u{220C}',
        '\u{2203}' => '\u{2204}',
        '\u{2223}' => '\u{2224}',
        '\u{2225}' => '\u{2226}',
        '\u{223C}' => '\u{2241}',
        '\u{2243}' => '\u{2244}',
        '\u{2245}' => '\u{2247}',
        '\u{2248}' => '\u{2249}',
        '\u{224D}' => '\u{226D}',
        '\u{2261}' => '\u{2262}',
        '\u{227A}' => '\u{2280}',
        '\u{227B}' => '\u{2281}',
        '\u{2282}' => '\u{2284}',
        '\u{2283}' => '\u{2285}',
        '\u{2286}' => '\u{2288}',
        '\u{2287}' => '\u{2289}',
        '\u{2291}' => '\u{22E2}',
        '\u{2292}' => '\u{22E3}',
        '\u{22A2}' => '\u{22AC}',
        '\u{22A8}' => '\u{22AD}',
        '\u{2190}' => '\u{219A}',
        '\u{2192}' => '\u{219B}',
        '\u{2194}' => '\u{21AE}',
        '\u{21D0}' => '\u{21CD}',
        '\u{21D2}' => '\u{21CF}',
        '\u{21D4}' => '\u{21CE}',
        _ => return None,
    })
}

#[rustfmt::skip]
pub(crate) fn is_char_delimiter(c: char) -> bool {
    matches!(
        c,
          '(' | ')' | '⦇' | '⦈' | '⟮' | '⟯'
        | '[' | ']' | '⟦' | '⟧' | '⦃' | '⦄'
        | '⟨' | '⟩' | '⟪' | '⟫' | '⦉' | '⦊'
        | '⌊' | '⌋' | '⌈' | '⌉' | '┌' | '┐'
        | '└' | '┘' | '⎰' | '⎱' | '|' | '‖'
        | '↑' | '⇑' | '↓' | '⇓' | '↕' | '⇕'
        | '/' | '.'
    )
}

/// The delimiter a character stands for after `\left`, `\big`, ...
///
/// `<` and `>` are angle brackets in that position. `.` is the empty delimiter.
pub(crate) fn char_delimiter(c: char) -> Option<&'static str> {
    Some(match c {
        '<' => "\u{27E8}",
        '>' => "\u{27E9}",
        '.' => "",
        '(' => "(",
        ')' => ")",
        '[' => "[",
        ']' => "]",
        '|' => "|",
        '/' => "/",
        c if is_char_delimiter(c) => return control_sequence_delimiter_map(&c.to_string()),
        _ => return None,
    })
}

/// Returns the matching delimiter for the given control sequence, if it exists.
pub(crate) fn control_sequence_delimiter_map(cs: &str) -> Option<&'static str> {
    Some(match cs {
        "lparen" => "(",
        "rparen" => ")",
        "llparenthesis" | "⦇" => "⦇",
        "rrparenthesis" | "⦈" => "⦈",
        "lgroup" | "⟮" => "⟮",
        "rgroup" | "⟯" => "⟯",

        "lbrack" => "[",
        "rbrack" => "]",
        "lBrack" | "⟦" => "⟦",
        "rBrack" | "⟧" => "⟧",

        "{" | "lbrace" => "{",
        "}" | "rbrace" => "}",
        "lBrace" | "⦃" => "⦃",
        "rBrace" | "⦄" => "⦄",

        "langle" | "⟨" => "⟨",
        "rangle" | "⟩" => "⟩",
        "lAngle" | "⟪" => "⟪",
        "rAngle" | "⟫" => "⟫",
        "llangle" | "⦉" => "⦉",
        "rrangle" | "⦊" => "⦊",

        "lfloor" | "⌊" => "⌊",
        "rfloor" | "⌋" => "⌋",
        "lceil" | "⌈" => "⌈",
        "rceil" | "⌉" => "⌉",
        "ulcorner" | "┌" => "┌",
        "urcorner" | "┐" => "┐",
        "llcorner" | "└" => "└",
        "lrcorner" | "┘" => "┘",

        "lmoustache" | "⎰" => "⎰",
        "rmoustache" | "⎱" => "⎱",
        "backslash" => "\\",

        "vert" | "lvert" | "rvert" => "|",
        "|" | "Vert" | "lVert" | "rVert" | "‖" => "‖",
        "uparrow" | "↑" => "↑",
        "Uparrow" | "⇑" => "⇑",
        "downarrow" | "↓" => "↓",
        "Downarrow" | "⇓" => "⇓",
        "updownarrow" | "↕" => "↕",
        "Updownarrow" | "⇕" => "⇕",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary() {
        assert_eq!(operator('=').map(|o| o.class), Some(TexClass::Rel));
        assert!(operator('(').is_some_and(OperatorInfo::stretchy));
        assert!(operator('\u{2211}').is_some_and(OperatorInfo::movable));
        assert!(!operator('\u{222B}').is_some_and(OperatorInfo::movable));
        assert_eq!(operator('\u{2921}').map(|o| o.class), Some(TexClass::Rel));
        assert_eq!(operator('$'), None);
    }

    #[test]
    fn repeated_glyph_class() {
        assert_eq!(operator_class("=="), TexClass::Rel);
        assert_eq!(operator_class("lim"), TexClass::Ord);
        assert_eq!(operator_class(""), TexClass::Ord);
    }

    #[test]
    fn delimiters() {
        assert_eq!(char_delimiter('<'), Some("\u{27E8}"));
        assert_eq!(char_delimiter('.'), Some(""));
        assert_eq!(char_delimiter('a'), None);
        assert_eq!(control_sequence_delimiter_map("lbrace"), Some("{"));
        assert_eq!(control_sequence_delimiter_map("alpha"), None);
    }
}
