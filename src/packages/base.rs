//! The base grammar: symbols, fonts, structures and environments.
use crate::{
    attribute::Font,
    node::TexClass,
    registry::{
        Delimiters, Descriptor, Handler, MacroTemplate, OverStyle, Package, Registry, RuleKind,
        TableStyle, TextBox, Thickness,
    },
};

/// The commands and environments every configuration starts with.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base;

impl Package for Base {
    fn name(&self) -> &'static str {
        "base"
    }

    fn register(&self, registry: &mut Registry) {
        for &(name, text) in LOWERCASE_GREEK.iter().chain(IDENTIFIERS) {
            registry.command(name, Handler::Identifier(text, None));
        }
        for &(name, text) in UPRIGHT_IDENTIFIERS {
            registry.command(name, Handler::Identifier(text, Some(Font::Normal)));
        }
        for &(name, text) in OPERATORS {
            registry.command(name, Handler::Operator(text, &[]));
        }
        for &(name, text, attributes) in OPERATORS_WITH_ATTRIBUTES {
            registry.command(name, Handler::Operator(text, attributes));
        }
        for &name in NAMED_FUNCTIONS {
            registry.command(name, Handler::NamedFn(name));
        }
        for &(name, text, movable) in NAMED_OPERATORS {
            registry.command(name, Handler::NamedOp(text, movable));
        }
        for &(name, font) in SET_FONTS {
            registry.command(name, Handler::SetFont(font));
        }
        for &(name, font) in MATH_FONTS {
            registry.command(name, Handler::MathFont(font));
        }
        for &(name, display, level) in STYLES {
            registry.command(name, Handler::SetStyle { display, level });
        }
        for &(name, size) in SIZES {
            registry.command(name, Handler::SetSize(size));
        }
        for &(name, class) in ATOMS {
            registry.command(name, Handler::TexAtom(class));
        }
        for &(name, width) in SPACERS {
            registry.command(name, Handler::Spacer(width));
        }
        for &(name, class, size) in BIG_DELIMITERS {
            registry.command(name, Handler::BigDelim { class, size });
        }
        for &(name, text, stretchy) in ACCENTS {
            registry.command(name, Handler::Accent { text, stretchy });
        }
        for &(name, text, over, accent, stack) in UNDER_OVER {
            registry.command(
                name,
                Handler::UnderOver {
                    text,
                    over,
                    accent,
                    stack,
                },
            );
        }
        for &(name, thickness, delimiters) in GENERALIZED_FRACTIONS {
            registry.command(
                name,
                Handler::Over(OverStyle {
                    thickness,
                    delimiters,
                }),
            );
        }
        for &(name, handler) in STRUCTURES {
            registry.command(name, handler);
        }
        for &(name, body, arity) in MACROS {
            registry.macro_template(name, MacroTemplate::new(body, arity));
        }
        for &(name, handler) in ENVIRONMENTS {
            registry.environment(name, Descriptor::Builtin(handler));
        }
    }
}

#[rustfmt::skip]
static LOWERCASE_GREEK: &[(&str, &str)] = &[
    ("alpha", "\u{03B1}"), ("beta", "\u{03B2}"), ("gamma", "\u{03B3}"), ("delta", "\u{03B4}"),
    ("epsilon", "\u{03F5}"), ("zeta", "\u{03B6}"), ("eta", "\u{03B7}"), ("theta", "\u{03B8}"),
    ("iota", "\u{03B9}"), ("kappa", "\u{03BA}"), ("lambda", "\u{03BB}"), ("mu", "\u{03BC}"),
    ("nu", "\u{03BD}"), ("xi", "\u{03BE}"), ("omicron", "\u{03BF}"), ("pi", "\u{03C0}"),
    ("rho", "\u{03C1}"), ("sigma", "\u{03C3}"), ("tau", "\u{03C4}"), ("upsilon", "\u{03C5}"),
    ("phi", "\u{03D5}"), ("chi", "\u{03C7}"), ("psi", "\u{03C8}"), ("omega", "\u{03C9}"),
    ("varepsilon", "\u{03B5}"), ("vartheta", "\u{03D1}"), ("varpi", "\u{03D6}"),
    ("varrho", "\u{03F1}"), ("varsigma", "\u{03C2}"), ("varphi", "\u{03C6}"),
];

#[rustfmt::skip]
static IDENTIFIERS: &[(&str, &str)] = &[
    ("aleph", "\u{2135}"), ("hbar", "\u{210F}"), ("imath", "\u{0131}"), ("jmath", "\u{0237}"),
    ("ell", "\u{2113}"), ("wp", "\u{2118}"), ("Re", "\u{211C}"), ("Im", "\u{2111}"),
    ("partial", "\u{2202}"), ("flat", "\u{266D}"), ("natural", "\u{266E}"),
    ("sharp", "\u{266F}"), ("clubsuit", "\u{2663}"), ("diamondsuit", "\u{2662}"),
    ("heartsuit", "\u{2661}"), ("spadesuit", "\u{2660}"),
];

#[rustfmt::skip]
static UPRIGHT_IDENTIFIERS: &[(&str, &str)] = &[
    ("Gamma", "\u{0393}"), ("Delta", "\u{0394}"), ("Theta", "\u{0398}"), ("Lambda", "\u{039B}"),
    ("Xi", "\u{039E}"), ("Pi", "\u{03A0}"), ("Sigma", "\u{03A3}"), ("Upsilon", "\u{03A5}"),
    ("Phi", "\u{03A6}"), ("Psi", "\u{03A8}"), ("Omega", "\u{03A9}"),
    ("infty", "\u{221E}"), ("emptyset", "\u{2205}"), ("nabla", "\u{2207}"),
    ("angle", "\u{2220}"), ("triangle", "\u{25B3}"), ("And", "&"), ("square", "\u{25FB}"),
    ("blacksquare", "\u{25FC}"), ("blacktriangle", "\u{25B4}"), ("Box", "\u{25A1}"),
    ("&", "&"), ("#", "#"), ("$", "$"), ("%", "%"), ("_", "_"),
];

#[rustfmt::skip]
static OPERATORS: &[(&str, &str)] = &[
    // large operators
    ("sum", "\u{2211}"), ("prod", "\u{220F}"), ("coprod", "\u{2210}"), ("int", "\u{222B}"),
    ("intop", "\u{222B}"), ("iint", "\u{222C}"), ("iiint", "\u{222D}"), ("oint", "\u{222E}"),
    ("bigcap", "\u{22C2}"), ("bigcup", "\u{22C3}"), ("bigvee", "\u{22C1}"),
    ("bigwedge", "\u{22C0}"), ("bigodot", "\u{2A00}"), ("bigoplus", "\u{2A01}"),
    ("bigotimes", "\u{2A02}"), ("biguplus", "\u{2A04}"), ("bigsqcup", "\u{2A06}"),
    ("smallint", "\u{222B}"),
    // binary operators
    ("pm", "\u{00B1}"), ("mp", "\u{2213}"), ("times", "\u{00D7}"), ("div", "\u{00F7}"),
    ("ast", "\u{2217}"), ("star", "\u{22C6}"), ("circ", "\u{2218}"), ("bullet", "\u{2219}"),
    ("cdot", "\u{22C5}"), ("cap", "\u{2229}"), ("cup", "\u{222A}"), ("uplus", "\u{228E}"),
    ("sqcap", "\u{2293}"), ("sqcup", "\u{2294}"), ("vee", "\u{2228}"), ("lor", "\u{2228}"),
    ("wedge", "\u{2227}"), ("land", "\u{2227}"), ("setminus", "\u{2216}"), ("wr", "\u{2240}"),
    ("diamond", "\u{22C4}"), ("bigtriangleup", "\u{25B3}"), ("bigtriangledown", "\u{25BD}"),
    ("triangleleft", "\u{25C3}"), ("triangleright", "\u{25B9}"), ("lhd", "\u{22B2}"),
    ("rhd", "\u{22B3}"), ("unlhd", "\u{22B4}"), ("unrhd", "\u{22B5}"), ("oplus", "\u{2295}"),
    ("ominus", "\u{2296}"), ("otimes", "\u{2297}"), ("oslash", "\u{2298}"),
    ("odot", "\u{2299}"), ("bigcirc", "\u{25EF}"), ("dagger", "\u{2020}"),
    ("ddagger", "\u{2021}"), ("amalg", "\u{2A3F}"),
    // relations
    ("leq", "\u{2264}"), ("le", "\u{2264}"), ("geq", "\u{2265}"), ("ge", "\u{2265}"),
    ("neq", "\u{2260}"), ("ne", "\u{2260}"), ("equiv", "\u{2261}"), ("prec", "\u{227A}"),
    ("succ", "\u{227B}"), ("sim", "\u{223C}"), ("perp", "\u{22A5}"), ("preceq", "\u{2AAF}"),
    ("succeq", "\u{2AB0}"), ("simeq", "\u{2243}"), ("mid", "\u{2223}"), ("ll", "\u{226A}"),
    ("gg", "\u{226B}"), ("asymp", "\u{224D}"), ("parallel", "\u{2225}"),
    ("subset", "\u{2282}"), ("supset", "\u{2283}"), ("approx", "\u{2248}"),
    ("bowtie", "\u{22C8}"), ("subseteq", "\u{2286}"), ("supseteq", "\u{2287}"),
    ("cong", "\u{2245}"), ("sqsubseteq", "\u{2291}"), ("sqsupseteq", "\u{2292}"),
    ("doteq", "\u{2250}"), ("frown", "\u{2322}"), ("smile", "\u{2323}"), ("in", "\u{2208}"),
    ("ni", "\u{220B}"), ("owns", "\u{220B}"), ("notin", "\u{2209}"), ("propto", "\u{221D}"),
    ("vdash", "\u{22A2}"), ("dashv", "\u{22A3}"), ("models", "\u{22A8}"),
    // arrows
    ("gets", "\u{2190}"), ("to", "\u{2192}"), ("leftarrow", "\u{2190}"),
    ("Leftarrow", "\u{21D0}"), ("rightarrow", "\u{2192}"), ("Rightarrow", "\u{21D2}"),
    ("leftrightarrow", "\u{2194}"), ("Leftrightarrow", "\u{21D4}"), ("mapsto", "\u{21A6}"),
    ("hookleftarrow", "\u{21A9}"), ("hookrightarrow", "\u{21AA}"),
    ("leftharpoonup", "\u{21BC}"), ("leftharpoondown", "\u{21BD}"),
    ("rightharpoonup", "\u{21C0}"), ("rightharpoondown", "\u{21C1}"),
    ("rightleftharpoons", "\u{21CC}"), ("longleftarrow", "\u{27F5}"),
    ("Longleftarrow", "\u{27F8}"), ("longrightarrow", "\u{27F6}"),
    ("Longrightarrow", "\u{27F9}"), ("longleftrightarrow", "\u{27F7}"),
    ("Longleftrightarrow", "\u{27FA}"), ("longmapsto", "\u{27FC}"), ("uparrow", "\u{2191}"),
    ("Uparrow", "\u{21D1}"), ("downarrow", "\u{2193}"), ("Downarrow", "\u{21D3}"),
    ("updownarrow", "\u{2195}"), ("Updownarrow", "\u{21D5}"), ("nearrow", "\u{2197}"),
    ("searrow", "\u{2198}"), ("swarrow", "\u{2199}"), ("nwarrow", "\u{2196}"),
    // delimiters
    ("lbrack", "["), ("rbrack", "]"), ("vert", "|"), ("lvert", "|"), ("rvert", "|"),
    ("Vert", "\u{2016}"), ("|", "\u{2016}"), ("lVert", "\u{2016}"), ("rVert", "\u{2016}"),
    ("langle", "\u{27E8}"), ("rangle", "\u{27E9}"), ("lfloor", "\u{230A}"),
    ("rfloor", "\u{230B}"), ("lceil", "\u{2308}"), ("rceil", "\u{2309}"),
    ("backslash", "\\"), ("lmoustache", "\u{23B0}"), ("rmoustache", "\u{23B1}"),
    // miscellaneous
    ("forall", "\u{2200}"), ("exists", "\u{2203}"), ("nexists", "\u{2204}"),
    ("neg", "\u{00AC}"), ("lnot", "\u{00AC}"), ("top", "\u{22A4}"), ("bot", "\u{22A5}"),
    ("surd", "\u{221A}"), ("prime", "\u{2032}"), ("ldots", "\u{2026}"), ("dots", "\u{22EF}"),
    ("cdots", "\u{22EF}"), ("vdots", "\u{22EE}"), ("ddots", "\u{22F1}"), ("colon", ":"),
];

#[rustfmt::skip]
static OPERATORS_WITH_ATTRIBUTES: &[(&str, &str, &[(&str, &str)])] = &[
    ("{", "{", &[("fence", "false")]),
    ("}", "}", &[("fence", "false")]),
    ("lbrace", "{", &[("fence", "false")]),
    ("rbrace", "}", &[("fence", "false")]),
];

#[rustfmt::skip]
static NAMED_FUNCTIONS: &[&str] = &[
    "arcsin", "arccos", "arctan", "arg", "cos", "cosh", "cot", "coth", "csc", "deg", "dim",
    "exp", "hom", "ker", "lg", "ln", "log", "sec", "sin", "sinh", "tan", "tanh",
];

#[rustfmt::skip]
static NAMED_OPERATORS: &[(&str, &str, bool)] = &[
    ("lim", "lim", true), ("limsup", "lim\u{2006}sup", true), ("liminf", "lim\u{2006}inf", true),
    ("det", "det", true), ("gcd", "gcd", true), ("inf", "inf", true), ("max", "max", true),
    ("min", "min", true), ("Pr", "Pr", true), ("sup", "sup", true),
];

#[rustfmt::skip]
static SET_FONTS: &[(&str, Font)] = &[
    ("rm", Font::Normal), ("mit", Font::Italic), ("oldstyle", Font::OldStyle),
    ("cal", Font::Calligraphic), ("it", Font::Italic), ("bf", Font::Bold),
    ("Bbb", Font::DoubleStruck), ("scr", Font::Script), ("frak", Font::Fraktur),
    ("sf", Font::SansSerif), ("tt", Font::Monospace),
];

#[rustfmt::skip]
static MATH_FONTS: &[(&str, Option<Font>)] = &[
    ("mathrm", Some(Font::Normal)), ("mathup", Some(Font::Normal)), ("mathnormal", None),
    ("mathbf", Some(Font::Bold)), ("mathbfup", Some(Font::Bold)),
    ("mathit", Some(Font::MathItalic)), ("mathbfit", Some(Font::BoldItalic)),
    ("mathbb", Some(Font::DoubleStruck)), ("mathfrak", Some(Font::Fraktur)),
    ("mathbffrak", Some(Font::BoldFraktur)), ("mathscr", Some(Font::Script)),
    ("mathbfscr", Some(Font::BoldScript)), ("mathsf", Some(Font::SansSerif)),
    ("mathsfup", Some(Font::SansSerif)), ("mathbfsf", Some(Font::BoldSansSerif)),
    ("mathsfit", Some(Font::SansSerifItalic)), ("mathtt", Some(Font::Monospace)),
    ("mathcal", Some(Font::Calligraphic)), ("mathbfcal", Some(Font::BoldCalligraphic)),
];

static STYLES: &[(&str, bool, u8)] = &[
    ("displaystyle", true, 0),
    ("textstyle", false, 0),
    ("scriptstyle", false, 1),
    ("scriptscriptstyle", false, 2),
];

#[rustfmt::skip]
static SIZES: &[(&str, f32)] = &[
    ("tiny", 0.5), ("Tiny", 0.6), ("scriptsize", 0.7), ("small", 0.85), ("normalsize", 1.),
    ("large", 1.2), ("Large", 1.44), ("LARGE", 1.73), ("huge", 2.07), ("Huge", 2.49),
];

static ATOMS: &[(&str, TexClass)] = &[
    ("mathord", TexClass::Ord),
    ("mathop", TexClass::Op),
    ("mathbin", TexClass::Bin),
    ("mathrel", TexClass::Rel),
    ("mathopen", TexClass::Open),
    ("mathclose", TexClass::Close),
    ("mathpunct", TexClass::Punct),
    ("mathinner", TexClass::Inner),
];

#[rustfmt::skip]
static SPACERS: &[(&str, f32)] = &[
    (",", 3. / 18.), (":", 4. / 18.), (">", 4. / 18.), (";", 5. / 18.), ("!", -3. / 18.),
    ("thinspace", 3. / 18.), ("medspace", 4. / 18.), ("thickspace", 5. / 18.),
    ("negthinspace", -3. / 18.), ("negmedspace", -4. / 18.), ("negthickspace", -5. / 18.),
    ("enspace", 0.5), ("quad", 1.), ("qquad", 2.),
];

#[rustfmt::skip]
static BIG_DELIMITERS: &[(&str, TexClass, f32)] = &[
    ("big", TexClass::Ord, 1.2), ("Big", TexClass::Ord, 1.623),
    ("bigg", TexClass::Ord, 2.047), ("Bigg", TexClass::Ord, 2.47),
    ("bigl", TexClass::Open, 1.2), ("Bigl", TexClass::Open, 1.623),
    ("biggl", TexClass::Open, 2.047), ("Biggl", TexClass::Open, 2.47),
    ("bigr", TexClass::Close, 1.2), ("Bigr", TexClass::Close, 1.623),
    ("biggr", TexClass::Close, 2.047), ("Biggr", TexClass::Close, 2.47),
    ("bigm", TexClass::Rel, 1.2), ("Bigm", TexClass::Rel, 1.623),
    ("biggm", TexClass::Rel, 2.047), ("Biggm", TexClass::Rel, 2.47),
];

#[rustfmt::skip]
static ACCENTS: &[(&str, &str, bool)] = &[
    ("acute", "\u{00B4}", false), ("grave", "`", false), ("ddot", "\u{00A8}", false),
    ("tilde", "~", false), ("bar", "\u{00AF}", false), ("breve", "\u{02D8}", false),
    ("check", "\u{02C7}", false), ("hat", "^", false), ("vec", "\u{2192}", false),
    ("dot", "\u{02D9}", false), ("mathring", "\u{02DA}", false),
    ("widetilde", "~", true), ("widehat", "^", true),
];

#[rustfmt::skip]
static UNDER_OVER: &[(&str, &str, bool, bool, bool)] = &[
    ("overline", "\u{2015}", true, true, false),
    ("underline", "\u{2015}", false, true, false),
    ("overbrace", "\u{23DE}", true, false, true),
    ("underbrace", "\u{23DF}", false, false, true),
    ("overleftarrow", "\u{2190}", true, true, false),
    ("overrightarrow", "\u{2192}", true, true, false),
    ("overleftrightarrow", "\u{2194}", true, true, false),
    ("underleftarrow", "\u{2190}", false, true, false),
    ("underrightarrow", "\u{2192}", false, true, false),
    ("underleftrightarrow", "\u{2194}", false, true, false),
];

static GENERALIZED_FRACTIONS: &[(&str, Thickness, Delimiters)] = &[
    ("over", Thickness::Default, Delimiters::None),
    ("atop", Thickness::Zero, Delimiters::None),
    ("above", Thickness::Read, Delimiters::None),
    ("choose", Thickness::Zero, Delimiters::Fixed("(", ")")),
    ("brace", Thickness::Zero, Delimiters::Fixed("{", "}")),
    ("brack", Thickness::Zero, Delimiters::Fixed("[", "]")),
    ("overwithdelims", Thickness::Default, Delimiters::Read),
    ("atopwithdelims", Thickness::Zero, Delimiters::Read),
    ("abovewithdelims", Thickness::Read, Delimiters::Read),
];

static PMATRIX: TableStyle = TableStyle {
    open: Some("("),
    close: Some(")"),
    ..TableStyle::MATRIX
};

static CASES: TableStyle = TableStyle {
    open: Some("{"),
    close: Some(""),
    columnalign: Some("left left"),
    rowspacing: ".2em",
    cases: true,
    ..TableStyle::MATRIX
};

static EQALIGN: TableStyle = TableStyle {
    columnalign: Some("right left"),
    rowspacing: ".5em",
    columnspacing: "0.278em",
    displaystyle: true,
    framespacing: None,
    ..TableStyle::MATRIX
};

static EQALIGNNO: TableStyle = TableStyle {
    labeled: true,
    ..EQALIGN
};

static ARRAY_ENVIRONMENT: TableStyle = TableStyle {
    framespacing: Some(".5em .125em"),
    environment: true,
    ..TableStyle::MATRIX
};

static MATRIX_ENVIRONMENT: TableStyle = ARRAY_ENVIRONMENT;

static PMATRIX_ENVIRONMENT: TableStyle = TableStyle {
    open: Some("("),
    close: Some(")"),
    ..ARRAY_ENVIRONMENT
};

static BMATRIX_ENVIRONMENT: TableStyle = TableStyle {
    open: Some("["),
    close: Some("]"),
    ..ARRAY_ENVIRONMENT
};

static BRACE_MATRIX_ENVIRONMENT: TableStyle = TableStyle {
    open: Some("{"),
    close: Some("}"),
    ..ARRAY_ENVIRONMENT
};

static VMATRIX_ENVIRONMENT: TableStyle = TableStyle {
    open: Some("|"),
    close: Some("|"),
    ..ARRAY_ENVIRONMENT
};

static DOUBLE_VMATRIX_ENVIRONMENT: TableStyle = TableStyle {
    open: Some("\u{2016}"),
    close: Some("\u{2016}"),
    ..ARRAY_ENVIRONMENT
};

static CASES_ENVIRONMENT: TableStyle = TableStyle {
    open: Some("{"),
    close: Some(""),
    columnalign: Some("left left"),
    rowspacing: ".2em",
    cases: true,
    ..ARRAY_ENVIRONMENT
};

static EQNARRAY_ENVIRONMENT: TableStyle = TableStyle {
    columnalign: Some("right center left"),
    rowspacing: ".5em",
    columnspacing: "0.278em",
    displaystyle: true,
    framespacing: None,
    equation: true,
    ..ARRAY_ENVIRONMENT
};

static STRUCTURES: &[(&str, Handler)] = &[
    ("frac", Handler::Frac),
    ("sqrt", Handler::Sqrt),
    ("root", Handler::Root),
    ("leftroot", Handler::MoveRoot { left: true }),
    ("uproot", Handler::MoveRoot { left: false }),
    ("buildrel", Handler::BuildRel),
    ("left", Handler::Left),
    ("right", Handler::Right),
    ("middle", Handler::Middle),
    ("boldsymbol", Handler::BoldSymbol),
    ("hskip", Handler::Hskip { nobreak: false }),
    ("hspace", Handler::Hskip { nobreak: false }),
    ("mskip", Handler::Hskip { nobreak: false }),
    ("mspace", Handler::Hskip { nobreak: false }),
    ("kern", Handler::Hskip { nobreak: true }),
    ("mkern", Handler::Hskip { nobreak: true }),
    (" ", Handler::TextSymbol("\u{00A0}")),
    ("nobreakspace", Handler::TextSymbol("\u{00A0}")),
    (
        "overset",
        Handler::Set {
            over: true,
            class: None,
        },
    ),
    (
        "underset",
        Handler::Set {
            over: false,
            class: None,
        },
    ),
    (
        "stackrel",
        Handler::Set {
            over: true,
            class: Some(TexClass::Rel),
        },
    ),
    (
        "phantom",
        Handler::Phantom {
            vertical: true,
            horizontal: true,
        },
    ),
    (
        "vphantom",
        Handler::Phantom {
            vertical: true,
            horizontal: false,
        },
    ),
    (
        "hphantom",
        Handler::Phantom {
            vertical: false,
            horizontal: true,
        },
    ),
    ("smash", Handler::Smash),
    ("llap", Handler::Lap { left: true }),
    ("rlap", Handler::Lap { left: false }),
    ("raise", Handler::Raise { up: true }),
    ("lower", Handler::Raise { up: false }),
    ("rule", Handler::Rule(RuleKind::Rule)),
    ("Rule", Handler::Rule(RuleKind::Rule3)),
    ("Space", Handler::Rule(RuleKind::Space)),
    ("strut", Handler::Strut),
    ("not", Handler::Not),
    ("limits", Handler::Limits(true)),
    ("nolimits", Handler::Limits(false)),
    ("displaylimits", Handler::Ignore),
    ("unicode", Handler::Unicode),
    ("mmlToken", Handler::MmlToken),
    ("label", Handler::Label),
    ("tag", Handler::Tag),
    ("nonumber", Handler::NoNumber),
    ("notag", Handler::NoNumber),
    ("hfill", Handler::HFill),
    ("cr", Handler::Cr),
    ("\\", Handler::Linebreak),
    ("newline", Handler::Linebreak),
    ("hline", Handler::Hline { dashed: false }),
    ("hdashline", Handler::Hline { dashed: true }),
    ("def", Handler::Def),
    ("let", Handler::Let),
    ("newcommand", Handler::NewCommand),
    ("renewcommand", Handler::NewCommand),
    ("begin", Handler::Begin),
    ("end", Handler::End),
    ("array", Handler::Matrix(&TableStyle::MATRIX)),
    ("matrix", Handler::Matrix(&TableStyle::MATRIX)),
    ("pmatrix", Handler::Matrix(&PMATRIX)),
    ("cases", Handler::Matrix(&CASES)),
    ("eqalign", Handler::Matrix(&EQALIGN)),
    ("eqalignno", Handler::Matrix(&EQALIGNNO)),
    ("leqalignno", Handler::Matrix(&EQALIGNNO)),
    ("text", Handler::TextBox(TextBox::Text)),
    ("mbox", Handler::TextBox(TextBox::Mbox)),
    ("hbox", Handler::TextBox(TextBox::Hbox)),
    ("fbox", Handler::TextBox(TextBox::Fbox)),
    ("mathchoice", Handler::MathChoice),
    ("relax", Handler::Ignore),
];

#[rustfmt::skip]
static MACROS: &[(&str, &str, u8)] = &[
    ("mod", r"\mathchoice{\kern18mu}{\kern12mu}{\kern12mu}{\kern12mu}\mmlToken{mi}{mod}\,\,#1", 1),
    ("bmod", r#"\mmlToken{mo}[lspace="thickmathspace", rspace="thickmathspace"]{mod}"#, 0),
    ("pmod", r"\pod{\mmlToken{mi}{mod}\mkern6mu #1}", 1),
    ("pod", r"\mathchoice{\kern18mu}{\kern8mu}{\kern8mu}{\kern8mu}(#1)", 1),
    ("iff", r"\;\Longleftrightarrow\;", 0),
    ("implies", r"\;\Longrightarrow\;", 0),
    ("impliedby", r"\;\Longleftarrow\;", 0),
    ("mathstrut", r"\vphantom{(}", 0),
];

static ENVIRONMENTS: &[(&str, Handler)] = &[
    ("array", Handler::ArrayEnv),
    ("matrix", Handler::MatrixEnv(&MATRIX_ENVIRONMENT)),
    ("pmatrix", Handler::MatrixEnv(&PMATRIX_ENVIRONMENT)),
    ("bmatrix", Handler::MatrixEnv(&BMATRIX_ENVIRONMENT)),
    ("Bmatrix", Handler::MatrixEnv(&BRACE_MATRIX_ENVIRONMENT)),
    ("vmatrix", Handler::MatrixEnv(&VMATRIX_ENVIRONMENT)),
    ("Vmatrix", Handler::MatrixEnv(&DOUBLE_VMATRIX_ENVIRONMENT)),
    ("cases", Handler::MatrixEnv(&CASES_ENVIRONMENT)),
    ("eqnarray", Handler::MatrixEnv(&EQNARRAY_ENVIRONMENT)),
    ("eqnarray*", Handler::MatrixEnv(&EQNARRAY_ENVIRONMENT)),
    ("equation", Handler::Equation),
    ("equation*", Handler::Equation),
];

/// The style of plain `\array{..}`, which is also the one for array environments apart
/// from frame spacing and attribute order.
pub(crate) fn array_environment_style() -> &'static TableStyle {
    &ARRAY_ENVIRONMENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_everything() {
        let mut registry = Registry::new();
        Base.register(&mut registry);
        assert_eq!(
            registry.lookup("alpha"),
            Some(&Descriptor::Builtin(Handler::Identifier("\u{03B1}", None)))
        );
        assert_eq!(
            registry.lookup("Gamma"),
            Some(&Descriptor::Builtin(Handler::Identifier(
                "\u{0393}",
                Some(Font::Normal)
            )))
        );
        assert!(matches!(registry.lookup("mod"), Some(Descriptor::Macro(t)) if t.arity == 1));
        assert!(registry.lookup_environment("eqnarray*").is_some());
        assert!(registry.lookup("operatorname").is_none());
    }

    #[test]
    fn table_styles() {
        assert_eq!(CASES.rowspacing, ".2em");
        assert_eq!(CASES.framespacing, Some(".2em .125em"));
        assert!(EQALIGNNO.labeled && EQALIGNNO.framespacing.is_none());
        assert!(array_environment_style().environment);
    }
}
