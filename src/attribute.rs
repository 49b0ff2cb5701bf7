//! Dimensions and font variants shared by the parser and the node tree.

use std::fmt::{self, Display};

/// A TeX dimension, e.g. `1.5em` or `-2pt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub value: f32,
    pub unit: DimensionUnit,
}

impl Dimension {
    pub const fn new(value: f32, unit: DimensionUnit) -> Self {
        Self { value, unit }
    }

    /// Express the dimension in ems, assuming a 10pt font and the usual
    /// 7.2px per TeX point screen resolution.
    pub fn to_em(self) -> f32 {
        self.value * self.unit.em_factor()
    }

    pub fn is_negative(self) -> bool {
        self.value < 0.
    }

    /// Same magnitude, opposite sign.
    pub fn negate(self) -> Self {
        Self::new(-self.value, self.unit)
    }

    /// Render with an explicit leading sign, the way `mpadded` offsets are written.
    pub fn signed(self) -> String {
        if self.is_negative() {
            self.to_string()
        } else {
            format!("+{self}")
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&trim_number(self.value, 3))?;
        f.write_str(self.unit.as_str())
    }
}

/// A glue specification: natural size, stretch and shrink.
pub type Glue = (Dimension, Option<Dimension>, Option<Dimension>);

/// Units accepted in dimension specifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionUnit {
    Em,
    Ex,
    Pt,
    Pc,
    Px,
    In,
    Cm,
    Mm,
    Mu,
}

impl DimensionUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            DimensionUnit::Em => "em",
            DimensionUnit::Ex => "ex",
            DimensionUnit::Pt => "pt",
            DimensionUnit::Pc => "pc",
            DimensionUnit::Px => "px",
            DimensionUnit::In => "in",
            DimensionUnit::Cm => "cm",
            DimensionUnit::Mm => "mm",
            DimensionUnit::Mu => "mu",
        }
    }

    pub fn from_str(unit: &str) -> Option<Self> {
        Some(match unit {
            "em" => DimensionUnit::Em,
            "ex" => DimensionUnit::Ex,
            "pt" => DimensionUnit::Pt,
            "pc" => DimensionUnit::Pc,
            "px" => DimensionUnit::Px,
            "in" => DimensionUnit::In,
            "cm" => DimensionUnit::Cm,
            "mm" => DimensionUnit::Mm,
            "mu" => DimensionUnit::Mu,
            _ => return None,
        })
    }

    fn em_factor(self) -> f32 {
        const PX_PER_IN: f32 = 7.2;
        match self {
            DimensionUnit::Em => 1.,
            DimensionUnit::Ex => 0.43,
            DimensionUnit::Pt => 0.1,
            DimensionUnit::Pc => 1.2,
            DimensionUnit::Px => PX_PER_IN / 72.,
            DimensionUnit::In => PX_PER_IN,
            DimensionUnit::Cm => PX_PER_IN / 2.54,
            DimensionUnit::Mm => PX_PER_IN / 25.4,
            DimensionUnit::Mu => 1. / 18.,
        }
    }
}

/// Format an em quantity with at most three decimals, e.g. `0.167em` or `1em`.
pub fn em(value: f32) -> String {
    if value.abs() < 0.0006 {
        return String::from("0em");
    }
    let mut s = trim_number(value, 3);
    s.push_str("em");
    s
}

fn trim_number(value: f32, precision: usize) -> String {
    let mut s = format!("{value:.precision$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = String::from("0");
    }
    s
}

/// A font variant selectable with `\mathbf`, `\rm`, `\mathbbm`, ...
///
/// Standard variants map onto the MathML `mathvariant` attribute. The remaining ones are
/// TeX-specific and are carried as a custom variant name with a standard fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Font {
    Normal,
    Italic,
    Bold,
    BoldItalic,
    DoubleStruck,
    Fraktur,
    BoldFraktur,
    Script,
    BoldScript,
    SansSerif,
    BoldSansSerif,
    SansSerifItalic,
    SansSerifBoldItalic,
    Monospace,
    Calligraphic,
    BoldCalligraphic,
    OldStyle,
    MathItalic,
    BbmNormal,
    BbmBold,
    BbmSansSerif,
    BbmSansSerifBold,
    BbmMonospace,
}

impl Font {
    /// The value written into `mathvariant`.
    pub fn mathvariant(self) -> &'static str {
        match self {
            Font::Normal | Font::OldStyle => "normal",
            Font::Italic | Font::MathItalic => "italic",
            Font::Bold => "bold",
            Font::BoldItalic => "bold-italic",
            Font::DoubleStruck
            | Font::BbmNormal
            | Font::BbmBold
            | Font::BbmSansSerif
            | Font::BbmSansSerifBold
            | Font::BbmMonospace => "double-struck",
            Font::Fraktur => "fraktur",
            Font::BoldFraktur => "bold-fraktur",
            Font::Script | Font::Calligraphic => "script",
            Font::BoldScript | Font::BoldCalligraphic => "bold-script",
            Font::SansSerif => "sans-serif",
            Font::BoldSansSerif => "bold-sans-serif",
            Font::SansSerifItalic => "sans-serif-italic",
            Font::SansSerifBoldItalic => "sans-serif-bold-italic",
            Font::Monospace => "monospace",
        }
    }

    /// The TeX-specific variant name, for fonts that have no MathML equivalent.
    pub fn custom(self) -> Option<&'static str> {
        Some(match self {
            Font::Calligraphic => "-tex-calligraphic",
            Font::BoldCalligraphic => "-tex-bold-calligraphic",
            Font::OldStyle => "-tex-oldstyle",
            Font::MathItalic => "-tex-mathit",
            Font::BbmNormal => "-bbm-normal",
            Font::BbmBold => "-bbm-bold",
            Font::BbmSansSerif => "-bbm-sans-serif",
            Font::BbmSansSerifBold => "-bbm-sans-serif-bold",
            Font::BbmMonospace => "-bbm-monospace",
            _ => return None,
        })
    }

    /// The variant used for letters under `\boldsymbol`.
    pub fn emboldened(self) -> Font {
        match self {
            Font::Normal | Font::Bold => Font::Bold,
            Font::Italic | Font::MathItalic | Font::BoldItalic => Font::BoldItalic,
            Font::Fraktur | Font::BoldFraktur => Font::BoldFraktur,
            Font::Script | Font::BoldScript => Font::BoldScript,
            Font::Calligraphic | Font::BoldCalligraphic => Font::BoldCalligraphic,
            Font::SansSerif | Font::BoldSansSerif => Font::BoldSansSerif,
            Font::SansSerifItalic | Font::SansSerifBoldItalic => Font::SansSerifBoldItalic,
            Font::BbmNormal => Font::BbmBold,
            Font::BbmSansSerif => Font::BbmSansSerifBold,
            other => other,
        }
    }
}
