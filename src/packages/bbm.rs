//! Blackboard bold fonts from the `bbm` LaTeX package.
use crate::{
    attribute::Font,
    config::OptionValue,
    registry::{Handler, Package, Registry},
};

/// `\mathbbm`, `\mathbbmss`, `\mathbbmtt` and `\mathversion`.
///
/// The weight of `\mathbbm` and `\mathbbmss` follows the `bbm.bold` option, which
/// `\mathversion{bold}` and `\mathversion{normal}` switch for the rest of the parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bbm;

static OPTIONS: [(&str, OptionValue); 1] = [("bold", OptionValue::Bool(false))];

impl Package for Bbm {
    fn name(&self) -> &'static str {
        "bbm"
    }

    fn register(&self, registry: &mut Registry) {
        registry.command(
            "mathbbm",
            Handler::BbmFont {
                regular: Font::BbmNormal,
                bold: Font::BbmBold,
            },
        );
        registry.command(
            "mathbbmss",
            Handler::BbmFont {
                regular: Font::BbmSansSerif,
                bold: Font::BbmSansSerifBold,
            },
        );
        registry.command("mathbbmtt", Handler::MathFont(Some(Font::BbmMonospace)));
        registry.command("mathversion", Handler::MathVersion);
    }

    fn options(&self) -> &[(&'static str, OptionValue)] {
        &OPTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Descriptor;

    #[test]
    fn registration() {
        let mut registry = Registry::new();
        Bbm.register(&mut registry);
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.lookup("mathbbmtt"),
            Some(&Descriptor::Builtin(Handler::MathFont(Some(
                Font::BbmMonospace
            ))))
        );
        assert_eq!(Bbm.options()[0].1.as_bool(), Some(false));
    }
}
