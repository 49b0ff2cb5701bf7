//! Convenience macros found in IEEE manuscripts.
//!
//! Nearly everything here is a macro template expanding to base commands, so the package
//! doubles as a stress test of the expander.
use crate::{
    attribute::Font,
    registry::{Handler, MacroTemplate, Package, Registry, TableStyle},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct IeeeMacros;

impl Package for IeeeMacros {
    fn name(&self) -> &'static str {
        "ieeemacros"
    }

    fn register(&self, registry: &mut Registry) {
        for letter in 'A'..='Z' {
            registry.macro_template(
                &format!("BB{letter}"),
                MacroTemplate::new(&format!(r"{{\Bbb {letter}}}"), 0),
            );
        }
        for (offset, letter) in ('A'..='Z').enumerate() {
            registry.macro_template(
                &format!("circ{letter}"),
                MacroTemplate::new(&format!(r"\unicode{{x{:X}}}", 0x24B6 + offset), 0),
            );
        }
        for (offset, letter) in ('a'..='z').enumerate() {
            registry.macro_template(
                &format!("circ{letter}"),
                MacroTemplate::new(&format!(r"\unicode{{x{:X}}}", 0x24D0 + offset), 0),
            );
        }
        for (offset, digit) in DIGIT_NAMES.iter().enumerate() {
            registry.macro_template(
                &format!("circ{digit}"),
                MacroTemplate::new(&format!(r"\unicode{{x{:X}}}", 0x2460 + offset), 0),
            );
        }
        for &(name, symbol) in BOLD_SYMBOLS {
            registry.macro_template(
                name,
                MacroTemplate::new(&format!(r"\boldsymbol{{\{symbol}}}"), 0),
            );
        }
        for &(name, code) in UNICODE_SYMBOLS {
            registry.macro_template(name, MacroTemplate::new(&format!(r"\unicode{{x{code}}}"), 0));
        }
        for &(name, body, arity) in MACROS {
            registry.macro_template(name, MacroTemplate::new(body, arity));
        }

        registry.command(
            "overparen",
            Handler::UnderOver {
                text: "\u{23DC}",
                over: true,
                accent: false,
                stack: false,
            },
        );
        registry.command(
            "underparen",
            Handler::UnderOver {
                text: "\u{23DD}",
                over: false,
                accent: false,
                stack: false,
            },
        );
        registry.command("scases", Handler::Matrix(&SCASES));
        registry.command("ssi", Handler::SetFont(Font::SansSerifItalic));
        registry.command("ssb", Handler::SetFont(Font::BoldSansSerif));
        registry.command("sl", Handler::SetFont(Font::Italic));
        registry.command("src", Handler::MathFont(Some(Font::Script)));
        registry.command("noindent", Handler::Spacer(0.));
    }
}

static SCASES: TableStyle = TableStyle {
    open: Some(""),
    close: Some(""),
    columnalign: Some("left left"),
    rowspacing: ".1em",
    cases: true,
    ..TableStyle::MATRIX
};

static DIGIT_NAMES: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

#[rustfmt::skip]
static BOLD_SYMBOLS: &[(&str, &str)] = &[
    ("alphab", "alpha"), ("betab", "beta"), ("gammab", "gamma"), ("deltab", "delta"),
    ("epsilonb", "epsilon"), ("varepsilonb", "varepsilon"), ("zetab", "zeta"),
    ("etab", "eta"), ("thetab", "theta"), ("varthetab", "vartheta"), ("iotab", "iota"),
    ("lambdab", "lambda"), ("mub", "mu"), ("nub", "nu"), ("xib", "xi"), ("pib", "pi"),
    ("varpib", "varpi"), ("rhob", "rho"), ("varrhob", "varrho"), ("sigmab", "sigma"),
    ("varsigmab", "varsigma"), ("taub", "tau"), ("upsilonb", "upsilon"), ("phib", "phi"),
    ("varphib", "varphi"), ("chib", "chi"), ("psib", "psi"), ("omegab", "omega"),
    ("Gammab", "Gamma"), ("boldGamma", "Gamma"), ("Deltab", "Delta"),
    ("Thetab", "Theta"), ("Thetabmit", "Theta"), ("Lambdab", "Lambda"),
    ("Lambdabmit", "Lambda"), ("Xibmit", "Xi"), ("Sigmab", "Sigma"),
    ("Sigmabmit", "Sigma"), ("Upsilonb", "Upsilon"), ("Psib", "Psi"), ("Psibmit", "Psi"),
    ("Omegab", "Omega"), ("sharpb", "sharp"),
];

#[rustfmt::skip]
static UNICODE_SYMBOLS: &[(&str, &str)] = &[
    ("Sha", "0428"), ("sha", "0448"), ("Zhe", "0416"), ("i", "131"), ("boxast", "29C6"),
    ("coloneqq", "2254"), ("circast", "229B"), ("female", "2640"), ("male", "2642"),
    ("hexagon", "2394"), ("leftsquigarrow", "2B33"), ("mapsfrom", "21A4"),
    ("Mapsto", "2907"), ("permil", "2030"), ("realone", "1D7D9"), ("mathL", "141"),
    ("mathl", "142"), ("L", "141"), ("l", "142"), ("ss", "DF"), ("O", "D8"),
    ("textbackslash", "5C"), ("textcent", "A2"), ("textcurrency", "A4"),
    ("textdegree", "B0"), ("textdollar", "24"), ("textexclamdown", "A1"),
    ("textless", "3C"), ("textgreater", "3E"), ("textlbrackdbl", "27E6"),
    ("textrbrackdbl", "27E7"), ("textnumero", "2116"), ("textperthousand", "2030"),
    ("textquestiondown", "BF"), ("textquotedbl", "22"), ("textquotedblleft", "201C"),
    ("textquotedblright", "201D"), ("textregistered", "AE"), ("textyen", "A5"),
    ("cent", "A2"), ("copyright", "A9"), ("complex", "2102"), ("complexs", "2102"),
    ("cupdot", "228D"), ("hellip", "2026"), ("lddots", "22F0"), ("ldquo", "201C"),
    ("lq", "2018"), ("minus", "2212"), ("ndash", "2212"), ("slash", "2215"),
    ("squaredot", "22A1"), ("sun", "263C"), ("thorn", "FE"), ("th", "FE"),
    ("baracc", "207B"), ("llbracket", "27E6"), ("rrbracket", "27E7"),
    ("blackdiamond", "2666"), ("blackslug", "25AE"), ("boxbox", "29C8"),
    ("boxslash", "29C4"), ("frbox", "2610"), ("rms", "24C7"), ("backcong", "224C"),
    ("textschwa", "259"), ("upalpha", "3B1"), ("upbeta", "3B2"), ("upgamma", "3B3"),
    ("updelta", "3B4"), ("upepsilon", "3F5"), ("upzeta", "3B6"), ("upeta", "3B7"),
    ("uptheta", "3B8"), ("upiota", "3B9"), ("upkappa", "3BA"), ("uplambda", "3BB"),
    ("upmu", "3BC"), ("upnu", "3BD"), ("upxi", "3BE"), ("uppi", "3C0"), ("uprho", "3C1"),
    ("upsigma", "3C3"), ("uptau", "3C4"), ("upupsilon", "28A"), ("upphi", "3C6"),
    ("upchi", "3C7"), ("uppsi", "3C8"), ("upomega", "3C9"),
];

#[rustfmt::skip]
static MACROS: &[(&str, &str, u8)] = &[
    ("eqno", r"\tag*{$#1$}", 1),
    ("bb", r"\mathbb", 0),
    ("BB", r"\mathbb", 0),
    ("mathds", r"\mathbb{#1}", 1),
    ("bold", r"{\bf{#1}}", 1),
    ("mathbi", r"\boldsymbol", 0),
    ("mbi", r"\boldsymbol", 0),
    ("schmi", r"\boldsymbol", 0),
    ("bmit", r"\boldsymbol", 0),
    ("mmb", r"{\boldsymbol #1}", 1),
    ("ssr", r"\sf", 0),
    ("Fraktur", r"{\frak #1}", 1),
    ("fraktur", r"{\frak #1}", 1),
    ("Alpha", r"{\rm A}", 0),
    ("Beta", r"{\rm B}", 0),
    ("Epsilon", r"{\rm E}", 0),
    ("Kappa", r"{\rm K}", 0),
    ("thetahatb", r"\boldsymbol{\hat{\theta}}", 0),
    ("mathacute", r"\acute", 0),
    ("mathbreve", r"\breve", 0),
    ("mathcheck", r"\check", 0),
    ("mathdot", r"\dot", 0),
    ("mathddot", r"\ddot", 0),
    ("mathhat", r"\hat", 0),
    ("mathtilde", r"\tilde", 0),
    ("REALE", r"{\rm I\kern-.20em E}", 0),
    ("REALK", r"{\rm I\kern-.20em K}", 0),
    ("REALN", r"{\rm I\kern-.20em N}", 0),
    ("REALP", r"{\rm I\kern-.20em P}", 0),
    ("REALR", r"{\rm I\kern-.20em R}", 0),
    ("REALT", r"{\rm I\kern-.40em T}", 0),
    ("binary", r"{\rm I\kern -0.17em B}", 0),
    ("hilbert", r"{\rm I\kern -0.15em H}", 0),
    ("posinteger", r"{\rm I\kern -0.13em N}", 0),
    ("blackbox", r"\blacksquare", 0),
    ("blacksquarebox", r"\blacksquare", 0),
    ("blacktriangleup", r"\blacktriangle", 0),
    ("boxaround", r"{\boxed{#1}}", 1),
    ("boxwrap", r"{\boxed{#1}}", 1),
    ("boxed", r"{\fbox{$#1$}}", 1),
    ("dag", r"\dagger", 0),
    ("ddag", r"\ddagger", 0),
    ("de", r"\buildrel \Delta \over = ", 0),
    ("lhook", r"\hookrightarrow", 0),
    ("rhook", r"\hookleftarrow", 0),
    ("reallongarrow", r"\longrightarrow", 0),
    ("nsubset", r"\not\subset", 0),
    ("nsubseteq", r"\not\subseteq", 0),
    ("subsquare", r"{\scriptscriptstyle\square}", 0),
    ("squarebox", r"{\square}", 0),
    ("tr", r"\mathop{\rm tr}", 0),
    ("wedgie", r"{\raise2pt\scriptstyle\wedge}", 0),
    ("indent", r"\qquad", 0),
    ("wideparen", r"\overparen", 0),
    ("break", "", 0),
    ("null", "", 0),
    ("relax", "", 0),
    ("thickspace", r"{\;}", 0),
    ("operatornamewithlimits", r"\mathop{#1}", 1),
    ("sc", r"\scriptsize{#1}\normalsize", 1),
    ("textsc", r"\scriptsize{#1}\normalsize", 1),
    ("texttt", r"{\tt\text{#1}}", 1),
    ("bla", r"\buildrel \longrightarrow \over {#1}", 1),
    ("bra", r"\buildrel \longleftarrow \over {#1}", 1),
    ("ula", r"\buildrel{#1}\over{\leftarrow}", 1),
    ("ura", r"\buildrel{#1}\over{\rightarrow}", 1),
    ("dddots", r"\mathop{#1}\limits^{\scriptstyle\ldots}", 1),
    ("doubleint", r"\iint_{#1}", 1),
    ("enskip", r"\enspace #1\enspace", 1),
    ("joinrel", r"{\mathrel{\mkern-3.5pt} #1}", 1),
    ("relbar", r"{\mathrel{-}}", 0),
    ("harp", r"\buildrel \scriptstyle\rightharpoonup \over #1", 1),
    ("lilrvec", r"\mathop{#1}\limits^{\scriptstyle\leftrightarrow}", 1),
    ("lrvec", r"\mathop{#1}\limits^{\leftrightarrow}", 1),
    ("stackvec", r"\lilrvec{\lilrvec{#1}}", 1),
    ("overcat", r"\mathop{#1}\limits^{#2}", 2),
    ("underdog", r"\mathop{#1}\limits_{#2}", 2),
    ("quaddot", r"{\ddot{\hskip-2.8pt\ddot{#1}}}", 1),
    ("undertilde", r"{\mathop{#1}\limits_{\unicode{x007E}}}", 1),
    ("underdot", r"{{#1}{\unicode{x0323}}}", 1),
    ("doublegrave", r"{{#1}{\unicode{x030F}}}", 1),
    ("circit", r"\bigcirc \kern-17mu{\scriptstyle{#1}}\hskip4pt", 1),
    ("textcircled", r"\bigcirc \kern-17mu{\scriptstyle{#1}}\hskip4pt", 1),
    ("owedge", r"\bigcirc \kern-1.05em \wedge", 0),
    ("lambdabar", r"\unicode{x207B}\kern -.30em \lambda", 0),
    ("bigsqcap", r"\Large\unicode{x2293}", 0),
    ("oiint", r"{\LARGE{\unicode{x222F}}}", 0),
    ("oiiint", r"{\LARGE{\unicode{x2230}}}", 0),
    ("ZED", r"\sf{Z}\hskip-4pt\sf{Z}", 0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Descriptor, MacroToken};

    fn template<'r>(registry: &'r Registry, name: &str) -> &'r MacroTemplate {
        match registry.lookup(name) {
            Some(Descriptor::Macro(template)) => template,
            other => panic!("{name} is not a macro: {other:?}"),
        }
    }

    #[test]
    fn generated_macros() {
        let mut registry = Registry::new();
        IeeeMacros.register(&mut registry);
        assert_eq!(
            template(&registry, "circZ").body,
            MacroTemplate::new(r"\unicode{x24CF}", 0).body
        );
        assert_eq!(
            template(&registry, "circnine").body,
            MacroTemplate::new(r"\unicode{x2468}", 0).body
        );
        assert_eq!(
            template(&registry, "BBR").body.first(),
            Some(&MacroToken::BeginGroup)
        );
        assert_eq!(
            template(&registry, "alphab").body,
            MacroTemplate::new(r"\boldsymbol{\alpha}", 0).body
        );
    }

    #[test]
    fn arities() {
        let mut registry = Registry::new();
        IeeeMacros.register(&mut registry);
        assert_eq!(template(&registry, "overcat").arity, 2);
        assert_eq!(template(&registry, "eqno").arity, 1);
        assert!(template(&registry, "null").body.is_empty());
    }
}
