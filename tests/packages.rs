use texmml::{
    packages::{Bbm, IeeeMacros},
    Configuration,
};

mod common;

fn main() {
    let conclusion = common::test();
    common::output("packages.html").unwrap();
    conclusion.exit();
}

fn bbm() -> Configuration {
    Configuration::builder().package(Bbm).build()
}

fn ieee() -> Configuration {
    Configuration::builder().package(IeeeMacros).build()
}

round_trip!(
    blackboard_digit,
    r"\mathbbm{1}",
    r#"<mrow data-mjx-texclass="ORD"><mn data-mjx-variant="-bbm-normal" mathvariant="double-struck">1</mn></mrow>"#,
    config = bbm()
);
round_trip!(
    blackboard_monospace,
    r"\mathbbmtt{k}",
    r#"<mrow data-mjx-texclass="ORD"><mi data-mjx-variant="-bbm-monospace" mathvariant="double-struck">k</mi></mrow>"#,
    config = bbm()
);
round_trip!(
    bold_math_version,
    r"\mathversion{bold}\mathbbm{1}",
    r#"<mrow data-mjx-texclass="ORD"><mn data-mjx-variant="-bbm-bold" mathvariant="double-struck">1</mn></mrow>"#,
    config = bbm()
);
round_trip!(
    normal_math_version,
    r"\mathversion{normal}\mathbbmss{A}",
    r#"<mrow data-mjx-texclass="ORD"><mi data-mjx-variant="-bbm-sans-serif" mathvariant="double-struck">A</mi></mrow>"#,
    config = Configuration::builder()
        .package(Bbm)
        .option("bbm.bold", true)
        .build()
);
round_trip!(
    bold_option,
    r"\mathbbmss{A}",
    r#"<mrow data-mjx-texclass="ORD"><mi data-mjx-variant="-bbm-sans-serif-bold" mathvariant="double-struck">A</mi></mrow>"#,
    config = Configuration::builder()
        .package(Bbm)
        .option("bbm.bold", true)
        .build()
);
round_trip!(
    blackboard_needs_package,
    r"\mathbbm{1}",
    concat!(
        r#"<merror data-mjx-error="Undefined control sequence \mathbbm">"#,
        r#"<mtext>Undefined control sequence \mathbbm</mtext></merror>"#
    )
);

round_trip!(
    blackboard_letter_macro,
    r"\BBR",
    r#"<mrow data-mjx-texclass="ORD"><mi mathvariant="double-struck">R</mi></mrow>"#,
    config = ieee()
);
round_trip!(circled_letter, r"\circA", "<mtext>&#x24B6;</mtext>", config = ieee());
round_trip!(circled_digit, r"\circtwo", "<mtext>&#x2461;</mtext>", config = ieee());
round_trip!(
    roman_trace,
    r"\tr x",
    r#"<mi data-mjx-texclass="OP" mathvariant="normal">tr</mi><mo data-mjx-texclass="NONE">&#x2061;</mo><mi>x</mi>"#,
    config = ieee()
);
round_trip!(empty_macros, r"a\relax\null b", "<mi>a</mi><mi>b</mi>", config = ieee());
