use texmml::{push_mathml, Configuration, ErrorCategory, Parser, RenderConfig, Storage};

macro_rules! should_error {
    ($name:ident, $category:ident, $($input:literal => $message:literal),+ $(,)?) => {
        #[test]
        pub fn $name() {
            let config = Configuration::default();
            let mut storage = Storage::new();
            for (input, message) in [$(($input, $message)),+] {
                let result = Parser::new(input, &config, &storage).try_parse();
                let error = result.expect_err(input);
                assert_eq!(error.message(), message, "input: {input}");
                assert_eq!(error.category(), ErrorCategory::$category, "input: {input}");
                storage.reset();
            }
        }
    };
}

should_error! {
    double_scripts,
    Structural,
    r"x^2^3" => "Double exponent: use braces to clarify",
    r"\sum^2^3" => "Double exponent: use braces to clarify",
    r"x_2_3" => "Double subscripts: use braces to clarify",
    r"\sum_2_3" => "Double subscripts: use braces to clarify",
    r"x^\prime'" => "Prime causes double exponent: use braces to clarify",
}

should_error! {
    unbraced_scripts,
    Arity,
    r"x'^'" => "Missing open brace for superscript",
    r"x^^" => "Missing open brace for superscript",
    r"x__" => "Missing open brace for subscript",
    r"x^" => "Missing superscript or subscript argument",
    r"x_" => "Missing superscript or subscript argument",
}

should_error! {
    unbalanced_delimiters,
    Structural,
    r"\left(\middle|" => r"Extra \left or missing \right",
    r"\middle|" => r"Extra \middle",
    r"\middle|\right)" => r"Extra \middle",
    r"x\right\}" => r"Missing \left or extra \right",
    r"\left\{x" => r"Extra \left or missing \right",
}

should_error! {
    unbalanced_braces,
    Lexical,
    "x}" => "Extra close brace or missing open brace",
    "{x" => "Extra open brace or missing close brace",
    r"\sqrt{" => "Missing close brace",
    r"\sqrt}" => "Extra close brace or missing open brace",
    r"\sqrt[3}" => "Extra close brace while looking for ']'",
    r"\sqrt[3{x}" => r"Could not find closing ']' for argument to \sqrt",
}

should_error! {
    misplaced_tokens,
    Structural,
    "&" => "Misplaced &",
    r"a\cr b" => r"Misplaced \cr",
    r"\hline" => r"Misplaced \hline",
    r"a\hfill b" => r"Unsupported use of \hfill",
    r"1 \over 2 \over 3" => r"Ambiguous use of \over",
    r"+\limits^2" => r"\limits is allowed only on operators",
}

should_error! {
    macro_parameter_outside_definition,
    Lexical,
    "#" => "You can't use 'macro parameter character #' in math mode",
}

should_error! {
    undefined_references,
    UndefinedReference,
    r"\nonsense" => r"Undefined control sequence \nonsense",
    r"\operatorname{xyz}" => r"Undefined control sequence \operatorname",
    r"\begin{nonsense} a \end{nonsense}" => "Unknown environment 'nonsense'",
}

should_error! {
    missing_arguments,
    Arity,
    r"\frac{b}" => r"Missing argument for \frac",
    r"\sqrt" => r"Missing argument for \sqrt",
    r"\matrix" => r"Missing argument for \matrix",
    r"\root {3] \of 5" => r"Could not find \of for \root",
    r"\left\alpha b" => r"Missing or unrecognized delimiter for \left",
    r"\rule{}" => r"Missing dimension or its units for \rule",
    r"\raise{2pt}" => r"Missing box for \raise",
}

should_error! {
    environments,
    Structural,
    r"\end{array}" => r"Missing \begin{array} or extra \end{array}",
    r"\begin{equation}a\end{array}" => r"\begin{equation} ended with \end{array}",
    r"\begin{equation}a" => r"Missing \end{equation}",
    r"\begin{equation}\begin{eqnarray}\end{eqnarray}\end{equation}" => "Erroneous nesting of equation structures",
    r"\cases{b & l & k}" => r"Extra alignment tab in \cases text",
}

should_error! {
    hand_built_tokens,
    Configuration,
    r"\mmlToken{mk}[]{}" => "mk is not a token element",
    r"\mmlToken{mi}[m1=true]{}" => "Invalid MathML attribute: m1=true",
    r#"\mmlToken{mo}[nothing="something"]{}"# => "nothing is not a recognized attribute for mo",
}

should_error! {
    runaway_definitions,
    RecursionLimit,
    r"\def\x{\x}\x" => "Maximum macro substitution count exceeded; is there a recursive macro call?",
}

#[test]
fn errors_render_inline() {
    let config = Configuration::default();
    let storage = Storage::new();
    let document = Parser::new(r"\errors \should \render", &config, &storage).parse();
    assert!(document.is_error());

    let mut out = String::new();
    push_mathml(&mut out, &document, RenderConfig::default());
    assert_eq!(
        out,
        concat!(
            r#"<math display="block"><merror data-mjx-error="Undefined control sequence \errors">"#,
            r#"<mtext>Undefined control sequence \errors</mtext></merror></math>"#
        )
    );
}

#[test]
fn error_context() {
    let config = Configuration::default();
    let storage = Storage::new();
    let error = Parser::new(r"a + b \nonsense c", &config, &storage)
        .try_parse()
        .unwrap_err();
    assert_eq!(error.span().start, 6);
    assert!(error.context().contains(r"\nonsense"));
    assert!(error.to_string().starts_with("parsing error: Undefined control sequence"));
}

#[test]
fn unterminated_comment() {
    let config = Configuration::default();
    let storage = Storage::new();
    let document = Parser::new("{%", &config, &storage).parse();
    assert_eq!(
        document.hints.error.map(|error| error.message()),
        Some(String::from("Extra open brace or missing close brace"))
    );
}
