use texmml::{push_mathml, Configuration, Parser, RenderConfig, Storage};

static LATEX: &str = r#"
\forall \epsilon > 0, \exists \delta > 0,
\forall x \in \mathbb{R} \qquad |x - c| < \delta \implies |f(x) - L| < \epsilon.
"#;

fn main() -> anyhow::Result<()> {
    let config = Configuration::default();
    let storage = Storage::new();
    let document = Parser::new(LATEX, &config, &storage).parse();
    if let Some(error) = &document.hints.error {
        eprintln!("{error}");
    }

    let mut mathml = String::new();
    push_mathml(&mut mathml, &document, RenderConfig::default());
    println!("{mathml}");

    let stdout = std::io::stdout().lock();
    texmml::write_mathml(
        stdout,
        &document,
        RenderConfig {
            xml: true,
            annotate: true,
            ..RenderConfig::default()
        },
    )?;
    println!();
    Ok(())
}
