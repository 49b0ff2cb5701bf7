use std::{io::Write, path::Path, sync::Mutex};

use heck::ToTitleCase;
use inventory::collect;
use libtest_mimic::{Arguments, Conclusion, Failed, Trial};
use texmml::{push_mathml, Configuration, RenderConfig};

static RENDERED: Mutex<Vec<(&str, &str, String)>> = Mutex::new(Vec::new());
pub const OUTPUT_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/docs/test-output/");

pub struct TestCase {
    pub name: &'static str,
    pub test: fn() -> Result<(), Failed>,
}
collect!(TestCase);

pub fn test() -> Conclusion {
    let args = Arguments::from_args();
    let tests = inventory::iter::<TestCase>
        .into_iter()
        .map(|TestCase { name, test }| Trial::test(*name, test))
        .collect::<Vec<_>>();
    libtest_mimic::run(&args, tests)
}

/// Parse `input` and compare the content of the `math` element with `expected`.
pub fn round_trip(
    name: &'static str,
    input: &'static str,
    expected: &str,
    config: &Configuration,
) -> Result<(), Failed> {
    let document = texmml::parse(input, config);
    let mut output = String::new();
    push_mathml(&mut output, &document, RenderConfig::default());

    let display = if config.parser.display {
        "block"
    } else {
        "inline"
    };
    let expected = format!(r#"<math display="{display}">{expected}</math>"#);
    if output != expected {
        if let Some(error) = &document.hints.error {
            eprintln!("{error}");
        }
        return Err(format!("input: {input}\n  expected: {expected}\n     found: {output}").into());
    }

    RENDERED.lock().unwrap().push((name, input, output));
    Ok(())
}

/// Write every rendered case into an HTML table, when the `RENDER` variable is `true`.
pub fn output(file_name: &str) -> std::io::Result<()> {
    if std::env::var("RENDER").as_deref() != Ok("true") {
        return Ok(());
    }
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut file = std::fs::File::create(Path::new(OUTPUT_DIR).join(file_name))?;

    let title = file_name.split_once('.').map_or(file_name, |(stem, _)| stem);
    write!(
        file,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<table style="max-width: 60vw; margin: auto;">"#,
        title = title.to_title_case()
    )?;

    let mut rendered = RENDERED.lock().unwrap();
    rendered.sort();
    for (name, input, output) in rendered.iter() {
        write!(
            file,
            r#"<tr><th>{name}</th><td><code>{input}</code></td><td>{output}</td></tr>"#,
            name = name.to_title_case(),
        )?;
    }

    write!(
        file,
        r#"</table>
</body>
</html>"#
    )
}

#[macro_export]
macro_rules! round_trip {
    ($name:ident, $input:literal, $expected:expr, config = $config:expr $(,)?) => {
        pub fn $name() -> Result<(), libtest_mimic::Failed> {
            let config: texmml::Configuration = $config;
            $crate::common::round_trip(stringify!($name), $input, $expected, &config)
        }

        inventory::submit! {
            $crate::common::TestCase {
                name: stringify!($name),
                test: $name
            }
        }
    };
    ($name:ident, $input:literal, $expected:expr $(,)?) => {
        $crate::round_trip!(
            $name,
            $input,
            $expected,
            config = texmml::Configuration::default()
        );
    };
}
