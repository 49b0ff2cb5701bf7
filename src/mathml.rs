//! Serialization of a [`Document`] to MathML markup.
//!
//! Output is plain ASCII: characters outside of it are written as hexadecimal character
//! references, e.g. `&#x2192;`. The explicit class of a node comes first among its
//! attributes, as `data-mjx-texclass`.
use std::io;

use crate::{
    config::RenderConfig,
    node::{Document, Node, NodeKind},
};

const NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

struct MathmlWriter<'d, W> {
    document: &'d Document,
    writer: W,
    config: RenderConfig,
}

impl<'d, W> MathmlWriter<'d, W>
where
    W: io::Write,
{
    fn new(document: &'d Document, writer: W, config: RenderConfig) -> Self {
        Self {
            document,
            writer,
            config,
        }
    }

    fn write(mut self) -> io::Result<()> {
        let root = &self.document.root;
        if root.kind != NodeKind::Math {
            return self.write_node(root);
        }
        self.writer.write_all(b"<math")?;
        if self.config.xml {
            write!(self.writer, " xmlns=\"{NAMESPACE}\"")?;
        }
        for (name, value) in &root.attributes {
            let value = match (name.as_str(), self.config.display) {
                ("display", Some(true)) => "block",
                ("display", Some(false)) => "inline",
                _ => value.as_str(),
            };
            self.write_attribute(name, value)?;
        }
        if self.config.annotate && !root.span.is_empty() {
            let document = self.document;
            self.write_attribute("data-latex", document.source_of(root))?;
        }
        self.writer.write_all(b">")?;
        for child in &root.children {
            self.write_node(child)?;
        }
        self.writer.write_all(b"</math>")
    }

    fn write_node(&mut self, node: &Node) -> io::Result<()> {
        let tag = node.kind.tag();
        write!(self.writer, "<{tag}")?;
        if let Some(class) = node.texclass {
            self.write_attribute("data-mjx-texclass", class.as_str())?;
        }
        for (name, value) in &node.attributes {
            self.write_attribute(name, value)?;
        }
        if self.config.annotate && !node.span.is_empty() {
            let document = self.document;
            self.write_attribute("data-latex", document.source_of(node))?;
        }
        self.writer.write_all(b">")?;
        if node.kind.is_token() {
            self.write_escaped(&node.text)?;
        } else {
            for child in &node.children {
                self.write_node(child)?;
            }
        }
        write!(self.writer, "</{tag}>")
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> io::Result<()> {
        write!(self.writer, " {name}=\"")?;
        self.write_escaped(value)?;
        self.writer.write_all(b"\"")
    }

    fn write_escaped(&mut self, text: &str) -> io::Result<()> {
        for c in text.chars() {
            match c {
                '&' => self.writer.write_all(b"&amp;")?,
                '<' => self.writer.write_all(b"&lt;")?,
                '>' => self.writer.write_all(b"&gt;")?,
                '"' => self.writer.write_all(b"&quot;")?,
                c if c.is_ascii() => self.writer.write_all(&[c as u8])?,
                c => write!(self.writer, "&#x{:X};", c as u32)?,
            }
        }
        Ok(())
    }
}

/// Append the MathML of `document` to `string`.
pub fn push_mathml(string: &mut String, document: &Document, config: RenderConfig) {
    let mut buffer = Vec::new();
    // Writing to a `Vec` cannot fail.
    if MathmlWriter::new(document, &mut buffer, config).write().is_ok() {
        string.push_str(&String::from_utf8_lossy(&buffer));
    }
}

/// Write the MathML of `document` to `writer`.
///
/// The writer is not buffered; wrap it in a [`BufWriter`](std::io::BufWriter) when it
/// performs a system call on each write.
pub fn write_mathml<W>(writer: W, document: &Document, config: RenderConfig) -> io::Result<()>
where
    W: io::Write,
{
    MathmlWriter::new(document, writer, config).write()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{parse, Configuration};

    fn render(input: &str, config: RenderConfig) -> String {
        let document = parse(input, &Configuration::default());
        let mut out = String::new();
        push_mathml(&mut out, &document, config);
        out
    }

    #[test]
    fn escapes() {
        assert_eq!(
            render("a<<b", RenderConfig::default()),
            r#"<math display="block"><mi>a</mi><mo>&lt;&lt;</mo><mi>b</mi></math>"#
        );
        assert_eq!(
            render(r"\alpha", RenderConfig::default()),
            r#"<math display="block"><mi>&#x3B1;</mi></math>"#
        );
    }

    #[test]
    fn class_comes_first() {
        assert_eq!(
            render(r"\left(\right)", RenderConfig::default()),
            concat!(
                r#"<math display="block"><mrow data-mjx-texclass="INNER">"#,
                r#"<mo data-mjx-texclass="OPEN">(</mo><mo data-mjx-texclass="CLOSE">)</mo>"#,
                r#"</mrow></math>"#
            )
        );
    }

    #[test]
    fn errors() {
        assert_eq!(
            render("&", RenderConfig::default()),
            concat!(
                r#"<math display="block"><merror data-mjx-error="Misplaced &amp;">"#,
                r#"<mtext>Misplaced &amp;</mtext></merror></math>"#
            )
        );
    }

    #[test]
    fn render_options() {
        let config = RenderConfig {
            xml: true,
            display: Some(false),
            ..RenderConfig::default()
        };
        assert_eq!(
            render("x", config),
            r#"<math xmlns="http://www.w3.org/1998/Math/MathML" display="inline"><mi>x</mi></math>"#
        );
        let config = RenderConfig {
            annotate: true,
            ..RenderConfig::default()
        };
        assert_eq!(
            render("x+1", config),
            concat!(
                r#"<math display="block" data-latex="x+1"><mi data-latex="x">x</mi>"#,
                r#"<mo data-latex="+">+</mo><mn data-latex="1">1</mn></math>"#
            )
        );
    }

    #[test]
    fn io_writer() {
        let document = parse("y", &Configuration::default());
        let mut out = Vec::new();
        write_mathml(&mut out, &document, RenderConfig::default()).unwrap();
        assert_eq!(out, br#"<math display="block"><mi>y</mi></math>"#);
    }
}
