//! This crate parses `LaTeX` math markup into a tree of `MathML` nodes carrying TeX spacing
//! classes, and serializes that tree through the [`mathml`] module.
//!
//! Malformed input never fails the parse: the resulting [`Document`] holds a single `merror`
//! node with the diagnostic, which is also available as [`Hints::error`].
//!
//! ```
//! use texmml::{mathml, Configuration, RenderConfig};
//!
//! let config = Configuration::default();
//! let document = texmml::parse(r"x^2", &config);
//! let mut out = String::new();
//! mathml::push_mathml(&mut out, &document, RenderConfig::default());
//! assert_eq!(out, r#"<math display="block"><msup><mi>x</mi><mn>2</mn></msup></math>"#);
//! ```

pub mod attribute;
pub mod config;
pub(crate) mod filter;
pub mod mathml;
pub mod node;
pub mod packages;
pub mod parser;
pub mod registry;

#[doc(inline)]
pub use config::{Configuration, ConfigurationBuilder, OptionValue, ParserConfig, RenderConfig};
#[doc(inline)]
pub use mathml::{push_mathml, write_mathml};
#[doc(inline)]
pub use node::{Attributes, Document, Hints, Node, NodeKind, Span, TexClass};
#[doc(inline)]
pub use parser::{ErrorCategory, Parser, ParserError, Storage};

/// Parse `input` with a fresh [`Storage`].
pub fn parse(input: &str, config: &Configuration) -> Document {
    let storage = Storage::new();
    Parser::new(input, config, &storage).parse()
}
