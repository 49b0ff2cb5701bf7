//! Configuration of the parser and the MathML renderer.
//!
//! A [`Configuration`] bundles the command registry, filled by packages, with the options
//! that drive parsing. It is built once with a [`ConfigurationBuilder`] and then shared by
//! reference between any number of parses, possibly on several threads.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    packages::Base,
    registry::{Descriptor, Handler, MacroTemplate, Package, Registry},
};

lazy_static! {
    static ref DIGITS: Regex =
        Regex::new(r"^(?:[0-9]+(?:\{,\}[0-9]{3})*(?:\.[0-9]*)?|\.[0-9]+)")
            .expect("the default digit pattern is valid");
    static ref EUROPEAN_DIGITS: Regex =
        Regex::new(r"^(?:[0-9]+(?:\{\.\}[0-9]{3})*(?:,[0-9]*)?|,[0-9]+)")
            .expect("the european digit pattern is valid");
}

/// The value of a package option.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_owned())
    }
}

/// Options that drive the parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Matches a number at the start of the remaining input.
    ///
    /// Braced separators such as `{,}` are stripped of their braces in the output.
    pub digits: Regex,
    /// If set, letter runs matching this pattern become a single `mi`.
    pub identifier_pattern: Option<Regex>,
    /// If true, the math is in display style: large operators are large and `\choose`
    /// delimiters are sized accordingly. (default: true)
    pub display: bool,
    /// Maximum number of macro expansions in a single parse. (default: 10000)
    pub max_macros: usize,
    /// Maximum number of tokens waiting in the expansion buffer. (default: 5120)
    pub max_buffer: usize,
    /// Maximum number of nested structures open at once. (default: 256)
    pub max_nesting: usize,
    /// Package options, keyed `"<package>.<option>"`.
    pub options: IndexMap<String, OptionValue>,
}

impl ParserConfig {
    /// The default options, with `,` as a thousands separator and `.` as decimal point.
    pub fn new() -> Self {
        Self {
            digits: DIGITS.clone(),
            identifier_pattern: None,
            display: true,
            max_macros: 10000,
            max_buffer: 5 * 1024,
            max_nesting: 256,
            options: IndexMap::new(),
        }
    }

    /// Options with `,` as decimal point and `.` as a thousands separator.
    pub fn european() -> Self {
        Self {
            digits: EUROPEAN_DIGITS.clone(),
            ..Self::new()
        }
    }

    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Options of the MathML renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// If true, every element built from markup carries a `data-latex` attribute with the
    /// markup it came from. (default: false)
    pub annotate: bool,
    /// If true, the `math` element carries the MathML namespace. (default: false)
    pub xml: bool,
    /// Overrides the display mode the document was parsed with.
    pub display: Option<bool>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            annotate: false,
            xml: false,
            display: None,
        }
    }
}

/// Everything a parse needs besides its input.
///
/// ```
/// use texmml::{packages::Bbm, Configuration};
///
/// let config = Configuration::builder().package(Bbm).build();
/// let document = texmml::parse(r"\mathbbm{1}", &config);
/// assert!(!document.is_error());
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) registry: Registry,
    pub parser: ParserConfig,
}

impl Configuration {
    /// Start from the base grammar and the default options.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn option_bool(&self, key: &str) -> bool {
        self.parser
            .option(key)
            .and_then(OptionValue::as_bool)
            .unwrap_or(false)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        ConfigurationBuilder::new().build()
    }
}

/// Builds a [`Configuration`].
///
/// The base package is always registered first.
pub struct ConfigurationBuilder {
    registry: Registry,
    parser: ParserConfig,
    overrides: Vec<(String, OptionValue)>,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            registry: Registry::new(),
            parser: ParserConfig::new(),
            overrides: Vec::new(),
        };
        builder.load(&Base);
        builder
    }

    fn load(&mut self, package: &dyn Package) {
        package.register(&mut self.registry);
        for (key, value) in package.options() {
            self.parser
                .options
                .insert(format!("{}.{}", package.name(), key), value.clone());
        }
    }

    /// Register a package. Its commands replace existing ones with the same name.
    pub fn package(mut self, package: impl Package) -> Self {
        self.load(&package);
        self
    }

    /// Set an option, e.g. `option("bbm.bold", true)`. Applied after every package has
    /// declared its defaults.
    pub fn option(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.overrides.push((key.to_owned(), value.into()));
        self
    }

    /// Replace the parser options. Package options are kept.
    pub fn parser_config(mut self, config: ParserConfig) -> Self {
        let options = std::mem::take(&mut self.parser.options);
        self.parser = config;
        self.parser.options.extend(options);
        self
    }

    pub fn register_command(mut self, name: &str, handler: Handler) -> Self {
        self.registry.command(name, handler);
        self
    }

    /// Register a macro given its body and number of arguments.
    pub fn register_macro(mut self, name: &str, body: &str, arity: u8) -> Self {
        self.registry
            .macro_template(name, MacroTemplate::new(body, arity));
        self
    }

    pub fn register_environment(mut self, name: &str, handler: Handler) -> Self {
        self.registry
            .environment(name, Descriptor::Builtin(handler));
        self
    }

    pub fn build(mut self) -> Configuration {
        for (key, value) in self.overrides.drain(..) {
            self.parser.options.insert(key, value);
        }
        Configuration {
            registry: self.registry,
            parser: self.parser,
        }
    }
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
