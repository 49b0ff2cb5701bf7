//! The arena user definitions are allocated into.

/// Memory for the macros a document defines with `\def`, `\newcommand` and `\let`.
///
/// Definitions borrow their token sequences from this arena, so a [`Storage`] must outlive
/// the [`Parser`](super::Parser) using it. Nothing is allocated for documents that define
/// no macros.
///
/// ```
/// use texmml::{Configuration, Parser, Storage};
///
/// let config = Configuration::default();
/// let mut storage = Storage::new();
/// for input in [r"\def\x{y}\x", r"\newcommand{\z}[1]{#1}\z a"] {
///     let document = Parser::new(input, &config, &storage).parse();
///     assert!(!document.is_error());
///     storage.reset();
/// }
/// ```
#[derive(Default)]
pub struct Storage(pub(super) bumpalo::Bump);

impl Storage {
    pub fn new() -> Self {
        Default::default()
    }

    /// Free every definition made by previous parses, keeping the memory for the next one.
    pub fn reset(&mut self) {
        self.0.reset();
    }
}
