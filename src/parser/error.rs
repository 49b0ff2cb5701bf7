//! Error type returned by the parser upon failure.
//!
//! Every failure is turned into a [`ParserError`] carrying the diagnostic message, the byte
//! span of the offending markup and a snippet of the input around it. The parser never
//! panics on malformed input: the error ends up as the single `merror` node of the output.
use std::{error::Error, fmt::Display};
use thiserror::Error;

use crate::node::Span;

/// Anything that could possibly go wrong while parsing.
///
/// [`Parser::parse`](crate::Parser::parse) renders it as an inline error node and keeps it
/// in the document hints, while [`Parser::try_parse`](crate::Parser::try_parse) returns it
/// directly.
#[derive(Debug, Clone)]
pub struct ParserError {
    inner: Box<Inner>,
}

#[derive(Debug, Clone)]
struct Inner {
    error: ErrorKind,
    span: Span,
    context: Box<str>,
}

/// The family a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unterminated groups, stray special characters.
    Lexical,
    /// Unknown commands and environments.
    UndefinedReference,
    /// Missing or malformed arguments.
    Arity,
    /// Double scripts, unbalanced delimiters, misplaced alignment tokens.
    Structural,
    /// Invalid attributes when building a node by hand.
    Configuration,
    /// Runaway macro expansion or nesting.
    RecursionLimit,
}

impl ParserError {
    pub(crate) fn new(error: ErrorKind, span: Span, input: &str) -> Self {
        const CONTEXT_SIZE: usize = 12;
        const CONTEXT_PREFIX: &str = "context: ";

        let start = span.start.min(input.len());
        let lower_bound = floor_char_boundary(input, start.saturating_sub(CONTEXT_SIZE));
        let upper_bound = floor_char_boundary(input, span.end.max(start) + CONTEXT_SIZE);

        let mut context = String::from(CONTEXT_PREFIX);
        context.push_str(&input[lower_bound..upper_bound]);
        context.push('\n');
        let caret_offset =
            CONTEXT_PREFIX.len() + input[lower_bound..floor_char_boundary(input, start)].chars().count();
        context.extend(std::iter::repeat(' ').take(caret_offset));
        context.push('^');
        context.shrink_to_fit();

        Self {
            inner: Box::new(Inner {
                error,
                span,
                context: context.into_boxed_str(),
            }),
        }
    }

    /// The user-visible diagnostic, e.g. `Misplaced &`.
    pub fn message(&self) -> String {
        self.inner.error.to_string()
    }

    /// Where in the input the error was detected.
    ///
    /// Errors raised inside a macro expansion point at the macro call.
    pub fn span(&self) -> Span {
        self.inner.span
    }

    pub fn category(&self) -> ErrorCategory {
        self.inner.error.category()
    }

    /// The input surrounding the error, followed by a caret line.
    pub fn context(&self) -> &str {
        &self.inner.context
    }
}

impl PartialEq for ParserError {
    fn eq(&self, other: &Self) -> bool {
        self.inner.error == other.inner.error && self.inner.span == other.inner.span
    }
}

impl Error for ParserError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.inner.error)
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("parsing error: ")?;
        self.inner.error.fmt(f)?;
        f.write_str("\n")?;
        f.write_str(&self.inner.context)?;
        Ok(())
    }
}

pub(crate) type InnerResult<T> = std::result::Result<T, ErrorKind>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    #[error("Misplaced {0}")]
    Misplaced(Box<str>),
    #[error("Missing argument for {0}")]
    MissingArgument(Box<str>),
    #[error("Undefined control sequence {0}")]
    UndefinedControlSequence(Box<str>),
    #[error("Unknown environment '{0}'")]
    UnknownEnvironment(Box<str>),
    #[error("Double exponent: use braces to clarify")]
    DoubleExponent,
    #[error("Double subscripts: use braces to clarify")]
    DoubleSubscripts,
    #[error("{0} is allowed only on operators")]
    LimitsOnNonOperator(Box<str>),
    #[error("Missing open brace for superscript")]
    MissingOpenForSup,
    #[error("Missing open brace for subscript")]
    MissingOpenForSub,
    #[error("Missing superscript or subscript argument")]
    MissingScript,
    #[error("Prime causes double exponent: use braces to clarify")]
    DoubleExponentPrime,
    #[error("You can't use 'macro parameter character #' in math mode")]
    CantUseHash,
    #[error("Extra \\left or missing \\right")]
    ExtraLeftMissingRight,
    #[error("Missing \\left or extra \\right")]
    MissingLeftExtraRight,
    #[error("Extra \\middle")]
    ExtraMiddle,
    #[error("{0} can appear only within a root")]
    MisplacedMoveRoot(Box<str>),
    #[error("Multiple use of {0}")]
    MultipleMoveRoot(Box<str>),
    #[error("The argument to {0} must be an integer")]
    IntegerArgument(Box<str>),
    #[error("Ambiguous use of {0}")]
    AmbiguousUse(Box<str>),
    #[error("{0} is not a token element")]
    NotTokenElement(Box<str>),
    #[error("Invalid MathML attribute: {0}")]
    InvalidAttribute(Box<str>),
    #[error("{0} is not a recognized attribute for {1}")]
    UnknownAttribute(Box<str>, Box<str>),
    #[error("Missing \\begin{{{0}}} or extra \\end{{{0}}}")]
    MissingBeginExtraEnd(Box<str>),
    #[error("Extra close brace or missing open brace")]
    ExtraCloseMissingOpen,
    #[error("Extra open brace or missing close brace")]
    ExtraOpenMissingClose,
    #[error("Bracket argument to {0} must be a dimension")]
    BracketMustBeDimension(Box<str>),
    #[error("Missing close brace")]
    MissingCloseBrace,
    #[error("Extra close brace while looking for {0}")]
    ExtraCloseLooking(Box<str>),
    #[error("Could not find closing ']' for argument to {0}")]
    MissingCloseBracket(Box<str>),
    #[error("Missing or unrecognized delimiter for {0}")]
    MissingOrUnrecognizedDelimiter(Box<str>),
    #[error("Missing dimension or its units for {0}")]
    MissingDimension(Box<str>),
    #[error("Could not find {0} for {1}")]
    TokenNotFound(Box<str>, Box<str>),
    #[error("Erroneous nesting of equation structures")]
    ErroneousNesting,
    #[error("Extra alignment tab in \\cases text")]
    ExtraAlignTab,
    #[error("Unsupported use of {0}")]
    UnsupportedUse(Box<str>),
    #[error("Invalid environment name '{0}'")]
    InvalidEnvironmentName(Box<str>),
    #[error("\\begin{{{0}}} ended with \\end{{{1}}}")]
    EnvironmentBadEnd(Box<str>, Box<str>),
    #[error("Illegal pream-token ({0})")]
    IllegalPreambleToken(Box<str>),
    #[error("Missing box for {0}")]
    MissingBox(Box<str>),
    #[error("Missing \\end{{{0}}}")]
    MissingEnd(Box<str>),
    #[error("Math not terminated in text box")]
    MathNotTerminated,
    #[error("Argument to {0} must be a number")]
    NumberArgument(Box<str>),
    #[error("Multiple {0}")]
    MultipleCommand(Box<str>),
    #[error("Label '{0}' multiply defined")]
    MultipleLabel(Box<str>),
    #[error("{0} must be followed by a control sequence")]
    MissingControlSequence(Box<str>),
    #[error("Illegal control sequence name for {0}")]
    IllegalControlSequenceName(Box<str>),
    #[error("Illegal number of parameters specified in {0}")]
    IllegalParameterCount(Box<str>),
    #[error("Parameters for {0} must be numbered sequentially")]
    SequentialParameters(Box<str>),
    #[error("Illegal macro parameter reference")]
    IllegalParameterReference,
    #[error("Use of {0} doesn't match its definition")]
    MismatchedDefinition(Box<str>),
    #[error("Runaway argument for {0}?")]
    RunawayArgument(Box<str>),
    #[error("Maximum macro substitution count exceeded; is there a recursive macro call?")]
    MaxMacroSubstitutions,
    #[error("Internal buffer size exceeded; is there a recursive macro call?")]
    MaxBufferSize,
    #[error("Maximum nesting depth exceeded")]
    MaxNesting,
}

impl ErrorKind {
    pub(crate) fn category(&self) -> ErrorCategory {
        use ErrorKind as K;
        match self {
            K::ExtraCloseMissingOpen
            | K::ExtraOpenMissingClose
            | K::MissingCloseBrace
            | K::ExtraCloseLooking(_)
            | K::MissingCloseBracket(_)
            | K::CantUseHash
            | K::MathNotTerminated => ErrorCategory::Lexical,
            K::UndefinedControlSequence(_)
            | K::UnknownEnvironment(_)
            | K::InvalidEnvironmentName(_) => ErrorCategory::UndefinedReference,
            K::MissingArgument(_)
            | K::MissingScript
            | K::MissingOpenForSup
            | K::MissingOpenForSub
            | K::MissingBox(_)
            | K::MissingDimension(_)
            | K::MissingOrUnrecognizedDelimiter(_)
            | K::BracketMustBeDimension(_)
            | K::TokenNotFound(..)
            | K::IntegerArgument(_)
            | K::NumberArgument(_)
            | K::MissingControlSequence(_)
            | K::IllegalControlSequenceName(_)
            | K::IllegalParameterCount(_)
            | K::SequentialParameters(_)
            | K::IllegalParameterReference
            | K::MismatchedDefinition(_)
            | K::RunawayArgument(_) => ErrorCategory::Arity,
            K::NotTokenElement(_) | K::InvalidAttribute(_) | K::UnknownAttribute(..) => {
                ErrorCategory::Configuration
            }
            K::MaxMacroSubstitutions | K::MaxBufferSize | K::MaxNesting => {
                ErrorCategory::RecursionLimit
            }
            K::Misplaced(_)
            | K::DoubleExponent
            | K::DoubleSubscripts
            | K::LimitsOnNonOperator(_)
            | K::DoubleExponentPrime
            | K::ExtraLeftMissingRight
            | K::MissingLeftExtraRight
            | K::ExtraMiddle
            | K::MisplacedMoveRoot(_)
            | K::MultipleMoveRoot(_)
            | K::AmbiguousUse(_)
            | K::MissingBeginExtraEnd(_)
            | K::ErroneousNesting
            | K::ExtraAlignTab
            | K::UnsupportedUse(_)
            | K::EnvironmentBadEnd(..)
            | K::IllegalPreambleToken(_)
            | K::MissingEnd(_)
            | K::MultipleCommand(_)
            | K::MultipleLabel(_) => ErrorCategory::Structural,
        }
    }
}

fn floor_char_boundary(str: &str, index: usize) -> usize {
    if index >= str.len() {
        str.len()
    } else {
        let mut index = index;
        while !str.is_char_boundary(index) {
            index -= 1;
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_context() {
        let input = r"a + b \nonsense + c";
        let error = ParserError::new(
            ErrorKind::UndefinedControlSequence(r"\nonsense".into()),
            Span::new(6, 15),
            input,
        );
        assert_eq!(error.message(), r"Undefined control sequence \nonsense");
        assert_eq!(error.category(), ErrorCategory::UndefinedReference);
        assert_eq!(
            error.to_string(),
            "parsing error: Undefined control sequence \\nonsense\n\
             context: a + b \\nonsense + c\n               ^"
        );
    }

    #[test]
    fn context_respects_char_boundaries() {
        let input = "αβγδεζηθικλμνξοπρστυφχψω";
        let error = ParserError::new(ErrorKind::CantUseHash, Span::new(14, 16), input);
        assert!(error.context().starts_with("context: "));
    }

    #[test]
    fn messages() {
        assert_eq!(
            ErrorKind::EnvironmentBadEnd("equation".into(), "array".into()).to_string(),
            r"\begin{equation} ended with \end{array}"
        );
        assert_eq!(
            ErrorKind::MissingBeginExtraEnd("array".into()).to_string(),
            r"Missing \begin{array} or extra \end{array}"
        );
        assert_eq!(ErrorKind::Misplaced("&".into()).to_string(), "Misplaced &");
    }
}
