//! String-level lexing of numbers, dimensions and glue.
//!
//! These functions work on the raw text following a command, the same way the commands
//! taking dimension arguments read their input (`\kern 2pt`, `\\[1,5cm]`, ...).
use crate::attribute::{Dimension, DimensionUnit, Glue};

/// Parse a glue (TeXBook p. 267).
pub fn glue(input: &mut &str) -> Option<Glue> {
    let mut glue = (dimension(input)?, None, None);
    if let Some(s) = input.trim_start().strip_prefix("plus") {
        *input = s;
        glue.1 = Some(dimension(input)?);
    }
    if let Some(s) = input.trim_start().strip_prefix("minus") {
        *input = s;
        glue.2 = Some(dimension(input)?);
    }
    Some(glue)
}

/// Parse a dimension (TeXBook p. 266).
///
/// Both `.` and `,` are accepted as the decimal separator.
pub fn dimension(input: &mut &str) -> Option<Dimension> {
    let mut rest = *input;
    let number = floating_point(&mut rest)?;
    let unit = dimension_unit(&mut rest)?;
    *input = rest;
    Some(Dimension::new(number, unit))
}

/// Parse a dimension that makes up the whole input, ignoring surrounding spaces.
pub fn full_dimension(input: &str) -> Option<Dimension> {
    let mut rest = input;
    let dimension = dimension(&mut rest)?;
    rest.trim().is_empty().then_some(dimension)
}

/// Parse a dimension unit (TeXBook p. 266).
pub fn dimension_unit(input: &mut &str) -> Option<DimensionUnit> {
    let rest = input.trim_start();
    let unit = DimensionUnit::from_str(rest.get(0..2)?)?;
    *input = &rest[2..];
    Some(unit)
}

/// Parse the signs in front of a number, returning the signum.
pub fn signs(input: &mut &str) -> isize {
    let mut minus_count = 0;
    *input = input
        .trim_start_matches(|c: char| {
            if c == '-' {
                minus_count += 1;
                true
            } else {
                c == '+' || c.is_whitespace()
            }
        })
        .trim_start();
    if minus_count % 2 == 0 {
        1
    } else {
        -1
    }
}

/// Parse a floating point number (named `factor` in TeXBook p. 266).
///
/// At least one digit must be present.
pub fn floating_point(input: &mut &str) -> Option<f32> {
    let mut rest = *input;
    let signum = signs(&mut rest);

    let mut digits = 0;
    let mut number = 0.;
    rest = rest.trim_start_matches(|c: char| {
        if c.is_ascii_digit() {
            number = number * 10. + (c as u8 - b'0') as f32;
            digits += 1;
            true
        } else {
            false
        }
    });

    if let Some(stripped_decimal_point) = rest.strip_prefix(|c| c == '.' || c == ',') {
        let mut decimal = 0.;
        let mut decimal_divisor = 1.;
        rest = stripped_decimal_point.trim_start_matches(|c: char| {
            if c.is_ascii_digit() {
                decimal = decimal * 10. + (c as u8 - b'0') as f32;
                decimal_divisor *= 10.;
                digits += 1;
                true
            } else {
                false
            }
        });
        number += decimal / decimal_divisor;
    };

    if digits == 0 {
        return None;
    }
    *input = rest;
    Some(signum as f32 * number)
}

/// Parse an integer that makes up the whole input, e.g. the argument of `\uproot`.
pub fn full_integer(input: &str) -> Option<isize> {
    let trimmed = input.trim();
    let (signum, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(signum * decimal(&mut &*digits) as isize)
}

/// Parse a base 10 unsigned number.
pub fn decimal(input: &mut &str) -> usize {
    let mut number = 0usize;
    *input = input.trim_start_matches(|c: char| {
        if c.is_ascii_digit() {
            number = number.saturating_mul(10).saturating_add((c as u8 - b'0') as usize);
            true
        } else {
            false
        }
    });
    one_optional_space(input);

    number
}

/// Parse a base 16 unsigned number.
pub fn hexadecimal(input: &mut &str) -> u32 {
    let mut number = 0u32;
    *input = input.trim_start_matches(|c: char| match c.to_digit(16) {
        Some(digit) => {
            number = number.saturating_mul(16).saturating_add(digit);
            true
        }
        None => false,
    });
    one_optional_space(input);

    number
}

/// Parse the argument of `\unicode`: a decimal number, or hexadecimal with an `x` or `#`
/// prefix.
pub fn code_point(input: &str) -> Option<char> {
    let trimmed = input.trim();
    let mut rest = trimmed;
    let value = if let Some(hex) = trimmed
        .strip_prefix(|c| c == 'x' || c == 'X' || c == '#')
    {
        rest = hex;
        if rest.is_empty() {
            return None;
        }
        hexadecimal(&mut rest)
    } else {
        if !rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        u32::try_from(decimal(&mut rest)).ok()?
    };
    if !rest.trim().is_empty() {
        return None;
    }
    char::from_u32(value)
}

/// Parse an optional space.
pub fn one_optional_space(input: &mut &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => {
            *input = &input[c.len_utf8()..];
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        attribute::{Dimension, DimensionUnit},
        parser::lex,
    };

    #[test]
    fn signs() {
        let mut input = "  +    +-   \\test";
        assert_eq!(lex::signs(&mut input), -1);
        assert_eq!(input, "\\test");
    }

    #[test]
    fn no_signs() {
        let mut input = "\\mycommand";
        assert_eq!(lex::signs(&mut input), 1);
        assert_eq!(input, "\\mycommand");
    }

    #[test]
    fn dimension() {
        let mut input = "1.2pt";
        let dim = lex::dimension(&mut input).unwrap();

        assert_eq!(dim, Dimension::new(1.2, DimensionUnit::Pt));
        assert_eq!(input, "");
    }

    #[test]
    fn european_dimension() {
        let mut input = "1,5cm]b";
        let dim = lex::dimension(&mut input).unwrap();

        assert_eq!(dim, Dimension::new(1.5, DimensionUnit::Cm));
        assert_eq!(input, "]b");
    }

    #[test]
    fn dimension_failure_leaves_input() {
        let mut input = "abc";
        assert!(lex::dimension(&mut input).is_none());
        assert_eq!(input, "abc");
        let mut input = "12 apples";
        assert!(lex::dimension(&mut input).is_none());
        assert_eq!(input, "12 apples");
    }

    #[test]
    fn complex_glue() {
        let mut input = "1.2 pt plus 3.4pt minus 5.6pt nope";
        let glue = lex::glue(&mut input).unwrap();

        assert_eq!(
            glue,
            (
                Dimension::new(1.2, DimensionUnit::Pt),
                Some(Dimension::new(3.4, DimensionUnit::Pt)),
                Some(Dimension::new(5.6, DimensionUnit::Pt))
            )
        );
        assert_eq!(input, " nope");
    }

    #[test]
    fn numbers() {
        let mut input = "123 -.47";
        assert_eq!(lex::decimal(&mut input), 123);
        assert_eq!(lex::floating_point(&mut input), Some(-0.47));
        assert_eq!(input, "");
        assert_eq!(lex::full_integer(" -2 "), Some(-2));
        assert_eq!(lex::full_integer("-"), None);
        assert_eq!(lex::full_integer("2.5"), None);
    }

    #[test]
    fn code_points() {
        assert_eq!(lex::code_point("x24B6"), Some('\u{24B6}'));
        assert_eq!(lex::code_point("#41"), Some('A'));
        assert_eq!(lex::code_point("65"), Some('A'));
        assert_eq!(lex::code_point("xZZ"), None);
        assert_eq!(lex::code_point("abc"), None);
    }
}
