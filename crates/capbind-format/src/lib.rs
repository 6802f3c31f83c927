//! Scan template parser for capbind formatted destinations.
//!
//! A template is a `scanf`-style string: literal characters must appear in
//! the input verbatim, runs of whitespace match optional horizontal space,
//! and `%` directives read one operand each.
//!
//! Supported verbs:
//! - `%v`: the operand's natural format
//! - `%d`, `%b`, `%o`, `%x`/`%X`: integers in base 10, 2, 8, 16
//! - `%i`: integers with a C-style base prefix (`%v` too, unless the operand
//!   has a non-decimal radix)
//! - `%f`, `%e`/`%E`, `%g`/`%G`: floating point
//! - `%s`: a run of non-space characters
//! - `%c`: `width` characters (default one), spaces included
//! - `%t`: a boolean token, `[A-Za-z01]+`
//! - `%q`: a double-quoted string with backslash escapes
//! - `%%`: a literal percent sign
//!
//! An optional decimal width between `%` and the verb caps the token length.
//!
//! # Example
//!
//! ```
//! use capbind_format::{parse_template, Directive, Verb};
//!
//! let template = parse_template("%d-%3x").unwrap();
//! assert_eq!(template.operand_count(), 2);
//! assert_eq!(
//!     template.directives()[2],
//!     Directive::Verb { width: Some(3), verb: Verb::Hex }
//! );
//! ```

use std::fmt;
use thiserror::Error;
use winnow::ascii::digit1;
use winnow::combinator::{alt, opt};
use winnow::prelude::*;
use winnow::token::{any, none_of, take_while};

// ============ Template Types ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Value,
    Decimal,
    Binary,
    Octal,
    Hex,
    Integer,
    Float,
    String,
    Char,
    Bool,
    Quoted,
}

impl Verb {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'v' => Some(Verb::Value),
            'd' => Some(Verb::Decimal),
            'b' => Some(Verb::Binary),
            'o' => Some(Verb::Octal),
            'x' | 'X' => Some(Verb::Hex),
            'i' => Some(Verb::Integer),
            'f' | 'e' | 'E' | 'g' | 'G' => Some(Verb::Float),
            's' => Some(Verb::String),
            'c' => Some(Verb::Char),
            't' => Some(Verb::Bool),
            'q' => Some(Verb::Quoted),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Verb::Value => 'v',
            Verb::Decimal => 'd',
            Verb::Binary => 'b',
            Verb::Octal => 'o',
            Verb::Hex => 'x',
            Verb::Integer => 'i',
            Verb::Float => 'f',
            Verb::String => 's',
            Verb::Char => 'c',
            Verb::Bool => 't',
            Verb::Quoted => 'q',
        }
    }

    /// Fixed integer base implied by the verb, if any.
    pub fn base(&self) -> Option<u32> {
        match self {
            Verb::Decimal => Some(10),
            Verb::Binary => Some(2),
            Verb::Octal => Some(8),
            Verb::Hex => Some(16),
            _ => None,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// A character that must match the input exactly.
    Literal(char),
    /// Whitespace other than newline; matches zero or more spaces.
    Space,
    /// A newline; matches optional spaces followed by a newline or end of input.
    Newline,
    /// `%%`
    Percent,
    Verb { width: Option<usize>, verb: Verb },
}

/// A parsed scan template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    directives: Vec<Directive>,
}

impl Template {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Number of directives that read an operand.
    pub fn operand_count(&self) -> usize {
        self.directives
            .iter()
            .filter(|d| matches!(d, Directive::Verb { .. }))
            .count()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("missing verb after '%' at offset {offset}")]
    MissingVerb { offset: usize },
    #[error("unknown verb '%{verb}' at offset {offset}")]
    UnknownVerb { verb: char, offset: usize },
    #[error("invalid width {width:?} at offset {offset}")]
    InvalidWidth { width: String, offset: usize },
}

// ============ Parser ============

/// A `%` directive before its verb and width are validated.
#[derive(Clone)]
struct RawVerb<'a> {
    width: Option<&'a str>,
    verb: Option<char>,
}

#[derive(Clone)]
enum Piece<'a> {
    Plain(Directive),
    Verb(RawVerb<'a>),
}

fn space<'a>(input: &mut &'a str) -> ModalResult<Piece<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Piece::Plain(Directive::Space))
        .parse_next(input)
}

fn newline<'a>(input: &mut &'a str) -> ModalResult<Piece<'a>> {
    '\n'.value(Piece::Plain(Directive::Newline))
        .parse_next(input)
}

fn literal<'a>(input: &mut &'a str) -> ModalResult<Piece<'a>> {
    none_of(|c: char| c == '%' || c.is_whitespace())
        .map(|c| Piece::Plain(Directive::Literal(c)))
        .parse_next(input)
}

fn percent<'a>(input: &mut &'a str) -> ModalResult<Piece<'a>> {
    '%'.parse_next(input)?;
    if opt('%').parse_next(input)?.is_some() {
        return Ok(Piece::Plain(Directive::Percent));
    }
    let width: Option<&str> = opt(digit1).parse_next(input)?;
    let verb: Option<char> = opt(any).parse_next(input)?;
    Ok(Piece::Verb(RawVerb { width, verb }))
}

fn piece<'a>(input: &mut &'a str) -> ModalResult<Piece<'a>> {
    alt((percent, newline, space, literal)).parse_next(input)
}

fn check_verb(raw: RawVerb<'_>, offset: usize) -> Result<Directive, TemplateError> {
    let width = match raw.width {
        Some(digits) => match digits.parse::<usize>() {
            Ok(0) | Err(_) => {
                return Err(TemplateError::InvalidWidth {
                    width: digits.to_string(),
                    offset,
                })
            }
            Ok(n) => Some(n),
        },
        None => None,
    };
    let c = raw.verb.ok_or(TemplateError::MissingVerb { offset })?;
    let verb = Verb::from_char(c).ok_or(TemplateError::UnknownVerb { verb: c, offset })?;
    Ok(Directive::Verb { width, verb })
}

/// Parse a scan template into directives.
pub fn parse_template(source: &str) -> Result<Template, TemplateError> {
    let mut input = source;
    let mut directives = Vec::new();

    while !input.is_empty() {
        let offset = source.len() - input.len();
        // Every non-empty input starts one of the alternatives.
        let Ok(next) = piece.parse_next(&mut input) else {
            return Err(TemplateError::MissingVerb { offset });
        };
        let directive = match next {
            Piece::Plain(d) => d,
            Piece::Verb(raw) => check_verb(raw, offset)?,
        };
        // Adjacent whitespace runs collapse into one directive.
        if directive == Directive::Space && directives.last() == Some(&Directive::Space) {
            continue;
        }
        directives.push(directive);
    }

    Ok(Template {
        source: source.to_string(),
        directives,
    })
}

impl std::str::FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_template(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn directives(s: &str) -> Vec<Directive> {
        parse_template(s).unwrap().directives().to_vec()
    }

    #[test]
    fn test_empty_template() {
        assert!(directives("").is_empty());
    }

    #[test]
    fn test_literals_and_verbs() {
        assert_eq!(
            directives("a%db"),
            vec![
                Directive::Literal('a'),
                Directive::Verb {
                    width: None,
                    verb: Verb::Decimal
                },
                Directive::Literal('b'),
            ]
        );
    }

    #[test]
    fn test_percent_escape() {
        assert_eq!(
            directives("%d%%"),
            vec![
                Directive::Verb {
                    width: None,
                    verb: Verb::Decimal
                },
                Directive::Percent,
            ]
        );
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(
            directives("%s \t %s"),
            vec![
                Directive::Verb {
                    width: None,
                    verb: Verb::String
                },
                Directive::Space,
                Directive::Verb {
                    width: None,
                    verb: Verb::String
                },
            ]
        );
    }

    #[test]
    fn test_newline_is_distinct() {
        assert_eq!(
            directives("%d \n%d"),
            vec![
                Directive::Verb {
                    width: None,
                    verb: Verb::Decimal
                },
                Directive::Space,
                Directive::Newline,
                Directive::Verb {
                    width: None,
                    verb: Verb::Decimal
                },
            ]
        );
    }

    #[test]
    fn test_width() {
        assert_eq!(
            directives("%12s"),
            vec![Directive::Verb {
                width: Some(12),
                verb: Verb::String
            }]
        );
    }

    #[rstest]
    #[case::v('v', Verb::Value)]
    #[case::upper_hex('X', Verb::Hex)]
    #[case::exponent('E', Verb::Float)]
    #[case::general('g', Verb::Float)]
    #[case::quoted('q', Verb::Quoted)]
    #[case::bool('t', Verb::Bool)]
    fn test_verb_aliases(#[case] c: char, #[case] expected: Verb) {
        assert_eq!(Verb::from_char(c), Some(expected));
    }

    #[test]
    fn test_operand_count_ignores_literals() {
        let t = parse_template("(%d, %x) 100%%").unwrap();
        assert_eq!(t.operand_count(), 2);
        assert_eq!(t.source(), "(%d, %x) 100%%");
    }

    #[test]
    fn test_trailing_percent() {
        assert_eq!(
            parse_template("ab%"),
            Err(TemplateError::MissingVerb { offset: 2 })
        );
    }

    #[test]
    fn test_unknown_verb() {
        assert_eq!(
            parse_template("x %y"),
            Err(TemplateError::UnknownVerb {
                verb: 'y',
                offset: 2
            })
        );
    }

    #[test]
    fn test_zero_width() {
        assert_eq!(
            parse_template("%0d"),
            Err(TemplateError::InvalidWidth {
                width: "0".to_string(),
                offset: 0
            })
        );
    }

    #[test]
    fn test_from_str() {
        let t: Template = "%v".parse().unwrap();
        assert_eq!(t.to_string(), "%v");
    }

    #[test]
    fn test_verb_display() {
        assert_eq!(Verb::Hex.to_string(), "%x");
        assert_eq!(Verb::base(&Verb::Octal), Some(8));
        assert_eq!(Verb::base(&Verb::Value), None);
    }
}
