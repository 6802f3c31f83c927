//! Formatted-scan destinations.
//!
//! A [`Scan`] applies a `scanf`-style template (see [`capbind_format`]) to a
//! submatch, binding one operand per verb. The submatch must be consumed
//! entirely.

use crate::dest::Dest;
use crate::error::{BindError, ScanError};
use crate::radix::Radix;
use capbind_format::{parse_template, Directive, Template, TemplateError, Verb};
use std::fmt;
use winnow::ascii::{digit0, digit1, hex_digit1};
use winnow::combinator::{alt, delimited, opt, repeat};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of, rest, take_while};

pub struct Scan<'a> {
    template: Result<Template, TemplateError>,
    operands: Vec<Dest<'a>>,
}

impl<'a> Scan<'a> {
    /// A malformed template is reported when the scan is bound.
    pub fn new(template: &str, operands: Vec<Dest<'a>>) -> Self {
        Self {
            template: parse_template(template),
            operands,
        }
    }

    pub fn from_template(template: Template, operands: Vec<Dest<'a>>) -> Self {
        Self {
            template: Ok(template),
            operands,
        }
    }

    pub fn bind(&mut self, submatch: &str) -> Result<(), BindError> {
        let rest = self.run(submatch)?;
        if !rest.is_empty() {
            return Err(BindError::UnconsumedInput {
                remaining: rest.len(),
                text: submatch.to_string(),
            });
        }
        Ok(())
    }

    /// Apply the template, returning the unconsumed tail of `text`.
    pub fn run<'s>(&mut self, text: &'s str) -> Result<&'s str, ScanError> {
        let Scan { template, operands } = self;
        let template = template.as_ref().map_err(|e| ScanError::Template(e.clone()))?;
        let mut input = text;
        let mut next_operand = operands.iter_mut().enumerate();

        for directive in template.directives() {
            match *directive {
                Directive::Space => skip_space(&mut input),
                Directive::Newline => {
                    skip_space(&mut input);
                    if !input.is_empty() {
                        expect_char(&mut input, '\n')?;
                    }
                }
                Directive::Literal(c) => expect_char(&mut input, c)?,
                Directive::Percent => {
                    skip_space(&mut input);
                    expect_char(&mut input, '%')?;
                }
                Directive::Verb { width, verb } => {
                    let (i, operand) = next_operand
                        .next()
                        .ok_or(ScanError::TooFewOperands { verb })?;
                    scan_operand(&mut input, verb, width, operand).map_err(|e| match e {
                        Step::Scan(e) => e,
                        Step::Bind(source) => ScanError::Operand {
                            index: i + 1,
                            source: Box::new(source),
                        },
                    })?;
                }
            }
        }

        if next_operand.next().is_some() {
            return Err(ScanError::TooManyOperands {
                expected: template.operand_count(),
                got: operands.len(),
            });
        }
        Ok(input)
    }
}

impl fmt::Debug for Scan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scan")
            .field("template", &self.template)
            .field("operands", &self.operands)
            .finish()
    }
}

/// Failure of a single verb: either reading the token or binding it.
enum Step {
    Scan(ScanError),
    Bind(BindError),
}

impl From<ScanError> for Step {
    fn from(e: ScanError) -> Self {
        Step::Scan(e)
    }
}

fn skip_space(input: &mut &str) {
    *input = (*input).trim_start_matches(|c: char| c == ' ' || c == '\t' || c == '\r');
}

fn expect_char(input: &mut &str, expected: char) -> Result<(), ScanError> {
    match input.chars().next() {
        Some(c) if c == expected => {
            *input = &(*input)[c.len_utf8()..];
            Ok(())
        }
        Some(found) => Err(ScanError::LiteralMismatch { expected, found }),
        None => Err(ScanError::UnexpectedEof),
    }
}

/// The longest prefix of `input` holding at most `width` characters.
fn limit(input: &str, width: Option<usize>) -> &str {
    match width.and_then(|n| input.char_indices().nth(n)) {
        Some((end, _)) => &input[..end],
        None => input,
    }
}

// ============ Tokens ============

fn sign(input: &mut &str) -> ModalResult<Option<char>> {
    opt(one_of(['+', '-'])).parse_next(input)
}

fn digits_in<'s>(input: &mut &'s str, base: u32) -> ModalResult<&'s str> {
    take_while(1.., move |c: char| c.is_digit(base)).parse_next(input)
}

/// Sign and digits in `base`; hex tokens may carry a `0x` prefix, which is
/// dropped from the returned token.
fn int_token(input: &mut &str, base: u32) -> ModalResult<String> {
    let sign = sign(input)?;
    if base == 16 {
        let _ = opt(alt(("0x", "0X"))).parse_next(input)?;
    }
    let digits = digits_in(input, base)?;
    Ok(sign.into_iter().chain(digits.chars()).collect())
}

/// A C-style integer literal: `0x` prefix for hex, otherwise decimal digits
/// whose base is settled when the token is converted.
fn c_int_token<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        sign,
        alt(((alt(("0x", "0X")), hex_digit1).void(), digit1.void())),
    )
        .take()
        .parse_next(input)
}

fn float_token<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        sign,
        alt((
            alt((
                "infinity", "Infinity", "INFINITY", "inf", "Inf", "INF", "nan", "NaN", "NAN",
            ))
            .void(),
            (
                alt(((digit1, opt(('.', digit0))).void(), ('.', digit1).void())),
                opt((one_of(['e', 'E']), sign, digit1)),
            )
                .void(),
        )),
    )
        .take()
        .parse_next(input)
}

/// `[A-Za-z01]+`; digits other than `0` and `1` end the token.
fn bool_token<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '0' || c == '1').parse_next(input)
}

fn word_token<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| !c.is_whitespace()).parse_next(input)
}

fn quoted_char(input: &mut &str) -> ModalResult<char> {
    let c: char = none_of('"').parse_next(input)?;
    if c == '\\' {
        let escaped: char = any.parse_next(input)?;
        Ok(match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            c => c,
        })
    } else {
        Ok(c)
    }
}

fn quoted_token(input: &mut &str) -> ModalResult<String> {
    delimited(
        '"',
        repeat(0.., quoted_char).fold(String::new, |mut s, c| {
            s.push(c);
            s
        }),
        '"',
    )
    .parse_next(input)
}

/// Read one token from the width-limited window and advance `input` past it.
fn read<'s, O>(
    input: &mut &'s str,
    width: Option<usize>,
    verb: Verb,
    mut token: impl FnMut(&mut &'s str) -> ModalResult<O>,
) -> Result<O, ScanError> {
    let window = limit(*input, width);
    if window.is_empty() {
        return Err(ScanError::UnexpectedEof);
    }
    let mut rest = window;
    let value = token(&mut rest).map_err(|_| ScanError::EmptyToken { verb })?;
    *input = &(*input)[window.len() - rest.len()..];
    Ok(value)
}

fn one_char<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    any.take().parse_next(input)
}

/// Everything left in the window, including whitespace.
fn window_token<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    rest.parse_next(input)
}

fn scan_operand(
    input: &mut &str,
    verb: Verb,
    width: Option<usize>,
    operand: &mut Dest<'_>,
) -> Result<(), Step> {
    let kind = operand.kind();
    let bad_verb = || ScanError::BadVerb {
        verb,
        operand: kind,
    };

    // `%c` reads exactly `width` characters (one by default) without
    // skipping leading space.
    if verb == Verb::Char {
        return match operand {
            Dest::Int { .. } | Dest::Float(_) | Dest::Bool(_) => Err(bad_verb().into()),
            _ => {
                let token = read(input, Some(width.unwrap_or(1)), verb, window_token)?;
                operand.bind(token).map_err(Step::Bind)
            }
        };
    }

    skip_space(input);

    match operand {
        Dest::Int { slot, radix } => {
            // `%i`, and `%v` unless a non-decimal radix was asked for, read C
            // literals: `0x` is hex and a leading `0` is octal.
            let c_style = match verb {
                Verb::Integer => true,
                Verb::Value => radix.is_auto() || *radix == Radix::DECIMAL,
                _ => false,
            };
            let (token, radix) = match verb {
                Verb::Value | Verb::Integer if c_style => {
                    (read(input, width, verb, c_int_token)?.to_string(), Radix::AUTO)
                }
                Verb::Value => {
                    let base = radix.base().unwrap_or(10);
                    let token = read(input, width, verb, |i: &mut &str| int_token(i, base))?;
                    (token, *radix)
                }
                Verb::Decimal | Verb::Binary | Verb::Octal | Verb::Hex => {
                    let base = verb.base().unwrap_or(10);
                    let token = read(input, width, verb, |i: &mut &str| int_token(i, base))?;
                    (token, Radix::new(base))
                }
                _ => return Err(bad_verb().into()),
            };
            slot.store(&token, radix).map_err(Step::Bind)
        }
        Dest::Float(slot) => match verb {
            Verb::Value | Verb::Float => {
                let token = read(input, width, verb, float_token)?;
                slot.store(token).map_err(Step::Bind)
            }
            _ => Err(bad_verb().into()),
        },
        Dest::Bool(_) => match verb {
            Verb::Value | Verb::Bool => {
                let token = read(input, width, verb, bool_token)?;
                operand.bind(token).map_err(Step::Bind)
            }
            _ => Err(bad_verb().into()),
        },
        Dest::Char(_) | Dest::Byte(_) => match verb {
            Verb::Value => {
                let token = read(input, width, verb, one_char)?;
                operand.bind(token).map_err(Step::Bind)
            }
            _ => Err(bad_verb().into()),
        },
        Dest::Text(_) | Dest::Scan(_) | Dest::Custom(_) => match verb {
            Verb::Value | Verb::String => {
                let token = read(input, width, verb, word_token)?;
                operand.bind(token).map_err(Step::Bind)
            }
            Verb::Quoted => {
                let token = read(input, width, verb, quoted_token)?;
                operand.bind(&token).map_err(Step::Bind)
            }
            _ => Err(bad_verb().into()),
        },
    }
}
