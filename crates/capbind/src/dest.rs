//! Typed destinations for captured substrings.
//!
//! A [`Dest`] exclusively borrows one caller-owned location and knows how to
//! convert a substring into it. Plain references to integers, floats, bools
//! and strings convert into a `Dest` with [`From`]; the helper functions in
//! this module cover the remaining variants.

use crate::error::BindError;
use crate::radix::{parse_int, IntError, Radix};
use crate::scan::Scan;
use std::fmt;

/// Caller-supplied conversion for types without a built-in destination.
pub trait Save {
    fn save(&mut self, submatch: &str) -> anyhow::Result<()>;
}

impl<F> Save for F
where
    F: FnMut(&str) -> anyhow::Result<()>,
{
    fn save(&mut self, submatch: &str) -> anyhow::Result<()> {
        self(submatch)
    }
}

/// An integer location of a fixed width.
pub enum IntSlot<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
}

pub enum FloatSlot<'a> {
    F32(&'a mut f32),
    F64(&'a mut f64),
}

pub enum Dest<'a> {
    Int { slot: IntSlot<'a>, radix: Radix },
    Float(FloatSlot<'a>),
    Bool(&'a mut bool),
    Text(&'a mut String),
    Char(&'a mut char),
    Byte(&'a mut u8),
    Scan(Scan<'a>),
    Custom(Box<dyn Save + 'a>),
}

mod sealed {
    pub trait Sealed {}
}

/// Integer types that have an [`IntSlot`] variant.
pub trait Integer: sealed::Sealed + Sized + TryFrom<i128> {
    const NAME: &'static str;
    const SIGNED: bool;

    fn slot(target: &mut Self) -> IntSlot<'_>;
}

/// Parse `text` as a `T`, range-checked against its width.
fn parse_integer<T: Integer>(text: &str, radix: Radix) -> Result<T, BindError> {
    let overflow = || BindError::IntegerOverflow {
        text: text.to_string(),
        target: T::NAME,
    };
    let value = parse_int(text, radix, T::SIGNED).map_err(|e| match e {
        IntError::Syntax => BindError::InvalidInteger {
            text: text.to_string(),
            radix,
        },
        IntError::Range => overflow(),
    })?;
    T::try_from(value).map_err(|_| overflow())
}

macro_rules! integers {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Integer for $t {
                const NAME: &'static str = stringify!($t);
                const SIGNED: bool = <$t>::MIN != 0;

                fn slot(target: &mut Self) -> IntSlot<'_> {
                    IntSlot::$variant(target)
                }
            }

            impl<'a> From<&'a mut $t> for Dest<'a> {
                fn from(target: &'a mut $t) -> Self {
                    Dest::Int {
                        slot: IntSlot::$variant(target),
                        radix: Radix::DECIMAL,
                    }
                }
            }
        )*

        impl IntSlot<'_> {
            /// Parse `text` in `radix` and store it; the location is left
            /// untouched on failure.
            pub fn store(&mut self, text: &str, radix: Radix) -> Result<(), BindError> {
                match self {
                    $(IntSlot::$variant(target) => **target = parse_integer(text, radix)?,)*
                }
                Ok(())
            }

            pub fn type_name(&self) -> &'static str {
                match self {
                    $(IntSlot::$variant(_) => <$t as Integer>::NAME,)*
                }
            }
        }
    };
}

integers! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

impl FloatSlot<'_> {
    /// f32 targets are parsed at f64 precision and then narrowed.
    pub fn store(&mut self, text: &str) -> Result<(), BindError> {
        let value: f64 = text.parse().map_err(|_| BindError::InvalidFloat {
            text: text.to_string(),
        })?;
        match self {
            FloatSlot::F32(target) => **target = value as f32,
            FloatSlot::F64(target) => **target = value,
        }
        Ok(())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FloatSlot::F32(_) => "f32",
            FloatSlot::F64(_) => "f64",
        }
    }
}

impl<'a> From<&'a mut f32> for Dest<'a> {
    fn from(target: &'a mut f32) -> Self {
        Dest::Float(FloatSlot::F32(target))
    }
}

impl<'a> From<&'a mut f64> for Dest<'a> {
    fn from(target: &'a mut f64) -> Self {
        Dest::Float(FloatSlot::F64(target))
    }
}

impl<'a> From<&'a mut bool> for Dest<'a> {
    fn from(target: &'a mut bool) -> Self {
        Dest::Bool(target)
    }
}

impl<'a> From<&'a mut String> for Dest<'a> {
    fn from(target: &'a mut String) -> Self {
        Dest::Text(target)
    }
}

impl<'a> From<Scan<'a>> for Dest<'a> {
    fn from(scan: Scan<'a>) -> Self {
        Dest::Scan(scan)
    }
}

fn parse_bool(text: &str) -> Result<bool, BindError> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(BindError::InvalidBoolean {
            text: text.to_string(),
        }),
    }
}

fn parse_char(text: &str) -> Result<char, BindError> {
    let mut chars = text.chars();
    let c = chars.next().ok_or(BindError::EmptyInput)?;
    let rest = chars.as_str();
    if !rest.is_empty() {
        return Err(BindError::ExtraInput {
            remaining: rest.len(),
            text: text.to_string(),
        });
    }
    Ok(c)
}

fn parse_byte(text: &str) -> Result<u8, BindError> {
    match text.as_bytes() {
        [b] => Ok(*b),
        bytes => Err(BindError::WrongByteCount {
            len: bytes.len(),
            text: text.to_string(),
        }),
    }
}

impl<'a> Dest<'a> {
    /// A single Unicode scalar value.
    pub fn char(target: &'a mut char) -> Self {
        Dest::Char(target)
    }

    /// A single raw byte. Plain `&mut u8` binds as a number instead.
    pub fn byte(target: &'a mut u8) -> Self {
        Dest::Byte(target)
    }

    pub fn custom<S: Save + 'a>(saver: S) -> Self {
        Dest::Custom(Box::new(saver))
    }

    /// A custom destination from a closure.
    pub fn with<F>(f: F) -> Self
    where
        F: FnMut(&str) -> anyhow::Result<()> + 'a,
    {
        Dest::Custom(Box::new(f))
    }

    /// Scan the submatch with a `scanf`-style template into `operands`.
    pub fn scan(template: &str, operands: Vec<Dest<'a>>) -> Self {
        Dest::Scan(Scan::new(template, operands))
    }

    pub fn bind(&mut self, submatch: &str) -> Result<(), BindError> {
        match self {
            Dest::Int { slot, radix } => slot.store(submatch, *radix),
            Dest::Float(slot) => slot.store(submatch),
            Dest::Bool(target) => {
                **target = parse_bool(submatch)?;
                Ok(())
            }
            Dest::Text(target) => {
                target.clear();
                target.push_str(submatch);
                Ok(())
            }
            Dest::Char(target) => {
                **target = parse_char(submatch)?;
                Ok(())
            }
            Dest::Byte(target) => {
                **target = parse_byte(submatch)?;
                Ok(())
            }
            Dest::Scan(scan) => scan.bind(submatch),
            Dest::Custom(saver) => saver.save(submatch).map_err(BindError::Custom),
        }
    }

    /// Short name of the destination kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Dest::Int { slot, .. } => slot.type_name(),
            Dest::Float(slot) => slot.type_name(),
            Dest::Bool(_) => "bool",
            Dest::Text(_) => "string",
            Dest::Char(_) => "char",
            Dest::Byte(_) => "byte",
            Dest::Scan(_) => "scan",
            Dest::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Dest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dest::Int { slot, radix } => {
                write!(f, "Dest::Int({}, radix {})", slot.type_name(), radix)
            }
            Dest::Scan(scan) => write!(f, "Dest::Scan({:?})", scan),
            other => write!(f, "Dest::{}", other.kind()),
        }
    }
}

fn int_dest<T: Integer>(target: &mut T, radix: Radix) -> Dest<'_> {
    Dest::Int {
        slot: T::slot(target),
        radix,
    }
}

/// Base-16 integer destination.
pub fn hex<T: Integer>(target: &mut T) -> Dest<'_> {
    int_dest(target, Radix::HEX)
}

/// Base-8 integer destination.
pub fn octal<T: Integer>(target: &mut T) -> Dest<'_> {
    int_dest(target, Radix::OCTAL)
}

pub fn decimal<T: Integer>(target: &mut T) -> Dest<'_> {
    int_dest(target, Radix::DECIMAL)
}

/// Integer destination reading C-style literals: decimal by default, a `0`
/// prefix for octal and `0x` for hex.
pub fn c_radix<T: Integer>(target: &mut T) -> Dest<'_> {
    int_dest(target, Radix::AUTO)
}

/// Integer destination in an arbitrary base between 2 and 36.
///
/// Panics if `base` is out of range.
pub fn radix<T: Integer>(target: &mut T, base: u32) -> Dest<'_> {
    int_dest(target, Radix::new(base))
}
