//! Integer literal parsing in fixed and auto-detected bases.

use std::fmt;

/// Numeric base used to read an integer destination.
///
/// The base is checked when the radix is built, so an out-of-range base can
/// never reach a destination:
///
/// ```compile_fail
/// let radix = capbind::Radix { base: Some(40) };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Radix {
    /// `None` reads C-style literals: `0x` prefix is hex, a leading `0` is
    /// octal, else decimal.
    base: Option<u32>,
}

impl Radix {
    pub const AUTO: Radix = Radix { base: None };
    pub const DECIMAL: Radix = Radix { base: Some(10) };
    pub const OCTAL: Radix = Radix { base: Some(8) };
    pub const HEX: Radix = Radix { base: Some(16) };

    /// Panics unless `2 <= base <= 36`.
    pub fn new(base: u32) -> Self {
        assert!(
            (2..=36).contains(&base),
            "radix {} out of range 2..=36",
            base
        );
        Radix { base: Some(base) }
    }

    /// The fixed base, or `None` for auto-detection.
    pub fn base(&self) -> Option<u32> {
        self.base
    }

    pub fn is_auto(&self) -> bool {
        self.base.is_none()
    }
}

impl Default for Radix {
    fn default() -> Self {
        Radix::DECIMAL
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.base {
            None => f.write_str("auto"),
            Some(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntError {
    Syntax,
    Range,
}

/// Strip a base prefix according to `radix`, returning the effective base.
fn resolve(body: &str, radix: Radix) -> (u32, &str) {
    match radix.base {
        Some(n) => (n, body),
        None => {
            if let Some(rest) = body
                .strip_prefix("0x")
                .or_else(|| body.strip_prefix("0X"))
            {
                (16, rest)
            } else if body.len() > 1 && body.starts_with('0') {
                (8, &body[1..])
            } else {
                (10, body)
            }
        }
    }
}

/// Parse an optionally signed integer literal.
///
/// Unsigned targets reject any sign. The result still has to be narrowed to
/// the destination width by the caller.
pub(crate) fn parse_int(text: &str, radix: Radix, signed: bool) -> Result<i128, IntError> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if !signed && body.len() != text.len() {
        return Err(IntError::Syntax);
    }

    let (base, digits) = resolve(body, radix);
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(base)) {
        return Err(IntError::Syntax);
    }

    let magnitude = digits.chars().try_fold(0u128, |acc, c| {
        let digit = c.to_digit(base).ok_or(IntError::Syntax)?;
        acc.checked_mul(u128::from(base))
            .and_then(|acc| acc.checked_add(u128::from(digit)))
            .ok_or(IntError::Range)
    })?;
    let value = i128::try_from(magnitude).map_err(|_| IntError::Range)?;

    Ok(if negative { -value } else { value })
}
