//! Bind regex capture groups into typed destinations.
//!
//! A single match of a [`regex::Regex`] is taken apart positionally: capture
//! group `i` is converted and stored into the `i`-th destination. Plain
//! `&mut` references pick the natural conversion for their type, and helper
//! constructors cover other radixes, single characters and bytes, `scanf`
//! style templates and custom savers.
//!
//! # Example
//!
//! ```
//! use capbind::{c_radix, capture, hex, octal};
//! use regex::Regex;
//!
//! let re = Regex::new("(.*) (.*) (.*) (.*)").unwrap();
//! let (mut a, mut b, mut c, mut d) = (0i32, 0i32, 0i32, 0i32);
//! capture!(
//!     &re,
//!     "100 40 0100 0x40",
//!     octal(&mut a),
//!     hex(&mut b),
//!     c_radix(&mut c),
//!     c_radix(&mut d),
//! )
//! .unwrap();
//! assert_eq!((a, b, c, d), (64, 64, 64, 64));
//! ```
//!
//! Conversion failures and failed matches come back as a [`MatchError`]
//! carrying the pattern, the input and every captured substring. Passing a
//! number of destinations that differs from the number of capture groups is
//! a bug in the caller and panics.

mod dest;
mod error;
mod matcher;
mod radix;
mod scan;

pub use capbind_format::{parse_template, Directive, Template, TemplateError, Verb};
pub use dest::{c_radix, decimal, hex, octal, radix, Dest, FloatSlot, IntSlot, Integer, Save};
pub use error::{BindError, ScanError};
pub use matcher::{match_and_bind, MatchError};
pub use radix::Radix;
pub use scan::Scan;
