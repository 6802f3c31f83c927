//! Match a regex once and bind its capture groups positionally.

use crate::dest::Dest;
use crate::error::BindError;
use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{debug, trace};

/// Tracing target for match operations.
pub(crate) const MATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::matcher");

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("regular expression did not match.\n\nregex: {pattern:?}\ninput: {input:?}")]
    NoMatch { pattern: String, input: String },

    #[error(
        "submatch {index} save failed: {source}\n\nregex: {pattern:?}\ninput: {input:?}\n{}",
        dump_submatches(.submatches)
    )]
    SaveFailed {
        /// 1-based capture group index.
        index: usize,
        pattern: String,
        input: String,
        /// Every captured substring; index 0 is the whole match.
        submatches: Vec<String>,
        #[source]
        source: BindError,
    },
}

impl MatchError {
    pub fn pattern(&self) -> &str {
        match self {
            MatchError::NoMatch { pattern, .. } | MatchError::SaveFailed { pattern, .. } => pattern,
        }
    }

    pub fn input(&self) -> &str {
        match self {
            MatchError::NoMatch { input, .. } | MatchError::SaveFailed { input, .. } => input,
        }
    }
}

fn dump_submatches(submatches: &[String]) -> String {
    submatches
        .iter()
        .enumerate()
        .map(|(i, s)| format!("\nsubmatch {}: {:?}", i, s))
        .collect()
}

/// Groups that did not participate in the match read as empty strings.
fn submatches(caps: &Captures) -> Vec<String> {
    caps.iter()
        .map(|m| m.map_or("", |m| m.as_str()).to_string())
        .collect()
}

/// Match `regex` against `input` and bind capture group `i` into `dests[i - 1]`.
///
/// Binding stops at the first failing destination; destinations before it
/// keep their new values and the ones after it are not touched.
///
/// # Panics
///
/// Panics if `dests.len()` differs from the number of capture groups in
/// `regex`. The check runs before matching.
pub fn match_and_bind(
    regex: &Regex,
    input: &str,
    dests: &mut [Dest<'_>],
) -> Result<(), MatchError> {
    let groups = regex.captures_len() - 1;
    assert!(
        groups == dests.len(),
        "expected {} destinations, got {}",
        groups,
        dests.len()
    );

    let Some(caps) = regex.captures(input) else {
        debug!(target: MATCH_TARGET, pattern = regex.as_str(), input, "regex did not match");
        return Err(MatchError::NoMatch {
            pattern: regex.as_str().to_string(),
            input: input.to_string(),
        });
    };

    for (i, dest) in dests.iter_mut().enumerate() {
        let index = i + 1;
        let submatch = caps.get(index).map_or("", |m| m.as_str());
        if let Err(source) = dest.bind(submatch) {
            debug!(
                target: MATCH_TARGET,
                index,
                kind = dest.kind(),
                error = %source,
                "submatch save failed"
            );
            return Err(MatchError::SaveFailed {
                index,
                pattern: regex.as_str().to_string(),
                input: input.to_string(),
                submatches: submatches(&caps),
                source,
            });
        }
        trace!(target: MATCH_TARGET, index, submatch, kind = dest.kind(), "bound submatch");
    }

    Ok(())
}

/// Match a regex and bind each capture group into the matching argument.
///
/// Every argument is converted with [`Dest::from`], so plain `&mut` references
/// to integers, floats, `bool` and `String` work alongside explicit
/// destinations such as [`hex`](crate::hex) or [`Dest::char`].
///
/// ```
/// use capbind::{capture, hex};
/// use regex::Regex;
///
/// let re = Regex::new(r"^(\w+)=([0-9a-f]+)$").unwrap();
/// let mut key = String::new();
/// let mut value = 0u32;
/// capture!(&re, "mask=ff", &mut key, hex(&mut value)).unwrap();
/// assert_eq!((key.as_str(), value), ("mask", 255));
/// ```
#[macro_export]
macro_rules! capture {
    ($regex:expr, $input:expr $(, $dest:expr)* $(,)?) => {{
        let dests: &mut [$crate::Dest<'_>] = &mut [$($crate::Dest::from($dest)),*];
        $crate::match_and_bind($regex, $input, dests)
    }};
}
