//! Utility macros and functions for the message crate.
//!
//! This module provides helper macros and functions that are used internally
//! by the parsing and building code.

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// It's useful for validation checks where you want to return early with an error
/// if some condition is not satisfied.
///
/// # Arguments
///
/// * `$predicate` - A boolean expression that should evaluate to true
/// * `$error` - The error value to return if the predicate is false
///
/// # Example
///
/// ```ignore
/// ensure!(line_count <= limits.max_headers(), ParseError::too_many_headers(limits.max_headers()));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

/// Returns true if `value` can be written into a header line without changing the line structure.
#[inline]
pub(crate) fn is_line_safe(value: &str) -> bool {
    !value.bytes().any(|b| b == b'\r' || b == b'\n')
}
