use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Converts a real number to a `usize` if it is finite, non-negative and
/// integral.
///
/// `what` names the quantity being converted (for example `"index"` or
/// `"count"`) and appears in the error message.
///
/// # Errors
/// - `RuntimeError::TypeError` for non-finite or fractional values.
/// - `RuntimeError::InvalidArgument` for negative or oversized values.
///
/// # Example
/// ```
/// use tbl::{error::RuntimeError, util::num::f64_to_usize_checked};
///
/// assert_eq!(f64_to_usize_checked(3.0, "index").unwrap(), 3);
///
/// let err = f64_to_usize_checked(1.5, "index").unwrap_err();
/// assert!(matches!(err, RuntimeError::TypeError { .. }));
///
/// let err = f64_to_usize_checked(-1.0, "index").unwrap_err();
/// assert!(matches!(err, RuntimeError::InvalidArgument { .. }));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_sign_loss)]
pub fn f64_to_usize_checked(value: f64, what: &str) -> EvalResult<usize> {
    if !value.is_finite() {
        return Err(RuntimeError::type_error(format!("{what} must be finite, found {value}")));
    }
    if value.fract() != 0.0 {
        return Err(RuntimeError::type_error(format!("{what} must be an integer, found {value}")));
    }
    if value < 0.0 {
        return Err(RuntimeError::invalid_argument(format!("{what} can not be negative, found {value}")));
    }
    if value > MAX_SAFE_U64_INT as f64 {
        return Err(RuntimeError::invalid_argument(format!("{what} {value} is too large")));
    }

    usize::try_from(value as u64).map_err(|_| {
                                     RuntimeError::invalid_argument(format!("{what} {value} is too large"))
                                 })
}

/// Converts a real number to an `i64` if it is finite and integral.
///
/// # Errors
/// Returns `RuntimeError::TypeError` for non-finite, fractional or
/// out-of-range values.
///
/// # Example
/// ```
/// use tbl::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(-4.0, "step").unwrap(), -4);
/// assert!(f64_to_i64_checked(0.25, "step").is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, what: &str) -> EvalResult<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(RuntimeError::type_error(format!("{what} must be an integer, found {value}")));
    }
    if value.abs() > MAX_SAFE_U64_INT as f64 {
        return Err(RuntimeError::type_error(format!("{what} {value} is out of range")));
    }

    Ok(value as i64)
}

/// Converts a length or position to a real number.
///
/// Collection lengths never approach `2^53`, so the conversion is exact in
/// practice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}
