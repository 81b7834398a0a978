use crate::error::{ExplorerError, Result};

/// Arithmetic mean of `values`.
///
/// # Errors
///
/// [`ExplorerError::EmptyResult`] naming `what` when `values` is empty.
pub fn mean(values: &[f64], what: &'static str) -> Result<f64> {
    if values.is_empty() {
        return Err(ExplorerError::EmptyResult(what));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}
