use crate::error::{Result, RetrofitError};

/// Copy of `original` with every selected position set to `new_value`.
/// `original` is never modified.
pub fn apply(original: &[f64], mask: &[bool], new_value: f64) -> Result<Vec<f64>> {
    if original.len() != mask.len() {
        return Err(RetrofitError::validation(
            "mutator",
            format!(
                "mask length {} does not match U-value length {}",
                mask.len(),
                original.len()
            ),
        ));
    }
    if !(new_value.is_finite() && new_value > 0.0) {
        return Err(RetrofitError::validation(
            "mutator",
            format!("new U-value must be > 0, got {}", new_value),
        ));
    }

    Ok(original
        .iter()
        .zip(mask)
        .map(|(value, selected)| if *selected { new_value } else { *value })
        .collect())
}
