use serde::Serialize;
use thiserror::Error;

/// Errors that abort a retrofit run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrofitError {
    /// Required columns are missing or hold the wrong type. Nothing is computed.
    #[error("Schema error: {}", schema_message(.missing, .row))]
    Schema {
        missing: Vec<String>,
        row: Option<usize>,
    },

    /// A policy or input sequence is out of contract for one submission.
    #[error("Validation error in {context}{}: {message}", row_suffix(.row))]
    Validation {
        context: String,
        message: String,
        row: Option<usize>,
    },
}

impl RetrofitError {
    pub fn validation(context: impl Into<String>, message: impl Into<String>) -> Self {
        RetrofitError::Validation {
            context: context.into(),
            message: message.into(),
            row: None,
        }
    }

    pub fn validation_at(
        context: impl Into<String>,
        row: usize,
        message: impl Into<String>,
    ) -> Self {
        RetrofitError::Validation {
            context: context.into(),
            message: message.into(),
            row: Some(row),
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, RetrofitError::Schema { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RetrofitError::Validation { .. })
    }
}

fn schema_message(missing: &[String], row: &Option<usize>) -> String {
    let columns = missing.join(", ");
    match row {
        Some(row) => format!("missing or non-numeric column(s) [{}] at row {}", columns, row),
        None => format!("missing column(s) [{}]", columns),
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(row) => format!(" (row {})", row),
        None => String::new(),
    }
}

/// Recoverable per-dwelling problem. Reported alongside results instead of
/// aborting the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("Data quality error at row {row} (small area {small_area}): {reason}")]
pub struct DataQualityError {
    pub row: usize,
    pub small_area: String,
    pub reason: String,
}

/// Wrap validator failures with the component (or operation) they belong to
pub fn from_validation_errors(
    context: impl Into<String>,
    errors: validator::ValidationErrors,
) -> RetrofitError {
    RetrofitError::validation(context, errors.to_string())
}

pub type Result<T, E = RetrofitError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_display_lists_columns() {
        let error = RetrofitError::Schema {
            missing: vec!["wall_area".to_string(), "roof_uvalue".to_string()],
            row: None,
        };
        assert_eq!(
            error.to_string(),
            "Schema error: missing column(s) [wall_area, roof_uvalue]"
        );
        assert!(error.is_schema());
    }

    #[test]
    fn test_validation_display_includes_row() {
        let error = RetrofitError::validation_at("wall", 3, "area cannot be negative");
        assert_eq!(
            error.to_string(),
            "Validation error in wall (row 3): area cannot be negative"
        );
        assert!(error.is_validation());
    }

    #[test]
    fn test_data_quality_display() {
        let issue = DataQualityError {
            row: 7,
            small_area: "268001001".to_string(),
            reason: "total floor area is zero".to_string(),
        };
        assert_eq!(
            issue.to_string(),
            "Data quality error at row 7 (small area 268001001): total floor area is zero"
        );
    }
}
