use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid {field} '{value}': {reason}")]
    Parse {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Admin password does not match")]
    Unauthorized,

    #[error("Ledger file {}: {source}", .path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl LedgerError {
    pub fn parse(field: &str, value: &str, reason: impl ToString) -> Self {
        LedgerError::Parse {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn store(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        LedgerError::Store {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = LedgerError::parse("date", "2024-13-01", "input is out of range");
        assert_eq!(
            err.to_string(),
            "Invalid date '2024-13-01': input is out of range"
        );
    }

    #[test]
    fn test_validation_joins_all_messages() {
        let err = LedgerError::Validation(vec![
            "nickname is required".to_string(),
            "rank must be at least 1".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid input: nickname is required; rank must be at least 1"
        );
    }
}
