//! # Error Types
//!
//! Structured error types for lldf_core. A distribution factor request either
//! produces a factor or one of these errors; the range-of-applicability and
//! refined-analysis variants are the only domain failures, the rest describe
//! malformed bridge data or file problems.
//!
//! ## Example
//!
//! ```rust
//! use lldf_core::errors::{LldfError, LldfResult};
//!
//! fn validate_span(span_ft: f64) -> LldfResult<()> {
//!     if span_ft <= 0.0 {
//!         return Err(LldfError::invalid_input(
//!             "span_length_ft",
//!             span_ft.to_string(),
//!             "Span length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_span(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lldf_core operations
pub type LldfResult<T> = Result<T, LldfError>;

/// Structured error type for distribution factor operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LldfError {
    /// An input value is invalid (negative length, zero girders, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A piece of bridge data required by the computation is missing
    #[error("Missing data: {what}")]
    MissingData { what: String },

    /// A span, pier, or girder index does not exist in the bridge model
    #[error("{what} index {index} is out of range (count = {count})")]
    IndexOutOfRange {
        what: String,
        index: usize,
        count: usize,
    },

    /// A closed-form equation was evaluated outside its documented bounds
    #[error("Range of applicability violated: {reason}")]
    RangeOfApplicability { reason: String },

    /// Distribution factors cannot be computed; the analysis pass is abandoned
    #[error(
        "Live Load Distribution Factors could not be calculated for the following reason\n{reason}\nA refined method of analysis is required for this bridge"
    )]
    RefinedAnalysisRequired { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl LldfError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        LldfError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingData error
    pub fn missing_data(what: impl Into<String>) -> Self {
        LldfError::MissingData { what: what.into() }
    }

    /// Create an IndexOutOfRange error
    pub fn index_out_of_range(what: impl Into<String>, index: usize, count: usize) -> Self {
        LldfError::IndexOutOfRange {
            what: what.into(),
            index,
            count,
        }
    }

    /// Create a RangeOfApplicability error
    pub fn range_of_applicability(reason: impl Into<String>) -> Self {
        LldfError::RangeOfApplicability { reason: reason.into() }
    }

    /// Create a RefinedAnalysisRequired error
    pub fn refined_analysis_required(reason: impl Into<String>) -> Self {
        LldfError::RefinedAnalysisRequired { reason: reason.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        LldfError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True when the error abandons the whole distribution factor analysis pass
    pub fn is_fatal(&self) -> bool {
        matches!(self, LldfError::RefinedAnalysisRequired { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LldfError::InvalidInput { .. } => "INVALID_INPUT",
            LldfError::MissingData { .. } => "MISSING_DATA",
            LldfError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            LldfError::RangeOfApplicability { .. } => "RANGE_OF_APPLICABILITY",
            LldfError::RefinedAnalysisRequired { .. } => "REFINED_ANALYSIS_REQUIRED",
            LldfError::FileError { .. } => "FILE_ERROR",
            LldfError::SerializationError { .. } => "SERIALIZATION_ERROR",
            LldfError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = LldfError::invalid_input("span_length_ft", "-5.0", "Span length must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("InvalidInput"));
        let roundtrip: LldfError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LldfError::missing_data("deck").error_code(), "MISSING_DATA");
        assert_eq!(
            LldfError::range_of_applicability("S > 16 ft").error_code(),
            "RANGE_OF_APPLICABILITY"
        );
    }

    #[test]
    fn test_only_refined_analysis_is_fatal() {
        assert!(LldfError::refined_analysis_required("Nb < 3").is_fatal());
        assert!(!LldfError::range_of_applicability("Nb < 3").is_fatal());
        assert!(!LldfError::index_out_of_range("Span", 4, 2).is_fatal());
    }

    #[test]
    fn test_refined_analysis_message() {
        let msg = LldfError::refined_analysis_required("Girder spacing 18.0 ft exceeds 16.0 ft").to_string();
        assert!(msg.starts_with("Live Load Distribution Factors could not be calculated"));
        assert!(msg.contains("Girder spacing 18.0 ft"));
        assert!(msg.contains("refined method of analysis"));
    }
}
