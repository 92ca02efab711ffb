use thiserror::Error;

/// Reasons a form submission is blocked before it reaches any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Select at least one {0}")]
    EmptySelection(&'static str),
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("{0} must be a time in HH:MM format")]
    InvalidTime(&'static str),
    #[error("{0} must be a date in YYYY-MM-DD format")]
    InvalidDate(&'static str),
    #[error("Please provide a comfort rating before submitting")]
    RatingRequired,
}

pub type ValidationResult<T> = Result<T, ValidationError>;
