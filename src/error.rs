//! Error types and handling for the trip planner

use thiserror::Error;

/// Main error type for the trip planner
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Exchange-rate source and other network errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Unknown city identifier
    #[error("City not found: {id}")]
    NotFound { id: String },

    /// No transport option fits the budget
    #[error("No transport from {from} to {to} fits a budget of {budget}")]
    NoAffordableTransport {
        from: String,
        to: String,
        budget: f64,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error for a city id
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            PlannerError::Api { .. } => {
                "Failed to load exchange rates. Please try again later.".to_string()
            }
            PlannerError::Validation { message } => message.clone(),
            PlannerError::NotFound { id } => format!("Unknown city: {id}"),
            PlannerError::NoAffordableTransport { .. } => {
                "No transport options fit your budget. Try a larger budget.".to_string()
            }
            PlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            PlannerError::General { .. } => {
                "An error occurred while planning your trip. Please try again.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        PlannerError::api(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for PlannerError {
    fn from(err: reqwest_middleware::Error) -> Self {
        PlannerError::api(err.to_string())
    }
}
