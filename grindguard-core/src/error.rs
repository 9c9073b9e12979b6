//! Typed error taxonomy for the orchestration layer.
//!
//! Core engines never fail on malformed records; this taxonomy exists so
//! exhausted fetches surface to the user as a classified, readable message
//! while the previous data snapshot stays on screen.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "NETWORK_ERROR")]
    Network,
    #[serde(rename = "API_FAILURE")]
    ApiFailure,
    #[serde(rename = "PARSE_ERROR")]
    Parse,
    #[serde(rename = "AUTH_ERROR")]
    Auth,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    /// Optional suggested next step shown to the user.
    pub action: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            retryable: false,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    /// User-readable rendering, one line per kind.
    pub fn user_message(&self) -> String {
        let action = self.action.as_deref();
        match self.kind {
            ErrorKind::ApiFailure => format!(
                "Failed to fetch judge data. {}",
                action.unwrap_or("Please try again later.")
            ),
            ErrorKind::Network => format!(
                "Network connection failed. {}",
                action.unwrap_or("Check your internet connection.")
            ),
            ErrorKind::Parse => format!(
                "Failed to process data. {}",
                action.unwrap_or("The data format may be incorrect.")
            ),
            ErrorKind::Auth => format!(
                "Authentication failed. {}",
                action.unwrap_or("Please check your judge username.")
            ),
            ErrorKind::Unknown => format!(
                "An unexpected error occurred. {}",
                action.unwrap_or("Please try again.")
            ),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}
