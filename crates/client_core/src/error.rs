use shared::domain::CourseId;
use thiserror::Error;

use crate::dialog::FormField;

/// Transport or HTTP failure talking to the courses backend.
///
/// No distinction is drawn between 4xx, 5xx, timeouts and decode failures;
/// `status` is kept for logging only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_network_error(.status, .message))]
pub struct NetworkError {
    pub status: Option<u16>,
    pub message: String,
}

impl NetworkError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

fn render_network_error(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("network error (HTTP {status}): {message}"),
        None => format!("network error: {message}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("course form is incomplete; missing {}", render_fields(.0))]
    Invalid(Vec<FormField>),
    #[error("cannot {action} a dialog that is {state}")]
    WrongState {
        action: &'static str,
        state: &'static str,
    },
    #[error("failed to save course {id}: {source}")]
    Save {
        id: CourseId,
        #[source]
        source: NetworkError,
    },
}

fn render_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}
