use thiserror::Error;

/// Failure of one call through the [`Gateway`](crate::gateway::Gateway).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The response body was not JSON. Checked before the HTTP status.
    #[error("Server returned invalid response.")]
    Protocol {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    /// Non-success status, or a success status with an embedded `error` member.
    #[error("{message}")]
    Request { status: u16, message: String },
    /// The call succeeded but the envelope lacks a member the caller requires.
    #[error("{message}")]
    Application { message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Protocol { status, .. } | GatewayError::Request { status, .. } => {
                Some(*status)
            }
            GatewayError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field `{field}` is not showing its display element")]
    NotDisplayed { field: &'static str },
    #[error("field `{field}` is not being edited")]
    NotEditing { field: &'static str },
    #[error("field `{field}` has no update in flight")]
    NotSubmitting { field: &'static str },
    #[error("field `{field}` was discarded by a page reload")]
    Discarded { field: &'static str },
    #[error("update of field `{field}` failed: {source}")]
    Submit {
        field: &'static str,
        #[source]
        source: GatewayError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("page does not carry a `{meta}` meta tag")]
    MissingSlug { meta: &'static str },
    #[error("invalid selector `{selector}`: {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },
}
