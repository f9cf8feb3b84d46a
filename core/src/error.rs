use http::StatusCode;
use serde::Serialize;


/// Everything that can end a counts request early.
#[derive(Debug, thiserror::Error)]
pub enum CountsError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Missing NOTION_TOKEN or DATABASE_ID env vars")]
    MissingConfiguration,
    #[error("Notion query failed with status {status}")]
    Upstream { status: u16, body: String },
    #[error("Pagination limit of {0} pages exceeded")]
    PageLimitExceeded(usize),
    #[error("Page {0} reported more results without a next_cursor")]
    MissingCursor(usize),
    #[error("Notion request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CountsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            Self::MethodNotAllowed | Self::Unauthorized | Self::MissingConfiguration => {
                ErrorBody::new(self.to_string())
            }
            Self::Upstream { status, body } => ErrorBody {
                error: "Notion query failed".to_string(),
                status: Some(*status),
                detail: Some(body.clone()),
            },
            Self::PageLimitExceeded(_) => ErrorBody {
                error: "Pagination limit exceeded".to_string(),
                status: None,
                detail: Some(self.to_string()),
            },
            Self::MissingCursor(_) => ErrorBody {
                error: "Pagination cursor missing".to_string(),
                status: None,
                detail: Some(self.to_string()),
            },
            Self::Request(e) => ErrorBody {
                error: "Server error".to_string(),
                status: None,
                detail: Some(e.to_string()),
            },
            Self::Json(e) => ErrorBody {
                error: "Server error".to_string(),
                status: None,
                detail: Some(e.to_string()),
            },
        }
    }
}


/// JSON payload of every error response: `{ error, [status], [detail] }`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), status: None, detail: None }
    }
}


#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{0} must be at least 1")]
    Zero(&'static str),
}
