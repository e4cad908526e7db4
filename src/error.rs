#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ShopError {
    /// HTTP status code carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ShopError::Status { status, .. } => Some(*status),
            ShopError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Text suitable for a modal error dialog.
    pub fn user_message(&self) -> String {
        match self {
            ShopError::Http(e) if e.is_connect() || e.is_timeout() => {
                "Cannot connect to server. Please check your connection and ensure the API is running."
                    .to_string()
            }
            ShopError::Status { status: 400, body } => {
                if body.contains("Invalid") {
                    "Invalid email or password".to_string()
                } else {
                    body.clone()
                }
            }
            ShopError::Status { status: 500, .. } => {
                "Server error. Please try again later".to_string()
            }
            ShopError::Status { status, .. } => format!("Error: {}", status),
            ShopError::Unauthorized => "Please log in again.".to_string(),
            ShopError::Validation(msg) | ShopError::Upload(msg) | ShopError::NotFound(msg) => {
                msg.clone()
            }
            other => format!("An error occurred: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
