use thiserror::Error;

/// Transport-level failures. A 401 is split out from the generic HTTP
/// case because it ends the session process-wide rather than being
/// handled by the calling component.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("network: {0}")]
    Network(#[from] wreq::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
