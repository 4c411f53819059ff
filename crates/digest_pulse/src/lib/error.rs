#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(&'static str),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Not a playlist URL: {0}")]
    InvalidPlaylistUrl(String),
    #[error("Enter a playlist URL")]
    MissingPlaylistUrl,
}
