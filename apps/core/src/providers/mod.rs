//! Remote chat-completion services.
//!
//! Each client implements [`ChatBackend`](crate::actors::traits::ChatBackend)
//! over `reqwest`, with the per-request timeout taken from its settings.

pub mod athena_mist;
pub mod gemini;

pub use athena_mist::AthenaMistClient;
pub use gemini::GeminiClient;

use crate::error::AppError;
use reqwest::Response;
use tracing::error;

pub const USER_AGENT: &str = concat!("athena-agent/", env!("CARGO_PKG_VERSION"));

/// Pass through a successful response, turn anything else into `AppError::Api`.
pub(crate) async fn check_status(res: Response) -> Result<Response, AppError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    error!("API error {}: {}", status, body);
    Err(AppError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> Result<url::Url, AppError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Ok(url::Url::parse(&joined)?)
}
