use crate::actors::messages::{AppError, CompletionRequest};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Defines the public interface for a remote chat-completion service.
///
/// This trait abstracts the specific provider, allowing AthenaMist, Gemini
/// or a test double to be used interchangeably by the assistant actor.
#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Generates a complete reply.
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError>;

    /// Generates a streaming reply, sending chunks of text as they are produced.
    ///
    /// Backends without streaming support send the whole reply as one chunk.
    async fn stream_complete(
        &self,
        request: CompletionRequest,
        chunk_sender: mpsc::Sender<Result<String, AppError>>,
    ) -> Result<(), AppError> {
        let text = self.complete(request).await?;
        let _ = chunk_sender.send(Ok(text)).await;
        Ok(())
    }

    /// Sends a trivial prompt and reports whether the service answered.
    async fn test_connection(&self) -> Result<(), AppError> {
        self.complete(CompletionRequest::new("Hello")).await.map(|_| ())
    }
}
