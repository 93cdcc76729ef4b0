pub mod api;
pub mod backend;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod retry;
pub mod validator;

pub use api::{create_router, AppState};
pub use backend::{BackendError, OllamaClient};
pub use config::{Config, LoggingConfig, OllamaConfig, ServerConfig};
pub use errors::*;
pub use models::*;
pub use prompt::build_flashcard_prompt;
pub use retry::{with_retry, RetryPolicy};
pub use validator::{parse_flashcard, ModelOutputError};
