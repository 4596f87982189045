//! Outbound text-completion services.

pub mod factory;
pub mod http_client;
pub mod openai;
pub mod scrub;
pub mod traits;

pub use factory::create_provider;
pub use openai::OpenAiProvider;
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::{GenerationParams, Provider};
