pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod reducer;
pub mod service;

pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use service::ExtractionService;
