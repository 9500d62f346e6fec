pub mod config;
pub mod direction;
pub mod document;
pub mod error;
mod lenient;
pub mod rule;
pub mod scenario;
pub mod severity;
pub mod tag;

pub use config::ScreeningConfig;
pub use direction::*;
pub use document::*;
pub use error::*;
pub use rule::*;
pub use scenario::Scenario;
pub use severity::Severity;
pub use tag::*;
