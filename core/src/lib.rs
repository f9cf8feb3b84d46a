//! Status counts for a Notion database, served as a small JSON summary.
//!
//! The HTTP contract lives in [`handle`]; the lambda and the dev server only
//! translate their request types into a method and an optional `key`.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod handler;
pub mod notion;
pub mod status;

pub use aggregate::aggregate;
pub use config::Config;
pub use error::{ConfigError, CountsError, ErrorBody};
pub use handler::{handle, CountsService, CountsSummary, CACHE_DIRECTIVE};
pub use notion::NotionClient;
pub use status::{StatusCounts, StatusValue, UNKNOWN_STATUS};
