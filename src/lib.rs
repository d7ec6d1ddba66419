pub mod cache;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod paths;
pub mod prefix;
pub mod sparql;

pub use config::Config;
pub use error::{OntopathError, Result};
pub use paths::{explore, Path, Step};
pub use prefix::PrefixTable;
