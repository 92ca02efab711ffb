//! Infrastructure layer providing external service integrations.
//!
//! Local key-value storage, the profile persistence adapter, environment
//! configuration, file logging and CSV export.

pub mod config;
pub mod export;
pub mod logging;
pub mod persistence;
pub mod storage;

pub use config::*;
pub use export::*;
pub use persistence::*;
pub use storage::*;
