pub mod models;
pub mod records;
pub mod samples;
pub mod services;
pub mod errors;

pub use models::*;
pub use records::*;
pub use services::*;
pub use errors::*;
