//! Application layer managing state and business workflows.
//!
//! The profile container owns the therapist record lifecycle; the
//! dashboard state coordinates the views around it.

pub mod profile;
pub mod state;

pub use profile::*;
pub use state::*;
