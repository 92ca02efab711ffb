//! AyurDesk - Ayurvedic therapist dashboard library
//!
//! Therapist registration with a persisted profile, plus the schedule,
//! patient, request and feedback views of a terminal dashboard.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
