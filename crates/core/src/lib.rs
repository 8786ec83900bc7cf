//! # Trainbook Core
//!
//! Domain model and booking engine: availability windows, the slots carved
//! out of them, and the booking state machine built on an exclusive slot
//! claim. Storage is reached only through the traits in [`store`].

pub mod allocation;
pub mod errors;
pub mod models;
pub mod services;
pub mod store;
