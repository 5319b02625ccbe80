//! # Pulse Core
//!
//! The domain layer of the Pulse client.
//! This crate contains the records, validation rules, ports and repositories.
//! It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod repository;

pub use error::{DomainError, SourceError};
