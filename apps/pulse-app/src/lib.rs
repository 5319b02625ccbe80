//! # Pulse App
//!
//! Composition root, configuration, telemetry and the view-state reducers
//! of the Pulse client.

pub mod config;
pub mod render;
pub mod screens;
pub mod seed;
pub mod state;
pub mod telemetry;
