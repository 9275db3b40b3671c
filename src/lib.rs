//! Keyboard-driven calculator core with AI-generated explanations.
//!
//! The calculator itself is synchronous and deterministic; only the
//! [`ai`] requests run in the background. [`app::Controller`] ties the
//! pieces together for a front end.

pub mod ai;
pub mod app;
pub mod calculator;
pub mod config;
pub mod history;
pub mod ui;
