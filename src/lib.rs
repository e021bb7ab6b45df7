//! Core library for the `streambench` CLI.
//!
//! `streambench` opens a long-lived satellite telemetry stream and reports,
//! once per interval, how late the data arrived, how much of it there was,
//! and whether it arrived in order. The crate exposes the building blocks the
//! binary is made of: CLI argument types, configuration loading, the
//! telemetry source, the windowed metrics engine, and report sinks.
pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod metrics;
pub mod sinks;
pub mod source;
