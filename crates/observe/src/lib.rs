//! Initialization logic shared by the binaries: logging setup and a panic
//! hook that reports panics through the configured log format.

pub mod tracing;
