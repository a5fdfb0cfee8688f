//! Batch transport: wire schema plus the HTTP client seam.

pub mod client;
pub mod wire;

pub use client::{ConsoleApi, HttpApi, MockApi};
