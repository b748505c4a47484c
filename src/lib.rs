//! grammophon-import library interface
//!
//! Exposes the archive loader, rate limiter, Notion client, and sequencer
//! for integration testing.

pub mod archive;
pub mod config;
pub mod error;
pub mod migrate;
pub mod notion;
pub mod rate_limit;

pub use crate::error::{Error, Result};
