//! Core types and trait definitions for the score-entry service.
//!
//! This crate is free of HTTP, git, and filesystem dependencies. The codec,
//! the compstate backend, and the server all depend on it.

pub mod competition;
pub mod error;
pub mod game;
pub mod repo;
pub mod score;

pub use error::{Error, LoadError, Result, SyncError, SyncStep};
