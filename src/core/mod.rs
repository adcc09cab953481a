//! Core library components.
//!
//! This module contains the reusable logic for authorizing callers and
//! running jobs. Nothing here depends on HTTP types.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod directory;
pub mod keys;
pub mod persist;
pub mod pipeline;
pub mod runner;
pub mod types;
pub mod validation;
