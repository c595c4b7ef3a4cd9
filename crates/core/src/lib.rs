//! Core types and shared functionality for mdrelay.
//!
//! This crate provides:
//! - Document cache trait with an in-memory backend
//! - Unified error types
//! - Configuration structures
//! - Document types and name validation

pub mod cache;
pub mod config;
pub mod document;
pub mod error;

pub use cache::{DocumentCache, KeyedLocks, MemoryCache};
pub use config::{AppConfig, ConfigError};
pub use document::{DocName, RawDocument, RenderedDocument};
pub use error::Error;
