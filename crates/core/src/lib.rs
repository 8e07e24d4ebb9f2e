//! Showreel Core - Shared domain types.
//!
//! This crate provides the types that make up the portfolio document. It is
//! used by:
//! - `admin` - Loads, mutates and persists the document
//! - `cli` - Operator front end built on top of `admin`
//!
//! # Architecture
//!
//! The core crate contains only types and the document invariants - no I/O,
//! no HTTP clients. Every mutation of a [`Document`] goes through methods
//! defined here so the single-hero and unique-id rules hold wherever the
//! document is edited.
//!
//! # Modules
//!
//! - [`types`] - Entry ids, entries, the about/settings singletons and the
//!   document aggregate

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
