//! Showreel Admin library.
//!
//! The admin side of the portfolio treats a single GitHub gist file as its
//! database. This crate owns everything that touches that file:
//!
//! - [`gist`] - Remote document store (read, write, ownership check)
//! - [`session`] - Keeps the operator's credential between runs
//! - [`store`] - The in-memory document, its mutations and the login/save
//!   lifecycle
//! - [`video`] - `YouTube`/Vimeo metadata lookups used to pre-fill entries
//! - [`config`] - Environment configuration
//!
//! # Security
//!
//! The credential is a GitHub token with `gist` scope. It is wrapped in
//! [`secrecy::SecretString`] and never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod credential;
pub mod error;
pub mod gist;
pub mod session;
pub mod store;
pub mod video;

pub use credential::Credential;
pub use error::AdminError;
pub use store::{AdminStore, AuthState, Confirmation};
