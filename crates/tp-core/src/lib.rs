//! Core domain + application logic for the Taina Poshta anonymous relay bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the storage
//! engine live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod conversation;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod model;
pub mod ports;
pub mod security;
pub mod service;
pub mod texts;
pub mod thread;
pub mod tokens;

pub use errors::{Error, Result};
pub use service::PostOffice;
