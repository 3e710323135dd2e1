//! Core domain + application logic for the collocations selector bot.
//!
//! This crate is intentionally framework-agnostic. Telegram lives behind a
//! port (trait) implemented in the adapter crate.

pub mod action;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod logging;
pub mod menu;
pub mod messaging;
pub mod selection;

pub use errors::{Error, Result};
