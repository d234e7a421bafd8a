//! Core domain + application logic for the pasos WhatsApp bot.
//!
//! This crate is intentionally framework-agnostic. The WhatsApp Cloud API and
//! the scraper live behind ports (traits) implemented in adapter crates.

pub mod classify;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod formatting;
pub mod grouping;
pub mod logging;
pub mod matcher;
pub mod messaging;
pub mod normalize;
pub mod paginate;
pub mod ports;

pub use errors::{Error, Result};
