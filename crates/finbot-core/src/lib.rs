//! Core domain + application logic for the financial assistant bot.
//!
//! This crate is intentionally framework-agnostic. Telegram / Gemini /
//! SerpAPI / SMTP live behind ports (traits) implemented in adapter crates.

pub mod classifier;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod errors;
pub mod generation;
pub mod loan;
pub mod logging;
pub mod mail;
pub mod news;

pub use errors::{Error, Result};
