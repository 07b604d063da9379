//! Telegram adapter: dispatcher wiring plus per-update handlers.

pub mod handlers;
pub mod router;
