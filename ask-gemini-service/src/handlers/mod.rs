//! HTTP handlers for the ask-gemini relay.

pub mod ask;
pub mod health;
