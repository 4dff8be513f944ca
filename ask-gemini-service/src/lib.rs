//! ask-gemini-service: relays a prompt and chat history to Gemini over a
//! single CORS-enabled HTTP endpoint.
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
