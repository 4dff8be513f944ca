pub mod envelope;

pub use envelope::{AskRequest, ErrorEnvelope, ResultEnvelope};
