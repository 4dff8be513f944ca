pub mod providers;

pub use providers::{ChatProvider, ProviderError};
