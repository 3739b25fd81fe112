// Adapters layer: concrete implementations for external systems.

pub mod slack;

pub use slack::{SlackClient, DEFAULT_API_BASE_URL};
