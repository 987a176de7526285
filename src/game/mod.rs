// Game layer: session, configuration and the playable character

pub mod characters;
pub mod config;
pub mod render;
pub mod session;

pub use config::SessionConfig;
pub use session::{Controller, Session, SessionError};
