pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod prompt;
pub mod screen;
pub mod services;
pub mod session;
pub mod terminal;

pub use error::{ApiError, DashboardError, SessionError};
pub use screen::{Dependencies, MountOutcome, SecurityHome};
