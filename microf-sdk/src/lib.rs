pub const PROJECT_NAME: &str = "microf";

pub mod actions;
pub mod batch;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod location;
pub mod pattern;
pub mod settings;
pub mod state;
pub mod stdx;
pub mod templates;
pub mod vendor;
