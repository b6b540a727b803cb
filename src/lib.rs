pub mod aggregator;
pub mod app;
pub mod config;
pub mod controller;
pub mod detector;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod rollover;
pub mod state;
pub mod storage;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::{AppConfig, StepTuning};
pub use controller::{Controller, ControllerHandle, Event};
pub use state::AppState;
pub use storage::KeyValueStore;
