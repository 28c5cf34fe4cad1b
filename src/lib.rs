pub mod config;
pub mod dashboard;
pub mod logging;
pub mod output;
pub mod predictor;
pub mod scoring;
pub mod stderr_buffer;
pub mod tui;
