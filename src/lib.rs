pub mod app;
pub mod config;
pub mod error;
pub mod market;
pub mod trading;

pub use config::ScannerConfig;
pub use error::ScanError;
