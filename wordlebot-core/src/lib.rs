// src/lib.rs

pub mod config;
pub mod platforms;
pub mod report;
pub mod services;
pub mod stats;
pub mod utils;

pub use config::Settings;
pub use wordlebot_common::error::Error;
