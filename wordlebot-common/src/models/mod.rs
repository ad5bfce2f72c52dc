pub mod message;
pub mod report;
pub mod score;
pub mod window;
