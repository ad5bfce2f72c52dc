pub mod history;
pub mod runtime;

pub use runtime::{announcement, DiscordPlatform, ResolvedTarget};
