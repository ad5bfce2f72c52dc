// File: wordlebot-common/src/traits/api.rs
//
// Narrow collaborator interfaces used by the report pipeline. The pipeline
// itself never talks to Discord or spawns processes directly.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::Error;
use crate::models::message::ChatMessage;
use crate::models::report::ReportSummary;
use crate::models::window::TimeWindow;

/// Produces channel history for a window, oldest message first.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch_messages(&self, window: &TimeWindow) -> Result<Vec<ChatMessage>, Error>;
}

/// Turns a grid artifact into a raster image written at `image`.
///
/// Returns the path of the image it wrote, which must be `image`.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, artifact: &Path, image: &Path) -> Result<PathBuf, Error>;
}

/// Publishes finished report files somewhere users will see them.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn deliver(&self, summary: &ReportSummary, attachments: &[PathBuf]) -> Result<(), Error>;
}
