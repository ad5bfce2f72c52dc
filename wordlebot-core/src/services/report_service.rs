// File: src/services/report_service.rs
//
// Drives one report run: fetch -> aggregate -> rank -> render -> rasterize.
// Every step runs once, in order; nothing is kept between runs.

use std::path::PathBuf;
use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{info, warn};

use crate::Error;
use crate::config::Settings;
use crate::report;
use crate::stats::aggregator::{aggregate, AggregatorConfig};
use crate::stats::ranking::rank;
use crate::utils::time::YearMonth;
use wordlebot_common::models::report::{ReportOutcome, ReportSummary};
use wordlebot_common::traits::api::{MessageSource, Rasterizer, ReportSink};

/// Paths and filters one run needs, taken from [`Settings`].
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub aggregator: AggregatorConfig,
    pub timezone: Tz,
    pub artifact_path: PathBuf,
    pub image_path: PathBuf,
}

impl From<&Settings> for ReportConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            aggregator: AggregatorConfig::from(settings),
            timezone: settings.timezone,
            artifact_path: settings.artifact_path(),
            image_path: settings.image_path(),
        }
    }
}

pub struct ReportService {
    config: ReportConfig,
    source: Arc<dyn MessageSource>,
    rasterizer: Arc<dyn Rasterizer>,
    sink: Option<Arc<dyn ReportSink>>,
}

impl ReportService {
    pub fn new(
        config: ReportConfig,
        source: Arc<dyn MessageSource>,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Self {
        Self {
            config,
            source,
            rasterizer,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub async fn run(&self, month: YearMonth) -> Result<ReportOutcome, Error> {
        let window = month.window(self.config.timezone)?;
        info!("Building report for {} ({} .. {})", month, window.start, window.end);

        // 1) History
        let messages = self.source.fetch_messages(&window).await?;

        // 2) Aggregate
        let daily = aggregate(self.config.aggregator.clone(), &messages)?;
        if daily.is_empty() {
            info!("No results messages found for {}", month);
            return Ok(ReportOutcome::NoData {
                month: month.to_string(),
            });
        }

        // 3) Rank
        let (totals, leaderboard) = rank(&daily);
        info!(
            "{} days, {} players, leader: {}",
            daily.days().len(),
            totals.len(),
            leaderboard
                .entries()
                .first()
                .map(|e| format!("{} ({})", e.user, e.total))
                .unwrap_or_else(|| "-".to_string())
        );

        // 4) Render the grid artifact
        let artifact = report::render(&daily, &totals, &leaderboard, &self.config.artifact_path)?;

        // 5) Rasterize; an image left over from an earlier run must not survive a failure
        let expected = &self.config.image_path;
        if expected.exists() {
            warn!("Removing stale image {}", expected.display());
            std::fs::remove_file(expected)?;
        }
        let image = self.rasterizer.rasterize(&artifact, expected).await?;
        if &image != expected {
            return Err(Error::Rasterization(format!(
                "image written to {} instead of {}",
                image.display(),
                expected.display()
            )));
        }
        if !image.exists() {
            return Err(Error::Rasterization(format!(
                "expected image {} does not exist",
                image.display()
            )));
        }

        Ok(ReportOutcome::Rendered {
            artifact,
            image,
            summary: ReportSummary {
                month: month.to_string(),
                days: daily.days().len(),
                leaderboard,
            },
        })
    }

    /// Hands a rendered report to the sink. Returns `false` if there was nothing to send.
    pub async fn deliver(&self, outcome: &ReportOutcome) -> Result<bool, Error> {
        let (Some(sink), ReportOutcome::Rendered { artifact, image, summary }) = (&self.sink, outcome)
        else {
            return Ok(false);
        };
        sink.deliver(summary, &[image.clone(), artifact.clone()]).await?;
        Ok(true)
    }
}
