// File: src/stats/aggregator.rs

use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::Error;
use crate::config::Settings;
use crate::stats::extractor::ScoreExtractor;
use crate::utils::time::day_key;
use wordlebot_common::models::message::ChatMessage;
use wordlebot_common::models::score::{DailyScores, ScoreEvent};

/// Which messages count and how their days are labelled.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub poster_id: String,
    pub timezone: Tz,
}

impl From<&Settings> for AggregatorConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            poster_id: settings.app_id.to_string(),
            timezone: settings.timezone,
        }
    }
}

/// Folds an ordered message stream into a [`DailyScores`] table.
pub struct Aggregator {
    config: AggregatorConfig,
    extractor: ScoreExtractor,
    table: DailyScores,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Result<Self, Error> {
        Ok(Self {
            config,
            extractor: ScoreExtractor::new()?,
            table: DailyScores::new(),
        })
    }

    /// Score events for one message; `None` if the message is not eligible.
    ///
    /// An eligible message always yields its day-key, even with no events.
    pub fn events_for(&self, msg: &ChatMessage) -> Option<(String, Vec<ScoreEvent>)> {
        if msg.author_id != self.config.poster_id {
            return None;
        }
        if !self.extractor.is_results_message(&msg.content) {
            debug!("Skipping message {} from poster: no results marker", msg.id);
            return None;
        }

        let day = match msg.timestamp {
            Some(ts) => day_key(ts, self.config.timezone),
            None => {
                warn!("Message {} has no usable timestamp; scoring it under an empty day-key", msg.id);
                String::new()
            }
        };

        let events = self
            .extractor
            .extract_message(&msg.content, &msg.mentions)
            .into_iter()
            .map(|(user, points)| ScoreEvent::new(day.clone(), user, points))
            .collect();
        Some((day, events))
    }

    pub fn ingest(&mut self, msg: &ChatMessage) {
        if let Some((day, events)) = self.events_for(msg) {
            self.table.ensure_day(&day);
            debug!("Message {} => {} score events for '{}'", msg.id, events.len(), day);
            for event in &events {
                self.table.apply(event);
            }
        }
    }

    pub fn finish(self) -> DailyScores {
        self.table
    }
}

/// Builds a fresh table from `messages` (oldest first).
pub fn aggregate<'a, I>(config: AggregatorConfig, messages: I) -> Result<DailyScores, Error>
where
    I: IntoIterator<Item = &'a ChatMessage>,
{
    let mut aggregator = Aggregator::new(config)?;
    for msg in messages {
        aggregator.ingest(msg);
    }
    Ok(aggregator.finish())
}
