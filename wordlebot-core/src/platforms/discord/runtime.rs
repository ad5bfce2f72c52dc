use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use twilight_http::Client as HttpClient;
use twilight_http::client::ClientBuilder;
use twilight_model::http::attachment::Attachment;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker};

use crate::Error;
use crate::config::Settings;
use crate::platforms::discord::history::{absorb_page, sort_chronologically, to_chat_message, PAGE_SIZE};
use crate::utils::time::snowflake_floor;
use wordlebot_common::models::message::ChatMessage;
use wordlebot_common::models::report::ReportSummary;
use wordlebot_common::models::score::PlacementTier;
use wordlebot_common::models::window::TimeWindow;
use wordlebot_common::traits::api::{MessageSource, ReportSink};

/// Names of the guild and channel the report is built from.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub guild_name: String,
    pub channel_name: String,
}

/// Read-only view of one results channel plus the ability to post back to it.
pub struct DiscordPlatform {
    http: Arc<HttpClient>,
    guild_id: Id<GuildMarker>,
    channel_id: Id<ChannelMarker>,
}

impl DiscordPlatform {
    pub fn new(settings: &Settings) -> Result<Self, Error> {
        if settings.token.is_empty() {
            return Err(Error::Configuration("Discord token is empty".into()));
        }
        let guild_id = Id::<GuildMarker>::new_checked(settings.guild_id)
            .ok_or_else(|| Error::Configuration("guild id must be non-zero".into()))?;
        let channel_id = Id::<ChannelMarker>::new_checked(settings.channel_id)
            .ok_or_else(|| Error::Configuration("channel id must be non-zero".into()))?;

        let http = Arc::new(
            ClientBuilder::new()
                .token(settings.token.clone())
                .timeout(Duration::from_secs(30))
                .build(),
        );

        Ok(Self {
            http,
            guild_id,
            channel_id,
        })
    }

    /// Confirms the configured guild and channel exist and belong together.
    pub async fn resolve(&self) -> Result<ResolvedTarget, Error> {
        let guild = self
            .http
            .guild(self.guild_id)
            .await
            .map_err(|e| Error::Configuration(format!("guild {} could not be resolved: {e}", self.guild_id)))?
            .model()
            .await?;

        let channel = self
            .http
            .channel(self.channel_id)
            .await
            .map_err(|e| {
                Error::Configuration(format!("channel {} could not be resolved: {e}", self.channel_id))
            })?
            .model()
            .await?;

        if channel.guild_id != Some(self.guild_id) {
            return Err(Error::Configuration(format!(
                "channel {} does not belong to guild {}",
                self.channel_id, self.guild_id
            )));
        }

        let target = ResolvedTarget {
            guild_name: guild.name,
            channel_name: channel.name.unwrap_or_else(|| self.channel_id.to_string()),
        };
        info!("(DiscordPlatform) Using #{} in '{}'", target.channel_name, target.guild_name);
        Ok(target)
    }
}

#[async_trait]
impl MessageSource for DiscordPlatform {
    async fn fetch_messages(&self, window: &TimeWindow) -> Result<Vec<ChatMessage>, Error> {
        let mut collected = Vec::new();
        let mut cursor = snowflake_floor(window.start).saturating_sub(1).max(1);
        let mut pages = 0usize;

        loop {
            let after = Id::<MessageMarker>::new(cursor.max(1));
            let page = self
                .http
                .channel_messages(self.channel_id)
                .after(after)
                .limit(PAGE_SIZE)
                .await?
                .models()
                .await?;
            pages += 1;
            debug!("(DiscordPlatform) page {pages} after {cursor} => {} messages", page.len());

            let page: Vec<ChatMessage> = page.iter().map(to_chat_message).collect();
            match absorb_page(page, window, &mut collected) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        sort_chronologically(&mut collected);
        info!(
            "(DiscordPlatform) Fetched {} messages in {} pages for {} .. {}",
            collected.len(),
            pages,
            window.start,
            window.end
        );
        Ok(collected)
    }
}

#[async_trait]
impl ReportSink for DiscordPlatform {
    async fn deliver(&self, summary: &ReportSummary, attachments: &[PathBuf]) -> Result<(), Error> {
        let mut files = Vec::with_capacity(attachments.len());
        for (idx, path) in attachments.iter().enumerate() {
            let bytes = tokio::fs::read(path).await?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("attachment-{idx}"));
            files.push(Attachment::from_bytes(filename, bytes, idx as u64));
        }

        let content = announcement(summary);
        self.http
            .create_message(self.channel_id)
            .content(&content)
            .attachments(&files)
            .await
            .map_err(|e| Error::Platform(format!("Error sending Discord message: {e:?}")))?;

        info!("(DiscordPlatform) Posted report for {} with {} attachments", summary.month, files.len());
        Ok(())
    }
}

/// Message text posted together with the report files.
pub fn announcement(summary: &ReportSummary) -> String {
    let mut text = format!(
        "Wordle stats for {} ({} days with results)",
        summary.month, summary.days
    );
    for entry in summary.leaderboard.podium() {
        let medal = match entry.tier {
            Some(PlacementTier::First) => "🥇",
            Some(PlacementTier::Second) => "🥈",
            Some(PlacementTier::Third) => "🥉",
            None => continue,
        };
        text.push_str(&format!("\n{medal} {}: {}", entry.user, entry.total));
    }
    text
}
