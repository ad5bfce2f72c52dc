// tests/report_service_tests.rs
//
// Runs the whole report pipeline against mocked history, rasterizer and sink.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use mockall::mock;

use wordlebot_common::models::message::{ChatMessage, MentionedUser};
use wordlebot_common::models::report::{ReportOutcome, ReportSummary};
use wordlebot_common::models::window::TimeWindow;
use wordlebot_common::traits::api::{MessageSource, Rasterizer, ReportSink};
use wordlebot_core::Error;
use wordlebot_core::services::{ReportConfig, ReportService};
use wordlebot_core::stats::AggregatorConfig;
use wordlebot_core::utils::time::YearMonth;

mock! {
    pub Source {}

    #[async_trait]
    impl MessageSource for Source {
        async fn fetch_messages(&self, window: &TimeWindow) -> Result<Vec<ChatMessage>, Error>;
    }
}

mock! {
    pub Raster {}

    #[async_trait]
    impl Rasterizer for Raster {
        async fn rasterize(&self, artifact: &Path, image: &Path) -> Result<PathBuf, Error>;
    }
}

mock! {
    pub Sink {}

    #[async_trait]
    impl ReportSink for Sink {
        async fn deliver(&self, summary: &ReportSummary, attachments: &[PathBuf]) -> Result<(), Error>;
    }
}

const POSTER: &str = "4242";

fn report_config(dir: &Path) -> ReportConfig {
    ReportConfig {
        aggregator: AggregatorConfig {
            poster_id: POSTER.to_string(),
            timezone: Tz::UTC,
        },
        timezone: Tz::UTC,
        artifact_path: dir.join("wordle_stats.xlsx"),
        image_path: dir.join("wordle_stats.png"),
    }
}

fn results(id: u64, day: u32, content: &str) -> ChatMessage {
    ChatMessage {
        id,
        author_id: POSTER.to_string(),
        timestamp: Some(Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap()),
        content: content.to_string(),
        mentions: vec![
            MentionedUser::new("101", "alice"),
            MentionedUser::new("202", "bob"),
        ],
    }
}

/// Rasterizer stand-in that writes the requested image.
fn writing_rasterizer() -> MockRaster {
    let mut raster = MockRaster::new();
    raster.expect_rasterize().times(1).returning(|_, image| {
        std::fs::write(image, b"png")?;
        Ok(image.to_path_buf())
    });
    raster
}

#[tokio::test]
async fn test_month_with_results_renders_report() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let month: YearMonth = "2024-05".parse()?;

    let mut source = MockSource::new();
    source
        .expect_fetch_messages()
        .withf(move |w| {
            w.start == Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
                && w.end == Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        })
        .times(1)
        .returning(|_| {
            Ok(vec![
                results(1, 7, "Here are yesterday's results:\n👑 3/6: <@101> <@202>\n"),
                results(2, 8, "Here are yesterday's results:\nX/6: <@101>\n2/6: <@202>"),
                ChatMessage {
                    id: 3,
                    author_id: "999".into(),
                    timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 8, 9, 0, 0).unwrap()),
                    content: "results: 1/6: <@101>".into(),
                    mentions: vec![MentionedUser::new("101", "alice")],
                },
            ])
        });

    let service = ReportService::new(
        report_config(dir.path()),
        Arc::new(source),
        Arc::new(writing_rasterizer()),
    );
    let outcome = service.run(month).await?;

    let ReportOutcome::Rendered { artifact, image, summary } = outcome else {
        panic!("expected a rendered report");
    };
    assert!(artifact.exists());
    assert!(image.exists());
    assert_eq!(summary.month, "2024-05");
    assert_eq!(summary.days, 2);

    let board: Vec<(usize, &str, i64)> = summary
        .leaderboard
        .entries()
        .iter()
        .map(|e| (e.rank, e.user.as_str(), e.total))
        .collect();
    assert_eq!(board, vec![(1, "bob", 9), (2, "alice", 3)]);
    Ok(())
}

#[tokio::test]
async fn test_month_without_results_reports_no_data() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let mut source = MockSource::new();
    source.expect_fetch_messages().times(1).returning(|_| {
        Ok(vec![ChatMessage {
            id: 1,
            author_id: "7".into(),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap()),
            content: "just chatting".into(),
            mentions: vec![],
        }])
    });
    let mut raster = MockRaster::new();
    raster.expect_rasterize().never();

    let service = ReportService::new(report_config(dir.path()), Arc::new(source), Arc::new(raster));
    let outcome = service.run("2024-05".parse()?).await?;

    assert_eq!(outcome, ReportOutcome::NoData { month: "2024-05".into() });
    assert!(!dir.path().join("wordle_stats.xlsx").exists());
    Ok(())
}

#[tokio::test]
async fn test_rasterization_failure_is_fatal_and_clears_stale_image() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let stale = dir.path().join("wordle_stats.png");
    std::fs::write(&stale, b"old")?;

    let mut source = MockSource::new();
    source
        .expect_fetch_messages()
        .returning(|_| Ok(vec![results(1, 3, "results:\n4/6: <@101>")]));
    let mut raster = MockRaster::new();
    raster
        .expect_rasterize()
        .times(1)
        .returning(|_, _| Err(Error::Rasterization("exit status 1".into())));

    let service = ReportService::new(report_config(dir.path()), Arc::new(source), Arc::new(raster));
    let err = service.run("2024-05".parse()?).await.unwrap_err();

    assert!(matches!(err, Error::Rasterization(_)));
    assert!(!stale.exists());
    Ok(())
}

#[tokio::test]
async fn test_image_at_unexpected_path_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = report_config(dir.path());
    config.image_path = dir.path().join("report.png");

    let mut source = MockSource::new();
    source
        .expect_fetch_messages()
        .returning(|_| Ok(vec![results(1, 3, "results:\n2/6: <@101>")]));

    // Hands back an older image named after the artifact instead of the requested one.
    let mut raster = MockRaster::new();
    raster
        .expect_rasterize()
        .withf(|_, image| image.file_name().is_some_and(|n| n == "report.png"))
        .times(1)
        .returning(|artifact, _| {
            let leftover = artifact.with_extension("png");
            std::fs::write(&leftover, b"old")?;
            Ok(leftover)
        });

    let service = ReportService::new(config, Arc::new(source), Arc::new(raster));
    let err = service.run("2024-05".parse()?).await.unwrap_err();
    assert!(matches!(err, Error::Rasterization(msg) if msg.contains("report.png")));
    Ok(())
}

#[tokio::test]
async fn test_source_errors_propagate() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut source = MockSource::new();
    source
        .expect_fetch_messages()
        .returning(|_| Err(Error::Configuration("channel 1 could not be resolved".into())));
    let mut raster = MockRaster::new();
    raster.expect_rasterize().never();

    let service = ReportService::new(report_config(dir.path()), Arc::new(source), Arc::new(raster));
    let err = service.run("2024-05".parse()?).await.unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    Ok(())
}

#[tokio::test]
async fn test_deliver_sends_image_and_artifact() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut source = MockSource::new();
    source
        .expect_fetch_messages()
        .returning(|_| Ok(vec![results(1, 3, "results:\n1/6: <@202>")]));

    let mut sink = MockSink::new();
    sink.expect_deliver()
        .withf(|summary, attachments| {
            summary.month == "2024-05"
                && attachments.len() == 2
                && attachments[0].extension().is_some_and(|e| e == "png")
                && attachments[1].extension().is_some_and(|e| e == "xlsx")
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let service = ReportService::new(
        report_config(dir.path()),
        Arc::new(source),
        Arc::new(writing_rasterizer()),
    )
    .with_sink(Arc::new(sink));

    let outcome = service.run("2024-05".parse()?).await?;
    assert!(service.deliver(&outcome).await?);

    let nothing = ReportOutcome::NoData { month: "2024-05".into() };
    assert!(!service.deliver(&nothing).await?);
    Ok(())
}
