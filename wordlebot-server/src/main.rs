use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use wordlebot_common::models::report::ReportOutcome;
use wordlebot_core::Settings;
use wordlebot_core::platforms::discord::DiscordPlatform;
use wordlebot_core::report::LibreOfficeRasterizer;
use wordlebot_core::services::{ReportConfig, ReportService};
use wordlebot_core::utils::time::YearMonth;

const EXIT_NO_DATA: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser, Debug, Clone)]
#[command(name = "wordlebot")]
#[command(author, version, about = "Monthly Wordle leaderboard from a Discord results channel")]
struct Args {
    /// Month to report on, as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    month: Option<String>,

    /// Directory for the spreadsheet and image (overrides WORDLE_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Render the report but do not post it to the channel
    #[arg(long, default_value = "false")]
    no_post: bool,

    /// Print the leaderboard summary as JSON on stdout
    #[arg(long, default_value = "false")]
    json: bool,
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let sub = fmt().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(sub).is_err() {
        eprintln!("tracing subscriber was already set");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let settings = Settings::from_env();
    init_tracing(
        settings
            .as_ref()
            .map(|s| s.log_level.as_str())
            .unwrap_or("info"),
    );

    let mut settings = match settings {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = args.output_dir.clone() {
        settings.output_dir = dir;
    }

    tokio::select! {
        result = run(args, settings) => match result {
            Ok(ReportOutcome::Rendered { artifact, image, .. }) => {
                info!("Report ready: {} / {}", artifact.display(), image.display());
                ExitCode::SUCCESS
            }
            Ok(ReportOutcome::NoData { month }) => {
                warn!("No Wordle results found for {month}; no report generated");
                ExitCode::from(EXIT_NO_DATA)
            }
            Err(e) => {
                error!("Report failed: {e:#}");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; discarding partial report");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

async fn run(args: Args, settings: Settings) -> anyhow::Result<ReportOutcome> {
    let month = match args.month.as_deref() {
        Some(raw) => raw.parse::<YearMonth>()?,
        None => YearMonth::current(settings.timezone),
    };
    info!(
        "wordlebot starting. month={}, tz={}, output_dir={}, post={}",
        month,
        settings.timezone,
        settings.output_dir.display(),
        !args.no_post
    );

    // 1) Resolve guild and channel before touching history
    let discord = Arc::new(DiscordPlatform::new(&settings)?);
    discord
        .resolve()
        .await
        .context("could not resolve the configured guild/channel")?;

    // 2) Build the pipeline
    let rasterizer = Arc::new(LibreOfficeRasterizer::new(settings.soffice_binary.clone()));
    let mut service = ReportService::new(ReportConfig::from(&settings), discord.clone(), rasterizer);
    if !args.no_post {
        service = service.with_sink(discord);
    }

    // 3) Run and hand off
    let outcome = service.run(month).await?;
    if args.json {
        if let ReportOutcome::Rendered { summary, .. } = &outcome {
            println!("{}", summary.to_json()?);
        }
    }
    if service.deliver(&outcome).await? {
        info!("Report posted to the results channel");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["wordlebot"]).unwrap();
        assert!(args.month.is_none());
        assert!(!args.no_post);
        assert!(!args.json);
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from([
            "wordlebot",
            "--month",
            "2024-05",
            "--output-dir",
            "/tmp/wordle",
            "--no-post",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.month.as_deref(), Some("2024-05"));
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/wordle")));
        assert!(args.no_post);
        assert!(args.json);
    }
}
