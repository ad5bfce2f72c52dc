pub mod layout;
pub mod rasterize;
pub mod xlsx;

use std::path::{Path, PathBuf};

use crate::Error;
use wordlebot_common::models::score::{DailyScores, Leaderboard, Totals};

pub use layout::{Cell, CellStyle, CellValue, PrintArea, ReportLayout};
pub use rasterize::LibreOfficeRasterizer;
pub use xlsx::SpreadsheetWriter;

/// Lays out the aggregated table and writes it as a spreadsheet at `path`.
pub fn render(
    daily: &DailyScores,
    totals: &Totals,
    leaderboard: &Leaderboard,
    path: &Path,
) -> Result<PathBuf, Error> {
    let layout = ReportLayout::build(daily, totals, leaderboard);
    SpreadsheetWriter::write(&layout, path)
}
