// File: src/report/xlsx.rs

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use tracing::{debug, info};

use crate::Error;
use crate::report::layout::{Cell, CellStyle, CellValue, ReportLayout};
use wordlebot_common::models::score::PlacementTier;

pub const SHEET_NAME: &str = "Wordle";

const HEADER_FILL: u32 = 0xD9D9D9;
const GOLD_FILL: u32 = 0xFFD700;
const SILVER_FILL: u32 = 0xC0C0C0;
const BRONZE_FILL: u32 = 0xCD7F32;

struct Palette {
    title: Format,
    header: Format,
    row_label: Format,
    score: Format,
    first: Format,
    second: Format,
    third: Format,
}

impl Palette {
    fn new() -> Self {
        let bordered = Format::new().set_border(FormatBorder::Thin);
        let placement = |fill: u32| {
            bordered
                .clone()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(Color::RGB(fill))
        };

        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(13)
                .set_align(FormatAlign::Center),
            header: bordered
                .clone()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(Color::RGB(HEADER_FILL)),
            row_label: bordered.clone().set_bold(),
            score: bordered.clone().set_align(FormatAlign::Center),
            first: placement(GOLD_FILL),
            second: placement(SILVER_FILL),
            third: placement(BRONZE_FILL),
        }
    }

    fn for_style(&self, style: CellStyle) -> &Format {
        match style {
            CellStyle::Title => &self.title,
            CellStyle::Header => &self.header,
            CellStyle::RowLabel => &self.row_label,
            CellStyle::Score => &self.score,
            CellStyle::Placement(PlacementTier::First) => &self.first,
            CellStyle::Placement(PlacementTier::Second) => &self.second,
            CellStyle::Placement(PlacementTier::Third) => &self.third,
        }
    }
}

/// Writes a [`ReportLayout`] as a single-sheet `.xlsx` workbook.
pub struct SpreadsheetWriter;

impl SpreadsheetWriter {
    pub fn write(layout: &ReportLayout, path: &Path) -> Result<PathBuf, Error> {
        let palette = Palette::new();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for cell in layout.cells() {
            write_cell(sheet, cell, palette.for_style(cell.style))?;
        }

        for (col, width) in layout.column_widths().iter().enumerate() {
            sheet.set_column_width(col as u16, *width as f64)?;
        }

        let area = layout.print_area();
        sheet.set_print_area(area.first_row, area.first_col, area.last_row, area.last_col)?;
        sheet.set_print_fit_to_pages(1, 1);
        debug!(
            "Print area rows {}..={} cols {}..={}",
            area.first_row, area.last_row, area.first_col, area.last_col
        );

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        workbook.save(path)?;
        info!("Wrote report spreadsheet to {}", path.display());
        Ok(path.to_path_buf())
    }
}

fn write_cell(
    sheet: &mut rust_xlsxwriter::Worksheet,
    cell: &Cell,
    format: &Format,
) -> Result<(), Error> {
    if cell.span > 1 {
        sheet.merge_range(
            cell.row,
            cell.col,
            cell.row,
            cell.last_col(),
            &cell.value.display(),
            format,
        )?;
        return Ok(());
    }

    match &cell.value {
        CellValue::Text(s) => {
            sheet.write_string_with_format(cell.row, cell.col, s.as_str(), format)?;
        }
        CellValue::Number(n) => {
            sheet.write_number_with_format(cell.row, cell.col, *n as f64, format)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ranking::rank;
    use wordlebot_common::models::score::{DailyScores, ScoreEvent};

    #[test]
    fn test_writes_workbook_file() {
        let mut daily = DailyScores::new();
        daily.apply(&ScoreEvent::new("01 Wed", "alice", 4));
        daily.apply(&ScoreEvent::new("02 Thu", "bob", 10));
        let (totals, board) = rank(&daily);
        let layout = ReportLayout::build(&daily, &totals, &board);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.xlsx");
        let written = SpreadsheetWriter::write(&layout, &path).unwrap();

        assert_eq!(written, path);
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }
}
