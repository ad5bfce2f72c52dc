// File: src/report/layout.rs
//
// Pure grid layout of the monthly report. Nothing here touches the file
// system; the spreadsheet writer only copies cells, widths and the print
// area into a workbook.
//
// Layout (rows top to bottom):
//
//   User   | 01 Wed | 02 Thu | ...        <- day-keys in first-seen order
//   alice  |   4    |   0    | ...        <- users alphabetically, 0 if absent
//   ...
//   (blank)
//   Total score per user     Leaderboard
//   User  | Total         |  Rank | User  | Points
//   alice | 4             |   1   | bob   | 10      <- tiered highlight
//   ...

use unicode_width::UnicodeWidthStr;

use wordlebot_common::models::score::{DailyScores, Leaderboard, PlacementTier, Totals};

pub const COLUMN_PADDING: usize = 2;

pub const USER_HEADER: &str = "User";
pub const TOTAL_HEADER: &str = "Total";
pub const RANK_HEADER: &str = "Rank";
pub const POINTS_HEADER: &str = "Points";
pub const TOTALS_TITLE: &str = "Total score per user";
pub const LEADERBOARD_TITLE: &str = "Leaderboard";

/// Column where the leaderboard table starts (one blank column after totals).
const LEADERBOARD_COL: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Number(i64),
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }

    /// Terminal-style width: wide CJK and emoji glyphs count as two.
    fn display_width(&self) -> usize {
        match self {
            CellValue::Text(s) => s.width(),
            CellValue::Number(n) => n.to_string().len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Title,
    Header,
    RowLabel,
    Score,
    Placement(PlacementTier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub col: u16,
    /// Number of columns the cell covers; titles span their whole table.
    pub span: u16,
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    pub fn last_col(&self) -> u16 {
        self.col + self.span.max(1) - 1
    }
}

/// Inclusive rectangle enclosing every written cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintArea {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    cells: Vec<Cell>,
    column_widths: Vec<usize>,
    print_area: PrintArea,
}

impl ReportLayout {
    pub fn build(daily: &DailyScores, totals: &Totals, leaderboard: &Leaderboard) -> Self {
        let mut grid = GridBuilder::default();

        // 1) Day grid
        let days: Vec<&str> = daily.day_keys().collect();
        let users = daily.users_sorted();

        grid.text(0, 0, USER_HEADER, CellStyle::Header);
        for (d, day) in days.iter().enumerate() {
            grid.text(0, day_col(d), day, CellStyle::Header);
        }
        for (u, user) in users.iter().enumerate() {
            let row = u as u32 + 1;
            grid.text(row, 0, user, CellStyle::RowLabel);
            for (d, day) in days.iter().enumerate() {
                grid.number(row, day_col(d), daily.score(day, user), CellStyle::Score);
            }
        }

        // 2) Sub-tables, one blank row below the grid
        let title_row = users.len() as u32 + 2;
        let header_row = title_row + 1;

        grid.title(title_row, 0, 2, TOTALS_TITLE);
        grid.text(header_row, 0, USER_HEADER, CellStyle::Header);
        grid.text(header_row, 1, TOTAL_HEADER, CellStyle::Header);
        for (i, entry) in totals.sorted_by_user().into_iter().enumerate() {
            let row = header_row + 1 + i as u32;
            grid.text(row, 0, &entry.user, CellStyle::RowLabel);
            grid.number(row, 1, entry.total, CellStyle::Score);
        }

        grid.title(title_row, LEADERBOARD_COL, 3, LEADERBOARD_TITLE);
        grid.text(header_row, LEADERBOARD_COL, RANK_HEADER, CellStyle::Header);
        grid.text(header_row, LEADERBOARD_COL + 1, USER_HEADER, CellStyle::Header);
        grid.text(header_row, LEADERBOARD_COL + 2, POINTS_HEADER, CellStyle::Header);
        for (i, entry) in leaderboard.entries().iter().enumerate() {
            let row = header_row + 1 + i as u32;
            let (label_style, score_style) = match entry.tier {
                Some(tier) => (CellStyle::Placement(tier), CellStyle::Placement(tier)),
                None => (CellStyle::RowLabel, CellStyle::Score),
            };
            grid.number(row, LEADERBOARD_COL, entry.rank as i64, score_style);
            grid.text(row, LEADERBOARD_COL + 1, &entry.user, label_style);
            grid.number(row, LEADERBOARD_COL + 2, entry.total, score_style);
        }

        grid.finish()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Width of every column from 0 through the print area's last column.
    pub fn column_widths(&self) -> &[usize] {
        &self.column_widths
    }

    pub fn print_area(&self) -> PrintArea {
        self.print_area
    }
}

fn day_col(day_index: usize) -> u16 {
    day_index as u16 + 1
}

#[derive(Default)]
struct GridBuilder {
    cells: Vec<Cell>,
}

impl GridBuilder {
    fn put(&mut self, row: u32, col: u16, span: u16, value: CellValue, style: CellStyle) {
        self.cells.push(Cell {
            row,
            col,
            span,
            value,
            style,
        });
    }

    fn text(&mut self, row: u32, col: u16, text: &str, style: CellStyle) {
        self.put(row, col, 1, CellValue::Text(text.to_string()), style);
    }

    fn number(&mut self, row: u32, col: u16, n: i64, style: CellStyle) {
        self.put(row, col, 1, CellValue::Number(n), style);
    }

    fn title(&mut self, row: u32, col: u16, span: u16, text: &str) {
        self.put(row, col, span, CellValue::Text(text.to_string()), CellStyle::Title);
    }

    fn finish(self) -> ReportLayout {
        let last_row = self.cells.iter().map(|c| c.row).max().unwrap_or(0);
        let last_col = self.cells.iter().map(Cell::last_col).max().unwrap_or(0);

        let mut column_widths = vec![0usize; last_col as usize + 1];
        for cell in self.cells.iter().filter(|c| c.span <= 1) {
            let w = &mut column_widths[cell.col as usize];
            *w = (*w).max(cell.value.display_width());
        }
        for w in column_widths.iter_mut() {
            *w += COLUMN_PADDING;
        }

        // A spanning title must fit across its columns; any shortfall goes to the last one.
        for cell in self.cells.iter().filter(|c| c.span > 1) {
            let first = cell.col as usize;
            let last = cell.last_col() as usize;
            let spanned: usize = column_widths[first..=last].iter().sum();
            let needed = cell.value.display_width() + COLUMN_PADDING;
            if spanned < needed {
                column_widths[last] += needed - spanned;
            }
        }

        ReportLayout {
            cells: self.cells,
            column_widths,
            print_area: PrintArea {
                first_row: 0,
                first_col: 0,
                last_row,
                last_col,
            },
        }
    }
}
