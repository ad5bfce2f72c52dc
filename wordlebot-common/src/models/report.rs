use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::score::Leaderboard;

/// What gets announced alongside a rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// `YYYY-MM` label of the reported month.
    pub month: String,
    pub days: usize,
    pub leaderboard: Leaderboard,
}

impl ReportSummary {
    /// Pretty-printed JSON for the `--json` output.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Terminal outcome of one report run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The window held no results message at all; nothing was written.
    NoData { month: String },
    Rendered {
        artifact: PathBuf,
        image: PathBuf,
        summary: ReportSummary,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::score::{LeaderboardEntry, PlacementTier};

    #[test]
    fn test_summary_json_carries_leaderboard() {
        let summary = ReportSummary {
            month: "2024-05".into(),
            days: 3,
            leaderboard: Leaderboard::from_entries(vec![LeaderboardEntry {
                rank: 1,
                user: "alice".into(),
                total: 12,
                tier: PlacementTier::from_rank(1),
            }]),
        };
        let json = summary.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["month"], "2024-05");
        assert_eq!(value["days"], 3);

        let back: ReportSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
