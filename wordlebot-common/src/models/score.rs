// File: wordlebot-common/src/models/score.rs

use serde::{Deserialize, Serialize};

/// A single scored contribution for one user on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub day_key: String,
    pub user: String,
    pub points: i64,
}

impl ScoreEvent {
    pub fn new(day_key: impl Into<String>, user: impl Into<String>, points: i64) -> Self {
        Self {
            day_key: day_key.into(),
            user: user.into(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserScore {
    pub user: String,
    pub points: i64,
}

/// All scores recorded under one day-key, in the order users first scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayScores {
    pub day_key: String,
    pub scores: Vec<UserScore>,
}

impl DayScores {
    pub fn new(day_key: impl Into<String>) -> Self {
        Self {
            day_key: day_key.into(),
            scores: Vec::new(),
        }
    }

    pub fn get(&self, user: &str) -> Option<i64> {
        self.scores.iter().find(|s| s.user == user).map(|s| s.points)
    }

    fn add(&mut self, user: &str, points: i64) {
        match self.scores.iter_mut().find(|s| s.user == user) {
            Some(entry) => entry.points += points,
            None => self.scores.push(UserScore {
                user: user.to_string(),
                points,
            }),
        }
    }
}

/// Two-level table: day-key => user => accumulated points.
///
/// Days keep the order in which they were first observed, which is the
/// column order of the rendered report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyScores {
    days: Vec<DayScores>,
}

impl DailyScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bucket for `day_key`, creating an empty one if needed.
    pub fn ensure_day(&mut self, day_key: &str) -> &mut DayScores {
        let idx = match self.days.iter().position(|d| d.day_key == day_key) {
            Some(idx) => idx,
            None => {
                self.days.push(DayScores::new(day_key));
                self.days.len() - 1
            }
        };
        &mut self.days[idx]
    }

    pub fn apply(&mut self, event: &ScoreEvent) {
        self.ensure_day(&event.day_key).add(&event.user, event.points);
    }

    pub fn days(&self) -> &[DayScores] {
        &self.days
    }

    pub fn day(&self, day_key: &str) -> Option<&DayScores> {
        self.days.iter().find(|d| d.day_key == day_key)
    }

    pub fn day_keys(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|d| d.day_key.as_str())
    }

    /// Score of `user` on `day_key`, zero when absent.
    pub fn score(&self, day_key: &str, user: &str) -> i64 {
        self.day(day_key).and_then(|d| d.get(user)).unwrap_or(0)
    }

    /// Every user in the table, in first-seen order.
    pub fn users(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for day in &self.days {
            for s in &day.scores {
                if !seen.contains(&s.user.as_str()) {
                    seen.push(&s.user);
                }
            }
        }
        seen
    }

    /// Every user in the table, sorted alphabetically.
    pub fn users_sorted(&self) -> Vec<&str> {
        let mut users = self.users();
        users.sort_unstable();
        users
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTotal {
    pub user: String,
    pub total: i64,
}

/// Per-user sums over the whole window, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    entries: Vec<UserTotal>,
}

impl Totals {
    pub fn from_entries(entries: Vec<UserTotal>) -> Self {
        Self { entries }
    }

    pub fn get(&self, user: &str) -> Option<i64> {
        self.entries.iter().find(|e| e.user == user).map(|e| e.total)
    }

    pub fn entries(&self) -> &[UserTotal] {
        &self.entries
    }

    pub fn sorted_by_user(&self) -> Vec<&UserTotal> {
        let mut sorted: Vec<&UserTotal> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.user.cmp(&b.user));
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Highlight class for the top three leaderboard rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementTier {
    First,
    Second,
    Third,
}

impl PlacementTier {
    pub fn from_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(PlacementTier::First),
            2 => Some(PlacementTier::Second),
            3 => Some(PlacementTier::Third),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user: String,
    pub total: i64,
    pub tier: Option<PlacementTier>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn podium(&self) -> impl Iterator<Item = &LeaderboardEntry> {
        self.entries.iter().filter(|e| e.tier.is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
