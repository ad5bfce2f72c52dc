// File: src/stats/extractor.rs
//
// Turns the text of a results summary into per-user points.
//
// A summary looks like:
//
//   Your group is on a 5 day streak! Here are yesterday's results:
//   👑 3/6: <@111> <@222>
//   X/6: <@333>
//
// Users are matched by plain substring: a line credits every mentioned user
// whose id or display name appears anywhere in it. A display name contained in
// another user's name (or in unrelated line text) will also be credited.

use regex::Regex;
use tracing::trace;

use crate::Error;
use wordlebot_common::models::message::MentionedUser;

/// A message is only scanned if its text contains this marker.
pub const RESULTS_MARKER: &str = "results:";

/// Literal used by the poster for a failed puzzle.
pub const FAILURE_MARKER: char = 'X';

/// Outcome digit or failure marker, `/`, attempt limit, `:`.
const OUTCOME_PATTERN: &str = r"([1-6X])/[1-6]:";

/// How a puzzle ended for everyone on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeToken {
    Solved(u8),
    Failed,
}

impl OutcomeToken {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='6' => c.to_digit(10).map(|d| OutcomeToken::Solved(d as u8)),
            FAILURE_MARKER => Some(OutcomeToken::Failed),
            _ => None,
        }
    }

    /// Fixed scoring table. `None` for a solve count outside 1..=6.
    pub fn points(self) -> Option<i64> {
        match self {
            OutcomeToken::Solved(1) => Some(10),
            OutcomeToken::Solved(2) => Some(5),
            OutcomeToken::Solved(3) => Some(4),
            OutcomeToken::Solved(4) => Some(3),
            OutcomeToken::Solved(5) => Some(2),
            OutcomeToken::Solved(6) => Some(1),
            OutcomeToken::Solved(_) => None,
            OutcomeToken::Failed => Some(-1),
        }
    }
}

/// One line of a results message after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine<'a> {
    pub text: &'a str,
    pub outcome: Option<OutcomeToken>,
    pub users: Vec<&'a MentionedUser>,
}

impl ResultLine<'_> {
    /// `(display name, points)` for every referenced user; empty without a scorable outcome.
    pub fn contributions(&self) -> Vec<(String, i64)> {
        match self.outcome.and_then(OutcomeToken::points) {
            Some(points) => self
                .users
                .iter()
                .map(|u| (u.display_name.clone(), points))
                .collect(),
            None => Vec::new(),
        }
    }
}

pub struct ScoreExtractor {
    outcome: Regex,
}

impl ScoreExtractor {
    pub fn new() -> Result<Self, Error> {
        let outcome = Regex::new(OUTCOME_PATTERN)
            .map_err(|e| Error::Parse(format!("Invalid outcome pattern: {}", e)))?;
        Ok(Self { outcome })
    }

    pub fn is_results_message(&self, text: &str) -> bool {
        text.contains(RESULTS_MARKER)
    }

    /// First outcome token on the line, if the line follows the result grammar.
    pub fn outcome(&self, line: &str) -> Option<OutcomeToken> {
        let caps = self.outcome.captures(line)?;
        caps.get(1)
            .and_then(|m| m.as_str().chars().next())
            .and_then(OutcomeToken::from_char)
    }

    pub fn parse_line<'a>(&self, line: &'a str, mentions: &'a [MentionedUser]) -> ResultLine<'a> {
        let users = mentions
            .iter()
            .filter(|u| {
                (!u.id.is_empty() && line.contains(u.id.as_str()))
                    || (!u.display_name.is_empty() && line.contains(u.display_name.as_str()))
            })
            .collect();

        ResultLine {
            text: line,
            outcome: self.outcome(line),
            users,
        }
    }

    /// Points earned by each user referenced on a single line.
    pub fn extract(&self, line: &str, mentions: &[MentionedUser]) -> Vec<(String, i64)> {
        let parsed = self.parse_line(line, mentions);
        if parsed.outcome.is_none() {
            trace!("no outcome token in line {:?}", line);
        }
        parsed.contributions()
    }

    /// Runs [`Self::extract`] over every line of a results message.
    pub fn extract_message(&self, text: &str, mentions: &[MentionedUser]) -> Vec<(String, i64)> {
        if !self.is_results_message(text) {
            return Vec::new();
        }
        text.lines()
            .flat_map(|line| self.extract(line, mentions))
            .collect()
    }
}
