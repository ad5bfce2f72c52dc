pub mod aggregator;
pub mod extractor;
pub mod ranking;

pub use aggregator::{aggregate, Aggregator, AggregatorConfig};
pub use extractor::{OutcomeToken, ResultLine, ScoreExtractor};
pub use ranking::{leaderboard, rank, totals};
