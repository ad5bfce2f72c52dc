use wordlebot_common::models::score::{
    DailyScores, Leaderboard, LeaderboardEntry, PlacementTier, Totals, UserTotal,
};

/// Sum of every user's daily scores, in first-seen order.
pub fn totals(daily: &DailyScores) -> Totals {
    let entries = daily
        .users()
        .into_iter()
        .map(|user| UserTotal {
            user: user.to_string(),
            total: daily.day_keys().map(|day| daily.score(day, user)).sum(),
        })
        .collect();
    Totals::from_entries(entries)
}

/// Orders totals by points descending and numbers them 1..=N.
///
/// Equal totals keep their first-seen order and still get distinct ranks.
pub fn leaderboard(totals: &Totals) -> Leaderboard {
    let mut ordered: Vec<&UserTotal> = totals.entries().iter().collect();
    // sort_by is stable
    ordered.sort_by(|a, b| b.total.cmp(&a.total));

    let entries = ordered
        .into_iter()
        .enumerate()
        .map(|(idx, t)| LeaderboardEntry {
            rank: idx + 1,
            user: t.user.clone(),
            total: t.total,
            tier: PlacementTier::from_rank(idx + 1),
        })
        .collect();
    Leaderboard::from_entries(entries)
}

pub fn rank(daily: &DailyScores) -> (Totals, Leaderboard) {
    let totals = totals(daily);
    let board = leaderboard(&totals);
    (totals, board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordlebot_common::models::score::ScoreEvent;

    fn table(events: &[(&str, &str, i64)]) -> DailyScores {
        let mut daily = DailyScores::new();
        for (day, user, points) in events {
            daily.apply(&ScoreEvent::new(*day, *user, *points));
        }
        daily
    }

    #[test]
    fn test_totals_sum_all_days() {
        let daily = table(&[
            ("01 Wed", "alice", 4),
            ("01 Wed", "bob", 10),
            ("02 Thu", "alice", -1),
            ("03 Fri", "carol", 2),
        ]);
        let totals = totals(&daily);

        assert_eq!(totals.len(), 3);
        assert_eq!(totals.get("alice"), Some(3));
        assert_eq!(totals.get("bob"), Some(10));
        assert_eq!(totals.get("carol"), Some(2));
        for user in daily.users() {
            let sum: i64 = daily.day_keys().map(|d| daily.score(d, user)).sum();
            assert_eq!(totals.get(user), Some(sum));
        }
    }

    #[test]
    fn test_ranks_are_contiguous_and_descending() {
        let daily = table(&[
            ("01 Wed", "a", 1),
            ("01 Wed", "b", 5),
            ("01 Wed", "c", 3),
            ("02 Thu", "d", -1),
            ("02 Thu", "e", 10),
        ]);
        let (_, board) = rank(&daily);

        let ranks: Vec<usize> = board.entries().iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        for pair in board.entries().windows(2) {
            assert!(pair[0].total >= pair[1].total);
        }
        let users: Vec<&str> = board.entries().iter().map(|e| e.user.as_str()).collect();
        assert_eq!(users, vec!["e", "b", "c", "a", "d"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let daily = table(&[
            ("01 Wed", "zed", 10),
            ("01 Wed", "amy", 5),
            ("02 Thu", "amy", 5),
            ("02 Thu", "max", 12),
        ]);
        let (_, board) = rank(&daily);
        let entries = board.entries();

        assert_eq!(entries[0].user, "max");
        assert_eq!((entries[1].rank, entries[1].user.as_str()), (2, "zed"));
        assert_eq!((entries[2].rank, entries[2].user.as_str()), (3, "amy"));
        assert_eq!(entries[1].total, entries[2].total);

        // Repeated runs give the same order.
        assert_eq!(rank(&daily).1, board);
    }

    #[test]
    fn test_top_three_are_tiered() {
        let daily = table(&[
            ("01 Wed", "a", 4),
            ("01 Wed", "b", 3),
            ("01 Wed", "c", 2),
            ("01 Wed", "d", 1),
        ]);
        let (_, board) = rank(&daily);
        let tiers: Vec<Option<PlacementTier>> = board.entries().iter().map(|e| e.tier).collect();
        assert_eq!(
            tiers,
            vec![
                Some(PlacementTier::First),
                Some(PlacementTier::Second),
                Some(PlacementTier::Third),
                None
            ]
        );
        assert_eq!(board.podium().count(), 3);
    }

    #[test]
    fn test_empty_table_ranks_nothing() {
        let (totals, board) = rank(&DailyScores::new());
        assert!(totals.is_empty());
        assert!(board.is_empty());
    }
}
