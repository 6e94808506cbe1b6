use super::models::{LeaderboardEntry, PlayerState};

pub const DEFAULT_LEADERBOARD_SIZE: usize = 20;

/// Ranks players with at least one point, best first.
///
/// The sort is stable, so players with equal points keep the order of
/// `states`, which the tracker yields in first-seen order.
pub fn top_n(states: &[(String, PlayerState)], n: usize) -> Vec<LeaderboardEntry> {
    let mut scored: Vec<(&str, u32)> = states
        .iter()
        .filter(|(_, state)| state.points > 0)
        .map(|(name, state)| (name.as_str(), state.points))
        .collect();

    scored.sort_by(|(_, a), (_, b)| b.cmp(a));

    scored
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(index, (name, points))| LeaderboardEntry {
            rank: index + 1,
            name: name.to_string(),
            points,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_points(entries: &[(&str, u32)]) -> Vec<(String, PlayerState)> {
        entries
            .iter()
            .map(|(name, points)| {
                (
                    name.to_string(),
                    PlayerState {
                        points: *points,
                        ..PlayerState::default()
                    },
                )
            })
            .collect()
    }

    fn names(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn sorts_descending_and_ranks_from_one() {
        let states = with_points(&[("a", 1), ("b", 5), ("c", 3)]);

        let board = top_n(&states, DEFAULT_LEADERBOARD_SIZE);

        assert_eq!(names(&board), vec!["b", "c", "a"]);
        assert_eq!(
            board.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(board[0].points, 5);
    }

    #[test]
    fn excludes_players_without_points() {
        let states = with_points(&[("a", 0), ("b", 2), ("c", 0)]);

        let board = top_n(&states, 20);

        assert_eq!(names(&board), vec!["b"]);
    }

    #[test]
    fn equal_points_keep_first_seen_order() {
        let states = with_points(&[("C", 3), ("x", 1), ("D", 3)]);

        let board = top_n(&states, 20);

        assert_eq!(names(&board), vec!["C", "D", "x"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn truncates_to_requested_size() {
        let states: Vec<(String, PlayerState)> = (1..=30)
            .map(|i| {
                (
                    format!("player-{i}"),
                    PlayerState {
                        points: i,
                        ..PlayerState::default()
                    },
                )
            })
            .collect();

        let board = top_n(&states, DEFAULT_LEADERBOARD_SIZE);

        assert_eq!(board.len(), 20);
        assert_eq!(board[0].name, "player-30");
        assert_eq!(board[19].name, "player-11");
        assert_eq!(board[19].rank, 20);
    }

    #[test]
    fn empty_and_zero_sized_boards() {
        assert!(top_n(&[], 20).is_empty());
        assert!(top_n(&with_points(&[("a", 4)]), 0).is_empty());
    }
}
