//! Winner selection for a finished round.

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

/// Minimum number of participants with a valid answer for a round to count.
pub const MIN_PLAYERS: usize = 2;

/// How a round ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FinishStatus {
    /// Fewer than [`MIN_PLAYERS`] participants answered.
    #[default]
    NotEnoughPlayers,
    /// Someone guessed at or below the price.
    Winner,
    /// Every guess was above the price.
    Draw,
}

/// Result of resolving a round.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Classification of the round.
    pub status: FinishStatus,
    /// Winning participant, only set when `status` is [`FinishStatus::Winner`].
    pub winner: Option<String>,
    /// Guess of the winning participant.
    pub winning_guess: Option<f64>,
}

/// Pick the participant whose guess is closest to `price` without going over.
///
/// `answers` is expected in submission order: on a tie the participant that
/// submitted the winning value first keeps the win.
pub fn resolve(answers: &IndexMap<String, f64>, price: f64) -> Resolution {
    if answers.len() < MIN_PLAYERS {
        return Resolution::default();
    }

    let best = answers
        .iter()
        .filter(|(_, guess)| **guess <= price)
        .fold(None::<(&String, f64)>, |best, (participant, guess)| match best {
            Some((_, current)) if *guess <= current => best,
            _ => Some((participant, *guess)),
        });

    match best {
        Some((participant, guess)) => Resolution {
            status: FinishStatus::Winner,
            winner: Some(participant.clone()),
            winning_guess: Some(guess),
        },
        None => Resolution {
            status: FinishStatus::Draw,
            winner: None,
            winning_guess: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
        entries
            .iter()
            .map(|(id, guess)| (id.to_string(), *guess))
            .collect()
    }

    #[test]
    fn empty_round_has_not_enough_players() {
        let resolution = resolve(&IndexMap::new(), 10.0);
        assert_eq!(resolution.status, FinishStatus::NotEnoughPlayers);
        assert_eq!(resolution.winner, None);
    }

    #[test]
    fn lone_player_never_wins() {
        for guess in [5.0, 10.0, 15.0] {
            let resolution = resolve(&answers(&[("lonely", guess)]), 10.0);
            assert_eq!(resolution.status, FinishStatus::NotEnoughPlayers);
            assert_eq!(resolution.winner, None);
        }
    }

    #[test]
    fn closest_guess_below_price_wins() {
        let resolution = resolve(&answers(&[("loser", 8.0), ("winner", 9.0)]), 10.0);
        assert_eq!(resolution.status, FinishStatus::Winner);
        assert_eq!(resolution.winner.as_deref(), Some("winner"));
        assert_eq!(resolution.winning_guess, Some(9.0));
    }

    #[test]
    fn exact_price_wins() {
        let resolution = resolve(&answers(&[("winner", 10.0), ("loser", 9.0)]), 10.0);
        assert_eq!(resolution.status, FinishStatus::Winner);
        assert_eq!(resolution.winner.as_deref(), Some("winner"));
    }

    #[test]
    fn overpriced_guesses_are_disqualified() {
        let resolution = resolve(
            &answers(&[("over", 10.5), ("winner", 2.0), ("way_over", 40.0)]),
            10.0,
        );
        assert_eq!(resolution.winner.as_deref(), Some("winner"));
    }

    #[test]
    fn all_overpriced_is_a_draw() {
        let resolution = resolve(&answers(&[("over1", 11.0), ("over2", 12.0)]), 10.0);
        assert_eq!(resolution.status, FinishStatus::Draw);
        assert_eq!(resolution.winner, None);
        assert_eq!(resolution.winning_guess, None);
    }

    #[test]
    fn tie_goes_to_first_submission() {
        let resolution = resolve(
            &answers(&[("first", 9.0), ("second", 9.0), ("low", 1.0)]),
            10.0,
        );
        assert_eq!(resolution.winner.as_deref(), Some("first"));
    }
}
