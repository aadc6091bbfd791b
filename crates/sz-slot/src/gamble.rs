//! Gamble — red/black double-or-nothing on the last win

use serde::{Deserialize, Serialize};

use sz_core::{Credits, GameRng};

/// Card colour the player guesses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColor {
    Red,
    Black,
}

impl CardColor {
    /// Fair draw
    pub fn draw(rng: &mut GameRng) -> Self {
        if rng.coin() {
            CardColor::Red
        } else {
            CardColor::Black
        }
    }
}

/// Open gamble pot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GambleState {
    pub active: bool,
    /// Amount at risk
    pub amount: Credits,
    /// Consecutive rounds won since opening
    pub rounds_won: u32,
}

/// Result of one gamble round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GambleRound {
    Won { card: CardColor, amount: Credits },
    Lost { card: CardColor, forfeited: Credits },
}

impl GambleRound {
    pub fn card(&self) -> CardColor {
        match self {
            GambleRound::Won { card, .. } | GambleRound::Lost { card, .. } => *card,
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, GambleRound::Won { .. })
    }
}

impl GambleState {
    /// Put `amount` at risk
    pub fn open(amount: Credits) -> Self {
        Self {
            active: true,
            amount,
            rounds_won: 0,
        }
    }

    /// Resolve one guess against a drawn card
    pub fn play(&mut self, choice: CardColor, card: CardColor) -> GambleRound {
        if choice == card {
            self.amount = self.amount.times(2);
            self.rounds_won += 1;
            GambleRound::Won {
                card,
                amount: self.amount,
            }
        } else {
            let forfeited = self.amount;
            *self = GambleState::default();
            GambleRound::Lost { card, forfeited }
        }
    }

    /// Close and hand back the pot
    pub fn collect(&mut self) -> Credits {
        let amount = self.amount;
        *self = GambleState::default();
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_k_wins_doubles_k_times() {
        let start = Credits::from_minor(150);
        let mut gamble = GambleState::open(start);

        for k in 1..=8u32 {
            let round = gamble.play(CardColor::Red, CardColor::Red);
            assert!(round.is_win());
            assert_eq!(gamble.amount, start.times(1 << k));
            assert_eq!(gamble.rounds_won, k);
        }
    }

    #[test]
    fn test_loss_zeroes_and_closes() {
        let mut gamble = GambleState::open(Credits::from_minor(400));
        gamble.play(CardColor::Black, CardColor::Black);

        let round = gamble.play(CardColor::Black, CardColor::Red);
        assert_eq!(
            round,
            GambleRound::Lost {
                card: CardColor::Red,
                forfeited: Credits::from_minor(800)
            }
        );
        assert!(!gamble.active);
        assert_eq!(gamble.amount, Credits::ZERO);
    }

    #[test]
    fn test_collect_closes() {
        let mut gamble = GambleState::open(Credits::from_minor(50));
        assert_eq!(gamble.collect(), Credits::from_minor(50));
        assert_eq!(gamble, GambleState::default());
    }

    #[test]
    fn test_draw_is_roughly_fair() {
        let mut rng = GameRng::seeded(31);
        let reds = (0..20_000)
            .filter(|_| CardColor::draw(&mut rng) == CardColor::Red)
            .count();
        let ratio = reds as f64 / 20_000.0;
        assert!((ratio - 0.5).abs() < 0.02, "red ratio {}", ratio);
    }
}
