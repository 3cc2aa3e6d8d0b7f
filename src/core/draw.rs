use crate::domain::catalog::Catalog;
use crate::domain::model::{Draw, DrawnCard, Spread, SpreadSize};
use crate::utils::error::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawOptions {
    /// Flip a fair coin per drawn card. Off means every card is upright.
    pub reversals: bool,
}

/// Draws cards from the catalog with an injected random source.
pub struct DrawEngine<R: Rng> {
    catalog: Arc<Catalog>,
    rng: R,
    options: DrawOptions,
}

impl DrawEngine<StdRng> {
    pub fn from_entropy(catalog: Arc<Catalog>, options: DrawOptions) -> Self {
        Self::new(catalog, StdRng::from_entropy(), options)
    }

    pub fn seeded(catalog: Arc<Catalog>, seed: u64, options: DrawOptions) -> Self {
        Self::new(catalog, StdRng::seed_from_u64(seed), options)
    }
}

impl<R: Rng> DrawEngine<R> {
    pub fn new(catalog: Arc<Catalog>, rng: R, options: DrawOptions) -> Self {
        Self {
            catalog,
            rng,
            options,
        }
    }

    /// Shuffle the whole catalog (Fisher–Yates) and keep the first `size` cards.
    /// A catalog smaller than the spread yields every card it has.
    pub fn draw(&mut self, size: SpreadSize) -> Result<Draw> {
        let mut deck: Vec<_> = self.catalog.cards().iter().collect();
        deck.shuffle(&mut self.rng);

        let reversals = self.options.reversals;
        let cards = deck
            .into_iter()
            .take(size.count())
            .map(|card| DrawnCard {
                card: card.clone(),
                reversed: reversals && self.rng.gen_bool(0.5),
            })
            .collect();

        let draw = Draw::new(cards)?;
        tracing::debug!(
            "🃏 Drew {} card(s): {:?}",
            draw.len(),
            draw.cards().iter().map(|c| c.card.index).collect::<Vec<_>>()
        );
        Ok(draw)
    }

    pub fn spread(&mut self, size: SpreadSize) -> Result<Spread> {
        let draw = self.draw(size)?;
        Spread::new(size, draw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Card;
    use std::collections::{HashMap, HashSet};

    fn engine(seed: u64, reversals: bool) -> DrawEngine<StdRng> {
        DrawEngine::seeded(Catalog::shared(), seed, DrawOptions { reversals })
    }

    #[test]
    fn test_draw_returns_requested_number_of_distinct_cards() {
        let mut engine = engine(7, false);
        for size in SpreadSize::ALL {
            for _ in 0..200 {
                let draw = engine.draw(size).unwrap();
                assert_eq!(draw.len(), size.count());

                let indices: HashSet<usize> = draw.cards().iter().map(|c| c.card.index).collect();
                assert_eq!(indices.len(), size.count());
                assert!(indices.iter().all(|i| *i < 22));
            }
        }
    }

    #[test]
    fn test_same_seed_same_draw() {
        let first = engine(42, true).draw(SpreadSize::Five).unwrap();
        let second = engine(42, true).draw(SpreadSize::Five).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_without_reversals_every_card_is_upright() {
        let mut engine = engine(3, false);
        for _ in 0..500 {
            let draw = engine.draw(SpreadSize::Five).unwrap();
            assert!(draw.cards().iter().all(|c| !c.reversed));
        }
    }

    #[test]
    fn test_reversals_produce_both_orientations() {
        let mut engine = engine(3, true);
        let mut reversed = 0;
        let mut upright = 0;
        for _ in 0..500 {
            for card in engine.draw(SpreadSize::Five).unwrap().cards() {
                if card.reversed {
                    reversed += 1;
                } else {
                    upright += 1;
                }
            }
        }
        // 2500 flips, expect roughly half each way
        assert!(reversed > 1000 && upright > 1000);
    }

    #[test]
    fn test_membership_is_uniform_chi_square() {
        let mut engine = engine(2024, false);
        let trials = 22_000;
        let mut counts = [0u32; 22];
        for _ in 0..trials {
            for card in engine.draw(SpreadSize::Three).unwrap().cards() {
                counts[card.card.index] += 1;
            }
        }

        let expected = trials as f64 * 3.0 / 22.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        // 21 degrees of freedom, p = 0.001 critical value is ~46.8
        assert!(chi_square < 46.8, "chi-square too high: {}", chi_square);
    }

    #[test]
    fn test_every_permutation_is_reachable_and_balanced() {
        let cards = (0..3)
            .map(|index| Card {
                index,
                name: format!("Card {}", index),
                upright_meaning: String::new(),
                reversed_meaning: String::new(),
            })
            .collect();
        let catalog = Arc::new(Catalog::from_cards(cards));
        let mut engine = DrawEngine::seeded(catalog, 11, DrawOptions::default());

        let trials = 6_000;
        let mut counts: HashMap<Vec<usize>, u32> = HashMap::new();
        for _ in 0..trials {
            let order: Vec<usize> = engine
                .draw(SpreadSize::Three)
                .unwrap()
                .cards()
                .iter()
                .map(|c| c.card.index)
                .collect();
            *counts.entry(order).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 6);
        let expected = trials as f64 / 6.0;
        let chi_square: f64 = counts
            .values()
            .map(|&observed| (observed as f64 - expected).powi(2) / expected)
            .sum();
        // 5 degrees of freedom, p = 0.001 critical value is ~20.5
        assert!(chi_square < 20.5, "chi-square too high: {}", chi_square);
    }

    #[test]
    fn test_spread_wraps_draw() {
        let spread = engine(1, false).spread(SpreadSize::Three).unwrap();
        assert_eq!(spread.size(), SpreadSize::Three);
        assert_eq!(spread.draw().len(), 3);
    }
}
