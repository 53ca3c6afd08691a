//! The tile collection: creation, random no-repeat target placement, and
//! per-round reset. Randomness is injected so every sample is reproducible
//! under a fixed seed.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::card::Card;

/// A fixed `size × size` board of cards, row-major. Owned exclusively by one
/// mode engine and rebuilt wholesale when the size changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cards: Vec<Card>,
}

impl Grid {
    /// Allocate `size²` inert cards.
    pub fn build(size: usize) -> Self {
        Self {
            size,
            cards: vec![Card::default(); size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn area(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.cards.get_mut(index)
    }

    /// Clear per-round card state without reallocating.
    pub fn reset_round(&mut self) {
        for card in &mut self.cards {
            card.reset();
        }
    }

    /// Sample `count` unique target indices uniformly without replacement,
    /// avoiding `exclude` when possible.
    ///
    /// When the exclusion leaves fewer than `count` candidates, sampling
    /// falls back to the full index space: positions from the prior round
    /// may then repeat, but the returned indices are still unique.
    pub fn choose_targets(
        &self,
        rng: &mut impl Rng,
        count: usize,
        exclude: &BTreeSet<usize>,
    ) -> BTreeSet<usize> {
        let count = count.min(self.area());
        let mut candidates: Vec<usize> =
            (0..self.area()).filter(|i| !exclude.contains(i)).collect();
        if candidates.len() < count {
            log::debug!(
                "exclusion leaves {} of {} candidates for {} targets, sampling full board",
                candidates.len(),
                self.area(),
                count
            );
            candidates = (0..self.area()).collect();
        }
        candidates.shuffle(rng);
        candidates.truncate(count);
        candidates.into_iter().collect()
    }

    /// Random permutation of the card indices, truncated to `len` — the
    /// ordered-recall modes tap these back in order.
    pub fn choose_sequence(&self, rng: &mut impl Rng, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.area()).collect();
        indices.shuffle(rng);
        indices.truncate(len.min(self.area()));
        indices
    }

    /// Mark the chosen cards as targets and every other card as not.
    pub fn apply_targets(&mut self, targets: &BTreeSet<usize>) {
        for (index, card) in self.cards.iter_mut().enumerate() {
            card.is_target = targets.contains(&index);
        }
    }

    /// Target cards not yet resolved.
    pub fn unresolved_targets(&self) -> usize {
        self.cards
            .iter()
            .filter(|card| card.is_target && !card.is_resolved)
            .count()
    }
}
