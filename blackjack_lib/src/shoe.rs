//! The shoe: every undealt card plus the discard pile waiting to be shuffled back in.
use crate::card::{standard_deck, Card, RANKS, SUITS};
use crate::error::BlackjackGameError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, info};

pub const CARDS_PER_DECK: usize = 52;

/// The cut card window of an eight deck shoe, scaled for other shoe sizes.
const THRESHOLD_DECKS: usize = 8;
const THRESHOLD_LOW: usize = 335;
const THRESHOLD_HIGH: usize = 355;

/// Cards are drawn from the front of `live`. Cards leaving a hand go to `discard` and stay there
/// until the discard pile reaches the reshuffle threshold.
#[derive(Debug)]
pub struct Shoe {
    live: VecDeque<Card>,
    discard: Vec<Card>,
    reshuffle_threshold: usize,
    num_decks: usize,
    cut_card_inserted: bool,
    rng: StdRng,
}

impl Shoe {
    /// Builds an unshuffled shoe of `num_decks` decks, shuffling from OS entropy.
    pub fn new(num_decks: usize) -> Result<Shoe, BlackjackGameError> {
        Shoe::with_rng(num_decks, StdRng::from_entropy())
    }

    /// Builds a shoe driven by the given generator. Used with a seeded `StdRng` in tests.
    pub fn with_rng(num_decks: usize, mut rng: StdRng) -> Result<Shoe, BlackjackGameError> {
        if num_decks == 0 {
            return Err(BlackjackGameError::InvalidConfig(
                "a shoe needs at least one deck".to_string(),
            ));
        }
        let low = THRESHOLD_LOW * num_decks / THRESHOLD_DECKS;
        let high = THRESHOLD_HIGH * num_decks / THRESHOLD_DECKS;
        let reshuffle_threshold = rng.gen_range(low..=high);
        let live = (0..num_decks).flat_map(|_| standard_deck()).collect();
        debug!(num_decks, reshuffle_threshold, "built shoe");

        Ok(Shoe {
            live,
            discard: Vec::new(),
            reshuffle_threshold,
            num_decks,
            cut_card_inserted: false,
            rng,
        })
    }

    /// Opening routine for a new session: shuffle, cut the shoe in half, then mark the reshuffle
    /// depth with an extra random card.
    pub fn prepare(&mut self) {
        self.shuffle();
        self.cut(self.live.len() / 2);
        let card = Card::new(
            RANKS[self.rng.gen_range(0..RANKS.len())],
            SUITS[self.rng.gen_range(0..SUITS.len())],
        );
        self.insert_cut_card(self.reshuffle_threshold, card);
    }

    pub fn shuffle(&mut self) {
        self.live.make_contiguous().shuffle(&mut self.rng);
    }

    /// Moves the first `position` cards to the bottom of the shoe.
    pub fn cut(&mut self, position: usize) {
        let position = usize::min(position, self.live.len());
        self.live.rotate_left(position);
    }

    /// Inserts `card` `position` cards from the top. Positions past the end land at the bottom.
    pub fn insert_cut_card(&mut self, position: usize, card: Card) {
        let position = usize::min(position, self.live.len());
        self.live.insert(position, card);
        self.cut_card_inserted = true;
    }

    pub fn draw(&mut self) -> Result<Card, BlackjackGameError> {
        self.live.pop_front().ok_or(BlackjackGameError::ShoeEmpty)
    }

    pub fn discard<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.discard.extend(cards);
    }

    pub fn reshuffle_due(&self) -> bool {
        self.discard.len() >= self.reshuffle_threshold
    }

    /// Shuffles the discard pile back into the shoe once it has reached the threshold.
    /// Returns true if a reshuffle happened.
    pub fn reshuffle_if_due(&mut self) -> bool {
        if !self.reshuffle_due() {
            return false;
        }
        info!(
            discarded = self.discard.len(),
            threshold = self.reshuffle_threshold,
            "reshuffling shoe"
        );
        self.live.extend(self.discard.drain(..));
        self.shuffle();
        true
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    pub fn threshold(&self) -> usize {
        self.reshuffle_threshold
    }

    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    pub fn has_cut_card(&self) -> bool {
        self.cut_card_inserted
    }

    /// Number of cards the shoe is responsible for, wherever they currently are.
    pub fn nominal_count(&self) -> usize {
        CARDS_PER_DECK * self.num_decks + usize::from(self.cut_card_inserted)
    }

    /// Cards still to be dealt, top first.
    pub fn live_cards(&self) -> impl Iterator<Item = &Card> {
        self.live.iter()
    }
}
