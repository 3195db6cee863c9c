//! Cards and the lookup tables that give them a point value and a printable suit.
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Hearts,
    Spades,
    Diamonds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

pub const SUITS: [Suit; 4] = [Suit::Clubs, Suit::Hearts, Suit::Spades, Suit::Diamonds];

pub const RANKS: [Rank; 13] = [
    Rank::Ace,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
];

lazy_static! {
    /// Base point value of every rank. Aces count 1 here, the scorer decides when they count 11.
    static ref RANK_VALUES: HashMap<Rank, u32> = {
        let mut values = HashMap::new();
        for (i, rank) in RANKS.iter().enumerate() {
            values.insert(*rank, u32::min(i as u32 + 1, 10));
        }
        values
    };

    static ref SUIT_GLYPHS: HashMap<Suit, &'static str> = {
        let mut glyphs = HashMap::new();
        glyphs.insert(Suit::Clubs, "♣");
        glyphs.insert(Suit::Hearts, "♥");
        glyphs.insert(Suit::Spades, "♠");
        glyphs.insert(Suit::Diamonds, "♦");
        glyphs
    };
}

impl Rank {
    /// Base point value of the rank, Ace = 1 and face cards = 10.
    pub fn value(&self) -> u32 {
        RANK_VALUES[self]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rank::Ace => "Ace",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl Suit {
    pub fn glyph(&self) -> &'static str {
        SUIT_GLYPHS[self]
    }
}

/// A single playing card. The value is always looked up from the rank, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    pub fn value(&self) -> u32 {
        self.rank.value()
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Rank::Ace
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.rank.label(), self.suit.glyph())
    }
}

/// One standard 52 card deck, suit by suit in the order clubs, hearts, spades, diamonds.
pub fn standard_deck() -> Vec<Card> {
    SUITS
        .iter()
        .flat_map(|suit| RANKS.iter().map(move |rank| Card::new(*rank, *suit)))
        .collect()
}
