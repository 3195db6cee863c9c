//! Hand scoring. Aces start at 11 and each one drops to 1 only while the total is over 21.
use crate::card::Card;

pub const BLACKJACK: u32 = 21;

/// Returns the best blackjack total for `hand`.
pub fn score(hand: &[Card]) -> u32 {
    let (total, _) = total_with_soft_aces(hand);
    total
}

/// Returns true for a two card 21.
pub fn is_blackjack(hand: &[Card]) -> bool {
    hand.len() == 2 && score(hand) == BLACKJACK
}

pub fn is_bust(hand: &[Card]) -> bool {
    score(hand) > BLACKJACK
}

/// Returns true if at least one ace in the hand is still being counted as 11.
pub fn is_soft(hand: &[Card]) -> bool {
    let (_, soft_aces) = total_with_soft_aces(hand);
    soft_aces > 0
}

fn total_with_soft_aces(hand: &[Card]) -> (u32, u32) {
    let mut soft_aces = 0;
    let mut total = 0;
    for card in hand {
        if card.is_ace() {
            soft_aces += 1;
            total += 11;
        } else {
            total += card.value();
        }
    }
    while total > BLACKJACK && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    (total, soft_aces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit, RANKS, SUITS};
    use proptest::prelude::*;

    fn hand(ranks: &[Rank]) -> Vec<Card> {
        ranks.iter().map(|r| Card::new(*r, Suit::Spades)).collect()
    }

    #[test]
    fn ace_king_is_blackjack() {
        let cards = hand(&[Rank::Ace, Rank::King]);
        assert_eq!(score(&cards), 21);
        assert!(is_blackjack(&cards));
        assert!(is_soft(&cards));
    }

    #[test]
    fn ace_reduced_when_over() {
        let cards = hand(&[Rank::Ace, Rank::Six, Rank::King]);
        assert_eq!(score(&cards), 17);
        assert!(!is_soft(&cards));
        assert!(!is_blackjack(&cards));
    }

    #[test]
    fn three_card_twenty_one_is_not_blackjack() {
        let cards = hand(&[Rank::Seven, Rank::Seven, Rank::Seven]);
        assert_eq!(score(&cards), 21);
        assert!(!is_blackjack(&cards));
    }

    #[test]
    fn multiple_aces() {
        assert_eq!(score(&hand(&[Rank::Ace, Rank::Ace])), 12);
        assert_eq!(score(&hand(&[Rank::Ace, Rank::Ace, Rank::Nine])), 21);
        assert_eq!(score(&hand(&[Rank::Ace, Rank::Ace, Rank::Ace, Rank::Ace])), 14);
        assert_eq!(
            score(&hand(&[Rank::Ace, Rank::Nine, Rank::Ace, Rank::King])),
            21
        );
    }

    #[test]
    fn bust() {
        let cards = hand(&[Rank::King, Rank::Queen, Rank::Two]);
        assert_eq!(score(&cards), 22);
        assert!(is_bust(&cards));
        assert_eq!(score(&[]), 0);
    }

    fn arb_card() -> impl Strategy<Value = Card> {
        (0usize..13, 0usize..4).prop_map(|(r, s)| Card::new(RANKS[r], SUITS[s]))
    }

    proptest! {
        #[test]
        fn score_ignores_card_order(
            (cards, shuffled) in prop::collection::vec(arb_card(), 0..9)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            prop_assert_eq!(score(&cards), score(&shuffled));
        }

        #[test]
        fn aces_only_drop_when_needed(cards in prop::collection::vec(arb_card(), 0..9)) {
            let hard: u32 = cards.iter().map(|c| c.value()).sum();
            let aces = cards.iter().filter(|c| c.is_ace()).count() as u32;
            let total = score(&cards);
            prop_assert!(total >= hard);
            prop_assert_eq!((total - hard) % 10, 0);
            let still_eleven = (total - hard) / 10;
            prop_assert!(still_eleven <= aces);
            if still_eleven < aces {
                // one more ace at 11 would have busted the hand
                prop_assert!(total + 10 > BLACKJACK);
            }
        }
    }
}
