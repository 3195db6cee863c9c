use crate::card::Card;
use crate::error::BlackjackGameError;
use crate::hand;
use crate::shoe::Shoe;
use std::fmt::Display;

/// Balance given to a new player, and to a player who loses everything.
pub const DEFAULT_BALANCE: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player,
    Dealer,
}

/// What a successful call to `Participant::place_bet` means for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetOutcome {
    Placed(i64),
    /// A bet of zero, the player is leaving the table.
    Leave,
}

/// Results a participant has collected over the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Record {
    pub wins: u32,
    pub pushes: u32,
    pub losses: u32,
    pub blackjacks: u32,
}

impl Record {
    pub fn hands_played(&self) -> u32 {
        self.wins + self.pushes + self.losses
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 40;
        const TEXT_WIDTH: usize = "hands played:".len() + 10;
        const NUM_WIDTH: usize = WIDTH - TEXT_WIDTH;
        write!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
            "hands played:",
            self.hands_played(),
            "hands won:",
            self.wins,
            "hands pushed:",
            self.pushes,
            "hands lost:",
            self.losses,
            "blackjacks:",
            self.blackjacks,
        )
    }
}

/// Anyone seated at the table. The dealer is a participant with `Role::Dealer`, whose second card
/// stays hidden until the dealer's own turn.
#[derive(Debug, Clone)]
pub struct Participant {
    name: String,
    pub balance: i64,
    pub current_bet: i64,
    hand: Vec<Card>,
    pub turn_active: bool,
    pub doubled_down: bool,
    /// Set when the first two cards made 21, settled at showdown.
    pub natural: bool,
    /// True from a placed bet until it is settled.
    stake_open: bool,
    role: Role,
    hidden: bool,
    house_grant: i64,
    pub record: Record,
}

impl Participant {
    /// Associated function to seat a new player with `balance`.
    pub fn player(name: &str, balance: i64) -> Participant {
        Participant::new(name, balance, Role::Player)
    }

    pub fn dealer() -> Participant {
        let mut dealer = Participant::new("Dealer", 0, Role::Dealer);
        dealer.hidden = true;
        dealer
    }

    fn new(name: &str, balance: i64, role: Role) -> Participant {
        Participant {
            name: name.to_string(),
            balance,
            current_bet: 0,
            hand: Vec::new(),
            turn_active: false,
            doubled_down: false,
            natural: false,
            stake_open: false,
            role,
            hidden: false,
            house_grant: DEFAULT_BALANCE,
            record: Record::default(),
        }
    }

    /// Changes the amount granted when a loss empties the balance.
    pub fn with_house_grant(mut self, grant: i64) -> Participant {
        self.house_grant = grant;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_dealer(&self) -> bool {
        self.role == Role::Dealer
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn score(&self) -> u32 {
        hand::score(&self.hand)
    }

    pub fn has_blackjack(&self) -> bool {
        hand::is_blackjack(&self.hand)
    }

    pub fn busted(&self) -> bool {
        hand::is_bust(&self.hand)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn start_turn(&mut self) {
        self.turn_active = true;
    }

    pub fn end_turn(&mut self) {
        self.turn_active = false;
    }

    /// Validates and places a bet. A failed bet leaves balance, bet and turn untouched so the
    /// same prompt can simply be asked again.
    pub fn place_bet(&mut self, amount: i64) -> Result<BetOutcome, BlackjackGameError> {
        if amount < 0 || amount > self.balance {
            return Err(BlackjackGameError::InvalidBet {
                amount,
                balance: self.balance,
            });
        }
        self.turn_active = false;
        if amount == 0 {
            self.current_bet = 0;
            return Ok(BetOutcome::Leave);
        }
        self.balance -= amount;
        self.current_bet = amount;
        self.stake_open = true;
        Ok(BetOutcome::Placed(amount))
    }

    /// Matches the current bet a second time. Leaves everything unchanged when the balance can't
    /// cover it.
    pub fn double_down(&mut self) -> Result<(), BlackjackGameError> {
        if self.current_bet > self.balance {
            return Err(BlackjackGameError::InsufficientFunds {
                needed: self.current_bet,
                balance: self.balance,
            });
        }
        self.balance -= self.current_bet;
        self.current_bet *= 2;
        self.doubled_down = true;
        Ok(())
    }

    /// Halves a doubled bet back to the original stake so it can be offered again next round.
    pub fn restore_stake(&mut self) {
        if self.doubled_down {
            self.current_bet /= 2;
            self.doubled_down = false;
        }
    }

    /// Moves the top card of `shoe` into the hand. The card is in play until `clear_hand`.
    pub fn draw_card(&mut self, shoe: &mut Shoe) -> Result<Card, BlackjackGameError> {
        let card = shoe.draw()?;
        self.receive_card(card);
        Ok(card)
    }

    pub fn receive_card(&mut self, card: Card) {
        self.hand.push(card);
    }

    /// Pays the bet back plus an equal amount.
    pub fn resolve_win(&mut self) {
        self.balance = self
            .balance
            .saturating_add(self.current_bet.saturating_mul(2));
        self.stake_open = false;
        self.record.wins += 1;
    }

    /// Returns the bet.
    pub fn resolve_tie(&mut self) {
        self.balance = self.balance.saturating_add(self.current_bet);
        self.stake_open = false;
        self.record.pushes += 1;
    }

    /// The bet was already taken when it was placed. A player left with nothing is granted a fresh
    /// balance by the house, the return value says whether that happened.
    pub fn resolve_loss(&mut self) -> bool {
        self.stake_open = false;
        self.record.losses += 1;
        if self.balance <= 0 {
            self.balance = self.house_grant;
            return true;
        }
        false
    }

    pub fn has_open_stake(&self) -> bool {
        self.stake_open
    }

    /// Hands back a bet that was placed but never settled. Returns the amount refunded.
    pub fn refund_open_stake(&mut self) -> i64 {
        if !self.stake_open {
            return 0;
        }
        let refund = self.current_bet;
        self.balance += refund;
        self.stake_open = false;
        refund
    }

    /// Empties the hand, handing the cards back so they can go to the discard pile.
    pub fn clear_hand(&mut self) -> Vec<Card> {
        self.natural = false;
        std::mem::take(&mut self.hand)
    }

    pub fn hide(&mut self) {
        if self.is_dealer() {
            self.hidden = true;
        }
    }

    pub fn reveal(&mut self) {
        self.hidden = false;
    }

    /// The cards as they may be shown at the table, `None` stands for a face down card.
    pub fn visible_cards(&self) -> Vec<Option<Card>> {
        self.hand
            .iter()
            .enumerate()
            .map(|(i, card)| {
                if self.hidden && i == 1 {
                    None
                } else {
                    Some(*card)
                }
            })
            .collect()
    }
}

impl Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cards = self
            .visible_cards()
            .iter()
            .map(|card| match card {
                Some(c) => format!("{}", c),
                None => "**".to_string(),
            })
            .collect::<Vec<String>>()
            .join(", ");
        if self.hidden {
            write!(f, "{}'s cards: {}", self.name, cards)
        } else {
            write!(f, "{}'s cards: {} ({})", self.name, cards, self.score())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn negative_bet_is_rejected() {
        let mut player = Participant::player("ann", 100);
        player.start_turn();
        assert_eq!(
            player.place_bet(-5),
            Err(BlackjackGameError::InvalidBet {
                amount: -5,
                balance: 100
            })
        );
        assert_eq!(player.balance, 100);
        assert_eq!(player.current_bet, 0);
        assert!(player.turn_active);
    }

    #[test]
    fn bet_over_balance_is_rejected() {
        let mut player = Participant::player("ann", 100);
        assert!(player.place_bet(101).is_err());
        assert_eq!(player.balance, 100);
        assert_eq!(player.place_bet(100), Ok(BetOutcome::Placed(100)));
        assert_eq!(player.balance, 0);
        assert_eq!(player.current_bet, 100);
    }

    #[test]
    fn zero_bet_leaves() {
        for balance in [0, 1, 10_000] {
            let mut player = Participant::player("ann", balance);
            player.start_turn();
            assert_eq!(player.place_bet(0), Ok(BetOutcome::Leave));
            assert!(!player.turn_active);
            assert_eq!(player.current_bet, 0);
            assert_eq!(player.balance, balance);
        }
    }

    #[test]
    fn double_down_and_restore() {
        let mut player = Participant::player("ann", 300);
        player.place_bet(100).unwrap();
        player.double_down().unwrap();
        assert_eq!(player.balance, 100);
        assert_eq!(player.current_bet, 200);
        assert!(player.doubled_down);

        player.restore_stake();
        assert_eq!(player.current_bet, 100);
        assert!(!player.doubled_down);
        player.restore_stake();
        assert_eq!(player.current_bet, 100);
    }

    #[test]
    fn double_down_without_funds_is_unchanged() {
        let mut player = Participant::player("ann", 150);
        player.place_bet(100).unwrap();
        assert_eq!(
            player.double_down(),
            Err(BlackjackGameError::InsufficientFunds {
                needed: 100,
                balance: 50
            })
        );
        assert_eq!(player.balance, 50);
        assert_eq!(player.current_bet, 100);
        assert!(!player.doubled_down);
    }

    #[test]
    fn resolve_pays_out() {
        let mut player = Participant::player("ann", 1_000);
        player.place_bet(100).unwrap();
        player.resolve_win();
        assert_eq!(player.balance, 1_100);

        player.place_bet(100).unwrap();
        player.resolve_tie();
        assert_eq!(player.balance, 1_100);

        player.place_bet(100).unwrap();
        assert!(!player.resolve_loss());
        assert_eq!(player.balance, 1_000);
        assert_eq!(
            player.record,
            Record {
                wins: 1,
                pushes: 1,
                losses: 1,
                blackjacks: 0
            }
        );
    }

    #[test]
    fn losing_everything_triggers_house_grant() {
        let mut player = Participant::player("ann", 100);
        player.place_bet(100).unwrap();
        assert_eq!(player.balance, 0);
        assert!(player.resolve_loss());
        assert_eq!(player.balance, DEFAULT_BALANCE);

        let mut small_grant = Participant::player("bo", 10).with_house_grant(500);
        small_grant.place_bet(10).unwrap();
        assert!(small_grant.resolve_loss());
        assert_eq!(small_grant.balance, 500);
    }

    #[test]
    fn unsettled_stake_is_refunded_once() {
        let mut player = Participant::player("ann", 300);
        assert_eq!(player.refund_open_stake(), 0);
        player.place_bet(100).unwrap();
        player.double_down().unwrap();
        assert!(player.has_open_stake());
        assert_eq!(player.balance, 100);

        assert_eq!(player.refund_open_stake(), 200);
        assert_eq!(player.balance, 300);
        assert!(!player.has_open_stake());
        assert_eq!(player.refund_open_stake(), 0);
        assert_eq!(player.balance, 300);

        player.place_bet(50).unwrap();
        player.resolve_tie();
        assert_eq!(player.refund_open_stake(), 0);
        assert_eq!(player.balance, 300);
    }

    #[test]
    fn payouts_saturate_at_the_largest_balance() {
        let mut player = Participant::player("ann", i64::MAX);
        player.place_bet(10).unwrap();
        player.resolve_win();
        assert_eq!(player.balance, i64::MAX);

        player.place_bet(i64::MAX).unwrap();
        assert_eq!(player.balance, 0);
        player.resolve_win();
        assert_eq!(player.balance, i64::MAX);

        player.place_bet(5).unwrap();
        player.balance = i64::MAX;
        player.resolve_tie();
        assert_eq!(player.balance, i64::MAX);
    }

    #[test]
    fn draw_and_clear_hand() {
        let mut shoe = Shoe::with_rng(1, StdRng::seed_from_u64(3)).unwrap();
        let mut player = Participant::player("ann", 100);
        let first = player.draw_card(&mut shoe).unwrap();
        player.draw_card(&mut shoe).unwrap();
        assert_eq!(first, Card::new(Rank::Ace, Suit::Clubs));
        assert_eq!(player.hand().len(), 2);
        assert_eq!(shoe.live_len(), 50);
        assert_eq!(shoe.discard_len(), 0);

        let cards = player.clear_hand();
        assert!(player.hand().is_empty());
        shoe.discard(cards);
        assert_eq!(shoe.discard_len(), 2);
    }

    #[test]
    fn dealer_masks_second_card() {
        let mut shoe = Shoe::with_rng(1, StdRng::seed_from_u64(3)).unwrap();
        shoe.cut(8);
        let mut dealer = Participant::dealer();
        dealer.draw_card(&mut shoe).unwrap();
        dealer.draw_card(&mut shoe).unwrap();
        assert!(dealer.is_hidden());
        assert_eq!(format!("{}", dealer), "Dealer's cards: 9 ♣, **");

        dealer.reveal();
        assert_eq!(format!("{}", dealer), "Dealer's cards: 9 ♣, 10 ♣ (19)");

        dealer.hide();
        assert!(dealer.is_hidden());
        let mut player = Participant::player("ann", 1);
        player.hide();
        assert!(!player.is_hidden());
    }
}
