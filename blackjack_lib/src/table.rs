//! The round engine. Drives the seated players and the dealer through every round:
//! reshuffle check, bets, attrition, the deal, player turns, the dealer's turn, showdown and
//! discards, then asks whether the table plays again.
use crate::config::TableConfig;
use crate::console::{prompt_amount, prompt_yes_no, Terminal};
use crate::error::BlackjackGameError;
use crate::ledger::{BalanceLedger, LedgerEntry};
use crate::participant::{BetOutcome, Participant};
use crate::shoe::Shoe;
use std::fmt::Display;
use tracing::{debug, error, info, warn};

/// Steps of a single round, in the order they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ReshuffleCheck,
    Betting,
    Attrition,
    InitialDeal,
    Action,
    DealerAction,
    Showdown,
    Discard,
    Continuation,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::ReshuffleCheck => "reshuffle check",
            Phase::Betting => "betting",
            Phase::Attrition => "attrition",
            Phase::InitialDeal => "initial deal",
            Phase::Action => "player action",
            Phase::DealerAction => "dealer action",
            Phase::Showdown => "showdown",
            Phase::Discard => "discard",
            Phase::Continuation => "continuation",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Continue,
    /// Every player left during betting.
    TableEmpty,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The players declined another round.
    Quit,
    /// No players remained at the table.
    TableEmpty,
}

impl SessionOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionOutcome::Quit => 0,
            SessionOutcome::TableEmpty => 3,
        }
    }
}

/// Result of one player's hand against the dealer's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Win,
    Tie,
    Loss,
}

/// Decides a player's hand against the dealer's final hand. A busted player loses whatever the
/// dealer holds. A natural wins unless the dealer has one too.
pub fn settle(player: &Participant, dealer: &Participant) -> Settlement {
    if player.busted() {
        return Settlement::Loss;
    }
    if player.natural {
        return if dealer.has_blackjack() {
            Settlement::Tie
        } else {
            Settlement::Win
        };
    }
    let (score, dealer_score) = (player.score(), dealer.score());
    if dealer.busted() || score > dealer_score {
        Settlement::Win
    } else if score == dealer_score {
        Settlement::Tie
    } else {
        Settlement::Loss
    }
}

/// A single blackjack table. The queue always ends with the dealer.
pub struct BlackjackTable<T: Terminal, L: BalanceLedger> {
    shoe: Shoe,
    queue: Vec<Participant>,
    config: TableConfig,
    terminal: T,
    ledger: L,
    rounds_played: u32,
}

impl<T: Terminal, L: BalanceLedger> BlackjackTable<T, L> {
    /// Associated function to open a table with a freshly built shoe.
    pub fn new(config: TableConfig, terminal: T, ledger: L) -> Result<Self, BlackjackGameError> {
        let shoe = Shoe::new(config.num_decks)?;
        Ok(BlackjackTable::with_shoe(config, shoe, terminal, ledger))
    }

    /// Opens a table around an existing shoe. A shoe that already has its cut card is used in
    /// the order it is in, otherwise it is prepared when the session starts.
    pub fn with_shoe(config: TableConfig, shoe: Shoe, terminal: T, ledger: L) -> Self {
        BlackjackTable {
            shoe,
            queue: vec![Participant::dealer()],
            config,
            terminal,
            ledger,
            rounds_played: 0,
        }
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn dealer(&self) -> &Participant {
        &self.queue[self.queue.len() - 1]
    }

    pub fn players(&self) -> &[Participant] {
        &self.queue[..self.queue.len() - 1]
    }

    /// Every card the shoe is responsible for: undealt, discarded or held in a hand.
    pub fn cards_accounted(&self) -> usize {
        self.shoe.live_len()
            + self.shoe.discard_len()
            + self.queue.iter().map(|p| p.hand().len()).sum::<usize>()
    }

    /// Seats `name`, restoring the balance the ledger has for them.
    pub fn seat(&mut self, name: &str) -> Result<(), BlackjackGameError> {
        let balance = match self.ledger.lookup(name)? {
            Some(balance) => {
                self.terminal.display("Looks like you have a balance here.");
                self.terminal.display(&format!("You have {}\n", balance));
                if balance > 0 {
                    balance
                } else {
                    info!(name, balance, "house grant on return");
                    self.terminal
                        .display("Uh oh, looks like we took all your money!");
                    self.terminal.display(&format!(
                        "But it seems like someone donated ${} to you :D",
                        self.config.house_grant
                    ));
                    self.config.house_grant
                }
            }
            None => self.config.starting_balance,
        };
        info!(name, balance, "player seated");
        let player = Participant::player(name, balance).with_house_grant(self.config.house_grant);
        let dealer_idx = self.queue.len() - 1;
        self.queue.insert(dealer_idx, player);
        Ok(())
    }

    /// Asks how many players are joining and the name of each.
    pub fn seat_players(&mut self) -> Result<(), BlackjackGameError> {
        let count = loop {
            let n = prompt_amount(&mut self.terminal, "How many players at the table? ")?;
            if n >= 1 {
                break n;
            }
            self.terminal.display("There must be at least one player.");
        };
        for i in 0..count {
            let name = loop {
                let answer = self
                    .terminal
                    .prompt(&format!("What is player {}'s name? ", i + 1))?;
                let name = answer.trim().to_string();
                if name.is_empty() {
                    self.terminal.display("Please enter a name.");
                } else if self.players().iter().any(|p| p.name() == name) {
                    self.terminal.display("That name is already at the table.");
                } else {
                    break name;
                }
            };
            self.seat(&name)?;
        }
        Ok(())
    }

    /// Plays a whole session. If the input closes on the way, bets that were never settled are
    /// handed back and the players still seated are saved before the error is returned.
    pub fn run(&mut self) -> Result<SessionOutcome, BlackjackGameError> {
        match self.run_session() {
            Err(BlackjackGameError::InputClosed) => {
                warn!("input closed, saving seated players");
                self.refund_open_stakes();
                self.persist_players()?;
                Err(BlackjackGameError::InputClosed)
            }
            result => result,
        }
    }

    fn run_session(&mut self) -> Result<SessionOutcome, BlackjackGameError> {
        self.terminal.display("Welcome to terminal Blackjack!");
        if self.players().is_empty() {
            self.seat_players()?;
        }
        if !self.shoe.has_cut_card() {
            self.shoe.prepare();
        }

        loop {
            if self.play_round()? == RoundOutcome::TableEmpty {
                self.terminal.display("No players remain at the table.");
                return Ok(SessionOutcome::TableEmpty);
            }
            self.enter(Phase::Continuation);
            if !prompt_yes_no(&mut self.terminal, "Would you like to go again? (y/n) ")? {
                self.leave_table()?;
                return Ok(SessionOutcome::Quit);
            }
            self.prepare_next_round();
        }
    }

    /// Plays one round from the reshuffle check up to the discards.
    pub fn play_round(&mut self) -> Result<RoundOutcome, BlackjackGameError> {
        if self.rounds_played > 0 {
            self.enter(Phase::ReshuffleCheck);
            if self.shoe.reshuffle_if_due() {
                self.terminal.display("Shuffling the shoe...");
            }
        }

        self.enter(Phase::Betting);
        self.betting_phase()?;

        self.enter(Phase::Attrition);
        if self.attrition() == RoundOutcome::TableEmpty {
            return Ok(RoundOutcome::TableEmpty);
        }

        self.enter(Phase::InitialDeal);
        self.initial_deal()?;

        self.enter(Phase::Action);
        self.action_phase()?;

        self.enter(Phase::DealerAction);
        self.dealer_phase()?;

        self.enter(Phase::Showdown);
        self.showdown();

        self.enter(Phase::Discard);
        self.discard_phase();

        self.rounds_played += 1;
        let accounted = self.cards_accounted();
        if accounted != self.shoe.nominal_count() {
            error!(
                accounted,
                expected = self.shoe.nominal_count(),
                "cards went missing during the round"
            );
        }
        Ok(RoundOutcome::Continue)
    }

    fn enter(&self, phase: Phase) {
        debug!(round = self.rounds_played + 1, %phase, "entering phase");
    }

    fn betting_phase(&mut self) -> Result<(), BlackjackGameError> {
        let reuse = self.rounds_played > 0;
        let dealer_idx = self.queue.len() - 1;
        for player in self.queue[..dealer_idx].iter_mut() {
            if take_bet(&mut self.terminal, player, reuse)? == BetOutcome::Leave {
                self.terminal.display("Leaving Table...");
                farewell(&mut self.terminal, player);
                info!(name = player.name(), balance = player.balance, "player left");
                self.ledger
                    .save_all(&[LedgerEntry::new(player.name(), player.balance)])?;
            }
        }
        Ok(())
    }

    /// Rebuilds the queue without the players who left. Returns `TableEmpty` once only the
    /// dealer is left.
    fn attrition(&mut self) -> RoundOutcome {
        let queue = std::mem::take(&mut self.queue);
        self.queue = queue
            .into_iter()
            .filter(|p| p.is_dealer() || p.current_bet > 0)
            .collect();
        if self.queue.len() < 2 {
            RoundOutcome::TableEmpty
        } else {
            RoundOutcome::Continue
        }
    }

    /// Two full passes over the queue, one card each per pass.
    fn initial_deal(&mut self) -> Result<(), BlackjackGameError> {
        for _ in 0..2 {
            for participant in self.queue.iter_mut() {
                participant.draw_card(&mut self.shoe)?;
            }
        }
        Ok(())
    }

    fn action_phase(&mut self) -> Result<(), BlackjackGameError> {
        let dealer_idx = self.queue.len() - 1;
        let (players, dealer) = self.queue.split_at_mut(dealer_idx);
        for player in players.iter_mut() {
            play_turn(&mut self.terminal, &mut self.shoe, player, &dealer[0])?;
        }
        Ok(())
    }

    fn dealer_phase(&mut self) -> Result<(), BlackjackGameError> {
        let stands_on = self.config.dealer_stands_on;
        let dealer_idx = self.queue.len() - 1;
        let dealer = &mut self.queue[dealer_idx];
        dealer.start_turn();
        self.terminal
            .display(&format!("It is {}'s turn", dealer.name()));
        dealer.reveal();
        while dealer.score() < stands_on {
            dealer.draw_card(&mut self.shoe)?;
        }
        self.terminal.display(&format!("{}", dealer));
        if dealer.has_blackjack() {
            self.terminal.display("Dealer got Blackjack!");
        } else if dealer.busted() {
            self.terminal.display("Dealer busts!");
        }
        dealer.end_turn();
        Ok(())
    }

    fn showdown(&mut self) {
        let dealer_idx = self.queue.len() - 1;
        let (players, dealer) = self.queue.split_at_mut(dealer_idx);
        let dealer = &dealer[0];
        for player in players.iter_mut() {
            let settlement = settle(player, dealer);
            debug!(name = player.name(), ?settlement, "hand settled");
            match settlement {
                Settlement::Win => {
                    player.resolve_win();
                    self.terminal.display(&format!(
                        "{} wins with their hand and wins {}.",
                        player.name(),
                        player.current_bet
                    ));
                }
                Settlement::Tie => {
                    player.resolve_tie();
                    self.terminal
                        .display(&format!("{} ties with the dealer.", player.name()));
                }
                Settlement::Loss => {
                    let granted = player.resolve_loss();
                    self.terminal.display(&format!(
                        "{} loses with their hand and loses {}.",
                        player.name(),
                        player.current_bet
                    ));
                    if granted {
                        info!(name = player.name(), balance = player.balance, "house grant");
                        self.terminal
                            .display("Uh oh, looks like we took all your money!");
                        self.terminal.display(&format!(
                            "But it seems like someone donated ${} to you :D",
                            player.balance
                        ));
                    }
                }
            }
            self.terminal.display(&format!(
                "{} has ${} remaining.\n",
                player.name(),
                player.balance
            ));
        }
    }

    fn discard_phase(&mut self) {
        for participant in self.queue.iter_mut() {
            let cards = participant.clear_hand();
            self.shoe.discard(cards);
        }
    }

    /// Hides the dealer's hole card again and brings doubled bets back to their original stake.
    fn prepare_next_round(&mut self) {
        for participant in self.queue.iter_mut() {
            if participant.is_dealer() {
                participant.hide();
            } else {
                participant.restore_stake();
            }
        }
    }

    fn leave_table(&mut self) -> Result<(), BlackjackGameError> {
        self.terminal.display("Leaving table...");
        let dealer_idx = self.queue.len() - 1;
        for player in self.queue[..dealer_idx].iter() {
            farewell(&mut self.terminal, player);
        }
        self.persist_players()
    }

    fn refund_open_stakes(&mut self) {
        let dealer_idx = self.queue.len() - 1;
        for player in self.queue[..dealer_idx].iter_mut() {
            let refund = player.refund_open_stake();
            if refund > 0 {
                info!(name = player.name(), refund, "unsettled bet returned");
            }
        }
    }

    /// Saves the balance of every player still seated.
    pub fn persist_players(&mut self) -> Result<(), BlackjackGameError> {
        let entries: Vec<LedgerEntry> = self
            .players()
            .iter()
            .map(|p| LedgerEntry::new(p.name(), p.balance))
            .collect();
        if entries.is_empty() {
            return Ok(());
        }
        self.ledger.save_all(&entries)
    }
}

fn farewell<T: Terminal>(terminal: &mut T, player: &Participant) {
    terminal.display(&format!(
        "Goodbye {}, your total balance is {}",
        player.name(),
        player.balance
    ));
    if player.record.hands_played() > 0 {
        terminal.display(&format!("{}", player.record));
    }
}

/// Collects a bet from `player`. After the first round the previous stake is offered again, a
/// declined or unaffordable stake falls through to asking for an amount.
fn take_bet<T: Terminal>(
    terminal: &mut T,
    player: &mut Participant,
    reuse: bool,
) -> Result<BetOutcome, BlackjackGameError> {
    player.start_turn();
    if reuse && player.current_bet > 0 {
        let prior = player.current_bet;
        let question = format!(
            "{}, would you like to use the same bet as the previous round? (${}) (y/n) ",
            player.name(),
            prior
        );
        if prompt_yes_no(terminal, &question)? {
            match player.place_bet(prior) {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_recoverable() => terminal.display(&format!("{}", e)),
                Err(e) => return Err(e),
            }
        }
    }

    let question = format!(
        "{}, how much would you like to bet? (Bet 0 to leave) ",
        player.name()
    );
    while player.turn_active {
        let amount = prompt_amount(terminal, &question)?;
        match player.place_bet(amount) {
            Ok(outcome) => return Ok(outcome),
            Err(e) if e.is_recoverable() => terminal.display(&format!("{}", e)),
            Err(e) => return Err(e),
        }
    }
    Ok(BetOutcome::Placed(player.current_bet))
}

/// Plays one player's turn: a natural ends it straight away, otherwise a single double down is
/// offered before any hit, then hit or stand until the player stands or busts.
fn play_turn<T: Terminal>(
    terminal: &mut T,
    shoe: &mut Shoe,
    player: &mut Participant,
    dealer: &Participant,
) -> Result<(), BlackjackGameError> {
    player.start_turn();
    terminal.display(&format!("It is {}'s turn", player.name()));
    terminal.display(&format!("{}", dealer));
    terminal.display(&format!("{}", player));

    if player.has_blackjack() {
        terminal.display("Blackjack!");
        player.natural = true;
        player.record.blackjacks += 1;
        player.end_turn();
        return Ok(());
    }

    if prompt_yes_no(terminal, "Would you like to double down? (y/n) ")? {
        match player.double_down() {
            Ok(()) => {
                player.draw_card(shoe)?;
                terminal.display(&format!("{}", player));
                if player.busted() {
                    terminal.display("Busted!\n");
                } else {
                    terminal.display("This is your final hand.");
                    terminal.display(&format!("You have ${} remaining\n", player.balance));
                }
                player.end_turn();
                return Ok(());
            }
            Err(e) if e.is_recoverable() => terminal.display("Not enough funds"),
            Err(e) => return Err(e),
        }
    }

    while player.turn_active {
        if !prompt_yes_no(terminal, "Would you like to hit? (y/n) ")? {
            terminal.display(&format!("{} stands and ends their turn", player.name()));
            player.end_turn();
            continue;
        }
        player.draw_card(shoe)?;
        terminal.display(&format!("{}", player));
        if player.busted() {
            terminal.display("Busted!\n");
            player.end_turn();
        }
    }
    Ok(())
}
