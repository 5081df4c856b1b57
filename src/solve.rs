//! Self play sessions that drive regret matching toward equilibrium
use crate::regret;
use crate::{MatrixGame, PlayerNum, StratError, Strategy};

/// Which players' per iteration strategies a session keeps
///
/// Averaged traces can only be recovered for recorded players. Recording is the only state that
/// grows with the iteration count, so long running sessions can turn it off and still read final
/// averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// Record no history
    Neither,
    /// Record only the first player's history
    One,
    /// Record only the second player's history
    Two,
    /// Record both players' histories
    Both,
}

impl Record {
    fn includes(&self, player: PlayerNum) -> bool {
        matches!(
            (self, player),
            (Record::Both, _) | (Record::One, PlayerNum::One) | (Record::Two, PlayerNum::Two)
        )
    }
}

/// Per player regret matching state
#[derive(Debug)]
struct PlayerState {
    cum_regret: Box<[f64]>,
    cum_strat: Box<[f64]>,
    strat: Box<[f64]>,
}

impl PlayerState {
    fn new(init: Strategy) -> Self {
        let num_actions = init.len();
        PlayerState {
            cum_regret: vec![0.0; num_actions].into_boxed_slice(),
            cum_strat: vec![0.0; num_actions].into_boxed_slice(),
            strat: init.0,
        }
    }
}

/// A regret matching self play session between two players of a [MatrixGame]
///
/// The session owns both players' evolving state and advances them in lockstep iterations. Raw
/// strategies chase the latest regret and can cycle forever; the time [average][Self::average] is
/// what converges to equilibrium.
///
/// # Examples
///
/// ```
/// use matrix_cfr::{MatrixGame, PlayerNum, Record, SelfPlay, Strategy};
///
/// let game = MatrixGame::rps();
/// let mut play = SelfPlay::new(
///     &game,
///     Strategy::uniform(3),
///     Strategy::uniform(3),
///     Record::Neither,
/// )
/// .unwrap();
/// play.run(100);
/// assert_eq!(play.iteration(), 100);
/// let total: f64 = play.average(PlayerNum::One).iter().sum();
/// assert!((total - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct SelfPlay<'a> {
    game: &'a MatrixGame,
    players: [PlayerState; 2],
    histories: [Vec<Strategy>; 2],
    scratch: Box<[f64]>,
    record: Record,
    frozen: Option<PlayerNum>,
    iteration: u64,
}

impl<'a> SelfPlay<'a> {
    /// Create a session where both players update
    ///
    /// # Errors
    ///
    /// Errors when either starting strategy doesn't have one probability per game action.
    pub fn new(
        game: &'a MatrixGame,
        one: Strategy,
        two: Strategy,
        record: Record,
    ) -> Result<Self, StratError> {
        SelfPlay::init(game, one, two, record, None)
    }

    /// Create a session where the frozen player never updates
    ///
    /// The frozen player keeps its starting strategy for the whole session while the other player
    /// regret matches against it, converging to a best response.
    ///
    /// # Errors
    ///
    /// Errors when either starting strategy doesn't have one probability per game action.
    pub fn with_frozen(
        game: &'a MatrixGame,
        one: Strategy,
        two: Strategy,
        record: Record,
        frozen: PlayerNum,
    ) -> Result<Self, StratError> {
        SelfPlay::init(game, one, two, record, Some(frozen))
    }

    fn init(
        game: &'a MatrixGame,
        one: Strategy,
        two: Strategy,
        record: Record,
        frozen: Option<PlayerNum>,
    ) -> Result<Self, StratError> {
        if one.len() != game.num_actions() || two.len() != game.num_actions() {
            return Err(StratError::WrongLength);
        }
        Ok(SelfPlay {
            game,
            players: [PlayerState::new(one), PlayerState::new(two)],
            histories: [Vec::new(), Vec::new()],
            scratch: vec![0.0; game.num_actions()].into_boxed_slice(),
            record,
            frozen,
            iteration: 0,
        })
    }

    /// Advance both players by one iteration
    ///
    /// The order within a step is part of the session's contract: the first player accrues regret
    /// against the second player's pre step strategy and regret matches, then the second player
    /// accrues regret against the first player's just updated strategy and regret matches. The
    /// second player always reacts a half step later, and keeping that order fixed is what makes
    /// session traces bit for bit reproducible. A frozen player skips its update entirely.
    pub fn step(&mut self) {
        let rows = self.game.rows();
        let [one, two] = &mut self.players;
        if self.frozen != Some(PlayerNum::One) {
            regret::immediate(rows, &one.strat, &two.strat, &mut self.scratch);
            regret::accumulate(&mut one.cum_regret, &self.scratch);
            regret::regret_match(&one.cum_regret, &mut one.strat);
        }
        if self.frozen != Some(PlayerNum::Two) {
            regret::immediate(rows, &two.strat, &one.strat, &mut self.scratch);
            regret::accumulate(&mut two.cum_regret, &self.scratch);
            regret::regret_match(&two.cum_regret, &mut two.strat);
        }
        for ((player, history), num) in self
            .players
            .iter_mut()
            .zip(self.histories.iter_mut())
            .zip([PlayerNum::One, PlayerNum::Two])
        {
            regret::accumulate(&mut player.cum_strat, &player.strat);
            if self.record.includes(num) {
                history.push(Strategy(player.strat.clone()));
            }
        }
        self.iteration += 1;
    }

    /// Run a fixed number of iterations
    pub fn run(&mut self, iterations: u64) {
        for _ in 0..iterations {
            self.step();
        }
    }

    /// The number of iterations run so far
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// A player's current strategy
    ///
    /// This is the raw regret matched strategy of the latest iteration. It chases the opponent's
    /// most recent play and need not converge; prefer [average][Self::average] as an equilibrium
    /// estimate.
    pub fn strategy(&self, player: PlayerNum) -> Strategy {
        Strategy(self.players[player.ind()].strat.clone())
    }

    /// A player's accumulated regret for every action
    ///
    /// Regret accumulates over the whole session without reset or decay, so entries can grow
    /// without bound.
    pub fn cum_regret(&self, player: PlayerNum) -> &[f64] {
        &self.players[player.ind()].cum_regret
    }

    /// A player's strategy averaged over every iteration so far
    ///
    /// The average is maintained whether or not the player is recorded. Before the first
    /// iteration it's uniform.
    pub fn average(&self, player: PlayerNum) -> Strategy {
        let mut avg = self.players[player.ind()].cum_strat.clone();
        regret::avg_strat(&mut avg);
        Strategy(avg)
    }

    /// A player's recorded strategy snapshots, one per iteration
    ///
    /// Iteration `t` is at index `t - 1`. Empty when the player isn't recorded.
    pub fn history(&self, player: PlayerNum) -> &[Strategy] {
        &self.histories[player.ind()]
    }

    /// The running averaged trace of a recorded player
    ///
    /// Equivalent to [running_average] applied to [history][Self::history]. When every iteration
    /// was recorded, the last element matches [average][Self::average].
    pub fn averages(&self, player: PlayerNum) -> Vec<Strategy> {
        running_average(self.history(player))
    }
}

/// The running time average of a sequence of strategy snapshots
///
/// Element `t` of the result is the normalized element-wise sum of the first `t + 1` snapshots,
/// the quantity that regret matching drives to equilibrium even while raw snapshots oscillate. An
/// empty history yields an empty trace.
pub fn running_average(history: &[Strategy]) -> Vec<Strategy> {
    let num_actions = history.first().map_or(0, |strat| strat.len());
    let mut cum = vec![0.0; num_actions];
    history
        .iter()
        .map(|strat| {
            regret::accumulate(&mut cum, strat);
            let mut avg = cum.clone().into_boxed_slice();
            regret::avg_strat(&mut avg);
            Strategy(avg)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::running_average;
    use crate::{MatrixGame, PlayerNum, Record, SelfPlay, Strategy};

    #[test]
    fn first_step_alternates() {
        let game = MatrixGame::rps();
        let mut play = SelfPlay::new(
            &game,
            Strategy::pure(3, 0),
            Strategy::pure(3, 0),
            Record::Both,
        )
        .unwrap();
        play.step();
        // one reacts to rock by switching to pure paper
        assert_eq!(play.cum_regret(PlayerNum::One), &[0.0, 1.0, -1.0]);
        assert_eq!(*play.strategy(PlayerNum::One), [0.0, 1.0, 0.0]);
        // two's regret accrues against the already updated paper, not the pre step rock
        assert_eq!(play.cum_regret(PlayerNum::Two), &[0.0, 1.0, 2.0]);
        assert_eq!(*play.strategy(PlayerNum::Two), [0.0, 1.0 / 3.0, 2.0 / 3.0]);
    }

    #[test]
    fn history_tracks_iterations() {
        let game = MatrixGame::rps();
        let mut play = SelfPlay::new(
            &game,
            Strategy::uniform(3),
            Strategy::uniform(3),
            Record::Both,
        )
        .unwrap();
        play.run(40);
        assert_eq!(play.iteration(), 40);
        assert_eq!(play.history(PlayerNum::One).len(), 40);
        assert_eq!(play.history(PlayerNum::Two).len(), 40);
    }

    #[test]
    fn record_selects_players() {
        let game = MatrixGame::rps();
        let mut play = SelfPlay::new(
            &game,
            Strategy::uniform(3),
            Strategy::uniform(3),
            Record::One,
        )
        .unwrap();
        play.run(10);
        assert_eq!(play.history(PlayerNum::One).len(), 10);
        assert!(play.history(PlayerNum::Two).is_empty());
        assert!(play.averages(PlayerNum::Two).is_empty());
        // averages still work for unrecorded players
        let total: f64 = play.average(PlayerNum::Two).iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "{}", total);
    }

    #[test]
    fn averages_end_at_average() {
        let game = MatrixGame::rps();
        let mut play = SelfPlay::new(
            &game,
            Strategy::pure(3, 2),
            Strategy::uniform(3),
            Record::Both,
        )
        .unwrap();
        play.run(25);
        let averages = play.averages(PlayerNum::One);
        assert_eq!(averages.len(), 25);
        assert_eq!(averages.last().unwrap(), &play.average(PlayerNum::One));
    }

    #[test]
    fn frozen_player_stays_fixed() {
        let game = MatrixGame::rps();
        let fixed = Strategy::new([0.5, 0.25, 0.25]).unwrap();
        let mut play = SelfPlay::with_frozen(
            &game,
            Strategy::uniform(3),
            fixed.clone(),
            Record::Both,
            PlayerNum::Two,
        )
        .unwrap();
        play.run(50);
        assert_eq!(play.strategy(PlayerNum::Two), fixed);
        assert_eq!(play.cum_regret(PlayerNum::Two), &[0.0; 3]);
        assert_eq!(play.average(PlayerNum::Two), fixed);
    }

    #[test]
    fn average_before_running_is_uniform() {
        let game = MatrixGame::rps();
        let play = SelfPlay::new(
            &game,
            Strategy::pure(3, 0),
            Strategy::pure(3, 1),
            Record::Neither,
        )
        .unwrap();
        assert_eq!(*play.average(PlayerNum::One), [1.0 / 3.0; 3]);
        assert_eq!(*play.average(PlayerNum::Two), [1.0 / 3.0; 3]);
    }

    #[test]
    fn snapshots_stay_distributions() {
        let game = MatrixGame::rps();
        let mut play = SelfPlay::new(
            &game,
            Strategy::pure(3, 0),
            Strategy::pure(3, 0),
            Record::Both,
        )
        .unwrap();
        play.run(100);
        for num in [PlayerNum::One, PlayerNum::Two] {
            for strat in play.history(num) {
                assert!(strat.iter().all(|prob| *prob >= 0.0));
                let total: f64 = strat.iter().sum();
                assert!((total - 1.0).abs() < 1e-9, "{}", total);
            }
        }
    }

    #[test]
    fn running_average_prefixes() {
        let history = [Strategy::pure(2, 0), Strategy::pure(2, 1)];
        let averages = running_average(&history);
        assert_eq!(averages.len(), 2);
        assert_eq!(*averages[0], [1.0, 0.0]);
        assert_eq!(*averages[1], [0.5, 0.5]);
        assert!(running_average(&[]).is_empty());
    }
}
