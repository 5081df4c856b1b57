//! Matrix CFR is a library for finding an approximate nash equilibrium in two-player zero-sum
//! symmetric matrix games, such as rock-paper-scissors, using the regret matching[^rm] form of
//! counterfactual regret minimization[^cfr].
//!
//! # Usage
//!
//! Define a game from its payoff matrix with [MatrixGame::new], or use a built-in game like
//! [MatrixGame::rps], then drive a [SelfPlay] session for a number of iterations. The raw
//! per-iteration strategies can oscillate indefinitely; the time-averaged strategy from
//! [SelfPlay::average] is the actual equilibrium estimate, and [SelfPlay::averages] or
//! [running_average] recover the whole averaged trace for plotting. Freezing one player with
//! [SelfPlay::with_frozen] computes the other player's best response to a fixed strategy instead.
//! [MatrixGame::exploitability] measures how far any strategy is from equilibrium.
//!
//! # Examples
//!
//! ```
//! use matrix_cfr::{MatrixGame, PlayerNum, Record, SelfPlay, Strategy};
//!
//! let game = MatrixGame::rps();
//! let mut play = SelfPlay::new(
//!     &game,
//!     Strategy::pure(3, 0),
//!     Strategy::pure(3, 0),
//!     Record::Both,
//! )
//! .unwrap();
//! play.run(1000);
//! let average = play.average(PlayerNum::One);
//! assert!(average.iter().all(|prob| (prob - 1.0 / 3.0).abs() < 0.05));
//! ```
//!
//! [^rm]: [Hart, Sergiu, and Andreu Mas-Colell. "A simple adaptive procedure leading to
//!   correlated equilibrium." Econometrica 68.5
//!   (2000)](https://onlinelibrary.wiley.com/doi/10.1111/1468-0262.00153).
//! [^cfr]: [Zinkevich, Martin, et al. "Regret minimization in games with incomplete information."
//!   Advances in neural information processing systems 20
//!   (2007)](https://proceedings.neurips.cc/paper/2007/file/08d98638c6fcd194a4b1e6992063e944-Paper.pdf).
#![warn(missing_docs)]
use std::ops::Deref;

mod error;
mod regret;
mod solve;

pub use error::{GameError, StratError};
pub use solve::{running_average, Record, SelfPlay};

/// An enum indicating one of the two players of a game
#[derive(Debug, Copy, Eq, Clone, PartialEq, Hash)]
pub enum PlayerNum {
    /// The first player
    One,
    /// The second player
    Two,
}

impl PlayerNum {
    pub(crate) fn ind(&self) -> usize {
        match self {
            PlayerNum::One => 0,
            PlayerNum::Two => 1,
        }
    }
}

/// A probability distribution over a game's actions
///
/// Strategies are validated on construction and renormalized so their probabilities sum to
/// exactly one, which keeps downstream expected values well defined. They dereference to a slice
/// of probabilities, one per action index.
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy(pub(crate) Box<[f64]>);

impl Strategy {
    /// Create a strategy from raw probabilities
    ///
    /// The weights must be non-negative and finite and sum to one within a tolerance of `1e-6`;
    /// they are renormalized to sum to one exactly.
    pub fn new(probs: impl IntoIterator<Item = f64>) -> Result<Self, StratError> {
        let mut probs: Box<[f64]> = probs.into_iter().collect();
        if probs.is_empty() {
            return Err(StratError::EmptyStrategy);
        }
        if probs.iter().any(|prob| !prob.is_finite() || prob < &0.0) {
            return Err(StratError::InvalidProbability);
        }
        let total: f64 = probs.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(StratError::NotNormalized);
        }
        for prob in probs.iter_mut() {
            *prob /= total;
        }
        Ok(Strategy(probs))
    }

    /// The uniform strategy that mixes equally over every action
    ///
    /// # Panics
    ///
    /// If `num_actions` is zero.
    pub fn uniform(num_actions: usize) -> Self {
        assert!(num_actions > 0, "a strategy needs at least one action");
        Strategy(vec![1.0 / num_actions as f64; num_actions].into_boxed_slice())
    }

    /// The pure strategy that always plays `action`
    ///
    /// # Panics
    ///
    /// If `action` is not less than `num_actions`.
    pub fn pure(num_actions: usize, action: usize) -> Self {
        assert!(
            action < num_actions,
            "pure action {} out of range for {} actions",
            action,
            num_actions
        );
        let mut probs = vec![0.0; num_actions].into_boxed_slice();
        probs[action] = 1.0;
        Strategy(probs)
    }
}

impl Deref for Strategy {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A two-player zero-sum symmetric game defined by its payoff matrix
///
/// The entry `matrix[a][b]` is the payoff to playing action `a` against an opponent playing the
/// pure action `b`. Both players draw from the same action set, so the table must be square and
/// antisymmetric; it is validated once at construction and immutable afterwards.
#[derive(Debug)]
pub struct MatrixGame {
    matrix: Box<[Box<[f64]>]>,
}

impl MatrixGame {
    /// Create a game from a payoff table
    ///
    /// Rows are hero actions and columns are villain actions. The table must be non-empty,
    /// square, finite, and antisymmetric (`matrix[a][b] == -matrix[b][a]`).
    pub fn new(
        matrix: impl IntoIterator<Item = impl IntoIterator<Item = f64>>,
    ) -> Result<Self, GameError> {
        let matrix: Box<[Box<[f64]>]> = matrix
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
        if matrix.is_empty() {
            return Err(GameError::EmptyMatrix);
        }
        let num_actions = matrix.len();
        if matrix.iter().any(|row| row.len() != num_actions) {
            return Err(GameError::NotSquare);
        }
        if matrix
            .iter()
            .flat_map(|row| row.iter())
            .any(|pay| !pay.is_finite())
        {
            return Err(GameError::NonFinitePayoff);
        }
        for (hero, row) in matrix.iter().enumerate() {
            for (villain, pay) in row.iter().enumerate().take(hero + 1) {
                if (pay + matrix[villain][hero]).abs() > 1e-9 {
                    return Err(GameError::NotAntisymmetric);
                }
            }
        }
        Ok(MatrixGame { matrix })
    }

    /// The rock-paper-scissors game
    ///
    /// Three actions in cyclic dominance: each action wins one unit against the action before it
    /// and loses one unit to the action after it, so rock is action 0, paper action 1, and
    /// scissors action 2.
    pub fn rps() -> Self {
        Self::cyclic(3)
    }

    /// A cyclic dominance game over an odd number of actions
    ///
    /// Every action beats the `(num_actions - 1) / 2` actions before it and loses to the ones
    /// after it, cyclically, each for one unit of stake. Odd sizes keep the game fair, so the
    /// equilibrium mixes uniformly. [`rps`][Self::rps] is the three action instance.
    ///
    /// # Panics
    ///
    /// If `num_actions` is even or less than three.
    pub fn cyclic(num_actions: usize) -> Self {
        assert!(
            num_actions >= 3,
            "cyclic games need at least three actions: {}",
            num_actions
        );
        assert_eq!(
            num_actions % 2,
            1,
            "cyclic games need an odd number of actions: {}",
            num_actions
        );
        let half = num_actions / 2;
        let matrix = (0..num_actions)
            .map(|hero| {
                (0..num_actions)
                    .map(|villain| {
                        let lead = (num_actions + hero - villain) % num_actions;
                        if lead == 0 {
                            0.0
                        } else if lead <= half {
                            1.0
                        } else {
                            -1.0
                        }
                    })
                    .collect()
            })
            .collect();
        MatrixGame { matrix }
    }

    /// The number of actions each player chooses between
    pub fn num_actions(&self) -> usize {
        self.matrix.len()
    }

    /// Expected payoff of playing `action` against a mixed villain
    ///
    /// # Panics
    ///
    /// If `action` is out of range or the villain strategy doesn't match the game's actions.
    pub fn payoff(&self, action: usize, villain: &Strategy) -> f64 {
        assert_eq!(
            villain.len(),
            self.num_actions(),
            "villain strategy doesn't match the game's actions"
        );
        regret::payoff(&self.matrix[action], villain)
    }

    /// Expected payoff of a mixed hero against a mixed villain
    ///
    /// By antisymmetry a strategy always has expected payoff zero against itself.
    ///
    /// # Panics
    ///
    /// If either strategy doesn't match the game's actions.
    pub fn expected_payoff(&self, hero: &Strategy, villain: &Strategy) -> f64 {
        assert_eq!(
            hero.len(),
            self.num_actions(),
            "hero strategy doesn't match the game's actions"
        );
        assert_eq!(
            villain.len(),
            self.num_actions(),
            "villain strategy doesn't match the game's actions"
        );
        regret::expected(&self.matrix, hero, villain)
    }

    /// The immediate counterfactual regret of every hero action for one iteration
    ///
    /// Component `a` is `payoff(a, villain)` minus the hero's expected payoff under its current
    /// mix, holding the villain fixed. Weighting the result by the hero's own probabilities
    /// always sums to zero.
    ///
    /// # Panics
    ///
    /// If either strategy doesn't match the game's actions.
    pub fn immediate_regret(&self, hero: &Strategy, villain: &Strategy) -> Box<[f64]> {
        assert_eq!(
            hero.len(),
            self.num_actions(),
            "hero strategy doesn't match the game's actions"
        );
        assert_eq!(
            villain.len(),
            self.num_actions(),
            "villain strategy doesn't match the game's actions"
        );
        let mut out = vec![0.0; self.num_actions()].into_boxed_slice();
        regret::immediate(&self.matrix, hero, villain, &mut out);
        out
    }

    /// How much a best-responding opponent gains against `strat`
    ///
    /// This is the largest expected payoff any pure action earns against the strategy. It is
    /// non-negative, and zero exactly when the strategy is an equilibrium of the symmetric game.
    ///
    /// # Panics
    ///
    /// If the strategy doesn't match the game's actions.
    pub fn exploitability(&self, strat: &Strategy) -> f64 {
        assert_eq!(
            strat.len(),
            self.num_actions(),
            "strategy doesn't match the game's actions"
        );
        self.matrix
            .iter()
            .map(|row| regret::payoff(row, strat))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    pub(crate) fn rows(&self) -> &[Box<[f64]>] {
        &self.matrix
    }
}
