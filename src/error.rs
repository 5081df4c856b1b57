#[cfg(doc)]
use crate::{MatrixGame, SelfPlay, Strategy};

/// Errors that result from payoff matrix definition errors
///
/// If the table passed into [MatrixGame::new] doesn't conform to necessary
/// invariants, one of these will be returned.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum GameError {
    /// Returned when a payoff matrix has no actions
    EmptyMatrix,
    /// Returned when a payoff matrix row doesn't have one payoff per action
    ///
    /// Make sure that a game with n actions has an n by n table, one row per hero action with one
    /// column per villain action.
    NotSquare,
    /// Returned when a payoff is nan or infinite
    NonFinitePayoff,
    /// Returned when a payoff matrix isn't antisymmetric
    ///
    /// Both players draw from the same action set and the same table, so a zero-sum game requires
    /// `matrix[a][b] == -matrix[b][a]` for every pair of actions. In particular the diagonal must
    /// be zero.
    NotAntisymmetric,
}


/// Errors that result from invalid strategy representation
///
/// If the probabilities passed to [Strategy::new] don't form a distribution, or a strategy handed
/// to [SelfPlay::new] doesn't match the game's action count, one of these errors will be returned.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum StratError {
    /// Returned when a strategy has no actions
    EmptyStrategy,
    /// Returned when a probability for an action is negative, nan, or infinite
    InvalidProbability,
    /// Returned when a strategy's probabilities don't sum to one
    ///
    /// Small floating point drift is tolerated and renormalized away, but weights that are off by
    /// more than the tolerance are rejected rather than silently rescaled.
    NotNormalized,
    /// Returned when a strategy's length doesn't match the game's number of actions
    WrongLength,
}
