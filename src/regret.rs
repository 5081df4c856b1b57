//! private module for regret computation and matching
// NOTE all kernels operate on raw slices so they stay independent of the wrapper types; callers
// guarantee matching lengths, checked here only by debug assertions

/// Expected payoff of one pure action against a mixed opponent
pub(crate) fn payoff(row: &[f64], villain: &[f64]) -> f64 {
    debug_assert_eq!(row.len(), villain.len());
    row.iter().zip(villain.iter()).map(|(pay, prob)| pay * prob).sum()
}

/// Expected payoff of a mixed strategy against a mixed opponent
pub(crate) fn expected(matrix: &[Box<[f64]>], hero: &[f64], villain: &[f64]) -> f64 {
    debug_assert_eq!(matrix.len(), hero.len());
    matrix
        .iter()
        .zip(hero.iter())
        .map(|(row, prob)| prob * payoff(row, villain))
        .sum()
}

/// Write the immediate counterfactual regret of every hero action into `out`
///
/// Each component is the payoff of committing to that action minus the expected payoff of the
/// current mix, holding the villain fixed, so actions that would have done better than the mix
/// come out positive.
pub(crate) fn immediate(matrix: &[Box<[f64]>], hero: &[f64], villain: &[f64], out: &mut [f64]) {
    debug_assert_eq!(matrix.len(), out.len());
    for (row, val) in matrix.iter().zip(out.iter_mut()) {
        *val = payoff(row, villain);
    }
    let ev: f64 = hero.iter().zip(out.iter()).map(|(prob, pay)| prob * pay).sum();
    for val in out.iter_mut() {
        *val -= ev;
    }
}

/// Add an immediate regret vector onto the running total
pub(crate) fn accumulate(cum_reg: &mut [f64], immediate: &[f64]) {
    debug_assert_eq!(cum_reg.len(), immediate.len());
    for (cum, inc) in cum_reg.iter_mut().zip(immediate.iter()) {
        *cum += inc;
    }
}

/// Derive the next strategy from cumulative regret
///
/// Actions are weighted proportional to their positive cumulative regret; actions at or below
/// zero get probability zero. When no action has positive regret the strategy falls back to
/// uniform, which also covers the all-zero state before any update has landed.
pub(crate) fn regret_match(cum_reg: &[f64], strat: &mut [f64]) {
    debug_assert_eq!(cum_reg.len(), strat.len());
    let norm: f64 = cum_reg.iter().copied().filter(|reg| reg > &0.0).sum();
    if norm > 0.0 {
        for (&reg, val) in cum_reg.iter().zip(strat.iter_mut()) {
            *val = if reg > 0.0 { reg / norm } else { 0.0 };
        }
    } else {
        strat.fill(1.0 / strat.len() as f64);
    }
}

/// Normalize a cumulative strategy into an average strategy
///
/// A zero norm means nothing was ever accumulated, in which case the average is uniform.
pub(crate) fn avg_strat(cum_strat: &mut [f64]) {
    let norm: f64 = cum_strat.iter().sum();
    if norm == 0.0 {
        cum_strat.fill(1.0 / cum_strat.len() as f64);
    } else {
        for prob in cum_strat.iter_mut() {
            *prob /= norm;
        }
    }
}
