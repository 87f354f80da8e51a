//! Time-weighted average rate oracle
//!
//! Keeps one blended rate per reserve pair, converging linearly from the
//! previous average toward the spot rate over a fixed window. Updates are fed
//! the **pre-operation** spot rate and land at most once per timestamp, which
//! is what bounds single-block manipulation: a trade can move the spot rate
//! arbitrarily, but the average only drifts by `elapsed / window` of the gap.
//!
//! Reads blend forward to the caller's `now` without touching state, so a
//! quiet pool still reports a converged average.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weir_types::fraction::reduced_ratio;
use weir_types::{max_uint112, Fraction, MathError, Timestamp, U256};

/// Stored average for one reserve pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageRate {
    /// Blended rate, both sides bounded to 112 bits
    pub rate: Fraction,
    pub updated_at: Timestamp,
}

/// A staged oracle mutation, produced before an operation's external effects
/// and applied only when the operation commits
#[derive(Debug, Clone)]
pub(crate) struct OracleUpdate {
    pair: (usize, usize),
    entry: AverageRate,
}

/// Per-pool average-rate state over all reserve pairs
#[derive(Debug, Clone)]
pub struct RateOracle {
    window_secs: u64,
    pairs: BTreeMap<(usize, usize), AverageRate>,
}

impl RateOracle {
    pub fn new(window_secs: u64) -> Self {
        debug_assert!(window_secs > 0);
        Self { window_secs, pairs: BTreeMap::new() }
    }

    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    /// Stored average for a pair, if any update has landed yet
    pub fn stored(&self, pair: (usize, usize)) -> Option<AverageRate> {
        self.pairs.get(&pair).copied()
    }

    /// Average rate for `pair` blended forward to `now`, given the current
    /// spot rate. Read-only; a pair that has never been updated reports spot.
    pub fn average(
        &self,
        pair: (usize, usize),
        spot: Fraction,
        now: Timestamp,
    ) -> Result<Fraction, MathError> {
        match self.pairs.get(&pair) {
            None => Ok(spot),
            Some(entry) => {
                let elapsed = now.saturating_sub(entry.updated_at);
                if elapsed == 0 {
                    Ok(entry.rate)
                } else {
                    blend(entry.rate, spot, elapsed, self.window_secs)
                }
            }
        }
    }

    /// Stage updates for the given pre-operation spot rates. Pairs whose
    /// entry already carries `now` are skipped (at most one update per
    /// discrete time unit).
    pub(crate) fn stage(
        &self,
        spots: &[((usize, usize), Fraction)],
        now: Timestamp,
    ) -> Result<Vec<OracleUpdate>, MathError> {
        let mut updates = Vec::with_capacity(spots.len());
        for &(pair, spot) in spots {
            debug_assert!(pair.0 < pair.1);
            let entry = match self.pairs.get(&pair) {
                None => AverageRate { rate: reduced_ratio(spot, max_uint112())?, updated_at: now },
                Some(prev) => {
                    let elapsed = now.saturating_sub(prev.updated_at);
                    if elapsed == 0 {
                        continue;
                    }
                    let blended = blend(prev.rate, spot, elapsed, self.window_secs)?;
                    AverageRate {
                        rate: reduced_ratio(blended, max_uint112())?,
                        updated_at: now,
                    }
                }
            };
            updates.push(OracleUpdate { pair, entry });
        }
        Ok(updates)
    }

    pub(crate) fn apply(&mut self, updates: Vec<OracleUpdate>) {
        for update in updates {
            self.pairs.insert(update.pair, update.entry);
        }
    }
}

/// Linear blend of `prev` toward `spot` after `elapsed` of a `window`.
///
///   n' = prev.n * spot.d * (window - elapsed) + prev.d * spot.n * elapsed
///   d' = window * prev.d * spot.d
///
/// `prev` is bounded to 112 bits per side and `spot` is reduced likewise
/// before multiplying, so with a window below 2^20 the products stay well
/// inside 256 bits.
fn blend(
    prev: Fraction,
    spot: Fraction,
    elapsed: u64,
    window_secs: u64,
) -> Result<Fraction, MathError> {
    if elapsed >= window_secs {
        return Ok(spot);
    }
    let spot = reduced_ratio(spot, max_uint112())?;
    let t = U256::from(elapsed);
    let w = U256::from(window_secs);
    let remaining = w - t;

    let settled = prev
        .n
        .checked_mul(spot.d)
        .and_then(|x| x.checked_mul(remaining))
        .ok_or(MathError::Overflow)?;
    let incoming = prev
        .d
        .checked_mul(spot.n)
        .and_then(|x| x.checked_mul(t))
        .ok_or(MathError::Overflow)?;
    let n = settled.checked_add(incoming).ok_or(MathError::Overflow)?;
    let d = w
        .checked_mul(prev.d)
        .and_then(|x| x.checked_mul(spot.d))
        .ok_or(MathError::Overflow)?;
    Ok(Fraction::new(n, d))
}
