//! # Quadratic-Funding Engine
//!
//! Capital-constrained quadratic funding over the enrollment contributions of
//! each project:
//!
//! ```text
//! raw(p)         = max(0, (Σ isqrt(c_i))² − Σ c_i)
//! total_raw      = Σ_p raw(p)
//! entitlement(p) = floor(raw(p) · pool_at_round_open / total_raw)
//! ```
//!
//! `isqrt` is the integer floor square root. Because of the floor, a single
//! contribution squares back to at most itself, so one large contribution earns
//! nothing while many small ones earn a positive match. The clamp at zero keeps
//! the rounding from ever producing a negative match.
//!
//! The per-project sums and `total_raw` are maintained incrementally by
//! [`apply_contribution`], so opening a round only copies `total_raw` and the
//! pool balance into the round snapshot. A project's raw match at round open
//! is recovered at withdrawal time by [`raw_at_round`]: contributions made
//! after the round opened leave a checkpoint of the earlier value behind.
//!
//! Entitlements are floored, so rounding dust stays in the pool and
//! `Σ entitlement ≤ pool_at_round_open`.

use soroban_sdk::{Env, I256};

use crate::storage;
use crate::types::{ProjectState, RawCheckpoint, RoundSnapshot};
use crate::Error;

/// Integer floor square root of a non-negative amount. Negative input yields 0.
pub fn isqrt(n: i128) -> i128 {
    if n <= 0 {
        return 0;
    }
    let n = n as u128;
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x as i128
}

/// Fold a new contribution into a project's running sums.
pub fn record_contribution(state: &mut ProjectState, amount: i128) -> Result<(), Error> {
    state.contributions_count = state
        .contributions_count
        .checked_add(1)
        .ok_or(Error::ArithmeticOverflow)?;
    state.total_contributed = state
        .total_contributed
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    state.sum_sqrt = state
        .sum_sqrt
        .checked_add(isqrt(amount))
        .ok_or(Error::ArithmeticOverflow)?;
    Ok(())
}

/// Raw quadratic match of a project: `max(0, (Σ√c)² − Σc)`.
pub fn raw_match(state: &ProjectState) -> Result<i128, Error> {
    let square = state
        .sum_sqrt
        .checked_mul(state.sum_sqrt)
        .ok_or(Error::ArithmeticOverflow)?;
    Ok((square - state.total_contributed).max(0))
}

/// Share of `pool` owed to a project with `raw` out of `total_raw`.
///
/// The product `raw · pool` routinely exceeds `i128` with 7- or 18-decimal
/// token amounts, so the multiply-then-divide runs in 256 bits.
pub fn entitlement(env: &Env, raw: i128, pool: i128, total_raw: i128) -> Result<i128, Error> {
    if total_raw <= 0 || raw <= 0 || pool <= 0 {
        return Ok(0);
    }
    let product = I256::from_i128(env, raw).mul(&I256::from_i128(env, pool));
    product
        .div(&I256::from_i128(env, total_raw))
        .to_i128()
        .ok_or(Error::ArithmeticOverflow)
}

/// Fold an enrollment into a project and into the running `total_raw`.
///
/// If a round has opened since the project was last checkpointed, the
/// project's raw match from before this contribution is frozen for that
/// round first. Nothing is written unless every sum fits.
pub fn apply_contribution(
    env: &Env,
    project_id: u64,
    state: &mut ProjectState,
    amount: i128,
) -> Result<(), Error> {
    let before = raw_match(state)?;
    record_contribution(state, amount)?;
    let after = raw_match(state)?;
    let total = storage::get_total_raw(env)
        .checked_add(after - before)
        .ok_or(Error::ArithmeticOverflow)?;

    if let Some(round) = storage::load_round(env) {
        let frozen = storage::load_checkpoint(env, project_id)
            .map_or(false, |cp| cp.round == round.round);
        if !frozen {
            storage::save_checkpoint(
                env,
                project_id,
                &RawCheckpoint {
                    round: round.round,
                    raw: before,
                },
            );
        }
    }
    storage::set_total_raw(env, total);
    Ok(())
}

/// Raw match of a project as of the opening of `round`: the checkpoint if
/// the project was contributed to since, otherwise its live value.
pub fn raw_at_round(env: &Env, project_id: u64, round: u32) -> Result<i128, Error> {
    match storage::load_checkpoint(env, project_id) {
        Some(cp) if cp.round == round => Ok(cp.raw),
        _ => raw_match(&storage::load_project_state(env, project_id)?),
    }
}

/// Entitlement of a project in the round described by `snapshot`.
pub fn round_entitlement(
    env: &Env,
    project_id: u64,
    snapshot: &RoundSnapshot,
) -> Result<i128, Error> {
    let raw = raw_at_round(env, project_id, snapshot.round)?;
    entitlement(env, raw, snapshot.pool_balance, snapshot.total_raw)
}
