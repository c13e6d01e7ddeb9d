//! # Course Marketplace Contract
//!
//! A Soroban contract for a course marketplace whose enrollment fees double as
//! quadratic-funding contributions. Every course is also a funding *project*;
//! a shared matching pool is split between project owners in proportion to the
//! breadth of their student support.
//!
//! | Phase        | Entry Point(s)                                              |
//! |--------------|-------------------------------------------------------------|
//! | Bootstrap    | `__constructor(admin, token)`                               |
//! | Registration | [`CourseMarketplace::add_course`], `deactivate_course`      |
//! | Enrollment   | [`CourseMarketplace::enroll_in_course`], `claim_course_fees`|
//! | Progression  | [`CourseMarketplace::mark_passed`], `get_certificate`       |
//! | Matching     | `increase_matching_pool`, `toggle_withdraw_funds`, `withdraw_matching_fund` |
//! | Queries      | `get_course`, `get_project`, `get_student_status`, `get_matching_pool`, ... |
//!
//! ## Architecture
//!
//! Storage access is fully delegated to [`storage`], the matching math to
//! [`qf`], and event payloads to [`events`]. This file holds the entry points
//! and their authorization and precondition checks.
//!
//! Every mutating entry point validates first, writes its state next, and
//! calls the token contract last. A failed token call panics and reverts the
//! whole invocation, so no partial enrollment or withdrawal is ever committed.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env, String, Vec};

pub mod events;
pub mod qf;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_helpers;

use storage::{
    get_and_increment_course_id, get_status, load_course, load_course_config, load_course_state,
    load_pool, load_project, load_project_state, load_round, save_course, save_course_state,
    save_pool, save_project_state, save_round, set_status,
};
pub use types::{
    Certificate, Contribution, Course, CourseConfig, MatchingPool, Project, RoundSnapshot,
    StudentStatus,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    NotAuthorized = 2,
    OnlyProjectOwner = 3,
    CourseNotFound = 4,
    ProjectNotFound = 5,
    ContributionNotFound = 6,
    InvalidFee = 7,
    InvalidAmount = 8,
    InvalidContentRef = 9,
    FeeMismatch = 10,
    CourseInactive = 11,
    AlreadyEnrolled = 12,
    StatusMustBeEnrolled = 13,
    StatusMustBePassed = 14,
    InsufficientAllowance = 15,
    InsufficientBalance = 16,
    WithdrawalsClosed = 17,
    AlreadyWithdrawn = 18,
    NothingToClaim = 19,
    /// A withdrawal would exceed what the round snapshot allows.
    PoolInconsistent = 20,
    ArithmeticOverflow = 21,
}

#[contract]
pub struct CourseMarketplace;

#[contractimpl]
impl CourseMarketplace {
    // ─────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────

    /// Set the administrator and the token used for fees and the pool.
    ///
    /// Runs exactly once, at deployment.
    pub fn __constructor(env: Env, admin: Address, token: Address) {
        storage::set_config(&env, &admin, &token);
        save_pool(
            &env,
            &MatchingPool {
                balance: 0,
                withdrawals_open: false,
            },
        );
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        storage::get_admin(&env)
    }

    pub fn get_token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Course registry
    // ─────────────────────────────────────────────────────────

    /// Register a new course and its funding project.
    ///
    /// - `creator` must authorize and becomes the project owner.
    /// - `content_ref` must be non-empty; `registration_fee` must be positive.
    ///
    /// Returns the new course id.
    pub fn add_course(
        env: Env,
        creator: Address,
        content_ref: String,
        registration_fee: i128,
        certificate_metadata: String,
    ) -> Result<u64, Error> {
        creator.require_auth();

        if content_ref.len() == 0 {
            return Err(Error::InvalidContentRef);
        }
        if registration_fee <= 0 {
            return Err(Error::InvalidFee);
        }

        let id = get_and_increment_course_id(&env);
        save_course(
            &env,
            &CourseConfig {
                id,
                creator: creator.clone(),
                content_ref,
                registration_fee,
                certificate_metadata,
            },
        );

        events::emit_course_added(&env, id, creator, registration_fee);
        Ok(id)
    }

    /// Stop accepting enrollments for a course. Administrator only.
    ///
    /// Existing enrollments, grading, certificates and the course's QF
    /// contributions are unaffected. Deactivating twice is a no-op.
    pub fn deactivate_course(env: Env, admin: Address, course_id: u64) -> Result<(), Error> {
        admin.require_auth();
        Self::require_admin(&env, &admin)?;

        let mut state = load_course_state(&env, course_id)?;
        if state.active {
            state.active = false;
            save_course_state(&env, course_id, &state);
            events::emit_course_deactivated(&env, course_id, admin);
        }
        Ok(())
    }

    pub fn get_courses_count(env: Env) -> u64 {
        storage::get_course_count(&env)
    }

    pub fn get_course(env: Env, course_id: u64) -> Result<Course, Error> {
        load_course(&env, course_id)
    }

    pub fn get_project(env: Env, project_id: u64) -> Result<Project, Error> {
        load_project(&env, project_id)
    }

    pub fn get_contribution(env: Env, project_id: u64, index: u32) -> Result<Contribution, Error> {
        load_project_state(&env, project_id)?;
        storage::load_contribution(&env, project_id, index).ok_or(Error::ContributionNotFound)
    }

    /// A page of a project's ordered contribution sequence: up to `limit`
    /// entries (at most 50) starting at index `start`.
    pub fn get_contributions(
        env: Env,
        project_id: u64,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Contribution>, Error> {
        storage::load_contributions(&env, project_id, start, limit)
    }

    // ─────────────────────────────────────────────────────────
    // Enrollment escrow
    // ─────────────────────────────────────────────────────────

    /// Enroll `student` in a course by escrowing its registration fee.
    ///
    /// The student must have approved this contract for at least `amount`
    /// on the token beforehand. `amount` must equal the course fee exactly.
    /// The fee is recorded as a contribution to the course's project.
    pub fn enroll_in_course(
        env: Env,
        student: Address,
        course_id: u64,
        amount: i128,
    ) -> Result<(), Error> {
        student.require_auth();

        let config = load_course_config(&env, course_id)?;
        let mut course_state = load_course_state(&env, course_id)?;
        if !course_state.active {
            return Err(Error::CourseInactive);
        }
        if amount != config.registration_fee {
            return Err(Error::FeeMismatch);
        }
        if get_status(&env, &student, course_id) != StudentStatus::NotEnrolled {
            return Err(Error::AlreadyEnrolled);
        }

        let token = Self::token_client(&env)?;
        let custody = env.current_contract_address();
        Self::require_pullable(&token, &student, &custody, amount)?;

        course_state.fees_collected = course_state
            .fees_collected
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;
        let mut project = load_project_state(&env, course_id)?;
        let index = project.contributions_count;
        qf::apply_contribution(&env, course_id, &mut project, amount)?;

        storage::save_contribution(
            &env,
            course_id,
            index,
            &Contribution {
                contributor: student.clone(),
                amount,
            },
        );
        save_project_state(&env, course_id, &project);
        save_course_state(&env, course_id, &course_state);
        set_status(&env, &student, course_id, StudentStatus::Enrolled);

        token.transfer_from(&custody, &student, &custody, &amount);

        events::emit_student_enrolled(&env, course_id, student, amount);
        Ok(())
    }

    /// Release the escrowed, unclaimed registration fees of a course to its
    /// creator. Returns the amount released.
    pub fn claim_course_fees(env: Env, creator: Address, course_id: u64) -> Result<i128, Error> {
        creator.require_auth();

        let config = load_course_config(&env, course_id)?;
        if creator != config.creator {
            return Err(Error::NotAuthorized);
        }

        let mut state = load_course_state(&env, course_id)?;
        let amount = state.unclaimed_fees();
        if amount <= 0 {
            return Err(Error::NothingToClaim);
        }
        state.fees_claimed = state.fees_collected;
        save_course_state(&env, course_id, &state);

        let token = Self::token_client(&env)?;
        token.transfer(&env.current_contract_address(), &creator, &amount);

        events::emit_fees_claimed(&env, course_id, creator, amount);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Student status
    // ─────────────────────────────────────────────────────────

    /// Status of `student` in a course; `NotEnrolled` if never enrolled.
    pub fn get_student_status(env: Env, student: Address, course_id: u64) -> StudentStatus {
        get_status(&env, &student, course_id)
    }

    /// Grade an enrolled student as passed.
    ///
    /// `grader` must be the course creator or the administrator, and the
    /// student's status must be exactly `Enrolled`.
    pub fn mark_passed(
        env: Env,
        grader: Address,
        student: Address,
        course_id: u64,
    ) -> Result<(), Error> {
        grader.require_auth();

        let config = load_course_config(&env, course_id)?;
        if grader != config.creator && grader != storage::get_admin(&env)? {
            return Err(Error::NotAuthorized);
        }

        Self::advance_status(
            &env,
            &student,
            course_id,
            StudentStatus::Enrolled,
            Error::StatusMustBeEnrolled,
        )?;

        events::emit_student_passed(&env, course_id, student, grader);
        Ok(())
    }

    /// Issue the course certificate to a student who has passed.
    ///
    /// Fails with `StatusMustBePassed` from any other status, including after
    /// the certificate was already issued.
    pub fn get_certificate(env: Env, student: Address, course_id: u64) -> Result<Certificate, Error> {
        student.require_auth();

        let config = load_course_config(&env, course_id)?;
        Self::advance_status(
            &env,
            &student,
            course_id,
            StudentStatus::Passed,
            Error::StatusMustBePassed,
        )?;

        let certificate = Certificate {
            course_id,
            student: student.clone(),
            metadata: config.certificate_metadata.clone(),
            issued_at: env.ledger().timestamp(),
        };
        storage::save_certificate(&env, &certificate);

        events::emit_certificate_issued(&env, course_id, student, config.certificate_metadata);
        Ok(certificate)
    }

    pub fn get_issued_certificate(env: Env, student: Address, course_id: u64) -> Option<Certificate> {
        storage::load_certificate(&env, &student, course_id)
    }

    // ─────────────────────────────────────────────────────────
    // Matching pool
    // ─────────────────────────────────────────────────────────

    /// Add `amount` to the matching pool. Open to anyone.
    ///
    /// `contributor` must have approved this contract for at least `amount`.
    pub fn increase_matching_pool(env: Env, contributor: Address, amount: i128) -> Result<(), Error> {
        contributor.require_auth();

        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let token = Self::token_client(&env)?;
        let custody = env.current_contract_address();
        Self::require_pullable(&token, &contributor, &custody, amount)?;

        let mut pool = load_pool(&env);
        pool.balance = pool
            .balance
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;
        save_pool(&env, &pool);

        if amount > 0 {
            token.transfer_from(&custody, &contributor, &custody, &amount);
        }

        events::emit_matching_pool_increased(&env, contributor, amount, pool.balance);
        Ok(())
    }

    /// Open or close a withdrawal round. Administrator only.
    ///
    /// Opening starts a new round: the pool balance and the running
    /// `total_raw` are snapshotted, which freezes every project's entitlement
    /// for the round at constant cost. Closing ends the round. Returns the new `withdrawals_open` value.
    pub fn toggle_withdraw_funds(env: Env, admin: Address) -> Result<bool, Error> {
        admin.require_auth();
        Self::require_admin(&env, &admin)?;

        let mut pool = load_pool(&env);
        if pool.withdrawals_open {
            let round = load_round(&env).ok_or(Error::PoolInconsistent)?;
            pool.withdrawals_open = false;
            save_pool(&env, &pool);
            events::emit_round_toggled(&env, round.round, false, pool.balance, round.total_raw);
        } else {
            let number = load_round(&env).map_or(1, |r| r.round + 1);
            let total_raw = storage::get_total_raw(&env);
            save_round(
                &env,
                &RoundSnapshot {
                    round: number,
                    pool_balance: pool.balance,
                    total_raw,
                    total_paid: 0,
                },
            );
            pool.withdrawals_open = true;
            save_pool(&env, &pool);
            events::emit_round_toggled(&env, number, true, pool.balance, total_raw);
        }
        Ok(pool.withdrawals_open)
    }

    /// Pay the project owner its entitlement for the current round.
    ///
    /// Exactly once per project per round. Returns the amount paid, which is
    /// zero for projects without a quadratic match.
    pub fn withdraw_matching_fund(env: Env, owner: Address, project_id: u64) -> Result<i128, Error> {
        owner.require_auth();

        let project = load_project(&env, project_id)?;
        if owner != project.owner {
            return Err(Error::OnlyProjectOwner);
        }

        let mut pool = load_pool(&env);
        if !pool.withdrawals_open {
            return Err(Error::WithdrawalsClosed);
        }
        let mut round = load_round(&env).ok_or(Error::PoolInconsistent)?;
        if storage::is_withdrawn(&env, round.round, project_id) {
            return Err(Error::AlreadyWithdrawn);
        }

        let amount = qf::round_entitlement(&env, project_id, &round)?;
        let paid = round
            .total_paid
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;
        if amount > pool.balance || paid > round.pool_balance {
            return Err(Error::PoolInconsistent);
        }

        storage::mark_withdrawn(&env, round.round, project_id);
        pool.balance -= amount;
        round.total_paid = paid;
        save_pool(&env, &pool);
        save_round(&env, &round);

        if amount > 0 {
            let token = Self::token_client(&env)?;
            token.transfer(&env.current_contract_address(), &owner, &amount);
        }

        events::emit_matching_fund_withdrawn(&env, project_id, owner, round.round, amount);
        Ok(amount)
    }

    pub fn get_matching_pool(env: Env) -> MatchingPool {
        load_pool(&env)
    }

    /// Snapshot of the open round, or of the last closed one.
    pub fn get_round(env: Env) -> Option<RoundSnapshot> {
        load_round(&env)
    }

    /// Live raw quadratic match of a project, from its current contributions.
    pub fn get_raw_match(env: Env, project_id: u64) -> Result<i128, Error> {
        qf::raw_match(&load_project_state(&env, project_id)?)
    }

    /// Entitlement of the project in the latest round, as of that round's
    /// opening; 0 before any round has opened.
    pub fn get_entitlement(env: Env, project_id: u64) -> Result<i128, Error> {
        match load_round(&env) {
            Some(round) => qf::round_entitlement(&env, project_id, &round),
            None => Ok(0),
        }
    }

    /// Whether the project has withdrawn in the latest round.
    pub fn has_withdrawn(env: Env, project_id: u64) -> bool {
        load_round(&env).map_or(false, |r| storage::is_withdrawn(&env, r.round, project_id))
    }

    // ─────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────

    fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
        if *caller != storage::get_admin(env)? {
            return Err(Error::NotAuthorized);
        }
        Ok(())
    }

    fn token_client(env: &Env) -> Result<token::Client<'_>, Error> {
        Ok(token::Client::new(env, &storage::get_token(env)?))
    }

    /// Check that `spender` can pull `amount` from `from` before touching state.
    fn require_pullable(
        token: &token::Client,
        from: &Address,
        spender: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        if token.allowance(from, spender) < amount {
            return Err(Error::InsufficientAllowance);
        }
        if token.balance(from) < amount {
            return Err(Error::InsufficientBalance);
        }
        Ok(())
    }

    /// Move `student` one step forward, provided the current status is `from`.
    fn advance_status(
        env: &Env,
        student: &Address,
        course_id: u64,
        from: StudentStatus,
        err: Error,
    ) -> Result<StudentStatus, Error> {
        if get_status(env, student, course_id) != from {
            return Err(err);
        }
        let next = from.next().ok_or(err)?;
        set_status(env, student, course_id, next);
        Ok(next)
    }
}
