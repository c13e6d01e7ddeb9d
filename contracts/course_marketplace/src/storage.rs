//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the
//! marketplace:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key           | Type            | Description                           |
//! |---------------|-----------------|---------------------------------------|
//! | `Admin`       | `Address`       | Administrator set at construction     |
//! | `Token`       | `Address`       | Token used for fees and the pool      |
//! | `CourseCount` | `u64`           | Auto-increment course/project counter |
//! | `Pool`        | `MatchingPool`  | Matching pool balance and round flag  |
//! | `Round`       | `RoundSnapshot` | Latest (or current) round snapshot    |
//! | `TotalRaw`    | `i128`          | Running Σ raw matches of all projects |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                      | Type            | Description                     |
//! |--------------------------|-----------------|---------------------------------|
//! | `CourseConfig(id)`       | `CourseConfig`  | Immutable course configuration  |
//! | `CourseState(id)`        | `CourseState`   | Active flag and fee escrow      |
//! | `ProjState(id)`          | `ProjectState`  | QF contribution aggregates      |
//! | `Contrib(id, index)`     | `Contribution`  | One enrollment contribution     |
//! | `Status(student, id)`    | `StudentStatus` | Sparse; absent = `NotEnrolled`  |
//! | `Cert(student, id)`      | `Certificate`   | Issued certificate              |
//! | `Checkpoint(id)`         | `RawCheckpoint` | Raw match frozen for a round    |
//! | `Withdrawn(round, id)`   | `bool`          | Exactly-once withdrawal marker  |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{
    Certificate, Contribution, Course, CourseConfig, CourseState, MatchingPool, Project,
    ProjectState, RawCheckpoint, RoundSnapshot, StudentStatus,
};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// Largest page `load_contributions` returns; keeps a read within the
/// per-transaction ledger entry limit.
pub const MAX_CONTRIBUTIONS_PAGE: u32 = 50;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Administrator address (Instance).
    Admin,
    /// Fee / matching-pool token address (Instance).
    Token,
    /// Global auto-increment counter for course IDs (Instance).
    CourseCount,
    /// Matching pool singleton (Instance).
    Pool,
    /// Most recent round snapshot (Instance).
    Round,
    /// Running sum of every project's raw match (Instance).
    TotalRaw,
    /// Immutable course configuration keyed by ID (Persistent).
    CourseConfig(u64),
    /// Mutable course state keyed by ID (Persistent).
    CourseState(u64),
    /// Project contribution aggregates keyed by ID (Persistent).
    ProjState(u64),
    /// Contribution record keyed by (project ID, index) (Persistent).
    Contrib(u64, u32),
    /// Enrollment status keyed by (student, course ID) (Persistent).
    Status(Address, u64),
    /// Issued certificate keyed by (student, course ID) (Persistent).
    Cert(Address, u64),
    /// Raw match frozen for the latest round, keyed by project ID (Persistent).
    Checkpoint(u64),
    /// Withdrawal marker keyed by (round, project ID) (Persistent).
    Withdrawn(u32, u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Store the deployment configuration. Called only by the constructor.
pub fn set_config(env: &Env, admin: &Address, token: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn get_token(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

/// Number of courses registered so far (also the next course ID).
pub fn get_course_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::CourseCount)
        .unwrap_or(0)
}

/// Atomically reads, increments, and stores the course counter.
/// Returns the ID to use for the *current* course (pre-increment value).
pub fn get_and_increment_course_id(env: &Env) -> u64 {
    let current = get_course_count(env);
    env.storage()
        .instance()
        .set(&DataKey::CourseCount, &(current + 1));
    current
}

pub fn load_pool(env: &Env) -> MatchingPool {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Pool)
        .unwrap_or(MatchingPool {
            balance: 0,
            withdrawals_open: false,
        })
}

pub fn save_pool(env: &Env, pool: &MatchingPool) {
    env.storage().instance().set(&DataKey::Pool, pool);
    bump_instance(env);
}

/// The snapshot of the current round, or of the last closed one.
pub fn load_round(env: &Env) -> Option<RoundSnapshot> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Round)
}

pub fn save_round(env: &Env, round: &RoundSnapshot) {
    env.storage().instance().set(&DataKey::Round, round);
    bump_instance(env);
}

pub fn get_total_raw(env: &Env) -> i128 {
    bump_instance(env);
    env.storage().instance().get(&DataKey::TotalRaw).unwrap_or(0)
}

pub fn set_total_raw(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalRaw, &total);
    bump_instance(env);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn set_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

fn get_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

/// Save the config, initial state, and empty project for a new course.
pub fn save_course(env: &Env, config: &CourseConfig) {
    set_persistent(env, &DataKey::CourseConfig(config.id), config);
    set_persistent(
        env,
        &DataKey::CourseState(config.id),
        &CourseState {
            active: true,
            fees_collected: 0,
            fees_claimed: 0,
        },
    );
    set_persistent(
        env,
        &DataKey::ProjState(config.id),
        &ProjectState {
            contributions_count: 0,
            total_contributed: 0,
            sum_sqrt: 0,
        },
    );
}

/// Load only the immutable course configuration.
pub fn load_course_config(env: &Env, id: u64) -> Result<CourseConfig, Error> {
    get_persistent(env, &DataKey::CourseConfig(id)).ok_or(Error::CourseNotFound)
}

/// Load only the mutable course state.
pub fn load_course_state(env: &Env, id: u64) -> Result<CourseState, Error> {
    get_persistent(env, &DataKey::CourseState(id)).ok_or(Error::CourseNotFound)
}

pub fn save_course_state(env: &Env, id: u64, state: &CourseState) {
    set_persistent(env, &DataKey::CourseState(id), state);
}

/// Load the full `Course` by combining config and state.
pub fn load_course(env: &Env, id: u64) -> Result<Course, Error> {
    let config = load_course_config(env, id)?;
    let state = load_course_state(env, id)?;
    Ok(Course {
        id: config.id,
        creator: config.creator,
        content_ref: config.content_ref,
        registration_fee: config.registration_fee,
        certificate_metadata: config.certificate_metadata,
        active: state.active,
        fees_collected: state.fees_collected,
        fees_claimed: state.fees_claimed,
    })
}

pub fn load_project_state(env: &Env, id: u64) -> Result<ProjectState, Error> {
    get_persistent(env, &DataKey::ProjState(id)).ok_or(Error::ProjectNotFound)
}

pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    set_persistent(env, &DataKey::ProjState(id), state);
}

/// Load the project view of a course. The owner comes from the course config.
pub fn load_project(env: &Env, id: u64) -> Result<Project, Error> {
    let config = load_course_config(env, id).map_err(|_| Error::ProjectNotFound)?;
    let state = load_project_state(env, id)?;
    Ok(Project {
        id,
        owner: config.creator,
        contributions_count: state.contributions_count,
        total_contributed: state.total_contributed,
        sum_sqrt: state.sum_sqrt,
    })
}

/// Store a contribution at `index` in the project's sequence.
pub fn save_contribution(env: &Env, project_id: u64, index: u32, contribution: &Contribution) {
    set_persistent(env, &DataKey::Contrib(project_id, index), contribution);
}

pub fn load_contribution(env: &Env, project_id: u64, index: u32) -> Option<Contribution> {
    get_persistent(env, &DataKey::Contrib(project_id, index))
}

/// Read up to `limit` contributions of a project starting at index `start`.
/// `limit` is capped at [`MAX_CONTRIBUTIONS_PAGE`].
pub fn load_contributions(
    env: &Env,
    project_id: u64,
    start: u32,
    limit: u32,
) -> Result<Vec<Contribution>, Error> {
    let state = load_project_state(env, project_id)?;
    let end = start
        .saturating_add(limit.min(MAX_CONTRIBUTIONS_PAGE))
        .min(state.contributions_count);
    let mut out = Vec::new(env);
    for index in start..end {
        if let Some(contribution) = load_contribution(env, project_id, index) {
            out.push_back(contribution);
        }
    }
    Ok(out)
}

/// Enrollment status; absent entries read as `NotEnrolled`.
pub fn get_status(env: &Env, student: &Address, course_id: u64) -> StudentStatus {
    get_persistent(env, &DataKey::Status(student.clone(), course_id))
        .unwrap_or(StudentStatus::NotEnrolled)
}

pub fn set_status(env: &Env, student: &Address, course_id: u64, status: StudentStatus) {
    set_persistent(env, &DataKey::Status(student.clone(), course_id), &status);
}

pub fn save_certificate(env: &Env, certificate: &Certificate) {
    set_persistent(
        env,
        &DataKey::Cert(certificate.student.clone(), certificate.course_id),
        certificate,
    );
}

pub fn load_certificate(env: &Env, student: &Address, course_id: u64) -> Option<Certificate> {
    get_persistent(env, &DataKey::Cert(student.clone(), course_id))
}

pub fn load_checkpoint(env: &Env, project_id: u64) -> Option<RawCheckpoint> {
    get_persistent(env, &DataKey::Checkpoint(project_id))
}

pub fn save_checkpoint(env: &Env, project_id: u64, checkpoint: &RawCheckpoint) {
    set_persistent(env, &DataKey::Checkpoint(project_id), checkpoint);
}

pub fn mark_withdrawn(env: &Env, round: u32, project_id: u64) {
    set_persistent(env, &DataKey::Withdrawn(round, project_id), &true);
}

pub fn is_withdrawn(env: &Env, round: u32, project_id: u64) -> bool {
    get_persistent(env, &DataKey::Withdrawn(round, project_id)).unwrap_or(false)
}
