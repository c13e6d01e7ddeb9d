//! # Types
//!
//! Shared data structures used across all modules of the course marketplace.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Course` and its funding `Project` are stored as separate ledger entries:
//!
//! - [`CourseConfig`] — written once at registration; never mutated.
//! - [`CourseState`] — the `active` flag plus fee escrow accounting.
//! - [`ProjectState`] — contribution aggregates, written on every enrollment.
//!
//! Individual [`Contribution`] records are stored one entry per index, so an
//! enrollment writes a small record instead of rewriting a growing vector.
//!
//! ### Constant-cost rounds
//!
//! Opening a withdrawal round never iterates over projects. The sum of raw
//! matches is kept as a running total, and a project's raw match is frozen
//! for a round lazily through a [`RawCheckpoint`].
//!
//! ### Student status as a Finite-State Machine
//!
//! [`StudentStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! NotEnrolled ──► Enrolled ──► Passed ──► CertificateIssued
//! ```
//!
//! Each arrow has exactly one entry point (`enroll_in_course`, `mark_passed`,
//! `get_certificate`); every other attempted transition is rejected.

use soroban_sdk::{contracttype, Address, String};

/// Progress of one student in one course.
///
/// The discriminants are part of the public interface (`Enrolled == 1`).
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum StudentStatus {
    /// Default for every (student, course) pair never touched.
    NotEnrolled = 0,
    /// Registration fee escrowed; counted as a QF contribution.
    Enrolled = 1,
    /// Graded by the course creator or the administrator.
    Passed = 2,
    /// Certificate issued; terminal.
    CertificateIssued = 3,
}

impl StudentStatus {
    /// The only status this one may advance to, if any.
    pub fn next(self) -> Option<StudentStatus> {
        match self {
            StudentStatus::NotEnrolled => Some(StudentStatus::Enrolled),
            StudentStatus::Enrolled => Some(StudentStatus::Passed),
            StudentStatus::Passed => Some(StudentStatus::CertificateIssued),
            StudentStatus::CertificateIssued => None,
        }
    }
}

/// Immutable course configuration, written once at registration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CourseConfig {
    pub id: u64,
    pub creator: Address,
    pub content_ref: String,
    pub registration_fee: i128,
    pub certificate_metadata: String,
}

/// Mutable course state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CourseState {
    pub active: bool,
    /// Total registration fees pulled into escrow.
    pub fees_collected: i128,
    /// Portion of `fees_collected` already released to the creator.
    pub fees_claimed: i128,
}

impl CourseState {
    /// Escrowed fees the creator has not claimed yet.
    pub fn unclaimed_fees(&self) -> i128 {
        self.fees_collected - self.fees_claimed
    }
}

/// Full on-chain representation of a course.
///
/// Used as the public API return type; reconstructed from the split
/// `CourseConfig` + `CourseState` entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Course {
    /// Sequential identifier, shared with the course's funding project.
    pub id: u64,
    /// Address that registered the course and owns its project.
    pub creator: Address,
    /// Opaque reference to the (possibly encrypted) course content.
    pub content_ref: String,
    /// Exact token amount an enrollment must escrow.
    pub registration_fee: i128,
    /// Opaque metadata copied into every issued certificate.
    pub certificate_metadata: String,
    /// Whether new enrollments are accepted.
    pub active: bool,
    pub fees_collected: i128,
    pub fees_claimed: i128,
}

/// One enrollment fee counted towards a project's quadratic match.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contribution {
    pub contributor: Address,
    pub amount: i128,
}

/// Mutable project aggregates, updated on every enrollment.
///
/// `sum_sqrt` and `total_contributed` are maintained incrementally so the
/// raw match of a project is an O(1) computation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    pub contributions_count: u32,
    pub total_contributed: i128,
    pub sum_sqrt: i128,
}

/// Funding-side view of a course.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Same id as the course.
    pub id: u64,
    /// The course creator.
    pub owner: Address,
    /// Number of successful enrollments.
    pub contributions_count: u32,
    /// Σ of contribution amounts.
    pub total_contributed: i128,
    /// Σ of the integer square roots of contribution amounts.
    pub sum_sqrt: i128,
}

/// Global matching pool singleton.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchingPool {
    pub balance: i128,
    pub withdrawals_open: bool,
}

/// Snapshot taken when a withdrawal round opens.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundSnapshot {
    /// 1-based round counter.
    pub round: u32,
    /// Pool balance at the moment the round opened.
    pub pool_balance: i128,
    /// Σ raw matches over all projects at the moment the round opened.
    pub total_raw: i128,
    /// Matches disbursed so far in this round.
    pub total_paid: i128,
}

/// Raw match of a project as it stood when `round` opened.
///
/// Written by the first enrollment into the project after that round opened,
/// so later contributions cannot move the round's entitlement.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawCheckpoint {
    pub round: u32,
    pub raw: i128,
}

/// Record of an issued course certificate.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Certificate {
    pub course_id: u64,
    pub student: Address,
    pub metadata: String,
    /// Ledger timestamp of issuance.
    pub issued_at: u64,
}
