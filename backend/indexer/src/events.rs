//! Canonical event types emitted by the course marketplace contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/course_marketplace/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the marketplace contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new course (and its funding project) was registered (`added` topic).
    CourseAdded,
    /// The administrator deactivated a course (`deactive` topic).
    CourseDeactivated,
    /// A student escrowed a registration fee (`enrolled` topic).
    StudentEnrolled,
    /// A student was graded as passed (`passed` topic).
    StudentPassed,
    /// A certificate was issued (`cert` topic).
    CertificateIssued,
    /// A creator released escrowed fees (`fees` topic).
    FeesClaimed,
    /// The matching pool was topped up (`pool_up` topic).
    MatchingPoolIncreased,
    /// A withdrawal round was opened or closed (`round` topic).
    RoundToggled,
    /// A project owner withdrew its quadratic match (`matched` topic).
    MatchingFundWithdrawn,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "added" => Self::CourseAdded,
            "deactive" => Self::CourseDeactivated,
            "enrolled" => Self::StudentEnrolled,
            "passed" => Self::StudentPassed,
            "cert" => Self::CertificateIssued,
            "fees" => Self::FeesClaimed,
            "pool_up" => Self::MatchingPoolIncreased,
            "round" => Self::RoundToggled,
            "matched" => Self::MatchingFundWithdrawn,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CourseAdded => "course_added",
            Self::CourseDeactivated => "course_deactivated",
            Self::StudentEnrolled => "student_enrolled",
            Self::StudentPassed => "student_passed",
            Self::CertificateIssued => "certificate_issued",
            Self::FeesClaimed => "fees_claimed",
            Self::MatchingPoolIncreased => "matching_pool_increased",
            Self::RoundToggled => "round_toggled",
            Self::MatchingFundWithdrawn => "matching_fund_withdrawn",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the second topic of this event is a round number rather than
    /// a course id.
    pub fn keyed_by_round(&self) -> bool {
        matches!(self, Self::RoundToggled)
    }
}

/// A fully decoded marketplace event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceEvent {
    /// RPC event id; unique per event and used for idempotent inserts.
    pub event_id: Option<String>,
    pub event_type: String,
    pub course_id: Option<String>,
    pub round: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: Option<String>,
    pub event_type: String,
    pub course_id: Option<String>,
    pub round: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
