//! # Events
//!
//! Every state change publishes one event. Topics are `(symbol, id)` so the
//! indexer can group events by course or round without decoding the payload.
//!
//! | Topic                     | Payload                   |
//! |---------------------------|---------------------------|
//! | `("added", course_id)`    | [`CourseAdded`]           |
//! | `("deactive", course_id)` | [`CourseDeactivated`]     |
//! | `("enrolled", course_id)` | [`StudentEnrolled`]       |
//! | `("passed", course_id)`   | [`StudentPassed`]         |
//! | `("cert", course_id)`     | [`CertificateIssued`]     |
//! | `("fees", course_id)`     | [`FeesClaimed`]           |
//! | `("pool_up",)`            | [`MatchingPoolIncreased`] |
//! | `("round", round)`        | [`RoundToggled`]          |
//! | `("matched", project_id)` | [`MatchingFundWithdrawn`] |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CourseAdded {
    pub course_id: u64,
    pub creator: Address,
    pub registration_fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CourseDeactivated {
    pub course_id: u64,
    pub admin: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StudentEnrolled {
    pub course_id: u64,
    pub student: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StudentPassed {
    pub course_id: u64,
    pub student: Address,
    pub grader: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificateIssued {
    pub course_id: u64,
    pub student: Address,
    pub metadata: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeesClaimed {
    pub course_id: u64,
    pub creator: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchingPoolIncreased {
    pub contributor: Address,
    pub amount: i128,
    /// Pool balance after the top-up.
    pub balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundToggled {
    pub round: u32,
    pub open: bool,
    pub pool_balance: i128,
    pub total_raw: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchingFundWithdrawn {
    pub project_id: u64,
    pub owner: Address,
    pub round: u32,
    pub amount: i128,
}

pub fn emit_course_added(env: &Env, course_id: u64, creator: Address, registration_fee: i128) {
    env.events().publish(
        (symbol_short!("added"), course_id),
        CourseAdded {
            course_id,
            creator,
            registration_fee,
        },
    );
}

pub fn emit_course_deactivated(env: &Env, course_id: u64, admin: Address) {
    env.events().publish(
        (symbol_short!("deactive"), course_id),
        CourseDeactivated { course_id, admin },
    );
}

pub fn emit_student_enrolled(env: &Env, course_id: u64, student: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("enrolled"), course_id),
        StudentEnrolled {
            course_id,
            student,
            amount,
        },
    );
}

pub fn emit_student_passed(env: &Env, course_id: u64, student: Address, grader: Address) {
    env.events().publish(
        (symbol_short!("passed"), course_id),
        StudentPassed {
            course_id,
            student,
            grader,
        },
    );
}

pub fn emit_certificate_issued(env: &Env, course_id: u64, student: Address, metadata: String) {
    env.events().publish(
        (symbol_short!("cert"), course_id),
        CertificateIssued {
            course_id,
            student,
            metadata,
        },
    );
}

pub fn emit_fees_claimed(env: &Env, course_id: u64, creator: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("fees"), course_id),
        FeesClaimed {
            course_id,
            creator,
            amount,
        },
    );
}

pub fn emit_matching_pool_increased(env: &Env, contributor: Address, amount: i128, balance: i128) {
    env.events().publish(
        (symbol_short!("pool_up"),),
        MatchingPoolIncreased {
            contributor,
            amount,
            balance,
        },
    );
}

pub fn emit_round_toggled(env: &Env, round: u32, open: bool, pool_balance: i128, total_raw: i128) {
    env.events().publish(
        (symbol_short!("round"), round),
        RoundToggled {
            round,
            open,
            pool_balance,
            total_raw,
        },
    );
}

pub fn emit_matching_fund_withdrawn(
    env: &Env,
    project_id: u64,
    owner: Address,
    round: u32,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("matched"), project_id),
        MatchingFundWithdrawn {
            project_id,
            owner,
            round,
            amount,
        },
    );
}
