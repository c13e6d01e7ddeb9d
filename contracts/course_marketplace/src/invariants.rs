#![allow(dead_code)]

extern crate std;

use crate::types::{Course, MatchingPool, Project, RoundSnapshot, StudentStatus};

/// INV-1: Registration fee is strictly positive.
pub fn assert_fee_positive(course: &Course) {
    assert!(
        course.registration_fee > 0,
        "INV-1 violated: course {} has non-positive fee ({})",
        course.id,
        course.registration_fee
    );
}

/// INV-2: Course IDs are sequential starting from 0.
pub fn assert_sequential_ids(courses: &[Course]) {
    for (i, course) in courses.iter().enumerate() {
        assert_eq!(
            course.id, i as u64,
            "INV-2 violated: expected id {}, got {}",
            i, course.id
        );
    }
}

/// INV-3: Claimed fees never exceed collected fees, and neither is negative.
pub fn assert_fee_escrow_consistent(course: &Course) {
    assert!(
        course.fees_claimed >= 0 && course.fees_claimed <= course.fees_collected,
        "INV-3 violated: course {} claimed {} of {} collected",
        course.id,
        course.fees_claimed,
        course.fees_collected
    );
}

/// INV-4: Fees collected equal fee × number of enrollments.
pub fn assert_fees_match_enrollments(course: &Course, project: &Project) {
    assert_eq!(
        course.fees_collected,
        course.registration_fee * project.contributions_count as i128,
        "INV-4 violated: course {} collected {} for {} enrollments at fee {}",
        course.id,
        course.fees_collected,
        project.contributions_count,
        course.registration_fee
    );
}

/// INV-5: Status transitions only move one step forward:
///   NotEnrolled -> Enrolled -> Passed -> CertificateIssued
pub fn assert_valid_status_transition(from: &StudentStatus, to: &StudentStatus) {
    let valid = matches!(
        (from, to),
        (StudentStatus::NotEnrolled, StudentStatus::Enrolled)
            | (StudentStatus::Enrolled, StudentStatus::Passed)
            | (StudentStatus::Passed, StudentStatus::CertificateIssued)
    );

    assert!(
        valid,
        "INV-5 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-6: Status never decreases.
pub fn assert_status_monotonic(before: StudentStatus, after: StudentStatus) {
    assert!(
        after >= before,
        "INV-6 violated: status decreased from {:?} to {:?}",
        before,
        after
    );
}

/// INV-7: Course data immutability — everything but the active flag and fee
/// escrow accounting stays as registered.
pub fn assert_course_immutable_fields(original: &Course, current: &Course) {
    assert_eq!(original.id, current.id, "INV-7 violated: course id changed");
    assert_eq!(
        original.creator, current.creator,
        "INV-7 violated: course creator changed"
    );
    assert_eq!(
        original.content_ref, current.content_ref,
        "INV-7 violated: course content_ref changed"
    );
    assert_eq!(
        original.registration_fee, current.registration_fee,
        "INV-7 violated: course registration_fee changed"
    );
    assert_eq!(
        original.certificate_metadata, current.certificate_metadata,
        "INV-7 violated: course certificate_metadata changed"
    );
}

/// INV-8: A project's owner is its course's creator.
pub fn assert_project_owned_by_creator(course: &Course, project: &Project) {
    assert_eq!(course.id, project.id, "INV-8 violated: id mismatch");
    assert_eq!(
        course.creator, project.owner,
        "INV-8 violated: project {} owner is not the course creator",
        project.id
    );
}

/// INV-9: Matches paid in a round never exceed the pool at round open.
pub fn assert_round_within_pool(round: &RoundSnapshot) {
    assert!(
        round.total_paid >= 0 && round.total_paid <= round.pool_balance,
        "INV-9 violated: round {} paid {} of {}",
        round.round,
        round.total_paid,
        round.pool_balance
    );
}

/// INV-10: Σ entitlements never exceed the pool they were computed from.
pub fn assert_entitlements_within_pool(entitlements: &[i128], pool_balance: i128) {
    let total: i128 = entitlements.iter().sum();
    assert!(
        entitlements.iter().all(|e| *e >= 0) && total <= pool_balance,
        "INV-10 violated: entitlements sum to {} with pool {}",
        total,
        pool_balance
    );
}

/// INV-11: Token custody covers the pool plus every unclaimed fee escrow.
pub fn assert_custody_covers_obligations(custody: i128, pool: &MatchingPool, courses: &[Course]) {
    let escrow: i128 = courses
        .iter()
        .map(|c| c.fees_collected - c.fees_claimed)
        .sum();
    assert_eq!(
        custody,
        pool.balance + escrow,
        "INV-11 violated: custody {} != pool {} + escrow {}",
        custody,
        pool.balance,
        escrow
    );
}

/// Run all stateless course invariants.
pub fn assert_all_course_invariants(course: &Course, project: &Project) {
    assert_fee_positive(course);
    assert_fee_escrow_consistent(course);
    assert_fees_match_enrollments(course, project);
    assert_project_owned_by_creator(course, project);
}
