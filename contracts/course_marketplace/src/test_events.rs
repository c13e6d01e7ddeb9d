extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, String, TryIntoVal, Val, Vec,
};

use crate::events::{
    CertificateIssued, CourseAdded, CourseDeactivated, FeesClaimed, MatchingFundWithdrawn,
    MatchingPoolIncreased, RoundToggled, StudentEnrolled, StudentPassed,
};
use crate::test_helpers::{approve, mint, setup};
use crate::CourseMarketplaceClient;

const FEE: i128 = 4_000_000;

fn fund(env: &Env, client: &CourseMarketplaceClient, token: &token::Client, who: &Address, amount: i128) {
    mint(env, token, who, amount);
    approve(env, token, who, &client.address, amount);
}

fn add_course(env: &Env, client: &CourseMarketplaceClient, creator: &Address) -> u64 {
    client.add_course(
        creator,
        &String::from_str(env, "Sample Course"),
        &FEE,
        &String::from_str(env, "Certificate Metadata"),
    )
}

/// The last event published, after checking it came from the marketplace.
fn last_event(env: &Env, client: &CourseMarketplaceClient) -> (Vec<Val>, Val) {
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(last_event.0, client.address);
    (last_event.1, last_event.2)
}

#[test]
fn test_course_added_event() {
    let (env, client, _admin, _token) = setup();
    let creator = Address::generate(&env);
    let course_id = add_course(&env, &client, &creator);

    let (topics, data) = last_event(&env, &client);
    let expected_topics = vec![
        &env,
        symbol_short!("added").into_val(&env),
        course_id.into_val(&env),
    ];
    assert_eq!(topics, expected_topics);

    let event_data: CourseAdded = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CourseAdded {
            course_id,
            creator,
            registration_fee: FEE,
        }
    );
}

#[test]
fn test_course_deactivated_event() {
    let (env, client, admin, _token) = setup();
    let course_id = add_course(&env, &client, &Address::generate(&env));
    client.deactivate_course(&admin, &course_id);

    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        vec![
            &env,
            symbol_short!("deactive").into_val(&env),
            course_id.into_val(&env),
        ]
    );
    let event_data: CourseDeactivated = data.try_into_val(&env).unwrap();
    assert_eq!(event_data, CourseDeactivated { course_id, admin });
}

#[test]
fn test_progression_events() {
    let (env, client, _admin, token) = setup();
    let creator = Address::generate(&env);
    let student = Address::generate(&env);
    let course_id = add_course(&env, &client, &creator);

    fund(&env, &client, &token, &student, FEE);
    client.enroll_in_course(&student, &course_id, &FEE);

    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        vec![
            &env,
            symbol_short!("enrolled").into_val(&env),
            course_id.into_val(&env),
        ]
    );
    let enrolled: StudentEnrolled = data.try_into_val(&env).unwrap();
    assert_eq!(
        enrolled,
        StudentEnrolled {
            course_id,
            student: student.clone(),
            amount: FEE,
        }
    );

    client.mark_passed(&creator, &student, &course_id);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        vec![
            &env,
            symbol_short!("passed").into_val(&env),
            course_id.into_val(&env),
        ]
    );
    let passed: StudentPassed = data.try_into_val(&env).unwrap();
    assert_eq!(
        passed,
        StudentPassed {
            course_id,
            student: student.clone(),
            grader: creator.clone(),
        }
    );

    client.get_certificate(&student, &course_id);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        vec![
            &env,
            symbol_short!("cert").into_val(&env),
            course_id.into_val(&env),
        ]
    );
    let issued: CertificateIssued = data.try_into_val(&env).unwrap();
    assert_eq!(
        issued,
        CertificateIssued {
            course_id,
            student,
            metadata: String::from_str(&env, "Certificate Metadata"),
        }
    );

    client.claim_course_fees(&creator, &course_id);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        vec![
            &env,
            symbol_short!("fees").into_val(&env),
            course_id.into_val(&env),
        ]
    );
    let claimed: FeesClaimed = data.try_into_val(&env).unwrap();
    assert_eq!(
        claimed,
        FeesClaimed {
            course_id,
            creator,
            amount: FEE,
        }
    );
}

#[test]
fn test_matching_pool_events() {
    let (env, client, admin, token) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);
    let course_id = add_course(&env, &client, &creator);
    for _ in 0..2 {
        let student = Address::generate(&env);
        fund(&env, &client, &token, &student, FEE);
        client.enroll_in_course(&student, &course_id, &FEE);
    }

    let amount = 5_000i128;
    fund(&env, &client, &token, &funder, amount);
    client.increase_matching_pool(&funder, &amount);

    let (topics, data) = last_event(&env, &client);
    assert_eq!(topics, vec![&env, symbol_short!("pool_up").into_val(&env)]);
    let increased: MatchingPoolIncreased = data.try_into_val(&env).unwrap();
    assert_eq!(
        increased,
        MatchingPoolIncreased {
            contributor: funder,
            amount,
            balance: amount,
        }
    );

    client.toggle_withdraw_funds(&admin);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        vec![&env, symbol_short!("round").into_val(&env), 1u32.into_val(&env)]
    );
    let opened: RoundToggled = data.try_into_val(&env).unwrap();
    assert_eq!(
        opened,
        RoundToggled {
            round: 1,
            open: true,
            pool_balance: amount,
            // (2000 + 2000)² − 8_000_000
            total_raw: 8_000_000,
        }
    );

    client.withdraw_matching_fund(&creator, &course_id);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        vec![
            &env,
            symbol_short!("matched").into_val(&env),
            course_id.into_val(&env),
        ]
    );
    let withdrawn: MatchingFundWithdrawn = data.try_into_val(&env).unwrap();
    assert_eq!(
        withdrawn,
        MatchingFundWithdrawn {
            project_id: course_id,
            owner: creator,
            round: 1,
            amount,
        }
    );

    client.toggle_withdraw_funds(&admin);
    let (_topics, data) = last_event(&env, &client);
    let closed: RoundToggled = data.try_into_val(&env).unwrap();
    assert!(!closed.open);
    assert_eq!(closed.round, 1);
    assert_eq!(closed.pool_balance, 0);
}
