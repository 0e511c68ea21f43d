//! Concurrency tests
//!
//! Many threads authorizing at once against cold and warm caches, and
//! superuser reconfiguration racing with checks.
//!
//! Run with: cargo test -p topicgate-integration-tests --test concurrency -- --nocapture

use anyhow::Result;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use topicgate_core::{Action, AuthorizationResult, Operation};
use topicgate_integration_tests::fixtures::*;
use topicgate_integration_tests::helpers::*;
use topicgate_integration_tests::mocks::Lookup;
use tracing::info;

use AuthorizationResult::{Allowed, Denied};

const THREADS: usize = 16;

#[test]
fn test_cold_cache_first_access_loads_once() -> Result<()> {
    init_tracing();
    let t = TestAuthorizer::start()?;
    t.directory.set_latency(Duration::from_millis(20));
    let barrier = Barrier::new(THREADS);
    let (t, barrier) = (&t, &barrier);

    let verdicts: Vec<AuthorizationResult> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    let read_orders = Action::topic(Operation::Read, ORDERS_TOPIC);
                    t.authorizer.authorize_action(PARTNER_SCIENTIST, &read_orders)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("authorizer thread panicked"))
            .collect()
    });

    assert!(verdicts.iter().all(|v| *v == Allowed));
    assert_eq!(t.directory.calls(Lookup::Topic), 1);
    assert_eq!(t.directory.calls(Lookup::User), 1);
    assert_eq!(t.directory.calls(Lookup::Share), 1);
    info!("{} concurrent checks, one load per tier", THREADS);
    Ok(())
}

#[test]
fn test_cold_cache_transient_failure_is_retried_once() -> Result<()> {
    init_tracing();
    let t = TestAuthorizer::start()?;
    t.directory.set_latency(Duration::from_millis(20));
    t.directory.fail_next(Lookup::Topic, 1);
    let barrier = Barrier::new(THREADS);
    let (t, barrier) = (&t, &barrier);

    let verdicts: Vec<AuthorizationResult> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    let read_orders = Action::topic(Operation::Read, ORDERS_TOPIC);
                    t.authorizer.authorize_action(PARTNER_SCIENTIST, &read_orders)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("authorizer thread panicked"))
            .collect()
    });

    // the failed load is shared by every waiter, and so is the retried one
    assert_eq!(verdicts, vec![Allowed; THREADS]);
    assert_eq!(t.directory.calls(Lookup::Topic), 2);
    assert_eq!(t.directory.calls(Lookup::User), 1);
    assert_eq!(t.directory.calls(Lookup::Share), 1);
    Ok(())
}

#[test]
fn test_concurrent_batches_keep_their_order() -> Result<()> {
    init_tracing();
    let t = TestAuthorizer::start()?;
    let members = [OWNER, SCIENTIST, PARTNER_OWNER, PARTNER_SCIENTIST, EDITOR, STRANGER];
    let actions = [
        Action::topic(Operation::Read, ORDERS_TOPIC),
        Action::topic(Operation::Write, ORDERS_TOPIC),
        Action::cluster(Operation::IdempotentWrite),
        Action::group(Operation::Read, "consumers"),
    ];

    thread::scope(|s| {
        for round in 0..THREADS {
            let member = members[round % members.len()];
            let (t, actions) = (&t, &actions);
            s.spawn(move || {
                let verdicts = t.authorizer.authorize(&member_context(member), actions);
                let expected = match member {
                    OWNER => vec![Allowed, Allowed, Allowed, Allowed],
                    SCIENTIST | PARTNER_OWNER | PARTNER_SCIENTIST => {
                        vec![Allowed, Denied, Allowed, Allowed]
                    }
                    _ => vec![Denied, Denied, Allowed, Allowed],
                };
                assert_eq!(verdicts, expected, "member {}", member);
            });
        }
    });

    Ok(())
}

#[test]
fn test_superuser_swap_during_checks() -> Result<()> {
    init_tracing();
    let t = TestAuthorizer::start()?;
    let stranger = member_context(STRANGER);
    let candidates = stranger.superuser_candidates();
    let write_orders = [Action::topic(Operation::Write, ORDERS_TOPIC)];

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..200 {
                let spec = if i % 2 == 0 {
                    format!("User:CN={},O=hops", STRANGER)
                } else {
                    ADMIN_PRINCIPAL.to_string()
                };
                t.authorizer
                    .set_super_users(&spec)
                    .expect("valid superuser list");
            }
        });
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..200 {
                    let before = t.authorizer.super_users();
                    let verdicts = t.authorizer.authorize(&stranger, &write_orders);
                    let after = t.authorizer.super_users();

                    // every snapshot is one complete list, never a mix of two
                    assert_eq!(before.len(), 1);
                    assert_eq!(after.len(), 1);

                    // no swap landed during the check, so the verdict must follow it
                    if Arc::ptr_eq(&before, &after) {
                        let expected = if before.matches_any(candidates.as_slice()) {
                            Allowed
                        } else {
                            Denied
                        };
                        assert_eq!(verdicts, vec![expected]);
                    }
                }
            });
        }
    });

    t.authorizer.set_super_users(ADMIN_PRINCIPAL)?;
    assert_eq!(t.authorizer.authorize(&stranger, &write_orders), vec![Denied]);
    Ok(())
}
