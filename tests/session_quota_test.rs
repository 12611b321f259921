//! Integration tests for plan-tiered session quota enforcement.

mod helpers;

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use gestio_auth::{AnomalyDetector, PlanPolicyResolver, SessionManager};
use gestio_core::error::ErrorKind;
use gestio_core::types::ServiceResponse;
use gestio_entity::session::SessionState;
use gestio_entity::user::UserRole;
use gestio_store::SessionStore;

use helpers::{FailingSubscriptionStore, TEST_PASSWORD, TestStack};

#[tokio::test]
async fn test_starter_plan_evicts_most_idle_session() {
    let stack = TestStack::new();
    let company = stack.company_on_plan("starter").await;
    let user = stack.seed_user("ana", Some(company)).await;

    let first = stack.login("ana").await;
    let second = stack.login("ana").await;

    // Make the first session unambiguously the most idle.
    stack
        .sessions
        .touch(first.session.id, Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    let third = stack.login("ana").await;

    assert_eq!(stack.registry.active_count(user.id).await.unwrap(), 2);

    let evicted = stack
        .sessions
        .find_by_id(first.session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(evicted.state, SessionState::Evicted);
    assert!(evicted.ended_at.is_some());

    assert!(
        stack
            .registry
            .find_by_token(&second.tokens.access_token)
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        stack
            .registry
            .find_by_token(&third.tokens.access_token)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_fallback_policy_refuses_second_session() {
    let stack = TestStack::new();
    stack.seed_user("ben", None).await;

    let first = stack.login("ben").await;

    let err = stack
        .manager
        .login("ben", TEST_PASSWORD, None, None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::QuotaExceeded);
    assert!(err.message.contains("Maximum concurrent sessions (1)"));
    assert!(err.message.contains("fallback"));
    assert!(err.message.contains("upgrade your plan"));

    // A transport layer folds the denial into the response envelope.
    let envelope: ServiceResponse<()> = ServiceResponse::from_error(&err);
    assert!(!envelope.success);
    assert!(envelope.message.contains("upgrade your plan"));

    // The refused login did not disturb the existing session.
    assert!(
        stack
            .registry
            .find_by_token(&first.tokens.access_token)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_company_without_subscription_gets_fallback_quota() {
    let stack = TestStack::new();
    stack.seed_user("carl", Some(Uuid::new_v4())).await;

    stack.login("carl").await;

    let err = stack
        .manager
        .login("carl", TEST_PASSWORD, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::QuotaExceeded);
}

#[tokio::test]
async fn test_admin_roles_bypass_quota() {
    let stack = TestStack::new();
    let company = stack.company_on_plan("starter").await;
    let admin = stack
        .seed_user_with_role("root", UserRole::Admin, Some(company))
        .await;
    let manager = stack
        .seed_user_with_role("boss", UserRole::CompanyAdmin, Some(company))
        .await;

    for _ in 0..4 {
        stack.login("root").await;
    }
    for _ in 0..3 {
        stack.login("boss").await;
    }

    assert_eq!(stack.registry.active_count(admin.id).await.unwrap(), 4);
    assert_eq!(stack.registry.active_count(manager.id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_plan_upgrade_applies_after_cache_invalidation() {
    let stack = TestStack::new();
    let company = stack.company_on_plan("starter").await;
    let user = stack.seed_user("dana", Some(company)).await;

    stack.login("dana").await;
    stack.login("dana").await;

    stack.subscriptions.subscribe(company, "business").await;
    stack.policy.invalidate(company).await;

    // Under the old starter policy this login would have evicted one
    // of the two existing sessions.
    stack.login("dana").await;

    assert_eq!(stack.registry.active_count(user.id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_concurrent_logins_cap_at_the_quota() {
    let stack = TestStack::new();
    let company = stack.company_on_plan("professional").await;
    let user = stack.seed_user("fay", Some(company)).await;

    // Quota checks are serialized per user, so a burst of logins can
    // never leave more active sessions than the plan allows.
    let logins: Vec<_> = (0..8).map(|_| stack.login("fay")).collect();
    futures::future::join_all(logins).await;

    assert_eq!(stack.registry.active_count(user.id).await.unwrap(), 5);
}

#[tokio::test]
async fn test_subscription_outage_fails_open() {
    let stack = TestStack::new();
    let user = stack.seed_user("erin", Some(Uuid::new_v4())).await;

    let policy = Arc::new(PlanPolicyResolver::new(
        Arc::new(FailingSubscriptionStore),
        stack.config.plans.clone(),
    ));
    let anomaly = Arc::new(AnomalyDetector::new(
        stack.sessions.clone(),
        stack.notifier.clone(),
        &stack.config.session,
    ));
    let manager = SessionManager::new(
        stack.credentials.clone(),
        stack.registry.clone(),
        policy,
        anomaly,
    );

    // Even the fallback quota of one session is not enforced while the
    // billing backend is down.
    manager
        .login("erin", TEST_PASSWORD, None, None)
        .await
        .unwrap();
    manager
        .login("erin", TEST_PASSWORD, None, None)
        .await
        .unwrap();

    assert_eq!(stack.registry.active_count(user.id).await.unwrap(), 2);
}
