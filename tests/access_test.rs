//! Integration tests for role and permission access resolution.

mod helpers;

use gestio_auth::{AccessGate, can_access};
use gestio_core::error::ErrorKind;
use gestio_entity::permission::PermissionSet;
use gestio_entity::user::UserRole;
use gestio_store::IdentityStore;

use helpers::TestStack;

#[tokio::test]
async fn test_store_resolved_snapshot_drives_access() {
    let stack = TestStack::new();
    stack
        .identities
        .set_role_permissions(
            UserRole::User,
            ["invoices_read", "invoices_write", "customers_view"]
                .into_iter()
                .collect(),
        )
        .await;

    let snapshot = stack
        .identities
        .permissions_for_role(UserRole::User)
        .await
        .unwrap();

    assert!(can_access(UserRole::User, &snapshot, &[], &["invoices_read"]));
    assert!(!can_access(
        UserRole::User,
        &snapshot,
        &[],
        &["customers_delete"]
    ));
    assert!(can_access(
        UserRole::User,
        &snapshot,
        &[UserRole::User],
        &["customers_view"]
    ));
    assert!(!can_access(
        UserRole::User,
        &snapshot,
        &[UserRole::CompanyAdmin],
        &["customers_view"]
    ));
}

#[tokio::test]
async fn test_admin_bypasses_with_empty_snapshot() {
    let stack = TestStack::new();

    let snapshot = stack
        .identities
        .permissions_for_role(UserRole::Admin)
        .await
        .unwrap();
    assert!(snapshot.is_empty());

    assert!(can_access(
        UserRole::Admin,
        &snapshot,
        &[UserRole::CompanyAdmin],
        &["customers_delete"]
    ));
}

#[tokio::test]
async fn test_hybrid_admin_needs_the_permission_too() {
    let stack = TestStack::new();
    stack
        .identities
        .set_role_permissions(
            UserRole::CompanyAdmin,
            ["customers_view"].into_iter().collect(),
        )
        .await;

    let snapshot = stack
        .identities
        .permissions_for_role(UserRole::CompanyAdmin)
        .await
        .unwrap();

    assert!(!can_access(
        UserRole::CompanyAdmin,
        &snapshot,
        &[UserRole::CompanyAdmin],
        &["customers_delete"]
    ));
    assert!(can_access(
        UserRole::CompanyAdmin,
        &snapshot,
        &[UserRole::CompanyAdmin],
        &["customers_view"]
    ));
}

#[tokio::test]
async fn test_gate_and_client_mirror_agree_on_the_snapshot() {
    let stack = TestStack::new();
    stack
        .identities
        .set_role_permissions(UserRole::User, ["invoices_read"].into_iter().collect())
        .await;

    let snapshot = stack
        .identities
        .permissions_for_role(UserRole::User)
        .await
        .unwrap();
    let gate = AccessGate::new();

    let cases: &[(&[UserRole], &[&str])] = &[
        (&[], &[]),
        (&[], &["invoices_read"]),
        (&[], &["customers_delete"]),
        (&[UserRole::User], &["invoices_read"]),
        (&[UserRole::CompanyAdmin], &[]),
    ];

    for (roles, permissions) in cases {
        let client = can_access(UserRole::User, &snapshot, roles, permissions);
        let server = gate
            .require(UserRole::User, &snapshot, roles, permissions)
            .is_ok();
        assert_eq!(client, server, "disagreement for {roles:?} / {permissions:?}");
    }
}

#[test]
fn test_denied_gate_names_the_role() {
    let gate = AccessGate::new();

    let err = gate
        .require(
            UserRole::CustomerUser,
            &PermissionSet::default(),
            &[UserRole::User],
            &[],
        )
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authorization);
    assert!(err.message.contains("customer_user"));
}
