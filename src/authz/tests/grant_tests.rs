//! Grant, revoke and registry tests

use privileges_authz::{
    FieldValue, OneOrMany, PrivilegeEngine, PrivilegeError, PrivilegeProperty, RawPrivilege,
    Selector,
};
use privileges_core::traits::PrivilegeStore;
use serde_json::json;

// ============================================================================
// GRANT / REVOKE
// ============================================================================

#[tokio::test]
async fn test_grant_revoke_round_trip() {
    let engine = PrivilegeEngine::in_memory();

    let ids = engine
        .grant("chris", "read", Some("matches"), Some("ajax"), None)
        .await
        .unwrap();
    let id = ids.as_single().cloned().unwrap();
    assert!(engine.has("chris", "read", Some("matches"), Some("ajax")).await.unwrap());

    engine.revoke("chris", id).await.unwrap();
    assert!(!engine.has("chris", "read", Some("matches"), Some("ajax")).await.unwrap());
}

#[tokio::test]
async fn test_batch_grant_preserves_order() {
    let engine = PrivilegeEngine::in_memory();

    let ids = engine
        .grant("chris", vec!["read", "write", "delete"], Some("matches"), None, None)
        .await
        .unwrap();
    let ids = ids.into_vec();
    assert_eq!(ids.len(), 3);

    let granted = engine.store().get_all_user_privileges("chris").await.unwrap();
    let names: Vec<_> = granted.iter().map(|g| g.privilege.name.as_str()).collect();
    assert_eq!(names, vec!["read", "write", "delete"]);

    let stored_ids: Vec<_> = granted.into_iter().map(|g| g.id).collect();
    assert_eq!(stored_ids, ids);
}

#[tokio::test]
async fn test_grant_stores_sanitized_privilege() {
    let engine = PrivilegeEngine::in_memory();
    engine
        .grant("chris", "kickMember", Some("members"), None, Some("captain"))
        .await
        .unwrap();

    let granted = engine.store().get_all_user_privileges("chris").await.unwrap();
    assert_eq!(granted[0].privilege.component, FieldValue::Concrete("members".to_string()));
    assert_eq!(granted[0].privilege.group, FieldValue::Absent);
    assert_eq!(granted[0].privilege.role.as_deref(), Some("captain"));
}

#[tokio::test]
async fn test_grant_rejects_bad_input() {
    let engine = PrivilegeEngine::in_memory();

    assert!(matches!(
        engine.grant("", "read", None, None, None).await,
        Err(PrivilegeError::InvalidUserId(_))
    ));
    assert!(matches!(
        engine.grant("chris", Vec::<String>::new(), None, None, None).await,
        Err(PrivilegeError::EmptyCollection(_))
    ));
    assert!(matches!(
        engine.grant("chris", "read", Some(""), None, None).await,
        Err(PrivilegeError::Validation(_))
    ));
}

#[tokio::test]
async fn test_batch_grant_is_fail_fast() {
    let engine = PrivilegeEngine::in_memory();

    let result = engine
        .grant("chris", vec!["read", " ", "delete"], None, None, None)
        .await;
    assert!(result.is_err());

    // the element before the failure stays granted, the one after never ran
    assert!(engine.has("chris", "read", None, None).await.unwrap());
    assert!(!engine.has("chris", "delete", None, None).await.unwrap());
}

#[tokio::test]
async fn test_grant_is_idempotent() {
    let engine = PrivilegeEngine::in_memory();

    let first = engine.grant("chris", "read", None, None, None).await.unwrap();
    let second = engine.grant("chris", "read", None, None, None).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_batch_revoke() {
    let engine = PrivilegeEngine::in_memory();
    let ids = engine
        .grant("chris", vec!["read", "write"], None, None, None)
        .await
        .unwrap();

    engine.revoke("chris", ids.into_vec()).await.unwrap();
    assert!(!engine.has("chris", vec!["read", "write"], None, None).await.unwrap());
}

#[tokio::test]
async fn test_revoke_rejects_bad_input() {
    let engine = PrivilegeEngine::in_memory();

    assert!(matches!(
        engine.revoke("", "some-id").await,
        Err(PrivilegeError::InvalidUserId(_))
    ));
    assert!(matches!(
        engine.revoke("chris", Vec::<String>::new()).await,
        Err(PrivilegeError::EmptyCollection(_))
    ));
    assert!(matches!(
        engine.revoke("chris", "  ").await,
        Err(PrivilegeError::Validation(_))
    ));
}

#[tokio::test]
async fn test_revoke_unknown_id_is_noop() {
    let engine = PrivilegeEngine::in_memory();
    engine.grant("chris", "read", None, None, None).await.unwrap();

    engine.revoke("chris", "does-not-exist").await.unwrap();
    assert!(engine.has("chris", "read", None, None).await.unwrap());
}

// ============================================================================
// REGISTRY: register / exists / pluck
// ============================================================================

async fn seeded_registry() -> PrivilegeEngine {
    let engine = PrivilegeEngine::in_memory();
    for raw in [
        RawPrivilege::new("read").with_component("A").with_group("g1"),
        RawPrivilege::new("write").with_component("A").with_group("g2"),
        RawPrivilege::new("read").with_component("B").with_group("g1"),
        RawPrivilege::new("*").with_component("A").with_group("*"),
        RawPrivilege::new("read").with_component("A").with_group("g1"),
    ] {
        engine.register(&raw).await.unwrap();
    }
    engine
}

#[tokio::test]
async fn test_register_validates() {
    let engine = PrivilegeEngine::in_memory();
    assert!(engine.register(&RawPrivilege::default()).await.is_err());
    assert!(engine.register(&RawPrivilege::new("read").with_group("")).await.is_err());
}

#[tokio::test]
async fn test_exists_is_exact_match() {
    let engine = seeded_registry().await;

    assert!(engine.exists(&Selector::new().with_name("read").with_component("A")).await.unwrap());
    assert!(engine.exists(&Selector::new().with_group("*")).await.unwrap());
    // stored wildcards are literals here
    assert!(!engine.exists(&Selector::new().with_name("delete").with_component("A")).await.unwrap());
    assert!(!engine.exists(&Selector::new().with_group("g3")).await.unwrap());
}

#[tokio::test]
async fn test_registered_wildcard_group_is_literal_but_granted_one_expands() {
    let engine = PrivilegeEngine::in_memory();
    let privilege = RawPrivilege::new("t").with_component("m").with_group("*");
    engine.register(&privilege).await.unwrap();

    let concrete = Selector::new().with_name("t").with_component("m").with_group("ajax");
    assert!(!engine.exists(&concrete).await.unwrap());

    engine.grant("chris", "t", Some("m"), Some("*"), None).await.unwrap();
    assert!(engine
        .has_privilege("chris", RawPrivilege::new("t").with_component("m").with_group("ajax"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_exists_does_not_see_grants() {
    let engine = PrivilegeEngine::in_memory();
    engine.grant("chris", "read", None, None, None).await.unwrap();

    assert!(!engine.exists(&Selector::new().with_name("read")).await.unwrap());
}

#[tokio::test]
async fn test_exists_value_rejects_unknown_keys() {
    let engine = seeded_registry().await;

    assert!(engine.exists_value(&json!({"name": "read", "group": "g1"})).await.unwrap());
    assert!(matches!(
        engine.exists_value(&json!({"name": "read", "extra": "x"})).await,
        Err(PrivilegeError::InvalidSelector(_))
    ));
}

#[tokio::test]
async fn test_pluck_groups_for_component() {
    let engine = seeded_registry().await;

    let groups = engine
        .pluck(PrivilegeProperty::Group, &Selector::new().with_component("A"))
        .await
        .unwrap();

    assert_eq!(
        groups,
        vec![
            FieldValue::Concrete("g1".to_string()),
            FieldValue::Concrete("g2".to_string()),
            FieldValue::Wildcard,
        ]
    );
}

#[tokio::test]
async fn test_pluck_names_deduplicated() {
    let engine = seeded_registry().await;

    let names = engine
        .pluck(PrivilegeProperty::Name, &Selector::new())
        .await
        .unwrap();
    let names: Vec<_> = names.iter().filter_map(FieldValue::as_str).collect();
    assert_eq!(names, vec!["read", "write", "*"]);
}

#[tokio::test]
async fn test_pluck_empty_registry() {
    let engine = PrivilegeEngine::in_memory();
    let values = engine
        .pluck(PrivilegeProperty::Component, &Selector::new())
        .await
        .unwrap();
    assert!(values.is_empty());
}

#[tokio::test]
async fn test_grant_result_shape_follows_input() {
    let engine = PrivilegeEngine::in_memory();

    let single = engine.grant("chris", "read", None, None, None).await.unwrap();
    assert!(matches!(single, OneOrMany::Single(_)));

    let many = engine.grant("chris", vec!["write"], None, None, None).await.unwrap();
    assert!(matches!(many, OneOrMany::Many(ref ids) if ids.len() == 1));
}
