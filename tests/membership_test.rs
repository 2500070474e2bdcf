mod helpers;

use codetrack_backend::error::AppError;
use codetrack_backend::models::MemberRole;
use codetrack_backend::repositories::LeaveOutcome;
use helpers::TestDatabase;
use sqlx::PgPool;
use uuid::Uuid;

// ============================================================================
// CreateGroup
// ============================================================================

#[sqlx::test]
async fn test_create_group_with_founding_admin(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;

    let group = db
        .membership
        .create_group(u1.id, "Algo Club", "daily practice", 2)
        .await
        .expect("Failed to create group");

    assert_eq!(group.name, "Algo Club");
    assert_eq!(group.max_members, 2);
    assert_eq!(group.created_by, u1.id);
    assert!(group.is_active);
    assert_eq!(group.invite_code.len(), 20);

    // Founding admin membership exists alongside the group
    assert_eq!(db.member_count(group.id).await, 1);
    assert_eq!(db.admin_count(group.id).await, 1);

    let membership = db
        .member_repo
        .find(group.id, u1.id)
        .await
        .expect("Failed to find membership")
        .expect("Creator should be a member");
    assert_eq!(membership.role, MemberRole::Admin);
}

#[sqlx::test]
async fn test_create_group_rejects_bad_input(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;

    let err = db
        .membership
        .create_group(u1.id, "", "", 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = db
        .membership
        .create_group(u1.id, "Algo Club", "", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[sqlx::test]
async fn test_create_group_unknown_user(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;

    let err = db
        .membership
        .create_group(Uuid::new_v4(), "Algo Club", "", 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test]
async fn test_create_group_duplicate_name(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;
    let u2 = db.seed_user("bob").await;

    db.membership
        .create_group(u1.id, "Algo Club", "", 5)
        .await
        .expect("Failed to create group");

    let err = db
        .membership
        .create_group(u2.id, "Algo Club", "", 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[sqlx::test]
async fn test_user_group_cap_applies_to_create(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;

    db.membership
        .create_group(u1.id, "Group One", "", 5)
        .await
        .expect("first create");
    db.membership
        .create_group(u1.id, "Group Two", "", 5)
        .await
        .expect("second create");

    let err = db
        .membership
        .create_group(u1.id, "Group Three", "", 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Capacity(_)));
    assert_eq!(db.group_count(u1.id).await, 2);
}

// ============================================================================
// JoinGroup
// ============================================================================

#[sqlx::test]
async fn test_join_group_via_invite_code(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;
    let u2 = db.seed_user("bob").await;

    let group = db
        .membership
        .create_group(u1.id, "Algo Club", "", 2)
        .await
        .expect("create");

    let joined = db
        .membership
        .join_group(u2.id, &group.invite_code)
        .await
        .expect("join");

    assert_eq!(joined.id, group.id);
    assert_eq!(db.member_count(group.id).await, 2);

    let membership = db
        .member_repo
        .find(group.id, u2.id)
        .await
        .expect("find")
        .expect("joined membership");
    assert_eq!(membership.role, MemberRole::Member);
}

#[sqlx::test]
async fn test_join_full_group(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;
    let u2 = db.seed_user("bob").await;
    let u3 = db.seed_user("carol").await;

    let group = db
        .membership
        .create_group(u1.id, "Algo Club", "", 2)
        .await
        .expect("create");
    db.membership
        .join_group(u2.id, &group.invite_code)
        .await
        .expect("join");

    let err = db
        .membership
        .join_group(u3.id, &group.invite_code)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Capacity(_)));
    assert_eq!(db.member_count(group.id).await, 2);
}

#[sqlx::test]
async fn test_join_invalid_invite_code(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;

    let err = db
        .membership
        .join_group(u1.id, "not-a-real-invite-00")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test]
async fn test_join_same_group_twice(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;
    let u2 = db.seed_user("bob").await;

    let group = db
        .membership
        .create_group(u1.id, "Algo Club", "", 5)
        .await
        .expect("create");
    db.membership
        .join_group(u2.id, &group.invite_code)
        .await
        .expect("first join");

    let err = db
        .membership
        .join_group(u2.id, &group.invite_code)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(db.member_count(group.id).await, 2);
}

#[sqlx::test]
async fn test_user_group_cap_applies_to_join(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;
    let u2 = db.seed_user("bob").await;
    let u3 = db.seed_user("carol").await;

    let g1 = db
        .membership
        .create_group(u1.id, "Group One", "", 5)
        .await
        .expect("create");
    let g2 = db
        .membership
        .create_group(u2.id, "Group Two", "", 5)
        .await
        .expect("create");
    let g3 = db
        .membership
        .create_group(u3.id, "Group Three", "", 5)
        .await
        .expect("create");

    let joiner = db.seed_user("dave").await;
    db.membership
        .join_group(joiner.id, &g1.invite_code)
        .await
        .expect("join one");
    db.membership
        .join_group(joiner.id, &g2.invite_code)
        .await
        .expect("join two");

    let err = db
        .membership
        .join_group(joiner.id, &g3.invite_code)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Capacity(_)));
    assert_eq!(db.group_count(joiner.id).await, 2);
}

// ============================================================================
// LeaveGroup
// ============================================================================

#[sqlx::test]
async fn test_member_leaves_group(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;
    let u2 = db.seed_user("bob").await;

    let group = db
        .membership
        .create_group(u1.id, "Algo Club", "", 5)
        .await
        .expect("create");
    db.membership
        .join_group(u2.id, &group.invite_code)
        .await
        .expect("join");

    let outcome = db
        .membership
        .leave_group(group.id, u2.id)
        .await
        .expect("leave");
    assert_eq!(outcome, LeaveOutcome::LeftGroup);
    assert_eq!(db.member_count(group.id).await, 1);
    assert_eq!(db.admin_count(group.id).await, 1);
}

#[sqlx::test]
async fn test_admin_cannot_leave_with_members_present(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;
    let u2 = db.seed_user("bob").await;

    let group = db
        .membership
        .create_group(u1.id, "Algo Club", "", 5)
        .await
        .expect("create");
    db.membership
        .join_group(u2.id, &group.invite_code)
        .await
        .expect("join");

    let err = db.membership.leave_group(group.id, u1.id).await.unwrap_err();
    assert!(matches!(err, AppError::Permission(_)));

    // Group and both memberships are untouched
    assert_eq!(db.member_count(group.id).await, 2);
    assert!(db
        .group_repo
        .find_by_id(group.id)
        .await
        .expect("find")
        .is_some());
}

#[sqlx::test]
async fn test_sole_admin_leaving_deletes_group(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;

    let group = db
        .membership
        .create_group(u1.id, "Algo Club", "", 5)
        .await
        .expect("create");

    let outcome = db
        .membership
        .leave_group(group.id, u1.id)
        .await
        .expect("leave");
    assert_eq!(outcome, LeaveOutcome::GroupDeleted);

    assert!(db
        .group_repo
        .find_by_id(group.id)
        .await
        .expect("find")
        .is_none());
    assert_eq!(db.member_count(group.id).await, 0);
    assert_eq!(db.group_count(u1.id).await, 0);
}

#[sqlx::test]
async fn test_leave_twice_reports_not_found(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;
    let u2 = db.seed_user("bob").await;

    let group = db
        .membership
        .create_group(u1.id, "Algo Club", "", 5)
        .await
        .expect("create");
    db.membership
        .join_group(u2.id, &group.invite_code)
        .await
        .expect("join");

    db.membership
        .leave_group(group.id, u2.id)
        .await
        .expect("first leave");
    let err = db.membership.leave_group(group.id, u2.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(db.member_count(group.id).await, 1);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[sqlx::test]
async fn test_group_name_freed_after_deletion(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;
    let u2 = db.seed_user("bob").await;

    let group = db
        .membership
        .create_group(u1.id, "Algo Club", "", 5)
        .await
        .expect("create");
    db.membership
        .leave_group(group.id, u1.id)
        .await
        .expect("leave");

    // Name uniqueness is scoped to existing rows, not history
    let recreated = db
        .membership
        .create_group(u2.id, "Algo Club", "", 5)
        .await
        .expect("recreate");
    assert_ne!(recreated.id, group.id);
    assert_eq!(recreated.created_by, u2.id);
}

#[sqlx::test]
async fn test_exactly_one_admin_throughout(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;
    let u1 = db.seed_user("alice").await;
    let u2 = db.seed_user("bob").await;
    let u3 = db.seed_user("carol").await;

    let group = db
        .membership
        .create_group(u1.id, "Algo Club", "", 5)
        .await
        .expect("create");
    db.membership
        .join_group(u2.id, &group.invite_code)
        .await
        .expect("join");
    db.membership
        .join_group(u3.id, &group.invite_code)
        .await
        .expect("join");
    assert_eq!(db.admin_count(group.id).await, 1);

    db.membership
        .leave_group(group.id, u2.id)
        .await
        .expect("leave");
    assert_eq!(db.admin_count(group.id).await, 1);
}

#[sqlx::test]
async fn test_invite_codes_unique_across_groups(pool: PgPool) {
    let db = TestDatabase::from_pool(pool).await;

    let mut codes = std::collections::HashSet::new();
    for i in 0..5 {
        let user = db.seed_user(&format!("user{}", i)).await;
        let group = db
            .membership
            .create_group(user.id, &format!("Group {}", i), "", 5)
            .await
            .expect("create");
        assert_eq!(group.invite_code.len(), 20);
        assert!(codes.insert(group.invite_code));
    }
}
