#![allow(dead_code)]

use codetrack_backend::models::*;
use codetrack_backend::repositories::*;
use codetrack_backend::services::{GroupService, MembershipCoordinator};
use codetrack_backend::AppState;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Test database wrapper exposing the repositories and services under test.
pub struct TestDatabase {
    pub pool: PgPool,
    pub group_repo: Arc<StudyGroupRepository>,
    pub member_repo: Arc<GroupMemberRepository>,
    pub user_repo: Arc<UserRepository>,
    pub membership: Arc<MembershipCoordinator>,
    pub groups: Arc<GroupService>,
}

impl TestDatabase {
    /// Create TestDatabase from an existing pool (used with sqlx::test)
    pub async fn from_pool(pool: PgPool) -> Self {
        let state = AppState::new(pool.clone());

        Self {
            pool,
            group_repo: state.group_repo.clone(),
            member_repo: state.member_repo.clone(),
            user_repo: state.user_repo.clone(),
            membership: state.membership.clone(),
            groups: state.group_service.clone(),
        }
    }

    /// Seed a user account (owned by the account subsystem in production)
    pub async fn seed_user(&self, name: &str) -> User {
        self.user_repo
            .create(name)
            .await
            .expect("Failed to seed user")
    }

    /// Current member count of a group
    pub async fn member_count(&self, group_id: Uuid) -> i64 {
        self.member_repo
            .count_by_group(group_id)
            .await
            .expect("Failed to count members")
    }

    /// Number of groups a user belongs to
    pub async fn group_count(&self, user_id: Uuid) -> i64 {
        self.member_repo
            .count_by_user(user_id)
            .await
            .expect("Failed to count groups")
    }

    /// Number of admin memberships a group has
    pub async fn admin_count(&self, group_id: Uuid) -> usize {
        self.member_repo
            .list_members(group_id)
            .await
            .expect("Failed to list members")
            .iter()
            .filter(|m| m.role == MemberRole::Admin)
            .count()
    }
}
