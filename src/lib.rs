//! CodeTrack Membership Backend Library
//!
//! This module exposes the backend components for use by tests and other
//! consumers.

pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod invite_code;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use database::Database;
use invite_code::InviteCodeGenerator;
use repositories::*;
use services::{GroupService, MembershipCoordinator};
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub database: Database,
    pub group_repo: Arc<StudyGroupRepository>,
    pub member_repo: Arc<GroupMemberRepository>,
    pub user_repo: Arc<UserRepository>,
    pub membership: Arc<MembershipCoordinator>,
    pub group_service: Arc<GroupService>,
}

impl AppState {
    /// Create a new AppState with initialized repositories and services
    pub fn new(pool: sqlx::PgPool) -> Self {
        let database = Database::new(pool.clone());

        let group_repo = Arc::new(StudyGroupRepository::new(pool.clone()));
        let member_repo = Arc::new(GroupMemberRepository::new(pool.clone()));
        let user_repo = Arc::new(UserRepository::new(pool));

        let membership = Arc::new(MembershipCoordinator::new(
            group_repo.clone(),
            member_repo.clone(),
            user_repo.clone(),
            InviteCodeGenerator::new(group_repo.clone()),
        ));

        let group_service = Arc::new(GroupService::new(
            membership.clone(),
            group_repo.clone(),
            member_repo.clone(),
            user_repo.clone(),
        ));

        Self {
            database,
            group_repo,
            member_repo,
            user_repo,
            membership,
            group_service,
        }
    }
}
