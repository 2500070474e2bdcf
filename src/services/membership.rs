use crate::error::{AppError, AppResult};
use crate::invite_code::InviteCodeGenerator;
use crate::models::StudyGroup;
use crate::repositories::{
    GroupMemberRepository, LeaveOutcome, StudyGroupRepository, UserRepository,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Global cap on concurrent group participation per user.
pub const MAX_GROUPS_PER_USER: i64 = 2;

/// Coordinates membership mutations: validation, limit checks, and error
/// precedence around the store. The pre-checks here are advisory reads that
/// give callers stable error ordering; every invariant is re-checked inside
/// the repository transactions, which remain correct across multiple
/// processes sharing one database.
pub struct MembershipCoordinator {
    group_repo: Arc<StudyGroupRepository>,
    member_repo: Arc<GroupMemberRepository>,
    user_repo: Arc<UserRepository>,
    invite_codes: InviteCodeGenerator,
}

impl MembershipCoordinator {
    pub fn new(
        group_repo: Arc<StudyGroupRepository>,
        member_repo: Arc<GroupMemberRepository>,
        user_repo: Arc<UserRepository>,
        invite_codes: InviteCodeGenerator,
    ) -> Self {
        Self {
            group_repo,
            member_repo,
            user_repo,
            invite_codes,
        }
    }

    /// Create a new group with the caller as founding admin.
    pub async fn create_group(
        &self,
        user_id: Uuid,
        name: &str,
        description: &str,
        max_members: i32,
    ) -> AppResult<StudyGroup> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        if max_members <= 0 {
            return Err(AppError::Validation(
                "max_members must be greater than 0".to_string(),
            ));
        }

        if !self.user_repo.exists(user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        if self.member_repo.count_by_user(user_id).await? >= MAX_GROUPS_PER_USER {
            return Err(AppError::Capacity(
                "User already in maximum number of groups".to_string(),
            ));
        }

        if self.group_repo.name_taken(name).await? {
            return Err(AppError::Conflict("Group name already exists".to_string()));
        }

        let invite_code = self.invite_codes.generate().await?;

        let group = self
            .group_repo
            .create_with_admin(
                name,
                description,
                user_id,
                &invite_code,
                max_members,
                MAX_GROUPS_PER_USER,
            )
            .await?;

        info!("Created group {} ({}) for user {}", group.name, group.id, user_id);
        Ok(group)
    }

    /// Join a group via its invite code. The capacity pre-check runs before
    /// resolving the code so a capped user gets the capacity error even when
    /// the code is bad; the guarded insert in the repository is what actually
    /// holds the invariants under concurrency.
    pub async fn join_group(&self, user_id: Uuid, invite_code: &str) -> AppResult<StudyGroup> {
        if invite_code.is_empty() {
            return Err(AppError::Validation("invite_code is required".to_string()));
        }

        if !self.user_repo.exists(user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        if self.member_repo.count_by_user(user_id).await? >= MAX_GROUPS_PER_USER {
            return Err(AppError::Capacity(
                "User already in maximum number of groups".to_string(),
            ));
        }

        let group = self
            .member_repo
            .join_via_invite(invite_code, user_id, MAX_GROUPS_PER_USER)
            .await?;

        info!("User {} joined group {} ({})", user_id, group.name, group.id);
        Ok(group)
    }

    /// Leave a group. A sole admin leaving deletes the group; an admin with
    /// other members present is refused.
    pub async fn leave_group(&self, group_id: Uuid, user_id: Uuid) -> AppResult<LeaveOutcome> {
        let outcome = self.member_repo.leave_group(group_id, user_id).await?;

        match outcome {
            LeaveOutcome::GroupDeleted => {
                info!("User {} left group {}; group deleted", user_id, group_id)
            }
            LeaveOutcome::LeftGroup => info!("User {} left group {}", user_id, group_id),
        }

        Ok(outcome)
    }
}
