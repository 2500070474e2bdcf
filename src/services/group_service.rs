use crate::error::{AppError, AppResult};
use crate::models::{
    GroupDetails, GroupMemberInfo, GroupOverview, GroupSummary, StudyGroup,
};
use crate::repositories::{
    GroupMemberRepository, LeaveOutcome, StudyGroupRepository, UserRepository,
};
use crate::services::MembershipCoordinator;
use std::sync::Arc;
use uuid::Uuid;

/// The externally callable operation set over groups: mutations delegate to
/// the membership coordinator, queries shape responses for the request layer.
pub struct GroupService {
    membership: Arc<MembershipCoordinator>,
    group_repo: Arc<StudyGroupRepository>,
    member_repo: Arc<GroupMemberRepository>,
    user_repo: Arc<UserRepository>,
}

impl GroupService {
    pub fn new(
        membership: Arc<MembershipCoordinator>,
        group_repo: Arc<StudyGroupRepository>,
        member_repo: Arc<GroupMemberRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            membership,
            group_repo,
            member_repo,
            user_repo,
        }
    }

    /// Create a group. The creator is always admin, so the returned group
    /// carries the invite code.
    pub async fn create_group(
        &self,
        user_id: Uuid,
        name: &str,
        description: &str,
        max_members: i32,
    ) -> AppResult<StudyGroup> {
        self.membership
            .create_group(user_id, name, description, max_members)
            .await
    }

    /// Join a group via invite code. Joiners are ordinary members, so the
    /// response never includes the invite code.
    pub async fn join_group(&self, user_id: Uuid, invite_code: &str) -> AppResult<GroupSummary> {
        let group = self.membership.join_group(user_id, invite_code).await?;
        Ok(GroupSummary::from(group))
    }

    /// Leave a group, reporting whether the group was deleted with it.
    pub async fn leave_group(&self, group_id: Uuid, user_id: Uuid) -> AppResult<LeaveOutcome> {
        self.membership.leave_group(group_id, user_id).await
    }

    /// All groups the user belongs to, annotated with the caller's role and
    /// member count, most recently created first.
    pub async fn list_my_groups(&self, user_id: Uuid) -> AppResult<Vec<GroupOverview>> {
        if !self.user_repo.exists(user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(self.group_repo.list_for_user(user_id).await?)
    }

    /// Full group view for a confirmed member. Membership is checked before
    /// group existence, so non-members get a permission error whether or not
    /// the group exists; that keeps group ids unguessable.
    pub async fn get_group_details(&self, group_id: Uuid, user_id: Uuid) -> AppResult<GroupDetails> {
        let membership = self
            .member_repo
            .find(group_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Permission("User is not a member of this group".to_string())
            })?;

        let group: StudyGroup = self
            .group_repo
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

        let member_count = self.member_repo.count_by_group(group_id).await?;

        Ok(GroupDetails::for_viewer(group, membership.role, member_count))
    }

    /// Member roster for a confirmed member, earliest joiner first.
    pub async fn list_members(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Vec<GroupMemberInfo>> {
        let membership = self.member_repo.find(group_id, user_id).await?;
        if membership.is_none() {
            return Err(AppError::Permission(
                "User is not a member of this group".to_string(),
            ));
        }

        Ok(self.member_repo.list_members(group_id).await?)
    }
}
