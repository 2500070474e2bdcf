use crate::error::RepositoryError;
use crate::models::{GroupMember, GroupMemberInfo, MemberRole, StudyGroup};
use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

/// Outcome of a leave operation. Leaving as the sole admin deletes the whole
/// group; leaving as an ordinary member removes one membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    GroupDeleted,
    LeftGroup,
}

/// Repository for group membership data access
pub struct GroupMemberRepository {
    pool: PgPool,
}

impl GroupMemberRepository {
    /// Create a new GroupMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a membership row
    pub async fn find(&self, group_id: Uuid, user_id: Uuid) -> SqlxResult<Option<GroupMember>> {
        sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT group_id, user_id, role, joined_at
            FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Get member count for a group
    pub async fn count_by_group(&self, group_id: Uuid) -> SqlxResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM group_members
            WHERE group_id = $1
            "#,
        )
        .bind(group_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Get the number of groups a user currently belongs to
    pub async fn count_by_user(&self, user_id: Uuid) -> SqlxResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM group_members
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    /// All members of a group with display names, earliest joiner first
    pub async fn list_members(&self, group_id: Uuid) -> SqlxResult<Vec<GroupMemberInfo>> {
        sqlx::query_as::<_, GroupMemberInfo>(
            r#"
            SELECT gm.user_id, u.name, gm.role, gm.joined_at
            FROM group_members gm
            JOIN users u ON u.id = gm.user_id
            WHERE gm.group_id = $1
            ORDER BY gm.joined_at ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Join a group by invite code.
    ///
    /// The whole check-and-insert window runs in one transaction with the
    /// group row locked FOR UPDATE, so the capacity check and the insert are
    /// observed atomically: N concurrent joiners against one remaining slot
    /// yield exactly one success. The user row is locked first (same order as
    /// group creation) so the per-user cap holds across concurrent joins to
    /// different groups.
    pub async fn join_via_invite(
        &self,
        invite_code: &str,
        user_id: Uuid,
        max_groups_per_user: i64,
    ) -> Result<StudyGroup, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let joiner = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if joiner.is_none() {
            return Err(RepositoryError::NotFound("User not found".to_string()));
        }

        let group_count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM group_members
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if group_count >= max_groups_per_user {
            return Err(RepositoryError::CapacityExceeded(
                "User already in maximum number of groups".to_string(),
            ));
        }

        let group = sqlx::query_as::<_, StudyGroup>(
            r#"
            SELECT id, name, description, created_by, invite_code, max_members, is_active, created_at
            FROM study_groups
            WHERE invite_code = $1 AND is_active = TRUE
            FOR UPDATE
            "#,
        )
        .bind(invite_code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        let Some(group) = group else {
            return Err(RepositoryError::NotFound(
                "Invalid or inactive invite code".to_string(),
            ));
        };

        let member_count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM group_members
            WHERE group_id = $1
            "#,
        )
        .bind(group.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if member_count >= i64::from(group.max_members) {
            return Err(RepositoryError::CapacityExceeded(
                "Group is full".to_string(),
            ));
        }

        let already_member = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT 1
            FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group.id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if already_member.is_some() {
            return Err(RepositoryError::Duplicate(
                "User already in this group".to_string(),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id, role)
            VALUES ($1, $2, 'member')
            "#,
        )
        .bind(group.id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(group)
    }

    /// Leave a group.
    ///
    /// The group row is locked FOR UPDATE so a departing admin serializes
    /// against concurrent joins: nobody can slip into the group between the
    /// "no other members" check and the group deletion.
    pub async fn leave_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<LeaveOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        // If the group is already gone its memberships are gone too; the
        // membership check below reports not-a-member either way.
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM study_groups
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(group_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        let role = sqlx::query_scalar::<_, MemberRole>(
            r#"
            SELECT role
            FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        let Some(role) = role else {
            return Err(RepositoryError::NotFound(
                "User is not a member of this group".to_string(),
            ));
        };

        if role == MemberRole::Admin {
            let member_count = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*)
                FROM group_members
                WHERE group_id = $1
                "#,
            )
            .bind(group_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            if member_count > 1 {
                return Err(RepositoryError::Forbidden(
                    "Admin cannot leave while other members exist".to_string(),
                ));
            }

            // Sole admin leaving deletes the group; the membership row goes
            // with it via ON DELETE CASCADE.
            sqlx::query(
                r#"
                DELETE FROM study_groups
                WHERE id = $1
                "#,
            )
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            tx.commit().await.map_err(RepositoryError::from)?;

            return Ok(LeaveOutcome::GroupDeleted);
        }

        sqlx::query(
            r#"
            DELETE FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(LeaveOutcome::LeftGroup)
    }
}
