use crate::error::RepositoryError;
use crate::models::{GroupOverview, StudyGroup};
use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

const GROUP_COLUMNS: &str =
    "id, name, description, created_by, invite_code, max_members, is_active, created_at";

/// Repository for study group data access
pub struct StudyGroupRepository {
    pool: PgPool,
}

impl StudyGroupRepository {
    /// Create a new StudyGroupRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a group by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<StudyGroup>> {
        sqlx::query_as::<_, StudyGroup>(&format!(
            "SELECT {GROUP_COLUMNS} FROM study_groups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Check whether a group name is already taken. Name uniqueness spans all
    /// groups, active or not.
    pub async fn name_taken(&self, name: &str) -> SqlxResult<bool> {
        let row = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT 1
            FROM study_groups
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Check whether an invite code is in use by an active group
    pub async fn invite_code_in_use(&self, code: &str) -> SqlxResult<bool> {
        let row = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT 1
            FROM study_groups
            WHERE invite_code = $1 AND is_active = TRUE
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// All groups a user belongs to, annotated with the caller's role and the
    /// current member count, most recently created first.
    pub async fn list_for_user(&self, user_id: Uuid) -> SqlxResult<Vec<GroupOverview>> {
        sqlx::query_as::<_, GroupOverview>(
            r#"
            SELECT g.id, g.name, g.description, g.created_by, g.max_members, g.created_at,
                   gm.role,
                   (SELECT COUNT(*) FROM group_members gm2 WHERE gm2.group_id = g.id) AS member_count
            FROM study_groups g
            JOIN group_members gm ON g.id = gm.group_id
            WHERE gm.user_id = $1
            ORDER BY g.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Create a group together with its founding admin membership.
    ///
    /// Runs in a single transaction: either both rows become durably visible
    /// or neither does. The creator's user row is locked first so the
    /// per-user group cap cannot be exceeded by a concurrent create or join,
    /// and unique-constraint violations on the name or the active invite
    /// code are mapped by constraint rather than leaking storage text.
    pub async fn create_with_admin(
        &self,
        name: &str,
        description: &str,
        created_by: Uuid,
        invite_code: &str,
        max_members: i32,
        max_groups_per_user: i64,
    ) -> Result<StudyGroup, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        // Lock order: user row, then group rows.
        let creator = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(created_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if creator.is_none() {
            return Err(RepositoryError::NotFound("User not found".to_string()));
        }

        let group_count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM group_members
            WHERE user_id = $1
            "#,
        )
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if group_count >= max_groups_per_user {
            return Err(RepositoryError::CapacityExceeded(
                "User already in maximum number of groups".to_string(),
            ));
        }

        let group = sqlx::query_as::<_, StudyGroup>(&format!(
            r#"
            INSERT INTO study_groups (name, description, created_by, invite_code, max_members)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {GROUP_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(created_by)
        .bind(invite_code)
        .bind(max_members)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_group_insert_error)?;

        sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id, role)
            VALUES ($1, $2, 'admin')
            "#,
        )
        .bind(group.id)
        .bind(created_by)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(group)
    }

    /// Delete a group (cascades to its memberships)
    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM study_groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }
}

fn map_group_insert_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some("study_groups_name_key") => {
                return RepositoryError::Duplicate("Group name already exists".to_string());
            }
            Some("study_groups_invite_code_active_idx") => {
                return RepositoryError::ConstraintViolation(
                    "Invite code already in use".to_string(),
                );
            }
            _ => {}
        }
    }
    RepositoryError::from(err)
}
