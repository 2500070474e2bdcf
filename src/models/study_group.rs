use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::MemberRole;

/// Study group model. A group is created together with its founding admin
/// membership and hard-deleted when the sole admin leaves.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudyGroup {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
    pub invite_code: String,
    pub max_members: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Public shape of a joined group. Never carries the invite code: joiners are
/// ordinary members and only admins ever see the code again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
    pub max_members: i32,
}

impl From<StudyGroup> for GroupSummary {
    fn from(group: StudyGroup) -> Self {
        Self {
            id: group.id,
            name: group.name,
            description: group.description,
            created_by: group.created_by,
            max_members: group.max_members,
        }
    }
}

/// One row of "my groups": the group annotated with the caller's role and the
/// current member count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupOverview {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
    pub max_members: i32,
    pub created_at: NaiveDateTime,
    pub role: MemberRole,
    pub member_count: i64,
}

/// Full group view for a confirmed member. The invite code is present only
/// when the viewer's role is admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDetails {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
    /// Redacted (absent) unless the viewer is the group admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
    pub max_members: i32,
    pub created_at: NaiveDateTime,
    pub member_count: i64,
    pub user_role: MemberRole,
}

impl GroupDetails {
    pub fn for_viewer(group: StudyGroup, viewer_role: MemberRole, member_count: i64) -> Self {
        let invite_code = match viewer_role {
            MemberRole::Admin => Some(group.invite_code),
            MemberRole::Member => None,
        };

        Self {
            id: group.id,
            name: group.name,
            description: group.description,
            created_by: group.created_by,
            invite_code,
            max_members: group.max_members,
            created_at: group.created_at,
            member_count,
            user_role: viewer_role,
        }
    }
}
