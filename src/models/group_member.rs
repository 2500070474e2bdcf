use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Member role within a study group. Exactly one admin exists per group, the
/// creator, fixed at creation time. There is deliberately no promotion or
/// demotion operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(MemberRole::Admin),
            "member" => Ok(MemberRole::Member),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }
}

/// Group membership model: one row per (group, user) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMember {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: NaiveDateTime,
}

impl GroupMember {
    /// Check if member is an admin
    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }
}

/// Member list entry with the display name joined in from users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMemberInfo {
    pub user_id: Uuid,
    pub name: String,
    pub role: MemberRole,
    pub joined_at: NaiveDateTime,
}
