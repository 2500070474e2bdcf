//! Domain models for the CodeTrack membership backend.
//!
//! This module contains the database-backed models for groups and
//! memberships plus the response shapes the service layer hands to callers.

pub mod group_member;
pub mod study_group;
pub mod user;

// Re-export all models for convenient access
pub use group_member::{GroupMember, GroupMemberInfo, MemberRole};
pub use study_group::{GroupDetails, GroupOverview, GroupSummary, StudyGroup};
pub use user::User;
