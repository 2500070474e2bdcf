pub mod group_member_repository;
pub mod study_group_repository;
pub mod user_repository;

// Re-export all repositories for convenient access
pub use group_member_repository::{GroupMemberRepository, LeaveOutcome};
pub use study_group_repository::StudyGroupRepository;
pub use user_repository::UserRepository;
