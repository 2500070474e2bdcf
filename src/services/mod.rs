pub mod group_service;
pub mod membership;

pub use group_service::GroupService;
pub use membership::{MembershipCoordinator, MAX_GROUPS_PER_USER};
