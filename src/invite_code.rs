//! Invite code generation.
//!
//! Codes are short enough to share by link or voice but drawn from a space
//! large enough that collisions are negligible. The in-use check against
//! active groups is advisory only; the partial unique index on
//! `study_groups.invite_code` is the final arbiter at insert time.

use crate::error::AppError;
use crate::repositories::StudyGroupRepository;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use thiserror::Error;

/// Invite codes are 15 random bytes, base64 url-safe encoded: exactly 20
/// characters, no padding.
pub const INVITE_CODE_LEN: usize = 20;
const INVITE_CODE_BYTES: usize = 15;
const MAX_ATTEMPTS: usize = 5;

#[derive(Error, Debug)]
pub enum InviteCodeError {
    /// No unused code found within the attempt budget. A service failure,
    /// not a user input error.
    #[error("Could not generate a unique invite code after {MAX_ATTEMPTS} attempts")]
    Exhausted,

    #[error("Invite code lookup failed: {0}")]
    Store(#[from] sqlx::Error),
}

impl From<InviteCodeError> for AppError {
    fn from(err: InviteCodeError) -> Self {
        match err {
            InviteCodeError::Exhausted => AppError::Service(err.to_string()),
            InviteCodeError::Store(e) => AppError::Sqlx(e),
        }
    }
}

/// Generates unique, unguessable invite tokens for active groups.
pub struct InviteCodeGenerator {
    group_repo: Arc<StudyGroupRepository>,
}

impl InviteCodeGenerator {
    pub fn new(group_repo: Arc<StudyGroupRepository>) -> Self {
        Self { group_repo }
    }

    /// Draw candidates until one is unused by any active group, giving up
    /// after a bounded number of attempts.
    pub async fn generate(&self) -> Result<String, InviteCodeError> {
        for _ in 0..MAX_ATTEMPTS {
            let code = random_code();
            if !self.group_repo.invite_code_in_use(&code).await? {
                return Ok(code);
            }
        }
        Err(InviteCodeError::Exhausted)
    }
}

/// One cryptographically-random URL-safe candidate.
pub(crate) fn random_code() -> String {
    let mut bytes = [0u8; INVITE_CODE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
