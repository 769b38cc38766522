//! Per-session UI state that outlives a single screen.

use crate::types::UserProfile;

/// Tracks whether the "verify your account" prompt was already shown.
///
/// One instance per signed-in session; dropping it on sign-out re-arms the
/// prompt for the next user.
#[derive(Debug, Default)]
pub struct VerificationPrompt {
    shown: bool,
}

impl VerificationPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time an unverified profile is seen, false afterwards.
    pub fn should_prompt(&mut self, profile: &UserProfile) -> bool {
        if self.shown || profile.is_verified() {
            return false;
        }
        self.shown = true;
        true
    }

    pub fn was_shown(&self) -> bool {
        self.shown
    }
}
