//! Authentication provider seam.
//!
//! The sync engine never performs authentication itself; it only asks
//! whether a session exists and which owner it belongs to. The owner id
//! scopes every remote query so that multiple devices of the same user
//! share one logical dataset.

use std::sync::RwLock;

/// Authentication state consumed by the sync engine and the tombstone
/// collector.
pub trait AuthProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// The authenticated user's identifier, if any.
    fn current_owner_id(&self) -> Option<String>;
}

/// Minimal in-process session.
///
/// The host application signs the session in after its (out-of-scope)
/// authentication flow completes and out again on logout.
#[derive(Default)]
pub struct Session {
    owner: RwLock<Option<String>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(owner_id: impl Into<String>) -> Self {
        let session = Self::new();
        session.sign_in(owner_id);
        session
    }

    pub fn sign_in(&self, owner_id: impl Into<String>) {
        if let Ok(mut owner) = self.owner.write() {
            *owner = Some(owner_id.into());
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut owner) = self.owner.write() {
            *owner = None;
        }
    }
}

impl AuthProvider for Session {
    fn is_authenticated(&self) -> bool {
        self.owner.read().map(|o| o.is_some()).unwrap_or(false)
    }

    fn current_owner_id(&self) -> Option<String> {
        self.owner.read().ok().and_then(|o| o.clone())
    }
}
