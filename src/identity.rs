//! Who is using the app
//!
//! There is no login flow; the acting user comes from configuration.

use crate::config::FormsmithConfig;

/// The acting user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub is_admin: bool,
}

pub trait IdentityProvider: Send + Sync {
    /// `None` when nobody is signed in
    fn current_actor(&self) -> Option<Actor>;
}

/// Identity taken from [`FormsmithConfig`]
#[derive(Debug, Clone)]
pub struct ConfigIdentity {
    actor_id: Option<String>,
    is_admin: bool,
}

impl ConfigIdentity {
    pub fn new(config: &FormsmithConfig) -> Self {
        Self {
            actor_id: config.actor_id.clone(),
            is_admin: config.is_admin,
        }
    }
}

impl IdentityProvider for ConfigIdentity {
    fn current_actor(&self) -> Option<Actor> {
        let id = self.actor_id.as_deref()?.trim();
        if id.is_empty() {
            return None;
        }
        Some(Actor {
            id: id.to_string(),
            is_admin: self.is_admin,
        })
    }
}
