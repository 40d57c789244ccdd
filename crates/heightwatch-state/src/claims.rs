//! Pool ownership claims, held in memory for the life of the process.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::info;

/// Chat user who claimed a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOwner {
    pub user_id: u64,
    pub display_name: String,
}

impl ClaimOwner {
    pub fn new(user_id: u64, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
        }
    }
}

/// What happened to a claim request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The pool was unclaimed and now belongs to the requester.
    Claimed,
    /// The requester already owns the pool.
    AlreadyYours,
    /// Someone else got there first.
    TakenBy(ClaimOwner),
}

/// First-come ownership of pools: pool name → owner.
#[derive(Debug, Default)]
pub struct ClaimBook {
    claims: RwLock<HashMap<String, ClaimOwner>>,
}

impl ClaimBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `pool` for `owner`. The caller checks that the pool exists.
    pub async fn claim(&self, pool: &str, owner: ClaimOwner) -> ClaimOutcome {
        let mut claims = self.claims.write().await;
        match claims.get(pool) {
            Some(existing) if existing.user_id == owner.user_id => ClaimOutcome::AlreadyYours,
            Some(existing) => ClaimOutcome::TakenBy(existing.clone()),
            None => {
                info!(%pool, user_id = owner.user_id, user = %owner.display_name, "pool claimed");
                claims.insert(pool.to_string(), owner);
                ClaimOutcome::Claimed
            }
        }
    }

    pub async fn owner_of(&self, pool: &str) -> Option<ClaimOwner> {
        self.claims.read().await.get(pool).cloned()
    }

    pub async fn len(&self) -> usize {
        self.claims.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.claims.read().await.is_empty()
    }
}
