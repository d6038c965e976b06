//! Access token cache
//!
//! Tokens are cached per account until they expire. When a token is needed
//! and none is usable, exactly one authentication call per account runs at a
//! time; every concurrent caller awaits the same shared future.
//!
//! The refresh itself runs on a spawned task so it finishes (and populates
//! the cache) even when all callers stop waiting. [`TokenCache::invalidate_all`]
//! bumps a generation counter; a refresh that started before the bump still
//! answers its callers but is not written back.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, warn};
use vpnrest_domain::{AccessToken, RestError, Result};

use super::ports::{AccessTokenSource, AuthorizationProvider};

type SharedRefresh = Shared<BoxFuture<'static, Result<AccessToken>>>;

struct PendingRefresh {
    id: u64,
    future: SharedRefresh,
}

#[derive(Default)]
struct CacheState {
    tokens: HashMap<String, AccessToken>,
    pending: HashMap<String, PendingRefresh>,
    generation: u64,
    next_refresh_id: u64,
}

/// Per-account access token cache with coalesced refreshes
pub struct TokenCache {
    source: Arc<dyn AccessTokenSource>,
    state: Arc<Mutex<CacheState>>,
}

impl TokenCache {
    pub fn new(source: Arc<dyn AccessTokenSource>) -> Self {
        Self { source, state: Arc::new(Mutex::new(CacheState::default())) }
    }

    /// Valid token for the account, authenticating if necessary
    pub async fn get_token(&self, account_number: &str) -> Result<AccessToken> {
        let refresh = {
            let mut state = self.state.lock();

            if let Some(token) = state.tokens.get(account_number) {
                if token.is_valid_at(Utc::now()) {
                    return Ok(token.clone());
                }
            }

            match state.pending.get(account_number) {
                Some(pending) => {
                    debug!("access_token.join_pending_refresh");
                    pending.future.clone()
                }
                None => self.start_refresh(&mut state, account_number),
            }
        };

        refresh.await
    }

    /// Forget the cached token of one account
    pub fn invalidate(&self, account_number: &str) {
        if self.state.lock().tokens.remove(account_number).is_some() {
            debug!("access_token.invalidated");
        }
    }

    /// Forget every cached token
    ///
    /// Refreshes already in flight still resolve for their callers, but their
    /// tokens are not cached.
    pub fn invalidate_all(&self) {
        let mut state = self.state.lock();
        state.tokens.clear();
        state.generation = state.generation.wrapping_add(1);
        debug!(generation = state.generation, "access_token.invalidated_all");
    }

    fn start_refresh(&self, state: &mut CacheState, account_number: &str) -> SharedRefresh {
        let id = state.next_refresh_id;
        state.next_refresh_id = state.next_refresh_id.wrapping_add(1);
        let generation = state.generation;

        let source = Arc::clone(&self.source);
        let shared_state = Arc::clone(&self.state);
        let account = account_number.to_string();

        let task = tokio::spawn(async move {
            let result = source.fetch_access_token(&account).await;

            let mut state = shared_state.lock();
            if state.pending.get(&account).is_some_and(|pending| pending.id == id) {
                state.pending.remove(&account);
            }

            match &result {
                Ok(token) if state.generation == generation => {
                    state.tokens.insert(account, token.clone());
                }
                Ok(_) => debug!("access_token.refresh_discarded"),
                Err(err) if err.is_cancellation() => debug!("access_token.refresh_cancelled"),
                Err(err) => warn!(error = %err, "access_token.refresh_failed"),
            }

            result
        });

        let future: SharedRefresh = async move {
            task.await.unwrap_or_else(|err| {
                if err.is_cancelled() {
                    Err(RestError::Cancelled)
                } else {
                    Err(RestError::Internal(format!("token refresh task failed: {err}")))
                }
            })
        }
        .boxed()
        .shared();

        state
            .pending
            .insert(account_number.to_string(), PendingRefresh { id, future: future.clone() });
        future
    }
}

#[async_trait]
impl AuthorizationProvider for TokenCache {
    async fn authorization(&self, account_number: &str) -> Result<String> {
        self.get_token(account_number).await.map(|token| token.value)
    }

    fn invalidate(&self, account_number: &str) {
        TokenCache::invalidate(self, account_number);
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TokenCache")
            .field("cached", &state.tokens.len())
            .field("pending", &state.pending.len())
            .finish_non_exhaustive()
    }
}
