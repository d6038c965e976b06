//! Direct vs. obfuscated transport selection
//!
//! Every connection failure bumps a persisted counter. A direct connection
//! is suggested whenever the counter is a multiple of
//! [`DIRECT_PROBE_INTERVAL`], so after repeated failures most attempts go
//! through the obfuscated transport while every third one probes whether
//! direct connectivity came back. Success does not reset the counter.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};
use vpnrest_domain::constants::DIRECT_PROBE_INTERVAL;
use vpnrest_domain::TransportKind;

use super::ports::{saturating_increment, FailureCounterStore};

/// Failure-driven transport selection
///
/// Store failures never surface. Failures the store refused to record (a
/// read-only process, a broken disk) are kept in memory and added on top of
/// whatever the store reports, so such a process still escalates.
pub struct TransportStrategy {
    store: Arc<dyn FailureCounterStore>,
    last_stored: AtomicU32,
    unpersisted: AtomicU32,
}

impl TransportStrategy {
    pub fn new(store: Arc<dyn FailureCounterStore>) -> Self {
        let initial = store.load().unwrap_or_else(|err| {
            warn!(error = %err, "transport_strategy.load_failed");
            0
        });
        Self { store, last_stored: AtomicU32::new(initial), unpersisted: AtomicU32::new(0) }
    }

    /// Record a connection failure; returns the new failure count
    pub fn on_failure(&self) -> u32 {
        let count = match self.store.increment() {
            Ok(stored) => {
                self.last_stored.store(stored, Ordering::SeqCst);
                self.combined(stored)
            }
            Err(err) => {
                warn!(error = %err, "transport_strategy.persist_failed");
                saturating_increment(&self.unpersisted);
                self.failure_count()
            }
        };

        info!(
            failure_count = count,
            next = %Self::transport_for(count),
            "transport_strategy.failure_recorded"
        );
        count
    }

    /// Current failure count: the shared store's value plus failures only
    /// this process knows about
    pub fn failure_count(&self) -> u32 {
        let stored = match self.store.load() {
            Ok(count) => {
                self.last_stored.store(count, Ordering::SeqCst);
                count
            }
            Err(err) => {
                warn!(error = %err, "transport_strategy.load_failed");
                self.last_stored.load(Ordering::SeqCst)
            }
        };
        self.combined(stored)
    }

    /// Transport family the next attempt should use
    pub fn suggested_transport(&self) -> TransportKind {
        Self::transport_for(self.failure_count())
    }

    /// Forget all recorded failures
    pub fn reset(&self) {
        if let Err(err) = self.store.reset() {
            warn!(error = %err, "transport_strategy.reset_failed");
        }
        self.last_stored.store(0, Ordering::SeqCst);
        self.unpersisted.store(0, Ordering::SeqCst);
        debug!("transport_strategy.reset");
    }

    /// `Direct` iff `failure_count % 3 == 0`
    ///
    /// A saturated counter stays on the obfuscated transport; `u32::MAX` is
    /// itself a multiple of three and would otherwise pin it to direct.
    pub fn transport_for(failure_count: u32) -> TransportKind {
        if failure_count == u32::MAX {
            return TransportKind::Obfuscated;
        }
        if failure_count % DIRECT_PROBE_INTERVAL == 0 {
            TransportKind::Direct
        } else {
            TransportKind::Obfuscated
        }
    }

    fn combined(&self, stored: u32) -> u32 {
        stored.saturating_add(self.unpersisted.load(Ordering::SeqCst))
    }
}

impl std::fmt::Debug for TransportStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportStrategy")
            .field("last_stored", &self.last_stored.load(Ordering::SeqCst))
            .field("unpersisted", &self.unpersisted.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
