//! In-process publish/subscribe channel for store change notifications.
//!
//! Delivery is synchronous. Each handler runs in isolation: an `Err` return or
//! a panic is logged and the remaining handlers still run. Nothing is queued,
//! so a handler registered after a publish never observes it.

use crate::models::{Activity, MealLog};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    ActivitiesChanged(Vec<Activity>),
    MealsChanged(MealLog),
    Reset,
}

impl StoreEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            StoreEvent::ActivitiesChanged(_) => EventKind::ActivitiesChanged,
            StoreEvent::MealsChanged(_) => EventKind::MealsChanged,
            StoreEvent::Reset => EventKind::Reset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ActivitiesChanged,
    MealsChanged,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&StoreEvent) -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    handlers: Mutex<HashMap<EventKind, Vec<(SubscriptionId, Handler)>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Returns `false` when the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        for list in handlers.values_mut() {
            if let Some(index) = list.iter().position(|(existing, _)| *existing == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Delivers `event` to every handler registered for its kind and returns
    /// how many completed without error.
    pub(crate) fn publish(&self, event: &StoreEvent) -> usize {
        let kind = event.kind();
        // Handlers run without the registry lock held so they may subscribe,
        // unsubscribe or read the store.
        let handlers: Vec<Handler> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map(|list| list.iter().map(|(_, handler)| Arc::clone(handler)).collect())
            .unwrap_or_default();

        let mut delivered = 0;
        for handler in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(err)) => warn!(?kind, error = %err, "event subscriber failed"),
                Err(_) => warn!(?kind, "event subscriber panicked"),
            }
        }
        delivered
    }
}
