use crate::bus::{EventKind, StoreEvent};
use crate::models::{WeeklySeries, WellnessGoals};
use crate::repository::Repository;
use crate::storage::Store;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub repo: Arc<Mutex<Repository>>,
    pub goals: Arc<WellnessGoals>,
    pub weekly: Arc<WeeklySeries>,
}

impl AppState {
    pub fn new(repo: Repository, goals: WellnessGoals, weekly: WeeklySeries) -> Self {
        let store = Arc::clone(repo.store());
        for kind in [EventKind::ActivitiesChanged, EventKind::MealsChanged, EventKind::Reset] {
            store.bus().subscribe(kind, log_change);
        }

        Self {
            store,
            repo: Arc::new(Mutex::new(repo)),
            goals: Arc::new(goals),
            weekly: Arc::new(weekly),
        }
    }
}

fn log_change(event: &StoreEvent) -> anyhow::Result<()> {
    match event {
        StoreEvent::ActivitiesChanged(activities) => info!(count = activities.len(), "activities changed"),
        StoreEvent::MealsChanged(meals) => info!(count = meals.len(), "meals changed"),
        StoreEvent::Reset => info!("stored data reset"),
    }
    Ok(())
}
