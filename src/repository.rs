use crate::errors::{CoreError, PersistenceError};
use crate::ids::IdProvider;
use crate::models::{Activity, ActivityDraft, Meal, MealDraft, MealLog, MealSlot, TimeOfDay};
use crate::seed::SeedData;
use crate::storage::Store;
use std::sync::Arc;
use tracing::{debug, info};

const ACTIVITY_ID_PREFIX: &str = "a";
const MEAL_ID_PREFIX: &str = "m";

/// An immutable copy of both collections at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub activities: Vec<Activity>,
    pub meals: MealLog,
}

impl Snapshot {
    /// Reads the persisted documents, treating absent ones as empty.
    pub fn load(store: &Store) -> Self {
        Self {
            activities: store.load_activities().unwrap_or_default(),
            meals: store.load_meals().unwrap_or_default(),
        }
    }
}

/// Session-owned copy of the activity and meal collections. All mutation goes
/// through here and is written through to the store.
pub struct Repository {
    store: Arc<Store>,
    seed: SeedData,
    ids: Box<dyn IdProvider>,
    activities: Vec<Activity>,
    meals: MealLog,
    stale: bool,
}

impl Repository {
    /// Builds an uninitialized repository. The first mutation loads the
    /// store; call [`Repository::reload`] to load eagerly.
    pub fn new(store: Arc<Store>, seed: SeedData, ids: impl IdProvider + 'static) -> Self {
        Self {
            store,
            seed,
            ids: Box::new(ids),
            activities: Vec::new(),
            meals: MealLog::default(),
            stale: true,
        }
    }

    pub fn open(
        store: Arc<Store>,
        seed: SeedData,
        ids: impl IdProvider + 'static,
    ) -> Result<Self, PersistenceError> {
        let mut repo = Self::new(store, seed, ids);
        repo.reload()?;
        Ok(repo)
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn reload(&mut self) -> Result<(), PersistenceError> {
        self.initialize_activities()?;
        self.initialize_meals()?;
        self.stale = false;
        Ok(())
    }

    /// Loads stored activities, or falls back to the seed. A seed is only
    /// persisted when it has entries, and a stored empty list is kept as is.
    pub fn initialize_activities(&mut self) -> Result<(), PersistenceError> {
        match self.store.load_activities() {
            Some(stored) => {
                debug!(count = stored.len(), "loaded stored activities");
                self.activities = stored;
            }
            None => {
                self.activities = self.seed.activities.clone();
                if !self.activities.is_empty() {
                    info!(count = self.activities.len(), "seeding starter activities");
                    self.store.save_activities(&self.activities)?;
                }
            }
        }
        Ok(())
    }

    pub fn initialize_meals(&mut self) -> Result<(), PersistenceError> {
        match self.store.load_meals() {
            Some(stored) => {
                debug!(count = stored.len(), "loaded stored meals");
                self.meals = stored;
            }
            None => {
                self.meals = self.seed.meals.clone();
                if !self.meals.is_empty() {
                    info!(count = self.meals.len(), "seeding starter meals");
                    self.store.save_meals(&self.meals)?;
                }
            }
        }
        Ok(())
    }

    /// Most recent first.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn activities_by_time(&self, filter: Option<TimeOfDay>) -> Vec<Activity> {
        self.activities
            .iter()
            .filter(|activity| filter.is_none_or(|period| activity.time_of_day == period))
            .cloned()
            .collect()
    }

    pub fn meals(&self) -> &MealLog {
        &self.meals
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            activities: self.activities.clone(),
            meals: self.meals.clone(),
        }
    }

    pub fn add_activity(&mut self, draft: ActivityDraft) -> Result<Activity, CoreError> {
        let new_activity = draft.validate()?;
        self.ensure_loaded()?;

        let activity = new_activity.with_id(self.ids.next_id(ACTIVITY_ID_PREFIX));
        self.activities.insert(0, activity.clone());
        self.store.save_activities(&self.activities)?;
        Ok(activity)
    }

    /// Returns whether an entry was removed. A missing id is not an error.
    pub fn remove_activity(&mut self, id: &str) -> Result<bool, PersistenceError> {
        self.ensure_loaded()?;
        let Some(index) = self.activities.iter().position(|activity| activity.id == id) else {
            return Ok(false);
        };
        self.activities.remove(index);
        self.store.save_activities(&self.activities)?;
        Ok(true)
    }

    /// Appends to the end of the slot, so each slot stays oldest first.
    pub fn add_meal(&mut self, slot: MealSlot, draft: MealDraft) -> Result<Meal, CoreError> {
        let new_meal = draft.validate()?;
        self.ensure_loaded()?;

        let meal = new_meal.with_id(self.ids.next_id(MEAL_ID_PREFIX));
        self.meals.slot_mut(slot).push(meal.clone());
        self.store.save_meals(&self.meals)?;
        Ok(meal)
    }

    pub fn remove_meal(&mut self, slot: MealSlot, id: &str) -> Result<bool, PersistenceError> {
        self.ensure_loaded()?;
        let meals = self.meals.slot_mut(slot);
        let Some(index) = meals.iter().position(|meal| meal.id == id) else {
            return Ok(false);
        };
        meals.remove(index);
        self.store.save_meals(&self.meals)?;
        Ok(true)
    }

    /// Clears both stored documents. The in-memory copies are emptied and
    /// marked stale; the next mutation or [`Repository::reload`] reseeds.
    pub fn reset_all(&mut self) -> Result<(), PersistenceError> {
        self.store.reset_all()?;
        self.activities.clear();
        self.meals = MealLog::default();
        self.stale = true;
        Ok(())
    }

    fn ensure_loaded(&mut self) -> Result<(), PersistenceError> {
        if self.stale {
            self.reload()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn repo_with(seed: SeedData) -> Repository {
        Repository::open(Arc::new(Store::in_memory()), seed, SequentialIds::new()).unwrap()
    }

    #[test]
    fn activities_are_most_recent_first() {
        let mut repo = repo_with(SeedData::empty());
        repo.add_activity(ActivityDraft::new("Run", 30.0, 300.0, TimeOfDay::Morning)).unwrap();
        repo.add_activity(ActivityDraft::new("Swim", 20.0, 200.0, TimeOfDay::Evening)).unwrap();

        let names: Vec<_> = repo.activities().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Swim", "Run"]);
        assert_eq!(repo.activities()[0].id, "a-2");
    }

    #[test]
    fn meals_are_oldest_first() {
        let mut repo = repo_with(SeedData::empty());
        repo.add_meal(MealSlot::Dinner, MealDraft::new("Soup", 90.0)).unwrap();
        repo.add_meal(MealSlot::Dinner, MealDraft::new("Pasta", 650.0)).unwrap();

        let names: Vec<_> = repo.meals().dinner.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Soup", "Pasta"]);
        assert!(repo.meals().breakfast.is_empty());
    }

    #[test]
    fn filter_by_time_of_day() {
        let repo = repo_with(SeedData::bundled());
        let evening = repo.activities_by_time(Some(TimeOfDay::Evening));
        assert!(evening.iter().all(|a| a.time_of_day == TimeOfDay::Evening));
        assert!(!evening.is_empty());
        assert_eq!(repo.activities_by_time(None).len(), repo.activities().len());
    }

    #[test]
    fn remove_meal_is_scoped_to_slot() {
        let mut repo = repo_with(SeedData::bundled());
        assert!(!repo.remove_meal(MealSlot::Lunch, "b1").unwrap());
        assert_eq!(repo.meals().breakfast.len(), 2);
        assert!(repo.remove_meal(MealSlot::Breakfast, "b1").unwrap());
        assert_eq!(repo.meals().breakfast.len(), 1);
    }

    #[test]
    fn added_ids_do_not_collide_with_seed_ids() {
        let mut repo = repo_with(SeedData::bundled());
        repo.add_activity(ActivityDraft::new("Row", 20.0, 180.0, TimeOfDay::Morning)).unwrap();
        repo.add_meal(MealSlot::Breakfast, MealDraft::new("Toast", 150.0)).unwrap();

        let mut activity_ids: Vec<_> = repo.activities().iter().map(|a| a.id.as_str()).collect();
        activity_ids.sort_unstable();
        activity_ids.dedup();
        assert_eq!(activity_ids.len(), repo.activities().len());

        let mut meal_ids: Vec<_> = repo
            .meals()
            .iter()
            .flat_map(|(_, meals)| meals)
            .map(|m| m.id.as_str())
            .collect();
        meal_ids.sort_unstable();
        meal_ids.dedup();
        assert_eq!(meal_ids.len(), repo.meals().len());
    }

    #[test]
    fn mutation_after_reset_reseeds() {
        let mut repo = repo_with(SeedData::bundled());
        repo.reset_all().unwrap();
        assert!(repo.is_stale());
        assert!(repo.activities().is_empty());

        repo.add_activity(ActivityDraft::new("Hike", 120.0, 700.0, TimeOfDay::Afternoon)).unwrap();
        assert!(!repo.is_stale());
        assert_eq!(repo.activities().len(), 4);
        assert_eq!(repo.activities()[0].name, "Hike");
    }
}
