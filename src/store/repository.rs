//! Per-user entry and goal records on top of a [`KeyValueStore`].

use super::{KeyValueStore, StoreResult};
use crate::analysis::aggregator::entries_on_day;
use crate::analysis::estimator::NutritionEstimate;
use crate::models::{FoodEntry, MealType, UserGoals};
use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, warn};

fn entries_key(user_id: &str) -> String {
    format!("food_entries:{}", user_id)
}

fn goals_key(user_id: &str) -> String {
    format!("user_goals:{}", user_id)
}

/// A meal about to be logged.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub food_name: String,
    pub quantity: f64,
    pub meal_type: MealType,
    pub nutrition: NutritionEstimate,
    pub fiber: f64,
}

/// Reads and writes user records as JSON values.
#[derive(Debug)]
pub struct EntryRepository<S> {
    store: S,
}

impl<S: KeyValueStore> EntryRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// All entries for a user in insertion order.
    pub fn get_entries(&self, user_id: &str) -> StoreResult<Vec<FoodEntry>> {
        match self.store.get(&entries_key(user_id)) {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Append an entry stamped with `now`; the id is the millisecond timestamp.
    pub fn add_entry(
        &mut self,
        user_id: &str,
        entry: NewEntry,
        now: DateTime<Utc>,
    ) -> StoreResult<FoodEntry> {
        let mut entries = self.get_entries(user_id)?;

        let stored = FoodEntry {
            id: now.timestamp_millis().to_string(),
            user_id: user_id.to_string(),
            food_name: entry.food_name,
            quantity: entry.quantity,
            meal_type: entry.meal_type,
            calories: entry.nutrition.calories,
            protein: entry.nutrition.protein,
            carbs: entry.nutrition.carbs,
            fat: entry.nutrition.fat,
            fiber: entry.fiber,
            timestamp: now,
        };
        entries.push(stored.clone());

        self.store
            .set(&entries_key(user_id), serde_json::to_string(&entries)?);
        debug!("Stored entry {} for {} ({} total)", stored.id, user_id, entries.len());
        Ok(stored)
    }

    /// Entries logged on the local calendar day containing `now`.
    pub fn today_entries(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> StoreResult<Vec<FoodEntry>> {
        let entries = self.get_entries(user_id)?;
        Ok(entries_on_day(
            &entries,
            now.with_timezone(&offset).date_naive(),
            offset,
        ))
    }

    pub fn set_goals(&mut self, user_id: &str, goals: &UserGoals) -> StoreResult<()> {
        self.store
            .set(&goals_key(user_id), serde_json::to_string(goals)?);
        Ok(())
    }

    /// Stored goals, persisting `defaults` on first read.
    ///
    /// Unreadable goals fall back to `defaults` without overwriting them.
    pub fn get_goals_or(&mut self, user_id: &str, defaults: UserGoals) -> StoreResult<UserGoals> {
        match self.store.get(&goals_key(user_id)) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(goals) => Ok(goals),
                Err(e) => {
                    warn!("Stored goals for {} are unreadable ({}), using defaults", user_id, e);
                    Ok(defaults)
                }
            },
            None => {
                debug!("No goals stored for {}, saving defaults", user_id);
                self.set_goals(user_id, &defaults)?;
                Ok(defaults)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::estimator::estimate;
    use crate::models::GoalType;
    use crate::store::{JsonFileStore, MemoryStore, StoreError};
    use chrono::TimeZone;
    use tempfile::TempDir;
    use tokio_test::block_on;

    const SAMPLE_STORE: &str = include_str!("../../fixtures/sample_store.json");

    fn apple() -> NewEntry {
        NewEntry {
            food_name: "apple".to_string(),
            quantity: 1.0,
            meal_type: MealType::Snack,
            nutrition: estimate("apple", 1.0),
            fiber: 0.0,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_add_and_get_entries() {
        let mut repo = EntryRepository::new(MemoryStore::new());

        let first = repo.add_entry("u1", apple(), at(1, 8)).unwrap();
        repo.add_entry("u1", apple(), at(1, 9)).unwrap();
        repo.add_entry("u2", apple(), at(1, 10)).unwrap();

        assert_eq!(first.id, at(1, 8).timestamp_millis().to_string());
        assert_eq!(first.calories, 52.0);

        let entries = repo.get_entries("u1").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], first);
        assert_eq!(repo.get_entries("u2").unwrap().len(), 1);
        assert!(repo.get_entries("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_today_entries() {
        let mut repo = EntryRepository::new(MemoryStore::new());
        repo.add_entry("u", apple(), at(1, 23)).unwrap();
        repo.add_entry("u", apple(), at(2, 8)).unwrap();

        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(repo.today_entries("u", at(2, 12), utc).unwrap().len(), 1);

        // At UTC+2 the 23:00 entry already belongs to the 2nd.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(repo.today_entries("u", at(2, 12), plus_two).unwrap().len(), 2);
    }

    #[test]
    fn test_default_goals_persisted_on_first_read() {
        let mut repo = EntryRepository::new(MemoryStore::new());

        let goals = repo.get_goals_or("u", UserGoals::default()).unwrap();
        assert_eq!(goals, UserGoals::default());
        assert!(repo.store_mut().get("user_goals:u").is_some());
    }

    #[test]
    fn test_custom_defaults_only_apply_when_missing() {
        let mut repo = EntryRepository::new(MemoryStore::new());
        let custom = UserGoals {
            calories: 1600.0,
            ..UserGoals::default()
        };

        assert_eq!(repo.get_goals_or("u", custom.clone()).unwrap().calories, 1600.0);
        // Already persisted, so later defaults are ignored.
        assert_eq!(repo.get_goals_or("u", UserGoals::default()).unwrap().calories, 1600.0);
    }

    #[test]
    fn test_goals_round_trip() {
        let mut repo = EntryRepository::new(MemoryStore::new());
        let goals = UserGoals {
            calories: 1800.0,
            weight: Some(82.0),
            goal: GoalType::WeightLoss,
            ..UserGoals::default()
        };

        repo.set_goals("u", &goals).unwrap();
        assert_eq!(repo.get_goals_or("u", UserGoals::default()).unwrap(), goals);
    }

    #[test]
    fn test_corrupt_goals_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set("user_goals:u", "{broken".to_string());
        let mut repo = EntryRepository::new(store);

        assert_eq!(
            repo.get_goals_or("u", UserGoals::default()).unwrap(),
            UserGoals::default()
        );
        assert_eq!(repo.store_mut().get("user_goals:u").as_deref(), Some("{broken"));
    }

    #[test]
    fn test_corrupt_entries_are_an_error() {
        let mut store = MemoryStore::new();
        store.set("food_entries:u", "[{]".to_string());
        let repo = EntryRepository::new(store);

        assert!(matches!(repo.get_entries("u"), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_sample_fixture() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, SAMPLE_STORE).unwrap();

        let store = block_on(JsonFileStore::open(&path)).unwrap();
        let mut repo = EntryRepository::new(store);

        let entries = repo.get_entries("demo").unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].food_name, "eggs");
        // The oldest entry predates fiber tracking.
        assert_eq!(entries[0].fiber, 0.0);

        let goals = repo.get_goals_or("demo", UserGoals::default()).unwrap();
        assert_eq!(goals.goal, GoalType::WeightLoss);
        assert_eq!(goals.weight, Some(82.0));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut repo = EntryRepository::new(block_on(JsonFileStore::open(&path)).unwrap());
        repo.add_entry("u", apple(), at(3, 12)).unwrap();
        block_on(repo.store_mut().flush()).unwrap();

        let reopened = EntryRepository::new(block_on(JsonFileStore::open(&path)).unwrap());
        let entries = reopened.get_entries("u").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].food_name, "apple");
    }
}
