use crate::errors::{Field, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_ACTIVITY_MINUTES: f64 = 1440.0;
pub const MAX_ACTIVITY_CALORIES: f64 = 10_000.0;
pub const MAX_MEAL_CALORIES: f64 = 5_000.0;
pub const MIN_NAME_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 3] = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TimeOfDay::ALL
            .into_iter()
            .find(|period| period.as_str() == value.trim())
            .ok_or_else(|| {
                ValidationError::new(
                    Field::TimeOfDay,
                    format!("'{value}' is not one of Morning, Afternoon, Evening"),
                )
            })
    }
}

/// The three fixed meal categories. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        MealSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == value.trim())
            .ok_or_else(|| {
                ValidationError::new(
                    Field::Slot,
                    format!("'{value}' is not one of Breakfast, Lunch, Dinner"),
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub duration: f64,
    pub calories: f64,
    pub time_of_day: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub calories: f64,
}

/// Unvalidated input for a new activity. Every field is optional so that a
/// missing value is reported as a validation failure on that field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityDraft {
    pub name: Option<String>,
    pub duration: Option<f64>,
    pub calories: Option<f64>,
    pub time_of_day: Option<String>,
}

impl ActivityDraft {
    pub fn new(name: impl Into<String>, duration: f64, calories: f64, time_of_day: TimeOfDay) -> Self {
        Self {
            name: Some(name.into()),
            duration: Some(duration),
            calories: Some(calories),
            time_of_day: Some(time_of_day.as_str().to_string()),
        }
    }

    /// Checks every field in declaration order and reports the first failure.
    pub fn validate(self) -> Result<NewActivity, ValidationError> {
        let name = validate_name(self.name)?;
        let duration = require_number(Field::Duration, self.duration)?;
        if duration <= 0.0 || duration > MAX_ACTIVITY_MINUTES {
            return Err(ValidationError::new(
                Field::Duration,
                format!("must be greater than 0 and at most {MAX_ACTIVITY_MINUTES} minutes"),
            ));
        }
        let calories = require_number(Field::Calories, self.calories)?;
        if !(0.0..=MAX_ACTIVITY_CALORIES).contains(&calories) {
            return Err(ValidationError::new(
                Field::Calories,
                format!("must be between 0 and {MAX_ACTIVITY_CALORIES}"),
            ));
        }
        let time_of_day = self
            .time_of_day
            .ok_or_else(|| ValidationError::new(Field::TimeOfDay, "is required"))?
            .parse::<TimeOfDay>()?;

        Ok(NewActivity {
            name,
            duration,
            calories,
            time_of_day,
        })
    }
}

/// A draft that passed validation and only lacks an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub name: String,
    pub duration: f64,
    pub calories: f64,
    pub time_of_day: TimeOfDay,
}

impl NewActivity {
    pub fn with_id(self, id: String) -> Activity {
        Activity {
            id,
            name: self.name,
            duration: self.duration,
            calories: self.calories,
            time_of_day: self.time_of_day,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MealDraft {
    pub name: Option<String>,
    pub calories: Option<f64>,
}

impl MealDraft {
    pub fn new(name: impl Into<String>, calories: f64) -> Self {
        Self {
            name: Some(name.into()),
            calories: Some(calories),
        }
    }

    pub fn validate(self) -> Result<NewMeal, ValidationError> {
        let name = validate_name(self.name)?;
        let calories = require_number(Field::Calories, self.calories)?;
        if calories <= 0.0 || calories > MAX_MEAL_CALORIES {
            return Err(ValidationError::new(
                Field::Calories,
                format!("must be greater than 0 and at most {MAX_MEAL_CALORIES}"),
            ));
        }
        Ok(NewMeal { name, calories })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub name: String,
    pub calories: f64,
}

impl NewMeal {
    pub fn with_id(self, id: String) -> Meal {
        Meal {
            id,
            name: self.name,
            calories: self.calories,
        }
    }
}

fn validate_name(name: Option<String>) -> Result<String, ValidationError> {
    let name = name.unwrap_or_default();
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::new(
            Field::Name,
            format!("must be at least {MIN_NAME_CHARS} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

fn require_number(field: Field, value: Option<f64>) -> Result<f64, ValidationError> {
    match value {
        Some(number) if number.is_finite() => Ok(number),
        Some(_) => Err(ValidationError::new(field, "must be a finite number")),
        None => Err(ValidationError::new(field, "is required")),
    }
}

/// Meals grouped by slot. Always carries exactly the three slot keys; a
/// stored document missing a key loads with that slot empty and unknown keys
/// are dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MealLog {
    #[serde(rename = "Breakfast", default)]
    pub breakfast: Vec<Meal>,
    #[serde(rename = "Lunch", default)]
    pub lunch: Vec<Meal>,
    #[serde(rename = "Dinner", default)]
    pub dinner: Vec<Meal>,
}

impl MealLog {
    pub fn slot(&self, slot: MealSlot) -> &[Meal] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
        }
    }

    pub fn slot_mut(&mut self, slot: MealSlot) -> &mut Vec<Meal> {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MealSlot, &[Meal])> {
        MealSlot::ALL.into_iter().map(move |slot| (slot, self.slot(slot)))
    }

    pub fn len(&self) -> usize {
        self.iter().map(|(_, meals)| meals.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Static dashboard reference values. Not part of persisted user state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessGoals {
    pub steps_taken: f64,
    pub step_goal: f64,
    pub calories_burned: f64,
    pub calories_goal: f64,
    pub water_intake_ml: f64,
    pub water_goal_ml: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySeries {
    pub days: [String; 7],
    pub activity_minutes: [f64; 7],
    pub calories: [f64; 7],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressCard {
    pub title: String,
    pub value: f64,
    pub goal: f64,
    pub unit: String,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotTotal {
    pub slot: MealSlot,
    pub meals: usize,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub steps: ProgressCard,
    pub calories_burned: ProgressCard,
    pub calories_consumed: ProgressCard,
    pub water: ProgressCard,
    pub net_calories: f64,
    pub meal_count: usize,
    pub average_activity_calories: f64,
    pub slots: Vec<SlotTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavBadges {
    pub consumed_calories: f64,
    pub activity_calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub max: f64,
    pub empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub activity_minutes: ChartSeries,
    pub calories: ChartSeries,
    pub summary: SummaryTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub total_activities: usize,
    pub total_meals: usize,
    pub total_activity_calories: f64,
    pub total_consumed_calories: f64,
    pub net_calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub generated_at: String,
    pub summary: SummaryTotals,
    pub weekly: WeeklySeries,
    pub activities: Vec<Activity>,
    pub meals: MealLog,
}
