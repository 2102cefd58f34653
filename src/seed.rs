//! Bundled reference data: starter entries and the static dashboard and
//! insights figures.

use crate::models::{Activity, Meal, MealLog, TimeOfDay, WeeklySeries, WellnessGoals};

/// What the repository falls back to when a document has never been stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedData {
    pub activities: Vec<Activity>,
    pub meals: MealLog,
}

impl SeedData {
    pub fn bundled() -> Self {
        Self {
            activities: starter_activities(),
            meals: starter_meals(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

pub fn starter_activities() -> Vec<Activity> {
    vec![
        activity("a1", "Morning Run", 30.0, 300.0, TimeOfDay::Morning),
        activity("a2", "Cycling", 45.0, 420.0, TimeOfDay::Afternoon),
        activity("a3", "Yoga", 40.0, 160.0, TimeOfDay::Evening),
    ]
}

pub fn starter_meals() -> MealLog {
    MealLog {
        breakfast: vec![
            meal("b1", "Oatmeal with Berries", 320.0),
            meal("b2", "Green Smoothie", 180.0),
        ],
        lunch: vec![
            meal("l1", "Grilled Chicken Salad", 450.0),
            meal("l2", "Quinoa Bowl", 520.0),
        ],
        dinner: vec![meal("d1", "Salmon & Veggies", 600.0), meal("d2", "Miso Soup", 90.0)],
    }
}

pub fn wellness_goals() -> WellnessGoals {
    WellnessGoals {
        steps_taken: 7_850.0,
        step_goal: 10_000.0,
        calories_burned: 1_650.0,
        calories_goal: 2_500.0,
        water_intake_ml: 1_800.0,
        water_goal_ml: 2_500.0,
    }
}

pub fn weekly_series() -> WeeklySeries {
    WeeklySeries {
        days: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].map(String::from),
        activity_minutes: [45.0, 30.0, 60.0, 20.0, 50.0, 90.0, 35.0],
        calories: [2_100.0, 1_950.0, 2_300.0, 1_800.0, 2_050.0, 2_400.0, 2_000.0],
    }
}

fn activity(id: &str, name: &str, duration: f64, calories: f64, time_of_day: TimeOfDay) -> Activity {
    Activity {
        id: id.into(),
        name: name.into(),
        duration,
        calories,
        time_of_day,
    }
}

fn meal(id: &str, name: &str, calories: f64) -> Meal {
    Meal {
        id: id.into(),
        name: name.into(),
        calories,
    }
}
