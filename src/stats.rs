use crate::models::{
    Activity, ChartSeries, DashboardResponse, ExportSummary, InsightsResponse, MealLog, MealSlot,
    NavBadges, ProgressCard, SlotTotal, SummaryTotals, WeeklySeries, WellnessGoals,
};
use crate::repository::Snapshot;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Daily intake the consumed-calories card is measured against.
pub const DAILY_INTAKE_TARGET: f64 = 2_500.0;

pub fn total_activity_calories(activities: &[Activity]) -> f64 {
    activities.iter().map(|activity| activity.calories).sum()
}

pub fn total_consumed_calories(meals: &MealLog) -> f64 {
    MealSlot::ALL.into_iter().map(|slot| slot_calories(meals, slot)).sum()
}

pub fn slot_calories(meals: &MealLog, slot: MealSlot) -> f64 {
    meals.slot(slot).iter().map(|meal| meal.calories).sum()
}

pub fn calories_by_slot(meals: &MealLog) -> Vec<SlotTotal> {
    meals
        .iter()
        .map(|(slot, entries)| SlotTotal {
            slot,
            meals: entries.len(),
            calories: slot_calories(meals, slot),
        })
        .collect()
}

/// Consumed minus burned by logged activities.
pub fn net_calories(activities: &[Activity], meals: &MealLog) -> f64 {
    total_consumed_calories(meals) - total_activity_calories(activities)
}

pub fn effective_calories_burned(goals: &WellnessGoals, activities: &[Activity]) -> f64 {
    goals.calories_burned + total_activity_calories(activities)
}

/// `actual / goal` clamped to `[0, 1]`. A goal that is zero, negative or not
/// finite counts as already met.
pub fn progress_fraction(actual: f64, goal: f64) -> f64 {
    if !goal.is_finite() || goal <= 0.0 {
        return 1.0;
    }
    let fraction = actual / goal;
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0)
}

pub fn meal_count_total(meals: &MealLog) -> usize {
    meals.len()
}

pub fn average_activity_calories(activities: &[Activity]) -> f64 {
    if activities.is_empty() {
        return 0.0;
    }
    total_activity_calories(activities) / activities.len() as f64
}

pub fn nav_badges(snapshot: &Snapshot) -> NavBadges {
    NavBadges {
        consumed_calories: total_consumed_calories(&snapshot.meals),
        activity_calories: total_activity_calories(&snapshot.activities),
    }
}

pub fn build_dashboard(snapshot: &Snapshot, goals: &WellnessGoals) -> DashboardResponse {
    let burned = effective_calories_burned(goals, &snapshot.activities);
    let consumed = total_consumed_calories(&snapshot.meals);

    DashboardResponse {
        steps: card("Steps taken", goals.steps_taken, goals.step_goal, "steps"),
        calories_burned: card("Calories burned", burned, goals.calories_goal, "kcal"),
        calories_consumed: card("Calories consumed", consumed, DAILY_INTAKE_TARGET, "kcal"),
        water: card("Water intake", goals.water_intake_ml, goals.water_goal_ml, "ml"),
        net_calories: net_calories(&snapshot.activities, &snapshot.meals),
        meal_count: meal_count_total(&snapshot.meals),
        average_activity_calories: average_activity_calories(&snapshot.activities),
        slots: calories_by_slot(&snapshot.meals),
    }
}

fn card(title: &str, value: f64, goal: f64, unit: &str) -> ProgressCard {
    ProgressCard {
        title: title.to_string(),
        value,
        goal,
        unit: unit.to_string(),
        progress: progress_fraction(value, goal),
    }
}

/// Weekly charts come from the static series; the totals track the live log.
pub fn build_insights(snapshot: &Snapshot, weekly: &WeeklySeries) -> InsightsResponse {
    InsightsResponse {
        activity_minutes: chart(&weekly.days, &weekly.activity_minutes),
        calories: chart(&weekly.days, &weekly.calories),
        summary: summary_totals(snapshot),
    }
}

fn chart(labels: &[String], values: &[f64]) -> ChartSeries {
    ChartSeries {
        labels: labels.to_vec(),
        values: values.to_vec(),
        max: values.iter().copied().fold(1.0, f64::max),
        empty: values.iter().all(|value| *value == 0.0),
    }
}

pub fn summary_totals(snapshot: &Snapshot) -> SummaryTotals {
    SummaryTotals {
        total_activities: snapshot.activities.len(),
        total_meals: meal_count_total(&snapshot.meals),
        total_activity_calories: total_activity_calories(&snapshot.activities),
        total_consumed_calories: total_consumed_calories(&snapshot.meals),
        net_calories: net_calories(&snapshot.activities, &snapshot.meals),
    }
}

pub fn build_export(snapshot: &Snapshot, weekly: &WeeklySeries) -> ExportSummary {
    build_export_at(Utc::now(), snapshot, weekly)
}

pub fn build_export_at(
    generated_at: DateTime<Utc>,
    snapshot: &Snapshot,
    weekly: &WeeklySeries,
) -> ExportSummary {
    ExportSummary {
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        summary: summary_totals(snapshot),
        weekly: weekly.clone(),
        activities: snapshot.activities.clone(),
        meals: snapshot.meals.clone(),
    }
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("fittrack-summary-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Meal, TimeOfDay};
    use crate::seed;
    use chrono::TimeZone;

    fn activity(calories: f64) -> Activity {
        Activity {
            id: format!("a{calories}"),
            name: "Run".into(),
            duration: 30.0,
            calories,
            time_of_day: TimeOfDay::Morning,
        }
    }

    fn meal(calories: f64) -> Meal {
        Meal {
            id: format!("m{calories}"),
            name: "Plate".into(),
            calories,
        }
    }

    fn scenario() -> Snapshot {
        Snapshot {
            activities: vec![activity(300.0)],
            meals: MealLog {
                breakfast: vec![meal(200.0)],
                lunch: vec![meal(400.0)],
                dinner: Vec::new(),
            },
        }
    }

    #[test]
    fn net_calories_scenario() {
        let snapshot = scenario();
        assert_eq!(total_consumed_calories(&snapshot.meals), 600.0);
        assert_eq!(total_activity_calories(&snapshot.activities), 300.0);
        assert_eq!(net_calories(&snapshot.activities, &snapshot.meals), 300.0);
    }

    #[test]
    fn empty_collections_sum_to_zero() {
        assert_eq!(total_activity_calories(&[]), 0.0);
        assert_eq!(total_consumed_calories(&MealLog::default()), 0.0);
        assert_eq!(average_activity_calories(&[]), 0.0);
        assert_eq!(meal_count_total(&MealLog::default()), 0);
    }

    #[test]
    fn average_and_counts() {
        let activities = [activity(100.0), activity(300.0)];
        assert_eq!(average_activity_calories(&activities), 200.0);
        assert_eq!(meal_count_total(&scenario().meals), 2);
    }

    #[test]
    fn progress_is_clamped_and_zero_goal_is_complete() {
        assert_eq!(progress_fraction(5_000.0, 10_000.0), 0.5);
        assert_eq!(progress_fraction(12_000.0, 10_000.0), 1.0);
        assert_eq!(progress_fraction(-5.0, 10.0), 0.0);
        assert_eq!(progress_fraction(0.0, 0.0), 1.0);
        assert_eq!(progress_fraction(10.0, f64::NAN), 1.0);
        assert_eq!(progress_fraction(f64::NAN, 10.0), 0.0);
    }

    #[test]
    fn dashboard_adds_activity_burn_to_baseline() {
        let goals = seed::wellness_goals();
        let dashboard = build_dashboard(&scenario(), &goals);
        assert_eq!(dashboard.calories_burned.value, goals.calories_burned + 300.0);
        assert_eq!(dashboard.calories_consumed.value, 600.0);
        assert_eq!(dashboard.calories_consumed.progress, 600.0 / DAILY_INTAKE_TARGET);
        assert_eq!(dashboard.net_calories, 300.0);
        assert_eq!(dashboard.slots.len(), 3);
        assert_eq!(dashboard.slots[1].slot, MealSlot::Lunch);
        assert_eq!(dashboard.slots[1].calories, 400.0);
    }

    #[test]
    fn dashboard_is_referentially_transparent() {
        let goals = seed::wellness_goals();
        let snapshot = scenario();
        assert_eq!(build_dashboard(&snapshot, &goals), build_dashboard(&snapshot, &goals));
    }

    #[test]
    fn insights_flag_empty_charts() {
        let mut weekly = seed::weekly_series();
        weekly.activity_minutes = [0.0; 7];
        let insights = build_insights(&scenario(), &weekly);
        assert!(insights.activity_minutes.empty);
        assert_eq!(insights.activity_minutes.max, 1.0);
        assert!(!insights.calories.empty);
        assert_eq!(insights.calories.max, 2_400.0);
        assert_eq!(insights.calories.labels[0], "Mon");
        assert_eq!(insights.summary.total_activities, 1);
        assert_eq!(insights.summary.total_consumed_calories, 600.0);
    }

    #[test]
    fn export_carries_totals_and_documents() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 8, 30, 0).unwrap();
        let snapshot = scenario();
        let export = build_export_at(now, &snapshot, &seed::weekly_series());
        assert_eq!(export.generated_at, "2026-01-05T08:30:00.000Z");
        assert_eq!(export.summary.total_activities, 1);
        assert_eq!(export.summary.total_meals, 2);
        assert_eq!(export.summary.net_calories, 300.0);
        assert_eq!(export.activities, snapshot.activities);
        assert_eq!(export.meals, snapshot.meals);
    }

    #[test]
    fn export_file_name_uses_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(export_file_name(date), "fittrack-summary-2026-01-05.json");
    }
}
