use std::fmt;

use crate::filter::{filter_workouts, FilterCriteria};
use crate::models::{StatsSnapshot, WorkoutId, WorkoutRecord};

pub const NO_WORKOUTS_MESSAGE: &str = "No workouts found";
pub const NO_STATS_MESSAGE: &str = "No workouts in the selected period";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// chrono format string used for workout dates.
    pub date_format: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            date_format: "%d.%m.%Y".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSummary {
    pub id: WorkoutId,
    pub date: String,
    pub workout_type: String,
    /// Metric chips in display order: duration, then calories and distance when present.
    pub details: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutCard {
    Workout(WorkoutSummary),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub value: String,
    pub label: String,
    pub detail: Option<String>,
}

pub fn summarize(workout: &WorkoutRecord, options: &RenderOptions) -> WorkoutSummary {
    let mut details = vec![format!("{} min", workout.duration_minutes)];
    if let Some(kcal) = workout.calories_burned.filter(|c| *c > 0) {
        details.push(format!("{} kcal", kcal));
    }
    if let Some(km) = workout.distance_km.filter(|d| *d > 0.0) {
        details.push(format!("{} km", km));
    }

    WorkoutSummary {
        id: workout.id,
        date: workout.date.format(&options.date_format).to_string(),
        workout_type: workout.workout_type.clone(),
        details,
        notes: workout.notes.clone().filter(|n| !n.is_empty()),
    }
}

/// Maps workouts to cards. An empty slice yields a single placeholder card.
pub fn render_workouts(workouts: &[WorkoutRecord], options: &RenderOptions) -> Vec<WorkoutCard> {
    if workouts.is_empty() {
        return vec![WorkoutCard::Placeholder];
    }
    workouts
        .iter()
        .map(|w| WorkoutCard::Workout(summarize(w, options)))
        .collect()
}

pub fn filter_and_render(
    all: &[WorkoutRecord],
    criteria: &FilterCriteria,
    options: &RenderOptions,
) -> Vec<WorkoutCard> {
    render_workouts(&filter_workouts(all, criteria), options)
}

pub fn render_stats(stats: &StatsSnapshot) -> Vec<StatCard> {
    if stats.total_workouts == 0 {
        return vec![StatCard {
            value: "0".to_string(),
            label: NO_STATS_MESSAGE.to_string(),
            detail: None,
        }];
    }

    let mut cards = vec![
        StatCard {
            value: stats.total_workouts.to_string(),
            label: "Total workouts".to_string(),
            detail: None,
        },
        StatCard {
            value: ((stats.total_duration_minutes as f64) / 60.0).round().to_string(),
            label: "Hours of training".to_string(),
            detail: None,
        },
    ];

    if stats.total_calories_burned > 0 {
        cards.push(StatCard {
            value: stats.total_calories_burned.to_string(),
            label: "Calories burned".to_string(),
            detail: None,
        });
    }
    if stats.total_distance_km > 0.0 {
        cards.push(StatCard {
            value: format!("{:.1}", stats.total_distance_km),
            label: "Kilometers covered".to_string(),
            detail: None,
        });
    }

    for (workout_type, per_type) in &stats.workout_types {
        cards.push(StatCard {
            value: per_type.count.to_string(),
            label: workout_type.clone(),
            detail: Some(format!("{} min", per_type.total_duration)),
        });
    }

    cards
}

impl fmt::Display for WorkoutCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutCard::Placeholder => write!(f, "{}", NO_WORKOUTS_MESSAGE),
            WorkoutCard::Workout(summary) => {
                write!(
                    f,
                    "#{} {}  {}  {}",
                    summary.id,
                    summary.date,
                    summary.workout_type,
                    summary.details.join(" | ")
                )?;
                if let Some(notes) = &summary.notes {
                    write!(f, "\n    Notes: {}", notes)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for StatCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}  {}", self.value, self.label)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}
