use chrono::{Days, NaiveDate};

use crate::models::WorkoutRecord;

/// Criteria applied to the locally loaded workouts. Unset or empty fields are no-ops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub search_term: Option<String>,
    pub workout_type: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Window covering the last `days` days up to and including `today`.
    /// A window reaching past the earliest representable date starts there.
    pub fn last_days(days: u32, today: NaiveDate) -> Self {
        let from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            date_from: Some(from),
            date_to: Some(today),
            ..Self::default()
        }
    }

    fn active_search(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn active_type(&self) -> Option<&str> {
        self.workout_type.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active_search().is_none()
            && self.active_type().is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }
}

/// Returns the workouts matching every active criterion, in input order.
pub fn filter_workouts(all: &[WorkoutRecord], criteria: &FilterCriteria) -> Vec<WorkoutRecord> {
    let search = criteria.active_search();
    let workout_type = criteria.active_type();

    all.iter()
        .filter(|w| match &search {
            Some(term) => w
                .notes
                .as_deref()
                .is_some_and(|notes| notes.to_lowercase().contains(term.as_str())),
            None => true,
        })
        .filter(|w| workout_type.map_or(true, |t| w.workout_type == t))
        .filter(|w| criteria.date_from.map_or(true, |from| w.date >= from))
        .filter(|w| criteria.date_to.map_or(true, |to| w.date <= to))
        .cloned()
        .collect()
}
