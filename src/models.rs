use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type WorkoutId = i64;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkoutRecord {
    pub id: WorkoutId,
    pub date: NaiveDate,
    pub workout_type: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub calories_burned: Option<u32>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of create and update requests: a workout without its server-assigned id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub date: NaiveDate,
    pub workout_type: String,
    pub duration_minutes: u32,
    pub calories_burned: Option<u32>,
    pub distance_km: Option<f64>,
    pub notes: Option<String>,
}

impl WorkoutDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.workout_type.trim().is_empty() {
            return Err("Workout type is required".to_string());
        }
        if self.duration_minutes == 0 {
            return Err("Duration must be a positive number of minutes".to_string());
        }
        if let Some(km) = self.distance_km {
            if !km.is_finite() || km < 0.0 {
                return Err(format!("Distance must be a non-negative number, got {}", km));
            }
        }
        Ok(())
    }
}

impl From<&WorkoutRecord> for WorkoutDraft {
    fn from(record: &WorkoutRecord) -> Self {
        Self {
            date: record.date,
            workout_type: record.workout_type.clone(),
            duration_minutes: record.duration_minutes,
            calories_burned: record.calories_burned,
            distance_km: record.distance_km,
            notes: record.notes.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TypeStats {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_duration: u64,
    #[serde(default)]
    pub total_calories: u64,
}

/// Aggregates computed by the server for one [`Period`]. Never derived locally.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_workouts: u32,
    #[serde(default)]
    pub total_duration_minutes: u64,
    #[serde(default)]
    pub total_calories_burned: u64,
    #[serde(default)]
    pub total_distance_km: f64,
    #[serde(default)]
    pub workout_types: BTreeMap<String, TypeStats>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            "all" => Ok(Period::All),
            other => Err(format!(
                "unknown period '{}', expected week, month, year or all",
                other
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Shape of every non-2xx response body.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
}
