use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::filter::FilterCriteria;
use crate::models::{Period, WorkoutDraft, WorkoutId};

#[derive(Parser, Debug)]
#[command(
    name = "fitness-journal",
    about = "Log workouts and review training statistics against a Fitness Journal server"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,

    /// API base URL, overriding the configured `api_base_url`.
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Increase log verbosity (-v, -vv). Defaults to WARN.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q).
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Sign in and remember the session until logout.
    Login {
        username: String,
        /// Prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a new account.
    Register {
        username: String,
        email: String,
        /// Prompted for (twice) when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the saved session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List workouts matching the given filters.
    List(ListArgs),
    /// Show a single workout fetched from the server.
    Show { id: WorkoutId },
    /// Log a new workout.
    Add(AddArgs),
    /// Change fields of an existing workout. Omitted fields keep their value.
    Edit {
        id: WorkoutId,
        #[command(flatten)]
        changes: EditArgs,
    },
    /// Delete a workout.
    Delete {
        id: WorkoutId,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show aggregate statistics for a period (week, month, year, all).
    Stats {
        #[arg(long)]
        period: Option<Period>,
    },
    /// Check that the server is reachable.
    Health,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive text to look for in notes.
    #[arg(long)]
    pub search: Option<String>,

    /// Exact workout type, e.g. running.
    #[arg(long = "type", value_name = "TYPE")]
    pub workout_type: Option<String>,

    /// First day to include (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Size of the default date window in days.
    #[arg(long, conflicts_with = "all")]
    pub days: Option<u32>,

    /// Drop the default date window.
    #[arg(long)]
    pub all: bool,
}

impl ListArgs {
    pub fn criteria(&self, default_days: u32, today: NaiveDate) -> FilterCriteria {
        let window = if self.all {
            FilterCriteria::default()
        } else {
            FilterCriteria::last_days(self.days.unwrap_or(default_days), today)
        };

        FilterCriteria {
            search_term: self.search.clone(),
            workout_type: self.workout_type.clone(),
            date_from: self.from.or(window.date_from),
            date_to: self.to.or(window.date_to),
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long = "type", value_name = "TYPE")]
    pub workout_type: String,

    /// Duration in minutes.
    #[arg(long)]
    pub duration: u32,

    #[arg(long)]
    pub calories: Option<u32>,

    /// Distance in kilometers.
    #[arg(long)]
    pub distance: Option<f64>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl AddArgs {
    pub fn into_draft(self, today: NaiveDate) -> WorkoutDraft {
        WorkoutDraft {
            date: self.date.unwrap_or(today),
            workout_type: self.workout_type,
            duration_minutes: self.duration,
            calories_burned: self.calories,
            distance_km: self.distance,
            notes: self.notes.filter(|n| !n.is_empty()),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long = "type", value_name = "TYPE")]
    pub workout_type: Option<String>,

    #[arg(long)]
    pub duration: Option<u32>,

    #[arg(long)]
    pub calories: Option<u32>,

    #[arg(long)]
    pub distance: Option<f64>,

    /// An empty string clears the notes.
    #[arg(long)]
    pub notes: Option<String>,
}

impl EditArgs {
    pub fn apply(self, mut draft: WorkoutDraft) -> WorkoutDraft {
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(workout_type) = self.workout_type {
            draft.workout_type = workout_type;
        }
        if let Some(duration) = self.duration {
            draft.duration_minutes = duration;
        }
        if let Some(calories) = self.calories {
            draft.calories_burned = Some(calories);
        }
        if let Some(distance) = self.distance {
            draft.distance_km = Some(distance);
        }
        if let Some(notes) = self.notes {
            draft.notes = Some(notes).filter(|n| !n.is_empty());
        }
        draft
    }
}
