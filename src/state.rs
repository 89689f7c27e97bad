use tracing::debug;

use crate::models::{StatsSnapshot, User, WorkoutId, WorkoutRecord};

/// Identifies one in-flight fetch. Only the newest applied ticket wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Default)]
struct Sequence {
    issued: u64,
    applied: u64,
}

impl Sequence {
    fn next(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    fn accept(&mut self, ticket: FetchTicket) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        true
    }
}

/// Client-side view of the signed-in user's data.
///
/// Collections are only ever replaced wholesale by a fetch response, never patched.
#[derive(Debug, Default)]
pub struct AppState {
    current_user: Option<User>,
    workouts: Vec<WorkoutRecord>,
    stats: StatsSnapshot,
    workouts_seq: Sequence,
    stats_seq: Sequence,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn set_current_user(&mut self, user: Option<User>) {
        self.current_user = user;
    }

    pub fn workouts(&self) -> &[WorkoutRecord] {
        &self.workouts
    }

    pub fn workout(&self, id: WorkoutId) -> Option<&WorkoutRecord> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn stats(&self) -> &StatsSnapshot {
        &self.stats
    }

    pub fn begin_workouts_fetch(&mut self) -> FetchTicket {
        self.workouts_seq.next()
    }

    pub fn begin_stats_fetch(&mut self) -> FetchTicket {
        self.stats_seq.next()
    }

    /// Replaces the collection unless a newer response was already applied.
    pub fn apply_workouts(&mut self, ticket: FetchTicket, workouts: Vec<WorkoutRecord>) -> bool {
        if !self.workouts_seq.accept(ticket) {
            debug!(?ticket, "dropping stale workouts response");
            return false;
        }
        self.workouts = workouts;
        true
    }

    pub fn apply_stats(&mut self, ticket: FetchTicket, stats: StatsSnapshot) -> bool {
        if !self.stats_seq.accept(ticket) {
            debug!(?ticket, "dropping stale stats response");
            return false;
        }
        self.stats = stats;
        true
    }

    /// Forgets the user and all loaded data. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.current_user = None;
        self.workouts.clear();
        self.stats = StatsSnapshot::default();
        self.workouts_seq.applied = self.workouts_seq.issued;
        self.stats_seq.applied = self.stats_seq.issued;
    }
}
