use tracing::{debug, info};

use crate::api_client::ApiClient;
use crate::errors::{ClientError, ClientResult};
use crate::models::{HealthStatus, Period, User, WorkoutDraft, WorkoutId, WorkoutRecord};
use crate::notify::{Notification, Notifier};
use crate::session::SessionStore;
use crate::state::AppState;

/// Drives user-level operations against the API and keeps [`AppState`] in sync.
///
/// Every failure is reported once through the notifier and returned to the caller;
/// state is never touched by a failed call.
pub struct Controller<N: Notifier> {
    client: ApiClient,
    session: SessionStore,
    state: AppState,
    notifier: N,
    period: Period,
}

impl<N: Notifier> Controller<N> {
    pub fn new(client: ApiClient, session: SessionStore, notifier: N) -> Self {
        Self {
            client,
            session,
            state: AppState::new(),
            notifier,
            period: Period::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }

    pub fn is_signed_in(&self) -> bool {
        self.client.has_token()
    }

    fn surface<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            self.notifier.notify(Notification::error(e.to_string()));
        }
        result
    }

    fn ensure_signed_in(&self) -> ClientResult<()> {
        if self.client.has_token() {
            Ok(())
        } else {
            self.surface(Err(ClientError::Unauthenticated))
        }
    }

    /// Loads a persisted token and user. Returns whether a session was found.
    pub fn restore_session(&mut self) -> ClientResult<bool> {
        let token = self.surface(self.session.token().map_err(ClientError::from))?;
        let Some(token) = token else {
            return Ok(false);
        };
        self.client.set_token(token);
        let user = self.surface(self.session.user().map_err(ClientError::from))?;
        self.state.set_current_user(user);
        debug!("restored saved session");
        Ok(true)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<User> {
        let result = self.client.login(username, password).await;
        let response = self.surface(result)?;

        self.surface(self.session.save_token(&response.token).map_err(ClientError::from))?;
        self.surface(self.session.save_user(&response.user).map_err(ClientError::from))?;
        self.client.set_token(response.token);
        self.state.set_current_user(Some(response.user.clone()));

        info!(username = %response.user.username, "logged in");
        self.notifier.notify(Notification::success(format!(
            "Logged in as {}",
            response.user.username
        )));

        self.refresh().await;
        Ok(response.user)
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> ClientResult<()> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return self.surface(Err(ClientError::validation("All fields are required")));
        }
        if password != confirm_password {
            return self.surface(Err(ClientError::validation("Passwords do not match")));
        }

        let result = self.client.register(username, email, password).await;
        self.surface(result)?;

        info!(%username, "registered");
        self.notifier.notify(Notification::success(
            "Registration successful! You can now log in.",
        ));
        Ok(())
    }

    pub fn logout(&mut self) -> ClientResult<()> {
        self.surface(self.session.clear().map_err(ClientError::from))?;
        self.client.clear_token();
        self.state.reset();
        self.notifier.notify(Notification::info("You have been logged out"));
        Ok(())
    }

    pub async fn load_workouts(&mut self) -> ClientResult<()> {
        self.ensure_signed_in()?;
        let ticket = self.state.begin_workouts_fetch();
        let result = self.client.list_workouts().await;
        let workouts = self.surface(result)?;

        let count = workouts.len();
        if self.state.apply_workouts(ticket, workouts) {
            debug!(count, "workouts loaded");
        }
        Ok(())
    }

    pub async fn load_stats(&mut self) -> ClientResult<()> {
        self.ensure_signed_in()?;
        let ticket = self.state.begin_stats_fetch();
        let result = self.client.stats(self.period).await;
        let stats = self.surface(result)?;

        if self.state.apply_stats(ticket, stats) {
            debug!(period = %self.period, "stats loaded");
        }
        Ok(())
    }

    /// Reloads workouts and stats. Failures have already been notified.
    pub async fn refresh(&mut self) {
        let _ = self.load_workouts().await;
        let _ = self.load_stats().await;
    }

    /// Looks up a workout in the loaded collection.
    pub fn workout(&self, id: WorkoutId) -> ClientResult<&WorkoutRecord> {
        match self.state.workout(id) {
            Some(w) => Ok(w),
            None => {
                self.surface(Err(ClientError::validation(format!("Workout #{} not found", id))))
            }
        }
    }

    pub async fn fetch_workout(&self, id: WorkoutId) -> ClientResult<WorkoutRecord> {
        self.ensure_signed_in()?;
        let result = self.client.get_workout(id).await;
        self.surface(result)
    }

    pub async fn add_workout(&mut self, draft: &WorkoutDraft) -> ClientResult<WorkoutRecord> {
        self.ensure_signed_in()?;
        self.surface(draft.validate().map_err(ClientError::Validation))?;

        let result = self.client.create_workout(draft).await;
        let created = self.surface(result)?;

        info!(id = created.id, "workout created");
        self.notifier.notify(Notification::success("Workout added!"));
        self.refresh().await;
        Ok(created)
    }

    pub async fn update_workout(
        &mut self,
        id: WorkoutId,
        draft: &WorkoutDraft,
    ) -> ClientResult<WorkoutRecord> {
        self.ensure_signed_in()?;
        self.surface(draft.validate().map_err(ClientError::Validation))?;

        let result = self.client.update_workout(id, draft).await;
        let updated = self.surface(result)?;

        info!(id, "workout updated");
        self.notifier.notify(Notification::success("Workout updated!"));
        self.refresh().await;
        Ok(updated)
    }

    pub async fn delete_workout(&mut self, id: WorkoutId) -> ClientResult<()> {
        self.ensure_signed_in()?;
        let result = self.client.delete_workout(id).await;
        self.surface(result)?;

        info!(id, "workout deleted");
        self.notifier.notify(Notification::success("Workout deleted!"));
        self.refresh().await;
        Ok(())
    }

    pub async fn health(&self) -> ClientResult<HealthStatus> {
        let result = self.client.health().await;
        self.surface(result)
    }
}
