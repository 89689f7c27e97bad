//! In-process fake of the Fitness Journal API used by the client and controller tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{TypeStats, WorkoutDraft, WorkoutRecord};

pub const TEST_TOKEN: &str = "test-token";

#[derive(Default)]
struct BackendData {
    workouts: Vec<WorkoutRecord>,
    next_id: i64,
    requests: Vec<String>,
    last_authorization: Option<String>,
    fail_listing: bool,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    data: Arc<Mutex<BackendData>>,
}

impl FakeBackend {
    pub fn with_workouts(workouts: Vec<WorkoutRecord>) -> Self {
        let next_id = workouts.iter().map(|w| w.id).max().unwrap_or(0);
        let backend = Self::default();
        {
            let mut data = backend.data.lock().unwrap();
            data.workouts = workouts;
            data.next_id = next_id;
        }
        backend
    }

    pub fn requests(&self) -> Vec<String> {
        self.data.lock().unwrap().requests.clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.data.lock().unwrap().last_authorization.clone()
    }

    pub fn set_fail_listing(&self, fail: bool) {
        self.data.lock().unwrap().fail_listing = fail;
    }

    fn record(&self, line: String, headers: &HeaderMap) {
        let mut data = self.data.lock().unwrap();
        data.requests.push(line);
        data.last_authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let expected = format!("Bearer {}", TEST_TOKEN);
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some(value) if value == expected => Ok(()),
            Some(_) => Err(error(StatusCode::UNAUTHORIZED, "Invalid or expired token")),
            None => Err(error(StatusCode::UNAUTHORIZED, "Token is missing")),
        }
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub async fn spawn_backend(backend: FakeBackend) -> String {
    let api = Router::new()
        .route("/health", get(health))
        .route("/login", axum::routing::post(login))
        .route("/register", axum::routing::post(register))
        .route("/workouts", get(list_workouts).post(create_workout))
        .route(
            "/workouts/:id",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        .route("/stats", get(stats))
        .with_state(backend);
    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend crashed");
    });

    format!("http://{}/api", addr)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "running", "service": "Fitness Journal", "version": "1.0" }))
}

async fn login(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record("POST /login".to_string(), &headers);
    let username = body.get("username").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);
    match (username, password) {
        (Some("alice"), Some("secret")) => Json(json!({
            "token": TEST_TOKEN,
            "user": { "id": 1, "username": "alice", "email": "alice@example.com" }
        }))
        .into_response(),
        (Some(_), Some(_)) => error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        _ => error(StatusCode::BAD_REQUEST, "Username and password are required"),
    }
}

async fn register(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record("POST /register".to_string(), &headers);
    match body.get("username").and_then(Value::as_str) {
        Some("taken") => error(StatusCode::BAD_REQUEST, "Username already taken"),
        Some(_) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User registered" })),
        )
            .into_response(),
        None => error(StatusCode::BAD_REQUEST, "All fields are required"),
    }
}

#[derive(Deserialize)]
struct ListParams {
    workout_type: Option<String>,
}

async fn list_workouts(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    backend.record("GET /workouts".to_string(), &headers);
    if let Err(resp) = backend.authorize(&headers) {
        return resp;
    }
    let data = backend.data.lock().unwrap();
    if data.fail_listing {
        return error(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
    }
    let workouts: Vec<&WorkoutRecord> = data
        .workouts
        .iter()
        .filter(|w| params.workout_type.as_deref().map_or(true, |t| w.workout_type == t))
        .collect();
    Json(json!(workouts)).into_response()
}

async fn create_workout(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(draft): Json<WorkoutDraft>,
) -> Response {
    backend.record("POST /workouts".to_string(), &headers);
    if let Err(resp) = backend.authorize(&headers) {
        return resp;
    }
    let mut data = backend.data.lock().unwrap();
    data.next_id += 1;
    let record = WorkoutRecord {
        id: data.next_id,
        date: draft.date,
        workout_type: draft.workout_type,
        duration_minutes: draft.duration_minutes,
        calories_burned: draft.calories_burned,
        distance_km: draft.distance_km,
        notes: draft.notes,
        created_at: None,
    };
    data.workouts.push(record.clone());
    (StatusCode::CREATED, Json(json!(record))).into_response()
}

async fn get_workout(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.record(format!("GET /workouts/{}", id), &headers);
    if let Err(resp) = backend.authorize(&headers) {
        return resp;
    }
    if id < 0 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let data = backend.data.lock().unwrap();
    match data.workouts.iter().find(|w| w.id == id) {
        Some(w) => Json(json!(w)).into_response(),
        None => error(StatusCode::NOT_FOUND, "Workout not found"),
    }
}

async fn update_workout(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(draft): Json<WorkoutDraft>,
) -> Response {
    backend.record(format!("PUT /workouts/{}", id), &headers);
    if let Err(resp) = backend.authorize(&headers) {
        return resp;
    }
    let mut data = backend.data.lock().unwrap();
    match data.workouts.iter_mut().find(|w| w.id == id) {
        Some(w) => {
            w.date = draft.date;
            w.workout_type = draft.workout_type;
            w.duration_minutes = draft.duration_minutes;
            w.calories_burned = draft.calories_burned;
            w.distance_km = draft.distance_km;
            w.notes = draft.notes;
            Json(json!(w)).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Workout not found"),
    }
}

async fn delete_workout(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.record(format!("DELETE /workouts/{}", id), &headers);
    if let Err(resp) = backend.authorize(&headers) {
        return resp;
    }
    let mut data = backend.data.lock().unwrap();
    let before = data.workouts.len();
    data.workouts.retain(|w| w.id != id);
    if data.workouts.len() == before {
        return error(StatusCode::NOT_FOUND, "Workout not found");
    }
    Json(json!({ "message": "Workout deleted" })).into_response()
}

#[derive(Deserialize)]
struct StatsParams {
    period: Option<String>,
}

async fn stats(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Query(params): Query<StatsParams>,
) -> Response {
    let period = params.period.unwrap_or_else(|| "month".to_string());
    backend.record(format!("GET /stats?period={}", period), &headers);
    if let Err(resp) = backend.authorize(&headers) {
        return resp;
    }
    let data = backend.data.lock().unwrap();
    let mut by_type: BTreeMap<String, TypeStats> = BTreeMap::new();
    for w in &data.workouts {
        let entry = by_type.entry(w.workout_type.clone()).or_default();
        entry.count += 1;
        entry.total_duration += u64::from(w.duration_minutes);
        entry.total_calories += u64::from(w.calories_burned.unwrap_or(0));
    }
    Json(json!({
        "total_workouts": data.workouts.len(),
        "total_duration_minutes": data.workouts.iter().map(|w| u64::from(w.duration_minutes)).sum::<u64>(),
        "total_calories_burned": data.workouts.iter().map(|w| u64::from(w.calories_burned.unwrap_or(0))).sum::<u64>(),
        "total_distance_km": data.workouts.iter().map(|w| w.distance_km.unwrap_or(0.0)).sum::<f64>(),
        "workout_types": by_type,
        "period": period,
        "start_date": null,
        "end_date": "2024-06-30",
    }))
    .into_response()
}

/// Records the level of every tracing event emitted while installed as the default subscriber.
#[derive(Clone, Default)]
pub struct EventLevels(Arc<Mutex<Vec<tracing::Level>>>);

impl EventLevels {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        use tracing_subscriber::layer::SubscriberExt;
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn levels(&self) -> Vec<tracing::Level> {
        self.0.lock().unwrap().clone()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventLevels {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.0.lock().unwrap().push(*event.metadata().level());
    }
}
