use std::{collections::HashMap, error::Error, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    check::{self, CheckResult},
    connection,
    history::{AppendOutcome, BuildRef},
    registry::{Category, UNKNOWN_CATEGORY},
    state::KilnState,
};

pub async fn init(state: Arc<KilnState>, listen: &str) -> Result<(), Box<dyn Error>> {
    let app = Router::new()
        .route("/api/info", get(get_info))
        .route("/api/build", post(post_build))
        .route("/api/history", get(get_all_history))
        .route("/api/history/{category_uuid}", get(get_history))
        .route("/api/job/renamed", post(post_job_renamed))
        .route("/api/categories", get(get_categories))
        .route("/api/connections", get(get_connections))
        .route("/api/connection/test", post(post_test_connection))
        .route("/api/config/check-name", get(get_check_name))
        .with_state(state);

    let listener = TcpListener::bind(listen).await?;
    info!("listening on {listen}");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

#[derive(Serialize)]
struct InstanceInfo {
    name: Option<String>,
    description: Option<String>,
    version: f32,
}

async fn get_info(State(state): State<Arc<KilnState>>) -> Json<InstanceInfo> {
    Json(InstanceInfo {
        name: state.name.clone(),
        description: state.description.clone(),
        version: crate::VERSION,
    })
}

#[derive(Deserialize)]
struct BuildReport {
    category_uuid: String,
    job: String,
    number: u64,
}

#[derive(Serialize)]
struct BuildReportResponse {
    outcome: AppendOutcome,
}

/// The build-step hook. Recording is fire and forget: the reporting build
/// gets 200 whether or not anything was recorded, so a history problem can
/// never fail a build.
async fn post_build(
    State(state): State<Arc<KilnState>>,
    Json(report): Json<BuildReport>,
) -> Json<BuildReportResponse> {
    let category = state
        .registry
        .name(&report.category_uuid)
        .unwrap_or(UNKNOWN_CATEGORY);
    info!(
        "build {}#{} reported in category {category}",
        report.job, report.number
    );

    let outcome = state
        .history
        .append(&report.category_uuid, BuildRef::new(report.job, report.number));
    Json(BuildReportResponse { outcome })
}

/// last builds for one category, most recent first, `job#number` form
async fn get_history(
    State(state): State<Arc<KilnState>>,
    Path(category_uuid): Path<String>,
) -> Json<Vec<BuildRef>> {
    Json(state.history.builds(&category_uuid))
}

/// full table, admin view
async fn get_all_history(
    State(state): State<Arc<KilnState>>,
) -> Json<HashMap<String, Vec<BuildRef>>> {
    Json(state.history.all())
}

#[derive(Deserialize)]
struct JobRename {
    old: String,
    new: String,
}

/// the rename-listener hook: keeps recorded refs pointing at the new name
async fn post_job_renamed(
    State(state): State<Arc<KilnState>>,
    Json(rename): Json<JobRename>,
) -> StatusCode {
    info!("job renamed {} -> {}", rename.old, rename.new);
    state.history.rename_job(&rename.old, &rename.new);
    StatusCode::OK
}

async fn get_categories(State(state): State<Arc<KilnState>>) -> Json<Vec<Category>> {
    Json(state.registry.categories.clone())
}

#[derive(Serialize)]
struct ConnectionItem {
    url: String,
    username: Option<String>,
}

/// configured endpoints, credentials withheld
async fn get_connections(State(state): State<Arc<KilnState>>) -> Json<Vec<ConnectionItem>> {
    Json(
        state
            .connections
            .iter()
            .map(|c| ConnectionItem {
                url: c.url.clone(),
                username: c.username.clone(),
            })
            .collect(),
    )
}

#[derive(Deserialize)]
struct ConnectionTest {
    url: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

async fn post_test_connection(Json(req): Json<ConnectionTest>) -> Json<CheckResult> {
    Json(
        connection::test_connection(&req.url, req.username.as_deref(), req.password.as_deref())
            .await,
    )
}

#[derive(Deserialize)]
struct CheckNameParams {
    value: String,
}

async fn get_check_name(Query(params): Query<CheckNameParams>) -> Json<CheckResult> {
    Json(check::check_name(&params.value))
}
