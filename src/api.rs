use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api_error,
    date_utils::parse_calendar_date,
    models::*,
    tracker_service::TrackerService,
};

// Import logging macros
use crate::{log_api_error, log_api_start, log_api_success, log_api_warn, log_validation};

#[derive(Clone)]
pub struct AppState {
    pub tracker_service: TrackerService,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct DueParams {
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct StatsParams {
    pub today: Option<String>,
}

/// Parse an optional `YYYY-MM-DD` query value, rejecting malformed input with 400.
fn parse_date_param(
    operation: &str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, (StatusCode, Json<ApiResponse<()>>)> {
    match value {
        None => Ok(None),
        Some(raw) => match parse_calendar_date(raw) {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                log_validation!(failure, operation, error = e);
                Err(api_error!(bad_request, operation, "date", e))
            }
        },
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "practice-tracker" }))
}

// Problem endpoints
pub async fn create_problem(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateProblemRequest>,
) -> ApiResult<Problem> {
    log_api_start!("create_problem", user_id = user_id);

    match state.tracker_service.create_problem(&user_id, request).await {
        Ok(problem) => {
            log_api_success!("create_problem", item_id = problem.id, "problem logged");
            Ok(Json(ApiResponse::success(problem)))
        }
        Err(e) => Err(api_error!(classify, "create_problem", "problem", e)),
    }
}

pub async fn list_problems(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<Problem>> {
    log_api_start!("list_problems", user_id = user_id);

    match state.tracker_service.list_problems(&user_id).await {
        Ok(problems) => {
            log_api_success!("list_problems", user_id = user_id, count = problems.len(), "problems listed");
            Ok(Json(ApiResponse::success(problems)))
        }
        Err(e) => Err(api_error!(classify, "list_problems", "problem", e)),
    }
}

pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Problem> {
    log_api_start!("get_problem", item_id = id);

    match state.tracker_service.get_problem(id).await {
        Ok(Some(problem)) => Ok(Json(ApiResponse::success(problem))),
        Ok(None) => Err(api_error!(not_found, "get_problem", "problem", id)),
        Err(e) => Err(api_error!(classify, "get_problem", "problem", id, e)),
    }
}

// Learning item endpoints
pub async fn create_learning_item(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateLearningItemRequest>,
) -> ApiResult<LearningItem> {
    log_api_start!("create_learning_item", user_id = user_id);

    match state.tracker_service.create_learning_item(&user_id, request).await {
        Ok(item) => {
            log_api_success!("create_learning_item", item_id = item.id, "learning item logged");
            Ok(Json(ApiResponse::success(item)))
        }
        Err(e) => Err(api_error!(classify, "create_learning_item", "learning item", e)),
    }
}

pub async fn list_learning_items(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<LearningItem>> {
    match state.tracker_service.list_learning_items(&user_id).await {
        Ok(items) => {
            log_api_success!("list_learning_items", user_id = user_id, count = items.len(), "learning items listed");
            Ok(Json(ApiResponse::success(items)))
        }
        Err(e) => Err(api_error!(classify, "list_learning_items", "learning item", e)),
    }
}

pub async fn update_learning_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLearningItemRequest>,
) -> ApiResult<LearningItem> {
    log_api_start!("update_learning_item", item_id = id);

    match state.tracker_service.update_learning_item(id, request).await {
        Ok(Some(item)) => {
            log_api_success!("update_learning_item", item_id = id, "learning item updated");
            Ok(Json(ApiResponse::success(item)))
        }
        Ok(None) => Err(api_error!(not_found, "update_learning_item", "learning item", id)),
        Err(e) => Err(api_error!(classify, "update_learning_item", "learning item", id, e)),
    }
}

pub async fn delete_learning_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    log_api_start!("delete_learning_item", item_id = id);

    match state.tracker_service.delete_learning_item(id).await {
        Ok(true) => {
            log_api_success!("delete_learning_item", item_id = id, "learning item deleted");
            Ok(Json(ApiResponse::success(())))
        }
        Ok(false) => {
            log_api_warn!("delete_learning_item", item_id = id, "nothing to delete");
            Err(api_error!(not_found, "delete_learning_item", "learning item", id))
        }
        Err(e) => Err(api_error!(classify, "delete_learning_item", "learning item", id, e)),
    }
}

// Revision endpoints
pub async fn create_revision_item(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateRevisionRequest>,
) -> ApiResult<RevisionItem> {
    log_api_start!("create_revision_item", item_id = request.item_id);
    let source_id = request.item_id;

    match state.tracker_service.schedule_revision(&user_id, request).await {
        Ok(item) => {
            log_api_success!("create_revision_item", revision_id = item.id, "revision scheduled");
            Ok(Json(ApiResponse::success(item)))
        }
        Err(e) => Err(api_error!(classify, "create_revision_item", "revision item", source_id, e)),
    }
}

pub async fn list_revision_items(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<RevisionItem>> {
    log_api_start!("list_revision_items", user_id = user_id);

    match state.tracker_service.list_revision_items(&user_id).await {
        Ok(items) => {
            log_api_success!("list_revision_items", user_id = user_id, count = items.len(), "revision items listed");
            Ok(Json(ApiResponse::success(items)))
        }
        Err(e) => Err(api_error!(classify, "list_revision_items", "revision item", e)),
    }
}

pub async fn complete_revision_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<RevisionItem> {
    log_api_start!("complete_revision_item", revision_id = id);

    match state.tracker_service.complete_revision_item(id).await {
        Ok(item) => {
            log_api_success!("complete_revision_item", revision_id = id, "revision completed");
            Ok(Json(ApiResponse::success(item)))
        }
        Err(e) => {
            log_api_error!("complete_revision_item", item_id = id, error = e, "completion rejected");
            Err(api_error!(classify, "complete_revision_item", "revision item", id, e))
        }
    }
}

pub async fn get_revision_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<RevisionEvent>> {
    match state.tracker_service.revision_history(id).await {
        Ok(events) => Ok(Json(ApiResponse::success(events))),
        Err(e) => Err(api_error!(classify, "get_revision_history", "revision item", id, e)),
    }
}

pub async fn get_revision_agenda(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<AgendaParams>,
) -> ApiResult<Vec<RevisionAgenda>> {
    log_api_start!("get_revision_agenda", user_id = user_id);
    let start = parse_date_param("get_revision_agenda", params.start_date.as_deref())?;
    let end = parse_date_param("get_revision_agenda", params.end_date.as_deref())?;

    match state.tracker_service.revision_agenda(&user_id, start, end).await {
        Ok(agenda) => {
            log_api_success!("get_revision_agenda", user_id = user_id, count = agenda.len(), "agenda built");
            Ok(Json(ApiResponse::success(agenda)))
        }
        Err(e) => Err(api_error!(classify, "get_revision_agenda", "revision agenda", e)),
    }
}

pub async fn get_due_revisions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<DueParams>,
) -> ApiResult<Vec<RevisionItem>> {
    let date = parse_date_param("get_due_revisions", params.date.as_deref())?;

    match state.tracker_service.due_revisions(&user_id, date).await {
        Ok(items) => {
            log_api_success!("get_due_revisions", user_id = user_id, count = items.len(), "due revisions listed");
            Ok(Json(ApiResponse::success(items)))
        }
        Err(e) => Err(api_error!(classify, "get_due_revisions", "revision item", e)),
    }
}

pub async fn get_revision_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<StatsParams>,
) -> ApiResult<RevisionStats> {
    let today = parse_date_param("get_revision_stats", params.today.as_deref())?;

    match state.tracker_service.revision_stats(&user_id, today).await {
        Ok(stats) => Ok(Json(ApiResponse::success(stats))),
        Err(e) => Err(api_error!(classify, "get_revision_stats", "revision stats", e)),
    }
}

// Roadmap endpoints
pub async fn create_roadmap(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateRoadmapRequest>,
) -> ApiResult<RoadmapWithProgress> {
    log_api_start!("create_roadmap", user_id = user_id);

    match state.tracker_service.create_roadmap(&user_id, request).await {
        Ok(roadmap) => {
            log_api_success!("create_roadmap", item_id = roadmap.roadmap.id, "roadmap created");
            Ok(Json(ApiResponse::success(roadmap)))
        }
        Err(e) => Err(api_error!(classify, "create_roadmap", "roadmap", e)),
    }
}

pub async fn list_roadmaps(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<RoadmapWithProgress>> {
    match state.tracker_service.list_roadmaps(&user_id).await {
        Ok(roadmaps) => {
            log_api_success!("list_roadmaps", user_id = user_id, count = roadmaps.len(), "roadmaps listed");
            Ok(Json(ApiResponse::success(roadmaps)))
        }
        Err(e) => Err(api_error!(classify, "list_roadmaps", "roadmap", e)),
    }
}

pub async fn get_roadmap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<RoadmapWithProgress> {
    log_api_start!("get_roadmap", item_id = id);

    match state.tracker_service.get_roadmap(id).await {
        Ok(Some(roadmap)) => Ok(Json(ApiResponse::success(roadmap))),
        Ok(None) => Err(api_error!(not_found, "get_roadmap", "roadmap", id)),
        Err(e) => Err(api_error!(classify, "get_roadmap", "roadmap", id, e)),
    }
}

pub async fn add_topic(
    State(state): State<AppState>,
    Path(roadmap_id): Path<Uuid>,
    Json(request): Json<CreateTopicRequest>,
) -> ApiResult<Topic> {
    match state.tracker_service.add_topic(roadmap_id, request).await {
        Ok(topic) => {
            log_api_success!("add_topic", item_id = topic.id, "topic added");
            Ok(Json(ApiResponse::success(topic)))
        }
        Err(e) => Err(api_error!(classify, "add_topic", "roadmap", roadmap_id, e)),
    }
}

pub async fn add_subtopic(
    State(state): State<AppState>,
    Path(topic_id): Path<Uuid>,
    Json(request): Json<CreateSubtopicRequest>,
) -> ApiResult<Subtopic> {
    match state.tracker_service.add_subtopic(topic_id, request).await {
        Ok(subtopic) => {
            log_api_success!("add_subtopic", item_id = subtopic.id, "subtopic added");
            Ok(Json(ApiResponse::success(subtopic)))
        }
        Err(e) => Err(api_error!(classify, "add_subtopic", "topic", topic_id, e)),
    }
}

async fn set_topic_completed(state: AppState, id: Uuid, completed: bool) -> ApiResult<Topic> {
    match state.tracker_service.set_topic_completed(id, completed).await {
        Ok(topic) => Ok(Json(ApiResponse::success(topic))),
        Err(e) => Err(api_error!(classify, "set_topic_completed", "topic", id, e)),
    }
}

pub async fn complete_topic(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Topic> {
    set_topic_completed(state, id, true).await
}

pub async fn uncomplete_topic(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Topic> {
    set_topic_completed(state, id, false).await
}

async fn set_subtopic_completed(state: AppState, id: Uuid, completed: bool) -> ApiResult<Subtopic> {
    match state.tracker_service.set_subtopic_completed(id, completed).await {
        Ok(subtopic) => Ok(Json(ApiResponse::success(subtopic))),
        Err(e) => Err(api_error!(classify, "set_subtopic_completed", "subtopic", id, e)),
    }
}

pub async fn complete_subtopic(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Subtopic> {
    set_subtopic_completed(state, id, true).await
}

pub async fn uncomplete_subtopic(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Subtopic> {
    set_subtopic_completed(state, id, false).await
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))

        // Problem routes
        .route(
            "/api/problems/users/:user_id/problems",
            get(list_problems).post(create_problem),
        )
        .route("/api/problems/problems/:id", get(get_problem))

        // Learning routes
        .route(
            "/api/learning/users/:user_id/learning-items",
            get(list_learning_items).post(create_learning_item),
        )
        .route(
            "/api/learning/learning-items/:id",
            put(update_learning_item).delete(delete_learning_item),
        )

        // Revision routes
        .route(
            "/api/revision/users/:user_id/revision-items",
            get(list_revision_items).post(create_revision_item),
        )
        .route("/api/revision/revision-items/:id/complete", put(complete_revision_item))
        .route("/api/revision/revision-items/:id/history", get(get_revision_history))
        .route("/api/revision/users/:user_id/agenda", get(get_revision_agenda))
        .route("/api/revision/users/:user_id/due", get(get_due_revisions))
        .route("/api/revision/users/:user_id/stats", get(get_revision_stats))

        // Roadmap routes
        .route(
            "/api/roadmap/users/:user_id/roadmaps",
            get(list_roadmaps).post(create_roadmap),
        )
        .route("/api/roadmap/roadmaps/:id", get(get_roadmap))
        .route("/api/roadmap/roadmaps/:id/topics", post(add_topic))
        .route("/api/roadmap/topics/:id/subtopics", post(add_subtopic))
        .route("/api/roadmap/topics/:id/complete", put(complete_topic))
        .route("/api/roadmap/topics/:id/uncomplete", put(uncomplete_topic))
        .route("/api/roadmap/subtopics/:id/complete", put(complete_subtopic))
        .route("/api/roadmap/subtopics/:id/uncomplete", put(uncomplete_subtopic))

        .with_state(state)
}
