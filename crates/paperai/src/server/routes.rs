//! Router and request handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::AppState;
use crate::chat::{AnalysisKind, ChatSession};
use crate::error::{ApiError, ApiResult, StoreError};
use crate::graph::{ColorScheme, GraphView, Scene, SceneRenderer};
use crate::models::{
    AnalysisRequest, CitationTrend, ChatRequest, ConnectedGraphRequest, FileSummary,
    KnowledgeGraphRequest, Paper, SearchParams, SearchResult, StoredFile, TrendRequest, Upload,
};
use crate::search::SearchQuery;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

type AppJson<T> = Result<Json<T>, JsonRejection>;

/// Build the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.store.max_bytes().saturating_add(MULTIPART_OVERHEAD);

    let uploads = Router::new()
        .route("/api/files/upload", post(upload_file))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_limit));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/semantic/search", get(search_papers))
        .route("/api/semantic/paper/{paper_id}", get(paper_details))
        .merge(uploads)
        .route("/api/files", get(list_files))
        .route("/api/files/{id}", get(get_file).delete(delete_file))
        .route("/api/chat", post(chat))
        .route("/api/analysis/{kind}", post(analyze))
        .route("/api/graph/connected", post(connected_graph))
        .route("/api/graph/knowledge", post(knowledge_graph))
        .route("/api/graph/trend", post(citation_trend))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn body<T>(payload: AppJson<T>) -> ApiResult<T> {
    payload.map(|Json(v)| v).map_err(|e| ApiError::validation("body", e.body_text()))
}

fn parse_file_id(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ApiError::NotFound("File".to_string()))
}

async fn root() -> impl IntoResponse {
    Json(json!({ "message": "PaperAI API is running" }))
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "paperai",
        "version": env!("CARGO_PKG_VERSION"),
        "chatConfigured": state.chat_configured,
    }))
}

async fn search_papers(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<SearchResult>> {
    let Query(params) = params.map_err(|e| ApiError::validation("query", e.body_text()))?;
    let query = SearchQuery::try_from(params)?;
    Ok(Json(state.search.search(&query).await?))
}

async fn paper_details(
    State(state): State<Arc<AppState>>,
    Path(paper_id): Path<String>,
) -> ApiResult<Json<Paper>> {
    Ok(Json(state.search.paper(&paper_id).await?))
}

async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation("file", e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let bytes = field.bytes().await.map_err(|e| ApiError::validation("file", e.body_text()))?;
        upload = Some(Upload { name, mime_type, bytes: bytes.to_vec() });
        break;
    }

    let upload = upload.ok_or(StoreError::Empty)?;
    let file: StoredFile = state.store.insert(upload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "File uploaded successfully", "file": file })),
    ))
}

async fn list_files(State(state): State<Arc<AppState>>) -> Json<Vec<FileSummary>> {
    Json(state.store.list().await)
}

async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<StoredFile>> {
    let id = parse_file_id(&id)?;
    state.store.get(id).await.map(Json).ok_or_else(|| ApiError::NotFound("File".to_string()))
}

async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_file_id(&id)?;
    if state.store.delete(id).await {
        Ok(Json(json!({ "message": "File deleted successfully" })))
    } else {
        Err(ApiError::NotFound("File".to_string()))
    }
}

async fn chat(
    State(state): State<Arc<AppState>>,
    payload: AppJson<ChatRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let req = body(payload)?;
    let files = state.store.texts(&req.file_ids).await;

    let mut session =
        ChatSession::from_transcript(req.messages).with_context_budget(state.context_budget);
    let reply = session.ask(state.provider.as_ref(), &files, &req.question).await?.clone();

    Ok(Json(json!({ "reply": reply, "transcript": session.messages() })))
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    payload: AppJson<AnalysisRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let kind = AnalysisKind::from_str(&kind)?;
    let req = body(payload)?;

    let text = match (req.file_id, req.text) {
        (Some(id), _) => state.store.get(id).await.ok_or_else(|| ApiError::NotFound("File".to_string()))?.content,
        (None, Some(text)) => text,
        (None, None) => return Err(ApiError::validation("fileId", "Provide a fileId or text")),
    };

    let result = state.analyzer.run(kind, &text).await?;
    Ok(Json(json!({ "kind": kind, "result": result })))
}

/// Run a graph view off the async executor and return its scene.
async fn render_scene<F>(state: &AppState, scheme: ColorScheme, show: F) -> ApiResult<Json<Scene>>
where
    F: FnOnce(&mut GraphView<SceneRenderer>) -> Result<(), crate::error::LayoutError> + Send + 'static,
{
    let engine = state.layout.clone();
    let scene = tokio::task::spawn_blocking(move || {
        let mut view = GraphView::new(SceneRenderer::default(), engine, scheme);
        show(&mut view)?;
        Ok::<_, ApiError>(view.into_renderer().into_last().unwrap_or_default())
    })
    .await
    .map_err(|e| ApiError::internal(format!("layout task failed: {e}")))??;

    Ok(Json(scene))
}

async fn connected_graph(
    State(state): State<Arc<AppState>>,
    payload: AppJson<ConnectedGraphRequest>,
) -> ApiResult<Json<Scene>> {
    let req = body(payload)?;
    render_scene(&state, ColorScheme::CitationTrend, move |view| {
        view.show_connected(&req.papers, &req.connections).map(|_| ())
    })
    .await
}

async fn knowledge_graph(
    State(state): State<Arc<AppState>>,
    payload: AppJson<KnowledgeGraphRequest>,
) -> ApiResult<Json<Scene>> {
    let req = body(payload)?;
    render_scene(&state, ColorScheme::Category, move |view| {
        view.show_knowledge(&req.papers, &req.authors, &req.topics).map(|_| ())
    })
    .await
}

async fn citation_trend(payload: AppJson<TrendRequest>) -> ApiResult<Json<CitationTrend>> {
    let req = body(payload)?;
    Ok(Json(CitationTrend::from_papers(&req.papers)))
}
