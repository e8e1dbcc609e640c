use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::cache::{DirectoryLoader, StoreCache};
use crate::codec::{NQuadsCodec, TextCodec};
use crate::concept::{ConceptView, concept_details, search};
use crate::editor::{EditableField, replace_single_valued};
use crate::error::TaxomergeError;
use crate::merge::Conflict;
use crate::repository::{FileRepository, Repository};
use crate::save::{SaveOutcome, Saver};
use crate::settings::Settings;
use crate::store::Store;
use crate::term::Term;
use crate::vocab::{RELATION_TYPES, local_name, predicates};

pub type TaxonomyCache = StoreCache<DirectoryLoader<NQuadsCodec>>;

pub struct AppState {
    pub settings: Settings,
    pub cache: TaxonomyCache,
    pub saver: Saver<FileRepository, NQuadsCodec>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, TaxomergeError> {
        let policy = settings.merge_policy()?;
        let data_dir = settings.taxonomy.data_dir.clone();
        let loader = DirectoryLoader::new(data_dir.clone(), settings.taxonomy.files.clone(), NQuadsCodec);
        Ok(Self {
            cache: StoreCache::new(loader),
            saver: Saver::with_policy(FileRepository::new(data_dir), NQuadsCodec, policy),
            settings,
        })
    }
}

// ------------- Responses -------------
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError(StatusCode, String);

impl From<TaxomergeError> for ApiError {
    fn from(e: TaxomergeError) -> Self {
        let status = match &e {
            TaxomergeError::NotFound(_) => StatusCode::NOT_FOUND,
            TaxomergeError::UnsupportedField(_) | TaxomergeError::InvalidTerm(_) => StatusCode::BAD_REQUEST,
            TaxomergeError::RemoteChanged(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError(status, error) = self;
        warn!(%error, code = %status.as_u16(), "request failed");
        (status, Json(ErrorBody { error })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct ConceptParams {
    pub id: String,
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    pub id: String,
    pub field: String,
    pub value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub success: bool,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_merged: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<Conflict>,
}

#[derive(Serialize)]
pub struct RelationType {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

// ------------- Handlers -------------
async fn search_concepts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<ConceptView>>> {
    let Some(query) = params.q.filter(|q| !q.trim().is_empty()) else {
        return Ok(Json(Vec::new()));
    };
    let limit = state.settings.search_limit(params.limit);
    let taxonomy = state.cache.get().await?;
    // scanning every label is CPU bound
    let results = tokio::task::spawn_blocking(move || search(&taxonomy.store, &query, limit))
        .await
        .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, format!("Join error: {e}")))?;
    Ok(Json(results))
}

async fn concept(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ConceptParams>,
) -> ApiResult<Json<ConceptView>> {
    let taxonomy = state.cache.get().await?;
    concept_details(&taxonomy.store, &params.id)
        .map(Json)
        .ok_or_else(|| ApiError(StatusCode::NOT_FOUND, format!("Concept {} not found", params.id)))
}

/// The configured file holding a preferred label for `subject`, with its
/// current text and statements.
async fn locate(state: &AppState, subject: &Term) -> ApiResult<(String, String, Store)> {
    let repository = state.saver.repository();
    for file in &state.settings.taxonomy.files {
        let text = match repository.fetch_current_text(file).await {
            Ok(text) => text,
            Err(TaxomergeError::NotFound(_)) => continue,
            Err(e) => return Err(e.into()),
        };
        let store: Store = NQuadsCodec.decode(&text)?.into_iter().collect();
        if store.first(subject, &predicates::PREF_LABEL).is_some() {
            return Ok((file.clone(), text, store));
        }
    }
    Err(ApiError(StatusCode::NOT_FOUND, "Concept file not found".into()))
}

async fn update_concept(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateRequest>,
) -> ApiResult<(StatusCode, Json<UpdateResponse>)> {
    if request.id.is_empty() || request.value.is_empty() {
        return Err(ApiError(StatusCode::BAD_REQUEST, "Missing required fields".into()));
    }
    let field: EditableField = request.field.parse()?;
    info!(id = %request.id, %field, "saving");
    let subject = Term::iri(&request.id)?;
    let predicate = Term::iri(field.predicate())?;
    let (file, base_text, mut store) = locate(&state, &subject).await?;

    replace_single_valued(&mut store, &subject, &predicate, &request.value);
    let message = format!("Update {field} for {}", request.id);
    let outcome = state
        .saver
        .attempt_save(&file, &store, &base_text, &message)
        .await?;

    match outcome {
        SaveOutcome::Committed { auto_merged } => {
            state.cache.invalidate().await;
            Ok((
                StatusCode::OK,
                Json(UpdateResponse {
                    success: true,
                    file,
                    auto_merged: Some(auto_merged),
                    conflicts: Vec::new(),
                }),
            ))
        }
        SaveOutcome::ConflictsPending(pending) => Ok((
            StatusCode::CONFLICT,
            Json(UpdateResponse {
                success: false,
                file,
                auto_merged: None,
                conflicts: pending.conflicts,
            }),
        )),
    }
}

async fn relation_types() -> Json<Vec<RelationType>> {
    Json(
        RELATION_TYPES
            .into_iter()
            .map(|(id, description)| RelationType {
                id,
                label: local_name(id),
                description,
            })
            .collect(),
    )
}

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.cache.status().await)
}

async fn reload(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let taxonomy = state.cache.reload().await?;
    info!(statements = taxonomy.store.len(), "taxonomy reloaded");
    Ok(Json(state.cache.status().await))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/api/search", get(search_concepts))
        .route("/api/concept", get(concept).post(update_concept))
        .route("/api/relations", get(relation_types))
        .route("/api/status", get(status))
        .route("/api/reload", post(reload))
        .layer(cors)
        .with_state(state)
}
