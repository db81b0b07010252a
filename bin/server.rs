// Civic Records - Web Server
// Read-only JSON API over the "as of" queries

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use civic_records::db;
use civic_records::{
    init_logging, Config, NameChange, NameStatus, Party, PropertyRef, Rate, RateKind, RecordError,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

enum ApiError {
    Record(RecordError),
    Internal(String),
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        ApiError::Record(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Record(err) => {
                let status = match &err {
                    RecordError::DoesNotExist { .. } | RecordError::NotFound { .. } => {
                        StatusCode::NOT_FOUND
                    }
                    RecordError::Validation(_) | RecordError::UnknownCode { .. } => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(%message, "request failed");
        }
        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

/// `?as_of=YYYY-MM-DD`, today when absent
#[derive(Deserialize)]
struct AsOf {
    as_of: Option<NaiveDate>,
}

impl AsOf {
    fn date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct NameResponse {
    id: String,
    full_name: String,
    date: NaiveDate,
    method: &'static str,
    status: &'static str,
}

impl NameResponse {
    fn new(name: &NameChange, status: NameStatus) -> Self {
        Self {
            id: name.id.clone(),
            full_name: name.full_name(),
            date: name.date(),
            method: name.method.code(),
            status: status.as_str(),
        }
    }
}

#[derive(Serialize)]
struct PersonNamesResponse {
    person_id: String,
    as_of: NaiveDate,
    nickname: Option<String>,
    names: Vec<NameResponse>,
}

#[derive(Serialize)]
struct OwnerResponse {
    property: PropertyRef,
    as_of: NaiveDate,
    owner_id: String,
    party: Party,
}

#[derive(Serialize)]
struct OccupantResponse {
    unit_id: String,
    as_of: NaiveDate,
    /// `None` while the unit stands vacant
    occupant_id: Option<String>,
}

#[derive(Serialize)]
struct HolderResponse {
    owner_id: String,
    shares: i64,
}

#[derive(Serialize)]
struct HoldersResponse {
    entity_id: String,
    as_of: NaiveDate,
    holders: Vec<HolderResponse>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        version: civic_records::VERSION,
    }))
}

/// GET /api/people/:id/names - Names current on a date
async fn get_names(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
    Query(query): Query<AsOf>,
) -> ApiResult<PersonNamesResponse> {
    let as_of = query.date();
    let conn = state.conn()?;
    let names = db::get_current_names(&conn, &person_id, as_of)?;
    let nickname = db::get_nickname_as_of(&conn, &person_id, as_of)?;

    Ok(Json(ApiResponse::ok(PersonNamesResponse {
        person_id,
        as_of,
        nickname,
        names: names
            .iter()
            .map(|(name, status)| NameResponse::new(name, *status))
            .collect(),
    })))
}

/// GET /api/people/:id/legal-name - Registered legal name on a date
async fn get_legal_name(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
    Query(query): Query<AsOf>,
) -> ApiResult<NameResponse> {
    let conn = state.conn()?;
    let name = db::get_legal_name(&conn, &person_id, query.date())?;
    Ok(Json(ApiResponse::ok(NameResponse::new(&name, NameStatus::Legal))))
}

/// GET /api/properties/:kind/:id/owner - Owner on a date
async fn get_owner(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    Query(query): Query<AsOf>,
) -> ApiResult<OwnerResponse> {
    let property = PropertyRef::from_parts(&kind, id)?;
    let as_of = query.date();
    let conn = state.conn()?;
    let owner = db::get_owner_as_of(&conn, &property, as_of)?;

    Ok(Json(ApiResponse::ok(OwnerResponse {
        property,
        as_of,
        owner_id: owner.id,
        party: owner.party,
    })))
}

/// GET /api/units/:id/occupant - Occupant on a date
async fn get_occupant(
    State(state): State<AppState>,
    Path(unit_id): Path<String>,
    Query(query): Query<AsOf>,
) -> ApiResult<OccupantResponse> {
    let as_of = query.date();
    let conn = state.conn()?;
    let occupant_id = db::get_occupant_as_of(&conn, &unit_id, as_of)?;

    Ok(Json(ApiResponse::ok(OccupantResponse {
        unit_id,
        as_of,
        occupant_id,
    })))
}

/// GET /api/units/:id/rates/:kind - Rate of one kind in force on a date
async fn get_rate(
    State(state): State<AppState>,
    Path((unit_id, kind)): Path<(String, String)>,
    Query(query): Query<AsOf>,
) -> ApiResult<Rate> {
    let kind = RateKind::from_code(&kind)?;
    let conn = state.conn()?;
    let rate = db::get_rate_as_of(&conn, &unit_id, kind, query.date())?;
    Ok(Json(ApiResponse::ok(rate)))
}

/// GET /api/entities/:id/holders - Share holders on a date
async fn get_holders(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
    Query(query): Query<AsOf>,
) -> ApiResult<HoldersResponse> {
    let as_of = query.date();
    let conn = state.conn()?;
    let snapshot = db::get_holders_as_of(&conn, &entity_id, as_of)?;

    Ok(Json(ApiResponse::ok(HoldersResponse {
        entity_id,
        as_of,
        holders: snapshot
            .values
            .into_iter()
            .map(|(owner_id, shares)| HolderResponse { owner_id, shares })
            .collect(),
    })))
}

fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/people/:id/names", get(get_names))
        .route("/people/:id/legal-name", get(get_legal_name))
        .route("/properties/:kind/:id/owner", get(get_owner))
        .route("/units/:id/occupant", get(get_occupant))
        .route("/units/:id/rates/:kind", get(get_rate))
        .route("/entities/:id/holders", get(get_holders))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_logging(&config.log_filter)?;

    let conn = db::open(&config.database_path)?;
    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
    };

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, db = %config.database_path.display(), "server running");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
