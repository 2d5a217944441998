use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    BillingPeriod, CalculatorKind, Evaluation, FactSeed, FieldRule, LineItemEdit, LineItemId,
    RawInput, SubscriptionLedger, SubscriptionLineItem, evaluate, parse_inputs, sanitize,
};

mod assets;

pub use assets::StatusResponse;

#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(
        long,
        env = "HABITMATH_DIST",
        default_value = "dist",
        help = "Directory holding the built front-end bundle"
    )]
    pub dist_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown calculator: {0}")]
    UnknownCalculator(String),
    #[error("Invalid request: {0}")]
    InvalidPayload(String),
    #[error("The application is not built yet. Build the front-end bundle into {0}.")]
    BundleMissing(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownCalculator(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::BundleMissing(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("rejected request: {self}");
        }
        error_response(status, &self.to_string())
    }
}

#[derive(Clone)]
struct AppState {
    dist_dir: Arc<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiBillingPeriod {
    #[serde(alias = "month", alias = "mo")]
    Monthly,
    #[serde(alias = "annually", alias = "yearly", alias = "year", alias = "yr")]
    Annual,
}

impl From<ApiBillingPeriod> for BillingPeriod {
    fn from(value: ApiBillingPeriod) -> Self {
        match value {
            ApiBillingPeriod::Monthly => BillingPeriod::Monthly,
            ApiBillingPeriod::Annual => BillingPeriod::Annual,
        }
    }
}

/// Form values arrive as typed text, but plain JSON numbers and booleans
/// are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Number(n) => format!("{n}"),
            FieldValue::Flag(flag) => flag.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemPayload {
    id: Option<String>,
    #[serde(default)]
    name: String,
    cost: Option<FieldValue>,
    billing_period: Option<ApiBillingPeriod>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

/// Form fields may sit at the top level of the body or under `fields`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EvaluatePayload {
    fields: BTreeMap<String, FieldValue>,
    fact_seed: Option<u64>,
    subscriptions: Option<Vec<LineItemPayload>>,
    cancelled_ids: Vec<String>,
    #[serde(flatten)]
    top_level: BTreeMap<String, FieldValue>,
}

#[derive(Debug)]
pub struct EvaluateRequest {
    pub kind: CalculatorKind,
    pub raw: RawInput,
    pub ledger: Option<SubscriptionLedger>,
    pub cancelled: Vec<LineItemId>,
    pub seed: FactSeed,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculatorSummary {
    calculator: CalculatorKind,
    slug: &'static str,
    path: String,
    title: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = SocketAddr::new(config.host, config.port);
    let state = AppState {
        dist_dir: Arc::new(config.dist_dir),
    };
    let app = Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/calculators", get(listing_handler))
        .route(
            "/api/calculators/:slug",
            get(evaluate_get_handler).post(evaluate_post_handler),
        )
        .fallback(static_handler)
        .with_state(state.clone());

    let listener = TcpListener::bind(addr).await?;
    log::info!("habit calculators listening on http://{addr}");
    log::info!("serving front-end bundle from {}", state.dist_dir.display());

    axum::serve(listener, app).await
}

async fn listing_handler() -> Response {
    json_response(StatusCode::OK, calculator_listing())
}

async fn status_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, assets::bundle_status(&state.dist_dir).await)
}

async fn static_handler(State(state): State<AppState>, uri: Uri) -> Result<Response, ApiError> {
    assets::serve_asset(&state.dist_dir, uri.path()).await
}

async fn evaluate_get_handler(
    Path(slug): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Result<Response, ApiError> {
    let request = request_from_query(&slug, query)?;
    Ok(json_response(StatusCode::OK, run_request(request)))
}

async fn evaluate_post_handler(
    Path(slug): Path<String>,
    Json(payload): Json<EvaluatePayload>,
) -> Result<Response, ApiError> {
    let request = request_from_payload(&slug, payload)?;
    Ok(json_response(StatusCode::OK, run_request(request)))
}

pub fn run_request(request: EvaluateRequest) -> Evaluation {
    let mut form = parse_inputs(request.kind, &request.raw);
    if let Some(ledger) = request.ledger {
        form = form.with_ledger(ledger);
    }
    evaluate(&form, request.seed, &request.cancelled)
}

/// Builds a request from loose `name=value` fields, as the CLI collects them.
pub fn request_from_fields(
    slug: &str,
    fields: RawInput,
    fact_seed: Option<u64>,
    cancelled: Vec<String>,
) -> Result<EvaluateRequest, ApiError> {
    Ok(EvaluateRequest {
        kind: resolve_kind(slug)?,
        raw: fields,
        ledger: None,
        cancelled: cancelled.into_iter().map(LineItemId::from).collect(),
        seed: fact_seed.map(FactSeed).unwrap_or_else(FactSeed::draw),
    })
}

fn resolve_kind(slug: &str) -> Result<CalculatorKind, ApiError> {
    CalculatorKind::from_slug(slug).ok_or_else(|| ApiError::UnknownCalculator(slug.to_string()))
}

fn request_from_query(
    slug: &str,
    mut query: BTreeMap<String, String>,
) -> Result<EvaluateRequest, ApiError> {
    let fact_seed = match query.remove("factSeed") {
        Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
            ApiError::InvalidPayload(format!("factSeed must be an unsigned integer, got {raw:?}"))
        })?),
        None => None,
    };
    let cancelled = query
        .remove("cancelledIds")
        .map(|ids| {
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    request_from_fields(slug, query, fact_seed, cancelled)
}

#[cfg(test)]
fn request_from_json(slug: &str, json: &str) -> Result<EvaluateRequest, ApiError> {
    let payload = serde_json::from_str::<EvaluatePayload>(json)
        .map_err(|e| ApiError::InvalidPayload(format!("Invalid API JSON payload: {e}")))?;
    request_from_payload(slug, payload)
}

fn request_from_payload(slug: &str, payload: EvaluatePayload) -> Result<EvaluateRequest, ApiError> {
    let kind = resolve_kind(slug)?;
    let mut raw = RawInput::new();
    for (name, value) in payload.top_level.into_iter().chain(payload.fields) {
        if !kind.accepts(&name) {
            return Err(ApiError::InvalidPayload(format!(
                "{} has no field named {name:?}",
                kind.slug()
            )));
        }
        raw.insert(name, value.into_text());
    }
    let mut request = request_from_fields(slug, raw, payload.fact_seed, payload.cancelled_ids)?;

    if let Some(items) = payload.subscriptions {
        if request.kind != CalculatorKind::Subscriptions {
            return Err(ApiError::InvalidPayload(format!(
                "subscriptions are only accepted by {}",
                CalculatorKind::Subscriptions.slug()
            )));
        }
        request.ledger = Some(ledger_from_payload(items));
    }

    Ok(request)
}

fn ledger_from_payload(items: Vec<LineItemPayload>) -> SubscriptionLedger {
    let mut ledger = SubscriptionLedger::new();
    for item in items {
        let cost = item.cost.map(FieldValue::into_text).unwrap_or_default();
        let billing_period = item
            .billing_period
            .map(BillingPeriod::from)
            .unwrap_or(BillingPeriod::Monthly);

        match item.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => ledger.insert(SubscriptionLineItem {
                id: LineItemId::from(id),
                name: item.name,
                cost: sanitize(&cost, FieldRule::decimal()),
                billing_period,
                active: item.active,
            }),
            None => {
                let id = ledger.add();
                ledger.update(
                    &id,
                    LineItemEdit {
                        name: Some(item.name),
                        cost: Some(cost),
                        billing_period: Some(billing_period),
                        active: Some(item.active),
                    },
                );
            }
        }
    }
    ledger
}

fn calculator_listing() -> Vec<CalculatorSummary> {
    CalculatorKind::ALL
        .into_iter()
        .map(|kind| CalculatorSummary {
            calculator: kind,
            slug: kind.slug(),
            path: format!("/{}", kind.slug()),
            title: kind.title(),
            description: kind.description(),
        })
        .collect()
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
