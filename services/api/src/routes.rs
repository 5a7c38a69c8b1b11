use crate::infra::AppState;
use crate::views::{
    render_entity_page, render_error_page, render_index, render_reference_page, PageTemplate,
};
use ats_dashboard::error::AppError;
use ats_dashboard::pages::{ActionRequest, FormFields, PageAction, PageError, PageQuery};
use ats_dashboard::records::{Recruiter, Submission};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};
use url::form_urlencoded;

/// Query string shared by the entity pages.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageParams {
    #[serde(default)]
    pub(crate) search: String,
    #[serde(default)]
    pub(crate) action: Option<String>,
    #[serde(default)]
    pub(crate) selected: Option<String>,
    #[serde(default)]
    pub(crate) notice: Option<String>,
}

impl PageParams {
    fn page_query(&self) -> Result<PageQuery, PageError> {
        let action = match self.action.as_deref().map(str::trim) {
            None | Some("") => PageAction::default(),
            Some(raw) => raw.parse()?,
        };
        // The selector placeholder submits no usable identifier.
        let selected = self
            .selected
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok());

        Ok(PageQuery {
            search: self.search.clone(),
            action,
            selected,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    pub(crate) search: String,
}

pub(crate) fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(index_page))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/job-requirements", get(job_requirements_page));

    let router = entity_routes::<Recruiter>(router);
    entity_routes::<Submission>(router).layer(Extension(state))
}

fn entity_routes<R: PageTemplate>(router: Router) -> Router {
    router
        .route(R::PATH, get(entity_page::<R>))
        .route(R::EDIT_PATH, post(edit_action::<R>))
        .route(R::ADD_PATH, post(add_action::<R>))
        .route(R::REMOVE_PATH, post(remove_action::<R>))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn index_page() -> Response {
    match render_index() {
        Ok(html) => Html(html).into_response(),
        Err(err) => error_page(AppError::from(err), "/"),
    }
}

async fn entity_page<R: PageTemplate>(
    Extension(state): Extension<AppState>,
    Query(params): Query<PageParams>,
) -> Response {
    match render_entity::<R>(&state, &params).await {
        Ok(html) => Html(html).into_response(),
        Err(err) => error_page(err, R::PATH),
    }
}

async fn render_entity<R: PageTemplate>(
    state: &AppState,
    params: &PageParams,
) -> Result<String, AppError> {
    let query = params.page_query()?;
    let view = state.page::<R>().view(&query).await?;
    Ok(render_entity_page(&view, params.notice.as_deref())?)
}

async fn job_requirements_page(
    Extension(state): Extension<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let rendered = match state.job_requirements().view(&params.search).await {
        Ok(view) => render_reference_page(&view).map_err(AppError::from),
        Err(err) => Err(AppError::from(err)),
    };

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(err) => error_page(err, "/job-requirements"),
    }
}

async fn edit_action<R: PageTemplate>(
    Extension(state): Extension<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    submit_action::<R>(state, PageAction::Edit, pairs).await
}

async fn add_action<R: PageTemplate>(
    Extension(state): Extension<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    submit_action::<R>(state, PageAction::Add, pairs).await
}

async fn remove_action<R: PageTemplate>(
    Extension(state): Extension<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    submit_action::<R>(state, PageAction::Remove, pairs).await
}

async fn submit_action<R: PageTemplate>(
    state: AppState,
    action: PageAction,
    pairs: Vec<(String, String)>,
) -> Response {
    let fields = FormFields::new(pairs);
    let search = fields.text("search");

    let result = match ActionRequest::<R>::from_form(action, &fields) {
        Ok(request) => state.page::<R>().submit(request).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(outcome) => {
            Redirect::to(&page_location(R::PATH, &search, &outcome.message)).into_response()
        }
        Err(err) => error_page(AppError::from(err), R::PATH),
    }
}

fn page_location(path: &str, search: &str, notice: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("search", search)
        .append_pair("notice", notice)
        .finish();
    format!("{path}?{query}")
}

fn error_page(err: AppError, back: &str) -> Response {
    let status = err.status();
    if status.is_server_error() {
        error!(error = %err, "request failed");
    } else {
        warn!(error = %err, status = status.as_u16(), "request rejected");
    }

    let html = render_error_page(status, &err.to_string(), back);
    (status, Html(html)).into_response()
}
