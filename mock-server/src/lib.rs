//! Stand-in for the Bookshare API, for tests and local runs.
//!
//! Serves a fixed catalog of titles as XML (or JSON with `?format=json`), a
//! members-only route guarded by the `X-password` digest, and an echo route
//! that reflects what the client actually sent.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const PASSWORD_HEADER: &str = "x-password";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub id: u64,
    pub title: String,
    pub author: String,
}

#[derive(Deserialize)]
pub struct FormatParam {
    pub format: Option<String>,
}

struct AppState {
    catalog: HashMap<u64, Title>,
    password_digest: Option<String>,
}

type Shared = Arc<AppState>;

/// Router with the default catalog and no member account.
pub fn app() -> Router {
    build(None)
}

/// Router whose members-only route accepts `digest` as the `X-password`.
pub fn app_with_password_digest(digest: &str) -> Router {
    build(Some(digest.to_string()))
}

fn build(password_digest: Option<String>) -> Router {
    let state = Arc::new(AppState {
        catalog: catalog(),
        password_digest,
    });
    Router::new()
        .route("/v2/book/id/{id}", get(get_title))
        .route("/v2/user/info", get(user_info))
        .route("/v2/echo", get(echo))
        .with_state(state)
}

pub fn catalog() -> HashMap<u64, Title> {
    [
        (1, "Alice's Adventures in Wonderland", "Lewis Carroll"),
        (2, "Frankenstein", "Mary Shelley"),
    ]
    .into_iter()
    .map(|(id, title, author)| {
        (
            id,
            Title {
                id,
                title: title.to_string(),
                author: author.to_string(),
            },
        )
    })
    .collect()
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn run_with_password_digest(
    listener: TcpListener,
    digest: &str,
) -> Result<(), std::io::Error> {
    serve(listener, app_with_password_digest(digest)).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

fn xml(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "text/xml; charset=utf-8")], body).into_response()
}

async fn get_title(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    Query(params): Query<FormatParam>,
) -> Response {
    tracing::debug!(id, "title lookup");
    let Some(title) = state.catalog.get(&id) else {
        return xml(StatusCode::NOT_FOUND, "<error>title not found</error>\n".to_string());
    };
    if params.format.as_deref() == Some("json") {
        return Json(title.clone()).into_response();
    }
    xml(
        StatusCode::OK,
        format!(
            "<title>\n  <id>{}</id>\n  <name>{}</name>\n  <author>{}</author>\n</title>\n",
            title.id, title.title, title.author
        ),
    )
}

async fn user_info(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let sent = headers.get(PASSWORD_HEADER).and_then(|v| v.to_str().ok());
    match (&state.password_digest, sent) {
        (Some(expected), Some(sent)) if expected == sent => xml(
            StatusCode::OK,
            "<user>\n  <status>active</status>\n</user>\n".to_string(),
        ),
        _ => {
            tracing::debug!(has_header = sent.is_some(), "rejected member request");
            xml(StatusCode::UNAUTHORIZED, "<error>unauthorized</error>\n".to_string())
        }
    }
}

async fn echo(RawQuery(query): RawQuery, headers: HeaderMap) -> String {
    let password = headers
        .get(PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("<none>");
    format!(
        "query: {}\npassword: {}\n\n",
        query.as_deref().unwrap_or(""),
        password
    )
}
