//! HTTP front door
//!
//! `GET /search?q=...` answers with a JSON array of `{ title, text }`;
//! every other path is served from the static directory.

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, info};

use crate::searcher::{Match, Searcher};

/// Query string of the search endpoint
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub q: Option<String>,
}

impl SearchParams {
    /// Pick `q` out of the decoded pairs; the first one wins when it repeats
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let q = pairs.into_iter().find_map(|(k, v)| (k == "q").then_some(v));
        Self { q }
    }
}

/// Wire shape of one search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitledSnippet {
    pub title: String,
    pub text: String,
}

impl From<Match> for TitledSnippet {
    fn from(m: Match) -> Self {
        Self {
            title: m.title,
            text: m.snippet,
        }
    }
}

/// Build the router: search endpoint, health check, static fallback
pub fn create_router(searcher: Arc<Searcher>, static_dir: &Path) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(searcher)
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(searcher: Arc<Searcher>, static_dir: &Path, addr: SocketAddr) -> eyre::Result<()> {
    let app = create_router(searcher, static_dir);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            info!("Received shutdown signal, gracefully shutting down");
        })
        .await?;

    Ok(())
}

async fn search(State(searcher): State<Arc<Searcher>>, Query(pairs): Query<Vec<(String, String)>>) -> Response {
    let params = SearchParams::from_pairs(pairs);
    let Some(query) = params.q.filter(|q| !q.is_empty()) else {
        debug!("search: missing query");
        return (StatusCode::BAD_REQUEST, "missing search query in URL params").into_response();
    };

    // Large result sets take a while to slice; keep them off the async workers.
    let results = tokio::task::spawn_blocking(move || {
        searcher
            .search(&query)
            .into_iter()
            .map(TitledSnippet::from)
            .collect::<Vec<_>>()
    })
    .await;

    let results = match results {
        Ok(results) => results,
        Err(e) => {
            error!("search task failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "search failure").into_response();
        }
    };

    match serde_json::to_vec(&results) {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!("Failed to encode search results: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "encoding failure").into_response()
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_search_params_first_q_wins() {
        let params = SearchParams::from_pairs(pairs(&[("page", "2"), ("q", "ghost"), ("q", "x")]));
        assert_eq!(params.q.as_deref(), Some("ghost"));
    }

    #[test]
    fn test_search_params_without_q() {
        assert_eq!(SearchParams::from_pairs(pairs(&[("page", "2")])), SearchParams::default());
        assert_eq!(SearchParams::from_pairs(Vec::new()).q, None);
    }

    #[test]
    fn test_titled_snippet_from_match() {
        let m = Match {
            offset: 42,
            title: "Macbeth".to_string(),
            snippet: "a dagger".to_string(),
        };
        let wire = TitledSnippet::from(m);
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Macbeth", "text": "a dagger" }));
    }
}
