//! Single-page search UI plus a JSON endpoint, backed by any
//! [`BaseRetriever`]. The retriever is injected at router construction so
//! tests run against the hash embedder and the in-memory store.

use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;

use semsearch_core::{Document, Scalar, SearchResult};
use semsearch_retrieval::{BaseRetriever, RetrievalError};

const DEFAULT_TOP_K: usize = 5;
const MAX_TOP_K: usize = 100;
const MAX_FORM_BYTES: usize = 16 * 1024;

#[derive(Clone)]
struct AppState {
    retriever: Arc<dyn BaseRetriever>,
}

pub fn router(retriever: Arc<dyn BaseRetriever>) -> Router {
    Router::new()
        .route("/", get(index_page).post(search_page))
        .route("/api/search", get(api_search))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .with_state(AppState { retriever })
}

/// The demo corpus served when no directory is indexed.
pub fn sample_articles() -> Vec<Document> {
    vec![
        Document::new("1", "ChromaDB is a vector database for building AI applications.")
            .with_metadata("title", "ChromaDB Overview"),
        Document::new("2", "Sentence transformers create embeddings for semantic search.")
            .with_metadata("title", "Sentence Transformers"),
        Document::new("3", "Keyword search matches exact terms in documents.")
            .with_metadata("title", "Traditional Search"),
        Document::new("4", "Vector stores keep embeddings for fast similarity search.")
            .with_metadata("title", "Embedding Stores"),
    ]
}

#[derive(Deserialize)]
struct SearchForm {
    #[serde(default)]
    query: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Deserialize)]
struct ApiParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Serialize)]
struct ApiHit {
    id: String,
    title: Option<String>,
    content: String,
    score: f32,
}

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
}

async fn index_page() -> Html<String> {
    Html(render_page("", DEFAULT_TOP_K, None, None))
}

async fn search_page(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Html<String> {
    let query = form.query.trim().to_string();
    // Form input is clamped rather than rejected; the strict argument
    // checks belong to the JSON endpoint.
    let top_k = form.k.unwrap_or(DEFAULT_TOP_K).clamp(1, MAX_TOP_K);

    if query.is_empty() {
        return Html(render_page(&query, top_k, None, None));
    }

    match state.retriever.retrieve(&query, top_k).await {
        Ok(results) => Html(render_page(&query, top_k, Some(&results), None)),
        Err(err) => {
            tracing::error!(error = %err, "search failed");
            Html(render_page(&query, top_k, None, Some(&err.to_string())))
        }
    }
}

async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<ApiParams>,
) -> Result<Json<Vec<ApiHit>>, ApiError> {
    let top_k = params.k.unwrap_or(DEFAULT_TOP_K);
    if top_k > MAX_TOP_K {
        return Err(ApiError(RetrievalError::InvalidArgument(format!(
            "k must be at most {MAX_TOP_K}"
        ))));
    }
    let results = state.retriever.retrieve(&params.q, top_k).await?;
    Ok(Json(results.into_iter().map(to_api_hit).collect()))
}

fn to_api_hit(result: SearchResult) -> ApiHit {
    let title = result
        .document
        .metadata
        .get("title")
        .and_then(Scalar::as_str)
        .map(ToString::to_string);
    ApiHit {
        id: result.document.id,
        title,
        content: result.document.content,
        score: result.score,
    }
}

struct ApiError(RetrievalError);

impl From<RetrievalError> for ApiError {
    fn from(err: RetrievalError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            RetrievalError::InvalidArgument(_) | RetrievalError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            RetrievalError::Embedding(_) | RetrievalError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "search failed");
        }
        let body = ApiErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn render_page(
    query: &str,
    top_k: usize,
    results: Option<&[SearchResult]>,
    error: Option<&str>,
) -> String {
    let mut body = String::new();
    body.push_str("<!doctype html><html><head><title>semsearch</title></head><body>");
    body.push_str("<h1>Semantic search</h1>");
    body.push_str("<form method=\"post\" action=\"/\">");
    body.push_str(&format!(
        "<input type=\"text\" name=\"query\" value=\"{}\" placeholder=\"Search...\">",
        escape_html(query)
    ));
    body.push_str(&format!(
        "<input type=\"number\" name=\"k\" value=\"{top_k}\" min=\"1\" max=\"{MAX_TOP_K}\">"
    ));
    body.push_str("<button type=\"submit\">Search</button></form>");

    if let Some(error) = error {
        body.push_str(&format!(
            "<p class=\"error\">Search failed: {}</p>",
            escape_html(error)
        ));
    }

    if let Some(results) = results {
        if results.is_empty() {
            body.push_str("<p>No results.</p>");
        } else {
            body.push_str("<ol>");
            for result in results {
                let title = result
                    .document
                    .metadata
                    .get("title")
                    .and_then(Scalar::as_str)
                    .unwrap_or(&result.document.id);
                body.push_str(&format!(
                    "<li><strong>{}</strong> (score {:.3})<br>{}</li>",
                    escape_html(title),
                    result.score,
                    escape_html(&result.document.content)
                ));
            }
            body.push_str("</ol>");
        }
    }

    body.push_str("</body></html>");
    body
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_html;

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<script>\"x\" & 'y'</script>"),
            "&lt;script&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }
}
