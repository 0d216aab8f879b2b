//! Preview server rendering the block per request

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::block::{self, category_options, BlockType};
use crate::config::{BlockConfiguration, RawAttributes};
use crate::helpers::html_escape;
use crate::store::ContentStore;
use crate::Site;

/// Store shared by all requests
pub type SharedStore = Arc<dyn ContentStore + Send + Sync>;

/// Server state
struct ServerState {
    site: Site,
    store: SharedStore,
}

/// Build the router serving the block from `store`
pub fn router(site: Site, store: SharedStore) -> Router {
    let state = Arc::new(ServerState { site, store });

    Router::new()
        .route("/", get(page_handler))
        .route("/block", get(block_handler))
        .route("/block.json", get(metadata_handler))
        .route("/categories", get(categories_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the preview server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let store: SharedStore = Arc::new(site.store());
    let app = router(site.clone(), store);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Full page embedding the block
async fn page_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let config = match configuration(&state, params) {
        Ok(config) => config,
        Err(response) => return response,
    };

    match render(&state, config).await {
        Ok(fragment) => Html(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<p>{}</p>\n{}\n</body>\n</html>\n",
            html_escape(&state.site.config.title),
            html_escape(&config.summary()),
            fragment
        ))
        .into_response(),
        Err(response) => response,
    }
}

/// The block fragment alone
async fn block_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let config = match configuration(&state, params) {
        Ok(config) => config,
        Err(response) => return response,
    };

    match render(&state, config).await {
        Ok(fragment) => Html(fragment).into_response(),
        Err(response) => response,
    }
}

async fn metadata_handler() -> Json<BlockType> {
    Json(BlockType::descriptor())
}

/// Options for the settings panel's category select
async fn categories_handler(State(state): State<Arc<ServerState>>) -> Response {
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || store.categories()).await;

    match result {
        Ok(Ok(categories)) => Json(category_options(&categories)).into_response(),
        Ok(Err(e)) => {
            tracing::error!("{}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// Site defaults overridden by the query string
fn configuration(
    state: &ServerState,
    params: Vec<(String, String)>,
) -> Result<BlockConfiguration, Response> {
    let raw = state.site.attributes(&RawAttributes::from_pairs(params));
    BlockConfiguration::from_raw(&raw).map_err(|e| {
        tracing::debug!("Rejected block attributes: {}", e);
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
    })
}

/// Run the synchronous render off the async workers
async fn render(state: &ServerState, config: BlockConfiguration) -> Result<String, Response> {
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || block::render_or_notice(&config, &*store))
        .await
        .map_err(internal_error)
}

fn internal_error(e: tokio::task::JoinError) -> Response {
    tracing::error!("Render task failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Category, Post};
    use crate::store::MemoryStore;
    use chrono::{Duration, Local};

    fn store() -> Arc<MemoryStore> {
        let posts = (1..=4)
            .map(|id| {
                let date = Local::now() - Duration::days(id as i64);
                let mut post = Post::new(id, format!("Post {}", id), date);
                post.category_ids = vec![1 + id % 2];
                post
            })
            .collect();
        Arc::new(MemoryStore::with_categories(
            posts,
            vec![Category::new(1, "Odd"), Category::new(2, "Even")],
        ))
    }

    fn state(store: Arc<MemoryStore>) -> Arc<ServerState> {
        let mut site = Site {
            config: Default::default(),
            base_dir: Default::default(),
            source_dir: Default::default(),
        };
        site.config.block.insert("numberOfPosts", 2);
        Arc::new(ServerState { site, store })
    }

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Query<Vec<(String, String)>> {
        Query(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_block_uses_site_defaults_and_query() {
        let state = state(store());

        let response = block_handler(State(state.clone()), params(&[])).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert_eq!(html.matches("blog-posts-block-item").count(), 2);

        let response = block_handler(State(state), params(&[("numberOfPosts", "4")])).await;
        let html = body(response).await;
        assert_eq!(html.matches("blog-posts-block-item").count(), 4);
    }

    #[tokio::test]
    async fn test_invalid_attributes_are_rejected() {
        let response =
            block_handler(State(state(store())), params(&[("numberOfPosts", "50")])).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body(response).await.contains("numberOfPosts"));
    }

    #[tokio::test]
    async fn test_unavailable_store_renders_notice() {
        let store = store();
        store.set_available(false);
        let state = state(store);

        let response = page_handler(State(state.clone()), params(&[])).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("blog-posts-block-notice"));
        assert!(html.contains("Displaying 2 posts with thumbnails."));

        let response = categories_handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_categories_and_metadata() {
        let response = categories_handler(State(state(store()))).await;
        let json: serde_json::Value = serde_json::from_str(&body(response).await).unwrap();
        assert_eq!(json[0]["label"], "All Categories");
        assert_eq!(json[1]["label"], "Even");
        assert_eq!(json[1]["value"], 2);

        let Json(descriptor) = metadata_handler().await;
        assert_eq!(descriptor.name, "blog-posts-block/recent-posts");
    }
}
