//! Development server
//!
//! Serves the public directory and renders top-level content pages on
//! demand, re-reading the markdown on every request.

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::generator::Generator;
use crate::helpers::decode_segment;

/// Cache policy for stylesheets and scripts
const LONG_CACHE: &str = "public, max-age=31536000";

/// Shortcut path for the main stylesheet, served from the styles directory
const STYLES_ALIAS: &str = "/styles.css";

/// Server state
pub struct ServerState {
    generator: Generator,
    public_dir: PathBuf,
    content_dir: PathBuf,
    styles_dir: PathBuf,
}

impl ServerState {
    pub fn new(generator: Generator) -> Self {
        let site = generator.site();
        Self {
            public_dir: site.public_dir.clone(),
            content_dir: site.content_dir.clone(),
            styles_dir: site.styles_dir.clone(),
            generator,
        }
    }
}

/// Error raised while rendering a page for a request
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render {path:?}: {source:#}")]
    Render {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("Error processing page: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Build the router for a generator
pub fn router(generator: Generator) -> Router {
    let state = Arc::new(ServerState::new(generator));
    Router::new()
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the development server
pub async fn start(generator: Generator, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(generator);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Port {} is already in use. Stop the other process or pass --port",
                port
            );
        }
        Err(e) => return Err(e.into()),
    };

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Renders `/<page>` from markdown, otherwise serves the public directory
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    if let Some(segment) = content_segment(request.uri().path()) {
        match render_content(&state, &segment).await {
            Ok(Some(html)) => return Html(html).into_response(),
            Ok(None) => {}
            Err(e) => return e.into_response(),
        }
    }

    serve_static(&state, request).await
}

/// A single path segment without a dot names a content page
fn content_segment(path: &str) -> Option<String> {
    let segment = path.strip_prefix('/')?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    let segment = decode_segment(segment);
    if segment.contains('.') || segment.contains('/') || segment.contains('\\') {
        return None;
    }
    Some(segment)
}

async fn render_content(
    state: &ServerState,
    segment: &str,
) -> Result<Option<String>, ServerError> {
    let path = state.content_dir.join(format!("{}.md", segment));
    tracing::debug!("Requested page {:?}, looking for {:?}", segment, path);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(ServerError::Read { path, source }),
    };

    state
        .generator
        .render_page_source(&path, &content)
        .map(Some)
        .map_err(|source| ServerError::Render { path, source })
}

async fn serve_static(state: &ServerState, request: Request<Body>) -> Response {
    let cacheable = is_cacheable_asset(request.uri().path());

    let served = if request.uri().path() == STYLES_ALIAS {
        ServeFile::new(state.styles_dir.join("main.css"))
            .try_call(request)
            .await
    } else {
        ServeDir::new(&state.public_dir)
            .append_index_html_on_directories(true)
            .try_call(request)
            .await
    };
    let mut response = match served {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("Failed to serve static file: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
        }
    };

    if cacheable && response.status().is_success() {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(LONG_CACHE));
    }

    response
}

fn is_cacheable_asset(path: &str) -> bool {
    path.ends_with(".css") || path.ends_with(".js")
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
