//! pitchlab-web library: single-route form that renders a pitch distribution.
//!
//! `GET /` charts the configured default pitcher; `POST /` charts the pitcher
//! and count filter named in the form. Rendered charts are served from
//! `/static/images`.

use axum::Router;
use pitchlab_core::data::{DataError, PitchCache, PitchProvider};
use pitchlab_core::AppConfig;
use pitchlab_render::{ChartSink, PngSink};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod page;

/// Route under which chart images are served.
pub const IMAGES_ROUTE: &str = "/static/images";

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn PitchProvider>,
    pub cache: Arc<dyn PitchCache>,
    pub sink: Arc<dyn ChartSink + Send + Sync>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        provider: Arc<dyn PitchProvider>,
        cache: Arc<dyn PitchCache>,
        sink: Arc<dyn ChartSink + Send + Sync>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            cache,
            sink,
        }
    }

    /// State wired to the Savant provider, the CSV cache and the PNG sink
    /// described by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, DataError> {
        let provider = Arc::new(config.provider()?);
        let cache = Arc::new(config.cache());
        let sink = Arc::new(PngSink::new(config.charts.output_dir.clone()));
        Ok(Self::new(config, provider, cache, sink))
    }
}

/// Build application router.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let images = ServeDir::new(&state.config.charts.output_dir);

    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .nest_service(IMAGES_ROUTE, images)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
