//! Form handlers.
//!
//! The load → filter → render pipeline is blocking (network fetch on a cache
//! miss, file output), so each request runs it on tokio's blocking pool.

use crate::page::{self, ChartView, FormState};
use crate::{AppState, IMAGES_ROUTE};
use anyhow::{bail, Result};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use pitchlab_core::data::PitchLoader;
use pitchlab_core::{PitcherProfile, ALL};
use pitchlab_render::{ChartKind, ChartRequest, RenderStyle};
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_filter")]
    pub count_filter: String,
}

fn default_filter() -> String {
    ALL.to_string()
}

/// `GET /`: the default pitcher, unfiltered.
pub async fn index(State(state): State<AppState>) -> Response {
    let pitcher = &state.config.default_pitcher;
    let form = ProfileForm {
        first_name: pitcher.first.clone(),
        last_name: pitcher.last.clone(),
        count_filter: default_filter(),
    };
    respond(state, form, false).await
}

/// `POST /`: the submitted pitcher and count filter.
pub async fn submit(State(state): State<AppState>, Form(form): Form<ProfileForm>) -> Response {
    info!(
        first = %form.first_name,
        last = %form.last_name,
        filter = %form.count_filter,
        "profile requested"
    );
    respond(state, form, true).await
}

async fn respond(state: AppState, form: ProfileForm, submitted: bool) -> Response {
    let bucket_names: Vec<String> = state
        .config
        .count_buckets
        .names()
        .map(str::to_string)
        .collect();
    let form_state = FormState {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        count_filter: form.count_filter.clone(),
        bucket_names,
    };

    let outcome = tokio::task::spawn_blocking(move || render_pitch_dist(&state, &form)).await;
    match outcome {
        Ok(Ok(mut view)) => {
            if !submitted {
                view.selected_count = None;
            }
            Html(page::render(&form_state, &view)).into_response()
        }
        Ok(Err(e)) => server_error(&form_state, &format!("{e:#}")),
        Err(e) => server_error(&form_state, &format!("chart worker failed: {e}")),
    }
}

fn server_error(form: &FormState, message: &str) -> Response {
    error!(error = %message, "profile request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(page::render_error(form, message)),
    )
        .into_response()
}

/// Load, filter and render the pitch distribution for one form submission.
pub fn render_pitch_dist(state: &AppState, form: &ProfileForm) -> Result<ChartView> {
    let (first, last) = (form.first_name.trim(), form.last_name.trim());
    if first.is_empty() || last.is_empty() {
        bail!("first and last name are both required");
    }

    let query = state.config.season_query(first, last);
    let loader = PitchLoader::new(&*state.provider, &*state.cache);
    let mut profile = PitcherProfile::load(&loader, query)?;

    let filter = form.count_filter.trim();
    if filter != ALL {
        profile.apply_count_filter(filter, &state.config.count_buckets);
    }

    let style = RenderStyle::from_config(&state.config.charts);
    let request = ChartRequest::from_profile(&profile, ChartKind::PitchDist, true, style.sample_size);
    let path = state.sink.render(&request, &style)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.png", ChartKind::PitchDist.file_stem()));

    Ok(ChartView {
        pitcher: profile.display_name(),
        selected_count: profile.active_filter().map(str::to_string),
        image_src: format!("{IMAGES_ROUTE}/{file_name}"),
        pitches: profile.events(true).len(),
    })
}
