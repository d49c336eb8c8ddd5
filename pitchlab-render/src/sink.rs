//! Chart output.

use crate::chart::{Chart, ChartKind, ChartRequest};
use crate::error::RenderError;
use crate::pie::draw_pitch_distribution;
use crate::scatter::{draw_movement, draw_sample};
use crate::style::RenderStyle;
use crate::violin::draw_velocity;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for rendered charts.
///
/// Implementations carry no state between calls: the output depends only on
/// the request and the style.
pub trait ChartSink {
    /// Render `request` and return where it was written.
    fn render(&self, request: &ChartRequest<'_>, style: &RenderStyle) -> Result<PathBuf, RenderError>;
}

/// Writes `{output_dir}/{kind}.png`, replacing any previous chart of that kind.
#[derive(Debug, Clone)]
pub struct PngSink {
    output_dir: PathBuf,
}

impl PngSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, kind: ChartKind) -> PathBuf {
        self.output_dir.join(format!("{}.png", kind.file_stem()))
    }
}

impl ChartSink for PngSink {
    fn render(&self, request: &ChartRequest<'_>, style: &RenderStyle) -> Result<PathBuf, RenderError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let kind = request.kind();
        let path = self.path_for(kind);

        {
            let root = BitMapBackend::new(&path, style.size(kind)).into_drawing_area();
            draw_chart(&root, request, style)?;
            root.present()?;
        }

        info!(chart = %kind, pitcher = %request.pitcher, path = %path.display(), "rendered chart");
        Ok(path)
    }
}

/// Draw `request` onto any plotters backend.
pub fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    request: &ChartRequest<'_>,
    style: &RenderStyle,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let title = request.title();
    match &request.chart {
        Chart::PitchDistribution { split, count_label } => {
            draw_pitch_distribution(root, &title, split, count_label, style)
        }
        Chart::Velocity { events } => draw_velocity(root, &title, events, style),
        Chart::Movement { events } => draw_movement(root, &title, events, style),
        Chart::Sample {
            events,
            sample_size,
        } => draw_sample(root, &title, events, *sample_size, style),
    }
}
