//! Immutable chart styling, passed explicitly to every render call.

use crate::chart::ChartKind;
use pitchlab_core::config::ChartConfig;
use pitchlab_core::PitchPalette;
use plotters::style::{FontDesc, FontFamily, FontStyle, RGBColor};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub font_family: String,
    /// Pie slices at or below this percentage get no label.
    pub label_threshold: f64,
    pub sample_seed: u64,
    pub sample_size: usize,
    pub pitch_dist_size: (u32, u32),
    pub velo_size: (u32, u32),
    pub movement_size: (u32, u32),
    pub sample_chart_size: (u32, u32),
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

impl RenderStyle {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            font_family: config.font_family.clone(),
            label_threshold: config.label_threshold,
            sample_seed: config.sample_seed,
            sample_size: config.sample_size,
            pitch_dist_size: (1400, 700),
            velo_size: (1000, 600),
            movement_size: (650, 650),
            sample_chart_size: (600, 600),
        }
    }

    /// Canvas size in pixels for `kind`.
    pub fn size(&self, kind: ChartKind) -> (u32, u32) {
        match kind {
            ChartKind::PitchDist => self.pitch_dist_size,
            ChartKind::Velo => self.velo_size,
            ChartKind::MovementProfile => self.movement_size,
            ChartKind::PitchSample => self.sample_chart_size,
        }
    }

    pub fn font(&self, size: f64) -> FontDesc<'_> {
        FontDesc::new(FontFamily::from(self.font_family.as_str()), size, FontStyle::Normal)
    }

    pub fn bold(&self, size: f64) -> FontDesc<'_> {
        FontDesc::new(FontFamily::from(self.font_family.as_str()), size, FontStyle::Bold)
    }

    pub fn pitch_color(&self, pitch_name: &str) -> RGBColor {
        let rgb = PitchPalette.color(pitch_name);
        RGBColor(rgb.0, rgb.1, rgb.2)
    }
}
