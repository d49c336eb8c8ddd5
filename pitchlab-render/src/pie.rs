//! Pitch distribution donuts, one per batter side.
//!
//! Wedges are laid out counter-clockwise from [`START_ANGLE_DEG`] in
//! descending frequency. Geometry is computed in pixel space so the donuts
//! stay round regardless of panel aspect.

use crate::error::RenderError;
use crate::style::RenderStyle;
use pitchlab_core::{label_ratio_text, HandednessSplit, PitchTypeAggregate};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub const START_ANGLE_DEG: f64 = 140.0;

/// Inner radius as a fraction of the outer radius.
const INNER_RATIO: f64 = 0.5;
/// Slice labels sit at this fraction of the outer radius.
const LABEL_RATIO: f64 = 0.75;
const ARC_STEP_DEG: f64 = 2.0;

const HEADER_HEIGHT: i32 = 40;
const LEGEND_COLUMNS: usize = 4;
const LEGEND_ROW_HEIGHT: i32 = 24;

/// One donut wedge.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge<'a> {
    pub pitch_name: &'a str,
    pub start_deg: f64,
    pub sweep_deg: f64,
    /// Percentage label, empty at or below the threshold.
    pub label: String,
}

impl Wedge<'_> {
    pub fn mid_deg(&self) -> f64 {
        self.start_deg + self.sweep_deg / 2.0
    }
}

/// Wedges for `aggregate`, largest first, sweeping counter-clockwise.
pub fn wedge_slices(aggregate: &PitchTypeAggregate, threshold: f64) -> Vec<Wedge<'_>> {
    let mut start = START_ANGLE_DEG;
    aggregate
        .shares()
        .into_iter()
        .map(|(name, pct)| {
            let sweep = pct * 3.6;
            let wedge = Wedge {
                pitch_name: name,
                start_deg: start,
                sweep_deg: sweep,
                label: label_ratio_text(pct, threshold),
            };
            start += sweep;
            wedge
        })
        .collect()
}

/// Pixel position at `radius` and `deg` (counter-clockwise from east) around `center`.
pub fn polar_point(center: (i32, i32), radius: f64, deg: f64) -> (i32, i32) {
    let rad = deg.to_radians();
    (
        center.0 + (radius * rad.cos()).round() as i32,
        center.1 - (radius * rad.sin()).round() as i32,
    )
}

/// Outline of a ring segment: the outer arc forward, then the inner arc back.
pub fn ring_polygon(
    center: (i32, i32),
    outer: f64,
    inner: f64,
    start_deg: f64,
    sweep_deg: f64,
) -> Vec<(i32, i32)> {
    let steps = ((sweep_deg / ARC_STEP_DEG).ceil() as usize).max(1);
    let angle = |i: usize| start_deg + sweep_deg * i as f64 / steps as f64;

    let mut points: Vec<(i32, i32)> = (0..=steps)
        .map(|i| polar_point(center, outer, angle(i)))
        .collect();
    points.extend((0..=steps).rev().map(|i| polar_point(center, inner, angle(i))));
    points
}

fn legend_rows(entries: usize) -> i32 {
    entries.div_ceil(LEGEND_COLUMNS) as i32
}

/// Draw both donuts, the count header and the shared legend.
pub fn draw_pitch_distribution<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    split: &HandednessSplit,
    count_label: &str,
    style: &RenderStyle,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let body = root.titled(title, style.bold(24.0))?;

    let (header, rest) = body.split_vertically(HEADER_HEIGHT);
    let (w, _) = header.dim_in_pixel();
    header.draw(&Text::new(
        format!("{count_label} counts"),
        (w as i32 / 2, HEADER_HEIGHT / 2),
        style
            .bold(18.0)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    let pitch_types = split.pitch_types();
    let legend_height = legend_rows(pitch_types.len()) * LEGEND_ROW_HEIGHT + 16;
    let (_, rest_h) = rest.dim_in_pixel();
    let (donuts, legend) = rest.split_vertically(rest_h as i32 - legend_height);

    let panels = donuts.split_evenly((1, 2));
    let sides = [
        ("Pitch Distribution vs LHB", &split.left),
        ("Pitch Distribution vs RHB", &split.right),
    ];
    for (panel, (side_title, aggregate)) in panels.iter().zip(sides) {
        draw_donut(panel, side_title, aggregate, style)?;
    }

    let (legend_w, _) = legend.dim_in_pixel();
    let cell = legend_w as i32 / LEGEND_COLUMNS as i32;
    for (i, name) in pitch_types.into_iter().enumerate() {
        let x = (i % LEGEND_COLUMNS) as i32 * cell + cell / 4;
        let y = (i / LEGEND_COLUMNS) as i32 * LEGEND_ROW_HEIGHT + 8;
        legend.draw(&Rectangle::new(
            [(x, y), (x + 14, y + 14)],
            style.pitch_color(name).filled(),
        ))?;
        legend.draw(&Text::new(
            name.to_string(),
            (x + 20, y + 7),
            style
                .font(14.0)
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }
    Ok(())
}

fn draw_donut<DB>(
    panel: &DrawingArea<DB, Shift>,
    title: &str,
    aggregate: &PitchTypeAggregate,
    style: &RenderStyle,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = panel.titled(title, style.bold(16.0))?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let outer = f64::from(w.min(h)) * 0.45;
    let inner = outer * INNER_RATIO;

    for wedge in wedge_slices(aggregate, style.label_threshold) {
        let points = ring_polygon(center, outer, inner, wedge.start_deg, wedge.sweep_deg);
        let mut edge = points.clone();
        if let Some(&first) = points.first() {
            edge.push(first);
        }
        area.draw(&Polygon::new(points, style.pitch_color(wedge.pitch_name).filled()))?;
        area.draw(&PathElement::new(edge, WHITE.stroke_width(1)))?;

        if !wedge.label.is_empty() {
            let at = polar_point(center, outer * LABEL_RATIO, wedge.mid_deg());
            area.draw(&Text::new(
                wedge.label.clone(),
                at,
                style
                    .font(13.0)
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))?;
        }
    }
    Ok(())
}
