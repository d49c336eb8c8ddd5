//! Movement profile and pitch location scatters.

use crate::error::RenderError;
use crate::style::RenderStyle;
use pitchlab_core::prep::{sample_events, strike_zone, ZONE_HALF_WIDTH};
use pitchlab_core::PitchEvent;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Movement axes run from minus to plus this many feet.
pub const MOVEMENT_LIMIT: f64 = 2.5;
pub const RING_RADII: [f64; 5] = [0.5, 1.0, 1.5, 2.0, 2.5];

pub const SAMPLE_X: (f64, f64) = (-4.5, 4.5);
pub const SAMPLE_Y: (f64, f64) = (-2.0, 6.25);

const MARKER_RADIUS: i32 = 5;
const RING_SEGMENTS: usize = 90;

type Segment = [(f64, f64); 2];

/// `(pitch name, (pfx_x, pfx_z))` for events with movement inside the plot.
pub fn movement_points<'e>(events: &[&'e PitchEvent]) -> Vec<(&'e str, (f64, f64))> {
    events
        .iter()
        .filter_map(|&e| Some((e.pitch_label(), e.movement()?)))
        .filter(|(_, (x, z))| x.abs() <= MOVEMENT_LIMIT && z.abs() <= MOVEMENT_LIMIT)
        .collect()
}

/// `(pitch name, (plate_x, plate_z))` for events with a location inside the plot.
pub fn location_points<'e>(events: &[&'e PitchEvent]) -> Vec<(&'e str, (f64, f64))> {
    events
        .iter()
        .filter_map(|&e| Some((e.pitch_label(), e.location()?)))
        .filter(|(_, (x, z))| {
            (SAMPLE_X.0..=SAMPLE_X.1).contains(x) && (SAMPLE_Y.0..=SAMPLE_Y.1).contains(z)
        })
        .collect()
}

/// A dotted circle: `segments` short arcs with equal gaps, as straight chords.
pub fn dotted_ring(radius: f64, segments: usize) -> Vec<Segment> {
    let step = std::f64::consts::TAU / segments as f64;
    (0..segments)
        .map(|k| {
            let a0 = k as f64 * step;
            let a1 = a0 + step / 2.0;
            [
                (radius * a0.cos(), radius * a0.sin()),
                (radius * a1.cos(), radius * a1.sin()),
            ]
        })
        .collect()
}

/// Dash segments along the line `from` → `to`.
pub fn dashes(from: (f64, f64), to: (f64, f64), dash: f64, gap: f64) -> Vec<Segment> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy);
    if len == 0.0 || dash <= 0.0 {
        return Vec::new();
    }
    let (ux, uy) = (dx / len, dy / len);
    let at = |d: f64| (from.0 + ux * d, from.1 + uy * d);

    let mut segments = Vec::new();
    let mut d = 0.0;
    while d < len {
        segments.push([at(d), at((d + dash).min(len))]);
        d += dash + gap;
    }
    segments
}

pub fn draw_movement<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    events: &[&PitchEvent],
    style: &RenderStyle,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(title, style.bold(20.0))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 40)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(-MOVEMENT_LIMIT..MOVEMENT_LIMIT, -MOVEMENT_LIMIT..MOVEMENT_LIMIT)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .label_style(style.font(12.0))
        .draw()?;

    let ring_style = RGBColor(128, 128, 128).mix(0.4).stroke_width(1);
    for radius in RING_RADII {
        chart.draw_series(
            dotted_ring(radius, RING_SEGMENTS)
                .into_iter()
                .map(|seg| PathElement::new(seg.to_vec(), ring_style)),
        )?;
    }

    let axis_style = RGBColor(128, 128, 128).stroke_width(1);
    let axes = dashes((-MOVEMENT_LIMIT, 0.0), (MOVEMENT_LIMIT, 0.0), 0.1, 0.06)
        .into_iter()
        .chain(dashes((0.0, -MOVEMENT_LIMIT), (0.0, MOVEMENT_LIMIT), 0.1, 0.06));
    chart.draw_series(axes.map(|seg| PathElement::new(seg.to_vec(), axis_style)))?;

    draw_markers(&mut chart, &movement_points(events), style)
}

pub fn draw_sample<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    events: &[&PitchEvent],
    sample_size: usize,
    style: &RenderStyle,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let sampled = sample_events(events, sample_size, style.sample_seed);
    let (bot, top) = strike_zone(events.iter().copied());

    // axes hidden: no mesh, no label areas
    let mut chart = ChartBuilder::on(root)
        .caption(title, style.bold(20.0))
        .margin(20)
        .build_cartesian_2d(SAMPLE_X.0..SAMPLE_X.1, SAMPLE_Y.0..SAMPLE_Y.1)?;

    chart.draw_series(std::iter::once(Rectangle::new(
        [(-ZONE_HALF_WIDTH, bot), (ZONE_HALF_WIDTH, top)],
        BLACK.stroke_width(2),
    )))?;

    draw_markers(&mut chart, &location_points(&sampled), style)
}

fn draw_markers<DB>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: &[(&str, (f64, f64))],
    style: &RenderStyle,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    chart.draw_series(
        points
            .iter()
            .map(|&(name, at)| Circle::new(at, MARKER_RADIUS, style.pitch_color(name).filled())),
    )?;
    chart.draw_series(
        points
            .iter()
            .map(|&(_, at)| Circle::new(at, MARKER_RADIUS, BLACK.stroke_width(1))),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchlab_core::Handedness;

    fn event(pitch: &str, movement: Option<(f64, f64)>, location: Option<(f64, f64)>) -> PitchEvent {
        PitchEvent {
            player_name: "Skubal, Tarik".into(),
            pitcher: Some(669373),
            game_date: None,
            game_type: "R".into(),
            balls: 0,
            strikes: 0,
            pitch_name: pitch.into(),
            release_speed: None,
            pfx_x: movement.map(|m| m.0),
            pfx_z: movement.map(|m| m.1),
            plate_x: location.map(|l| l.0),
            plate_z: location.map(|l| l.1),
            stand: Handedness::Right,
            sz_top: None,
            sz_bot: None,
        }
    }

    #[test]
    fn movement_skips_missing_and_out_of_range() {
        let events = vec![
            event("Changeup", Some((1.2, 0.5)), None),
            event("Sinker", None, None),
            event("", Some((-0.3, 1.1)), None),
            event("Eephus", Some((0.1, -3.0)), None),
        ];
        let refs: Vec<&PitchEvent> = events.iter().collect();
        let points = movement_points(&refs);
        assert_eq!(points, vec![("Changeup", (1.2, 0.5)), ("Unknown", (-0.3, 1.1))]);
    }

    #[test]
    fn locations_need_both_coordinates() {
        let mut partial = event("Slider", None, None);
        partial.plate_x = Some(0.4);
        let events = vec![partial, event("Slider", None, Some((0.4, 2.1)))];
        let refs: Vec<&PitchEvent> = events.iter().collect();
        assert_eq!(location_points(&refs), vec![("Slider", (0.4, 2.1))]);
    }

    #[test]
    fn dotted_ring_points_lie_on_radius() {
        let ring = dotted_ring(1.5, 12);
        assert_eq!(ring.len(), 12);
        for seg in ring {
            for (x, y) in seg {
                assert!((x.hypot(y) - 1.5).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn dashes_stay_on_the_line() {
        let segs = dashes((-2.5, 0.0), (2.5, 0.0), 0.1, 0.06);
        assert!(!segs.is_empty());
        assert_eq!(segs[0][0], (-2.5, 0.0));
        for seg in &segs {
            assert_eq!(seg[0].1, 0.0);
            assert!(seg[1].0 <= 2.5 + 1e-12);
        }
        assert!(dashes((0.0, 0.0), (0.0, 0.0), 0.1, 0.1).is_empty());
    }
}
