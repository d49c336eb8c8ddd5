//! Release-speed violins.
//!
//! Each pitch type gets a Gaussian KDE (Scott's rule bandwidth) evaluated only
//! across its observed range. Densities share one scale so every violin
//! encloses the same area.

use crate::error::RenderError;
use crate::style::RenderStyle;
use pitchlab_core::prep::{velocity_groups, VelocityGroup};
use pitchlab_core::PitchEvent;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;

const GRID_POINTS: usize = 100;
/// Half the row height a violin may occupy at peak density.
const HALF_HEIGHT: f64 = 0.4;

/// Scott's rule: sample standard deviation times `n^(-1/5)`.
///
/// `None` for fewer than two samples or zero spread.
pub fn scott_bandwidth(samples: &[f64]) -> Option<f64> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let sd = var.sqrt();
    if sd.is_finite() && sd > 0.0 {
        Some(sd * (n as f64).powf(-0.2))
    } else {
        None
    }
}

pub fn gaussian_kde(samples: &[f64], bandwidth: f64, at: f64) -> f64 {
    let norm = 1.0 / (samples.len() as f64 * bandwidth * (2.0 * PI).sqrt());
    samples
        .iter()
        .map(|x| {
            let z = (at - x) / bandwidth;
            (-0.5 * z * z).exp()
        })
        .sum::<f64>()
        * norm
}

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Density outline for one pitch type.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolinShape {
    pub pitch_name: String,
    /// `(speed, width)` pairs, width scaled to `0..=1` across all shapes.
    pub profile: Vec<(f64, f64)>,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

/// Build one shape per group, keeping the group order.
pub fn violin_shapes(groups: &[VelocityGroup]) -> Vec<ViolinShape> {
    let mut shapes: Vec<ViolinShape> = groups.iter().filter_map(shape_for).collect();

    let peak = shapes
        .iter()
        .flat_map(|s| s.profile.iter().map(|&(_, d)| d))
        .filter(|d| d.is_finite())
        .fold(0.0_f64, f64::max);
    if peak > 0.0 {
        for shape in &mut shapes {
            for point in &mut shape.profile {
                point.1 /= peak;
            }
        }
    }
    shapes
}

fn shape_for(group: &VelocityGroup) -> Option<ViolinShape> {
    let mut sorted = group.speeds.clone();
    sorted.sort_by(f64::total_cmp);
    let (lo, hi) = (*sorted.first()?, *sorted.last()?);

    let profile = match scott_bandwidth(&sorted) {
        Some(bw) => (0..GRID_POINTS)
            .map(|i| {
                let x = lo + (hi - lo) * i as f64 / (GRID_POINTS - 1) as f64;
                (x, gaussian_kde(&sorted, bw, x))
            })
            .collect(),
        // a single speed draws as a tick at full width
        None => vec![(lo, f64::INFINITY)],
    };

    Some(ViolinShape {
        pitch_name: group.pitch_name.clone(),
        profile,
        q1: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q3: quantile(&sorted, 0.75)?,
    })
}

/// Closed outline centred on `y`, upper edge forward then lower edge back.
pub fn violin_outline(shape: &ViolinShape, y: f64) -> Vec<(f64, f64)> {
    let width = |d: f64| d.min(1.0) * HALF_HEIGHT;
    let mut points: Vec<(f64, f64)> = shape
        .profile
        .iter()
        .map(|&(x, d)| (x, y + width(d)))
        .collect();
    points.extend(shape.profile.iter().rev().map(|&(x, d)| (x, y - width(d))));
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

/// x-axis range: observed speeds padded by one mph.
fn speed_range(groups: &[VelocityGroup]) -> (f64, f64) {
    let speeds = groups.iter().flat_map(|g| g.speeds.iter().copied());
    let (lo, hi) = speeds.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s), hi.max(s))
    });
    if lo.is_finite() && hi.is_finite() {
        (lo - 1.0, hi + 1.0)
    } else {
        (80.0, 100.0)
    }
}

pub fn draw_velocity<DB>(
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

    let groups = velocity_groups(events.iter().copied());
    let shapes = violin_shapes(&groups);
    let (x_lo, x_hi) = speed_range(&groups);
    let rows = shapes.len().max(1) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(title, style.bold(20.0))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 150)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_lo..x_hi, 0.0..rows)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(0)
        .x_desc("MPH")
        .y_desc("Pitch Type")
        .label_style(style.font(14.0))
        .axis_desc_style(style.font(16.0))
        .draw()?;

    for (i, shape) in shapes.iter().enumerate() {
        let y = rows - i as f64 - 0.5;
        let color = style.pitch_color(&shape.pitch_name);
        let outline = violin_outline(shape, y);

        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x_lo, y), (x_hi, y)],
            BLACK.mix(0.15).stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(Polygon::new(outline.clone(), color.filled())))?;
        chart.draw_series(std::iter::once(PathElement::new(outline, BLACK.stroke_width(1))))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(shape.q1, y), (shape.q3, y)],
            BLACK.stroke_width(4),
        )))?;
        chart.draw_series(std::iter::once(Circle::new(
            (shape.median, y),
            3,
            WHITE.filled(),
        )))?;

        let (px, py) = chart.backend_coord(&(x_lo, y));
        root.draw(&Text::new(
            shape.pitch_name.clone(),
            (px - 8, py),
            style
                .font(14.0)
                .color(&BLACK)
                .pos(Pos::new(HPos::Right, VPos::Center)),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, speeds: &[f64]) -> VelocityGroup {
        VelocityGroup {
            pitch_name: name.into(),
            speeds: speeds.to_vec(),
            mean: speeds.iter().sum::<f64>() / speeds.len() as f64,
        }
    }

    #[test]
    fn scott_bandwidth_matches_formula() {
        // sd of [1, 2, 3, 4, 5] with ddof 1 is sqrt(2.5)
        let bw = scott_bandwidth(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let expected = 2.5_f64.sqrt() * 5.0_f64.powf(-0.2);
        assert!((bw - expected).abs() < 1e-12);

        assert_eq!(scott_bandwidth(&[95.0]), None);
        assert_eq!(scott_bandwidth(&[95.0, 95.0, 95.0]), None);
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let samples = [93.1, 94.0, 94.4, 95.2, 96.8, 97.0];
        let bw = scott_bandwidth(&samples).unwrap();
        let (lo, hi, n) = (80.0, 110.0, 3000);
        let dx = (hi - lo) / n as f64;
        let area: f64 = (0..n)
            .map(|i| gaussian_kde(&samples, bw, lo + dx * (i as f64 + 0.5)) * dx)
            .sum();
        assert!((area - 1.0).abs() < 1e-3, "area {area}");
    }

    #[test]
    fn shapes_are_cut_at_observed_range_and_share_scale() {
        let groups = vec![
            group("Sinker", &[94.0, 95.0, 95.5, 96.0, 97.5]),
            group("Sweeper", &[82.0, 83.0, 84.5]),
        ];
        let shapes = violin_shapes(&groups);

        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].pitch_name, "Sinker");
        assert_eq!(shapes[0].profile.first().unwrap().0, 94.0);
        assert_eq!(shapes[0].profile.last().unwrap().0, 97.5);
        let peak = shapes
            .iter()
            .flat_map(|s| s.profile.iter().map(|p| p.1))
            .fold(0.0_f64, f64::max);
        assert!((peak - 1.0).abs() < 1e-12);
        assert_eq!(shapes[1].median, 83.0);
    }

    #[test]
    fn single_speed_is_a_tick() {
        let shapes = violin_shapes(&[group("Eephus", &[68.0])]);
        assert_eq!(shapes[0].profile.len(), 1);
        let outline = violin_outline(&shapes[0], 0.5);
        assert_eq!(outline[0], (68.0, 0.5 + HALF_HEIGHT));
        assert_eq!(outline[1], (68.0, 0.5 - HALF_HEIGHT));
    }

    #[test]
    fn outline_is_closed() {
        let shapes = violin_shapes(&[group("Cutter", &[88.0, 89.0, 90.5, 91.0])]);
        let outline = violin_outline(&shapes[0], 1.5);
        assert_eq!(outline.first(), outline.last());
        assert_eq!(outline.len(), 2 * GRID_POINTS + 1);
    }

    #[test]
    fn quartiles_interpolate() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn empty_range_falls_back() {
        assert_eq!(speed_range(&[]), (80.0, 100.0));
    }
}
