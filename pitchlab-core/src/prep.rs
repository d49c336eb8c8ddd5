//! Chart data preparation: velocity groups, strike zone, location samples.

use crate::domain::PitchEvent;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Default strike-zone bottom and top in feet, used when no row carries both.
pub const DEFAULT_ZONE: (f64, f64) = (1.5, 3.5);

/// Half the plate width plus a ball radius, in feet.
pub const ZONE_HALF_WIDTH: f64 = 0.97;

/// Release speeds of one pitch type.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityGroup {
    pub pitch_name: String,
    pub speeds: Vec<f64>,
    pub mean: f64,
}

/// Release speeds grouped by pitch name, fastest mean first.
///
/// Rows without a release speed are skipped; a pitch type with no measured
/// speeds is absent.
pub fn velocity_groups<'e, I>(events: I) -> Vec<VelocityGroup>
where
    I: IntoIterator<Item = &'e PitchEvent>,
{
    let mut by_name: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for event in events {
        if let Some(speed) = event.release_speed.filter(|s| s.is_finite()) {
            by_name.entry(event.pitch_label()).or_default().push(speed);
        }
    }

    let mut groups: Vec<VelocityGroup> = by_name
        .into_iter()
        .map(|(name, speeds)| {
            let mean = speeds.iter().sum::<f64>() / speeds.len() as f64;
            VelocityGroup {
                pitch_name: name.to_string(),
                speeds,
                mean,
            }
        })
        .collect();
    groups.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    groups
}

/// Mean strike-zone (bottom, top) over rows that carry both bounds.
pub fn strike_zone<'e, I>(events: I) -> (f64, f64)
where
    I: IntoIterator<Item = &'e PitchEvent>,
{
    let (mut bot, mut top, mut n) = (0.0, 0.0, 0usize);
    for event in events {
        if let (Some(b), Some(t)) = (event.sz_bot, event.sz_top) {
            bot += b;
            top += t;
            n += 1;
        }
    }
    if n == 0 {
        DEFAULT_ZONE
    } else {
        (bot / n as f64, top / n as f64)
    }
}

/// A reproducible random sample of `min(n, len)` events.
pub fn sample_events<'e>(events: &[&'e PitchEvent], n: usize, seed: u64) -> Vec<&'e PitchEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    events
        .choose_multiple(&mut rng, n.min(events.len()))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Handedness;

    fn event(pitch: &str, speed: Option<f64>, zone: Option<(f64, f64)>) -> PitchEvent {
        PitchEvent {
            player_name: "Webb, Logan".into(),
            pitcher: None,
            game_date: None,
            game_type: "R".into(),
            balls: 0,
            strikes: 0,
            pitch_name: pitch.into(),
            release_speed: speed,
            pfx_x: None,
            pfx_z: None,
            plate_x: Some(0.0),
            plate_z: Some(2.5),
            stand: Handedness::Left,
            sz_top: zone.map(|z| z.1),
            sz_bot: zone.map(|z| z.0),
        }
    }

    #[test]
    fn velocity_groups_ordered_by_mean() {
        let events = vec![
            event("Changeup", Some(86.0), None),
            event("Sinker", Some(93.0), None),
            event("Sinker", Some(95.0), None),
            event("Sweeper", Some(84.0), None),
            event("Sweeper", None, None),
        ];
        let groups = velocity_groups(&events);
        let names: Vec<&str> = groups.iter().map(|g| g.pitch_name.as_str()).collect();
        assert_eq!(names, vec!["Sinker", "Changeup", "Sweeper"]);
        assert_eq!(groups[0].mean, 94.0);
        assert_eq!(groups[2].speeds, vec![84.0]);
    }

    #[test]
    fn velocity_groups_of_nothing() {
        let events = vec![event("Sinker", None, None)];
        assert!(velocity_groups(&events).is_empty());
    }

    #[test]
    fn strike_zone_averages_rows_with_both_bounds() {
        let events = vec![
            event("Sinker", None, Some((1.4, 3.2))),
            event("Sinker", None, Some((1.6, 3.6))),
            event("Sinker", None, None),
        ];
        let (bot, top) = strike_zone(&events);
        assert!((bot - 1.5).abs() < 1e-9);
        assert!((top - 3.4).abs() < 1e-9);
    }

    #[test]
    fn strike_zone_falls_back_to_default() {
        let events = vec![event("Sinker", None, None)];
        assert_eq!(strike_zone(&events), DEFAULT_ZONE);
    }

    #[test]
    fn sample_is_deterministic_and_bounded() {
        let events: Vec<PitchEvent> = (0..50)
            .map(|i| event("Sinker", Some(90.0 + i as f64 * 0.1), None))
            .collect();
        let refs: Vec<&PitchEvent> = events.iter().collect();

        let a = sample_events(&refs, 10, 42);
        let b = sample_events(&refs, 10, 42);
        assert_eq!(a.len(), 10);
        assert_eq!(a, b);

        let everything = sample_events(&refs, 100, 42);
        assert_eq!(everything.len(), 50);
    }
}
