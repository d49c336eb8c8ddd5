//! End-to-end rendering to PNG files.
//!
//! Text layout needs a system font. On a host where the configured family
//! does not resolve, each test returns early instead of failing.

use chrono::NaiveDate;
use pitchlab_core::{CountBuckets, Handedness, PitchEvent, PitcherProfile, PitcherQuery};
use pitchlab_render::{ChartKind, ChartRequest, ChartSink, PngSink, RenderStyle};

/// Whether the style's font family lays out text on this host.
fn font_available(style: &RenderStyle) -> bool {
    let found = style.font(12.0).layout_box("MPH 0-0").is_ok();
    if !found {
        eprintln!("no system font for '{}'; skipping render", style.font_family);
    }
    found
}

fn profile(events: Vec<PitchEvent>) -> PitcherProfile {
    PitcherProfile::new(
        PitcherQuery::new(
            "Paul",
            "Skenes",
            NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
        ),
        events,
    )
}

fn season() -> Vec<PitchEvent> {
    let pitches = [
        ("4-Seam Fastball", 98.4, -0.6, 1.4),
        ("Split-Finger", 94.2, -1.1, 0.3),
        ("Sweeper", 84.6, 1.3, 0.1),
        ("Curveball", 83.0, 0.7, -1.0),
        ("Changeup", 88.1, -1.2, 0.5),
    ];
    (0..120)
        .map(|i| {
            let (name, speed, hb, vb) = pitches[i % pitches.len()];
            let jitter = (i as f64 * 0.37).sin() * 0.4;
            PitchEvent {
                player_name: "Skenes, Paul".into(),
                pitcher: Some(694973),
                game_date: None,
                game_type: "R".into(),
                balls: (i % 4) as u8,
                strikes: (i % 3) as u8,
                pitch_name: name.into(),
                release_speed: Some(speed + jitter * 2.0),
                pfx_x: Some(hb + jitter / 4.0),
                pfx_z: Some(vb - jitter / 4.0),
                plate_x: Some(jitter * 2.0),
                plate_z: Some(2.5 + jitter * 3.0),
                stand: if i % 3 == 0 { Handedness::Left } else { Handedness::Right },
                sz_top: Some(3.45),
                sz_bot: Some(1.6),
            }
        })
        .collect()
}

#[test]
fn renders_every_chart_kind() {
    let dir = tempfile::tempdir().unwrap();
    let sink = PngSink::new(dir.path());
    let style = RenderStyle::default();
    if !font_available(&style) {
        return;
    }
    let mut p = profile(season());
    p.apply_count_filter("Behind", &CountBuckets::default());

    for kind in ChartKind::all() {
        let request = ChartRequest::from_profile(&p, kind, kind == ChartKind::PitchDist, 100);
        let path = sink.render(&request, &style).unwrap();
        assert_eq!(path, dir.path().join(format!("{}.png", kind.file_stem())));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

#[test]
fn empty_profile_renders_without_marks() {
    let dir = tempfile::tempdir().unwrap();
    let sink = PngSink::new(dir.path().join("nested/images"));
    let style = RenderStyle::default();
    if !font_available(&style) {
        return;
    }
    let p = profile(Vec::new());

    for kind in ChartKind::all() {
        let request = ChartRequest::from_profile(&p, kind, false, 100);
        assert!(sink.render(&request, &style).unwrap().exists());
    }
}

#[test]
fn rerender_overwrites_same_path() {
    let dir = tempfile::tempdir().unwrap();
    let sink = PngSink::new(dir.path());
    let style = RenderStyle::default();
    if !font_available(&style) {
        return;
    }
    let p = profile(season());

    let request = ChartRequest::from_profile(&p, ChartKind::Velo, false, 100);
    let first = sink.render(&request, &style).unwrap();
    let second = sink.render(&request, &style).unwrap();
    assert_eq!(first, second);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
