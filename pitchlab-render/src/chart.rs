//! Chart kinds and the data each one draws.

use pitchlab_core::{HandednessSplit, PitchEvent, PitcherProfile};
use std::fmt;
use std::str::FromStr;

/// The four charts, each written to a fixed file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    PitchDist,
    Velo,
    MovementProfile,
    PitchSample,
}

impl ChartKind {
    pub fn all() -> [ChartKind; 4] {
        [
            ChartKind::PitchDist,
            ChartKind::Velo,
            ChartKind::MovementProfile,
            ChartKind::PitchSample,
        ]
    }

    /// Output file name without extension.
    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::PitchDist => "pitch_dist",
            ChartKind::Velo => "velo",
            ChartKind::MovementProfile => "movement_profile",
            ChartKind::PitchSample => "pitch_sample",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::all()
            .into_iter()
            .find(|k| k.file_stem() == s.trim())
            .ok_or_else(|| {
                format!("unknown chart '{s}' (expected pitch_dist, velo, movement_profile or pitch_sample)")
            })
    }
}

/// Prepared data for one chart.
#[derive(Debug, Clone)]
pub enum Chart<'a> {
    /// Two donuts, vs LHB and vs RHB.
    PitchDistribution {
        split: HandednessSplit,
        count_label: String,
    },
    /// One horizontal violin of release speeds per pitch type.
    Velocity { events: Vec<&'a PitchEvent> },
    /// Horizontal vs vertical break.
    Movement { events: Vec<&'a PitchEvent> },
    /// Plate locations of a random sample.
    Sample {
        events: Vec<&'a PitchEvent>,
        sample_size: usize,
    },
}

impl<'a> Chart<'a> {
    /// Build the data for `kind` from a profile. `use_filter` selects the
    /// profile's active count filter over all events.
    pub fn from_profile(
        profile: &'a PitcherProfile,
        kind: ChartKind,
        use_filter: bool,
        sample_size: usize,
    ) -> Self {
        match kind {
            ChartKind::PitchDist => Chart::PitchDistribution {
                split: profile.pitch_split(use_filter),
                count_label: profile.active_label().to_string(),
            },
            ChartKind::Velo => Chart::Velocity {
                events: profile.events(use_filter),
            },
            ChartKind::MovementProfile => Chart::Movement {
                events: profile.events(use_filter),
            },
            ChartKind::PitchSample => Chart::Sample {
                events: profile.events(use_filter),
                sample_size,
            },
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            Chart::PitchDistribution { .. } => ChartKind::PitchDist,
            Chart::Velocity { .. } => ChartKind::Velo,
            Chart::Movement { .. } => ChartKind::MovementProfile,
            Chart::Sample { .. } => ChartKind::PitchSample,
        }
    }

    /// Figure title for `pitcher` ("First Last").
    pub fn title(&self, pitcher: &str) -> String {
        match self {
            Chart::PitchDistribution { .. } => format!("{pitcher} - Pitch Usage vs LHB & RHB"),
            Chart::Velocity { .. } => format!("{pitcher} - Velocity Distribution"),
            Chart::Movement { .. } => format!("{pitcher} - Movement Profile"),
            Chart::Sample { sample_size, .. } => format!("{pitcher} - {sample_size} Pitch Sample"),
        }
    }
}

/// One chart for one pitcher.
#[derive(Debug, Clone)]
pub struct ChartRequest<'a> {
    /// Display name, "First Last".
    pub pitcher: String,
    pub chart: Chart<'a>,
}

impl<'a> ChartRequest<'a> {
    pub fn new(pitcher: impl Into<String>, chart: Chart<'a>) -> Self {
        Self {
            pitcher: pitcher.into(),
            chart,
        }
    }

    pub fn from_profile(
        profile: &'a PitcherProfile,
        kind: ChartKind,
        use_filter: bool,
        sample_size: usize,
    ) -> Self {
        Self::new(
            profile.display_name(),
            Chart::from_profile(profile, kind, use_filter, sample_size),
        )
    }

    pub fn kind(&self) -> ChartKind {
        self.chart.kind()
    }

    pub fn title(&self) -> String {
        self.chart.title(&self.pitcher)
    }
}
