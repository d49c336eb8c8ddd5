//! Pitch events and the balls-strikes count.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game type code for regular-season games.
pub const REGULAR_SEASON: &str = "R";

/// Balls-strikes tally at the moment of a pitch.
///
/// Displays and parses as `"{balls}-{strikes}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Count {
    pub balls: u8,
    pub strikes: u8,
}

impl Count {
    pub fn new(balls: u8, strikes: u8) -> Self {
        Self { balls, strikes }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.balls, self.strikes)
    }
}

impl FromStr for Count {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (balls, strikes) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("count label '{s}' is not of the form balls-strikes"))?;
        let balls = balls
            .parse::<u8>()
            .map_err(|e| format!("count label '{s}': balls: {e}"))?;
        let strikes = strikes
            .parse::<u8>()
            .map_err(|e| format!("count label '{s}': strikes: {e}"))?;
        Ok(Self { balls, strikes })
    }
}

impl TryFrom<String> for Count {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Count> for String {
    fn from(count: Count) -> Self {
        count.to_string()
    }
}

/// Which side of the plate the batter stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl Handedness {
    pub fn code(self) -> &'static str {
        match self {
            Handedness::Left => "L",
            Handedness::Right => "R",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One recorded pitch.
///
/// Field names follow the upstream Statcast columns so rows deserialize
/// straight from the provider CSV and from cache files. The count label is not
/// stored: [`PitchEvent::count`] derives it from `balls` and `strikes`, so a
/// `count` column in any input is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchEvent {
    /// "Last, First" as reported upstream.
    #[serde(default)]
    pub player_name: String,
    /// MLBAM id of the pitcher.
    #[serde(default)]
    pub pitcher: Option<u32>,
    #[serde(default)]
    pub game_date: Option<NaiveDate>,
    #[serde(default)]
    pub game_type: String,
    pub balls: u8,
    pub strikes: u8,
    #[serde(default)]
    pub pitch_name: String,
    #[serde(default)]
    pub release_speed: Option<f64>,
    #[serde(default)]
    pub pfx_x: Option<f64>,
    #[serde(default)]
    pub pfx_z: Option<f64>,
    #[serde(default)]
    pub plate_x: Option<f64>,
    #[serde(default)]
    pub plate_z: Option<f64>,
    pub stand: Handedness,
    #[serde(default)]
    pub sz_top: Option<f64>,
    #[serde(default)]
    pub sz_bot: Option<f64>,
}

impl PitchEvent {
    pub fn count(&self) -> Count {
        Count::new(self.balls, self.strikes)
    }

    pub fn is_regular_season(&self) -> bool {
        self.game_type == REGULAR_SEASON
    }

    /// Pitch name, or `"Unknown"` when the provider left it blank.
    pub fn pitch_label(&self) -> &str {
        if self.pitch_name.is_empty() {
            "Unknown"
        } else {
            &self.pitch_name
        }
    }

    /// Horizontal and vertical break, when both were measured.
    pub fn movement(&self) -> Option<(f64, f64)> {
        Some((self.pfx_x?, self.pfx_z?))
    }

    /// Plate-crossing location, when both coordinates were measured.
    pub fn location(&self) -> Option<(f64, f64)> {
        Some((self.plate_x?, self.plate_z?))
    }
}
