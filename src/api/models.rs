use crate::error::{PanelError, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Snapshot returned by `GET /times`.
///
/// The server computes `perc` as `100 * current / total`, which serializes as
/// `null` while nothing is loaded, so every number tolerates `null`.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct PlaybackStatus {
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub total: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub perc: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub current_s: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_s: f64,
}

fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl PlaybackStatus {
    pub fn from_json(url: &str, body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|source| PanelError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// `(duration, position)` suitable for `MediaSession.setPositionState`.
    ///
    /// Browsers throw when the duration is not positive or the position falls
    /// outside `[0, duration]`, so the position is clamped and unknown
    /// durations yield `None`.
    pub fn position_state(&self) -> Option<(f64, f64)> {
        if !self.total_s.is_finite() || self.total_s <= 0.0 {
            return None;
        }
        let position = if self.current_s.is_finite() {
            self.current_s.clamp(0.0, self.total_s)
        } else {
            0.0
        };
        Some((self.total_s, position))
    }
}

/// Transport commands understood by `GET /action/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    Play,
    Pause,
    Rewind,
    Fullscreen,
    Seek,
}

impl ActionId {
    /// Actions rendered as buttons, in display order. Seeking goes through the bar.
    pub const BUTTONS: [ActionId; 4] = [
        ActionId::Rewind,
        ActionId::Play,
        ActionId::Pause,
        ActionId::Fullscreen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Rewind => "rewind",
            Self::Fullscreen => "fullscreen",
            Self::Seek => "seek",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Pause => "Pause",
            Self::Rewind => "Rewind",
            Self::Fullscreen => "Fullscreen",
            Self::Seek => "Seek",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "play" => Ok(Self::Play),
            "pause" => Ok(Self::Pause),
            "rewind" => Ok(Self::Rewind),
            "fullscreen" => Ok(Self::Fullscreen),
            "seek" => Ok(Self::Seek),
            _ => Err(PanelError::UnknownAction(s.to_string())),
        }
    }
}

/// Native media-session actions the panel registers handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAction {
    Play,
    Pause,
    SeekBackward,
    PreviousTrack,
}

impl SessionAction {
    pub const ALL: [SessionAction; 4] = [
        SessionAction::Play,
        SessionAction::Pause,
        SessionAction::SeekBackward,
        SessionAction::PreviousTrack,
    ];

    /// Name passed to `navigator.mediaSession.setActionHandler`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::SeekBackward => "seekbackward",
            Self::PreviousTrack => "previoustrack",
        }
    }

    /// Remote command a hardware key maps to. A single file has no previous
    /// track, so "previous" jumps back like the rewind key.
    pub fn remote_action(self) -> ActionId {
        match self {
            Self::Play => ActionId::Play,
            Self::Pause => ActionId::Pause,
            Self::SeekBackward | Self::PreviousTrack => ActionId::Rewind,
        }
    }
}

/// Horizontal placement of the progress bar at the moment it was clicked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f64,
    pub width: f64,
}

impl BarGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Percentage of the bar to the left of `click_x`.
    pub fn percent_at(&self, click_x: f64, clamp: bool) -> Result<f64> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(PanelError::InvalidGeometry(self.width));
        }
        let percent = 100.0 * (click_x - self.left) / self.width;
        if !percent.is_finite() {
            return Err(PanelError::InvalidGeometry(self.width));
        }
        Ok(if clamp {
            percent.clamp(0.0, 100.0)
        } else {
            percent
        })
    }
}
