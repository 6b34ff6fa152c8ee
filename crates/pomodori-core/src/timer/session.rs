use serde::{Deserialize, Serialize};

/// Smallest accepted duration, in minutes.
pub const MIN_MINUTES: u32 = 1;
/// Largest accepted duration, in minutes.
pub const MAX_MINUTES: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Focus,
    Short,
    Long,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [SessionType::Focus, SessionType::Short, SessionType::Long];

    pub fn label(self) -> &'static str {
        match self {
            SessionType::Focus => "Focus",
            SessionType::Short => "Short Break",
            SessionType::Long => "Long Break",
        }
    }
}

impl std::str::FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "focus" | "f" => Ok(SessionType::Focus),
            "short" | "s" | "short-break" => Ok(SessionType::Short),
            "long" | "l" | "long-break" => Ok(SessionType::Long),
            other => Err(format!("unknown session '{other}' (expected focus, short or long)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Playing,
    #[default]
    Paused,
}

impl TimerMode {
    pub fn toggled(self) -> Self {
        match self {
            TimerMode::Playing => TimerMode::Paused,
            TimerMode::Paused => TimerMode::Playing,
        }
    }
}

/// Per-session base durations, in whole minutes within `[1, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationsMin {
    pub focus_min: u32,
    pub short_min: u32,
    pub long_min: u32,
}

impl Default for DurationsMin {
    fn default() -> Self {
        Self {
            focus_min: 25,
            short_min: 5,
            long_min: 15,
        }
    }
}

/// Raw durations as typed by the user, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationsInput {
    pub focus_min: f64,
    pub short_min: f64,
    pub long_min: f64,
}

impl From<DurationsMin> for DurationsInput {
    fn from(d: DurationsMin) -> Self {
        Self {
            focus_min: d.focus_min as f64,
            short_min: d.short_min as f64,
            long_min: d.long_min as f64,
        }
    }
}

/// Clamp to `[1, 180]` and round to whole minutes. NaN and infinities map to 1.
pub fn normalize_minutes(raw: f64) -> u32 {
    if !raw.is_finite() {
        return MIN_MINUTES;
    }
    raw.clamp(MIN_MINUTES as f64, MAX_MINUTES as f64).round() as u32
}

impl DurationsMin {
    pub fn normalize(input: DurationsInput) -> Self {
        Self {
            focus_min: normalize_minutes(input.focus_min),
            short_min: normalize_minutes(input.short_min),
            long_min: normalize_minutes(input.long_min),
        }
    }

    /// Re-clamp values that may have been edited by hand in storage.
    pub fn normalized(self) -> Self {
        Self::normalize(self.into())
    }

    pub fn minutes_for(&self, session: SessionType) -> u32 {
        match session {
            SessionType::Focus => self.focus_min,
            SessionType::Short => self.short_min,
            SessionType::Long => self.long_min,
        }
    }

    /// Nominal duration of `session` in milliseconds.
    pub fn duration_ms(&self, session: SessionType) -> u64 {
        u64::from(self.minutes_for(session)) * 60_000
    }
}
