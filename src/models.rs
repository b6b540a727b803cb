use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AccelerationSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelerationSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimedSample {
    #[serde(flatten)]
    pub sample: AccelerationSample,
    #[serde(default)]
    pub timestamp_ms: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StepCounterState {
    pub step_count: u64,
    pub active_seconds: u64,
    pub last_step_at_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub steps: u64,
}

pub type HistoryLog = Vec<HistoryEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SamplerStatus {
    #[default]
    Pending,
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InfoPanel {
    #[default]
    Benefits,
    Tips,
    Safety,
}

impl InfoPanel {
    pub const ALL: [InfoPanel; 3] = [InfoPanel::Benefits, InfoPanel::Tips, InfoPanel::Safety];

    pub fn as_str(self) -> &'static str {
        match self {
            InfoPanel::Benefits => "benefits",
            InfoPanel::Tips => "tips",
            InfoPanel::Safety => "safety",
        }
    }
}

impl fmt::Display for InfoPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InfoPanel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "benefits" => Ok(InfoPanel::Benefits),
            "tips" => Ok(InfoPanel::Tips),
            "safety" => Ok(InfoPanel::Safety),
            other => Err(format!("unknown panel '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub counter: StepCounterState,
    pub goal: u64,
    pub dark_mode: bool,
    pub history: HistoryLog,
    pub panel: InfoPanel,
    pub sampler: SamplerStatus,
}

impl Dashboard {
    pub fn with_goal(goal: u64) -> Self {
        Self {
            counter: StepCounterState::default(),
            goal,
            dark_mode: false,
            history: Vec::new(),
            panel: InfoPanel::default(),
            sampler: SamplerStatus::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PermissionRequest {
    pub granted: bool,
}

#[derive(Debug, Deserialize)]
pub struct MotionRequest {
    pub samples: Vec<TimedSample>,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    #[serde(deserialize_with = "goal_text")]
    pub goal: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GoalInput {
    Text(String),
    Number(serde_json::Number),
}

// Goal validation happens in the controller; here both JSON forms become text.
fn goal_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match GoalInput::deserialize(deserializer)? {
        GoalInput::Text(text) => text,
        GoalInput::Number(number) => number.to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct NextStateQuery {
    #[serde(default)]
    pub since: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct DarkModeRequest {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct PanelRequest {
    pub panel: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// The presentation update surface, rebuilt after every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u64,
    pub step_count: u64,
    pub calories: String,
    pub distance_km: String,
    pub active_seconds: u64,
    pub active_time: String,
    pub progress_percent: f64,
    pub motivation: String,
    pub badges: Vec<String>,
    pub badge_text: String,
    pub goal: u64,
    pub dark_mode: bool,
    pub history: HistoryLog,
    pub history_lines: Vec<String>,
    pub chart: ChartSeries,
    pub panel: InfoPanel,
    pub sampler: SamplerStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_names_parse_back() {
        for panel in InfoPanel::ALL {
            assert_eq!(panel.as_str().parse::<InfoPanel>(), Ok(panel));
        }
        assert!("charts".parse::<InfoPanel>().is_err());
    }

    #[test]
    fn timed_sample_reads_flat_json() {
        let sample: TimedSample =
            serde_json::from_str(r#"{"x":1.5,"y":-2.0,"z":9.8,"timestamp_ms":42}"#).unwrap();
        assert_eq!(sample.sample, AccelerationSample::new(1.5, -2.0, 9.8));
        assert_eq!(sample.timestamp_ms, Some(42));

        let untimed: TimedSample = serde_json::from_str(r#"{"x":0,"y":0,"z":0}"#).unwrap();
        assert_eq!(untimed.timestamp_ms, None);
    }

    #[test]
    fn goal_accepts_text_or_number() {
        let text: GoalRequest = serde_json::from_str(r#"{"goal":"4200"}"#).unwrap();
        assert_eq!(text.goal, "4200");
        let number: GoalRequest = serde_json::from_str(r#"{"goal":4200}"#).unwrap();
        assert_eq!(number.goal, "4200");
        let negative: GoalRequest = serde_json::from_str(r#"{"goal":-3}"#).unwrap();
        assert_eq!(negative.goal, "-3");
        assert!(serde_json::from_str::<GoalRequest>(r#"{"goal":true}"#).is_err());
    }

    #[test]
    fn sample_missing_axis_is_rejected() {
        assert!(serde_json::from_str::<TimedSample>(r#"{"x":1,"y":2}"#).is_err());
    }
}
