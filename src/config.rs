use std::{env, path::PathBuf, str::FromStr};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/steps.json";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTuning {
    pub threshold: f64,
    pub step_length_m: f64,
    pub kcal_per_step: f64,
    pub active_window_ms: i64,
    pub default_goal: u64,
}

impl Default for StepTuning {
    fn default() -> Self {
        Self {
            threshold: 12.0,
            step_length_m: 0.8,
            kcal_per_step: 0.05,
            active_window_ms: 2000,
            default_goal: 1000,
        }
    }
}

impl StepTuning {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            threshold: env_or("STEP_THRESHOLD", defaults.threshold, |v: &f64| {
                v.is_finite() && *v >= 0.0
            }),
            step_length_m: env_or("STEP_LENGTH_M", defaults.step_length_m, |v: &f64| {
                v.is_finite() && *v >= 0.0
            }),
            kcal_per_step: env_or("STEP_KCAL", defaults.kcal_per_step, |v: &f64| {
                v.is_finite() && *v >= 0.0
            }),
            active_window_ms: env_or("STEP_ACTIVE_WINDOW_MS", defaults.active_window_ms, |v| {
                *v >= 0
            }),
            default_goal: env_or("STEP_DEFAULT_GOAL", defaults.default_goal, |v| *v > 0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub tuning: StepTuning,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", DEFAULT_PORT, |_| true),
            data_path: resolve_data_path(),
            tuning: StepTuning::from_env(),
        }
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_DATA_PATH)
}

fn env_or<T>(key: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => parse_or(key, &raw, default, valid),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            warn!("ignoring {key}={raw:?}, keeping {default:?}");
            default
        }
    }
}
