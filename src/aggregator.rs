use crate::config::StepTuning;
use crate::models::StepCounterState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    OneK,
    FiveK,
    TenK,
}

impl Badge {
    const TIERS: [(u64, Badge); 3] = [(1000, Badge::OneK), (5000, Badge::FiveK), (10000, Badge::TenK)];

    pub fn label(self) -> &'static str {
        match self {
            Badge::OneK => "✨ 1K Steps Badge!",
            Badge::FiveK => "✨ 5K Steps Master!",
            Badge::TenK => "✨ 10K Pro Walker!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub calories: f64,
    pub distance_km: f64,
    pub progress_percent: f64,
    pub motivation: &'static str,
    pub badges: Vec<Badge>,
}

pub fn derive(step_count: u64, goal: u64, tuning: &StepTuning) -> DerivedMetrics {
    DerivedMetrics {
        calories: calories(step_count, tuning),
        distance_km: distance_km(step_count, tuning),
        progress_percent: progress_percent(step_count, goal),
        motivation: motivation(raw_percent(step_count, goal)),
        badges: badges(step_count),
    }
}

pub fn calories(step_count: u64, tuning: &StepTuning) -> f64 {
    step_count as f64 * tuning.kcal_per_step
}

pub fn distance_km(step_count: u64, tuning: &StepTuning) -> f64 {
    step_count as f64 * tuning.step_length_m / 1000.0
}

fn raw_percent(step_count: u64, goal: u64) -> f64 {
    // Goal is kept positive by the controller; max(1) keeps this total anyway.
    step_count as f64 / goal.max(1) as f64 * 100.0
}

pub fn progress_percent(step_count: u64, goal: u64) -> f64 {
    raw_percent(step_count, goal).min(100.0)
}

pub fn motivation(percent: f64) -> &'static str {
    if percent >= 100.0 {
        "Goal achieved!"
    } else if percent >= 75.0 {
        "Almost there!"
    } else if percent >= 50.0 {
        "Halfway to your goal!"
    } else if percent >= 25.0 {
        "Great start! Keep going!"
    } else {
        ""
    }
}

pub fn badges(step_count: u64) -> Vec<Badge> {
    Badge::TIERS
        .iter()
        .filter(|(min, _)| step_count >= *min)
        .map(|(_, badge)| *badge)
        .collect()
}

pub fn format_active_time(active_seconds: u64) -> String {
    format!("{}m {}s", active_seconds / 60, active_seconds % 60)
}

/// Counts one detected step at `at_ms` and credits an active second when no
/// step landed inside the preceding window.
pub fn record_step(state: &mut StepCounterState, at_ms: i64, window_ms: i64) {
    state.step_count = state.step_count.saturating_add(1);
    let fresh = match state.last_step_at_ms {
        None => true,
        Some(last) => at_ms.saturating_sub(last) > window_ms,
    };
    if fresh {
        state.active_seconds = state.active_seconds.saturating_add(1);
    }
    state.last_step_at_ms = Some(at_ms);
}

pub fn reset(state: &mut StepCounterState) {
    *state = StepCounterState::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calories_and_distance_follow_step_count() {
        let tuning = StepTuning::default();
        assert_eq!(format!("{:.2}", calories(100, &tuning)), "5.00");
        assert_eq!(format!("{:.2}", distance_km(100, &tuning)), "0.08");
        assert_eq!(calories(0, &tuning), 0.0);
        assert_eq!(distance_km(0, &tuning), 0.0);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_percent(2000, 1000), 100.0);
        assert_eq!(progress_percent(250, 1000), 25.0);
        assert_eq!(progress_percent(0, 1000), 0.0);
    }

    #[test]
    fn motivation_thresholds() {
        let tuning = StepTuning::default();
        let message = |steps| derive(steps, 1000, &tuning).motivation;
        assert_eq!(message(0), "");
        assert_eq!(message(249), "");
        assert_eq!(message(250), "Great start! Keep going!");
        assert_eq!(message(500), "Halfway to your goal!");
        assert_eq!(message(750), "Almost there!");
        assert_eq!(message(1000), "Goal achieved!");
        assert_eq!(message(4000), "Goal achieved!");
    }

    #[test]
    fn badges_accumulate() {
        assert!(badges(999).is_empty());
        assert_eq!(badges(1000), vec![Badge::OneK]);
        assert_eq!(badges(10000), vec![Badge::OneK, Badge::FiveK, Badge::TenK]);
        assert_eq!(badges(12000).len(), 3);
    }

    #[test]
    fn active_time_string() {
        assert_eq!(format_active_time(0), "0m 0s");
        assert_eq!(format_active_time(125), "2m 5s");
    }

    #[test]
    fn close_steps_share_one_active_second() {
        let mut state = StepCounterState::default();
        record_step(&mut state, 10_000, 2000);
        record_step(&mut state, 10_500, 2000);
        assert_eq!(state.step_count, 2);
        assert_eq!(state.active_seconds, 1);
    }

    #[test]
    fn spaced_steps_each_credit_a_second() {
        let mut state = StepCounterState::default();
        record_step(&mut state, 10_000, 2000);
        record_step(&mut state, 12_500, 2000);
        assert_eq!(state.active_seconds, 2);
    }

    #[test]
    fn step_exactly_at_window_edge_is_inside() {
        let mut state = StepCounterState::default();
        record_step(&mut state, 0, 2000);
        record_step(&mut state, 2000, 2000);
        assert_eq!(state.active_seconds, 1);
        assert_eq!(state.last_step_at_ms, Some(2000));
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let mut state = StepCounterState::default();
        record_step(&mut state, i64::MIN, 2000);
        record_step(&mut state, i64::MAX, 2000);
        assert_eq!(state.active_seconds, 2);

        record_step(&mut state, i64::MIN, 2000);
        assert_eq!(state.step_count, 3);
        assert_eq!(state.active_seconds, 2);
        assert_eq!(state.last_step_at_ms, Some(i64::MIN));
    }

    #[test]
    fn steady_walk_undercounts_elapsed_time() {
        let mut state = StepCounterState::default();
        for i in 0..20 {
            record_step(&mut state, i * 500, 2000);
        }
        assert_eq!(state.step_count, 20);
        assert_eq!(state.active_seconds, 1);
    }
}
