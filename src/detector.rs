use crate::models::AccelerationSample;

#[derive(Debug, Clone)]
pub struct StepDetector {
    threshold: f64,
    last_accel: AccelerationSample,
}

impl StepDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_accel: AccelerationSample::default(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn last_accel(&self) -> AccelerationSample {
        self.last_accel
    }

    // The reference sample is replaced whether or not a step fired.
    pub fn observe(&mut self, sample: AccelerationSample) -> bool {
        let delta = axis_delta(&self.last_accel, &sample);
        self.last_accel = sample;
        delta > self.threshold
    }
}

pub fn axis_delta(previous: &AccelerationSample, current: &AccelerationSample) -> f64 {
    (current.x - previous.x).abs() + (current.y - previous.y).abs() + (current.z - previous.z).abs()
}
