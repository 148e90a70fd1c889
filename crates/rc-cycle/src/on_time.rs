//! On-time filter.

use crate::channels::{ChannelResolver, Field};
use crate::sample::SensorSample;

/// Decides whether the compressor is running.
///
/// Uses discharge (liquid line) pressure only; it collapses towards
/// atmospheric as soon as the compressor stops. A sample with no discharge
/// reading counts as off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnTimeFilter {
    pub threshold_psig: f64,
}

impl OnTimeFilter {
    pub fn new(threshold_psig: f64) -> Self {
        Self { threshold_psig }
    }

    pub fn is_on(&self, discharge_psig: Option<f64>) -> bool {
        discharge_psig.is_some_and(|p| p >= self.threshold_psig)
    }

    pub fn is_on_sample(&self, channels: &ChannelResolver<'_>, sample: &SensorSample) -> bool {
        self.is_on(channels.read(sample, &Field::DischargePressure).get())
    }
}
