use std::time::Duration;

/// Artificial delay of a simulated network call. Zero completes immediately,
/// which is what tests use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latency(Duration);

impl Latency {
    pub const NONE: Latency = Latency(Duration::ZERO);

    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub async fn simulate(&self) {
        if !self.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}
