//! Cosmetic progress estimation for long-running analyses.
//!
//! The provider call gives no progress signal, so callers that want a bar get
//! an estimate: a randomized increment every tick, capped below completion.
//! Only the real outcome moves it to 100%. The ticking task is always
//! aborted when the handle is finished, failed, or dropped.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::domain::foundation::Percentage;

/// Generates fake progress on an independent timer.
#[derive(Debug, Clone)]
pub struct ProgressEstimator {
    tick: Duration,
    step: Range<f64>,
    ceiling: f64,
}

impl Default for ProgressEstimator {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(200),
            step: 0.0..15.0,
            ceiling: 95.0,
        }
    }
}

impl ProgressEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick interval.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Sets the range each tick's increment is drawn from.
    pub fn with_step(mut self, step: Range<f64>) -> Self {
        self.step = step;
        self
    }

    /// Starts ticking. `on_tick` receives every new estimate.
    ///
    /// Ticking stops by itself once the ceiling is reached.
    pub fn start<F>(&self, on_tick: F) -> ProgressHandle
    where
        F: Fn(Percentage) + Send + 'static,
    {
        let tick = self.tick;
        let step = self.step.clone();
        let ceiling = self.ceiling;

        let task = tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut ticker = interval_at(Instant::now() + tick, tick);
            let mut progress = 0.0_f64;

            loop {
                ticker.tick().await;
                let increment = if step.is_empty() { 0.0 } else { rng.gen_range(step.clone()) };
                progress = (progress + increment).min(ceiling);
                on_tick(Percentage::from_f64(progress));
                if progress >= ceiling {
                    break;
                }
            }
        });

        ProgressHandle { task }
    }
}

/// Running estimate. Dropping the handle stops the timer.
#[derive(Debug)]
pub struct ProgressHandle {
    task: JoinHandle<()>,
}

impl ProgressHandle {
    /// Stops the timer after success; the caller should show this value.
    pub fn complete(self) -> Percentage {
        self.task.abort();
        Percentage::HUNDRED
    }

    /// Stops the timer after failure; the caller should reset to this value.
    pub fn fail(self) -> Percentage {
        self.task.abort();
        Percentage::ZERO
    }

    /// True while the timer is still ticking.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<u8>>>, impl Fn(Percentage) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |p: Percentage| sink.lock().unwrap().push(p.value()))
    }

    #[tokio::test]
    async fn estimate_rises_and_stops_at_ceiling() {
        let (seen, on_tick) = recorder();
        let handle = ProgressEstimator::new()
            .with_tick(Duration::from_millis(2))
            .with_step(10.0..15.0)
            .start(on_tick);

        tokio::time::sleep(Duration::from_millis(200)).await;

        let values = seen.lock().unwrap().clone();
        assert!(!values.is_empty());
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.iter().all(|v| *v <= 95));
        assert_eq!(values.last(), Some(&95));
        assert!(!handle.is_running());
        assert_eq!(handle.complete(), Percentage::HUNDRED);
    }

    #[tokio::test]
    async fn failing_stops_the_timer() {
        let (seen, on_tick) = recorder();
        let handle = ProgressEstimator::new()
            .with_tick(Duration::from_millis(5))
            .with_step(0.0..0.5)
            .start(on_tick);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(handle.fail(), Percentage::ZERO);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let count = seen.lock().unwrap().len();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(seen.lock().unwrap().len(), count);
    }

    #[tokio::test]
    async fn dropping_the_handle_stops_the_timer() {
        let (seen, on_tick) = recorder();
        let handle = ProgressEstimator::new()
            .with_tick(Duration::from_millis(5))
            .with_step(0.0..0.5)
            .start(on_tick);
        drop(handle);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let count = seen.lock().unwrap().len();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(seen.lock().unwrap().len(), count);
    }

    #[tokio::test]
    async fn slow_failed_analysis_resets_and_stops_the_timer() {
        use crate::adapters::ai::MockVisionProvider;
        use crate::application::{AnalyzeCheckCommand, AnalyzeCheckError, AnalyzeCheckHandler};
        use crate::domain::check::{ImagePayload, MediaType};
        use crate::ports::AIError;

        let provider = MockVisionProvider::new()
            .with_delay(Duration::from_millis(60))
            .with_error(AIError::service(503, "Model overloaded"));
        let handler = AnalyzeCheckHandler::new(Arc::new(provider.clone()));
        let command = AnalyzeCheckCommand {
            image: ImagePayload::new(b"fake-jpeg".to_vec(), MediaType::Jpeg).unwrap(),
        };

        let (seen, on_tick) = recorder();
        let handle = ProgressEstimator::new()
            .with_tick(Duration::from_millis(5))
            .with_step(1.0..2.0)
            .start(on_tick);

        let err = handler.handle(command).await.unwrap_err();
        assert!(matches!(err, AnalyzeCheckError::Service(ref m) if m == "Model overloaded"));
        assert!(handle.is_running());
        assert!(!seen.lock().unwrap().is_empty());

        assert_eq!(handle.fail(), Percentage::ZERO);
        tokio::time::sleep(Duration::from_millis(10)).await;
        let count = seen.lock().unwrap().len();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(seen.lock().unwrap().len(), count);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn first_tick_waits_one_interval() {
        let (seen, on_tick) = recorder();
        let _handle = ProgressEstimator::new()
            .with_tick(Duration::from_secs(60))
            .start(on_tick);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(seen.lock().unwrap().is_empty());
    }
}
