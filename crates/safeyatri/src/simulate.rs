//! Fixed-latency stand-ins for network calls.
//!
//! Every simulated call resolves after a constant delay unless its
//! cancellation token fires first. There is no jitter and no retry.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::SimulationConfig;

/// Operations the companion pretends to perform remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatedOperation {
    Login,
    Signup,
    RouteCalculation,
    RouteSelection,
    PriceScan,
    DigitalIdGeneration,
    ChatReply,
    ProfileVerificationStep,
    GeofenceAlert,
}

impl SimulatedOperation {
    pub fn base_delay(self) -> Duration {
        let millis = match self {
            SimulatedOperation::Login => 1500,
            SimulatedOperation::Signup => 2000,
            SimulatedOperation::RouteCalculation => 2000,
            SimulatedOperation::RouteSelection => 1000,
            SimulatedOperation::PriceScan => 2000,
            SimulatedOperation::DigitalIdGeneration => 3000,
            SimulatedOperation::ChatReply => 1500,
            SimulatedOperation::ProfileVerificationStep => 800,
            SimulatedOperation::GeofenceAlert => 5000,
        };
        Duration::from_millis(millis)
    }
}

impl fmt::Display for SimulatedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SimulatedOperation::Login => "login",
            SimulatedOperation::Signup => "signup",
            SimulatedOperation::RouteCalculation => "route calculation",
            SimulatedOperation::RouteSelection => "route selection",
            SimulatedOperation::PriceScan => "price scan",
            SimulatedOperation::DigitalIdGeneration => "digital ID generation",
            SimulatedOperation::ChatReply => "chat reply",
            SimulatedOperation::ProfileVerificationStep => "profile verification",
            SimulatedOperation::GeofenceAlert => "geofence alert",
        };
        f.write_str(label)
    }
}

/// Scales the base delays. A scale of zero makes every call immediate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Latency {
    scale: f64,
}

impl Latency {
    /// Largest accepted scale. The slowest call then takes well under two hours.
    pub const MAX_SCALE: f64 = 1_000.0;

    /// Negative scales clamp to zero, oversized ones to [`Latency::MAX_SCALE`].
    pub fn new(scale: f64) -> Self {
        let scale = if scale.is_finite() {
            scale.clamp(0.0, Self::MAX_SCALE)
        } else {
            1.0
        };
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn instant() -> Self {
        Self { scale: 0.0 }
    }

    pub fn delay(&self, operation: SimulatedOperation) -> Duration {
        let seconds = operation.base_delay().as_secs_f64() * self.scale;
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl From<&SimulationConfig> for Latency {
    fn from(config: &SimulationConfig) -> Self {
        Self::new(config.latency_scale)
    }
}

/// The simulated call was abandoned before its delay elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{operation} was cancelled")]
pub struct Cancelled {
    pub operation: SimulatedOperation,
}

/// Wait out the operation's delay, then run `produce`.
///
/// `produce` never runs when `cancel` fires first.
pub async fn simulate<T, F>(
    latency: Latency,
    operation: SimulatedOperation,
    cancel: &CancellationToken,
    produce: F,
) -> Result<T, Cancelled>
where
    F: FnOnce() -> T,
{
    pause(latency, operation, cancel).await?;
    Ok(produce())
}

/// Delay-only variant of [`simulate`].
pub async fn pause(
    latency: Latency,
    operation: SimulatedOperation,
    cancel: &CancellationToken,
) -> Result<(), Cancelled> {
    if cancel.is_cancelled() {
        return Err(Cancelled { operation });
    }

    let delay = latency.delay(operation);
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(%operation, "simulated call cancelled");
            Err(Cancelled { operation })
        }
        _ = tokio::time::sleep(delay) => {
            debug!(%operation, delay_ms = delay.as_millis() as u64, "simulated call resolved");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn resolves_after_fixed_delay() {
        let token = CancellationToken::new();
        let started = tokio::time::Instant::now();
        let value = simulate(Latency::default(), SimulatedOperation::Login, &token, || 7)
            .await
            .expect("not cancelled");
        assert_eq!(value, 7);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1500));
        assert!(elapsed < Duration::from_millis(1600));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_skips_producer() {
        let token = CancellationToken::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            canceller.cancel();
        });

        let result = simulate(
            Latency::default(),
            SimulatedOperation::PriceScan,
            &token,
            move || flag.store(true, Ordering::SeqCst),
        )
        .await;

        assert_eq!(
            result,
            Err(Cancelled {
                operation: SimulatedOperation::PriceScan
            })
        );
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn already_cancelled_token_fails_fast() {
        let token = CancellationToken::new();
        token.cancel();
        let result = pause(Latency::instant(), SimulatedOperation::ChatReply, &token).await;
        assert!(result.is_err());
    }

    #[test]
    fn latency_scale_multiplies_base_delay() {
        let half = Latency::new(0.5);
        assert_eq!(
            half.delay(SimulatedOperation::DigitalIdGeneration),
            Duration::from_millis(1500)
        );
        assert_eq!(
            Latency::instant().delay(SimulatedOperation::GeofenceAlert),
            Duration::ZERO
        );
        assert_eq!(Latency::new(-3.0), Latency::instant());
    }

    #[test]
    fn oversized_scale_is_capped() {
        let huge = Latency::new(1e20);
        assert_eq!(huge.scale(), Latency::MAX_SCALE);
        assert_eq!(
            huge.delay(SimulatedOperation::GeofenceAlert),
            Duration::from_secs(5_000)
        );
        assert_eq!(Latency::new(f64::MAX), huge);
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_scale_still_honours_cancellation() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let result = pause(Latency::new(1e20), SimulatedOperation::Login, &token).await;
        assert_eq!(
            result,
            Err(Cancelled {
                operation: SimulatedOperation::Login
            })
        );
    }
}
