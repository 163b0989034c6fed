//! Smart-band telemetry simulation: random heart-rate readings and a draining
//! battery, each with one-shot alerts.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::notify::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartRateBand {
    Normal,
    Elevated,
    Abnormal,
}

impl HeartRateBand {
    /// Above 100 or below 50 BPM is abnormal; above 90 or below 60 elevated.
    pub fn classify(bpm: u16) -> Self {
        if bpm > 100 || bpm < 50 {
            HeartRateBand::Abnormal
        } else if bpm > 90 || bpm < 60 {
            HeartRateBand::Elevated
        } else {
            HeartRateBand::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HeartRateBand::Normal => "Normal",
            HeartRateBand::Elevated => "Elevated",
            HeartRateBand::Abnormal => "Abnormal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandSettings {
    pub heart_rate_range: RangeInclusive<u16>,
    pub heart_rate_interval: Duration,
    pub battery_interval: Duration,
    pub initial_heart_rate: u16,
    pub initial_battery: u8,
    pub battery_decrement: u8,
    pub low_battery_threshold: u8,
}

impl Default for BandSettings {
    fn default() -> Self {
        Self {
            heart_rate_range: 65..=84,
            heart_rate_interval: Duration::from_secs(3),
            battery_interval: Duration::from_secs(10),
            initial_heart_rate: 72,
            initial_battery: 87,
            battery_decrement: 1,
            low_battery_threshold: 20,
        }
    }
}

impl From<&SimulationConfig> for BandSettings {
    /// Heart rate follows the configured interval; the battery keeps its
    /// default ratio to it.
    fn from(config: &SimulationConfig) -> Self {
        let defaults = Self::default();
        let ratio = defaults.battery_interval.as_secs_f64()
            / defaults.heart_rate_interval.as_secs_f64();
        Self {
            heart_rate_interval: config.band_interval,
            battery_interval: config.band_interval.mul_f64(ratio),
            ..defaults
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartRateReading {
    pub bpm: u16,
    pub band: HeartRateBand,
    pub alert: Option<Notification>,
}

/// Tracks whether the abnormal alert already fired for the current run.
#[derive(Debug, Clone)]
pub struct HeartRateMonitor {
    last: u16,
    alert_active: bool,
}

impl HeartRateMonitor {
    pub fn new(initial: u16) -> Self {
        Self {
            last: initial,
            alert_active: false,
        }
    }

    /// Record a reading. The abnormal alert is re-armed only by a normal
    /// reading; elevated readings leave it as is.
    pub fn record(&mut self, bpm: u16) -> HeartRateReading {
        self.last = bpm;
        let band = HeartRateBand::classify(bpm);
        let alert = match band {
            HeartRateBand::Abnormal if !self.alert_active => {
                self.alert_active = true;
                warn!(bpm, "abnormal heart rate detected");
                Some(Notification::destructive(
                    "⚠️ Abnormal Heart Rate Detected",
                    format!("Heart rate: {bpm} BPM. Emergency contacts notified."),
                ))
            }
            HeartRateBand::Normal => {
                self.alert_active = false;
                None
            }
            _ => None,
        };

        HeartRateReading { bpm, band, alert }
    }

    pub fn last(&self) -> u16 {
        self.last
    }

    pub fn alert_active(&self) -> bool {
        self.alert_active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatteryReading {
    pub level: u8,
    pub alert: Option<Notification>,
}

#[derive(Debug, Clone)]
pub struct BatteryMonitor {
    level: u8,
    decrement: u8,
    low_threshold: u8,
}

impl BatteryMonitor {
    pub fn new(level: u8, decrement: u8, low_threshold: u8) -> Self {
        Self {
            level: level.min(100),
            decrement,
            low_threshold,
        }
    }

    /// Drain one step, flooring at zero. Warns once, on the step that
    /// reaches the low threshold.
    pub fn drain(&mut self) -> BatteryReading {
        let previous = self.level;
        self.level = previous.saturating_sub(self.decrement);

        let alert = (previous > self.low_threshold && self.level <= self.low_threshold).then(|| {
            warn!(level = self.level, "smart band battery low");
            Notification::destructive(
                "Low Battery Warning",
                format!(
                    "Smart band battery at {}%. Please charge soon.",
                    self.level
                ),
            )
        });

        BatteryReading {
            level: self.level,
            alert,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BandEvent {
    HeartRate(HeartRateReading),
    Battery(BatteryReading),
}

impl BandEvent {
    pub fn alert(&self) -> Option<&Notification> {
        match self {
            BandEvent::HeartRate(reading) => reading.alert.as_ref(),
            BandEvent::Battery(reading) => reading.alert.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandSnapshot {
    pub heart_rate: u16,
    pub heart_rate_band: HeartRateBand,
    pub battery_level: u8,
    pub connected: bool,
    pub alert_active: bool,
}

/// Simulated wearable paired with the companion.
#[derive(Debug, Clone)]
pub struct SmartBand {
    settings: BandSettings,
    heart: HeartRateMonitor,
    battery: BatteryMonitor,
    connected: bool,
}

impl SmartBand {
    pub fn new(settings: BandSettings) -> Self {
        let heart = HeartRateMonitor::new(settings.initial_heart_rate);
        let battery = BatteryMonitor::new(
            settings.initial_battery,
            settings.battery_decrement,
            settings.low_battery_threshold,
        );
        Self {
            settings,
            heart,
            battery,
            connected: true,
        }
    }

    pub fn sample_heart_rate<R: Rng>(&mut self, rng: &mut R) -> HeartRateReading {
        let bpm = rng.gen_range(self.settings.heart_rate_range.clone());
        self.heart.record(bpm)
    }

    pub fn drain_battery(&mut self) -> BatteryReading {
        self.battery.drain()
    }

    pub fn toggle_connection(&mut self) -> Notification {
        self.connected = !self.connected;
        info!(connected = self.connected, "smart band connection toggled");
        if self.connected {
            Notification::info("Device Connected", "Smart band connected successfully")
        } else {
            Notification::info("Device Disconnected", "Smart band is offline")
        }
    }

    pub fn sos(&self) -> Notification {
        warn!("smart band SOS triggered");
        Notification::destructive(
            "Emergency SOS Triggered",
            "Alert sent via Smart Band to emergency contacts",
        )
    }

    pub fn snapshot(&self) -> BandSnapshot {
        BandSnapshot {
            heart_rate: self.heart.last(),
            heart_rate_band: HeartRateBand::classify(self.heart.last()),
            battery_level: self.battery.level(),
            connected: self.connected,
            alert_active: self.heart.alert_active(),
        }
    }

    /// Drive both sensors on their intervals until `cancel` fires or the
    /// receiver goes away. Returns the band in its final state.
    pub async fn run<R>(
        mut self,
        mut rng: R,
        cancel: CancellationToken,
        events: mpsc::Sender<BandEvent>,
    ) -> SmartBand
    where
        R: Rng + Send,
    {
        let start = Instant::now();
        let mut heart_tick = interval_at(
            start + self.settings.heart_rate_interval,
            self.settings.heart_rate_interval,
        );
        let mut battery_tick = interval_at(
            start + self.settings.battery_interval,
            self.settings.battery_interval,
        );
        heart_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        battery_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = heart_tick.tick() => BandEvent::HeartRate(self.sample_heart_rate(&mut rng)),
                _ = battery_tick.tick() => BandEvent::Battery(self.drain_battery()),
            };

            debug!(?event, "smart band reading");
            if events.send(event).await.is_err() {
                break;
            }
        }

        self
    }

    /// Spawn [`SmartBand::run`] on the current runtime.
    pub fn spawn<R>(
        self,
        rng: R,
        cancel: CancellationToken,
    ) -> (JoinHandle<SmartBand>, mpsc::Receiver<BandEvent>)
    where
        R: Rng + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(32);
        let handle = tokio::spawn(self.run(rng, cancel, tx));
        (handle, rx)
    }
}

impl Default for SmartBand {
    fn default() -> Self {
        Self::new(BandSettings::default())
    }
}
