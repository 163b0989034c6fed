use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use safeyatri::band::{BandEvent, BandSettings, HeartRateBand, SmartBand};
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn spawned_band_streams_readings_until_cancelled() {
    let cancel = CancellationToken::new();
    let band = SmartBand::new(BandSettings::default());
    let (handle, mut events) = band.spawn(StdRng::seed_from_u64(7), cancel.clone());

    let mut heart = Vec::new();
    let mut battery = Vec::new();
    while heart.len() < 9 {
        match events.recv().await.expect("band still running") {
            BandEvent::HeartRate(reading) => heart.push(reading),
            BandEvent::Battery(reading) => battery.push(reading),
        }
    }
    cancel.cancel();
    let band = handle.await.expect("band task joins");

    assert!(heart
        .iter()
        .all(|reading| (65..=84).contains(&reading.bpm) && reading.band == HeartRateBand::Normal));
    assert!(heart.iter().all(|reading| reading.alert.is_none()));
    assert_eq!(battery.len(), 2);
    assert!(battery.windows(2).all(|pair| pair[1].level < pair[0].level));
    assert_eq!(band.snapshot().battery_level, 85);
}

#[tokio::test(start_paused = true)]
async fn fast_drain_warns_once_at_the_threshold() {
    let settings = BandSettings {
        heart_rate_interval: Duration::from_secs(3600),
        battery_interval: Duration::from_secs(1),
        initial_battery: 23,
        battery_decrement: 2,
        ..BandSettings::default()
    };
    let cancel = CancellationToken::new();
    let (handle, mut events) =
        SmartBand::new(settings).spawn(StdRng::seed_from_u64(1), cancel.clone());

    let mut levels = Vec::new();
    let mut warnings = 0;
    while levels.len() < 15 {
        if let BandEvent::Battery(reading) = events.recv().await.expect("band still running") {
            levels.push(reading.level);
            if reading.alert.is_some() {
                warnings += 1;
            }
        }
    }
    cancel.cancel();
    handle.await.expect("band task joins");

    assert_eq!(&levels[..3], &[21, 19, 17]);
    assert_eq!(*levels.last().expect("readings"), 0);
    assert_eq!(warnings, 1);
}
