//! Tick task driving the controller
//!
//! Provides periodic ticks for:
//! - Debounce timers
//! - Pending redraws
//! - Releasing one frame per cooldown to the panel

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};
use portable_atomic::{AtomicU32, Ordering};

/// Signal to notify controller of tick
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Milliseconds since the tick task started, shared with event handlers
static NOW_MS: AtomicU32 = AtomicU32::new(0);

/// Current value of the shared millisecond clock
pub fn now_ms() -> u32 {
    NOW_MS.load(Ordering::Relaxed)
}

/// Tick task - sends periodic tick signals with timestamp
#[embassy_executor::task]
pub async fn tick_task(interval_ms: u32) {
    info!("Tick task started ({} ms)", interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(interval_ms.max(1) as u64));
    let start = Instant::now();

    loop {
        ticker.next().await;

        // Calculate elapsed time since start in milliseconds
        let now_ms = start.elapsed().as_millis() as u32;
        NOW_MS.store(now_ms, Ordering::Relaxed);

        // Signal the controller
        TICK_SIGNAL.signal(now_ms);
    }
}
