//! Minute boundary task.
//!
//! Sleeps until the next whole minute of uptime and signals the main loop
//! with the uptime at that boundary. The main loop owns the
//! [`MinuteClock`](roundy_pico2::MinuteClock) and turns the uptime into a
//! time of day, so button-driven clock offsets never race this task.

use defmt::info;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Instant, Timer};
use roundy_pico2::MinuteClock;

/// Uptime in milliseconds at the latest minute boundary.
pub static MINUTE_TICK: Signal<CriticalSectionRawMutex, u64> = Signal::new();

#[embassy_executor::task]
pub async fn minute_task() {
    info!("Minute task started");

    loop {
        let uptime = Instant::now().as_millis();
        Timer::after_millis(MinuteClock::ms_until_next_minute(uptime)).await;
        MINUTE_TICK.signal(Instant::now().as_millis());
    }
}
