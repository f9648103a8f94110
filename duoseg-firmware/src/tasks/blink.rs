//! Blink task
//!
//! Alternates the display between the stored digits and blank while the
//! stored value exceeds the threshold. Polls the store at a slower rate
//! otherwise.

use defmt::*;
use embassy_time::Timer;

use duoseg_core::blink::BlinkScheduler;

use crate::channels::{SharedDisplay, DISPLAY_STATE};

#[embassy_executor::task]
pub async fn blink_task(display: &'static SharedDisplay, mut scheduler: BlinkScheduler) {
    info!("Blink task started");

    loop {
        let step = {
            let mut driver = display.lock().await;
            scheduler.step(&DISPLAY_STATE, &mut *driver)
        };

        if let Some((digit1, digit2)) = step.rendered {
            trace!("Blink phase: {} {}", digit1.value(), digit2.value());
        }

        // Never sleep while holding the driver
        Timer::after_millis(step.wait_ms as u64).await;
    }
}
