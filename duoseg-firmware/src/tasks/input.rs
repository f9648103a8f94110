//! Serial input task
//!
//! Assembles console lines, applies them to the shared display state and
//! renders immediately when the value is not blinking. Blanks the display
//! after the idle timeout.

use defmt::*;
use embassy_time::Instant;
use portable_atomic::Ordering;

use duoseg_core::config::InputConfig;
use duoseg_core::input::{commit, idle_reset, InputController};
use duoseg_core::status::Status;
use duoseg_hal_rp2040::ByteReader;

use crate::channels::{SharedDisplay, DISPLAY_STATE, LINES_ACCEPTED, LINES_REJECTED, STATUS_CHANNEL};

/// Milliseconds since boot, wrapping at `u32::MAX`
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

async fn report(status: Status) {
    STATUS_CHANNEL.send(status).await;
}

#[embassy_executor::task]
pub async fn input_task(
    mut reader: ByteReader,
    display: &'static SharedDisplay,
    config: InputConfig,
) {
    info!("Input task started");

    let mut controller: InputController = InputController::new(&config, now_ms());
    report(Status::Prompt).await;

    loop {
        if controller.poll_idle(now_ms()) {
            info!("No input for {} ms, clearing display", config.idle_timeout_ms);
            {
                let mut driver = display.lock().await;
                idle_reset(&DISPLAY_STATE, &mut *driver);
            }
            report(Status::IdleReset).await;
            report(Status::Prompt).await;
            continue;
        }

        let byte = match reader.read_byte().await {
            Ok(Some(byte)) => byte,
            Ok(None) => continue,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                if controller.has_partial_line() {
                    controller.discard_line();
                    report(Status::ReceiveError).await;
                }
                continue;
            }
        };

        let Some(result) = controller.feed(byte, now_ms()) else {
            continue;
        };

        match result {
            Ok(update) => {
                LINES_ACCEPTED.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Accepted {} (threshold {}, blinking {})",
                    update.number, update.threshold, update.state.blinking
                );
                if update.truncated {
                    warn!("Field longer than two digits, using {}", update.number);
                }

                let rendered = {
                    let mut driver = display.lock().await;
                    commit(&update, &DISPLAY_STATE, &mut *driver)
                };
                trace!("Rendered immediately: {}", rendered);

                for status in Status::for_update(&update) {
                    report(status).await;
                }
            }
            Err(e) => {
                LINES_REJECTED.fetch_add(1, Ordering::Relaxed);
                warn!("Rejected line: {:?}", e);
                report(Status::Rejected(e)).await;
            }
        }

        report(Status::Prompt).await;
    }
}
