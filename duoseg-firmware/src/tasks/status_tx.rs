//! Status UART transmit task
//!
//! Single writer for operator-facing text. Other tasks queue `Status`
//! values on `STATUS_CHANNEL`; lines are written whole, in queue order.

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::String;

use crate::channels::STATUS_CHANNEL;

/// Longest formatted status line
const LINE_SIZE: usize = 96;

#[embassy_executor::task]
pub async fn status_tx_task(mut tx: BufferedUartTx) {
    info!("Status TX task started");

    let mut line: String<LINE_SIZE> = String::new();

    loop {
        let status = STATUS_CHANNEL.receive().await;

        line.clear();
        if write!(line, "{}\r\n", status).is_err() {
            warn!("Status line too long, dropped: {:?}", status);
            continue;
        }

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send status: {:?}", e);
        }
    }
}
