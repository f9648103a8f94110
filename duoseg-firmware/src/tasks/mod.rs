//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! `channels`.

pub mod blink;
pub mod input;
pub mod status_tx;

pub use blink::blink_task;
pub use input::input_task;
pub use status_tx::status_tx_task;
