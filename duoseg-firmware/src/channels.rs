//! Inter-task communication and shared state
//!
//! Statics shared between Embassy tasks. Uses embassy-sync primitives; the
//! raw mutex is `CriticalSectionRawMutex` throughout, so every critical
//! section masks interrupts and cannot be preempted.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use portable_atomic::AtomicU32;

use duoseg_core::status::Status;
use duoseg_core::DisplayStateStore;
use duoseg_drivers::display::Aip1628;
use duoseg_hal_rp2040::RpOutput;

/// Channel capacity for operator status lines
const STATUS_CHANNEL_SIZE: usize = 8;

/// Concrete display driver on the board pins
pub type Display = Aip1628<RpOutput<'static>, RpOutput<'static>, RpOutput<'static>, Delay>;

/// Display driver shared by the blink and input tasks
///
/// Held for a whole render so frame sequences never interleave.
pub type SharedDisplay = Mutex<CriticalSectionRawMutex, Display>;

/// Digits and blink flag, written by the input task, read by the blink task
pub static DISPLAY_STATE: DisplayStateStore<CriticalSectionRawMutex> = DisplayStateStore::new();

/// Status lines for the operator, drained by the status TX task
pub static STATUS_CHANNEL: Channel<CriticalSectionRawMutex, Status, STATUS_CHANNEL_SIZE> =
    Channel::new();

/// Lines accepted since boot
pub static LINES_ACCEPTED: AtomicU32 = AtomicU32::new(0);

/// Lines rejected since boot
pub static LINES_REJECTED: AtomicU32 = AtomicU32::new(0);
