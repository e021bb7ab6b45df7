//! Windowed telemetry metrics: samples, the shared accumulation window, and
//! the periodic aggregator that drains it.
mod aggregator;
mod clock;
mod summary;
mod types;
mod window;


pub use aggregator::{DEFAULT_TICK_INTERVAL, run_window_aggregator, setup_window_aggregator};
#[cfg(test)]
pub(crate) use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use types::{Sample, Summary};
pub use window::AccumulationWindow;
