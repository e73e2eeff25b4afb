//! Linux driver for the Griffin PowerMate USB knob.
//!
//! The PowerMate is a rotary knob with an integrated push button and a blue
//! LED that can glow steadily or pulse. The kernel's `powermate` driver
//! exposes it as an evdev node: rotation arrives as relative-axis events,
//! presses as key events, and the LED is driven by writing a single packed
//! control word back to the node. This crate wraps one such node in a
//! [`Powermate`] session with a blocking/polling/bounded event read and
//! fire-and-forget LED configuration writes.
//!
//! ```no_run
//! # fn main() -> Result<(), powermate::Error> {
//! use powermate::{Event, Powermate};
//!
//! let mut knob = Powermate::open(
//!     "/dev/input/by-id/usb-Griffin_Technology_Inc._Griffin_PowerMate-event-if00",
//! )?;
//! knob.set_steady_led(128)?;
//! for event in knob.events() {
//!     match event? {
//!         Event::Rotate { delta, .. } => println!("rotated {delta} steps"),
//!         Event::Button { pressed, .. } => println!("button pressed: {pressed}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Event timestamps come from the kernel's monotonic clock, so the spacing
//! between two events (say, for double-click detection) is just a `Duration`
//! subtraction. Reads are single-threaded blocking I/O; with the `tokio`
//! feature, [`Powermate::into_event_stream`] yields an async [`EventStream`]
//! instead.

#![cfg(any(target_os = "linux", target_os = "android"))]

mod constants;
mod device;
mod error;
mod event;
mod led;
mod sys;

#[cfg(feature = "tokio")]
mod tokio_stream;

pub use crate::constants::{EventType, KeyCode, MiscCode, RelativeAxisCode, SynchronizationCode};
pub use crate::device::{
    enumerate, EnumerateDevices, Events, Powermate, PRODUCT_ID_POWERMATE, PRODUCT_ID_SOUNDKNOB,
    VENDOR_ID_GRIFFIN,
};
pub use crate::error::Error;
pub use crate::event::Event;
pub use crate::led::{LedConfig, MAX_BRIGHTNESS, MAX_PULSE_SPEED, MAX_PULSE_TABLE};
#[cfg(feature = "tokio")]
pub use crate::tokio_stream::EventStream;

/// SAFETY: `T` must not contain any uninitialized bytes (padding included).
pub(crate) unsafe fn cast_to_bytes<T: ?Sized>(mem: &T) -> &[u8] {
    std::slice::from_raw_parts(mem as *const T as *const u8, std::mem::size_of_val(mem))
}
