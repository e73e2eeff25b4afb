use std::time::Duration;

use crate::constants::EventType;

/// A classified PowerMate input event.
///
/// The knob produces exactly two kinds of input: rotation and button edges.
/// Every event carries the kernel's monotonic timestamp for the instant the
/// hardware reported it, so callers can measure inter-event spacing (e.g. for
/// double-click detection) without reading the clock themselves. Timestamps
/// are non-decreasing within a session; re-opening the device restarts the
/// stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// The knob was turned `delta` detents; negative is counter-clockwise.
    ///
    /// `delta` is usually ±1 but can reach ±7 under fast spins, and is never
    /// zero.
    Rotate { delta: i32, timestamp: Duration },
    /// The knob was pressed (`pressed == true`) or released.
    Button { pressed: bool, timestamp: Duration },
}

impl Event {
    /// Returns the kernel timestamp carried by the event.
    pub fn timestamp(&self) -> Duration {
        match *self {
            Event::Rotate { timestamp, .. } | Event::Button { timestamp, .. } => timestamp,
        }
    }

    /// Classifies a raw `input_event`, or returns `None` for the kinds the
    /// driver skips (synchronization markers, misc events, anything else).
    pub(crate) fn from_raw(raw: &libc::input_event) -> Option<Event> {
        let timestamp = timeval_to_duration(&raw.time);
        match EventType(raw.type_) {
            EventType::RELATIVE => Some(Event::Rotate {
                delta: raw.value,
                timestamp,
            }),
            EventType::KEY => Some(Event::Button {
                pressed: raw.value != 0,
                timestamp,
            }),
            _ => None,
        }
    }
}

fn timeval_to_duration(tv: &libc::timeval) -> Duration {
    let secs = u64::try_from(tv.tv_sec).unwrap_or(0);
    let micros = u32::try_from(tv.tv_usec).unwrap_or(0);
    Duration::new(secs, micros * 1_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{KeyCode, MiscCode, RelativeAxisCode, SynchronizationCode};

    fn raw_event(type_: EventType, code: u16, value: i32, micros: u64) -> libc::input_event {
        libc::input_event {
            time: libc::timeval {
                tv_sec: (micros / 1_000_000) as libc::time_t,
                tv_usec: (micros % 1_000_000) as libc::suseconds_t,
            },
            type_: type_.0,
            code,
            value,
        }
    }

    #[test]
    fn relative_events_classify_as_rotation() {
        let raw = raw_event(EventType::RELATIVE, RelativeAxisCode::REL_DIAL.0, -3, 1_500_000);
        assert_eq!(
            Event::from_raw(&raw),
            Some(Event::Rotate {
                delta: -3,
                timestamp: Duration::from_micros(1_500_000),
            })
        );
    }

    #[test]
    fn key_events_classify_as_button_edges() {
        let down = raw_event(EventType::KEY, KeyCode::BTN_0.0, 1, 10);
        let up = raw_event(EventType::KEY, KeyCode::BTN_0.0, 0, 20);
        assert_eq!(
            Event::from_raw(&down),
            Some(Event::Button {
                pressed: true,
                timestamp: Duration::from_micros(10),
            })
        );
        assert_eq!(
            Event::from_raw(&up),
            Some(Event::Button {
                pressed: false,
                timestamp: Duration::from_micros(20),
            })
        );
    }

    #[test]
    fn non_qualifying_kinds_are_skipped() {
        let syn = raw_event(
            EventType::SYNCHRONIZATION,
            SynchronizationCode::SYN_REPORT.0,
            0,
            0,
        );
        let misc = raw_event(EventType::MISC, MiscCode::MSC_PULSELED.0, 0x1ff00, 0);
        let abs = raw_event(EventType::ABSOLUTE, 0, 42, 0);
        assert_eq!(Event::from_raw(&syn), None);
        assert_eq!(Event::from_raw(&misc), None);
        assert_eq!(Event::from_raw(&abs), None);
    }

    #[test]
    fn timestamps_come_from_the_kernel_timeval() {
        let raw = raw_event(EventType::KEY, KeyCode::BTN_0.0, 1, 12_345_678);
        let ev = Event::from_raw(&raw).unwrap();
        assert_eq!(ev.timestamp(), Duration::new(12, 345_678_000));
    }
}
