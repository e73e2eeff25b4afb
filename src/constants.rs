//! Kernel input-layer codes spoken by the PowerMate.
//!
//! These mirror `include/uapi/linux/input-event-codes.h` and are a fixed
//! external contract; only the codes the device actually emits or accepts are
//! declared here.

use std::fmt;

/// Event type, the `type` field of a raw `input_event` (`EV_*`).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventType(pub u16);

impl EventType {
    /// Packet separator emitted by the kernel after each event batch.
    pub const SYNCHRONIZATION: EventType = EventType(0x00);
    /// A key or button changed state.
    pub const KEY: EventType = EventType(0x01);
    /// Movement on a relative axis. The knob reports rotation this way.
    pub const RELATIVE: EventType = EventType(0x02);
    /// Movement on an absolute axis. Not produced by the PowerMate.
    pub const ABSOLUTE: EventType = EventType(0x03);
    /// Miscellaneous events. Writing one carries the LED control word.
    pub const MISC: EventType = EventType(0x04);
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EventType::SYNCHRONIZATION => f.write_str("SYNCHRONIZATION"),
            EventType::KEY => f.write_str("KEY"),
            EventType::RELATIVE => f.write_str("RELATIVE"),
            EventType::ABSOLUTE => f.write_str("ABSOLUTE"),
            EventType::MISC => f.write_str("MISC"),
            EventType(n) => write!(f, "EventType({})", n),
        }
    }
}

/// Relative axis code (`REL_*`).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativeAxisCode(pub u16);

impl RelativeAxisCode {
    /// The rotation axis of a jog dial or knob.
    pub const REL_DIAL: RelativeAxisCode = RelativeAxisCode(0x07);
}

impl fmt::Debug for RelativeAxisCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RelativeAxisCode::REL_DIAL => f.write_str("REL_DIAL"),
            RelativeAxisCode(n) => write!(f, "RelativeAxisCode({})", n),
        }
    }
}

/// Key/button code (`KEY_*`/`BTN_*`).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// The knob's integrated push button.
    pub const BTN_0: KeyCode = KeyCode(0x100);
}

impl fmt::Debug for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            KeyCode::BTN_0 => f.write_str("BTN_0"),
            KeyCode(n) => write!(f, "KeyCode({})", n),
        }
    }
}

/// Miscellaneous event code (`MSC_*`).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MiscCode(pub u16);

impl MiscCode {
    /// Carries the packed LED control word; only the PowerMate driver uses it.
    pub const MSC_PULSELED: MiscCode = MiscCode(0x01);
}

impl fmt::Debug for MiscCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MiscCode::MSC_PULSELED => f.write_str("MSC_PULSELED"),
            MiscCode(n) => write!(f, "MiscCode({})", n),
        }
    }
}

/// Synchronization code (`SYN_*`).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SynchronizationCode(pub u16);

impl SynchronizationCode {
    /// Terminates a packet of events from the device.
    pub const SYN_REPORT: SynchronizationCode = SynchronizationCode(0x00);
}

impl fmt::Debug for SynchronizationCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SynchronizationCode::SYN_REPORT => f.write_str("SYN_REPORT"),
            SynchronizationCode(n) => write!(f, "SynchronizationCode({})", n),
        }
    }
}
