use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::mem::{self, MaybeUninit};
use std::os::unix::{
    fs::OpenOptionsExt,
    io::{AsFd, AsRawFd, RawFd},
};
use std::path::Path;
use std::time::{Duration, Instant};

use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use crate::constants::{EventType, MiscCode};
use crate::error::Error;
use crate::event::Event;
use crate::led::LedConfig;
use crate::sys;

/// USB vendor id of Griffin Technology.
pub const VENDOR_ID_GRIFFIN: u16 = 0x077d;
/// Product id of the PowerMate proper.
pub const PRODUCT_ID_POWERMATE: u16 = 0x0410;
/// Product id of the older SoundKnob, driven by the same kernel driver.
pub const PRODUCT_ID_SOUNDKNOB: u16 = 0x04aa;

const EVENT_BATCH_SIZE: usize = 32;

fn ioctl_get_cstring(
    f: unsafe fn(RawFd, &mut [u8]) -> nix::Result<libc::c_int>,
    fd: RawFd,
) -> Option<Vec<u8>> {
    let mut buf = vec![0; 256];
    match unsafe { f(fd, buf.as_mut_slice()) } {
        Ok(len) if len as usize > buf.capacity() => {
            panic!("ioctl_get_cstring call overran the provided buffer!");
        }
        Ok(len) if len > 1 => {
            // The string ioctls report the number of bytes written, including
            // the trailing \0.
            buf.truncate(len as usize);
            assert_eq!(buf.pop(), Some(0));
            Some(buf)
        }
        _ => None,
    }
}

fn bytes_into_string_lossy(v: Vec<u8>) -> String {
    String::from_utf8(v).unwrap_or_else(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

/// An open session with one PowerMate device node.
///
/// The session owns the node's file handle exclusively and releases it when
/// dropped, on every exit path. There is no state beyond "open": if the device
/// disappears, the next read or write fails and the caller re-opens.
///
/// One read and one write may be in flight at a time per session; callers that
/// need concurrent access from several threads must serialize externally.
#[derive(Debug)]
pub struct Powermate {
    file: File,
    name: Option<String>,
    phys: Option<String>,
    id: libc::input_id,
    driver_version: (u8, u8, u8),
    event_buf: Vec<libc::input_event>,
    grabbed: bool,
}

impl Powermate {
    /// Opens a device, given its system path.
    ///
    /// Paths are typically something like `/dev/input/event0` or the stable
    /// `/dev/input/by-id/usb-Griffin_Technology_Inc._Griffin_PowerMate-event-if00`.
    ///
    /// The node is opened read/write so the LED can be driven, falling back to
    /// read-only event access. No identity check is performed beyond "this is
    /// an event device" — see [`is_powermate`](Self::is_powermate) and
    /// [`enumerate`] for identification.
    #[inline(always)]
    pub fn open(path: impl AsRef<Path>) -> Result<Powermate, Error> {
        Self::_open(path.as_ref())
    }

    fn _open(path: &Path) -> Result<Powermate, Error> {
        let mut options = OpenOptions::new();

        let file = options
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .or_else(|_| options.write(false).open(path))
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
                io::ErrorKind::PermissionDenied => Error::PermissionDenied(path.to_path_buf()),
                _ => Error::Io(err),
            })?;

        // Doubles as the "is this an event device at all" check: anything else
        // fails the ioctl with ENOTTY.
        let mut driver_version: i32 = 0;
        unsafe {
            sys::eviocgversion(file.as_raw_fd(), &mut driver_version)?;
        }
        let driver_version = (
            ((driver_version >> 16) & 0xff) as u8,
            ((driver_version >> 8) & 0xff) as u8,
            (driver_version & 0xff) as u8,
        );

        let id = unsafe {
            let mut id = MaybeUninit::uninit();
            sys::eviocgid(file.as_raw_fd(), id.as_mut_ptr())?;
            id.assume_init()
        };

        let name =
            ioctl_get_cstring(sys::eviocgname, file.as_raw_fd()).map(bytes_into_string_lossy);
        let phys =
            ioctl_get_cstring(sys::eviocgphys, file.as_raw_fd()).map(bytes_into_string_lossy);

        // Stamp events with CLOCK_MONOTONIC; timestamps must never step
        // backwards within a session.
        let clockid: libc::c_int = libc::CLOCK_MONOTONIC;
        unsafe {
            sys::eviocsclockid(file.as_raw_fd(), &clockid)?;
        }

        Ok(Powermate {
            file,
            name,
            phys,
            id,
            driver_version,
            event_buf: Vec::new(),
            grabbed: false,
        })
    }

    /// Returns the device's name as read from the kernel.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the device's physical location, e.g. the USB port path.
    pub fn physical_path(&self) -> Option<&str> {
        self.phys.as_deref()
    }

    /// Returns the bustype/vendor/product/version identifiers.
    pub fn input_id(&self) -> libc::input_id {
        self.id
    }

    /// Returns a tuple of the driver version containing major, minor, rev.
    pub fn driver_version(&self) -> (u8, u8, u8) {
        self.driver_version
    }

    /// Whether the opened node identifies as a Griffin PowerMate (or the older
    /// SoundKnob, which speaks the same protocol).
    pub fn is_powermate(&self) -> bool {
        self.id.vendor == VENDOR_ID_GRIFFIN
            && matches!(
                self.id.product,
                PRODUCT_ID_POWERMATE | PRODUCT_ID_SOUNDKNOB
            )
    }

    /// Grabs the device for exclusive access, so no other client (the desktop
    /// session included) sees its events.
    pub fn grab(&mut self) -> Result<(), Error> {
        if !self.grabbed {
            unsafe {
                sys::eviocgrab(self.as_raw_fd(), 1)?;
            }
            self.grabbed = true;
        }
        Ok(())
    }

    /// Releases an exclusive grab.
    pub fn ungrab(&mut self) -> Result<(), Error> {
        if self.grabbed {
            unsafe {
                sys::eviocgrab(self.as_raw_fd(), 0)?;
            }
            self.grabbed = false;
        }
        Ok(())
    }

    /// Reads the next knob event: a rotation delta or a button edge.
    ///
    /// The timeout argument selects among three modes:
    ///
    /// - `None` blocks until a qualifying event arrives and returns
    ///   `Ok(Some(event))`; it never times out.
    /// - `Some(Duration::ZERO)` drains only already-buffered input without
    ///   blocking and returns `Ok(None)` when nothing qualifying is buffered.
    /// - `Some(t)` waits up to `t` of total wall time counted from the start
    ///   of the call and fails with [`Error::TimedOut`] once the budget is
    ///   spent — a distinct outcome from the poll mode's `Ok(None)`.
    ///
    /// Raw event kinds other than relative rotation and key are skipped
    /// silently in every mode. Skipped events do not satisfy the read, but
    /// the time spent waiting for them still counts against the budget.
    pub fn read_event(&mut self, timeout: Option<Duration>) -> Result<Option<Event>, Error> {
        let started = Instant::now();

        if let Some(ev) = self.pop_qualifying() {
            return Ok(Some(ev));
        }
        self.fill_events()?;
        if let Some(ev) = self.pop_qualifying() {
            return Ok(Some(ev));
        }

        match timeout {
            Some(t) if t.is_zero() => Ok(None),
            timeout => {
                let deadline = timeout.map(|t| started + t);
                loop {
                    let remaining = match deadline {
                        Some(deadline) => {
                            let left = deadline.saturating_duration_since(Instant::now());
                            if left.is_zero() {
                                return Err(Error::TimedOut);
                            }
                            Some(left)
                        }
                        None => None,
                    };
                    self.wait_readable(remaining)?;
                    self.fill_events()?;
                    if let Some(ev) = self.pop_qualifying() {
                        return Ok(Some(ev));
                    }
                }
            }
        }
    }

    /// Returns an iterator producing events forever, blocking on each `next()`
    /// until the knob is rotated or pressed.
    pub fn events(&mut self) -> Events<'_> {
        Events(self)
    }

    /// Writes a complete LED configuration to the device.
    ///
    /// Out-of-range fields are clamped by [`LedConfig::encode`]. The write is
    /// fire-and-forget: success means the kernel accepted it, and the LED
    /// changes asynchronously. The firmware keeps the configuration until the
    /// next write or a device reset.
    pub fn set_config(&mut self, config: LedConfig) -> Result<(), Error> {
        let raw = libc::input_event {
            time: libc::timeval {
                tv_sec: 0,
                tv_usec: 0,
            },
            type_: EventType::MISC.0,
            code: MiscCode::MSC_PULSELED.0,
            value: config.encode() as i32,
        };
        let bytes = unsafe { crate::cast_to_bytes(&raw) };
        self.file.write_all(bytes)?;
        Ok(())
    }

    /// Sets the LED to a steady (non-pulsing) glow at the given brightness.
    pub fn set_steady_led(&mut self, brightness: u16) -> Result<(), Error> {
        self.set_config(LedConfig::steady(brightness))
    }

    /// Sets the LED pulsing at the given speed, through sleep and wake.
    /// Brightness is irrelevant while pulsing.
    pub fn set_pulse(&mut self, speed: u16) -> Result<(), Error> {
        self.set_config(LedConfig::pulse(speed))
    }

    /// Converts the session into an asynchronous event stream.
    #[cfg(feature = "tokio")]
    #[inline]
    pub fn into_event_stream(self) -> Result<crate::EventStream, Error> {
        Ok(crate::EventStream::new(self)?)
    }

    /// Pops buffered raw events until one classifies as a knob event.
    pub(crate) fn pop_qualifying(&mut self) -> Option<Event> {
        while !self.event_buf.is_empty() {
            let raw = self.event_buf.remove(0);
            if let Some(ev) = Event::from_raw(&raw) {
                return Some(ev);
            }
        }
        None
    }

    /// One nonblocking read of raw events into the buffer. Returns the number
    /// of events read; `WouldBlock` when the kernel buffer is empty.
    pub(crate) fn fill_events_once(&mut self) -> io::Result<usize> {
        let fd = self.as_raw_fd();
        self.event_buf.reserve(EVENT_BATCH_SIZE);

        let spare_capacity = self.event_buf.spare_capacity_mut();
        let spare_capacity_size = mem::size_of_val(spare_capacity);

        // use libc::read instead of nix::unistd::read b/c we need to pass an
        // uninitialized buf
        let res = unsafe { libc::read(fd, spare_capacity.as_mut_ptr() as _, spare_capacity_size) };
        let bytes_read = nix::errno::Errno::result(res).map_err(io::Error::from)?;
        let num_read = bytes_read as usize / mem::size_of::<libc::input_event>();
        unsafe {
            let len = self.event_buf.len();
            self.event_buf.set_len(len + num_read);
        }
        Ok(num_read)
    }

    /// Drains everything currently buffered by the kernel.
    fn fill_events(&mut self) -> Result<(), Error> {
        loop {
            match self.fill_events_once() {
                Ok(0) => break,
                Ok(_) => continue,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Waits for the fd to become readable, at most `timeout` (forever when
    /// `None`). Long timeouts are sliced to `poll(2)`'s range; callers loop on
    /// their own deadline.
    fn wait_readable(&self, timeout: Option<Duration>) -> Result<(), Error> {
        let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];
        let timeout = match timeout {
            Some(t) => PollTimeout::from(u16::try_from(t.as_millis()).unwrap_or(u16::MAX)),
            None => PollTimeout::NONE,
        };
        poll(&mut fds, timeout)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn from_file(file: File) -> Powermate {
        Powermate {
            file,
            name: None,
            phys: None,
            id: libc::input_id {
                bustype: 0,
                vendor: 0,
                product: 0,
                version: 0,
            },
            driver_version: (0, 0, 0),
            event_buf: Vec::new(),
            grabbed: false,
        }
    }
}

impl AsRawFd for Powermate {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl fmt::Display for Powermate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}:", self.name.as_deref().unwrap_or("Unnamed device"))?;
        writeln!(
            f,
            "  Driver version: {}.{}.{}",
            self.driver_version.0, self.driver_version.1, self.driver_version.2
        )?;
        if let Some(ref phys) = self.phys {
            writeln!(f, "  Physical address: {:?}", phys)?;
        }
        writeln!(f, "  Vendor: {:#x}", self.id.vendor)?;
        writeln!(f, "  Product: {:#x}", self.id.product)?;
        Ok(())
    }
}

/// Blocking iterator over classified knob events, created by
/// [`Powermate::events`]. Lazy and endless: each `next()` suspends the calling
/// thread until the device produces a qualifying event.
pub struct Events<'a>(&'a mut Powermate);

impl Iterator for Events<'_> {
    type Item = Result<Event, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.0.read_event(None) {
            Ok(Some(ev)) => Some(Ok(ev)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

/// Crawls `/dev/input` for PowerMate devices.
///
/// Nodes that fail to open or identify as some other hardware are skipped
/// rather than bubbling errors up; an empty iterator means no knob was usable.
pub fn enumerate() -> EnumerateDevices {
    EnumerateDevices {
        readdir: std::fs::read_dir("/dev/input").ok(),
    }
}

/// Iterator returned by [`enumerate`].
pub struct EnumerateDevices {
    readdir: Option<std::fs::ReadDir>,
}

impl Iterator for EnumerateDevices {
    type Item = Powermate;
    fn next(&mut self) -> Option<Powermate> {
        use std::os::unix::ffi::OsStrExt;
        let readdir = self.readdir.as_mut()?;
        loop {
            if let Ok(entry) = readdir.next()? {
                let path = entry.path();
                let fname = path.file_name().unwrap();
                if fname.as_bytes().starts_with(b"event") {
                    if let Ok(dev) = Powermate::open(&path) {
                        if dev.is_powermate() {
                            return Some(dev);
                        }
                    }
                }
            }
        }
    }
}
