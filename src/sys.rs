//! evdev ioctls used by the session.

use libc::input_id;
use nix::{ioctl_read, ioctl_read_buf, ioctl_write_int, ioctl_write_ptr};

ioctl_read!(eviocgversion, b'E', 0x01, ::libc::c_int);
ioctl_read!(eviocgid, b'E', 0x02, /*struct*/ input_id);

ioctl_read_buf!(eviocgname, b'E', 0x06, u8);
ioctl_read_buf!(eviocgphys, b'E', 0x07, u8);

ioctl_write_int!(eviocgrab, b'E', 0x90);

// EVIOCSCLOCKID is _IOW('E', 0xa0, int) and the kernel reads the clock id
// through the pointer, so this must be write_ptr rather than write_int.
ioctl_write_ptr!(eviocsclockid, b'E', 0xa0, ::libc::c_int);
