use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures_core::Stream;
use tokio::io::unix::AsyncFd;

use crate::{Error, Event, Powermate};

/// An asynchronous stream of classified knob events.
///
/// Created by [`Powermate::into_event_stream`]. Use
/// [`stream.next_event().await`](Self::next_event), or the
/// [`futures::Stream`](Stream) implementation when a stream is needed; the
/// lower-level [`poll_event`](Self::poll_event) is available for use inside a
/// `Future::poll` impl.
///
/// There is no built-in bounded wait: wrap `next_event` in
/// `tokio::time::timeout` (or any external deadline). Cancelling the future is
/// safe — raw events already read stay buffered in the session and the device
/// handle is not leaked.
pub struct EventStream {
    device: AsyncFd<Powermate>,
}
impl Unpin for EventStream {}

impl EventStream {
    pub(crate) fn new(device: Powermate) -> io::Result<Self> {
        let device = AsyncFd::new(device)?;
        Ok(Self { device })
    }

    /// Returns a reference to the underlying device.
    pub fn device(&self) -> &Powermate {
        self.device.get_ref()
    }

    /// Returns a mutable reference to the underlying device.
    pub fn device_mut(&mut self) -> &mut Powermate {
        self.device.get_mut()
    }

    /// Waits for the next qualifying event. Any error is likely fatal to the
    /// session, i.e. subsequent calls will likely error as well.
    pub async fn next_event(&mut self) -> Result<Event, Error> {
        std::future::poll_fn(|cx| self.poll_event(cx)).await
    }

    /// A lower-level function for directly polling this stream.
    pub fn poll_event(&mut self, cx: &mut Context<'_>) -> Poll<Result<Event, Error>> {
        loop {
            if let Some(ev) = self.device.get_mut().pop_qualifying() {
                return Poll::Ready(Ok(ev));
            }

            let mut guard = ready!(self.device.poll_read_ready_mut(cx))?;
            match guard.try_io(|device| device.get_mut().fill_events_once()) {
                Ok(res) => {
                    if res? == 0 {
                        return Poll::Ready(Err(Error::Io(io::ErrorKind::UnexpectedEof.into())));
                    }
                }
                Err(_would_block) => continue,
            }
        }
    }
}

impl Stream for EventStream {
    type Item = Result<Event, Error>;
    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_event(cx).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EventType, KeyCode, RelativeAxisCode};
    use nix::fcntl::OFlag;
    use std::fs::File;
    use std::io::Write as _;
    use std::time::Duration;

    fn pipe_stream() -> (EventStream, File) {
        let (read, write) = nix::unistd::pipe2(OFlag::O_NONBLOCK).unwrap();
        let stream = EventStream::new(Powermate::from_file(File::from(read))).unwrap();
        (stream, File::from(write))
    }

    fn feed(writer: &mut File, type_: EventType, code: u16, value: i32) {
        let raw = libc::input_event {
            time: libc::timeval {
                tv_sec: 0,
                tv_usec: 0,
            },
            type_: type_.0,
            code,
            value,
        };
        writer
            .write_all(unsafe { crate::cast_to_bytes(&raw) })
            .unwrap();
    }

    #[tokio::test]
    async fn stream_yields_classified_events() {
        let (mut stream, mut writer) = pipe_stream();
        feed(&mut writer, EventType::RELATIVE, RelativeAxisCode::REL_DIAL.0, -2);

        let ev = tokio::time::timeout(Duration::from_secs(5), stream.next_event())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(ev, Event::Rotate { delta: -2, .. }), "got {:?}", ev);
    }

    #[tokio::test]
    async fn external_deadline_cancels_without_losing_the_session() {
        let (mut stream, mut writer) = pipe_stream();

        let res = tokio::time::timeout(Duration::from_millis(50), stream.next_event()).await;
        assert!(res.is_err(), "empty stream should hit the deadline");

        feed(&mut writer, EventType::KEY, KeyCode::BTN_0.0, 1);
        let ev = tokio::time::timeout(Duration::from_secs(5), stream.next_event())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(ev, Event::Button { pressed: true, .. }), "got {:?}", ev);
    }
}
