// These require an attached Griffin PowerMate and a human glancing at it is
// optional; run with `cargo test --features device-test`.
#![cfg(feature = "device-test")]

use std::thread;
use std::time::Duration;

use powermate::{enumerate, Error, LedConfig, Powermate};

fn knob() -> Powermate {
    enumerate().next().expect("no PowerMate attached")
}

#[test]
fn led_accepts_steady_and_pulse_writes() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = knob();

    dev.set_steady_led(255)?;
    thread::sleep(Duration::from_secs(1));

    dev.set_pulse(255)?;
    thread::sleep(Duration::from_secs(1));

    dev.set_config(LedConfig::steady(0))?;
    Ok(())
}

#[test]
fn untouched_knob_times_out_but_does_not_fail_polls() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = knob();

    // Drain whatever is buffered from previous handling.
    while dev.read_event(Some(Duration::ZERO))?.is_some() {}

    assert_eq!(dev.read_event(Some(Duration::ZERO))?, None);
    match dev.read_event(Some(Duration::from_millis(500))) {
        Err(Error::TimedOut) => Ok(()),
        other => panic!("expected a timeout on an untouched knob, got {:?}", other),
    }
}

#[test]
fn exclusive_grab_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let mut dev = knob();
    dev.grab()?;
    dev.ungrab()?;
    Ok(())
}
