// Rotate the knob to adjust the pulse speed; hold it down and rotate to
// adjust steady brightness instead.

use powermate::{Event, LedConfig, Powermate, MAX_BRIGHTNESS, MAX_PULSE_SPEED};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = match std::env::args_os().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: pulse_and_brightness <input device>");
            std::process::exit(1);
        }
    };
    let mut knob = Powermate::open(path)?;

    let mut speed: i32 = 255;
    let mut brightness: i32 = 255;
    let mut speed_mode = true;

    println!("- Rotate the knob to test different pulse speeds.");
    println!("- Rotate the knob while it's pushed to test different brightness levels.");

    loop {
        match knob.read_event(None)? {
            Some(Event::Button { pressed, .. }) => {
                speed_mode = !pressed;
                if speed_mode {
                    println!("Speed mode activated.");
                } else {
                    println!("Brightness mode activated.");
                }
            }
            Some(Event::Rotate { delta, .. }) => {
                if speed_mode {
                    speed = (speed + delta).clamp(0, i32::from(MAX_PULSE_SPEED));
                    println!("Setting pulse speed {}", speed);
                    knob.set_config(LedConfig {
                        brightness: brightness as u16,
                        pulse_speed: speed as u16,
                        pulse_table: 0,
                        pulse_on_sleep: true,
                        pulse_on_wake: true,
                    })?;
                } else {
                    brightness = (brightness + delta).clamp(0, i32::from(MAX_BRIGHTNESS));
                    println!("Setting brightness level {}", brightness);
                    knob.set_config(LedConfig {
                        brightness: brightness as u16,
                        pulse_speed: speed as u16,
                        pulse_table: 0,
                        pulse_on_sleep: false,
                        pulse_on_wake: false,
                    })?;
                }
            }
            None => {}
        }
    }
}
