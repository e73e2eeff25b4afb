// Similar to the evtest tool, narrowed to the PowerMate.

use std::process::exit;

fn main() {
    let mut args = std::env::args_os();
    let mut dev = if let Some(path) = args.nth(1) {
        match powermate::Powermate::open(&path) {
            Ok(dev) => dev,
            Err(err) => {
                eprintln!("{}: {}", path.to_string_lossy(), err);
                exit(1);
            }
        }
    } else {
        match powermate::enumerate().next() {
            Some(dev) => dev,
            None => {
                eprintln!("no PowerMate found under /dev/input");
                exit(1);
            }
        }
    };

    println!("{}", dev);
    println!("Events:");
    for event in dev.events() {
        match event {
            Ok(ev) => println!("{:?}", ev),
            Err(err) => {
                eprintln!("read failed: {}", err);
                exit(1);
            }
        }
    }
}
