// Async variant of the monitor demo.

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args_os()
        .nth(1)
        .ok_or("usage: monitor_tokio <input device>")?;
    let dev = powermate::Powermate::open(path)?;
    println!("{}", dev);
    println!("Events:");

    let mut stream = dev.into_event_stream()?;
    loop {
        println!("{:?}", stream.next_event().await?);
    }
}
