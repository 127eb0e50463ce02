//! Poll gaze data from a live ETVR source and print it to stdout.
//!
//! Usage: cargo run --example watch [port]
//! Press Ctrl+C to stop.

use etvr::{EtvrTracker, EyeTracker};
use std::net::Ipv4Addr;
use std::time::Duration;

fn main() {
    env_logger::init();

    let port = std::env::args()
        .nth(1)
        .and_then(|p| p.parse().ok())
        .unwrap_or(etvr::protocol::DEFAULT_PORT);

    let mut tracker = match EtvrTracker::bind_to((Ipv4Addr::UNSPECIFIED, port)) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to bind port {}: {}", port, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = tracker.start() {
        eprintln!("Failed to start listener: {}", e);
        std::process::exit(1);
    }

    println!("Listening on {} (Ctrl+C to stop)...", tracker.local_addr());

    let mut was_available = false;
    loop {
        match tracker.gaze() {
            Some(gaze) => {
                if !was_available {
                    println!("--- tracking acquired ---");
                }
                was_available = true;
                println!("gaze=[{:+.4}, {:+.4}, {:+.4}]", gaze.x, gaze.y, gaze.z);
            }
            None => {
                if was_available {
                    println!("--- tracking lost ---");
                }
                was_available = false;
            }
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}
