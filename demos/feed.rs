//! Synthetic ETVR source: sweeps a circular gaze pattern over OSC/UDP.
//! Pair with the `watch` example to try the crate without headset hardware.
//!
//! Usage: cargo run --example feed [port]
//! Press Ctrl+C to stop.

use etvr::protocol::{
    self, ADDR_LEFT_HORIZONTAL, ADDR_RIGHT_HORIZONTAL, ADDR_VERTICAL,
};
use std::net::{Ipv4Addr, UdpSocket};
use std::time::Duration;

fn main() {
    env_logger::init();

    let port = std::env::args()
        .nth(1)
        .and_then(|p| p.parse().ok())
        .unwrap_or(protocol::DEFAULT_PORT);
    let target = (Ipv4Addr::LOCALHOST, port);

    let socket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open send socket: {}", e);
            std::process::exit(1);
        }
    };

    println!("Feeding gaze sweep to 127.0.0.1:{} (Ctrl+C to stop)...", port);

    let mut t = 0.0f32;
    loop {
        let horizontal = t.cos() * 0.8;
        let vertical = t.sin() * 0.8;

        for (address, value) in [
            (ADDR_LEFT_HORIZONTAL, horizontal),
            (ADDR_RIGHT_HORIZONTAL, horizontal),
            (ADDR_VERTICAL, vertical),
        ] {
            let msg = protocol::encode_float_message(address, value);
            if let Err(e) = socket.send_to(&msg, target) {
                eprintln!("Send failed: {}", e);
                std::process::exit(1);
            }
        }

        t += 0.05;
        std::thread::sleep(Duration::from_millis(10));
    }
}
