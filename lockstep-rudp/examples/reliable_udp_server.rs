//! Reliable UDP server example: accept one connection and print everything
//! the peer sends until it disconnects.
//!
//! Run: cargo run -p lockstep-rudp --example reliable_udp_server

use lockstep_rudp::{RecvOutcome, Role, RudpSocket};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Reliable UDP Server");
    println!("====================");

    let mut server = RudpSocket::open(Role::Server, 7400)?;
    println!("Listening on: {}", server.local_addr()?);

    server.accept()?;
    println!("Peer connected: {}", server.peer_addr().unwrap());

    let mut buf = vec![0u8; 1024];
    loop {
        match server.recv(&mut buf)? {
            RecvOutcome::Data(n) => {
                println!("[{} bytes] {}", n, String::from_utf8_lossy(&buf[..n]));
            }
            RecvOutcome::SynRepeat => println!("(peer retransmitted SYN)"),
            RecvOutcome::EndOfStream => println!("(end of stream)"),
            RecvOutcome::PeerClosed => {
                println!("Peer disconnected");
                break;
            }
        }
    }

    server.close();
    Ok(())
}
