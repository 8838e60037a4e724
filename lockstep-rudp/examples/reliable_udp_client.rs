//! Reliable UDP client example: connect, send a few messages, disconnect.
//!
//! Run: cargo run -p lockstep-rudp --example reliable_udp_client
//! (start the server example first)

use lockstep_rudp::{Role, RudpSocket};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Reliable UDP Client");
    println!("====================");

    let mut client = RudpSocket::open(Role::Client, 0)?;
    client.connect("127.0.0.1:7400")?;
    println!("Connected to: {}", client.peer_addr().unwrap());

    for msg in ["hello", "from", "lockstep"] {
        let sent = client.send(msg.as_bytes())?;
        println!("sent {} bytes", sent);
    }

    client.send_end_of_stream()?;
    client.disconnect()?;
    println!("Disconnected");

    client.close();
    Ok(())
}
