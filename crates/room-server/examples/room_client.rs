//! Interactive client: type chat lines, see the room's frames.
//!
//! ```bash
//! cargo run -p room-server
//! cargo run -p room-server --example room_client -- Ann
//! ```
//!
//! Plain lines are sent as chat (`/go north`, `/look`, `/ping hi`, ...).
//! `:hello`, `:join`, `:goodbye` and `:part` send the matching event.

use std::env;

use room_core::{EventKind, InboundEvent};
use room_protocol::encode_inbound;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let username = env::args().nth(1).unwrap_or_else(|| "Adventurer".to_string());
    let user_id = format!("demo:{}", username.to_lowercase());
    let addr = env::var("ROOM_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:9080".to_string());

    let stream = TcpStream::connect(&addr).await?;
    let (read_half, mut write_half) = stream.into_split();
    println!("Connected to {addr} as {username} ({user_id}). Type 'quit' to leave.");

    // Print everything the room sends.
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("<< {line}");
        }
        println!("connection closed");
    });

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = stdin.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }

        let event = match trimmed {
            ":hello" => InboundEvent::new(EventKind::Hello, &user_id, &username),
            ":join" => InboundEvent::new(EventKind::Join, &user_id, &username),
            ":goodbye" => InboundEvent::new(EventKind::Goodbye, &user_id, &username),
            ":part" => InboundEvent::new(EventKind::Part, &user_id, &username),
            chat => InboundEvent::chat(&user_id, &username, chat),
        };

        let frame = encode_inbound("demo-room", &event)?;
        write_half.write_all(frame.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
    }

    Ok(())
}
