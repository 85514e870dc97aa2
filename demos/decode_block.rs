//! Decode a MsgBlock file and print its messages
//!
//! ```text
//! cargo run --example decode_block -- block.xml
//! RUST_LOG=msgblock=debug cargo run --example decode_block -- block.xml
//! ```

use msgblock::protocol::metrics;
use msgblock::MessageBlockDecoder;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: decode_block <msgblock.xml>")?;
    let bytes = std::fs::read(&path)?;

    let block = MessageBlockDecoder::new().decode(&bytes, 0, bytes.len(), &path)?;

    for msg in &block {
        println!(
            "{:<10} flags=0x{:04x} seq={:<6} bytes={}",
            msg.platform_id(),
            msg.flags(),
            msg.body()
                .sequence_num
                .map_or_else(|| "-".to_owned(), |n| n.to_string()),
            msg.data().len()
        );
    }

    let stats = metrics::snapshot();
    println!(
        "\n{} message(s) decoded, {} skipped",
        stats.messages_accepted, stats.messages_skipped
    );

    Ok(())
}
