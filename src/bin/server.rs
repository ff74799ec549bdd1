//! Campus chat server binary.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin campus-chat-server
//! ```

use clap::Parser;

use campus_chat::{ServerConfig, logger::setup_logger};

#[derive(Debug, Parser)]
#[command(name = "campus-chat-server", about = "Real-time campus chat service")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Default tracing filter (overridden by RUST_LOG)
    #[arg(long, default_value = "campus_chat=debug,tower_http=debug")]
    log: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log);

    // Run the server
    let config = ServerConfig::new(args.host, args.port);
    if let Err(e) = campus_chat::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
