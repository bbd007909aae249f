mod input;
mod latency;
mod network;
mod rendering;
mod session;

use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Display name registered with the server
    #[arg(short = 'n', long, default_value = "guest")]
    name: String,

    /// Window width
    #[arg(short = 'w', long, default_value = "800")]
    width: i32,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "400")]
    height: i32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);
    info!("Playing as: {}", args.name);
    info!("Controls: Up/Down arrows to move, Esc to quit");

    let mut client =
        network::Client::connect(&args.server, &args.name, args.width, args.height).await;

    client.run().await?;

    Ok(())
}
