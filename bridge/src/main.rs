use bridge::action::Action;
use bridge::client::BridgeClient;
use bridge::format::format_reply;
use clap::Parser;
use log::info;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Controller address
    #[arg(short = 's', long, default_value = "127.0.0.1:3656")]
    server: String,

    /// Server name to log in as
    #[arg(short = 'n', long)]
    name: String,

    /// Player the request is issued for
    #[arg(short = 'p', long, default_value = protocol::CONSOLE_PLAYER)]
    player: String,

    /// How long to wait for each reply
    #[arg(short = 't', long, default_value = "2000")]
    timeout_ms: u64,

    #[command(subcommand)]
    action: Action,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let client = BridgeClient::connect(
        &args.server,
        args.name.as_str(),
        Duration::from_millis(args.timeout_ms),
    )
    .await?;
    client.login().await?;

    let Some(packet) = args.action.to_packet(&args.player) else {
        println!("Logged in as {}", client.name());
        return Ok(());
    };

    match args.action.expected_reply() {
        Some(wanted) => {
            let reply = client.request(&packet, wanted).await?;
            println!("{}", format_reply(&reply));
        }
        None => {
            client.send(&packet).await?;
            info!("Sent {:?}", packet.kind());
        }
    }

    Ok(())
}
