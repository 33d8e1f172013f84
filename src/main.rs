//! DaVinci wallet, interactive terminal front-end.
//!
//! # Architecture Overview
//!
//! ```text
//!   stdin commands ──▶ WalletView ──▶ ProviderSession ──▶ LocalSigningAuthority ──▶ RPC
//!                         │  │
//!                         │  └──▶ BalanceTracker ──▶ RpcClient ──▶ RPC
//!                         └─────▶ ChainPoller (timer) ──▶ RpcClient ──▶ RPC
//!                                        │
//!   stdout  ◀── notifications ◀──────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use davinci_wallet::config::{load_config, WalletConfig};
use davinci_wallet::observability::{logging, metrics};
use davinci_wallet::wallet::{CredentialField, MemoryClipboard, Notification};
use davinci_wallet::{LocalSigningAuthority, RpcClient, WalletView};

#[derive(Parser)]
#[command(name = "davinci-wallet")]
#[command(about = "Generate Ethereum credentials and send simple transfers", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

const HELP: &str = "\
commands:
  generate                  create a new address, mnemonic and private key
  import                    use the generated key as the signing account
  connect                   connect to the signing account
  balance                   refresh the connected balance
  send <to> <amount>        send ether to an address
  receive                   show the receive URI
  copy <address|mnemonic|key>
  status                    show block height and session
  quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WalletConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("davinci-wallet v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(error = %e, "Failed to parse metrics address"),
        }
    }

    let rpc = Arc::new(RpcClient::connect(&config.rpc).await?);
    let authority = Arc::new(LocalSigningAuthority::from_env(&config)?);
    let clipboard = Arc::new(MemoryClipboard::default());
    let (mut view, mut notifications) =
        WalletView::new(config, rpc, authority.clone(), clipboard);

    view.activate()?;
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !run_command(&mut view, &authority, line.trim()).await {
                    break;
                }
            }
            Some(notification) = notifications.recv() => render(&notification),
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    view.deactivate();
    while let Ok(notification) = notifications.try_recv() {
        render(&notification);
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Execute one command line. Returns false to quit.
///
/// Outcomes are rendered from the notification channel, so errors are not
/// printed here.
async fn run_command(view: &mut WalletView, authority: &LocalSigningAuthority, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => {}
        (Some("generate"), None, None) => {
            if let Ok(credential) = view.generate_credential() {
                println!("address:     {}", credential.address());
                println!("mnemonic:    {}", credential.mnemonic_phrase());
                println!("private key: {}", credential.private_key_hex());
                println!("Keep the mnemonic and private key secret. They are not saved anywhere.");
            }
        }
        (Some("import"), None, None) => match view.credential() {
            Some(credential) => match authority.import(credential) {
                Ok(()) => println!("Generated key is now the signing account; run `connect`."),
                Err(e) => println!("Error: {}", e),
            },
            None => println!("Error: no credential has been generated"),
        },
        (Some("connect"), None, None) => {
            let _ = view.connect().await;
        }
        (Some("balance"), None, None) => {
            let _ = view.refresh_balance().await;
        }
        (Some("send"), Some(to), Some(amount)) => {
            println!("Waiting for confirmation...");
            let _ = view.send_transfer(to, amount).await;
        }
        (Some("receive"), None, None) => {
            if let Ok(uri) = view.receive_uri() {
                println!("{}", uri);
            }
        }
        (Some("copy"), Some(field), None) => match field.parse::<CredentialField>() {
            Ok(field) => {
                let _ = view.copy(field);
            }
            Err(e) => println!("Error: {}", e),
        },
        (Some("status"), None, None) => {
            let status = view.chain_status();
            let height = status
                .latest_block_height
                .map(|h| h.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!(
                "block: {} ({})",
                height,
                if status.is_syncing { "syncing" } else { "idle" }
            );
            match (view.connected_address(), view.balance()) {
                (Some(address), Some(balance)) => println!("connected: {} ({} ETH)", address, balance.amount),
                (Some(address), None) => println!("connected: {}", address),
                (None, _) => println!("not connected"),
            }
        }
        (Some("quit" | "exit"), None, None) => return false,
        _ => println!("{}", HELP),
    }
    true
}

fn render(notification: &Notification) {
    match notification {
        // Height changes every tick; `status` shows it on demand.
        Notification::BlockHeight { .. } => {}
        other => println!("{}", other),
    }
}
