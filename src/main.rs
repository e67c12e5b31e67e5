use alloy::{
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::ProviderBuilder,
    signers::local::PrivateKeySigner,
};
use clap::{ArgGroup, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use lotty_client::{
    LottyClient,
    config::{Network, format_stable},
    gateway::SignerGateway,
    reader::RpcChainReader,
    refresh::Refresher,
    snapshot::ReadModel,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use url::Url;

const PRIVATE_KEY_ENV: &str = "LOTTY_PRIVATE_KEY";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Operator CLI for the no-loss lottery savings client",
    group(
        ArgGroup::new("network")
            .args(["testnet", "mainnet"])
            .required(true)
    )
)]
struct Args {
    /// Run against Base Sepolia.
    #[arg(long)]
    testnet: bool,

    /// Run against Base mainnet.
    #[arg(long)]
    mainnet: bool,

    /// Override the RPC URL for the selected network.
    #[arg(long)]
    rpc_url: Option<Url>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show balances, position and pool statistics.
    Status {
        /// Inspect an address without a key (read-only).
        #[arg(long)]
        address: Option<Address>,

        /// Keep polling on the refresh interval until interrupted.
        #[arg(long)]
        watch: bool,
    },
    /// Open a position: approve, supply, approve, register.
    Open {
        /// Amount in stable-token units, e.g. 10.5
        amount: f64,
    },
    /// Add to an existing position with the same four-call protocol.
    Add {
        amount: f64,
    },
    /// Withdraw the whole position back to the wallet.
    Withdraw,
    /// Claim a won prize.
    Claim,
    /// Drive the weekly draw lifecycle.
    Draw {
        #[command(subcommand)]
        step: DrawStep,
    },
}

#[derive(Subcommand, Debug)]
enum DrawStep {
    /// Start the draw (requires the pool to flag it as due).
    Start,
    /// Fulfill the mock oracle's pending request (test networks only).
    Randomness,
    /// Finalize the draw and select the winner.
    Complete,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn handle_interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received interrupt, exiting"),
        Err(_) => tracing::warn!("interrupt handler failed, exiting anyway"),
    }
}

fn signer_from_env() -> Result<PrivateKeySigner> {
    let raw = std::env::var(PRIVATE_KEY_ENV)
        .wrap_err_with(|| format!("{PRIVATE_KEY_ENV} is not set"))?;
    raw.trim()
        .parse()
        .map_err(|_| eyre!("{PRIVATE_KEY_ENV} does not contain a valid private key"))
}

fn parse_amount(amount: f64) -> Result<U256> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(eyre!("amount must be a positive number"));
    }
    Ok(U256::from((amount * 1_000_000.0).round() as u64))
}

fn print_model(model: &ReadModel) {
    println!("balances:");
    println!("  stable      {}", format_stable(model.balances.stable));
    println!("  yield token {}", format_stable(model.balances.yield_token));
    match &model.position {
        Some(position) if position.is_active => {
            println!("position:");
            println!("  deposited   {}", format_stable(position.deposited_amount));
            println!("  yield       {}", format_stable(position.accrued_yield));
            println!("  tickets     {}", position.tickets);
            println!("  streak      {} week(s)", position.streak);
            println!(
                "  win chance  {}.{:02}%",
                position.win_probability_bps / U256::from(100u64),
                (position.win_probability_bps % U256::from(100u64)).to::<u64>(),
            );
        }
        _ => println!("position:     none"),
    }
    match &model.pool_stats {
        Some(stats) => {
            println!("pool:");
            println!("  deposits    {}", format_stable(stats.total_deposits));
            println!("  players     {}", stats.participant_count);
            println!("  prize pool  {}", format_stable(stats.current_prize_pool));
            println!("  next draw   in {}s", stats.seconds_until_draw);
            println!("  draw due    {}", stats.can_draw);
            println!("  draw pending {}", stats.is_draw_pending);
        }
        None => println!("pool:         unavailable"),
    }
    if let Some(error) = &model.last_error {
        println!("stale snapshot: {error}");
    }
}

// The core is single-threaded cooperative: every contract call, timer tick
// and refresh is a suspend point on one logical thread of control.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let args = Args::parse();

    let network = if args.mainnet {
        Network::Mainnet
    } else {
        Network::Testnet
    };
    let rpc_url: Url = match args.rpc_url {
        Some(url) => url,
        None => network
            .default_rpc_url()
            .parse()
            .expect("default RPC URLs are valid"),
    };
    tracing::info!(%network, %rpc_url, "connecting");

    if let Command::Status { address, watch } = &args.command {
        let account = match address {
            Some(address) => *address,
            None => signer_from_env()?.address(),
        };
        let provider = ProviderBuilder::new().connect_http(rpc_url);
        let reader = RpcChainReader::new(provider, network.addresses());
        let mut refresher = Refresher::new(Arc::new(reader));

        if *watch {
            let (_active, address_rx) = watch::channel(Some(account));
            tokio::select! {
                _ = refresher.run(address_rx, print_model) => {}
                _ = handle_interrupt() => {}
            }
        } else {
            print_model(refresher.refresh(account).await);
        }
        return Ok(());
    }

    let signer = signer_from_env()?;
    let account = signer.address();
    let wallet = EthereumWallet::from(signer);
    let provider = ProviderBuilder::new().wallet(wallet).connect_http(rpc_url);
    let gateway = SignerGateway::new(provider.clone());
    let reader = RpcChainReader::new(provider, network.addresses());
    let mut client = LottyClient::new(gateway, reader, network, account);
    client.refresh().await;

    match args.command {
        Command::Status { .. } => unreachable!("handled above"),
        Command::Open { amount } => {
            client
                .open_position(parse_amount(amount)?, |step| println!("  {step}"))
                .await?;
            println!("position opened");
        }
        Command::Add { amount } => {
            client
                .add_to_position(parse_amount(amount)?, |step| println!("  {step}"))
                .await?;
            println!("position increased");
        }
        Command::Withdraw => {
            client.withdraw(|step| println!("  {step}")).await?;
            println!("position withdrawn");
        }
        Command::Claim => {
            client.claim_prize(|step| println!("  {step}")).await?;
            println!("prize claimed");
        }
        Command::Draw { step } => {
            match step {
                DrawStep::Start => client.start_draw(|step| println!("  {step}")).await?,
                DrawStep::Randomness => {
                    client
                        .complete_randomness(|step| println!("  {step}"))
                        .await?
                }
                DrawStep::Complete => client.complete_draw(|step| println!("  {step}")).await?,
            }
            println!("draw phase: {}", client.draw_phase().name());
        }
    }

    print_model(client.read_model());
    Ok(())
}
