//! GoodBridge CLI
//!
//! Command-line front-end for the GoodNet L1/L2 token bridge: list tokens,
//! check balances, and run the approve-then-transfer flow for deposits and
//! withdrawals.

mod config;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use config::Config;
use goodbridge_core::{
    format_amount_display, parse_amount, resolve_token, BridgeError, ChainGateway, Direction,
    EvmGateway, TokenRegistry, TransferForm,
};

#[derive(Parser)]
#[command(name = "goodbridge")]
#[command(about = "Bridge assets between GoodNet L1 and L2", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    /// L1 to L2
    Deposit,
    /// L2 back to L1
    Withdraw,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Deposit => Direction::Deposit,
            DirectionArg::Withdraw => Direction::Withdraw,
        }
    }
}

#[derive(Args)]
struct TransferArgs {
    /// Token symbol to bridge
    #[arg(short, long, default_value = "ETH")]
    token: String,

    /// Custom ERC-20 contract address; resolved on-chain and used instead
    /// of --token
    #[arg(long)]
    token_address: Option<String>,

    /// Decimal amount to bridge
    #[arg(short, long)]
    amount: Option<String>,

    /// Bridge the full spendable balance (MAX)
    #[arg(long)]
    max: bool,

    /// Acknowledge the terms and conditions
    #[arg(long)]
    accept_terms: bool,

    /// Print the receipt as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show configuration, account, and balances
    Status,

    /// List bridgeable tokens for a direction
    Tokens {
        #[arg(long, value_enum, default_value = "deposit")]
        direction: DirectionArg,
    },

    /// Show the wallet balance for a token
    Balance {
        #[arg(short, long, default_value = "ETH")]
        token: String,

        #[arg(long, value_enum, default_value = "deposit")]
        direction: DirectionArg,
    },

    /// Show the largest enterable amount for a token
    Max {
        #[arg(short, long, default_value = "ETH")]
        token: String,

        #[arg(long, value_enum, default_value = "deposit")]
        direction: DirectionArg,
    },

    /// Quote the bridge fee for an amount
    Quote {
        #[arg(short, long)]
        amount: String,

        #[arg(short, long, default_value = "ETH")]
        token: String,
    },

    /// Resolve an ERC-20 contract address into token metadata
    Resolve {
        /// Token contract address (0x...)
        address: String,

        #[arg(long, value_enum, default_value = "deposit")]
        direction: DirectionArg,
    },

    /// Deposit assets from L1 to L2
    Deposit(TransferArgs),

    /// Withdraw assets from L2 back to L1 (claimable after the challenge
    /// period)
    Withdraw(TransferArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load()?;

    match cli.command {
        Commands::Status => show_status(&config).await?,
        Commands::Tokens { direction } => list_tokens(&config, direction.into())?,
        Commands::Balance { token, direction } => {
            show_balance(&config, &token, direction.into()).await?
        }
        Commands::Max { token, direction } => show_max(&config, &token, direction.into()).await?,
        Commands::Quote { amount, token } => show_quote(&config, &amount, &token)?,
        Commands::Resolve { address, direction } => {
            resolve_custom_token(&config, &address, direction.into()).await?
        }
        Commands::Deposit(args) => run_transfer(&config, Direction::Deposit, args).await?,
        Commands::Withdraw(args) => run_transfer(&config, Direction::Withdraw, args).await?,
    }

    Ok(())
}

/// Build the form controller for one direction
fn build_form(config: &Config, direction: Direction) -> Result<TransferForm<EvmGateway>> {
    let chains = config.chain_registry()?;
    let gateway = EvmGateway::new(
        &config.wallet.private_key,
        config.endpoints(),
        chains.execution_chain(direction).id,
    )?;
    let form = TransferForm::new(
        gateway,
        chains,
        TokenRegistry::goodnet_defaults(),
        direction,
    )?
    .with_reserves(config.gas_reserves())
    .with_challenge_period_hours(config.transfer.challenge_period_hours);
    Ok(form)
}

async fn show_status(config: &Config) -> Result<()> {
    let chains = config.chain_registry()?;
    let gateway = EvmGateway::new(
        &config.wallet.private_key,
        config.endpoints(),
        chains.l1().id,
    )?;

    println!("Account: {}", gateway.account());
    println!();
    println!("Chains:");
    for (chain, bridge) in [
        (chains.l1(), chains.bridge_for(Direction::Deposit)),
        (chains.l2(), chains.bridge_for(Direction::Withdraw)),
    ] {
        println!("  {} (chain {})", chain.name, chain.id);
        println!("    RPC:    {}", chain.rpc_url);
        println!("    Bridge: {}", bridge);

        match gateway.native_balance(chain.id, gateway.account()).await {
            Ok(balance) => println!(
                "    Balance: {} {}",
                format_amount_display(balance, 18),
                chain.native_symbol
            ),
            Err(e) => println!("    Balance: not responding ({})", e),
        }
    }
    println!();
    println!(
        "Fees: {} ETH base + {} bps",
        format_amount_display(config.fees.base_fee, 18),
        config.fees.fee_bps
    );
    println!(
        "Withdrawal challenge period: ~{}h",
        config.transfer.challenge_period_hours
    );
    Ok(())
}

fn list_tokens(config: &Config, direction: Direction) -> Result<()> {
    let chains = config.chain_registry()?;
    let chain = chains.execution_chain(direction);
    let registry = TokenRegistry::goodnet_defaults();

    println!("Tokens available on {} (chain {}):", chain.name, chain.id);
    for token in registry.available_on(chain.id) {
        let kind = if token.is_native {
            "native".to_string()
        } else {
            match token.address_on(chain.id) {
                Some(address) => format!("{}", address),
                None => "-".to_string(),
            }
        };
        println!(
            "  {} {:<6} {:<20} {:>2} decimals  {}",
            token.icon, token.symbol, token.name, token.decimals, kind
        );
    }
    Ok(())
}

async fn show_balance(config: &Config, token: &str, direction: Direction) -> Result<()> {
    let mut form = build_form(config, direction)?;
    select_token(&mut form, token)?;
    form.refresh().await?;

    let intent = form.intent();
    let balance = form
        .balance()
        .map(|snapshot| format_amount_display(snapshot.amount, intent.token.decimals))
        .unwrap_or_else(|| "0".to_string());
    println!("{} {}", balance, intent.token.symbol);
    Ok(())
}

async fn show_max(config: &Config, token: &str, direction: Direction) -> Result<()> {
    let mut form = build_form(config, direction)?;
    select_token(&mut form, token)?;
    form.refresh().await?;

    match form.max_amount() {
        Some(max) => println!("{} {}", max, form.intent().token.symbol),
        None => println!("balance unavailable"),
    }
    Ok(())
}

fn show_quote(config: &Config, amount: &str, token: &str) -> Result<()> {
    let registry = TokenRegistry::goodnet_defaults();
    let token = registry
        .by_symbol(token)
        .ok_or_else(|| color_eyre::eyre::eyre!("unknown token {}", token))?;

    let units = match parse_amount(amount, token.decimals) {
        Ok(units) => units,
        Err(e) => {
            eprintln!("amount: {}", e);
            std::process::exit(1);
        }
    };

    let quote = config.fee_schedule().quote(units);
    println!(
        "Base fee:       {} ETH",
        format_amount_display(quote.base, 18)
    );
    println!(
        "Percentage fee: {} {} ({} bps)",
        goodbridge_core::format_amount(quote.percentage, token.decimals),
        token.symbol,
        config.fees.fee_bps
    );
    Ok(())
}

async fn resolve_custom_token(config: &Config, address: &str, direction: Direction) -> Result<()> {
    let chains = config.chain_registry()?;
    let chain = chains.execution_chain(direction);
    let gateway = EvmGateway::new(&config.wallet.private_key, config.endpoints(), chain.id)?;

    let contract = address
        .parse()
        .map_err(|e| color_eyre::eyre::eyre!("invalid token address: {}", e))?;

    match resolve_token(&gateway, chain.id, contract).await {
        Ok(token) => {
            println!("Resolved on {}:", chain.name);
            println!("  Symbol:   {}", token.symbol);
            println!("  Name:     {}", token.name);
            println!("  Decimals: {}", token.decimals);
            Ok(())
        }
        Err(e) => {
            // The error names the specific field that failed; the same
            // command is the manual retry
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn run_transfer(config: &Config, direction: Direction, args: TransferArgs) -> Result<()> {
    let mut form = build_form(config, direction)?;
    let chain_id = form.chains().execution_chain(direction).id;

    // Custom token address takes precedence over the symbol
    if let Some(ref address) = args.token_address {
        let contract = address
            .parse()
            .map_err(|e| color_eyre::eyre::eyre!("invalid token address: {}", e))?;
        let gateway = EvmGateway::new(&config.wallet.private_key, config.endpoints(), chain_id)?;
        let token = resolve_token(&gateway, chain_id, contract).await?;
        let symbol = token.symbol.clone();
        form.register_token(token)?;
        select_token(&mut form, &symbol)?;
    } else {
        select_token(&mut form, &args.token)?;
    }

    if args.max {
        form.refresh().await?;
        match form.apply_max() {
            Some(max) => tracing::info!(amount = %max, "Using MAX amount"),
            None => {
                eprintln!("amount: balance unavailable, cannot compute MAX");
                std::process::exit(1);
            }
        }
    } else if let Some(ref amount) = args.amount {
        form.set_amount(amount);
    }
    form.set_terms_accepted(args.accept_terms);

    match form.submit().await {
        Ok(receipt) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                println!(
                    "{} {} {} submitted: {}",
                    direction, receipt.amount, receipt.token_symbol, receipt.tx_hash
                );
                println!("  {}", receipt.explorer_url);
                if let Some(message) = form.completion_message() {
                    println!("  {}", message);
                }
            }
            Ok(())
        }
        Err(BridgeError::Validation(issues)) => {
            eprintln!("Cannot submit:");
            for issue in issues {
                eprintln!("  {}: {}", issue.field(), issue);
            }
            if !args.accept_terms {
                eprintln!("  (pass --accept-terms to acknowledge the terms and conditions)");
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Transfer failed: {}", e);
            eprintln!(
                "The intent is at step '{}'; rerun the command to retry.",
                form.step()
            );
            std::process::exit(1);
        }
    }
}

/// Select a token and surface an unavailable selection as an inline message
fn select_token(form: &mut TransferForm<EvmGateway>, symbol: &str) -> Result<()> {
    if let Err(e) = form.select_token(symbol) {
        eprintln!("token: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
