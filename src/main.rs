//! Futures trading CLI
//!
//! `trade`: validate an order, show balance / price / notional, confirm,
//! then place it on the Binance futures testnet.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;

use futures_bot::config::Config;
use futures_bot::exchange::binance::BinanceFutures;
use futures_bot::exchange::{ExchangeError, FuturesExchange};
use futures_bot::logging;
use futures_bot::order::{meets_minimum_notional, OrderInput, ValidationError};
use futures_bot::orders;

#[derive(Parser)]
#[command(name = "futures-bot")]
#[command(about = "Binance futures testnet trading CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a futures order
    Trade(TradeArgs),
}

#[derive(Args)]
struct TradeArgs {
    /// Trading pair symbol (e.g. BTCUSDT)
    #[arg(long)]
    symbol: String,

    /// Order side
    #[arg(long, value_enum)]
    side: SideArg,

    /// Order type
    #[arg(long = "type", value_enum)]
    order_type: TypeArg,

    /// Order quantity (must be > 0)
    #[arg(long)]
    quantity: f64,

    /// Limit price (required for LIMIT orders)
    #[arg(long)]
    price: Option<f64>,

    /// Ask for confirmation before placing the order
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    confirm: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Buy,
    Sell,
}

impl SideArg {
    fn as_str(self) -> &'static str {
        match self {
            SideArg::Buy => "BUY",
            SideArg::Sell => "SELL",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Market,
    Limit,
}

impl TypeArg {
    fn as_str(self) -> &'static str {
        match self {
            TypeArg::Market => "MARKET",
            TypeArg::Limit => "LIMIT",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Trade(args) => match trade(args).await {
            Ok(code) => code,
            Err(err) => {
                eprintln!("Unexpected error: {:#}", err);
                logging::error("cli", &format!("unexpected error in trade command: {:#}", err));
                ExitCode::FAILURE
            }
        },
    }
}

async fn trade(args: TradeArgs) -> Result<ExitCode> {
    let cfg = Config::from_env();
    if let Err(err) = logging::init(&cfg.log_path, cfg.log_level) {
        eprintln!("warning: cannot open log file {}: {}", cfg.log_path.display(), err);
    }

    let exchange = BinanceFutures::new(&cfg)?;
    let symbol = args.symbol.to_uppercase();

    let account = exchange.account_snapshot().await?;
    println!("Available balance: {} USDT", account.available_balance);

    let current_price = exchange.symbol_price(&symbol).await?;
    println!("Current {} price: {} USDT", symbol, current_price);

    let order_data = json!({
        "symbol": symbol,
        "side": args.side.as_str(),
        "order_type": args.order_type.as_str(),
        "quantity": args.quantity,
        "price": args.price,
    });

    // Validate up front so the user sees every field error before the
    // confirmation prompt, not after.
    if let Err(err) = OrderInput::parse(&order_data) {
        print_validation_error(&err);
        logging::error("cli", &format!("validation error while building order: {}", err));
        return Ok(ExitCode::FAILURE);
    }

    let effective_price = args.price.unwrap_or(current_price);
    let notional = args.quantity * effective_price;
    println!("Order notional value: {:.2} USDT", notional);
    if !meets_minimum_notional(&json!(notional), cfg.min_notional) {
        println!(
            "Warning: the exchange requires a minimum notional of {} USDT.",
            cfg.min_notional
        );
        logging::warn("cli", &format!("notional {:.2} below minimum {}", notional, cfg.min_notional));
    }

    if args.confirm && !confirm_prompt()? {
        println!("Order cancelled by user.");
        logging::info("cli", "order cancelled by user");
        return Ok(ExitCode::FAILURE);
    }

    match orders::place_order(&order_data, &exchange).await {
        Ok(result) => {
            println!();
            println!("========== ORDER SUMMARY ==========");
            println!("Symbol:   {}", symbol);
            println!("Side:     {}", args.side.as_str());
            println!("Type:     {}", args.order_type.as_str());
            println!("Quantity: {}", args.quantity);
            if let Some(price) = args.price {
                println!("Price:    {}", price);
            }
            println!();
            println!("========== ORDER RESPONSE ==========");
            match result.order_id {
                Some(id) => println!("Order ID:          {}", id),
                None => println!("Order ID:          -"),
            }
            println!("Status:            {}", result.status.as_deref().unwrap_or("-"));
            println!("Executed quantity: {}", result.executed_qty);
            println!("Average price:     {}", result.avg_price.as_deref().unwrap_or("-"));
            println!();
            println!("Order placed successfully.");
            logging::info(
                "cli",
                &format!(
                    "order placed: {} {} {} qty={} price={} order_id={:?}",
                    args.side.as_str(),
                    args.order_type.as_str(),
                    symbol,
                    args.quantity,
                    effective_price,
                    result.order_id
                ),
            );
            Ok(ExitCode::SUCCESS)
        }
        // place_order already logged these; here we only decide presentation.
        Err(err) => {
            if let Some(api) = err.downcast_ref::<ExchangeError>() {
                eprintln!("Exchange API error: {}", api.message);
                Ok(ExitCode::FAILURE)
            } else if let Some(validation) = err.downcast_ref::<ValidationError>() {
                print_validation_error(validation);
                Ok(ExitCode::FAILURE)
            } else {
                Err(err)
            }
        }
    }
}

fn print_validation_error(err: &ValidationError) {
    eprintln!("Validation error:");
    for field_err in &err.errors {
        eprintln!("  {}: {}", field_err.field, field_err.message);
    }
}

fn confirm_prompt() -> Result<bool> {
    print!("Place this order? [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
