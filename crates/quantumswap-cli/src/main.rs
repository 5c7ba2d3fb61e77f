use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Context, Result};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use num_bigint::BigUint;
use quantumswap_math::{
    check_tick, encode_sqrt_price_x96, parse_decimal, price_to_tick, tick_to_price,
    tick_to_price_f64, FeeTier, Tick,
};
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quantumswap")]
#[command(about = "Tick, price and sqrtPriceX96 conversions for QuantumSwap V3 pools")]
#[command(version)]
struct Cli {
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price (token B per token A) at a tick: 1.0001^TICK.
    TickToPrice(TickToPriceArgs),
    /// Nearest tick to a price, optionally aligned to a fee tier's spacing.
    PriceToTick(PriceToTickArgs),
    /// sqrtPriceX96 for initializing a pool at a whole-unit price.
    SqrtPrice(SqrtPriceArgs),
}

#[derive(Args, Debug)]
struct TickToPriceArgs {
    #[arg(allow_negative_numbers = true)]
    tick: i64,

    /// Output format: table (default) or json.
    #[arg(long, default_value = "table")]
    output: String,
}

#[derive(Args, Debug)]
struct PriceToTickArgs {
    /// Decimal price, e.g. 2765.16 or 1e-6.
    #[arg(allow_negative_numbers = true)]
    price: String,

    /// Fee tier (100, 500, 3000 or 10000) whose tick spacing to align to.
    #[arg(long)]
    fee: Option<u32>,

    #[arg(long, default_value = "table")]
    output: String,
}

/// Arguments for the `sqrt-price` subcommand.
///
/// Token A must have at least as many decimals as token B; swap the pair
/// (and invert the price) otherwise.
#[derive(Args, Debug)]
struct SqrtPriceArgs {
    /// Whole-unit integer price in token B per token A.
    price: String,

    token_a_decimals: u8,

    token_b_decimals: u8,

    #[arg(long, default_value = "table")]
    output: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::TickToPrice(args) => handle_tick_to_price(args),
        Commands::PriceToTick(args) => handle_price_to_tick(args),
        Commands::SqrtPrice(args) => handle_sqrt_price(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.as_str()))
        .wrap_err("failed to initialize tracing filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// A command result printable as a two-column table or as JSON.
trait Report: Serialize {
    fn rows(&self) -> Vec<(&'static str, String)>;
}

#[derive(Debug, Serialize)]
struct TickPriceReport {
    tick: Tick,
    price: String,
    price_f64: f64,
}

impl Report for TickPriceReport {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Tick", self.tick.to_string()),
            ("Price", self.price.clone()),
            ("Price (f64)", format!("{:e}", self.price_f64)),
        ]
    }
}

#[derive(Debug, Serialize)]
struct PriceTickReport {
    price: String,
    tick: Tick,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usable_tick: Option<Tick>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usable_tick_price: Option<String>,
}

impl Report for PriceTickReport {
    fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![("Price", self.price.clone()), ("Tick", self.tick.to_string())];
        if let (Some(tier), Some(tick), Some(price)) =
            (&self.fee_tier, self.usable_tick, &self.usable_tick_price)
        {
            rows.push(("Fee tier", tier.clone()));
            rows.push(("Usable tick", tick.to_string()));
            rows.push(("Usable tick price", price.clone()));
        }
        rows
    }
}

#[derive(Debug, Serialize)]
struct SqrtPriceReport {
    price: String,
    token_a_decimals: u8,
    token_b_decimals: u8,
    sqrt_price_x96: String,
    sqrt_price_x96_hex: String,
    implied_price: String,
    within_protocol_bounds: bool,
}

impl Report for SqrtPriceReport {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Price", self.price.clone()),
            ("Token A decimals", self.token_a_decimals.to_string()),
            ("Token B decimals", self.token_b_decimals.to_string()),
            ("sqrtPriceX96", self.sqrt_price_x96.clone()),
            ("sqrtPriceX96 (uint160)", self.sqrt_price_x96_hex.clone()),
            ("Implied price", self.implied_price.clone()),
            ("Within pool bounds", self.within_protocol_bounds.to_string()),
        ]
    }
}

fn handle_tick_to_price(args: TickToPriceArgs) -> Result<()> {
    let report = tick_price_report(args.tick)?;
    print_report(&report, &args.output)?;

    info!(tick = report.tick, "tick-to-price command completed");
    Ok(())
}

fn tick_price_report(tick: i64) -> Result<TickPriceReport> {
    let tick = check_tick(tick).wrap_err("invalid TICK")?;
    let price = tick_to_price(tick);

    Ok(TickPriceReport {
        tick,
        price: price.to_string(),
        price_f64: tick_to_price_f64(tick),
    })
}

fn handle_price_to_tick(args: PriceToTickArgs) -> Result<()> {
    let report = price_tick_report(&args.price, args.fee)?;
    print_report(&report, &args.output)?;

    info!(tick = report.tick, fee = ?args.fee, "price-to-tick command completed");
    Ok(())
}

fn price_tick_report(price: &str, fee: Option<u32>) -> Result<PriceTickReport> {
    let price = parse_decimal(price).wrap_err("error parsing PRICE")?;
    let tick = price_to_tick(&price).wrap_err("cannot derive a tick from PRICE")?;

    let tier = fee
        .map(FeeTier::from_fee)
        .transpose()
        .wrap_err("invalid --fee")?;
    let usable_tick = tier.map(|tier| tier.nearest_usable_tick(tick));

    Ok(PriceTickReport {
        price: price.to_string(),
        tick,
        fee_tier: tier.map(|tier| tier.to_string()),
        usable_tick,
        usable_tick_price: usable_tick.map(|tick| tick_to_price(tick).to_string()),
    })
}

fn handle_sqrt_price(args: SqrtPriceArgs) -> Result<()> {
    let report = sqrt_price_report(&args.price, args.token_a_decimals, args.token_b_decimals)?;

    if !report.within_protocol_bounds {
        warn!(
            sqrt_price_x96 = %report.sqrt_price_x96,
            "sqrtPriceX96 is outside the range a pool accepts on initialize"
        );
    }

    print_report(&report, &args.output)?;

    info!(
        token_a_decimals = args.token_a_decimals,
        token_b_decimals = args.token_b_decimals,
        "sqrt-price command completed"
    );
    Ok(())
}

fn sqrt_price_report(price: &str, decimals_a: u8, decimals_b: u8) -> Result<SqrtPriceReport> {
    let price_int: BigUint = price
        .trim()
        .parse()
        .wrap_err_with(|| format!("PRICE must be a non-negative integer, got {price:?}"))?;

    let encoded = encode_sqrt_price_x96(&price_int, decimals_a, decimals_b)
        .wrap_err("failed to encode sqrtPriceX96")?;
    let word = encoded
        .to_u160()
        .wrap_err("sqrtPriceX96 cannot be embedded in a transaction")?;
    let implied_price = encoded
        .to_price(decimals_a, decimals_b)
        .wrap_err("failed to decode sqrtPriceX96")?;

    Ok(SqrtPriceReport {
        price: price_int.to_string(),
        token_a_decimals: decimals_a,
        token_b_decimals: decimals_b,
        sqrt_price_x96: encoded.to_string(),
        sqrt_price_x96_hex: format!("{word:#x}"),
        implied_price: implied_price.to_string(),
        within_protocol_bounds: encoded.is_within_protocol_bounds(),
    })
}

fn print_report<R: Report>(report: &R, output: &str) -> Result<()> {
    println!("{}", render_report(report, output)?);
    Ok(())
}

fn render_report<R: Report>(report: &R, output: &str) -> Result<String> {
    match output.to_lowercase().as_str() {
        "table" => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Field", "Value"]);
            for (field, value) in report.rows() {
                table.add_row(vec![field.to_string(), value]);
            }
            Ok(table.to_string())
        }
        "json" => serde_json::to_string_pretty(report).wrap_err("failed to serialize JSON"),
        _ => Err(eyre!(
            "unknown output format '{}'; use 'table' or 'json'",
            output
        )),
    }
}
