//! ISR Code Line - CLI tool for building the code line of a payment slip.

use clap::Parser;
use isr_scan::{reference::format_reference, scanline::PaymentSlip, Currency, Error, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "isr_codeline")]
#[command(about = "Build the machine-readable code line of an ISR payment slip", long_about = None)]
struct Cli {
    /// Amount to pay (omit for an ISR+ slip without amount)
    #[arg(short, long)]
    amount: Option<String>,

    /// 27-digit ISR reference
    #[arg(short, long)]
    reference: String,

    /// Subscription number, e.g. 01-162-8
    #[arg(short, long)]
    subscription: String,

    /// Currency (CHF, EUR)
    #[arg(short, long, default_value = "CHF")]
    currency: String,

    /// Also print the reference grouped for the slip
    #[arg(long)]
    show_reference: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let amount = cli
        .amount
        .as_deref()
        .map(|a| Decimal::from_str(a.trim()).map_err(|_| Error::InvalidAmount(a.to_string())))
        .transpose()?;

    let slip = PaymentSlip {
        amount,
        reference: cli.reference.clone(),
        subscription: cli.subscription,
        currency: cli.currency.parse::<Currency>()?,
    };

    println!("{}", slip.code_line()?);
    if cli.show_reference {
        println!("{}", format_reference(&cli.reference));
    }

    Ok(())
}
