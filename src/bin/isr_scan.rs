//! ISR Scan - CLI tool for decoding scanned ISR/BVR code lines.

use clap::Parser;
use isr_scan::{csv_format::CsvPayments, decode, DecodedPayment, OutputFormat, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};

#[derive(Parser)]
#[command(name = "isr_scan")]
#[command(about = "Decode ISR/BVR payment slip code lines (one per line)", long_about = None)]
struct Cli {
    /// Input file path (or stdin if not provided)
    #[arg(short, long)]
    input: Option<String>,

    /// Output format (csv, text)
    #[arg(long = "output-format", default_value = "csv")]
    output_format: String,

    /// Output file path (or stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Log every decoding step
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when at least one line failed to decode.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output_format = cli.output_format.parse::<OutputFormat>()?;

    let (payments, all_decoded) = if let Some(ref input_path) = cli.input {
        let mut file = File::open(input_path)?;
        decode_lines(&mut file)?
    } else {
        let mut stdin = io::stdin();
        decode_lines(&mut stdin)?
    };

    if let Some(ref output_path) = cli.output {
        let mut file = File::create(output_path)?;
        write_output(&mut file, payments, output_format)?;
    } else {
        let mut stdout = io::stdout();
        write_output(&mut stdout, payments, output_format)?;
    }

    Ok(all_decoded)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn decode_lines<R: Read>(reader: &mut R) -> Result<(Vec<DecodedPayment>, bool)> {
    let mut payments = Vec::new();
    let mut all_decoded = true;

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match decode(&line) {
            Ok(payment) => payments.push(payment),
            Err(e) => {
                eprintln!("Line {}: {}", index + 1, e);
                all_decoded = false;
            }
        }
    }

    Ok((payments, all_decoded))
}

fn write_output<W: Write>(writer: &mut W, payments: Vec<DecodedPayment>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let csv = CsvPayments { payments };
            csv.write_to(writer)?;
        }
        OutputFormat::Text => {
            for payment in &payments {
                writeln!(writer, "Type:        {} ({})", payment.type_code, payment.variant)?;
                writeln!(writer, "Amount:      {:.2} {}", payment.amount, payment.currency)?;
                writeln!(writer, "Reference:   {}", payment.reference)?;
                writeln!(writer, "ISR number:  {}", payment.isr_number)?;
                writeln!(writer, "Beneficiary: {}", payment.beneficiary_account)?;
                writeln!(writer, "Match on:    {}", payment.lookup_domain)?;
                writeln!(writer)?;
            }
        }
    }
    Ok(())
}
