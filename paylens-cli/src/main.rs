use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand, ValueEnum};
use paylens_core::{AmountPrecedence, AmountStyle, Annotation, CreditRule, ParseOptions};
use std::path::PathBuf;

mod auth;
mod config;
mod output;
mod state;

#[derive(Parser, Debug)]
#[command(name = "paylens", version, about = "Payment-screenshot transaction extractor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run OCR on a screenshot and emit parsed transactions as JSON
    Scan {
        /// PNG or JPEG screenshot of a transaction history
        image: PathBuf,

        #[command(flatten)]
        parse_args: ParseArgs,

        /// Include the raw extracted text in the report
        #[arg(long)]
        raw: bool,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Parse previously extracted OCR text from a file
    Parse {
        /// Text file with the OCR output, one line per row
        text: PathBuf,

        #[command(flatten)]
        parse_args: ParseArgs,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Manage the extraction service API key
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Manage ~/.paylens/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Output shape for amounts
    #[arg(long, value_enum, default_value = "receipt")]
    mode: ModeArg,

    /// Processing year for day-month dates (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Credit detection rule
    #[arg(long, value_enum, default_value = "plus-anywhere")]
    credit_rule: CreditRuleArg,

    /// Amount pattern precedence
    #[arg(long, value_enum, default_value = "currency-first")]
    amount_precedence: PrecedenceArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    /// Formatted currency strings ("₹1,250")
    Receipt,
    /// Plain decimal amounts plus the configured annotations
    Calendar,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CreditRuleArg {
    PlusAnywhere,
    PlusNextToAmount,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PrecedenceArg {
    CurrencyFirst,
    BareFirst,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Prompt for and store the extraction service API key
    SetKey,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            image,
            parse_args,
            raw,
            out,
        } => {
            scan(image, parse_args, raw, out).await?;
        }

        Command::Parse {
            text,
            parse_args,
            out,
        } => {
            if !text.exists() {
                bail!("text file not found: {}", text.display());
            }
            let blob = std::fs::read_to_string(&text)
                .with_context(|| format!("read {}", text.display()))?;
            let cfg = config::load_config()?;
            let report = run_parse(&blob, &parse_args, &cfg, false)?;
            println!("Parsed {} transactions from {}", report.count, text.display());
            output::emit_report(&report, out.as_deref())?;
        }

        Command::Auth { command } => match command {
            AuthCommand::SetKey => auth::set_key()?,
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}

async fn scan(image: PathBuf, parse_args: ParseArgs, raw: bool, out: Option<PathBuf>) -> Result<()> {
    if !image.exists() {
        bail!("image not found: {}", image.display());
    }
    // Reject unsupported uploads before spending an extraction call.
    paylens_ocr::image_mime(&image)?;

    let cfg = config::load_config()?;
    let client = paylens_ocr::OcrClient::new(auth::api_key()?)
        .with_model(&cfg.ocr.model)
        .with_base_url(&cfg.ocr.base_url);

    println!("Extracting text from {}", image.display());
    let text = client.extract_text(&image, &cfg.ocr.instruction).await?;

    let report = run_parse(&text, &parse_args, &cfg, raw)?;
    println!("Parsed {} transactions", report.count);
    output::emit_report(&report, out.as_deref())?;
    Ok(())
}

fn run_parse(
    text: &str,
    args: &ParseArgs,
    cfg: &config::Config,
    include_raw: bool,
) -> Result<output::ScanReport> {
    let year = args.year.unwrap_or_else(|| Local::now().year());

    let mut opts = ParseOptions::new(year);
    opts.credit_rule = match args.credit_rule {
        CreditRuleArg::PlusAnywhere => CreditRule::PlusAnywhere,
        CreditRuleArg::PlusNextToAmount => CreditRule::PlusNextToAmount,
    };
    opts.amount_precedence = match args.amount_precedence {
        PrecedenceArg::CurrencyFirst => AmountPrecedence::CurrencySymbolFirst,
        PrecedenceArg::BareFirst => AmountPrecedence::BareNumberFirst,
    };
    if let ModeArg::Calendar = args.mode {
        opts.amount_style = AmountStyle::Numeric;
        opts.annotation = Some(Annotation {
            category: cfg.scan.category.clone(),
            description: cfg.scan.description.clone(),
        });
    }

    let transactions = paylens_core::parse_transactions(text, opts)?;
    Ok(output::ScanReport {
        count: transactions.len(),
        transactions,
        raw_text: include_raw.then(|| text.to_string()),
    })
}
