mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::deal::DealArgs;
use commands::payments::{CompareArgs, PaymentArgs, PriceArgs, QuoteArgs, ScenarioArgs};
use commands::pipeline::{EngagementArgs, ProgressArgs};
use commands::preapproval::{LetterArgs, PreapprovalArgs};
use commands::rehab::{OptimizeRehabArgs, RehabArgs};

/// Mortgage loan decisioning
#[derive(Parser)]
#[command(
    name = "mtg",
    version,
    about = "Mortgage loan decisioning: payments, preapproval, rehab, deals and pipeline",
    long_about = "A CLI over the mortgage decisioning engines with decimal precision. \
                  Prices PITI payments and scenarios, assesses preapproval (DTI, LTV, \
                  program fit, red flags), estimates and optimises rehab budgets, compares \
                  flip and rental exits, and scores loan pipeline progress."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter (RUST_LOG takes precedence), e.g. "debug" or "mortgage_engine_core=trace"
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// JSON or YAML file overriding program guidelines for preapproval and letters
    #[arg(long, global = true)]
    guidelines: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly PITI payment breakdown
    Payment(PaymentArgs),
    /// Price a single loan scenario
    Scenario(ScenarioArgs),
    /// Price several scenarios side by side
    CompareScenarios(CompareArgs),
    /// Estimate note rate, payment and DSCR
    Price(PriceArgs),
    /// Quick commercial quote at the house rate
    Quote(QuoteArgs),
    /// Preapproval assessment (DTI, LTV, programs, red flags, conditions)
    Preapproval(PreapprovalArgs),
    /// Preapproval letter body
    Letter(LetterArgs),
    /// Rehab cost, timeline, materials and risk analysis
    Rehab(RehabArgs),
    /// Optimise a rehab plan for budget, ROI, timeline or ARV
    OptimizeRehab(OptimizeRehabArgs),
    /// Flip, rental and short-term rental budgets with a recommended exit
    Deal(DealArgs),
    /// Loan pipeline progress percentage and stage
    Progress(ProgressArgs),
    /// Borrower engagement score from document events
    Engagement(EngagementArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }

    let guidelines = cli.guidelines.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::payments::run_payment(args),
        Commands::Scenario(args) => commands::payments::run_scenario(args),
        Commands::CompareScenarios(args) => commands::payments::run_compare(args),
        Commands::Price(args) => commands::payments::run_price(args),
        Commands::Quote(args) => commands::payments::run_quote(args),
        Commands::Preapproval(args) => commands::preapproval::run_preapproval(args, guidelines),
        Commands::Letter(args) => commands::preapproval::run_letter(args, guidelines),
        Commands::Rehab(args) => commands::rehab::run_rehab(args),
        Commands::OptimizeRehab(args) => commands::rehab::run_optimize(args),
        Commands::Deal(args) => commands::deal::run_deal(args),
        Commands::Progress(args) => commands::pipeline::run_progress(args),
        Commands::Engagement(args) => commands::pipeline::run_engagement(args),
        Commands::Version => {
            println!("mtg {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
