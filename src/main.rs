//! Risk calculator CLI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use riskcalc::analytics::{EventSink, NoopSink, TracingSink};
use riskcalc::format::MarketCurrencyFormatter;
use riskcalc::report::{CalculationReport, ErrorReport};
use riskcalc::session::{spawn_line_reader, FormSession};
use riskcalc::{CalculationOutcome, CalculatorConfig, MarketRules, RawInput, RiskCalculator};

/// Risk calculator CLI.
#[derive(Parser)]
#[command(name = "riskcalc")]
#[command(about = "Calculate a safe position size from your risk tolerance", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RISKCALC_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Risk per trade (%) above which a warning is shown
    #[arg(long, env = "RISKCALC_HIGH_RISK_PCT")]
    high_risk_pct: Option<Decimal>,

    /// Stop distance ratio below which the stop is flagged as tight
    #[arg(long, env = "RISKCALC_TIGHT_STOP_RATIO")]
    tight_stop_ratio: Option<Decimal>,

    /// Reject unknown market codes instead of falling back to MY
    #[arg(long, env = "RISKCALC_STRICT_MARKETS")]
    strict_markets: bool,

    /// Do not log usage events
    #[arg(long, env = "RISKCALC_NO_ANALYTICS")]
    no_analytics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the maximum position for one trade
    Calculate {
        /// Principal capital
        #[arg(short, long, allow_hyphen_values = true)]
        principal: String,

        /// Maximum risk percentage per trade
        #[arg(short, long, allow_hyphen_values = true)]
        risk: String,

        /// Buy price per share
        #[arg(short, long, allow_hyphen_values = true)]
        buy: String,

        /// Stop loss price per share
        #[arg(short, long, allow_hyphen_values = true)]
        stop: String,

        /// Market code (MY, SG, CN, HK, US)
        #[arg(short, long, default_value = "MY")]
        market: String,

        /// Print the JSON response instead of the report
        #[arg(long)]
        json: bool,
    },

    /// Calculate every input in a JSON array file
    Batch {
        /// File containing an array of calculator inputs
        file: PathBuf,
    },

    /// Fill in the calculator form interactively
    Session,

    /// Show lot sizes and currencies per market
    Markets,

    /// Show current configuration
    Config,
}

impl Cli {
    fn calculator_config(&self) -> CalculatorConfig {
        let defaults = CalculatorConfig::default();
        CalculatorConfig {
            high_risk_threshold_pct: self
                .high_risk_pct
                .unwrap_or(defaults.high_risk_threshold_pct),
            tight_stop_ratio: self.tight_stop_ratio.unwrap_or(defaults.tight_stop_ratio),
            strict_markets: self.strict_markets,
            ..defaults
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging; RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.calculator_config();
    let sink: Arc<dyn EventSink> = if cli.no_analytics {
        Arc::new(NoopSink)
    } else {
        Arc::new(TracingSink)
    };
    let calculator = RiskCalculator::new(config, sink);
    let formatter = MarketCurrencyFormatter;

    match cli.command {
        Commands::Calculate {
            principal,
            risk,
            buy,
            stop,
            market,
            json,
        } => {
            let raw = RawInput::new(principal, risk, buy, stop, market);
            let outcome = calculator.calculate(&raw)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.to_response())?);
            } else {
                match &outcome {
                    CalculationOutcome::Calculated { input, rule, result } => {
                        let report = CalculationReport {
                            input,
                            rule: *rule,
                            result,
                            formatter: &formatter,
                        };
                        println!("{}", report);
                    }
                    CalculationOutcome::Invalid(errors) => {
                        eprint!("{}", ErrorReport(errors));
                    }
                }
            }

            if let Some(errors) = outcome.errors() {
                anyhow::bail!("{}", errors);
            }
        }

        Commands::Batch { file } => {
            let contents = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let inputs: Vec<RawInput> = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", file.display()))?;

            info!(count = inputs.len(), file = %file.display(), "Running batch");

            let mut responses = Vec::with_capacity(inputs.len());
            for (index, raw) in inputs.iter().enumerate() {
                let outcome = calculator
                    .calculate(raw)
                    .with_context(|| format!("Input #{} could not be sized", index))?;
                responses.push(outcome.to_response());
            }

            println!("{}", serde_json::to_string_pretty(&responses)?);
        }

        Commands::Session => {
            let mut session = FormSession::new(&calculator, &formatter);
            info!(session = %session.id(), "Starting calculator session");

            println!("\n=== Risk Management Calculator ===");
            println!("Type 'help' for commands. Press Ctrl+C to stop.\n");

            let lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()))?;
            let stdin = BufReader::new(lines);
            tokio::select! {
                res = session.run(stdin, tokio::io::stdout()) => res?,
                _ = tokio::signal::ctrl_c() => {
                    println!("\n\nStopping session...");
                }
            }

            info!(
                session = %session.id(),
                calculated = session.last_outcome().is_some(),
                "Session ended"
            );
        }

        Commands::Markets => {
            println!(
                "\n{:<4} {:<30} {:>8} {:<6} {:<5} {}",
                "CODE", "MARKET", "LOT", "SYMBOL", "ISO", "NOTES"
            );
            println!("{}", "-".repeat(100));

            for rule in MarketRules::all() {
                let lot = if rule.uses_lots {
                    rule.lot_size.to_string()
                } else {
                    "-".to_string()
                };
                println!(
                    "{:<4} {:<30} {:>8} {:<6} {:<5} {}",
                    rule.market, rule.name, lot, rule.currency_symbol, rule.currency_code, rule.lot_note
                );
            }

            println!(
                "\nLot markets are sized in 100-share lots. For Hong Kong stocks, check the \
                 individual stock's lot size. US stocks trade in any number of shares."
            );
        }

        Commands::Config => {
            let config = calculator.config();

            println!("\n=== Calculator Configuration ===\n");
            println!("Warnings:");
            println!("  High Risk Above:      {}%", config.high_risk_threshold_pct);
            println!("  Tight Stop Below:     {}% of buy price", config.tight_stop_ratio * Decimal::ONE_HUNDRED);
            println!("\nMarkets:");
            println!("  Unknown Codes:        {}", if config.strict_markets { "rejected" } else { "fall back to MY" });
            println!("\nAnalytics:");
            println!("  Usage Events:         {}", if cli.no_analytics { "off" } else { "logged" });
            println!("  Page:                 {}", config.page);
        }
    }

    Ok(())
}
