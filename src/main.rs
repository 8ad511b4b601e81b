use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use trendalloc::config::{self, DEFAULT_PORT};
use trendalloc::{
    AllocationRequest, FallbackPolicy, HistoricalDataset, MarketScenario, RiskTier, report, run_pipeline, server,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Trend-based portfolio allocation across Equity, Bonds, Gold and Cash",
    after_help = "EXAMPLES:
    # Prompt for the risk level and allocate
    cargo run --release

    # Low risk, bear market, $25,000 split
    cargo run --release -- --risk Low --scenario bear --amount 25000

    # JSON output with a custom dataset
    cargo run --release -- --risk Medium --data returns.csv --json

    # Serve the allocation API
    cargo run --release -- --serve --port 8080"
)]
struct Args {
    /// Historical returns CSV (Year plus one column per asset). Defaults to $TRENDALLOC_DATA, then the bundled dataset.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Risk level: Low, Medium or High. Any other value selects High. Prompted for when omitted on a terminal.
    #[arg(long)]
    risk: Option<String>,

    /// Market scenario applied to predicted returns
    #[arg(long, value_enum, default_value_t = MarketScenario::Normal)]
    scenario: MarketScenario,

    /// Explicit return multiplier; overrides --scenario
    #[arg(long)]
    multiplier: Option<f64>,

    /// Investment amount to split across assets
    #[arg(long)]
    amount: Option<f64>,

    /// What to do when the blended weights are undefined
    #[arg(long, value_enum, default_value_t = FallbackPolicy::Fail)]
    fallback: FallbackPolicy,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Run the HTTP allocation service instead of a one-shot allocation
    #[arg(long)]
    serve: bool,

    /// Service port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trendalloc=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let data_path = config::resolve_data_path(args.data.clone());
    let dataset = HistoricalDataset::from_path(&data_path)
        .with_context(|| format!("Failed to load historical dataset {}", data_path.display()))
        .inspect_err(|e| error!("{:#}", e))?;

    if args.serve {
        return server::run_server(args.port, dataset).await;
    }

    if let Some(multiplier) = args.multiplier {
        if !multiplier.is_finite() {
            anyhow::bail!("--multiplier must be a finite number, got {}", multiplier);
        }
    }
    if let Some(amount) = args.amount {
        if !amount.is_finite() || amount < 0.0 {
            anyhow::bail!("--amount must be a finite, non-negative number, got {}", amount);
        }
    }

    let label = match args.risk {
        Some(ref label) => label.clone(),
        None => prompt_risk_level()?,
    };

    let request = AllocationRequest {
        tier: RiskTier::from_label(&label),
        multiplier: args.multiplier.unwrap_or_else(|| args.scenario.multiplier()),
        investment_amount: args.amount,
        fallback: args.fallback,
    };

    let report = match run_pipeline(&dataset, &request) {
        Ok(report) => report,
        Err(e) => {
            error!("Allocation failed: {}", e);
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report::print_report(&report);
    }
    info!("Allocation completed.");
    Ok(())
}

/// Asks for the risk level on a terminal; defaults to Medium when stdin is
/// piped.
fn prompt_risk_level() -> Result<String> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        info!("No --risk given and stdin is not a terminal; using Medium.");
        return Ok(RiskTier::Medium.as_str().to_string());
    }

    print!("Enter risk level (Low / Medium / High): ");
    io::stdout().flush()?;
    let mut line = String::new();
    stdin.lock().read_line(&mut line).context("Failed to read risk level")?;
    Ok(line.trim().to_string())
}
