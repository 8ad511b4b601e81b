use crate::pipeline::AllocationReport;

/// Pretty-prints an allocation report to stdout.
pub fn print_report(report: &AllocationReport) {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║              Trend Portfolio Allocation                    ║");
    println!("╠════════════════════════════════════════════════════════════╣");
    println!("║  Risk Tier              : {:<8}                         ║", report.tier.as_str());
    println!("║  Scenario Multiplier    : {:>7.2}x                        ║", report.multiplier);
    if let Some(policy) = report.fallback_applied {
        println!("║  Fallback Applied       : {:<32} ║", format!("{:?}", policy));
    }
    println!("╠════════════════════════════════════════════════════════════╣");
    println!("║  Asset    Pred.Ret   Adj.Ret   Baseline   Weight           ║");
    println!("╠════════════════════════════════════════════════════════════╣");

    for (asset, weight) in report.portfolio.iter() {
        println!(
            "║  {:<6} {:>+8.2}%  {:>+7.2}%  {:>7.2}%  {:>7.2}%           ║",
            asset.as_str(),
            report.predicted_returns[asset] * 100.0,
            report.adjusted_returns[asset] * 100.0,
            report.baseline_weights[asset] * 100.0,
            weight * 100.0
        );
    }

    println!("╠════════════════════════════════════════════════════════════╣");
    println!(
        "║  Expected Return        : {:>+7.2}%                        ║",
        report.metrics.expected_return * 100.0
    );
    println!(
        "║  Volatility (proxy)     : {:>7.2}%                        ║",
        report.metrics.volatility * 100.0
    );
    println!(
        "║  Sharpe Ratio           : {:>7.2}                         ║",
        report.metrics.sharpe_ratio
    );

    if let (Some(total), Some(amounts)) = (report.investment_amount, report.amounts.as_ref()) {
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║  Per ${:<12.2} Invested:                              ║", total);
        for (asset, amount) in amounts.iter() {
            println!("║    {:<6}  ${:>12.2}                                  ║", asset.as_str(), amount);
        }
    }

    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
    println!("⚠  Educational use only. Not financial advice.");
}
