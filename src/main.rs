//! Mortgage Planner CLI
//!
//! Runs a five-strategy projection or the strategy optimizer from the
//! command line, printing a summary and writing the monthly table as CSV.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use mortgage_planner::{
    affordability,
    amortization::{amortization_schedule, monthly_payment},
    ProjectionEngine, ProjectionResult, ScenarioConfig, Strategy, StrategyOptimizer, TaxConfig,
};

#[derive(Parser)]
#[command(name = "mortgage_planner", about = "Mortgage funding strategy analyzer")]
struct Cli {
    /// Scenario JSON file; a built-in demo scenario is used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Replacement income-tax bracket table (CSV: lower,upper,rate)
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Project all five strategies month by month
    Project {
        /// Output CSV path
        #[arg(long, default_value = "projection_output.csv")]
        output: PathBuf,
    },
    /// Search for the parameter combination maximizing ending net worth
    Optimize {
        /// Cap on the months searched (defaults to the scenario's setting)
        #[arg(long)]
        max_search_months: Option<u32>,

        /// Shrink every search axis to its small fixed set
        #[arg(long)]
        test_mode: bool,
    },
    /// Write the amortization schedule for the scenario's loan
    Schedule {
        /// Extra principal paid every month
        #[arg(long, default_value_t = 0.0)]
        extra_payment: f64,

        /// Output CSV path
        #[arg(long, default_value = "amortization_schedule.csv")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = &cli.brackets {
        config.tax = TaxConfig::from_csv_path(path)
            .with_context(|| format!("loading bracket table from {}", path.display()))?;
    }

    match cli.command {
        Command::Project { output } => run_projection(config, &output),
        Command::Optimize {
            max_search_months,
            test_mode,
        } => run_optimizer(config, max_search_months, test_mode),
        Command::Schedule {
            extra_payment,
            output,
        } => run_schedule(config, extra_payment, &output),
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<ScenarioConfig> {
    match path {
        Some(path) => {
            let payload = std::fs::read_to_string(path)
                .with_context(|| format!("reading scenario from {}", path.display()))?;
            Ok(ScenarioConfig::from_json(&payload)?)
        }
        None => {
            info!("no scenario file given, using the demo scenario");
            Ok(demo_scenario())
        }
    }
}

/// Demo scenario matching the dashboard's default inputs
fn demo_scenario() -> ScenarioConfig {
    ScenarioConfig {
        principal: 300_000.0,
        annual_rate: 0.045,
        term_years: 30.0,
        monthly_income: 8_000.0,
        monthly_expenses: 4_000.0,
        home_appreciation_rate: 0.03,
        house_value: 200_000.0,
        house_purchase_price: 150_000.0,
        house_appreciation_rate: 0.03,
        house_rent_income: 1_500.0,
        securities_value: 150_000.0,
        securities_growth_rate: 0.07,
        securities_quarterly_dividend: 750.0,
        savings_initial: 10_000.0,
        savings_interest_rate: 0.015,
        inflation_rate: 0.02,
        apply_inflation_to_income: true,
        apply_inflation_to_expenses: true,
        apply_inflation_to_rent: true,
        ..Default::default()
    }
}

fn run_projection(config: ScenarioConfig, output: &std::path::Path) -> anyhow::Result<()> {
    let payment = monthly_payment(config.principal, config.annual_rate, config.term_years);

    println!("Mortgage Planner");
    println!("================\n");
    println!("Loan: ${:.2} at {:.2}% over {} years", config.principal, config.annual_rate * 100.0, config.term_years);
    println!("Monthly payment: ${:.2}\n", payment);

    let metrics = affordability::assess(
        config.monthly_income,
        config.monthly_expenses,
        payment,
        config.house_rent_income,
        config.securities_monthly_sell,
    );
    println!(
        "Affordability: front-end {:.1}% / back-end {:.1}% -> {}",
        metrics.front_end_ratio,
        metrics.back_end_ratio,
        if metrics.affordable { "affordable" } else { "not affordable" },
    );
    println!();

    let engine = ProjectionEngine::new(config);
    let result = engine.project();

    // Console preview of the first two years of net worth
    println!(
        "{:>5} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Month", "Income", "HouseSell", "Rent", "Securities", "Combo", "PropertyValue"
    );
    println!("{}", "-".repeat(96));
    for record in result.records.iter().take(25) {
        println!(
            "{:>5} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            record.month,
            record.strategy(Strategy::Income).net_worth,
            record.strategy(Strategy::HouseSell).net_worth,
            record.strategy(Strategy::Rent).net_worth,
            record.strategy(Strategy::Securities).net_worth,
            record.strategy(Strategy::Combo).net_worth,
            record.property_value,
        );
    }
    if result.records.len() > 25 {
        println!("... ({} more months)", result.records.len() - 25);
    }

    write_csv(&result, output)?;
    println!("\nFull results written to: {}", output.display());

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total months: {}", summary.total_months);
    for strategy in Strategy::ALL {
        println!(
            "  {:<12} net worth ${:>14.2}   tax paid ${:>12.2}",
            strategy,
            summary.final_net_worth[strategy.index()],
            summary.total_tax_paid[strategy.index()],
        );
    }
    println!(
        "  Best strategy: {} (${:.2})",
        summary.best_strategy, summary.best_net_worth
    );

    Ok(())
}

fn write_csv(result: &ProjectionResult, output: &std::path::Path) -> anyhow::Result<()> {
    let mut file = File::create(output)
        .with_context(|| format!("creating output file {}", output.display()))?;

    let mut header = vec![
        "Month".to_string(),
        "PropertyValue".to_string(),
        "ExistingHouseValue".to_string(),
        "InflationMultiplier".to_string(),
        "AdjustedIncome".to_string(),
        "AdjustedExpenses".to_string(),
        "AdjustedRent".to_string(),
        "DividendPaid".to_string(),
    ];
    for strategy in Strategy::ALL {
        for column in [
            "Balance",
            "Securities",
            "Savings",
            "NetWorth",
            "Cashflow",
            "TaxPaid",
        ] {
            header.push(format!("{}_{}", strategy, column));
        }
    }
    writeln!(file, "{}", header.join(","))?;

    for record in &result.records {
        let mut row = vec![
            record.month.to_string(),
            format!("{:.2}", record.property_value),
            format!("{:.2}", record.existing_house_value),
            format!("{:.6}", record.inflation_multiplier),
            format!("{:.2}", record.adjusted_income),
            format!("{:.2}", record.adjusted_expenses),
            format!("{:.2}", record.adjusted_rent),
            format!("{:.2}", record.dividend_paid),
        ];
        for strategy in Strategy::ALL {
            let cells = record.strategy(strategy);
            row.push(format!("{:.2}", cells.remaining_balance));
            row.push(format!("{:.2}", cells.securities_value));
            row.push(format!("{:.2}", cells.savings_value));
            row.push(format!("{:.2}", cells.net_worth));
            row.push(format!("{:.2}", cells.monthly_cashflow));
            row.push(format!("{:.2}", cells.tax_paid));
        }
        writeln!(file, "{}", row.join(","))?;
    }

    Ok(())
}

fn run_schedule(
    config: ScenarioConfig,
    extra_payment: f64,
    output: &std::path::Path,
) -> anyhow::Result<()> {
    let house = config.house();
    let schedule = amortization_schedule(
        config.principal,
        config.annual_rate,
        config.term_years,
        extra_payment,
        Some(&house),
    );

    let mut file = File::create(output)
        .with_context(|| format!("creating output file {}", output.display()))?;
    writeln!(
        file,
        "Month,Payment,Principal,Interest,LumpSum,RemainingBalance,TotalInterestPaid"
    )?;
    for row in &schedule {
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.month,
            row.payment,
            row.principal,
            row.interest,
            row.lump_sum,
            row.remaining_balance,
            row.total_interest_paid,
        )?;
    }

    let total_interest = schedule.last().map(|r| r.total_interest_paid).unwrap_or(0.0);
    println!("{} rows written to {}", schedule.len(), output.display());
    println!("Total interest: ${:.2}", total_interest);

    Ok(())
}

fn run_optimizer(
    config: ScenarioConfig,
    max_search_months: Option<u32>,
    test_mode: bool,
) -> anyhow::Result<()> {
    let months = max_search_months.unwrap_or(config.max_search_months);
    let test_mode = test_mode || config.test_mode;

    println!("Searching strategy grid ({} months, test_mode={})...\n", months, test_mode);

    let baseline = ProjectionEngine::new(config.clone())
        .project()
        .final_net_worth(Strategy::Income);

    let optimizer = StrategyOptimizer::new(config);
    let optimal = optimizer.optimize(months, test_mode);

    println!("Optimal strategy: {}", optimal.strategy);
    match optimal.house_sell_month {
        m if m < 0 => println!("  House: keep"),
        m => println!("  House: sell at month {} -> {:?}", m, optimal.sale_destination),
    }
    if optimal.securities_sell_month > 0 {
        println!("  Securities: sell all at month {}", optimal.securities_sell_month);
    } else if optimal.securities_monthly_sell > 0.0 {
        println!("  Securities: sell ${:.2}/month", optimal.securities_monthly_sell);
    } else {
        println!("  Securities: hold");
    }
    println!("  Final net worth: ${:.2}", optimal.final_net_worth);
    println!("  Tax paid: ${:.2}", optimal.tax_paid);
    println!(
        "  Improvement over no-action baseline: ${:.2}",
        optimal.final_net_worth - baseline
    );

    Ok(())
}
