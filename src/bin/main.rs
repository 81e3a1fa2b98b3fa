//! Cubist CLI - warehouse load, cube build, and drill-down rollups
//!
//! Usage:
//!   cubist load [--config <cubist.toml>]
//!   cubist cube [--config <cubist.toml>]
//!   cubist rollup <goal> [--config <cubist.toml>]
//!
//! Examples:
//!   cubist load
//!   cubist cube
//!   cubist rollup year-month
//!   cubist rollup top-category

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use cubist::config::Settings;
use cubist::cube::{self, build_cube};
use cubist::dataset::{read_prepared, Dataset};
use cubist::loader::{self, LoadPlan};
use cubist::rollup;
use cubist::schema;
use cubist::warehouse::Warehouse;

#[derive(Parser)]
#[command(name = "cubist")]
#[command(about = "Cubist - Retail warehouse loader and OLAP cube engine")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "cubist.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the warehouse schema and full-reload the prepared datasets
    Load,

    /// Build the sales cube from the warehouse and write the artifact
    Cube,

    /// Run one drill-down rollup over the materialized cube
    Rollup {
        /// Analytical goal to run
        goal: RollupGoal,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RollupGoal {
    /// Total sales by year, then by month
    YearMonth,
    /// Payment-type breakdown over the trailing year
    Payment,
    /// Category × region breakdown and monthly trend over the trailing year
    CategoryRegion,
    /// Best-selling category per region over the trailing year
    TopCategory,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let settings = match Settings::load_or_default(&cli.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Load => cmd_load(&settings),
        Commands::Cube => cmd_cube(&settings),
        Commands::Rollup { goal } => cmd_rollup(&settings, goal),
    }
}

fn cmd_load(settings: &Settings) -> ExitCode {
    let mut warehouse = match Warehouse::open(&settings.paths.warehouse_db) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Warehouse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = schema::provision(&warehouse, &settings.paths.schema_file) {
        eprintln!("Schema error: {}", e);
        return ExitCode::FAILURE;
    }

    let plan = LoadPlan::warehouse_default();
    let mut datasets: Vec<Dataset> = Vec::new();
    for rel in plan.relations() {
        let path = settings.paths.prepared_file(rel.contract.relation);
        match read_prepared(&path, rel.contract) {
            Ok(dataset) => datasets.push(dataset),
            Err(e) => {
                eprintln!("Dataset error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    match loader::load(&mut warehouse, &plan, &datasets) {
        Ok(report) => {
            println!("Load complete:");
            for count in &report.rows {
                println!("  {:<12} {:>8} rows", count.relation, count.rows);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Load error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_cube(settings: &Settings) -> ExitCode {
    if !settings.paths.warehouse_db.exists() {
        eprintln!(
            "Warehouse not found at {}; run `cubist load` first",
            settings.paths.warehouse_db.display()
        );
        return ExitCode::FAILURE;
    }

    let warehouse = match Warehouse::open(&settings.paths.warehouse_db) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Warehouse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rows = match build_cube(&warehouse) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Cube error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cube::write_artifact(&settings.paths.cube_artifact, &rows) {
        Ok(()) => {
            println!(
                "Cube written: {} rows -> {}",
                rows.len(),
                settings.paths.cube_artifact.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Cube error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_rollup(settings: &Settings, goal: RollupGoal) -> ExitCode {
    let rows = match cube::read_artifact(&settings.paths.cube_artifact) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Cube error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match goal {
        RollupGoal::YearMonth => {
            println!("Total sales by year:");
            for r in rollup::total_sales_by_year(&rows) {
                println!("  {:<8} {:>14.2}", r.year, r.total_sales);
            }
            println!();
            println!("Total sales by month:");
            for r in rollup::total_sales_by_month(&rows) {
                println!("  {:<8} {:>14.2}", r.month.to_string(), r.total_sales);
            }
        }
        RollupGoal::Payment => {
            let recent = rollup::recency_filter(&rows);
            println!("Payment types (trailing year):");
            for r in rollup::sales_by_payment_type(&recent) {
                println!(
                    "  {:<16} {:>14.2} {:>8} txns",
                    r.payment_type, r.total_sales, r.transaction_count
                );
            }
        }
        RollupGoal::CategoryRegion => {
            let recent = rollup::recency_filter(&rows);
            println!("Category x region (trailing year):");
            for r in rollup::sales_by_category_and_region(&recent) {
                println!(
                    "  {:<16} {:<12} {:>14.2}",
                    r.product_category, r.region, r.total_sales
                );
            }
            println!();
            println!("Monthly trend by category:");
            for r in rollup::monthly_sales_by_category(&recent) {
                println!(
                    "  {:<8} {:<16} {:>14.2}",
                    r.month.to_string(),
                    r.product_category,
                    r.total_sales
                );
            }
        }
        RollupGoal::TopCategory => {
            let recent = rollup::recency_filter(&rows);
            println!("Top category per region (trailing year):");
            for r in rollup::top_category_per_region(&recent) {
                println!(
                    "  {:<12} {:<16} {:>14.2}",
                    r.region, r.product_category, r.total_sales
                );
            }
        }
    }

    ExitCode::SUCCESS
}
