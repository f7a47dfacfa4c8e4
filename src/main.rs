//! GDP Dashboard - command line front end
//!
//! Prints the overview or analytics page for a GDP dataset and writes the
//! filtered CSV export.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gdp_dashboard::charts::{LineSeries, ViewMode};
use gdp_dashboard::dashboard::{AnalyticsPage, OverviewPage};
use gdp_dashboard::data::shared_dataset;
use gdp_dashboard::export::CsvExporter;
use gdp_dashboard::stats::format_currency;
use gdp_dashboard::{
    Dashboard, DashboardConfig, DashboardSession, DataProcessor, FilterSettings, Page, YearRange,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// GDP Dashboard Command-Line Interface
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GDP dataset (CSV); overrides the config file
    #[arg(short, long, env = "GDP_DATA", global = true)]
    data: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print pages as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Latest-year world map and top economies
    Overview,
    /// Filtered analytics page
    Analyze {
        /// First year (inclusive); defaults to the form default
        #[arg(long)]
        from: Option<i64>,
        /// Last year (inclusive); defaults to the latest year
        #[arg(long)]
        to: Option<i64>,
        /// Country to include; repeat for several
        #[arg(long = "country")]
        countries: Vec<String>,
        /// Plot growth % instead of absolute GDP
        #[arg(long)]
        growth: bool,
        /// Hide the KPI summary
        #[arg(long)]
        no_kpi: bool,
        /// Write the filtered table as CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// List the countries in the dataset
    Countries,
    /// List the years in the dataset
    Years,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }

    let base = shared_dataset(&config.data_path)
        .with_context(|| format!("loading dataset {}", config.data_path.display()))?;
    let dashboard = Dashboard::new(base, config);

    match args.command {
        Command::Overview => {
            let (page, _) = dashboard.render(DashboardSession::new(), None)?;
            print_page(&page, args.json)?;
        }
        Command::Analyze {
            from,
            to,
            countries,
            growth,
            no_kpi,
            export,
        } => {
            let defaults = dashboard.default_filters()?;
            let filters = FilterSettings {
                year_range: YearRange::new(
                    from.unwrap_or(defaults.year_range.start),
                    to.unwrap_or(defaults.year_range.end),
                ),
                countries: if countries.is_empty() {
                    defaults.countries
                } else {
                    countries
                },
                show_kpi: !no_kpi,
                show_download: false,
                view: if growth { ViewMode::Growth } else { ViewMode::Absolute },
            };

            let (page, _) = dashboard.render(DashboardSession::new(), Some(filters))?;
            if let (Page::Analytics(analytics), Some(path)) = (&page, &export) {
                CsvExporter::write_csv(&analytics.table, path)
                    .with_context(|| format!("writing export {}", path.display()))?;
            }
            print_page(&page, args.json)?;
        }
        Command::Countries => {
            for country in DataProcessor::countries(dashboard.dataset())? {
                println!("{country}");
            }
        }
        Command::Years => {
            for year in DataProcessor::years(dashboard.dataset())? {
                println!("{year}");
            }
        }
    }

    Ok(())
}

fn print_page(page: &Page, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }

    match page {
        Page::Overview(overview) => print_overview(overview),
        Page::Analytics(analytics) => print_analytics(analytics),
    }
    Ok(())
}

fn print_overview(page: &OverviewPage) {
    println!("Global Economic Snapshot");
    let Some(year) = page.year else {
        println!("No data.");
        return;
    };

    println!("\nTop {} Economies in {year}", page.top_economies.len());
    for (rank, entry) in page.top_economies.iter().enumerate() {
        println!("{:>3}. {:<30} {}", rank + 1, entry.country, format_currency(entry.value));
    }
    println!("\n{} countries on the {year} map.", page.world_map.len());
}

fn print_analytics(page: &AnalyticsPage) {
    let range = page.filters.year_range;
    println!("GDP Analytics Dashboard ({}-{})", range.start, range.end);
    println!("{} rows for {} countries", page.rows, page.filters.countries.len());

    if let Some(kpi) = &page.kpi {
        println!();
        for (label, value) in kpi.formatted() {
            println!("{label:<12} {value}");
        }
    }

    let title = match page.filters.view {
        ViewMode::Absolute => "Trend Over Years",
        ViewMode::Growth => "Trend Over Years (Growth %)",
    };
    print_lines(title, &page.trend, page.filters.view);

    println!("\nGDP Ranking - {}", range.end);
    for (bar, slice) in page.ranking.iter().zip(page.treemap.iter()) {
        println!(
            "  {:<30} {:>22} {:>6.1}%",
            bar.country,
            format_currency(bar.value),
            slice.fraction * 100.0
        );
    }

    println!("\nTop Performers by Growth ({})", range.end);
    for entry in &page.fastest_growing {
        println!("  {:<30} {:>8.2}%", entry.country, entry.value);
    }
}

fn print_lines(title: &str, lines: &[LineSeries], view: ViewMode) {
    println!("\n{title}");
    for line in lines {
        let values: Vec<String> = line
            .points
            .iter()
            .map(|p| match (p.value, view) {
                (None, _) => format!("{}: -", p.year),
                (Some(v), ViewMode::Absolute) => format!("{}: {}", p.year, format_currency(v)),
                (Some(v), ViewMode::Growth) => format!("{}: {v:.2}%", p.year),
            })
            .collect();
        println!("  {}: {}", line.country, values.join(", "));
    }
}
