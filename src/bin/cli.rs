//! Trade Similarity CLI
//!
//! Command-line client for a running dashboard server:
//! - List selector options
//! - Print a heatmap slice or a slope chart
//! - Check status
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use trade_similarity::api::dto::{DatasetResponse, HealthResponse};
use trade_similarity::binder::{HeatmapSpec, SelectorOptions, SlopeChartSpec};

#[derive(Parser)]
#[command(name = "tsi-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query a Trade Similarity Index dashboard server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8050", global = true)]
    pub api_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List years, flow types and partners
    Options,

    /// Show the reporter x partner matrix for one flow and year
    Heatmap {
        /// EXPORT or IMPORT (default: server default)
        #[arg(long)]
        flow: Option<String>,
        /// Year label (default: server default)
        #[arg(long)]
        year: Option<String>,
    },

    /// Show new-member-state series against one partner
    Slope {
        /// EXPORT or IMPORT (default: server default)
        #[arg(long)]
        flow: Option<String>,
        /// Partner code, e.g. RU (default: server default)
        #[arg(long)]
        partner: Option<String>,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Options => {
            let url = format!("{}/api/v1/options", cli.api_url);
            let response = get(&client, &url, &[]).await?;

            match cli.format {
                OutputFormat::Json => println!("{}", response.text().await?),
                format => {
                    let options: SelectorOptions = response.json().await?;
                    print_options(&options, format)?;
                }
            }
        }

        Commands::Heatmap { flow, year } => {
            let query = params(&[("flow", flow), ("year", year)]);

            match cli.format {
                OutputFormat::Csv => {
                    let url = format!("{}/api/v1/heatmap/export", cli.api_url);
                    print!("{}", get(&client, &url, &query).await?.text().await?);
                }
                OutputFormat::Json => {
                    let url = format!("{}/api/v1/heatmap", cli.api_url);
                    println!("{}", get(&client, &url, &query).await?.text().await?);
                }
                OutputFormat::Table => {
                    let url = format!("{}/api/v1/heatmap", cli.api_url);
                    let spec: HeatmapSpec = get(&client, &url, &query).await?.json().await?;
                    print_heatmap(&spec);
                }
            }
        }

        Commands::Slope { flow, partner } => {
            let query = params(&[("flow", flow), ("partner", partner)]);
            let url = format!("{}/api/v1/slopechart", cli.api_url);
            let response = get(&client, &url, &query).await?;

            match cli.format {
                OutputFormat::Json => println!("{}", response.text().await?),
                format => {
                    let spec: SlopeChartSpec = response.json().await?;
                    print_slope(&spec, format)?;
                }
            }
        }

        Commands::Status => {
            let health_url = format!("{}/health", cli.api_url);
            let health: HealthResponse = match client.get(&health_url).send().await {
                Ok(resp) if resp.status().is_success() => resp.json().await?,
                Ok(resp) => bail!("API returned error: {}", resp.status()),
                Err(e) => {
                    eprintln!("Cannot connect to dashboard server at {}", cli.api_url);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin tsi-server");
                    return Err(e.into());
                }
            };

            let dataset_url = format!("{}/api/v1/dataset", cli.api_url);
            let dataset: DatasetResponse = get(&client, &dataset_url, &[]).await?.json().await?;

            if cli.format == OutputFormat::Json {
                let combined = serde_json::json!({ "health": health, "dataset": dataset });
                println!("{}", serde_json::to_string_pretty(&combined)?);
            } else {
                println!("Trade Similarity dashboard v{}", health.version);
                println!();
                println!("API Status: {}", health.status);
                println!("Dataset:    {}", health.dataset);
                println!();
                println!("Tables:");
                println!("  Years:            {}", dataset.years.join(", "));
                println!("  Partners:         {}", dataset.partners.join(", "));
                println!("  Member states:    {}", dataset.stats.member_states);
                println!("  New members:      {}", dataset.new_member_states.join(", "));
                println!("  Heatmap slices:   {}", dataset.stats.heatmap_slices);
                println!("  Slope slices:     {}", dataset.stats.slope_slices);
                println!("  Loaded at:        {}", dataset.stats.loaded_at);
                println!();
                println!("Uptime: {}", format_duration(health.uptime_seconds));
            }
        }

        Commands::Config { output } => {
            let config = trade_similarity::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// GET with query parameters, turning non-2xx answers into errors
async fn get(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
) -> anyhow::Result<reqwest::Response> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    if !response.status().is_success() {
        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = body["error"]["message"].as_str().unwrap_or("no details");
        bail!("Request failed ({}): {}", status, message);
    }

    Ok(response)
}

fn params<'a>(pairs: &[(&'a str, Option<String>)]) -> Vec<(&'a str, String)> {
    pairs
        .iter()
        .filter_map(|(k, v)| v.clone().map(|v| (*k, v)))
        .collect()
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn format_value(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn print_options(options: &SelectorOptions, format: OutputFormat) -> anyhow::Result<()> {
    let groups = [
        ("year", &options.years),
        ("flow", &options.flows),
        ("partner", &options.partners),
    ];

    if format == OutputFormat::Csv {
        return write_options_csv(options, std::io::stdout().lock());
    }

    for (control, items) in groups {
        println!("{}:", control);
        for item in items.iter() {
            println!("  {:<8} {}", item.value, item.label);
        }
    }
    println!();
    println!(
        "Defaults: year={} flow={} partner={}",
        options.defaults.year, options.defaults.flow, options.defaults.partner
    );
    Ok(())
}

fn write_options_csv<W: std::io::Write>(options: &SelectorOptions, out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["control", "value", "label"])?;

    let groups = [
        ("year", &options.years),
        ("flow", &options.flows),
        ("partner", &options.partners),
    ];
    for (control, items) in groups {
        for item in items.iter() {
            writer.write_record([control, item.value.as_str(), item.label.as_str()])?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn print_heatmap(spec: &HeatmapSpec) {
    let matrix = spec.matrix();

    println!("{}", spec.layout.title.text);
    println!();

    // Header
    print!("{:<8}", "");
    for partner in &matrix.x {
        print!(" | {:<5}", partner);
    }
    println!();

    // Separator
    println!("{}", "-".repeat(8 + matrix.x.len() * 8));

    // Data rows
    for (reporter, row) in matrix.y.iter().zip(&matrix.z) {
        print!("{:<8}", reporter);
        for value in row {
            print!(" | {:<5}", format_value(*value));
        }
        println!();
    }
}

fn print_slope(spec: &SlopeChartSpec, format: OutputFormat) -> anyhow::Result<()> {
    let years: Vec<&String> = spec
        .series()
        .next()
        .map(|s| s.x.iter().collect())
        .unwrap_or_default();

    if format == OutputFormat::Csv {
        return write_slope_csv(spec, std::io::stdout().lock());
    }

    println!("{}", spec.title);
    println!();

    if spec.data.is_empty() {
        println!("No series for this selection");
        return Ok(());
    }

    print!("{:<10}", "Reporter");
    for year in &years {
        print!(" | {:<5}", year);
    }
    println!();
    println!("{}", "-".repeat(10 + years.len() * 8));

    for trace in &spec.data {
        let marker = if trace.emphasized { "*" } else { "" };
        print!("{:<10}", format!("{}{}", trace.series.name, marker));
        for (_, value) in trace.series.points() {
            print!(" | {:<5}", format_value(Some(value)));
        }
        println!();
    }
    Ok(())
}

fn write_slope_csv<W: std::io::Write>(spec: &SlopeChartSpec, out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["reporter", "year", "value"])?;

    for series in spec.series() {
        for (year, value) in series.points() {
            writer.write_record([series.name.as_str(), year, value.to_string().as_str()])?;
        }
    }

    writer.flush()?;
    Ok(())
}
