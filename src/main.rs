//! Glucotrack CLI
//!
//! Command-line interface for glucose analysis:
//! - Classify a single reading
//! - Analyze, trend and pattern-scan an exported history
//! - Build patient reports
//! - Evaluate the abnormal-reading alert rule

use anyhow::Context;
use clap::{Parser, Subcommand};
use glucotrack::config::generate_default_config;
use glucotrack::readings::parse_timestamp;
use glucotrack::{
    classify, load_readings, AlertRule, Analyzer, Config, InsightRecord, LoggingConfig, Reading,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "glucotrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Blood-glucose classification and insight engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a single reading
    Classify {
        /// Glucose value in mg/dL
        value: f64,
        /// Reading was taken fasting
        #[arg(long)]
        fasting: bool,
        /// Food eaten before the reading
        #[arg(long)]
        food: Option<String>,
        /// Activity before the reading
        #[arg(long)]
        activity: Option<String>,
        /// Hour of day (0-23)
        #[arg(long, default_value = "12")]
        hour: u32,
    },

    /// Summary, correlations and recommendations for a history
    Analyze {
        /// Readings file (.csv or .json)
        file: PathBuf,
    },

    /// Trend over a history
    Trends {
        /// Readings file (.csv or .json)
        file: PathBuf,
    },

    /// Weekly, meal, variability and consistency patterns
    Patterns {
        /// Readings file (.csv or .json)
        file: PathBuf,
    },

    /// Full patient report
    Report {
        /// Readings file (.csv or .json)
        file: PathBuf,
        /// Patient id
        #[arg(short, long)]
        user: i64,
    },

    /// Evaluate the abnormal-reading alert rule
    Alerts {
        /// Readings file (.csv or .json)
        file: PathBuf,
        /// Evaluation time (default: now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    let analyzer = Analyzer::new(config.analyzer.clone());

    match cli.command {
        Commands::Classify {
            value,
            fasting,
            food,
            activity,
            hour,
        } => {
            anyhow::ensure!(hour < 24, "hour must be between 0 and 23, got {}", hour);
            let result = classify(value, fasting, food.as_deref(), activity.as_deref(), hour);

            match cli.format.as_str() {
                "text" => {
                    println!("{} mg/dL: {} ({})", value, result.status, result.severity);
                    for insight in &result.insights {
                        println!("  [{}] {}", insight.priority, insight.message);
                    }
                }
                _ => {
                    let record = InsightRecord::from_classification(value, &result);
                    emit(&serde_json::json!({
                        "classification": result,
                        "insightRecord": record,
                    }))?;
                }
            }
        }

        Commands::Analyze { file } => {
            let readings = load(&file)?;
            let report = analyzer.analyze(&readings);

            match cli.format.as_str() {
                "text" => {
                    let summary = &report.summary;
                    println!("Readings: {}", summary.total_readings);
                    if let Some(avg) = summary.average_value {
                        println!("Average: {:.1} mg/dL", avg);
                    }
                    println!("Abnormal: {:.1}%", summary.abnormal_percentage);
                    println!();
                    for rec in &report.personalized_recommendations {
                        println!("[{}] {}: {}", rec.priority, rec.title, rec.message);
                    }
                }
                _ => emit(&report)?,
            }
        }

        Commands::Trends { file } => {
            let readings = load(&file)?;
            let trend = analyzer.analyze_trends(&readings);

            match cli.format.as_str() {
                "text" => println!("{}", trend.message),
                _ => emit(&trend)?,
            }
        }

        Commands::Patterns { file } => {
            let readings = load(&file)?;
            emit(&analyzer.identify_patterns(&readings))?;
        }

        Commands::Report { file, user } => {
            let readings = load(&file)?;
            emit(&analyzer.generate_report(user, &readings))?;
        }

        Commands::Alerts { file, now } => {
            let readings = load(&file)?;
            let now = match now.as_deref() {
                Some(raw) => parse_timestamp(raw)?,
                None => chrono::Utc::now().naive_utc(),
            };

            let rule = AlertRule::new(config.alerts.clone());
            match (rule.evaluate(&readings, now), cli.format.as_str()) {
                (Some(alert), "text") => println!("ALERT: {}", alert.reason),
                (None, "text") => println!("No alert"),
                (alert, _) => emit(&alert)?,
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("glucotrack={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load(path: &Path) -> anyhow::Result<Vec<Reading>> {
    load_readings(path).with_context(|| format!("loading readings from {}", path.display()))
}

fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
