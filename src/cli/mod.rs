use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{EnvFilter, fmt};

use crate::application::OrderService;
use crate::client::OrdersClient;
use crate::config::{
    CLIENT_TIMEOUT, DEFAULT_API_URL, DEFAULT_BIND_ADDRESS, DEFAULT_DATABASE,
    DEFAULT_GENERATOR_INTERVAL_SECS, default_log_filter,
};
use crate::dashboard::{self, DashboardOptions};
use crate::io::DEFAULT_EXPORT_FILE;
use crate::{api, generator};

/// Fleetlytics - delivery order intake and analytics
#[derive(Parser)]
#[command(name = "fleetlytics")]
#[command(about = "Delivery order intake, pricing and analytics for a single-warehouse fleet")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the order intake API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
        bind: String,
    },

    /// Show the analytics dashboard for the orders stored behind the API
    Dashboard {
        /// Orders endpoint
        #[arg(long, default_value = DEFAULT_API_URL)]
        api_url: String,

        /// Only these vehicle labels (repeatable, e.g. --vehicle "3W EV")
        #[arg(long = "vehicle")]
        vehicles: Vec<String>,

        /// Only these priorities (repeatable)
        #[arg(long = "priority")]
        priorities: Vec<String>,

        /// First day to include (YYYY-MM-DD, defaults to the oldest order)
        #[arg(long)]
        from: Option<String>,

        /// Last day to include (YYYY-MM-DD, defaults to the newest order)
        #[arg(long)]
        to: Option<String>,

        /// Question such as "most expensive", "average cost", "vehicle performance"
        #[arg(short, long)]
        query: Option<String>,

        /// Write the filtered orders as CSV (file name defaults to delivery_analysis.csv)
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
        export: Option<PathBuf>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Post synthetic orders to the API
    Generate {
        /// Orders endpoint
        #[arg(long, default_value = DEFAULT_API_URL)]
        api_url: String,

        /// Seconds between orders
        #[arg(short, long, default_value_t = DEFAULT_GENERATOR_INTERVAL_SECS)]
        interval: u64,

        /// Stop after this many orders (runs forever if omitted)
        #[arg(short, long)]
        limit: Option<u64>,
    },

    /// List the orders stored in the local database
    Orders {
        /// Maximum number of orders to show (most recent)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        match self.command {
            Commands::Serve { bind } => {
                let service = OrderService::init(&self.database).await?;
                tracing::info!(database = %self.database, "order store ready");
                api::serve(&bind, Arc::new(service)).await?;
            }

            Commands::Dashboard {
                api_url,
                vehicles,
                priorities,
                from,
                to,
                query,
                export,
                format,
            } => {
                let options = DashboardOptions {
                    vehicles: non_empty(vehicles),
                    priorities: non_empty(priorities),
                    from_date: from
                        .map(|s| parse_date(&s))
                        .transpose()
                        .context("Invalid from date")?,
                    to_date: to
                        .map(|s| parse_date(&s))
                        .transpose()
                        .context("Invalid to date")?,
                    query,
                };
                let client = OrdersClient::new(api_url, CLIENT_TIMEOUT)?;
                dashboard::run(&client, &options, &format, export.as_deref()).await?;
            }

            Commands::Generate {
                api_url,
                interval,
                limit,
            } => {
                let client = OrdersClient::new(api_url, CLIENT_TIMEOUT)?;
                let mut rng = StdRng::from_entropy();
                tracing::info!(url = client.url(), interval, "generating orders");
                generator::run(&client, Duration::from_secs(interval), limit, &mut rng).await;
            }

            Commands::Orders { limit } => {
                let service = OrderService::connect(&self.database).await?;
                run_orders_command(&service, limit).await?;
                service.close().await;
            }
        }

        Ok(())
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));
    // a second init (tests, embedding) keeps the first subscriber
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

async fn run_orders_command(service: &OrderService, limit: Option<usize>) -> Result<()> {
    let orders = service.list_orders().await?;

    if orders.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    let skip = limit.map_or(0, |l| orders.len().saturating_sub(l));

    println!(
        "{:<12} {:<8} {:<6} {:>6} {:>9} {:>10}  CREATED",
        "ORDER", "PRIORITY", "VEHICLE", "WEIGHT", "KM", "COST"
    );
    println!("{}", "-".repeat(76));
    for order in orders.iter().skip(skip) {
        println!(
            "{:<12} {:<8} {:<6} {:>6} {:>9.2} {:>10.2}  {}",
            order.order_id,
            order.priority,
            order.vehicle.as_str(),
            order.weight,
            order.distance_km,
            order.delivery_cost,
            order.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!();
    println!("{} of {} orders", orders.len() - skip, service.count_orders().await?);

    Ok(())
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").context("Date must be in YYYY-MM-DD format")
}
