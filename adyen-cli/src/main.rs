//! Adyen CLI
//!
//! Command-line access to the Adyen integration: stored payment details,
//! origin keys, cloud terminals and authorise request previews.

mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adyen_client::{AdyenApi, Endpoints};
use adyen_method::{CcFormData, CcMethod, RequestContext};
use adyen_store::{MemoryCache, MemorySession};
use adyen_types::{Payment, RecurringType, StaticConfig, StoreId};

#[derive(Parser)]
#[command(name = "adyen")]
#[command(author, version, about = "Adyen integration CLI", long_about = None)]
struct Cli {
    /// JSON configuration file; `ADYEN_*` variables are used when absent
    #[arg(long, env = "ADYEN_CONFIG")]
    config: Option<PathBuf>,

    /// Store whose configuration applies
    #[arg(long, env = "ADYEN_STORE", default_value_t = 0)]
    store: u32,

    /// Send every request to this base URL instead of Adyen
    #[arg(long, env = "ADYEN_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stored payment details of a shopper
    Contracts {
        #[command(subcommand)]
        action: ContractCommands,
    },
    /// Fetch the checkout origin key for the store front
    OriginKey,
    /// Cloud terminal operations
    Terminals {
        #[command(subcommand)]
        action: TerminalCommands,
    },
    /// Authorise request operations
    Request {
        #[command(subcommand)]
        action: RequestCommands,
    },
    /// List the card types enabled for the store
    CcTypes,
}

#[derive(Subcommand)]
enum ContractCommands {
    /// List stored details (ONECLICK and RECURRING merged)
    List {
        #[arg(long)]
        shopper: String,
        /// Only list one contract type (ONECLICK or RECURRING)
        #[arg(long = "type")]
        recurring_type: Option<String>,
    },
    /// Show one stored detail
    Get {
        #[arg(long)]
        shopper: String,
        #[arg(long)]
        detail: String,
    },
    /// Disable a stored detail
    Disable {
        #[arg(long)]
        shopper: String,
        #[arg(long)]
        detail: String,
    },
}

#[derive(Subcommand)]
enum TerminalCommands {
    /// List connected terminals
    List,
    /// Send a terminal API request read from a JSON file
    Sync {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum RequestCommands {
    /// Build the authorise request for a card payment read from a JSON file
    Build {
        #[arg(long)]
        file: PathBuf,
        /// Build as a back-office order
        #[arg(long)]
        admin: bool,
    },
}

/// Input of `request build`.
#[derive(Deserialize)]
struct BuildInput {
    payment: Payment,
    amount: Decimal,
    /// Card form as posted at checkout; run through the method first.
    #[serde(default)]
    form: Option<CcFormData>,
    #[serde(default)]
    logged_in: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let store = StoreId::new(cli.store);
    let config = Arc::new(config::load(cli.config.as_deref())?);

    let mut api = AdyenApi::new(config.clone(), Arc::new(MemoryCache::new()));
    if let Some(endpoint) = &cli.endpoint {
        api = api.with_endpoints(Endpoints::uniform(endpoint.as_str()));
    }

    match cli.command {
        Commands::Contracts { action } => match action {
            ContractCommands::List {
                shopper,
                recurring_type: None,
            } => {
                let contracts = api.list_recurring_contracts(&shopper, store).await?;
                print_json(&contracts)?;
            }
            ContractCommands::List {
                shopper,
                recurring_type: Some(recurring_type),
            } => {
                let recurring_type: RecurringType = recurring_type.parse()?;
                let contracts = api
                    .list_recurring_contract_by_type(&shopper, store, recurring_type)
                    .await?;
                print_json(&contracts)?;
            }
            ContractCommands::Get { shopper, detail } => {
                match api
                    .get_recurring_contract_detail(&shopper, &detail, store)
                    .await?
                {
                    Some(contract) => print_json(&contract)?,
                    None => anyhow::bail!("No stored detail {detail} for shopper {shopper}"),
                }
            }
            ContractCommands::Disable { shopper, detail } => {
                api.disable_recurring_contract(&detail, &shopper, store)
                    .await?;
                print_json(&json!({ "disabled": detail }))?;
            }
        },

        Commands::OriginKey => {
            let key = api.origin_keys(store).await;
            if key.is_empty() {
                anyhow::bail!("No origin key available, see the log for details");
            }
            print_json(&json!({ "originKey": key }))?;
        }

        Commands::Terminals { action } => match action {
            TerminalCommands::List => {
                let terminals = api.retrieve_connected_terminals(store).await?;
                print_json(&terminals)?;
            }
            TerminalCommands::Sync { file } => {
                let request: serde_json::Value = read_json(&file)?;
                let response = api.do_request_sync(&request, store).await?;
                print_json(&response)?;
            }
        },

        Commands::Request { action } => match action {
            RequestCommands::Build { file, admin } => {
                let input: BuildInput = read_json(&file)?;
                let request = build_request(config, store, input, admin).await?;
                print_json(&request)?;
            }
        },

        Commands::CcTypes => {
            let method = CcMethod::new(config, MemorySession::new(), store);
            print_json(&method.available_cc_types())?;
        }
    }

    Ok(())
}

async fn build_request(
    config: Arc<StaticConfig>,
    store: StoreId,
    input: BuildInput,
    admin: bool,
) -> Result<adyen_types::PaymentRequest> {
    let method = CcMethod::new(config, MemorySession::new(), store);
    let mut payment = input.payment;

    if let Some(form) = &input.form {
        let assigned = method
            .assign_data(form, &mut payment, input.logged_in)
            .await?;
        tracing::debug!(recollect_totals = assigned.recollect_totals, "form assigned");
    }
    method.validate(&payment)?;

    let context = RequestContext {
        is_admin: admin,
        ..Default::default()
    };
    Ok(method
        .build_payment_request(&payment, input.amount, context)
        .await?)
}
