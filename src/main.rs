use checkout::application::checkout::CheckoutSession;
use checkout::application::controller::{SubmissionConfig, SubmitOutcome};
use checkout::domain::catalog::{Catalog, PlanId};
use checkout::domain::form::SubmissionStatus;
use checkout::domain::payment::{Field, PaymentMethod};
use checkout::domain::ports::PaymentGatewayBox;
use checkout::domain::purchase::PurchaseMode;
use checkout::domain::summary::summarize;
use checkout::error::CheckoutError;
use checkout::infrastructure::simulated::SimulatedGateway;
use checkout::interfaces::csv::catalog_reader::CatalogReader;
use checkout::interfaces::csv::summary_writer::SummaryWriter;
use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog CSV file (kind, id, name, price, description). Uses the
    /// built-in catalog when omitted.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Selection {
    /// Price a monthly subscription instead of a one-time purchase
    #[arg(long)]
    subscription: bool,

    /// Subscription plan (starter, pro, enterprise). Implies --subscription.
    #[arg(long)]
    plan: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    #[value(alias = "stripe")]
    Card,
    #[value(alias = "wallet")]
    Paypal,
}

impl From<Method> for PaymentMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Card => PaymentMethod::Card,
            Method::Paypal => PaymentMethod::RedirectWallet,
        }
    }
}

/// What `pay` prints: the outcome of the submit and the form status it left.
#[derive(Serialize)]
struct PayReport {
    #[serde(flatten)]
    outcome: SubmitOutcome,
    status: SubmissionStatus,
}

#[derive(Subcommand)]
enum Command {
    /// Print the order summary for a selection
    Quote {
        #[command(flatten)]
        selection: Selection,

        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Validate payment details and submit them to the simulated gateway
    Pay {
        #[command(flatten)]
        selection: Selection,

        #[arg(long, value_enum, default_value_t = Method::Card)]
        method: Method,

        /// Form value, e.g. --field cardNumber=4242424242424242. Repeatable.
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// Simulated gateway round trip in milliseconds
        #[arg(long, default_value_t = 1_500)]
        latency_ms: u64,

        /// Make the simulated gateway decline with this message
        #[arg(long)]
        decline: Option<String>,

        /// Give up on the gateway after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Reject a PayPal form whose confirmation email differs from the email
        #[arg(long)]
        require_matching_confirmation: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let catalog = Arc::new(load_catalog(cli.catalog.as_deref()).into_diagnostic()?);

    match cli.command {
        Command::Quote { selection, format } => {
            let mode = purchase_mode(&selection).into_diagnostic()?;
            let view = summarize(&mode, &catalog).into_diagnostic()?;
            match format {
                Format::Csv => {
                    let stdout = io::stdout();
                    let mut writer = SummaryWriter::new(stdout.lock());
                    writer.write_summary(&view).into_diagnostic()?;
                }
                Format::Json => {
                    println!("{}", serde_json::to_string_pretty(&view).into_diagnostic()?);
                }
            }
        }
        Command::Pay {
            selection,
            method,
            fields,
            latency_ms,
            decline,
            timeout_ms,
            require_matching_confirmation,
        } => {
            let method = PaymentMethod::from(method);

            let mut gateway = SimulatedGateway::new(Duration::from_millis(latency_ms));
            if let Some(message) = decline {
                gateway = gateway.with_decline(message);
            }
            let gateway: PaymentGatewayBox = Arc::new(gateway);

            let config = SubmissionConfig {
                timeout: timeout_ms.map(Duration::from_millis),
                require_matching_confirmation,
                ..SubmissionConfig::default()
            };

            let mut session = CheckoutSession::new(catalog, gateway, method, config);
            let mode = purchase_mode(&selection).into_diagnostic()?;
            if let PurchaseMode::Subscription { plan } = mode {
                session.choose_subscription();
                if let Some(plan) = plan {
                    session.select_plan(plan).into_diagnostic()?;
                }
            }

            for assignment in &fields {
                let (field, value) = parse_assignment(assignment).into_diagnostic()?;
                session.edit_field(field, value).await.into_diagnostic()?;
            }

            let outcome = session.submit().await.into_diagnostic()?;
            let report = PayReport {
                outcome,
                status: session.form().await.status,
            };
            println!("{}", serde_json::to_string(&report).into_diagnostic()?);
        }
    }

    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, CheckoutError> {
    match path {
        Some(path) => CatalogReader::new(File::open(path)?).read_catalog(),
        None => Ok(Catalog::standard()),
    }
}

fn purchase_mode(selection: &Selection) -> Result<PurchaseMode, CheckoutError> {
    let plan = selection
        .plan
        .as_deref()
        .map(str::parse::<PlanId>)
        .transpose()?;

    if selection.subscription || plan.is_some() {
        Ok(PurchaseMode::Subscription { plan })
    } else {
        Ok(PurchaseMode::OneTime)
    }
}

fn parse_assignment(assignment: &str) -> Result<(Field, &str), CheckoutError> {
    let (name, value) = assignment.split_once('=').ok_or_else(|| {
        CheckoutError::ValidationError(format!("expected NAME=VALUE, got '{assignment}'"))
    })?;
    Ok((name.parse()?, value))
}
