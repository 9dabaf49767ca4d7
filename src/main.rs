//! Diecast storefront CLI

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::error;

use diecast::{
    api::{ApiError, HttpStorefrontApi},
    catalog::ModelId,
    config::StorefrontConfig,
    fixtures::{Fixture, FixtureError},
    observability,
    pricing::PriceSchedule,
    receipt::{self, ReceiptError},
    session::{Credentials, SessionError, SessionState},
    storefront::{BrowseCart, Storefront, StorefrontError},
};

/// Diecast storefront
#[derive(Debug, Parser)]
#[command(name = "diecast", about = "Order die-cast models from the storefront", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: StorefrontConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the pricing tiers
    Tiers,

    /// Price a selection against a fixture set without contacting the backend
    Quote {
        /// Fixture set name
        #[arg(short, long, default_value = "kerala")]
        fixture: String,

        /// Directory holding fixture sets
        #[arg(long, default_value = "./fixtures")]
        fixtures_dir: PathBuf,

        /// Selections as `ID=QTY`
        #[arg(short, long = "select", value_parser = parse_selection)]
        selections: Vec<(ModelId, i64)>,
    },

    /// List the catalog
    Catalog(LoginArgs),

    /// Place a new order
    Order {
        #[command(flatten)]
        login: LoginArgs,

        /// Selections as `ID=QTY`; quantities are capped at stock
        #[arg(short, long = "select", value_parser = parse_selection)]
        selections: Vec<(ModelId, i64)>,
    },

    /// Show past orders
    Orders(LoginArgs),

    /// Adjust the most recent order; the password is checked again before editing
    Edit {
        #[command(flatten)]
        login: LoginArgs,

        /// Adjustments as `ID=DELTA`, e.g. `m-001=-1`
        #[arg(short, long = "adjust", value_parser = parse_selection, allow_hyphen_values = true)]
        adjustments: Vec<(ModelId, i64)>,
    },
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Account name
    #[arg(short, long, env = "DIECAST_USERNAME")]
    username: String,

    /// Account password
    #[arg(short, long, env = "DIECAST_PASSWORD", hide_env_values = true)]
    password: String,
}

impl LoginArgs {
    fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("failed to write output")]
    Io(#[from] io::Error),
}

fn parse_selection(s: &str) -> Result<(ModelId, i64), String> {
    let (id, quantity) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=QTY, got {s}"))?;

    if id.is_empty() {
        return Err(format!("missing model id in {s}"));
    }

    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("invalid quantity in {s}: {err}"))?;

    Ok((ModelId::new(id.trim()), quantity))
}

/// Diecast CLI entry point
#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(err) = observability::init(&cli.config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {err}");
        }
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");

            #[expect(clippy::print_stderr, reason = "user-facing error report")]
            {
                eprintln!("Error: {err}");
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let login = match cli.command {
        Command::Tiers => {
            receipt::write_tiers(&mut out, &PriceSchedule::storefront())?;

            return Ok(());
        }
        Command::Quote {
            fixture,
            fixtures_dir,
            selections,
        } => return quote(&mut out, fixtures_dir, &fixture, &selections),
        Command::Catalog(ref login)
        | Command::Orders(ref login)
        | Command::Order { ref login, .. }
        | Command::Edit { ref login, .. } => login.credentials(),
    };

    let storefront = Storefront::new(HttpStorefrontApi::new(&cli.config.api.http())?);

    let mut state = SessionState::default();
    state.login(storefront.login(&login).await?);

    let session = state.require()?.clone();

    match cli.command {
        Command::Catalog(_) => {
            let browse = storefront.browse(&session).await?;

            receipt::write_tiers(&mut out, storefront.schedule())?;
            receipt::write_catalog(&mut out, browse.catalog(), None)?;
        }
        Command::Order { selections, .. } => {
            let mut browse = storefront.browse(&session).await?;

            for (id, quantity) in &selections {
                browse.adjust(id, *quantity);
            }

            let lines = browse.cart().materialize_selection(browse.catalog());
            let quote = storefront.quote(browse.cart())?;

            receipt::write_selection(&mut out, lines.as_deref().unwrap_or_default(), quote.as_ref())?;

            let request = storefront.submit(&session, browse).await?;

            writeln!(out, "Order submitted ({} lines)", request.selected_models.len())?;
        }
        Command::Orders(_) => {
            let history = storefront.history(&session).await?;

            receipt::write_history(&mut out, &history, storefront.schedule())?;
        }
        Command::Edit { login, adjustments } => {
            let grant = storefront.authorize_edit(&session, &login.password).await?;
            let mut edit = storefront.edit(&session, &grant).await?;

            for (id, delta) in &adjustments {
                edit.adjust(id, *delta);
            }

            let lines = edit.cart().materialize_selection(edit.catalog());
            let quote = storefront.quote(edit.cart())?;

            receipt::write_selection(&mut out, lines.as_deref().unwrap_or_default(), quote.as_ref())?;

            let order_id = edit.order_id().clone();
            let request = storefront.submit_edit(&session, edit).await?;

            writeln!(
                out,
                "Order {order_id} updated ({} lines)",
                request.selected_models.len()
            )?;
        }
        Command::Tiers | Command::Quote { .. } => {}
    }

    state.logout();

    Ok(())
}

fn quote(
    out: &mut impl Write,
    fixtures_dir: PathBuf,
    name: &str,
    selections: &[(ModelId, i64)],
) -> Result<(), CliError> {
    let fixture = Fixture::from_set_in(fixtures_dir, name)?;
    let schedule = fixture.schedule();

    let mut browse = BrowseCart::new(fixture.catalog().clone());

    for (id, quantity) in selections {
        browse.adjust(id, *quantity);
    }

    let lines = browse.cart().materialize_selection(browse.catalog());
    let quote = browse
        .cart()
        .quote(&schedule)
        .map_err(StorefrontError::from)?;

    receipt::write_tiers(out, &schedule)?;
    receipt::write_selection(out, lines.as_deref().unwrap_or_default(), quote.as_ref())?;

    Ok(())
}
