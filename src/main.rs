//! Command line front-end for the CRM dashboard core.

use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use config::Config;
use dotenvy::dotenv;
use serde_json::Value;
use thiserror::Error;

use crm_dashboard::domain::user::LoginCredentials;
use crm_dashboard::exchange::{DirectorySink, ExportFormat, ImportError, read_upload};
use crm_dashboard::forms::activity::ActivityForm;
use crm_dashboard::forms::customer::CustomerForm;
use crm_dashboard::forms::deal::DealForm;
use crm_dashboard::forms::{FieldErrors, FormSchema, validate_form};
use crm_dashboard::models::config::AppConfig;
use crm_dashboard::repository::InMemoryRepository;
use crm_dashboard::repository::errors::RepositoryError;
use crm_dashboard::search::SearchFilter;
use crm_dashboard::services::ServiceError;
use crm_dashboard::services::customers::{self, CustomersQuery};
use crm_dashboard::services::deals::{self, DealsQuery};
use crm_dashboard::services::imports::{self, ImportFormat};
use crm_dashboard::session::{AuthError, AuthState, FileSessionStore};

#[derive(Parser, Debug)]
#[command(name = "crm", version, about = "CRM dashboard command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export customers or deals to a file.
    Export(ExportArgs),
    /// Import customers from a CSV or JSON file.
    Import(ImportArgs),
    /// Check a JSON payload against one of the form schemas.
    Validate(ValidateArgs),
    Login { email: String, password: String },
    Logout,
    Whoami,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Collection {
    Customers,
    Deals,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportFormatArg {
    Csv,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ImportFormatArg {
    Csv,
    Json,
    QuotedCsv,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Schema {
    Customer,
    Deal,
    Activity,
    Filter,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(value_enum)]
    collection: Collection,
    #[arg(long, value_enum, default_value_t = ExportFormatArg::Csv)]
    format: ExportFormatArg,
    #[arg(long)]
    search: Option<String>,
    /// Customer status or deal stage; `all` disables the filter.
    #[arg(long)]
    status: Option<String>,
    /// Overrides the configured export directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ImportArgs {
    #[arg(value_enum)]
    collection: ImportCollection,
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = ImportFormatArg::Csv)]
    format: ImportFormatArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ImportCollection {
    Customers,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(value_enum)]
    schema: Schema,
    /// JSON object to validate.
    payload: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(FieldErrors),
}

fn open_repository(config: &AppConfig) -> Result<InMemoryRepository, RepositoryError> {
    if config.seed_data {
        InMemoryRepository::with_sample_data()
    } else {
        Ok(InMemoryRepository::new())
    }
}

fn check<T: FormSchema>(payload: &Value) -> Result<(), FieldErrors> {
    validate_form::<T>(payload).map(|_| ())
}

fn run(cli: Cli, config: &AppConfig) -> Result<(), CliError> {
    let mut session = AuthState::new(Box::new(FileSessionStore::new(&config.session_file)));
    session.initialize()?;

    match cli.command {
        Commands::Login { email, password } => {
            let user = session.login(&LoginCredentials { email, password })?;
            println!("Signed in as {} ({})", user.name, user.email);
        }
        Commands::Logout => {
            session.logout()?;
            println!("Signed out");
        }
        Commands::Whoami => match session.user() {
            Some(user) => println!("{} <{}> {:?}", user.name, user.email, user.role),
            None => println!("Not signed in"),
        },
        Commands::Validate(args) => {
            let payload: Value = serde_json::from_str(&args.payload)?;
            let result = match args.schema {
                Schema::Customer => check::<CustomerForm>(&payload),
                Schema::Deal => check::<DealForm>(&payload),
                Schema::Activity => check::<ActivityForm>(&payload),
                Schema::Filter => check::<SearchFilter>(&payload),
            };
            match result {
                Ok(()) => println!("Valid"),
                Err(errors) => {
                    for error in errors.errors() {
                        println!("{error}");
                    }
                    return Err(CliError::Invalid(errors));
                }
            }
        }
        Commands::Export(args) => {
            let repo = open_repository(config)?;
            let sink = DirectorySink::new(
                args.out
                    .unwrap_or_else(|| PathBuf::from(&config.export_dir)),
            );
            let format = match args.format {
                ExportFormatArg::Csv => ExportFormat::Csv,
                ExportFormatArg::Json => ExportFormat::Json,
            };

            let path = match args.collection {
                Collection::Customers => customers::export_customers(
                    &session,
                    &repo,
                    CustomersQuery {
                        search: args.search,
                        status: args.status,
                    },
                    format,
                    &sink,
                )?,
                Collection::Deals => deals::export_deals(
                    &session,
                    &repo,
                    DealsQuery {
                        search: args.search,
                        stage: args.status,
                    },
                    format,
                    &sink,
                )?,
            };

            match path {
                Some(path) => println!("Exported to {}", path.display()),
                None => println!("No data to export"),
            }
        }
        Commands::Import(args) => {
            let ImportCollection::Customers = args.collection;
            let repo = open_repository(config)?;
            let text = read_upload(&args.file)?;
            let format = match args.format {
                ImportFormatArg::Csv => ImportFormat::Csv,
                ImportFormatArg::Json => ImportFormat::Json,
                ImportFormatArg::QuotedCsv => ImportFormat::QuotedCsv,
            };

            let report = imports::import_customers(&session, &repo, &text, format)?;
            println!(
                "Imported {} of {} customers",
                report.created.len(),
                report.total_rows()
            );
            for failure in &report.failures {
                println!("row {}: {}", failure.row, failure.errors.join("; "));
            }
        }
    }

    Ok(())
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let app_config = match settings.try_deserialize::<AppConfig>() {
        Ok(app_config) => app_config,
        Err(err) => {
            log::error!("Error loading app config: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(Cli::parse(), &app_config) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
