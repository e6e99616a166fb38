//! `aba-notes` binary: serve the API, create the schema, or seed demo data.

use aba_notes_core::{seed, Database, Services};
use aba_notes_llm::NoteTaker;
use aba_notes_server::{create_app, AppState, Cli, Command, ServerConfig};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; variables may come from the environment.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aba_notes=info".parse()?)
                .add_directive("aba_notes_core=info".parse()?)
                .add_directive("aba_notes_llm=info".parse()?)
                .add_directive("aba_notes_server=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::InitDb => {
            open_database(&config)?;
            tracing::info!(path = %config.database_path.display(), "database initialized");
            Ok(())
        }
        Command::Seed(args) => {
            let services = Services::new(&open_database(&config)?);
            let summary = seed(&services, &args.into(), &mut rand::thread_rng());
            tracing::info!(
                patients = summary.patients,
                clinics = summary.clinics,
                bcbas = summary.bcbas,
                session_notes = summary.session_notes,
                "fake data generation completed"
            );
            Ok(())
        }
    }
}

fn open_database(config: &ServerConfig) -> anyhow::Result<Database> {
    Database::open(&config.database_path)
        .with_context(|| format!("opening database {}", config.database_path.display()))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let services = Services::new(&open_database(&config)?);
    let note_taker =
        NoteTaker::new(config.note_taker_config()).context("building model HTTP client")?;
    let app = create_app(AppState::new(services, note_taker), &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("-- Starting ABA notes API on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
