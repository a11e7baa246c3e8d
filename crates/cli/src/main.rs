use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "impensa", version, about = "Expense tracking with tolerant CSV import")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Preview and import a CSV export of expenses.
    Import(commands::ImportArgs),
    /// Manage expense categories.
    #[command(subcommand)]
    Categories(commands::CategoriesCmd),
    /// Manage saved column-mapping profiles.
    #[command(subcommand)]
    Profiles(commands::ProfilesCmd),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = config::Settings::load()?;

    let db_path = settings.db_path()?;
    let pool = impensa_storage::create_db(&db_path).await?;
    impensa_storage::seed_default_categories(&pool).await?;
    tracing::debug!("database ready at {}", db_path.display());

    match cli.command {
        Command::Import(args) => commands::run_import(&pool, args, &settings).await,
        Command::Categories(cmd) => commands::run_categories(&pool, cmd).await,
        Command::Profiles(cmd) => commands::run_profiles(&pool, cmd).await,
    }
}
