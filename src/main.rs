mod cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "complyc",
    version,
    about = "Tax compliance obligations for UAE, KSA and Egypt entities"
)]
struct Cli {
    /// JSON registry file replacing the builtin country data
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate the obligations an entity has to file
    Obligations(cmd::obligations::ObligationsCommand),
    /// Summarize a tracked obligation list into a compliance score
    Status(cmd::status::StatusCommand),
    /// List supported countries or show one in detail
    Countries(cmd::countries::CountriesCommand),
    /// Check a national identifier against the country's format
    ValidateId(cmd::validate::ValidateIdCommand),
    /// Print the JSON Schema of an input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let registry = cmd::load_registry(cli.registry.as_deref())?;

    match cli.command {
        Commands::Obligations(obligations) => obligations.exec(&registry),
        Commands::Status(status) => status.exec(),
        Commands::Countries(countries) => countries.exec(&registry),
        Commands::ValidateId(validate) => validate.exec(&registry),
        Commands::Schema(schema) => schema.exec(),
    }
}
