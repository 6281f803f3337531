//! Schema command - print expected input formats

use clap::{Args, ValueEnum};
use complyc::core::{ComplianceObligation, EntityInput, RegistryConfig};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Input format to describe
    #[arg(value_enum, default_value = "entity")]
    input: SchemaInput,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaInput {
    /// Entity read by `obligations`
    Entity,
    /// Tracked obligation list read by `status`
    Obligations,
    /// Registry file accepted by `--registry`
    Registry,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = match self.input {
            SchemaInput::Entity => schema_for!(EntityInput),
            SchemaInput::Obligations => schema_for!(Vec<ComplianceObligation>),
            SchemaInput::Registry => schema_for!(RegistryConfig),
        };
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
