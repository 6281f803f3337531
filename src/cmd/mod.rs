pub mod countries;
pub mod obligations;
pub mod schema;
pub mod status;
pub mod validate;

use anyhow::Context;
use complyc::core::{
    read_obligations_json, ComplianceObligation, Entity, EntityInput, Registry,
};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Builtin registry, or the one in `path` when given
pub fn load_registry(path: Option<&Path>) -> anyhow::Result<Registry> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open registry {}", path.display()))?;
            let registry = Registry::from_reader(BufReader::new(file))
                .with_context(|| format!("Invalid registry {}", path.display()))?;
            Ok(registry)
        }
        None => Ok(Registry::builtin()),
    }
}

/// Read an entity (JSON) from a file, or stdin with "-"
pub fn read_entity(path: &Path) -> anyhow::Result<Entity> {
    let input = read_input(path)?;
    let input: EntityInput = serde_json::from_slice(&input)
        .with_context(|| format!("Failed to parse entity from {}", path.display()))?;
    let entity = Entity::try_from(input)?;
    Ok(entity)
}

/// Read tracked obligations (JSON array) from a file, or stdin with "-"
pub fn read_obligations(path: &Path) -> anyhow::Result<Vec<ComplianceObligation>> {
    let input = read_input(path)?;
    let obligations = read_obligations_json(io::Cursor::new(input))
        .with_context(|| format!("Failed to parse obligations from {}", path.display()))?;
    Ok(obligations)
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        let mut reader = BufReader::new(stdin.lock());
        reader.read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
    } else {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        BufReader::new(file).read_to_end(&mut buffer)?;
    }
    Ok(buffer)
}

/// Yes/no cell for table output
pub fn yes_no(value: bool) -> String {
    let cell = if value { "yes" } else { "no" };
    cell.to_string()
}
