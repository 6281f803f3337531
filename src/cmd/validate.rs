//! Validate-id command - check a national identifier against its country's format

use clap::Args;
use complyc::core::{CountryCode, CountryRegistry, Registry};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateIdCommand {
    /// Country code (e.g. AE, SA, EG)
    country: CountryCode,

    /// Identifier kind (e.g. TRN, LICENSE, CR, VAT, TIN, ETA_ID)
    kind: String,

    /// Identifier value to check
    value: String,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    country: CountryCode,
    kind: &'a str,
    value: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<&'a str>,
}

impl ValidateIdCommand {
    pub fn exec(&self, registry: &Registry) -> anyhow::Result<()> {
        let format = registry.country(self.country).and_then(|c| {
            c.identifiers
                .iter()
                .find(|f| f.kind.eq_ignore_ascii_case(&self.kind))
        });
        let valid = registry.validate_identifier(self.country, &self.kind, &self.value);

        let output = ValidationOutput {
            country: self.country,
            kind: &self.kind,
            value: &self.value,
            valid,
            expected: format.map(|f| f.description.as_str()),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if valid {
            println!("\u{2713} {} is a valid {} {}", self.value, self.country, self.kind.to_uppercase());
        } else {
            match output.expected {
                Some(expected) => println!(
                    "\u{2717} {} is not a valid {} {}: expected {}",
                    self.value,
                    self.country,
                    self.kind.to_uppercase(),
                    expected
                ),
                None => println!(
                    "\u{2717} No {} identifier format known for {}",
                    self.kind.to_uppercase(),
                    self.country
                ),
            }
        }

        // Exit with code 1 if the identifier is invalid
        if !valid {
            std::process::exit(1);
        }
        Ok(())
    }
}
