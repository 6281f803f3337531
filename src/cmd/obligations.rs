//! Obligations command - filings an entity owes and when they fall due

use crate::cmd::{read_entity, yes_no};
use chrono::{DateTime, Utc};
use clap::Args;
use complyc::core::{
    ComplianceObligation, CountryRegistry, Entity, ObligationEngine, ObligationParams, Registry,
};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ObligationsCommand {
    /// JSON file describing the entity ("-" for stdin)
    #[arg(short, long)]
    entity: PathBuf,

    /// Annual turnover in the country's currency (missing counts as zero)
    #[arg(short, long)]
    turnover: Option<Decimal>,

    /// Number of employees
    #[arg(long)]
    employees: Option<u32>,

    /// Calculate as of this instant (RFC 3339) instead of now
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

impl ObligationsCommand {
    pub fn exec(&self, registry: &Registry) -> anyhow::Result<()> {
        let entity = read_entity(&self.entity)?;
        log::info!("Calculating obligations for entity {} in {}", entity.id, entity.country);
        if !registry.is_supported(entity.country) {
            log::warn!(
                "Country {} is not supported, no obligations apply",
                entity.country
            );
        }

        let params = ObligationParams {
            annual_turnover: self.turnover,
            number_of_employees: self.employees,
        };
        let now = self.as_of.unwrap_or_else(Utc::now);
        let obligations =
            ObligationEngine::new(registry).calculate_obligations(&entity, &params, now);
        log::info!("{} obligations apply", obligations.len());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&obligations)?);
        } else {
            self.print_table(&entity, &obligations, now);
        }
        Ok(())
    }

    fn print_table(&self, entity: &Entity, obligations: &[ComplianceObligation], now: DateTime<Utc>) {
        println!();
        println!(
            "OBLIGATIONS FOR {} ({}, {}) as of {}",
            entity.display_name(),
            entity.country,
            entity.classify(),
            now.format("%Y-%m-%d %H:%M UTC")
        );
        println!();

        if obligations.is_empty() {
            println!("No obligations apply");
            return;
        }

        let rows: Vec<ObligationRow> = obligations.iter().map(ObligationRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }
}

#[derive(Debug, Clone, Tabled)]
struct ObligationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    obligation_type: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Frequency")]
    frequency: String,
    #[tabled(rename = "Due")]
    due_date: String,
    #[tabled(rename = "Days")]
    days_until_due: String,
    #[tabled(rename = "Docs")]
    requires_documentation: String,
    #[tabled(rename = "Automated")]
    automation_supported: String,
}

impl From<&ComplianceObligation> for ObligationRow {
    fn from(o: &ComplianceObligation) -> Self {
        ObligationRow {
            id: o.id.clone(),
            obligation_type: o.obligation_type.to_string(),
            description: o.description.clone(),
            frequency: o.frequency.to_string(),
            due_date: o.due_date.format("%Y-%m-%d").to_string(),
            days_until_due: o.days_until_due.to_string(),
            requires_documentation: yes_no(o.requires_documentation),
            automation_supported: yes_no(o.automation_supported),
        }
    }
}
