//! Status command - compliance score and risk level of tracked obligations

use crate::cmd::read_obligations;
use chrono::{DateTime, Utc};
use clap::Args;
use complyc::core::{
    get_compliance_status, has_overdue_obligations, ComplianceObligation, ComplianceStatus,
    RiskLevel,
};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct StatusCommand {
    /// JSON array of tracked obligations ("-" for stdin)
    #[arg(short, long)]
    obligations: PathBuf,

    /// Evaluate as of this instant (RFC 3339) instead of now
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput {
    #[serde(flatten)]
    status: ComplianceStatus,
    has_overdue: bool,
    risk_level: RiskLevel,
}

impl StatusCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let obligations = read_obligations(&self.obligations)?;
        log::info!("Read {} tracked obligations", obligations.len());
        let now = self.as_of.unwrap_or_else(Utc::now);

        let status = get_compliance_status(&obligations, now);
        let output = StatusOutput {
            status,
            has_overdue: has_overdue_obligations(&obligations, now),
            risk_level: status.risk_level(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&output, &obligations, now);
        }

        // Exit with code 1 when the risk level is critical
        if output.risk_level == RiskLevel::Critical {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(output: &StatusOutput, obligations: &[ComplianceObligation], now: DateTime<Utc>) {
    let status = &output.status;

    println!();
    println!("COMPLIANCE STATUS as of {}", now.format("%Y-%m-%d %H:%M UTC"));
    println!();
    println!(
        "  Total: {} | Submitted: {} | Pending: {} | Overdue: {}",
        status.total, status.submitted, status.pending, status.overdue
    );
    println!("  Compliance score: {}%", status.compliance_score);
    println!("  Risk level: {}", output.risk_level);
    println!();

    let rows: Vec<StatusRow> = obligations
        .iter()
        .filter(|o| !o.status.is_filed())
        .map(|o| StatusRow {
            id: o.id.clone(),
            obligation_type: o.obligation_type.to_string(),
            country: o.country.to_string(),
            due_date: o.due_date.format("%Y-%m-%d").to_string(),
            status: o.status.to_string(),
            past_due: if o.is_past_due(now) { "\u{26A0}" } else { "" }.to_string(),
        })
        .collect();

    if rows.is_empty() {
        println!("\u{2713} Nothing outstanding.");
        return;
    }

    println!("OUTSTANDING");
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

#[derive(Debug, Clone, Tabled)]
struct StatusRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    obligation_type: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Due")]
    due_date: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Past Due")]
    past_due: String,
}
