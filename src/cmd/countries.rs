//! Countries command - supported jurisdictions and their rule tables

use clap::Args;
use complyc::core::{CountryCode, CountryMetadata, CountryRegistry, Registry};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CountriesCommand {
    /// Country code to show in detail (e.g. AE, SA, EG)
    code: Option<CountryCode>,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

impl CountriesCommand {
    pub fn exec(&self, registry: &Registry) -> anyhow::Result<()> {
        match self.code {
            Some(code) => {
                let Some(country) = registry.country(code) else {
                    anyhow::bail!("Country {} is not supported", code);
                };
                if self.json {
                    println!("{}", serde_json::to_string_pretty(country)?);
                } else {
                    print_country(country);
                }
            }
            None => {
                let countries = registry.countries();
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&countries)?);
                } else {
                    print_countries(&countries);
                }
            }
        }
        Ok(())
    }
}

fn format_rate(rate: Option<Decimal>) -> String {
    rate.map_or("-".to_string(), |r| format!("{}%", (r * dec!(100)).normalize()))
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .to_string();
    println!("{}", table);
}

fn print_countries(countries: &[&CountryMetadata]) {
    if countries.is_empty() {
        println!("No countries configured");
        return;
    }

    let rows: Vec<CountryRow> = countries
        .iter()
        .map(|c| CountryRow {
            code: c.code.to_string(),
            name: c.name.clone(),
            currency: c.currency.clone(),
            vat_rate: format_rate(Some(c.vat_rate)),
            obligations: c.rules.len().to_string(),
            zones: c.economic_zones.len().to_string(),
        })
        .collect();
    print_table(rows);
}

fn print_country(country: &CountryMetadata) {
    println!();
    println!("{} ({})", country.name.to_uppercase(), country.code);
    println!();
    println!("  Currency: {} | Timezone: {}", country.currency, country.timezone);
    println!(
        "  VAT: {} | Corporate tax: {} | Zakat: {} | WHT: {}",
        format_rate(Some(country.vat_rate)),
        format_rate(country.corporate_tax_rate),
        format_rate(country.zakat_rate),
        format_rate(country.withholding_tax_rate)
    );
    let weekend: Vec<_> = country.weekend_days.iter().map(|d| d.to_string()).collect();
    println!(
        "  Weekend: {} | Fiscal year: month {} to {}",
        weekend.join("/"),
        country.fiscal_year_start,
        country.fiscal_year_end
    );
    if let Some(url) = &country.registration_url {
        println!("  Registration: {}", url);
    }
    if let Some(url) = &country.payment_url {
        println!("  Payment: {}", url);
    }
    println!();

    if !country.rules.is_empty() {
        println!("RULES");
        let rows: Vec<RuleRow> = country
            .rules
            .iter()
            .map(|(obligation, rule)| RuleRow {
                obligation: obligation.to_string(),
                applies: rule.applicability.to_string(),
                due: rule
                    .due_date
                    .map_or("30 days out".to_string(), |d| d.to_string()),
            })
            .collect();
        print_table(rows);
        println!();
    }

    if !country.obligations.is_empty() {
        println!("CATALOG");
        let rows: Vec<CatalogRow> = country
            .obligations
            .iter()
            .map(|o| CatalogRow {
                id: o.id.clone(),
                name: o.name.clone(),
                frequency: o.frequency.to_string(),
                days_after_period_end: o
                    .days_after_period_end
                    .map_or("-".to_string(), |d| d.to_string()),
                rate: format_rate(o.rate),
                entity_types: o
                    .applicable_entity_types
                    .as_ref()
                    .map_or("all".to_string(), |types| types.join(", ")),
            })
            .collect();
        print_table(rows);
        println!();
    }

    if !country.identifiers.is_empty() {
        println!("IDENTIFIERS");
        for identifier in &country.identifiers {
            println!("  {:8} {}", identifier.kind, identifier.description);
        }
        println!();
    }

    if !country.economic_zones.is_empty() {
        println!("ECONOMIC ZONES");
        let rows: Vec<ZoneRow> = country
            .economic_zones
            .iter()
            .map(|z| ZoneRow {
                id: z.id.clone(),
                code: z.code.clone(),
                name: z.name.clone(),
                authority: z.authority.clone(),
                location: z
                    .city
                    .clone()
                    .or_else(|| z.region.clone())
                    .unwrap_or_default(),
            })
            .collect();
        print_table(rows);
    }
}

#[derive(Debug, Clone, Tabled)]
struct CountryRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Country")]
    name: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "VAT")]
    vat_rate: String,
    #[tabled(rename = "Rules")]
    obligations: String,
    #[tabled(rename = "Zones")]
    zones: String,
}

#[derive(Debug, Clone, Tabled)]
struct RuleRow {
    #[tabled(rename = "Obligation")]
    obligation: String,
    #[tabled(rename = "Applies When")]
    applies: String,
    #[tabled(rename = "Due")]
    due: String,
}

#[derive(Debug, Clone, Tabled)]
struct CatalogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Frequency")]
    frequency: String,
    #[tabled(rename = "Days After Period")]
    days_after_period_end: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Entity Types")]
    entity_types: String,
}

#[derive(Debug, Clone, Tabled)]
struct ZoneRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Authority")]
    authority: String,
    #[tabled(rename = "Location")]
    location: String,
}
