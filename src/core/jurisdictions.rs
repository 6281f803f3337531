//! Builtin jurisdiction data for the United Arab Emirates, Saudi Arabia and Egypt.

use super::calendar::DueDateRule;
use super::country::{CatalogObligation, CountryCode, CountryMetadata, EconomicZone, IdentifierFormat};
use super::entity::EntityType;
use super::obligation::{Frequency, ObligationType};
use super::rules::{Applicability, ObligationRule};
use chrono::Weekday;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

pub const AE_VAT_THRESHOLD: Decimal = dec!(375000);
pub const AE_CORPORATE_TAX_THRESHOLD: Decimal = dec!(375000);
pub const SA_VAT_THRESHOLD: Decimal = dec!(1000000);
pub const EG_VAT_THRESHOLD: Decimal = dec!(500000);
pub const EG_E_INVOICE_THRESHOLD: Decimal = dec!(2000);

fn companies_and_partnerships() -> Applicability {
    Applicability::EntityTypeIn {
        types: vec![EntityType::Company, EntityType::Partnership],
    }
}

fn zone(id: &str, code: &str, name: &str, authority: &str, city: Option<&str>, region: Option<&str>) -> EconomicZone {
    EconomicZone {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        authority: authority.to_string(),
        city: city.map(str::to_string),
        region: region.map(str::to_string),
    }
}

fn catalog(
    id: &str,
    obligation_type: ObligationType,
    name: &str,
    frequency: Frequency,
    days_after_period_end: Option<i64>,
) -> CatalogObligation {
    CatalogObligation {
        id: id.to_string(),
        obligation_type,
        name: name.to_string(),
        frequency,
        days_after_period_end,
        applicable_entity_types: None,
        rate: None,
    }
}

fn digits(kind: &str, length: usize, description: &str) -> IdentifierFormat {
    IdentifierFormat::new(kind, format!("^\\d{{{}}}$", length), Some(length), description)
}

pub fn uae() -> CountryMetadata {
    let rules = BTreeMap::from([
        (
            ObligationType::Vat,
            ObligationRule::new(Applicability::TurnoverAbove {
                threshold: AE_VAT_THRESHOLD,
            })
            .due(DueDateRule::DayOfNextMonth { day: 28 }),
        ),
        (
            ObligationType::CorporateTax,
            ObligationRule::new(Applicability::TurnoverAbove {
                threshold: AE_CORPORATE_TAX_THRESHOLD,
            }),
        ),
        (
            ObligationType::Esr,
            ObligationRule::new(companies_and_partnerships())
                .due(DueDateRule::DateNextYear { month: 12, day: 31 }),
        ),
        (
            ObligationType::Ubo,
            ObligationRule::new(Applicability::Always)
                .due(DueDateRule::DateNextYear { month: 12, day: 31 }),
        ),
    ]);

    let mut esr = catalog(
        "ae-esr",
        ObligationType::Esr,
        "Economic Substance Report",
        Frequency::Annually,
        Some(365),
    );
    esr.applicable_entity_types = Some(vec!["Company".to_string(), "Establishment".to_string()]);
    let mut corporate_tax = catalog(
        "ae-corporate-tax",
        ObligationType::CorporateTax,
        "Corporate Tax Return",
        Frequency::Annually,
        Some(180),
    );
    corporate_tax.rate = Some(dec!(0.09));

    CountryMetadata {
        code: CountryCode::AE,
        name: "United Arab Emirates".to_string(),
        currency: "AED".to_string(),
        timezone: "Asia/Dubai".to_string(),
        vat_rate: dec!(0.05),
        corporate_tax_rate: Some(dec!(0.09)),
        zakat_rate: None,
        withholding_tax_rate: None,
        weekend_days: vec![Weekday::Fri, Weekday::Sat],
        fiscal_year_start: 1,
        fiscal_year_end: 12,
        registration_url: Some("https://www.fta.gov.ae".to_string()),
        payment_url: Some("https://www.fta.gov.ae/services".to_string()),
        economic_zones: vec![
            zone("ae-ded", "DED", "Department of Economic Development", "DED", Some("Abu Dhabi"), None),
            zone("ae-adib", "ADIB", "Abu Dhabi Islamic Bank Free Zone", "ADIB", None, Some("Abu Dhabi")),
            zone("ae-aafz", "AAFZ", "Abu Dhabi Airport Free Zone", "AAFZ", Some("Abu Dhabi"), None),
            zone("ae-adgm", "ADGM", "Abu Dhabi Global Market", "ADGM", Some("Abu Dhabi"), None),
            zone("ae-dafz", "DAFZ", "Dubai Airport Free Zone", "DAFZ", Some("Dubai"), None),
            zone("ae-ddfz", "DDFZ", "Dubai Downtown Free Zone", "DDFZ", Some("Dubai"), None),
            zone("ae-jafza", "JAFZA", "Jebel Ali Free Zone", "JAFZA", Some("Dubai"), None),
            zone("ae-dfza", "DFZA", "Dubai Free Zone Authority", "DFZA", Some("Dubai"), None),
            zone("ae-difc", "DIFC", "Dubai International Financial Centre", "DIFC", Some("Dubai"), None),
            zone("ae-shj", "SHJ", "Sharjah Department of Economic Development", "Sharjah DED", Some("Sharjah"), None),
        ],
        obligations: vec![
            catalog("ae-vat", ObligationType::Vat, "VAT Return & Payment", Frequency::Monthly, Some(28)),
            esr,
            catalog(
                "ae-ubo",
                ObligationType::Ubo,
                "Ultimate Beneficial Owner Register",
                Frequency::Annually,
                Some(15),
            ),
            corporate_tax,
        ],
        identifiers: vec![
            digits("TRN", 15, "UAE Tax Registration Number (15 digits)"),
            IdentifierFormat::new(
                "LICENSE",
                "^[A-Z]\\d{6}[A-Z]$",
                Some(8),
                "UAE Trade License Number (letter, 6 digits, letter)",
            ),
        ],
        rules,
    }
}

pub fn ksa() -> CountryMetadata {
    let rules = BTreeMap::from([
        (
            ObligationType::Vat,
            ObligationRule::new(Applicability::TurnoverAbove {
                threshold: SA_VAT_THRESHOLD,
            })
            .due(DueDateRule::DayOfNextMonth { day: 15 }),
        ),
        (
            ObligationType::CorporateTax,
            ObligationRule::new(Applicability::Never),
        ),
        (
            ObligationType::Zakat,
            ObligationRule::new(Applicability::Always)
                .due(DueDateRule::DateNextYear { month: 1, day: 31 }),
        ),
        (
            ObligationType::Wht,
            ObligationRule::new(Applicability::Always)
                .due(DueDateRule::DayOfNextMonth { day: 15 }),
        ),
        (
            ObligationType::EInvoice,
            ObligationRule::new(Applicability::Always),
        ),
    ]);

    let mut zakat = catalog(
        "sa-zakat",
        ObligationType::Zakat,
        "Zakat Return & Payment",
        Frequency::Annually,
        Some(90),
    );
    zakat.rate = Some(dec!(0.025));
    let mut wht = catalog(
        "sa-wht",
        ObligationType::Wht,
        "Withholding Tax Report",
        Frequency::Monthly,
        Some(25),
    );
    wht.rate = Some(dec!(0.05));

    CountryMetadata {
        code: CountryCode::SA,
        name: "Saudi Arabia".to_string(),
        currency: "SAR".to_string(),
        timezone: "Asia/Riyadh".to_string(),
        vat_rate: dec!(0.15),
        corporate_tax_rate: None,
        zakat_rate: Some(dec!(0.025)),
        withholding_tax_rate: Some(dec!(0.05)),
        weekend_days: vec![Weekday::Thu, Weekday::Fri],
        fiscal_year_start: 1,
        fiscal_year_end: 12,
        registration_url: Some("https://www.zatca.gov.sa".to_string()),
        payment_url: Some("https://www.zatca.gov.sa/payment".to_string()),
        economic_zones: vec![
            zone("sa-riyad", "RYD", "Riyadh Region", "MCR", None, Some("Riyadh")),
            zone("sa-makkah", "MCK", "Makkah Region", "MCR", None, Some("Makkah")),
            zone("sa-madinah", "MDN", "Madinah Region", "MCR", None, Some("Madinah")),
            zone("sa-eastern", "EAS", "Eastern Region", "MCR", None, Some("Eastern")),
            zone("sa-jeddah", "JED", "Jeddah", "MCR", None, Some("Makkah")),
            zone("sa-kaust", "KAUST", "KAUST Special Zone", "KAUST", None, Some("Eastern")),
            zone("sa-neom", "NEOM", "NEOM Special Zone", "NEOM", None, Some("Northwest")),
        ],
        obligations: vec![
            catalog("sa-vat", ObligationType::Vat, "VAT Return & Payment", Frequency::Monthly, Some(25)),
            zakat,
            wht,
            catalog("sa-einvoice", ObligationType::EInvoice, "E-Invoicing Compliance", Frequency::OnDemand, None),
        ],
        identifiers: vec![
            digits("CR", 10, "KSA Commercial Registration Number (10 digits)"),
            digits("VAT", 15, "KSA VAT Registration Number (15 digits)"),
        ],
        rules,
    }
}

pub fn egypt() -> CountryMetadata {
    let rules = BTreeMap::from([
        (
            ObligationType::Vat,
            ObligationRule::new(Applicability::TurnoverAbove {
                threshold: EG_VAT_THRESHOLD,
            })
            .due(DueDateRule::EndOfMonth { months_ahead: 2 }),
        ),
        (
            ObligationType::CorporateTax,
            ObligationRule::new(companies_and_partnerships())
                .due(DueDateRule::DateNextYear { month: 4, day: 30 }),
        ),
        (ObligationType::Wht, ObligationRule::new(Applicability::Always)),
        (
            ObligationType::EInvoice,
            ObligationRule::new(Applicability::TransactionAbove {
                threshold: EG_E_INVOICE_THRESHOLD,
                when_omitted: true,
            }),
        ),
    ]);

    CountryMetadata {
        code: CountryCode::EG,
        name: "Egypt".to_string(),
        currency: "EGP".to_string(),
        timezone: "Africa/Cairo".to_string(),
        vat_rate: dec!(0.14),
        corporate_tax_rate: None,
        zakat_rate: None,
        withholding_tax_rate: None,
        weekend_days: vec![Weekday::Fri, Weekday::Sat],
        fiscal_year_start: 1,
        fiscal_year_end: 12,
        registration_url: Some("https://www.sis.gov.eg".to_string()),
        payment_url: Some("https://www.eta.gov.eg".to_string()),
        economic_zones: vec![
            zone("eg-cairo", "CAI", "Cairo Governorate", "RTA Cairo", Some("Cairo"), None),
            zone("eg-giza", "GIZ", "Giza Governorate", "RTA Giza", Some("Giza"), None),
            zone("eg-alex", "ALX", "Alexandria Governorate", "RTA Alexandria", Some("Alexandria"), None),
            zone("eg-suez", "SUZ", "Suez Special Economic Zone", "SCZONE", Some("Suez"), None),
            zone(
                "eg-new-admin",
                "NAC",
                "New Administrative Capital",
                "NAC Authority",
                Some("New Administrative Capital"),
                None,
            ),
        ],
        obligations: vec![
            catalog("eg-vat", ObligationType::Vat, "VAT Return & Payment", Frequency::Monthly, Some(25)),
            catalog("eg-einvoice", ObligationType::EInvoice, "E-Invoicing (ETA Clearance)", Frequency::OnDemand, None),
            catalog("eg-ereceipt", ObligationType::EReceipt, "E-Receipt for B2C", Frequency::OnDemand, None),
        ],
        identifiers: vec![
            digits("TIN", 9, "Egyptian Tax Identification Number (9 digits)"),
            digits("ETA_ID", 15, "Egyptian ETA System ID (15 digits)"),
        ],
        rules,
    }
}
