use super::country::CountryCode;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statutory filing type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObligationType {
    Vat,
    CorporateTax,
    /// Economic Substance Report
    Esr,
    /// Ultimate Beneficial Owner register update
    Ubo,
    Zakat,
    /// Withholding tax
    Wht,
    EInvoice,
    /// B2C e-receipt. Listed in the catalog only, never emitted by the engine.
    EReceipt,
}

impl ObligationType {
    /// Order in which obligations are evaluated and emitted.
    pub const EVALUATION_ORDER: [ObligationType; 7] = [
        ObligationType::Vat,
        ObligationType::CorporateTax,
        ObligationType::Esr,
        ObligationType::Ubo,
        ObligationType::Zakat,
        ObligationType::Wht,
        ObligationType::EInvoice,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ObligationType::Vat => "VAT",
            ObligationType::CorporateTax => "CORPORATE_TAX",
            ObligationType::Esr => "ESR",
            ObligationType::Ubo => "UBO",
            ObligationType::Zakat => "ZAKAT",
            ObligationType::Wht => "WHT",
            ObligationType::EInvoice => "E_INVOICE",
            ObligationType::EReceipt => "E_RECEIPT",
        }
    }

    pub fn from_str(s: &str) -> Option<ObligationType> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "VAT" => Some(ObligationType::Vat),
            "CORPORATE_TAX" | "CT" => Some(ObligationType::CorporateTax),
            "ESR" => Some(ObligationType::Esr),
            "UBO" => Some(ObligationType::Ubo),
            "ZAKAT" => Some(ObligationType::Zakat),
            "WHT" => Some(ObligationType::Wht),
            "E_INVOICE" => Some(ObligationType::EInvoice),
            "E_RECEIPT" => Some(ObligationType::EReceipt),
            _ => None,
        }
    }

    /// Prefix of the deterministic obligation id
    pub fn id_prefix(self) -> &'static str {
        match self {
            ObligationType::Vat => "vat",
            ObligationType::CorporateTax => "ct",
            ObligationType::Esr => "esr",
            ObligationType::Ubo => "ubo",
            ObligationType::Zakat => "zakat",
            ObligationType::Wht => "wht",
            ObligationType::EInvoice => "einv",
            ObligationType::EReceipt => "erec",
        }
    }

    pub fn frequency(self) -> Frequency {
        match self {
            ObligationType::Vat | ObligationType::Wht => Frequency::Monthly,
            ObligationType::CorporateTax
            | ObligationType::Esr
            | ObligationType::Ubo
            | ObligationType::Zakat => Frequency::Annually,
            ObligationType::EInvoice | ObligationType::EReceipt => Frequency::OnDemand,
        }
    }

    pub fn requires_documentation(self) -> bool {
        !matches!(self, ObligationType::EInvoice | ObligationType::EReceipt)
    }

    pub fn automation_supported(self) -> bool {
        matches!(self, ObligationType::EInvoice | ObligationType::EReceipt)
    }

    /// Human readable description, naming the filer where the form is per-entity.
    pub fn describe(self, filer: &str) -> String {
        match self {
            ObligationType::Vat => format!("VAT filing for {}", filer),
            ObligationType::CorporateTax => format!("Corporate tax return for {}", filer),
            ObligationType::Esr => "Economic Substance Report".to_string(),
            ObligationType::Ubo => "Ultimate Beneficial Owner Register Update".to_string(),
            ObligationType::Zakat => "Zakat Return".to_string(),
            ObligationType::Wht => "Withholding Tax Return".to_string(),
            ObligationType::EInvoice => "E-Invoicing Compliance".to_string(),
            ObligationType::EReceipt => "E-Receipt Compliance".to_string(),
        }
    }
}

impl fmt::Display for ObligationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Annually,
    OnDemand,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Monthly => "MONTHLY",
            Frequency::Quarterly => "QUARTERLY",
            Frequency::Annually => "ANNUALLY",
            Frequency::OnDemand => "ON_DEMAND",
        };
        f.write_str(s)
    }
}

/// Filing status. The engine only ever creates `Pending`; the other states are
/// tracked by whoever persists the obligations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObligationStatus {
    #[default]
    Pending,
    Submitted,
    Approved,
    Overdue,
}

impl ObligationStatus {
    pub fn is_filed(self) -> bool {
        matches!(self, ObligationStatus::Submitted | ObligationStatus::Approved)
    }
}

impl fmt::Display for ObligationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObligationStatus::Pending => "PENDING",
            ObligationStatus::Submitted => "SUBMITTED",
            ObligationStatus::Approved => "APPROVED",
            ObligationStatus::Overdue => "OVERDUE",
        };
        f.write_str(s)
    }
}

/// A filing an entity has to make, as computed at a given instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceObligation {
    /// `<type prefix>-<entity id>`, stable across calls
    pub id: String,
    #[serde(rename = "type")]
    pub obligation_type: ObligationType,
    pub country: CountryCode,
    pub description: String,
    pub frequency: Frequency,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub status: ObligationStatus,
    /// Whole days from the computation instant to `due_date`, rounded down
    pub days_until_due: i64,
    pub requires_documentation: bool,
    pub automation_supported: bool,
}

impl ComplianceObligation {
    pub fn obligation_id(obligation_type: ObligationType, entity_id: &str) -> String {
        format!("{}-{}", obligation_type.id_prefix(), entity_id)
    }

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now
    }
}

/// Floor of the whole days between `now` and `due`.
pub fn days_until(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (due - now).num_seconds().div_euclid(86_400)
}

/// Read a list of tracked obligations from JSON
pub fn read_obligations_json<R: std::io::Read>(
    reader: R,
) -> Result<Vec<ComplianceObligation>, serde_json::Error> {
    serde_json::from_reader(reader)
}
