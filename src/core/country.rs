use super::error::{InvalidCountryCode, RegistryError};
use super::jurisdictions;
use super::obligation::{Frequency, ObligationType};
use super::rules::ObligationRule;
use chrono::{Duration, NaiveDate, Weekday};
use regex::Regex;
use rust_decimal::Decimal;
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;
use std::sync::OnceLock;

/// ISO 3166-1 alpha-2 country code, stored upper case
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    pub const AE: CountryCode = CountryCode(*b"AE");
    pub const SA: CountryCode = CountryCode(*b"SA");
    pub const EG: CountryCode = CountryCode(*b"EG");

    pub fn as_str(&self) -> &str {
        // only ever constructed from ASCII letters
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl FromStr for CountryCode {
    type Err = InvalidCountryCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(CountryCode([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(InvalidCountryCode(s.to_string())),
        }
    }
}

impl TryFrom<String> for CountryCode {
    type Error = InvalidCountryCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl JsonSchema for CountryCode {
    fn schema_name() -> String {
        "CountryCode".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EconomicZone {
    pub id: String,
    pub code: String,
    pub name: String,
    /// Licensing authority
    pub authority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Generic catalog entry describing a filing a country levies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogObligation {
    pub id: String,
    #[serde(rename = "type")]
    pub obligation_type: ObligationType,
    pub name: String,
    pub frequency: Frequency,
    /// Days after the end of the filing period the return is due
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_after_period_end: Option<i64>,
    /// Restricts the entry to these entity types; absent means all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable_entity_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub rate: Option<Decimal>,
}

impl CatalogObligation {
    pub fn applies_to(&self, entity_type: &str) -> bool {
        match &self.applicable_entity_types {
            None => true,
            Some(types) => types.iter().any(|t| t.eq_ignore_ascii_case(entity_type)),
        }
    }

    /// Due date of the filing for a period ending on `period_end`
    pub fn filing_due_date(&self, period_end: NaiveDate) -> NaiveDate {
        match self.days_after_period_end {
            Some(days) => period_end
                .checked_add_signed(Duration::days(days))
                .unwrap_or(NaiveDate::MAX),
            None => period_end,
        }
    }
}

/// Format of a national identifier (tax registration number, licence, ...)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierFormat {
    /// Identifier kind, e.g. TRN, CR, TIN
    pub kind: String,
    /// Regular expression the whole value must match
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    pub description: String,
    /// `pattern` compiled on first use; `None` if it does not compile
    #[serde(skip)]
    #[schemars(skip)]
    regex: OnceLock<Option<Regex>>,
}

impl PartialEq for IdentifierFormat {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.pattern == other.pattern
            && self.length == other.length
            && self.description == other.description
    }
}

impl IdentifierFormat {
    pub fn new(
        kind: impl Into<String>,
        pattern: impl Into<String>,
        length: Option<usize>,
        description: impl Into<String>,
    ) -> Self {
        IdentifierFormat {
            kind: kind.into(),
            pattern: pattern.into(),
            length,
            description: description.into(),
            regex: OnceLock::new(),
        }
    }

    /// Compile the pattern up front so later matches reuse it
    fn compile(&self) -> Result<(), regex::Error> {
        if let Some(Some(_)) = self.regex.get() {
            return Ok(());
        }
        let re = Regex::new(&self.pattern)?;
        let _ = self.regex.set(Some(re));
        Ok(())
    }

    fn regex(&self) -> Option<&Regex> {
        self.regex
            .get_or_init(|| match Regex::new(&self.pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    log::warn!("Unusable {} pattern '{}': {}", self.kind, self.pattern, e);
                    None
                }
            })
            .as_ref()
    }

    pub fn matches(&self, value: &str) -> bool {
        if let Some(length) = self.length {
            if value.chars().count() != length {
                return false;
            }
        }
        self.regex().map_or(false, |re| re.is_match(value))
    }

    #[cfg(test)]
    fn is_compiled(&self) -> bool {
        matches!(self.regex.get(), Some(Some(_)))
    }
}

/// Everything the engine knows about a jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountryMetadata {
    pub code: CountryCode,
    pub name: String,
    pub currency: String,
    pub timezone: String,
    #[schemars(with = "f64")]
    pub vat_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub corporate_tax_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub zakat_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub withholding_tax_rate: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Vec<String>")]
    pub weekend_days: Vec<Weekday>,
    /// Month (1-12) the fiscal year starts
    pub fiscal_year_start: u32,
    /// Month (1-12) the fiscal year ends
    pub fiscal_year_end: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub economic_zones: Vec<EconomicZone>,
    #[serde(default)]
    pub obligations: Vec<CatalogObligation>,
    #[serde(default)]
    pub identifiers: Vec<IdentifierFormat>,
    /// Applicability and filing calendar per obligation type
    #[serde(default)]
    pub rules: BTreeMap<ObligationType, ObligationRule>,
}

impl CountryMetadata {
    pub fn rule(&self, obligation: ObligationType) -> Option<&ObligationRule> {
        self.rules.get(&obligation)
    }

    fn validate(&self) -> Result<(), RegistryError> {
        for identifier in &self.identifiers {
            identifier.compile().map_err(|e| RegistryError::InvalidPattern {
                country: self.code.to_string(),
                kind: identifier.kind.clone(),
                message: e.to_string(),
            })?;
        }
        for (obligation, rule) in &self.rules {
            if let Some(due) = &rule.due_date {
                due.validate().map_err(|message| RegistryError::InvalidDueDateRule {
                    country: self.code.to_string(),
                    obligation: obligation.to_string(),
                    message,
                })?;
            }
        }
        Ok(())
    }
}

/// Read-only source of jurisdiction metadata
pub trait CountryRegistry {
    fn country(&self, code: CountryCode) -> Option<&CountryMetadata>;

    /// All supported countries, ordered by code
    fn countries(&self) -> Vec<&CountryMetadata>;

    fn is_supported(&self, code: CountryCode) -> bool {
        self.country(code).is_some()
    }

    /// Catalog entries for a country, optionally restricted to an entity type
    fn obligation_catalog(
        &self,
        code: CountryCode,
        entity_type: Option<&str>,
    ) -> Vec<&CatalogObligation> {
        let Some(country) = self.country(code) else {
            return Vec::new();
        };
        country
            .obligations
            .iter()
            .filter(|o| entity_type.map_or(true, |t| o.applies_to(t)))
            .collect()
    }

    fn economic_zones(&self, code: CountryCode) -> &[EconomicZone] {
        self.country(code)
            .map(|c| c.economic_zones.as_slice())
            .unwrap_or(&[])
    }

    fn economic_zone(&self, code: CountryCode, zone_id: &str) -> Option<&EconomicZone> {
        self.economic_zones(code).iter().find(|z| z.id == zone_id)
    }

    /// Check an identifier against the country's format for `kind`.
    /// Unknown countries and kinds never validate.
    fn validate_identifier(&self, code: CountryCode, kind: &str, value: &str) -> bool {
        self.country(code)
            .and_then(|c| {
                c.identifiers
                    .iter()
                    .find(|f| f.kind.eq_ignore_ascii_case(kind))
            })
            .map_or(false, |format| format.matches(value))
    }
}

/// Registry file format
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RegistryConfig {
    pub countries: Vec<CountryMetadata>,
}

/// In-memory registry keyed by country code
#[derive(Debug, Clone, Default)]
pub struct Registry {
    countries: BTreeMap<CountryCode, CountryMetadata>,
}

impl Registry {
    pub fn new(countries: Vec<CountryMetadata>) -> Result<Self, RegistryError> {
        let mut map = BTreeMap::new();
        for country in countries {
            country.validate()?;
            let code = country.code;
            if map.insert(code, country).is_some() {
                return Err(RegistryError::DuplicateCountry(code.to_string()));
            }
        }
        Ok(Registry { countries: map })
    }

    /// UAE, KSA and Egypt
    pub fn builtin() -> Self {
        let countries = [jurisdictions::uae(), jurisdictions::ksa(), jurisdictions::egypt()];
        Registry {
            countries: countries.into_iter().map(|c| (c.code, c)).collect(),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RegistryError> {
        let config: RegistryConfig = serde_json::from_reader(reader)?;
        let registry = Registry::new(config.countries)?;
        log::info!("Loaded registry with {} countries", registry.countries.len());
        Ok(registry)
    }

    pub fn to_config(&self) -> RegistryConfig {
        RegistryConfig {
            countries: self.countries.values().cloned().collect(),
        }
    }
}

impl CountryRegistry for Registry {
    fn country(&self, code: CountryCode) -> Option<&CountryMetadata> {
        self.countries.get(&code)
    }

    fn countries(&self) -> Vec<&CountryMetadata> {
        self.countries.values().collect()
    }
}

/// Shared builtin registry, built on first use
pub fn builtin_registry() -> &'static Registry {
    static BUILTIN: OnceLock<Registry> = OnceLock::new();
    BUILTIN.get_or_init(Registry::builtin)
}

/// Country lookup against the builtin registry
pub fn country(code: CountryCode) -> Option<&'static CountryMetadata> {
    builtin_registry().country(code)
}

/// Identifier check against the builtin registry
pub fn validate_identifier(code: CountryCode, kind: &str, value: &str) -> bool {
    builtin_registry().validate_identifier(code, kind, value)
}
