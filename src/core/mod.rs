pub mod calendar;
pub mod country;
pub mod engine;
pub mod entity;
pub mod error;
pub mod jurisdictions;
pub mod obligation;
pub mod rules;
pub mod status;

// Flat public surface for domain types and functions.
pub use calendar::{calculate_next_filing_date, DueDateCalculator, DueDateRule, FALLBACK_DAYS};
pub use country::{
    builtin_registry, country, validate_identifier, CatalogObligation, CountryCode,
    CountryMetadata, CountryRegistry, EconomicZone, IdentifierFormat, Registry, RegistryConfig,
};
pub use engine::{calculate_obligations, ObligationEngine, ObligationParams};
pub use entity::{Entity, EntityInput, EntityMetadata, EntityType};
pub use error::{EntityError, InvalidCountryCode, RegistryError};
pub use obligation::{
    days_until, read_obligations_json, ComplianceObligation, Frequency, ObligationStatus,
    ObligationType,
};
pub use rules::{
    calculate_corporate_tax_obligation, is_e_invoicing_required, is_esr_required,
    is_ubo_register_required, is_vat_registration_required, is_wht_required, is_zakat_required,
    Applicability, ObligationRule, ObligationRuleSet, RuleFacts,
};
pub use status::{
    calculate_risk_level, get_compliance_status, has_overdue_obligations, ComplianceStatus,
    RiskLevel,
};
