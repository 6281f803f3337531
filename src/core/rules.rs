//! Obligation applicability rules.
//!
//! Each country carries a table of [`ObligationRule`]s keyed by obligation
//! type. A missing row means the obligation never applies in that country,
//! and a country missing from the registry never requires anything.

use super::calendar::DueDateRule;
use super::country::{builtin_registry, CountryCode, CountryRegistry};
use super::entity::{Entity, EntityType};
use super::obligation::ObligationType;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Condition under which an obligation applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Applicability {
    Never,
    Always,
    /// Annual turnover strictly above the threshold
    TurnoverAbove {
        #[schemars(with = "f64")]
        threshold: Decimal,
    },
    /// Entity type is one of the listed types. An unrecognized declared
    /// type never matches.
    EntityTypeIn { types: Vec<EntityType> },
    /// Transaction amount strictly above the threshold. `when_omitted` is the
    /// answer when no amount is supplied.
    TransactionAbove {
        #[schemars(with = "f64")]
        threshold: Decimal,
        when_omitted: bool,
    },
}

impl Applicability {
    pub fn applies(&self, facts: &RuleFacts) -> bool {
        match self {
            Applicability::Never => false,
            Applicability::Always => true,
            Applicability::TurnoverAbove { threshold } => facts.annual_turnover > *threshold,
            Applicability::EntityTypeIn { types } => {
                facts.entity_type != EntityType::Other && types.contains(&facts.entity_type)
            }
            Applicability::TransactionAbove {
                threshold,
                when_omitted,
            } => facts
                .transaction_amount
                .map_or(*when_omitted, |amount| amount > *threshold),
        }
    }

    /// Threshold value, for rules gated on an amount
    pub fn threshold(&self) -> Option<Decimal> {
        match self {
            Applicability::TurnoverAbove { threshold }
            | Applicability::TransactionAbove { threshold, .. } => Some(*threshold),
            _ => None,
        }
    }
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Applicability::Never => f.write_str("never"),
            Applicability::Always => f.write_str("always"),
            Applicability::TurnoverAbove { threshold } => write!(f, "turnover > {}", threshold),
            Applicability::EntityTypeIn { types } => {
                let types: Vec<_> = types.iter().map(|t| t.as_str()).collect();
                write!(f, "entity type in [{}]", types.join(", "))
            }
            Applicability::TransactionAbove {
                threshold,
                when_omitted,
            } => write!(
                f,
                "transaction > {} ({} when no amount)",
                threshold,
                if *when_omitted { "required" } else { "exempt" }
            ),
        }
    }
}

/// One row of a country's rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObligationRule {
    pub applicability: Applicability,
    /// Filing calendar; obligations without one fall due 30 days out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDateRule>,
}

impl ObligationRule {
    pub fn new(applicability: Applicability) -> Self {
        ObligationRule {
            applicability,
            due_date: None,
        }
    }

    pub fn due(mut self, due_date: DueDateRule) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Inputs a rule is evaluated against
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFacts {
    pub entity_type: EntityType,
    pub annual_turnover: Decimal,
    pub transaction_amount: Option<Decimal>,
}

impl RuleFacts {
    pub fn for_entity(entity: &Entity) -> Self {
        RuleFacts {
            entity_type: entity.classify(),
            annual_turnover: Decimal::ZERO,
            transaction_amount: None,
        }
    }

    pub fn with_turnover(mut self, annual_turnover: Decimal) -> Self {
        self.annual_turnover = annual_turnover;
        self
    }

    pub fn with_transaction_amount(mut self, amount: Option<Decimal>) -> Self {
        self.transaction_amount = amount;
        self
    }
}

/// Applicability predicates evaluated against a registry
pub struct ObligationRuleSet<'r, R: CountryRegistry + ?Sized> {
    registry: &'r R,
}

impl<'r, R: CountryRegistry + ?Sized> ObligationRuleSet<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        ObligationRuleSet { registry }
    }

    /// Evaluate the rule for `obligation` in `country`. Unsupported countries
    /// and missing rows evaluate to `false`.
    pub fn applies(&self, country: CountryCode, obligation: ObligationType, facts: &RuleFacts) -> bool {
        let Some(rule) = self
            .registry
            .country(country)
            .and_then(|c| c.rule(obligation))
        else {
            return false;
        };
        let applies = rule.applicability.applies(facts);
        log::debug!(
            "{} {} for {} entity: {:?} -> {}",
            country,
            obligation,
            facts.entity_type,
            rule.applicability,
            applies
        );
        applies
    }

    fn check(&self, entity: &Entity, obligation: ObligationType, facts: RuleFacts) -> bool {
        self.applies(entity.country, obligation, &facts)
    }

    pub fn is_vat_registration_required(&self, entity: &Entity, annual_turnover: Decimal) -> bool {
        let facts = RuleFacts::for_entity(entity).with_turnover(annual_turnover);
        self.check(entity, ObligationType::Vat, facts)
    }

    pub fn calculate_corporate_tax_obligation(&self, entity: &Entity, annual_turnover: Decimal) -> bool {
        let facts = RuleFacts::for_entity(entity).with_turnover(annual_turnover);
        self.check(entity, ObligationType::CorporateTax, facts)
    }

    pub fn is_esr_required(&self, entity: &Entity) -> bool {
        self.check(entity, ObligationType::Esr, RuleFacts::for_entity(entity))
    }

    pub fn is_ubo_register_required(&self, entity: &Entity) -> bool {
        self.check(entity, ObligationType::Ubo, RuleFacts::for_entity(entity))
    }

    pub fn is_zakat_required(&self, entity: &Entity) -> bool {
        self.check(entity, ObligationType::Zakat, RuleFacts::for_entity(entity))
    }

    /// The transaction type does not currently change the outcome in any
    /// supported jurisdiction.
    pub fn is_wht_required(&self, entity: &Entity, _transaction_type: Option<&str>) -> bool {
        self.check(entity, ObligationType::Wht, RuleFacts::for_entity(entity))
    }

    pub fn is_e_invoicing_required(&self, entity: &Entity, transaction_amount: Option<Decimal>) -> bool {
        let facts = RuleFacts::for_entity(entity).with_transaction_amount(transaction_amount);
        self.check(entity, ObligationType::EInvoice, facts)
    }
}

fn builtin_rules() -> ObligationRuleSet<'static, super::country::Registry> {
    ObligationRuleSet::new(builtin_registry())
}

pub fn is_vat_registration_required(entity: &Entity, annual_turnover: Decimal) -> bool {
    builtin_rules().is_vat_registration_required(entity, annual_turnover)
}

pub fn calculate_corporate_tax_obligation(entity: &Entity, annual_turnover: Decimal) -> bool {
    builtin_rules().calculate_corporate_tax_obligation(entity, annual_turnover)
}

pub fn is_esr_required(entity: &Entity) -> bool {
    builtin_rules().is_esr_required(entity)
}

pub fn is_ubo_register_required(entity: &Entity) -> bool {
    builtin_rules().is_ubo_register_required(entity)
}

pub fn is_zakat_required(entity: &Entity) -> bool {
    builtin_rules().is_zakat_required(entity)
}

pub fn is_wht_required(entity: &Entity, transaction_type: Option<&str>) -> bool {
    builtin_rules().is_wht_required(entity, transaction_type)
}

pub fn is_e_invoicing_required(entity: &Entity, transaction_amount: Option<Decimal>) -> bool {
    builtin_rules().is_e_invoicing_required(entity, transaction_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entity(country: CountryCode, entity_type: &str) -> Entity {
        Entity::new("entity-1", country, "LLC")
            .with_name("Test Company")
            .with_entity_type(entity_type)
    }

    fn company(country: CountryCode) -> Entity {
        entity(country, "company")
    }

    fn unsupported() -> Entity {
        Entity::new("entity-1", "FR".parse().unwrap(), "SARL")
    }

    #[test]
    fn vat_thresholds() {
        let ae = company(CountryCode::AE);
        assert!(is_vat_registration_required(&ae, dec!(400000)));
        assert!(!is_vat_registration_required(&ae, dec!(300000)));
        assert!(!is_vat_registration_required(&ae, dec!(375000)));
        assert!(is_vat_registration_required(&ae, dec!(375000.01)));

        let sa = company(CountryCode::SA);
        assert!(is_vat_registration_required(&sa, dec!(1500000)));
        assert!(!is_vat_registration_required(&sa, dec!(800000)));
        assert!(!is_vat_registration_required(&sa, dec!(1000000)));

        let eg = company(CountryCode::EG);
        assert!(is_vat_registration_required(&eg, dec!(600000)));
        assert!(!is_vat_registration_required(&eg, dec!(400000)));
        assert!(!is_vat_registration_required(&eg, dec!(500000)));
    }

    #[test]
    fn corporate_tax() {
        let ae = company(CountryCode::AE);
        assert!(calculate_corporate_tax_obligation(&ae, dec!(500000)));
        assert!(!calculate_corporate_tax_obligation(&ae, dec!(200000)));

        // zakat applies instead
        let sa = company(CountryCode::SA);
        assert!(!calculate_corporate_tax_obligation(&sa, dec!(5000000)));
        assert!(!calculate_corporate_tax_obligation(&sa, Decimal::ZERO));

        assert!(calculate_corporate_tax_obligation(&company(CountryCode::EG), dec!(100000)));
        assert!(calculate_corporate_tax_obligation(
            &entity(CountryCode::EG, "partnership"),
            Decimal::ZERO
        ));
        assert!(!calculate_corporate_tax_obligation(
            &entity(CountryCode::EG, "individual"),
            dec!(100000)
        ));
        assert!(!calculate_corporate_tax_obligation(
            &entity(CountryCode::EG, "freelancer"),
            dec!(100000)
        ));
    }

    #[test]
    fn egypt_corporate_tax_uses_legal_form_when_type_missing() {
        let sole = Entity::new("e", CountryCode::EG, "Sole Proprietorship");
        assert!(!calculate_corporate_tax_obligation(&sole, dec!(100000)));
        let sae = Entity::new("e", CountryCode::EG, "S.A.E.");
        assert!(calculate_corporate_tax_obligation(&sae, dec!(100000)));
    }

    #[test]
    fn esr_only_for_uae_companies_and_partnerships() {
        assert!(is_esr_required(&company(CountryCode::AE)));
        assert!(is_esr_required(&entity(CountryCode::AE, "partnership")));
        assert!(!is_esr_required(&entity(CountryCode::AE, "individual")));
        assert!(!is_esr_required(&entity(CountryCode::AE, "freelancer")));
        assert!(!is_esr_required(&company(CountryCode::SA)));
        assert!(!is_esr_required(&company(CountryCode::EG)));
    }

    #[test]
    fn ubo_for_all_uae_entities() {
        assert!(is_ubo_register_required(&company(CountryCode::AE)));
        assert!(is_ubo_register_required(&entity(CountryCode::AE, "individual")));
        assert!(!is_ubo_register_required(&company(CountryCode::SA)));
        assert!(!is_ubo_register_required(&company(CountryCode::EG)));
    }

    #[test]
    fn zakat_only_in_saudi_arabia() {
        assert!(is_zakat_required(&company(CountryCode::SA)));
        assert!(is_zakat_required(&entity(CountryCode::SA, "individual")));
        assert!(!is_zakat_required(&company(CountryCode::AE)));
        assert!(!is_zakat_required(&company(CountryCode::EG)));
    }

    #[test]
    fn withholding_tax() {
        assert!(is_wht_required(&company(CountryCode::SA), None));
        assert!(is_wht_required(&company(CountryCode::EG), Some("services")));
        assert!(!is_wht_required(&company(CountryCode::AE), None));
    }

    #[test]
    fn e_invoicing() {
        assert!(is_e_invoicing_required(&company(CountryCode::SA), None));
        assert!(is_e_invoicing_required(&company(CountryCode::SA), Some(dec!(10))));
        assert!(is_e_invoicing_required(&company(CountryCode::EG), Some(dec!(3000))));
        assert!(!is_e_invoicing_required(&company(CountryCode::AE), None));
        assert!(!is_e_invoicing_required(&company(CountryCode::AE), Some(dec!(5000))));
    }

    /// Egypt: an omitted amount counts as required while a supplied amount at
    /// or below EGP 2,000 is exempt. Kept as-is until the intended behaviour
    /// for omitted amounts is confirmed.
    #[test]
    fn egypt_e_invoicing_omitted_and_small_amounts_diverge() {
        let eg = company(CountryCode::EG);
        assert!(is_e_invoicing_required(&eg, None));
        assert!(!is_e_invoicing_required(&eg, Some(dec!(1000))));
        assert!(!is_e_invoicing_required(&eg, Some(dec!(2000))));
        assert!(!is_e_invoicing_required(&eg, Some(Decimal::ZERO)));
        assert!(is_e_invoicing_required(&eg, Some(dec!(2000.01))));
    }

    #[test]
    fn unsupported_country_never_requires_anything() {
        let e = unsupported();
        assert!(!is_vat_registration_required(&e, dec!(100000000)));
        assert!(!calculate_corporate_tax_obligation(&e, dec!(100000000)));
        assert!(!is_esr_required(&e));
        assert!(!is_ubo_register_required(&e));
        assert!(!is_zakat_required(&e));
        assert!(!is_wht_required(&e, None));
        assert!(!is_e_invoicing_required(&e, None));
    }

    #[test]
    fn applicability_variants() {
        let facts = RuleFacts {
            entity_type: EntityType::Freelancer,
            annual_turnover: dec!(100),
            transaction_amount: None,
        };
        assert!(!Applicability::Never.applies(&facts));
        assert!(Applicability::Always.applies(&facts));
        assert!(Applicability::TurnoverAbove { threshold: dec!(99) }.applies(&facts));
        assert!(!Applicability::TurnoverAbove { threshold: dec!(100) }.applies(&facts));
        assert!(Applicability::EntityTypeIn {
            types: vec![EntityType::Freelancer]
        }
        .applies(&facts));
        assert!(!Applicability::TransactionAbove {
            threshold: dec!(1),
            when_omitted: false
        }
        .applies(&facts));
    }

    #[test]
    fn applicability_serde() {
        let rule: ObligationRule = serde_json::from_str(
            r#"{ "applicability": { "kind": "transaction_above", "threshold": 2000, "whenOmitted": true } }"#,
        )
        .unwrap();
        assert_eq!(
            rule.applicability,
            Applicability::TransactionAbove {
                threshold: dec!(2000),
                when_omitted: true
            }
        );
        assert!(rule.due_date.is_none());
        assert_eq!(rule.applicability.threshold(), Some(dec!(2000)));
    }

    #[test]
    fn applicability_display() {
        let turnover = Applicability::TurnoverAbove {
            threshold: dec!(375000),
        };
        assert_eq!(turnover.to_string(), "turnover > 375000");
        let types = Applicability::EntityTypeIn {
            types: vec![EntityType::Company, EntityType::Partnership],
        };
        assert_eq!(types.to_string(), "entity type in [company, partnership]");
        let einv = Applicability::TransactionAbove {
            threshold: dec!(2000),
            when_omitted: true,
        };
        assert_eq!(einv.to_string(), "transaction > 2000 (required when no amount)");
    }

    #[test]
    fn unrecognized_declared_type_fails_entity_type_rules() {
        let trust = Entity::new("entity-1", CountryCode::AE, "General Partnership")
            .with_entity_type("trust");
        assert!(!is_esr_required(&trust));
        assert!(is_ubo_register_required(&trust));

        let branch = Entity::new("entity-1", CountryCode::EG, "S.A.E.").with_entity_type("branch");
        assert!(!calculate_corporate_tax_obligation(&branch, dec!(1000000)));

        let capitalized = entity(CountryCode::AE, "Company");
        assert!(!is_esr_required(&capitalized));

        let other = RuleFacts {
            entity_type: EntityType::Other,
            annual_turnover: Decimal::ZERO,
            transaction_amount: None,
        };
        assert!(!Applicability::EntityTypeIn {
            types: vec![EntityType::Company, EntityType::Other]
        }
        .applies(&other));
    }
}
