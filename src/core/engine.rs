use super::calendar::DueDateCalculator;
use super::country::{builtin_registry, CountryCode, CountryRegistry};
use super::entity::Entity;
use super::obligation::{days_until, ComplianceObligation, ObligationStatus, ObligationType};
use super::rules::{ObligationRuleSet, RuleFacts};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Financial parameters supplied alongside an entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObligationParams {
    /// Annual turnover in the country's currency; missing counts as zero
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub annual_turnover: Option<Decimal>,
    #[serde(default)]
    pub number_of_employees: Option<u32>,
}

impl ObligationParams {
    pub fn with_turnover(annual_turnover: Decimal) -> Self {
        ObligationParams {
            annual_turnover: Some(annual_turnover),
            number_of_employees: None,
        }
    }
}

/// Rule set and filing calendar bound to one registry
pub struct ObligationEngine<'r, R: CountryRegistry + ?Sized> {
    registry: &'r R,
}

impl<'r, R: CountryRegistry + ?Sized> ObligationEngine<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        ObligationEngine { registry }
    }

    pub fn registry(&self) -> &'r R {
        self.registry
    }

    pub fn rules(&self) -> ObligationRuleSet<'r, R> {
        ObligationRuleSet::new(self.registry)
    }

    pub fn calendar(&self) -> DueDateCalculator<'r, R> {
        DueDateCalculator::new(self.registry)
    }

    pub fn next_due_date(
        &self,
        country: CountryCode,
        obligation: ObligationType,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        self.calendar().next_due_date(country, obligation, now)
    }

    /// All obligations that apply to `entity` as of `now`, in evaluation order.
    ///
    /// An entity in an unsupported country has no obligations.
    pub fn calculate_obligations(
        &self,
        entity: &Entity,
        params: &ObligationParams,
        now: DateTime<Utc>,
    ) -> Vec<ComplianceObligation> {
        if !self.registry.is_supported(entity.country) {
            log::debug!(
                "Entity {} is in unsupported country {}",
                entity.id,
                entity.country
            );
            return Vec::new();
        }

        let facts = RuleFacts::for_entity(entity)
            .with_turnover(params.annual_turnover.unwrap_or(Decimal::ZERO));
        let rules = self.rules();
        let calendar = self.calendar();

        let obligations: Vec<_> = ObligationType::EVALUATION_ORDER
            .into_iter()
            .filter(|obligation| rules.applies(entity.country, *obligation, &facts))
            .map(|obligation| {
                let due_date = calendar.next_due_date(entity.country, obligation, now);
                ComplianceObligation {
                    id: ComplianceObligation::obligation_id(obligation, &entity.id),
                    obligation_type: obligation,
                    country: entity.country,
                    description: obligation.describe(entity.display_name()),
                    frequency: obligation.frequency(),
                    due_date,
                    status: ObligationStatus::Pending,
                    days_until_due: days_until(due_date, now),
                    requires_documentation: obligation.requires_documentation(),
                    automation_supported: obligation.automation_supported(),
                }
            })
            .collect();

        log::debug!(
            "Entity {} ({}, {}): {} obligations",
            entity.id,
            entity.country,
            facts.entity_type,
            obligations.len()
        );
        obligations
    }
}

/// Obligations for `entity` against the builtin registry
pub fn calculate_obligations(
    entity: &Entity,
    params: &ObligationParams,
    now: DateTime<Utc>,
) -> Vec<ComplianceObligation> {
    ObligationEngine::new(builtin_registry()).calculate_obligations(entity, params, now)
}
