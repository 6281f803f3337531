use super::country::CountryCode;
use super::error::EntityError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Normalized kind of legal entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    #[default]
    Company,
    Individual,
    Partnership,
    Freelancer,
    /// Declared type outside the known set; satisfies no entity-type rule
    #[serde(skip)]
    Other,
}

impl EntityType {
    /// Exact tag match for a declared `metadata.entityType`
    pub fn from_declared(declared: &str) -> EntityType {
        match declared {
            "company" => EntityType::Company,
            "individual" => EntityType::Individual,
            "partnership" => EntityType::Partnership,
            "freelancer" => EntityType::Freelancer,
            _ => EntityType::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Company => "company",
            EntityType::Individual => "individual",
            EntityType::Partnership => "partnership",
            EntityType::Freelancer => "freelancer",
            EntityType::Other => "other",
        }
    }

    /// Infer the entity type from a free-text legal form, defaulting to company.
    pub fn from_legal_form(legal_form: &str) -> EntityType {
        let form = legal_form.to_lowercase();
        if form.contains("individual") || form.contains("sole") {
            EntityType::Individual
        } else if form.contains("partnership") {
            EntityType::Partnership
        } else if form.contains("freelancer") || form.contains("contractor") {
            EntityType::Freelancer
        } else {
            EntityType::Company
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loosely structured entity metadata. Only `entityType` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A legal entity whose obligations are being calculated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub country: CountryCode,
    pub legal_form: String,
    pub metadata: EntityMetadata,
}

impl Entity {
    pub fn new(id: impl Into<String>, country: CountryCode, legal_form: impl Into<String>) -> Self {
        Entity {
            id: id.into(),
            name: None,
            country,
            legal_form: legal_form.into(),
            metadata: EntityMetadata::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.metadata.entity_type = Some(entity_type.into());
        self
    }

    /// Name used in obligation descriptions
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Resolve the normalized entity type.
    ///
    /// A non-empty `metadata.entityType` is taken verbatim: the exact lower
    /// case tags map to their type and anything else is `Other`. Without one
    /// the legal form is inspected.
    pub fn classify(&self) -> EntityType {
        match self.metadata.entity_type.as_deref() {
            Some(declared) if !declared.is_empty() => {
                let entity_type = EntityType::from_declared(declared);
                if entity_type == EntityType::Other {
                    log::debug!(
                        "Entity {} declares unrecognized entity type '{}'",
                        self.id,
                        declared
                    );
                }
                entity_type
            }
            _ => EntityType::from_legal_form(&self.legal_form),
        }
    }
}

/// Entity as received from callers, before boundary validation
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityInput {
    /// Stable entity identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Display name used in obligation descriptions
    #[serde(default)]
    pub name: Option<String>,
    /// ISO 3166-1 alpha-2 country code (e.g. AE, SA, EG)
    #[serde(default)]
    pub country: Option<String>,
    /// Legal form, e.g. "LLC", "Sole Establishment", "General Partnership"
    #[serde(default)]
    pub legal_form: Option<String>,
    #[serde(default)]
    pub metadata: Option<EntityMetadata>,
}

impl TryFrom<EntityInput> for Entity {
    type Error = EntityError;

    fn try_from(input: EntityInput) -> Result<Self, Self::Error> {
        let id = input
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or(EntityError::MissingId)?;
        let code = input
            .country
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| EntityError::MissingCountry { id: id.clone() })?;
        let country = code
            .parse::<CountryCode>()
            .map_err(|_| EntityError::InvalidCountryCode {
                id: id.clone(),
                code: code.clone(),
            })?;

        Ok(Entity {
            id,
            name: input.name,
            country,
            legal_form: input.legal_form.unwrap_or_default(),
            metadata: input.metadata.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(legal_form: &str) -> Entity {
        Entity::new("entity-1", CountryCode::AE, legal_form)
    }

    #[test]
    fn declared_entity_type_wins() {
        let e = entity("Sole Establishment").with_entity_type("partnership");
        assert_eq!(e.classify(), EntityType::Partnership);
    }

    #[test]
    fn declared_entity_type_is_case_sensitive() {
        let e = entity("LLC").with_entity_type("Individual");
        assert_eq!(e.classify(), EntityType::Other);
        let e = entity("General Partnership").with_entity_type("Company");
        assert_eq!(e.classify(), EntityType::Other);
    }

    #[test]
    fn unrecognized_declared_type_is_kept_as_other() {
        let e = entity("General Partnership").with_entity_type("trust");
        assert_eq!(e.classify(), EntityType::Other);
        assert_eq!(EntityType::Other.to_string(), "other");
    }

    #[test]
    fn empty_declared_type_uses_legal_form() {
        let e = entity("General Partnership").with_entity_type("");
        assert_eq!(e.classify(), EntityType::Partnership);
    }

    #[test]
    fn legal_form_inference() {
        assert_eq!(entity("Individual Trader").classify(), EntityType::Individual);
        assert_eq!(entity("Sole Proprietorship").classify(), EntityType::Individual);
        assert_eq!(entity("SOLE ESTABLISHMENT").classify(), EntityType::Individual);
        assert_eq!(entity("Limited Partnership").classify(), EntityType::Partnership);
        assert_eq!(entity("Freelancer Permit").classify(), EntityType::Freelancer);
        assert_eq!(entity("Independent Contractor").classify(), EntityType::Freelancer);
    }

    #[test]
    fn unrecognized_legal_form_defaults_to_company() {
        assert_eq!(entity("LLC").classify(), EntityType::Company);
        assert_eq!(entity("").classify(), EntityType::Company);
        assert_eq!(entity("Free Zone Establishment").classify(), EntityType::Company);
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(entity("LLC").display_name(), "entity-1");
        assert_eq!(entity("LLC").with_name("Acme").display_name(), "Acme");
    }

    #[test]
    fn input_validation() {
        let missing_id = EntityInput {
            country: Some("AE".to_string()),
            ..Default::default()
        };
        assert_eq!(Entity::try_from(missing_id), Err(EntityError::MissingId));

        let missing_country = EntityInput {
            id: Some("e1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            Entity::try_from(missing_country),
            Err(EntityError::MissingCountry {
                id: "e1".to_string()
            })
        );

        let bad_country = EntityInput {
            id: Some("e1".to_string()),
            country: Some("UAE".to_string()),
            ..Default::default()
        };
        assert_eq!(
            Entity::try_from(bad_country),
            Err(EntityError::InvalidCountryCode {
                id: "e1".to_string(),
                code: "UAE".to_string()
            })
        );
    }

    #[test]
    fn unsupported_but_well_formed_country_is_accepted() {
        let input = EntityInput {
            id: Some("e1".to_string()),
            country: Some("fr".to_string()),
            ..Default::default()
        };
        let entity = Entity::try_from(input).unwrap();
        assert_eq!(entity.country.as_str(), "FR");
    }

    #[test]
    fn read_entity_with_extra_metadata() {
        let json = r#"{
            "id": "entity-1",
            "name": "Test Company",
            "country": "SA",
            "legalForm": "LLC",
            "metadata": { "entityType": "company", "activityCode": "1234" }
        }"#;
        let input: EntityInput = serde_json::from_str(json).unwrap();
        let entity = Entity::try_from(input).unwrap();
        assert_eq!(entity.country, CountryCode::SA);
        assert_eq!(entity.metadata.entity_type.as_deref(), Some("company"));
        assert_eq!(
            entity.metadata.extra.get("activityCode"),
            Some(&Value::String("1234".to_string()))
        );
    }
}
