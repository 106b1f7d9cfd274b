//! Typed subset of the FHIR `ValueSet` and `CodeSystem` resources.
//!
//! Only the elements needed to resolve `compose` are modelled; everything else
//! in the JSON is ignored by serde. Required elements (`url`, `name`,
//! `compose`, `include.system`, `concept.code`) are plain fields so that a
//! missing one fails at the parse boundary instead of during resolution.

use serde::Deserialize;

/// Top-level dispatch on `resourceType`.
#[derive(Debug, Deserialize)]
#[serde(tag = "resourceType")]
pub(crate) enum Resource {
    CodeSystem(CodeSystem),
    ValueSet(ValueSet),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CodeSystem {
    pub id: Option<String>,
    pub url: String,
    pub name: Option<String>,
    /// Top-level concepts in declared order. Absent for `content = not-present`.
    #[serde(default)]
    pub concept: Vec<Concept>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ValueSet {
    pub id: Option<String>,
    pub url: String,
    pub name: String,
    pub compose: Compose,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Compose {
    #[serde(default)]
    pub include: Vec<ConceptSetClause>,
    #[serde(default)]
    pub exclude: Vec<ConceptSetClause>,
}

/// One `compose.include` or `compose.exclude` entry.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConceptSetClause {
    pub system: String,
    pub concept: Option<Vec<Concept>>,
    /// Carried only so a clause relying on filters can be reported; never evaluated.
    #[serde(default)]
    pub filter: Vec<serde_json::Value>,
}

impl ConceptSetClause {
    /// The explicit concept list, or `None` when the clause means "the whole system".
    ///
    /// An empty `concept` array is treated the same as an absent one. Includes use
    /// this; excludes read `concept` directly.
    pub fn explicit_concepts(&self) -> Option<&[Concept]> {
        match self.concept.as_deref() {
            Some(concepts) if !concepts.is_empty() => Some(concepts),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Concept {
    pub code: String,
    pub display: Option<String>,
}

impl Concept {
    pub fn new(code: impl Into<String>, display: Option<&str>) -> Self {
        Self {
            code: code.into(),
            display: display.map(str::to_string),
        }
    }
}

/// A resolved `(system, code, display)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coding {
    pub system: String,
    pub code: String,
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: impl Into<String>, code: impl Into<String>, display: Option<&str>) -> Self {
        Self {
            system: system.into(),
            code: code.into(),
            display: display.map(str::to_string),
        }
    }

    pub(crate) fn from_concept(system: &str, concept: &Concept) -> Self {
        Self {
            system: system.to_string(),
            code: concept.code.clone(),
            display: concept.display.clone(),
        }
    }

    /// Membership identity: display is informational only.
    pub fn matches(&self, system: &str, code: &str) -> bool {
        self.system == system && self.code == code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_set_deserializes_compose() {
        let value = json!({
            "resourceType": "ValueSet",
            "id": "vrdr-manner-of-death-vs",
            "url": "http://hl7.org/fhir/us/vrdr/ValueSet/vrdr-manner-of-death-vs",
            "name": "MannerOfDeathVS",
            "status": "active",
            "compose": {
                "include": [
                    {
                        "system": "http://snomed.info/sct",
                        "concept": [
                            { "code": "38605008", "display": "Natural death" },
                            { "code": "7878000" }
                        ]
                    },
                    { "system": "http://terminology.hl7.org/CodeSystem/v3-NullFlavor" }
                ],
                "exclude": [
                    { "system": "http://snomed.info/sct", "concept": [{ "code": "7878000" }] }
                ]
            }
        });

        let resource: Resource = serde_json::from_value(value).unwrap();
        let Resource::ValueSet(vs) = resource else {
            panic!("expected ValueSet");
        };
        assert_eq!(vs.name, "MannerOfDeathVS");
        assert_eq!(vs.compose.include.len(), 2);
        assert_eq!(vs.compose.exclude.len(), 1);

        let first = vs.compose.include[0].explicit_concepts().unwrap();
        assert_eq!(first[0], Concept::new("38605008", Some("Natural death")));
        assert_eq!(first[1].display, None);
        assert!(vs.compose.include[1].explicit_concepts().is_none());
    }

    #[test]
    fn test_missing_exclude_defaults_to_empty() {
        let vs: ValueSet = serde_json::from_value(json!({
            "url": "http://example.org/vs",
            "name": "ExampleVS",
            "compose": { "include": [{ "system": "S1" }] }
        }))
        .unwrap();
        assert!(vs.compose.exclude.is_empty());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let result: Result<ValueSet, _> = serde_json::from_value(json!({
            "url": "http://example.org/vs",
            "compose": { "include": [] }
        }));
        assert!(result.unwrap_err().to_string().contains("name"));

        let clause: Result<ConceptSetClause, _> =
            serde_json::from_value(json!({ "concept": [{ "code": "A" }] }));
        assert!(clause.is_err());
    }

    #[test]
    fn test_empty_concept_array_means_whole_system() {
        let clause: ConceptSetClause =
            serde_json::from_value(json!({ "system": "S2", "concept": [] })).unwrap();
        assert!(clause.explicit_concepts().is_none());
    }

    #[test]
    fn test_code_system_without_concepts() {
        let resource: Resource = serde_json::from_value(json!({
            "resourceType": "CodeSystem",
            "url": "http://example.org/cs",
            "content": "not-present"
        }))
        .unwrap();
        match resource {
            Resource::CodeSystem(cs) => assert!(cs.concept.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_other_resource_types_are_tolerated() {
        let resource: Resource =
            serde_json::from_value(json!({ "resourceType": "StructureDefinition", "id": "x" }))
                .unwrap();
        assert!(matches!(resource, Resource::Other));
    }

    #[test]
    fn test_coding_matches_ignores_display() {
        let coding = Coding::new("S1", "A", Some("Alpha"));
        assert!(coding.matches("S1", "A"));
        assert!(!coding.matches("S1", "B"));
        assert!(!coding.matches("S2", "A"));
    }
}
