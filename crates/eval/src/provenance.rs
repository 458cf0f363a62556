//! Provenance for diagnosis records.
//!
//! Each record carries provenance recording which rule produced it, where
//! it sat on the agenda, what it captured and which Fact fields were
//! consulted while matching it.

use tuberdx_core::Field;

use crate::types::{Activation, Salience};

/// Provenance record for a single diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiringProvenance {
    /// Name of the rule that produced the record.
    pub rule: &'static str,
    /// Declaration ordinal of that rule.
    pub rule_id: u32,
    pub salience: Salience,
    /// Zero-based position of the activation on the agenda.
    pub agenda_position: usize,
    /// Captured variables and their wire tokens.
    pub bindings: Vec<(&'static str, &'static str)>,
    /// Fact fields consulted while matching.
    pub fields_used: Vec<Field>,
}

impl FiringProvenance {
    pub fn from_activation(activation: &Activation<'_>, agenda_position: usize) -> Self {
        FiringProvenance {
            rule: activation.rule.name,
            rule_id: activation.rule.id,
            salience: activation.rule.salience,
            agenda_position,
            bindings: activation
                .bindings
                .iter()
                .map(|(var, v)| (var, v.as_str()))
                .collect(),
            fields_used: activation.fields_used.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let bindings: serde_json::Map<String, serde_json::Value> = self
            .bindings
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        let fields: Vec<&str> = self.fields_used.iter().map(|f| f.name()).collect();
        serde_json::json!({
            "rule": self.rule,
            "rule_id": self.rule_id,
            "salience": self.salience,
            "agenda_position": self.agenda_position,
            "bindings": bindings,
            "fields_used": fields,
        })
    }
}

/// Collector that tracks Fact field accesses while a rule is matched.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceCollector {
    pub fields_used: Vec<Field>,
}

impl ProvenanceCollector {
    pub fn new() -> Self {
        ProvenanceCollector {
            fields_used: Vec::new(),
        }
    }

    /// Record a field access.
    pub fn record_field(&mut self, field: Field) {
        if !self.fields_used.contains(&field) {
            self.fields_used.push(field);
        }
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionGuard, Bindings, RecordTemplate, Rule, RuleCategory};
    use tuberdx_core::{LeafTexture, Observed};

    #[test]
    fn collector_deduplicates_fields() {
        let mut c = ProvenanceCollector::new();
        c.record_field(Field::ClassifierLabel);
        c.record_field(Field::LeafTexture);
        c.record_field(Field::ClassifierLabel);
        assert_eq!(
            c.into_fields(),
            vec![Field::ClassifierLabel, Field::LeafTexture]
        );
    }

    #[test]
    fn provenance_from_activation() {
        let rule = Rule {
            id: 7,
            name: "probe",
            category: RuleCategory::Direct,
            salience: 3,
            conditions: &[],
            guard: None,
            fires_when: ActionGuard::Always,
            action: RecordTemplate {
                title: "t",
                body: "b",
            },
        };
        let mut bindings = Bindings::new();
        bindings.bind("lt", Observed::LeafTexture(LeafTexture::NormalFirm));
        let activation = Activation {
            rule: &rule,
            bindings,
            fields_used: vec![Field::LeafTexture],
        };

        let p = FiringProvenance::from_activation(&activation, 2);
        assert_eq!(p.rule, "probe");
        assert_eq!(p.rule_id, 7);
        assert_eq!(p.agenda_position, 2);
        assert_eq!(p.bindings, vec![("lt", "normal_firm")]);

        let json = p.to_json();
        assert_eq!(json["bindings"]["lt"], "normal_firm");
        assert_eq!(json["fields_used"], serde_json::json!(["leaf_texture"]));
        assert_eq!(json["salience"], 3);
    }
}
