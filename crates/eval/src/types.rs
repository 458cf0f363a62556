//! Rule representation, bindings and diagnosis output types.
//!
//! Rules are plain data: a conjunction of conditions, an optional guard over
//! captured variables, a salience and a record template. Nothing here is
//! dispatched dynamically; the engine loops over a table of these.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tuberdx_core::{FactError, Field, LeafTexture, Observed, TuberFirmness};

use crate::fact_provider::FactProviderError;
use crate::provenance::FiringProvenance;

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors that can occur between receiving observations and running the
/// engine. The engine itself is total over valid Facts and never fails.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// The observations did not form a valid Fact.
    #[error(transparent)]
    Fact(#[from] FactError),

    /// The symptom-collection collaborator failed to deliver observations.
    #[error(transparent)]
    Provider(#[from] FactProviderError),
}

// ──────────────────────────────────────────────
// Rules
// ──────────────────────────────────────────────

/// Firing priority. Higher fires earlier.
pub type Salience = i32;

/// One conjunct of a rule's left-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The field must hold exactly this value. An unset field never
    /// satisfies this test.
    Is(Observed),
    /// Bind the field's actual value, whatever it is, to `var`.
    Capture { field: Field, var: &'static str },
}

impl Condition {
    pub fn field(&self) -> Field {
        match self {
            Condition::Is(v) => v.field(),
            Condition::Capture { field, .. } => *field,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Is(v) => write!(f, "{}", v),
            Condition::Capture { field, var } => write!(f, "{}=?{}", field, var),
        }
    }
}

/// Predicate over the variables captured by a rule's conditions.
pub type Guard = fn(&Bindings) -> bool;

/// Condition checked when an activation reaches the front of the agenda,
/// against the records produced so far in the same run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionGuard {
    /// Fire unconditionally.
    Always,
    /// Fire only if no earlier activation produced a record.
    NoPriorRecords,
}

/// What kind of evidence a rule encodes. Informational only; the engine
/// orders by salience, and catalog validation checks that saliences agree
/// with these tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Symptoms contradict a Healthy or different-disease label.
    Override,
    /// Label and symptoms point at different disease families.
    Conflict,
    /// Conditions reference only the label and observed fields.
    Direct,
    /// Fires when nothing else produced a record.
    Fallback,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Override => "override",
            RuleCategory::Conflict => "conflict",
            RuleCategory::Direct => "direct",
            RuleCategory::Fallback => "fallback",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Title and body of the record a rule produces.
///
/// The body may reference captured variables as `{name}`; they are replaced
/// with the bound value's wire token when the rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTemplate {
    pub title: &'static str,
    pub body: &'static str,
}

impl RecordTemplate {
    pub fn render(&self, bindings: &Bindings) -> DiagnosisRecord {
        let mut body = self.body.to_string();
        for (var, value) in bindings.iter() {
            let placeholder = format!("{{{}}}", var);
            if body.contains(&placeholder) {
                body = body.replace(&placeholder, value.as_str());
            }
        }
        DiagnosisRecord {
            title: self.title.to_string(),
            body,
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Declaration ordinal. Breaks salience ties, lower first.
    pub id: u32,
    pub name: &'static str,
    pub category: RuleCategory,
    pub salience: Salience,
    pub conditions: &'static [Condition],
    pub guard: Option<Guard>,
    pub fires_when: ActionGuard,
    pub action: RecordTemplate,
}

impl Rule {
    /// Variables this rule's conditions capture, in condition order.
    pub fn captures(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.conditions.iter().filter_map(|c| match c {
            Condition::Capture { var, .. } => Some(*var),
            Condition::Is(_) => None,
        })
    }
}

// ──────────────────────────────────────────────
// Bindings
// ──────────────────────────────────────────────

/// Variables captured while matching one rule against one Fact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<&'static str, Observed>);

impl Bindings {
    pub fn new() -> Self {
        Bindings(BTreeMap::new())
    }

    pub fn bind(&mut self, var: &'static str, value: Observed) {
        self.0.insert(var, value);
    }

    pub fn get(&self, var: &str) -> Option<Observed> {
        self.0.get(var).copied()
    }

    /// True when `var` is bound to exactly `expected`. An unset binding
    /// never equals anything, mirroring equality conditions.
    pub fn is(&self, var: &str, expected: Observed) -> bool {
        match self.get(var) {
            Some(v) => !v.is_unset() && v == expected,
            None => false,
        }
    }

    pub fn leaf_texture(&self, var: &str) -> Option<LeafTexture> {
        match self.get(var) {
            Some(Observed::LeafTexture(v)) => Some(v),
            _ => None,
        }
    }

    pub fn tuber_firmness(&self, var: &str) -> Option<TuberFirmness> {
        match self.get(var) {
            Some(Observed::TuberFirmness(v)) => Some(v),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Observed)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ──────────────────────────────────────────────
// Activations
// ──────────────────────────────────────────────

/// A rule whose conditions and guard hold for a given Fact.
#[derive(Debug, Clone)]
pub struct Activation<'c> {
    pub rule: &'c Rule,
    pub bindings: Bindings,
    /// Fact fields consulted while matching, in first-access order.
    pub fields_used: Vec<Field>,
}

// ──────────────────────────────────────────────
// Output
// ──────────────────────────────────────────────

/// One diagnostic statement with its embedded recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub title: String,
    pub body: String,
}

/// A record together with the firing that produced it.
#[derive(Debug, Clone)]
pub struct Diagnosis {
    pub record: DiagnosisRecord,
    pub provenance: FiringProvenance,
}

/// Ordered records of one diagnostic session.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisResult(pub Vec<Diagnosis>);

impl DiagnosisResult {
    pub fn new() -> Self {
        DiagnosisResult(Vec::new())
    }

    pub fn push(&mut self, diagnosis: Diagnosis) {
        self.0.push(diagnosis);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnosis> {
        self.0.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &DiagnosisRecord> {
        self.0.iter().map(|d| &d.record)
    }

    pub fn titles(&self) -> Vec<&str> {
        self.0.iter().map(|d| d.record.title.as_str()).collect()
    }

    /// Names of the rules that fired, in execution order.
    pub fn rules_fired(&self) -> Vec<&'static str> {
        self.0.iter().map(|d| d.provenance.rule).collect()
    }

    pub fn into_records(self) -> Vec<DiagnosisRecord> {
        self.0.into_iter().map(|d| d.record).collect()
    }

    /// Serialize to JSON output format.
    pub fn to_json(&self) -> serde_json::Value {
        let diagnoses: Vec<serde_json::Value> = self
            .0
            .iter()
            .map(|d| {
                serde_json::json!({
                    "title": d.record.title,
                    "body": d.record.body,
                    "provenance": d.provenance.to_json(),
                })
            })
            .collect();
        serde_json::json!({ "diagnoses": diagnoses })
    }

    /// Rule, title and bindings per record; the shape of conformance
    /// expectations.
    pub fn to_summary_json(&self) -> serde_json::Value {
        let diagnoses: Vec<serde_json::Value> = self
            .0
            .iter()
            .map(|d| {
                let bindings: serde_json::Map<String, serde_json::Value> = d
                    .provenance
                    .bindings
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
                    .collect();
                serde_json::json!({
                    "rule": d.provenance.rule,
                    "title": d.record.title,
                    "bindings": bindings,
                })
            })
            .collect();
        serde_json::json!({ "diagnoses": diagnoses })
    }
}

impl<'a> IntoIterator for &'a DiagnosisResult {
    type Item = &'a Diagnosis;
    type IntoIter = std::slice::Iter<'a, Diagnosis>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuberdx_core::StemSticky;

    #[test]
    fn bindings_is_ignores_unset() {
        let mut b = Bindings::new();
        b.bind("lt", Observed::LeafTexture(LeafTexture::Unset));
        assert!(!b.is("lt", Observed::LeafTexture(LeafTexture::Unset)));
        b.bind("lt", Observed::LeafTexture(LeafTexture::SoftMushy));
        assert!(b.is("lt", Observed::LeafTexture(LeafTexture::SoftMushy)));
        assert!(!b.is("missing", Observed::LeafTexture(LeafTexture::SoftMushy)));
    }

    #[test]
    fn bindings_typed_accessors() {
        let mut b = Bindings::new();
        b.bind("tf", Observed::TuberFirmness(TuberFirmness::NormalFirm));
        assert_eq!(b.tuber_firmness("tf"), Some(TuberFirmness::NormalFirm));
        assert_eq!(b.leaf_texture("tf"), None);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn template_substitutes_bound_variables() {
        let template = RecordTemplate {
            title: "Sticky stem",
            body: "Stem reported as {s}; leaves {lt}; {other} stays.",
        };
        let mut b = Bindings::new();
        b.bind("s", Observed::StemSticky(StemSticky::Yes));
        b.bind("lt", Observed::LeafTexture(LeafTexture::DryBrittle));
        let record = template.render(&b);
        assert_eq!(record.title, "Sticky stem");
        assert_eq!(
            record.body,
            "Stem reported as yes; leaves dry_brittle; {other} stays."
        );
    }

    #[test]
    fn condition_display() {
        let c = Condition::Is(Observed::StemSticky(StemSticky::Yes));
        assert_eq!(c.to_string(), "stem_sticky=yes");
        let c = Condition::Capture {
            field: Field::LeafTexture,
            var: "lt",
        };
        assert_eq!(c.to_string(), "leaf_texture=?lt");
        assert_eq!(c.field(), Field::LeafTexture);
    }
}
