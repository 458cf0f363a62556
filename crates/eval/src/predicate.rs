//! Condition matching against a Fact.
//!
//! A rule's left-hand side is a conjunction: every condition must hold.
//! Equality conditions never match an unset field. Captures always succeed
//! and bind the field's actual value, unset included; guards decide what to
//! make of it.

use tuberdx_core::Fact;

use crate::provenance::ProvenanceCollector;
use crate::types::{Bindings, Condition, Rule};

/// Evaluate a single condition, extending `bindings` on capture.
pub fn eval_condition(
    condition: &Condition,
    fact: &Fact,
    bindings: &mut Bindings,
    collector: &mut ProvenanceCollector,
) -> bool {
    let field = condition.field();
    collector.record_field(field);
    let actual = fact.get(field);
    match condition {
        Condition::Is(expected) => !actual.is_unset() && actual == *expected,
        Condition::Capture { var, .. } => {
            bindings.bind(*var, actual);
            true
        }
    }
}

/// Match a rule's conditions and guard against a Fact.
///
/// Returns the captured bindings if the rule matches, `None` otherwise.
/// Evaluation short-circuits on the first failing condition.
pub fn match_rule(
    rule: &Rule,
    fact: &Fact,
    collector: &mut ProvenanceCollector,
) -> Option<Bindings> {
    let mut bindings = Bindings::new();
    for condition in rule.conditions {
        if !eval_condition(condition, fact, &mut bindings, collector) {
            return None;
        }
    }
    match rule.guard {
        Some(guard) if !guard(&bindings) => None,
        _ => Some(bindings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionGuard, RecordTemplate, RuleCategory};
    use tuberdx_core::{
        ClassifierLabel, Field, LeafTexture, Observed, StemSticky, TuberFirmness,
    };

    fn rule(conditions: &'static [Condition], guard: Option<crate::types::Guard>) -> Rule {
        Rule {
            id: 1,
            name: "probe",
            category: RuleCategory::Direct,
            salience: 0,
            conditions,
            guard,
            fires_when: ActionGuard::Always,
            action: RecordTemplate {
                title: "probe",
                body: "probe",
            },
        }
    }

    fn soft_either(b: &Bindings) -> bool {
        b.is("lt", Observed::LeafTexture(LeafTexture::SoftMushy))
            || b.is("tf", Observed::TuberFirmness(TuberFirmness::SoftMushy))
    }

    #[test]
    fn equality_matches_observed_value() {
        let fact = Fact::builder(ClassifierLabel::Healthy)
            .stem_sticky(StemSticky::Yes)
            .build();
        let mut b = Bindings::new();
        let mut c = ProvenanceCollector::new();
        assert!(eval_condition(
            &Condition::Is(Observed::StemSticky(StemSticky::Yes)),
            &fact,
            &mut b,
            &mut c
        ));
        assert!(!eval_condition(
            &Condition::Is(Observed::StemSticky(StemSticky::No)),
            &fact,
            &mut b,
            &mut c
        ));
        assert_eq!(c.fields_used, vec![Field::StemSticky]);
    }

    #[test]
    fn equality_never_matches_unset() {
        let fact = Fact::builder(ClassifierLabel::Healthy).build();
        let mut b = Bindings::new();
        let mut c = ProvenanceCollector::new();
        assert!(!eval_condition(
            &Condition::Is(Observed::StemSticky(StemSticky::Unset)),
            &fact,
            &mut b,
            &mut c
        ));
    }

    #[test]
    fn capture_binds_actual_value() {
        let fact = Fact::builder(ClassifierLabel::Healthy)
            .leaf_texture(LeafTexture::DryBrittle)
            .build();
        let r = rule(
            &[
                Condition::Capture {
                    field: Field::LeafTexture,
                    var: "lt",
                },
                Condition::Capture {
                    field: Field::TuberFirmness,
                    var: "tf",
                },
            ],
            None,
        );
        let mut c = ProvenanceCollector::new();
        let b = match_rule(&r, &fact, &mut c).unwrap();
        assert_eq!(b.leaf_texture("lt"), Some(LeafTexture::DryBrittle));
        assert_eq!(b.tuber_firmness("tf"), Some(TuberFirmness::Unset));
    }

    #[test]
    fn guard_gates_match() {
        let r = rule(
            &[
                Condition::Is(Observed::Label(ClassifierLabel::CassavaBacterialBlight)),
                Condition::Capture {
                    field: Field::LeafTexture,
                    var: "lt",
                },
                Condition::Capture {
                    field: Field::TuberFirmness,
                    var: "tf",
                },
            ],
            Some(soft_either),
        );

        let firm = Fact::builder(ClassifierLabel::CassavaBacterialBlight)
            .leaf_texture(LeafTexture::NormalFirm)
            .tuber_firmness(TuberFirmness::NormalFirm)
            .build();
        assert!(match_rule(&r, &firm, &mut ProvenanceCollector::new()).is_none());

        let rotting = Fact::builder(ClassifierLabel::CassavaBacterialBlight)
            .tuber_firmness(TuberFirmness::SoftMushy)
            .build();
        assert!(match_rule(&r, &rotting, &mut ProvenanceCollector::new()).is_some());
    }

    #[test]
    fn failing_condition_short_circuits() {
        let r = rule(
            &[
                Condition::Is(Observed::Label(ClassifierLabel::Healthy)),
                Condition::Is(Observed::StemSticky(StemSticky::Yes)),
            ],
            None,
        );
        let fact = Fact::builder(ClassifierLabel::Unknown).build();
        let mut c = ProvenanceCollector::new();
        assert!(match_rule(&r, &fact, &mut c).is_none());
        assert_eq!(c.fields_used, vec![Field::ClassifierLabel]);
    }

    #[test]
    fn no_conditions_matches_anything() {
        let r = rule(&[], None);
        let fact = Fact::builder(ClassifierLabel::Unknown).build();
        let b = match_rule(&r, &fact, &mut ProvenanceCollector::new()).unwrap();
        assert!(b.is_empty());
    }
}
