//! Agenda-based rule execution.
//!
//! One run is three phases over a frozen catalog:
//! 1. Match: every rule is tested against the Fact; matching rules become
//!    activations carrying their bindings.
//! 2. Agenda: activations are ordered by salience descending, ties broken by
//!    ascending rule id (declaration order).
//! 3. Execute: activations fire strictly in agenda order. Each firing
//!    appends one record to a buffer owned by this run. Action guards are
//!    checked at the moment an activation is reached, so the fallback sees
//!    exactly the records fired before it.
//!
//! Actions never touch the Fact, so a single match phase suffices; there is
//! no re-matching after a firing.

use std::cmp::Reverse;

use tracing::{debug, trace};
use tuberdx_core::Fact;

use crate::catalog::Catalog;
use crate::predicate::match_rule;
use crate::provenance::{FiringProvenance, ProvenanceCollector};
use crate::types::{ActionGuard, Activation, Diagnosis, DiagnosisResult};

/// Match phase: collect activations in declaration order.
pub fn match_rules<'c>(catalog: &'c Catalog, fact: &Fact) -> Vec<Activation<'c>> {
    let mut activations = Vec::new();
    for rule in catalog.rules() {
        let mut collector = ProvenanceCollector::new();
        if let Some(bindings) = match_rule(rule, fact, &mut collector) {
            trace!(rule = rule.name, salience = rule.salience, "rule matched");
            activations.push(Activation {
                rule,
                bindings,
                fields_used: collector.into_fields(),
            });
        }
    }
    activations
}

/// Agenda phase: order activations for execution.
///
/// Salience descending; equal salience resolves to ascending rule id, so
/// earlier-declared rules fire first.
pub fn build_agenda(mut activations: Vec<Activation<'_>>) -> Vec<Activation<'_>> {
    activations.sort_by_key(|a| (Reverse(a.rule.salience), a.rule.id));
    activations
}

/// Execution phase: fire activations in order into a fresh result buffer.
pub fn execute(agenda: &[Activation<'_>]) -> DiagnosisResult {
    let mut results = DiagnosisResult::new();
    for (position, activation) in agenda.iter().enumerate() {
        let rule = activation.rule;
        let should_fire = match rule.fires_when {
            ActionGuard::Always => true,
            ActionGuard::NoPriorRecords => results.is_empty(),
        };
        if !should_fire {
            debug!(
                rule = rule.name,
                prior = results.len(),
                "suppressed: earlier rules already produced records"
            );
            continue;
        }

        let record = rule.action.render(&activation.bindings);
        debug!(rule = rule.name, position, title = %record.title, "rule fired");
        results.push(Diagnosis {
            record,
            provenance: FiringProvenance::from_activation(activation, position),
        });
    }
    results
}

/// Run all three phases of one diagnosis.
pub fn run(catalog: &Catalog, fact: &Fact) -> DiagnosisResult {
    let activations = match_rules(catalog, fact);
    let agenda = build_agenda(activations);
    debug!(
        agenda = ?agenda.iter().map(|a| a.rule.name).collect::<Vec<_>>(),
        "agenda built"
    );
    let results = execute(&agenda);
    debug_assert!(
        !results.is_empty(),
        "catalog without a reachable fallback produced no records"
    );
    results
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bindings, Condition, RecordTemplate, Rule, RuleCategory};
    use tuberdx_core::{
        ClassifierLabel, Field, LeafTexture, Observed, StemSticky, TuberFirmness,
    };

    const FALLBACK: Rule = Rule {
        id: 100,
        name: "fallback",
        category: RuleCategory::Fallback,
        salience: -1,
        conditions: &[],
        guard: None,
        fires_when: ActionGuard::NoPriorRecords,
        action: RecordTemplate {
            title: "fallback",
            body: "nothing matched",
        },
    };

    const HEALTHY: Rule = Rule {
        id: 1,
        name: "a",
        category: RuleCategory::Direct,
        salience: 0,
        conditions: &[Condition::Is(Observed::Label(ClassifierLabel::Healthy))],
        guard: None,
        fires_when: ActionGuard::Always,
        action: RecordTemplate {
            title: "a",
            body: "a",
        },
    };

    fn healthy() -> Fact {
        Fact::builder(ClassifierLabel::Healthy).build()
    }

    fn catalog(rules: &'static [Rule]) -> Catalog {
        Catalog::new(rules).unwrap()
    }

    #[test]
    fn equal_salience_fires_in_declaration_order() {
        static RULES: [Rule; 4] = [
            HEALTHY,
            Rule {
                id: 2,
                name: "b",
                action: RecordTemplate {
                    title: "b",
                    body: "b",
                },
                ..HEALTHY
            },
            Rule {
                id: 3,
                name: "c",
                action: RecordTemplate {
                    title: "c",
                    body: "c",
                },
                ..HEALTHY
            },
            FALLBACK,
        ];
        let result = run(&catalog(&RULES), &healthy());
        assert_eq!(result.titles(), vec!["a", "b", "c"]);
    }

    #[test]
    fn salience_outranks_declaration_order() {
        static RULES: [Rule; 3] = [
            HEALTHY,
            Rule {
                id: 2,
                name: "urgent",
                category: RuleCategory::Override,
                salience: 5,
                action: RecordTemplate {
                    title: "urgent",
                    body: "urgent",
                },
                ..HEALTHY
            },
            FALLBACK,
        ];
        let result = run(&catalog(&RULES), &healthy());
        assert_eq!(result.titles(), vec!["urgent", "a"]);
        let positions: Vec<usize> = result.iter().map(|d| d.provenance.agenda_position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn fallback_fires_only_when_nothing_else_did() {
        static RULES: [Rule; 2] = [HEALTHY, FALLBACK];
        let c = catalog(&RULES);

        let matched = run(&c, &healthy());
        assert_eq!(matched.rules_fired(), vec!["a"]);

        let unmatched = run(&c, &Fact::builder(ClassifierLabel::Unknown).build());
        assert_eq!(unmatched.rules_fired(), vec!["fallback"]);
        assert_eq!(unmatched.0[0].record.body, "nothing matched");
    }

    #[test]
    fn fallback_is_on_agenda_even_when_suppressed() {
        static RULES: [Rule; 2] = [HEALTHY, FALLBACK];
        let c = catalog(&RULES);
        let agenda = build_agenda(match_rules(&c, &healthy()));
        let names: Vec<&str> = agenda.iter().map(|a| a.rule.name).collect();
        assert_eq!(names, vec!["a", "fallback"]);
        assert_eq!(execute(&agenda).len(), 1);
    }

    #[test]
    fn execution_checks_empty_result_at_fire_time() {
        // Agenda holds only the fallback: it sees an empty buffer and fires.
        static RULES: [Rule; 1] = [FALLBACK];
        let c = catalog(&RULES);
        let agenda = build_agenda(match_rules(&c, &healthy()));
        let result = execute(&agenda);
        assert_eq!(result.rules_fired(), vec!["fallback"]);
    }

    fn soft_leaf(b: &Bindings) -> bool {
        b.is("lt", Observed::LeafTexture(LeafTexture::SoftMushy))
    }

    #[test]
    fn guard_and_bindings_flow_into_record() {
        static RULES: [Rule; 2] = [
            Rule {
                conditions: &[
                    Condition::Is(Observed::Label(ClassifierLabel::Healthy)),
                    Condition::Capture {
                        field: Field::LeafTexture,
                        var: "lt",
                    },
                ],
                guard: Some(soft_leaf),
                action: RecordTemplate {
                    title: "soft",
                    body: "leaves are {lt}",
                },
                ..HEALTHY
            },
            FALLBACK,
        ];
        let c = catalog(&RULES);

        let soft = Fact::builder(ClassifierLabel::Healthy)
            .leaf_texture(LeafTexture::SoftMushy)
            .build();
        let result = run(&c, &soft);
        assert_eq!(result.0[0].record.body, "leaves are soft_mushy");
        assert_eq!(result.0[0].provenance.bindings, vec![("lt", "soft_mushy")]);
        assert_eq!(
            result.0[0].provenance.fields_used,
            vec![Field::ClassifierLabel, Field::LeafTexture]
        );

        let firm = Fact::builder(ClassifierLabel::Healthy)
            .leaf_texture(LeafTexture::NormalFirm)
            .build();
        assert_eq!(run(&c, &firm).rules_fired(), vec!["fallback"]);
    }

    #[test]
    fn match_phase_keeps_declaration_order() {
        let fact = Fact::builder(ClassifierLabel::Healthy)
            .stem_sticky(StemSticky::Yes)
            .leaf_texture(LeafTexture::NormalSoftPuckered)
            .tuber_firmness(TuberFirmness::NormalFirm)
            .build();
        let names: Vec<&str> = match_rules(Catalog::builtin(), &fact)
            .iter()
            .map(|a| a.rule.name)
            .collect();
        assert_eq!(
            names,
            vec!["override_cbb_critical", "override_mosaic", "fallback"]
        );
    }
}
