//! Rule catalog container and its build-time invariants.
//!
//! The catalog is a frozen table shared by every diagnosis. Its structural
//! invariants (a single fallback at the lowest salience, ascending ids,
//! salience tiers that agree with rule categories, record text that fits
//! the `title|body` wire format) are checked by [`Catalog::new`] and, for
//! the built-in catalog, by this module's tests.

use std::collections::BTreeSet;

use tuberdx_core::Field;

use crate::knowledge_base::RULES;
use crate::types::{ActionGuard, Condition, Rule, RuleCategory};
use crate::wire::SEPARATOR;

/// Violations of the catalog invariants. These are programming errors in
/// the rule table, never runtime conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no rules")]
    Empty,

    #[error("catalog has no fallback rule")]
    MissingFallback,

    #[error("catalog has more than one fallback rule: '{first}' and '{second}'")]
    MultipleFallbacks {
        first: &'static str,
        second: &'static str,
    },

    #[error("fallback rule '{rule}' must have no conditions, no guard and fire only on an empty result")]
    MalformedFallback { rule: &'static str },

    #[error("rule '{rule}' fires only on an empty result but is not the fallback")]
    StrayEmptyResultGuard { rule: &'static str },

    #[error("rule '{rule}' has id {id}, not above previous id {previous}")]
    IdsNotAscending {
        rule: &'static str,
        id: u32,
        previous: u32,
    },

    #[error("duplicate rule name '{rule}'")]
    DuplicateName { rule: &'static str },

    #[error("rule '{rule}' requires field '{field}' to equal unset, which never matches")]
    UnsetRequirement { rule: &'static str, field: Field },

    #[error("rule '{rule}' captures variable '{var}' more than once")]
    DuplicateCapture { rule: &'static str, var: &'static str },

    #[error("rule '{rule}' has a guard but captures no variables")]
    GuardWithoutCapture { rule: &'static str },

    #[error("rule '{rule}' record text contains the '|' separator")]
    SeparatorInRecord { rule: &'static str },

    #[error("rule '{rule}' has an empty title")]
    EmptyTitle { rule: &'static str },

    #[error("{higher_category} rule '{higher}' (salience {higher_salience}) must outrank {lower_category} rule '{lower}' (salience {lower_salience})")]
    TierOrder {
        higher: &'static str,
        higher_category: RuleCategory,
        higher_salience: i32,
        lower: &'static str,
        lower_category: RuleCategory,
        lower_salience: i32,
    },
}

/// An ordered, validated, read-only rule table.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    rules: &'static [Rule],
}

static BUILTIN: Catalog = Catalog { rules: RULES };

impl Catalog {
    /// Validate a rule table and wrap it.
    pub fn new(rules: &'static [Rule]) -> Result<Catalog, CatalogError> {
        let catalog = Catalog { rules };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog compiled into the program.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&'static Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn fallback(&self) -> Option<&'static Rule> {
        self.rules
            .iter()
            .find(|r| r.category == RuleCategory::Fallback)
    }

    /// Check every structural invariant.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.rules.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut names = BTreeSet::new();
        let mut previous_id: Option<u32> = None;
        let mut fallback: Option<&Rule> = None;

        for rule in self.rules {
            if !names.insert(rule.name) {
                return Err(CatalogError::DuplicateName { rule: rule.name });
            }
            if let Some(previous) = previous_id {
                if rule.id <= previous {
                    return Err(CatalogError::IdsNotAscending {
                        rule: rule.name,
                        id: rule.id,
                        previous,
                    });
                }
            }
            previous_id = Some(rule.id);

            validate_rule(rule)?;

            if rule.category == RuleCategory::Fallback {
                if let Some(first) = fallback {
                    return Err(CatalogError::MultipleFallbacks {
                        first: first.name,
                        second: rule.name,
                    });
                }
                fallback = Some(rule);
            }
        }

        if fallback.is_none() {
            return Err(CatalogError::MissingFallback);
        }

        validate_tiers(self.rules)
    }
}

fn validate_rule(rule: &Rule) -> Result<(), CatalogError> {
    let is_fallback = rule.category == RuleCategory::Fallback;
    if is_fallback
        && (!rule.conditions.is_empty()
            || rule.guard.is_some()
            || rule.fires_when != ActionGuard::NoPriorRecords)
    {
        return Err(CatalogError::MalformedFallback { rule: rule.name });
    }
    if !is_fallback && rule.fires_when == ActionGuard::NoPriorRecords {
        return Err(CatalogError::StrayEmptyResultGuard { rule: rule.name });
    }

    let mut vars = BTreeSet::new();
    for condition in rule.conditions {
        match condition {
            Condition::Is(value) if value.is_unset() => {
                return Err(CatalogError::UnsetRequirement {
                    rule: rule.name,
                    field: value.field(),
                });
            }
            Condition::Capture { var, .. } if !vars.insert(*var) => {
                return Err(CatalogError::DuplicateCapture {
                    rule: rule.name,
                    var: *var,
                });
            }
            _ => {}
        }
    }
    if rule.guard.is_some() && vars.is_empty() {
        return Err(CatalogError::GuardWithoutCapture { rule: rule.name });
    }

    if rule.action.title.trim().is_empty() {
        return Err(CatalogError::EmptyTitle { rule: rule.name });
    }
    if rule.action.title.contains(SEPARATOR) || rule.action.body.contains(SEPARATOR) {
        return Err(CatalogError::SeparatorInRecord { rule: rule.name });
    }
    Ok(())
}

/// Every rule of a higher tier must strictly outrank every rule of a lower
/// tier: override > conflict > direct > fallback.
fn validate_tiers(rules: &[Rule]) -> Result<(), CatalogError> {
    const TIERS: [RuleCategory; 4] = [
        RuleCategory::Override,
        RuleCategory::Conflict,
        RuleCategory::Direct,
        RuleCategory::Fallback,
    ];

    for (i, upper) in TIERS.iter().enumerate() {
        let Some(weakest) = rules
            .iter()
            .filter(|r| r.category == *upper)
            .min_by_key(|r| r.salience)
        else {
            continue;
        };
        for lower in &TIERS[i + 1..] {
            let strongest = rules
                .iter()
                .filter(|r| r.category == *lower)
                .max_by_key(|r| r.salience);
            if let Some(strongest) = strongest {
                if weakest.salience <= strongest.salience {
                    return Err(CatalogError::TierOrder {
                        higher: weakest.name,
                        higher_category: weakest.category,
                        higher_salience: weakest.salience,
                        lower: strongest.name,
                        lower_category: strongest.category,
                        lower_salience: strongest.salience,
                    });
                }
            }
        }
    }
    Ok(())
}
