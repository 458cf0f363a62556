//! Tuber-crop diagnosis inference engine -- matches a Fact against the
//! built-in rule catalog and produces ordered diagnosis records with
//! provenance.
//!
//! The engine is synchronous and pure: `diagnose` performs no I/O, keeps no
//! state between calls, and reads the catalog as a frozen shared table, so
//! it may be called from any number of threads at once.

pub mod assemble;
pub mod catalog;
pub mod fact_provider;
pub mod knowledge_base;
pub mod predicate;
pub mod provenance;
pub mod rules;
pub mod types;
pub mod wire;

pub use catalog::{Catalog, CatalogError};
pub use fact_provider::{FactProvider, FactProviderError, JsonFactProvider, StaticFactProvider};
pub use provenance::FiringProvenance;
pub use types::{
    ActionGuard, Activation, Bindings, Condition, Diagnosis, DiagnosisRecord, DiagnosisResult,
    EvalError, RecordTemplate, Rule, RuleCategory, Salience,
};
pub use wire::WireError;

use tracing::info;
use tuberdx_core::Fact;

/// Diagnose one case against the built-in catalog.
///
/// The result is never empty: when no other rule fires, the fallback
/// record is produced.
pub fn diagnose(fact: &Fact) -> DiagnosisResult {
    diagnose_with(Catalog::builtin(), fact)
}

/// Diagnose one case against a specific catalog.
pub fn diagnose_with(catalog: &Catalog, fact: &Fact) -> DiagnosisResult {
    let result = rules::run(catalog, fact);
    info!(
        fact = %fact,
        records = result.len(),
        rules = ?result.rules_fired(),
        "diagnosis complete"
    );
    result
}

/// Assemble a Fact from an observation document and diagnose it.
///
/// This is the top-level API for callers holding raw observations. It fails
/// only if the observations do not form a valid Fact.
pub fn evaluate(observations: &serde_json::Value) -> Result<DiagnosisResult, EvalError> {
    let fact = assemble::assemble_fact(observations)?;
    Ok(diagnose(&fact))
}

/// Fetch observations from a provider, then assemble and diagnose them.
pub async fn diagnose_from<P>(provider: &P) -> Result<DiagnosisResult, EvalError>
where
    P: FactProvider + ?Sized,
{
    let observations = provider.provide().await?;
    evaluate(&serde_json::Value::Object(observations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tuberdx_core::{ClassifierLabel, FactError};

    #[test]
    fn evaluate_runs_full_pipeline() {
        let result = evaluate(&json!({
            "classifier_label": "Healthy",
            "stem_sticky": "yes"
        }))
        .unwrap();
        assert_eq!(
            result.titles(),
            vec!["CRITICAL: Cassava Bacterial Blight (Symptom Override)"]
        );
    }

    #[test]
    fn evaluate_rejects_malformed_fact() {
        let err = evaluate(&json!({ "stem_sticky": "sometimes" })).unwrap_err();
        assert!(matches!(err, EvalError::Fact(FactError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn diagnose_from_static_provider() {
        let mut obs = fact_provider::Observations::new();
        obs.insert("classifier_label".to_string(), "Unknown".into());
        let provider = StaticFactProvider::new(obs);
        let result = diagnose_from(&provider).await.unwrap();
        assert_eq!(result.rules_fired(), vec!["fallback"]);
    }

    #[tokio::test]
    async fn diagnose_from_dyn_provider() {
        let provider: Box<dyn FactProvider> = Box::new(StaticFactProvider::empty());
        let result = diagnose_from(provider.as_ref()).await.unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn diagnose_is_thread_safe() {
        let fact = Fact::builder(ClassifierLabel::Healthy).build();
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(move || diagnose(&fact).titles().join(";")))
            .collect();
        let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    }
}
