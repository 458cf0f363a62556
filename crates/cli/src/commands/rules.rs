use tuberdx_eval::Catalog;

use crate::OutputFormat;

pub(crate) fn cmd_rules(output: OutputFormat) {
    let catalog = Catalog::builtin();
    match output {
        OutputFormat::Text => {
            for rule in catalog.rules() {
                println!(
                    "{:>2}  {:<22} {:>3}  {:<8}  {}",
                    rule.id, rule.name, rule.salience, rule.category, rule.action.title
                );
            }
        }
        OutputFormat::Json => {
            let rules: Vec<serde_json::Value> = catalog
                .rules()
                .iter()
                .map(|rule| {
                    let conditions: Vec<String> =
                        rule.conditions.iter().map(|c| c.to_string()).collect();
                    serde_json::json!({
                        "id": rule.id,
                        "name": rule.name,
                        "salience": rule.salience,
                        "category": rule.category,
                        "conditions": conditions,
                        "guarded": rule.guard.is_some(),
                        "title": rule.action.title,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "rules": rules }))
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
    }
}
