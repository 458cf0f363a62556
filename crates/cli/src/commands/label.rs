use tuberdx_core::{info_card, ClassifierLabel, DiseaseInfo};

use crate::OutputFormat;

pub(crate) fn cmd_label(class_id: &str, output: OutputFormat) {
    let label = ClassifierLabel::from_class_id(class_id);
    let card = info_card(label);
    match output {
        OutputFormat::Text => {
            println!("Label: {}", label);
            if card == &DiseaseInfo::UNKNOWN {
                println!("{}", card.title);
                return;
            }
            println!("Title: {}", card.title);
            println!("Description: {}", card.description);
            println!("Symptoms: {}", card.symptoms);
            println!("Management: {}", card.management);
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "class_id": class_id,
                "label": label,
                "info": card,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json)
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
    }
}
