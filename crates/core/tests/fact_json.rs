//! Serialized form of Facts and labels, as exchanged with the
//! symptom-collection side.

use serde_json::json;
use tuberdx_core::{ClassifierLabel, Fact, LeafTexture, StemSticky, TuberSmell};

#[test]
fn fact_serializes_with_field_names_and_wire_tokens() {
    let fact = Fact::builder(ClassifierLabel::CassavaBacterialBlight)
        .leaf_texture(LeafTexture::SoftMushy)
        .stem_sticky(StemSticky::Yes)
        .tuber_smell(TuberSmell::Foul)
        .build();

    assert_eq!(
        serde_json::to_value(fact).unwrap(),
        json!({
            "classifier_label": "Cassava Bacterial Blight",
            "leaf_texture": "soft_mushy",
            "stem_lesion": "unset",
            "stem_sticky": "yes",
            "tuber_texture": "unset",
            "tuber_firmness": "unset",
            "tuber_smell": "foul"
        })
    );
}

#[test]
fn label_accepts_display_name_and_identifier() {
    let by_name: ClassifierLabel = serde_json::from_value(json!("Yam Mosaic Virus")).unwrap();
    let by_ident: ClassifierLabel = serde_json::from_value(json!("yam_mosaic_virus")).unwrap();
    assert_eq!(by_name, ClassifierLabel::YamMosaicVirus);
    assert_eq!(by_ident, by_name);
}

#[test]
fn symptom_rejects_unknown_token() {
    assert!(serde_json::from_value::<LeafTexture>(json!("crispy")).is_err());
}

#[test]
fn every_enumerated_fact_is_distinct() {
    let mut seen = std::collections::HashSet::new();
    for fact in Fact::enumerate_all() {
        assert!(seen.insert(fact), "duplicate {}", fact);
    }
    assert_eq!(seen.len(), 6 * 5 * 3 * 3 * 3 * 3 * 3);
}
