//! Disease information cards shown alongside the classifier's label.

use serde::Serialize;

use crate::label::ClassifierLabel;

/// Summary of a disease the classifier can report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiseaseInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub symptoms: &'static str,
    pub management: &'static str,
}

impl DiseaseInfo {
    /// Card for labels without curated information.
    pub const UNKNOWN: DiseaseInfo = DiseaseInfo {
        title: "Unknown",
        description: "",
        symptoms: "",
        management: "",
    };
}

static CASSAVA_BACTERIAL_BLIGHT: DiseaseInfo = DiseaseInfo {
    title: "Cassava Bacterial Blight (CBB)",
    description: "Caused by Xanthomonas axonopodis pv. manihotis; leads to yield loss.",
    symptoms: "Angular water-soaked spots, stem ooze, dieback.",
    management: "Use healthy cuttings, rotate crops, prune infected parts.",
};

static CASSAVA_MOSAIC_VIRUS: DiseaseInfo = DiseaseInfo {
    title: "Cassava Mosaic Disease (CMD)",
    description: "Viral disease spread by whiteflies & cuttings.",
    symptoms: "Mosaic leaf pattern, yellow patches, leaf distortion.",
    management: "Plant resistant varieties, rogue infected plants.",
};

static HEALTHY: DiseaseInfo = DiseaseInfo {
    title: "Healthy",
    description: "No visible disease signs detected.",
    symptoms: "No spots, yellowing, or leaf distortion.",
    management: "Keep monitoring, maintain good farming practice.",
};

/// Information card for a classifier label. Labels without a curated card
/// get [`DiseaseInfo::UNKNOWN`].
pub fn info_card(label: ClassifierLabel) -> &'static DiseaseInfo {
    match label {
        ClassifierLabel::CassavaBacterialBlight => &CASSAVA_BACTERIAL_BLIGHT,
        ClassifierLabel::CassavaMosaicVirus => &CASSAVA_MOSAIC_VIRUS,
        ClassifierLabel::Healthy => &HEALTHY,
        ClassifierLabel::YamAnthracnose
        | ClassifierLabel::YamMosaicVirus
        | ClassifierLabel::Unknown => &DiseaseInfo::UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cassava_labels_have_cards() {
        assert_eq!(
            info_card(ClassifierLabel::CassavaBacterialBlight).title,
            "Cassava Bacterial Blight (CBB)"
        );
        assert_eq!(
            info_card(ClassifierLabel::CassavaMosaicVirus).title,
            "Cassava Mosaic Disease (CMD)"
        );
        assert_eq!(info_card(ClassifierLabel::Healthy).title, "Healthy");
    }

    #[test]
    fn uncurated_labels_fall_back_to_unknown() {
        assert_eq!(
            info_card(ClassifierLabel::YamAnthracnose),
            &DiseaseInfo::UNKNOWN
        );
        assert_eq!(info_card(ClassifierLabel::Unknown).title, "Unknown");
        assert!(info_card(ClassifierLabel::Unknown).management.is_empty());
    }
}
