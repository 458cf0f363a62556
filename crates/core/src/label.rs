//! Classifier labels and the mapping from raw classifier class ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FactError;
use crate::fact::Field;

/// Canonical label produced by the leaf image classifier.
///
/// `Unknown` is a real label (the classifier produced something outside the
/// mapped set, or never ran); there is no `unset` for this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassifierLabel {
    #[serde(rename = "Cassava Bacterial Blight", alias = "cassava_bacterial_blight")]
    CassavaBacterialBlight,
    #[serde(rename = "Cassava Mosaic Virus", alias = "cassava_mosaic_virus")]
    CassavaMosaicVirus,
    #[serde(rename = "Yam Anthracnose", alias = "yam_anthracnose")]
    YamAnthracnose,
    #[serde(rename = "Yam Mosaic Virus", alias = "yam_mosaic_virus")]
    YamMosaicVirus,
    #[serde(rename = "Healthy", alias = "healthy")]
    Healthy,
    #[serde(rename = "Unknown", alias = "unknown")]
    Unknown,
}

/// Raw class ids emitted by the classifier model, in output-index order,
/// with the canonical label each maps to.
const CLASS_ID_MAP: &[(&str, ClassifierLabel)] = &[
    ("cassava_blight", ClassifierLabel::CassavaBacterialBlight),
    ("cassava_mosaic", ClassifierLabel::CassavaMosaicVirus),
    ("healthy", ClassifierLabel::Healthy),
    ("yam_anthracnose", ClassifierLabel::YamAnthracnose),
    ("yam_mosaic", ClassifierLabel::YamMosaicVirus),
];

impl ClassifierLabel {
    pub const ALL: &'static [ClassifierLabel] = &[
        ClassifierLabel::CassavaBacterialBlight,
        ClassifierLabel::CassavaMosaicVirus,
        ClassifierLabel::YamAnthracnose,
        ClassifierLabel::YamMosaicVirus,
        ClassifierLabel::Healthy,
        ClassifierLabel::Unknown,
    ];

    /// Display name, which is also the canonical wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierLabel::CassavaBacterialBlight => "Cassava Bacterial Blight",
            ClassifierLabel::CassavaMosaicVirus => "Cassava Mosaic Virus",
            ClassifierLabel::YamAnthracnose => "Yam Anthracnose",
            ClassifierLabel::YamMosaicVirus => "Yam Mosaic Virus",
            ClassifierLabel::Healthy => "Healthy",
            ClassifierLabel::Unknown => "Unknown",
        }
    }

    /// Snake-case identifier, accepted as an alternative spelling.
    pub fn ident(&self) -> &'static str {
        match self {
            ClassifierLabel::CassavaBacterialBlight => "cassava_bacterial_blight",
            ClassifierLabel::CassavaMosaicVirus => "cassava_mosaic_virus",
            ClassifierLabel::YamAnthracnose => "yam_anthracnose",
            ClassifierLabel::YamMosaicVirus => "yam_mosaic_virus",
            ClassifierLabel::Healthy => "healthy",
            ClassifierLabel::Unknown => "unknown",
        }
    }

    /// Map a raw classifier class id to its canonical label.
    ///
    /// Class ids outside the mapped set become `Unknown`; the engine never
    /// sees an arbitrary classifier string.
    pub fn from_class_id(class_id: &str) -> Self {
        CLASS_ID_MAP
            .iter()
            .find(|(id, _)| *id == class_id)
            .map(|(_, label)| *label)
            .unwrap_or(ClassifierLabel::Unknown)
    }

    /// Raw class ids known to the mapping.
    pub fn class_ids() -> impl Iterator<Item = &'static str> {
        CLASS_ID_MAP.iter().map(|(id, _)| *id)
    }
}

impl fmt::Display for ClassifierLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierLabel {
    type Err = FactError;

    /// Strict parse of a canonical label. Raw class ids go through
    /// `from_class_id` instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s || l.ident() == s)
            .ok_or_else(|| FactError::InvalidValue {
                field: Field::ClassifierLabel,
                value: s.to_string(),
                allowed: Self::ALL.iter().map(|l| l.as_str()).collect(),
            })
    }
}
