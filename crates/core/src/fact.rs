//! The diagnostic Fact and its builder.

use std::fmt;

use serde::Serialize;

use crate::error::FactError;
use crate::label::ClassifierLabel;
use crate::observation::{
    LeafTexture, StemLesion, StemSticky, TuberFirmness, TuberSmell, TuberTexture,
};

// ──────────────────────────────────────────────
// Fields
// ──────────────────────────────────────────────

/// The seven fields of a Fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ClassifierLabel,
    LeafTexture,
    StemLesion,
    StemSticky,
    TuberTexture,
    TuberFirmness,
    TuberSmell,
}

impl Field {
    /// Fields in collection order: classifier first, then the symptom steps.
    pub const ALL: [Field; 7] = [
        Field::ClassifierLabel,
        Field::LeafTexture,
        Field::StemLesion,
        Field::StemSticky,
        Field::TuberTexture,
        Field::TuberFirmness,
        Field::TuberSmell,
    ];

    /// Key used in observation documents.
    pub fn name(&self) -> &'static str {
        match self {
            Field::ClassifierLabel => "classifier_label",
            Field::LeafTexture => "leaf_texture",
            Field::StemLesion => "stem_lesion",
            Field::StemSticky => "stem_sticky",
            Field::TuberTexture => "tuber_texture",
            Field::TuberFirmness => "tuber_firmness",
            Field::TuberSmell => "tuber_smell",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ──────────────────────────────────────────────
// Observed values
// ──────────────────────────────────────────────

/// A single field value, tagged with the field it belongs to.
///
/// Rule conditions compare against `Observed` values, so a condition can
/// only ever name a value that is valid for its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Observed {
    Label(ClassifierLabel),
    LeafTexture(LeafTexture),
    StemLesion(StemLesion),
    StemSticky(StemSticky),
    TuberTexture(TuberTexture),
    TuberFirmness(TuberFirmness),
    TuberSmell(TuberSmell),
}

impl Observed {
    pub const fn field(&self) -> Field {
        match self {
            Observed::Label(_) => Field::ClassifierLabel,
            Observed::LeafTexture(_) => Field::LeafTexture,
            Observed::StemLesion(_) => Field::StemLesion,
            Observed::StemSticky(_) => Field::StemSticky,
            Observed::TuberTexture(_) => Field::TuberTexture,
            Observed::TuberFirmness(_) => Field::TuberFirmness,
            Observed::TuberSmell(_) => Field::TuberSmell,
        }
    }

    /// True for a symptom that was never observed. A classifier label is
    /// never unset.
    pub fn is_unset(&self) -> bool {
        match self {
            Observed::Label(_) => false,
            Observed::LeafTexture(v) => v.is_unset(),
            Observed::StemLesion(v) => v.is_unset(),
            Observed::StemSticky(v) => v.is_unset(),
            Observed::TuberTexture(v) => v.is_unset(),
            Observed::TuberFirmness(v) => v.is_unset(),
            Observed::TuberSmell(v) => v.is_unset(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Observed::Label(v) => v.as_str(),
            Observed::LeafTexture(v) => v.as_str(),
            Observed::StemLesion(v) => v.as_str(),
            Observed::StemSticky(v) => v.as_str(),
            Observed::TuberTexture(v) => v.as_str(),
            Observed::TuberFirmness(v) => v.as_str(),
            Observed::TuberSmell(v) => v.as_str(),
        }
    }
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field(), self.as_str())
    }
}

// ──────────────────────────────────────────────
// Fact
// ──────────────────────────────────────────────

/// Immutable snapshot of one diagnostic case.
///
/// Construct through [`Fact::builder`]; fields are read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fact {
    classifier_label: ClassifierLabel,
    leaf_texture: LeafTexture,
    stem_lesion: StemLesion,
    stem_sticky: StemSticky,
    tuber_texture: TuberTexture,
    tuber_firmness: TuberFirmness,
    tuber_smell: TuberSmell,
}

impl Fact {
    /// Start a Fact for the given classifier label with every symptom unset.
    pub fn builder(label: ClassifierLabel) -> FactBuilder {
        FactBuilder::new(label)
    }

    pub fn classifier_label(&self) -> ClassifierLabel {
        self.classifier_label
    }

    pub fn leaf_texture(&self) -> LeafTexture {
        self.leaf_texture
    }

    pub fn stem_lesion(&self) -> StemLesion {
        self.stem_lesion
    }

    pub fn stem_sticky(&self) -> StemSticky {
        self.stem_sticky
    }

    pub fn tuber_texture(&self) -> TuberTexture {
        self.tuber_texture
    }

    pub fn tuber_firmness(&self) -> TuberFirmness {
        self.tuber_firmness
    }

    pub fn tuber_smell(&self) -> TuberSmell {
        self.tuber_smell
    }

    /// Read one field as a tagged value.
    pub fn get(&self, field: Field) -> Observed {
        match field {
            Field::ClassifierLabel => Observed::Label(self.classifier_label),
            Field::LeafTexture => Observed::LeafTexture(self.leaf_texture),
            Field::StemLesion => Observed::StemLesion(self.stem_lesion),
            Field::StemSticky => Observed::StemSticky(self.stem_sticky),
            Field::TuberTexture => Observed::TuberTexture(self.tuber_texture),
            Field::TuberFirmness => Observed::TuberFirmness(self.tuber_firmness),
            Field::TuberSmell => Observed::TuberSmell(self.tuber_smell),
        }
    }

    /// Every valid Fact, for exhaustive checks over the whole domain.
    pub fn enumerate_all() -> impl Iterator<Item = Fact> {
        ClassifierLabel::ALL.iter().flat_map(|&label| {
            LeafTexture::ALL.iter().flat_map(move |&leaf| {
                StemLesion::ALL.iter().flat_map(move |&lesion| {
                    StemSticky::ALL.iter().flat_map(move |&sticky| {
                        TuberTexture::ALL.iter().flat_map(move |&texture| {
                            TuberFirmness::ALL.iter().flat_map(move |&firmness| {
                                TuberSmell::ALL.iter().map(move |&smell| Fact {
                                    classifier_label: label,
                                    leaf_texture: leaf,
                                    stem_lesion: lesion,
                                    stem_sticky: sticky,
                                    tuber_texture: texture,
                                    tuber_firmness: firmness,
                                    tuber_smell: smell,
                                })
                            })
                        })
                    })
                })
            })
        })
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Field::ALL.iter().map(|&fd| self.get(fd).to_string()).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

// ──────────────────────────────────────────────
// Builder
// ──────────────────────────────────────────────

/// Incremental constructor used by the symptom-collection boundary.
///
/// Fields that are never set stay `unset`.
#[derive(Debug, Clone)]
pub struct FactBuilder {
    fact: Fact,
}

impl FactBuilder {
    pub fn new(label: ClassifierLabel) -> Self {
        FactBuilder {
            fact: Fact {
                classifier_label: label,
                leaf_texture: LeafTexture::Unset,
                stem_lesion: StemLesion::Unset,
                stem_sticky: StemSticky::Unset,
                tuber_texture: TuberTexture::Unset,
                tuber_firmness: TuberFirmness::Unset,
                tuber_smell: TuberSmell::Unset,
            },
        }
    }

    pub fn leaf_texture(mut self, v: LeafTexture) -> Self {
        self.fact.leaf_texture = v;
        self
    }

    pub fn stem_lesion(mut self, v: StemLesion) -> Self {
        self.fact.stem_lesion = v;
        self
    }

    pub fn stem_sticky(mut self, v: StemSticky) -> Self {
        self.fact.stem_sticky = v;
        self
    }

    pub fn tuber_texture(mut self, v: TuberTexture) -> Self {
        self.fact.tuber_texture = v;
        self
    }

    pub fn tuber_firmness(mut self, v: TuberFirmness) -> Self {
        self.fact.tuber_firmness = v;
        self
    }

    pub fn tuber_smell(mut self, v: TuberSmell) -> Self {
        self.fact.tuber_smell = v;
        self
    }

    /// Record a raw answer from a collection step.
    ///
    /// `None` means the step never ran and leaves the field `unset`. An
    /// empty answer is rejected: a step must not advance without a value.
    pub fn observe(self, field: Field, raw: Option<&str>) -> Result<Self, FactError> {
        let Some(raw) = raw else {
            return Ok(self);
        };
        if raw.is_empty() {
            return Err(FactError::EmptyValue { field });
        }
        let next = match field {
            Field::ClassifierLabel => {
                let mut b = self;
                b.fact.classifier_label = raw.parse()?;
                b
            }
            Field::LeafTexture => self.leaf_texture(raw.parse()?),
            Field::StemLesion => self.stem_lesion(raw.parse()?),
            Field::StemSticky => self.stem_sticky(raw.parse()?),
            Field::TuberTexture => self.tuber_texture(raw.parse()?),
            Field::TuberFirmness => self.tuber_firmness(raw.parse()?),
            Field::TuberSmell => self.tuber_smell(raw.parse()?),
        };
        Ok(next)
    }

    pub fn build(self) -> Fact {
        self.fact
    }
}
