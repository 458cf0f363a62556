//! Fact model for the tuber-crop diagnosis engine.
//!
//! A `Fact` is one diagnostic case: the coarse label produced by the leaf
//! image classifier plus six farmer-observed symptoms. Every symptom field
//! is a closed enumeration that includes `unset`, so a constructed Fact is
//! always total and valid.

pub mod error;
pub mod fact;
pub mod info;
pub mod label;
pub mod observation;

pub use error::FactError;
pub use fact::{Fact, FactBuilder, Field, Observed};
pub use info::{info_card, DiseaseInfo};
pub use label::ClassifierLabel;
pub use observation::{LeafTexture, StemLesion, StemSticky, TuberFirmness, TuberSmell, TuberTexture};
