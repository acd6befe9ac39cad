//! Reference definitions handed to the resolvers.
//!
//! A `Catalog` is an ordinary immutable value: build one (or take the factory
//! defaults) and pass it by reference. Nothing here is global.

use crate::chord::ChordTypeDefinition;
use crate::fretboard::Tuning;
use crate::model::{IntervalSet, PitchClass, TheoryError};
use crate::scale::ScaleDefinition;
use thiserror::*;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum CatalogError {
    #[error("Unknown tuning {0:?}.")]
    UnknownTuning(String),
    #[error("Unknown scale {0:?}.")]
    UnknownScale(String),
    #[error("Unknown chord type {0:?}.")]
    UnknownChordType(String),
    #[error("Duplicate {kind} {name:?} in catalog.")]
    DuplicateEntry { kind: &'static str, name: String },
    #[error(transparent)]
    Definition(#[from] TheoryError),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Catalog {
    tunings: Vec<Tuning>,
    scales: Vec<ScaleDefinition>,
    chord_types: Vec<ChordTypeDefinition>,
}

fn check_unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen: Vec<String> = Vec::new();
    for name in names {
        let folded = name.to_ascii_lowercase();
        if seen.contains(&folded) {
            return Err(CatalogError::DuplicateEntry {
                kind,
                name: name.to_owned(),
            });
        }
        seen.push(folded);
    }
    Ok(())
}

impl Catalog {
    /// Names are matched case-insensitively, so two entries of the same kind
    /// may not differ only by case. Every chord type a scale allows must be
    /// in `chord_types`.
    pub fn new(
        tunings: Vec<Tuning>,
        scales: Vec<ScaleDefinition>,
        chord_types: Vec<ChordTypeDefinition>,
    ) -> Result<Self, CatalogError> {
        check_unique("tuning", tunings.iter().map(Tuning::name))?;
        check_unique("scale", scales.iter().map(|s| s.name.as_str()))?;
        check_unique("chord type", chord_types.iter().map(|c| c.name.as_str()))?;
        let catalog = Catalog {
            tunings,
            scales,
            chord_types,
        };
        for scale in &catalog.scales {
            check_unique(
                "allowed chord type",
                scale.allowed_chord_types.iter().map(String::as_str),
            )?;
            catalog.allowed_chord_types(scale)?;
        }
        Ok(catalog)
    }

    pub fn factory_defaults() -> Result<Self, CatalogError> {
        use PitchClass::*;
        let tunings = vec![
            Tuning::new("Standard", vec![E, A, D, G, B, E])?,
            Tuning::new("Drop D", vec![D, A, D, G, B, E])?,
            Tuning::new("Half Step Down", vec![Ds, Gs, Cs, Fs, As, Ds])?,
            Tuning::new("DADGAD", vec![D, A, D, G, A, D])?,
            Tuning::new("Open G", vec![D, G, D, G, B, D])?,
            Tuning::new("Open D", vec![D, A, D, Fs, A, D])?,
            Tuning::new("Open E", vec![E, B, E, Gs, B, E])?,
        ];
        const EVERY: &[&str] = &[
            "Major",
            "Minor",
            "Diminished",
            "Augmented",
            "Sus2",
            "Sus4",
            "Major 7th",
            "Minor 7th",
            "Dominant 7th",
            "Half Diminished",
            "Diminished 7th",
        ];
        const MINOR_FIRST: &[&str] = &[
            "Minor",
            "Major",
            "Diminished",
            "Augmented",
            "Minor 7th",
            "Major 7th",
            "Dominant 7th",
            "Half Diminished",
            "Diminished 7th",
            "Sus2",
            "Sus4",
        ];
        let scale = |name: &str,
                     raw: &[u8],
                     allowed: &[&str]|
         -> Result<ScaleDefinition, CatalogError> {
            let intervals = IntervalSet::new(raw)?;
            Ok(ScaleDefinition::new(name, intervals).allowing(allowed.iter().copied()))
        };
        let scales = vec![
            scale("Major", &[0, 2, 4, 5, 7, 9, 11], EVERY)?,
            scale("Natural Minor", &[0, 2, 3, 5, 7, 8, 10], MINOR_FIRST)?,
            scale("Harmonic Minor", &[0, 2, 3, 5, 7, 8, 11], MINOR_FIRST)?,
            scale("Melodic Minor", &[0, 2, 3, 5, 7, 9, 11], MINOR_FIRST)?,
            scale("Major Pentatonic", &[0, 2, 4, 7, 9], &["Major", "Minor", "Sus2", "Sus4"])?,
            scale(
                "Minor Pentatonic",
                &[0, 3, 5, 7, 10],
                &["Minor", "Major", "Sus2", "Sus4", "Minor 7th"],
            )?,
            scale(
                "Blues",
                &[0, 3, 5, 6, 7, 10],
                &["Minor", "Major", "Sus4", "Minor 7th", "Dominant 7th"],
            )?,
            scale("Dorian", &[0, 2, 3, 5, 7, 9, 10], MINOR_FIRST)?,
            scale("Phrygian", &[0, 1, 3, 5, 7, 8, 10], MINOR_FIRST)?,
            scale("Lydian", &[0, 2, 4, 6, 7, 9, 11], EVERY)?,
            scale("Mixolydian", &[0, 2, 4, 5, 7, 9, 10], EVERY)?,
            scale("Locrian", &[0, 1, 3, 5, 6, 8, 10], MINOR_FIRST)?,
        ];
        let chord = |name: &str, raw: &[u8]| -> Result<ChordTypeDefinition, CatalogError> {
            Ok(ChordTypeDefinition::new(name, IntervalSet::new(raw)?))
        };
        let chord_types = vec![
            chord("Major", &[0, 4, 7])?,
            chord("Minor", &[0, 3, 7])?,
            chord("Diminished", &[0, 3, 6])?,
            chord("Augmented", &[0, 4, 8])?,
            chord("Sus2", &[0, 2, 7])?,
            chord("Sus4", &[0, 5, 7])?,
            chord("Major 7th", &[0, 4, 7, 11])?,
            chord("Minor 7th", &[0, 3, 7, 10])?,
            chord("Dominant 7th", &[0, 4, 7, 10])?,
            chord("Half Diminished", &[0, 3, 6, 10])?,
            chord("Diminished 7th", &[0, 3, 6, 9])?,
        ];
        Catalog::new(tunings, scales, chord_types)
    }

    pub fn tunings(&self) -> &[Tuning] {
        &self.tunings
    }

    pub fn scales(&self) -> &[ScaleDefinition] {
        &self.scales
    }

    pub fn chord_types(&self) -> &[ChordTypeDefinition] {
        &self.chord_types
    }

    pub fn tuning(&self, name: &str) -> Result<&Tuning, CatalogError> {
        self.tunings
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::UnknownTuning(name.to_owned()))
    }

    pub fn scale(&self, name: &str) -> Result<&ScaleDefinition, CatalogError> {
        self.scales
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::UnknownScale(name.to_owned()))
    }

    pub fn chord_type(&self, name: &str) -> Result<&ChordTypeDefinition, CatalogError> {
        self.chord_types
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::UnknownChordType(name.to_owned()))
    }

    /// The chord types `scale` allows, in the scale's own order.
    pub fn allowed_chord_types(
        &self,
        scale: &ScaleDefinition,
    ) -> Result<Vec<&ChordTypeDefinition>, CatalogError> {
        scale
            .allowed_chord_types
            .iter()
            .map(|name| self.chord_type(name))
            .collect()
    }
}
