use crate::catalog::{Catalog, CatalogError};
use crate::chord::{chord_note_names, diatonic_chords, resolve_chord};
use crate::fretboard::{annotate, build_grid, Grid, Highlight, DEFAULT_MAX_FRET};
use crate::model::{PitchClass, PitchSet, Spelling, TheoryError};
use crate::notation::parse_note;
use crate::voicing::{validate, StringStatus, Voicing, VoicingError};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::*;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Theory(#[from] TheoryError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Voicing(#[from] VoicingError),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EngineConfig {
    pub max_fret: u8,
    pub spelling: Spelling,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_fret: DEFAULT_MAX_FRET,
            spelling: Spelling::default(),
        }
    }
}

/// A root note name paired with a catalog entry name.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Selection {
    pub root: String,
    pub name: String,
}

impl Selection {
    pub fn new(root: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FretboardRequest {
    pub tuning: String,
    pub scale: Option<Selection>,
    pub chord: Option<Selection>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CellView {
    pub fret: u8,
    pub note: String,
    pub in_scale: bool,
    pub in_chord: bool,
    pub is_root: bool,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FretboardView {
    pub tuning: String,
    pub max_fret: u8,
    /// Keyed by string index, lowest string first.
    pub strings: BTreeMap<usize, Vec<CellView>>,
}

impl FretboardView {
    fn from_grid(tuning: &str, grid: &Grid, spelling: Spelling) -> Self {
        let strings = grid
            .strings()
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let cells = row
                    .iter()
                    .enumerate()
                    .map(|(fret, cell)| CellView {
                        fret: fret as u8,
                        note: cell.pitch.spell(spelling).to_owned(),
                        in_scale: cell.in_scale,
                        in_chord: cell.in_chord,
                        is_root: cell.is_root,
                        highlight: cell.highlight(),
                    })
                    .collect();
                (idx, cells)
            })
            .collect();
        FretboardView {
            tuning: tuning.to_owned(),
            max_fret: grid.max_fret(),
            strings,
        }
    }
}

/// Resolves requests phrased in note and catalog names against one catalog.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'c> {
    catalog: &'c Catalog,
    config: EngineConfig,
}

impl<'c> Engine<'c> {
    pub fn new(catalog: &'c Catalog, config: EngineConfig) -> Self {
        Engine { catalog, config }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn scale_set(&self, selection: &Selection) -> Result<PitchSet, EngineError> {
        let root = parse_note(&selection.root)?;
        Ok(self.catalog.scale(&selection.name)?.resolve(root))
    }

    pub fn chord_set(&self, selection: &Selection) -> Result<PitchSet, EngineError> {
        let root = parse_note(&selection.root)?;
        let chord_type = self.catalog.chord_type(&selection.name)?;
        Ok(resolve_chord(root, &chord_type.intervals))
    }

    pub fn fretboard(&self, request: &FretboardRequest) -> Result<FretboardView, EngineError> {
        log::debug!("Resolving fretboard {:?}", request);
        let tuning = self.catalog.tuning(&request.tuning)?;
        let scale = request
            .scale
            .as_ref()
            .map(|sel| self.scale_set(sel))
            .transpose()?;
        let chord = request
            .chord
            .as_ref()
            .map(|sel| self.chord_set(sel))
            .transpose()?;
        let grid = annotate(
            build_grid(tuning, self.config.max_fret),
            scale.as_ref(),
            chord.as_ref(),
        );
        Ok(FretboardView::from_grid(
            tuning.name(),
            &grid,
            self.config.spelling,
        ))
    }

    pub fn scale_notes(&self, root: &str, scale: &str) -> Result<Vec<String>, EngineError> {
        let set = self.scale_set(&Selection::new(root, scale))?;
        Ok(set.note_names(self.config.spelling))
    }

    pub fn chord_notes(&self, root: &str, chord_type: &str) -> Result<Vec<String>, EngineError> {
        let root = parse_note(root)?;
        let chord_type = self.catalog.chord_type(chord_type)?;
        Ok(chord_note_names(
            root,
            &chord_type.intervals,
            self.config.spelling,
        ))
    }

    pub fn diatonic_chord_names(&self, root: &str, scale: &str) -> Result<Vec<String>, EngineError> {
        let root = parse_note(root)?;
        let scale = self.catalog.scale(scale)?;
        let allowed = self.catalog.allowed_chord_types(scale)?;
        let names = diatonic_chords(root, &scale.intervals, allowed.iter().copied())
            .iter()
            .map(|chord| chord.name(self.config.spelling))
            .collect();
        Ok(names)
    }

    pub fn validate_voicing(
        &self,
        tuning: &str,
        chord: &Selection,
        voicing: &Voicing,
    ) -> Result<Vec<StringStatus>, EngineError> {
        let tuning = self.catalog.tuning(tuning)?;
        let chord = self.chord_set(chord)?;
        Ok(validate(voicing, &chord, tuning)?)
    }

    pub fn root_of(&self, selection: &Selection) -> Result<PitchClass, EngineError> {
        Ok(parse_note(&selection.root)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IntervalSet;
    use crate::scale::ScaleDefinition;
    use crate::voicing::Difficulty;

    fn standard_request(scale: Option<Selection>, chord: Option<Selection>) -> FretboardRequest {
        FretboardRequest {
            tuning: "Standard".to_owned(),
            scale,
            chord,
        }
    }

    #[test]
    fn test_fretboard_view() {
        let catalog = Catalog::factory_defaults().unwrap();
        let engine = Engine::new(&catalog, EngineConfig::default());
        let view = engine
            .fretboard(&standard_request(Some(Selection::new("C", "Major")), None))
            .unwrap();
        assert_eq!(6, view.strings.len());
        assert_eq!(25, view.strings[&1].len());
        let d = &view.strings[&1][5];
        assert_eq!("D", d.note);
        assert!(d.in_scale && !d.is_root);
        assert!(view.strings[&1][3].is_root);
        assert_eq!(Highlight::Scale, view.strings[&1][3].highlight);
    }

    #[test]
    fn test_fretboard_spelling_and_size() {
        let catalog = Catalog::factory_defaults().unwrap();
        let config = EngineConfig {
            max_fret: 12,
            spelling: Spelling::Flats,
        };
        let engine = Engine::new(&catalog, config);
        let view = engine
            .fretboard(&standard_request(None, Some(Selection::new("Eb", "Major"))))
            .unwrap();
        assert_eq!(12, view.max_fret);
        assert_eq!(13, view.strings[&0].len());
        let cell = &view.strings[&1][6];
        assert_eq!("Eb", cell.note);
        assert!(cell.in_chord && cell.is_root);
        assert_eq!(Highlight::Chord, cell.highlight);
    }

    #[test]
    fn test_errors_surface_unchanged() {
        let catalog = Catalog::factory_defaults().unwrap();
        let engine = Engine::new(&catalog, EngineConfig::default());
        assert_eq!(
            Err(EngineError::Catalog(CatalogError::UnknownTuning(
                "Banjo".to_owned()
            ))),
            engine.fretboard(&FretboardRequest {
                tuning: "Banjo".to_owned(),
                scale: None,
                chord: None,
            })
        );
        assert_eq!(
            Err(EngineError::Theory(TheoryError::InvalidNoteName(
                "H".to_owned()
            ))),
            engine.scale_notes("H", "Major")
        );
        assert_eq!(
            Err(EngineError::Catalog(CatalogError::UnknownScale(
                "Bebop".to_owned()
            ))),
            engine.diatonic_chord_names("C", "Bebop")
        );
    }

    #[test]
    fn test_diatonic_names() {
        let catalog = Catalog::factory_defaults().unwrap();
        let engine = Engine::new(&catalog, EngineConfig::default());
        let names = engine.diatonic_chord_names("C", "Major").unwrap();
        let position = |name: &str| names.iter().position(|n| n == name).unwrap();
        assert_eq!(0, position("C Major"));
        assert!(position("C Major 7th") < position("D Minor"));
        assert!(position("D Minor") < position("E Minor"));
        assert!(position("G Dominant 7th") < position("A Minor"));
        assert!(names.contains(&"B Diminished".to_owned()));
        assert!(!names.contains(&"C Minor".to_owned()));
    }

    #[test]
    fn test_diatonic_names_follow_scale_order() {
        let catalog = Catalog::factory_defaults().unwrap();
        let engine = Engine::new(&catalog, EngineConfig::default());
        assert_eq!(
            vec![
                "A Minor",
                "A Sus4",
                "A Minor 7th",
                "C Major",
                "C Sus2",
                "D Sus2",
                "D Sus4",
                "G Sus2",
                "G Sus4"
            ],
            engine.diatonic_chord_names("A", "Minor Pentatonic").unwrap()
        );

        let two_thirds = ScaleDefinition::new("Two Thirds", IntervalSet::new(&[0, 3, 4, 7]).unwrap())
            .allowing(["Minor", "Major"]);
        let chord_types = catalog.chord_types().to_vec();
        let catalog = Catalog::new(Vec::new(), vec![two_thirds], chord_types).unwrap();
        let engine = Engine::new(&catalog, EngineConfig::default());
        assert_eq!(
            vec!["C Minor", "C Major"],
            engine.diatonic_chord_names("C", "two thirds").unwrap()
        );
    }

    #[test]
    fn test_note_lists() {
        let catalog = Catalog::factory_defaults().unwrap();
        let engine = Engine::new(&catalog, EngineConfig::default());
        assert_eq!(
            vec!["D", "F#", "A", "C"],
            engine.chord_notes("d", "dominant 7th").unwrap()
        );
        assert_eq!(
            vec!["A", "C", "D", "E", "G"],
            engine.scale_notes("A", "Minor Pentatonic").unwrap()
        );
    }

    #[test]
    fn test_validate_voicing() {
        let catalog = Catalog::factory_defaults().unwrap();
        let engine = Engine::new(&catalog, EngineConfig::default());
        let g_major = Voicing::from_chart(
            "Open G",
            Difficulty::Beginner,
            &[Some(3), Some(2), Some(0), Some(0), Some(0), Some(3)],
            None,
        )
        .unwrap();
        let statuses = engine
            .validate_voicing("Standard", &Selection::new("G", "Major"), &g_major)
            .unwrap();
        assert_eq!(StringStatus::OpenRoot, statuses[3]);

        let err = engine
            .validate_voicing("Standard", &Selection::new("C", "Major"), &g_major)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Voicing(VoicingError::NoteNotInChord { .. })
        ));
    }

    #[test]
    fn test_serialized_shape() {
        let catalog = Catalog::factory_defaults().unwrap();
        let engine = Engine::new(
            &catalog,
            EngineConfig {
                max_fret: 1,
                spelling: Spelling::Sharps,
            },
        );
        let view = engine
            .fretboard(&standard_request(None, Some(Selection::new("F", "Major"))))
            .unwrap();
        let json = serde_json::to_value(&view).unwrap();
        let cell = &json["strings"]["0"][1];
        assert_eq!("F", cell["note"]);
        assert_eq!(true, cell["is_root"]);
        assert_eq!("chord", cell["highlight"]);
    }
}
