//! String-by-fret grids and their scale/chord annotation.
//!
//! Strings are indexed from the lowest-pitched (index 0) to the highest,
//! everywhere in the crate.

use crate::model::{PitchClass, PitchSet, TheoryError};
use crate::notation::parse_tuning_notes;
use serde::Serialize;

pub const DEFAULT_MAX_FRET: u8 = 24;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Tuning {
    name: String,
    open_strings: Vec<PitchClass>,
}

impl Tuning {
    pub fn new(name: impl Into<String>, open_strings: Vec<PitchClass>) -> Result<Self, TheoryError> {
        let name = name.into();
        if open_strings.is_empty() {
            return Err(TheoryError::EmptyTuning(name));
        }
        Ok(Tuning { name, open_strings })
    }

    /// Builds a tuning from space- or comma-separated note names, lowest string first.
    pub fn parse(name: impl Into<String>, notes: &str) -> Result<Self, TheoryError> {
        Tuning::new(name, parse_tuning_notes(notes)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn string_count(&self) -> usize {
        self.open_strings.len()
    }

    pub fn open_strings(&self) -> &[PitchClass] {
        &self.open_strings
    }

    pub fn open_pitch(&self, string: usize) -> Option<PitchClass> {
        self.open_strings.get(string).copied()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    None,
    Scale,
    Chord,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FretboardCell {
    pub pitch: PitchClass,
    pub in_scale: bool,
    pub in_chord: bool,
    pub is_root: bool,
}

impl FretboardCell {
    const fn bare(pitch: PitchClass) -> Self {
        FretboardCell {
            pitch,
            in_scale: false,
            in_chord: false,
            is_root: false,
        }
    }

    /// The layer a renderer should draw on top; chord membership wins over scale membership.
    pub const fn highlight(&self) -> Highlight {
        if self.in_chord {
            Highlight::Chord
        } else if self.in_scale {
            Highlight::Scale
        } else {
            Highlight::None
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Grid {
    max_fret: u8,
    strings: Vec<Vec<FretboardCell>>,
}

impl Grid {
    pub fn max_fret(&self) -> u8 {
        self.max_fret
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    pub fn strings(&self) -> &[Vec<FretboardCell>] {
        &self.strings
    }

    pub fn cell(&self, string: usize, fret: u8) -> Option<&FretboardCell> {
        self.strings.get(string)?.get(usize::from(fret))
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, u8, &FretboardCell)> + '_ {
        self.strings.iter().enumerate().flat_map(|(string, row)| {
            row.iter()
                .enumerate()
                .map(move |(fret, cell)| (string, fret as u8, cell))
        })
    }
}

pub fn build_grid(tuning: &Tuning, max_fret: u8) -> Grid {
    let strings = tuning
        .open_strings()
        .iter()
        .map(|open| {
            (0..=max_fret)
                .map(|fret| FretboardCell::bare(open.transpose(i32::from(fret))))
                .collect()
        })
        .collect();
    log::trace!(
        "Built {}x{} grid for tuning {:?}",
        tuning.string_count(),
        u16::from(max_fret) + 1,
        tuning.name()
    );
    Grid { max_fret, strings }
}

/// Marks scale and chord membership on every cell of `grid`.
///
/// A chord context, when present, owns the root flag; otherwise the scale
/// root is flagged.
pub fn annotate(mut grid: Grid, scale: Option<&PitchSet>, chord: Option<&PitchSet>) -> Grid {
    for cell in grid.strings.iter_mut().flatten() {
        let pitch = cell.pitch;
        cell.in_scale = scale.map_or(false, |set| set.contains(pitch));
        cell.in_chord = chord.map_or(false, |set| set.contains(pitch));
        cell.is_root = match (chord, scale) {
            (Some(chord), _) => cell.in_chord && pitch == chord.root(),
            (None, Some(scale)) => cell.in_scale && pitch == scale.root(),
            (None, None) => false,
        };
    }
    grid
}
