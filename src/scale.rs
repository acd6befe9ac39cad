use crate::model::{IntervalSet, PitchClass, PitchSet};

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ScaleDefinition {
    pub name: String,
    pub intervals: IntervalSet,
    /// Chord type names tried when listing diatonic chords, in listing order.
    pub allowed_chord_types: Vec<String>,
}

impl ScaleDefinition {
    pub fn new(name: impl Into<String>, intervals: IntervalSet) -> Self {
        Self {
            name: name.into(),
            intervals,
            allowed_chord_types: Vec::new(),
        }
    }

    pub fn allowing<S: Into<String>>(mut self, chord_types: impl IntoIterator<Item = S>) -> Self {
        self.allowed_chord_types = chord_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn resolve(&self, root: PitchClass) -> PitchSet {
        resolve_scale(root, &self.intervals)
    }
}

/// Transposes every interval from `root`; colliding pitch classes collapse into one.
pub fn resolve_scale(root: PitchClass, intervals: &IntervalSet) -> PitchSet {
    intervals
        .iter()
        .map(|interval| root.transpose(i32::from(interval.semitones())))
        .fold(PitchSet::rooted(root), PitchSet::with_note)
}

/// Position of `pitch` among the ascending intervals above `root`.
pub fn degree_of(pitch: PitchClass, root: PitchClass, intervals: &IntervalSet) -> Option<usize> {
    let offset = pitch.offset_from(root);
    intervals
        .iter()
        .position(|interval| interval.semitones() == offset)
}
