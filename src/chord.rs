use crate::model::{IntervalSet, PitchClass, PitchSet, Spelling};
use crate::scale::resolve_scale;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ChordTypeDefinition {
    pub name: String,
    pub intervals: IntervalSet,
}

impl ChordTypeDefinition {
    pub fn new(name: impl Into<String>, intervals: IntervalSet) -> Self {
        Self {
            name: name.into(),
            intervals,
        }
    }

    pub fn resolve(&self, root: PitchClass) -> PitchSet {
        resolve_chord(root, &self.intervals)
    }
}

/// A chord built on one of a scale's degrees.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct DiatonicChord<'a> {
    pub root: PitchClass,
    pub chord_type: &'a ChordTypeDefinition,
}

impl DiatonicChord<'_> {
    pub fn name(&self, spelling: Spelling) -> String {
        chord_name(self.root, self.chord_type, spelling)
    }
}

pub fn chord_name(root: PitchClass, chord_type: &ChordTypeDefinition, spelling: Spelling) -> String {
    format!("{} {}", root.spell(spelling), chord_type.name)
}

pub fn resolve_chord(root: PitchClass, intervals: &IntervalSet) -> PitchSet {
    resolve_scale(root, intervals)
}

/// Every `(degree, chord type)` pair whose chord lies wholly inside the scale.
///
/// Ordered by the scale degree of the chord root, then by the order of
/// `chord_types`.
pub fn diatonic_chords<'a, I>(
    scale_root: PitchClass,
    scale_intervals: &IntervalSet,
    chord_types: I,
) -> Vec<DiatonicChord<'a>>
where
    I: IntoIterator<Item = &'a ChordTypeDefinition> + Clone,
{
    let scale = resolve_scale(scale_root, scale_intervals);
    let mut found = Vec::new();
    for root in scale.degrees() {
        for chord_type in chord_types.clone() {
            let chord = resolve_chord(root, &chord_type.intervals);
            if chord.is_subset(&scale) {
                found.push(DiatonicChord { root, chord_type });
            }
        }
    }
    log::debug!("{} diatonic chords over {}", found.len(), scale_root);
    found
}

/// Chord tones in degree order, root first.
pub fn chord_note_names(root: PitchClass, intervals: &IntervalSet, spelling: Spelling) -> Vec<String> {
    resolve_chord(root, intervals).note_names(spelling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use PitchClass::*;

    fn chord_type(name: &str, raw: &[u8]) -> ChordTypeDefinition {
        ChordTypeDefinition::new(name, IntervalSet::new(raw).unwrap())
    }

    fn c_major_scale() -> IntervalSet {
        IntervalSet::new(&[0, 2, 4, 5, 7, 9, 11]).unwrap()
    }

    #[test]
    fn test_resolve_chord() {
        let triad = resolve_chord(C, &IntervalSet::new(&[0, 4, 7]).unwrap());
        assert_eq!(vec![C, E, G], triad.degrees().collect::<Vec<_>>());
        assert!(!triad.contains(Fs));
    }

    #[test]
    fn test_diatonic_order() {
        let catalog = vec![chord_type("Major", &[0, 4, 7]), chord_type("Minor", &[0, 3, 7])];
        let names: Vec<_> = diatonic_chords(C, &c_major_scale(), &catalog)
            .iter()
            .map(|chord| chord.name(Spelling::Sharps))
            .collect();
        assert_eq!(
            vec!["C Major", "D Minor", "E Minor", "F Major", "G Major", "A Minor"],
            names
        );
    }

    #[test]
    fn test_catalog_order_breaks_ties() {
        let catalog = vec![
            chord_type("Sus4", &[0, 5, 7]),
            chord_type("Major", &[0, 4, 7]),
            chord_type("Sus2", &[0, 2, 7]),
        ];
        let on_c: Vec<_> = diatonic_chords(C, &c_major_scale(), &catalog)
            .into_iter()
            .filter(|chord| chord.root == C)
            .map(|chord| chord.chord_type.name.as_str())
            .collect();
        assert_eq!(vec!["Sus4", "Major", "Sus2"], on_c);
    }

    #[test]
    fn test_restricted_types_keep_their_order() {
        let major = chord_type("Major", &[0, 4, 7]);
        let minor = chord_type("Minor", &[0, 3, 7]);
        let both_thirds = IntervalSet::new(&[0, 3, 4, 7, 10]).unwrap();
        let names = |allowed: &[&ChordTypeDefinition]| -> Vec<String> {
            diatonic_chords(C, &both_thirds, allowed.iter().copied())
                .iter()
                .map(|chord| chord.name(Spelling::Sharps))
                .collect()
        };
        assert_eq!(vec!["C Minor", "C Major", "D# Major"], names(&[&minor, &major]));
        assert_eq!(vec!["C Major", "C Minor", "D# Major"], names(&[&major, &minor]));
        assert_eq!(vec!["C Major", "D# Major"], names(&[&major]));
        assert!(names(&[]).is_empty());
    }

    #[test]
    fn test_diminished_on_seventh_degree() {
        let catalog = vec![chord_type("Diminished", &[0, 3, 6])];
        let found = diatonic_chords(G, &c_major_scale(), &catalog);
        assert_eq!(1, found.len());
        assert_eq!(Fs, found[0].root);
        assert_eq!("F# Diminished", found[0].name(Spelling::Sharps));
        assert_eq!("Gb Diminished", found[0].name(Spelling::Flats));
    }

    #[test]
    fn test_chord_note_names() {
        let dominant = IntervalSet::new(&[0, 4, 7, 10]).unwrap();
        assert_eq!(
            vec!["F", "A", "C", "Eb"],
            chord_note_names(F, &dominant, Spelling::Flats)
        );
    }
}
