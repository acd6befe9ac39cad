use std::fmt;
use std::str::FromStr;
use thiserror::*;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum TheoryError {
    #[error("Invalid note name {0:?}: expected one of the 12 sharp or flat spellings.")]
    InvalidNoteName(String),
    #[error("Invalid interval {value}: {reason}.")]
    InvalidInterval { value: u8, reason: IntervalFault },
    #[error("Could not read {0:?} as a list of semitone offsets.")]
    MalformedIntervals(String),
    #[error("Interval set {0:?} does not contain the root interval 0.")]
    MissingRootInterval(Vec<u8>),
    #[error("Tuning {0:?} has no strings.")]
    EmptyTuning(String),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IntervalFault {
    OutOfRange,
    Duplicate,
}

impl fmt::Display for IntervalFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalFault::OutOfRange => f.write_str("expected a semitone offset in [0..=11]"),
            IntervalFault::Duplicate => f.write_str("appears more than once"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Hash)]
pub enum Spelling {
    #[default]
    Sharps,
    Flats,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

impl PitchClass {
    pub const fn all() -> &'static [PitchClass] {
        &[
            PitchClass::C,
            PitchClass::Cs,
            PitchClass::D,
            PitchClass::Ds,
            PitchClass::E,
            PitchClass::F,
            PitchClass::Fs,
            PitchClass::G,
            PitchClass::Gs,
            PitchClass::A,
            PitchClass::As,
            PitchClass::B,
        ]
    }

    /// Moves by any number of semitones in either direction, wrapping at the octave.
    pub const fn transpose(self, semitones: i32) -> Self {
        let raw = (self.as_u8() as i32 + semitones.rem_euclid(12)).rem_euclid(12);
        PitchClass::from_u8(raw as u8)
    }

    pub const fn from_u8(raw: u8) -> Self {
        match raw % 12 {
            0 => PitchClass::C,
            1 => PitchClass::Cs,
            2 => PitchClass::D,
            3 => PitchClass::Ds,
            4 => PitchClass::E,
            5 => PitchClass::F,
            6 => PitchClass::Fs,
            7 => PitchClass::G,
            8 => PitchClass::Gs,
            9 => PitchClass::A,
            10 => PitchClass::As,
            // Always 11
            _ => PitchClass::B,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Semitones to climb from `root` to reach this pitch, in `[0, 11]`.
    pub const fn offset_from(self, root: PitchClass) -> u8 {
        (self.as_u8() + 12 - root.as_u8()) % 12
    }

    pub const fn is_natural(self) -> bool {
        matches!(
            self,
            PitchClass::C
                | PitchClass::D
                | PitchClass::E
                | PitchClass::F
                | PitchClass::G
                | PitchClass::A
                | PitchClass::B
        )
    }

    pub const fn spell(self, spelling: Spelling) -> &'static str {
        match spelling {
            Spelling::Sharps => SHARP_NAMES[self.as_u8() as usize],
            Spelling::Flats => FLAT_NAMES[self.as_u8() as usize],
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spell(Spelling::Sharps))
    }
}

impl FromStr for PitchClass {
    type Err = TheoryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::notation::parse_note(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Interval(u8);

impl Interval {
    pub const fn new(semitones: u8) -> Result<Self, TheoryError> {
        if semitones > 11 {
            Err(TheoryError::InvalidInterval {
                value: semitones,
                reason: IntervalFault::OutOfRange,
            })
        } else {
            Ok(Interval(semitones))
        }
    }

    pub const fn semitones(self) -> u8 {
        self.0
    }
}

/// Semitone offsets from a root, kept in ascending order.
///
/// Always contains the root interval and never holds a value twice, so every
/// set resolves to exactly `len()` distinct pitch classes.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new(raw: &[u8]) -> Result<Self, TheoryError> {
        let mut seen = 0u16;
        let mut intervals = Vec::with_capacity(raw.len());
        for &value in raw {
            let interval = Interval::new(value)?;
            let bit = 1u16 << value;
            if seen & bit != 0 {
                return Err(TheoryError::InvalidInterval {
                    value,
                    reason: IntervalFault::Duplicate,
                });
            }
            seen |= bit;
            intervals.push(interval);
        }
        if seen & 1 == 0 {
            return Err(TheoryError::MissingRootInterval(raw.to_vec()));
        }
        intervals.sort_unstable();
        Ok(IntervalSet { intervals })
    }

    pub fn iter(&self) -> impl Iterator<Item = Interval> + '_ {
        self.intervals.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn semitones(&self) -> Vec<u8> {
        self.iter().map(Interval::semitones).collect()
    }
}

/// A set of pitch classes anchored to a root.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PitchSet {
    // Bit structure:
    // `rrrr_nnnn_nnnn_nnnn`, where `rrrr` is the root pitch class and `nnnn_nnnn_nnnn`
    // is a mask where the "k"th bit being set says that the pitch class "k" is in the set.
    // For example, if the least significant bit is 1, then C is in the set.
    notes_with_root: u16,
}

const NOTES_MASK: u16 = 0x0FFF;
const ROOT_MASK: u16 = 0xF000;

impl PitchSet {
    pub const fn rooted(root: PitchClass) -> Self {
        let root_bits = (root.as_u8() as u16) << 12;
        PitchSet {
            notes_with_root: root_bits,
        }
    }

    pub const fn with_note(mut self, note: PitchClass) -> Self {
        let mask = 1 << (note.as_u8());
        self.notes_with_root |= mask;
        self
    }

    pub const fn equivalent(&self, other: &PitchSet) -> bool {
        self.mask() == other.mask()
    }

    pub const fn mask(&self) -> u16 {
        self.notes_with_root & NOTES_MASK
    }

    pub const fn root(&self) -> PitchClass {
        let raw_root = (self.notes_with_root & ROOT_MASK) >> 12;
        PitchClass::from_u8(raw_root as u8)
    }

    pub const fn contains(&self, note: PitchClass) -> bool {
        let mask = 1 << note.as_u8();
        self.notes_with_root & mask != 0
    }

    pub const fn len(&self) -> usize {
        self.mask().count_ones() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.mask() == 0
    }

    pub const fn is_subset(&self, other: &PitchSet) -> bool {
        self.mask() & !other.mask() == 0
    }

    /// Members in ascending order starting from the root.
    pub fn degrees(&self) -> impl Iterator<Item = PitchClass> + '_ {
        let root = self.root();
        (0..12)
            .map(move |offset| root.transpose(offset))
            .filter(move |note| self.contains(*note))
    }

    pub fn degree_of(&self, note: PitchClass) -> Option<usize> {
        self.degrees().position(|member| member == note)
    }

    /// The `keystep`th degree, wrapping in both directions.
    pub fn nth(&self, keystep: isize) -> Option<PitchClass> {
        if self.is_empty() {
            return None;
        }
        let len = self.len() as isize;
        let mapped_step = keystep.rem_euclid(len) as usize;
        self.degrees().nth(mapped_step)
    }

    pub fn note_names(&self, spelling: Spelling) -> Vec<String> {
        self.degrees()
            .map(|note| note.spell(spelling).to_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes() {
        let c = PitchClass::C;
        assert_eq!(PitchClass::D, c.transpose(2));
        assert_eq!(PitchClass::As, c.transpose(-2));
        assert_eq!(PitchClass::C, c.transpose(24));
        assert_eq!(PitchClass::B, c.transpose(-13));
        assert_eq!(PitchClass::A, PitchClass::E.transpose(5));
        assert_eq!(PitchClass::Fs, PitchClass::B.transpose(i32::MAX));
        assert_eq!(PitchClass::F, PitchClass::Cs.transpose(i32::MIN));
    }

    #[test]
    fn test_spelling() {
        assert_eq!("C#", PitchClass::Cs.spell(Spelling::Sharps));
        assert_eq!("Db", PitchClass::Cs.spell(Spelling::Flats));
        for note in PitchClass::all() {
            let same = note.spell(Spelling::Sharps) == note.spell(Spelling::Flats);
            assert_eq!(note.is_natural(), same, "{:?}", note);
        }
    }

    #[test]
    fn test_interval_set() {
        let major = IntervalSet::new(&[0, 4, 7, 2, 5, 9, 11]).unwrap();
        assert_eq!(vec![0, 2, 4, 5, 7, 9, 11], major.semitones());

        assert_eq!(
            Err(TheoryError::InvalidInterval {
                value: 13,
                reason: IntervalFault::OutOfRange
            }),
            IntervalSet::new(&[0, 13])
        );
        assert_eq!(
            Err(TheoryError::InvalidInterval {
                value: 4,
                reason: IntervalFault::Duplicate
            }),
            IntervalSet::new(&[0, 4, 4, 7])
        );
        assert_eq!(
            Err(TheoryError::MissingRootInterval(vec![4, 7])),
            IntervalSet::new(&[4, 7])
        );
        assert!(IntervalSet::new(&[]).is_err());
    }

    #[test]
    fn test_pitch_set() {
        let a_minor = [0, 2, 3, 5, 7, 8, 10]
            .iter()
            .fold(PitchSet::rooted(PitchClass::A), |set, off| {
                set.with_note(PitchClass::A.transpose(*off))
            });
        let c_major = [0, 2, 4, 5, 7, 9, 11]
            .iter()
            .fold(PitchSet::rooted(PitchClass::C), |set, off| {
                set.with_note(PitchClass::C.transpose(*off))
            });

        assert!(a_minor.equivalent(&c_major) && c_major.equivalent(&a_minor));
        assert_eq!(PitchClass::C, c_major.root());
        assert_eq!(PitchClass::A, a_minor.root());
        assert_eq!(Some(PitchClass::C), c_major.nth(0));
        assert_eq!(Some(PitchClass::E), c_major.nth(2));
        assert_eq!(Some(PitchClass::B), c_major.nth(6));
        assert_eq!(Some(PitchClass::C), c_major.nth(7));
        assert_eq!(Some(PitchClass::B), c_major.nth(-1));
        for idx in -(c_major.len() as isize) * 2..(c_major.len() as isize) * 2 {
            assert_eq!(c_major.nth(idx), a_minor.nth(idx + 2), "IDX: {}", idx);
        }
        assert_eq!(Some(0), a_minor.degree_of(PitchClass::A));
        assert_eq!(Some(2), a_minor.degree_of(PitchClass::C));
        assert_eq!(None, a_minor.degree_of(PitchClass::Cs));
        assert!(PitchSet::rooted(PitchClass::C).nth(0).is_none());
    }

    #[test]
    fn test_subset() {
        let c_triad = PitchSet::rooted(PitchClass::C)
            .with_note(PitchClass::C)
            .with_note(PitchClass::E)
            .with_note(PitchClass::G);
        let c_major = PitchClass::all()
            .iter()
            .filter(|n| n.is_natural())
            .fold(PitchSet::rooted(PitchClass::C), |set, n| set.with_note(*n));
        assert!(c_triad.is_subset(&c_major));
        assert!(!c_major.is_subset(&c_triad));
        assert_eq!(
            vec!["C", "E", "G"],
            c_triad.note_names(Spelling::Flats)
        );
    }
}
