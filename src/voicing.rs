use crate::fretboard::Tuning;
use crate::model::{PitchClass, PitchSet};
use serde::Serialize;
use std::fmt;
use std::num::NonZeroU8;
use std::str::FromStr;
use thiserror::*;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum VoicingError {
    #[error("String index {string} is out of range for a tuning with {string_count} strings.")]
    StringIndexOutOfRange { string: usize, string_count: usize },
    #[error("String {string} has more than one fingering entry.")]
    DuplicateStringEntry { string: usize },
    #[error("String {string} at fret {fret} sounds {note}, which is not a chord tone.")]
    NoteNotInChord {
        string: usize,
        fret: u8,
        note: PitchClass,
    },
    #[error("Fret {0} is invalid: expected -1 (muted), 0 (open) or a fret number up to 255.")]
    InvalidFret(i16),
    #[error("Finger {finger} is invalid on fret {fret}: expected 1-4 on fretted strings and 0 elsewhere.")]
    InvalidFinger { finger: u8, fret: i16 },
    #[error("Chart has {frets} positions but {fingers} fingers were given.")]
    FingerCountMismatch { frets: usize, fingers: usize },
    #[error("Unknown difficulty {0:?}: expected beginner, intermediate or advanced.")]
    UnknownDifficulty(String),
    #[error("Could not read chord chart: {0}")]
    BadChart(String),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl FromStr for Difficulty {
    type Err = VoicingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(VoicingError::UnknownDifficulty(s.to_owned())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Unspecified,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const fn from_u8(raw: u8) -> Option<Finger> {
        match raw {
            0 => Some(Finger::Unspecified),
            1 => Some(Finger::Index),
            2 => Some(Finger::Middle),
            3 => Some(Finger::Ring),
            4 => Some(Finger::Pinky),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// What one string does in a voicing. Only fretted strings carry a finger.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Placement {
    Muted,
    Open,
    Fretted { fret: NonZeroU8, finger: Finger },
}

impl Placement {
    pub fn from_raw(fret: i16, finger: u8) -> Result<Self, VoicingError> {
        let bad_finger = VoicingError::InvalidFinger { finger, fret };
        match fret {
            -1 | 0 if finger != 0 => Err(bad_finger),
            -1 => Ok(Placement::Muted),
            0 => Ok(Placement::Open),
            _ => {
                let fret = u8::try_from(fret)
                    .ok()
                    .and_then(NonZeroU8::new)
                    .ok_or(VoicingError::InvalidFret(fret))?;
                let finger = Finger::from_u8(finger).ok_or(bad_finger)?;
                Ok(Placement::Fretted { fret, finger })
            }
        }
    }

    /// The sounded fret, or `None` for a muted string.
    pub fn fret(&self) -> Option<u8> {
        match self {
            Placement::Muted => None,
            Placement::Open => Some(0),
            Placement::Fretted { fret, .. } => Some(fret.get()),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FingeringEntry {
    pub string: usize,
    pub placement: Placement,
}

impl FingeringEntry {
    pub fn new(string: usize, placement: Placement) -> Self {
        Self { string, placement }
    }

    pub fn from_raw(string: usize, fret: i16, finger: u8) -> Result<Self, VoicingError> {
        Ok(Self::new(string, Placement::from_raw(fret, finger)?))
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Voicing {
    pub name: String,
    pub difficulty: Difficulty,
    pub fingering: Vec<FingeringEntry>,
}

impl Voicing {
    pub fn new(
        name: impl Into<String>,
        difficulty: Difficulty,
        fingering: Vec<FingeringEntry>,
    ) -> Self {
        Self {
            name: name.into(),
            difficulty,
            fingering,
        }
    }

    /// Builds a voicing from chart positions, lowest string first.
    ///
    /// Muted positions become explicit muted entries. Without `fingers` every
    /// fretted string gets `Finger::Unspecified`.
    pub fn from_chart(
        name: impl Into<String>,
        difficulty: Difficulty,
        frets: &[Option<u8>],
        fingers: Option<&[u8]>,
    ) -> Result<Self, VoicingError> {
        if let Some(fingers) = fingers {
            if fingers.len() != frets.len() {
                return Err(VoicingError::FingerCountMismatch {
                    frets: frets.len(),
                    fingers: fingers.len(),
                });
            }
        }
        let fingering = frets
            .iter()
            .enumerate()
            .map(|(string, fret)| {
                let raw_fret = fret.map_or(-1, i16::from);
                let raw_finger = fingers.map_or(0, |f| f[string]);
                FingeringEntry::from_raw(string, raw_fret, raw_finger)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Voicing::new(name, difficulty, fingering))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum StringStatus {
    Muted,
    OpenRoot,
    Open,
    Fretted { fret: u8, finger: Finger },
}

/// Checks a voicing against a chord on a tuning and reports what each string does.
///
/// Every sounded note must be a chord tone. Strings without an entry are muted.
/// Entries are checked in sorted order so the outcome never depends on how
/// the fingering was listed.
pub fn validate(
    voicing: &Voicing,
    chord: &PitchSet,
    tuning: &Tuning,
) -> Result<Vec<StringStatus>, VoicingError> {
    let string_count = tuning.string_count();
    let mut entries = voicing.fingering.clone();
    entries.sort_unstable();

    if let Some(entry) = entries.iter().find(|e| e.string >= string_count) {
        return Err(VoicingError::StringIndexOutOfRange {
            string: entry.string,
            string_count,
        });
    }
    if let Some(pair) = entries.windows(2).find(|pair| pair[0].string == pair[1].string) {
        return Err(VoicingError::DuplicateStringEntry {
            string: pair[0].string,
        });
    }

    let mut statuses = vec![StringStatus::Muted; string_count];
    for entry in &entries {
        let open = tuning.open_strings()[entry.string];
        let fret = match entry.placement.fret() {
            Some(fret) => fret,
            None => continue,
        };
        let note = open.transpose(i32::from(fret));
        if !chord.contains(note) {
            log::debug!(
                "Voicing {:?} sounds {} on string {} outside the chord",
                voicing.name,
                note,
                entry.string
            );
            return Err(VoicingError::NoteNotInChord {
                string: entry.string,
                fret,
                note,
            });
        }
        statuses[entry.string] = match entry.placement {
            Placement::Muted => StringStatus::Muted,
            Placement::Open if note == chord.root() => StringStatus::OpenRoot,
            Placement::Open => StringStatus::Open,
            Placement::Fretted { fret, finger } => StringStatus::Fretted {
                fret: fret.get(),
                finger,
            },
        };
    }
    Ok(statuses)
}
