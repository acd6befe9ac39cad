//! Music-theory resolution for fretted instruments.
//!
//! Turns tunings, scale and chord interval sets and root notes into annotated
//! fretboard grids, diatonic chord listings and validated chord voicings.
//! Every function is pure; reference data arrives through an injected
//! [`Catalog`](catalog::Catalog).

pub mod catalog;
pub mod chord;
pub mod engine;
pub mod fretboard;
pub mod memo;
pub mod model;
pub mod notation;
pub mod scale;
pub mod voicing;

pub use catalog::{Catalog, CatalogError};
pub use engine::{Engine, EngineConfig, EngineError, FretboardRequest, Selection};
pub use model::{IntervalSet, PitchClass, PitchSet, Spelling, TheoryError};
