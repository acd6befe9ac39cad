use crate::engine::{Engine, EngineError, FretboardRequest, FretboardView, Selection};
use crate::model::PitchClass;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
enum ContextKey {
    Scale(PitchClass, String),
    Chord(PitchClass, String),
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
struct CacheKey {
    tuning: String,
    contexts: Vec<ContextKey>,
}

/// Caches fretboard views per `(tuning, root, scale or chord)`.
///
/// Keys use parsed roots and case-folded names, so `"Db"`/`"c#"` and
/// `"major"`/`"Major"` share an entry. Only successful results are kept, and
/// only they count as misses.
pub struct ResolutionCache<'c> {
    engine: Engine<'c>,
    views: HashMap<CacheKey, FretboardView>,
    hits: usize,
    misses: usize,
}

impl<'c> ResolutionCache<'c> {
    pub fn new(engine: Engine<'c>) -> Self {
        ResolutionCache {
            engine,
            views: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    fn context(
        &self,
        selection: &Selection,
        make: fn(PitchClass, String) -> ContextKey,
    ) -> Result<ContextKey, EngineError> {
        let root = self.engine.root_of(selection)?;
        Ok(make(root, selection.name.to_ascii_lowercase()))
    }

    fn key(&self, request: &FretboardRequest) -> Result<CacheKey, EngineError> {
        let mut contexts = Vec::with_capacity(2);
        if let Some(scale) = &request.scale {
            contexts.push(self.context(scale, ContextKey::Scale)?);
        }
        if let Some(chord) = &request.chord {
            contexts.push(self.context(chord, ContextKey::Chord)?);
        }
        Ok(CacheKey {
            tuning: request.tuning.to_ascii_lowercase(),
            contexts,
        })
    }

    pub fn fretboard(&mut self, request: &FretboardRequest) -> Result<&FretboardView, EngineError> {
        let key = self.key(request)?;
        let view = match self.views.entry(key) {
            Entry::Occupied(found) => {
                self.hits += 1;
                found.into_mut()
            }
            Entry::Vacant(slot) => {
                let view = self.engine.fretboard(request)?;
                self.misses += 1;
                slot.insert(view)
            }
        };
        log::trace!("Fretboard cache: {} hits, {} misses", self.hits, self.misses);
        Ok(view)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn clear(&mut self) {
        self.views.clear();
    }
}
