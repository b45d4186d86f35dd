//! Free-text player name resolution
//!
//! Participant cells only carry names ("Šutko & Trnka"), so matching a name
//! to a player is a policy decision. Strategies implement [`NameResolver`]
//! over an in-memory index built once per import run.

use crate::model::name::{name_key, surname_key};
use crate::model::PlayerId;
use std::collections::HashMap;

pub trait NameResolver {
    fn resolve(&self, name: &str) -> Option<PlayerId>;
}

/// Exact match on the normalized full name
#[derive(Debug, Default)]
pub struct ExactNameResolver {
    by_key: HashMap<String, PlayerId>,
}

impl ExactNameResolver {
    /// Index `(id, full name)` pairs; the first player wins on a key clash
    pub fn new<I, S>(players: I) -> Self
    where
        I: IntoIterator<Item = (PlayerId, S)>,
        S: AsRef<str>,
    {
        let mut by_key = HashMap::new();
        for (id, full_name) in players {
            let key = name_key(full_name.as_ref());
            if !key.is_empty() {
                by_key.entry(key).or_insert(id);
            }
        }
        Self { by_key }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl NameResolver for ExactNameResolver {
    fn resolve(&self, name: &str) -> Option<PlayerId> {
        let key = name_key(name);
        if key.is_empty() {
            return None;
        }
        self.by_key.get(&key).copied()
    }
}

/// Tries `inner` first, then accepts a player whose surname key equals the
/// lookup key, but only when exactly one player has that surname.
pub struct SurnameFallback<R> {
    inner: R,
    by_surname: HashMap<String, Vec<PlayerId>>,
}

impl<R: NameResolver> SurnameFallback<R> {
    pub fn new<I, S>(inner: R, players: I) -> Self
    where
        I: IntoIterator<Item = (PlayerId, S)>,
        S: AsRef<str>,
    {
        let mut by_surname: HashMap<String, Vec<PlayerId>> = HashMap::new();
        for (id, full_name) in players {
            if let Some(key) = surname_key(full_name.as_ref()) {
                by_surname.entry(key).or_default().push(id);
            }
        }
        Self { inner, by_surname }
    }
}

impl<R: NameResolver> NameResolver for SurnameFallback<R> {
    fn resolve(&self, name: &str) -> Option<PlayerId> {
        if let Some(id) = self.inner.resolve(name) {
            return Some(id);
        }
        match self.by_surname.get(&name_key(name)).map(Vec::as_slice) {
            Some([only]) => {
                log::debug!("'{}' matched by surname to player {}", name, only);
                Some(*only)
            }
            _ => None,
        }
    }
}
