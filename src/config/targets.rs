use std::collections::BTreeMap;

use crate::{
    analysis::Trigger,
    animation::AnimationKind,
    error::{ConfigError, Result},
    strip::Strip,
};

/// Key that applies an animation list to every strip
pub const WILDCARD: &str = "*";

/// Strips an animation list applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A strip id or an exact strip name
    Strip(String),
    Wildcard,
}

impl Target {
    pub fn from_key(key: &str) -> Self {
        if key == WILDCARD {
            Target::Wildcard
        } else {
            Target::Strip(key.to_string())
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Target::Strip(key) => key,
            Target::Wildcard => WILDCARD,
        }
    }
}

/// One validated animation entry
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSpec {
    pub kind: AnimationKind,
    pub trigger: Trigger,
    pub target: Target,
}

/// Animation lists keyed by strip key or [`WILDCARD`]; order within a list
/// is the declared order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationConfig {
    entries: BTreeMap<String, Vec<AnimationSpec>>,
}

impl AnimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a spec to its target's list
    pub fn push(&mut self, spec: AnimationSpec) {
        self.entries
            .entry(spec.target.key().to_string())
            .or_default()
            .push(spec);
    }

    pub fn with(mut self, spec: AnimationSpec) -> Self {
        self.push(spec);
        self
    }

    pub fn for_key(&self, key: &str) -> &[AnimationSpec] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn wildcard(&self) -> &[AnimationSpec] {
        self.for_key(WILDCARD)
    }

    /// Explicit (non-wildcard) keys
    pub fn explicit_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|key| *key != WILDCARD)
    }

    /// Total number of specs across all keys
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that strip ids are unique and every explicit key selects
    /// exactly one strip
    pub fn validate_targets(&self, strips: &[Strip]) -> Result<()> {
        check_unique_ids(strips)?;
        for key in self.explicit_keys() {
            resolve_key(key, strips)?;
        }
        Ok(())
    }

    /// Per-strip animation lists, index-aligned with `strips`
    ///
    /// Each list is the explicit entries for the strip followed by the
    /// wildcard entries. Explicit keys are visited in key order.
    pub fn resolve<'c>(&'c self, strips: &[Strip]) -> Result<Vec<Vec<&'c AnimationSpec>>> {
        let mut resolved: Vec<Vec<&AnimationSpec>> = vec![Vec::new(); strips.len()];

        for key in self.explicit_keys() {
            let index = resolve_key(key, strips)?;
            resolved[index].extend(self.for_key(key));
        }

        for list in &mut resolved {
            list.extend(self.wildcard());
        }

        Ok(resolved)
    }
}

/// Strip ids key the results and the sink, so each must be unique
pub fn check_unique_ids(strips: &[Strip]) -> std::result::Result<(), ConfigError> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for strip in strips {
        *counts.entry(strip.id.as_str()).or_default() += 1;
    }

    match counts.into_iter().find(|(_, count)| *count > 1) {
        Some((id, count)) => Err(ConfigError::DuplicateStripId {
            id: id.to_string(),
            count,
        }),
        None => Ok(()),
    }
}

/// Index of the one strip a key selects: stable id first, then exact name
pub fn resolve_key(key: &str, strips: &[Strip]) -> std::result::Result<usize, ConfigError> {
    let by_id: Vec<usize> = matching(strips, |strip| strip.id.as_str() == key);
    let candidates = if by_id.is_empty() {
        matching(strips, |strip| strip.name == key)
    } else {
        by_id
    };

    match candidates.as_slice() {
        [] => Err(ConfigError::UnknownTarget {
            key: key.to_string(),
        }),
        [index] => Ok(*index),
        _ => Err(ConfigError::AmbiguousTarget {
            key: key.to_string(),
            matches: candidates.len(),
        }),
    }
}

fn matching(strips: &[Strip], pred: impl Fn(&Strip) -> bool) -> Vec<usize> {
    strips
        .iter()
        .enumerate()
        .filter(|(_, strip)| pred(strip))
        .map(|(index, _)| index)
        .collect()
}
