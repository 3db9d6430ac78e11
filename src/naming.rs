use std::collections::{BTreeMap, HashMap, HashSet};

use midly::{MetaMessage, TrackEvent, TrackEventKind};

const GENERATED_NAME_PREFIX: &str = "autogenerated_name_track_";

/// Decodes a track name payload into something usable as a file name
/// component. Falls back to one char per byte if the name isn't UTF-8.
pub fn extract_name(data: &[u8]) -> String {
    let name = match std::str::from_utf8(data) {
        Ok(name) => name.to_owned(),
        Err(_) => data.iter().map(|&byte| byte as char).collect(),
    };
    name.replace([' ', '/', '\\'], "_")
}

pub fn generated_name(track_index: usize) -> String {
    format!("{GENERATED_NAME_PREFIX}{track_index}")
}

/// Name from the first track name meta event, if any.
pub fn track_name(track: &[TrackEvent]) -> Option<String> {
    track.iter().find_map(|event| match event.kind {
        TrackEventKind::Meta(MetaMessage::TrackName(data)) => Some(extract_name(data)),
        _ => None,
    })
}

/// Track names keyed by track index. Iteration is always in ascending index
/// order, which keeps collision numbering deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackNames(BTreeMap<usize, String>);

impl TrackNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, track_index: usize, name: String) {
        self.0.insert(track_index, name);
    }

    pub fn get(&self, track_index: usize) -> Option<&str> {
        self.0.get(&track_index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(index, name)| (*index, name.as_str()))
    }

    /// Returns a copy in which repeated names get an occurrence suffix: the
    /// first "Alto" stays "Alto", the second becomes "Alto(2)" and so on.
    /// A suffixed name never takes a name already present in the map or
    /// handed out earlier; the counter skips ahead instead, so the result
    /// holds distinct names only. `self` is left alone, so resolving the
    /// same map twice gives the same result.
    pub fn resolve_collisions(&self) -> TrackNames {
        let mut taken: HashSet<String> = self.0.values().cloned().collect();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut resolved = BTreeMap::new();
        for (index, name) in &self.0 {
            let count = seen.entry(name.as_str()).or_insert(0);
            *count += 1;
            if *count == 1 {
                resolved.insert(*index, name.clone());
                continue;
            }
            let mut candidate = format!("{name}({count})");
            while taken.contains(&candidate) {
                *count += 1;
                candidate = format!("{name}({count})");
            }
            taken.insert(candidate.clone());
            resolved.insert(*index, candidate);
        }
        TrackNames(resolved)
    }
}

impl FromIterator<(usize, String)> for TrackNames {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        TrackNames(iter.into_iter().collect())
    }
}
