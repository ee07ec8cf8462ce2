//! Resolved dependency configuration
//!
//! A [`DependencyConfig`] is a value: merging two configs produces a new
//! one, neither input is touched.

use nodeforge_model::{DependencySet, DependencySpec, Pattern};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Dependency category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyCategory {
    /// Required at run time
    Runtime,
    /// Optional extras
    Optional,
    /// Test and development tooling
    Dev,
}

impl DependencyCategory {
    /// Every category, highest priority first
    pub const ALL: [DependencyCategory; 3] = [
        DependencyCategory::Runtime,
        DependencyCategory::Optional,
        DependencyCategory::Dev,
    ];

    /// Lower-case name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyCategory::Runtime => "runtime",
            DependencyCategory::Optional => "optional",
            DependencyCategory::Dev => "dev",
        }
    }
}

impl Display for DependencyCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one constraint collision decided during a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionNote {
    /// Dependency name
    pub name: String,
    /// Category the surviving entry lives in
    pub category: DependencyCategory,
    /// Constraint kept
    pub kept: String,
    /// Constraint discarded
    pub dropped: String,
    /// Which source brought the colliding entry
    pub source: String,
}

impl Display for ResolutionNote {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): kept '{}' over '{}' while merging {}",
            self.name, self.category, self.kept, self.dropped, self.source
        )
    }
}

/// Resolved runtime, optional and development dependencies
///
/// Every list is sorted by name and free of duplicates; a name appears in
/// at most one of `runtime`, `optional`, `dev` once runtime wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConfig {
    /// Patterns the config was resolved for, sorted
    pub patterns: Vec<Pattern>,
    /// Runtime requirements
    pub runtime: Vec<DependencySpec>,
    /// Optional extras
    pub optional: Vec<DependencySpec>,
    /// Development requirements
    pub dev: Vec<DependencySpec>,
    /// Collisions decided while merging, in decision order
    pub notes: Vec<ResolutionNote>,
}

type Buckets = [BTreeMap<String, String>; 3];

impl DependencyConfig {
    /// Config holding a single pattern's table
    #[must_use]
    pub fn for_pattern(pattern: Pattern, set: &DependencySet) -> Self {
        let seed = Self {
            patterns: vec![pattern],
            ..Self::default()
        };
        seed.merged_with_set(pattern.as_str(), set)
    }

    /// Union of `self` and `other`, highest constraint wins per name
    #[must_use]
    pub fn merge(&self, other: &DependencyConfig) -> Self {
        let source = other
            .patterns
            .iter()
            .map(Pattern::as_str)
            .collect::<Vec<_>>()
            .join("+");
        let incoming = DependencySet {
            runtime: other.runtime.clone(),
            optional: other.optional.clone(),
            dev: other.dev.clone(),
        };

        let mut seed = self.clone();
        seed.notes.extend(other.notes.iter().cloned());
        let mut merged = seed.merged_with_set(&source, &incoming);
        for pattern in &other.patterns {
            if !merged.patterns.contains(pattern) {
                merged.patterns.push(*pattern);
            }
        }
        merged.patterns.sort();
        merged
    }

    /// Union of `self` and a raw dependency set labelled `source`
    #[must_use]
    pub fn merged_with_set(&self, source: &str, set: &DependencySet) -> Self {
        let mut buckets: Buckets = [
            to_map(&self.runtime),
            to_map(&self.optional),
            to_map(&self.dev),
        ];
        let mut notes = self.notes.clone();

        let incoming = [&set.runtime, &set.optional, &set.dev];
        for (slot, (category, deps)) in DependencyCategory::ALL.iter().zip(incoming).enumerate() {
            for dep in deps {
                absorb(&mut buckets[slot], *category, dep, source, &mut notes);
            }
        }

        promote_runtime(&mut buckets, source, &mut notes);

        let [runtime, optional, dev] = buckets;
        Self {
            patterns: self.patterns.clone(),
            runtime: from_map(runtime),
            optional: from_map(optional),
            dev: from_map(dev),
            notes,
        }
    }

    /// Entries of one category
    #[inline]
    #[must_use]
    pub fn category(&self, category: DependencyCategory) -> &[DependencySpec] {
        match category {
            DependencyCategory::Runtime => &self.runtime,
            DependencyCategory::Optional => &self.optional,
            DependencyCategory::Dev => &self.dev,
        }
    }

    /// Find an entry by name in any category
    #[must_use]
    pub fn find(&self, name: &str) -> Option<(DependencyCategory, &DependencySpec)> {
        DependencyCategory::ALL.iter().find_map(|category| {
            self.category(*category)
                .iter()
                .find(|d| d.name == name)
                .map(|d| (*category, d))
        })
    }

    /// Total number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.runtime.len() + self.optional.len() + self.dev.len()
    }

    /// Check if nothing was resolved
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn to_map(deps: &[DependencySpec]) -> BTreeMap<String, String> {
    deps.iter()
        .map(|d| (d.name.clone(), d.constraint.clone()))
        .collect()
}

fn from_map(map: BTreeMap<String, String>) -> Vec<DependencySpec> {
    map.into_iter()
        .map(|(name, constraint)| DependencySpec { name, constraint })
        .collect()
}

fn absorb(
    bucket: &mut BTreeMap<String, String>,
    category: DependencyCategory,
    dep: &DependencySpec,
    source: &str,
    notes: &mut Vec<ResolutionNote>,
) {
    match bucket.get_mut(&dep.name) {
        None => {
            bucket.insert(dep.name.clone(), dep.constraint.clone());
        }
        Some(existing) if *existing == dep.constraint => {}
        Some(existing) => {
            let (kept, dropped) = if dep.constraint > *existing {
                (dep.constraint.clone(), existing.clone())
            } else {
                (existing.clone(), dep.constraint.clone())
            };
            *existing = kept.clone();
            record(notes, &dep.name, category, kept, dropped, source);
        }
    }
}

/// Drop optional and dev entries whose name is already a runtime dependency
fn promote_runtime(buckets: &mut Buckets, source: &str, notes: &mut Vec<ResolutionNote>) {
    let [runtime, optional, dev] = buckets;
    for lower in [optional, dev] {
        let shadowed: Vec<String> = lower
            .keys()
            .filter(|name| runtime.contains_key(*name))
            .cloned()
            .collect();
        for name in shadowed {
            let Some(constraint) = lower.remove(&name) else {
                continue;
            };
            let Some(current) = runtime.get_mut(&name) else {
                continue;
            };
            if constraint != *current {
                let (kept, dropped) = if constraint > *current {
                    (constraint, current.clone())
                } else {
                    (current.clone(), constraint)
                };
                *current = kept.clone();
                record(notes, &name, DependencyCategory::Runtime, kept, dropped, source);
            }
        }
    }
}

fn record(
    notes: &mut Vec<ResolutionNote>,
    name: &str,
    category: DependencyCategory,
    kept: String,
    dropped: String,
    source: &str,
) {
    let note = ResolutionNote {
        name: name.to_string(),
        category,
        kept,
        dropped,
        source: source.to_string(),
    };
    tracing::info!(%note, "dependency constraint collision resolved");
    notes.push(note);
}
