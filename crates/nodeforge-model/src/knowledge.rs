//! Knowledge tables
//!
//! Static configuration consumed by the classifier, the resolver and the
//! validator:
//! - [`IndicatorTable`]: weighted keyword indicators per pattern
//! - [`DependencyTable`]: dependency sets per pattern plus feature sets
//! - [`DenyList`]: vendor SDK modules generated code must not import
//!
//! Tables are parsed once into a [`KnowledgeBase`] and shared read-only
//! (typically behind an `Arc`). Nothing here is mutable after loading.

use crate::error::KnowledgeError;
use crate::pattern::Pattern;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const BUILTIN_INDICATORS: &str = include_str!("../tables/indicators.yaml");
const BUILTIN_DEPENDENCIES: &str = include_str!("../tables/dependencies.yaml");
const BUILTIN_DENY_LIST: &str = include_str!("../tables/deny_list.yaml");

/// One weighted keyword group for a pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternIndicator {
    /// Pattern the keywords vote for
    pub pattern: Pattern,
    /// Weight added per matched keyword
    pub weight: f64,
    /// Lower-case keywords; may contain spaces
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIndicatorTable {
    version: u32,
    indicators: Vec<RawIndicator>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIndicator {
    pattern: String,
    weight: f64,
    keywords: Vec<String>,
}

/// Ordered indicator table
///
/// Order matters: ties between equally scored patterns resolve by the
/// position of each pattern's first entry.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    version: u32,
    indicators: Vec<PatternIndicator>,
}

impl IndicatorTable {
    /// Parse and validate a table document
    ///
    /// # Errors
    /// Returns error for malformed YAML, unknown patterns, non-positive
    /// weights, blank keywords, or a keyword shared by two patterns
    pub fn from_yaml_str(text: &str) -> Result<Self, KnowledgeError> {
        let raw: RawIndicatorTable = serde_yaml::from_str(text).map_err(|source| {
            KnowledgeError::Malformed {
                table: "indicators",
                source,
            }
        })?;
        Self::new(raw.version, raw.indicators.into_iter().map(|r| (r.pattern, r.weight, r.keywords)))
    }

    /// Build a table from `(pattern, weight, keywords)` rows
    ///
    /// # Errors
    /// Same validation as [`IndicatorTable::from_yaml_str`]
    pub fn new<I, P>(version: u32, rows: I) -> Result<Self, KnowledgeError>
    where
        I: IntoIterator<Item = (P, f64, Vec<String>)>,
        P: AsRef<str>,
    {
        let mut owners: HashMap<String, Pattern> = HashMap::new();
        let mut indicators = Vec::new();

        for (pattern_name, weight, keywords) in rows {
            let pattern_name = pattern_name.as_ref();
            let pattern: Pattern =
                pattern_name
                    .parse()
                    .map_err(|_| KnowledgeError::UnknownPattern {
                        table: "indicators",
                        value: pattern_name.to_string(),
                    })?;

            if !weight.is_finite() || weight <= 0.0 {
                return Err(KnowledgeError::InvalidWeight {
                    pattern: pattern.to_string(),
                    weight,
                });
            }

            if keywords.is_empty() {
                return Err(KnowledgeError::EmptyKeyword {
                    pattern: pattern.to_string(),
                });
            }

            let mut normalized = Vec::with_capacity(keywords.len());
            for keyword in keywords {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(KnowledgeError::EmptyKeyword {
                        pattern: pattern.to_string(),
                    });
                }
                match owners.get(&keyword) {
                    Some(owner) if *owner != pattern => {
                        return Err(KnowledgeError::AmbiguousKeyword {
                            keyword,
                            first: owner.to_string(),
                            second: pattern.to_string(),
                        });
                    }
                    _ => {
                        owners.insert(keyword.clone(), pattern);
                    }
                }
                normalized.push(keyword);
            }

            indicators.push(PatternIndicator {
                pattern,
                weight,
                keywords: normalized,
            });
        }

        Ok(Self {
            version,
            indicators,
        })
    }

    /// Embedded default table
    ///
    /// # Errors
    /// Only if the embedded document is itself invalid
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_yaml_str(BUILTIN_INDICATORS)
    }

    /// Table version
    #[inline]
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Indicators in declaration order
    #[inline]
    #[must_use]
    pub fn indicators(&self) -> &[PatternIndicator] {
        &self.indicators
    }

    /// Patterns in order of first appearance
    #[must_use]
    pub fn pattern_order(&self) -> Vec<Pattern> {
        let mut order = Vec::new();
        for indicator in &self.indicators {
            if !order.contains(&indicator.pattern) {
                order.push(indicator.pattern);
            }
        }
        order
    }

    /// Every keyword of one pattern
    #[must_use]
    pub fn keywords_for(&self, pattern: Pattern) -> Vec<&str> {
        self.indicators
            .iter()
            .filter(|i| i.pattern == pattern)
            .flat_map(|i| i.keywords.iter().map(String::as_str))
            .collect()
    }
}

/// One dependency with its version constraint
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencySpec {
    /// Distribution name
    pub name: String,
    /// PEP 440 constraint such as `>=2.0`
    pub constraint: String,
}

impl DependencySpec {
    /// Create a dependency entry
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.into(),
        }
    }

    /// `name` + `constraint`, as written in requirement files
    #[inline]
    #[must_use]
    pub fn requirement(&self) -> String {
        format!("{}{}", self.name, self.constraint)
    }
}

/// Runtime, optional and development dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencySet {
    /// Needed to run the generated application
    #[serde(default)]
    pub runtime: Vec<DependencySpec>,
    /// Useful but not required
    #[serde(default)]
    pub optional: Vec<DependencySpec>,
    /// Needed to run the generated tests
    #[serde(default)]
    pub dev: Vec<DependencySpec>,
}

impl DependencySet {
    /// Overlay `other` on `self`; same-name entries of `other` win
    fn overlay(&self, other: &DependencySet) -> DependencySet {
        fn merge(base: &[DependencySpec], over: &[DependencySpec]) -> Vec<DependencySpec> {
            let mut merged: IndexMap<&str, &DependencySpec> =
                base.iter().map(|d| (d.name.as_str(), d)).collect();
            for dep in over {
                merged.insert(dep.name.as_str(), dep);
            }
            merged.into_values().cloned().collect()
        }
        DependencySet {
            runtime: merge(&self.runtime, &other.runtime),
            optional: merge(&self.optional, &other.optional),
            dev: merge(&self.dev, &other.dev),
        }
    }

    fn check(&self, owner: &str) -> Result<(), KnowledgeError> {
        for dep in self.runtime.iter().chain(&self.optional).chain(&self.dev) {
            if dep.name.trim().is_empty() || dep.constraint.trim().is_empty() {
                return Err(KnowledgeError::IncompleteDependency {
                    pattern: owner.to_string(),
                    name: dep.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDependencyTable {
    version: u32,
    #[serde(default)]
    base: DependencySet,
    patterns: BTreeMap<String, DependencySet>,
    #[serde(default)]
    features: RawFeatures,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFeatures {
    #[serde(default)]
    http: DependencySet,
}

/// Dependency sets per pattern, with the base set already folded in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyTable {
    version: u32,
    patterns: BTreeMap<Pattern, DependencySet>,
    http: DependencySet,
}

impl DependencyTable {
    /// Parse and validate a table document
    ///
    /// # Errors
    /// Returns error for malformed YAML, unknown pattern keys, a pattern
    /// with no entry, or incomplete dependency rows
    pub fn from_yaml_str(text: &str) -> Result<Self, KnowledgeError> {
        let raw: RawDependencyTable = serde_yaml::from_str(text).map_err(|source| {
            KnowledgeError::Malformed {
                table: "dependencies",
                source,
            }
        })?;

        raw.base.check("base")?;
        raw.features.http.check("features.http")?;

        let mut patterns = BTreeMap::new();
        for (name, set) in &raw.patterns {
            let pattern: Pattern = name.parse().map_err(|_| KnowledgeError::UnknownPattern {
                table: "dependencies",
                value: name.clone(),
            })?;
            set.check(name)?;
            patterns.insert(pattern, raw.base.overlay(set));
        }

        if let Some(missing) = Pattern::ALL.iter().find(|p| !patterns.contains_key(*p)) {
            return Err(KnowledgeError::MissingPattern(missing.to_string()));
        }

        Ok(Self {
            version: raw.version,
            patterns,
            http: raw.features.http,
        })
    }

    /// Embedded default table
    ///
    /// # Errors
    /// Only if the embedded document is itself invalid
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_yaml_str(BUILTIN_DEPENDENCIES)
    }

    /// Table version
    #[inline]
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Full dependency set of one pattern
    #[inline]
    #[must_use]
    pub fn for_pattern(&self, pattern: Pattern) -> Option<&DependencySet> {
        self.patterns.get(&pattern)
    }

    /// Extra dependencies for HTTP integration
    #[inline]
    #[must_use]
    pub fn http(&self) -> &DependencySet {
        &self.http
    }
}

/// One deny-listed module prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeniedModule {
    /// Dotted module prefix
    pub module: String,
    /// Why it is denied, e.g. `cloud provider SDK`
    pub category: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDenyList {
    version: u32,
    categories: IndexMap<String, Vec<String>>,
}

/// Import deny-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyList {
    version: u32,
    entries: Vec<DeniedModule>,
}

impl DenyList {
    /// Parse and validate a deny-list document
    ///
    /// # Errors
    /// Returns error for malformed YAML or entries that are not dotted
    /// module names
    pub fn from_yaml_str(text: &str) -> Result<Self, KnowledgeError> {
        let raw: RawDenyList = serde_yaml::from_str(text).map_err(|source| {
            KnowledgeError::Malformed {
                table: "deny_list",
                source,
            }
        })?;

        let mut entries = Vec::new();
        for (category, modules) in raw.categories {
            for module in modules {
                let module = module.trim().to_string();
                let valid = !module.is_empty()
                    && module.split('.').all(|part| {
                        part.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    });
                if !valid {
                    return Err(KnowledgeError::InvalidModule(module));
                }
                entries.push(DeniedModule {
                    module,
                    category: category.clone(),
                });
            }
        }

        Ok(Self {
            version: raw.version,
            entries,
        })
    }

    /// Embedded default list
    ///
    /// # Errors
    /// Only if the embedded document is itself invalid
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_yaml_str(BUILTIN_DENY_LIST)
    }

    /// List version
    #[inline]
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// All entries
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[DeniedModule] {
        &self.entries
    }

    /// Entry denying `module`, if any
    ///
    /// Matching is by dotted prefix on whole segments: `docker` denies
    /// `docker` and `docker.types`, never `dockerfile_parse`.
    #[must_use]
    pub fn find(&self, module: &str) -> Option<&DeniedModule> {
        self.entries.iter().find(|entry| {
            module == entry.module
                || module
                    .strip_prefix(entry.module.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

/// All knowledge tables, loaded together
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    indicators: IndicatorTable,
    dependencies: DependencyTable,
    deny_list: DenyList,
}

impl KnowledgeBase {
    /// Assemble from individually loaded tables
    #[inline]
    #[must_use]
    pub fn new(indicators: IndicatorTable, dependencies: DependencyTable, deny_list: DenyList) -> Self {
        Self {
            indicators,
            dependencies,
            deny_list,
        }
    }

    /// Embedded default tables
    ///
    /// # Errors
    /// Only if an embedded document is itself invalid
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_yaml(BUILTIN_INDICATORS, BUILTIN_DEPENDENCIES, BUILTIN_DENY_LIST)
    }

    /// Parse all three tables from YAML text
    ///
    /// # Errors
    /// Returns the first table error encountered
    pub fn from_yaml(indicators: &str, dependencies: &str, deny_list: &str) -> Result<Self, KnowledgeError> {
        let kb = Self::new(
            IndicatorTable::from_yaml_str(indicators)?,
            DependencyTable::from_yaml_str(dependencies)?,
            DenyList::from_yaml_str(deny_list)?,
        );
        tracing::debug!(
            indicators = kb.indicators.indicators().len(),
            deny_entries = kb.deny_list.entries().len(),
            "knowledge tables loaded"
        );
        Ok(kb)
    }

    /// Indicator table
    #[inline]
    #[must_use]
    pub fn indicators(&self) -> &IndicatorTable {
        &self.indicators
    }

    /// Dependency table
    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &DependencyTable {
        &self.dependencies
    }

    /// Import deny-list
    #[inline]
    #[must_use]
    pub fn deny_list(&self) -> &DenyList {
        &self.deny_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_load() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert_eq!(kb.indicators().version(), 1);
        assert_eq!(kb.indicators().pattern_order(), Pattern::ALL.to_vec());
        for pattern in Pattern::ALL {
            assert!(kb.dependencies().for_pattern(pattern).is_some());
        }
        assert!(!kb.deny_list().entries().is_empty());
    }

    #[test]
    fn base_set_is_folded_into_patterns() {
        let table = DependencyTable::builtin().unwrap();
        let workflow = table.for_pattern(Pattern::Workflow).unwrap();
        assert!(workflow.runtime.iter().any(|d| d.name == "pocketflow"));

        let structured = table.for_pattern(Pattern::StructuredOutput).unwrap();
        let pydantic: Vec<_> = structured.runtime.iter().filter(|d| d.name == "pydantic").collect();
        assert_eq!(pydantic.len(), 1);
        assert_eq!(pydantic[0].constraint, ">=2.5");
    }

    #[test]
    fn indicator_keywords_are_normalized() {
        let table = IndicatorTable::new(1, vec![("rag", 1.0, vec!["  Retrieve ".to_string()])]).unwrap();
        assert_eq!(table.keywords_for(Pattern::Rag), vec!["retrieve"]);
    }

    #[test]
    fn indicator_rejects_non_positive_weight() {
        let err = IndicatorTable::new(1, vec![("RAG", 0.0, vec!["x".to_string()])]).unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidWeight { .. }));
        let err = IndicatorTable::new(1, vec![("RAG", f64::NAN, vec!["x".to_string()])]).unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidWeight { .. }));
    }

    #[test]
    fn indicator_rejects_shared_keyword() {
        let err = IndicatorTable::new(
            1,
            vec![
                ("RAG", 1.0, vec!["search".to_string()]),
                ("TOOL", 1.0, vec!["Search".to_string()]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::AmbiguousKeyword { .. }));
    }

    #[test]
    fn indicator_allows_repeat_within_pattern() {
        let table = IndicatorTable::new(
            1,
            vec![
                ("RAG", 1.0, vec!["search".to_string()]),
                ("RAG", 2.0, vec!["search".to_string()]),
            ],
        );
        assert!(table.is_ok());
    }

    #[test]
    fn indicator_rejects_unknown_pattern() {
        let err = IndicatorTable::from_yaml_str(
            "version: 1\nindicators:\n  - {pattern: BLOCKCHAIN, weight: 1.0, keywords: [chain]}\n",
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::UnknownPattern { .. }));
    }

    #[test]
    fn dependency_table_requires_every_pattern() {
        let err = DependencyTable::from_yaml_str("version: 1\npatterns:\n  RAG: {}\n").unwrap_err();
        assert!(matches!(err, KnowledgeError::MissingPattern(_)));
    }

    #[test]
    fn dependency_table_rejects_unknown_pattern() {
        let err = DependencyTable::from_yaml_str("version: 1\npatterns:\n  QUANTUM: {}\n").unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::UnknownPattern { table: "dependencies", .. }
        ));
    }

    #[test]
    fn deny_list_matches_whole_segments() {
        let list = DenyList::builtin().unwrap();
        assert_eq!(list.find("boto3").unwrap().category, "cloud provider SDK");
        assert!(list.find("google.cloud.storage").is_some());
        assert!(list.find("docker.types").is_some());
        assert!(list.find("dockerfile_parse").is_none());
        assert!(list.find("google.protobuf").is_none());
        assert!(list.find("google").is_none());
    }

    #[test]
    fn deny_list_rejects_malformed_modules() {
        let err = DenyList::from_yaml_str("version: 1\ncategories:\n  x:\n    - \"bad-name\"\n").unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidModule(_)));
    }
}
