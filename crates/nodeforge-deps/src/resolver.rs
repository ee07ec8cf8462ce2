//! Pattern to dependency resolution

use crate::config::DependencyConfig;
use crate::error::ResolveError;
use nodeforge_model::{DependencyTable, KnowledgeBase, Pattern};
use std::collections::BTreeSet;

/// Maps patterns to merged dependency configs
///
/// Holds its own copy of the dependency table; resolution is a pure
/// function of the table and the requested patterns.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    table: DependencyTable,
}

impl DependencyResolver {
    /// Create a resolver over a dependency table
    #[inline]
    #[must_use]
    pub fn new(table: DependencyTable) -> Self {
        Self { table }
    }

    /// Create a resolver over the knowledge base's dependency table
    #[inline]
    #[must_use]
    pub fn from_knowledge(knowledge: &KnowledgeBase) -> Self {
        Self::new(knowledge.dependencies().clone())
    }

    /// Resolve a set of patterns
    ///
    /// An empty set resolves WORKFLOW. Patterns are merged in their natural
    /// order, so the notes are deterministic too.
    ///
    /// # Errors
    /// Returns [`ResolveError::MissingTable`] if the table lacks a pattern
    pub fn resolve(&self, patterns: &BTreeSet<Pattern>) -> Result<DependencyConfig, ResolveError> {
        let fallback = BTreeSet::from([Pattern::Workflow]);
        let patterns = if patterns.is_empty() { &fallback } else { patterns };

        let mut resolved: Option<DependencyConfig> = None;
        for pattern in patterns {
            let set = self
                .table
                .for_pattern(*pattern)
                .ok_or(ResolveError::MissingTable(*pattern))?;
            let single = DependencyConfig::for_pattern(*pattern, set);
            resolved = Some(match resolved {
                None => single,
                Some(acc) => acc.merge(&single),
            });
        }

        let config = resolved.ok_or(ResolveError::MissingTable(Pattern::Workflow))?;
        tracing::debug!(
            patterns = ?config.patterns,
            runtime = config.runtime.len(),
            optional = config.optional.len(),
            dev = config.dev.len(),
            notes = config.notes.len(),
            "dependencies resolved"
        );
        Ok(config)
    }

    /// Resolve patterns given by name
    ///
    /// # Errors
    /// Returns [`ResolveError::UnknownPattern`] on the first unknown name
    pub fn resolve_names(&self, names: &[&str]) -> Result<DependencyConfig, ResolveError> {
        let patterns = names
            .iter()
            .map(|name| {
                name.parse::<Pattern>()
                    .map_err(|_| ResolveError::UnknownPattern((*name).to_string()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        self.resolve(&patterns)
    }

    /// Add the HTTP integration set to a resolved config
    #[must_use]
    pub fn with_http(&self, config: &DependencyConfig) -> DependencyConfig {
        config.merged_with_set("http", self.table.http())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DependencyCategory;
    use pretty_assertions::assert_eq;

    fn resolver() -> DependencyResolver {
        DependencyResolver::new(DependencyTable::builtin().unwrap())
    }

    #[test]
    fn empty_request_resolves_workflow() {
        let config = resolver().resolve(&BTreeSet::new()).unwrap();
        assert_eq!(config.patterns, vec![Pattern::Workflow]);
        assert!(config.find("pocketflow").is_some());
        assert!(config.notes.is_empty());
    }

    #[test]
    fn rag_includes_vector_tooling() {
        let config = resolver().resolve(&BTreeSet::from([Pattern::Rag])).unwrap();
        assert_eq!(config.find("numpy").map(|(c, _)| c), Some(DependencyCategory::Runtime));
        assert_eq!(config.find("faiss-cpu").map(|(c, _)| c), Some(DependencyCategory::Optional));
        assert_eq!(config.find("pytest").map(|(c, _)| c), Some(DependencyCategory::Dev));
    }

    #[test]
    fn combined_patterns_record_collision() {
        let config = resolver()
            .resolve(&BTreeSet::from([Pattern::Agent, Pattern::Rag]))
            .unwrap();
        assert_eq!(config.patterns, vec![Pattern::Agent, Pattern::Rag]);
        assert_eq!(config.notes.len(), 1);
        assert_eq!(config.notes[0].name, "pyyaml");
        assert_eq!(config.notes[0].kept, ">=6.0.1");
    }

    #[test]
    fn unknown_name_fails_fast() {
        let err = resolver().resolve_names(&["RAG", "blockchain"]).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownPattern(ref name) if name == "blockchain"));
    }

    #[test]
    fn names_are_parsed_leniently() {
        let config = resolver().resolve_names(&["multi-agent", "rag"]).unwrap();
        assert_eq!(config.patterns, vec![Pattern::Rag, Pattern::MultiAgent]);
    }

    #[test]
    fn http_set_is_merged() {
        let r = resolver();
        let base = r.resolve(&BTreeSet::from([Pattern::Workflow])).unwrap();
        let config = r.with_http(&base);
        assert!(config.find("fastapi").is_some());
        assert!(config.find("httpx").is_some());
        assert!(base.find("fastapi").is_none());
    }

    #[test]
    fn resolution_is_deterministic() {
        let r = resolver();
        let request = BTreeSet::from([Pattern::MultiAgent, Pattern::StructuredOutput, Pattern::Tool]);
        assert_eq!(r.resolve(&request).unwrap(), r.resolve(&request).unwrap());
    }
}
