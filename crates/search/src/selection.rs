use std::collections::HashMap;
use std::sync::Arc;
use toolscope_protocol::ToolDefinition;
use toolscope_vector_store::ToolMatch;

#[derive(Debug)]
pub struct SelectedTool<C> {
    pub definition: Arc<ToolDefinition<C>>,
    /// Similarity score when the tool was a semantic hit.
    pub score: Option<f32>,
    /// Whether the query named the tool as `[name]`.
    pub explicit: bool,
}

impl<C> SelectedTool<C> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

/// Insertion-ordered map of tool name to definition produced by a retrieval.
#[derive(Debug)]
pub struct ToolSelection<C> {
    entries: Vec<SelectedTool<C>>,
    positions: HashMap<String, usize>,
    unresolved: Vec<String>,
}

impl<C> Default for ToolSelection<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            unresolved: Vec::new(),
        }
    }
}

impl<C> ToolSelection<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_semantic(&mut self, hit: ToolMatch<C>) {
        let name = hit.definition.name.clone();
        if let Some(&idx) = self.positions.get(&name) {
            let entry = &mut self.entries[idx];
            entry.definition = hit.definition;
            entry.score = Some(hit.score);
            return;
        }
        self.positions.insert(name, self.entries.len());
        self.entries.push(SelectedTool {
            definition: hit.definition,
            score: Some(hit.score),
            explicit: false,
        });
    }

    /// Inserts an explicitly named tool; an existing entry is overwritten
    /// in place.
    pub(crate) fn insert_explicit(&mut self, definition: Arc<ToolDefinition<C>>) {
        if let Some(&idx) = self.positions.get(&definition.name) {
            let entry = &mut self.entries[idx];
            entry.definition = definition;
            entry.explicit = true;
            return;
        }
        self.positions
            .insert(definition.name.clone(), self.entries.len());
        self.entries.push(SelectedTool {
            definition,
            score: None,
            explicit: true,
        });
    }

    pub(crate) fn mark_unresolved(&mut self, name: String) {
        self.unresolved.push(name);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<ToolDefinition<C>>> {
        self.positions
            .get(name)
            .map(|&idx| &self.entries[idx].definition)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(SelectedTool::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedTool<C>> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicit references that matched no known tool (non-strict mode only).
    #[must_use]
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    #[must_use]
    pub fn into_definitions(self) -> Vec<Arc<ToolDefinition<C>>> {
        self.entries.into_iter().map(|entry| entry.definition).collect()
    }
}

impl<'a, C> IntoIterator for &'a ToolSelection<C> {
    type Item = &'a SelectedTool<C>;
    type IntoIter = std::slice::Iter<'a, SelectedTool<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
