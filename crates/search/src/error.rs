use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetrievalError>;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Unresolved explicit tool reference: '{name}' is not a known tool")]
    UnresolvedExplicitTool { name: String },

    #[error("Vector store error: {0}")]
    VectorStoreError(#[from] toolscope_vector_store::VectorStoreError),

    #[error("Retrieval produced no result for the query")]
    EmptyBatchResult,
}

impl RetrievalError {
    /// True for the strict-mode failure on an unknown `[name]` reference.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::UnresolvedExplicitTool { .. })
    }

    #[must_use]
    pub fn unresolved_name(&self) -> Option<&str> {
        match self {
            Self::UnresolvedExplicitTool { name } => Some(name),
            _ => None,
        }
    }
}
