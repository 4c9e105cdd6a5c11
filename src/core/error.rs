use thiserror::Error;

/// Failures surfaced by method resolution and delegation.
///
/// Both variants are fatal to the call that produced them and are returned
/// unchanged to whoever invoked the dispatch chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No included module and no class-level method defines the name
    #[error("undefined method `{method}` for {class}")]
    NoImplementationFound { class: String, method: String },

    /// A link asked to delegate but it is the last one in the chain
    #[error("no next implementation of `{method}` after {owner}")]
    NoNextImplementation { method: String, owner: String },
}
