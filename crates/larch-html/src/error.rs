//! Errors from the markup setters.

use larch_dom::{DomError, NodeId};
use thiserror::Error;

/// A markup setter was called on a node it cannot apply to.
///
/// Parse errors never surface here; they are advisory
/// [`ParseIssue`](crate::parser::ParseIssue)s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The id does not name a node in the tree.
    #[error("node {0:?} is not in the tree")]
    NotInTree(NodeId),

    /// `innerHTML` needs an element to serve as the fragment context.
    #[error("node {0:?} is not an element and cannot be a fragment context")]
    ContextNotElement(NodeId),

    /// [§ 3.5.8 outerHTML](https://html.spec.whatwg.org/multipage/dynamic-markup-insertion.html#dom-element-outerhtml)
    ///
    /// "If parent is null, return. There would be no way to obtain a
    /// reference to the nodes created even if the remaining steps were run."
    #[error("node {0:?} has no parent")]
    NoParent(NodeId),

    /// "If parent is a Document, throw a `NoModificationAllowedError`
    /// `DOMException`."
    #[error("node {0:?} is the document element and cannot be replaced")]
    ParentIsDocument(NodeId),

    /// A DOM mutation precondition failed while splicing the fragment in.
    #[error(transparent)]
    Dom(#[from] DomError),
}
