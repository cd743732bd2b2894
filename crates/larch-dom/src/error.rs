//! DOM precondition failures.

use thiserror::Error;

use crate::NodeId;

/// Errors raised when a mutation's preconditions do not hold.
///
/// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#mutation-algorithms)
/// "throw a `NotFoundError` `DOMException`" and friends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The id does not name a node in this tree.
    #[error("node {0:?} does not exist in this tree")]
    UnknownNode(NodeId),

    /// "If child's parent is not parent, then throw a `NotFoundError`."
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The expected parent.
        parent: NodeId,
        /// The node that was not found under it.
        child: NodeId,
    },

    /// "If node is a host-including inclusive ancestor of parent, then throw
    /// a `HierarchyRequestError`."
    #[error("inserting {node:?} under {parent:?} would create a cycle")]
    HierarchyRequest {
        /// The prospective parent.
        parent: NodeId,
        /// The node being inserted.
        node: NodeId,
    },

    /// An operation needed an element and got something else.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    /// [§ 4.9.1 `insertRow`](https://html.spec.whatwg.org/multipage/tables.html#dom-table-insertrow)
    /// "If index is less than −1 or greater than the number of elements in
    /// rows collection ... throw an `IndexSizeError`."
    #[error("row index {index} is outside -1..={rows}")]
    IndexSize {
        /// The requested index.
        index: i64,
        /// The number of rows in the table.
        rows: usize,
    },
}
