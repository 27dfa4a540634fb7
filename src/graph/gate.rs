//! Consistency gate.
//!
//! Read operations that depend on structural soundness call
//! [`Graph::require_clean`] first. A clean graph is borrowed as-is; a dirty
//! graph is cleaned into a fresh value and the operation runs on that
//! instead. The receiver is never modified, so mutation stays cheap and the
//! O(N + E) cleaning pass is only paid when a sound view is actually needed.

use std::borrow::Cow;

use tracing::info;

use super::Graph;

impl Graph {
    /// Get a structurally sound view of this graph for `operation`.
    pub fn require_clean(&self, operation: &str) -> Cow<'_, Graph> {
        if self.dirty {
            info!(operation, "Cleaning dirty graph");
            Cow::Owned(self.clean())
        } else {
            Cow::Borrowed(self)
        }
    }
}
