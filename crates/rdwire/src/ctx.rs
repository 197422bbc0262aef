// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model-wide state threaded through every read and write call.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::intern::{InternDefinition, InternRoot};

/// Serialization context.
///
/// Carries the name of the active model root and the intern tables concrete
/// decoders/encoders may use. The dispatcher passes it through untouched.
/// Cloning is cheap: intern roots are shared.
#[derive(Debug, Clone, Default)]
pub struct SerializationCtx {
    model_root: Option<Arc<str>>,
    intern_roots: BTreeMap<Arc<str>, Arc<InternRoot>>,
}

impl SerializationCtx {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_model_root(mut self, name: impl Into<Arc<str>>) -> Self {
        self.model_root = Some(name.into());
        self
    }

    /// Attach an intern root under `key`, replacing any previous one.
    #[must_use]
    pub fn with_intern_root(mut self, key: impl Into<Arc<str>>, root: Arc<InternRoot>) -> Self {
        self.intern_roots.insert(key.into(), root);
        self
    }

    pub fn model_root(&self) -> Option<&str> {
        self.model_root.as_deref()
    }

    pub fn intern_root(&self, key: &str) -> Option<&InternRoot> {
        self.intern_roots.get(key).map(Arc::as_ref)
    }

    /// Pending-entry counts of every root, in key order.
    pub(crate) fn intern_marks(&self) -> Vec<usize> {
        self.intern_roots.values().map(|root| root.pending_len()).collect()
    }

    /// Entries interned since `marks` was taken, as definitions ordered by key
    /// and then by creation.
    pub(crate) fn take_intern_definitions(&self, marks: &[usize]) -> Vec<InternDefinition> {
        self.intern_roots
            .iter()
            .zip(marks)
            .flat_map(|((key, root), &mark)| {
                root.take_pending(mark)
                    .into_iter()
                    .map(move |(index, value)| InternDefinition {
                        key: Arc::clone(key),
                        index,
                        value,
                    })
            })
            .collect()
    }

    /// Roll back entries interned since `marks` was taken.
    pub(crate) fn discard_intern_definitions(&self, marks: &[usize]) {
        for (root, &mark) in self.intern_roots.values().zip(marks) {
            root.discard_pending(mark);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctx_builder() {
        let root = Arc::new(InternRoot::new());
        let ctx = SerializationCtx::new()
            .with_model_root("DemoModel")
            .with_intern_root("Protocol", Arc::clone(&root));

        assert_eq!(ctx.model_root(), Some("DemoModel"));
        assert!(ctx.intern_root("Protocol").is_some());
        assert!(ctx.intern_root("Missing").is_none());

        // clones share the same root
        let clone = ctx.clone();
        root.intern("shared").expect("intern");
        assert_eq!(
            clone.intern_root("Protocol").and_then(|r| r.index_of("shared")),
            Some(0)
        );
    }

    #[test]
    fn test_intern_definitions_since_mark() {
        let ctx = SerializationCtx::new()
            .with_intern_root("B", Arc::new(InternRoot::new()))
            .with_intern_root("A", Arc::new(InternRoot::new()));
        let a = ctx.intern_root("A").expect("A");
        let b = ctx.intern_root("B").expect("B");
        a.intern("before").expect("intern");

        let marks = ctx.intern_marks();
        b.intern("b0").expect("intern");
        a.intern("a1").expect("intern");
        let definitions = ctx.take_intern_definitions(&marks);

        let summary: Vec<(&str, i32, &str)> = definitions
            .iter()
            .map(|d| (&*d.key, d.index, &*d.value))
            .collect();
        assert_eq!(summary, [("A", 1, "a1"), ("B", 0, "b0")]);
        assert!(ctx.take_intern_definitions(&marks).is_empty());
        // "before" is still queued for whoever owns the earlier mark
        assert_eq!(ctx.take_intern_definitions(&[0, 0]).len(), 1);
    }

    #[test]
    fn test_discard_rolls_back_entries() {
        let ctx = SerializationCtx::new().with_intern_root("A", Arc::new(InternRoot::new()));
        let marks = ctx.intern_marks();
        ctx.intern_root("A").expect("A").intern("gone").expect("intern");
        ctx.discard_intern_definitions(&marks);
        assert!(ctx.intern_root("A").expect("A").is_empty());
    }
}
