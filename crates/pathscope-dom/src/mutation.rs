//! Mutation observers.
//!
//! [§ 4.3 Mutation observers](https://dom.spec.whatwg.org/#mutation-observers)
//!
//! A browser delivers mutation records asynchronously from a microtask. Here
//! the records are queued on the tree and the host drains them with
//! [`DomTree::take_records`] at whatever point of its event loop it treats as
//! "the microtask checkpoint". Every batch drained is one notification.

use crate::{DomTree, NodeId};

/// Handle for a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

/// [§ 4.3.1 Interface MutationObserver](https://dom.spec.whatwg.org/#interface-mutationobserver)
///
/// The `MutationObserverInit` dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    /// "Set to true if mutations to target's children are to be observed."
    pub child_list: bool,
    /// "Set to true if mutations to target's attributes are to be observed."
    pub attributes: bool,
    /// "Set to true if attributes is true or omitted and target's attribute
    /// value before the mutation needs to be recorded."
    pub attribute_old_value: bool,
    /// "Set to a list of attribute local names (without namespace) if not all
    /// attribute mutations need to be observed and attributes is true or
    /// omitted."
    pub attribute_filter: Option<Vec<String>>,
    /// "Set to true if mutations to not just target, but also target's
    /// descendants are to be observed."
    pub subtree: bool,
}

impl MutationObserverInit {
    /// Observe child list changes anywhere under the target.
    #[must_use]
    pub fn subtree_child_list() -> Self {
        Self {
            child_list: true,
            subtree: true,
            ..Self::default()
        }
    }

    /// Additionally observe changes to the named attributes.
    #[must_use]
    pub fn with_attribute_filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = true;
        self.attribute_filter = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// What a [`MutationRecord`] describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// "childList"
    ChildList {
        /// "Return the nodes added."
        added_nodes: Vec<NodeId>,
        /// "Return the nodes removed."
        removed_nodes: Vec<NodeId>,
    },
    /// "attributes"
    Attributes {
        /// "Returns the local name of the changed attribute"
        attribute_name: String,
        /// The value before the change, when the observer asked for it.
        old_value: Option<String>,
    },
}

/// [§ 4.3.3 Interface MutationRecord](https://dom.spec.whatwg.org/#interface-mutationrecord)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// "Returns the node the mutation affected"
    pub target: NodeId,
    /// The record's type and its type-specific fields.
    pub kind: MutationKind,
}

impl MutationRecord {
    pub(crate) const fn child_list(
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
    ) -> Self {
        Self {
            target,
            kind: MutationKind::ChildList {
                added_nodes,
                removed_nodes,
            },
        }
    }

    pub(crate) const fn attributes(
        target: NodeId,
        attribute_name: String,
        old_value: Option<String>,
    ) -> Self {
        Self {
            target,
            kind: MutationKind::Attributes {
                attribute_name,
                old_value,
            },
        }
    }
}

#[derive(Debug, Clone)]
struct Registration {
    target: NodeId,
    options: MutationObserverInit,
    queue: Vec<MutationRecord>,
}

impl Registration {
    /// [§ 4.3.2 Queueing a mutation record](https://dom.spec.whatwg.org/#queueing-a-mutation-record)
    ///
    /// Interest test for one registered observer. `inclusive_ancestors`
    /// starts with the record's target itself.
    fn is_interested(
        &self,
        record: &MutationRecord,
        mut inclusive_ancestors: impl Iterator<Item = NodeId>,
    ) -> bool {
        // "If none of the following are true..."
        // "node is not target and options["subtree"] is false"
        let Some(position) = inclusive_ancestors.position(|id| id == self.target) else {
            return false;
        };
        if position > 0 && !self.options.subtree {
            return false;
        }

        match &record.kind {
            // "type is "childList" and options["childList"] is false"
            MutationKind::ChildList { .. } => self.options.child_list,
            // "type is "attributes" and options["attributes"] is not true"
            // "type is "attributes", options["attributeFilter"] is present, and
            // options["attributeFilter"] does not contain name"
            MutationKind::Attributes { attribute_name, .. } => {
                self.options.attributes
                    && self
                        .options
                        .attribute_filter
                        .as_ref()
                        .is_none_or(|filter| filter.iter().any(|n| n == attribute_name))
            }
        }
    }
}

/// Every observer registered on a tree, indexed by [`ObserverId`].
#[derive(Debug, Clone, Default)]
pub(crate) struct ObserverRegistry {
    slots: Vec<Option<Registration>>,
}

impl DomTree {
    /// [§ 4.3.1 observe()](https://dom.spec.whatwg.org/#dom-mutationobserver-observe)
    ///
    /// Register an observer on `target`. Options that observe nothing are
    /// accepted; the observer will simply never receive records.
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> ObserverId {
        let id = ObserverId(self.observers.slots.len());
        self.observers.slots.push(Some(Registration {
            target,
            options,
            queue: Vec::new(),
        }));
        tracing::trace!(observer = id.0, target = target.0, "registered mutation observer");
        id
    }

    /// [§ 4.3.1 disconnect()](https://dom.spec.whatwg.org/#dom-mutationobserver-disconnect)
    ///
    /// "For each node of this's node list, remove any registered observer on
    /// node for which this is the observer. Empty this's record queue."
    pub fn disconnect(&mut self, observer: ObserverId) {
        if let Some(slot) = self.observers.slots.get_mut(observer.0) {
            *slot = None;
        }
    }

    /// [§ 4.3.1 takeRecords()](https://dom.spec.whatwg.org/#dom-mutationobserver-takerecords)
    ///
    /// "Let records be a clone of this's record queue. Empty this's record
    /// queue. Return records."
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .slots
            .get_mut(observer.0)
            .and_then(Option::as_mut)
            .map(|r| std::mem::take(&mut r.queue))
            .unwrap_or_default()
    }

    /// Whether any records are waiting for `observer`.
    #[must_use]
    pub fn has_pending_records(&self, observer: ObserverId) -> bool {
        self.observers
            .slots
            .get(observer.0)
            .and_then(Option::as_ref)
            .is_some_and(|r| !r.queue.is_empty())
    }

    /// Enqueue `record` for every interested observer.
    pub(crate) fn queue_mutation(&mut self, record: MutationRecord) {
        if self.observers.slots.iter().all(Option::is_none) {
            return;
        }

        let chain: Vec<NodeId> = std::iter::once(record.target)
            .chain(self.ancestors(record.target))
            .collect();

        for registration in self.observers.slots.iter_mut().flatten() {
            if !registration.is_interested(&record, chain.iter().copied()) {
                continue;
            }
            let mut record = record.clone();
            // "If options["attributeOldValue"] is true, set interestedObservers[observer]
            // to oldValue." Otherwise the old value is dropped.
            if let MutationKind::Attributes { old_value, .. } = &mut record.kind
                && !registration.options.attribute_old_value
            {
                *old_value = None;
            }
            registration.queue.push(record);
        }
    }
}
