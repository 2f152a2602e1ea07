//! Allocation tree
//!
//! Arena-backed tree of cash-flow nodes rooted at the planned income. Nodes
//! are addressed by [`NodeId`]; each slot records its parent, so parent
//! lookup is constant time and a node can never have two parents. Removed
//! slots are left empty and their ids are never handed out again, so the
//! arena grows with every node added during a session and a stale
//! [`NodeId`] resolves to `None` instead of to an unrelated node.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{CashflowError, CashflowResult};
use crate::models::node::{normalize_label, validate_apr, validate_balance, validate_positive};
use crate::models::{Edge, Money, Node, NodeGroup, NodeId, SavingsProperties, ROOT_LABEL};

/// Changes requested by an edit; `None` leaves a field as it is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeEdit {
    pub new_label: Option<String>,
    pub new_amount: Option<Money>,
    pub new_group: Option<NodeGroup>,
    pub apr: Option<f64>,
    pub current_balance: Option<Money>,
}

impl NodeEdit {
    /// True when the edit would not change anything
    pub fn is_empty(&self) -> bool {
        self.new_label.is_none()
            && self.new_amount.is_none()
            && self.new_group.is_none()
            && self.apr.is_none()
            && self.current_balance.is_none()
    }
}

/// The budget allocation tree
#[derive(Debug, Clone)]
pub struct AllocationTree {
    slots: Vec<Option<Node>>,
    index: HashMap<String, NodeId>,
    root: NodeId,
}

impl Default for AllocationTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationTree {
    /// Create a tree holding only the `Income` root
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut index = HashMap::new();
        index.insert(ROOT_LABEL.to_string(), root);

        Self {
            slots: vec![Some(Node::new(ROOT_LABEL, NodeGroup::Income, None))],
            index,
            root,
        }
    }

    /// Id of the root income node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node stored in a slot, if the slot is live
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Look up a node id by label
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    /// Look up a node by label
    pub fn get(&self, label: &str) -> Option<&Node> {
        self.find(label).and_then(|id| self.node(id))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always false: the root cannot be removed
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All labels in alphabetical order
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.index.keys().cloned().collect();
        labels.sort();
        labels
    }

    /// Parent of a node; `None` for the root or an unknown id
    pub fn find_parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Amount on the edge into a node; `None` for the root
    pub fn inflow(&self, id: NodeId) -> Option<Money> {
        let parent = self.find_parent(id)?;
        self.node(parent)?.edge_to(id).map(|e| e.amount)
    }

    /// Sum of the amounts leaving a node
    pub fn outflow(&self, id: NodeId) -> Money {
        self.node(id).map(Node::outflow).unwrap_or_default()
    }

    /// Total amount leaving the root
    pub fn total_allocated(&self) -> Money {
        self.outflow(self.root)
    }

    /// Edges of a node in visiting order: ascending child priority, ties in
    /// insertion order
    pub fn ordered_edges(&self, id: NodeId) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.node(id).map(|n| n.edges.clone()).unwrap_or_default();
        edges.sort_by_key(|e| self.node(e.child).map_or(i32::MAX, |c| c.group.priority()));
        edges
    }

    /// Pre-order walk from the root, siblings in priority order
    ///
    /// Every consumer that derives positional indices (flow diagram links,
    /// projection series order) relies on this order.
    pub fn collect_nodes(&self) -> Vec<NodeId> {
        self.collect_from(self.root)
    }

    /// Pre-order walk of the subtree under `start`, siblings in priority order
    pub fn collect_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.len());
        if self.node(start).is_none() {
            return order;
        }

        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.ordered_edges(id).iter().rev().map(|e| e.child));
        }

        order
    }

    /// Add a node under `parent_label`
    ///
    /// Savings nodes record `apr` and `current_balance`; for other groups
    /// both are ignored.
    pub fn add_node(
        &mut self,
        parent_label: &str,
        label: &str,
        amount: Money,
        group: NodeGroup,
        apr: f64,
        current_balance: Money,
    ) -> CashflowResult<NodeId> {
        let label = normalize_label(label)?;
        if self.contains(&label) {
            return Err(CashflowError::duplicate_node(&label));
        }
        validate_positive(amount, "Amount")?;
        let parent = self
            .find(parent_label.trim())
            .ok_or_else(|| CashflowError::parent_not_found(parent_label.trim()))?;

        let savings = if group.is_savings() {
            let props = SavingsProperties::new(apr, current_balance);
            props.validate()?;
            Some(props)
        } else {
            None
        };

        let id = NodeId(self.slots.len());
        let mut node = Node::new(label.clone(), group, Some(parent));
        node.savings = savings;
        self.slots.push(Some(node));
        self.index.insert(label.clone(), id);

        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.edges.push(Edge { child: id, amount });
        }

        debug!(node = %label, parent = parent_label, %amount, %group, "added node");
        Ok(id)
    }

    /// Edit an existing non-root node
    ///
    /// All checks run before anything is written, so a failed edit leaves
    /// the tree untouched. Moving a node out of the savings group drops its
    /// properties; `apr` and `current_balance` are only applied when the
    /// resulting group is savings.
    pub fn edit_node(&mut self, label: &str, edit: &NodeEdit) -> CashflowResult<NodeId> {
        let label = label.trim();
        let id = self.find(label).ok_or_else(|| CashflowError::node_not_found(label))?;
        if id == self.root {
            return Err(CashflowError::ProtectedRootOperation(ROOT_LABEL.to_string()));
        }
        let parent = self
            .find_parent(id)
            .ok_or_else(|| CashflowError::parent_not_found(label))?;

        if let Some(amount) = edit.new_amount {
            validate_positive(amount, "Amount")?;
        }

        let rename = match edit.new_label.as_deref() {
            Some(new_label) => {
                let new_label = normalize_label(new_label)?;
                if new_label == label {
                    None
                } else if self.contains(&new_label) {
                    return Err(CashflowError::duplicate_node(&new_label));
                } else {
                    Some(new_label)
                }
            }
            None => None,
        };

        let current_group = self.node(id).map(|n| n.group).unwrap_or_default();
        let resulting_group = edit.new_group.unwrap_or(current_group);
        if resulting_group.is_savings() {
            if let Some(apr) = edit.apr {
                validate_apr(apr)?;
            }
            if let Some(balance) = edit.current_balance {
                validate_balance(balance)?;
            }
        }

        if let Some(amount) = edit.new_amount {
            if let Some(edge) = self.node_mut(parent).and_then(|p| p.edge_to_mut(id)) {
                edge.amount = amount;
            }
        }

        if let Some(new_label) = rename.clone() {
            self.index.remove(label);
            self.index.insert(new_label.clone(), id);
            if let Some(node) = self.node_mut(id) {
                node.label = new_label;
            }
        }

        if let Some(node) = self.node_mut(id) {
            if let Some(group) = edit.new_group {
                node.group = group;
                if !group.is_savings() {
                    node.savings = None;
                }
            }

            if node.group.is_savings() {
                if let Some(apr) = edit.apr {
                    node.savings.get_or_insert_with(SavingsProperties::default).apr = apr;
                }
                if let Some(balance) = edit.current_balance {
                    node.savings
                        .get_or_insert_with(SavingsProperties::default)
                        .current_balance = balance;
                }
            }
        }

        debug!(node = label, renamed_to = ?rename, ?edit, "edited node");
        Ok(id)
    }

    /// Remove a node and its whole subtree, returning the removed labels in
    /// pre-order
    pub fn remove_node(&mut self, label: &str) -> CashflowResult<Vec<String>> {
        let label = label.trim();
        let id = self.find(label).ok_or_else(|| CashflowError::node_not_found(label))?;
        if id == self.root {
            return Err(CashflowError::ProtectedRootOperation(ROOT_LABEL.to_string()));
        }

        if let Some(parent) = self.find_parent(id) {
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.edges.retain(|e| e.child != id);
            }
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.slots.get_mut(current.0).and_then(Option::take) {
                self.index.remove(&node.label);
                stack.extend(node.edges.iter().rev().map(|e| e.child));
                removed.push(node.label);
            }
        }

        debug!(node = label, removed = removed.len(), "removed subtree");
        Ok(removed)
    }
}
