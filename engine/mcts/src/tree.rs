//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. Parent links are plain indices, so the
//! whole tree is dropped in one go and no reference cycles exist.

use thiserror::Error;

use crate::node::{MctsNode, NodeId};

/// Errors raised by structural tree operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("Node {0} is already expanded")]
    AlreadyExpanded(u32),

    #[error("Prior vector has {got} entries but the action space has {expected}")]
    PriorSizeMismatch { expected: usize, got: usize },
}

/// MCTS tree with arena-based node storage.
#[derive(Debug, Clone)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0, the arena is compacted on re-rooting)
    root: NodeId,
}

impl Default for MctsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MctsTree {
    /// Create a new tree holding a single unexpanded root.
    pub fn new() -> Self {
        Self {
            nodes: vec![MctsNode::new_root()],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node and return its ID.
    fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest PUCT score.
    ///
    /// Ties go to the earliest child: a later child only replaces the
    /// current best when its score is strictly greater.
    pub fn select_child(&self, node_id: NodeId, c_puct: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute sqrt once instead of per-child comparison
        let parent_visits_sqrt = (node.visit_count as f32).sqrt();

        let mut best: Option<(NodeId, f32)> = None;
        for &child_id in &node.children {
            let score = self.get(child_id).ucb_score(parent_visits_sqrt, c_puct);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Expand a node: record the prior vector and create one child per
    /// legal action, seeded with that action's prior and zero statistics.
    ///
    /// A node can only be expanded once. Returns the number of children.
    pub fn expand(
        &mut self,
        node_id: NodeId,
        priors: Vec<f32>,
        legal: &[bool],
    ) -> Result<usize, TreeError> {
        if self.get(node_id).is_expanded() {
            return Err(TreeError::AlreadyExpanded(node_id.0));
        }
        if priors.len() != legal.len() {
            return Err(TreeError::PriorSizeMismatch {
                expected: legal.len(),
                got: priors.len(),
            });
        }

        let children: Vec<NodeId> = legal
            .iter()
            .enumerate()
            .filter(|(_, &is_legal)| is_legal)
            .map(|(action, _)| {
                self.allocate(MctsNode::new_child(node_id, Some(action), priors[action]))
            })
            .collect();

        let count = children.len();
        let node = self.get_mut(node_id);
        node.children = children;
        node.child_priors = priors;
        Ok(count)
    }

    /// Backpropagate a value from a leaf to the root.
    ///
    /// `value` is applied to the leaf as is and negated at each step up,
    /// since consecutive nodes belong to alternating players.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f32) {
        let mut current_id = leaf_id;
        let mut current_value = value;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.backup(current_value);

            // Negate for opponent's perspective
            current_value = -current_value;

            current_id = node.parent;
        }
    }

    /// Find the child of `node_id` reached by `action`.
    pub fn child_for_action(&self, node_id: NodeId, action: usize) -> Option<NodeId> {
        self.get(node_id)
            .children
            .iter()
            .copied()
            .find(|&child| self.get(child).action == Some(action))
    }

    /// Visit counts of the root's children, indexed by action.
    pub fn root_visit_counts(&self, num_actions: usize) -> Vec<u32> {
        let mut counts = vec![0; num_actions];
        for &child_id in &self.get(self.root).children {
            let child = self.get(child_id);
            if let Some(action) = child.action {
                if action < num_actions {
                    counts[action] = child.visit_count;
                }
            }
        }
        counts
    }

    /// Normalised visit-count distribution over the action space at the root.
    /// All zeros when the root's children have not been visited.
    pub fn root_policy(&self, num_actions: usize) -> Vec<f32> {
        let counts = self.root_visit_counts(num_actions);
        let total: u32 = counts.iter().sum();
        if total == 0 {
            return vec![0.0; num_actions];
        }
        counts
            .iter()
            .map(|&n| n as f32 / total as f32)
            .collect()
    }

    /// Root child maximising `visit_count^(1/temperature)`.
    ///
    /// Scores are compared as `ln(N) / T`, which orders children the same way
    /// without overflowing for small temperatures. Ties go to the earliest
    /// child; with no visits at all the first child is returned.
    pub fn best_child(&self, temperature: f32) -> Option<NodeId> {
        let root = self.get(self.root);
        let inv_t = if temperature > 0.0 {
            1.0 / temperature
        } else {
            1.0
        };

        let mut best: Option<(NodeId, f32)> = None;
        for &child_id in &root.children {
            let visits = self.get(child_id).visit_count;
            let score = (visits as f32).ln() * inv_t;
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ if visits == 0 => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.map(|(id, _)| id).or_else(|| root.children.first().copied())
    }

    /// Normalised `visit_count^(1/temperature)` weights of the root's
    /// children, in child order. Computed relative to the most visited child
    /// so small temperatures stay finite. Empty when nothing was visited.
    pub fn tempered_distribution(&self, temperature: f32) -> Vec<(NodeId, f32)> {
        let root = self.get(self.root);
        let max_visits = root
            .children
            .iter()
            .map(|&id| self.get(id).visit_count)
            .max()
            .unwrap_or(0);
        if max_visits == 0 {
            return Vec::new();
        }

        let inv_t = if temperature > 0.0 {
            1.0 / temperature
        } else {
            f32::INFINITY
        };
        let ln_max = (max_visits as f32).ln();
        let weights: Vec<(NodeId, f32)> = root
            .children
            .iter()
            .map(|&id| {
                let visits = self.get(id).visit_count;
                let weight = if visits == 0 {
                    0.0
                } else if visits == max_visits {
                    1.0
                } else {
                    (((visits as f32).ln() - ln_max) * inv_t).exp()
                };
                (id, weight)
            })
            .collect();

        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        weights.into_iter().map(|(id, w)| (id, w / total)).collect()
    }

    /// Make the child reached by `action` the new root.
    ///
    /// The subtree under that child is compacted into a fresh arena, its
    /// parent link is cleared and every other node is dropped. When the root
    /// has no such child the tree restarts from a single empty root.
    /// Returns whether any statistics were carried over.
    pub fn advance(&mut self, action: usize) -> bool {
        let Some(new_root) = self.child_for_action(self.root, action) else {
            *self = MctsTree::new();
            return false;
        };

        let mut old_nodes = std::mem::take(&mut self.nodes);
        let mut remap = vec![NodeId::NONE; old_nodes.len()];
        let mut order = vec![new_root];
        remap[new_root.index()] = NodeId(0);

        // Breadth-first so every parent precedes its children
        let mut cursor = 0;
        while cursor < order.len() {
            let old = order[cursor];
            for &child in &old_nodes[old.index()].children {
                remap[child.index()] = NodeId(order.len() as u32);
                order.push(child);
            }
            cursor += 1;
        }

        let mut nodes = Vec::with_capacity(order.len());
        for old in order {
            let mut node = std::mem::replace(&mut old_nodes[old.index()], MctsNode::new_root());
            node.parent = if old == new_root {
                NodeId::NONE
            } else {
                remap[node.parent.index()]
            };
            for child in node.children.iter_mut() {
                *child = remap[child.index()];
            }
            nodes.push(node);
        }

        self.nodes = nodes;
        self.root = NodeId(0);
        true
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value,
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0u32)];
        while let Some((node_id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &child in &self.get(node_id).children {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}
