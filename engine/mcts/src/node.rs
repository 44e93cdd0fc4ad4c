//! MCTS tree node representation.
//!
//! Each node represents the position reached by taking `action` from the
//! parent. Nodes hold no game state: the search replays actions on a clone of
//! the root position while walking down the tree.
//!
//! Value perspective: `total_value` and `mean_value` are from the point of
//! view of the player who made the move *into* this node. A parent therefore
//! compares its children's Q values directly, without negation.

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root). Non-owning, used for backup only.
    pub parent: NodeId,

    /// Action that led to this node from parent (None for root)
    pub action: Option<usize>,

    /// Number of simulations that passed through this node (N)
    pub visit_count: u32,

    /// Sum of values backed up through this node (W)
    pub total_value: f32,

    /// Running mean of backed-up values (Q)
    pub mean_value: f32,

    /// Prior probability of the move into this node (P)
    pub prior: f32,

    /// Children in legal-action order. Empty until expanded.
    pub children: Vec<NodeId>,

    /// Full masked and normalised prior vector recorded at expansion.
    /// Empty until expanded.
    pub child_priors: Vec<f32>,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root() -> Self {
        Self::new_child(NodeId::NONE, None, 1.0)
    }

    /// Create a new child node with zero statistics.
    pub fn new_child(parent: NodeId, action: Option<usize>, prior: f32) -> Self {
        Self {
            parent,
            action,
            visit_count: 0,
            total_value: 0.0,
            mean_value: 0.0,
            prior,
            children: Vec::new(),
            child_priors: Vec::new(),
        }
    }

    /// Calculate the PUCT score for child selection.
    /// PUCT(s,a) = Q(s,a) + c_puct * P(s,a) * sqrt(N_parent) / (1 + N(s,a))
    ///
    /// Higher scores are better (more promising to explore).
    ///
    /// Note: Takes pre-computed sqrt(parent_visits) to avoid redundant sqrt calls
    /// when comparing multiple children.
    #[inline]
    pub fn ucb_score(&self, parent_visits_sqrt: f32, c_puct: f32) -> f32 {
        let u = c_puct * self.prior * parent_visits_sqrt / (1.0 + self.visit_count as f32);
        self.mean_value + u
    }

    /// Record one backed-up value: N += 1, W += value, Q = W / N.
    #[inline]
    pub fn backup(&mut self, value: f32) {
        self.visit_count += 1;
        self.total_value += value;
        self.mean_value += (value - self.mean_value) / self.visit_count as f32;
    }

    /// Check if this node has been expanded.
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.child_priors.is_empty()
    }

    /// A node is a leaf iff it has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = MctsNode::new_root();

        assert!(node.parent.is_none());
        assert_eq!(node.action, None);
        assert_eq!(node.visit_count, 0);
        assert!((node.prior - 1.0).abs() < 1e-6);
        assert!(node.is_leaf());
        assert!(!node.is_expanded());
    }

    #[test]
    fn test_backup_running_mean() {
        let mut node = MctsNode::new_root();

        // Unvisited
        assert!(node.mean_value.abs() < 1e-6);

        for v in [1.0, -1.0, 1.0, 1.0] {
            node.backup(v);
        }
        assert_eq!(node.visit_count, 4);
        assert!((node.total_value - 2.0).abs() < 1e-6);
        assert!((node.mean_value - 0.5).abs() < 1e-6);
        assert!((node.mean_value - node.total_value / node.visit_count as f32).abs() < 1e-6);
    }

    #[test]
    fn test_ucb_score() {
        let mut node = MctsNode::new_child(NodeId(0), Some(3), 0.5);
        for _ in 0..10 {
            node.backup(0.5);
        }

        let c_puct = 1.0;
        let parent_visits = 100;

        // UCB = Q + c_puct * P * sqrt(N_parent) / (1 + N)
        // UCB = 0.5 + 1.0 * 0.5 * 10 / 11 = 0.5 + 0.4545...
        let ucb = node.ucb_score((parent_visits as f32).sqrt(), c_puct);
        assert!((ucb - 0.9545).abs() < 0.001);
    }

    #[test]
    fn test_ucb_monotonic_in_prior_and_visits() {
        let mut low = MctsNode::new_child(NodeId(0), Some(0), 0.2);
        let mut high = MctsNode::new_child(NodeId(0), Some(1), 0.6);
        low.visit_count = 3;
        high.visit_count = 3;
        assert!(high.ucb_score(4.0, 1.5) >= low.ucb_score(4.0, 1.5));

        // More visits with the same Q and prior never raise the score
        let mut busier = high.clone();
        busier.visit_count = 9;
        assert!(busier.ucb_score(4.0, 1.5) <= high.ucb_score(4.0, 1.5));
    }

    #[test]
    fn test_is_leaf() {
        let mut node = MctsNode::new_root();

        // Initially a leaf (no children)
        assert!(node.is_leaf());

        node.children.push(NodeId(1));
        node.child_priors = vec![1.0];
        assert!(!node.is_leaf());
        assert!(node.is_expanded());
    }
}
