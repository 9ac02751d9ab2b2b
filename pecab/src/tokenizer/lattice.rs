use crate::common::BOS_EOS_CONNECTION_ID;
use crate::dictionary::WordParam;
use crate::dictionary::connector::ConnectorCost;
use crate::token::Token;

const MAX_COST: i32 = i32::MAX;
const INITIAL_WINDOW_SIZE: usize = 4;

/// Provenance of the word a node ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordRef {
    /// Record id in the system lexicon.
    Known(u32),
    /// Entry id in the user dictionary.
    User(u32),
    /// Unknown word generated from a character category.
    Unknown(u16),
    /// The start of the sentence.
    Bos,
}

/// A node in the lattice.
///
/// The node is stored at the position where its word ends.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub word: WordRef,
    /// Position of the node this one connects from.
    pub start_node: usize,
    /// Position where the word starts, after any skipped spaces.
    pub start_word: usize,
    pub right_id: u16,
    /// Index of the best node at `start_node`.
    pub min_idx: usize,
    pub min_cost: i32,
}

/// Nodes ending at a character position.
#[derive(Debug, Default, Clone)]
pub struct Position {
    pos: usize,
    nodes: Vec<Node>,
}

impl Position {
    #[inline(always)]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.nodes.clear();
    }
}

/// Ring buffer of positions from the last backtrace up to the furthest
/// position a node reaches.
///
/// It grows on demand, and positions before a backtrace are recycled.
#[derive(Debug, Clone)]
pub struct PositionWindow {
    positions: Vec<Position>,
    next_write: usize,
    next_pos: usize,
    count: usize,
}

impl Default for PositionWindow {
    fn default() -> Self {
        Self {
            positions: vec![Position::default(); INITIAL_WINDOW_SIZE],
            next_write: 0,
            next_pos: 0,
            count: 0,
        }
    }
}

impl PositionWindow {
    pub fn reset(&mut self) {
        for p in &mut self.positions {
            p.reset();
        }
        self.next_write = 0;
        self.next_pos = 0;
        self.count = 0;
    }

    /// Gets the position `pos`, allocating every position up to it.
    pub fn get_mut(&mut self, pos: usize) -> &mut Position {
        while pos >= self.next_pos {
            if self.count == self.positions.len() {
                self.grow();
            }
            if self.next_write == self.positions.len() {
                self.next_write = 0;
            }
            let position = &mut self.positions[self.next_write];
            debug_assert!(position.nodes.is_empty());
            position.pos = self.next_pos;
            self.next_write += 1;
            self.next_pos += 1;
            self.count += 1;
        }
        let index = self.index(pos);
        &mut self.positions[index]
    }

    /// Gets the position `pos`.
    ///
    /// # Panics
    ///
    /// It will panic when `pos` has been freed or not allocated yet.
    pub fn get(&self, pos: usize) -> &Position {
        &self.positions[self.index(pos)]
    }

    /// Gets the position next to the furthest allocated one.
    #[inline(always)]
    pub fn next_pos(&self) -> usize {
        self.next_pos
    }

    /// Gets the number of slots in the ring.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    /// Recycles every position before `pos`.
    pub fn free_before(&mut self, pos: usize) {
        assert!(pos <= self.next_pos);
        let to_free = self.count.saturating_sub(self.next_pos - pos);
        let len = self.positions.len();
        let start = (self.next_write + len - self.count) % len;
        for i in 0..to_free {
            self.positions[(start + i) % len].reset();
        }
        self.count -= to_free;
    }

    #[inline(always)]
    fn in_bounds(&self, pos: usize) -> bool {
        pos < self.next_pos && pos + self.count >= self.next_pos
    }

    #[inline(always)]
    fn index(&self, pos: usize) -> usize {
        assert!(self.in_bounds(pos), "position {pos} is out of the window");
        let len = self.positions.len();
        (self.next_write + len - (self.next_pos - pos)) % len
    }

    fn grow(&mut self) {
        let len = self.positions.len();
        // Moves the oldest position to the front.
        self.positions.rotate_left(self.next_write % len);
        self.next_write = len;
        self.positions.resize_with(len * 2, Position::default);
    }
}

/// Incremental lattice over a sentence.
#[derive(Default)]
pub struct Lattice {
    positions: PositionWindow,
    pending: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) end: bool,
    pub(crate) last_backtrace_pos: usize,
}

impl Lattice {
    pub fn reset(&mut self) {
        self.positions.reset();
        self.pending.clear();
        self.pos = 0;
        self.end = false;
        self.last_backtrace_pos = 0;
        self.insert_bos();
    }

    fn insert_bos(&mut self) {
        self.positions.get_mut(0).nodes.push(Node {
            word: WordRef::Bos,
            start_node: 0,
            start_word: 0,
            right_id: BOS_EOS_CONNECTION_ID,
            min_idx: 0,
            min_cost: 0,
        });
    }

    /// Gets the number of nodes ending at `pos`, allocating the position.
    #[inline(always)]
    pub fn num_nodes(&mut self, pos: usize) -> usize {
        self.positions.get_mut(pos).nodes.len()
    }

    #[inline(always)]
    pub fn node(&self, pos: usize, idx: usize) -> Node {
        self.positions.get(pos).nodes[idx]
    }

    #[inline(always)]
    pub fn node_mut(&mut self, pos: usize, idx: usize) -> &mut Node {
        &mut self.positions.get_mut(pos).nodes[idx]
    }

    #[inline(always)]
    pub fn next_pos(&self) -> usize {
        self.positions.next_pos()
    }

    #[inline(always)]
    pub fn free_before(&mut self, pos: usize) {
        self.positions.free_before(pos);
    }

    #[inline(always)]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    #[inline(always)]
    pub fn push_pending(&mut self, token: Token) {
        self.pending.push(token);
    }

    #[inline(always)]
    pub fn pop_pending(&mut self) -> Option<Token> {
        self.pending.pop()
    }

    /// Inserts a node for the word spanning `start_word..end_word`
    /// that connects from a node ending at `start_node`.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_node<C>(
        &mut self,
        start_node: usize,
        start_word: usize,
        end_word: usize,
        word: WordRef,
        word_param: WordParam,
        space_penalty: i32,
        connector: &C,
    ) where
        C: ConnectorCost,
    {
        debug_assert!(start_node <= start_word);
        debug_assert!(start_word < end_word);
        let (min_idx, min_cost) = self.search_min_node(start_node, word_param.left_id, connector);
        self.positions.get_mut(end_word).nodes.push(Node {
            word,
            start_node,
            start_word,
            right_id: word_param.right_id,
            min_idx,
            min_cost: min_cost
                .saturating_add(space_penalty)
                .saturating_add(i32::from(word_param.word_cost)),
        });
    }

    fn search_min_node<C>(&self, start_node: usize, left_id: u16, connector: &C) -> (usize, i32)
    where
        C: ConnectorCost,
    {
        let nodes = self.positions.get(start_node).nodes();
        assert!(!nodes.is_empty(), "no node ends at position {start_node}");

        let mut min_idx = 0;
        let mut min_cost = MAX_COST;
        for (i, left_node) in nodes.iter().enumerate() {
            let new_cost = left_node
                .min_cost
                .saturating_add(connector.cost(left_node.right_id, left_id));
            // Ties keep the earliest node.
            if new_cost < min_cost {
                min_idx = i;
                min_cost = new_cost;
            }
        }
        (min_idx, min_cost)
    }

    /// Finds the best node at `pos` to connect to EOS.
    pub fn search_eos<C>(&self, pos: usize, connector: &C) -> Option<usize>
    where
        C: ConnectorCost,
    {
        let mut best = None;
        let mut min_cost = MAX_COST;
        for (i, node) in self.positions.get(pos).nodes().iter().enumerate() {
            let cost = node
                .min_cost
                .saturating_add(connector.cost(node.right_id, BOS_EOS_CONNECTION_ID));
            if best.is_none() || cost < min_cost {
                best = Some(i);
                min_cost = cost;
            }
        }
        best
    }
}
