use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::connector::ConnectorView;

/// Connection ids and cost of a word.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Archive, Serialize, Deserialize)]
pub struct WordParam {
    /// Left connection id.
    pub left_id: u16,
    /// Right connection id.
    pub right_id: u16,
    /// Word cost.
    pub word_cost: i16,
}

impl WordParam {
    /// Creates a new instance.
    #[inline(always)]
    pub const fn new(left_id: u16, right_id: u16, word_cost: i16) -> Self {
        Self {
            left_id,
            right_id,
            word_cost,
        }
    }

    /// Checks if both connection ids are in range of `conn`.
    #[inline(always)]
    pub fn is_valid<C>(&self, conn: &C) -> bool
    where
        C: ConnectorView,
    {
        usize::from(self.left_id) < conn.num_left() && usize::from(self.right_id) < conn.num_right()
    }
}
