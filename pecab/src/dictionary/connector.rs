mod matrix_connector;

pub use crate::dictionary::connector::matrix_connector::MatrixConnector;

pub trait ConnectorView {
    /// Returns maximum number of left connection ID
    fn num_left(&self) -> usize;

    /// Returns maximum number of right connection ID
    fn num_right(&self) -> usize;
}

pub trait ConnectorCost: ConnectorView {
    /// Gets the value of the connection matrix
    fn cost(&self, right_id: u16, left_id: u16) -> i32;
}
