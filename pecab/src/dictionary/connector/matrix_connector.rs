use std::io::{BufRead, BufReader, Read};

use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::connector::{ConnectorCost, ConnectorView};
use crate::errors::{PecabError, Result};

/// Matrix of connection costs.
#[derive(Archive, Serialize, Deserialize, Debug, Clone)]
pub struct MatrixConnector {
    data: Vec<i16>,
    num_right: usize,
    num_left: usize,
}

impl MatrixConnector {
    pub fn new(data: Vec<i16>, num_right: usize, num_left: usize) -> Self {
        assert_eq!(data.len(), num_right * num_left);
        Self {
            data,
            num_right,
            num_left,
        }
    }

    /// Creates a new instance from `matrix.def`.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let reader = BufReader::new(rdr);
        let mut lines = reader.lines();

        let (num_right, num_left) = match lines.next() {
            Some(line) => Self::parse_header(&line?)?,
            None => {
                return Err(PecabError::invalid_format(
                    "matrix.def",
                    "The file must not be empty.",
                ));
            }
        };

        let mut data = vec![0; num_right * num_left];
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (right_id, left_id, conn_cost) = Self::parse_body(&line)?;
            if num_right <= usize::from(right_id) || num_left <= usize::from(left_id) {
                return Err(PecabError::invalid_format(
                    "matrix.def",
                    format!("The connection ids are out of range: {line}"),
                ));
            }
            let index = usize::from(right_id) * num_left + usize::from(left_id);
            data[index] = conn_cost;
        }
        log::debug!("loaded a {num_right}x{num_left} connection matrix");
        Ok(Self::new(data, num_right, num_left))
    }

    fn parse_header(line: &str) -> Result<(usize, usize)> {
        let cols: Vec<_> = line.split_whitespace().collect();
        if cols.len() != 2 {
            let msg = format!("The header must consist of two integers, {line}");
            return Err(PecabError::invalid_format("matrix.def", msg));
        }
        let num_right: u16 = cols[0].parse()?;
        let num_left: u16 = cols[1].parse()?;
        Ok((usize::from(num_right), usize::from(num_left)))
    }

    fn parse_body(line: &str) -> Result<(u16, u16, i16)> {
        let cols: Vec<_> = line.split_whitespace().collect();
        if cols.len() != 3 {
            let msg = format!("A row other than the header must consist of three integers, {line}");
            return Err(PecabError::invalid_format("matrix.def", msg));
        }
        let right_id: u16 = cols[0].parse()?;
        let left_id: u16 = cols[1].parse()?;
        let conn_cost: i16 = cols[2].parse()?;
        Ok((right_id, left_id, conn_cost))
    }
}

impl ConnectorView for MatrixConnector {
    #[inline(always)]
    fn num_left(&self) -> usize {
        self.num_left
    }

    #[inline(always)]
    fn num_right(&self) -> usize {
        self.num_right
    }
}

impl ConnectorCost for MatrixConnector {
    /// # Panics
    ///
    /// It will panic when an id is out of range. Ids are verified when a dictionary
    /// or a user dictionary is attached, so this only happens on a logic error.
    #[inline(always)]
    fn cost(&self, right_id: u16, left_id: u16) -> i32 {
        let index = usize::from(right_id) * self.num_left + usize::from(left_id);
        i32::from(self.data[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(MatrixConnector::parse_header("3822 2693").unwrap(), (3822, 2693));
    }

    #[test]
    fn test_parse_header_few_cols() {
        assert!(MatrixConnector::parse_header("3822").is_err());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(MatrixConnector::parse_body("2 3 -500").unwrap(), (2, 3, -500));
    }

    #[test]
    fn test_parse_body_many_cols() {
        assert!(MatrixConnector::parse_body("2 3 -500 1").is_err());
    }

    #[test]
    fn test_from_reader() {
        let data = "2 3\n0 0 0\n0 1 1\n0 2 2\n1 0 -3\n1 1 -4\n1 2 -5";
        let conn = MatrixConnector::from_reader(data.as_bytes()).unwrap();
        assert_eq!(conn.num_right(), 2);
        assert_eq!(conn.num_left(), 3);
        assert_eq!(conn.cost(0, 1), 1);
        assert_eq!(conn.cost(0, 2), 2);
        assert_eq!(conn.cost(1, 0), -3);
        assert_eq!(conn.cost(1, 2), -5);
    }

    #[test]
    fn test_unlisted_pairs_cost_zero() {
        let conn = MatrixConnector::from_reader("2 2\n1 1 7".as_bytes()).unwrap();
        assert_eq!(conn.cost(0, 1), 0);
        assert_eq!(conn.cost(1, 1), 7);
    }

    #[test]
    fn test_out_of_range_ids() {
        assert!(MatrixConnector::from_reader("2 2\n2 0 7".as_bytes()).is_err());
    }

    #[test]
    fn test_empty_file() {
        assert!(MatrixConnector::from_reader("".as_bytes()).is_err());
    }
}
