use std::sync::Arc;

use super::record::TransactionRecord;

/// An immutable set of loaded rows plus the selection of row ids visible
/// through this view.
///
/// Filtering never copies records: a filtered table shares the loaded rows
/// and carries a narrower, still ascending, selection. Row identity is the
/// position in the loaded file.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Arc<Vec<TransactionRecord>>,
    selection: Vec<usize>,
}

impl Table {
    pub fn new(rows: Vec<TransactionRecord>) -> Self {
        let selection = (0..rows.len()).collect();
        Self {
            rows: Arc::new(rows),
            selection,
        }
    }

    /// Same rows, different selection. Callers keep `selection` ascending.
    pub(crate) fn select(&self, selection: Vec<usize>) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            selection,
        }
    }

    pub fn len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Row ids visible in this view, in table order.
    pub fn row_ids(&self) -> &[usize] {
        &self.selection
    }

    /// Visible records in table order.
    pub fn iter(&self) -> impl Iterator<Item = &TransactionRecord> + '_ {
        self.selection.iter().map(|&id| &self.rows[id])
    }

    /// Visible records paired with their row id.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (usize, &TransactionRecord)> + '_ {
        self.selection.iter().map(|&id| (id, &self.rows[id]))
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.selection == other.selection
            && (Arc::ptr_eq(&self.rows, &other.rows) || self.rows == other.rows)
    }
}

impl FromIterator<TransactionRecord> for Table {
    fn from_iter<I: IntoIterator<Item = TransactionRecord>>(iter: I) -> Self {
        Table::new(iter.into_iter().collect())
    }
}
