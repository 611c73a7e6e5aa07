// src/models/table_filter/comparator.rs

use std::cmp::Ordering;

use super::{FieldPath, SortDir, SortKey, SortValue};
use crate::errors::{AppError, AppResult};

/// Extracts one sortable value from a record.
pub type Accessor<T> = fn(&T) -> SortValue;

/// Records that can be sorted by field name.
///
/// Implementors map each sortable field path to a typed accessor, in the same
/// way a table maps its sort keys to columns. Unknown paths return `None`.
pub trait SortFields: Sized {
    fn accessor(path: &FieldPath) -> Option<Accessor<Self>>;
}

type BoxedAccessor<T> = Box<dyn Fn(&T) -> SortValue + Send + Sync>;

/// Lexicographic comparator over an ordered list of keys.
pub struct Comparator<T> {
    keys: Vec<(BoxedAccessor<T>, SortDir)>,
}

impl<T> Default for Comparator<T> {
    fn default() -> Self {
        Comparator { keys: Vec::new() }
    }
}

impl<T> Comparator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key compared after all keys added so far.
    pub fn then_by<F>(mut self, accessor: F, dir: SortDir) -> Self
    where
        F: Fn(&T) -> SortValue + Send + Sync + 'static,
    {
        self.keys.push((Box::new(accessor), dir));
        self
    }

    /// Compare by the first key; on a tie fall through to the next one.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        for (accessor, dir) in &self.keys {
            let ordering = dir.apply(accessor(a).compare(&accessor(b)));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Stable sort: records equal under every key keep their relative order.
    pub fn sort(&self, records: &mut [T]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

impl<T: SortFields + 'static> Comparator<T> {
    pub fn from_keys(keys: &[SortKey]) -> AppResult<Self> {
        keys.iter().try_fold(Comparator::new(), |cmp, key| {
            let accessor = T::accessor(&key.path).ok_or_else(|| {
                AppError::InvalidArgument(format!("unknown sort field \"{}\"", key.path.as_key()))
            })?;
            Ok(cmp.then_by(accessor, key.dir))
        })
    }
}

/// Build a comparator from key strings such as `["-semester", "proposal_code"]`.
pub fn by_properties_of<T: SortFields + 'static>(sort_by: &[&str]) -> AppResult<Comparator<T>> {
    let keys = sort_by
        .iter()
        .map(|s| s.parse::<SortKey>())
        .collect::<Result<Vec<_>, _>>()?;
    Comparator::from_keys(&keys)
}
