use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub mod comparator;
pub mod prefs;

pub use comparator::{by_properties_of, Comparator};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDir { #[default] Asc, Desc }

impl SortDir {
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self { SortDir::Asc => ordering, SortDir::Desc => ordering.reverse() }
    }
}

/// A field name, optionally addressing one nested field (`outer.inner`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub outer: String,
    pub inner: Option<String>,
}

impl FieldPath {
    pub fn as_key(&self) -> String {
        match &self.inner {
            Some(inner) => format!("{}.{inner}", self.outer),
            None => self.outer.clone(),
        }
    }
}

impl FromStr for FieldPath {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let outer = parts.next().unwrap_or_default();
        let inner = parts.next();
        if parts.next().is_some() {
            return Err(AppError::InvalidArgument(format!(
                "sort field \"{s}\" nests more than one level"
            )));
        }
        if outer.is_empty() || inner.is_some_and(str::is_empty) {
            return Err(AppError::InvalidArgument(format!("sort field \"{s}\" is empty")));
        }
        Ok(FieldPath { outer: outer.to_string(), inner: inner.map(str::to_string) })
    }
}

/// One entry of a sort order: `name`, `+name` (ascending) or `-name` (descending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub path: FieldPath,
    pub dir: SortDir,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dir, field) = match s.strip_prefix('-') {
            Some(rest) => (SortDir::Desc, rest),
            None => (SortDir::Asc, s.strip_prefix('+').unwrap_or(s)),
        };
        Ok(SortKey { path: field.parse()?, dir })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.dir { SortDir::Asc => "", SortDir::Desc => "-" };
        write!(f, "{prefix}{}", self.path.as_key())
    }
}

/// A comparable field value extracted from a record.
///
/// Ordering: `Missing` first, then booleans, then numbers (integers and
/// floats compare with each other), then text compared case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Missing,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Missing => 0,
            SortValue::Bool(_) => 1,
            SortValue::Integer(_) | SortValue::Number(_) => 2,
            SortValue::Text(_) => 3,
        }
    }

    pub fn compare(&self, other: &SortValue) -> Ordering {
        use SortValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.total_cmp(b),
            (Integer(a), Number(b)) => (*a as f64).total_cmp(b),
            (Number(a), Integer(b)) => a.total_cmp(&(*b as f64)),
            (Text(a), Text(b)) => a.to_uppercase().cmp(&b.to_uppercase()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<&str> for SortValue {
    fn from(s: &str) -> Self { SortValue::Text(s.to_string()) }
}

impl From<String> for SortValue {
    fn from(s: String) -> Self { SortValue::Text(s) }
}

impl From<i64> for SortValue {
    fn from(n: i64) -> Self { SortValue::Integer(n) }
}

impl From<f64> for SortValue {
    fn from(n: f64) -> Self { SortValue::Number(n) }
}

impl From<bool> for SortValue {
    fn from(b: bool) -> Self { SortValue::Bool(b) }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SortValue::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_defaults_to_ascending() {
        let k: SortKey = "title".parse().unwrap();
        assert_eq!(k.dir, SortDir::Asc);
        assert_eq!(k.path.outer, "title");
        assert_eq!(k.path.inner, None);
    }

    #[test]
    fn sort_key_prefixes() {
        let asc: SortKey = "+semester".parse().unwrap();
        let desc: SortKey = "-semester".parse().unwrap();
        assert_eq!(asc.dir, SortDir::Asc);
        assert_eq!(desc.dir, SortDir::Desc);
        assert_eq!(desc.to_string(), "-semester");
    }

    #[test]
    fn sort_key_nested_path() {
        let k: SortKey = "-principal_investigator.family_name".parse().unwrap();
        assert_eq!(k.path.outer, "principal_investigator");
        assert_eq!(k.path.inner.as_deref(), Some("family_name"));
        assert_eq!(k.path.as_key(), "principal_investigator.family_name");
    }

    #[test]
    fn sort_key_rejects_bad_paths() {
        for bad in ["", "-", "a.b.c", "a.", ".b"] {
            assert!(bad.parse::<SortKey>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn text_compares_case_insensitively() {
        let a = SortValue::from("apple");
        let b = SortValue::from("Banana");
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(SortValue::from("ABC").compare(&SortValue::from("abc")), Ordering::Equal);
    }

    #[test]
    fn missing_sorts_before_present_values() {
        assert_eq!(SortValue::Missing.compare(&SortValue::from(0i64)), Ordering::Less);
        assert_eq!(SortValue::from("a").compare(&SortValue::Missing), Ordering::Greater);
        assert_eq!(SortValue::Missing.compare(&SortValue::Missing), Ordering::Equal);
    }

    #[test]
    fn integers_and_floats_compare_numerically() {
        assert_eq!(SortValue::from(2i64).compare(&SortValue::from(1.5)), Ordering::Greater);
        assert_eq!(SortValue::from(1.0).compare(&SortValue::from(1i64)), Ordering::Equal);
    }

    #[test]
    fn sort_dir_apply() {
        assert_eq!(SortDir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortDir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDir::Desc.apply(Ordering::Equal), Ordering::Equal);
    }
}
