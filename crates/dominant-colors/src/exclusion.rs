//! The set of clusters a user has chosen to hide.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::cluster::{ClusterId, ExtractionResult};
use crate::error::ExclusionError;

/// Cluster ids excluded from the percentage breakdown.
///
/// Each update replaces the whole set. Ids that do not exist in the
/// current [`ExtractionResult`] are kept here but have no effect on the
/// computation; [`ExclusionSet::effective`] drops them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExclusionSet {
    ids: BTreeSet<ClusterId>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = ClusterId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Parse user input such as `"1, 3,7"`.
    ///
    /// Tokens are separated by commas and/or whitespace; empty tokens are
    /// skipped. Any token that is not a positive integer rejects the whole
    /// input.
    ///
    /// ```
    /// use dominant_colors::ExclusionSet;
    ///
    /// let set = ExclusionSet::parse("3, 1,,7").unwrap();
    /// assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3, 7]);
    /// assert!(ExclusionSet::parse("1,x").is_err());
    /// assert!(ExclusionSet::parse("  ").unwrap().is_empty());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ExclusionError> {
        let mut ids = BTreeSet::new();
        for token in input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            match token.parse::<ClusterId>() {
                Ok(id) if id > 0 => {
                    ids.insert(id);
                }
                _ => return Err(ExclusionError::InvalidToken(token.to_string())),
            }
        }
        Ok(Self { ids })
    }

    pub fn contains(&self, id: ClusterId) -> bool {
        self.ids.contains(&id)
    }

    pub fn insert(&mut self, id: ClusterId) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.ids.iter().copied()
    }

    /// The subset of ids that name a cluster in `result`.
    pub fn effective(&self, result: &ExtractionResult) -> ExclusionSet {
        Self::from_ids(self.iter().filter(|&id| result.contains(id)))
    }
}

impl FromStr for ExclusionSet {
    type Err = ExclusionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromIterator<ClusterId> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = ClusterId>>(iter: T) -> Self {
        Self::from_ids(iter)
    }
}

/// Comma-separated ids, the same form [`ExclusionSet::parse`] accepts.
impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        Ok(())
    }
}
