use std::ops::{BitAnd, BitOr};

use smallvec::SmallVec;

use crate::GoTermId;

type IdVec = SmallVec<[GoTermId; 16]>;

/// A sorted set of [`GoTermId`]s
///
/// Each id can occur only once. Groups are used for ancestor sets and for
/// the terms of a [`TermFamily`](`crate::TermFamily`). The ids are kept
/// sorted, so iteration order is stable and intersections are cheap.
#[derive(Debug, Default, Clone)]
pub struct GoGroup {
    ids: IdVec,
}

impl GoGroup {
    /// Constructs a new, empty [`GoGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`GoGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: IdVec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no ids
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of ids in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`GoTermId`] to the group
    ///
    /// Returns whether the id was newly inserted.
    pub fn insert(&mut self, id: GoTermId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Appends the id without keeping the sort order
    ///
    /// Only valid when the caller guarantees that `id` is larger than all
    /// present ids and not yet contained.
    fn insert_unchecked(&mut self, id: GoTermId) {
        self.ids.push(id);
    }

    /// Returns `true` if the group contains the [`GoTermId`]
    pub fn contains(&self, id: GoTermId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Returns an iterator of the ids inside the group
    pub fn iter(&self) -> GoTermIds<'_> {
        GoTermIds::new(self.ids.iter())
    }
}

impl FromIterator<GoTermId> for GoGroup {
    fn from_iter<I: IntoIterator<Item = GoTermId>>(iter: I) -> Self {
        let mut group = GoGroup::new();
        for id in iter {
            group.insert(id);
        }
        group
    }
}

impl<'a> IntoIterator for &'a GoGroup {
    type Item = GoTermId;
    type IntoIter = GoTermIds<'a>;

    fn into_iter(self) -> GoTermIds<'a> {
        self.iter()
    }
}

/// An iterator over [`GoTermId`]s
pub struct GoTermIds<'a> {
    inner: std::slice::Iter<'a, GoTermId>,
}

impl<'a> GoTermIds<'a> {
    fn new(inner: std::slice::Iter<'a, GoTermId>) -> Self {
        Self { inner }
    }
}

impl Iterator for GoTermIds<'_> {
    type Item = GoTermId;
    fn next(&mut self) -> Option<GoTermId> {
        self.inner.next().copied()
    }
}

impl BitOr for &GoGroup {
    type Output = GoGroup;

    fn bitor(self, rhs: &GoGroup) -> GoGroup {
        let mut group = GoGroup::with_capacity(self.len() + rhs.len());
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };

        for id in &large.ids {
            group.insert_unchecked(*id);
        }
        for id in &small.ids {
            group.insert(*id);
        }
        group
    }
}

impl BitAnd for &GoGroup {
    type Output = GoGroup;

    fn bitand(self, rhs: &GoGroup) -> GoGroup {
        let mut group = GoGroup::with_capacity(self.len().min(rhs.len()));
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };

        for id in &small.ids {
            if large.contains(*id) {
                group.insert_unchecked(*id);
            }
        }
        group
    }
}
