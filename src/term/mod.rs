//! GO terms, term ids, namespaces and groups of terms
use core::fmt::Debug;
use std::fmt::Display;

use crate::{GoError, GoResult, Ontology};

mod group;
pub(crate) mod internal;

pub use group::{GoGroup, GoTermIds};

/// The numeric part of a GO id, e.g. `3674` for `GO:0003674`
///
/// `GoTermId`s are used for set operations and lookups in the [`Ontology`].
/// They are cheap to copy and order by their numeric value.
#[derive(Copy, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GoTermId {
    inner: u32,
}

impl TryFrom<&str> for GoTermId {
    type Error = GoError;
    fn try_from(s: &str) -> GoResult<Self> {
        let digits = s
            .strip_prefix("GO:")
            .ok_or_else(|| GoError::InvalidGoId(s.to_string()))?;
        let inner = digits
            .parse::<u32>()
            .map_err(|_| GoError::InvalidGoId(s.to_string()))?;
        Ok(GoTermId { inner })
    }
}

impl From<u32> for GoTermId {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl Debug for GoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoTermId({self})")
    }
}

impl Display for GoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GO:{:07}", self.inner)
    }
}

/// One of the three GO sub-ontologies
///
/// Every term belongs to exactly one namespace and every namespace has its
/// own root term. Term ids are disjoint across namespaces, so a single
/// probability table can hold terms from all three.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Namespace {
    BiologicalProcess,
    MolecularFunction,
    CellularComponent,
}

impl Namespace {
    /// All namespaces, in a stable order
    pub const fn all() -> [Namespace; 3] {
        [
            Namespace::BiologicalProcess,
            Namespace::MolecularFunction,
            Namespace::CellularComponent,
        ]
    }

    /// The short tag used in output-file suffixes, e.g. `BP`
    pub fn tag(&self) -> &'static str {
        match self {
            Namespace::BiologicalProcess => "BP",
            Namespace::MolecularFunction => "MF",
            Namespace::CellularComponent => "CC",
        }
    }
}

impl TryFrom<&str> for Namespace {
    type Error = GoError;
    fn try_from(s: &str) -> GoResult<Self> {
        match s {
            "biological_process" => Ok(Namespace::BiologicalProcess),
            "molecular_function" => Ok(Namespace::MolecularFunction),
            "cellular_component" => Ok(Namespace::CellularComponent),
            _ => Err(GoError::InvalidNamespace(s.to_string())),
        }
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Namespace::BiologicalProcess => "biological_process",
            Namespace::MolecularFunction => "molecular_function",
            Namespace::CellularComponent => "cellular_component",
        };
        write!(f, "{s}")
    }
}

/// A single term of the Gene Ontology
///
/// The `GoTerm` borrows its data from the [`Ontology`] and provides
/// ancestor traversal and similarity calculation.
#[derive(Debug, Clone, Copy)]
pub struct GoTerm<'a> {
    id: GoTermId,
    name: &'a str,
    namespace: Namespace,
    depth: u32,
    all_parents: &'a GoGroup,
    ontology: &'a Ontology,
}

impl<'a> GoTerm<'a> {
    /// Constructs a new [`GoTerm`]
    ///
    /// # Errors
    ///
    /// [`GoError::DoesNotExist`] if the id is not part of the ontology
    pub fn try_new(ontology: &'a Ontology, id: GoTermId) -> GoResult<GoTerm<'a>> {
        let term = ontology.get(id).ok_or(GoError::DoesNotExist)?;
        Ok(GoTerm::new(ontology, term))
    }

    pub(crate) fn new(ontology: &'a Ontology, term: &'a internal::GoTermInternal) -> GoTerm<'a> {
        GoTerm {
            id: term.id(),
            name: term.name(),
            namespace: term.namespace(),
            depth: term.depth(),
            all_parents: term.all_parents(),
            ontology,
        }
    }

    /// Returns the [`GoTermId`] of the term, e.g. `GO:0003674`
    pub fn id(&self) -> GoTermId {
        self.id
    }

    /// Returns the name of the term, e.g. `molecular_function`
    pub fn name(&self) -> &str {
        self.name
    }

    /// Returns the [`Namespace`] the term belongs to
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Returns the length of the longest `is_a` path to the namespace root
    ///
    /// The root itself has depth `0`.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns the ids of all direct and indirect ancestors
    ///
    /// The term itself is not part of the returned group.
    pub fn ancestor_ids(&self) -> &GoGroup {
        self.all_parents
    }

    /// Returns the ids present in both terms' ancestor closures
    ///
    /// The closure of a term includes the term itself, so for `a == b`
    /// the result contains `a` and for an ancestor/descendant pair it
    /// contains the ancestor.
    pub fn common_ancestor_ids(&self, other: &GoTerm) -> GoGroup {
        let mut res = self.ancestor_ids() & other.ancestor_ids();

        if self.id == other.id {
            res.insert(self.id);
        } else {
            if other.ancestor_ids().contains(self.id) {
                res.insert(self.id);
            }
            if self.ancestor_ids().contains(other.id) {
                res.insert(other.id);
            }
        }

        res
    }

    /// Returns the deepest common ancestor of `self` and `other`
    ///
    /// `None` if the terms share no ancestor, i.e. when they belong to
    /// different namespaces. Several common ancestors can share the maximum
    /// depth because the ontology is a DAG and not a tree. Ties are broken
    /// towards the smallest [`GoTermId`] to keep the result deterministic.
    pub fn lca(&self, other: &GoTerm) -> Option<GoTerm<'a>> {
        let mut lca: Option<GoTerm<'a>> = None;
        for id in &self.common_ancestor_ids(other) {
            let term = GoTerm::new(self.ontology, self.ontology.get_unchecked(id));
            match lca {
                Some(ref best) if best.depth() >= term.depth() => {}
                _ => lca = Some(term),
            }
        }
        lca
    }

    /// Calculates the similarity of `self` and `other`
    ///
    /// `None` if the score is undefined for the two terms, see
    /// [`Similarity`](`crate::similarity::Similarity`).
    pub fn similarity_score(
        &self,
        other: &GoTerm,
        similarity: &impl crate::similarity::Similarity,
    ) -> Option<f64> {
        similarity.calculate(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_term_id() {
        let id = GoTermId::try_from("GO:0003674").unwrap();
        assert_eq!(id, GoTermId::from(3674u32));
        assert_eq!(id.to_string(), "GO:0003674");
    }

    #[test]
    fn parse_invalid_term_id() {
        assert!(GoTermId::try_from("HP:0003674").is_err());
        assert!(GoTermId::try_from("GO:abc").is_err());
        assert!(GoTermId::try_from("").is_err());
        assert!(GoTermId::try_from("GO:").is_err());
    }

    #[test]
    fn namespace_roundtrip() {
        for ns in Namespace::all() {
            assert_eq!(Namespace::try_from(ns.to_string().as_str()).unwrap(), ns);
        }
        assert!(Namespace::try_from("molecular function").is_err());
    }

    #[test]
    fn namespace_tags() {
        assert_eq!(Namespace::BiologicalProcess.tag(), "BP");
        assert_eq!(Namespace::MolecularFunction.tag(), "MF");
        assert_eq!(Namespace::CellularComponent.tag(), "CC");
    }
}
