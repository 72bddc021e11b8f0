use core::fmt::Debug;
use std::ops::BitOr;
use std::path::Path;

use tracing::debug;

use crate::parser;
use crate::term::internal::GoTermInternal;
use crate::term::{GoGroup, GoTerm, GoTermId, Namespace};
use crate::GoResult;

mod termarena;
use termarena::Arena;

/// The Gene Ontology DAG
///
/// The `Ontology` holds all non-obsolete terms, their `is_a` / `part_of`
/// relations and a precomputed ancestor closure plus depth for every term.
/// It is loaded once, via [`Ontology::from_obo`] or the builder methods,
/// and is read-only afterwards, so references to it can be shared freely
/// between similarity queries.
///
/// # Construction
///
/// 1. Parse an OBO file: [`Ontology::from_obo`]
/// 2. Or build it by hand, which is mostly useful in tests:
///    - [`Ontology::insert_term`] for every term
///    - [`Ontology::add_parent`] for every relation
///    - [`Ontology::create_cache`] once at the end
#[derive(Default)]
pub struct Ontology {
    terms: Arena,
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ontology with {} terms", self.terms.len())
    }
}

/// Methods for setting up and building the Ontology
impl Ontology {
    /// Parses an OBO file into an [`Ontology`]
    ///
    /// Obsolete terms are skipped, as are stanzas that cannot be parsed.
    ///
    /// # Errors
    ///
    /// [`GoError::CannotRead`](`crate::GoError::CannotRead`) if the file
    /// cannot be opened or read
    pub fn from_obo<P: AsRef<Path>>(filename: P) -> GoResult<Ontology> {
        let mut ontology = Ontology::default();
        parser::obo::read_obo_file(filename, &mut ontology)?;
        Ok(ontology)
    }

    /// Adds a term to the ontology
    pub fn insert_term(&mut self, id: GoTermId, name: &str, namespace: Namespace) {
        self.terms.insert(GoTermInternal::new(id, name, namespace));
    }

    /// Records an `is_a` / `part_of` relation between two present terms
    pub fn add_parent(&mut self, parent_id: GoTermId, child_id: GoTermId) {
        let child = self.terms.get_unchecked_mut(child_id);
        child.add_parent(parent_id);
    }

    /// Computes the ancestor closure and depth of every term
    ///
    /// Must be called once, after all terms and relations were added.
    pub fn create_cache(&mut self) {
        debug!("caching ancestors and depths of {} terms", self.len());
        let term_ids = self.terms.keys();

        for id in &term_ids {
            self.create_cache_of_ancestors(*id);
        }
        for id in term_ids {
            self.cache_depth(id);
        }
    }

    fn all_ancestors(&mut self, term_id: GoTermId) -> &GoGroup {
        // split into check-then-fill to satisfy the borrow checker
        let cached = {
            let term = self.terms.get_unchecked(term_id);
            term.parents_cached()
        };
        if !cached {
            self.create_cache_of_ancestors(term_id);
        }
        let term = self.terms.get_unchecked(term_id);
        term.all_parents()
    }

    fn create_cache_of_ancestors(&mut self, term_id: GoTermId) {
        let term = self.terms.get_unchecked(term_id);
        let parents = term.parents().clone();
        let mut res = GoGroup::default();
        for parent in &parents {
            let ancestors = self.all_ancestors(parent);
            for ancestor in ancestors {
                res.insert(ancestor);
            }
        }
        let term = self.terms.get_unchecked_mut(term_id);
        *term.all_parents_mut() = res.bitor(&parents);
    }

    fn cache_depth(&mut self, term_id: GoTermId) -> u32 {
        let term = self.terms.get_unchecked(term_id);
        if term.depth_cached() {
            return term.depth();
        }
        let parents = term.parents().clone();
        let depth = parents
            .iter()
            .map(|parent| self.cache_depth(parent) + 1)
            .max()
            .unwrap_or(0);
        self.terms.get_unchecked_mut(term_id).set_depth(depth);
        depth
    }
}

/// Public API of the Ontology
impl Ontology {
    /// Returns the number of terms in the ontology
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the id belongs to a known, non-obsolete term
    pub fn contains(&self, term_id: GoTermId) -> bool {
        self.terms.contains(term_id)
    }

    /// Returns the [`GoTerm`] of the provided [`GoTermId`], if present
    pub fn go(&self, term_id: GoTermId) -> Option<GoTerm<'_>> {
        self.terms.get(term_id).map(|term| GoTerm::new(self, term))
    }

    /// Returns the [`Namespace`] of the term, if present
    pub fn namespace(&self, term_id: GoTermId) -> Option<Namespace> {
        self.terms.get(term_id).map(GoTermInternal::namespace)
    }

    /// Returns the depth of the term, if present
    pub fn depth(&self, term_id: GoTermId) -> Option<u32> {
        self.terms.get(term_id).map(GoTermInternal::depth)
    }

    /// Returns the ids of all ancestors of the term, if present
    ///
    /// The term itself is not included.
    pub fn ancestors(&self, term_id: GoTermId) -> Option<&GoGroup> {
        self.terms.get(term_id).map(GoTermInternal::all_parents)
    }

    pub(crate) fn get(&self, term_id: GoTermId) -> Option<&GoTermInternal> {
        self.terms.get(term_id)
    }

    pub(crate) fn get_unchecked(&self, term_id: GoTermId) -> &GoTermInternal {
        self.terms.get_unchecked(term_id)
    }

    /// Returns an iterator over all terms of the ontology
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.terms.values(),
            ontology: self,
        }
    }
}

/// An iterator over all [`GoTerm`]s of the [`Ontology`]
pub struct Iter<'a> {
    inner: std::collections::hash_map::Values<'a, GoTermId, GoTermInternal>,
    ontology: &'a Ontology,
}

impl<'a> Iterator for Iter<'a> {
    type Item = GoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|term| GoTerm::new(self.ontology, term))
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = GoTerm<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
