//! A `TermFamily` represents the GO annotation set of one biological
//! entity, e.g. all terms annotated to a gene
use crate::matrix::Matrix;
use crate::similarity::{BestMatchAverage, Similarity, SimilarityCombiner};
use crate::term::{GoGroup, GoTermIds};
use crate::{GoResult, GoTerm, GoTermId, Ontology};

/// A group of [`GoTermId`]s bound to an [`Ontology`]
///
/// The family keeps every id it was given, also ids that are unknown to
/// the ontology. Unknown ids can never contribute a defined similarity
/// score, but they still count towards the size of the family and thereby
/// towards the denominator of [`TermFamily::similarity`].
///
/// Duplicate ids are collapsed: the family is a set, so a repeated id
/// counts once towards the family size. Annotation sets carry no
/// meaningful multiplicity, and a duplicate would only repeat its own
/// best-match score in the average.
///
/// # Examples
///
/// ```
/// use gosim::{Namespace, Ontology, TermFamily};
///
/// let mut ontology = Ontology::default();
/// ontology.insert_term(3674u32.into(), "molecular_function", Namespace::MolecularFunction);
/// ontology.insert_term(5488u32.into(), "binding", Namespace::MolecularFunction);
/// ontology.add_parent(3674u32.into(), 5488u32.into());
/// ontology.create_cache();
///
/// let family = TermFamily::from_query(&ontology, "GO:0003674, GO:0005488").unwrap();
/// assert_eq!(family.len(), 2);
/// ```
#[must_use]
pub struct TermFamily<'a> {
    ontology: &'a Ontology,
    group: GoGroup,
}

impl<'a> TermFamily<'a> {
    /// Constructs a `TermFamily` from a group of term ids
    pub fn new(ontology: &'a Ontology, group: GoGroup) -> Self {
        Self { ontology, group }
    }

    /// Parses a comma-separated list of GO ids, e.g. `GO:0005488,GO:0016491`
    ///
    /// Whitespace around ids is ignored, as are empty segments. Ids that
    /// are well-formed but unknown to the ontology are kept, see the
    /// struct-level documentation.
    ///
    /// # Errors
    ///
    /// [`GoError::InvalidGoId`](`crate::GoError::InvalidGoId`) for
    /// segments that are not GO ids at all
    pub fn from_query(ontology: &'a Ontology, query: &str) -> GoResult<Self> {
        let mut group = GoGroup::new();
        for part in query.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            group.insert(GoTermId::try_from(part)?);
        }
        Ok(Self::new(ontology, group))
    }

    /// Returns the number of term ids in the family
    pub fn len(&self) -> usize {
        self.group.len()
    }

    /// Returns `true` if the family contains no term ids
    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }

    /// Returns an iterator of the [`GoTermId`]s of the family
    pub fn iter(&self) -> GoTermIds<'_> {
        self.group.iter()
    }

    fn term(&self, id: GoTermId) -> Option<GoTerm<'a>> {
        self.ontology.go(id)
    }

    /// Returns the best similarity score of `id` against the family
    ///
    /// `None` if no pair yields a defined score: the id or all family
    /// members are unknown, the family is empty, or every pairwise score
    /// is undefined.
    pub fn term_similarity(&self, id: GoTermId, similarity: &impl Similarity) -> Option<f64> {
        let term = self.term(id)?;
        self.iter()
            .filter_map(|other| {
                let other = self.term(other)?;
                similarity.calculate(&term, &other)
            })
            .reduce(f64::max)
    }

    /// Calculates the similarity between two families
    ///
    /// Every term of `self` is scored against `other` and vice versa with
    /// [`TermFamily::term_similarity`] semantics; the scores are combined
    /// by [`BestMatchAverage`]. Terms without a defined score contribute
    /// `0.0` but still count towards the denominator, so a non-empty
    /// family compared against an empty one scores `0.0`.
    ///
    /// `None` only when both families are empty. The score is symmetric.
    pub fn similarity(&self, other: &TermFamily, similarity: &impl Similarity) -> Option<f64> {
        if self.is_empty() && other.is_empty() {
            return None;
        }

        let mut scores = Vec::with_capacity(self.len() * other.len());
        for a in self.iter() {
            for b in other.iter() {
                let score = match (self.term(a), other.term(b)) {
                    (Some(a), Some(b)) => similarity.calculate(&a, &b),
                    _ => None,
                };
                scores.push(score);
            }
        }

        let m = Matrix::new(self.len(), other.len(), &scores);
        Some(BestMatchAverage.calculate(&m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::BackgroundProbs;
    use crate::similarity::Lin;
    use crate::term::Namespace;

    /// MF: 3674 (root) <- 5488 <- 16491 and 3674 <- 3824
    fn fixtures() -> (Ontology, BackgroundProbs) {
        let mut ont = Ontology::default();
        ont.insert_term(3674u32.into(), "molecular_function", Namespace::MolecularFunction);
        ont.insert_term(5488u32.into(), "binding", Namespace::MolecularFunction);
        ont.insert_term(
            16491u32.into(),
            "oxidoreductase activity",
            Namespace::MolecularFunction,
        );
        ont.insert_term(3824u32.into(), "catalytic activity", Namespace::MolecularFunction);
        ont.add_parent(3674u32.into(), 5488u32.into());
        ont.add_parent(5488u32.into(), 16491u32.into());
        ont.add_parent(3674u32.into(), 3824u32.into());
        ont.create_cache();

        let mut probs = BackgroundProbs::default();
        probs.insert(3674u32.into(), 1.0);
        probs.insert(5488u32.into(), 0.5);
        probs.insert(16491u32.into(), 0.25);
        probs.insert(3824u32.into(), 0.5);

        (ont, probs)
    }

    fn family<'a>(ont: &'a Ontology, ids: &[u32]) -> TermFamily<'a> {
        TermFamily::new(ont, ids.iter().map(|id| GoTermId::from(*id)).collect())
    }

    #[test]
    fn from_query() {
        let (ont, _) = fixtures();
        let fam = TermFamily::from_query(&ont, " GO:0005488, GO:0016491 ,,").unwrap();
        assert_eq!(fam.len(), 2);

        assert!(TermFamily::from_query(&ont, "GO:0005488,oops").is_err());

        let empty = TermFamily::from_query(&ont, "").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn from_query_collapses_duplicates() {
        let (ont, _) = fixtures();
        let fam = TermFamily::from_query(&ont, "GO:0005488,GO:0005488").unwrap();
        assert_eq!(fam.len(), 1);
    }

    #[test]
    fn term_similarity_picks_best_match() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let fam = family(&ont, &[5488, 3824]);
        // 16491 is a child of 5488, identical terms score 1.0
        let best = fam.term_similarity(5488u32.into(), &lin).unwrap();
        assert_eq!(best, 1.0);

        let best = fam.term_similarity(16491u32.into(), &lin).unwrap();
        let expected = 2.0 * 0.5f64.ln() / (0.5f64 * 0.25).ln();
        assert!((best - expected).abs() < 1e-12);
    }

    #[test]
    fn term_similarity_unknown_term() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let fam = family(&ont, &[5488]);
        assert_eq!(fam.term_similarity(999u32.into(), &lin), None);
    }

    #[test]
    fn term_similarity_empty_family() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let fam = family(&ont, &[]);
        assert_eq!(fam.term_similarity(5488u32.into(), &lin), None);
    }

    #[test]
    fn family_similarity_matches_the_averaging_formula() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let a = family(&ont, &[5488, 3824]);
        let b = family(&ont, &[16491]);

        // by hand: sum of best matches of every term in A against B and
        // every term in B against A, divided by |A| + |B|
        let mut expected = 0.0;
        for id in a.iter() {
            expected += b.term_similarity(id, &lin).unwrap_or(0.0);
        }
        for id in b.iter() {
            expected += a.term_similarity(id, &lin).unwrap_or(0.0);
        }
        expected /= 3.0;

        let score = a.similarity(&b, &lin).unwrap();
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn family_similarity_is_symmetric() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let a = family(&ont, &[5488, 3824, 999]);
        let b = family(&ont, &[16491, 3674]);

        assert_eq!(a.similarity(&b, &lin), b.similarity(&a, &lin));
    }

    #[test]
    fn family_similarity_with_empty_family_is_zero() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let a = family(&ont, &[5488, 16491]);
        let empty = family(&ont, &[]);

        assert_eq!(a.similarity(&empty, &lin), Some(0.0));
        assert_eq!(empty.similarity(&a, &lin), Some(0.0));
    }

    #[test]
    fn family_similarity_of_two_empty_families_is_undefined() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let a = family(&ont, &[]);
        let b = family(&ont, &[]);
        assert_eq!(a.similarity(&b, &lin), None);
    }

    #[test]
    fn unknown_terms_dilute_the_score() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let a = family(&ont, &[5488]);
        let with_unknown = family(&ont, &[5488, 999]);
        let b = family(&ont, &[5488]);

        let clean = a.similarity(&b, &lin).unwrap();
        let diluted = with_unknown.similarity(&b, &lin).unwrap();
        assert!(diluted < clean);
    }
}
