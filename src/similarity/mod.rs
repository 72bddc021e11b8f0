//! Similarity between two terms or two sets of terms
//!
//! Pairwise scores are calculated by a [`Similarity`] implementation;
//! scores of whole [`TermFamily`](`crate::TermFamily`)s are combined from a
//! matrix of pairwise scores by a [`SimilarityCombiner`].
//!
//! A score can be undefined, e.g. when a term has no background
//! probability. Undefined is modeled as `None` and is distinct from a
//! computed score of `0.0`, so callers can tell "cannot compute" apart
//! from "not similar at all".
use crate::background::BackgroundProbs;
use crate::matrix::Matrix;
use crate::GoTerm;

/// Trait for similarity calculation between two [`GoTerm`]s
pub trait Similarity {
    /// Calculates the similarity between term `a` and term `b`
    ///
    /// `None` when the score is undefined for the two terms.
    fn calculate(&self, a: &GoTerm, b: &GoTerm) -> Option<f64>;
}

/// Lin similarity, driven by background probabilities
///
/// ```text
/// sim(a, b) = 2 * ln P(lca(a, b)) / ln(P(a) * P(b))
/// ```
///
/// which is the formulation of [Lin D, Proceedings of the 15th ICML,
/// (1998)](https://dl.acm.org/doi/10.5555/645527.657297) with the
/// information content `-ln P` written out. The score is `1.0` for
/// identical terms, is not clamped otherwise and is undefined when
///
/// - `a`, `b` or their deepest common ancestor has no probability
/// - the terms share no ancestor (different namespaces)
/// - a probability is zero or negative, which signals a broken table
/// - both terms are namespace roots, where the denominator is zero
///
/// # Examples
///
/// ```
/// use gosim::background::BackgroundProbs;
/// use gosim::similarity::Lin;
///
/// let mut probs = BackgroundProbs::default();
/// probs.insert(3674u32.into(), 1.0);
/// probs.insert(5488u32.into(), 0.5);
/// let lin = Lin::new(&probs);
/// ```
#[derive(Debug)]
pub struct Lin<'a> {
    probs: &'a BackgroundProbs,
}

impl<'a> Lin<'a> {
    /// Constructs a new `Lin` similarity over the given probability table
    pub fn new(probs: &'a BackgroundProbs) -> Self {
        Self { probs }
    }
}

impl Similarity for Lin<'_> {
    fn calculate(&self, a: &GoTerm, b: &GoTerm) -> Option<f64> {
        let p_a = self.probs.get(a.id())?;
        let p_b = self.probs.get(b.id())?;

        let lca = a.lca(b)?;
        let p_lca = self.probs.get(lca.id())?;

        if p_a <= 0.0 || p_b <= 0.0 || p_lca <= 0.0 {
            return None;
        }

        let denominator = (p_a * p_b).ln();
        if denominator == 0.0 {
            return None;
        }

        Some(2.0 * p_lca.ln() / denominator)
    }
}

/// Combines a matrix of pairwise scores into one set-vs-set score
///
/// Undefined pairwise scores stay undefined within a row or column; a row
/// or column without any defined score contributes `0.0` to the combined
/// score.
pub trait SimilarityCombiner {
    /// The actual combination logic
    fn combine(&self, m: &Matrix<Option<f64>>) -> f64;

    /// Combines the matrix, short-circuiting the empty case
    fn calculate(&self, m: &Matrix<Option<f64>>) -> f64 {
        if m.is_empty() {
            return 0.0;
        }
        self.combine(m)
    }

    /// Returns the maximum defined value of each row
    fn row_maxes(&self, m: &Matrix<Option<f64>>) -> Vec<Option<f64>> {
        m.rows()
            .map(|row| row.iter().filter_map(|v| *v).reduce(f64::max))
            .collect()
    }

    /// Returns the maximum defined value of each column
    fn col_maxes(&self, m: &Matrix<Option<f64>>) -> Vec<Option<f64>> {
        m.cols()
            .map(|col| col.filter_map(|v| *v).reduce(f64::max))
            .collect()
    }

    /// Returns the dimensions of the matrix as floats, (rows, columns)
    fn dim_f64(&self, m: &Matrix<Option<f64>>) -> (f64, f64) {
        let (rows, cols) = m.dim();
        (usize_to_f64(rows), usize_to_f64(cols))
    }
}

/// Best-match average over both directions
///
/// The sum of all row maxima and all column maxima, divided by the total
/// number of rows and columns. Every term counts towards the denominator,
/// also when its best match is undefined. This is the symmetric
/// best-match-average of [Schlicker A, et. al., BMC Bioinf
/// (2006)](https://pubmed.ncbi.nlm.nih.gov/16776819/), extended with the
/// undefined-score policy above.
#[derive(Default, Debug)]
pub struct BestMatchAverage;

impl SimilarityCombiner for BestMatchAverage {
    fn combine(&self, m: &Matrix<Option<f64>>) -> f64 {
        let (rows, cols) = self.dim_f64(m);
        let row_sum: f64 = self.row_maxes(m).into_iter().flatten().sum();
        let col_sum: f64 = self.col_maxes(m).into_iter().flatten().sum();

        (row_sum + col_sum) / (rows + cols)
    }
}

/// Converts without `as` so that an absurdly large family panics instead
/// of silently losing precision.
fn usize_to_f64(n: usize) -> f64 {
    <usize as TryInto<u32>>::try_into(n)
        .expect("family too large")
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Namespace;
    use crate::Ontology;

    /// MF: 3674 (root) <- 5488 <- 16491, plus the BP root 8150
    fn fixtures() -> (Ontology, BackgroundProbs) {
        let mut ont = Ontology::default();
        ont.insert_term(3674u32.into(), "molecular_function", Namespace::MolecularFunction);
        ont.insert_term(5488u32.into(), "binding", Namespace::MolecularFunction);
        ont.insert_term(
            16491u32.into(),
            "oxidoreductase activity",
            Namespace::MolecularFunction,
        );
        ont.insert_term(8150u32.into(), "biological_process", Namespace::BiologicalProcess);
        ont.add_parent(3674u32.into(), 5488u32.into());
        ont.add_parent(5488u32.into(), 16491u32.into());
        ont.create_cache();

        let mut probs = BackgroundProbs::default();
        probs.insert(3674u32.into(), 1.0);
        probs.insert(5488u32.into(), 0.5);
        probs.insert(16491u32.into(), 0.25);
        probs.insert(8150u32.into(), 1.0);

        (ont, probs)
    }

    #[test]
    fn ancestor_descendant_pair() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let a = ont.go(5488u32.into()).unwrap();
        let b = ont.go(16491u32.into()).unwrap();

        let expected = 2.0 * 0.5f64.ln() / (0.5f64 * 0.25).ln();
        let score = lin.calculate(&a, &b).unwrap();
        assert!((score - expected).abs() < 1e-12);
        assert!((score - 2.0 / 3.0).abs() < 1e-12);

        // symmetric
        assert_eq!(lin.calculate(&b, &a), Some(score));
    }

    #[test]
    fn term_with_itself() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let a = ont.go(5488u32.into()).unwrap();
        assert_eq!(lin.calculate(&a, &a), Some(1.0));
    }

    #[test]
    fn missing_probability() {
        let (ont, _) = fixtures();
        let mut probs = BackgroundProbs::default();
        probs.insert(5488u32.into(), 0.5);
        let lin = Lin::new(&probs);

        let a = ont.go(5488u32.into()).unwrap();
        let b = ont.go(16491u32.into()).unwrap();
        assert_eq!(lin.calculate(&a, &b), None);
        assert_eq!(lin.calculate(&b, &a), None);
    }

    #[test]
    fn different_namespaces() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        let a = ont.go(5488u32.into()).unwrap();
        let b = ont.go(8150u32.into()).unwrap();
        assert_eq!(lin.calculate(&a, &b), None);
    }

    #[test]
    fn root_with_root_is_undefined() {
        let (ont, probs) = fixtures();
        let lin = Lin::new(&probs);

        // ln(1.0 * 1.0) == 0, no score
        let root = ont.go(3674u32.into()).unwrap();
        assert_eq!(lin.calculate(&root, &root), None);
    }

    #[test]
    fn non_positive_probability_is_undefined() {
        let (ont, mut probs) = fixtures();
        probs.insert(16491u32.into(), 0.0);
        let lin = Lin::new(&probs);

        let a = ont.go(5488u32.into()).unwrap();
        let b = ont.go(16491u32.into()).unwrap();
        assert_eq!(lin.calculate(&a, &b), None);
    }

    #[test]
    fn best_match_average() {
        let data = vec![Some(0.5), None, Some(-0.5), Some(0.25)];
        let m = Matrix::new(2, 2, &data);

        // row maxes 0.5 and 0.25, col maxes 0.5 and 0.25
        let score = BestMatchAverage.calculate(&m);
        assert!((score - 0.375).abs() < 1e-12);
    }

    #[test]
    fn best_match_average_undefined_rows_count_as_zero() {
        let data = vec![None, None, Some(0.5), Some(1.0)];
        let m = Matrix::new(2, 2, &data);

        // row maxes None and 1.0, col maxes 0.5 and 1.0
        let score = BestMatchAverage.calculate(&m);
        assert!((score - 2.5 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn best_match_average_without_rows() {
        let data: Vec<Option<f64>> = vec![];
        let m = Matrix::new(0, 2, &data);
        assert_eq!(BestMatchAverage.combine(&m), 0.0);
    }

    #[test]
    fn best_match_average_empty_matrix() {
        let data: Vec<Option<f64>> = vec![];
        let m = Matrix::new(0, 0, &data);
        assert_eq!(BestMatchAverage.calculate(&m), 0.0);
    }
}
