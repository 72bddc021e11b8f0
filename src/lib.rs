//! Similarity scores for Gene Ontology terms and annotation sets
//!
//! `gosim` computes information-content based similarity between GO terms,
//! between a term and a set of terms and between two sets of terms. The
//! information content of a term is derived from background probabilities:
//! the fraction of annotation observations whose ancestor closure contains
//! the term, normalized so that each namespace root has probability `1.0`.
//!
//! The crate contains two pipelines that share the [`Ontology`]:
//!
//! 1. [`background::BackgroundEstimator`] consumes a stream of annotations
//!    (GAF or two-column TSV) and produces one probability table per
//!    namespace.
//! 2. [`similarity::Lin`] together with [`TermFamily`] answers similarity
//!    queries against a previously produced [`background::BackgroundProbs`]
//!    table.
//!
//! # Examples
//!
//! ```
//! use gosim::{GoTermId, Ontology, TermFamily};
//! use gosim::background::BackgroundProbs;
//! use gosim::similarity::Lin;
//! use gosim::term::GoGroup;
//!
//! # fn example() -> gosim::GoResult<()> {
//! let ontology = Ontology::from_obo("go-basic.obo")?;
//! let probs = BackgroundProbs::from_file("backprobs_MF.tsv")?;
//! let lin = Lin::new(&probs);
//!
//! let a = TermFamily::new(&ontology, GoGroup::from_iter([
//!     GoTermId::try_from("GO:0003674")?,
//!     GoTermId::try_from("GO:0005488")?,
//! ]));
//! let b = TermFamily::new(&ontology, GoGroup::from_iter([
//!     GoTermId::try_from("GO:0016491")?,
//! ]));
//!
//! match a.similarity(&b, &lin) {
//!     Some(score) => println!("sim(A,B) = {score:.4}"),
//!     None => println!("could not compute sim(A,B)"),
//! }
//! # Ok(())
//! # }
//! ```
use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

pub mod background;
pub mod matrix;
mod ontology;
pub mod parser;
pub mod set;
pub mod similarity;
pub mod term;

pub use ontology::Ontology;
pub use set::TermFamily;
pub use similarity::{Lin, Similarity};
pub use term::{GoTerm, GoTermId, Namespace};

const DEFAULT_NUM_PARENTS: usize = 8;
const DEFAULT_NUM_ALL_PARENTS: usize = 32;

/// Errors that halt a run
///
/// Per-record data-quality issues (malformed lines, unknown or obsolete
/// terms, non-numeric probabilities) are never errors. They are skipped
/// during parsing, or surface as `None` scores during similarity
/// calculation.
#[derive(Error, Debug)]
pub enum GoError {
    /// The [`GoTermId`] does not exist in the [`Ontology`]
    #[error("term does not exist")]
    DoesNotExist,
    /// The string is not a valid GO id, e.g. `GO:0003674`
    #[error("invalid GO id: {0}")]
    InvalidGoId(String),
    /// The string is not one of the three GO namespaces
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),
    /// The file could not be opened or read
    #[error("unable to read {0}")]
    CannotRead(String),
    /// The file could not be written
    #[error("unable to write {0}")]
    CannotWrite(String),
    /// A probability table contained no usable rows
    #[error("no valid probabilities in {0}")]
    EmptyProbabilityTable(String),
    /// Unable to parse an integer
    #[error("unable to parse integer")]
    ParseIntError,
    /// Unable to parse a float
    #[error("unable to parse float")]
    ParseFloatError,
}

impl From<ParseIntError> for GoError {
    fn from(_: ParseIntError) -> Self {
        GoError::ParseIntError
    }
}

impl From<ParseFloatError> for GoError {
    fn from(_: ParseFloatError) -> Self {
        GoError::ParseFloatError
    }
}

/// Convenience alias for `Result<T, GoError>`
pub type GoResult<T> = Result<T, GoError>;
