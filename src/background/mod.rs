//! Background probabilities of GO terms
//!
//! The background probability of a term is the fraction of annotation
//! observations in its namespace whose ancestor closure contains the term.
//! Every observation counts once for the annotated term itself and once for
//! each of its ancestors, so probabilities grow towards the root: the
//! namespace root is part of every closure and ends up with probability
//! `1.0` exactly.
//!
//! [`BackgroundEstimator`] tallies observations into per-namespace tables,
//! [`BackgroundProbs`] loads such a table back for similarity queries. The
//! two halves do not need to run in the same process; the tables are plain
//! two-column TSV files.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::term::{GoTermId, Namespace};
use crate::{GoError, GoResult, Ontology};

/// Tallies annotation observations into per-namespace ancestor counts
///
/// Observations of unknown or obsolete terms are discarded silently; a
/// namespace without a single valid observation produces no table.
///
/// # Examples
///
/// ```
/// use gosim::background::BackgroundEstimator;
/// use gosim::{GoTermId, Namespace, Ontology};
///
/// let mut ontology = Ontology::default();
/// ontology.insert_term(3674u32.into(), "molecular_function", Namespace::MolecularFunction);
/// ontology.insert_term(5488u32.into(), "binding", Namespace::MolecularFunction);
/// ontology.add_parent(3674u32.into(), 5488u32.into());
/// ontology.create_cache();
///
/// let mut estimator = BackgroundEstimator::new();
/// estimator.count(&ontology, 5488u32.into());
/// estimator.count(&ontology, 3674u32.into());
///
/// let tables = estimator.finalize();
/// assert_eq!(tables.len(), 1);
/// assert_eq!(tables[0].probability(3674u32.into()), Some(1.0));
/// assert_eq!(tables[0].probability(5488u32.into()), Some(0.5));
/// ```
#[derive(Default)]
pub struct BackgroundEstimator {
    tally: HashMap<Namespace, HashMap<GoTermId, u64>>,
    observations: HashMap<Namespace, u64>,
}

impl BackgroundEstimator {
    /// Constructs a new, empty estimator
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observation of the term
    ///
    /// Counts the term itself and every one of its ancestors in the term's
    /// namespace. Returns `false` if the term is not part of the ontology,
    /// in which case nothing is recorded.
    pub fn count(&mut self, ontology: &Ontology, term_id: GoTermId) -> bool {
        let Some(term) = ontology.go(term_id) else {
            return false;
        };
        let namespace = term.namespace();

        *self.observations.entry(namespace).or_default() += 1;

        let tally = self.tally.entry(namespace).or_default();
        *tally.entry(term_id).or_default() += 1;
        for ancestor in term.ancestor_ids() {
            *tally.entry(ancestor).or_default() += 1;
        }
        true
    }

    /// Records a whole stream of `(source, term)` observations
    pub fn count_all<I>(&mut self, ontology: &Ontology, observations: I)
    where
        I: IntoIterator<Item = (String, GoTermId)>,
    {
        let mut skipped = 0usize;
        for (_, term_id) in observations {
            if !self.count(ontology, term_id) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!("skipped {skipped} observations of unknown terms");
        }
    }

    /// Normalizes the tallies into per-namespace probability tables
    ///
    /// Only namespaces with at least one valid observation are returned.
    pub fn finalize(mut self) -> Vec<NamespaceBackground> {
        let mut tables = Vec::new();
        for namespace in Namespace::all() {
            let raw_count = self.observations.get(&namespace).copied().unwrap_or(0);
            if raw_count == 0 {
                continue;
            }
            let tally = self.tally.remove(&namespace).unwrap_or_default();

            let mut entries: Vec<BackgroundEntry> = tally
                .into_iter()
                .map(|(id, count)| BackgroundEntry {
                    id,
                    count,
                    probability: count as f64 / raw_count as f64,
                })
                .collect();
            // most frequent first, ids as tie-break for deterministic output
            entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.id.cmp(&b.id)));

            tables.push(NamespaceBackground {
                namespace,
                observations: raw_count,
                entries,
            });
        }
        tables
    }

    /// Runs the full estimation over a stream of observations
    pub fn estimate<I>(ontology: &Ontology, observations: I) -> Vec<NamespaceBackground>
    where
        I: IntoIterator<Item = (String, GoTermId)>,
    {
        let mut estimator = BackgroundEstimator::new();
        estimator.count_all(ontology, observations);
        estimator.finalize()
    }
}

/// One term's tally and normalized probability
#[derive(Debug, Clone, Copy)]
pub struct BackgroundEntry {
    id: GoTermId,
    count: u64,
    probability: f64,
}

impl BackgroundEntry {
    pub fn id(&self) -> GoTermId {
        self.id
    }

    /// How many observation closures contained the term
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

/// The finalized background probabilities of one namespace
#[derive(Debug)]
pub struct NamespaceBackground {
    namespace: Namespace,
    observations: u64,
    entries: Vec<BackgroundEntry>,
}

impl NamespaceBackground {
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// The normalization denominator: raw observations in the namespace
    pub fn observations(&self) -> u64 {
        self.observations
    }

    /// The entries, most frequently observed term first
    pub fn entries(&self) -> &[BackgroundEntry] {
        &self.entries
    }

    pub fn probability(&self, id: GoTermId) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(BackgroundEntry::probability)
    }

    /// Converts the table into a [`BackgroundProbs`] lookup
    pub fn probs(&self) -> BackgroundProbs {
        let mut probs = BackgroundProbs::default();
        for entry in &self.entries {
            probs.insert(entry.id, entry.probability);
        }
        probs
    }

    /// Writes the table as `<prefix>_<TAG>.tsv` and returns the path
    ///
    /// # Errors
    ///
    /// [`GoError::CannotWrite`] if the file cannot be created or written
    pub fn write_tsv(&self, prefix: &str) -> GoResult<PathBuf> {
        let path = PathBuf::from(format!("{prefix}_{}.tsv", self.namespace.tag()));
        let file =
            File::create(&path).map_err(|_| GoError::CannotWrite(path.display().to_string()))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .map_err(|_| GoError::CannotWrite(path.display().to_string()))?;
        Ok(path)
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for entry in &self.entries {
            writeln!(writer, "{}\t{:.8}", entry.id, entry.probability)?;
        }
        Ok(())
    }
}

/// Background probabilities keyed by term id
///
/// Term ids are disjoint across namespaces, so tables of several
/// namespaces can be merged into one lookup.
#[derive(Debug, Default)]
pub struct BackgroundProbs {
    probs: HashMap<GoTermId, f64>,
}

impl BackgroundProbs {
    /// Loads a probability table from a two-column text file
    ///
    /// Rows are `<go_id> <probability>`, separated by whitespace or tabs.
    /// Comment lines (`#`), blank lines, short rows, invalid GO ids and
    /// non-numeric probabilities are skipped.
    ///
    /// # Errors
    ///
    /// [`GoError::CannotRead`] if the file cannot be opened or read
    pub fn from_file<P: AsRef<Path>>(filename: P) -> GoResult<Self> {
        let mut probs = Self::default();
        probs.merge_file(filename)?;
        Ok(probs)
    }

    /// Loads and merges several probability tables, e.g. one per namespace
    ///
    /// # Errors
    ///
    /// [`GoError::CannotRead`] if any file cannot be opened or read
    pub fn from_files<P: AsRef<Path>>(filenames: &[P]) -> GoResult<Self> {
        let mut probs = Self::default();
        for filename in filenames {
            probs.merge_file(filename)?;
        }
        Ok(probs)
    }

    fn merge_file<P: AsRef<Path>>(&mut self, filename: P) -> GoResult<()> {
        let file = File::open(&filename)
            .map_err(|_| GoError::CannotRead(filename.as_ref().display().to_string()))?;
        self.merge_reader(BufReader::new(file))
            .map_err(|_| GoError::CannotRead(filename.as_ref().display().to_string()))
    }

    fn merge_reader<R: BufRead>(&mut self, reader: R) -> std::io::Result<()> {
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(id), Some(probability)) = (fields.next(), fields.next()) else {
                continue;
            };
            let Ok(id) = GoTermId::try_from(id) else {
                continue;
            };
            let Ok(probability) = probability.parse::<f64>() else {
                continue;
            };
            self.probs.insert(id, probability);
        }
        Ok(())
    }

    /// Returns the probability of the term, if present
    pub fn get(&self, id: GoTermId) -> Option<f64> {
        self.probs.get(&id).copied()
    }

    /// Adds or replaces the probability of a term
    pub fn insert(&mut self, id: GoTermId, probability: f64) {
        self.probs.insert(id, probability);
    }

    /// Returns the number of terms with a probability
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Returns `true` if the table holds no probabilities
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }
}
