//! Parsers for the external file formats
//!
//! - `go-basic.obo` files for the ontology itself
//! - GAF or two-column TSV files for annotation observations
//!
//! Per-record problems (malformed stanzas or lines, obsolete terms,
//! invalid GO ids) are expected noise in biological data sources. They are
//! skipped and logged, never turned into errors. Only an unreadable file
//! aborts parsing.

/// Parses `[Term]` stanzas of an OBO file
pub mod obo {
    use std::fs;
    use std::path::Path;

    use tracing::{debug, trace, warn};

    use crate::term::{GoTermId, Namespace};
    use crate::{GoError, GoResult, Ontology};

    // (child, parent) relations, linked after all terms are present
    type Connections = Vec<(GoTermId, GoTermId)>;

    /// Reads an OBO file into the provided [`Ontology`]
    ///
    /// # Errors
    ///
    /// [`GoError::CannotRead`] if the file cannot be opened or read
    pub fn read_obo_file<P: AsRef<Path>>(filename: P, ontology: &mut Ontology) -> GoResult<()> {
        let file_content = fs::read_to_string(&filename)
            .map_err(|_| GoError::CannotRead(filename.as_ref().display().to_string()))?;
        parse_obo(&file_content, ontology);
        Ok(())
    }

    pub(crate) fn parse_obo(content: &str, ontology: &mut Ontology) {
        let mut connections: Connections = Vec::new();

        for stanza in content.split("\n\n") {
            if let Some(stanza) = stanza.strip_prefix("[Term]\n") {
                if let Some((id, name, namespace)) = term_from_stanza(stanza) {
                    ontology.insert_term(id, name, namespace);
                    add_connections(&mut connections, stanza, id);
                } else {
                    // obsolete or incomplete stanza
                    debug!("skipping term stanza: {}", stanza.lines().next().unwrap_or(""));
                }
            } else {
                trace!("ignoring stanza");
            }
        }

        for (child, parent) in connections {
            if ontology.contains(child) && ontology.contains(parent) {
                ontology.add_parent(parent, child);
            } else {
                // the parent is obsolete and was not inserted
                debug!("skipping relation {child} -> {parent}");
            }
        }

        ontology.create_cache();
    }

    fn term_from_stanza(stanza: &str) -> Option<(GoTermId, &str, Namespace)> {
        let mut id: Option<GoTermId> = None;
        let mut name: Option<&str> = None;
        let mut namespace: Option<Namespace> = None;
        for line in stanza.lines() {
            match line.split_once(": ") {
                Some(("id", value)) => id = GoTermId::try_from(value).ok(),
                Some(("name", value)) => name = Some(value),
                Some(("namespace", value)) => namespace = Namespace::try_from(value).ok(),
                Some(("is_obsolete", "true")) => return None,
                _ => (),
            }
        }
        Some((id?, name?, namespace?))
    }

    fn add_connections(connections: &mut Connections, stanza: &str, id: GoTermId) {
        for line in stanza.lines() {
            let target = match line.strip_prefix("is_a: ") {
                Some(value) => Some(value),
                None => line.strip_prefix("relationship: part_of "),
            };
            let Some(value) = target else { continue };

            // "GO:0048308 ! organelle inheritance" or a bare id
            match value.split_whitespace().next().map(GoTermId::try_from) {
                Some(Ok(parent)) => connections.push((id, parent)),
                _ => warn!("unable to parse GO id from {value}"),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        const OBO: &str = "\
format-version: 1.2

[Term]
id: GO:0003674
name: molecular_function
namespace: molecular_function

[Term]
id: GO:0005488
name: binding
namespace: molecular_function
is_a: GO:0003674 ! molecular_function

[Term]
id: GO:0016491
name: oxidoreductase activity
namespace: molecular_function
is_a: GO:0005488 ! binding
relationship: part_of GO:0003674 ! molecular_function

[Term]
id: GO:0000001
name: old term
namespace: molecular_function
is_a: GO:0005488 ! binding
is_obsolete: true

[Typedef]
id: part_of
name: part of
";

        #[test]
        fn parse_small_obo() {
            let mut ont = Ontology::default();
            parse_obo(OBO, &mut ont);

            assert_eq!(ont.len(), 3);
            assert!(ont.contains(3674u32.into()));
            assert!(ont.contains(5488u32.into()));
            assert!(ont.contains(16491u32.into()));

            assert_eq!(
                ont.namespace(5488u32.into()),
                Some(Namespace::MolecularFunction)
            );
            assert_eq!(ont.go(3674u32.into()).unwrap().name(), "molecular_function");
        }

        #[test]
        fn obsolete_terms_are_dropped() {
            let mut ont = Ontology::default();
            parse_obo(OBO, &mut ont);
            assert!(!ont.contains(1u32.into()));
        }

        #[test]
        fn ancestors_follow_is_a_and_part_of() {
            let mut ont = Ontology::default();
            parse_obo(OBO, &mut ont);

            let anc: Vec<GoTermId> = ont.ancestors(16491u32.into()).unwrap().iter().collect();
            assert_eq!(anc, vec![3674u32.into(), 5488u32.into()]);

            assert_eq!(ont.depth(3674u32.into()), Some(0));
            assert_eq!(ont.depth(16491u32.into()), Some(2));
        }
    }
}

/// Parses annotation observations from GAF or two-column TSV files
pub mod annotations {
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use std::path::Path;

    use crate::term::GoTermId;
    use crate::{GoError, GoResult};

    /// The supported annotation-file shapes
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub enum AnnotationFormat {
        /// Standard 17-column GO annotation files; the GO id is in column 5
        Gaf,
        /// `<identifier>\t<GO id>` rows
        Tsv,
    }

    /// Reads all `(source identifier, GO id)` observations from a file
    ///
    /// Header lines, comments, short rows and rows with invalid GO ids are
    /// skipped.
    ///
    /// # Errors
    ///
    /// [`GoError::CannotRead`] if the file cannot be opened or read
    pub fn read_annotations<P: AsRef<Path>>(
        filename: P,
        format: AnnotationFormat,
    ) -> GoResult<Vec<(String, GoTermId)>> {
        let file = File::open(&filename)
            .map_err(|_| GoError::CannotRead(filename.as_ref().display().to_string()))?;
        let reader = BufReader::new(file);

        let mut observations = Vec::new();
        for line in reader.lines() {
            let line =
                line.map_err(|_| GoError::CannotRead(filename.as_ref().display().to_string()))?;
            if let Some(observation) = parse_line(&line, format) {
                observations.push(observation);
            }
        }
        Ok(observations)
    }

    pub(crate) fn parse_line(line: &str, format: AnnotationFormat) -> Option<(String, GoTermId)> {
        match format {
            AnnotationFormat::Gaf => parse_gaf_line(line),
            AnnotationFormat::Tsv => parse_tsv_line(line),
        }
    }

    fn parse_gaf_line(line: &str) -> Option<(String, GoTermId)> {
        if line.trim().is_empty() || line.starts_with('!') {
            return None;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 5 {
            return None;
        }
        let term_id = GoTermId::try_from(cols[4]).ok()?;
        Some((cols[1].to_string(), term_id))
    }

    fn parse_tsv_line(line: &str) -> Option<(String, GoTermId)> {
        if line.trim().is_empty() {
            return None;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 2 {
            return None;
        }
        let term_id = GoTermId::try_from(cols[1].trim_end()).ok()?;
        Some((cols[0].to_string(), term_id))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn gaf_line() {
            let line = "UniProtKB\tP12345\tGENE1\t\tGO:0005488\tGO_REF:0000033\tIBA\t";
            let (source, term) = parse_line(line, AnnotationFormat::Gaf).unwrap();
            assert_eq!(source, "P12345");
            assert_eq!(term, 5488u32.into());
        }

        #[test]
        fn gaf_skips_comments_and_short_lines() {
            assert!(parse_line("!gaf-version: 2.2", AnnotationFormat::Gaf).is_none());
            assert!(parse_line("", AnnotationFormat::Gaf).is_none());
            assert!(parse_line("   ", AnnotationFormat::Gaf).is_none());
            assert!(parse_line("a\tb\tc\td", AnnotationFormat::Gaf).is_none());
            assert!(parse_line("a\tb\tc\td\tnot_a_go_id", AnnotationFormat::Gaf).is_none());
        }

        #[test]
        fn tsv_line() {
            let (source, term) = parse_line(
                "ENSMUSG00000000001\tGO:0016491",
                AnnotationFormat::Tsv,
            )
            .unwrap();
            assert_eq!(source, "ENSMUSG00000000001");
            assert_eq!(term, 16491u32.into());
        }

        #[test]
        fn tsv_skips_short_lines() {
            assert!(parse_line("only_one_column", AnnotationFormat::Tsv).is_none());
            assert!(parse_line("", AnnotationFormat::Tsv).is_none());
        }
    }
}
