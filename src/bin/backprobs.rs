//! Computes per-namespace background probabilities from annotation data
//!
//! ```text
//! backprobs <obo-file> <annotation-file> <output-prefix> [gaf|tsv]
//! ```
//!
//! Writes one table per observed namespace: `<prefix>_BP.tsv`,
//! `<prefix>_MF.tsv` and `<prefix>_CC.tsv`.
use std::env;
use std::process::exit;

use gosim::background::BackgroundEstimator;
use gosim::parser::annotations::{self, AnnotationFormat};
use gosim::{GoResult, Ontology};

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <obo-file> <annotation-file> <output-prefix> [gaf|tsv]");
    eprintln!("Writes <output-prefix>_BP.tsv, _MF.tsv and _CC.tsv");
    exit(1)
}

fn run(obo: &str, annotations: &str, prefix: &str, format: AnnotationFormat) -> GoResult<()> {
    let ontology = Ontology::from_obo(obo)?;
    eprintln!("Loaded ontology with {} terms", ontology.len());

    let observations = annotations::read_annotations(annotations, format)?;
    eprintln!("Read {} observations", observations.len());

    for table in BackgroundEstimator::estimate(&ontology, observations) {
        let path = table.write_tsv(prefix)?;
        println!(
            "Writing {} (normalized by {} observations)",
            path.display(),
            table.observations()
        );
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("backprobs", String::as_str);
    if args.len() < 4 || args.len() > 5 {
        usage(program);
    }

    let format = match args.get(4).map(String::as_str) {
        None | Some("gaf") => AnnotationFormat::Gaf,
        Some("tsv") => AnnotationFormat::Tsv,
        Some(_) => usage(program),
    };

    if let Err(err) = run(&args[1], &args[2], &args[3], format) {
        eprintln!("Error: {err}");
        exit(1);
    }
}
