//! Calculates the similarity between two families of GO terms
//!
//! ```text
//! gosim <obo-file> <probability-table>... <A-list> <B-list>
//! ```
//!
//! Several probability tables can be given, e.g. the `_BP`, `_MF` and
//! `_CC` tables of one `backprobs` run; they are merged into a single
//! lookup. `<A-list>` and `<B-list>` are comma-separated GO ids, e.g.
//! `"GO:0003674,GO:0005488"`. Prints `sim(A,B)` with four decimal places,
//! or an explicit message when the score cannot be computed.
use std::env;
use std::process::exit;

use gosim::background::BackgroundProbs;
use gosim::similarity::Lin;
use gosim::{GoError, GoResult, Ontology, TermFamily};

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <obo-file> <probability-table>... <A-list> <B-list>");
    eprintln!("Where <A-list> and <B-list> are comma-separated GO ids");
    exit(1)
}

fn run(obo: &str, prob_files: &[String], family_a: &str, family_b: &str) -> GoResult<()> {
    let ontology = Ontology::from_obo(obo)?;
    eprintln!("Loaded ontology with {} terms", ontology.len());

    let probs = BackgroundProbs::from_files(prob_files)?;
    if probs.is_empty() {
        return Err(GoError::EmptyProbabilityTable(prob_files.join(", ")));
    }

    let a = TermFamily::from_query(&ontology, family_a)?;
    let b = TermFamily::from_query(&ontology, family_b)?;

    let lin = Lin::new(&probs);
    match a.similarity(&b, &lin) {
        Some(score) => println!("sim(A,B) = {score:.4}"),
        None => println!("Could not compute sim(A,B): missing data or empty families"),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("gosim", String::as_str);
    if args.len() < 5 {
        usage(program);
    }

    // everything between the obo file and the two family lists is a table
    let prob_files = &args[2..args.len() - 2];
    let family_a = &args[args.len() - 2];
    let family_b = &args[args.len() - 1];

    if let Err(err) = run(&args[1], prob_files, family_a, family_b) {
        eprintln!("Error: {err}");
        exit(1);
    }
}
