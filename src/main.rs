use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rustyline::{error::ReadlineError, Editor};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use drc::{ast::VariableName, format::join_line, parse_wants, Facts, Store};

/// Evaluates a domain relational calculus query over a fact file.
///
/// Example:
///
///     drc S,SD,L 'student(S,SD) && immatriculated(S, "2016") && registered(S,L)' < facts.txt
#[derive(Debug, StructOpt)]
#[structopt(name = "drc")]
struct Opt {
    /// Log every stage, including the generated SQL, to stderr
    #[structopt(long)]
    debug: bool,

    /// Read facts from this file instead of stdin
    #[structopt(long, parse(from_os_str))]
    facts: Option<PathBuf>,

    /// Output variables, separated by commas or whitespace
    wants: String,

    /// The query; when omitted, queries are read interactively
    query: Option<String>,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("drc=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_facts(path: Option<&PathBuf>) -> Result<Facts> {
    let facts = match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Facts::from_reader(BufReader::new(file))?
        }
        None => Facts::from_reader(io::stdin().lock())?,
    };
    Ok(facts)
}

fn handle_input(
    facts: &Facts,
    store: &Store,
    wants: &[VariableName],
    code: &str,
) -> Result<Vec<String>> {
    let query = drc::compile(&facts.schema, wants, code)?;
    let rows = store.execute(&query)?;
    Ok(rows.iter().map(|row| join_line(row.as_slice())).collect())
}

fn interactive(facts: &Facts, store: &Store, wants: &[VariableName]) -> Result<()> {
    let mut editor = Editor::<()>::new();
    loop {
        let readline = editor.readline("drc> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str());

                match handle_input(facts, store, wants, &line) {
                    Ok(lines) => {
                        for line in lines {
                            println!("{}", line);
                        }
                    }
                    Err(e) => {
                        println!("Error: {:#}", e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    init_logging(opt.debug);

    let wants = parse_wants(&opt.wants);
    if opt.query.is_none() && opt.facts.is_none() {
        bail!("Interactive mode reads queries from the terminal; pass the facts with --facts");
    }

    let facts = load_facts(opt.facts.as_ref()).context("Failed to load facts")?;
    let store = Store::load(&facts).context("Failed to build the database")?;

    match &opt.query {
        Some(code) => {
            for line in handle_input(&facts, &store, &wants, code)? {
                println!("{}", line);
            }
            Ok(())
        }
        None => interactive(&facts, &store, &wants),
    }
}
