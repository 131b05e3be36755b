// Copyright (c) 2018 Fabian Schuiki
#[macro_use]
extern crate clap;
extern crate chomsky;
#[macro_use]
extern crate log;
extern crate memmap;
extern crate stderrlog;

use std::fs::File;
use std::process;
use std::str;

use clap::{App, Arg};
use chomsky::{Cyk, Grammar, Tree, Unger};
use memmap::Mmap;

fn main() {
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about("Parses input with a context-free grammar.")
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .multiple(true)
                .help("Increase message verbosity"),
        )
        .arg(
            Arg::with_name("parser")
                .short("p")
                .long("parser")
                .value_name("PARSER")
                .help("The parsing method to use")
                .takes_value(true)
                .possible_values(&["cyk", "unger", "unger-empty"])
                .default_value("cyk"),
        )
        .arg(
            Arg::with_name("tokens")
                .short("t")
                .long("tokens")
                .help("Split the input at whitespace instead of into characters"),
        )
        .arg(
            Arg::with_name("cnf")
                .long("cnf")
                .help("Print the grammar in Chomsky normal form"),
        )
        .arg(
            Arg::with_name("table")
                .long("table")
                .help("Print the CYK recognition table"),
        )
        .arg(
            Arg::with_name("GRAMMAR")
                .help("The grammar file")
                .required(true),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("The input to parse")
                .required(true),
        )
        .get_matches();

    // Configure the logger.
    let verbose = matches.occurrences_of("verbosity") as usize + 1;
    stderrlog::new()
        .module(module_path!())
        .verbosity(verbose)
        .init()
        .unwrap();

    // Read the grammar.
    let path = matches.value_of("GRAMMAR").unwrap();
    let source = match read_file(path) {
        Ok(source) => source,
        Err(msg) => {
            error!("{}: {}", path, msg);
            process::exit(1);
        }
    };
    let grammar = match Grammar::parse(&source) {
        Ok(grammar) => grammar,
        Err(e) => {
            let (line, column) = e.position(&source);
            error!("{}:{}:{}: {}", path, line, column, e.message());
            process::exit(1);
        }
    };
    info!("read {} rules from {}", grammar.len(), path);

    // Split the input into tokens.
    let input = matches.value_of("INPUT").unwrap();
    let tokens: Vec<String> = if matches.is_present("tokens") {
        input.split_whitespace().map(String::from).collect()
    } else {
        input.chars().map(|c| c.to_string()).collect()
    };

    let parser = matches.value_of("parser").unwrap();
    let trees = match parser {
        "unger" | "unger-empty" => {
            if matches.is_present("cnf") {
                println!("{}", grammar.to_cnf());
            }
            if matches.is_present("table") {
                warn!("--table only applies to the cyk parser");
            }
            let unger = if parser == "unger" {
                Unger::new(&grammar)
            } else {
                Unger::with_epsilon(&grammar)
            };
            unger.parse(&tokens)
        }
        _ => {
            let cyk = Cyk::new(&grammar);
            if matches.is_present("cnf") {
                println!("{}", cyk.grammar());
            }
            if matches.is_present("table") {
                print!("{}", cyk.table(&tokens).pretty(&cyk));
            }
            cyk.parse(&tokens)
        }
    };

    print_trees(&trees);
    if trees.is_empty() {
        println!("input rejected");
        process::exit(1);
    }
}

/// Map a file into memory and decode it.
fn read_file(path: &str) -> Result<String, String> {
    let file = File::open(path).map_err(|e| format!("{}", e))?;
    let len = file.metadata().map_err(|e| format!("{}", e))?.len();
    if len == 0 {
        return Ok(String::new());
    }
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| format!("{}", e))?;
    str::from_utf8(&mmap)
        .map(String::from)
        .map_err(|e| format!("{}", e))
}

fn print_trees(trees: &[Tree]) {
    for (index, tree) in trees.iter().enumerate() {
        println!("--- tree {} of {} ---", index + 1, trees.len());
        print!("{}", tree);
    }
}
