/**
 * CandReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

extern crate candreco;
extern crate num_cpus;
extern crate getopts;

use std::env;
use std::error::Error;
use std::process;
use getopts::Options;

use candreco::io;
use candreco::stats::InteractionStats;

fn main() {

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required). The input consists of interactions \
        between users and items. The input file must contain an item and user pair per line, \
        separated by a space, with an optional third column holding the interaction \
        weight.", "PATH");
    opts.optopt("o", "outputfile", "Output file name (optional, output will be written to stdout \
        by default).", "PATH");
    opts.optopt("n", "num-candidates", "Number of similar items to consider per profile item \
        (optional, defaults to 10).", "NUMBER");
    opts.optopt("u", "num-users", "Number of most active users to compute candidates for \
        (required).", "NUMBER");
    opts.optflag("j", "json", "Write the output as one JSON object per line instead of \
        space-separated columns.");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    if !matches.opt_present("i") {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an inputfile via --inputfile."),
        );
    }

    if !matches.opt_present("u") {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify the number of users via --num-users."),
        );
    }

    let interactions_path = matches.opt_str("i").unwrap();
    let output_path = matches.opt_str("o");
    let as_json = matches.opt_present("j");

    let top_n: usize = match matches.opt_get_default("n", 10) {
        Ok(top_n) => top_n,
        Err(failure) => {
            let hint = format!("Problem with option 'n': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let top_u: usize = match matches.opt_get_default("u", 0) {
        Ok(top_u) => top_u,
        Err(failure) => {
            let hint = format!("Problem with option 'u': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if let Err(failure) = compute_candidates(&interactions_path, top_n, top_u, output_path, as_json) {
        eprintln!("Error: {}", failure);
        process::exit(1);
    }
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));
}

fn compute_candidates(
    interactions_path: &str,
    top_n: usize,
    top_u: usize,
    output_path: Option<String>,
    as_json: bool,
) -> Result<(), Box<Error>> {

    println!("Reading {}", interactions_path);

    let interactions = io::read_interactions(interactions_path)?;
    let stats = InteractionStats::from(&interactions);

    println!(
        "Found {} interactions between {} users and {} items.",
        stats.num_interactions(),
        stats.num_users(),
        stats.num_items(),
    );

    let records = candreco::user_candidates(
        &interactions,
        &stats,
        num_cpus::get(),
        top_n,
        top_u,
    )?;

    println!("Writing candidates for {} users...", records.len());

    if as_json {
        io::write_user_records_as_json(&records, output_path)?;
    } else {
        io::write_user_records(&records, output_path)?;
    }

    Ok(())
}
