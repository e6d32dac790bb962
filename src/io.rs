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

extern crate csv;

use std::io;
use std::io::prelude::*;
use std::io::stdout;
use std::fs::File;
use std::path::Path;

use errors::PipelineError;
use types::{Interaction, UserRecord};

/// Reads a whitespace-delimited interactions file. We expect NO headers, and
/// an item-user pair or an item-user-weight triple per line, separated by
/// single spaces. Pairs count as weight 1. Blank lines are skipped.
pub fn read_interactions(file: &str) -> Result<Vec<Interaction>, PipelineError> {

    let mut reader = delimited_reader(file)?;

    let mut interactions = Vec::new();

    for (record_index, result) in reader.records().enumerate() {
        let record = result?;
        let line = record.position().map(|position| position.line())
            .unwrap_or(record_index as u64 + 1);

        // repeated separators produce empty fields, we ignore those
        let fields: Vec<&str> = record.iter().filter(|field| !field.is_empty()).collect();

        if fields.is_empty() {
            continue;
        }

        let interaction = match fields.len() {
            2 => Interaction::unweighted(
                parse_id(fields[0], line)?,
                parse_id(fields[1], line)?,
            ),
            3 => Interaction::new(
                parse_id(fields[0], line)?,
                parse_id(fields[1], line)?,
                parse_weight(fields[2], line)?,
            ),
            num_columns => {
                return Err(PipelineError::InputFormat {
                    line,
                    message: format!("expected 2 or 3 columns, found {}", num_columns),
                });
            },
        };

        interactions.push(interaction);
    }

    Ok(interactions)
}

/// Writes one line per user record:
///
/// `user testItem count candidate_1 ... candidate_K relevance_1 ... relevance_K`
///
/// Relevance scores are written with full precision. If an `output_path` is
/// supplied, we write to a file at the specified path, otherwise, we output
/// to stdout.
pub fn write_user_records(
    records: &[UserRecord],
    output_path: Option<String>,
) -> io::Result<()> {

    let mut out = writer_for(output_path)?;

    for record in records {

        write!(out, "{} {} {}", record.user, record.test_item, record.candidates.len())?;

        for candidate in record.candidates.iter() {
            write!(out, " {}", candidate)?;
        }

        for relevance in record.relevances.iter() {
            write!(out, " {}", relevance)?;
        }

        write!(out, "\n")?;
    }

    Ok(())
}

/// Output the user records in JSON format, one object per line.
pub fn write_user_records_as_json(
    records: &[UserRecord],
    output_path: Option<String>,
) -> io::Result<()> {

    let mut out = writer_for(output_path)?;

    for record in records {
        let record_as_json = json!(record);
        write!(out, "{}\n", record_as_json.to_string())?;
    }

    Ok(())
}

/// Parses a file written by `write_user_records` back into user records,
/// validating the declared candidate count against the actual field count.
pub fn read_user_records(file: &str) -> Result<Vec<UserRecord>, PipelineError> {

    let mut reader = delimited_reader(file)?;

    let mut records = Vec::new();

    for (record_index, result) in reader.records().enumerate() {
        let record = result?;
        let line = record.position().map(|position| position.line())
            .unwrap_or(record_index as u64 + 1);

        let fields: Vec<&str> = record.iter().filter(|field| !field.is_empty()).collect();

        if fields.is_empty() {
            continue;
        }

        if fields.len() < 3 {
            return Err(PipelineError::InputFormat {
                line,
                message: format!("expected at least 3 columns, found {}", fields.len()),
            });
        }

        let user = parse_id(fields[0], line)?;
        let test_item = parse_id(fields[1], line)?;
        let num_candidates = parse_id(fields[2], line)? as usize;

        if fields.len() != 3 + 2 * num_candidates {
            return Err(PipelineError::InputFormat {
                line,
                message: format!(
                    "expected {} columns for {} candidates, found {}",
                    3 + 2 * num_candidates, num_candidates, fields.len()),
            });
        }

        let mut candidates = Vec::with_capacity(num_candidates);
        for field in &fields[3..3 + num_candidates] {
            candidates.push(parse_id(field, line)?);
        }

        let mut relevances = Vec::with_capacity(num_candidates);
        for field in &fields[3 + num_candidates..] {
            relevances.push(parse_weight(field, line)?);
        }

        records.push(UserRecord { user, test_item, candidates, relevances });
    }

    Ok(records)
}

fn delimited_reader(file: &str) -> Result<csv::Reader<File>, csv::Error> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .flexible(true)
        .from_path(file)
}

fn writer_for(output_path: Option<String>) -> io::Result<Box<Write>> {
    let out: Box<Write> = match output_path {
        Some(path) => Box::new(File::create(&Path::new(&path))?),
        _ => Box::new(stdout()),
    };

    Ok(out)
}

fn parse_id(field: &str, line: u64) -> Result<u32, PipelineError> {
    field.parse::<u32>()
        .map_err(|_| PipelineError::InputFormat {
            line,
            message: format!("'{}' is not a valid id", field),
        })
}

fn parse_weight(field: &str, line: u64) -> Result<f64, PipelineError> {
    let weight = field.parse::<f64>()
        .map_err(|_| PipelineError::InputFormat {
            line,
            message: format!("'{}' is not a valid weight", field),
        })?;

    if weight < 0.0 {
        return Err(PipelineError::InputFormat {
            line,
            message: format!("negative weight {}", weight),
        });
    }

    Ok(weight)
}
