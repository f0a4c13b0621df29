//! Export of run results.
//!
//! - History table as CSV (`generation,objective_1,objective_2`)
//! - JSON snapshot of the distance matrix and the encoded Pareto front

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceProvider;
use crate::error::MtspError;
use crate::ga::{Chromosome, GenerationRecord, RunResult, StopId};

/// Writes the history table as CSV, one row per member per selection.
pub fn write_history_csv<W: Write>(
    history: &[GenerationRecord],
    writer: W,
) -> Result<(), MtspError> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in history {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the history table to a CSV file at `path`.
pub fn write_history_csv_file<P: AsRef<Path>>(
    history: &[GenerationRecord],
    path: P,
) -> Result<(), MtspError> {
    let file = File::create(path)?;
    write_history_csv(history, BufWriter::with_capacity(64 * 1024, file))
}

/// Reads a history table written by [`write_history_csv`].
pub fn read_history_csv<R: Read>(reader: R) -> Result<Vec<GenerationRecord>, MtspError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut records = vec![];
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// One encoded solution with its objectives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionEntry {
    pub encoded: Vec<StopId>,
    pub max_route_cost: f64,
    pub total_cost: f64,
}

/// Self-contained picture of a finished run.
///
/// Holds the full cost matrix so a snapshot can be re-evaluated without
/// access to the original provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub n_buses: usize,
    pub depot: StopId,
    pub generations: usize,
    /// Row-major costs, `matrix[from][to]`.
    pub matrix: Vec<Vec<f64>>,
    /// Pareto front in selection order.
    pub solutions: Vec<SolutionEntry>,
}

impl Snapshot {
    /// Captures the Pareto front of `result` and the costs of `provider`.
    pub fn from_result(
        result: &RunResult,
        provider: &dyn DistanceProvider,
    ) -> Result<Self, MtspError> {
        let size = provider.size();
        let matrix = (0..size)
            .map(|from| {
                (0..size)
                    .map(|to| provider.cost(from, to))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (n_buses, depot) = match result.population.first() {
            Some(c) => (c.n_buses(), c.depot()),
            None => return Err(MtspError::invalid("cannot snapshot an empty population")),
        };

        let solutions = result
            .pareto_front
            .iter()
            .filter_map(|c| {
                c.fitness().map(|f| SolutionEntry {
                    encoded: c.encode(),
                    max_route_cost: f.max_route_cost,
                    total_cost: f.total_cost,
                })
            })
            .collect();

        Ok(Self {
            n_buses,
            depot,
            generations: result.generations,
            matrix,
            solutions,
        })
    }

    /// Rebuilds and validates the chromosomes of the snapshot.
    pub fn chromosomes(&self) -> Result<Vec<Chromosome>, MtspError> {
        let stop_count = self.matrix.len();
        self.solutions
            .iter()
            .map(|s| Chromosome::from_encoded(&s.encoded, self.n_buses, self.depot, stop_count))
            .collect()
    }

    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), MtspError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MtspError> {
        let file = File::create(path)?;
        self.write_json(BufWriter::with_capacity(64 * 1024, file))
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Self, MtspError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
