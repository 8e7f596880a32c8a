
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tabled::{Table, Tabled};

use uuid::Uuid;

use utils::error::*;
use utils::log;
use utils::{Serialize, Deserialize};

///
/// The name of the file scalar summaries are appended to.
///
pub const STAT_FILE : &str = "stat.json";

///
/// One scalar summary, as written to the stat file.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalarRecord 
{
    pub run: Uuid,
    pub epoch: usize,
    pub step: u64,
    pub name: String,
    pub value: f64
}

#[derive(Tabled)]
struct SummaryRow 
{
    epoch: usize,
    step: u64,
    name: String,
    value: String
}

///
/// Collects the scalar summaries of a training run.
///
/// Scalars are kept per epoch in memory, logged, and, when a directory is 
/// given, appended as JSON lines to its stat file.
///
#[derive(Debug)]
pub struct SummaryWriter 
{
    run: Uuid,
    path: Option<PathBuf>,
    epoch: usize,
    step: u64,
    scalars: BTreeMap<usize, (u64, BTreeMap<String, f64>)>
}

impl SummaryWriter 
{
    ///
    /// Returns the value written for a scalar in the given epoch.
    ///
    pub fn get (& self, epoch: usize, name: & str) -> Option<f64>
    {
        self.scalars.get(& epoch).and_then(|(_, values)| values.get(name).copied())
    }

    ///
    /// Returns the most recent value written for a scalar.
    ///
    pub fn latest (& self, name: & str) -> Option<f64>
    {
        self.scalars.values().rev().find_map(|(_, values)| values.get(name).copied())
    }

    ///
    /// Creates a writer that only keeps summaries in memory.
    ///
    pub fn in_memory () -> SummaryWriter 
    {
        SummaryWriter { run: Uuid::new_v4(), path: None, epoch: 0, step: 0, scalars: BTreeMap::new() }
    }

    ///
    /// Creates a writer that also appends to the stat file in `directory`.
    ///
    pub fn new (directory: impl AsRef<Path>) -> Result<SummaryWriter>
    {
        let directory = directory.as_ref();
        fs::create_dir_all(directory).with_context(|| format!("Failed to create summary directory '{}'.", directory.display()))?;

        let mut writer = SummaryWriter::in_memory();
        writer.path = Some(directory.join(STAT_FILE));

        Ok(writer)
    }

    ///
    /// Returns the identifier stamped on every record of this run.
    ///
    pub fn run (& self) -> Uuid 
    {
        self.run
    }

    ///
    /// Sets the epoch and global step that subsequent scalars belong to.
    ///
    pub fn set_position (& mut self, epoch: usize, step: u64)
    {
        self.epoch = epoch;
        self.step = step;
    }

    ///
    /// Renders every scalar written so far as a table.
    ///
    pub fn table (& self) -> String 
    {
        let rows = self.scalars.iter()
            .flat_map(|(epoch, (step, values))| 
            {
                values.iter().map(move |(name, value)| SummaryRow 
                {
                    epoch: * epoch,
                    step: * step,
                    name: name.clone(),
                    value: format!("{:.4}", value)
                })
            })
            .collect::<Vec<_>>();

        Table::new(rows).to_string()
    }

    ///
    /// Records one scalar for the current epoch.
    ///
    pub fn write_scalar_summary (& mut self, name: & str, value: f64) -> Result<()>
    {
        log::info!("{}: {}", name, value);

        let step = self.step;
        let entry = self.scalars.entry(self.epoch).or_insert_with(|| (step, BTreeMap::new()));
        entry.0 = step;
        entry.1.insert(name.to_owned(), value);

        if let Some(path) = & self.path 
        {
            let record = ScalarRecord { run: self.run, epoch: self.epoch, step: self.step, name: name.to_owned(), value };
            utils::append_json_line(& record, path)?;
        }

        Ok(())
    }
}
