use super::counter::CounterSnapshot;
use super::gene_pool::GenePool;
use super::species::Species;
use crate::error::Result;
use crate::genes::{Probability, SpeciesId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Structurally faithful image of a gene pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub temperature: Probability,
    pub genes: CounterSnapshot,
    pub species_count: CounterSnapshot,
    pub creatures: CounterSnapshot,
    pub buckets: BTreeMap<SpeciesId, Species>,
}

/// On-disk envelope around a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub saved_at: DateTime<Utc>,
    pub pool: PoolSnapshot,
}

pub fn store<W: Write>(pool: &GenePool, writer: W) -> Result<()> {
    let file = SnapshotFile {
        saved_at: Utc::now(),
        pool: pool.snapshot(),
    };
    serde_json::to_writer(writer, &file)?;
    Ok(())
}

pub fn load<R: Read>(reader: R) -> Result<GenePool> {
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    // evolved creatures can nest far deeper than the default limit
    deserializer.disable_recursion_limit();
    let file = SnapshotFile::deserialize(&mut deserializer)?;
    deserializer.end()?;

    log::info!(
        "Loaded gene pool saved at {} ({} species)",
        file.saved_at.to_rfc3339(),
        file.pool.buckets.len()
    );
    GenePool::from_snapshot(file.pool)
}

pub fn store_to_file<P: AsRef<Path>>(pool: &GenePool, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    store(pool, &mut writer)?;
    writer.flush()?;
    log::info!("Stored gene pool to {}", path.as_ref().display());
    Ok(())
}

pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<GenePool> {
    let reader = BufReader::new(File::open(path)?);
    load(reader)
}
