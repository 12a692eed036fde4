//! Trajectory log sinks.
//!
//! The driver emits one [`TrackPoint`] per vehicle per tick. Sinks are
//! write-only; the file-backed sink appends `time x y azimuth` lines with
//! two-decimal fixed formatting to one `UAV<id>.txt` per vehicle.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use uav_domain::{TrackPoint, VehicleId};

use crate::error::Result;

/// Write-only destination for per-tick trajectory samples.
pub trait TrajectorySink {
    /// Append one sample for the given vehicle.
    fn record(&mut self, vehicle_id: VehicleId, point: TrackPoint) -> Result<()>;

    /// Flush any buffered samples to the backing store.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// File-backed sink: one append-only `UAV<id>.txt` per vehicle under the
/// output directory, created on the vehicle's first sample.
pub struct FileTrajectorySink {
    dir: PathBuf,
    writers: HashMap<VehicleId, BufWriter<File>>,
}

impl FileTrajectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, writers: HashMap::new() })
    }

    fn writer_for(&mut self, vehicle_id: VehicleId) -> Result<&mut BufWriter<File>> {
        match self.writers.entry(vehicle_id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.dir.join(format!("UAV{vehicle_id}.txt"));
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Ok(entry.insert(BufWriter::new(file)))
            }
        }
    }
}

impl TrajectorySink for FileTrajectorySink {
    fn record(&mut self, vehicle_id: VehicleId, point: TrackPoint) -> Result<()> {
        let writer = self.writer_for(vehicle_id)?;
        writeln!(writer, "{point}")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryTrajectorySink {
    tracks: HashMap<VehicleId, Vec<TrackPoint>>,
}

impl MemoryTrajectorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples recorded for a vehicle, in emission order.
    pub fn track(&self, vehicle_id: VehicleId) -> &[TrackPoint] {
        self.tracks.get(&vehicle_id).map_or(&[], Vec::as_slice)
    }

    pub fn vehicle_count(&self) -> usize {
        self.tracks.len()
    }
}

impl TrajectorySink for MemoryTrajectorySink {
    fn record(&mut self, vehicle_id: VehicleId, point: TrackPoint) -> Result<()> {
        self.tracks.entry(vehicle_id).or_default().push(point);
        Ok(())
    }
}
