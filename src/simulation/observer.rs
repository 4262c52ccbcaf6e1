use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::SimulationObserver;
use crate::coord::{Coord2D, Shape2D};
use crate::error::Error;
use crate::field::Distributed2DField;
use crate::message::Communicator;




/**
 * Logs the simulation time and the sum of the field over the whole grid
 * every `interval` updates. The sum is a collective operation, so every
 * rank must carry this observer; only rank 0 writes to the log.
 */
pub struct ProgressLogger {
    interval: usize,
    count: usize,
}

impl ProgressLogger {
    pub fn new(interval: usize) -> Self {
        Self { interval: interval.max(1), count: 0 }
    }
}

impl<C: Communicator> SimulationObserver<C> for ProgressLogger {
    fn simulation_updated(&mut self, field: &Distributed2DField<C>) -> Result<(), Error> {
        self.count += 1;

        if self.count % self.interval != 0 {
            return Ok(());
        }
        let local: f64 = field.noghost_view().iter().sum();
        let comm = field.distribution().communicator();
        let total = comm.all_reduce_sum(local)?;

        if comm.rank() == 0 {
            info!("[{}] t={:.6} sum={:+.8e}", self.count, field.time(), total);
        }
        Ok(())
    }
}




#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]


/**
 * The interior of one process's block at one instant, with enough metadata
 * to place it in the global grid.
 */
pub struct Snapshot {
    pub iteration: usize,
    pub time: f64,
    pub rank: usize,
    pub coord: Coord2D,
    pub global_shape: Shape2D,
    pub global_offset: Coord2D,
    pub local_shape: Shape2D,
    pub delta_space: [f64; 2],
    pub values: Vec<f64>,
}




// ============================================================================
impl Snapshot {

    pub fn from_field<C: Communicator>(iteration: usize, field: &Distributed2DField<C>) -> Self {
        Self {
            iteration,
            time: field.time(),
            rank: field.distribution().rank(),
            coord: field.distribution().coord(),
            global_shape: field.global_shape(),
            global_offset: field.global_offset(),
            local_shape: field.local_shape(),
            delta_space: field.delta_space(),
            values: field.noghost_view().to_vec(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let file = File::create(path).map_err(|e| Error::Output(format!("{}: {}", path.display(), e)))?;
        let mut buffer = BufWriter::new(file);
        ciborium::ser::into_writer(self, &mut buffer).map_err(|e| Error::Output(format!("{}: {:?}", path.display(), e)))?;
        buffer.flush().map_err(|e| Error::Output(format!("{}: {}", path.display(), e)))
    }

    pub fn read(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::Output(format!("{}: {}", path.display(), e)))?;
        ciborium::de::from_reader(BufReader::new(file)).map_err(|e| Error::Output(format!("{}: {:?}", path.display(), e)))
    }
}




/**
 * Writes a CBOR snapshot of each rank's interior every `interval` updates,
 * to `<prefix>.<iteration>.<rank>.cbor`.
 */
pub struct SnapshotWriter {
    prefix: PathBuf,
    interval: usize,
    count: usize,
}

impl SnapshotWriter {
    pub fn new<P: Into<PathBuf>>(prefix: P, interval: usize) -> Self {
        Self {
            prefix: prefix.into(),
            interval: interval.max(1),
            count: 0,
        }
    }

    pub fn path_for(&self, iteration: usize, rank: usize) -> PathBuf {
        let mut name = self.prefix.clone().into_os_string();
        name.push(format!(".{:06}.{:04}.cbor", iteration, rank));
        name.into()
    }
}

impl<C: Communicator> SimulationObserver<C> for SnapshotWriter {
    fn simulation_updated(&mut self, field: &Distributed2DField<C>) -> Result<(), Error> {
        self.count += 1;

        if self.count % self.interval != 0 {
            return Ok(());
        }
        let path = self.path_for(self.count, field.distribution().rank());
        Snapshot::from_field(self.count, field).write(&path)?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{ProgressLogger, Snapshot, SnapshotWriter};
    use crate::coord::{Coord2D, Shape2D};
    use crate::field::Distributed2DField;
    use crate::message::{spawn_group, LocalCommunicator};
    use crate::simulation::SimulationObserver;

    #[test]
    fn snapshot_writer_honours_its_interval() {
        let dir = std::env::temp_dir().join(format!("distgrid-snapshot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let comm = LocalCommunicator::group(1).pop().unwrap();
        let mut field = Distributed2DField::from_communicator(comm, Shape2D::new(1, 1), Shape2D::new(2, 3), Shape2D::new(1, 1), [0.5, 0.25]).unwrap();
        field.noghost_view_mut().fill_with(|y, x| (y * 3 + x) as f64);
        field.set_time(1.5);

        let mut writer = SnapshotWriter::new(dir.join("heat"), 2);
        for _ in 0..4 {
            writer.simulation_updated(&field).unwrap();
        }
        assert!(!writer.path_for(1, 0).exists());
        assert!(!writer.path_for(3, 0).exists());

        let snapshot = Snapshot::read(&writer.path_for(4, 0)).unwrap();
        assert_eq!(snapshot.iteration, 4);
        assert_eq!(snapshot.time, 1.5);
        assert_eq!(snapshot.coord, Coord2D::new(0, 0));
        assert_eq!(snapshot.local_shape, Shape2D::new(2, 3));
        assert_eq!(snapshot.values, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn progress_logger_takes_part_in_the_global_sum() {
        let results = spawn_group(3, |comm| {
            let mut field = Distributed2DField::from_communicator(comm, Shape2D::new(3, 1), Shape2D::new(3, 2), Shape2D::new(0, 0), [1.0, 1.0]).unwrap();
            field.noghost_view_mut().fill(1.0);
            let mut logger = ProgressLogger::new(1);
            logger.simulation_updated(&field).is_ok()
        });
        assert!(results.into_iter().all(|ok| ok));
    }
}
