use log::info;
use mpi::point_to_point::{send_receive_into_with_tags, Destination, Source};
use mpi::topology::{CartesianCommunicator, SimpleCommunicator};
use mpi::traits::Communicator as _;

use super::comm::{Communicator, Tag};
use crate::coord::{Coord2D, Shape2D};
use crate::error::Error;

enum Handle {
    World(SimpleCommunicator),
    Cartesian(CartesianCommunicator),
}

macro_rules! with_comm {
    ($handle:expr, $comm:ident => $body:expr) => {
        match $handle {
            Handle::World($comm) => $body,
            Handle::Cartesian($comm) => $body,
        }
    };
}

/// A communicator backed by MPI. MPI reports its own errors by aborting the
/// job (the default `MPI_ERRORS_ARE_FATAL` handler), so the point-to-point
/// operations here only fail on arguments MPI cannot represent.
///
pub struct MpiCommunicator {
    handle: Handle,
}

impl MpiCommunicator {
    /// Wrap the world communicator of an initialized MPI universe.
    pub fn world(universe: &mpi::environment::Universe) -> Self {
        Self {
            handle: Handle::World(universe.world()),
        }
    }

    /// Terminate every process of the job with the given error code.
    pub fn abort(&self, code: i32) -> ! {
        with_comm!(&self.handle, comm => comm.abort(code))
    }

    fn mpi_rank(rank: usize) -> Result<mpi::Rank, Error> {
        mpi::Rank::try_from(rank)
            .map_err(|_| Error::Communication(format!("rank {} exceeds the MPI rank range", rank)))
    }
}

impl Communicator for MpiCommunicator {
    fn rank(&self) -> usize {
        with_comm!(&self.handle, comm => comm.rank() as usize)
    }

    fn size(&self) -> usize {
        with_comm!(&self.handle, comm => comm.size() as usize)
    }

    fn send(&self, rank: usize, tag: Tag, message: &[f64]) -> Result<(), Error> {
        let rank = Self::mpi_rank(rank)?;
        with_comm!(&self.handle, comm => comm.process_at_rank(rank).send_with_tag(message, tag));
        Ok(())
    }

    fn receive(&self, rank: usize, tag: Tag) -> Result<Vec<f64>, Error> {
        let rank = Self::mpi_rank(rank)?;
        let (data, _status) = with_comm!(&self.handle, comm => {
            comm.process_at_rank(rank).receive_vec_with_tag::<f64>(tag)
        });
        Ok(data)
    }

    fn send_receive(
        &self,
        rank: usize,
        tag: Tag,
        message: &[f64],
        buffer: &mut [f64],
    ) -> Result<(), Error> {
        let rank = Self::mpi_rank(rank)?;
        with_comm!(&self.handle, comm => {
            let peer = comm.process_at_rank(rank);
            send_receive_into_with_tags(message, &peer, tag, buffer, &peer, tag);
        });
        Ok(())
    }

    fn coordinates(&self, rank: usize, extents: Shape2D) -> Coord2D {
        match &self.handle {
            Handle::Cartesian(cart) => {
                let coords = cart.rank_to_coordinates(rank as mpi::Rank);
                Coord2D::new(coords[0] as usize, coords[1] as usize)
            }
            Handle::World(_) => Coord2D::new(rank / extents.x(), rank % extents.x()),
        }
    }

    fn rank_at(&self, coord: Coord2D, extents: Shape2D) -> usize {
        match &self.handle {
            Handle::Cartesian(cart) => {
                cart.coordinates_to_rank(&[coord.y() as mpi::Count, coord.x() as mpi::Count]) as usize
            }
            Handle::World(_) => coord.y() * extents.x() + coord.x(),
        }
    }

    fn into_cartesian(self, extents: Shape2D) -> Result<Self, Error> {
        let size = self.size();

        if extents.product() != size {
            return Err(Error::DistributionMismatch { extents, size });
        }
        let dims = [
            mpi::Count::try_from(extents.y()).map_err(|e| Error::Communication(e.to_string()))?,
            mpi::Count::try_from(extents.x()).map_err(|e| Error::Communication(e.to_string()))?,
        ];
        let cart = with_comm!(&self.handle, comm => {
            comm.create_cartesian_communicator(&dims, &[false, false], true)
        });
        let cart = cart.ok_or_else(|| {
            Error::Communication("this process is not part of the cartesian communicator".to_string())
        })?;
        if cart.rank() == 0 {
            info!("created {}x{} cartesian communicator", extents.y(), extents.x());
        }

        Ok(Self {
            handle: Handle::Cartesian(cart),
        })
    }
}
