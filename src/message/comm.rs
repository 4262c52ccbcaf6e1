use super::util;
use crate::coord::{Coord2D, Shape2D};
use crate::error::Error;

/// Message tag, used to check that a received message is the one the
/// receiver expects.
pub type Tag = i32;

pub const TAG_GHOST_Y: Tag = 1;
pub const TAG_GHOST_X: Tag = 2;
pub const TAG_BROADCAST: Tag = 10;
pub const TAG_REDUCE: Tag = 11;

/// Interface for a group of processes that exchange arrays of `f64` over a
/// transport. The transport can be MPI, or channels between threads of the
/// same process. Implementors write the point-to-point operations; the trait
/// provides default implementations for broadcast, reduce, and reduce-all.
///
/// Messages between a given pair of ranks are non-overtaking: they are
/// received in the order they were sent.
///
pub trait Communicator: Sized {
    /// Must be implemented to return the rank of this process within the
    /// communicator.
    fn rank(&self) -> usize;

    /// Must be implemented to return the number of peer processes in this
    /// communicator.
    fn size(&self) -> usize;

    /// Must be implemented to send a message to a peer. Implementations may
    /// return before the matching receive is posted, but are not required to.
    fn send(&self, rank: usize, tag: Tag, message: &[f64]) -> Result<(), Error>;

    /// Must be implemented to receive the next message from a specific peer.
    /// This method blocks until the message is available.
    fn receive(&self, rank: usize, tag: Tag) -> Result<Vec<f64>, Error>;

    /// Send `message` to `rank` and receive a message of exactly
    /// `buffer.len()` values from the same peer into `buffer`, as one
    /// matched operation. Two neighbours calling this on each other at the
    /// same time do not deadlock.
    ///
    /// The default implementation is valid only for transports whose `send`
    /// never blocks; blocking transports must override it.
    fn send_receive(
        &self,
        rank: usize,
        tag: Tag,
        message: &[f64],
        buffer: &mut [f64],
    ) -> Result<(), Error> {
        self.send(rank, tag, message)?;
        let received = self.receive(rank, tag)?;

        if received.len() != buffer.len() {
            return Err(Error::Communication(format!(
                "expected {} values from rank {}, received {}",
                buffer.len(),
                rank,
                received.len())));
        }
        buffer.copy_from_slice(&received);
        Ok(())
    }

    /// Return a communicator over the same processes arranged as a
    /// non-periodic 2D process grid with the given extents. The ranks of the
    /// returned communicator may differ from this one's, but are always in
    /// row-major order of the grid coordinates.
    fn into_cartesian(self, extents: Shape2D) -> Result<Self, Error> {
        if extents.product() != self.size() {
            return Err(Error::DistributionMismatch { extents, size: self.size() });
        }
        Ok(self)
    }

    /// Return the grid coordinate of `rank` in the Cartesian communicator
    /// with the given extents. The default numbers the grid in row-major
    /// order; transports that keep their own topology override this.
    ///
    fn coordinates(&self, rank: usize, extents: Shape2D) -> Coord2D {
        Coord2D::new(rank / extents.x(), rank % extents.x())
    }

    /// Return the rank at `coord` in the Cartesian communicator with the
    /// given extents. Must be the inverse of `coordinates`.
    ///
    fn rank_at(&self, coord: Coord2D, extents: Shape2D) -> usize {
        coord.y() * extents.x() + coord.x()
    }

    /// Implements a binomial tree broadcast from rank 0. The message buffer
    /// must be `Some` if this is the root, and it must be `None` otherwise.
    ///
    fn broadcast(&self, value: Option<Vec<f64>>) -> Result<Vec<f64>, Error> {
        let r = self.rank();
        let p = self.size();

        let value = match value {
            Some(value) => value,
            None => self.receive(util::binomial_parent(r), TAG_BROADCAST)?,
        };
        for level in (0..util::ceil_log2(p)).rev() {
            let one = 1 << level;
            let two = 1 << (level + 1);

            if r % two == 0 && r + one < p {
                self.send(r + one, TAG_BROADCAST, &value)?
            }
        }
        Ok(value)
    }

    /// Implements a binomial tree reduce to rank 0. All ranks return `None`
    /// except for the root.
    ///
    fn reduce<F>(&self, f: F, mut value: Vec<f64>) -> Result<Option<Vec<f64>>, Error>
    where
        F: Fn(Vec<f64>, Vec<f64>) -> Vec<f64>,
    {
        let r = self.rank();
        let p = self.size();

        for level in 0..util::ceil_log2(p) {
            let one = 1 << level;
            let two = 1 << (level + 1);

            if r % two == 0 {
                if r + one < p {
                    value = f(value, self.receive(r + one, TAG_REDUCE)?)
                }
            } else {
                self.send(r - one, TAG_REDUCE, &value)?;
                return Ok(None);
            }
        }
        Ok(Some(value))
    }

    /// Implements an all-reduce (symmetric fold) operation over a commutative
    /// binary operator.
    ///
    fn all_reduce<F>(&self, f: F, value: Vec<f64>) -> Result<Vec<f64>, Error>
    where
        F: Fn(Vec<f64>, Vec<f64>) -> Vec<f64>,
    {
        let reduced = self.reduce(f, value)?;
        self.broadcast(reduced)
    }

    /// Sum a scalar over all ranks; every rank gets the result.
    ///
    fn all_reduce_sum(&self, value: f64) -> Result<f64, Error> {
        let total = self.all_reduce(
            |a, b| a.iter().zip(&b).map(|(a, b)| a + b).collect(),
            vec![value])?;
        Ok(total[0])
    }
}
