use log::debug;
use crate::coord::{Coord2D, Dimension2D, Direction2D, Shape2D};
use crate::error::Error;
use crate::message::Communicator;




/**
 * Describes how a 2D array is spread over a non-periodic Cartesian grid of
 * processes, and resolves this process's position and neighbours in that
 * grid. The distribution owns its communicator exclusively; it is not
 * modified after construction, and every query is a pure function of the
 * grid extents and the local rank.
 */
pub struct CartesianDistribution2D<C> {
    comm: C,
    extents: Shape2D,
}




// ============================================================================
impl<C: Communicator> CartesianDistribution2D<C> {

    /**
     * Arrange the processes of `comm` into a grid with the given extents.
     * Ranks may be renumbered by the transport. Fails if the grid does not
     * have exactly one cell per process.
     */
    pub fn new(comm: C, extents: Shape2D) -> Result<Self, Error> {
        if extents.product() != comm.size() {
            return Err(Error::DistributionMismatch { extents, size: comm.size() });
        }
        let comm = comm.into_cartesian(extents)?;
        let distribution = Self { comm, extents };

        debug!(
            "rank {} placed at ({} {}) in {}x{} process grid",
            distribution.rank(),
            distribution.coord().y(),
            distribution.coord().x(),
            extents.y(),
            extents.x());

        Ok(distribution)
    }

    /// The shape of the process grid.
    pub fn extents(&self) -> Shape2D {
        self.extents
    }

    pub fn extent(&self, dim: Dimension2D) -> usize {
        self.extents[dim]
    }

    /// The coordinate of this process in the grid.
    pub fn coord(&self) -> Coord2D {
        self.coord_of(self.rank())
    }

    /**
     * Return the grid coordinate of any rank, as placed by the transport's
     * Cartesian topology.
     */
    pub fn coord_of(&self, rank: usize) -> Coord2D {
        self.comm.coordinates(rank, self.extents)
    }

    /**
     * Return the rank at a grid coordinate, or `None` if the coordinate is
     * outside the grid.
     */
    pub fn rank_of(&self, coord: Coord2D) -> Option<usize> {
        if coord.y() < self.extents.y() && coord.x() < self.extents.x() {
            Some(self.comm.rank_at(coord, self.extents))
        } else {
            None
        }
    }

    /**
     * Return the rank of the adjacent process in the given direction, or
     * `None` if this process is on the physical boundary on that side.
     */
    pub fn neighbour_rank(&self, direction: Direction2D) -> Option<usize> {
        let dim = direction.dimension();
        let mut coord = self.coord();
        coord[dim] = coord[dim].checked_add_signed(direction.displacement())?;
        self.rank_of(coord)
    }

    pub fn size(&self) -> usize {
        self.comm.size()
    }

    pub fn rank(&self) -> usize {
        self.comm.rank()
    }

    /// The Cartesian communicator shared by every field on this distribution.
    pub fn communicator(&self) -> &C {
        &self.comm
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::CartesianDistribution2D;
    use crate::coord::{Coord2D, Direction2D, Shape2D};
    use crate::error::Error;
    use crate::message::comm::Tag;
    use crate::message::{spawn_group, Communicator, LocalCommunicator};

    /// Places ranks in column-major order, as a transport with its own
    /// topology might.
    struct ColumnMajor(LocalCommunicator);

    impl Communicator for ColumnMajor {
        fn rank(&self) -> usize {
            self.0.rank()
        }

        fn size(&self) -> usize {
            self.0.size()
        }

        fn send(&self, rank: usize, tag: Tag, message: &[f64]) -> Result<(), Error> {
            self.0.send(rank, tag, message)
        }

        fn receive(&self, rank: usize, tag: Tag) -> Result<Vec<f64>, Error> {
            self.0.receive(rank, tag)
        }

        fn coordinates(&self, rank: usize, extents: Shape2D) -> Coord2D {
            Coord2D::new(rank % extents.y(), rank / extents.y())
        }

        fn rank_at(&self, coord: Coord2D, extents: Shape2D) -> usize {
            coord.x() * extents.y() + coord.y()
        }
    }

    #[test]
    fn placement_is_taken_from_the_communicator() {
        let comm = ColumnMajor(LocalCommunicator::group(6).remove(4));
        let dist = CartesianDistribution2D::new(comm, Shape2D::new(2, 3)).unwrap();
        assert_eq!(dist.coord(), Coord2D::new(0, 2));
        assert_eq!(dist.neighbour_rank(Direction2D::Up), Some(5));
        assert_eq!(dist.neighbour_rank(Direction2D::Left), Some(2));
        assert_eq!(dist.neighbour_rank(Direction2D::Right), None);
        assert_eq!(dist.neighbour_rank(Direction2D::Down), None);
        assert_eq!(dist.rank_of(Coord2D::new(1, 0)), Some(1));
        assert_eq!(dist.rank_of(Coord2D::new(2, 0)), None);
    }

    #[test]
    fn grid_must_match_communicator_size() {
        let comm = LocalCommunicator::group(1).pop().unwrap();
        let result = CartesianDistribution2D::new(comm, Shape2D::new(2, 1));
        assert!(matches!(
            result,
            Err(Error::DistributionMismatch { size: 1, .. })));
    }

    #[test]
    fn single_process_has_no_neighbours() {
        let comm = LocalCommunicator::group(1).pop().unwrap();
        let dist = CartesianDistribution2D::new(comm, Shape2D::new(1, 1)).unwrap();
        assert_eq!(dist.coord(), Coord2D::new(0, 0));
        for dir in Direction2D::ALL {
            assert_eq!(dist.neighbour_rank(dir), None);
        }
    }

    #[test]
    fn corner_process_of_two_by_two_grid_sees_two_neighbours() {
        let neighbours = spawn_group(4, |comm| {
            let dist = CartesianDistribution2D::new(comm, Shape2D::new(2, 2)).unwrap();
            (dist.coord(), Direction2D::ALL.map(|dir| dist.neighbour_rank(dir)))
        });
        let (coord, [left, right, down, up]) = neighbours[0];
        assert_eq!(coord, Coord2D::new(0, 0));
        assert_eq!(left, None);
        assert_eq!(down, None);
        assert_eq!(right, Some(1));
        assert_eq!(up, Some(2));
    }

    #[test]
    fn neighbour_relation_is_antisymmetric() {
        let extents = Shape2D::new(3, 4);
        let table = spawn_group(12, |comm| {
            let dist = CartesianDistribution2D::new(comm, extents).unwrap();
            Direction2D::ALL.map(|dir| dist.neighbour_rank(dir))
        });
        for (p, neighbours) in table.iter().enumerate() {
            for dir in Direction2D::ALL {
                if let Some(q) = neighbours[dir.index()] {
                    assert_eq!(table[q][dir.opposite().index()], Some(p));
                }
            }
        }
        let boundary = table.iter().flatten().filter(|n| n.is_none()).count();
        assert_eq!(boundary, 2 * (3 + 4));
    }
}
