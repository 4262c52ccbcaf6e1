use std::rc::Rc;

use log::{debug, warn};

use crate::coord::{Coord2D, Dimension2D, Direction2D, Shape2D};
use crate::distribution::CartesianDistribution2D;
use crate::error::Error;
use crate::index_space::{IndexSpace, StridedLayout};
use crate::message::comm::{TAG_GHOST_X, TAG_GHOST_Y};
use crate::message::Communicator;
use crate::view::{View, ViewMut};




/**
 * The local block of a 2D array of `f64` distributed over a Cartesian
 * process grid, padded by ghost cells on every side.
 *
 * The values live in one contiguous row-major buffer covering the full
 * (padded) block. Every view handed out by the field aliases a sub-range of
 * that buffer: the full view, the interior ("noghost") view, and one ghost
 * band per direction. The interior and the four ghost bands are pairwise
 * disjoint; the corners of the padding belong to no band.
 *
 * `sync_ghosts` fills each ghost band that faces a neighbouring process with
 * the neighbour's interior values. Ghost bands on the physical boundary are
 * never written by the field.
 */
pub struct Distributed2DField<C> {
    distribution: Rc<CartesianDistribution2D<C>>,
    data: Vec<f64>,
    time: f64,
    delta_space: [f64; 2],
    global_shape: Shape2D,
    ghost_sizes: Shape2D,
    full: IndexSpace,
    noghost: IndexSpace,
    ghosts: [IndexSpace; 4],
    ghost_row: StridedLayout,
    ghost_col: StridedLayout,
    send_offsets: [usize; 4],
    recv_offsets: [usize; 4],
    send_buffer: Vec<f64>,
    recv_buffer: Vec<f64>,
}




// ============================================================================
impl<C: Communicator> Distributed2DField<C> {

    /**
     * Allocate the local block of a `global_shape` array distributed over
     * `distribution`, with `ghost_sizes` ghost cells on each side of each
     * axis. The interior and ghosts are zero-initialized and the time is 0.
     *
     * Fails if a process-grid extent does not divide the corresponding
     * global extent. A ghost band may be wider than the local interior; on
     * an axis with more than one process the band sent to a neighbour then
     * reaches into the ghost padding on the far side.
     */
    pub fn new(
        distribution: Rc<CartesianDistribution2D<C>>,
        global_shape: Shape2D,
        ghost_sizes: Shape2D,
        delta_space: [f64; 2],
    ) -> Result<Self, Error> {
        let dist_shape = distribution.extents();

        for dim in Dimension2D::ALL {
            if dist_shape[dim] == 0 || global_shape[dim] % dist_shape[dim] != 0 {
                return Err(Error::IndivisibleShape {
                    dimension: dim,
                    global: global_shape[dim],
                    distributed: dist_shape[dim],
                });
            }
        }
        let local = global_shape / dist_shape;

        for dim in Dimension2D::ALL {
            if ghost_sizes[dim] > local[dim] && dist_shape[dim] > 1 {
                warn!(
                    "ghost width {} exceeds local extent {} along {:?}",
                    ghost_sizes[dim],
                    local[dim],
                    dim);
            }
        }
        let full = IndexSpace::from_shape(local + ghost_sizes + ghost_sizes);
        let noghost = full.trim(ghost_sizes);
        let ghosts = Direction2D::ALL.map(|dir| ghost_space(&noghost, ghost_sizes, dir));
        let sources = Direction2D::ALL.map(|dir| source_space(&noghost, ghost_sizes, dir));

        let ghost_row = ghosts[Direction2D::Up.index()].memory_region_in(&full).layout();
        let ghost_col = ghosts[Direction2D::Right.index()].memory_region_in(&full).layout();
        let send_offsets = sources.map(|s| s.memory_region_in(&full).base());
        let recv_offsets = ghosts.clone().map(|g| g.memory_region_in(&full).base());
        let staging = ghost_row.len().max(ghost_col.len());

        debug!(
            "allocated {}x{} local block ({}x{} interior) of {}x{} field",
            full.dim().y(),
            full.dim().x(),
            local.y(),
            local.x(),
            global_shape.y(),
            global_shape.x());

        Ok(Self {
            distribution,
            data: vec![0.0; full.len()],
            time: 0.0,
            delta_space,
            global_shape,
            ghost_sizes,
            full,
            noghost,
            ghosts,
            ghost_row,
            ghost_col,
            send_offsets,
            recv_offsets,
            send_buffer: vec![0.0; staging],
            recv_buffer: vec![0.0; staging],
        })
    }

    /**
     * Build the distribution from a communicator and process-grid shape,
     * and allocate a field over it.
     */
    pub fn from_communicator(
        comm: C,
        dist_shape: Shape2D,
        global_shape: Shape2D,
        ghost_sizes: Shape2D,
        delta_space: [f64; 2],
    ) -> Result<Self, Error> {
        let distribution = Rc::new(CartesianDistribution2D::new(comm, dist_shape)?);
        Self::new(distribution, global_shape, ghost_sizes, delta_space)
    }

    /**
     * Fill the ghost bands facing neighbouring processes with the values of
     * those neighbours' interiors. The `Y` axis is completed before the `X`
     * axis. For each direction with a neighbour, the interior band of width
     * `ghost[d]` along that edge is sent, and the ghost band on that side is
     * overwritten with what the neighbour sends back. Ghost bands on the
     * physical boundary, and the corner cells of the padding, are left as
     * they were.
     *
     * Blocks until the exchanges with all neighbours have completed.
     */
    pub fn sync_ghosts(&mut self) -> Result<(), Error> {
        let comm = self.distribution.communicator();

        for dim in Dimension2D::ALL {
            let (layout, tag) = match dim {
                Dimension2D::Y => (self.ghost_row, TAG_GHOST_Y),
                Dimension2D::X => (self.ghost_col, TAG_GHOST_X),
            };
            let n = layout.len();

            for dir in dim.directions() {
                let peer = match self.distribution.neighbour_rank(dir) {
                    Some(peer) => peer,
                    None => continue,
                };
                let send = &mut self.send_buffer[..n];
                let recv = &mut self.recv_buffer[..n];

                layout.pack(&self.data, self.send_offsets[dir.index()], send);
                comm.send_receive(peer, tag, send, recv)?;
                layout.unpack(recv, &mut self.data, self.recv_offsets[dir.index()]);

                debug!("rank {} exchanged {} values {:?} with rank {}", comm.rank(), n, dir, peer);
            }
        }
        Ok(())
    }
}




// ============================================================================
impl<C> Distributed2DField<C> {

    /**
     * Exchange the contents of two fields, including their buffers and
     * views, without copying any values.
     */
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other)
    }

    /// A view of the whole local block, ghosts included.
    pub fn full_view(&self) -> View<'_> {
        View::new(&self.data, self.full.memory_region_in(&self.full))
    }

    pub fn full_view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::new(&mut self.data, self.full.memory_region_in(&self.full))
    }

    /// A view of the interior of the local block, ghosts excluded.
    pub fn noghost_view(&self) -> View<'_> {
        View::new(&self.data, self.noghost.memory_region_in(&self.full))
    }

    pub fn noghost_view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::new(&mut self.data, self.noghost.memory_region_in(&self.full))
    }

    /// A view of the ghost band on the given side of the interior.
    pub fn ghost_view(&self, direction: Direction2D) -> View<'_> {
        View::new(&self.data, self.ghosts[direction.index()].memory_region_in(&self.full))
    }

    pub fn ghost_view_mut(&mut self, direction: Direction2D) -> ViewMut<'_> {
        let region = self.ghosts[direction.index()].memory_region_in(&self.full);
        ViewMut::new(&mut self.data, region)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time
    }

    /// The distance between consecutive grid points along `[y, x]`.
    pub fn delta_space(&self) -> [f64; 2] {
        self.delta_space
    }

    pub fn delta(&self, dim: Dimension2D) -> f64 {
        self.delta_space[dim.index()]
    }

    pub fn distribution(&self) -> &CartesianDistribution2D<C> {
        &self.distribution
    }

    pub fn global_shape(&self) -> Shape2D {
        self.global_shape
    }

    pub fn ghost_sizes(&self) -> Shape2D {
        self.ghost_sizes
    }

    /// The shape of the interior of the local block.
    pub fn local_shape(&self) -> Shape2D {
        self.noghost.dim()
    }

    /**
     * Return the global index of the first interior point of this block.
     */
    pub fn global_offset(&self) -> Coord2D
    where
        C: Communicator,
    {
        self.distribution.coord() * self.local_shape()
    }
}

impl<C> Clone for Distributed2DField<C> {
    fn clone(&self) -> Self {
        Self {
            distribution: Rc::clone(&self.distribution),
            data: self.data.clone(),
            time: self.time,
            delta_space: self.delta_space,
            global_shape: self.global_shape,
            ghost_sizes: self.ghost_sizes,
            full: self.full.clone(),
            noghost: self.noghost.clone(),
            ghosts: self.ghosts.clone(),
            ghost_row: self.ghost_row,
            ghost_col: self.ghost_col,
            send_offsets: self.send_offsets,
            recv_offsets: self.recv_offsets,
            send_buffer: self.send_buffer.clone(),
            recv_buffer: self.recv_buffer.clone(),
        }
    }
}




/**
 * The padding band just outside `interior` on the given side, spanning the
 * interior along the other axis.
 */
fn ghost_space(interior: &IndexSpace, ghost: Shape2D, direction: Direction2D) -> IndexSpace {
    let dim = direction.dimension();
    let r = interior.range(dim);
    let g = ghost[dim];

    match direction.displacement() {
        d if d < 0 => interior.with_range(dim, r.start - g .. r.start),
        _ => interior.with_range(dim, r.end .. r.end + g),
    }
}

/**
 * The band just inside `interior` on the given side, as wide as the ghost
 * band there. This is what the neighbour on that side receives.
 */
fn source_space(interior: &IndexSpace, ghost: Shape2D, direction: Direction2D) -> IndexSpace {
    let dim = direction.dimension();
    let r = interior.range(dim);
    let g = ghost[dim];

    match direction.displacement() {
        d if d < 0 => interior.with_range(dim, r.start .. r.start + g),
        _ => interior.with_range(dim, r.end - g .. r.end),
    }
}
