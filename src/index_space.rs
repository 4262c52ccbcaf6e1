use core::ops::Range;
use crate::coord::{Coord2D, Dimension2D, Shape2D};




#[derive(Clone, Debug, PartialEq, Eq)]


/**
 * Represents a rectangular region in the discrete index space of a local
 * buffer. Indexes are `[y, x]`, row-major, with `x` the fast axis.
 */
pub struct IndexSpace {
    dy: Range<usize>,
    dx: Range<usize>,
}




/**
 * Describes a rectangular index space.
 */
impl IndexSpace {


    pub fn new(dy: Range<usize>, dx: Range<usize>) -> Self {

        assert!(
            dy.start <= dy.end && dx.start <= dx.end,
            "index space has negative volume");

        Self { dy, dx }
    }


    /**
     * Return the index space starting at the origin with the given shape.
     */
    pub fn from_shape(shape: Shape2D) -> Self {
        Self::new(0..shape.y(), 0..shape.x())
    }


    /**
     * Return the number of indexes on each axis.
     */
    pub fn dim(&self) -> Shape2D {
        Shape2D::new(self.dy.end - self.dy.start, self.dx.end - self.dx.start)
    }


    /**
     * Return the number of elements in this index space.
     */
    pub fn len(&self) -> usize {
        self.dim().product()
    }


    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /**
     * Return the minimum index (inclusive).
     */
    pub fn start(&self) -> Coord2D {
        Coord2D::new(self.dy.start, self.dx.start)
    }


    /**
     * Return the range covered along the given axis.
     */
    pub fn range(&self, dim: Dimension2D) -> Range<usize> {
        match dim {
            Dimension2D::Y => self.dy.clone(),
            Dimension2D::X => self.dx.clone(),
        }
    }


    /**
     * Determine whether another index space is a subset of this one.
     */
    pub fn contains_space(&self, other: &Self) -> bool {
        other.dy.start >= self.dy.start && other.dy.end <= self.dy.end &&
        other.dx.start >= self.dx.start && other.dx.end <= self.dx.end
    }


    /**
     * Determine whether this index space shares any index with another.
     */
    pub fn intersects(&self, other: &Self) -> bool {
        self.dy.start.max(other.dy.start) < self.dy.end.min(other.dy.end) &&
        self.dx.start.max(other.dx.start) < self.dx.end.min(other.dx.end)
    }


    /**
     * Trim this index space by the given number of elements on both sides
     * of each axis.
     */
    pub fn trim(&self, delta: Shape2D) -> Self {
        Self::new(
            self.dy.start + delta.y() .. self.dy.end - delta.y(),
            self.dx.start + delta.x() .. self.dx.end - delta.x())
    }


    /**
     * Replace the range along one axis, keeping the other.
     */
    pub fn with_range(&self, dim: Dimension2D, range: Range<usize>) -> Self {
        match dim {
            Dimension2D::Y => Self::new(range, self.dx.clone()),
            Dimension2D::X => Self::new(self.dy.clone(), range),
        }
    }


    /**
     * Return a memory region object corresponding to the selection of this
     * index space in the buffer allocated for another one.
     */
    pub fn memory_region_in(&self, parent: &Self) -> MemoryRegion {
        assert!(
            parent.contains_space(self),
            "index space is not contained in its parent");

        let start = self.start() - parent.start();
        let count = self.dim();
        let shape = parent.dim();
        MemoryRegion { start, count, shape }
    }
}




/**
 * A 2D memory region within a contiguous row-major buffer.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryRegion {
    start: Coord2D,
    count: Shape2D,
    shape: Shape2D,
}




// ============================================================================
impl MemoryRegion {

    /// Number of selected elements on each axis.
    pub fn count(&self) -> Shape2D {
        self.count
    }

    /// Shape of the parent buffer.
    pub fn shape(&self) -> Shape2D {
        self.shape
    }

    /**
     * Return the linear offset, in the parent buffer, of the element at the
     * given index relative to the start of the region.
     */
    pub fn offset(&self, index: Coord2D) -> usize {
        (self.start.y() + index.y()) * self.shape.x() + self.start.x() + index.x()
    }

    /**
     * Return the linear offset of the first selected element.
     */
    pub fn base(&self) -> usize {
        self.offset(Coord2D::new(0, 0))
    }

    /**
     * Return the strided layout describing this selection: one block per
     * selected row, each as long as the selected columns, separated by a
     * full parent row.
     */
    pub fn layout(&self) -> StridedLayout {
        StridedLayout::vector(self.count.y(), self.count.x(), self.shape.x())
    }

    pub fn iter_rows<'a>(&'a self, slice: &'a [f64]) -> impl Iterator<Item = &'a [f64]> {
        let start = &self.start;
        let count = &self.count;
        let q = self.shape.x();

        assert!(slice.len() == self.shape.product());

        slice[start.y() * q .. (start.y() + count.y()) * q]
        .chunks_exact(q.max(1)).map(move |row| &row[start.x() .. start.x() + count.x()])
    }

    pub fn iter_rows_mut<'a>(&'a self, slice: &'a mut [f64]) -> impl Iterator<Item = &'a mut [f64]> {
        let start = &self.start;
        let count = &self.count;
        let q = self.shape.x();

        assert!(slice.len() == self.shape.product());

        slice[start.y() * q .. (start.y() + count.y()) * q]
        .chunks_exact_mut(q.max(1)).map(move |row| &mut row[start.x() .. start.x() + count.x()])
    }
}




/**
 * A reusable description of a non-contiguous selection in a flat buffer:
 * `count` blocks of `block_length` contiguous values, the start of each block
 * `stride` values after the previous one. This mirrors an MPI vector
 * datatype. The layout carries no base offset, so a single instance serves
 * every band of the same shape.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StridedLayout {
    count: usize,
    block_length: usize,
    stride: usize,
}




// ============================================================================
impl StridedLayout {

    pub fn vector(count: usize, block_length: usize, stride: usize) -> Self {
        assert!(
            count <= 1 || block_length <= stride,
            "strided layout blocks overlap");
        Self { count, block_length, stride }
    }

    /// Number of values selected by the layout.
    pub fn len(&self) -> usize {
        self.count * self.block_length
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /**
     * Gather the selected values of `buffer`, starting at `offset`, into the
     * front of `packed`.
     */
    pub fn pack(&self, buffer: &[f64], offset: usize, packed: &mut [f64]) {
        let n = self.block_length;

        for (i, out) in packed[..self.len()].chunks_exact_mut(n.max(1)).enumerate() {
            let s = offset + i * self.stride;
            out.copy_from_slice(&buffer[s .. s + n]);
        }
    }

    /**
     * Scatter the front of `packed` into the selected values of `buffer`,
     * starting at `offset`.
     */
    pub fn unpack(&self, packed: &[f64], buffer: &mut [f64], offset: usize) {
        let n = self.block_length;

        for (i, block) in packed[..self.len()].chunks_exact(n.max(1)).enumerate() {
            let s = offset + i * self.stride;
            buffer[s .. s + n].copy_from_slice(block);
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{IndexSpace, StridedLayout};
    use crate::coord::{Coord2D, Shape2D};

    #[test]
    fn trimmed_space_is_selected_at_ghost_offset() {
        let full = IndexSpace::from_shape(Shape2D::new(6, 8));
        let interior = full.trim(Shape2D::new(1, 2));
        assert_eq!(interior, IndexSpace::new(1..5, 2..6));

        let region = interior.memory_region_in(&full);
        assert_eq!(region.count(), Shape2D::new(4, 4));
        assert_eq!(region.base(), 8 + 2);
        assert_eq!(region.offset(Coord2D::new(1, 1)), 2 * 8 + 3);
    }

    #[test]
    fn region_rows_cover_exactly_the_selection() {
        let full = IndexSpace::from_shape(Shape2D::new(4, 5));
        let data: Vec<f64> = (0..20).map(|n| n as f64).collect();
        let region = IndexSpace::new(1..3, 2..4).memory_region_in(&full);
        let rows: Vec<Vec<f64>> = region.iter_rows(&data).map(|r| r.to_vec()).collect();
        assert_eq!(rows, vec![vec![7.0, 8.0], vec![12.0, 13.0]]);
    }

    #[test]
    fn layout_pack_then_unpack_moves_a_band() {
        let full = IndexSpace::from_shape(Shape2D::new(4, 5));
        let mut data: Vec<f64> = (0..20).map(|n| n as f64).collect();
        let source = IndexSpace::new(1..3, 3..4).memory_region_in(&full);
        let target = IndexSpace::new(1..3, 0..1).memory_region_in(&full);
        let layout = source.layout();
        assert_eq!(layout, target.layout());
        assert_eq!(layout.len(), 2);

        let mut packed = vec![0.0; 4];
        layout.pack(&data, source.base(), &mut packed);
        assert_eq!(&packed[..2], &[8.0, 13.0]);

        layout.unpack(&packed, &mut data, target.base());
        assert_eq!(data[5], 8.0);
        assert_eq!(data[10], 13.0);
        assert_eq!(data[6], 6.0);
    }

    #[test]
    fn disjoint_bands_do_not_intersect() {
        let interior = IndexSpace::new(1..5, 1..5);
        assert!(!interior.intersects(&IndexSpace::new(0..1, 1..5)));
        assert!(!interior.intersects(&IndexSpace::new(1..5, 5..6)));
        assert!(interior.intersects(&IndexSpace::new(4..5, 1..5)));
    }

    #[test]
    #[should_panic]
    fn overlapping_layout_blocks_are_rejected() {
        StridedLayout::vector(2, 4, 3);
    }
}
