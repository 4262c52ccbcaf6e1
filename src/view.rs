use core::ops::{Index, IndexMut};
use crate::coord::{Coord2D, Dimension2D, Shape2D};
use crate::index_space::MemoryRegion;




/**
 * A read-only 2D window into a field buffer. The window aliases the buffer;
 * indexes are `(y, x)` relative to the window origin.
 */
#[derive(Clone, Copy)]
pub struct View<'a> {
    data: &'a [f64],
    region: MemoryRegion,
}




/**
 * A modifiable 2D window into a field buffer. Writes through the window land
 * directly in the field's buffer, and are visible through every other view
 * covering the same elements.
 */
pub struct ViewMut<'a> {
    data: &'a mut [f64],
    region: MemoryRegion,
}




// ============================================================================
impl<'a> View<'a> {

    pub(crate) fn new(data: &'a [f64], region: MemoryRegion) -> Self {
        Self { data, region }
    }

    /// Number of elements on each axis of the window.
    pub fn extents(&self) -> Shape2D {
        self.region.count()
    }

    pub fn extent(&self, dim: Dimension2D) -> usize {
        self.region.count()[dim]
    }

    pub fn get(&self, y: usize, x: usize) -> f64 {
        self.data[self.checked_offset(y, x)]
    }

    /**
     * Return a pointer to the window's `(0, 0)` element. Two views alias the
     * same memory exactly when their element pointers coincide.
     */
    pub fn as_ptr(&self) -> *const f64 {
        self.data[self.region.base()..].as_ptr()
    }

    /**
     * Iterate over the rows of the window, each a contiguous slice.
     */
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.region.iter_rows(self.data)
    }

    /**
     * Iterate over all values of the window, in row-major order.
     */
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows().flat_map(|row| row.iter().copied())
    }

    /**
     * Copy the window into a dense row-major vector.
     */
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    fn checked_offset(&self, y: usize, x: usize) -> usize {
        let count = self.region.count();
        if y >= count.y() || x >= count.x() {
            panic!("index ({} {}) out of range on view of shape ({} {})",
                y,
                x,
                count.y(),
                count.x());
        }
        self.region.offset(Coord2D::new(y, x))
    }
}

impl<'a> Index<(usize, usize)> for View<'a> {
    type Output = f64;

    fn index(&self, (y, x): (usize, usize)) -> &Self::Output {
        &self.data[self.checked_offset(y, x)]
    }
}




// ============================================================================
impl<'a> ViewMut<'a> {

    pub(crate) fn new(data: &'a mut [f64], region: MemoryRegion) -> Self {
        Self { data, region }
    }

    /**
     * Reborrow this window as a read-only view.
     */
    pub fn as_view(&self) -> View<'_> {
        View::new(&self.data[..], self.region)
    }

    pub fn extents(&self) -> Shape2D {
        self.region.count()
    }

    pub fn extent(&self, dim: Dimension2D) -> usize {
        self.region.count()[dim]
    }

    pub fn get(&self, y: usize, x: usize) -> f64 {
        self.as_view().get(y, x)
    }

    pub fn set(&mut self, y: usize, x: usize, value: f64) {
        let n = self.as_view().checked_offset(y, x);
        self.data[n] = value;
    }

    /**
     * Set every element of the window to the same value.
     */
    pub fn fill(&mut self, value: f64) {
        for row in self.rows_mut() {
            row.fill(value)
        }
    }

    /**
     * Set every element of the window from a closure of its `(y, x)` index.
     */
    pub fn fill_with<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> f64,
    {
        for (y, row) in self.rows_mut().enumerate() {
            for (x, value) in row.iter_mut().enumerate() {
                *value = f(y, x)
            }
        }
    }

    /**
     * Iterate over the rows of the window as disjoint mutable slices.
     */
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [f64]> + '_ {
        let region = &self.region;
        region.iter_rows_mut(&mut self.data[..])
    }
}

impl<'a> Index<(usize, usize)> for ViewMut<'a> {
    type Output = f64;

    fn index(&self, (y, x): (usize, usize)) -> &Self::Output {
        let n = self.as_view().checked_offset(y, x);
        &self.data[n]
    }
}

impl<'a> IndexMut<(usize, usize)> for ViewMut<'a> {
    fn index_mut(&mut self, (y, x): (usize, usize)) -> &mut Self::Output {
        let n = self.as_view().checked_offset(y, x);
        &mut self.data[n]
    }
}
