use core::ops::{Add, Div, Index, IndexMut, Mul, Sub};
use serde::{Deserialize, Serialize};




/**
 * Identifier for one of the two axes of the process grid and of the local
 * buffers. `Y` is the slow (row) axis and `X` the fast (column) axis.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension2D {
    Y,
    X,
}




// ============================================================================
impl Dimension2D {

    /// Both dimensions, in the order ghost exchanges visit them.
    pub const ALL: [Dimension2D; 2] = [Dimension2D::Y, Dimension2D::X];

    pub fn index(self) -> usize {
        match self {
            Dimension2D::Y => 0,
            Dimension2D::X => 1,
        }
    }

    /**
     * Return the two directions pointing along this axis, lower side first.
     */
    pub fn directions(self) -> [Direction2D; 2] {
        match self {
            Dimension2D::Y => [Direction2D::Down, Direction2D::Up],
            Dimension2D::X => [Direction2D::Left, Direction2D::Right],
        }
    }
}




/**
 * One of the four sides of a 2D block. `Up` and `Right` point towards
 * increasing coordinates along `Y` and `X` respectively.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction2D {
    Left,
    Right,
    Down,
    Up,
}




// ============================================================================
impl Direction2D {

    pub const ALL: [Direction2D; 4] = [
        Direction2D::Left,
        Direction2D::Right,
        Direction2D::Down,
        Direction2D::Up,
    ];

    /**
     * Return a dense index in `0..4`, suitable for per-direction tables.
     */
    pub fn index(self) -> usize {
        match self {
            Direction2D::Left => 0,
            Direction2D::Right => 1,
            Direction2D::Down => 2,
            Direction2D::Up => 3,
        }
    }

    /**
     * Return the axis this direction points along.
     */
    pub fn dimension(self) -> Dimension2D {
        match self {
            Direction2D::Left | Direction2D::Right => Dimension2D::X,
            Direction2D::Down | Direction2D::Up => Dimension2D::Y,
        }
    }

    /**
     * Return the unit displacement (-1 or +1) along `self.dimension()`.
     */
    pub fn displacement(self) -> isize {
        match self {
            Direction2D::Left | Direction2D::Down => -1,
            Direction2D::Right | Direction2D::Up => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction2D::Left => Direction2D::Right,
            Direction2D::Right => Direction2D::Left,
            Direction2D::Down => Direction2D::Up,
            Direction2D::Up => Direction2D::Down,
        }
    }
}




/**
 * A two-component vector over a generic scalar type T, indexed by
 * `Dimension2D` and supporting component-wise arithmetic wherever T does.
 * Components are stored in `[Y, X]` order.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector2D<T> {
    data: [T; 2],
}

/// A position in the process grid or in a buffer, as `[y, x]`.
pub type Coord2D = Vector2D<usize>;

/// A number of elements along each axis, as `[y, x]`.
pub type Shape2D = Vector2D<usize>;




// ============================================================================
impl<T: Copy> Vector2D<T> {

    pub const fn new(y: T, x: T) -> Self {
        Self { data: [y, x] }
    }

    pub fn y(&self) -> T {
        self.data[0]
    }

    pub fn x(&self) -> T {
        self.data[1]
    }
}

impl<T: Copy + Mul<Output = T>> Vector2D<T> {

    /**
     * Return the product of the components; the element count for a shape.
     */
    pub fn product(&self) -> T {
        self.data[0] * self.data[1]
    }
}





// ============================================================================
impl<T, U, V> Add<Vector2D<U>> for Vector2D<T>
where
    T: Copy + Add<U, Output = V>,
    U: Copy,
{
    type Output = Vector2D<V>;

    fn add(self, other: Vector2D<U>) -> Self::Output {
        Vector2D { data: [self.data[0] + other.data[0], self.data[1] + other.data[1]] }
    }
}

impl<T, U, V> Sub<Vector2D<U>> for Vector2D<T>
where
    T: Copy + Sub<U, Output = V>,
    U: Copy,
{
    type Output = Vector2D<V>;

    fn sub(self, other: Vector2D<U>) -> Self::Output {
        Vector2D { data: [self.data[0] - other.data[0], self.data[1] - other.data[1]] }
    }
}

impl<T, U, V> Mul<Vector2D<U>> for Vector2D<T>
where
    T: Copy + Mul<U, Output = V>,
    U: Copy,
{
    type Output = Vector2D<V>;

    fn mul(self, other: Vector2D<U>) -> Self::Output {
        Vector2D { data: [self.data[0] * other.data[0], self.data[1] * other.data[1]] }
    }
}

impl<T, U, V> Div<Vector2D<U>> for Vector2D<T>
where
    T: Copy + Div<U, Output = V>,
    U: Copy,
{
    type Output = Vector2D<V>;

    fn div(self, other: Vector2D<U>) -> Self::Output {
        Vector2D { data: [self.data[0] / other.data[0], self.data[1] / other.data[1]] }
    }
}




// ============================================================================
impl<T> Index<Dimension2D> for Vector2D<T> {
    type Output = T;

    fn index(&self, dim: Dimension2D) -> &Self::Output {
        &self.data[dim.index()]
    }
}

impl<T> IndexMut<Dimension2D> for Vector2D<T> {
    fn index_mut(&mut self, dim: Dimension2D) -> &mut Self::Output {
        &mut self.data[dim.index()]
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{Dimension2D, Direction2D, Shape2D};

    #[test]
    fn component_wise_arithmetic_works() {
        let global = Shape2D::new(12, 8);
        let dist = Shape2D::new(3, 2);
        let ghost = Shape2D::new(1, 2);
        let local = global / dist;
        assert_eq!(local, Shape2D::new(4, 4));
        assert_eq!(local + ghost + ghost, Shape2D::new(6, 8));
        assert_eq!(local * dist, global);
        assert_eq!(dist.product(), 6);
    }

    #[test]
    fn vectors_are_indexed_by_dimension() {
        let mut shape = Shape2D::new(3, 5);
        assert_eq!(shape[Dimension2D::Y], 3);
        assert_eq!(shape[Dimension2D::X], 5);
        shape[Dimension2D::X] = 7;
        assert_eq!(shape, Shape2D::new(3, 7));
    }

    #[test]
    fn directions_pair_up_along_their_axis() {
        for dir in Direction2D::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.opposite().dimension(), dir.dimension());
            assert_eq!(dir.opposite().displacement(), -dir.displacement());
            assert!(dir.dimension().directions().contains(&dir));
        }
        assert_eq!(Dimension2D::Y.directions(), [Direction2D::Down, Direction2D::Up]);
        assert_eq!(Dimension2D::X.directions(), [Direction2D::Left, Direction2D::Right]);
    }

    #[test]
    fn direction_indexes_are_dense() {
        let mut seen = [false; 4];
        for dir in Direction2D::ALL {
            seen[dir.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
