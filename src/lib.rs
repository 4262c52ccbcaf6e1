//! Distgrid is a library for block-decomposed 2D structured grids, in the
//! style of SPMD stencil codes. A global grid is cut into equal rectangular
//! blocks, one per process of a Cartesian process grid. Each process holds
//! its block padded with ghost bands, and a halo exchange with its four
//! edge neighbours fills the bands facing other processes, so that stencil
//! updates can be written against purely local memory. Message passing is
//! abstracted behind a `Communicator`, with an in-process implementation on
//! threads and channels and an optional one on MPI.

pub mod coord;
pub mod distribution;
pub mod error;
pub mod field;
pub mod index_space;
pub mod message;
pub mod simulation;
pub mod solvers;
pub mod view;

pub use coord::{Coord2D, Dimension2D, Direction2D, Shape2D};
pub use distribution::CartesianDistribution2D;
pub use error::Error;
pub use field::Distributed2DField;
