pub mod heat2d;

pub use heat2d::HeatSolver;
