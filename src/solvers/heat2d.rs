use log::warn;
use rayon::prelude::*;

use crate::coord::{Dimension2D, Shape2D};
use crate::error::Error;
use crate::field::Distributed2DField;
use crate::simulation::TimeStep;

const NUM_GUARD: usize = 1;

/// An explicit, first-order in time, second-order in space update for the
/// heat equation `du/dt = k (d2u/dy2 + d2u/dx2)`, on the five-point stencil.
///
pub struct HeatSolver {
    delta_t: f64,
    diffusivity: f64,
}

impl HeatSolver {
    pub fn new(delta_t: f64, diffusivity: f64) -> Self {
        Self { delta_t, diffusivity }
    }

    /// The largest time step for which the update is stable on a grid with
    /// the given spacing.
    pub fn stable_delta_t(&self, delta_space: [f64; 2]) -> f64 {
        let [dy, dx] = delta_space;
        0.5 / (self.diffusivity * (1.0 / (dy * dy) + 1.0 / (dx * dx)))
    }
}

impl<C> TimeStep<C> for HeatSolver {
    fn iter(&self, current: &Distributed2DField<C>, next: &mut Distributed2DField<C>) -> Result<(), Error> {
        let ghosts = current.ghost_sizes();

        if ghosts.y() < NUM_GUARD || ghosts.x() < NUM_GUARD {
            return Err(Error::InvalidConfiguration(format!(
                "heat solver needs {} ghost cells per side, field has {}x{}",
                NUM_GUARD,
                ghosts.y(),
                ghosts.x())));
        }
        if self.delta_t > self.stable_delta_t(current.delta_space()) {
            warn!(
                "time step {} exceeds the stability limit {}",
                self.delta_t,
                self.stable_delta_t(current.delta_space()));
        }

        let u = current.full_view();
        let (gy, gx) = (ghosts.y(), ghosts.x());
        let cy = self.diffusivity * self.delta_t / current.delta(Dimension2D::Y).powi(2);
        let cx = self.diffusivity * self.delta_t / current.delta(Dimension2D::X).powi(2);

        let mut target = next.noghost_view_mut();
        let rows: Vec<&mut [f64]> = target.rows_mut().collect();

        rows.into_par_iter().enumerate().for_each(|(y, row)| {
            let i = y + gy;
            for (x, value) in row.iter_mut().enumerate() {
                let j = x + gx;
                let c = u.get(i, j);
                *value = c
                    + cy * (u.get(i - 1, j) - 2.0 * c + u.get(i + 1, j))
                    + cx * (u.get(i, j - 1) - 2.0 * c + u.get(i, j + 1));
            }
        });
        Ok(())
    }

    fn required_ghosts(&self) -> Shape2D {
        Shape2D::new(NUM_GUARD, NUM_GUARD)
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::HeatSolver;
    use crate::coord::Shape2D;
    use crate::field::Distributed2DField;
    use crate::message::{spawn_group, LocalCommunicator};
    use crate::simulation::{Configuration, HotSpotInitializer, Simulation, TimeStep, UniformInitializer};

    #[test]
    fn uniform_field_is_stationary() {
        let comm = LocalCommunicator::group(1).pop().unwrap();
        let config = Configuration::new(5, Shape2D::new(6, 4), Shape2D::new(1, 1), 0.01, [0.5, 0.5]);
        let mut sim = Simulation::new(comm, config, Box::new(HeatSolver::new(0.01, 1.0)), &UniformInitializer::new(3.0)).unwrap();
        sim.run().unwrap();
        assert!(sim.field().noghost_view().iter().all(|v| (v - 3.0).abs() < 1e-12));
    }

    #[test]
    fn point_source_spreads_to_its_four_neighbours() {
        let comm = LocalCommunicator::group(1).pop().unwrap();
        let mut current = Distributed2DField::from_communicator(comm, Shape2D::new(1, 1), Shape2D::new(3, 3), Shape2D::new(1, 1), [1.0, 1.0]).unwrap();
        let mut next = current.clone();
        current.noghost_view_mut().set(1, 1, 1.0);

        HeatSolver::new(0.1, 1.0).iter(&current, &mut next).unwrap();
        let v = next.noghost_view();
        assert!((v.get(1, 1) - 0.6).abs() < 1e-12);
        assert!((v.get(0, 1) - 0.1).abs() < 1e-12);
        assert!((v.get(1, 2) - 0.1).abs() < 1e-12);
        assert_eq!(v.get(0, 0), 0.0);
    }

    #[test]
    fn missing_ghosts_are_reported() {
        let comm = LocalCommunicator::group(1).pop().unwrap();
        let current = Distributed2DField::from_communicator(comm, Shape2D::new(1, 1), Shape2D::new(3, 3), Shape2D::new(0, 1), [1.0, 1.0]).unwrap();
        let mut next = current.clone();
        assert!(HeatSolver::new(0.1, 1.0).iter(&current, &mut next).is_err());
    }

    #[test]
    fn decomposition_does_not_change_the_solution() {
        let run = |dist: Shape2D| {
            let mut blocks = spawn_group(dist.product(), move |comm| {
                let config = Configuration::new(20, Shape2D::new(8, 8), dist, 0.05, [0.5, 0.5]);
                let solver = HeatSolver::new(config.delta_t(), 1.0);
                let mut sim = Simulation::new(comm, config, Box::new(solver), &HotSpotInitializer::new(0.0, 1.0, 0.3)).unwrap();
                sim.run().unwrap();
                (sim.field().global_offset(), sim.field().local_shape(), sim.field().noghost_view().to_vec())
            });

            let mut global = vec![0.0; 64];
            for (offset, shape, values) in blocks.drain(..) {
                for y in 0..shape.y() {
                    for x in 0..shape.x() {
                        global[(offset.y() + y) * 8 + offset.x() + x] = values[y * shape.x() + x];
                    }
                }
            }
            global
        };

        let serial = run(Shape2D::new(1, 1));
        for dist in [Shape2D::new(2, 2), Shape2D::new(4, 1), Shape2D::new(1, 2)] {
            let parallel = run(dist);
            for (a, b) in serial.iter().zip(&parallel) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }
}
