use serde::{Deserialize, Serialize};
use crate::coord::{Dimension2D, Shape2D};
use crate::error::Error;




#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]


/**
 * The parameters of a simulation run: how many steps to take, the size of
 * the global grid and of the process grid, and the time and space steps.
 */
pub struct Configuration {
    nb_iter: usize,
    global_shape: Shape2D,
    dist_extents: Shape2D,
    delta_t: f64,
    delta_space: [f64; 2],
}




// ============================================================================
impl Configuration {

    pub fn new(
        nb_iter: usize,
        global_shape: Shape2D,
        dist_extents: Shape2D,
        delta_t: f64,
        delta_space: [f64; 2],
    ) -> Self {
        Self {
            nb_iter,
            global_shape,
            dist_extents,
            delta_t,
            delta_space,
        }
    }

    /**
     * Check that every extent is non-zero and every step is a positive,
     * finite number. Divisibility of the global shape by the process grid is
     * left to the field, which reports it with the dimension at fault.
     */
    pub fn validate(&self) -> Result<(), Error> {
        for dim in Dimension2D::ALL {
            if self.global_shape[dim] == 0 {
                return Err(Error::InvalidConfiguration(format!("global shape is empty along {:?}", dim)));
            }
            if self.dist_extents[dim] == 0 {
                return Err(Error::InvalidConfiguration(format!("process grid is empty along {:?}", dim)));
            }
            let d = self.delta_space[dim.index()];
            if !(d.is_finite() && d > 0.0) {
                return Err(Error::InvalidConfiguration(format!("space step {} along {:?} is not positive", d, dim)));
            }
        }
        if !(self.delta_t.is_finite() && self.delta_t > 0.0) {
            return Err(Error::InvalidConfiguration(format!("time step {} is not positive", self.delta_t)));
        }
        Ok(())
    }

    pub fn nb_iter(&self) -> usize {
        self.nb_iter
    }

    pub fn global_shape(&self) -> Shape2D {
        self.global_shape
    }

    pub fn dist_extents(&self) -> Shape2D {
        self.dist_extents
    }

    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }

    pub fn delta_space(&self) -> [f64; 2] {
        self.delta_space
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::Configuration;
    use crate::coord::Shape2D;
    use crate::error::Error;

    fn config(delta_t: f64, dist: Shape2D) -> Configuration {
        Configuration::new(10, Shape2D::new(8, 8), dist, delta_t, [0.1, 0.1])
    }

    #[test]
    fn reasonable_configuration_is_valid() {
        assert_eq!(config(1e-3, Shape2D::new(2, 2)).validate(), Ok(()));
    }

    #[test]
    fn degenerate_values_are_rejected() {
        assert!(matches!(config(0.0, Shape2D::new(1, 1)).validate(), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(config(f64::NAN, Shape2D::new(1, 1)).validate(), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(config(1e-3, Shape2D::new(0, 1)).validate(), Err(Error::InvalidConfiguration(_))));

        let c = Configuration::new(1, Shape2D::new(8, 8), Shape2D::new(1, 1), 1e-3, [0.1, -0.1]);
        assert!(matches!(c.validate(), Err(Error::InvalidConfiguration(_))));
    }
}
