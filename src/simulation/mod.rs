//! A driver that advances a distributed field in time. The driver owns two
//! fields sharing one distribution, "current" and "next". Every step syncs
//! the ghosts of the current field, lets a `TimeStep` compute the interior of
//! the next field from the full current field, and swaps the two. Observers
//! are notified with the new current field after every step.
//!

pub mod config;
pub mod initial;
pub mod observer;

use std::rc::Rc;

use log::{debug, info};

use crate::coord::Shape2D;
use crate::distribution::CartesianDistribution2D;
use crate::error::Error;
use crate::field::Distributed2DField;
use crate::message::Communicator;

pub use config::Configuration;
pub use initial::{HotSpotInitializer, UniformInitializer};
pub use observer::{ProgressLogger, Snapshot, SnapshotWriter};




/**
 * An explicit update rule for a distributed field.
 */
pub trait TimeStep<C> {

    /// Compute the interior of `next` from `current`. On entry the ghosts of
    /// `current` facing other processes hold their neighbours' values; the
    /// ghosts of `next` must not be relied on.
    fn iter(&self, current: &Distributed2DField<C>, next: &mut Distributed2DField<C>) -> Result<(), Error>;

    /// The ghost width this update reads on each side of each axis.
    fn required_ghosts(&self) -> Shape2D;
}




/**
 * Sets the initial state of a field, ghosts included, before the first
 * ghost exchange. Ghost bands on the physical boundary are never written by
 * the exchange, so the values set here act as fixed boundary values.
 */
pub trait InitialConditionner<C> {
    fn initial_condition(&self, field: &mut Distributed2DField<C>);
}




/**
 * Receives the current field after every step. Observers must not assume
 * anything about the field's ghosts.
 */
pub trait SimulationObserver<C> {
    fn simulation_updated(&mut self, field: &Distributed2DField<C>) -> Result<(), Error>;
}




pub struct Simulation<C> {
    config: Configuration,
    time_step: Box<dyn TimeStep<C>>,
    observers: Vec<Box<dyn SimulationObserver<C>>>,
    current: Distributed2DField<C>,
    next: Distributed2DField<C>,
    iteration: usize,
}




// ============================================================================
impl<C: Communicator> Simulation<C> {

    /**
     * Lay out the process grid over `comm`, allocate the two fields with the
     * ghost width the time step requires, and initialize both of them.
     */
    pub fn new(
        comm: C,
        config: Configuration,
        time_step: Box<dyn TimeStep<C>>,
        initializer: &dyn InitialConditionner<C>,
    ) -> Result<Self, Error> {
        config.validate()?;

        let distribution = Rc::new(CartesianDistribution2D::new(comm, config.dist_extents())?);
        let ghosts = time_step.required_ghosts();
        let mut current = Distributed2DField::new(
            Rc::clone(&distribution),
            config.global_shape(),
            ghosts,
            config.delta_space())?;
        let mut next = Distributed2DField::new(
            distribution,
            config.global_shape(),
            ghosts,
            config.delta_space())?;

        initializer.initial_condition(&mut current);
        initializer.initial_condition(&mut next);

        Ok(Self {
            config,
            time_step,
            observers: Vec::new(),
            current,
            next,
            iteration: 0,
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver<C>>) {
        self.observers.push(observer)
    }

    /**
     * Advance by one time step and notify the observers.
     */
    pub fn step(&mut self) -> Result<(), Error> {
        self.current.sync_ghosts()?;
        self.time_step.iter(&self.current, &mut self.next)?;
        self.next.set_time(self.current.time() + self.config.delta_t());
        self.current.swap(&mut self.next);
        self.iteration += 1;

        debug!("[{}] t={:.6}", self.iteration, self.current.time());

        for observer in &mut self.observers {
            observer.simulation_updated(&self.current)?;
        }
        Ok(())
    }

    /**
     * Take the configured number of steps.
     */
    pub fn run(&mut self) -> Result<(), Error> {
        if self.current.distribution().rank() == 0 {
            info!("running {} iterations", self.config.nb_iter());
        }
        for _ in 0..self.config.nb_iter() {
            self.step()?;
        }
        if self.current.distribution().rank() == 0 {
            info!("finished at t={:.6}", self.current.time());
        }
        Ok(())
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn field(&self) -> &Distributed2DField<C> {
        &self.current
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}
