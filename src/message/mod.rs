//! This module exports a minimal message-passing API, which is encapsulated
//! by a `Communicator` trait. Implementors only need to write point-to-point
//! `send` and `receive` operations for a given transport layer: channels
//! between threads (`local`) or MPI (`mpi_comm`, behind the `mpi` feature).
//! The trait then provides default implementations for send-receive,
//! broadcast, reduce, and reduce-all operations.
//!

pub mod comm;
pub mod local;
#[cfg(feature = "mpi")]
pub mod mpi_comm;
pub mod util;

pub use comm::Communicator;
pub use local::{spawn_group, LocalCommunicator};
#[cfg(feature = "mpi")]
pub use mpi_comm::MpiCommunicator;
