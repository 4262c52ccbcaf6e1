use std::thread;

use crossbeam_channel::{Receiver, Sender};
use log::debug;

use super::comm::{Communicator, Tag};
use crate::error::Error;

type Envelope = (Tag, Vec<f64>);

/// A communicator between threads of a single process. A group of `n`
/// endpoints is wired with one unbounded channel per ordered pair of ranks,
/// so messages from a given peer are never overtaken by later ones, and
/// `send` never blocks.
///
pub struct LocalCommunicator {
    rank: usize,
    outbox: Vec<Sender<Envelope>>,
    inbox: Vec<Receiver<Envelope>>,
}

impl LocalCommunicator {
    /// Create the endpoints of a group of `size` ranks. Endpoint `n` of the
    /// returned vector has rank `n`.
    pub fn group(size: usize) -> Vec<Self> {
        let mut outboxes: Vec<Vec<Sender<Envelope>>> = (0..size).map(|_| Vec::new()).collect();
        let mut inboxes: Vec<Vec<Receiver<Envelope>>> = (0..size).map(|_| Vec::new()).collect();

        for outbox in outboxes.iter_mut() {
            for inbox in inboxes.iter_mut() {
                let (sink, src) = crossbeam_channel::unbounded();
                outbox.push(sink);
                inbox.push(src);
            }
        }

        // inboxes[dest][source] now receives what outboxes[source][dest] sends
        outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outbox, inbox))| LocalCommunicator { rank, outbox, inbox })
            .collect()
    }
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.outbox.len()
    }

    fn send(&self, rank: usize, tag: Tag, message: &[f64]) -> Result<(), Error> {
        let sink = self.outbox.get(rank).ok_or_else(|| {
            Error::Communication(format!("send to rank {} outside group of {}", rank, self.size()))
        })?;
        sink.send((tag, message.to_vec())).map_err(|_| {
            Error::Communication(format!("rank {} has hung up", rank))
        })
    }

    fn receive(&self, rank: usize, tag: Tag) -> Result<Vec<f64>, Error> {
        let src = self.inbox.get(rank).ok_or_else(|| {
            Error::Communication(format!("receive from rank {} outside group of {}", rank, self.size()))
        })?;
        let (received_tag, data) = src.recv().map_err(|_| {
            Error::Communication(format!("rank {} has hung up", rank))
        })?;

        if received_tag != tag {
            return Err(Error::Communication(format!(
                "expected tag {} from rank {}, received tag {}",
                tag,
                rank,
                received_tag)));
        }
        Ok(data)
    }
}

/// Run an SPMD program on a group of `size` threads, one per rank, each
/// given its own `LocalCommunicator`. Returns the per-rank results in rank
/// order once every thread has finished.
///
/// Panics if any of the rank threads panics.
///
pub fn spawn_group<F, T>(size: usize, program: F) -> Vec<T>
where
    F: Fn(LocalCommunicator) -> T + Send + Sync,
    T: Send,
{
    let program = &program;

    thread::scope(|scope| {
        let procs: Vec<_> = LocalCommunicator::group(size)
            .into_iter()
            .map(|comm| {
                debug!("starting rank {} of {}", comm.rank(), size);
                scope.spawn(move || program(comm))
            })
            .collect();

        procs
            .into_iter()
            .map(|process| process.join().unwrap())
            .collect()
    })
}
