//! # Background Generation
//!
//! One thread that runs [`ZoneGenerator`] off the caller's thread.
//! Requests and finished zones travel over unbounded crossbeam channels;
//! results come back in submission order, tagged with their [`Ticket`].

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use voidline_core::ZoneSeed;

use crate::config::TierConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::generator::{GenerateOptions, ZoneGenerator};
use crate::zone::Zone;

/// Identifies one submitted request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

/// Regular zone or boss arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoneShape {
    /// [`ZoneGenerator::generate`].
    #[default]
    Regular,
    /// [`ZoneGenerator::generate_boss`].
    Boss,
}

struct Request {
    ticket: Ticket,
    tier: Arc<TierConfig>,
    seed: ZoneSeed,
    options: GenerateOptions,
    shape: ZoneShape,
}

/// A finished zone.
#[derive(Clone, Debug)]
pub struct ZoneReady {
    /// Ticket returned by [`ZoneWorker::submit`].
    pub ticket: Ticket,
    /// The generated zone.
    pub zone: Zone,
}

/// Background zone generation thread.
pub struct ZoneWorker {
    requests: Option<Sender<Request>>,
    results: Receiver<ZoneReady>,
    handle: Option<JoinHandle<()>>,
    next_ticket: u64,
}

impl ZoneWorker {
    /// Spawns the worker thread.
    #[must_use]
    pub fn spawn(generator: Arc<ZoneGenerator>) -> Self {
        let (request_tx, request_rx) = unbounded::<Request>();
        let (result_tx, result_rx) = unbounded();

        let handle = std::thread::spawn(move || {
            tracing::debug!("zone worker started");
            for request in request_rx {
                let zone = match request.shape {
                    ZoneShape::Regular => generator.generate(&request.tier, request.seed, &request.options),
                    ZoneShape::Boss => generator.generate_boss(&request.tier, request.seed, &request.options),
                };
                if result_tx.send(ZoneReady { ticket: request.ticket, zone }).is_err() {
                    break;
                }
            }
            tracing::debug!("zone worker stopped");
        });

        Self { requests: Some(request_tx), results: result_rx, handle: Some(handle), next_ticket: 0 }
    }

    /// Queues a request.
    ///
    /// # Errors
    ///
    /// [`WorkerError::ShutDown`] after [`shutdown`](Self::shutdown),
    /// [`WorkerError::Disconnected`] if the thread is gone.
    pub fn submit(
        &mut self,
        tier: Arc<TierConfig>,
        seed: ZoneSeed,
        options: GenerateOptions,
        shape: ZoneShape,
    ) -> WorkerResult<Ticket> {
        let requests = self.requests.as_ref().ok_or(WorkerError::ShutDown)?;
        let ticket = Ticket(self.next_ticket);
        requests
            .send(Request { ticket, tier, seed, options, shape })
            .map_err(|_| WorkerError::Disconnected)?;
        self.next_ticket += 1;
        Ok(ticket)
    }

    /// Blocks for the next finished zone.
    ///
    /// # Errors
    ///
    /// [`WorkerError::Disconnected`] once the thread has stopped and every
    /// finished zone has been received.
    pub fn recv(&self) -> WorkerResult<ZoneReady> {
        self.results.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Next finished zone, if one is ready.
    ///
    /// # Errors
    ///
    /// [`WorkerError::Disconnected`] once the thread has stopped and every
    /// finished zone has been received.
    pub fn try_recv(&self) -> WorkerResult<Option<ZoneReady>> {
        match self.results.try_recv() {
            Ok(ready) => Ok(Some(ready)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    /// Stops accepting requests and waits for queued ones to finish.
    /// Their zones stay available to [`recv`](Self::recv).
    pub fn shutdown(&mut self) {
        self.requests = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("zone worker panicked");
            }
        }
    }
}

impl Drop for ZoneWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker() -> ZoneWorker {
        ZoneWorker::spawn(Arc::new(ZoneGenerator::default()))
    }

    #[test]
    fn test_matches_inline_generation() {
        let generator = ZoneGenerator::default();
        let tier = Arc::new(TierConfig::derelict_fleet());
        let mut worker = worker();

        let a = worker.submit(tier.clone(), ZoneSeed::new(5), GenerateOptions::at_depth(2), ZoneShape::Regular);
        let b = worker.submit(tier.clone(), ZoneSeed::new(6), GenerateOptions::at_depth(2), ZoneShape::Boss);
        assert_eq!(a, Ok(Ticket(0)));
        assert_eq!(b, Ok(Ticket(1)));

        let first = worker.recv().unwrap();
        assert_eq!(first.ticket, Ticket(0));
        assert_eq!(first.zone, generator.generate(&tier, ZoneSeed::new(5), &GenerateOptions::at_depth(2)));
        let second = worker.recv().unwrap();
        assert_eq!(second.ticket, Ticket(1));
        assert!(second.zone.boss_spawn.is_some());
    }

    #[test]
    fn test_submit_after_shutdown() {
        let mut worker = worker();
        worker.shutdown();
        let result = worker.submit(
            Arc::new(TierConfig::default()),
            ZoneSeed::new(1),
            GenerateOptions::default(),
            ZoneShape::Regular,
        );
        assert_eq!(result, Err(WorkerError::ShutDown));
        assert_eq!(worker.recv().map(|r| r.ticket), Err(WorkerError::Disconnected));
    }

    #[test]
    fn test_shutdown_drains_queue() {
        let mut worker = worker();
        let tier = Arc::new(TierConfig::nebula_core());
        for seed in 0..3 {
            worker.submit(tier.clone(), ZoneSeed::new(seed), GenerateOptions::at_depth(1), ZoneShape::Regular).unwrap();
        }
        worker.shutdown();
        let mut tickets = Vec::new();
        while let Ok(Some(ready)) = worker.try_recv() {
            tickets.push(ready.ticket);
        }
        assert_eq!(tickets, vec![Ticket(0), Ticket(1), Ticket(2)]);
        assert_eq!(worker.try_recv().map(|r| r.is_some()), Err(WorkerError::Disconnected));
    }
}
