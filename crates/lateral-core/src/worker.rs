//! Background impulse renderer for native hosts.
//!
//! Request in, buffer out, nothing shared: the renderer thread owns its RNG
//! and communicates purely by message passing. There is no cancellation; a
//! superseded request's late result is still safe to apply because
//! application is last-write-wins. The web adapter mirrors this protocol
//! over a Web Worker instead.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{LateralError, Result};
use crate::reverb::{render_impulse, ImpulseResponse, ImpulseSpec};

pub struct ImpulseRenderer {
    requests: Sender<ImpulseSpec>,
    responses: Receiver<ImpulseResponse>,
}

impl ImpulseRenderer {
    /// Spawn the renderer thread with an entropy-seeded RNG.
    pub fn spawn() -> Result<Self> {
        Self::spawn_seeded(None)
    }

    /// Spawn with a fixed seed; rendered impulses are then deterministic.
    pub fn spawn_seeded(seed: Option<u64>) -> Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<ImpulseSpec>();
        let (resp_tx, resp_rx) = mpsc::channel::<ImpulseResponse>();
        thread::Builder::new()
            .name("impulse-renderer".to_string())
            .spawn(move || {
                let mut rng = match seed {
                    Some(s) => StdRng::seed_from_u64(s),
                    None => StdRng::from_entropy(),
                };
                while let Ok(spec) = req_rx.recv() {
                    log::debug!("[reverb] rendering impulse #{}", spec.id);
                    if resp_tx.send(render_impulse(&spec, &mut rng)).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| LateralError::Renderer(e.to_string()))?;
        Ok(Self {
            requests: req_tx,
            responses: resp_rx,
        })
    }

    /// Queue a render. Never blocks; fails only if the thread has exited.
    pub fn submit(&self, spec: ImpulseSpec) -> Result<()> {
        self.requests
            .send(spec)
            .map_err(|_| LateralError::Renderer("renderer thread exited".to_string()))
    }

    /// Drain pending responses and return the newest, if any. Earlier
    /// responses still in the queue are superseded and dropped.
    pub fn try_latest(&self) -> Option<ImpulseResponse> {
        let mut latest = None;
        loop {
            match self.responses.try_recv() {
                Ok(resp) => latest = Some(resp),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }
}
