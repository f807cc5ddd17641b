//! # Training Trigger
//!
//! Fire-and-forget bridge to the remote AI training service. A dedicated
//! worker thread owns the HTTP client; the UI thread sends it requests and
//! polls for request-level updates over mpsc channels, so the event loop
//! never blocks on the network. There is no polling of training progress,
//! no cancellation and no retry: the service owns everything past the
//! initial acknowledgement.

use log::{error, info};
use serde::Serialize;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct TrainRequest {
    num_games: u32,
}

/// Messages sent to the trainer worker thread.
enum TrainerCommand {
    Start { num_games: u32 },
    Stop,
}

/// Request-level result of one training call.
///
/// `Accepted` means the service acknowledged the request (HTTP 2xx); whether
/// training then succeeds is invisible to this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingUpdate {
    Accepted,
    Failed(String),
}

/// The training worker that runs in a separate thread.
pub struct TrainerWorker {
    handle: Option<JoinHandle<()>>,
    tx_cmd: Sender<TrainerCommand>,
    rx_upd: Receiver<TrainingUpdate>,
}

impl TrainerWorker {
    /// Spawns the worker. `base_url` is the service root; requests go to
    /// `<base_url>/train_ai`.
    pub fn new(base_url: String) -> Self {
        let (tx_cmd, rx_cmd) = mpsc::channel();
        let (tx_upd, rx_upd) = mpsc::channel();

        let handle = thread::spawn(move || {
            let endpoint = format!("{}/train_ai", base_url.trim_end_matches('/'));

            for command in rx_cmd {
                match command {
                    TrainerCommand::Start { num_games } => {
                        info!("requesting training of {num_games} games at {endpoint}");
                        let result = reqwest::blocking::Client::builder()
                            .timeout(REQUEST_TIMEOUT)
                            .build()
                            .and_then(|client| {
                                client
                                    .post(&endpoint)
                                    .json(&TrainRequest { num_games })
                                    .send()
                            });
                        let update = match result {
                            Ok(response) if response.status().is_success() => {
                                TrainingUpdate::Accepted
                            }
                            Ok(response) => {
                                TrainingUpdate::Failed(format!("HTTP {}", response.status()))
                            }
                            Err(err) => TrainingUpdate::Failed(err.to_string()),
                        };
                        if let TrainingUpdate::Failed(reason) = &update {
                            error!("training request failed: {reason}");
                        }
                        tx_upd.send(update).ok(); // Ignore send errors if receiver is dropped
                    }
                    TrainerCommand::Stop => break,
                }
            }
        });

        Self {
            handle: Some(handle),
            tx_cmd,
            rx_upd,
        }
    }

    /// Queues one training request. The outcome arrives via `try_recv`.
    pub fn request_training(&self, num_games: u32) {
        self.tx_cmd.send(TrainerCommand::Start { num_games }).ok();
    }

    /// Non-blocking poll for the next update, called from the event loop.
    pub fn try_recv(&self) -> Option<TrainingUpdate> {
        self.rx_upd.try_recv().ok()
    }

    /// Blocking poll with a deadline, used by tests.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TrainingUpdate> {
        self.rx_upd.recv_timeout(timeout).ok()
    }
}

impl Drop for TrainerWorker {
    fn drop(&mut self) {
        self.tx_cmd.send(TrainerCommand::Stop).ok();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
