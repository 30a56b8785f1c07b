use std::sync::mpsc;
use std::thread;

use follower_core::{Credential, ProfileId};
use scrape_logging::scrape_error;

use crate::collect::ChannelProgressSink;
use crate::{EngineEvent, JobId, Orchestrator, ScrapeResponse};

enum EngineCommand {
    Scrape { job_id: JobId, profile_id: ProfileId },
}

/// Background worker running scrapes one after another on a single-threaded runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(orchestrator: Orchestrator, credential: Credential) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    scrape_error!("Failed to start scrape runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                runtime.block_on(handle_command(
                    &orchestrator,
                    &credential,
                    command,
                    event_tx.clone(),
                ));
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn enqueue(&self, job_id: JobId, profile_id: ProfileId) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::Scrape { job_id, profile_id });
    }

    /// Blocks until the next event; `None` once the worker is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    orchestrator: &Orchestrator,
    credential: &Credential,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Scrape { job_id, profile_id } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = orchestrator
                .run_with_progress(job_id, &profile_id, credential, &sink)
                .await;
            let _ = event_tx.send(EngineEvent::ScrapeCompleted {
                job_id,
                profile_id,
                response: ScrapeResponse::from(result),
            });
        }
    }
}
