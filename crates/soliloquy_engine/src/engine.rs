use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use soliloquy_logging::{sq_debug, sq_error};
use tokio::task::JoinHandle;

use crate::client::{ClientSettings, RecommendationClient, ReqwestRecommendationClient};
use crate::{EngineEvent, RecommendError, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("engine worker thread has stopped")]
pub struct EngineStopped;

enum EngineCommand {
    Recommend { request_id: RequestId, title: String },
    Cancel { request_id: RequestId },
}

/// Runs recommendation requests on a background tokio runtime.
///
/// Dropping the handle stops the worker thread; requests still in flight are
/// dropped with the runtime and never report back.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, RecommendError> {
        let client = ReqwestRecommendationClient::new(settings)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    pub fn with_client(client: Arc<dyn RecommendationClient>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    sq_error!("failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut in_flight: HashMap<RequestId, JoinHandle<()>> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                in_flight.retain(|_, task| !task.is_finished());
                match command {
                    EngineCommand::Recommend { request_id, title } => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        let task = runtime.spawn(async move {
                            let result = client.recommend(&title).await;
                            let _ = event_tx.send(EngineEvent::Completed { request_id, result });
                        });
                        in_flight.insert(request_id, task);
                    }
                    EngineCommand::Cancel { request_id } => {
                        if let Some(task) = in_flight.remove(&request_id) {
                            sq_debug!("cancelling request {}", request_id);
                            task.abort();
                        }
                    }
                }
            }
            // Channel closed: the runtime drops here and takes pending tasks with it.
            runtime.shutdown_background();
        });

        Self { cmd_tx, event_rx }
    }

    pub fn recommend(&self, request_id: RequestId, title: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Recommend {
            request_id,
            title: title.into(),
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { request_id });
    }

    /// Waits up to `timeout` for the next event. Fails once the worker thread is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }
}
