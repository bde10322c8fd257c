use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use crate::merge::{ChannelProgressSink, LopdfMerger, MergeSettings, Merger};
use crate::MergeEvent;

enum EngineCommand {
    Merge { inputs: Vec<PathBuf> },
}

/// Handle to the merge worker thread. Commands go in over a channel; merge
/// progress and completion come back as [`MergeEvent`]s. The core accepts
/// one merge at a time, so commands are executed strictly in order.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<MergeEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: MergeSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let merger = Arc::new(LopdfMerger::new(settings));

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let merger = merger.clone();
                let event_tx = event_tx.clone();
                runtime.block_on(async move {
                    handle_command(merger.as_ref(), command, event_tx).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn merge(&self, inputs: Vec<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::Merge { inputs });
    }

    pub fn try_recv(&self) -> Option<MergeEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn handle_command(
    merger: &dyn Merger,
    command: EngineCommand,
    event_tx: mpsc::Sender<MergeEvent>,
) {
    match command {
        EngineCommand::Merge { inputs } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = merger.merge(&inputs, &sink).await;
            let _ = event_tx.send(MergeEvent::Completed { result });
        }
    }
}
