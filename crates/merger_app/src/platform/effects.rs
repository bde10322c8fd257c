use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use merge_logging::{merge_error, merge_info, merge_warn};
use merger_core::{Effect, MergeReport, Msg};
use merger_engine::{EngineHandle, HistoryStore, MergeEvent, MergeSettings, ThemeStore};

use super::persistence;

pub struct EffectRunner {
    engine: EngineHandle,
    history: HistoryStore,
    theme: ThemeStore,
}

impl EffectRunner {
    pub fn new(
        output_dir: PathBuf,
        msg_tx: mpsc::Sender<Msg>,
        history: HistoryStore,
        theme: ThemeStore,
    ) -> Self {
        let engine = EngineHandle::new(MergeSettings::for_output_dir(output_dir));
        let runner = Self {
            engine,
            history,
            theme,
        };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::PersistHistory(names) => {
                if let Err(err) = self.history.save(&names) {
                    merge_error!("Failed to persist history snapshot: {}", err);
                }
            }
            Effect::ClearPersistedHistory => {
                if let Err(err) = self.history.clear() {
                    merge_error!("Failed to clear history snapshot: {}", err);
                }
            }
            Effect::PersistTheme(theme) => {
                if let Err(err) = self.theme.save(persistence::theme_value(theme)) {
                    merge_error!("Failed to persist theme: {}", err);
                }
            }
            Effect::StartMerge { inputs } => {
                merge_info!("StartMerge with {} inputs", inputs.len());
                self.engine.merge(inputs);
            }
            // Answered by the shell prompt before effects reach the runner.
            Effect::ConfirmClearHistory => {}
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                match event {
                    MergeEvent::Progress(progress) => {
                        merge_info!(
                            "Merge progress: {:?} ({}/{} documents)",
                            progress.stage,
                            progress.documents_loaded,
                            progress.documents_total
                        );
                    }
                    MergeEvent::Completed { result } => {
                        let result = match result {
                            Ok(output) => Ok(MergeReport {
                                output: output.path,
                                pages: output.pages,
                                size_bytes: output.bytes_written,
                            }),
                            Err(err) => {
                                merge_warn!("Merge failed: {}", err);
                                Err(err.to_string())
                            }
                        };
                        let _ = msg_tx.send(Msg::MergeFinished { result });
                    }
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}
