use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use merger_core::{update, AppState, AppViewModel, Effect, EntryId, Msg, SelectedFile};
use merger_engine::{inspect_path, HistoryStore, SelectedDocument, ThemeStore};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::persistence;
use super::ui;

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File);

    let output_dir = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("output");
    let history = HistoryStore::new(output_dir.clone());
    let theme = ThemeStore::new(output_dir.clone());

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(output_dir, msg_tx, history.clone(), theme.clone());

    let mut shell = Shell::new(runner, msg_rx);
    for msg in persistence::startup_messages(&history, &theme) {
        shell.dispatch(msg);
    }
    // Initial paint, whether or not anything was restored.
    shell.render();
    print_help();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        match parse_command(&line, &shell.view) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => print_help(),
            Ok(Command::Show) => shell.render(),
            Ok(Command::Nothing) => {}
            Ok(Command::Dispatch(msg)) => {
                shell.dispatch(msg);
                shell.flush_render();
                shell.wait_for_merge();
            }
            Err(reason) => println!("{reason}"),
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        "commands: add <path>..., rm <n>, edit <n> <path>, mv <n> <m>, \
         merge, clear, theme, list, help, quit"
    );
}

struct Shell {
    state: AppState,
    view: AppViewModel,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Shell {
    fn new(runner: EffectRunner, msg_rx: mpsc::Receiver<Msg>) -> Self {
        Self {
            state: AppState::new(),
            view: AppViewModel::default(),
            runner,
            msg_rx,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let mut follow_ups = Vec::new();
        for effect in effects {
            if matches!(effect, Effect::ConfirmClearHistory) {
                if confirm_clear() {
                    follow_ups.push(Msg::ClearHistoryConfirmed);
                }
            } else {
                self.runner.run(effect);
            }
        }
        for msg in follow_ups {
            self.dispatch(msg);
        }
    }

    /// Repaints if any dispatched message marked the view dirty.
    fn flush_render(&mut self) {
        if self.state.consume_dirty() {
            self.render();
        }
    }

    fn render(&mut self) {
        let _ = self.state.consume_dirty();
        self.view = self.state.view();
        print!("{}", ui::render::render(&self.view));
    }

    /// The merge is the one suspending operation: the shell blocks here
    /// until the engine resolves it, then surfaces the outcome.
    fn wait_for_merge(&mut self) {
        while self.state.merge_in_flight() {
            match self.msg_rx.recv_timeout(Duration::from_millis(50)) {
                Ok(msg) => {
                    self.dispatch(msg);
                    self.flush_render();
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    }
}

/// Destructive and irreversible, so it gets an explicit prompt.
fn confirm_clear() -> bool {
    print!("Clear all uploaded PDF history? This cannot be undone. [y/N] ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

#[derive(Debug, PartialEq)]
enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Nothing,
    Quit,
}

/// Parses one input line against the last rendered view. Display positions
/// are resolved to stable entry ids here, at parse time, so later list
/// mutations can never redirect a command to the wrong entry.
fn parse_command(line: &str, view: &AppViewModel) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(Command::Nothing);
    };

    match verb {
        "add" => {
            let mut files = Vec::new();
            for raw in parts {
                let document = inspect_path(Path::new(raw)).map_err(|err| err.to_string())?;
                files.push(selected_file(document));
            }
            if files.is_empty() {
                return Err("usage: add <path>...".to_string());
            }
            Ok(Command::Dispatch(Msg::FilesSelected(files)))
        }
        "rm" => {
            let id = entry_at(view, parts.next())?;
            Ok(Command::Dispatch(Msg::FileRemoveRequested { id }))
        }
        "edit" => {
            let id = entry_at(view, parts.next())?;
            let raw = parts.next().ok_or("usage: edit <n> <path>")?;
            let document = inspect_path(Path::new(raw)).map_err(|err| err.to_string())?;
            Ok(Command::Dispatch(Msg::FileReplaceRequested {
                id,
                file: selected_file(document),
            }))
        }
        "mv" => {
            let id = entry_at(view, parts.next())?;
            let to_index = parse_position(view, parts.next())?;
            Ok(Command::Dispatch(Msg::ReorderRequested { id, to_index }))
        }
        "merge" => Ok(Command::Dispatch(Msg::MergeRequested)),
        "clear" => Ok(Command::Dispatch(Msg::ClearHistoryRequested)),
        "theme" => Ok(Command::Dispatch(Msg::ThemeToggled)),
        "list" => Ok(Command::Show),
        "help" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command: {other}")),
    }
}

fn entry_at(view: &AppViewModel, arg: Option<&str>) -> Result<EntryId, String> {
    let position = parse_position(view, arg)?;
    Ok(view.entries[position].id)
}

fn parse_position(view: &AppViewModel, arg: Option<&str>) -> Result<usize, String> {
    let raw = arg.ok_or("missing list position")?;
    let position: usize = raw
        .parse()
        .map_err(|_| format!("not a list position: {raw}"))?;
    if position == 0 || position > view.entries.len() {
        return Err(format!("no entry at position {position}"));
    }
    Ok(position - 1)
}

fn selected_file(document: SelectedDocument) -> SelectedFile {
    SelectedFile {
        name: document.name,
        size_bytes: document.size_bytes,
        content_type: document.declared_type,
        payload: document.path,
    }
}
