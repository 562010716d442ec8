use std::io::Stdout;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::event::{self, Event, KeyEvent},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::editor::Editor;
use crate::fs::{FsError, LocalFs};
use crate::highlight::MarkdownHighlighter;
use crate::input::{self, HostInput};
use crate::widgets::editor::Theme;

const UNTITLED: &str = "untitled";

/// One open document and the host state around it.
pub struct App {
    /// Whether the application is running
    pub running: bool,

    pub(crate) editor: Editor,

    path: Option<PathBuf>,

    /// Name shown in the status line
    pub(crate) name: String,

    fs: LocalFs,

    pub(crate) config: Config,

    pub(crate) theme: Theme,

    /// Edited since the last successful save
    pub(crate) dirty: bool,

    /// Bumped on every edit; a save only clears `dirty` if nothing changed
    /// after it was started.
    revision: u64,

    /// Last save result, shown in the status line
    pub(crate) message: Option<StatusMessage>,

    saves: Vec<JoinHandle<()>>,
    save_tx: UnboundedSender<SaveOutcome>,
    save_rx: UnboundedReceiver<SaveOutcome>,
}

/// One-line notice for the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text) | StatusMessage::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }
}

/// Result of one background write.
#[derive(Debug)]
struct SaveOutcome {
    revision: u64,
    result: Result<(), FsError>,
}

impl App {
    /// Empty, unnamed document.
    pub fn new(config: Config) -> Self {
        let editor = Editor::new(Box::new(MarkdownHighlighter::new()), &config.editor);
        let (save_tx, save_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            editor,
            path: None,
            name: UNTITLED.to_string(),
            fs: LocalFs::new(),
            theme: Theme::from_config(&config.ui),
            config,
            dirty: false,
            revision: 0,
            message: None,
            saves: Vec::new(),
            save_tx,
            save_rx,
        }
    }

    /// Open `path`. A missing file becomes an empty new document that will be
    /// created on the first save.
    pub async fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref();
        let mut app = Self::new(config);

        match app.fs.read_file(path).await {
            Ok(data) => app.editor.set_text(&data),
            Err(FsError::NotFound(_)) => {
                log::debug!("{} does not exist, starting a new document", path.display());
            }
            Err(e) => {
                log::error!("{}", e);
                return Err(e).with_context(|| format!("Failed to open '{}'", path.display()));
            }
        }

        let cwd = app.fs.working_dir().ok();
        app.name = display_name(path, cwd.as_deref());
        app.path = Some(path.to_path_buf());
        Ok(app)
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Feed one terminal key event through the editor.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match input::translate(key) {
            HostInput::Quit => self.running = false,
            HostInput::Editor(ev) => {
                self.editor.process_event(&ev);
                self.after_event();
            }
            HostInput::Ignored => {}
        }
    }

    /// Status message from the last save, if any.
    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// Pick up the editor's edge-triggered flags.
    pub fn after_event(&mut self) {
        if self.editor.has_changed() {
            self.dirty = true;
            self.revision += 1;
            self.message = None;
        }
        if self.editor.save_requested() {
            self.save();
        }
        self.poll_saves();
    }

    /// Write the document in the background. The outcome is picked up by
    /// [`App::poll_saves`] or [`App::flush_saves`].
    pub fn save(&mut self) {
        let Some(path) = self.path.clone() else {
            log::warn!("no file name, not saving");
            self.message = Some(StatusMessage::Error("no file name".to_string()));
            return;
        };
        let data = self.editor.text();
        let fs = self.fs;
        let tx = self.save_tx.clone();
        let revision = self.revision;
        self.saves.retain(|task| !task.is_finished());
        self.saves.push(tokio::spawn(async move {
            let result = fs.write_file(&path, &data).await;
            // The receiver lives in the App; it is only gone at shutdown.
            let _ = tx.send(SaveOutcome { revision, result });
        }));
    }

    /// Apply finished saves without waiting. Returns the first failure.
    pub fn poll_saves(&mut self) -> Option<FsError> {
        let mut failure = None;
        while let Ok(outcome) = self.save_rx.try_recv() {
            if let Err(e) = self.apply_save(outcome) {
                failure.get_or_insert(e);
            }
        }
        failure
    }

    /// Wait for every spawned save and apply the results.
    pub async fn flush_saves(&mut self) -> Result<()> {
        for task in self.saves.drain(..) {
            task.await.context("save task panicked")?;
        }
        match self.poll_saves() {
            Some(e) => Err(e).context("Failed to save"),
            None => Ok(()),
        }
    }

    fn apply_save(&mut self, outcome: SaveOutcome) -> Result<(), FsError> {
        match outcome.result {
            Ok(()) => {
                if outcome.revision == self.revision {
                    self.dirty = false;
                }
                self.message = Some(StatusMessage::Info(format!("\"{}\" written", self.name)));
                Ok(())
            }
            Err(e) => {
                log::error!("save failed: {}", e);
                self.message = Some(StatusMessage::Error(format!("save failed: {}", e)));
                Err(e)
            }
        }
    }

    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let tick = Duration::from_millis(16);

        while self.running {
            terminal.draw(|f| self.render(f))?;

            self.poll_saves();
            if event::poll(tick)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {
                        // The next draw resizes the viewport.
                    }
                    _ => {}
                }
            } else {
                tokio::task::yield_now().await;
            }
        }

        self.flush_saves().await
    }
}

/// `path` relative to `cwd` when it lies below it.
pub fn display_name(path: &Path, cwd: Option<&Path>) -> String {
    let shown = cwd
        .and_then(|cwd| path.strip_prefix(cwd).ok())
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or(path);
    let name = shown.display().to_string();
    if name.is_empty() {
        UNTITLED.to_string()
    } else {
        name
    }
}
