use crate::config::Config;
use crate::engine::{ExecutionResult, Executor};
use crate::handlers::debounce::Debouncer;
use crate::models::export;
use crate::models::share;
use crate::models::storage::{CODE_KEY, StorageEvent};
use crate::models::theme::system_prefers_dark;
use crate::models::{CodeBuffer, Snippet, SnippetStore, StorageManager, Theme, ThemeState};
use crate::ui;
use flume::Receiver;
use ratatui::Frame;
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Output scroll position that pins the view to the newest line
pub const OUTPUT_FOLLOW: usize = usize::MAX;

pub const DEFAULT_CODE: &str =
    "// Welcome to JavaScript Playground!\nconsole.log(\"Hello, World!\");";

/// Which surface currently receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Editing,
    SnippetManager,
    ImportPath,
    HelpMenu,
}

/// Focus inside the snippet manager modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerFocus {
    NameInput,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationState {
    None,
    DeleteSnippet { snippet_id: Uuid, name: String },
}

/// Main Application State Container
///
/// Owns the persisted state, the editor buffer and the last execution
/// result. Rendering functions read from it; key handlers mutate it.
#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub data_dir: PathBuf,
    pub storage: StorageManager,
    storage_events: Receiver<StorageEvent>,
    pub theme: ThemeState,
    pub snippets: SnippetStore,
    pub editor: CodeBuffer,
    pub executor: Executor,
    pub last_result: Option<ExecutionResult>,
    pub debouncer: Debouncer,

    pub input_mode: InputMode,
    pub manager_focus: ManagerFocus,
    pub selected_snippet: usize,
    pub input_buffer: String,
    pub confirmation_state: ConfirmationState,
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    pub needs_redraw: bool,
    pub editor_height: usize,
    pub output_scroll: usize,
}

impl App {
    /// Builds the playground from persisted state. The initial buffer is
    /// scheduled for an auto-run like any other edit.
    pub fn new(config: Config, mut storage: StorageManager, data_dir: PathBuf) -> Self {
        let storage_events = storage.subscribe();
        let theme = ThemeState::resolve(&mut storage, system_prefers_dark(config.system_theme));
        let snippets = SnippetStore::load(&storage);
        let code = storage
            .get(CODE_KEY)
            .unwrap_or_else(|| DEFAULT_CODE.to_string());
        let debouncer = Debouncer::new(config.autorun_delay());

        let mut app = Self {
            config,
            data_dir,
            storage,
            storage_events,
            theme,
            snippets,
            editor: CodeBuffer::from_text(&code),
            executor: Executor::new(),
            last_result: None,
            debouncer,
            input_mode: InputMode::Editing,
            manager_focus: ManagerFocus::NameInput,
            selected_snippet: 0,
            input_buffer: String::new(),
            confirmation_state: ConfirmationState::None,
            error_message: None,
            success_message: None,
            needs_redraw: true,
            editor_height: 0,
            output_scroll: 0,
        };

        app.schedule_autorun(Instant::now());
        app
    }

    pub fn code(&self) -> String {
        self.editor.text()
    }

    pub fn current_theme(&self) -> Theme {
        self.theme.current()
    }

    /// Executes the buffer now. A pending auto-run is dropped since it would
    /// only repeat this run.
    pub fn run_code(&mut self) {
        self.debouncer.cancel();
        let result = self.executor.execute(&self.code());

        log::debug!(
            "Run finished in {:?} with {} fatal error(s)",
            result.duration,
            result.fatal_errors.len()
        );

        self.last_result = Some(result);
        self.output_scroll = OUTPUT_FOLLOW;
    }

    /// Persists the buffer after a keystroke and restarts the auto-run timer
    pub fn on_edit(&mut self) {
        let code = self.code();
        if let Err(e) = self.storage.set(CODE_KEY, &code) {
            log::warn!("Failed to persist code: {:#}", e);
            self.set_error_message(format!("Failed to save code: {}", e));
        }
        self.schedule_autorun(Instant::now());
    }

    /// Replaces the whole buffer, as loading a snippet or importing a file does
    pub fn set_code(&mut self, code: &str) {
        self.editor = CodeBuffer::from_text(code);
        self.on_edit();
    }

    fn schedule_autorun(&mut self, now: Instant) {
        if self.config.autorun {
            self.debouncer.schedule(now);
        }
    }

    /// Drives time-based work: storage notifications and the auto-run timer
    pub fn tick(&mut self, now: Instant) {
        while let Ok(event) = self.storage_events.try_recv() {
            if event.key == CODE_KEY && event.value != self.code() {
                self.editor.replace(&event.value);
                self.schedule_autorun(now);
            }
        }

        if self.debouncer.poll(now).is_some() && !self.code().trim().is_empty() {
            self.run_code();
        }
    }

    pub fn set_error_message(&mut self, message: String) {
        self.error_message = Some(message);
        self.success_message = None;
    }

    pub fn set_success_message(&mut self, message: String) {
        self.success_message = Some(message);
        self.error_message = None;
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }

    pub fn has_message(&self) -> bool {
        self.error_message.is_some() || self.success_message.is_some()
    }

    pub fn toggle_theme(&mut self) {
        match self.theme.toggle(&mut self.storage) {
            Ok(theme) => log::info!("Theme switched to {}", theme.as_str()),
            Err(e) => self.set_error_message(format!("Failed to save theme: {}", e)),
        }
    }

    /// Copies the share URL; when no clipboard is reachable the URL is shown
    /// so it can be copied by hand
    pub fn share_code(&mut self) {
        let url = share::share_url(&self.config.share_base_url, &self.code());
        match export::copy_to_clipboard(&url) {
            Ok(()) => self.set_success_message("Share URL copied to clipboard!".to_string()),
            Err(e) => {
                log::warn!("Failed to copy share URL: {:#}", e);
                self.set_error_message(format!("Clipboard unavailable. Share URL: {}", url));
            }
        }
    }

    pub fn export_code(&mut self) {
        match export::export_code(&self.code(), &self.config.export_dir()) {
            Ok(path) => self.set_success_message(format!("Code exported to {}", path.display())),
            Err(e) => self.set_error_message(format!("Export failed: {:#}", e)),
        }
    }

    pub fn import_file(&mut self, path: &Path) {
        match export::import_code(path) {
            Ok(content) => {
                self.set_code(&content);
                log::info!("Imported code from {}", path.display());
                self.set_success_message(format!("Imported {}", path.display()));
            }
            Err(e) => self.set_error_message(format!("Import failed: {:#}", e)),
        }
    }

    pub fn open_snippet_manager(&mut self) {
        self.input_mode = InputMode::SnippetManager;
        self.manager_focus = ManagerFocus::NameInput;
        self.input_buffer.clear();
        self.selected_snippet = self
            .selected_snippet
            .min(self.snippets.len().saturating_sub(1));
    }

    pub fn close_overlay(&mut self) {
        self.input_mode = InputMode::Editing;
        self.input_buffer.clear();
        self.confirmation_state = ConfirmationState::None;
    }

    pub fn selected_snippet(&self) -> Option<&Snippet> {
        self.snippets.list().get(self.selected_snippet)
    }

    fn selected_snippet_id(&self) -> Option<Uuid> {
        self.selected_snippet().map(|s| s.id)
    }

    pub fn next_snippet(&mut self) {
        if !self.snippets.is_empty() {
            self.selected_snippet = (self.selected_snippet + 1) % self.snippets.len();
        }
    }

    pub fn previous_snippet(&mut self) {
        if !self.snippets.is_empty() {
            self.selected_snippet = self
                .selected_snippet
                .checked_sub(1)
                .unwrap_or(self.snippets.len() - 1);
        }
    }

    /// Saves the buffer under the name typed into the manager
    pub fn save_snippet(&mut self) {
        let code = self.code();
        match self.snippets.save(&mut self.storage, &self.input_buffer, &code) {
            Ok(_) => {
                self.input_buffer.clear();
                self.selected_snippet = 0;
                self.set_success_message("Snippet saved successfully!".to_string());
            }
            Err(e) => self.set_error_message(e),
        }
    }

    pub fn load_selected_snippet(&mut self) {
        if let Some(code) = self.selected_snippet().map(|s| s.code.clone()) {
            self.set_code(&code);
            self.close_overlay();
        }
    }

    pub fn copy_selected_snippet(&mut self) {
        let Some(id) = self.selected_snippet_id() else {
            return;
        };
        match self.snippets.copy_to_clipboard(id) {
            Ok(()) => self.set_success_message("Snippet copied to clipboard!".to_string()),
            Err(e) => {
                log::warn!("Failed to copy snippet: {:#}", e);
                self.set_error_message("Failed to copy snippet to clipboard.".to_string());
            }
        }
    }

    pub fn export_selected_snippet(&mut self) {
        let Some(id) = self.selected_snippet_id() else {
            return;
        };
        match self.snippets.export_as_file(id, &self.config.export_dir()) {
            Ok(path) => {
                self.set_success_message(format!("Snippet exported to {}", path.display()))
            }
            Err(e) => self.set_error_message(format!("Export failed: {:#}", e)),
        }
    }

    /// Overwrites the selected snippet with the current buffer
    pub fn update_selected_snippet(&mut self) {
        let Some(id) = self.selected_snippet_id() else {
            return;
        };
        let code = self.code();
        match self.snippets.update_code(&mut self.storage, id, &code) {
            Ok(()) => self.set_success_message("Snippet updated".to_string()),
            Err(e) => self.set_error_message(e),
        }
    }

    pub fn request_delete_confirmation(&mut self) {
        if let Some((snippet_id, name)) = self.selected_snippet().map(|s| (s.id, s.name.clone())) {
            self.confirmation_state = ConfirmationState::DeleteSnippet { snippet_id, name };
        }
    }

    pub fn has_pending_action(&self) -> bool {
        self.confirmation_state != ConfirmationState::None
    }

    /// Confirms the pending action and executes it
    pub fn confirm_pending_action(&mut self) -> bool {
        let current_state =
            std::mem::replace(&mut self.confirmation_state, ConfirmationState::None);

        match current_state {
            ConfirmationState::DeleteSnippet { snippet_id, .. } => {
                match self.snippets.delete(&mut self.storage, snippet_id) {
                    Ok(_) => {
                        self.selected_snippet = self
                            .selected_snippet
                            .min(self.snippets.len().saturating_sub(1));
                    }
                    Err(e) => self.set_error_message(e),
                }
                true
            }
            ConfirmationState::None => false,
        }
    }

    pub fn cancel_pending_action(&mut self) {
        self.confirmation_state = ConfirmationState::None;
    }

    pub fn scroll_output(&mut self, up: bool) {
        self.output_scroll = if up {
            self.output_scroll.saturating_sub(1)
        } else {
            self.output_scroll.saturating_add(1)
        };
    }

    /// Where the external editor round trip keeps the buffer
    pub fn editor_file_path(&self) -> PathBuf {
        self.data_dir.join("editor-buffer.js")
    }

    pub fn render(&mut self, frame: &mut Frame) {
        ui::render(frame, self);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::RunState;
    use crate::models::storage::SNIPPETS_KEY;
    use std::time::Duration;

    pub(crate) fn test_app(storage: StorageManager) -> App {
        App::new(
            Config::default(),
            storage,
            std::env::temp_dir().join("jsplay-tests"),
        )
    }

    #[test]
    fn starts_with_default_code_and_pending_autorun() {
        let app = test_app(StorageManager::in_memory());
        assert_eq!(app.code(), DEFAULT_CODE);
        assert!(app.debouncer.is_pending());
        assert!(app.last_result.is_none());
    }

    #[test]
    fn persisted_code_is_restored() {
        let mut storage = StorageManager::in_memory();
        storage.set(CODE_KEY, "1 + 1").unwrap();
        assert_eq!(test_app(storage).code(), "1 + 1");
    }

    #[test]
    fn autorun_fires_after_delay() {
        let mut app = test_app(StorageManager::in_memory());
        let start = Instant::now();
        app.set_code("console.log('auto')");

        app.tick(start);
        assert!(app.last_result.is_none());

        app.tick(start + Duration::from_millis(1100));
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.output_text(), "[LOG] auto");
        assert_eq!(app.executor.state(), RunState::Idle);
    }

    #[test]
    fn autorun_skips_blank_buffer() {
        let mut app = test_app(StorageManager::in_memory());
        app.set_code("   \n ");
        app.tick(Instant::now() + Duration::from_secs(2));
        assert!(app.last_result.is_none());
    }

    #[test]
    fn autorun_can_be_disabled() {
        let config = Config {
            autorun: false,
            ..Config::default()
        };
        let mut app = App::new(config, StorageManager::in_memory(), PathBuf::new());
        app.set_code("1");
        assert!(!app.debouncer.is_pending());
    }

    #[test]
    fn explicit_run_cancels_pending_autorun() {
        let mut app = test_app(StorageManager::in_memory());
        app.set_code("42");
        app.run_code();
        assert_eq!(app.last_result.as_ref().unwrap().output_text(), "[RETURN] 42");
        assert!(!app.debouncer.is_pending());
    }

    #[test]
    fn edits_are_persisted() {
        let mut app = test_app(StorageManager::in_memory());
        app.editor.insert_str("x");
        app.on_edit();
        assert_eq!(app.storage.get(CODE_KEY), Some(app.code()));
    }

    #[test]
    fn external_storage_write_reloads_editor() {
        let mut app = test_app(StorageManager::in_memory());
        app.tick(Instant::now());
        app.storage.set(CODE_KEY, "reloaded()").unwrap();
        app.tick(Instant::now());
        assert_eq!(app.code(), "reloaded()");
    }

    #[test]
    fn save_validation_is_reported() {
        let mut app = test_app(StorageManager::in_memory());
        app.open_snippet_manager();
        app.save_snippet();
        assert_eq!(
            app.error_message.as_deref(),
            Some(crate::models::snippet_store::VALIDATION_MESSAGE)
        );
        assert!(app.storage.get(SNIPPETS_KEY).is_none());
    }

    #[test]
    fn save_load_and_delete_snippet() {
        let mut app = test_app(StorageManager::in_memory());
        app.open_snippet_manager();
        app.input_buffer = "greeting".to_string();
        app.save_snippet();
        assert!(app.input_buffer.is_empty());
        assert_eq!(app.snippets.len(), 1);

        app.set_code("other()");
        app.open_snippet_manager();
        app.load_selected_snippet();
        assert_eq!(app.code(), DEFAULT_CODE);
        assert_eq!(app.input_mode, InputMode::Editing);

        app.open_snippet_manager();
        app.request_delete_confirmation();
        assert!(app.has_pending_action());
        app.cancel_pending_action();
        assert_eq!(app.snippets.len(), 1);

        app.request_delete_confirmation();
        assert!(app.confirm_pending_action());
        assert!(app.snippets.is_empty());
    }

    #[test]
    fn update_selected_snippet_uses_buffer() {
        let mut app = test_app(StorageManager::in_memory());
        app.input_buffer = "s".to_string();
        app.save_snippet();
        app.set_code("changed()");
        app.update_selected_snippet();
        assert_eq!(app.snippets.list()[0].code, "changed()");
    }

    #[test]
    fn toggle_theme_writes_through() {
        let mut app = test_app(StorageManager::in_memory());
        let before = app.current_theme();
        app.toggle_theme();
        assert_eq!(app.current_theme(), before.toggled());
        assert_eq!(
            app.storage.get(crate::models::storage::THEME_KEY).as_deref(),
            Some(before.toggled().as_str())
        );
    }

    #[test]
    fn export_and_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            export_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let mut app = App::new(config, StorageManager::in_memory(), dir.path().to_path_buf());
        app.set_code("export_me()");
        app.export_code();

        app.set_code("");
        app.import_file(&dir.path().join(export::EXPORT_FILE_NAME));
        assert_eq!(app.code(), "export_me()");
        assert_eq!(app.storage.get(CODE_KEY).as_deref(), Some("export_me()"));
    }

    #[test]
    fn missing_import_file_leaves_buffer() {
        let mut app = test_app(StorageManager::in_memory());
        app.import_file(Path::new("/definitely/not/here.js"));
        assert!(app.error_message.is_some());
        assert_eq!(app.code(), DEFAULT_CODE);
    }
}
