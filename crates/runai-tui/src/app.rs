//! Application state management for the RUN AI terminal client.
//!
//! This module contains the core `App` struct that owns the session, the API
//! client, the per-page state and the background task plumbing. Every request
//! runs on its own task; results come back over an MPSC channel and are
//! applied on the UI loop.

use std::future::Future;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use runai_core::api::{ApiClient, ApiError};
use runai_core::auth::SessionStore;
use runai_core::config::Config;
use runai_core::forms::{AuthForm, AuthMode, ProfileForm};
use runai_core::models::{ChatMessage, DocumentInfo, UserProfile};
use runai_core::nav::{Page, Screen};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// Each page has at most one request in flight, so a handful is plenty.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Longest prompt the chat input accepts
const MAX_PROMPT_LENGTH: usize = 2000;

/// Number of lines to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: u16 = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingLogout,
    ConfirmingQuit,
    Quitting,
}

/// Current UI focus area (sidebar or page content)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line feedback shown under a page's controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    /// A question is with the coach; the input is disabled
    pub waiting: bool,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll: u16,
}

#[derive(Debug, Default)]
pub struct DocumentsState {
    pub documents: Vec<DocumentInfo>,
    pub loaded: bool,
    pub loading: bool,
    pub updating: bool,
    pub selection: usize,
    pub status: Option<StatusLine>,
}

#[derive(Debug, Default)]
pub struct ProfileState {
    pub form: ProfileForm,
    pub loaded: bool,
    pub loading: bool,
    pub saving: bool,
    pub status: Option<StatusLine>,
}

impl ProfileState {
    pub fn can_save(&self) -> bool {
        !self.loading && !self.saving && self.form.is_submittable()
    }
}

#[derive(Debug, Default)]
pub struct ProgramState {
    pub program: Option<String>,
    pub generating: bool,
    pub error: Option<String>,
    pub scroll: u16,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background request tasks.
enum TaskResult {
    /// Login or registration finished for the submitted email
    Auth {
        email: String,
        result: Result<(), ApiError>,
    },
    /// Coach answer to the last chat question
    Answer(Result<String, ApiError>),
    Documents(Result<Vec<DocumentInfo>, ApiError>),
    /// Index rebuild finished with the backend's message
    RagUpdated(Result<String, ApiError>),
    ProfileLoaded(Result<UserProfile, ApiError>),
    ProfileSaved(Result<(), ApiError>),
    Program(Result<String, ApiError>),
}

/// A task result tagged with the session generation it was issued under
struct TaskMessage {
    generation: u64,
    result: TaskResult,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionStore,
    pub api: ApiClient,

    // UI State
    pub state: AppState,
    pub page: Page,
    pub focus: Focus,
    pub status_message: Option<String>,

    // Pages
    pub auth_form: AuthForm,
    pub chat: ChatState,
    pub documents: DocumentsState,
    pub profile: ProfileState,
    pub program: ProgramState,

    // Bumped on every login/logout so results from an earlier session are dropped
    generation: u64,

    // Background task channel
    task_rx: mpsc::Receiver<TaskMessage>,
    task_tx: mpsc::Sender<TaskMessage>,
}

impl App {
    /// Create a new application instance from loaded configuration
    pub fn new(config: Config) -> Result<Self> {
        let store = config.open_store()?;
        let session = SessionStore::initialize(store);
        debug!(state = ?session.state(), "Session initialized");

        let api = ApiClient::with_timeout(&config.api_url(), session.clone(), config.request_timeout())?;
        debug!(base_url = %api.base_url(), "API client configured");

        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let auth_form = AuthForm::new(config.last_email.clone());

        Ok(Self {
            config,
            session,
            api,

            state: AppState::Normal,
            page: Page::default(),
            focus: Focus::Sidebar,
            status_message: None,

            auth_form,
            chat: ChatState::default(),
            documents: DocumentsState::default(),
            profile: ProfileState::default(),
            program: ProgramState::default(),

            generation: 0,
            task_rx,
            task_tx,
        })
    }

    /// Which screen the shell should draw right now
    pub fn screen(&self) -> Screen {
        Screen::resolve(self.session.is_active(), self.page)
    }

    /// Run a request on its own task and route its result back to the UI loop
    fn spawn<F>(&self, request: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let tx = self.task_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = request.await;
            if tx.send(TaskMessage { generation, result }).await.is_err() {
                debug!("UI loop gone, dropping task result");
            }
        });
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Submit the login/registration form
    pub fn submit_auth(&mut self) {
        if self.auth_form.submitting {
            return;
        }
        let Ok((email, password)) = self.auth_form.begin_submit() else {
            return;
        };

        let api = self.api.clone();
        let mode = self.auth_form.mode;
        self.spawn(async move {
            let result = match mode {
                AuthMode::Login => api.login(&email, &password).await,
                AuthMode::Register => api.register(&email, &password).await,
            };
            TaskResult::Auth { email, result }
        });
    }

    /// End the session and return to the login screen
    pub fn logout(&mut self) {
        self.api.logout();
        self.reset_pages();
        self.auth_form = AuthForm::new(self.config.last_email.clone());
        self.state = AppState::Normal;
        info!("Logged out");
    }

    /// Forget everything fetched under the previous session
    fn reset_pages(&mut self) {
        self.generation += 1;
        self.page = Page::default();
        self.focus = Focus::Sidebar;
        self.status_message = None;
        self.chat = ChatState::default();
        self.documents = DocumentsState::default();
        self.profile = ProfileState::default();
        self.program = ProgramState::default();
    }

    fn on_auth_result(&mut self, email: String, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.auth_form.finish_submit(None);
                self.reset_pages();

                self.remember_email(email);
                info!("Login successful");
            }
            Err(e) => {
                warn!(error = %e, "Authentication failed");
                self.auth_form.finish_submit(Some(e.user_message()));
            }
        }
    }

    /// Record the email for the next login form. Only `last_email` is written
    /// back, so run-time overrides such as `--ephemeral` never reach the file.
    fn remember_email(&mut self, email: String) {
        self.config.last_email = Some(email.clone());
        let saved = Config::load().and_then(|mut stored| {
            stored.last_email = Some(email);
            stored.save()
        });
        if let Err(e) = saved {
            warn!(error = %e, "Failed to save config");
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Show a page, loading its data the first time it appears
    pub fn select_page(&mut self, page: Page) {
        self.page = page;
        match page {
            Page::Documents if !self.documents.loaded && !self.documents.loading => {
                self.load_documents();
            }
            Page::Profile if !self.profile.loaded && !self.profile.loading => {
                self.load_profile();
            }
            _ => {}
        }
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Accept a character typed into the chat prompt
    pub fn push_prompt_char(&mut self, c: char) {
        if !self.chat.waiting && !c.is_control() && self.chat.input.chars().count() < MAX_PROMPT_LENGTH {
            self.chat.input.push(c);
        }
    }

    /// Send the typed prompt to the coach
    pub fn send_prompt(&mut self) {
        let prompt = self.chat.input.trim().to_string();
        if prompt.is_empty() || self.chat.waiting {
            return;
        }

        self.chat.messages.push(ChatMessage::user(prompt.clone()));
        self.chat.input.clear();
        self.chat.waiting = true;
        self.chat.scroll = 0;

        let api = self.api.clone();
        self.spawn(async move { TaskResult::Answer(api.ask(&prompt).await) });
    }

    // =========================================================================
    // Documents
    // =========================================================================

    pub fn load_documents(&mut self) {
        if self.documents.loading {
            return;
        }
        self.documents.loading = true;

        let api = self.api.clone();
        self.spawn(async move { TaskResult::Documents(api.list_documents().await) });
    }

    /// Ask the backend to rebuild its index from the document folder
    pub fn update_index(&mut self) {
        if self.documents.updating {
            return;
        }
        self.documents.updating = true;
        self.documents.status = Some(StatusLine::info("Reindexing documents..."));

        let api = self.api.clone();
        self.spawn(async move { TaskResult::RagUpdated(api.update_rag().await) });
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub fn load_profile(&mut self) {
        if self.profile.loading {
            return;
        }
        self.profile.loading = true;
        self.profile.status = None;

        let api = self.api.clone();
        self.spawn(async move { TaskResult::ProfileLoaded(api.fetch_profile().await) });
    }

    /// Validate the form and save it; an invalid form never leaves the client
    pub fn save_profile(&mut self) {
        if self.profile.saving || self.profile.loading {
            return;
        }
        let profile = match self.profile.form.to_profile() {
            Ok(profile) => profile,
            Err(e) => {
                self.profile.status = Some(StatusLine::error(e.to_string()));
                return;
            }
        };

        self.profile.saving = true;
        self.profile.status = Some(StatusLine::info("Saving..."));

        let api = self.api.clone();
        self.spawn(async move { TaskResult::ProfileSaved(api.save_profile(&profile).await) });
    }

    // =========================================================================
    // Program
    // =========================================================================

    pub fn generate_program(&mut self) {
        if self.program.generating {
            return;
        }
        self.program.generating = true;
        self.program.error = None;
        self.program.program = None;
        self.program.scroll = 0;

        let api = self.api.clone();
        self.spawn(async move { TaskResult::Program(api.generate_program().await) });
    }

    // =========================================================================
    // Background Results
    // =========================================================================

    pub fn check_background_tasks(&mut self) {
        // Collect all pending results first to avoid borrow conflicts
        let mut messages = Vec::new();
        while let Ok(message) = self.task_rx.try_recv() {
            messages.push(message);
        }

        for message in messages {
            if message.generation != self.generation {
                debug!("Dropping result from an earlier session");
                continue;
            }
            self.process_task_result(message.result);
        }
    }

    /// Apply a single task result to the page that issued it.
    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Auth { email, result } => self.on_auth_result(email, result),

            TaskResult::Answer(result) => {
                self.chat.waiting = false;
                let message = match result {
                    Ok(answer) => ChatMessage::assistant(answer),
                    Err(e) => {
                        warn!(error = %e, "Coach query failed");
                        ChatMessage::error(format!("Error: {}", e.user_message()))
                    }
                };
                self.chat.messages.push(message);
                self.chat.scroll = 0;
            }

            TaskResult::Documents(result) => {
                self.documents.loading = false;
                self.documents.loaded = true;
                match result {
                    Ok(documents) => {
                        self.documents.selection = self
                            .documents
                            .selection
                            .min(documents.len().saturating_sub(1));
                        self.documents.documents = documents;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to list documents");
                        self.documents.documents.clear();
                        self.documents.selection = 0;
                        self.documents.status = Some(StatusLine::error(format!(
                            "Could not load documents: {}",
                            e.user_message()
                        )));
                    }
                }
            }

            TaskResult::RagUpdated(result) => {
                self.documents.updating = false;
                match result {
                    Ok(message) => {
                        self.documents.status = Some(StatusLine::success(message));
                        // Pick up files that were just indexed
                        self.load_documents();
                    }
                    Err(e) => {
                        warn!(error = %e, "Index update failed");
                        self.documents.status = Some(StatusLine::error(format!(
                            "Reindexing failed: {}",
                            e.user_message()
                        )));
                    }
                }
            }

            TaskResult::ProfileLoaded(result) => {
                self.profile.loading = false;
                match result {
                    Ok(profile) => {
                        self.profile.form = ProfileForm::from_profile(&profile);
                        self.profile.loaded = true;
                        self.profile.status = Some(StatusLine::info("Profile loaded."));
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load profile");
                        self.profile.status = Some(StatusLine::error(format!(
                            "Could not load your profile: {}",
                            e.user_message()
                        )));
                    }
                }
            }

            TaskResult::ProfileSaved(result) => {
                self.profile.saving = false;
                self.profile.status = Some(match result {
                    Ok(()) => StatusLine::success("Your profile has been saved."),
                    Err(e) => {
                        warn!(error = %e, "Failed to save profile");
                        StatusLine::error(format!("Could not save your profile: {}", e.user_message()))
                    }
                });
            }

            TaskResult::Program(result) => {
                self.program.generating = false;
                match result {
                    Ok(program) => self.program.program = Some(program),
                    Err(e) => {
                        warn!(error = %e, "Program generation failed");
                        self.program.error = Some(format!(
                            "Could not generate the program: {}",
                            e.user_message()
                        ));
                    }
                }
            }
        }
    }

    /// Identity shown in the sidebar
    pub fn user_email(&self) -> Option<String> {
        self.session.identity()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use runai_core::config::StorageBackend;

    use super::*;

    fn test_app() -> App {
        let config = Config {
            storage: StorageBackend::Memory,
            ..Config::default()
        };
        App::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_starts_on_login_screen_without_session() {
        let app = test_app();
        assert_eq!(app.screen(), Screen::Login);
    }

    #[tokio::test]
    async fn test_screen_follows_session() {
        let mut app = test_app();
        app.session.set_session("tok", "a@b.com");
        assert_eq!(app.screen(), Screen::Page(Page::Chat));
        assert_eq!(app.user_email().as_deref(), Some("a@b.com"));

        app.page = Page::Program;
        app.logout();
        assert_eq!(app.screen(), Screen::Login);
        assert_eq!(app.page, Page::Chat);
    }

    #[tokio::test]
    async fn test_empty_prompt_is_ignored() {
        let mut app = test_app();
        app.chat.input = "   ".to_string();
        app.send_prompt();
        assert!(app.chat.messages.is_empty());
        assert!(!app.chat.waiting);
    }

    #[tokio::test]
    async fn test_prompt_disabled_while_waiting() {
        let mut app = test_app();
        app.chat.waiting = true;
        app.push_prompt_char('a');
        assert!(app.chat.input.is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_profile_is_not_saved() {
        let mut app = test_app();
        app.session.set_session("tok", "a@b.com");
        app.save_profile();

        assert!(!app.profile.saving);
        let status = app.profile.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.starts_with("Required fields missing"));
        assert!(!app.profile.can_save());
    }

    #[tokio::test]
    async fn test_answer_result_appends_message() {
        let mut app = test_app();
        app.chat.waiting = true;
        app.process_task_result(TaskResult::Answer(Ok("Run easy today.".to_string())));
        assert!(!app.chat.waiting);
        assert_eq!(app.chat.messages.len(), 1);
        assert_eq!(app.chat.messages[0].content, "Run easy today.");

        app.process_task_result(TaskResult::Answer(Err(ApiError::Unauthenticated)));
        assert!(app.chat.messages[1].is_error);
    }

    #[tokio::test]
    async fn test_failed_login_keeps_form_error() {
        let mut app = test_app();
        app.auth_form.submitting = true;
        app.process_task_result(TaskResult::Auth {
            email: "a@b.com".to_string(),
            result: Err(ApiError::RequestFailed {
                status: 401,
                message: "Invalid credentials".to_string(),
            }),
        });
        assert_eq!(app.auth_form.error.as_deref(), Some("Invalid credentials"));
        assert!(!app.auth_form.submitting);
        assert_eq!(app.screen(), Screen::Login);
    }

    #[tokio::test]
    async fn test_results_from_previous_session_are_dropped() {
        let mut app = test_app();
        app.session.set_session("tok", "a@b.com");
        let stale_generation = app.generation;
        app.logout();

        app.task_tx
            .send(TaskMessage {
                generation: stale_generation,
                result: TaskResult::Documents(Ok(vec![DocumentInfo {
                    name: "old.pdf".to_string(),
                    size: "1 Ko".to_string(),
                }])),
            })
            .await
            .unwrap();
        app.check_background_tasks();

        assert!(app.documents.documents.is_empty());
        assert!(!app.documents.loaded);
    }
}
