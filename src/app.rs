//! Screen state and input routing for the whole application.

use crate::api::ApiError;
use crate::api_worker::{ApiOutcome, ApiRequest, ApiResponse, ApiWorker, Ticket};
use crate::db::wordlist;
use crate::models::{AppState, QuizResult, WordList};
use crate::reader::{DocumentSource, ReaderDocument, ReaderView};
use crate::session::{QuizSession, handle_quiz_input};
use crate::setup::{QuizSetup, SetupError, SetupStep, resolve_questions};
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rusqlite::Connection;
use std::collections::HashMap;
use std::time::Instant;

const MAX_INPUT_LEN: usize = 120;
const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// What an outstanding request is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Purpose {
    SignIn,
    Profile,
    WordLists,
    ListChanged,
    GenerateQuiz,
    LoadDocument(DocumentSource),
    AddWord,
}

impl Purpose {
    /// Whether a new request supersedes one already in flight. List edits all
    /// run to completion, each followed by its own refresh.
    fn supersedes(&self) -> bool {
        !matches!(self, Purpose::ListChanged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A dismissable message, optionally with a "try again" action.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    retry: Option<(Purpose, ApiRequest)>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            retry: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            retry: None,
        }
    }

    fn with_retry(mut self, purpose: Purpose, request: ApiRequest) -> Self {
        self.retry = Some((purpose, request));
        self
    }

    pub fn can_retry(&self) -> bool {
        self.retry.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Name,
    Email,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub registering: bool,
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: Option<LoginField>,
    pub error: Option<String>,
    pub busy: bool,
}

impl LoginForm {
    pub fn fields(&self) -> &'static [LoginField] {
        if self.registering {
            &[LoginField::Name, LoginField::Email, LoginField::Password]
        } else {
            &[LoginField::Email, LoginField::Password]
        }
    }

    pub fn focused(&self) -> LoginField {
        self.focus.unwrap_or(self.fields()[0])
    }

    fn focus_index(&self) -> usize {
        let focused = self.focused();
        self.fields().iter().position(|f| *f == focused).unwrap_or(0)
    }

    fn move_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let index = self.focus_index();
        let next = if forward {
            (index + 1) % fields.len()
        } else {
            (index + fields.len() - 1) % fields.len()
        };
        self.focus = Some(fields[next]);
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focused() {
            LoginField::Name => &mut self.name,
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_mode(&mut self) {
        self.registering = !self.registering;
        self.focus = None;
        self.error = None;
    }

    /// Builds the request, or explains which field is missing.
    fn request(&self) -> Result<ApiRequest, &'static str> {
        let email = self.email.trim();
        if self.registering && self.name.trim().is_empty() {
            return Err("Please enter your name.");
        }
        if email.is_empty() || self.password.is_empty() {
            return Err("Please enter your email and password.");
        }
        if self.registering {
            Ok(ApiRequest::Register {
                email: email.to_string(),
                password: self.password.clone(),
                name: self.name.trim().to_string(),
            })
        } else {
            Ok(ApiRequest::Login {
                email: email.to_string(),
                password: self.password.clone(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFocus {
    Lists,
    Words,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInputKind {
    NewList,
    OpenFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuInput {
    pub kind: MenuInputKind,
    pub buffer: String,
}

#[derive(Debug)]
pub struct MenuState {
    pub lists: Vec<WordList>,
    pub selected: usize,
    pub focus: MenuFocus,
    pub word_cursor: usize,
    pub input: Option<MenuInput>,
    pub confirm_delete: bool,
    pub loading: bool,
    pub from_cache: bool,
    pub synced_at: Option<DateTime<Local>>,
    pub status: Option<String>,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            lists: Vec::new(),
            selected: 0,
            focus: MenuFocus::Lists,
            word_cursor: 0,
            input: None,
            confirm_delete: false,
            loading: false,
            from_cache: false,
            synced_at: None,
            status: None,
        }
    }
}

impl MenuState {
    pub fn selected_list(&self) -> Option<&WordList> {
        self.lists.get(self.selected)
    }

    fn set_lists(&mut self, lists: Vec<WordList>) {
        self.lists = lists;
        self.selected = self.selected.min(self.lists.len().saturating_sub(1));
        self.clamp_word_cursor();
    }

    fn clamp_word_cursor(&mut self) {
        let words = self.selected_list().map_or(0, WordList::word_count);
        self.word_cursor = self.word_cursor.min(words.saturating_sub(1));
        if words == 0 {
            self.focus = MenuFocus::Lists;
        }
    }
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    pub login: LoginForm,
    pub menu: MenuState,
    pub setup: Option<QuizSetup>,
    pub quiz: Option<QuizSession>,
    pub result: Option<QuizResult>,
    pub reader: Option<ReaderView>,
    pub notice: Option<Notice>,
    worker: ApiWorker,
    cache: Option<Connection>,
    rng: StdRng,
    pending: HashMap<Ticket, Purpose>,
    last_list: Option<WordList>,
}

impl App {
    pub fn new(worker: ApiWorker, cache: Option<Connection>, rng: StdRng) -> Self {
        Self {
            state: AppState::Login,
            should_quit: false,
            login: LoginForm::default(),
            menu: MenuState::default(),
            setup: None,
            quiz: None,
            result: None,
            reader: None,
            notice: None,
            worker,
            cache,
            rng,
            pending: HashMap::new(),
            last_list: None,
        }
    }

    pub fn current_user_name(&self) -> Option<String> {
        self.worker.auth().current_user().map(|user| {
            if user.name.is_empty() {
                user.email
            } else {
                user.name
            }
        })
    }

    pub fn is_pending(&self, purpose: &Purpose) -> bool {
        self.pending.values().any(|p| p == purpose)
    }

    /// Submits `request`. Unless the purpose allows overlap, any outstanding
    /// request with the same purpose is cancelled first.
    fn submit(&mut self, purpose: Purpose, request: ApiRequest) {
        if purpose.supersedes() {
            self.cancel(&purpose);
        }
        let ticket = self.worker.submit(request);
        self.pending.insert(ticket, purpose);
    }

    fn cancel(&mut self, purpose: &Purpose) {
        let tickets: Vec<Ticket> = self
            .pending
            .iter()
            .filter(|(_, p)| *p == purpose)
            .map(|(t, _)| *t)
            .collect();
        for ticket in tickets {
            self.pending.remove(&ticket);
            self.worker.cancel(ticket);
        }
    }

    fn cancel_all(&mut self) {
        for ticket in self.pending.drain().map(|(t, _)| t).collect::<Vec<_>>() {
            self.worker.cancel(ticket);
        }
    }

    fn next_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.next_u64())
    }

    pub fn tick(&mut self, now: Instant) {
        while let Some(response) = self.worker.try_recv() {
            self.handle_response(response);
        }

        if self.state == AppState::Quiz {
            if let Some(result) = self.quiz.as_mut().and_then(|quiz| quiz.tick(now)) {
                self.quiz = None;
                self.result = Some(result);
                self.state = AppState::Summary;
            }
        }
    }

    pub fn handle_response(&mut self, response: ApiResponse) {
        let Some(purpose) = self.pending.remove(&response.ticket) else {
            tracing::debug!("Ignoring stale response {:?}", response.ticket);
            return;
        };

        match response.result {
            Ok(outcome) => self.on_success(purpose, outcome),
            Err(err) if err.is_auth_failure() && purpose != Purpose::SignIn => {
                self.on_auth_failure(&err)
            }
            Err(err) => self.on_failure(purpose, err),
        }
    }

    fn on_success(&mut self, purpose: Purpose, outcome: ApiOutcome) {
        match (purpose, outcome) {
            (Purpose::SignIn, ApiOutcome::SignedIn(profile)) => {
                tracing::info!("Signed in as {}", profile.email);
                self.login.busy = false;
                self.login.error = None;
                self.login.password.clear();
                self.enter_menu();
            }
            (Purpose::Profile, ApiOutcome::Profile(_)) => {}
            (Purpose::WordLists, ApiOutcome::WordLists(dtos)) => {
                let lists: Vec<WordList> = dtos.into_iter().map(WordList::from).collect();
                self.store_cache(&lists);
                self.menu.set_lists(lists);
                self.menu.loading = false;
                self.menu.from_cache = false;
            }
            (Purpose::ListChanged, ApiOutcome::Done) => {
                self.refresh_lists();
            }
            (Purpose::GenerateQuiz, ApiOutcome::Quiz(quiz)) => self.start_quiz(&quiz),
            (Purpose::LoadDocument(source), ApiOutcome::Document { text, page_count }) => {
                let document = ReaderDocument::new(source.title(), text);
                if document.is_empty() {
                    self.close_reader();
                    self.notice = Some(Notice::info("No readable text was found in this file."));
                    return;
                }
                tracing::debug!("Loaded {} page(s)", page_count);
                if let Some(reader) = self.reader.as_mut().filter(|r| r.source == source) {
                    reader.open(document);
                }
            }
            (Purpose::AddWord, ApiOutcome::Done) => {
                if let Some(reader) = self.reader.as_mut() {
                    reader.saving = false;
                    if let Some(picker) = reader.picker.take() {
                        reader.status = Some(format!("Added \"{}\"", picker.selection.word));
                    }
                }
                self.refresh_lists();
            }
            (purpose, outcome) => {
                tracing::warn!("Unexpected outcome {:?} for {:?}", outcome, purpose);
            }
        }
    }

    fn on_failure(&mut self, purpose: Purpose, err: ApiError) {
        let message = err.user_message();
        match purpose {
            Purpose::SignIn => {
                self.login.busy = false;
                self.login.error = Some(if err.is_auth_failure() {
                    INVALID_CREDENTIALS.to_string()
                } else {
                    message
                });
            }
            Purpose::Profile => {
                self.menu.status = Some(message);
            }
            Purpose::WordLists => {
                self.menu.loading = false;
                if self.menu.from_cache && !self.menu.lists.is_empty() {
                    self.menu.status = Some(format!("Showing saved lists. {}", message));
                } else {
                    self.notice = Some(
                        Notice::error(message)
                            .with_retry(Purpose::WordLists, ApiRequest::FetchWordLists),
                    );
                }
            }
            Purpose::ListChanged => {
                self.notice = Some(Notice::error(message));
            }
            Purpose::GenerateQuiz => {
                if let Some(setup) = self.setup.as_mut() {
                    setup.fail(SetupError::Request(message));
                }
            }
            Purpose::LoadDocument(source) => {
                self.close_reader();
                let request = source.request();
                let notice = Notice::error(message);
                self.notice = Some(match request {
                    Some(request) => notice.with_retry(Purpose::LoadDocument(source), request),
                    None => notice,
                });
            }
            Purpose::AddWord => {
                if let Some(reader) = self.reader.as_mut() {
                    reader.saving = false;
                    reader.status = Some(message);
                }
            }
        }
    }

    fn on_auth_failure(&mut self, err: &ApiError) {
        tracing::warn!("Returning to sign-in after {}", err);
        self.cancel_all();
        self.reset_session_state();
        self.login.error = Some(err.user_message());
    }

    fn reset_session_state(&mut self) {
        self.setup = None;
        self.quiz = None;
        self.result = None;
        self.reader = None;
        self.notice = None;
        self.last_list = None;
        self.menu = MenuState::default();
        self.login.busy = false;
        self.login.password.clear();
        if let Some(conn) = &self.cache {
            if let Err(e) = wordlist::clear(conn) {
                tracing::warn!("Failed to clear word-list mirror: {}", e);
            }
        }
        self.state = AppState::Login;
    }

    fn store_cache(&mut self, lists: &[WordList]) {
        if let Some(conn) = self.cache.as_mut() {
            if let Err(e) = wordlist::replace_word_lists(conn, lists) {
                tracing::warn!("Failed to mirror word lists: {}", e);
            }
        }
    }

    fn enter_menu(&mut self) {
        self.state = AppState::Menu;
        if self.menu.lists.is_empty() {
            if let Some(conn) = &self.cache {
                match wordlist::load_word_lists(conn) {
                    Ok(lists) if !lists.is_empty() => {
                        self.menu.set_lists(lists);
                        self.menu.from_cache = true;
                        self.menu.synced_at = wordlist::last_synced(conn).ok().flatten();
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Failed to read word-list mirror: {}", e),
                }
            }
        }
        self.refresh_lists();
    }

    fn refresh_lists(&mut self) {
        self.menu.loading = true;
        self.submit(Purpose::WordLists, ApiRequest::FetchWordLists);
    }

    fn start_quiz(&mut self, quiz: &crate::api::dto::QuizDto) {
        let Some(setup) = self.setup.as_ref() else {
            return;
        };
        let requested = setup.requested();
        let list_name = setup.list.name.clone();

        let mut rng = self.next_rng();
        let questions = match resolve_questions(quiz, requested, &mut rng) {
            Ok(questions) => questions,
            Err(err) => {
                if let Some(setup) = self.setup.as_mut() {
                    setup.fail(err);
                }
                return;
            }
        };

        match QuizSession::new(list_name, questions, rng) {
            Ok(session) => {
                self.last_list = self.setup.take().map(|s| s.list);
                self.quiz = Some(session);
                self.result = None;
                self.state = AppState::Quiz;
            }
            Err(e) => {
                if let Some(setup) = self.setup.as_mut() {
                    setup.fail(SetupError::Request(e.to_string()));
                }
            }
        }
    }

    fn open_setup(&mut self, list: WordList) {
        match QuizSetup::new(list) {
            Ok(setup) => {
                self.setup = Some(setup);
                self.state = AppState::QuizSetup;
            }
            Err(err) => self.notice = Some(Notice::info(err.to_string())),
        }
    }

    pub fn open_reader(&mut self, source: DocumentSource) {
        self.menu.input = None;
        let request = source.request();
        match request {
            None => self.reader = Some(ReaderView::sample()),
            Some(request) => {
                self.reader = Some(ReaderView::loading(source.clone()));
                self.submit(Purpose::LoadDocument(source), request);
            }
        }
        self.state = AppState::Reader;
    }

    fn close_reader(&mut self) {
        if let Some(reader) = self.reader.take() {
            self.cancel(&Purpose::LoadDocument(reader.source));
        }
        self.cancel(&Purpose::AddWord);
        self.state = AppState::Menu;
    }

    fn logout(&mut self) {
        self.cancel_all();
        self.worker.auth().logout();
        self.reset_session_state();
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.notice.is_some() {
            self.handle_notice_key(key);
            return;
        }

        match self.state {
            AppState::Login => self.handle_login_key(key),
            AppState::Menu => self.handle_menu_key(key),
            AppState::QuizSetup => self.handle_setup_key(key, now),
            AppState::Quiz => {
                if let Some(quiz) = self.quiz.as_mut() {
                    handle_quiz_input(quiz, key, &mut self.state, now);
                }
            }
            AppState::QuizQuitConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    tracing::info!("Quiz abandoned");
                    self.quiz = None;
                    self.state = AppState::Menu;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state = AppState::Quiz;
                }
                _ => {}
            },
            AppState::Summary => match key.code {
                KeyCode::Char('r') => {
                    if let Some(list) = self.last_list.clone() {
                        self.result = None;
                        self.open_setup(list);
                    }
                }
                KeyCode::Char('m') | KeyCode::Enter | KeyCode::Esc => {
                    self.result = None;
                    self.state = AppState::Menu;
                }
                _ => {}
            },
            AppState::Reader => self.handle_reader_key(key),
        }
    }

    fn handle_notice_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => {
                if !self.notice.as_ref().is_some_and(Notice::can_retry) {
                    return;
                }
                if let Some(Notice {
                    retry: Some((purpose, request)),
                    ..
                }) = self.notice.take()
                {
                    tracing::info!("Retrying {:?}", purpose);
                    match purpose {
                        Purpose::LoadDocument(source) => self.open_reader(source),
                        Purpose::WordLists => self.refresh_lists(),
                        other => self.submit(other, request),
                    }
                }
            }
            KeyCode::Enter | KeyCode::Esc => self.notice = None,
            _ => {}
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if self.login.busy {
            if key.code == KeyCode::Esc {
                self.cancel(&Purpose::SignIn);
                self.login.busy = false;
            }
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('n') {
                self.login.toggle_mode();
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.login.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.login.move_focus(false),
            KeyCode::Enter => {
                if self.login.focused() != LoginField::Password {
                    self.login.move_focus(true);
                    return;
                }
                match self.login.request() {
                    Ok(request) => {
                        self.login.busy = true;
                        self.login.error = None;
                        self.submit(Purpose::SignIn, request);
                    }
                    Err(message) => self.login.error = Some(message.to_string()),
                }
            }
            KeyCode::Backspace => {
                self.login.field_mut().pop();
            }
            KeyCode::Char(c) => {
                let field = self.login.field_mut();
                if field.chars().count() < MAX_INPUT_LEN {
                    field.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        if let Some(input) = self.menu.input.as_mut() {
            match key.code {
                KeyCode::Esc => self.menu.input = None,
                KeyCode::Backspace => {
                    input.buffer.pop();
                }
                KeyCode::Char(c) if input.buffer.chars().count() < MAX_INPUT_LEN => {
                    input.buffer.push(c);
                }
                KeyCode::Enter => {
                    let value = input.buffer.trim().to_string();
                    let kind = input.kind;
                    if value.is_empty() {
                        return;
                    }
                    self.menu.input = None;
                    match kind {
                        MenuInputKind::NewList => self.submit(
                            Purpose::ListChanged,
                            ApiRequest::CreateWordList { name: value },
                        ),
                        MenuInputKind::OpenFile => {
                            self.open_reader(DocumentSource::from_path(value))
                        }
                    }
                }
                _ => {}
            }
            return;
        }

        if self.menu.confirm_delete {
            if let (KeyCode::Char('y'), Some(list)) = (key.code, self.menu.selected_list()) {
                let list_id = list.id;
                self.submit(Purpose::ListChanged, ApiRequest::DeleteWordList { list_id });
            }
            self.menu.confirm_delete = false;
            return;
        }

        match (self.menu.focus, key.code) {
            (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => self.should_quit = true,
            (_, KeyCode::Tab) => {
                let has_words = self.menu.selected_list().is_some_and(|l| l.word_count() > 0);
                self.menu.focus = match self.menu.focus {
                    MenuFocus::Lists if has_words => MenuFocus::Words,
                    _ => MenuFocus::Lists,
                };
            }
            (MenuFocus::Lists, KeyCode::Up) => {
                self.menu.selected = self.menu.selected.saturating_sub(1);
                self.menu.word_cursor = 0;
            }
            (MenuFocus::Lists, KeyCode::Down) => {
                if self.menu.selected + 1 < self.menu.lists.len() {
                    self.menu.selected += 1;
                    self.menu.word_cursor = 0;
                }
            }
            (MenuFocus::Words, KeyCode::Up) => {
                self.menu.word_cursor = self.menu.word_cursor.saturating_sub(1);
            }
            (MenuFocus::Words, KeyCode::Down) => {
                self.menu.word_cursor += 1;
                self.menu.clamp_word_cursor();
            }
            (MenuFocus::Words, KeyCode::Char('x')) => {
                let target = self.menu.selected_list().and_then(|list| {
                    let word = list.words.get(self.menu.word_cursor)?;
                    Some((list.id, word.id.parse::<i64>().ok()?))
                });
                if let Some((list_id, word_id)) = target {
                    self.submit(
                        Purpose::ListChanged,
                        ApiRequest::RemoveWord { list_id, word_id },
                    );
                }
            }
            (_, KeyCode::Enter) => {
                if let Some(list) = self.menu.selected_list().cloned() {
                    self.open_setup(list);
                }
            }
            (_, KeyCode::Char('r')) => {
                self.menu.status = None;
                self.refresh_lists();
                self.submit(Purpose::Profile, ApiRequest::RefreshProfile);
            }
            (_, KeyCode::Char('n')) => {
                self.menu.input = Some(MenuInput {
                    kind: MenuInputKind::NewList,
                    buffer: String::new(),
                });
            }
            (_, KeyCode::Char('f')) => {
                self.menu.input = Some(MenuInput {
                    kind: MenuInputKind::OpenFile,
                    buffer: String::new(),
                });
            }
            (_, KeyCode::Char('d')) => {
                self.menu.confirm_delete = self.menu.selected_list().is_some();
            }
            (_, KeyCode::Char('o')) => self.open_reader(DocumentSource::Sample),
            (_, KeyCode::Char('l')) => self.logout(),
            _ => {}
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(setup) = self.setup.as_mut() else {
            self.state = AppState::Menu;
            return;
        };

        match setup.step() {
            SetupStep::Count => match key.code {
                KeyCode::Esc => {
                    self.setup = None;
                    self.state = AppState::Menu;
                }
                KeyCode::Backspace => setup.pop_char(),
                KeyCode::Char(c) => setup.push_char(c),
                KeyCode::Enter => match setup.begin(now) {
                    Ok(_) => {
                        let list_id = setup.list.id;
                        self.submit(Purpose::GenerateQuiz, ApiRequest::GenerateQuiz { list_id });
                    }
                    Err(err) => setup.fail(err),
                },
                _ => {}
            },
            SetupStep::Loading { .. } => {
                if key.code == KeyCode::Esc {
                    setup.back_to_count();
                    self.cancel(&Purpose::GenerateQuiz);
                }
            }
            SetupStep::Failed => match key.code {
                KeyCode::Char('r') => {
                    let retryable = setup.error().is_some_and(SetupError::is_retryable);
                    if retryable && setup.retry(now).is_some() {
                        let list_id = setup.list.id;
                        self.submit(Purpose::GenerateQuiz, ApiRequest::GenerateQuiz { list_id });
                    }
                }
                KeyCode::Enter | KeyCode::Esc => setup.back_to_count(),
                _ => {}
            },
        }
    }

    fn handle_reader_key(&mut self, key: KeyEvent) {
        let lists = self.menu.lists.len();
        let Some(reader) = self.reader.as_mut() else {
            self.state = AppState::Menu;
            return;
        };

        if let Some(picker) = reader.picker.as_mut() {
            if reader.saving {
                return;
            }
            match key.code {
                KeyCode::Esc => reader.close_picker(),
                KeyCode::Up => picker.cursor = picker.cursor.saturating_sub(1),
                KeyCode::Down => {
                    if picker.cursor + 1 < lists {
                        picker.cursor += 1;
                    }
                }
                KeyCode::Enter => {
                    let Some(list) = self.menu.lists.get(picker.cursor) else {
                        return;
                    };
                    let request = ApiRequest::AddWord {
                        list_id: list.id,
                        request: picker.selection.to_request(),
                    };
                    tracing::info!(
                        "Adding \"{}\" to list {}",
                        picker.selection.word,
                        list.id
                    );
                    reader.saving = true;
                    self.submit(Purpose::AddWord, request);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_reader(),
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => reader.move_next(),
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab => reader.move_prev(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if lists == 0 {
                    reader.status = Some("Create a word list first.".to_string());
                } else {
                    reader.pick();
                }
            }
            _ => {}
        }
    }
}
