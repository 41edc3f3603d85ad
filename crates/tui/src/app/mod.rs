use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent};

use api_types::{
    budget::{BudgetSummary, BudgetUpdate},
    category::Category,
    entry::{Entry, EntryNew},
    notification::Notification,
    transfer::TransferNew,
};
use client::{
    ApiClient, DatePreset, EntryFilter, KindFilter, MutationDispatcher, MutationSpec,
    NoticeLevel, NotificationPort, QueryCache, QueryKey, SessionContext, SortField,
    SummaryPeriod,
};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    quick_add, ui,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Budgets,
    Overview,
    Entries,
    Summary,
    Notifications,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Budgets => "Budgets",
            Self::Overview => "Overview",
            Self::Entries => "Entries",
            Self::Summary => "Summary",
            Self::Notifications => "Inbox",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
    pub pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetsMode {
    List,
    Search,
    Create,
    Transfer,
}

#[derive(Debug, Default)]
pub struct CreateBudgetForm {
    pub name: String,
    pub currency: String,
    /// 0 = name, 1 = currency.
    pub focus: usize,
}

impl CreateBudgetForm {
    fn active_field_mut(&mut self) -> &mut String {
        if self.focus == 0 {
            &mut self.name
        } else {
            &mut self.currency
        }
    }
}

#[derive(Debug, Default)]
pub struct TransferForm {
    /// Index into the destination list (all budgets except the source).
    pub to_index: usize,
    pub amount: String,
}

#[derive(Debug)]
pub struct BudgetsState {
    pub selected: usize,
    pub search: Option<String>,
    pub mode: BudgetsMode,
    pub input: String,
    pub create: CreateBudgetForm,
    pub transfer: TransferForm,
}

impl Default for BudgetsState {
    fn default() -> Self {
        Self {
            selected: 0,
            search: None,
            mode: BudgetsMode::List,
            input: String::new(),
            create: CreateBudgetForm::default(),
            transfer: TransferForm::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntriesMode {
    List,
    QuickAdd,
    Search,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    From,
    To,
}

#[derive(Debug)]
pub struct EntriesState {
    pub filter: EntryFilter,
    pub preset: DatePreset,
    pub selected: usize,
    pub mode: EntriesMode,
    pub input: String,
    pub range_from: String,
    pub range_to: String,
    pub range_focus: RangeField,
    pub pending: bool,
}

impl EntriesState {
    fn new(today: NaiveDate, per_page: u32) -> Self {
        let mut filter = EntryFilter::this_month(today);
        filter.set_per_page(per_page);
        Self {
            filter,
            preset: DatePreset::ThisMonth,
            selected: 0,
            mode: EntriesMode::List,
            input: String::new(),
            range_from: String::new(),
            range_to: String::new(),
            range_focus: RangeField::From,
            pending: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct SummaryState {
    pub period: SummaryPeriod,
}

#[derive(Debug, Default)]
pub struct NotificationsState {
    pub selected: usize,
}

#[derive(Debug)]
pub struct ToastState {
    pub message: String,
    pub level: NoticeLevel,
    pub expires: Instant,
}

/// Notification port implementation: mutations enqueue here, the event loop
/// drains into the visible toast.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: VecDeque<(NoticeLevel, String)>,
}

impl ToastQueue {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.pending.push_back((level, message.into()));
    }

    fn pop(&mut self) -> Option<(NoticeLevel, String)> {
        self.pending.pop_front()
    }
}

impl NotificationPort for ToastQueue {
    fn notify(&mut self, level: NoticeLevel, title: &str, body: Option<&str>) {
        let message = match body {
            Some(body) => format!("{title}: {body}"),
            None => title.to_string(),
        };
        self.push(level, message);
    }
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub section: Section,
    pub login: LoginState,
    pub budgets: BudgetsState,
    pub entries: EntriesState,
    pub summary: SummaryState,
    pub notifications: NotificationsState,
    pub budget_id: Option<String>,
    pub user_name: Option<String>,
    pub toast: Option<ToastState>,
    pub today: NaiveDate,
    pub base_url: String,
}

impl AppState {
    pub fn budgets_key(&self) -> QueryKey {
        QueryKey::budgets(self.budgets.search.as_deref())
    }

    pub fn budget_key(&self) -> Option<QueryKey> {
        self.budget_id.as_deref().map(QueryKey::budget)
    }

    pub fn balance_key(&self) -> Option<QueryKey> {
        self.budget_id.as_deref().map(QueryKey::budget_balance)
    }

    pub fn categories_key(&self) -> Option<QueryKey> {
        self.budget_id.as_deref().map(QueryKey::categories)
    }

    pub fn members_key(&self) -> Option<QueryKey> {
        self.budget_id.as_deref().map(QueryKey::members)
    }

    pub fn entries_key(&self) -> Option<QueryKey> {
        self.budget_id
            .as_deref()
            .map(|id| QueryKey::entries(id, &self.entries.filter))
    }

    pub fn summary_range(&self) -> (NaiveDate, NaiveDate) {
        self.summary.period.range(self.today)
    }

    pub fn summary_key(&self) -> Option<QueryKey> {
        let (from, to) = self.summary_range();
        self.budget_id
            .as_deref()
            .map(|id| QueryKey::summary(id, from, to))
    }

    /// The summary screen derives its category breakdown from a wide entry
    /// listing over the same period.
    pub fn summary_entries_filter(&self) -> EntryFilter {
        let (from, to) = self.summary_range();
        let mut filter = EntryFilter::default();
        filter.set_per_page(100);
        filter.set_range(Some(from), Some(to));
        filter
    }

    pub fn summary_entries_key(&self) -> Option<QueryKey> {
        self.budget_id
            .as_deref()
            .map(|id| QueryKey::entries(id, &self.summary_entries_filter()))
    }

    pub fn notifications_key(&self) -> QueryKey {
        QueryKey::notifications()
    }

    pub fn unread_key(&self) -> QueryKey {
        QueryKey::unread_count()
    }
}

pub struct App {
    config: AppConfig,
    api: ApiClient,
    session: SessionContext,
    pub cache: QueryCache,
    pub dispatcher: MutationDispatcher<ToastQueue>,
    pub state: AppState,
    tz: Tz,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let tz: Tz = config.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!("unknown timezone {:?}, falling back to UTC", config.timezone);
            Tz::UTC
        });
        let today = Utc::now().with_timezone(&tz).date_naive();

        let session = SessionContext::new();
        let api = ApiClient::new(&config.base_url, session.clone())?;

        let state = AppState {
            screen: Screen::Login,
            section: Section::Budgets,
            login: LoginState {
                email: config.email.clone(),
                password: String::new(),
                focus: LoginField::Email,
                message: None,
                pending: false,
            },
            budgets: BudgetsState::default(),
            entries: EntriesState::new(today, config.per_page),
            summary: SummaryState::default(),
            notifications: NotificationsState::default(),
            budget_id: None,
            user_name: None,
            toast: None,
            today,
            base_url: config.base_url.clone(),
        };

        Ok(Self {
            config,
            api,
            session,
            cache: QueryCache::new(),
            dispatcher: MutationDispatcher::new(ToastQueue::default()),
            state,
            tz,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            self.on_tick().await?;

            terminal
                .draw(|frame| ui::render(frame, &self.state, &self.cache))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn on_tick(&mut self) -> Result<()> {
        self.state.today = Utc::now().with_timezone(&self.tz).date_naive();

        // Session teardown after a 401/403 anywhere; drained exactly once.
        if self.session.take_expired() {
            self.cache.clear();
            self.state.screen = Screen::Login;
            self.state.login.password.clear();
            self.state.login.pending = false;
            self.state.login.message = Some("You have been signed out.".to_string());
            self.state.user_name = None;
            self.state.budget_id = None;
            self.dispatcher.notifier_mut().push(
                NoticeLevel::Error,
                "You have been signed out: Please log in again to continue.",
            );
        }

        self.drain_toasts();
        if let Some(toast) = &self.state.toast {
            if Instant::now() >= toast.expires {
                self.state.toast = None;
            }
        }

        if self.state.screen == Screen::Home {
            self.ensure_data().await;
        }
        Ok(())
    }

    fn drain_toasts(&mut self) {
        while let Some((level, message)) = self.dispatcher.notifier_mut().pop() {
            self.state.toast = Some(ToastState {
                message,
                level,
                expires: Instant::now() + Duration::from_secs(4),
            });
        }
    }

    /// Fetches whatever the current section reads and the cache does not
    /// have fresh: first render, invalidation after a mutation, or a manual
    /// refresh all funnel through here.
    async fn ensure_data(&mut self) {
        match self.state.section {
            Section::Budgets => {
                self.load_budgets().await;
            }
            Section::Overview => {
                self.load_budget_detail().await;
                self.load_balance().await;
                self.load_categories().await;
                self.load_entries().await;
                self.load_members().await;
            }
            Section::Entries => {
                self.load_categories().await;
                self.load_entries().await;
            }
            Section::Summary => {
                self.load_summary().await;
                self.load_summary_entries().await;
                self.load_categories().await;
            }
            Section::Notifications => {
                self.load_notifications().await;
            }
        }
        self.load_unread_count().await;
    }

    async fn load_budgets(&mut self) {
        let key = self.state.budgets_key();
        if !self.cache.needs_fetch(&key) {
            return;
        }
        let Some(generation) = self.cache.begin(&key) else {
            return;
        };
        let search = self.state.budgets.search.clone();
        let result = self.api.budgets(search.as_deref()).await;
        match result {
            Ok(budgets) => {
                self.cache.resolve_ok(&key, generation, budgets);
            }
            Err(err) => {
                self.cache.resolve_err(&key, generation, err.user_message());
            }
        }
    }

    async fn load_budget_detail(&mut self) {
        let Some(key) = self.state.budget_key() else {
            return;
        };
        if !self.cache.needs_fetch(&key) {
            return;
        }
        let Some(generation) = self.cache.begin(&key) else {
            return;
        };
        let budget_id = key.segments()[1].clone();
        let result = self.api.budget(&budget_id).await;
        match result {
            Ok(budget) => {
                self.cache.resolve_ok(&key, generation, budget);
            }
            Err(err) => {
                self.cache.resolve_err(&key, generation, err.user_message());
            }
        }
    }

    async fn load_balance(&mut self) {
        let Some(key) = self.state.balance_key() else {
            return;
        };
        if !self.cache.needs_fetch(&key) {
            return;
        }
        let Some(generation) = self.cache.begin(&key) else {
            return;
        };
        let budget_id = key.segments()[1].clone();
        let result = self.api.budget_balance(&budget_id).await;
        match result {
            Ok(balance) => {
                self.cache.resolve_ok(&key, generation, balance);
            }
            Err(err) => {
                self.cache.resolve_err(&key, generation, err.user_message());
            }
        }
    }

    async fn load_categories(&mut self) {
        let Some(key) = self.state.categories_key() else {
            return;
        };
        if !self.cache.needs_fetch(&key) {
            return;
        }
        let Some(generation) = self.cache.begin(&key) else {
            return;
        };
        let budget_id = key.segments()[1].clone();
        let result = self.api.categories(&budget_id).await;
        match result {
            Ok(categories) => {
                self.cache.resolve_ok(&key, generation, categories);
            }
            Err(err) => {
                self.cache.resolve_err(&key, generation, err.user_message());
            }
        }
    }

    /// Members are visible to owners only; skip the call for everyone else
    /// instead of bouncing off a 403.
    async fn load_members(&mut self) {
        let can_view = self
            .current_budget()
            .map(|budget| {
                client::permissions::BudgetPermissions::for_role(budget.user_role).can_view_members
            })
            .unwrap_or(false);
        if !can_view {
            return;
        }
        let Some(key) = self.state.members_key() else {
            return;
        };
        if !self.cache.needs_fetch(&key) {
            return;
        }
        let Some(generation) = self.cache.begin(&key) else {
            return;
        };
        let budget_id = key.segments()[1].clone();
        let result = self.api.members(&budget_id).await;
        match result {
            Ok(members) => {
                self.cache.resolve_ok(&key, generation, members);
            }
            Err(err) => {
                self.cache.resolve_err(&key, generation, err.user_message());
            }
        }
    }

    async fn load_entries(&mut self) {
        let Some(key) = self.state.entries_key() else {
            return;
        };
        if !self.cache.needs_fetch(&key) {
            return;
        }
        let Some(generation) = self.cache.begin(&key) else {
            return;
        };
        let Some(budget_id) = self.state.budget_id.clone() else {
            return;
        };
        let filter = self.state.entries.filter.clone();
        let result = self.api.entries(&budget_id, &filter).await;
        match result {
            Ok(entries) => {
                self.cache.resolve_ok(&key, generation, entries);
            }
            Err(err) => {
                self.cache.resolve_err(&key, generation, err.user_message());
            }
        }
    }

    async fn load_summary_entries(&mut self) {
        let Some(key) = self.state.summary_entries_key() else {
            return;
        };
        if !self.cache.needs_fetch(&key) {
            return;
        }
        let Some(generation) = self.cache.begin(&key) else {
            return;
        };
        let Some(budget_id) = self.state.budget_id.clone() else {
            return;
        };
        let filter = self.state.summary_entries_filter();
        let result = self.api.entries(&budget_id, &filter).await;
        match result {
            Ok(entries) => {
                self.cache.resolve_ok(&key, generation, entries);
            }
            Err(err) => {
                self.cache.resolve_err(&key, generation, err.user_message());
            }
        }
    }

    async fn load_summary(&mut self) {
        let Some(key) = self.state.summary_key() else {
            return;
        };
        if !self.cache.needs_fetch(&key) {
            return;
        }
        let Some(generation) = self.cache.begin(&key) else {
            return;
        };
        let Some(budget_id) = self.state.budget_id.clone() else {
            return;
        };
        let (from, to) = self.state.summary_range();
        let result = self
            .api
            .monthly_summary(&budget_id, Some(from), Some(to))
            .await;
        match result {
            Ok(summary) => {
                self.cache.resolve_ok(&key, generation, summary);
            }
            Err(err) => {
                self.cache.resolve_err(&key, generation, err.user_message());
            }
        }
    }

    async fn load_notifications(&mut self) {
        let key = self.state.notifications_key();
        if !self.cache.needs_fetch(&key) {
            return;
        }
        let Some(generation) = self.cache.begin(&key) else {
            return;
        };
        let result = self.api.notifications().await;
        match result {
            Ok(notifications) => {
                self.cache.resolve_ok(&key, generation, notifications);
            }
            Err(err) => {
                self.cache.resolve_err(&key, generation, err.user_message());
            }
        }
    }

    async fn load_unread_count(&mut self) {
        let key = self.state.unread_key();
        if !self.cache.needs_fetch(&key) {
            return;
        }
        let Some(generation) = self.cache.begin(&key) else {
            return;
        };
        let result = self.api.unread_count().await;
        match result {
            Ok(count) => {
                self.cache.resolve_ok(&key, generation, count);
            }
            Err(err) => {
                self.cache.resolve_err(&key, generation, err.user_message());
            }
        }
    }

    fn cached_budgets(&self) -> Option<Arc<Vec<BudgetSummary>>> {
        self.cache.get(&self.state.budgets_key())
    }

    fn cached_entries(&self) -> Option<Arc<Vec<Entry>>> {
        self.state
            .entries_key()
            .and_then(|key| self.cache.get(&key))
    }

    fn cached_categories(&self) -> Option<Arc<Vec<Category>>> {
        self.state
            .categories_key()
            .and_then(|key| self.cache.get(&key))
    }

    fn cached_notifications(&self) -> Option<Arc<Vec<Notification>>> {
        self.cache.get(&self.state.notifications_key())
    }

    fn current_budget(&self) -> Option<BudgetSummary> {
        self.state
            .budget_key()
            .and_then(|key| self.cache.get::<BudgetSummary>(&key))
            .map(|budget| (*budget).clone())
    }

    /// `true` while keystrokes belong to a text field rather than commands.
    fn typing(&self) -> bool {
        if self.state.screen == Screen::Login {
            return true;
        }
        match self.state.section {
            Section::Budgets => self.state.budgets.mode != BudgetsMode::List,
            Section::Entries => self.state.entries.mode != EntriesMode::List,
            _ => false,
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match ui::keymap::map_key(key, self.typing()) {
            ui::keymap::AppAction::Quit => {
                self.should_quit = true;
            }
            ui::keymap::AppAction::Cancel => self.cancel_mode(),
            ui::keymap::AppAction::NextField => self.advance_focus(),
            ui::keymap::AppAction::Submit => self.submit().await?,
            ui::keymap::AppAction::Backspace => {
                if let Some(field) = self.active_field_mut() {
                    field.pop();
                }
            }
            ui::keymap::AppAction::Up => self.select_prev(),
            ui::keymap::AppAction::Down => self.select_next(),
            ui::keymap::AppAction::Input(ch) => {
                if self.typing() {
                    if let Some(field) = self.active_field_mut() {
                        field.push(ch);
                    }
                } else {
                    self.command_key(ch).await?;
                }
            }
            ui::keymap::AppAction::None => {}
        }
        Ok(())
    }

    fn cancel_mode(&mut self) {
        match self.state.section {
            Section::Budgets => {
                self.state.budgets.mode = BudgetsMode::List;
                self.state.budgets.input.clear();
            }
            Section::Entries => {
                self.state.entries.mode = EntriesMode::List;
                self.state.entries.input.clear();
            }
            _ => {}
        }
    }

    fn advance_focus(&mut self) {
        if self.state.screen == Screen::Login {
            self.state.login.focus = match self.state.login.focus {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
            return;
        }
        match self.state.section {
            Section::Budgets if self.state.budgets.mode == BudgetsMode::Create => {
                self.state.budgets.create.focus = (self.state.budgets.create.focus + 1) % 2;
            }
            Section::Entries if self.state.entries.mode == EntriesMode::Range => {
                self.state.entries.range_focus = match self.state.entries.range_focus {
                    RangeField::From => RangeField::To,
                    RangeField::To => RangeField::From,
                };
            }
            _ => {}
        }
    }

    fn active_field_mut(&mut self) -> Option<&mut String> {
        if self.state.screen == Screen::Login {
            return Some(match self.state.login.focus {
                LoginField::Email => &mut self.state.login.email,
                LoginField::Password => &mut self.state.login.password,
            });
        }
        match self.state.section {
            Section::Budgets => match self.state.budgets.mode {
                BudgetsMode::Search => Some(&mut self.state.budgets.input),
                BudgetsMode::Create => Some(self.state.budgets.create.active_field_mut()),
                BudgetsMode::Transfer => Some(&mut self.state.budgets.transfer.amount),
                BudgetsMode::List => None,
            },
            Section::Entries => match self.state.entries.mode {
                EntriesMode::QuickAdd | EntriesMode::Search => Some(&mut self.state.entries.input),
                EntriesMode::Range => Some(match self.state.entries.range_focus {
                    RangeField::From => &mut self.state.entries.range_from,
                    RangeField::To => &mut self.state.entries.range_to,
                }),
                EntriesMode::List => None,
            },
            _ => None,
        }
    }

    fn select_prev(&mut self) {
        match self.state.section {
            Section::Budgets if self.state.budgets.mode == BudgetsMode::Transfer => {
                self.state.budgets.transfer.to_index =
                    self.state.budgets.transfer.to_index.saturating_sub(1);
            }
            Section::Budgets => {
                self.state.budgets.selected = self.state.budgets.selected.saturating_sub(1);
            }
            Section::Entries => {
                self.state.entries.selected = self.state.entries.selected.saturating_sub(1);
            }
            Section::Notifications => {
                self.state.notifications.selected =
                    self.state.notifications.selected.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn select_next(&mut self) {
        match self.state.section {
            Section::Budgets if self.state.budgets.mode == BudgetsMode::Transfer => {
                let len = self
                    .cached_budgets()
                    .map(|budgets| budgets.len().saturating_sub(1))
                    .unwrap_or(0);
                bump(&mut self.state.budgets.transfer.to_index, len);
            }
            Section::Budgets => {
                let len = self.cached_budgets().map(|b| b.len()).unwrap_or(0);
                bump(&mut self.state.budgets.selected, len);
            }
            Section::Entries => {
                let len = self.cached_entries().map(|e| e.len()).unwrap_or(0);
                bump(&mut self.state.entries.selected, len);
            }
            Section::Notifications => {
                let len = self.cached_notifications().map(|n| n.len()).unwrap_or(0);
                bump(&mut self.state.notifications.selected, len);
            }
            _ => {}
        }
    }

    async fn submit(&mut self) -> Result<()> {
        if self.state.screen == Screen::Login {
            return self.attempt_login().await;
        }
        match self.state.section {
            Section::Budgets => match self.state.budgets.mode {
                BudgetsMode::List => self.open_selected_budget(),
                BudgetsMode::Search => {
                    let input = std::mem::take(&mut self.state.budgets.input);
                    let trimmed = input.trim();
                    self.state.budgets.search =
                        (!trimmed.is_empty()).then(|| trimmed.to_string());
                    self.state.budgets.selected = 0;
                    self.state.budgets.mode = BudgetsMode::List;
                }
                BudgetsMode::Create => self.submit_create_budget().await,
                BudgetsMode::Transfer => self.submit_transfer().await,
            },
            Section::Entries => match self.state.entries.mode {
                EntriesMode::List => {}
                EntriesMode::QuickAdd => self.submit_quick_add().await,
                EntriesMode::Search => {
                    let input = std::mem::take(&mut self.state.entries.input);
                    self.state.entries.filter.set_search(&input);
                    self.state.entries.selected = 0;
                    self.state.entries.mode = EntriesMode::List;
                }
                EntriesMode::Range => self.submit_custom_range(),
            },
            _ => {}
        }
        Ok(())
    }

    async fn attempt_login(&mut self) -> Result<()> {
        let email = self.state.login.email.trim().to_string();
        let password = self.state.login.password.trim().to_string();
        if email.is_empty() || password.is_empty() {
            self.state.login.message = Some("Fill in both fields.".to_string());
            return Ok(());
        }

        self.state.login.pending = true;
        let result = self.api.login(&email, &password).await;
        self.state.login.pending = false;

        match result {
            Ok(auth) => {
                // A rejected login also latches the expiry flag; drop it so
                // the fresh session is not torn down by the next tick.
                self.session.take_expired();
                self.state.user_name = Some(auth.user.name.clone());
                self.state.login.message = None;
                self.state.screen = Screen::Home;
                self.state.section = Section::Budgets;
            }
            Err(err) => {
                self.session.take_expired();
                self.state.login.message = Some(err.user_message());
            }
        }
        Ok(())
    }

    fn open_selected_budget(&mut self) {
        let Some(budgets) = self.cached_budgets() else {
            return;
        };
        let Some(budget) = budgets.get(self.state.budgets.selected) else {
            return;
        };
        self.state.budget_id = Some(budget.id.clone());
        self.state.entries = EntriesState::new(self.state.today, self.config.per_page);
        self.state.summary = SummaryState::default();
        self.state.section = Section::Overview;
    }

    async fn submit_create_budget(&mut self) {
        let name = self.state.budgets.create.name.trim().to_string();
        let currency = self
            .state
            .budgets
            .create
            .currency
            .trim()
            .to_ascii_uppercase();
        if name.is_empty() || currency.is_empty() {
            self.dispatcher
                .notifier_mut()
                .push(NoticeLevel::Error, "Name and currency are required.");
            self.drain_toasts();
            return;
        }

        let result = self.api.create_budget(&name, &currency, None).await;
        let spec = MutationSpec::new("Budget created").invalidates(QueryKey::budgets(None));
        self.dispatcher.settle(&mut self.cache, &spec, result);
        self.drain_toasts();

        self.state.budgets.create = CreateBudgetForm::default();
        self.state.budgets.mode = BudgetsMode::List;
    }

    async fn toggle_archive_selected(&mut self) {
        let Some(budgets) = self.cached_budgets() else {
            return;
        };
        let Some(budget) = budgets.get(self.state.budgets.selected).cloned() else {
            return;
        };

        let update = BudgetUpdate {
            archived: Some(!budget.archived),
            ..BudgetUpdate::default()
        };
        let result = self.api.update_budget(&budget.id, &update).await;
        let title = if budget.archived {
            "Budget restored"
        } else {
            "Budget archived"
        };
        let spec = MutationSpec::budget_write(title, &budget.id);
        self.dispatcher.settle(&mut self.cache, &spec, result);
        self.drain_toasts();
    }

    async fn submit_quick_add(&mut self) {
        let Some(budget_id) = self.state.budget_id.clone() else {
            return;
        };
        let parsed = match quick_add::parse(&self.state.entries.input) {
            Ok(parsed) => parsed,
            Err(message) => {
                self.dispatcher.notifier_mut().push(NoticeLevel::Error, message);
                self.drain_toasts();
                return;
            }
        };

        let category_id = self.cached_categories().and_then(|categories| {
            categories
                .iter()
                .find(|category| {
                    category.kind == parsed.kind
                        && category.name.to_lowercase() == parsed.category
                })
                .map(|category| category.id.clone())
        });
        let Some(category_id) = category_id else {
            self.dispatcher.notifier_mut().push(
                NoticeLevel::Error,
                format!("No {} category named #{}.", parsed.kind.as_str(), parsed.category),
            );
            self.drain_toasts();
            return;
        };

        let entry = EntryNew {
            kind: parsed.kind,
            amount_minor: parsed.amount_minor,
            entry_date: self.state.today,
            description: parsed.note,
            category_id: Some(category_id),
        };

        self.state.entries.pending = true;
        let result = self.api.create_entry(&budget_id, &entry).await;
        self.state.entries.pending = false;

        let spec = MutationSpec::entry_write("Entry added", &budget_id);
        if self
            .dispatcher
            .settle(&mut self.cache, &spec, result)
            .is_some()
        {
            self.state.entries.input.clear();
            self.state.entries.mode = EntriesMode::List;
        }
        self.drain_toasts();
    }

    async fn delete_selected_entry(&mut self) {
        let Some(budget_id) = self.state.budget_id.clone() else {
            return;
        };
        let Some(entries) = self.cached_entries() else {
            return;
        };
        let Some(entry) = entries.get(self.state.entries.selected).cloned() else {
            return;
        };

        self.state.entries.pending = true;
        let result = self.api.delete_entry(&budget_id, &entry.id).await;
        self.state.entries.pending = false;

        let spec = MutationSpec::entry_write("Entry deleted", &budget_id);
        self.dispatcher.settle(&mut self.cache, &spec, result);
        self.drain_toasts();
        self.state.entries.selected = self.state.entries.selected.saturating_sub(1);
    }

    fn submit_custom_range(&mut self) {
        let from = self.state.entries.range_from.trim().parse::<NaiveDate>();
        let to = self.state.entries.range_to.trim().parse::<NaiveDate>();
        match (from, to) {
            (Ok(from), Ok(to)) if from <= to => {
                self.state.entries.filter.set_range(Some(from), Some(to));
                self.state.entries.preset = DatePreset::Custom;
                self.state.entries.selected = 0;
                self.state.entries.mode = EntriesMode::List;
            }
            _ => {
                self.dispatcher.notifier_mut().push(
                    NoticeLevel::Error,
                    "Enter a valid range as YYYY-MM-DD, from before to.",
                );
                self.drain_toasts();
            }
        }
    }

    async fn submit_transfer(&mut self) {
        let Some(budgets) = self.cached_budgets() else {
            return;
        };
        let Some(from) = budgets.get(self.state.budgets.selected).cloned() else {
            return;
        };
        let destinations: Vec<BudgetSummary> = budgets
            .iter()
            .filter(|budget| budget.id != from.id)
            .cloned()
            .collect();
        let Some(to) = destinations
            .get(self.state.budgets.transfer.to_index)
            .cloned()
        else {
            self.dispatcher
                .notifier_mut()
                .push(NoticeLevel::Error, "No destination budget.");
            self.drain_toasts();
            return;
        };

        let amount_minor = match client::money::normalize_amount(&self.state.budgets.transfer.amount)
        {
            Ok(amount) if amount > 0 => amount,
            _ => {
                self.dispatcher
                    .notifier_mut()
                    .push(NoticeLevel::Error, "Enter a positive amount.");
                self.drain_toasts();
                return;
            }
        };

        // The paired entries need a category on each side: expense on the
        // source, income on the destination.
        let from_category = self.first_category(&from.id, api_types::category::CategoryKind::Expense).await;
        let to_category = self.first_category(&to.id, api_types::category::CategoryKind::Income).await;
        let (Some(from_category_id), Some(to_category_id)) = (from_category, to_category) else {
            self.dispatcher.notifier_mut().push(
                NoticeLevel::Error,
                "Both budgets need a matching category for transfers.",
            );
            self.drain_toasts();
            return;
        };

        let transfer = TransferNew {
            from_budget_id: from.id.clone(),
            to_budget_id: to.id.clone(),
            amount_minor,
            currency_code: from.currency_code.clone(),
            transfer_date: self.state.today,
            note: None,
            from_category_id,
            to_category_id,
        };

        let result = self.api.create_transfer(&transfer).await;
        let spec = MutationSpec::transfer_write("Transfer complete", &from.id, &to.id)
            .error_title("Transfer failed");
        self.dispatcher.settle(&mut self.cache, &spec, result);
        self.drain_toasts();

        self.state.budgets.transfer = TransferForm::default();
        self.state.budgets.mode = BudgetsMode::List;
    }

    async fn first_category(
        &self,
        budget_id: &str,
        kind: api_types::category::CategoryKind,
    ) -> Option<String> {
        let categories = self.api.categories(budget_id).await.ok()?;
        categories
            .iter()
            .find(|category| category.kind == kind && !category.is_hidden)
            .map(|category| category.id.clone())
    }

    async fn mark_selected_read(&mut self) {
        let Some(notifications) = self.cached_notifications() else {
            return;
        };
        let Some(notification) = notifications
            .get(self.state.notifications.selected)
            .cloned()
        else {
            return;
        };
        if notification.is_read {
            return;
        }

        let result = self
            .api
            .mark_notifications_read(&[notification.id.clone()])
            .await;
        let spec = MutationSpec::notification_write("Marked as read");
        self.dispatcher.settle(&mut self.cache, &spec, result);
        self.drain_toasts();
    }

    async fn mark_all_read(&mut self) {
        let result = self.api.mark_all_notifications_read().await;
        let spec = MutationSpec::notification_write("All notifications marked as read");
        self.dispatcher.settle(&mut self.cache, &spec, result);
        self.drain_toasts();
    }

    fn export_entries(&mut self) {
        let Some(entries) = self.cached_entries() else {
            return;
        };
        let outcome = client::export::entries_to_csv(&entries)
            .map_err(|err| err.to_string())
            .and_then(|bytes| {
                std::fs::write("philand_entries.csv", bytes).map_err(|err| err.to_string())
            });
        match outcome {
            Ok(()) => self.dispatcher.notifier_mut().push(
                NoticeLevel::Success,
                "Exported to philand_entries.csv",
            ),
            Err(err) => self
                .dispatcher
                .notifier_mut()
                .push(NoticeLevel::Error, format!("Export failed: {err}")),
        }
        self.drain_toasts();
    }

    /// Marks the current section's data stale and lets the next tick
    /// refetch it.
    fn refresh_section(&mut self) {
        match self.state.section {
            Section::Budgets => {
                self.cache.invalidate_prefix(&QueryKey::new(["budgets"]));
            }
            Section::Overview | Section::Entries | Section::Summary => {
                if let Some(budget_id) = self.state.budget_id.as_deref() {
                    self.cache.invalidate_prefix(&QueryKey::budget(budget_id));
                    self.cache
                        .invalidate_prefix(&QueryKey::budget_balance(budget_id));
                    self.cache
                        .invalidate_prefix(&QueryKey::categories(budget_id));
                    self.cache
                        .invalidate_prefix(&QueryKey::entries_prefix(budget_id));
                    self.cache
                        .invalidate_prefix(&QueryKey::summary_prefix(budget_id));
                    self.cache.invalidate_prefix(&QueryKey::members(budget_id));
                }
            }
            Section::Notifications => {
                self.cache.invalidate_prefix(&QueryKey::notifications());
                self.cache.invalidate_prefix(&QueryKey::unread_count());
            }
        }
    }

    async fn command_key(&mut self, ch: char) -> Result<()> {
        match ch {
            'b' | 'B' => {
                self.state.section = Section::Budgets;
                return Ok(());
            }
            'o' | 'O' | 'h' | 'H' => {
                if self.state.budget_id.is_some() {
                    self.state.section = Section::Overview;
                }
                return Ok(());
            }
            'e' | 'E' => {
                if self.state.budget_id.is_some() {
                    self.state.section = Section::Entries;
                }
                return Ok(());
            }
            's' | 'S' => {
                if self.state.budget_id.is_some() {
                    self.state.section = Section::Summary;
                }
                return Ok(());
            }
            'n' | 'N' => {
                if self.state.section == Section::Entries {
                    self.next_entries_page();
                } else {
                    self.state.section = Section::Notifications;
                }
                return Ok(());
            }
            'p' | 'P' => {
                if self.state.section == Section::Entries {
                    self.state.entries.filter.prev_page();
                    self.state.entries.selected = 0;
                }
                return Ok(());
            }
            'r' | 'R' => {
                self.refresh_section();
                return Ok(());
            }
            'j' | 'J' => {
                self.select_next();
                return Ok(());
            }
            'k' | 'K' => {
                self.select_prev();
                return Ok(());
            }
            _ => {}
        }

        match self.state.section {
            Section::Budgets => match ch {
                '/' => {
                    self.state.budgets.input =
                        self.state.budgets.search.clone().unwrap_or_default();
                    self.state.budgets.mode = BudgetsMode::Search;
                }
                'c' | 'C' => {
                    self.state.budgets.create = CreateBudgetForm::default();
                    self.state.budgets.mode = BudgetsMode::Create;
                }
                'm' | 'M' => {
                    let count = self.cached_budgets().map(|b| b.len()).unwrap_or(0);
                    if count >= 2 {
                        self.state.budgets.transfer = TransferForm::default();
                        self.state.budgets.mode = BudgetsMode::Transfer;
                    }
                }
                'x' | 'X' => self.toggle_archive_selected().await,
                _ => {}
            },
            Section::Entries => match ch {
                'a' | 'A' => {
                    self.state.entries.input.clear();
                    self.state.entries.mode = EntriesMode::QuickAdd;
                }
                '/' => {
                    self.state.entries.input = self
                        .state
                        .entries
                        .filter
                        .search
                        .clone()
                        .unwrap_or_default();
                    self.state.entries.mode = EntriesMode::Search;
                }
                'f' | 'F' => {
                    let next = match self.state.entries.filter.kind {
                        KindFilter::All => KindFilter::Income,
                        KindFilter::Income => KindFilter::Expense,
                        KindFilter::Expense => KindFilter::All,
                    };
                    self.state.entries.filter.set_kind(next);
                    self.state.entries.selected = 0;
                }
                'd' | 'D' => self.cycle_date_preset(),
                '1' => self.sort_entries(SortField::Date),
                '2' => self.sort_entries(SortField::Amount),
                '3' => self.sort_entries(SortField::Description),
                'x' | 'X' => self.delete_selected_entry().await,
                'w' | 'W' => self.export_entries(),
                _ => {}
            },
            Section::Summary => {
                if ch == 'd' || ch == 'D' {
                    let all = SummaryPeriod::ALL;
                    let current = all
                        .iter()
                        .position(|period| *period == self.state.summary.period)
                        .unwrap_or(0);
                    self.state.summary.period = all[(current + 1) % all.len()];
                }
            }
            Section::Notifications => match ch {
                'm' | 'M' => self.mark_selected_read().await,
                'a' | 'A' => self.mark_all_read().await,
                _ => {}
            },
            Section::Overview => {}
        }
        Ok(())
    }

    fn sort_entries(&mut self, field: SortField) {
        self.state.entries.filter.toggle_sort(field);
        self.state.entries.selected = 0;
    }

    fn cycle_date_preset(&mut self) {
        let all = DatePreset::ALL;
        let current = all
            .iter()
            .position(|preset| *preset == self.state.entries.preset)
            .unwrap_or(0);
        let next = all[(current + 1) % all.len()];
        self.state.entries.preset = next;
        if next == DatePreset::Custom {
            self.state.entries.range_from = self
                .state
                .entries
                .filter
                .from
                .map(|d| d.to_string())
                .unwrap_or_default();
            self.state.entries.range_to = self
                .state
                .entries
                .filter
                .to
                .map(|d| d.to_string())
                .unwrap_or_default();
            self.state.entries.range_focus = RangeField::From;
            self.state.entries.mode = EntriesMode::Range;
        } else {
            self.state
                .entries
                .filter
                .apply_preset(next, self.state.today);
            self.state.entries.selected = 0;
        }
    }

    /// Next page only when the current page came back full; a short page is
    /// the last one.
    fn next_entries_page(&mut self) {
        let full_page = self
            .cached_entries()
            .map(|entries| entries.len() as u32 >= self.state.entries.filter.per_page)
            .unwrap_or(false);
        if full_page {
            self.state.entries.filter.next_page();
            self.state.entries.selected = 0;
        }
    }
}

fn bump(selected: &mut usize, len: usize) {
    if len == 0 {
        return;
    }
    *selected = (*selected + 1).min(len - 1);
}
