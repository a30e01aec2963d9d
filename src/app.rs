use std::time::{Duration, Instant};

use crate::core::{parse_command, Action, Command, NotifyLevel};
use crate::domain::{
    page_count, paginate, truncate_address, ActionKind, ActionPhase, ActionRequest, Listing,
    ListingQuery, Octas, Rarity, SortOrder,
};

/// Cards per row in the grid
pub const GRID_COLUMNS: usize = 4;

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Modal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Default, Clone)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

/// Dialog for one purchase/tip/transfer
#[derive(Debug, Clone)]
pub struct ActionModal {
    pub kind: ActionKind,
    /// Snapshot of the card the dialog was opened on
    pub listing: Listing,
    /// Tip amount or transfer recipient as typed
    pub input: String,
    /// Local validation message
    pub error: Option<String>,
}

impl ActionModal {
    pub fn title(&self) -> &'static str {
        match self.kind {
            ActionKind::Purchase => "Purchase NFT",
            ActionKind::Tip => "Tip Creator",
            ActionKind::Transfer => "Transfer NFT",
        }
    }

    pub fn takes_input(&self) -> bool {
        !matches!(self.kind, ActionKind::Purchase)
    }

    pub fn input_label(&self) -> &'static str {
        match self.kind {
            ActionKind::Purchase => "",
            ActionKind::Tip => "Amount (APT)",
            ActionKind::Transfer => "Recipient address",
        }
    }
}

/// Full-screen success/failure indicator
#[derive(Debug, Clone)]
pub struct Feedback {
    pub success: bool,
    pub message: String,
    pub since: Instant,
}

pub struct App {
    /// Last fetched set, normalized but unfiltered
    pub fetched: Vec<Listing>,
    /// Pipeline output: filtered and sorted
    pub listings: Vec<Listing>,
    pub query: ListingQuery,
    /// 1-based
    pub page: usize,
    /// Index within the current page
    pub selected: usize,
    pub input_mode: InputMode,
    pub command: CommandBar,
    pub modal: Option<ActionModal>,
    pub action_phase: ActionPhase,
    pub feedback: Option<Feedback>,
    pub feedback_duration: Duration,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
    pub loading: bool,
    pub loaded_once: bool,
    pub endpoint: String,
    pub signer: String,
    pub account: Option<String>,
    pub marketplace_address: String,
    pending_fetch_request: bool,
    fetch_seq: u64,
    pending_account_request: bool,
    pending_action_request: Option<ActionRequest>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            fetched: Vec::new(),
            listings: Vec::new(),
            query: ListingQuery::default(),
            page: 1,
            selected: 0,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            modal: None,
            action_phase: ActionPhase::Idle,
            feedback: None,
            feedback_duration: Duration::from_secs(5),
            status: None,
            help_open: false,
            should_quit: false,
            loading: false,
            loaded_once: false,
            endpoint: String::new(),
            signer: String::new(),
            account: None,
            marketplace_address: String::new(),
            pending_fetch_request: false,
            fetch_seq: 0,
            pending_account_request: false,
            pending_action_request: None,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
        if let Some(feedback) = self.feedback.as_ref() {
            if feedback.since.elapsed() >= self.feedback_duration {
                self.feedback = None;
            }
        }
    }

    // ----- listings -------------------------------------------------------

    pub fn visible_listings(&self) -> &[Listing] {
        paginate(&self.listings, self.page)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.listings.len())
    }

    pub fn selected_listing(&self) -> Option<&Listing> {
        self.visible_listings().get(self.selected)
    }

    pub fn request_fetch(&mut self) {
        self.pending_fetch_request = true;
        self.loading = true;
    }

    /// Run the pipeline over a fresh fetch result
    pub fn apply_listings(&mut self, listings: Vec<Listing>) {
        self.fetched = listings;
        self.listings = self.query.apply(&self.fetched);
        self.loading = false;
        self.loaded_once = true;
        self.page = self.page.clamp(1, self.page_count());
        self.clamp_selection();
    }

    /// Apply the result of fetch `seq`; results of superseded fetches are dropped
    pub fn apply_fetched(&mut self, seq: u64, listings: Vec<Listing>) {
        if seq < self.fetch_seq {
            tracing::debug!(seq, latest = self.fetch_seq, "dropping stale listings");
            return;
        }
        self.apply_listings(listings);
    }

    pub fn apply_fetch_error(&mut self, seq: u64, message: String) {
        if seq < self.fetch_seq {
            tracing::debug!(seq, latest = self.fetch_seq, %message, "dropping stale fetch error");
            return;
        }
        self.apply_fetch_failed(message);
    }

    /// Read path failed; whatever is on screen stays
    pub fn apply_fetch_failed(&mut self, message: String) {
        tracing::warn!(%message, "fetch failed");
        self.loading = false;
        self.set_status("Failed to fetch NFTs.", StatusLevel::Error);
    }

    pub fn apply_connected(&mut self, endpoint: String, signer: String, account: Option<String>) {
        self.endpoint = endpoint;
        self.signer = signer;
        self.apply_account(account);
    }

    pub fn apply_account(&mut self, account: Option<String>) {
        self.account = account;
    }

    pub fn apply_runtime_error(&mut self, message: String) {
        self.set_status(message, StatusLevel::Error);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_listings().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    // ----- filters --------------------------------------------------------

    fn filters_changed(&mut self) {
        self.page = 1;
        self.selected = 0;
        self.request_fetch();
        self.set_status(format!("Filters: {}", self.query.summary()), StatusLevel::Info);
    }

    pub fn set_rarity(&mut self, rarity: Option<Rarity>) {
        self.query.rarity = rarity;
        self.filters_changed();
    }

    pub fn set_price_from(&mut self, from: Option<Octas>) {
        self.query.price_from = from;
        self.filters_changed();
    }

    pub fn set_price_to(&mut self, to: Option<Octas>) {
        self.query.price_to = to;
        self.filters_changed();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.query.sort = sort;
        self.filters_changed();
    }

    pub fn toggle_sort(&mut self) {
        self.set_sort(self.query.sort.toggled());
    }

    pub fn clear_filters(&mut self) {
        self.query = ListingQuery::default();
        self.filters_changed();
    }

    pub fn refresh(&mut self) {
        self.request_fetch();
        self.set_status("Refreshing listings…", StatusLevel::Info);
    }

    // ----- navigation -----------------------------------------------------

    pub fn next_page(&mut self) {
        if self.page < self.page_count() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        let last = self.page_count();
        if page > last {
            self.set_status(format!("Only {last} page(s)"), StatusLevel::Warn);
            return;
        }
        self.page = page.max(1);
        self.selected = 0;
    }

    /// Move the card cursor by `dx` columns and `dy` rows
    pub fn move_selection(&mut self, dx: isize, dy: isize) {
        let len = self.visible_listings().len();
        if len == 0 {
            return;
        }
        let target = self.selected as isize + dx + dy * GRID_COLUMNS as isize;
        if (0..len as isize).contains(&target) {
            self.selected = target as usize;
        }
    }

    // ----- command bar ----------------------------------------------------

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    /// Run the typed command; side effects the app cannot perform come back
    pub fn apply_command(&mut self) -> Action {
        let input = self.command.input.trim().to_string();
        self.exit_command();
        if input.is_empty() {
            return Action::None;
        }
        let cmd = parse_command(&input);
        if !matches!(cmd, Command::Unknown(_) | Command::Invalid(_)) {
            self.command.last = Some(input);
        }
        let action = self.execute_command(&cmd);
        self.apply_action(action)
    }

    /// Execute a parsed command
    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        match cmd {
            Command::Rarity(rarity) => {
                self.set_rarity(*rarity);
                Action::None
            }
            Command::PriceFrom(from) => {
                self.set_price_from(*from);
                Action::None
            }
            Command::PriceTo(to) => {
                self.set_price_to(*to);
                Action::None
            }
            Command::Sort(order) => {
                self.set_sort(*order);
                Action::None
            }
            Command::Page(page) => {
                self.go_to_page(*page);
                Action::None
            }
            Command::Clear => {
                if self.query.is_default() {
                    Action::Notify("No filters to clear".to_string(), NotifyLevel::Info)
                } else {
                    self.clear_filters();
                    Action::Notify("Filters cleared".to_string(), NotifyLevel::Info)
                }
            }
            Command::Refresh => {
                self.refresh();
                Action::None
            }
            Command::Buy => {
                self.open_modal(ActionKind::Purchase, None);
                Action::None
            }
            Command::Tip(amount) => {
                self.open_modal(ActionKind::Tip, amount.clone());
                Action::None
            }
            Command::Transfer(recipient) => {
                self.open_modal(ActionKind::Transfer, recipient.clone());
                Action::None
            }
            Command::Copy => self.copy_owner(),
            Command::Export => Action::Export,
            Command::Account => {
                self.pending_account_request = true;
                Action::Notify("Checking wallet…".to_string(), NotifyLevel::Info)
            }
            Command::Help => {
                self.help_open = true;
                Action::None
            }
            Command::Quit => Action::Quit,
            Command::Invalid(msg) => Action::Notify(msg.clone(), NotifyLevel::Warn),
            Command::Unknown(input) => {
                Action::Notify(format!("Unknown command: {input}"), NotifyLevel::Warn)
            }
        }
    }

    /// Apply what the app can handle itself; return the rest
    pub fn apply_action(&mut self, action: Action) -> Action {
        match action {
            Action::Notify(msg, level) => {
                let level = match level {
                    NotifyLevel::Info => StatusLevel::Info,
                    NotifyLevel::Warn => StatusLevel::Warn,
                    NotifyLevel::Error => StatusLevel::Error,
                };
                self.set_status(msg, level);
                Action::None
            }
            Action::Quit => {
                self.should_quit = true;
                Action::None
            }
            other => other,
        }
    }

    pub fn copy_owner(&mut self) -> Action {
        match self.selected_listing() {
            Some(listing) => Action::Copy(listing.owner.clone()),
            None => Action::Notify("Nothing to copy".to_string(), NotifyLevel::Warn),
        }
    }

    // ----- actions --------------------------------------------------------

    pub fn open_purchase(&mut self) {
        self.open_modal(ActionKind::Purchase, None);
    }

    pub fn open_tip(&mut self) {
        self.open_modal(ActionKind::Tip, None);
    }

    pub fn open_transfer(&mut self) {
        self.open_modal(ActionKind::Transfer, None);
    }

    pub fn open_modal(&mut self, kind: ActionKind, input: Option<String>) {
        if self.action_phase.is_submitting() {
            self.set_status("A transaction is still being confirmed", StatusLevel::Warn);
            return;
        }
        let Some(listing) = self.selected_listing().cloned() else {
            self.set_status("No NFT selected", StatusLevel::Warn);
            return;
        };
        self.action_phase = ActionPhase::Idle;
        self.modal = Some(ActionModal {
            kind,
            listing,
            input: input.unwrap_or_default(),
            error: None,
        });
        self.input_mode = InputMode::Modal;
    }

    /// Esc; refused while the submission is in flight
    pub fn close_modal(&mut self) {
        if self.action_phase.is_submitting() {
            self.set_status("Waiting for confirmation…", StatusLevel::Warn);
            return;
        }
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn modal_push(&mut self, ch: char) {
        if self.action_phase.is_submitting() {
            return;
        }
        if let Some(modal) = self.modal.as_mut().filter(|m| m.takes_input()) {
            modal.input.push(ch);
            modal.error = None;
        }
    }

    pub fn modal_pop(&mut self) {
        if self.action_phase.is_submitting() {
            return;
        }
        if let Some(modal) = self.modal.as_mut() {
            modal.input.pop();
            modal.error = None;
        }
    }

    /// Validate locally and queue the submission
    pub fn confirm_modal(&mut self) {
        if self.action_phase.is_submitting() {
            return;
        }
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        let request = match modal.kind {
            ActionKind::Purchase => Ok(ActionRequest::purchase(&modal.listing)),
            ActionKind::Tip => ActionRequest::tip(&modal.listing.owner, &modal.input),
            ActionKind::Transfer => ActionRequest::transfer(modal.listing.id, &modal.input),
        };
        match request {
            Ok(request) => {
                modal.error = None;
                self.action_phase = ActionPhase::Submitting;
                self.pending_action_request = Some(request);
            }
            Err(err) => {
                let message = err.to_string();
                modal.error = Some(message.clone());
                self.set_status(message, StatusLevel::Warn);
            }
        }
    }

    pub fn apply_action_confirmed(&mut self, kind: ActionKind, hash: String) {
        self.action_phase = ActionPhase::Confirmed { hash: hash.clone() };
        self.modal = None;
        if self.input_mode == InputMode::Modal {
            self.input_mode = InputMode::Normal;
        }
        self.show_feedback(true, kind.success_message());
        self.set_status(format!("Confirmed {}", truncate_address(&hash)), StatusLevel::Info);
        // state is re-derived from chain, never patched
        self.request_fetch();
    }

    pub fn apply_action_failed(&mut self, kind: ActionKind, message: String) {
        self.action_phase = ActionPhase::Failed {
            reason: message.clone(),
        };
        self.modal = None;
        if self.input_mode == InputMode::Modal {
            self.input_mode = InputMode::Normal;
        }
        self.show_feedback(false, kind.failure_message());
        self.set_status(message, StatusLevel::Error);
    }

    fn show_feedback(&mut self, success: bool, message: &str) {
        self.feedback = Some(Feedback {
            success,
            message: message.to_string(),
            since: Instant::now(),
        });
    }

    pub fn dismiss_feedback(&mut self) {
        self.feedback = None;
    }

    // ----- requests pumped by the main loop ------------------------------

    /// Consumes a pending fetch and issues it the next sequence number
    pub fn take_fetch_request(&mut self) -> bool {
        if self.pending_fetch_request {
            self.pending_fetch_request = false;
            self.fetch_seq += 1;
            true
        } else {
            false
        }
    }

    /// Sequence number of the most recently issued fetch
    pub fn fetch_seq(&self) -> u64 {
        self.fetch_seq
    }

    pub fn take_account_request(&mut self) -> bool {
        if self.pending_account_request {
            self.pending_account_request = false;
            true
        } else {
            false
        }
    }

    pub fn take_action_request(&mut self) -> Option<ActionRequest> {
        self.pending_action_request.take()
    }

    // ----- labels ---------------------------------------------------------

    pub fn account_label(&self) -> String {
        match self.account.as_deref() {
            Some(account) => truncate_address(account),
            None => "not connected".to_string(),
        }
    }

    pub fn page_label(&self) -> String {
        format!(
            "Page {} of {} · {} listed",
            self.page,
            self.page_count(),
            self.listings.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: u64, octas: u64, rarity: u8) -> Listing {
        Listing {
            id,
            owner: format!("0xowner{id}"),
            name: format!("NFT #{id}"),
            description: String::new(),
            uri: String::new(),
            price: Octas(octas),
            for_sale: true,
            rarity: Rarity::from_level(rarity),
        }
    }

    fn loaded(count: u64) -> App {
        let mut app = App::new();
        app.apply_listings((1..=count).map(|id| listing(id, id * 10, 1)).collect());
        app
    }

    #[test]
    fn test_filter_change_resets_page_and_fetches() {
        let mut app = loaded(20);
        app.next_page();
        app.next_page();
        assert_eq!(app.page, 3);
        app.set_rarity(Some(Rarity::Rare));
        assert_eq!(app.page, 1);
        assert!(app.take_fetch_request());
        assert!(!app.take_fetch_request());
        assert_eq!(
            app.status_text().map(|s| s.0),
            Some("Filters: Rare | -..- APT | Price: Low to High")
        );
    }

    #[test]
    fn test_clear_without_filters_skips_fetch() {
        let mut app = loaded(3);
        app.enter_command();
        app.command.input = "clear".to_string();
        app.apply_command();
        assert!(!app.take_fetch_request());
        assert_eq!(app.status_text().map(|s| s.0), Some("No filters to clear"));

        app.set_sort(SortOrder::PriceDesc);
        assert!(app.take_fetch_request());
        app.enter_command();
        app.command.input = "clear".to_string();
        app.apply_command();
        assert!(app.take_fetch_request());
        assert!(app.query.is_default());
    }

    #[test]
    fn test_page_bounds() {
        let mut app = loaded(9);
        assert_eq!(app.page_count(), 2);
        app.prev_page();
        assert_eq!(app.page, 1);
        app.next_page();
        app.next_page();
        assert_eq!(app.page, 2);
        assert_eq!(app.visible_listings().len(), 1);
    }

    #[test]
    fn test_grid_selection() {
        let mut app = loaded(8);
        app.move_selection(1, 0);
        assert_eq!(app.selected, 1);
        app.move_selection(0, 1);
        assert_eq!(app.selected, 5);
        app.move_selection(0, 1);
        assert_eq!(app.selected, 5);
        app.move_selection(-1, -1);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_refetch_clamps_page() {
        let mut app = loaded(17);
        app.go_to_page(3);
        assert_eq!(app.page, 3);
        app.apply_listings(vec![listing(1, 10, 1)]);
        assert_eq!(app.page, 1);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_stale_fetch_result_dropped() {
        let mut app = loaded(3);
        app.refresh();
        assert!(app.take_fetch_request());
        let slow = app.fetch_seq();
        app.refresh();
        assert!(app.take_fetch_request());
        let latest = app.fetch_seq();
        assert!(latest > slow);

        // the newer fetch lands first, then the older one arrives late
        app.apply_fetched(latest, vec![listing(2, 20, 1)]);
        app.apply_fetched(slow, vec![listing(1, 10, 1), listing(2, 20, 1)]);
        assert_eq!(app.listings.len(), 1);
        assert_eq!(app.listings[0].id, 2);

        app.apply_fetch_error(slow, "timeout".into());
        assert_eq!(app.status_text().map(|s| s.1), Some(StatusLevel::Info));
        app.apply_fetch_error(latest, "timeout".into());
        assert_eq!(app.status_text().map(|s| s.1), Some(StatusLevel::Error));
    }

    #[test]
    fn test_command_sets_filters() {
        let mut app = loaded(3);
        app.enter_command();
        app.command.input = "from 0.5".to_string();
        assert_eq!(app.apply_command(), Action::None);
        assert_eq!(app.query.price_from, Some(Octas(50_000_000)));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.take_fetch_request());

        app.command.input = "bogus".to_string();
        app.apply_command();
        assert_eq!(app.status_text().map(|s| s.1), Some(StatusLevel::Warn));
    }

    #[test]
    fn test_export_and_copy_are_returned() {
        let mut app = loaded(1);
        app.command.input = "export".to_string();
        assert_eq!(app.apply_command(), Action::Export);
        app.command.input = "copy".to_string();
        assert_eq!(app.apply_command(), Action::Copy("0xowner1".to_string()));
    }

    #[test]
    fn test_invalid_tip_never_queues() {
        let mut app = loaded(1);
        for bad in ["0", "-5", "abc", ""] {
            app.open_tip();
            app.modal.as_mut().unwrap().input = bad.to_string();
            app.confirm_modal();
            assert!(app.take_action_request().is_none(), "{bad} should be rejected");
            assert_eq!(app.action_phase, ActionPhase::Idle);
            assert!(app.modal.as_ref().unwrap().error.is_some());
            app.close_modal();
        }
    }

    #[test]
    fn test_busy_guard() {
        let mut app = loaded(2);
        app.open_purchase();
        app.confirm_modal();
        assert!(app.action_phase.is_submitting());
        assert!(app.take_action_request().is_some());

        app.confirm_modal();
        assert!(app.take_action_request().is_none());
        app.close_modal();
        assert!(app.modal.is_some());
        app.open_tip();
        assert_eq!(app.modal.as_ref().unwrap().kind, ActionKind::Purchase);
    }

    #[test]
    fn test_confirmed_refetches_and_shows_feedback() {
        let mut app = loaded(2);
        app.open_purchase();
        app.confirm_modal();
        app.take_action_request();
        app.apply_action_confirmed(ActionKind::Purchase, "0xabc".to_string());
        assert!(app.modal.is_none());
        assert!(app.take_fetch_request());
        let feedback = app.feedback.as_ref().unwrap();
        assert!(feedback.success);
        assert_eq!(feedback.message, "NFT purchased successfully!");
    }

    #[test]
    fn test_new_modal_returns_to_idle() {
        let mut app = loaded(2);
        app.open_purchase();
        app.confirm_modal();
        app.apply_action_failed(ActionKind::Purchase, "rejected".to_string());
        assert!(matches!(app.action_phase, ActionPhase::Failed { .. }));
        app.open_transfer();
        assert_eq!(app.action_phase, ActionPhase::Idle);
    }

    #[test]
    fn test_feedback_expires() {
        let mut app = loaded(1);
        app.feedback_duration = Duration::from_millis(0);
        app.apply_action_failed(ActionKind::Tip, "x".to_string());
        app.on_tick();
        assert!(app.feedback.is_none());
    }
}
