use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nftmart::app::{App, InputMode, StatusLevel};
use nftmart::config::{self, Config, MarketConfig};
use nftmart::core::{Action, Command};
use nftmart::domain::Rarity;
use nftmart::infrastructure::aptos::{
    AptosClient, ChainClient, DisconnectedSigner, RemoteSigner, SigningProvider,
};
use nftmart::infrastructure::{
    Marketplace, RuntimeBridge, RuntimeCommand, RuntimeEvent, WalletInvoker,
};
use nftmart::modules::export;
use nftmart::ui;

#[derive(Debug, Parser)]
#[command(
    name = "nftmart",
    version,
    about = "nftmart: browse, buy and tip on an Aptos NFT marketplace from the terminal"
)]
struct Args {
    /// Full node REST endpoint (e.g. https://fullnode.testnet.aptoslabs.com/v1)
    #[arg(long)]
    rpc: Option<String>,

    /// Account holding the Marketplace resource
    #[arg(long)]
    marketplace: Option<String>,

    /// Account that published the NFTMarketplace module
    #[arg(long)]
    module: Option<String>,

    /// Wallet bridge URL (e.g. http://127.0.0.1:8787); omit to browse read-only
    #[arg(long)]
    signer: Option<String>,

    /// Seconds the success/failure indicator stays on screen
    #[arg(long)]
    feedback_secs: Option<u64>,

    /// Log file (defaults to the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            rpc: self.rpc,
            signer: self.signer,
            marketplace_address: self.marketplace,
            module_address: self.module,
            feedback_secs: self.feedback_secs,
            log_file: self.log_file,
            ..Config::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (file_config, config_error) = match config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    let merged = args.into_config().or(file_config);

    let log_file = merged.log_file.clone().or_else(config::log_path);
    if let Some(path) = log_file.as_deref() {
        if let Err(err) = init_logging(path) {
            eprintln!("logging disabled: {err:#}");
        }
    }
    if let Some(err) = config_error.as_ref() {
        warn!(error = %err, "ignoring invalid config file");
    }

    let market_config = MarketConfig::from_config(merged);
    info!(
        rpc = %market_config.rpc_url,
        marketplace = %market_config.contract.marketplace_address,
        signer = ?market_config.signer_url,
        "configuration loaded"
    );

    let market = build_marketplace(&market_config)?;
    let runtime = RuntimeBridge::new(market)?;

    let mut app = App::new();
    app.feedback_duration = market_config.feedback;
    app.endpoint = market_config.rpc_url.clone();
    app.marketplace_address = market_config.contract.marketplace_address.clone();
    app.request_fetch();
    match config_error {
        Some(err) => app.set_status(format!("{err}; using defaults"), StatusLevel::Warn),
        None => app.set_status("Loading NFTs…", StatusLevel::Info),
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    Ok(())
}

fn build_marketplace(config: &MarketConfig) -> Result<Arc<Marketplace>> {
    let chain: Arc<dyn ChainClient> = Arc::new(AptosClient::new(
        &config.rpc_url,
        config.confirmation_timeout,
        config.poll_interval,
    )?);
    let signer: Arc<dyn SigningProvider> = match config.signer_url.as_deref() {
        Some(url) => Arc::new(RemoteSigner::new(url)?),
        None => Arc::new(DisconnectedSigner),
    };
    let invoker = Arc::new(WalletInvoker::new(signer, chain.clone()));
    Ok(Arc::new(Marketplace::new(
        config.contract.clone(),
        chain,
        invoker,
    )))
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, &runtime);
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::Connected {
                endpoint,
                signer,
                account,
            } => app.apply_connected(endpoint, signer, account),
            RuntimeEvent::AccountReady { account } => app.apply_account(account),
            RuntimeEvent::ListingsReady { seq, listings } => app.apply_fetched(seq, listings),
            RuntimeEvent::FetchFailed { seq, message } => app.apply_fetch_error(seq, message),
            RuntimeEvent::ActionConfirmed { kind, hash } => app.apply_action_confirmed(kind, hash),
            RuntimeEvent::ActionFailed { kind, message } => app.apply_action_failed(kind, message),
            RuntimeEvent::Error { message } => app.apply_runtime_error(message),
        }
    }

    if app.take_fetch_request() {
        let seq = app.fetch_seq();
        if let Err(err) = runtime.send(RuntimeCommand::FetchListings { seq }) {
            app.apply_fetch_failed(err.to_string());
        }
    }
    if app.take_account_request() {
        let _ = runtime.send(RuntimeCommand::RefreshAccount);
    }
    if let Some(request) = app.take_action_request() {
        let kind = request.kind();
        if let Err(err) = runtime.send(RuntimeCommand::Submit { request }) {
            app.apply_action_failed(kind, err.to_string());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // any key dismisses the indicator
    if app.feedback.is_some() {
        app.dismiss_feedback();
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.help_open = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
        InputMode::Modal => handle_modal_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        (KeyCode::Char('q'), _) => app.should_quit = true,
        (KeyCode::Char('?'), _) => app.help_open = true,
        (KeyCode::Char(':'), _) => app.enter_command(),
        (KeyCode::Char('r'), _) => app.refresh(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.move_selection(-1, 0),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.move_selection(1, 0),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.move_selection(0, -1),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.move_selection(0, 1),
        (KeyCode::Char('n'), _) | (KeyCode::PageDown, _) => app.next_page(),
        (KeyCode::Char('p'), _) | (KeyCode::PageUp, _) => app.prev_page(),
        (KeyCode::Char('0'), _) => app.set_rarity(None),
        (KeyCode::Char(ch @ '1'..='4'), _) => {
            let level = ch as u8 - b'0';
            app.set_rarity(Some(Rarity::from_level(level)));
        }
        (KeyCode::Char('o'), _) => app.toggle_sort(),
        (KeyCode::Char('b'), _) | (KeyCode::Enter, _) => app.open_purchase(),
        (KeyCode::Char('t'), _) => app.open_tip(),
        (KeyCode::Char('x'), _) => app.open_transfer(),
        (KeyCode::Char('a'), _) => {
            let action = app.execute_command(&Command::Account);
            run_action(app, action);
        }
        (KeyCode::Char('y'), _) => {
            let action = app.copy_owner();
            run_action(app, action);
        }
        (KeyCode::Char('e'), _) => run_action(app, Action::Export),
        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => {
            let action = app.apply_command();
            run_action(app, action);
        }
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}

fn handle_modal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_modal(),
        KeyCode::Enter => app.confirm_modal(),
        KeyCode::Backspace => app.modal_pop(),
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.modal_push(ch);
        }
        _ => {}
    }
}

/// Carry out the side effects the app hands back
fn run_action(app: &mut App, action: Action) {
    match app.apply_action(action) {
        Action::Copy(text) => copy_to_clipboard(app, text),
        Action::Export => {
            let result = export::export_listings(app);
            app.apply_action(result);
        }
        _ => {}
    }
}

fn copy_to_clipboard(app: &mut App, text: String) {
    use arboard::Clipboard;

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(&text).is_ok() {
                app.set_status(format!("Copied: {}", text), StatusLevel::Info);
            } else {
                app.set_status("Failed to copy to clipboard", StatusLevel::Error);
            }
        }
        Err(_) => {
            app.set_status("Clipboard not available", StatusLevel::Error);
        }
    }
}
