//! Command parser for the : command system

use crate::domain::{Octas, Rarity, SortOrder};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Filter commands
    Rarity(Option<Rarity>),
    PriceFrom(Option<Octas>),
    PriceTo(Option<Octas>),
    Sort(SortOrder),
    Page(usize),
    Clear,
    Refresh,

    // Actions on the selected card
    Buy,
    Tip(Option<String>),
    Transfer(Option<String>),
    Copy,
    Export,

    // Wallet
    Account,

    Help,
    Quit,

    /// Known command with a bad argument
    Invalid(String),

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.to_lowercase().as_str() {
        "rarity" | "r" => match args.as_deref() {
            None | Some("all") | Some("0") => Command::Rarity(None),
            Some(value) => match Rarity::parse(value) {
                Some(rarity) => Command::Rarity(Some(rarity)),
                None => Command::Invalid(format!("Unknown rarity: {}", value)),
            },
        },
        "from" | "min" => match parse_bound(args.as_deref()) {
            Ok(bound) => Command::PriceFrom(bound),
            Err(msg) => Command::Invalid(msg),
        },
        "to" | "max" => match parse_bound(args.as_deref()) {
            Ok(bound) => Command::PriceTo(bound),
            Err(msg) => Command::Invalid(msg),
        },
        "sort" => match args.as_deref().map(SortOrder::parse) {
            Some(Some(order)) => Command::Sort(order),
            _ => Command::Invalid("Usage: sort <asc|desc>".to_string()),
        },
        "page" | "pg" => match args.as_deref().and_then(|s| s.parse::<usize>().ok()) {
            Some(n) if n >= 1 => Command::Page(n),
            _ => Command::Invalid("Usage: page <n>, n >= 1".to_string()),
        },
        "clear" | "reset" => Command::Clear,
        "refresh" | "reload" => Command::Refresh,

        "buy" | "purchase" => Command::Buy,
        "tip" => Command::Tip(args),
        "transfer" | "send" => Command::Transfer(args),
        "copy" | "yank" => Command::Copy,
        "export" | "csv" => Command::Export,

        "account" | "wallet" => Command::Account,

        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,

        _ => Command::Unknown(input.to_string()),
    }
}

/// `-`/`none`/missing clears the bound
fn parse_bound(arg: Option<&str>) -> Result<Option<Octas>, String> {
    match arg {
        None | Some("-") | Some("none") => Ok(None),
        Some(value) => match Octas::parse_apt(value) {
            Ok(octas) => Ok(Some(octas)),
            Err(_) => Err(format!("Invalid price: {}", value)),
        },
    }
}
