use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;

use crate::app::{ActionModal, App, InputMode, StatusLevel};
use crate::domain::{truncate_address, ActionKind, Listing, Rarity};

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    draw_filter_bar(f, areas.filters, app);
    draw_grid(f, areas.grid, app);
    draw_pagination(f, areas.pagination, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if let Some(modal) = app.modal.as_ref() {
        draw_modal(f, areas.size, app, modal);
    }
    if app.help_open {
        draw_help_popup(f, areas.size);
    }
    if app.feedback.is_some() {
        draw_feedback(f, areas.size, app);
    }
}

fn rarity_color(rarity: Rarity) -> Color {
    match rarity.color() {
        "green" => Color::Green,
        "blue" => Color::Blue,
        "purple" => Color::Magenta,
        "orange" => Color::LightRed,
        _ => Color::DarkGray,
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            "NFT Marketplace",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Node", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ", app.endpoint)),
        Span::styled("Market", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}", truncate_address(&app.marketplace_address))),
    ]);
    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let wallet_style = if app.account.is_some() {
        Style::default().fg(Color::LightGreen)
    } else {
        Style::default().fg(Color::LightYellow)
    };
    let right_line = Line::from(vec![
        Span::styled("Wallet ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.account_label(), wallet_style),
    ]);
    let right = Paragraph::new(right_line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn draw_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled("Rarity ", Style::default().fg(Color::DarkGray))];
    let all_style = if app.query.rarity.is_none() {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default().fg(Color::White)
    };
    spans.push(Span::styled(" 0 All ", all_style));
    for rarity in Rarity::ALL {
        let color = rarity_color(rarity);
        let style = if app.query.rarity == Some(rarity) {
            Style::default().fg(Color::Black).bg(color)
        } else {
            Style::default().fg(color)
        };
        spans.push(Span::styled(
            format!(" {} {} ", rarity.level(), rarity.label()),
            style,
        ));
    }

    let bound = |value: Option<crate::domain::Octas>| {
        value
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    spans.push(Span::raw("   "));
    spans.push(Span::styled("Price ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::raw(format!(
        "{} .. {} APT",
        bound(app.query.price_from),
        bound(app.query.price_to)
    )));
    spans.push(Span::raw("   "));
    spans.push(Span::styled("Sort ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::raw(app.query.sort.label()));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title("Filters").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn draw_grid(f: &mut Frame, area: Rect, app: &App) {
    let visible = app.visible_listings();
    if visible.is_empty() {
        let text = if app.loading && !app.loaded_once {
            "Loading NFTs…"
        } else {
            "No NFTs match the current filters."
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
        return;
    }

    for (idx, (slot, listing)) in layout::card_slots(area)
        .into_iter()
        .zip(visible.iter())
        .enumerate()
    {
        draw_card(f, slot, listing, idx == app.selected);
    }
}

fn draw_card(f: &mut Frame, area: Rect, listing: &Listing, selected: bool) {
    let border_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let rarity = listing.rarity;
    let lines = vec![
        Line::from(Span::styled(
            format!(" {} ", rarity.label()),
            Style::default().fg(Color::Black).bg(rarity_color(rarity)),
        )),
        Line::from(vec![
            Span::styled("Price ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} APT", listing.display_price()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Owner ", Style::default().fg(Color::DarkGray)),
            Span::raw(truncate_address(&listing.owner)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            listing.description.clone(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let block = Block::default()
        .title(Span::styled(
            format!(" #{} {} ", listing.id, listing.name),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(if selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(border_style);
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_pagination(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("◀ p ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.page_label()),
        Span::styled(" n ▶", Style::default().fg(Color::DarkGray)),
    ];
    if app.loading {
        spans.push(Span::styled(
            "  refreshing…",
            Style::default().fg(Color::LightCyan),
        ));
    }
    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let selected = app
        .selected_listing()
        .map(|l| format!("#{} {}", l.id, l.name))
        .unwrap_or_else(|| "--".to_string());
    let mut spans = vec![
        Span::styled("Selected ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", selected)),
        Span::styled("Signer ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.signer)),
    ];
    if app.action_phase.is_submitting() {
        spans.push(Span::styled(
            "Submitting transaction…",
            Style::default().fg(Color::LightYellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("rarity", "rarity <all|common|uncommon|rare|super|1-4>"),
        ("from", "from <apt|->  minimum price"),
        ("to", "to <apt|->  maximum price"),
        ("sort", "sort <asc|desc>"),
        ("page", "page <n>"),
        ("clear", "Reset all filters"),
        ("refresh", "Re-read listings from chain"),
        ("buy", "Purchase selected NFT"),
        ("tip", "tip [amount]  Tip the creator"),
        ("transfer", "transfer [address]"),
        ("copy", "Copy owner address"),
        ("export", "Export listings to CSV"),
        ("account", "Re-check wallet account"),
        ("help", "Show key bindings"),
        ("quit", "Quit"),
    ];

    let head = input.split_whitespace().next().unwrap_or("");
    for (cmd, desc) in commands {
        if cmd.starts_with(head) {
            return Some(desc);
        }
    }
    None
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint_text = command_hint(&app.command.input).unwrap_or("filter / action command");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(&app.command.input),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Normal | InputMode::Modal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text, Style::default().fg(color)),
                ])
            } else {
                action_hints()
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints() -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::LightCyan));
    let desc = |d: &'static str| Span::styled(d, Style::default().fg(Color::DarkGray));
    Line::from(vec![
        key("b"),
        desc(" buy  "),
        key("t"),
        desc(" tip  "),
        key("x"),
        desc(" transfer  "),
        key("0-4"),
        desc(" rarity  "),
        key("o"),
        desc(" sort  "),
        key(":"),
        desc(" command  "),
        key("?"),
        desc(" help  "),
        key("q"),
        desc(" quit"),
    ])
}

fn draw_modal(f: &mut Frame, area: Rect, app: &App, modal: &ActionModal) {
    let popup_area = centered_rect(56, 46, area);
    f.render_widget(Clear, popup_area);

    let listing = &modal.listing;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("NFT    ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("#{} {}", listing.id, listing.name)),
        ]),
        Line::from(vec![
            Span::styled("Owner  ", Style::default().fg(Color::DarkGray)),
            Span::raw(listing.owner.clone()),
        ]),
    ];
    match modal.kind {
        ActionKind::Purchase => {
            lines.push(Line::from(vec![
                Span::styled("Price  ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{} APT", listing.display_price()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from("Buy this NFT at the listed price?"));
        }
        ActionKind::Tip | ActionKind::Transfer => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                modal.input_label(),
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Yellow)),
                Span::raw(modal.input.clone()),
                Span::styled("_", Style::default().fg(Color::DarkGray)),
            ]));
        }
    }

    if let Some(error) = modal.error.as_ref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::LightRed),
        )));
    }

    lines.push(Line::from(""));
    if app.action_phase.is_submitting() {
        lines.push(Line::from(Span::styled(
            "Submitting… waiting for confirmation",
            Style::default().fg(Color::LightYellow),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Enter confirm · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(modal.title())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightCyan)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup_area);
}

fn draw_feedback(f: &mut Frame, area: Rect, app: &App) {
    let Some(feedback) = app.feedback.as_ref() else {
        return;
    };
    let (symbol, color) = if feedback.success {
        ("✔", Color::LightGreen)
    } else {
        ("✘", Color::LightRed)
    };
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            symbol,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            feedback.message.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "press any key",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let inner = centered_rect(60, 30, area);
    let paragraph = Paragraph::new(Text::from(lines)).alignment(Alignment::Center);
    f.render_widget(paragraph, inner);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Navigation"),
        Line::from("  ←↓↑→ / hjkl  Move card selection"),
        Line::from("  n / p        Next / previous page"),
        Line::from("  Esc          Close dialog"),
        Line::from(""),
        Line::from("Filters"),
        Line::from("  0            All rarities"),
        Line::from("  1-4          Common / Uncommon / Rare / Super Rare"),
        Line::from("  o            Toggle price sort"),
        Line::from("  :from 1.5    Minimum price (APT)"),
        Line::from("  :to -        Clear maximum price"),
        Line::from("  :clear       Reset filters"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  b            Buy selected NFT"),
        Line::from("  t            Tip the creator"),
        Line::from("  x            Transfer NFT"),
        Line::from("  y            Copy owner address"),
        Line::from("  e            Export listings to CSV"),
        Line::from("  r            Refresh"),
        Line::from("  ?            Toggle help"),
        Line::from("  q            Quit"),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
