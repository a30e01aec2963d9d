use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::GRID_COLUMNS;
use crate::domain::PAGE_SIZE;

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub filters: Rect,
    pub grid: Rect,
    pub pagination: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size);

    UiAreas {
        size,
        header: vertical[0],
        filters: vertical[1],
        grid: vertical[2],
        pagination: vertical[3],
        status_line: vertical[4],
        command_line: vertical[5],
    }
}

/// One rect per card slot, row-major
pub fn card_slots(grid: Rect) -> Vec<Rect> {
    let rows = PAGE_SIZE / GRID_COLUMNS;
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(grid);

    row_areas
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                .split(*row)
                .to_vec()
        })
        .collect()
}
