//! Stateless UI rendering for the board.

use crate::app::{App, Overlay};
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use strictly_fibonacci::{Grid, Position, RuleSet, Tile};

const CELL_WIDTH: u16 = 8;
const CELL_HEIGHT: u16 = 3;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let theme = app.theme();
    let style = theme.style();

    frame.render_widget(
        Block::default().style(Style::default().bg(style.background.into())),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Scores
            Constraint::Min(9),    // Board
            Constraint::Length(3), // Help
        ])
        .split(area);

    let rules = app.game().rules();
    let title = Paragraph::new(format!("Strictly Fibonacci - {}", rules.game_type()))
        .style(
            Style::default()
                .fg(style.button.into())
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_scores(frame, chunks[1], app, theme);
    let board_area = draw_board(frame, chunks[2], app.game().grid(), rules, theme);

    let help = Paragraph::new("arrows/WASD move   r restart   k keep playing   q quit")
        .style(Style::default().fg(style.button.into()))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);

    if let Some(overlay) = app.screen().overlay() {
        draw_overlay(frame, board_area, overlay, theme);
    }
}

fn draw_scores(frame: &mut Frame, area: Rect, app: &App, theme: Theme) {
    let style = theme.style();
    let text = Line::from(vec![
        Span::styled(
            format!(" Score {} ", app.screen().score()),
            Style::default()
                .fg(Color::White)
                .bg(style.score_board.into())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!(" Best {} ", app.screen().best_score()),
            Style::default().fg(Color::White).bg(style.score_board.into()),
        ),
        Span::raw("   "),
        Span::styled(
            app.screen()
                .last_move()
                .map_or_else(String::new, |direction| format!("last: {direction}")),
            Style::default().fg(style.button.into()),
        ),
    ]);
    let scores = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(scores, center_rect(area, area.width, 1));
}

/// Draws the grid and returns the area it occupies.
fn draw_board(frame: &mut Frame, area: Rect, grid: &Grid, rules: RuleSet, theme: Theme) -> Rect {
    let dimension = grid.dimension() as u16;
    let board_area = center_rect(area, dimension * CELL_WIDTH + 2, dimension * CELL_HEIGHT + 2);

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(theme.style().board.into()));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CELL_HEIGHT); grid.dimension()])
        .split(inner);

    // Up is +x, so the last row goes on top.
    for (row, &row_area) in rows.iter().enumerate() {
        let x = grid.dimension() - 1 - row;
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(CELL_WIDTH); grid.dimension()])
            .split(row_area);
        for (y, &cell_area) in cols.iter().enumerate() {
            let tile = grid.tile_at(Position::new(x as i32, y as i32));
            draw_cell(frame, cell_area, tile, rules, theme);
        }
    }

    board_area
}

fn draw_cell(frame: &mut Frame, area: Rect, tile: Option<&Tile>, rules: RuleSet, theme: Theme) {
    let Some(tile) = tile else {
        let empty = Block::default().style(Style::default().bg(theme.style().board.into()));
        frame.render_widget(empty, area);
        return;
    };

    let level = tile.level();
    let style = Style::default()
        .bg(theme.tile_color(level).into())
        .fg(theme.text_color(level).into())
        .add_modifier(Modifier::BOLD);
    let label = rules.value(level).to_string();

    // Pad to the middle line of the cell.
    let lines = vec![Line::from(""), Line::from(label)];
    let paragraph = Paragraph::new(lines)
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area.inner(Margin::new(1, 0)));
}

fn draw_overlay(frame: &mut Frame, area: Rect, overlay: Overlay, theme: Theme) {
    let (title, hint) = match overlay {
        Overlay::Won => ("You Win!", "k keep playing   r new game"),
        Overlay::Over => ("Game Over", "r new game   q quit"),
    };
    let popup = center_rect(area, 30u16.min(area.width), 5u16.min(area.height));
    let style = theme.style();

    let text = vec![
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(hint),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::White)
                .bg(style.button.into()),
        )
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
