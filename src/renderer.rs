use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::{GridSize, THEME_CLASSIC, Theme};
use crate::game::{EndCause, GameStatus, Snapshot};
use crate::snake::Position;

/// Renders one full frame from an immutable engine snapshot.
///
/// Everything is re-derived from the snapshot each frame; there is no
/// incremental drawing state to keep in sync with the engine.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot<'_>, bounds: GridSize, cell_width: u16) {
    let theme = &THEME_CLASSIC;
    let play_area = centered_play_area(frame.area(), bounds, cell_width);

    let block = Block::bordered()
        .title(" grid-snake ")
        .border_style(Style::new().fg(theme.border_fg));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    fill_background(frame, inner, theme);
    render_food(frame, inner, snapshot.food, bounds, cell_width, theme);
    render_snake(frame, inner, snapshot, bounds, cell_width, theme);

    if snapshot.status == GameStatus::GameOver {
        render_game_over(frame, play_area, snapshot.end_cause, theme);
    }
}

/// Returns the bordered play area centered in `area`, clamped to fit.
fn centered_play_area(area: Rect, bounds: GridSize, cell_width: u16) -> Rect {
    let wanted_width = bounds
        .width
        .saturating_mul(cell_width.max(1))
        .saturating_add(2);
    let wanted_height = bounds.height.saturating_add(2);

    let width = wanted_width.min(area.width);
    let height = wanted_height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn fill_background(frame: &mut Frame<'_>, inner: Rect, theme: &Theme) {
    let style = Style::new().bg(theme.play_bg);
    let buffer = frame.buffer_mut();

    for y in inner.y..inner.bottom() {
        for x in inner.x..inner.right() {
            buffer.set_string(x, y, " ", style);
        }
    }
}

fn render_food(
    frame: &mut Frame<'_>,
    inner: Rect,
    food: Position,
    bounds: GridSize,
    cell_width: u16,
    theme: &Theme,
) {
    draw_cell(
        frame,
        inner,
        food,
        bounds,
        cell_width,
        Style::new().fg(theme.food).bg(theme.play_bg),
    );
}

fn render_snake(
    frame: &mut Frame<'_>,
    inner: Rect,
    snapshot: &Snapshot<'_>,
    bounds: GridSize,
    cell_width: u16,
    theme: &Theme,
) {
    let head = snapshot.snake.head();

    for segment in snapshot.snake.segments() {
        let style = if *segment == head {
            Style::new()
                .fg(theme.snake_head)
                .bg(theme.play_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(theme.snake_body).bg(theme.play_bg)
        };

        draw_cell(frame, inner, *segment, bounds, cell_width, style);
    }
}

fn draw_cell(
    frame: &mut Frame<'_>,
    inner: Rect,
    position: Position,
    bounds: GridSize,
    cell_width: u16,
    style: Style,
) {
    let Some((x, y)) = logical_to_terminal(inner, bounds, position, cell_width) else {
        return;
    };

    let glyphs = "█".repeat(usize::from(cell_width.max(1)));
    frame.buffer_mut().set_string(x, y, &glyphs, style);
}

/// Maps a grid cell to the terminal column/row of its leftmost glyph.
///
/// Returns `None` for cells outside the grid or clipped by a too-small
/// terminal; the caller simply skips those.
fn logical_to_terminal(
    inner: Rect,
    bounds: GridSize,
    position: Position,
    cell_width: u16,
) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(cell_width.max(1))?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(cell_width.max(1)) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

/// Draws the game-over popup naming the end cause.
fn render_game_over(
    frame: &mut Frame<'_>,
    area: Rect,
    end_cause: Option<EndCause>,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let (title, cause_text) = match end_cause {
        Some(EndCause::BoardCleared) => ("YOU WIN", "Board cleared"),
        Some(EndCause::WallCollision) => ("GAME OVER", "Cause: hit wall"),
        Some(EndCause::SelfCollision) => ("GAME OVER", "Cause: hit yourself"),
        None => ("GAME OVER", ""),
    };

    let lines = vec![
        Line::from(title).style(
            Style::default()
                .fg(theme.popup_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(cause_text),
        Line::from(""),
        Line::from("[Enter]/[Space] Play Again").style(Style::default().fg(theme.popup_footer)),
        Line::from("[Q]/[Esc] Quit").style(Style::default().fg(theme.popup_footer)),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
