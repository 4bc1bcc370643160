use std::io::stdout;

use allocpad_core::pad::PAD_HEIGHT;
use allocpad_core::{ClientBounds, PadElements, PadEvent, PointerEvent, Surface, TraceView};
use allocpad_protocol::{RangeAllocated, RenderCommand, ThemeToken, TraceStore};
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};

/// Rows taken by the header above the pad.
const HEADER_ROWS: u16 = 1;
/// Rows taken by the status line below the pad.
const STATUS_ROWS: u16 = 1;

fn theme_to_color(token: ThemeToken) -> Color {
    let c = token.color();
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(channel(c.r), channel(c.g), channel(c.b))
}

/// A pad surface backed by a block of terminal cells.
///
/// Keeps the commands drawn since the last clear and rasterises them onto
/// `columns` × `rows` cells when the frame is painted.
struct TerminalSurface {
    pixel_width: f64,
    columns: u16,
    rows: u16,
    stretched: bool,
    display: Vec<RenderCommand>,
}

impl TerminalSurface {
    fn new(columns: u16, rows: u16) -> Self {
        Self {
            pixel_width: f64::from(columns),
            columns,
            rows,
            stretched: false,
            display: Vec::new(),
        }
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
    }
}

impl Surface for TerminalSurface {
    fn pixel_width(&self) -> f64 {
        self.pixel_width
    }

    fn set_pixel_width(&mut self, width: f64) {
        self.pixel_width = width;
    }

    fn pixel_height(&self) -> f64 {
        PAD_HEIGHT
    }

    fn client_bounds(&self) -> ClientBounds {
        ClientBounds {
            left: 0.0,
            top: f64::from(HEADER_ROWS),
            width: f64::from(self.columns),
        }
    }

    fn set_stretched(&mut self, stretched: bool) {
        self.stretched = stretched;
    }

    fn draw(&mut self, commands: &[RenderCommand]) {
        for cmd in commands {
            match cmd {
                // The pad only ever clears the whole surface.
                RenderCommand::Clear { .. } => self.display.clear(),
                RenderCommand::DrawLine { .. } => self.display.push(cmd.clone()),
            }
        }
    }
}

/// One painted terminal cell, relative to the pad area.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    col: u16,
    row: u16,
    ch: char,
    color: ThemeToken,
}

/// Rasterise line commands onto a `columns` × `rows` grid.
///
/// Vertical lines become `█` runs, everything else a `─` run along the
/// starting row. Zero-length lines and cells past the grid are dropped.
fn plot_cells(
    commands: &[RenderCommand],
    pixel_width: f64,
    pixel_height: f64,
    columns: u16,
    rows: u16,
) -> Vec<Cell> {
    if columns == 0 || rows == 0 || pixel_width <= 0.0 || pixel_height <= 0.0 {
        return Vec::new();
    }
    let col_of = |x: f64| (x / pixel_width * f64::from(columns)).floor().max(0.0) as u32;
    let row_of = |y: f64| (y / pixel_height * f64::from(rows)).floor().max(0.0) as u32;
    let in_grid = |col: u32, row: u32| col < u32::from(columns) && row < u32::from(rows);

    let mut cells = Vec::new();
    for cmd in commands {
        let RenderCommand::DrawLine {
            from, to, color, ..
        } = cmd
        else {
            continue;
        };
        if from == to {
            continue;
        }
        if from.x == to.x {
            let col = col_of(from.x);
            let (top, bottom) = (from.y.min(to.y), from.y.max(to.y));
            let last = row_of(bottom).min(u32::from(rows).saturating_sub(1));
            for row in row_of(top)..=last {
                if in_grid(col, row) {
                    cells.push(Cell {
                        col: col as u16,
                        row: row as u16,
                        ch: '█',
                        color: *color,
                    });
                }
            }
        } else {
            let row = row_of(from.y);
            let (left, right) = (from.x.min(to.x), from.x.max(to.x));
            for col in col_of(left)..=col_of(right) {
                if in_grid(col, row) {
                    cells.push(Cell {
                        col: col as u16,
                        row: row as u16,
                        ch: '─',
                        color: *color,
                    });
                }
            }
        }
    }
    cells
}

fn pad_rows(height: u16) -> u16 {
    height.saturating_sub(HEADER_ROWS + STATUS_ROWS)
}

pub fn render_tui(store: TraceStore) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let surface = TerminalSurface::new(size.width, pad_rows(size.height));
    let elements = PadElements::new(surface, String::new(), String::new());
    let sample_count = store.len();
    let mut view = TraceView::new(elements, store);
    view.start();
    let ranges = view.subscribe();
    view.handle(PadEvent::DataReady);

    let mut last_range: Option<RangeAllocated> = None;

    loop {
        while let Ok(range) = ranges.try_recv() {
            last_range = Some(range);
        }

        terminal.draw(|frame| {
            let area = frame.area();
            let elements = view.elements();

            let header_area = Rect::new(0, 0, area.width, HEADER_ROWS);
            let header = Block::default()
                .title(format!(
                    " allocpad | {} samples, step {}{} | max {} / {} | drag to select | d draw | r reset | q quit ",
                    sample_count,
                    view.selection().step(),
                    if elements.pad.stretched { " (reduced)" } else { "" },
                    elements.positive_max,
                    elements.negative_max,
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let content_area = Rect::new(0, HEADER_ROWS, area.width, pad_rows(area.height));
            let block = Block::default()
                .borders(Borders::NONE)
                .style(Style::default().bg(Color::Black));
            frame.render_widget(block, content_area);

            let surface = &elements.pad;
            let cells = plot_cells(
                &surface.display,
                surface.pixel_width,
                PAD_HEIGHT,
                content_area.width,
                content_area.height,
            );
            let buf = frame.buffer_mut();
            for cell in cells {
                let x = content_area.x + cell.col;
                let y = content_area.y + cell.row;
                buf[(x, y)]
                    .set_char(cell.ch)
                    .set_fg(theme_to_color(cell.color))
                    .set_bg(Color::Black);
            }

            let status = match (view.selection().is_selecting(), last_range) {
                (true, _) => " selecting: release to allocate, Esc to cancel ".to_string(),
                (false, Some(range)) => {
                    let (low, high) = range.normalized();
                    format!(
                        " range allocated: {} -> {} (samples {low:.0}-{high:.0}) ",
                        range.start_point, range.end_point
                    )
                }
                (false, None) => " no range selected ".to_string(),
            };
            let status_area = Rect::new(
                0,
                area.height.saturating_sub(STATUS_ROWS),
                area.width,
                STATUS_ROWS,
            );
            let status_bar = Block::default()
                .title(status)
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(status_bar, status_area);
        })?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Esc if view.selection().is_selecting() => view.handle(PadEvent::Leave),
                KeyCode::Esc => break,
                KeyCode::Char('d') => view.handle(PadEvent::DataReady),
                KeyCode::Char('r') => view.handle(PadEvent::ResetRecord),
                _ => {}
            },
            Event::Mouse(mouse) => {
                let pointer = PointerEvent::new(f64::from(mouse.column), f64::from(mouse.row));
                let size = terminal.size()?;
                let inside = mouse.row >= HEADER_ROWS && mouse.row < HEADER_ROWS + pad_rows(size.height);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) if inside => {
                        view.handle(PadEvent::Press(pointer));
                    }
                    MouseEventKind::Drag(MouseButton::Left) if inside => {
                        view.handle(PadEvent::Move(pointer));
                    }
                    MouseEventKind::Drag(MouseButton::Left) => view.handle(PadEvent::Leave),
                    MouseEventKind::Up(MouseButton::Left) => view.handle(PadEvent::Release(pointer)),
                    _ => {}
                }
            }
            Event::Resize(width, height) => {
                view.elements_mut().pad.resize(width, pad_rows(height));
                view.handle(PadEvent::DataReady);
            }
            _ => {}
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocpad_protocol::Point;

    fn line(from: (f64, f64), to: (f64, f64), color: ThemeToken) -> RenderCommand {
        RenderCommand::DrawLine {
            from: Point::new(from.0, from.1),
            to: Point::new(to.0, to.1),
            color,
            width: 5.0,
        }
    }

    #[test]
    fn vertical_stroke_fills_column_run() {
        let cmds = [line((10.0, 400.0), (10.0, 0.0), ThemeToken::Allocation)];
        let cells = plot_cells(&cmds, 100.0, 800.0, 10, 8);
        assert_eq!(cells.len(), 5);
        assert!(cells.iter().all(|c| c.col == 1 && c.ch == '█'));
        assert_eq!(cells.first().map(|c| c.row), Some(0));
        assert_eq!(cells.last().map(|c| c.row), Some(4));
    }

    #[test]
    fn midline_spans_columns() {
        let cmds = [line((0.0, 400.0), (50.0, 400.0), ThemeToken::Midline)];
        let cells = plot_cells(&cmds, 100.0, 800.0, 10, 8);
        assert_eq!(cells.len(), 6);
        assert!(cells.iter().all(|c| c.row == 4 && c.ch == '─'));
    }

    #[test]
    fn zero_length_lines_paint_nothing() {
        let cmds = [
            line((0.0, 400.0), (0.0, 400.0), ThemeToken::Midline),
            line((10.0, 400.0), (10.0, 400.0), ThemeToken::Allocation),
        ];
        assert!(plot_cells(&cmds, 100.0, 800.0, 10, 8).is_empty());
    }

    #[test]
    fn cells_outside_grid_are_dropped() {
        let cmds = [line((150.0, 400.0), (150.0, 900.0), ThemeToken::Release)];
        assert!(plot_cells(&cmds, 100.0, 800.0, 10, 8).is_empty());
    }

    #[test]
    fn surface_keeps_commands_since_last_clear() {
        let mut surface = TerminalSurface::new(80, 20);
        let stroke = line((0.0, 0.0), (0.0, 10.0), ThemeToken::Allocation);
        surface.draw(&[stroke.clone()]);
        surface.draw(&[
            RenderCommand::Clear {
                rect: allocpad_protocol::Rect::new(0.0, 0.0, 80.0, PAD_HEIGHT),
            },
            stroke,
        ]);
        assert_eq!(surface.display.len(), 1);
        assert_eq!(surface.client_bounds().top, 1.0);
    }
}
