use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameConfig, Phase, Snapshot};

/// Snake body colors, cycled as food is eaten
const SNAKE_PALETTE: [(u8, u8, u8); 9] = [
    (0, 255, 0),
    (0, 0, 255),
    (255, 255, 0),
    (255, 0, 255),
    (255, 165, 0),
    (0, 255, 255),
    (255, 192, 203),
    (50, 205, 50),
    (255, 215, 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Head,
    Body,
    Food,
}

/// Draws snapshots; holds no game state of its own
pub struct Renderer {
    pause_enabled: bool,
    restart_enabled: bool,
    /// Food eaten is shown as color changes when the palette cycles
    color_cycle: Option<u32>,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pause_enabled: config.pause_enabled,
            restart_enabled: config.restart_enabled,
            color_cycle: (config.palette_size > 1).then_some(config.score_increment.max(1)),
        }
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot), chunks[0]);

        let grid = snapshot.grid;
        // Two terminal columns per cell keeps cells roughly square
        let board_width = terminal_len(grid.columns()).saturating_mul(2).saturating_add(2);
        let board_height = terminal_len(grid.rows()).saturating_add(2);

        match snapshot.phase {
            Phase::GameOver => {
                let area = centered(chunks[1], board_width.max(40), board_height.max(9));
                frame.render_widget(self.render_game_over(snapshot), area);
            }
            Phase::Playing | Phase::Paused => {
                let board_area = centered(chunks[1], board_width, board_height);
                frame.render_widget(self.render_grid(snapshot), board_area);
                if snapshot.phase == Phase::Paused {
                    let popup = centered(chunks[1], 30, 3);
                    frame.render_widget(Clear, popup);
                    frame.render_widget(self.render_paused(), popup);
                }
            }
        }

        frame.render_widget(self.render_controls(snapshot.phase), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let cells = layout_cells(snapshot);
        let (r, g, b) = snake_color(snapshot.color_index);
        let body_style = Style::default().fg(Color::Rgb(r, g, b));
        let head_style = Style::default()
            .fg(Color::Rgb(
                r.saturating_add(50),
                g.saturating_add(50),
                b.saturating_add(50),
            ))
            .add_modifier(Modifier::BOLD);

        let lines: Vec<Line> = cells
            .iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|cell| match cell {
                        Cell::Head => Span::styled("██", head_style),
                        Cell::Body => Span::styled("▓▓", body_style),
                        Cell::Food => Span::styled(
                            "██",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Cell::Empty => Span::raw("  "),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let mut text = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.snake.len().to_string(),
                Style::default().fg(Color::White),
            ),
        ]);
        if let Some(increment) = self.color_cycle {
            text.push_span(Span::raw("    "));
            text.push_span(Span::styled("Color changes: ", Style::default().fg(Color::Yellow)));
            text.push_span(Span::styled(
                (snapshot.score / increment).to_string(),
                Style::default().fg(Color::White),
            ));
        }

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_paused(&self) -> Paragraph<'static> {
        Paragraph::new(Line::from(Span::styled(
            "PAUSED - Space to resume",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        )
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];

        if self.restart_enabled {
            text.push(Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Esc",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
        ];
        if self.pause_enabled && phase != Phase::GameOver {
            spans.push(Span::styled("Space", Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(" to pause | "));
        }
        spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

fn terminal_len(cells: i32) -> u16 {
    u16::try_from(cells.max(0)).unwrap_or(u16::MAX)
}

fn snake_color(index: usize) -> (u8, u8, u8) {
    SNAKE_PALETTE[index % SNAKE_PALETTE.len()]
}

/// Rasterize a snapshot into rows of cells
fn layout_cells(snapshot: &Snapshot) -> Vec<Vec<Cell>> {
    let grid = snapshot.grid;
    let mut cells = vec![vec![Cell::Empty; grid.columns() as usize]; grid.rows() as usize];

    let mut place = |pos, cell| {
        if let Some((col, row)) = grid.cell_index(pos) {
            cells[row][col] = cell;
        }
    };

    place(snapshot.food, Cell::Food);
    for (i, &segment) in snapshot.snake.iter().enumerate() {
        place(segment, if i == 0 { Cell::Head } else { Cell::Body });
    }

    cells
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    rect
}
