use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyEvent, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::appearance::{Appearance, Rgb};
use crate::engine::Snapshot;
use crate::error::{GameError, GameResult};
use crate::flavor::FlavorSource;
use crate::progression::Progression;
use crate::{Cell, TermInt, GRID_SIZE};

// Every grid cell is two columns wide so the board looks square.
const CELL_WIDTH: TermInt = 2;
const BOARD_WIDTH: TermInt = GRID_SIZE as TermInt * CELL_WIDTH + 2;
const BOARD_HEIGHT: TermInt = GRID_SIZE as TermInt + 2;
const HUD_LEFT: TermInt = BOARD_WIDTH + 2;
const HUD_WIDTH: TermInt = 32;
const HUD_HEIGHT: TermInt = BOARD_HEIGHT;

pub const REQUIRED_WIDTH: TermInt = HUD_LEFT + HUD_WIDTH;
pub const REQUIRED_HEIGHT: TermInt = BOARD_HEIGHT;

const FOOD_GLYPH: &str = "()";
const GRID_GLYPH: &str = "· ";
const TEXT: Rgb = Rgb::new(0xEE, 0xEE, 0xEE);
const ACCENT: Rgb = Rgb::new(0x00, 0xE5, 0xFF);
const MUTED: Rgb = Rgb::new(0x88, 0x88, 0x88);

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> GameResult<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager { width, height, stdout: stdout() })
    }

    pub fn setup(&mut self) -> GameResult<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    pub fn restore(&mut self) -> GameResult<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )?;
        Ok(())
    }

    pub fn check_fits(&self) -> GameResult<()> {
        if self.width < REQUIRED_WIDTH || self.height < REQUIRED_HEIGHT {
            return Err(GameError::TerminalTooSmall {
                width: self.width,
                height: self.height,
                required_width: REQUIRED_WIDTH,
                required_height: REQUIRED_HEIGHT,
            });
        }
        Ok(())
    }

    pub fn read_key_blocking(&self) -> GameResult<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(ev);
                }
            }
        }
    }

    /// Drains pending key presses without blocking.
    pub fn read_key_events_queue(&self) -> GameResult<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::ZERO)? {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    events.push(ev);
                }
            }
        }

        Ok(events)
    }

    pub fn clear(&mut self) -> GameResult<()> {
        execute!(self.stdout, ResetColor, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    /// Draws one full frame from the snapshot. Reads nothing else from the engine.
    pub fn render<F: FlavorSource>(
        &mut self,
        snap: &Snapshot<'_>,
        progression: &Progression<F>,
    ) -> GameResult<()> {
        let colors = &progression.appearance;

        self.draw_borders(colors)?;
        self.draw_board(snap, colors)?;
        self.draw_hud(snap, progression)?;

        if snap.run_state.paused {
            self.queue_message(&["Paused", "", "Esc to resume", "Ctrl+C to quit"], colors)?;
        }

        self.flush()
    }

    /// Centred box over the board.
    pub fn show_message(&mut self, lines: &[&str], colors: &Appearance) -> GameResult<()> {
        self.queue_message(lines, colors)?;
        self.flush()
    }

    pub fn flush(&mut self) -> GameResult<()> {
        queue!(self.stdout, ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self, colors: &Appearance) -> GameResult<()> {
        let end_x = BOARD_WIDTH - 1;
        let end_y = BOARD_HEIGHT - 1;

        queue!(
            self.stdout,
            SetBackgroundColor(color(colors.background)),
            SetForegroundColor(color(MUTED))
        )?;
        for x in 0..BOARD_WIDTH {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            queue!(
                self.stdout,
                cursor::MoveTo(x, 0),
                Print(ch),
                cursor::MoveTo(x, end_y),
                Print(ch)
            )?;
        }

        for y in 1..end_y {
            queue!(
                self.stdout,
                cursor::MoveTo(0, y),
                Print('|'),
                cursor::MoveTo(end_x, y),
                Print('|')
            )?;
        }
        Ok(())
    }

    fn draw_board(&mut self, snap: &Snapshot<'_>, colors: &Appearance) -> GameResult<()> {
        let bg = color(colors.background);

        for y in 0..GRID_SIZE {
            queue!(self.stdout, cursor::MoveTo(1, y as TermInt + 1), SetBackgroundColor(bg))?;
            queue!(self.stdout, SetForegroundColor(color(colors.grid)))?;
            for _ in 0..GRID_SIZE {
                queue!(self.stdout, Print(GRID_GLYPH))?;
            }
        }

        queue!(self.stdout, SetBackgroundColor(bg), SetForegroundColor(color(colors.food)))?;
        self.print_cell(snap.food, FOOD_GLYPH)?;

        let len = snap.snake.len();
        // Tail first so the head is drawn last.
        for (i, pos) in snap.snake.iter().enumerate().rev() {
            let segment = color(colors.segment_color(i, len));
            if i == 0 {
                queue!(self.stdout, SetBackgroundColor(segment), SetForegroundColor(bg))?;
                self.print_cell(*pos, &format!("{} ", snap.head_char))?;
            } else {
                queue!(self.stdout, SetBackgroundColor(segment))?;
                self.print_cell(*pos, "  ")?;
            }
        }
        Ok(())
    }

    fn draw_hud<F: FlavorSource>(
        &mut self,
        snap: &Snapshot<'_>,
        progression: &Progression<F>,
    ) -> GameResult<()> {
        let inner = HUD_WIDTH as usize - 1;
        let lines = hud_lines(snap, progression, inner);

        queue!(self.stdout, ResetColor)?;
        for row in 0..HUD_HEIGHT {
            let (fg, text) = match lines.get(row as usize) {
                Some((fg, text)) => (*fg, text.as_str()),
                None => (TEXT, ""),
            };
            let padded = format!("{:<width$}", truncate(text, inner), width = HUD_WIDTH as usize);
            queue!(
                self.stdout,
                cursor::MoveTo(HUD_LEFT, row),
                SetForegroundColor(color(fg)),
                Print(padded)
            )?;
        }
        Ok(())
    }

    fn queue_message(&mut self, lines: &[&str], colors: &Appearance) -> GameResult<()> {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 4) as TermInt;
        let center = (BOARD_WIDTH / 2, BOARD_HEIGHT / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        queue!(
            self.stdout,
            SetBackgroundColor(color(colors.background)),
            SetForegroundColor(color(TEXT))
        )?;
        let blank = " ".repeat(msg_width as usize);
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), Print(&blank))?;
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), Print(padded_line))?;
        }
        Ok(())
    }

    fn print_cell(&mut self, pos: Cell, glyph: &str) -> GameResult<()> {
        let x = 1 + pos.0 as TermInt * CELL_WIDTH;
        let y = 1 + pos.1 as TermInt;
        queue!(self.stdout, cursor::MoveTo(x, y), Print(glyph))?;
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb { r: rgb.r, g: rgb.g, b: rgb.b }
}

fn hud_lines<F: FlavorSource>(
    snap: &Snapshot<'_>,
    progression: &Progression<F>,
    width: usize,
) -> Vec<(Rgb, String)> {
    let mut lines: Vec<(Rgb, String)> = vec![
        (ACCENT, "SERPENT'S JOURNEY".to_string()),
        (TEXT, String::new()),
        (TEXT, format!("Score: {}", snap.run_state.score)),
        (TEXT, format!("Level: {}", progression.level)),
        (MUTED, format!("Speed: {:.0}ms", snap.run_state.tick_interval_ms)),
        (TEXT, format!("Biome: {}", progression.biome.name)),
        (MUTED, progression.biome.description.clone()),
    ];

    if let Some(reason) = progression.death {
        lines.push((ACCENT, format!("Cause: {}", reason)));
    }

    if let Some(evolution) = &progression.evolution {
        lines.push((TEXT, String::new()));
        lines.push((progression.appearance.body, "CURRENT FORM".to_string()));
        lines.push((TEXT, evolution.name.clone()));
        lines.push((MUTED, evolution.ability.clone()));
        lines.push((MUTED, evolution.description.clone()));
    }

    lines.push((TEXT, String::new()));
    lines.push((ACCENT, "HELIX // SYSTEM GUIDE".to_string()));
    for line in wrap(&progression.guide, width) {
        lines.push((TEXT, line));
    }

    if !snap.run_state.running && !snap.run_state.game_over {
        lines.push((TEXT, String::new()));
        lines.push((MUTED, "Press W/A/S/D to start".to_string()));
    }
    lines
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: String = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            lines.push(head);
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
