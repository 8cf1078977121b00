use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame, Terminal,
};
use std::io::stdout;

use crate::types::AtsReport;

const TAB_TITLES: [&str; 4] = ["Overview", "Keywords", "Missing", "Resume"];

/// Read-only viewer for one score report.
pub struct TuiApp {
    pub report: AtsReport,
    pub resume_name: String,
    pub current_tab: usize,
    pub scroll: u16,
}

fn score_color(score: u8) -> Color {
    match score {
        75..=100 => Color::Green,
        50..=74 => Color::Yellow,
        _ => Color::Red,
    }
}

impl TuiApp {
    pub fn new(report: AtsReport, resume_name: String) -> Self {
        Self {
            report,
            resume_name,
            current_tab: 0,
            scroll: 0,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, Hide)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_app(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), Show)?;
        terminal.show_cursor()?;

        res
    }

    fn run_app(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.ui(f))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !self.handle_key(key.code) {
                    return Ok(());
                }
            }
        }
    }

    /// Returns false when the viewer should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
                self.current_tab = (self.current_tab + 1) % TAB_TITLES.len();
                self.scroll = 0;
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
                self.current_tab = (self.current_tab + TAB_TITLES.len() - 1) % TAB_TITLES.len();
                self.scroll = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
        true
    }

    fn ui(&self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints(
                [
                    Constraint::Length(3), // Header
                    Constraint::Length(3), // Tabs
                    Constraint::Min(0),    // Content
                    Constraint::Length(3), // Status bar
                ]
                .as_ref(),
            )
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_tabs(f, chunks[1]);

        match self.current_tab {
            0 => self.draw_overview_tab(f, chunks[2]),
            1 => self.draw_keywords_tab(f, chunks[2]),
            2 => self.draw_missing_tab(f, chunks[2]),
            3 => self.draw_resume_tab(f, chunks[2]),
            _ => unreachable!(),
        }

        self.draw_status_bar(f, chunks[3]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled("atscore", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
            Span::raw(format!(" {}", self.resume_name)),
        ]);

        let paragraph = Paragraph::new(title).block(Block::default().borders(Borders::NONE));
        f.render_widget(paragraph, area);
    }

    fn draw_tabs(&self, f: &mut Frame, area: Rect) {
        let tabs = TAB_TITLES
            .iter()
            .map(|t| {
                let (first, rest) = t.split_at(1);
                Line::from(vec![
                    Span::styled(first, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                    Span::styled(rest, Style::default().fg(Color::Gray)),
                ])
            })
            .collect();

        let tabs = Tabs::new(tabs)
            .select(self.current_tab)
            .block(Block::default().borders(Borders::NONE))
            .style(Style::default().fg(Color::White))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        f.render_widget(tabs, area);
    }

    fn draw_overview_tab(&self, f: &mut Frame, area: Rect) {
        let result = &self.report.result;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
            .split(area);

        let gauge = Gauge::default()
            .block(Block::default().title("ATS Score").borders(Borders::ALL))
            .gauge_style(Style::default().fg(score_color(result.score)))
            .percent(u16::from(result.score))
            .label(format!("{}/100", result.score));
        f.render_widget(gauge, chunks[0]);

        let matched = result.details.len() - result.missing.len();
        let found: Vec<&str> = result.found().collect();
        let summary = vec![
            format!("Keywords matched: {} of {}", matched, result.details.len()),
            String::new(),
            format!("Found: {}", found.join(", ")),
            String::new(),
            format!("Missing: {}", result.missing.join(", ")),
        ];

        let paragraph = Paragraph::new(summary.join("\n"))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Summary").borders(Borders::ALL));
        f.render_widget(paragraph, chunks[1]);
    }

    fn draw_keywords_tab(&self, f: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .report
            .result
            .details
            .iter()
            .skip(self.scroll as usize)
            .map(|(keyword, detail)| {
                let (status, color) = if detail.found {
                    ("Found", Color::Green)
                } else {
                    ("Missing", Color::Red)
                };
                Row::new(vec![
                    Cell::from(keyword.clone()),
                    Cell::from(status).style(Style::default().fg(color)),
                    Cell::from(detail.occurrences.to_string()),
                ])
            })
            .collect();

        let table = Table::new(rows)
            .header(Row::new(vec!["Keyword", "Status", "Occurrences"]))
            .block(Block::default().title("Keywords (rank order)").borders(Borders::ALL))
            .widths(&[
                Constraint::Percentage(50),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ]);

        f.render_widget(table, area);
    }

    fn draw_missing_tab(&self, f: &mut Frame, area: Rect) {
        let result = &self.report.result;
        if result.missing.is_empty() {
            let done = Paragraph::new("Every keyword was found in the resume.")
                .block(Block::default().title("Missing Keywords").borders(Borders::ALL));
            f.render_widget(done, area);
            return;
        }

        let items: Vec<ListItem> = result
            .missing
            .iter()
            .skip(self.scroll as usize)
            .map(|keyword| {
                ListItem::new(Line::from(vec![
                    Span::styled("✗ ", Style::default().fg(Color::Red)),
                    Span::raw(keyword.as_str()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Missing Keywords").borders(Borders::ALL));
        f.render_widget(list, area);
    }

    fn draw_resume_tab(&self, f: &mut Frame, area: Rect) {
        let text = if self.report.resume_text.trim().is_empty() {
            "No text could be extracted from this resume."
        } else {
            self.report.resume_text.as_str()
        };

        let paragraph = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(Block::default().title("Extracted Text").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let status = Paragraph::new("h/l: switch tabs  j/k: scroll  q: quit")
            .block(Block::default().borders(Borders::TOP));
        f.render_widget(status, area);
    }
}
