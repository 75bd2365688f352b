use crate::check::{CheckOptions, CheckReport, ElementSummary, Session};
use crate::model::ElementRecord;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Dashboard,
    ElementDetail,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    Levels,
    Elements,
}

pub struct App {
    pub session: Session,
    pub options: CheckOptions,
    pub storeys: Vec<String>,
    pub report: Option<CheckReport>,
    /// Why the last pass produced no report.
    pub status: Option<String>,
    pub view: View,
    pub focus_panel: FocusPanel,
    pub selected_level: usize, // 0 = "All", 1+ = storey index
    pub selected_element: usize,
    pub attribute_scroll_offset: usize,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(session: Session, options: CheckOptions) -> Self {
        let storeys = session.storey_names().unwrap_or_default();
        let selected_level = options
            .storey
            .as_ref()
            .and_then(|name| storeys.iter().position(|s| s == name))
            .map_or(0, |i| i + 1);

        let mut app = Self {
            session,
            options,
            storeys,
            report: None,
            status: None,
            view: View::Dashboard,
            focus_panel: FocusPanel::Elements,
            selected_level,
            selected_element: 0,
            attribute_scroll_offset: 0,
            should_quit: false,
        };
        app.rerun();
        app
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Replace the report with a fresh pass for the current options.
    pub fn rerun(&mut self) {
        match self.session.run(&self.options) {
            Ok(report) => {
                self.report = Some(report);
                self.status = None;
            }
            Err(err) => {
                tracing::debug!(%err, "Check failed");
                self.report = None;
                self.status = Some(err.to_string());
            }
        }
        self.selected_element = 0;
        self.attribute_scroll_offset = 0;
    }

    fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => super::dashboard::draw_dashboard(frame, self),
            View::ElementDetail => super::dashboard::draw_element_detail(frame, self),
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.view {
                View::Dashboard => self.handle_dashboard_keys(key.code),
                View::ElementDetail => self.handle_detail_keys(key.code),
            }
        }
        Ok(())
    }

    pub fn handle_dashboard_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Left | KeyCode::Char('h') => self.focus_panel = FocusPanel::Levels,
            KeyCode::Right | KeyCode::Char('l') => self.focus_panel = FocusPanel::Elements,
            KeyCode::Char('r') => self.rerun(),
            KeyCode::Enter => self.enter_element_detail(),
            _ => {}
        }
    }

    pub fn handle_detail_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => {
                self.view = View::Dashboard;
                self.attribute_scroll_offset = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.attribute_scroll_offset = self.attribute_scroll_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_attributes_down(),
            KeyCode::Left | KeyCode::Char('h') => self.previous_element_in_detail(),
            KeyCode::Right | KeyCode::Char('l') => self.next_element_in_detail(),
            _ => {}
        }
    }

    fn navigate_up(&mut self) {
        match self.focus_panel {
            FocusPanel::Levels => {
                if self.selected_level > 0 {
                    self.select_level(self.selected_level - 1);
                }
            }
            FocusPanel::Elements => {
                self.selected_element = self.selected_element.saturating_sub(1);
            }
        }
    }

    fn navigate_down(&mut self) {
        match self.focus_panel {
            FocusPanel::Levels => {
                if self.selected_level < self.storeys.len() {
                    self.select_level(self.selected_level + 1);
                }
            }
            FocusPanel::Elements => {
                if self.selected_element < self.failing_elements().len().saturating_sub(1) {
                    self.selected_element += 1;
                }
            }
        }
    }

    /// Switch the storey filter and re-run the check for it.
    pub fn select_level(&mut self, level: usize) {
        self.selected_level = level;
        self.options.storey = level
            .checked_sub(1)
            .and_then(|i| self.storeys.get(i))
            .cloned();
        self.rerun();
    }

    fn enter_element_detail(&mut self) {
        if self.focus_panel == FocusPanel::Elements && self.selected_summary().is_some() {
            self.view = View::ElementDetail;
            self.attribute_scroll_offset = 0;
        }
    }

    fn scroll_attributes_down(&mut self) {
        let max = self
            .selected_record()
            .map_or(0, |r| r.attributes.len())
            .saturating_sub(1);
        if self.attribute_scroll_offset < max {
            self.attribute_scroll_offset += 1;
        }
    }

    /// Wraps around at the first element.
    fn previous_element_in_detail(&mut self) {
        let count = self.failing_elements().len();
        if count == 0 {
            return;
        }
        self.selected_element = if self.selected_element > 0 {
            self.selected_element - 1
        } else {
            count - 1
        };
        self.attribute_scroll_offset = 0;
    }

    /// Wraps around at the last element.
    fn next_element_in_detail(&mut self) {
        let count = self.failing_elements().len();
        if count == 0 {
            return;
        }
        self.selected_element = (self.selected_element + 1) % count;
        self.attribute_scroll_offset = 0;
    }

    #[must_use]
    pub fn failing_elements(&self) -> &[ElementSummary] {
        self.report
            .as_ref()
            .map(|r| r.elements.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn selected_summary(&self) -> Option<&ElementSummary> {
        self.failing_elements().get(self.selected_element)
    }

    #[must_use]
    pub fn selected_record(&self) -> Option<&ElementRecord> {
        let id = self.selected_summary()?.id;
        self.session.index()?.by_id(id)
    }

    /// Attributes of the selected element as display strings.
    #[must_use]
    pub fn selected_attributes(&self) -> Vec<(String, String)> {
        self.selected_record()
            .map(|record| {
                record
                    .attributes
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Selected level name (for display).
    #[must_use]
    pub fn selected_level_name(&self) -> &str {
        self.options.storey.as_deref().unwrap_or("All")
    }
}
