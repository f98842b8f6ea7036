//! Application state and event loop

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
};
use crossterm::execute;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Widget,
    DefaultTerminal, Frame,
};
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::render::{write_svg, Canvas, ChartRenderer, Pointer, Tooltip};
use crate::reports::{ReportId, ReportOutput, ReportSession, RunToken};
use crate::services::Config;

use super::theme::Theme;
use super::widgets::{
    help::HelpPopup,
    preview::{preview_block, Message, Preview, PreviewItem, RowsLayout, TooltipPopup},
    report_list::{ReportList, LIST_WIDTH},
    spinner::{LoadingStage, Spinner},
};

const FOOTER_HINT: &str = "↑/↓ select · Enter run · Tab inspect · s save · ? help · q quit";

/// Progress of a background report run
#[derive(Debug)]
pub enum RunMessage {
    Stage(RunToken, LoadingStage),
    Done(RunToken, Result<Box<ReportOutput>, String>),
}

impl RunMessage {
    pub fn token(&self) -> RunToken {
        match self {
            Self::Stage(token, _) | Self::Done(token, _) => *token,
        }
    }
}

/// Application state
pub enum AppState {
    /// No report run yet
    Idle,
    /// Waiting for the run holding `token`
    Loading {
        report: ReportId,
        token: RunToken,
        spinner_frame: usize,
        stage: LoadingStage,
    },
    Ready {
        output: Box<ReportOutput>,
        items: Vec<PreviewItem>,
    },
    /// The source could not be loaded
    Unavailable { report: ReportId, message: String },
}

/// Side effect requested by an event; carried out by the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Run(ReportId),
    Save,
}

struct Regions {
    list: Rect,
    preview: Rect,
    footer: Rect,
}

fn regions(area: Rect) -> Regions {
    let [body, footer] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    let [list, preview] =
        Layout::horizontal([Constraint::Length(LIST_WIDTH), Constraint::Min(0)]).areas(body);
    Regions {
        list,
        preview,
        footer,
    }
}

/// Main application
pub struct App {
    state: AppState,
    selected: usize,
    hovered: Option<usize>,
    tooltip: Tooltip,
    show_help: bool,
    should_quit: bool,
    status: Option<String>,
    /// Last drawn frame area, for mouse hit-testing
    area: Rect,
    theme: Theme,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            state: AppState::Idle,
            selected: 0,
            hovered: None,
            tooltip: Tooltip::new(),
            show_help: false,
            should_quit: false,
            status: None,
            area: Rect::default(),
            theme,
        }
    }

    pub fn selected_report(&self) -> ReportId {
        ReportId::ALL[self.selected]
    }

    /// Handle terminal events, returning what the event loop should do next
    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => {
                self.hover_at(mouse.column, mouse.row);
                Action::None
            }
            Event::Resize(width, height) => {
                self.resize(Rect::new(0, 0, width, height));
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> Action {
        if self.show_help {
            if matches!(code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return Action::None;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(ReportId::ALL.len() - 1);
                Action::None
            }
            KeyCode::Enter | KeyCode::Char('r') => Action::Run(self.selected_report()),
            KeyCode::Tab => {
                self.cycle_hover(true);
                Action::None
            }
            KeyCode::BackTab => {
                self.cycle_hover(false);
                Action::None
            }
            KeyCode::Char('s') => match self.state {
                AppState::Ready { .. } | AppState::Unavailable { .. } => Action::Save,
                _ => Action::None,
            },
            KeyCode::Char('?') => {
                self.show_help = true;
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Enter the loading state for a freshly started run
    pub fn start(&mut self, report: ReportId, token: RunToken) {
        self.state = AppState::Loading {
            report,
            token,
            spinner_frame: 0,
            stage: LoadingStage::Loading,
        };
        self.clear_hover();
        self.tooltip.reset();
        self.status = None;
    }

    /// Apply a run message; messages for any run but the awaited one are dropped
    pub fn apply(&mut self, message: RunMessage) -> bool {
        match message {
            RunMessage::Stage(token, next) => match &mut self.state {
                AppState::Loading {
                    token: awaited,
                    stage,
                    ..
                } if *awaited == token => {
                    *stage = next;
                    true
                }
                _ => false,
            },
            RunMessage::Done(token, result) => {
                let report = match &self.state {
                    AppState::Loading {
                        report,
                        token: awaited,
                        ..
                    } if *awaited == token => *report,
                    _ => {
                        debug!(token = token.value(), "dropping result of a superseded run");
                        return false;
                    }
                };

                self.tooltip.reset();
                self.clear_hover();
                self.state = match result {
                    Ok(output) => {
                        let items = PreviewItem::collect(&output);
                        AppState::Ready { output, items }
                    }
                    Err(message) => AppState::Unavailable { report, message },
                };
                true
            }
        }
    }

    /// Write what the preview shows to `<output_dir>/<nn>-<slug>.svg`
    pub fn save(&mut self, config: &Config) -> Option<PathBuf> {
        let mut canvas = Canvas::new(config.width, config.height);
        let id = match &self.state {
            AppState::Ready { output, .. } => {
                ChartRenderer::render(&output.chart, &mut canvas);
                output.id
            }
            AppState::Unavailable { report, .. } => {
                ChartRenderer::render_error(&mut canvas, report.title());
                *report
            }
            _ => return None,
        };

        let path = config.output_dir.join(id.file_name());
        match write_svg(&path, &canvas) {
            Ok(()) => {
                info!(report = %id, path = %path.display(), "chart saved");
                self.status = Some(format!("Saved {}", path.display()));
                Some(path)
            }
            Err(e) => {
                warn!(report = %id, error = %e, "chart save failed");
                self.status = Some(format!("Save failed: {}", e));
                None
            }
        }
    }

    fn rows_layout(&self, area: Rect) -> Option<RowsLayout> {
        let AppState::Ready { output, items } = &self.state else {
            return None;
        };
        let inner = preview_block(output.title(), self.theme).inner(regions(area).preview);
        Some(RowsLayout::new(
            inner,
            items,
            Preview::summary_lines(output).len(),
        ))
    }

    fn visible_items(&self) -> usize {
        match (&self.state, self.rows_layout(self.area)) {
            (AppState::Ready { items, .. }, Some(layout)) => {
                items.len().min(layout.area.height as usize)
            }
            _ => 0,
        }
    }

    fn hover(&mut self, index: usize, pointer: Pointer) {
        if let AppState::Ready { items, .. } = &self.state {
            if let Some(item) = items.get(index) {
                self.tooltip.show(item.tooltip.clone(), pointer);
                self.hovered = Some(index);
                return;
            }
        }
        self.clear_hover();
    }

    fn clear_hover(&mut self) {
        self.hovered = None;
        self.tooltip.reset();
    }

    /// Show the tooltip of the row under the mouse, hide it elsewhere
    pub fn hover_at(&mut self, column: u16, row: u16) {
        match self
            .rows_layout(self.area)
            .and_then(|layout| layout.item_at(column, row))
        {
            Some(index) => self.hover(index, Pointer::new(column as f64, row as f64)),
            None => self.clear_hover(),
        }
    }

    fn cycle_hover(&mut self, forward: bool) {
        let count = self.visible_items();
        if count == 0 {
            return;
        }
        let next = match (self.hovered, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        let anchor = self
            .rows_layout(self.area)
            .map(|layout| layout.anchor(next))
            .unwrap_or_default();
        self.hover(next, Pointer::new(anchor.0 as f64, anchor.1 as f64));
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if let AppState::Loading { spinner_frame, .. } = &mut self.state {
            *spinner_frame = Spinner::next_frame(*spinner_frame);
        }
    }

    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        if self.hovered.is_some_and(|i| i >= self.visible_items()) {
            self.clear_hover();
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area != self.area {
            self.resize(area);
        }
        frame.render_widget(&*self, area);
    }

    fn active_report(&self) -> Option<ReportId> {
        match &self.state {
            AppState::Idle => None,
            AppState::Loading { report, .. } | AppState::Unavailable { report, .. } => {
                Some(*report)
            }
            AppState::Ready { output, .. } => Some(output.id),
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let regions = regions(area);
        let theme = self.theme;

        ReportList::new(self.selected, self.active_report(), theme).render(regions.list, buf);

        match &self.state {
            AppState::Idle => {
                let block = preview_block("salesviz", theme);
                let inner = block.inner(regions.preview);
                block.render(regions.preview, buf);
                Message::new(
                    "Select a report and press Enter",
                    None,
                    theme.muted(),
                    theme,
                )
                .render(inner, buf);
            }
            AppState::Loading {
                report,
                spinner_frame,
                stage,
                ..
            } => {
                let block = preview_block(report.title(), theme);
                let inner = block.inner(regions.preview);
                block.render(regions.preview, buf);
                Spinner::new(*spinner_frame, *stage, report.title(), theme).render(inner, buf);
            }
            AppState::Ready { output, items } => {
                Preview::new(output, items, self.hovered, theme).render(regions.preview, buf);

                if let (Some(index), Some(content), Some(layout)) =
                    (self.hovered, self.tooltip.content(), self.rows_layout(area))
                {
                    let popup = TooltipPopup::area_near(content, layout.anchor(index), regions.preview);
                    TooltipPopup::new(content, theme).render(popup, buf);
                }
            }
            AppState::Unavailable { report, message } => {
                let block = preview_block(report.title(), theme);
                let inner = block.inner(regions.preview);
                block.render(regions.preview, buf);
                Message::load_failure(message, theme).render(inner, buf);
            }
        }

        let footer = self.status.as_deref().unwrap_or(FOOTER_HINT);
        buf.set_stringn(
            regions.footer.x + 1,
            regions.footer.y,
            footer,
            regions.footer.width.saturating_sub(1) as usize,
            Style::default().fg(theme.muted()),
        );

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(theme).render(popup_area, buf);
        }
    }
}

/// Start a background run on the runtime; its messages arrive over `tx`
fn spawn_run(
    runtime: &Runtime,
    session: &Arc<ReportSession>,
    id: ReportId,
    tx: &mpsc::Sender<RunMessage>,
) -> RunToken {
    let token = session.begin();
    let session = Arc::clone(session);
    let tx = tx.clone();

    runtime.spawn(async move {
        info!(report = %id, token = token.value(), source = %session.source(), "report run started");
        let result = match session.load().await {
            Ok(lines) => {
                let _ = tx.send(RunMessage::Stage(token, LoadingStage::Aggregating));
                Ok(Box::new(session.build(id, &lines)))
            }
            Err(e) => {
                warn!(report = %id, error = %e, "report data unavailable");
                Err(e.to_string())
            }
        };
        let _ = tx.send(RunMessage::Done(token, result));
    });

    token
}

/// Run the TUI application
pub fn run(config: Config) -> anyhow::Result<()> {
    // Detect before raw mode
    let theme = Theme::detect();
    let session = Arc::new(ReportSession::new(config)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let mut terminal = ratatui::init();
    let result = execute!(std::io::stdout(), EnableMouseCapture)
        .map_err(anyhow::Error::from)
        .and_then(|()| run_app(&mut terminal, &session, &runtime, theme));
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}

fn run_app(
    terminal: &mut DefaultTerminal,
    session: &Arc<ReportSession>,
    runtime: &Runtime,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut app = App::new(theme);
    let (tx, rx) = mpsc::channel::<RunMessage>();

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Drain finished runs (non-blocking)
        while let Ok(message) = rx.try_recv() {
            let token = message.token();
            if !session.is_current(token) {
                warn!(token = token.value(), "discarding stale report run");
                continue;
            }
            app.apply(message);
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            match app.handle_event(event::read()?) {
                Action::Run(id) => {
                    let token = spawn_run(runtime, session, id, &tx);
                    app.start(id, token);
                }
                Action::Save => {
                    app.save(session.config());
                }
                Action::None => {}
            }
        } else {
            app.tick();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{SalesCsvParser, TableParser};
    use crate::render::LOAD_ERROR_TEXT;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};
    use tempfile::TempDir;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse_move(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn session() -> ReportSession {
        ReportSession::new(Config::default()).unwrap()
    }

    fn fixture_output(id: ReportId) -> Box<ReportOutput> {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("sales-sample.csv");
        let lines = SalesCsvParser::new()
            .parse_bytes(&std::fs::read(path).unwrap())
            .unwrap();
        Box::new(session().build(id, &lines))
    }

    fn render_text(app: &App, area: Rect) -> String {
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    /// App showing the sales-by-group preview in a 120x30 terminal
    fn make_ready_app() -> App {
        let session = session();
        let mut app = App::new(Theme::Dark);
        app.resize(Rect::new(0, 0, 120, 30));
        let token = session.begin();
        app.start(ReportId::SalesByGroup, token);
        assert!(app.apply(RunMessage::Done(
            token,
            Ok(fixture_output(ReportId::SalesByGroup))
        )));
        app
    }

    // ========== keys ==========

    #[test]
    fn test_app_initial_state() {
        let app = App::new(Theme::Dark);
        assert!(matches!(app.state, AppState::Idle));
        assert_eq!(app.selected_report(), ReportId::SalesByItem);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_app_quit_on_q() {
        let mut app = App::new(Theme::Dark);
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_app_quit_on_esc() {
        let mut app = App::new(Theme::Dark);
        app.handle_event(key(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn test_app_help_toggle() {
        let mut app = App::new(Theme::Dark);
        app.handle_event(key(KeyCode::Char('?')));
        assert!(app.show_help);

        // Esc closes help instead of quitting
        app.handle_event(key(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_app_selection_clamps() {
        let mut app = App::new(Theme::Dark);
        app.handle_event(key(KeyCode::Up));
        assert_eq!(app.selected, 0);

        for _ in 0..20 {
            app.handle_event(key(KeyCode::Char('j')));
        }
        assert_eq!(app.selected_report(), ReportId::CustomerSpending);

        app.handle_event(key(KeyCode::Char('k')));
        assert_eq!(app.selected_report(), ReportId::PurchaseFrequency);
    }

    #[test]
    fn test_enter_requests_run() {
        let mut app = App::new(Theme::Dark);
        app.handle_event(key(KeyCode::Down));
        assert_eq!(
            app.handle_event(key(KeyCode::Enter)),
            Action::Run(ReportId::SalesByGroup)
        );
        assert_eq!(
            app.handle_event(key(KeyCode::Char('r'))),
            Action::Run(ReportId::SalesByGroup)
        );
    }

    #[test]
    fn test_save_needs_a_result() {
        let mut app = App::new(Theme::Dark);
        assert_eq!(app.handle_event(key(KeyCode::Char('s'))), Action::None);

        let mut app = make_ready_app();
        assert_eq!(app.handle_event(key(KeyCode::Char('s'))), Action::Save);
    }

    // ========== runs ==========

    #[test]
    fn test_start_and_tick() {
        let session = session();
        let mut app = App::new(Theme::Dark);
        app.start(ReportId::SalesByMonth, session.begin());
        app.tick();
        app.tick();

        assert!(matches!(
            app.state,
            AppState::Loading {
                report: ReportId::SalesByMonth,
                spinner_frame: 2,
                stage: LoadingStage::Loading,
                ..
            }
        ));
    }

    #[test]
    fn test_stage_updates_only_awaited_run() {
        let session = session();
        let mut app = App::new(Theme::Dark);
        let old = session.begin();
        let new = session.begin();
        app.start(ReportId::SalesByMonth, new);

        assert!(!app.apply(RunMessage::Stage(old, LoadingStage::Aggregating)));
        assert!(app.apply(RunMessage::Stage(new, LoadingStage::Aggregating)));
        assert!(matches!(
            app.state,
            AppState::Loading {
                stage: LoadingStage::Aggregating,
                ..
            }
        ));
    }

    #[test]
    fn test_superseded_result_is_dropped() {
        let session = session();
        let mut app = App::new(Theme::Dark);
        let first = session.begin();
        app.start(ReportId::SalesByItem, first);
        let second = session.begin();
        app.start(ReportId::SalesByGroup, second);

        let applied = app.apply(RunMessage::Done(
            first,
            Ok(fixture_output(ReportId::SalesByItem)),
        ));

        assert!(!applied);
        assert!(matches!(
            app.state,
            AppState::Loading {
                report: ReportId::SalesByGroup,
                ..
            }
        ));
    }

    #[test]
    fn test_done_ok_shows_preview() {
        let app = make_ready_app();
        let AppState::Ready { items, .. } = &app.state else {
            panic!("expected ready state");
        };
        assert_eq!(items.len(), 3);

        let text = render_text(&app, Rect::new(0, 0, 120, 30));
        assert!(text.contains("Doanh số bán hàng theo Nhóm hàng"));
        assert!(text.contains("3 rows"));
    }

    #[test]
    fn test_done_err_shows_fallback() {
        let session = session();
        let mut app = App::new(Theme::Dark);
        let token = session.begin();
        app.start(ReportId::SalesByMonth, token);
        app.apply(RunMessage::Done(token, Err("No such file".into())));

        assert!(matches!(
            app.state,
            AppState::Unavailable {
                report: ReportId::SalesByMonth,
                ..
            }
        ));
        let text = render_text(&app, Rect::new(0, 0, 120, 30));
        assert!(text.contains(LOAD_ERROR_TEXT));
        assert!(text.contains("No such file"));
    }

    // ========== tooltip ==========

    #[test]
    fn test_mouse_hover_shows_and_hides_tooltip() {
        let mut app = make_ready_app();

        // Preview block starts at column 40; first row sits under the header line
        app.handle_event(mouse_move(60, 2));
        assert_eq!(app.hovered, Some(0));
        assert!(app.tooltip.is_visible());

        app.handle_event(mouse_move(60, 20));
        assert_eq!(app.hovered, None);
        assert!(!app.tooltip.is_visible());
        // Leaving a row clears the shared tooltip, not only hides it
        assert_eq!(app.tooltip, Tooltip::default());
    }

    #[test]
    fn test_tab_cycles_rows() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.hovered, Some(0));
        app.handle_event(key(KeyCode::BackTab));
        assert_eq!(app.hovered, Some(2));
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.hovered, Some(0));

        let AppState::Ready { items, .. } = &app.state else {
            panic!("expected ready state");
        };
        assert_eq!(
            app.tooltip.content().map(|c| c.title.clone()),
            Some(items[0].tooltip.title.clone())
        );
    }

    #[test]
    fn test_new_run_resets_tooltip() {
        let session = session();
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Tab));
        assert!(app.tooltip.is_visible());

        app.start(ReportId::SalesByItem, session.begin());
        assert!(!app.tooltip.is_visible());
        assert_eq!(app.hovered, None);
    }

    // ========== save ==========

    #[test]
    fn test_save_writes_svg() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            output_dir: dir.path().join("charts"),
            ..Config::default()
        };
        let mut app = make_ready_app();

        let path = app.save(&config).unwrap();

        assert_eq!(path, config.output_dir.join("02-sales-by-group.svg"));
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("Doanh số bán hàng theo Nhóm hàng"));
        assert!(app.status.as_deref().unwrap().starts_with("Saved"));
    }

    #[test]
    fn test_save_idle_does_nothing() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let mut app = App::new(Theme::Dark);
        assert!(app.save(&config).is_none());
        assert!(app.status.is_none());
    }
}
