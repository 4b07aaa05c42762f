use std::{
    sync::mpsc::{Receiver, Sender},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use copypasta::{ClipboardContext, ClipboardProvider};
use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};
use tokio::runtime::Handle;
use tracing::{info, warn};
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::text::{Span, Spans};
use tui::widgets::Paragraph;
use tui::{backend::Backend, Frame, Terminal};

use easel::export::{id_lines, render_records, save_to_downloads, OutputFormat};
use easel::fetch_worker::{start_fetch_worker, FetchOrigin, FetchRequest, FetchResponse};
use easel::{RecordSource, SelectRun, Session, Step};

use crate::palette::STYLE;
use crate::popover::{PopoverAction, SelectPopover};
use crate::table_view::{self, TableAction, TableView};
use crate::selected_list;

const STATUS_TTL: Duration = Duration::from_secs(6);

pub struct App {
    pub session: Session,
    pub view: TableView,
    pub popover: Option<SelectPopover>,
    select_job: Option<SelectRun>,

    fetch_tx: Sender<FetchRequest>,
    fetch_rx: Receiver<FetchResponse>,

    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
    status_is_error: bool,

    clipboard: Option<ClipboardContext>,
}

impl App {
    pub fn new(page_size: u64, runtime: Handle, source: Arc<dyn RecordSource>) -> Self {
        let (fetch_tx, fetch_rx) = start_fetch_worker(runtime, source);
        let mut app = Self {
            session: Session::new(page_size),
            view: TableView::new(),
            popover: None,
            select_job: None,
            fetch_tx,
            fetch_rx,
            status_message: None,
            status_message_time: None,
            status_is_error: false,
            clipboard: ClipboardContext::new().ok(),
        };
        app.request_page(1, FetchOrigin::Navigation);
        app
    }

    pub fn set_status(&mut self, msg: impl Into<String>, is_error: bool) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
        self.status_is_error = is_error;
    }

    fn request_page(&mut self, page: u64, origin: FetchOrigin) {
        if origin == FetchOrigin::Navigation {
            self.view.in_flight.insert(page);
        }
        let offset = self.session.offset_for(page);
        let _ = self.fetch_tx.send(FetchRequest::Page { page, offset, origin });
    }

    fn goto_page(&mut self, page: u64) {
        self.view.set_page(&self.session, page);
        if !self.session.cache.contains(page) && !self.view.in_flight.contains(&page) {
            self.request_page(page, FetchOrigin::Navigation);
        }
    }

    /*──────────── cross-page selection, one page per tick ────────────*/

    fn submit_select(&mut self, text: &str) {
        // Junk input is ignored; the popover stays open.
        let Some(target) = easel::parse_count(text) else { return };
        info!(goal = target, "select-n submitted");
        let run = SelectRun::new(target);
        if let Some(pop) = self.popover.as_mut() {
            pop.busy = Some((target, run.current_page()));
        }
        self.continue_select(run);
    }

    /// Closes the popover only if it is the one that started the walk; a
    /// popover reopened while the walk runs keeps its input.
    fn close_job_popover(&mut self) {
        if self.popover.as_ref().is_some_and(|p| p.busy.is_some()) {
            self.popover = None;
        }
    }

    fn continue_select(&mut self, mut run: SelectRun) {
        match run.advance(&mut self.session) {
            Step::Done(count) => {
                self.select_job = None;
                self.close_job_popover();
                self.set_status(format!("{count} rows selected"), false);
            }
            Step::NeedPage(page) => {
                if let Some(pop) = self.popover.as_mut().filter(|p| p.busy.is_some()) {
                    pop.busy = Some((run.target(), page));
                }
                self.select_job = Some(run);
                self.request_page(page, FetchOrigin::Selector);
            }
        }
    }

    /// Call this from the main loop regularly.
    pub fn poll_fetch_responses(&mut self) -> bool {
        let mut changed = false;
        while let Ok(FetchResponse { page, origin, elapsed, result }) = self.fetch_rx.try_recv() {
            changed = true;
            if origin == FetchOrigin::Navigation {
                self.view.in_flight.remove(&page);
            }
            match result {
                Ok(fetched) => {
                    info!(page, ?origin, ms = elapsed.as_millis() as u64, "page arrived");
                    self.session.store_page(page, fetched);
                    let waiting = self.select_job.as_ref().map(|r| r.current_page());
                    if waiting == Some(page) {
                        if let Some(run) = self.select_job.take() {
                            self.continue_select(run);
                        }
                    }
                }
                Err(err) => {
                    let waiting = self.select_job.as_ref().map(|r| r.current_page());
                    if origin == FetchOrigin::Selector && waiting == Some(page) {
                        self.select_job = None;
                        self.close_job_popover();
                        let msg = format!(
                            "Selection stopped at page {page} ({} rows selected): {err}",
                            self.session.selection.count()
                        );
                        warn!("{msg}");
                        self.set_status(msg, true);
                    } else if origin == FetchOrigin::Navigation && page == self.view.page {
                        self.set_status(format!("Error fetching page {page}: {err}"), true);
                    }
                }
            }
        }
        changed
    }

    /*──────────── input ────────────*/

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }

        if let Some(pop) = self.popover.as_mut() {
            match pop.handle_key(key) {
                PopoverAction::None => {}
                PopoverAction::Dismiss => {
                    // A running walk keeps going; only the overlay goes away.
                    self.popover = None;
                }
                PopoverAction::Submit(text) => self.submit_select(&text),
            }
            return Ok(false);
        }

        match table_view::handle_key(&mut self.view, &mut self.session, key) {
            TableAction::None => {}
            TableAction::Quit => return Ok(true),
            TableAction::ChangePage(p) => self.goto_page(p),
            TableAction::Reload => {
                let page = self.view.page;
                self.request_page(page, FetchOrigin::Navigation);
            }
            TableAction::OpenPopover => self.popover = Some(SelectPopover::new()),
            TableAction::Export => self.export_selected(),
            TableAction::CopyIds => self.copy_selected_ids(),
        }
        Ok(false)
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.popover.is_none() {
            table_view::handle_mouse(&mut self.view, &mut self.session, event);
        }
    }

    pub fn update(&mut self) {
        if let Some(t) = self.status_message_time {
            if t.elapsed() > STATUS_TTL {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    fn export_selected(&mut self) {
        let records = self.session.selected_records();
        if records.is_empty() {
            self.set_status("No selected rows on fetched pages, nothing to export.", false);
            return;
        }
        let filename = format!(
            "artworks_{}.{}",
            chrono::Local::now().format("%Y%m%d_%H%M%S"),
            OutputFormat::Csv.extension()
        );
        let outcome = render_records(&records, OutputFormat::Csv)
            .map_err(anyhow::Error::from)
            .and_then(|csv| save_to_downloads(&filename, &csv).map_err(anyhow::Error::from));
        match outcome {
            Ok(path) => self.set_status(format!("CSV exported to: {}", path.display()), false),
            Err(err) => self.set_status(format!("Error saving CSV: {err}"), true),
        }
    }

    fn copy_selected_ids(&mut self) {
        let text = id_lines(&self.session.selection.selected_ids());
        let copied = self
            .clipboard
            .as_mut()
            .map(|cb| cb.set_contents(text).is_ok())
            .unwrap_or(false);
        if copied {
            self.set_status("Selected ids copied to clipboard", false);
        } else {
            self.set_status("Clipboard unavailable", true);
        }
    }

    /*──────────── drawing ────────────*/

    pub fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|f| self.draw(f))?;
        Ok(())
    }

    fn draw<B: Backend>(&mut self, f: &mut Frame<B>) {
        let screen = f.size();
        f.render_widget(Paragraph::new("").style(STYLE::default_bg()), screen);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1), Constraint::Length(1)].as_ref())
            .split(screen);
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(78), Constraint::Percentage(22)].as_ref())
            .split(rows[0]);

        table_view::render(&mut self.view, &self.session, f, panes[0]);
        selected_list::render(&self.session.selection, f, panes[1]);
        self.draw_footer(f, rows[1]);
        self.draw_status(f, rows[2]);

        if let Some(pop) = &self.popover {
            pop.render(f, screen);
        }
    }

    fn draw_footer<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let pages = match self.session.page_count() {
            0 => "?".to_string(),
            n => n.to_string(),
        };
        let total = self
            .session
            .total_records
            .map(|t| t.to_string())
            .unwrap_or_else(|| "?".into());
        let line = Spans::from(vec![
            Span::styled(format!(" Page {} / {pages}", self.view.page), STYLE::header_row()),
            Span::styled(format!("   rows {}+ of {total}", self.view.first + 1), STYLE::text()),
            Span::styled(
                format!("   Number of rows selected: {}", self.session.selection.count()),
                STYLE::checked(),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn draw_status<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let line = match &self.status_message {
            Some(msg) => {
                let style = if self.status_is_error { STYLE::error_fg() } else { STYLE::status_fg() };
                Span::styled(format!(" {msg}"), style)
            }
            None => Span::styled(
                " ↑↓ move  Space toggle  a page  ←→ pages  n select N  e export  y copy ids  r reload  q quit",
                STYLE::info_fg(),
            ),
        };
        f.render_widget(Paragraph::new(Spans::from(line)), area);
    }
}
