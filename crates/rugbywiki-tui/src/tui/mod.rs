// Terminal UI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the page snapshots published by the
// app orchestrator. Updates arrive over an mpsc channel; the TUI applies them
// to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use rugbywiki_app::protocol::{
    FixturesView, LoadState, PageId, TeamStatsView, TeamsView, UiUpdate, UserCommand,
};
use rugbywiki_core::card::TeamCard;
use rugbywiki_core::filter::FilterCriteria;
use rugbywiki_core::model::League;

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local mirror of the published page snapshots plus purely local state
/// (selection, scrolling, search editing, quit confirmation).
#[derive(Debug, Default)]
pub struct ViewState {
    pub active_page: PageId,
    pub leagues: LoadState<Vec<League>>,
    pub fixtures: Option<FixturesView>,
    pub teams: Option<TeamsView>,
    pub stats: Option<TeamStatsView>,
    /// Per-page scroll offsets.
    pub scroll_offset: HashMap<PageId, usize>,
    /// Highlighted row on the teams page.
    pub selected_team: usize,
    /// Whether the search line is being edited.
    pub search_mode: bool,
    pub search_text: String,
    pub confirm_quit: bool,
}

impl ViewState {
    /// Criteria of the active page, when it has any.
    pub fn active_criteria(&self) -> Option<&FilterCriteria> {
        match self.active_page {
            PageId::Fixtures => self.fixtures.as_ref().map(|v| &v.criteria),
            PageId::Teams => self.teams.as_ref().map(|v| &v.criteria),
            PageId::TeamStats => None,
        }
    }

    /// Selectable years of the active page.
    pub fn active_years(&self) -> &[i32] {
        match self.active_page {
            PageId::Fixtures => self.fixtures.as_ref().map(|v| v.years.as_slice()).unwrap_or(&[]),
            PageId::Teams => self.teams.as_ref().map(|v| v.years.as_slice()).unwrap_or(&[]),
            PageId::TeamStats => &[],
        }
    }

    /// League chips in display order: `All` followed by every league. Empty
    /// until leagues have loaded.
    pub fn league_options(&self) -> Vec<Option<i64>> {
        match &self.leagues {
            LoadState::Loaded(leagues) => std::iter::once(None)
                .chain(leagues.iter().map(|l| Some(l.id)))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn league_name(&self, league_id: i64) -> Option<&str> {
        self.leagues
            .loaded()
            .and_then(|ls| ls.iter().find(|l| l.id == league_id))
            .map(|l| l.name.as_str())
    }

    /// Team cards currently listed on the teams page.
    pub fn visible_teams(&self) -> &[TeamCard] {
        self.teams
            .as_ref()
            .and_then(|v| v.content.loaded())
            .map(|cards| cards.as_slice())
            .unwrap_or(&[])
    }

    pub fn scroll(&self, page: PageId) -> usize {
        self.scroll_offset.get(&page).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Leagues(leagues) => {
            state.leagues = leagues;
        }
        UiUpdate::Fixtures(view) => {
            if state.fixtures.as_ref().map(|v| &v.criteria) != Some(&view.criteria) {
                state.scroll_offset.remove(&PageId::Fixtures);
            }
            state.fixtures = Some(*view);
        }
        UiUpdate::Teams(view) => {
            state.teams = Some(*view);
            let count = state.visible_teams().len();
            state.selected_team = state.selected_team.min(count.saturating_sub(1));
        }
        UiUpdate::TeamStats(view) => {
            if state.stats.as_ref().map(|v| &v.team_name) != Some(&view.team_name) {
                state.scroll_offset.remove(&PageId::TeamStats);
            }
            state.stats = Some(*view);
        }
        UiUpdate::PageChanged(page) => {
            state.active_page = page;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let area = frame.area();
    let layout: AppLayout = build_layout(area);

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::league_filter::render(frame, layout.filter_bar, state);
    match state.active_page {
        PageId::Fixtures => widgets::fixture_list::render(frame, layout.main_panel, state),
        PageId::Teams => widgets::team_list::render(frame, layout.main_panel, state),
        PageId::TeamStats => widgets::team_stats::render(frame, layout.main_panel, state),
    }
    render_help_bar(frame, &layout, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, area);
    }
}

/// Key hints for the active page.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.search_mode {
        return " Enter:Apply | Esc:Clear | Backspace:Delete";
    }
    match state.active_page {
        PageId::Fixtures => {
            " q:Quit | 1-3:Pages | h/l:League | [/]:Year | /:Search | d:Date range | j/k:Scroll | r:Reload"
        }
        PageId::Teams => {
            " q:Quit | 1-3:Pages | h/l:League | [/]:Year | /:Search | j/k:Select | Enter:Stats | r:Reload"
        }
        PageId::TeamStats => " q:Quit | 1-3:Pages | Esc:Back | j/k:Scroll | r:Reload",
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits or the app shuts down.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Selects over UI updates, keyboard input, and the render tick.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(update) => apply_ui_update(&mut view_state, update),
                    None => {
                        info!("UI channel closed");
                        break Ok(());
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(command) = input::handle_key(key_event, &mut view_state) {
                            let quit = command == UserCommand::Quit;
                            let _ = cmd_tx.send(command).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break Err(e.into());
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
