// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState mutations (selection, scrolling,
// search editing).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use rugbywiki_app::protocol::{PageId, UserCommand};

use super::ViewState;

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both press and release; only act on press.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.search_mode {
        return handle_search_mode(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('1') => switch_page(view_state, PageId::Fixtures),
        KeyCode::Char('2') => switch_page(view_state, PageId::Teams),
        KeyCode::Char('3') => switch_page(view_state, PageId::TeamStats),

        KeyCode::Left | KeyCode::Char('h') => cycle_league(view_state, false),
        KeyCode::Right | KeyCode::Char('l') => cycle_league(view_state, true),
        KeyCode::Char('[') => cycle_year(view_state, false),
        KeyCode::Char(']') => cycle_year(view_state, true),

        KeyCode::Up | KeyCode::Char('k') => {
            move_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            move_down(view_state, PAGE_SIZE);
            None
        }

        KeyCode::Char('/') => {
            if let Some(criteria) = view_state.active_criteria() {
                view_state.search_text = criteria.search.clone();
                view_state.search_mode = true;
            }
            None
        }

        KeyCode::Char('d') if view_state.active_page == PageId::Fixtures => {
            toggle_date_range(view_state)
        }

        KeyCode::Enter if view_state.active_page == PageId::Teams => view_state
            .visible_teams()
            .get(view_state.selected_team)
            .map(|team| UserCommand::OpenTeamStats(team.name.clone())),

        KeyCode::Esc | KeyCode::Backspace if view_state.active_page == PageId::TeamStats => {
            switch_page(view_state, PageId::Teams)
        }

        KeyCode::Char('r') => Some(UserCommand::Reload),

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Enter applies the edited term, Esc clears it.
fn handle_search_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.search_mode = false;
            view_state.search_text.clear();
            Some(UserCommand::SetSearch(String::new()))
        }
        KeyCode::Enter => {
            view_state.search_mode = false;
            Some(UserCommand::SetSearch(view_state.search_text.clone()))
        }
        KeyCode::Backspace => {
            view_state.search_text.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.search_text.push(c);
            None
        }
        _ => None,
    }
}

fn switch_page(view_state: &mut ViewState, page: PageId) -> Option<UserCommand> {
    view_state.active_page = page;
    Some(UserCommand::SwitchPage(page))
}

/// Step through `options` from `current`, wrapping at both ends. An unknown
/// `current` starts from the first option.
fn step<T: PartialEq + Copy>(options: &[T], current: T, forward: bool) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|o| *o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    Some(options[next])
}

fn cycle_league(view_state: &mut ViewState, forward: bool) -> Option<UserCommand> {
    let current = view_state.active_criteria()?.league_id;
    let next = step(&view_state.league_options(), current, forward)?;
    (next != current).then_some(UserCommand::SelectLeague(next))
}

/// Years cycle through "all years" followed by the configured window.
fn cycle_year(view_state: &mut ViewState, forward: bool) -> Option<UserCommand> {
    let current = view_state.active_criteria()?.year;
    let options: Vec<Option<i32>> = std::iter::once(None)
        .chain(view_state.active_years().iter().copied().map(Some))
        .collect();
    let next = step(&options, current, forward)?;
    (next != current).then_some(UserCommand::SelectYear(next))
}

/// Switch between the default schedule window and the year view.
fn toggle_date_range(view_state: &ViewState) -> Option<UserCommand> {
    let view = view_state.fixtures.as_ref()?;
    Some(match view.date_range {
        Some(_) => UserCommand::ClearDateRange,
        None => UserCommand::SetDateRange {
            start: view.default_window.0,
            end: view.default_window.1,
        },
    })
}

fn move_up(view_state: &mut ViewState, lines: usize) {
    if view_state.active_page == PageId::Teams {
        view_state.selected_team = view_state.selected_team.saturating_sub(lines);
        return;
    }
    let offset = view_state.scroll_offset.entry(view_state.active_page).or_insert(0);
    *offset = offset.saturating_sub(lines);
}

fn move_down(view_state: &mut ViewState, lines: usize) {
    if view_state.active_page == PageId::Teams {
        let last = view_state.visible_teams().len().saturating_sub(1);
        view_state.selected_team = view_state.selected_team.saturating_add(lines).min(last);
        return;
    }
    let offset = view_state.scroll_offset.entry(view_state.active_page).or_insert(0);
    *offset = offset.saturating_add(lines);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
