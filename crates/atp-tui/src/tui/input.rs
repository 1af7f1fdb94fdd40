// Keyboard input handling and command dispatch.
//
// Navigation (focus, option cursor, panel, search) mutates `ViewState`
// locally; anything that changes filter state or data becomes a
// `UserCommand` for the dashboard shell.

use atp_core::pages::{ControlAction, ControlKind, PageId};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the shell has to act, `None` when the
/// key was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // crossterm reports Release/Repeat on some platforms.
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
        handle_search_mode(key_event, view_state);
        return None;
    }

    match key_event.code {
        KeyCode::Char('1') => Some(UserCommand::SwitchPage(PageId::Ratings)),
        KeyCode::Char('2') => Some(UserCommand::SwitchPage(PageId::Individual)),
        KeyCode::Char('3') => Some(UserCommand::SwitchPage(PageId::WinLoss)),

        KeyCode::Tab => {
            cycle_panel(view_state, true);
            None
        }
        KeyCode::BackTab => {
            cycle_panel(view_state, false);
            None
        }

        KeyCode::Up | KeyCode::Char('k') => {
            move_focus(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_focus(view_state, 1);
            None
        }
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.cursor = view_state.cursor.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let last = view_state.visible_options().len().saturating_sub(1);
            view_state.cursor = (view_state.cursor + 1).min(last);
            None
        }

        KeyCode::Char(' ') | KeyCode::Enter => select_option(view_state),
        KeyCode::Backspace | KeyCode::Char('x') => {
            let id = view_state.focused_control()?.id;
            Some(UserCommand::Control {
                id,
                action: ControlAction::Clear,
            })
        }
        KeyCode::Char('+') | KeyCode::Char('=') => step(view_state, 1),
        KeyCode::Char('-') => step(view_state, -1),

        KeyCode::Char('/') => {
            view_state.search_mode = true;
            view_state.search_text.clear();
            view_state.cursor = 0;
            None
        }
        KeyCode::Esc => {
            view_state.clear_search();
            None
        }

        KeyCode::Char('r') => Some(UserCommand::Reload),

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Confirmation mode: y/q quit, n/Esc cancel, everything else is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Char('n') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn handle_search_mode(key_event: KeyEvent, view_state: &mut ViewState) {
    match key_event.code {
        KeyCode::Char(c) => {
            view_state.search_text.push(c);
            view_state.cursor = 0;
        }
        KeyCode::Backspace => {
            view_state.search_text.pop();
            view_state.cursor = 0;
        }
        // Keep the narrowed list and go back to normal keys.
        KeyCode::Enter => view_state.search_mode = false,
        KeyCode::Esc => view_state.clear_search(),
        _ => {}
    }
}

fn cycle_panel(view_state: &mut ViewState, forward: bool) {
    let count = view_state.panel_count();
    if count == 0 {
        return;
    }
    view_state.panel = if forward {
        (view_state.panel + 1) % count
    } else {
        (view_state.panel + count - 1) % count
    };
}

/// Move focus by `delta` controls. The search only applies to the control
/// it was typed for, so it is dropped.
fn move_focus(view_state: &mut ViewState, delta: isize) {
    let last = view_state.controls.len().saturating_sub(1);
    let next = view_state.focus.saturating_add_signed(delta).min(last);
    if next != view_state.focus {
        view_state.focus = next;
        view_state.clear_search();
    }
}

fn select_option(view_state: &ViewState) -> Option<UserCommand> {
    let control = view_state.focused_control()?;
    let option = view_state.visible_options().get(view_state.cursor).copied()?;
    let action = match control.kind {
        ControlKind::MultiSelect { .. } => ControlAction::Toggle(option.raw.clone()),
        ControlKind::SingleSelect => ControlAction::Choose(option.raw.clone()),
        ControlKind::Stepper { .. } => return None,
    };
    Some(UserCommand::Control {
        id: control.id,
        action,
    })
}

fn step(view_state: &ViewState, delta: i64) -> Option<UserCommand> {
    let control = view_state.focused_control()?;
    match control.kind {
        ControlKind::Stepper { .. } => Some(UserCommand::Control {
            id: control.id,
            action: ControlAction::Step(delta),
        }),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use atp_core::pages::{Control, ControlId, ControlOption, PageView, Panel};
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn options(raws: &[&str]) -> Vec<ControlOption> {
        raws.iter().map(|r| ControlOption::plain(*r)).collect()
    }

    fn surface() -> Control {
        Control {
            id: ControlId::Surface,
            title: "Surface".into(),
            kind: ControlKind::MultiSelect { policy: None },
            options: options(&["all", "clay", "grass", "hard"]),
            selected: vec!["all".into()],
            value: None,
        }
    }

    fn time() -> Control {
        Control {
            id: ControlId::Time,
            title: "Time".into(),
            kind: ControlKind::SingleSelect,
            options: options(&["career", "2019", "2020"]),
            selected: vec!["career".into()],
            value: None,
        }
    }

    fn min_wins() -> Control {
        Control {
            id: ControlId::MinWins,
            title: "Minimum Wins".into(),
            kind: ControlKind::Stepper { min: 0, max: 100 },
            options: Vec::new(),
            selected: Vec::new(),
            value: Some(10),
        }
    }

    fn state() -> ViewState {
        let panel = |title: &str| Panel::new(title, None, Vec::new());
        ViewState {
            controls: vec![surface(), time(), min_wins()],
            view: Some(PageView {
                page: PageId::Ratings,
                panels: vec![panel("Ratings Over Time"), panel("Stat Correlations")],
            }),
            ..ViewState::default()
        }
    }

    // -- Quit --

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        let mut s = state();
        s.search_mode = true;
        assert_eq!(handle_key(ctrl('c'), &mut s), Some(UserCommand::Quit));
        s.confirm_quit = true;
        assert_eq!(handle_key(ctrl('c'), &mut s), Some(UserCommand::Quit));
    }

    #[test]
    fn q_asks_for_confirmation() {
        let mut s = state();
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut s), None);
        assert!(s.confirm_quit);
        assert_eq!(handle_key(key(KeyCode::Char('1')), &mut s), None);
        assert_eq!(handle_key(key(KeyCode::Char('y')), &mut s), Some(UserCommand::Quit));
    }

    #[test]
    fn n_cancels_quit() {
        let mut s = state();
        s.confirm_quit = true;
        assert_eq!(handle_key(key(KeyCode::Char('n')), &mut s), None);
        assert!(!s.confirm_quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut s = state();
        let mut event = key(KeyCode::Char('r'));
        event.kind = KeyEventKind::Release;
        assert_eq!(handle_key(event, &mut s), None);
    }

    // -- Pages and panels --

    #[test]
    fn digits_switch_pages() {
        let mut s = state();
        assert_eq!(
            handle_key(key(KeyCode::Char('2')), &mut s),
            Some(UserCommand::SwitchPage(PageId::Individual))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('3')), &mut s),
            Some(UserCommand::SwitchPage(PageId::WinLoss))
        );
    }

    #[test]
    fn tab_cycles_panels() {
        let mut s = state();
        handle_key(key(KeyCode::Tab), &mut s);
        assert_eq!(s.panel, 1);
        handle_key(key(KeyCode::Tab), &mut s);
        assert_eq!(s.panel, 0);
        handle_key(key(KeyCode::BackTab), &mut s);
        assert_eq!(s.panel, 1);
    }

    // -- Controls --

    #[test]
    fn focus_moves_and_stops_at_edges() {
        let mut s = state();
        handle_key(key(KeyCode::Up), &mut s);
        assert_eq!(s.focus, 0);
        handle_key(key(KeyCode::Char('j')), &mut s);
        handle_key(key(KeyCode::Down), &mut s);
        handle_key(key(KeyCode::Down), &mut s);
        assert_eq!(s.focus, 2);
        handle_key(key(KeyCode::Char('k')), &mut s);
        assert_eq!(s.focus, 1);
    }

    #[test]
    fn space_toggles_multi_select_option() {
        let mut s = state();
        handle_key(key(KeyCode::Right), &mut s);
        assert_eq!(
            handle_key(key(KeyCode::Char(' ')), &mut s),
            Some(UserCommand::Control {
                id: ControlId::Surface,
                action: ControlAction::Toggle("clay".into()),
            })
        );
    }

    #[test]
    fn enter_chooses_single_select_option() {
        let mut s = state();
        s.focus = 1;
        handle_key(key(KeyCode::Char('l')), &mut s);
        handle_key(key(KeyCode::Char('l')), &mut s);
        handle_key(key(KeyCode::Char('l')), &mut s);
        assert_eq!(s.cursor, 2);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut s),
            Some(UserCommand::Control {
                id: ControlId::Time,
                action: ControlAction::Choose("2020".into()),
            })
        );
    }

    #[test]
    fn x_clears_focused_control() {
        let mut s = state();
        assert_eq!(
            handle_key(key(KeyCode::Char('x')), &mut s),
            Some(UserCommand::Control {
                id: ControlId::Surface,
                action: ControlAction::Clear,
            })
        );
    }

    #[test]
    fn plus_minus_only_step_steppers() {
        let mut s = state();
        assert_eq!(handle_key(key(KeyCode::Char('+')), &mut s), None);
        s.focus = 2;
        assert_eq!(
            handle_key(key(KeyCode::Char('+')), &mut s),
            Some(UserCommand::Control {
                id: ControlId::MinWins,
                action: ControlAction::Step(1),
            })
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('-')), &mut s),
            Some(UserCommand::Control {
                id: ControlId::MinWins,
                action: ControlAction::Step(-1),
            })
        );
        assert_eq!(handle_key(key(KeyCode::Char(' ')), &mut s), None);
    }

    #[test]
    fn r_requests_reload() {
        let mut s = state();
        assert_eq!(handle_key(key(KeyCode::Char('r')), &mut s), Some(UserCommand::Reload));
    }

    // -- Search --

    #[test]
    fn search_narrows_then_selects() {
        let mut s = state();
        handle_key(key(KeyCode::Char('/')), &mut s);
        assert!(s.search_mode);
        for c in "gra".chars() {
            assert_eq!(handle_key(key(KeyCode::Char(c)), &mut s), None);
        }
        assert_eq!(s.search_text, "gra");
        handle_key(key(KeyCode::Enter), &mut s);
        assert!(!s.search_mode);
        assert_eq!(
            handle_key(key(KeyCode::Char(' ')), &mut s),
            Some(UserCommand::Control {
                id: ControlId::Surface,
                action: ControlAction::Toggle("grass".into()),
            })
        );
    }

    #[test]
    fn search_keys_are_not_commands() {
        let mut s = state();
        handle_key(key(KeyCode::Char('/')), &mut s);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut s), None);
        assert_eq!(handle_key(key(KeyCode::Char('r')), &mut s), None);
        assert!(!s.confirm_quit);
        handle_key(key(KeyCode::Backspace), &mut s);
        assert_eq!(s.search_text, "q");
        handle_key(key(KeyCode::Esc), &mut s);
        assert!(!s.search_mode);
        assert!(s.search_text.is_empty());
    }

    #[test]
    fn moving_focus_drops_search() {
        let mut s = state();
        s.search_text = "cl".into();
        handle_key(key(KeyCode::Down), &mut s);
        assert_eq!(s.focus, 1);
        assert!(s.search_text.is_empty());
    }
}
