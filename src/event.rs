use crossterm::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

use crate::app::{App, Tab};
use crate::error::Result;
use crate::fetch::Task;
use crate::hit;

/// Translate one terminal event into application mutations. Returns false
/// when the application should exit.
pub fn handle_event(event: Event, app: &mut App, task_sender: &mpsc::Sender<Task>) -> Result<bool> {
    match event {
        Event::Key(key) => Ok(handle_key_event(key, app, task_sender)),
        Event::Mouse(mouse) => {
            handle_mouse_event(mouse, app, task_sender);
            Ok(true)
        }
        // The next draw pass re-measures everything
        Event::Resize(_, _) => Ok(true),
        _ => Ok(true),
    }
}

fn handle_key_event(key: KeyEvent, app: &mut App, task_sender: &mpsc::Sender<Task>) -> bool {
    // Global keybindings
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            return false;
        }
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.previous_tab(),
        KeyCode::Char('1') => app.active_tab = Tab::Explorer,
        KeyCode::Char('2') => app.active_tab = Tab::Layers,
        KeyCode::Char('3') => app.active_tab = Tab::Efficiency,
        // Tab-specific keybindings
        _ => match app.active_tab {
            Tab::Explorer => handle_explorer_key(key, app, task_sender),
            Tab::Layers => handle_layers_key(key, app, task_sender),
            Tab::Efficiency => {}
        },
    }
    true
}

fn handle_explorer_key(key: KeyEvent, app: &mut App, task_sender: &mpsc::Sender<Task>) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_listing_up();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_listing_down();
        }
        KeyCode::Enter => app.select_under_cursor(task_sender),
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('u') => {
            app.navigate_up();
        }
        KeyCode::Char('i') => {
            app.open_image_filesystem(task_sender);
        }
        _ => {}
    }
}

fn handle_layers_key(key: KeyEvent, app: &mut App, task_sender: &mpsc::Sender<Task>) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_layer_up();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_layer_down();
        }
        KeyCode::Enter => {
            app.open_selected_layer(task_sender);
        }
        _ => {}
    }
}

fn handle_mouse_event(mouse: MouseEvent, app: &mut App, task_sender: &mpsc::Sender<Task>) {
    // Hit zones only exist while the explorer is on screen
    if app.active_tab != Tab::Explorer {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if let Some(region_hit) = hit::zone_at(&app.hit_zones, mouse.column, mouse.row) {
            app.select_region(region_hit, task_sender);
        }
    }
}
