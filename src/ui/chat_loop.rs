//! Interactive session: terminal setup, the event loop, and the glue that
//! turns key presses into controller intents.
//!
//! Remote calls run on spawned tasks; their results come back over an
//! unbounded channel as [`ControllerAction`]s and are applied on the loop,
//! so the controller only ever sees one event at a time.

use std::{error::Error, io, sync::Arc, time::Duration};

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    style::{Color, Style},
    widgets::{Block, Borders},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tui_textarea::TextArea;

use crate::api::{ApiClient, ChatApi};
use crate::core::config::ResolvedSettings;
use crate::core::controller::{
    execute_command, Controller, ControllerAction, Session, SessionSnapshot, ValidationError,
};
use crate::ui::renderer::ui;

type ChatTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// What a key press asks the loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyIntent {
    Quit,
    Submit,
    SelectModel(String),
    ReloadModels,
    Edit,
    Nothing,
}

pub async fn run_chat(settings: ResolvedSettings) -> Result<(), Box<dyn Error>> {
    let api: Arc<dyn ChatApi> = Arc::new(ApiClient::new(settings.client.clone())?);
    let session = Session::new(settings.system_prompt.clone(), settings.options);
    let mut controller = Controller::new(api, session);
    info!(base_url = %settings.client.base_url, "starting chat session");

    let mut terminal = setup_terminal()?;
    let result = event_loop(
        &mut terminal,
        &mut controller,
        settings.preferred_model.as_deref(),
    );
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<ChatTerminal, Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout)).inspect_err(|_| {
        let _ = disable_raw_mode();
    })?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut ChatTerminal) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn event_loop(
    terminal: &mut ChatTerminal,
    controller: &mut Controller<dyn ChatApi>,
    preferred_model: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ControllerAction>();
    let mut preferred_model = preferred_model;
    let mut textarea = new_input();

    let _ = dispatch(controller, ControllerAction::Initialize, &tx);

    loop {
        // Apply results from finished background calls.
        while let Ok(action) = rx.try_recv() {
            let models_loaded = matches!(action, ControllerAction::ModelsLoaded(_));
            let _ = dispatch(controller, action, &tx);
            if models_loaded {
                apply_preferred_model(controller, &mut preferred_model);
            }
        }

        let snapshot = controller.snapshot();
        style_input(&mut textarea, &snapshot);
        terminal.draw(|f| ui(f, &snapshot, &textarea))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key_intent(&key, &snapshot) {
            KeyIntent::Quit => break,
            KeyIntent::Submit => {
                let text = textarea.lines().join("\n");
                match dispatch(controller, ControllerAction::SendMessage { text }, &tx) {
                    Ok(()) => textarea = new_input(),
                    // Empty input is silently ignored; a missing model shows
                    // up in the error banner. Either way the draft stays.
                    Err(ValidationError::EmptyMessage | ValidationError::NoModelSelected) => {}
                }
            }
            KeyIntent::SelectModel(id) => {
                let _ = dispatch(controller, ControllerAction::SelectModel { id }, &tx);
            }
            KeyIntent::ReloadModels => {
                let _ = dispatch(controller, ControllerAction::Initialize, &tx);
            }
            KeyIntent::Edit => {
                textarea.input(key);
            }
            KeyIntent::Nothing => {}
        }
    }

    Ok(())
}

/// Select the configured model after the first listing that has models in
/// it. A failed or empty listing leaves the preference for the next reload.
fn apply_preferred_model<A>(controller: &mut Controller<A>, preferred_model: &mut Option<&str>)
where
    A: ChatApi + ?Sized,
{
    if controller.session().models().is_empty() {
        return;
    }
    if let Some(model) = preferred_model.take() {
        if !controller.prefer_model(model) {
            debug!(model, "preferred model not offered by server");
        }
    }
}

/// Apply an action and run whatever remote call it asks for in the background.
fn dispatch(
    controller: &mut Controller<dyn ChatApi>,
    action: ControllerAction,
    tx: &mpsc::UnboundedSender<ControllerAction>,
) -> Result<(), ValidationError> {
    if let Some(command) = controller.dispatch(action)? {
        let api = controller.api();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = execute_command(&*api, command).await;
            let _ = tx.send(result);
        });
    }
    Ok(())
}

/// Map a key press to an intent given what the view currently allows.
///
/// Typing, submitting and model switching are disabled while a completion
/// is in flight.
pub fn key_intent(key: &KeyEvent, snapshot: &SessionSnapshot) -> KeyIntent {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => KeyIntent::Quit,
        KeyCode::Esc => KeyIntent::Quit,
        KeyCode::Char('r') if ctrl => KeyIntent::ReloadModels,
        _ if snapshot.is_pending() => KeyIntent::Nothing,
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => KeyIntent::Edit,
        KeyCode::Enter => KeyIntent::Submit,
        KeyCode::Tab => next_model(snapshot, true)
            .map(KeyIntent::SelectModel)
            .unwrap_or(KeyIntent::Nothing),
        KeyCode::BackTab => next_model(snapshot, false)
            .map(KeyIntent::SelectModel)
            .unwrap_or(KeyIntent::Nothing),
        _ => KeyIntent::Edit,
    }
}

/// Id of the model after (or before) the selected one, wrapping around.
/// With no current selection the first model is chosen.
pub fn next_model(snapshot: &SessionSnapshot, forward: bool) -> Option<String> {
    let count = snapshot.models.len();
    if count == 0 {
        return None;
    }
    let index = match snapshot.selected_index() {
        Some(current) if forward => (current + 1) % count,
        Some(current) => (current + count - 1) % count,
        None => 0,
    };
    Some(snapshot.models[index].id.clone())
}

fn new_input() -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text("Type your message...");
    textarea
}

fn style_input(textarea: &mut TextArea<'_>, snapshot: &SessionSnapshot) {
    let (title, color) = if snapshot.is_pending() {
        ("Waiting for response", Color::DarkGray)
    } else if snapshot.can_send() {
        ("Message (Enter to send, Alt+Enter for newline)", Color::Yellow)
    } else {
        ("Message (no model selected)", Color::DarkGray)
    };
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title),
    );
}
