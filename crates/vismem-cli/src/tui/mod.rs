pub mod app;
pub mod event;
mod views;
mod widgets;

use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self as ct_event, Event};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use vismem_core::auth::provider_from_config;
use vismem_core::backend::{create_backend, HttpBackend};
use vismem_core::config::VismemConfig;
use vismem_core::controller::GalleryController;
use vismem_core::model::{Notice, Severity};

use self::app::{App, InputMode};
use self::event::{AsyncAction, AsyncResult};

/// Entry point for the interactive TUI mode.
pub async fn run_tui(config: &VismemConfig) -> Result<()> {
    let backend = create_backend(config).context("failed to create backend client")?;
    let gallery = GalleryController::new(backend, provider_from_config(&config.auth));

    // Channels for async communication
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AsyncAction>();
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<AsyncResult>();

    // Spawn the worker that owns the gallery state
    tokio::spawn(async move {
        worker_loop(gallery, &mut action_rx, &result_tx).await;
    });

    // Fire initial gallery load
    action_tx.send(AsyncAction::Refresh)?;

    let mut terminal = ratatui::init();
    let mut app = App::new();

    let result = run_loop(&mut terminal, &mut app, &action_tx, &mut result_rx);

    ratatui::restore();

    result
}

fn run_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    action_tx: &mpsc::UnboundedSender<AsyncAction>,
    result_rx: &mut mpsc::UnboundedReceiver<AsyncResult>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        // Poll for async results (non-blocking)
        while let Ok(result) = result_rx.try_recv() {
            app.handle_result(result);
        }

        // Poll for keyboard events (50ms timeout for responsive UI)
        if ct_event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = ct_event::read()? {
                if let Some(action) = app.handle_key(key) {
                    let _ = action_tx.send(action);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.viewing_results() {
        views::results::render(frame, app, area);
    } else {
        views::gallery::render(frame, app, area);
    }

    if let Some(ref notice) = app.snapshot.notice {
        render_notice_toast(frame, notice);
    }

    if app.input_mode == InputMode::ConfirmDelete {
        render_confirm_modal(frame, app);
    }
}

fn render_notice_toast(frame: &mut Frame, notice: &Notice) {
    use ratatui::{
        layout::{Constraint, Flex, Layout},
        style::{Color, Style},
        widgets::{Block, Borders, Clear, Paragraph},
    };

    let (prefix, color, title) = match notice.severity {
        Severity::Info => ("✓", Color::Green, " Info "),
        Severity::Error => ("✗", Color::Red, " Error "),
    };

    let area = frame.area();
    let [toast_area] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(area);
    let [toast_area] = Layout::vertical([Constraint::Length(3)])
        .flex(Flex::End)
        .areas(toast_area);

    frame.render_widget(Clear, toast_area);
    let toast = Paragraph::new(format!(" {prefix} {}", notice.text))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        );
    frame.render_widget(toast, toast_area);
}

fn render_confirm_modal(frame: &mut Frame, app: &App) {
    use ratatui::{
        layout::{Constraint, Flex, Layout},
        style::{Color, Style},
        widgets::{Block, Borders, Clear, Paragraph},
    };

    let Some(ref filename) = app.pending_delete else {
        return;
    };

    let area = frame.area();
    let [modal_area] = Layout::horizontal([Constraint::Percentage(50)])
        .flex(Flex::Center)
        .areas(area);
    let [modal_area] = Layout::vertical([Constraint::Length(3)])
        .flex(Flex::Center)
        .areas(modal_area);

    frame.render_widget(Clear, modal_area);
    let modal = Paragraph::new(format!(" Delete \"{filename}\"? (y/n)"))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Confirm delete "),
        );
    frame.render_widget(modal, modal_area);
}

/// Async worker loop: owns the gallery controller and applies actions
/// to it. Failures land in the snapshot's notice, so every action is
/// answered with a state snapshot and nothing else.
async fn worker_loop(
    mut gallery: GalleryController<HttpBackend>,
    action_rx: &mut mpsc::UnboundedReceiver<AsyncAction>,
    result_tx: &mpsc::UnboundedSender<AsyncResult>,
) {
    while let Some(action) = action_rx.recv().await {
        match action {
            AsyncAction::Refresh => {
                let _ = gallery.load_screenshots().await;
            }
            AsyncAction::Search { query } => {
                gallery.query_changed(&query);
                let _ = gallery.search().await;
            }
            AsyncAction::Delete { filename } => {
                let _ = gallery.delete(&filename).await;
            }
            AsyncAction::Migrate => {
                let _ = gallery.migrate().await;
            }
            AsyncAction::SetFilters {
                min_confidence,
                sort_by,
            } => {
                gallery.set_min_confidence(min_confidence);
                gallery.set_sort_key(sort_by);
            }
            AsyncAction::ClearSearch => gallery.clear_search(),
        }
        let snapshot = Box::new(gallery.snapshot());
        if result_tx.send(AsyncResult::State(snapshot)).is_err() {
            break; // UI closed
        }
    }
}
