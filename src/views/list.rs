use crate::{
    commands::{parse_list_command, ListCommand},
    config::Config,
    db::Db,
    due::countdown,
    error::Result,
    types::{Task, TaskId},
};
use chrono::{Local, NaiveDateTime};
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, warn};
use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Borders, List, ListState, Paragraph},
    Frame,
};
use tui_textarea::{Input, Key, TextArea};

use super::AppState;

/// One visual row of the task list.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TaskRow {
    pub(crate) id: TaskId,
    pub(crate) title: String,
    pub(crate) countdown: Option<String>,
}

impl TaskRow {
    fn line(&self) -> Line<'_> {
        let mut spans = vec![
            Span::styled(format!("#{} ", self.id), Style::default().fg(Color::DarkGray)),
            Span::raw(self.title.as_str()),
        ];
        if let Some(countdown) = &self.countdown {
            spans.push(Span::styled(
                format!("  ({countdown})"),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::styled("  [del]", Style::default().fg(Color::Red)));
        Line::from(spans)
    }
}

pub(crate) fn task_rows(tasks: &[Task], now: NaiveDateTime) -> Vec<TaskRow> {
    tasks
        .iter()
        .map(|t| TaskRow {
            id: t.id,
            title: t.title.clone(),
            countdown: t.due.map(|due| countdown(due, now)),
        })
        .collect()
}

/// The task a delete action applies to: the explicit id if one was typed,
/// otherwise the highlighted row.
pub(crate) fn delete_target(
    explicit: Option<TaskId>,
    tasks: &[Task],
    selected: Option<usize>,
) -> Option<TaskId> {
    explicit.or_else(|| selected.and_then(|i| tasks.get(i)).map(|t| t.id))
}

/// Keeps the highlight on a valid row after the list changes size.
fn clamp_selection(state: &mut ListState, len: usize) {
    let selected = match (state.selected(), len) {
        (_, 0) => None,
        (None, _) => Some(0),
        (Some(i), len) => Some(i.min(len - 1)),
    };
    state.select(selected);
}

fn move_selection(state: &mut ListState, len: usize, down: bool) {
    if len == 0 {
        return;
    }
    let current = state.selected().unwrap_or(0);
    let next = if down {
        (current + 1).min(len - 1)
    } else {
        current.saturating_sub(1)
    };
    state.select(Some(next));
}

pub(crate) fn draw_tasks(
    frame: &mut Frame,
    rows: &[TaskRow],
    list_state: &mut ListState,
    command_editor: &TextArea,
    status: &str,
) {
    let chunks = Layout::default()
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .direction(Direction::Vertical)
        .split(frame.size());

    let list = List::new(rows.iter().map(TaskRow::line))
        .block(Block::default().title("tasks").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[0], list_state);
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Gray)),
        chunks[1],
    );
    frame.render_widget(command_editor.widget(), chunks[2]);
}

/// What a key press does on the list screen. Editing keys, Delete and
/// Backspace included, always go to the command line.
#[derive(Debug)]
enum ListKey {
    Exit,
    Create,
    Up,
    Down,
    DeleteSelected,
    Submit,
    Edit(Input),
}

fn route_key(input: Input) -> ListKey {
    match input {
        Input { key: Key::Esc, .. }
        | Input {
            key: Key::Char('q'),
            ctrl: true,
            ..
        } => ListKey::Exit,
        Input {
            key: Key::Char('n'),
            ctrl: true,
            ..
        } => ListKey::Create,
        Input {
            key: Key::Char('d'),
            ctrl: true,
            ..
        } => ListKey::DeleteSelected,
        Input { key: Key::Up, .. } => ListKey::Up,
        Input { key: Key::Down, .. } => ListKey::Down,
        Input {
            key: Key::Enter, ..
        } => ListKey::Submit,
        input => ListKey::Edit(input),
    }
}

fn new_command_editor<'a>() -> TextArea<'a> {
    let mut editor = TextArea::default();
    editor.set_cursor_line_style(Style::default());
    editor.set_placeholder_text("new | delete [id] | quit");
    editor.set_style(Style::default().fg(Color::White));
    editor.set_block(Block::default().title("command").borders(Borders::ALL));
    editor
}

fn delete(db: &Db, task_id: Option<TaskId>, status: &mut String) -> Result<()> {
    match task_id {
        Some(task_id) => {
            let removed = db.delete_task(task_id)?;
            *status = if removed > 0 {
                format!("Deleted #{task_id}")
            } else {
                format!("No task #{task_id}")
            };
        }
        None => *status = "Nothing selected".to_owned(),
    }
    Ok(())
}

pub(crate) fn render_tasks<B>(term: &mut Terminal<B>, db: &Db, config: &Config) -> Result<AppState>
where
    B: Backend,
{
    let mut tasks = db.fetch_all_tasks()?;
    debug!("Loaded {} tasks", tasks.len());
    let mut list_state = ListState::default();
    let mut command_editor = new_command_editor();
    let mut status = String::from("Ctrl+N new task, Ctrl+D delete selected, Esc quit");
    loop {
        clamp_selection(&mut list_state, tasks.len());
        let rows = task_rows(&tasks, Local::now().naive_local());
        term.draw(|frame| draw_tasks(frame, &rows, &mut list_state, &command_editor, &status))?;

        // Redraw on every tick so the countdowns keep moving.
        if !event::poll(config.tick_rate)? {
            continue;
        }
        let event = event::read()?;
        if let Event::Key(key) = &event {
            if key.kind != KeyEventKind::Press {
                continue;
            }
        }
        match route_key(event.into()) {
            ListKey::Exit => return Ok(AppState::Exit),
            ListKey::Create => return Ok(AppState::Create),
            ListKey::Up => move_selection(&mut list_state, tasks.len(), false),
            ListKey::Down => move_selection(&mut list_state, tasks.len(), true),
            ListKey::DeleteSelected => {
                let target = delete_target(None, &tasks, list_state.selected());
                delete(db, target, &mut status)?;
                tasks = db.fetch_all_tasks()?;
            }
            ListKey::Submit => {
                let line = command_editor.lines().join(" ");
                match parse_list_command(&line) {
                    Ok(ListCommand::New) => return Ok(AppState::Create),
                    Ok(ListCommand::Quit) => return Ok(AppState::Exit),
                    Ok(ListCommand::Delete(task_id)) => {
                        let target = delete_target(task_id, &tasks, list_state.selected());
                        delete(db, target, &mut status)?;
                        tasks = db.fetch_all_tasks()?;
                    }
                    Err(e) => {
                        warn!("Rejected command {line:?}: {e}");
                        status = e.to_string();
                    }
                }
                command_editor = new_command_editor();
            }
            ListKey::Edit(input) => {
                command_editor.input(input);
            }
        }
    }
}
