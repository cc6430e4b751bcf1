use crate::{
    commands::{parse_create_command, CreateCommand},
    config::Config,
    db::Db,
    due::DueOffset,
    error::{Error, Result},
    types::{TaskDraft, TaskId},
};
use chrono::{Local, NaiveDateTime};
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info, warn};
use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::{Input, Key, TextArea};

use super::AppState;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Created(TaskId),
    /// The draft had an empty title or body. Nothing was stored.
    Rejected,
    /// The picked offset lands outside the calendar. Nothing was stored.
    InvalidDue(String),
}

/// Applies a due picker command to `offset`. Commands that do not touch the
/// picker leave it unchanged.
pub(crate) fn apply_command(mut offset: DueOffset, command: &CreateCommand) -> Result<DueOffset> {
    match command {
        CreateCommand::Add(unit, amount) => offset.add(*unit, *amount)?,
        CreateCommand::Clear => offset.clear(),
        CreateCommand::Save | CreateCommand::Back => {}
    }
    Ok(offset)
}

/// Stores `draft` due at `offset` from `now`. The returned offset is reset
/// after a successful insert and handed back untouched otherwise.
pub(crate) fn submit(
    db: &Db,
    draft: &TaskDraft,
    offset: DueOffset,
    now: NaiveDateTime,
) -> Result<(Outcome, DueOffset)> {
    let Some(task) = draft.validate() else {
        debug!("Ignoring draft with an empty title or body");
        return Ok((Outcome::Rejected, offset));
    };
    let due = match offset.to_absolute(now) {
        Ok(due) => due,
        Err(Error::Time(msg)) => {
            warn!("Not saving draft: {msg}");
            return Ok((Outcome::InvalidDue(msg), offset));
        }
        Err(e) => return Err(e),
    };
    let task_id = db.insert_task(&task.title, &task.body, due)?;
    info!("Created task {task_id} due {due:?}");
    Ok((Outcome::Created(task_id), DueOffset::default()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Title,
    Body,
    Command,
}

impl Focus {
    fn next(self) -> Focus {
        match self {
            Focus::Title => Focus::Body,
            Focus::Body => Focus::Command,
            Focus::Command => Focus::Title,
        }
    }
}

struct CreateForm<'a> {
    title: TextArea<'a>,
    body: TextArea<'a>,
    command: TextArea<'a>,
    focus: Focus,
}

impl<'a> CreateForm<'a> {
    fn new() -> Self {
        let mut form = CreateForm {
            title: editor("title", "What needs doing?"),
            body: editor("body", "Details..."),
            command: editor("command", "+N d|h|m | clear | save | back"),
            focus: Focus::Title,
        };
        form.restyle();
        form
    }

    fn draft(&self) -> TaskDraft {
        TaskDraft::new(self.title.lines().join(" "), self.body.lines().join("\n"))
    }

    fn focused(&mut self) -> &mut TextArea<'a> {
        match self.focus {
            Focus::Title => &mut self.title,
            Focus::Body => &mut self.body,
            Focus::Command => &mut self.command,
        }
    }

    fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
        self.restyle();
    }

    /// Only the focused editor shows a cursor.
    fn restyle(&mut self) {
        let focus = self.focus;
        for (area, this) in [
            (&mut self.title, Focus::Title),
            (&mut self.body, Focus::Body),
            (&mut self.command, Focus::Command),
        ] {
            let cursor = if this == focus {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            area.set_cursor_style(cursor);
        }
    }

    fn clear_command(&mut self) {
        self.command = editor("command", "+N d|h|m | clear | save | back");
        self.restyle();
    }
}

fn editor<'a>(title: &'static str, placeholder: &'static str) -> TextArea<'a> {
    let mut editor = TextArea::default();
    editor.set_cursor_line_style(Style::default());
    editor.set_placeholder_text(placeholder);
    editor.set_style(Style::default().fg(Color::White));
    editor.set_block(Block::default().title(title).borders(Borders::ALL));
    editor
}

fn draw_form(frame: &mut Frame, form: &CreateForm, offset: &DueOffset, status: &str) {
    let chunks = Layout::default()
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .direction(Direction::Vertical)
        .split(frame.size());

    frame.render_widget(form.title.widget(), chunks[0]);
    frame.render_widget(form.body.widget(), chunks[1]);
    frame.render_widget(
        Paragraph::new(offset.to_string()).style(Style::default().fg(Color::Yellow)),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Gray)),
        chunks[3],
    );
    frame.render_widget(form.command.widget(), chunks[4]);
}

pub(crate) fn render_create<B>(term: &mut Terminal<B>, db: &Db, config: &Config) -> Result<AppState>
where
    B: Backend,
{
    let mut form = CreateForm::new();
    let mut offset = DueOffset::default();
    let mut status = String::from("Tab switch field, Ctrl+S save, Esc back");
    loop {
        term.draw(|frame| draw_form(frame, &form, &offset, &status))?;

        if !event::poll(config.tick_rate)? {
            continue;
        }
        let event = event::read()?;
        if let Event::Key(key) = &event {
            if key.kind != KeyEventKind::Press {
                continue;
            }
        }
        let command = match event.into() {
            Input { key: Key::Esc, .. } => CreateCommand::Back,
            Input {
                key: Key::Char('s'),
                ctrl: true,
                ..
            } => CreateCommand::Save,
            Input { key: Key::Tab, .. } => {
                form.cycle_focus();
                continue;
            }
            Input {
                key: Key::Enter, ..
            } if form.focus == Focus::Title => {
                form.cycle_focus();
                continue;
            }
            Input {
                key: Key::Enter, ..
            } if form.focus == Focus::Command => {
                let line = form.command.lines().join(" ");
                form.clear_command();
                match parse_create_command(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        warn!("Rejected command {line:?}: {e}");
                        status = e.to_string();
                        continue;
                    }
                }
            }
            input => {
                form.focused().input(input);
                continue;
            }
        };

        match command {
            CreateCommand::Back => return Ok(AppState::Tasks),
            CreateCommand::Save => {
                let now = Local::now().naive_local();
                let (outcome, next) = submit(db, &form.draft(), offset, now)?;
                offset = next;
                match outcome {
                    Outcome::Created(_) => return Ok(AppState::Tasks),
                    Outcome::InvalidDue(msg) => status = Error::Time(msg).to_string(),
                    Outcome::Rejected => {}
                }
            }
            command => match apply_command(offset, &command) {
                Ok(next) => {
                    offset = next;
                    status = offset.to_string();
                }
                Err(e) => {
                    warn!("Rejected picker command {command:?}: {e}");
                    status = e.to_string();
                }
            },
        }
    }
}
