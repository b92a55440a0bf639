//! Main application state and command coordination

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::core::config::AppConfig;
use crate::core::document::DocumentId;
use crate::core::error::SessionError;
use crate::core::indent::{IndentEngine, Key};
use crate::core::session::EditSession;
use crate::store::RemoteStore;
use crate::ui::{preview::PreviewPanel, sidebar::Sidebar};

const HELP: &str = "\
commands:
  list               show the articles
  open <n|name>      open by position or file name
  new <title>        create an article
  delete             delete the open article
  save               save the open article
  type <text>        type text at the caret
  enter              press Enter
  caret <offset>     move the caret (byte offset)
  date               insert the current date
  show               print the buffer
  preview            print the rendered preview
  regenerate         run the regeneration command
  refresh            re-read the article list
  quit
";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Open(String),
    New(String),
    Delete,
    Save,
    Type(String),
    Enter,
    Caret(usize),
    Date,
    Show,
    Preview,
    Regenerate,
    Refresh,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (word, rest) = line.trim_start().split_once(' ').unwrap_or((line.trim(), ""));

        let command = match word {
            "list" | "ls" => Self::List,
            "open" if !rest.trim().is_empty() => Self::Open(rest.trim().to_string()),
            "new" => Self::New(rest.to_string()),
            "delete" => Self::Delete,
            "save" => Self::Save,
            "type" => Self::Type(rest.to_string()),
            "enter" => Self::Enter,
            "caret" => Self::Caret(
                rest.trim()
                    .parse()
                    .map_err(|_| format!("not an offset: {}", rest.trim()))?,
            ),
            "date" => Self::Date,
            "show" => Self::Show,
            "preview" => Self::Preview,
            "regenerate" => Self::Regenerate,
            "refresh" => Self::Refresh,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(format!("unknown command: {line}")),
        };
        Ok(command)
    }
}

/// Main application state
pub struct BlogEditApp<S> {
    /// Catalog, store and buffer
    session: EditSession<S>,
    /// Line-break indenter
    indent: IndentEngine,
    /// Rendered view of the buffer
    preview: PreviewPanel,
    /// Application configuration
    config: AppConfig,
}

impl<S: RemoteStore> BlogEditApp<S> {
    /// Create a new application instance
    pub fn new(session: EditSession<S>, config: AppConfig) -> Self {
        let session = session.with_default_category(config.editor.default_category.clone());
        Self {
            session,
            indent: IndentEngine::new(config.editor.indent_width),
            preview: PreviewPanel::new(config.preview.output.clone()),
            config,
        }
    }

    pub fn session(&self) -> &EditSession<S> {
        &self.session
    }

    /// Open a document by file name
    pub fn open_by_id(&mut self, name: &str) -> Result<(), SessionError> {
        let id = DocumentId::new(name)
            .filter(|id| self.session.catalog().contains(id))
            .ok_or_else(|| SessionError::UnknownName(name.to_string()))?;
        self.session.open(&id)?;
        self.request_preview();
        Ok(())
    }

    /// Open a document by catalog position
    pub fn open_index(&mut self, index: usize) -> Result<(), SessionError> {
        self.session.open_index(index)?;
        self.request_preview();
        Ok(())
    }

    pub fn save_active(&mut self) -> Result<(), SessionError> {
        self.session.save()
    }

    pub fn create_with_title(&mut self, title: &str) -> Result<DocumentId, SessionError> {
        let created = self.session.create(title);
        self.request_preview();
        created
    }

    /// Delete the open document and fall back to the first remaining one
    pub fn delete_active(&mut self) -> Result<(), SessionError> {
        let id = self
            .session
            .active_id()
            .cloned()
            .ok_or(SessionError::NoActiveDocument)?;
        self.session.delete(&id)?;

        let reopened = self.session.reopen_first().map(|_| ());
        self.request_preview();
        reopened
    }

    /// Apply a key to the buffer, then indent, autosave and re-render
    pub fn key_event(&mut self, key: Key) -> Result<(), SessionError> {
        let buffer = self.session.buffer_mut()?;
        let prior = buffer.caret().checked_sub(1);
        match key {
            Key::Enter | Key::Return => buffer.insert("\n"),
            Key::Char(c) => buffer.insert(c.encode_utf8(&mut [0; 4])),
        }

        if let Some(mutation) = self.indent.on_key(buffer.text(), prior, buffer.caret(), &key) {
            buffer.set_caret(mutation.offset);
            buffer.insert(&mutation.insert);
        }

        let saved = if key.is_line_break() && self.config.editor.autosave_on_newline {
            self.session.autosave_on_newline()
        } else {
            Ok(())
        };
        self.request_preview();
        saved
    }

    /// Type text one key at a time
    pub fn type_text(&mut self, text: &str) -> Result<(), SessionError> {
        for c in text.chars() {
            let key = if c == '\n' { Key::Enter } else { Key::Char(c) };
            self.key_event(key)?;
        }
        Ok(())
    }

    pub fn set_caret(&mut self, offset: usize) -> Result<(), SessionError> {
        self.session.buffer_mut()?.set_caret(offset);
        Ok(())
    }

    pub fn insert_date(&mut self) -> Result<(), SessionError> {
        self.session.insert_date()?;
        self.request_preview();
        Ok(())
    }

    pub fn regenerate(&mut self) -> Result<(), SessionError> {
        let cmd = self.config.store.regenerate_command.clone();
        self.session.regenerate(&cmd)
    }

    pub fn refresh(&mut self) -> Result<(), SessionError> {
        self.session.refresh()
    }

    /// Re-render the preview from the current buffer
    pub fn request_preview(&mut self) -> &str {
        match self.session.buffer() {
            Some(buffer) => self.preview.refresh(buffer.text()),
            None => {
                self.preview.clear();
                self.preview.html()
            }
        }
    }

    /// Execute one command, writing any output. Returns `false` on quit.
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<bool> {
        let outcome = match command {
            Command::List => {
                let listing = Sidebar::render(self.session.catalog(), self.session.active_id());
                out.write_all(listing.as_bytes())?;
                Ok(())
            }
            Command::Open(target) => match target.parse::<usize>() {
                Ok(index) => self.open_index(index),
                Err(_) => self.open_by_id(&target),
            },
            Command::New(title) => match self.create_with_title(&title) {
                Ok(id) => {
                    writeln!(out, "created {id}")?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Command::Delete => self.delete_active(),
            Command::Save => self.save_active(),
            Command::Type(text) => self.type_text(&text),
            Command::Enter => self.key_event(Key::Enter),
            Command::Caret(offset) => self.set_caret(offset),
            Command::Date => self.insert_date(),
            Command::Show => {
                match self.session.active() {
                    Some(doc) => {
                        writeln!(out, "-- {} (caret {})", doc.id, doc.buffer.caret())?;
                        out.write_all(doc.buffer.text().as_bytes())?;
                        writeln!(out)?;
                    }
                    None => writeln!(out, "no document is open")?,
                }
                Ok(())
            }
            Command::Preview => {
                let html = self.request_preview().to_string();
                writeln!(out, "{html}")?;
                Ok(())
            }
            Command::Regenerate => self.regenerate(),
            Command::Refresh => self.refresh(),
            Command::Help => {
                out.write_all(HELP.as_bytes())?;
                Ok(())
            }
            Command::Quit => return Ok(false),
        };

        if let Err(e) = outcome {
            tracing::error!("Command failed: {}", e);
            writeln!(out, "error: {e}")?;
        }
        Ok(true)
    }

    /// Read commands line by line until `quit` or end of input
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Ok(command) => {
                    if !self.execute(command, &mut out)? {
                        break;
                    }
                }
                Err(message) => writeln!(out, "{message}")?,
            }
            out.flush()?;
        }
        Ok(())
    }
}
