//! Interactive terminal session
//!
//! Line-oriented front end over the form, the controller and the
//! preferences store. Each input line is one command; the reply is written
//! back before the next line is read.

use crate::api_client::PredictionApi;
use crate::controller::{SubmissionController, SubmitOutcome};
use crate::form::{InputForm, InputMode};
use crate::render::{render_form, render_prediction, render_state};
use repp_common::labels::{ui_text, UiText};
use repp_common::{AttributeField, Preferences};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const HELP: &str = "\
Commands:
  set <KEY> <VALUE>   set an attribute (e.g. set TotalArea 54.5)
  unset <KEY>         clear an attribute
  link <URL>          set the listing URL
  mode manual|link    choose the input used by submit
  submit              request a prediction
  show                print the form and the last result
  fields              list attribute keys
  lang                toggle ru/en
  theme               toggle light/dark
  help                this text
  quit                leave";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(AttributeField, String),
    Unset(AttributeField),
    Link(String),
    Mode(InputMode),
    Submit,
    Show,
    Fields,
    ToggleLocale,
    ToggleTheme,
    Help,
    Quit,
}

impl Command {
    /// Parse one line; `Ok(None)` for blank lines
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "set" => {
                let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Command::Set(parse_field(key)?, value.trim().to_string())
            }
            "unset" => Command::Unset(parse_field(rest)?),
            "link" => Command::Link(rest.to_string()),
            "mode" => match rest.to_ascii_lowercase().as_str() {
                "manual" => Command::Mode(InputMode::Manual),
                "link" => Command::Mode(InputMode::Link),
                other => return Err(format!("Unknown mode '{}' (manual|link)", other)),
            },
            "submit" => Command::Submit,
            "show" => Command::Show,
            "fields" => Command::Fields,
            "lang" => Command::ToggleLocale,
            "theme" => Command::ToggleTheme,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command '{}' (try help)", other)),
        };
        Ok(Some(command))
    }
}

fn parse_field(key: &str) -> Result<AttributeField, String> {
    key.parse::<AttributeField>().map_err(|e| e.to_string())
}

/// Reply to one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quit: false,
        }
    }
}

/// State of one interactive session
pub struct Session<A> {
    api: A,
    form: InputForm,
    controller: SubmissionController,
    prefs: Preferences,
    /// Set by the controller's success hook; consumed after each submit
    result_ready: Arc<AtomicBool>,
}

impl<A: PredictionApi> Session<A> {
    pub fn new(api: A, prefs: Preferences) -> Self {
        let result_ready = Arc::new(AtomicBool::new(false));
        let mut controller = SubmissionController::new();
        let flag = Arc::clone(&result_ready);
        controller.on_success(move |_| flag.store(true, Ordering::SeqCst));

        Self {
            api,
            form: InputForm::new(),
            controller,
            prefs,
            result_ready,
        }
    }

    pub fn form(&self) -> &InputForm {
        &self.form
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Execute one command
    pub async fn execute(&mut self, command: Command) -> Reply {
        debug!(?command, "Session command");
        match command {
            Command::Set(field, value) => {
                self.form.set_attribute(field, value);
                Reply::text(format!("{} = {:?}", field, self.form.record().get(field)))
            }
            Command::Unset(field) => {
                self.form.set_attribute(field, "");
                Reply::text(format!("{} cleared", field))
            }
            Command::Link(url) => {
                self.form.set_link(url);
                Reply::text(format!("link = {:?}", self.form.link()))
            }
            Command::Mode(mode) => {
                self.form.set_mode(mode);
                Reply::text(format!("mode = {}", mode))
            }
            Command::Submit => self.submit().await,
            Command::Show => Reply::text(format!(
                "{}\n{}",
                render_form(&self.form, &self.prefs),
                render_state(self.controller.state(), &self.prefs)
            )),
            Command::Fields => Reply::text(
                AttributeField::ALL
                    .iter()
                    .map(|f| f.key())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Command::ToggleLocale => {
                let locale = self.prefs.toggle_locale();
                Reply::text(format!("locale = {locale}"))
            }
            Command::ToggleTheme => {
                let theme = self.prefs.toggle_theme();
                Reply::text(format!("theme = {theme}"))
            }
            Command::Help => Reply::text(HELP),
            Command::Quit => Reply {
                text: String::new(),
                quit: true,
            },
        }
    }

    async fn submit(&mut self) -> Reply {
        let outcome = self.controller.submit(&self.form, &self.api).await;
        let locale = self.prefs.locale();

        let text = match outcome {
            SubmitOutcome::Success(prediction) => {
                // Show the result block once per successful attempt
                if self.result_ready.swap(false, Ordering::SeqCst) {
                    render_prediction(&prediction, &self.prefs)
                } else {
                    String::new()
                }
            }
            SubmitOutcome::Failed(_) => render_state(self.controller.state(), &self.prefs),
            SubmitOutcome::Ignored => ui_text(locale, UiText::Submitting).to_string(),
            SubmitOutcome::Rejected(_) => ui_text(locale, UiText::EmptyLink).to_string(),
        };
        Reply::text(text)
    }

    /// Read commands from `input` until EOF or `quit`
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let title = ui_text(self.prefs.locale(), UiText::Title);
        output
            .write_all(format!("{}\n(help for commands)\n", title).as_bytes())
            .await?;
        output.flush().await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let reply = match Command::parse(&line) {
                Ok(Some(command)) => self.execute(command).await,
                Ok(None) => continue,
                Err(e) => Reply::text(e),
            };

            if !reply.text.is_empty() {
                output.write_all(reply.text.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
            if reply.quit {
                break;
            }
        }
        Ok(())
    }
}
