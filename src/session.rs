//! Interactive calculator session over a line-oriented stream.
//!
//! Mirrors the calculator form: edit fields one at a time, then calculate
//! or reset. Editing a field clears that field's error.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, DuplexStream};
use tokio::runtime::Handle;
use tracing::{debug, error};
use uuid::Uuid;

use crate::analytics::{track_quietly, ClickEvent};
use crate::calculator::{CalculationOutcome, RiskCalculator, ELEMENT_ID};
use crate::error::ValidationErrors;
use crate::format::CurrencyFormatter;
use crate::models::{Field, RawInput};
use crate::report::{CalculationReport, ErrorReport};

const HELP: &str = "\
Commands:
  principal <amount>   capital available
  risk <percent>       max risk per trade, e.g. 2
  buy <price>          entry price
  stop <price>         stop loss price
  market <code>        MY, SG, CN, HK or US
  calc                 calculate position size
  reset                clear the form
  show                 show the current form
  help                 this text
  quit                 leave the session
";

/// Forward lines from a blocking reader through an in-memory pipe.
///
/// The reader runs on a plain thread rather than the blocking pool, so a
/// read still pending on Ctrl+C does not hold up runtime shutdown.
pub fn spawn_line_reader<R>(reader: R) -> Result<DuplexStream>
where
    R: std::io::BufRead + Send + 'static,
{
    let handle = Handle::try_current().context("Line reader needs a tokio runtime")?;
    let (mut tx, rx) = tokio::io::duplex(4096);

    std::thread::Builder::new()
        .name("session-input".to_string())
        .spawn(move || {
            for line in std::io::BufRead::lines(reader) {
                let Ok(mut line) = line else { break };
                line.push('\n');
                if handle.block_on(tx.write_all(line.as_bytes())).is_err() {
                    break;
                }
            }
        })
        .context("Failed to spawn input thread")?;

    Ok(rx)
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Set(Field, String),
    Calculate,
    Reset,
    Show,
    Help,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let value = rest.trim().to_string();

        let field = match word.to_lowercase().as_str() {
            "principal" | "capital" => Field::Principal,
            "risk" => Field::RiskPercentage,
            "buy" => Field::BuyPrice,
            "stop" => Field::StopLoss,
            "market" => Field::Market,
            "calc" | "calculate" => return Ok(Self::Calculate),
            "reset" => return Ok(Self::Reset),
            "show" => return Ok(Self::Show),
            "help" | "?" => return Ok(Self::Help),
            "quit" | "exit" => return Ok(Self::Quit),
            other => return Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
        };
        Ok(Self::Set(field, value))
    }
}

/// Form state for one interactive user.
pub struct FormSession<'a> {
    id: Uuid,
    calculator: &'a RiskCalculator,
    formatter: &'a dyn CurrencyFormatter,
    form: RawInput,
    errors: ValidationErrors,
    last: Option<CalculationOutcome>,
}

impl<'a> FormSession<'a> {
    pub fn new(calculator: &'a RiskCalculator, formatter: &'a dyn CurrencyFormatter) -> Self {
        Self {
            id: Uuid::new_v4(),
            calculator,
            formatter,
            form: RawInput::default(),
            errors: ValidationErrors::new(),
            last: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn form(&self) -> &RawInput {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn last_outcome(&self) -> Option<&CalculationOutcome> {
        self.last.as_ref()
    }

    /// Apply one command. Returns the text to show, or `None` on quit.
    pub fn handle(&mut self, command: SessionCommand) -> Option<String> {
        match command {
            SessionCommand::Set(field, value) => {
                self.form.set(field, value);
                self.errors.remove(field);
                Some(format!("{} = {}\n", field, self.form.get(field)))
            }
            SessionCommand::Calculate => Some(self.calculate()),
            SessionCommand::Reset => {
                self.form = RawInput::default();
                self.errors = ValidationErrors::new();
                self.last = None;
                let page = &self.calculator.config().page;
                let event =
                    ClickEvent::new(ELEMENT_ID, "reset_calculator", page).with_session(Some(self.id));
                track_quietly(self.calculator.sink(), &event);
                Some("Form cleared.\n".to_string())
            }
            SessionCommand::Show => Some(self.render_form()),
            SessionCommand::Help => Some(HELP.to_string()),
            SessionCommand::Quit => None,
        }
    }

    fn calculate(&mut self) -> String {
        match self.calculator.calculate_in_session(&self.form, Some(self.id)) {
            Ok(CalculationOutcome::Invalid(errors)) => {
                let text = ErrorReport(&errors).to_string();
                self.errors = errors;
                text
            }
            Ok(CalculationOutcome::Calculated { input, rule, result }) => {
                self.errors = ValidationErrors::new();
                let text = CalculationReport {
                    input: &input,
                    rule,
                    result: &result,
                    formatter: self.formatter,
                }
                .to_string();
                self.last = Some(CalculationOutcome::Calculated { input, rule, result });
                text
            }
            Err(e) => {
                error!(session = %self.id, error = %e, "Calculation failed");
                format!("Calculation failed: {}\n", e)
            }
        }
    }

    fn render_form(&self) -> String {
        let mut text = String::new();
        for field in [
            Field::Principal,
            Field::RiskPercentage,
            Field::BuyPrice,
            Field::StopLoss,
            Field::Market,
        ] {
            let error = self
                .errors
                .get(field)
                .map(|e| format!("  ({})", e))
                .unwrap_or_default();
            text.push_str(&format!("  {:<16} {}{}\n", field.as_str(), self.form.get(field), error));
        }
        text
    }

    /// Read commands line by line until EOF or `quit`.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        writer.write_all(b"> ").await?;
        writer.flush().await?;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                writer.write_all(b"> ").await?;
                writer.flush().await?;
                continue;
            }

            let output = match SessionCommand::parse(&line) {
                Ok(command) => {
                    debug!(session = %self.id, command = ?command, "Session command");
                    match self.handle(command) {
                        Some(text) => text,
                        None => break,
                    }
                }
                Err(message) => format!("{}\n", message),
            };

            writer.write_all(output.as_bytes()).await?;
            writer.write_all(b"> ").await?;
            writer.flush().await?;
        }

        writer.write_all(b"\nBye.\n").await?;
        writer.flush().await?;
        Ok(())
    }
}
