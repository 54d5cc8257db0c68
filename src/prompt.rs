//! Line prompts for the one-shot commands

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::tty::IsTty;
use std::io::{self, Write};

/// Raw mode for as long as the guard lives
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Collect key presses into a secret until Enter
///
/// Returns `None` when the user cancels with Esc or Ctrl+C. Nothing is echoed.
pub fn collect_secret<F>(mut next_key: F) -> io::Result<Option<String>>
where
    F: FnMut() -> io::Result<KeyEvent>,
{
    let mut secret = String::new();
    loop {
        let key = next_key()?;
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None)
            }
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}

/// Print `label` and read one visible line
pub fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Print `label` and read a password without echo
///
/// Piped input is read as a plain line. `None` means the user cancelled.
pub fn prompt_password(label: &str) -> io::Result<Option<String>> {
    if !io::stdin().is_tty() {
        return prompt(label).map(Some);
    }

    print!("{}: ", label);
    io::stdout().flush()?;
    let secret = {
        let _raw = RawMode::enable()?;
        collect_secret(|| loop {
            if let Event::Key(key) = event::read()? {
                return Ok(key);
            }
        })
    };
    println!();
    secret
}
