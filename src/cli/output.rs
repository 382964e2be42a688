use std::io::{self, BufRead, IsTerminal, Write};

use serde::Serialize;

/// Where command results go: JSON documents or human-readable lines
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub assume_yes: bool,
}

impl Output {
    /// Print `value` as JSON, or as the lines produced by `render`
    pub fn emit<T, F>(&self, value: &T, render: F) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> Vec<String>,
    {
        let mut stdout = io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        } else {
            for line in render(value) {
                writeln!(stdout, "{}", line)?;
            }
        }
        Ok(())
    }

    /// One status line; in JSON mode wrapped as `{"message": ...}`
    pub fn message(&self, message: &str) -> anyhow::Result<()> {
        #[derive(Serialize)]
        struct Message<'m> {
            message: &'m str,
        }
        self.emit(&Message { message }, |m| vec![m.message.to_string()])
    }

    /// Side remark that is not part of the result. JSON mode sends it to
    /// stderr so stdout stays a single document.
    pub fn note(&self, message: &str) -> anyhow::Result<()> {
        self.write_note(message, &mut io::stdout().lock(), &mut io::stderr().lock())
    }

    fn write_note(&self, message: &str, stdout: &mut impl Write, stderr: &mut impl Write) -> anyhow::Result<()> {
        let target: &mut dyn Write = if self.json { stderr } else { stdout };
        writeln!(target, "{}", message)?;
        Ok(())
    }

    /// Ask before a destructive action; `--yes` answers for the user
    pub fn confirm(&self, prompt: &str) -> anyhow::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        let mut stderr = io::stderr().lock();
        write!(stderr, "{} [y/N] ", prompt)?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    /// Read a secret that was not given as a flag. A terminal gets a prompt
    /// with echo turned off; piped input is read as one line.
    pub fn prompt_secret(&self, prompt: &str) -> anyhow::Result<String> {
        if io::stdin().is_terminal() {
            return Ok(rpassword::prompt_password(format!("{}: ", prompt))?);
        }

        read_secret_line(&mut io::stdin().lock())
    }
}

fn read_secret_line(input: &mut impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Fixed-width text table
pub fn table(headers: &[&str], rows: Vec<Vec<String>>) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(headers.iter().map(|h| h.to_string()).collect())];
    lines.extend(rows.into_iter().map(line));
    lines
}
