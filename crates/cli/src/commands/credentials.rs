//! `threadsmith credentials`: Interactive credential setup.

use std::io::{BufRead, Write};
use std::path::Path;

use threadsmith_core::Credentials;

const RULE_WIDTH: usize = 60;
const DOTENV_FILE: &str = ".env";

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    setup(&mut input, &mut out, Path::new(DOTENV_FILE))
}

fn setup<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    dotenv_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}\nPublishing Credentials Setup\n{rule}\n")?;
    writeln!(out, "You'll need these from your platform's developer portal.\n")?;

    let credentials = Credentials::new(
        prompt(input, out, "Enter API Key: ")?,
        prompt(input, out, "Enter API Secret: ")?,
        prompt(input, out, "Enter Access Token: ")?,
        prompt(input, out, "Enter Access Token Secret: ")?,
    )
    .require_complete()
    .map_err(|e| format!("All fields are required ({e})"))?;

    writeln!(out, "\n{rule}\nHow would you like to store these credentials?\n{rule}")?;
    writeln!(out, "1. Print shell export lines (current session only)")?;
    writeln!(out, "2. Save to {} file", dotenv_path.display())?;
    writeln!(out, "3. Print as JSON")?;

    match prompt(input, out, "\nEnter choice (1-3): ")?.as_str() {
        "1" => {
            writeln!(out, "\n# Add these to your shell session:")?;
            write!(out, "{}", credentials.to_exports())?;
        }
        "2" => {
            std::fs::write(dotenv_path, credentials.to_dotenv())?;
            writeln!(out, "\n✅ Credentials saved to {}", dotenv_path.display())?;
            writeln!(out, "To use: source {}", dotenv_path.display())?;
        }
        _ => {
            writeln!(out, "\n# Copy these credentials:")?;
            writeln!(out, "{}", credentials.to_json())?;
        }
    }

    writeln!(out, "\n{rule}\nSetup complete!\n{rule}")?;
    Ok(())
}

/// Print `label`, then read one trimmed line. End of input is an error.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err("Input ended before setup finished".into());
    }
    Ok(line.trim().to_string())
}
