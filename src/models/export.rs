use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

/// File name used when the whole editor buffer is exported
pub const EXPORT_FILE_NAME: &str = "playground-code.js";

/// Writes the current code to `playground-code.js` inside `dir`
pub fn export_code(code: &str, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).context("Failed to create export directory")?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, code).context("Failed to write exported code")?;
    Ok(path)
}

/// Reads a local text file wholesale; the caller replaces the buffer with it
pub fn import_code(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Copies text to the system clipboard through the platform's clipboard tool
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    for (program, args) in clipboard_commands() {
        match pipe_to(program, &args, text) {
            Ok(()) => return Ok(()),
            Err(e) => log::debug!("Clipboard tool {} unavailable: {:#}", program, e),
        }
    }

    Err(anyhow!("No clipboard tool available"))
}

fn clipboard_commands() -> Vec<(&'static str, Vec<&'static str>)> {
    if cfg!(target_os = "macos") {
        vec![("pbcopy", vec![])]
    } else if cfg!(target_os = "windows") {
        vec![("clip", vec![])]
    } else {
        vec![
            ("wl-copy", vec![]),
            ("xclip", vec!["-selection", "clipboard"]),
            ("xsel", vec!["--clipboard", "--input"]),
        ]
    }
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to launch {}", program))?;

    child
        .stdin
        .take()
        .context("Clipboard tool has no stdin")?
        .write_all(text.as_bytes())
        .context("Failed to write to clipboard tool")?;

    let status = child.wait().context("Clipboard tool did not finish")?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("{} exited with {}", program, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_then_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let code = "// ünïcode\nconsole.log(1);\n";

        let path = export_code(code, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        assert_eq!(import_code(&path).unwrap(), code);
    }

    #[test]
    fn import_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(import_code(&dir.path().join("nope.js")).is_err());
    }
}
