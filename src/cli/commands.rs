use crate::app::DEFAULT_CODE;
use crate::config::Config;
use crate::engine::{ExecutionResult, Executor, OutputKind};
use crate::models::storage::CODE_KEY;
use crate::models::{SnippetStore, StorageManager, export, share};
use anyhow::{Result, bail};
use colored::{ColoredString, Colorize};
use std::path::{Path, PathBuf};

fn bar() -> ColoredString {
    "┃".bright_magenta()
}

/// Code from `file`, or the persisted playground buffer
fn read_code(storage: &StorageManager, file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => export::import_code(path),
        None => Ok(storage
            .get(CODE_KEY)
            .unwrap_or_else(|| DEFAULT_CODE.to_string())),
    }
}

fn print_result(result: &ExecutionResult) {
    for line in &result.lines {
        let text = line.tagged();
        let colored = match line.kind {
            OutputKind::Log => text.normal(),
            OutputKind::Warn => text.yellow(),
            OutputKind::Info => text.cyan(),
            OutputKind::Error => text.red(),
            OutputKind::Return => text.bright_green(),
            OutputKind::Comment => text.dimmed().italic(),
        };
        println!("{}", colored);
    }
}

/// Runs code once and prints tagged output. Returns `false` on a fatal error.
pub fn run_code(storage: &StorageManager, file: Option<&Path>) -> Result<bool> {
    let code = read_code(storage, file)?;
    let mut executor = Executor::new();
    let result = executor.execute(&code);

    print_result(&result);
    println!("{}", "─".repeat(60).bright_magenta());

    if result.failed() {
        println!(
            "{}  {} {} ({:.1} ms)",
            bar(),
            "✗".red().bold(),
            format!(
                "{} error{}",
                result.fatal_errors.len(),
                if result.fatal_errors.len() > 1 { "s" } else { "" }
            )
            .red(),
            result.duration.as_secs_f64() * 1000.0
        );
        Ok(false)
    } else {
        println!(
            "{}  {} {} ({:.1} ms)",
            bar(),
            "✓".green().bold(),
            "Success".green(),
            result.duration.as_secs_f64() * 1000.0
        );
        Ok(true)
    }
}

pub fn share_code(storage: &StorageManager, config: &Config, file: Option<&Path>) -> Result<()> {
    let code = read_code(storage, file)?;
    println!("{}", share::share_url(&config.share_base_url, &code));
    Ok(())
}

pub fn list_snippets(storage: &StorageManager) -> Result<()> {
    let store = SnippetStore::load(storage);

    if store.is_empty() {
        println!("{}  No saved snippets yet", bar());
        return Ok(());
    }

    println!(
        "{}  {} ({})",
        bar(),
        "SNIPPETS".bright_green().bold(),
        store.len()
    );
    println!("{}", "─".repeat(60).bright_magenta());

    for (idx, snippet) in store.list().iter().enumerate() {
        println!(
            "{}  {}. {} {}",
            bar(),
            (idx + 1).to_string().yellow(),
            snippet.name.bright_white().bold(),
            format!(
                "· {} · {} lines · {}",
                snippet.formatted_date(),
                snippet.get_line_count(),
                snippet.id
            )
            .dimmed()
        );
    }

    Ok(())
}

pub fn export_snippet(storage: &StorageManager, name_or_id: &str, dir: &Path) -> Result<PathBuf> {
    let store = SnippetStore::load(storage);
    let Some(snippet) = store.find(name_or_id) else {
        bail!("No snippet found with name or id: {}", name_or_id);
    };

    let path = store.export_as_file(snippet.id, dir)?;
    println!(
        "{}  Exported {} to {}",
        bar(),
        snippet.name.bright_white(),
        path.display().to_string().bright_blue()
    );
    Ok(path)
}

pub fn import_code(storage: &mut StorageManager, file: &Path) -> Result<()> {
    let code = export::import_code(file)?;
    storage.set(CODE_KEY, &code)?;
    println!(
        "{}  Imported {} ({} lines)",
        bar(),
        file.display().to_string().bright_blue(),
        code.lines().count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_persisted_code_or_default() {
        let mut storage = StorageManager::in_memory();
        assert_eq!(read_code(&storage, None).unwrap(), DEFAULT_CODE);

        storage.set(CODE_KEY, "saved()").unwrap();
        assert_eq!(read_code(&storage, None).unwrap(), "saved()");
    }

    #[test]
    fn run_reports_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.js");
        let bad = dir.path().join("bad.js");
        fs::write(&good, "console.log(1)").unwrap();
        fs::write(&bad, "throw new Error('nope')").unwrap();

        let storage = StorageManager::in_memory();
        assert!(run_code(&storage, Some(&good)).unwrap());
        assert!(!run_code(&storage, Some(&bad)).unwrap());
        assert!(run_code(&storage, Some(&dir.path().join("missing.js"))).is_err());
    }

    #[test]
    fn import_replaces_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("in.js");
        fs::write(&file, "from_file()").unwrap();

        let mut storage = StorageManager::in_memory();
        import_code(&mut storage, &file).unwrap();
        assert_eq!(storage.get(CODE_KEY).as_deref(), Some("from_file()"));
    }

    #[test]
    fn export_finds_snippet_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = StorageManager::in_memory();
        let mut store = SnippetStore::load(&storage);
        store.save(&mut storage, "Fetch Demo", "fetch()").unwrap();

        let path = export_snippet(&storage, "fetch demo", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("fetch_demo.js"));
        assert!(export_snippet(&storage, "missing", dir.path()).is_err());
    }
}
