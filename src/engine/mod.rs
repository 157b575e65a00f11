//! JavaScript Execution Module
//!
//! Runs user code inside an embedded Boa context with a substituted `console`
//! and turns everything the code printed or returned into tagged output lines.
//!
//! # Module Organization
//!
//! - **`console`**: the substitute console object and value stringification
//! - **`executor`**: compiles and invokes user code, builds the result

pub mod console;
pub mod executor;

pub use executor::Executor;

use std::time::Duration;

pub const NO_CODE_MESSAGE: &str = "// No code to execute";
pub const NO_OUTPUT_MESSAGE: &str = "// Code executed successfully (no output)";
pub const FAILED_HEADER: &str = "// Execution failed";

/// Origin of a captured output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Log,
    Warn,
    Info,
    Error,
    Return,
    /// Sentinel and header lines such as `// No code to execute`
    Comment,
}

impl OutputKind {
    /// Tag written in front of the line in the text form of the output
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            OutputKind::Log => Some("[LOG]"),
            OutputKind::Warn => Some("[WARN]"),
            OutputKind::Info => Some("[INFO]"),
            OutputKind::Error => Some("[ERROR]"),
            OutputKind::Return => Some("[RETURN]"),
            OutputKind::Comment => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: OutputKind,
    pub text: String,
}

impl OutputLine {
    pub fn new(kind: OutputKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn comment(text: &str) -> Self {
        Self::new(OutputKind::Comment, text)
    }

    /// The line as it appears in the joined output text
    pub fn tagged(&self) -> String {
        match self.kind.tag() {
            Some(tag) => format!("{} {}", tag, self.text),
            None => self.text.clone(),
        }
    }
}

/// Outcome of a single run. Rebuilt from scratch every time.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub lines: Vec<OutputLine>,
    pub fatal_errors: Vec<String>,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn output_text(&self) -> String {
        self.lines
            .iter()
            .map(OutputLine::tagged)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn failed(&self) -> bool {
        !self.fatal_errors.is_empty()
    }
}

/// The only state machine in the playground. Runs cannot be cancelled, so
/// there is no state besides these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_text_joins_tagged_lines() {
        let result = ExecutionResult {
            lines: vec![
                OutputLine::new(OutputKind::Log, "hi"),
                OutputLine::new(OutputKind::Return, "42"),
            ],
            ..Default::default()
        };
        assert_eq!(result.output_text(), "[LOG] hi\n[RETURN] 42");
        assert!(!result.failed());
    }
}
