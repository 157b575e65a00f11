use chrono::{DateTime, Local, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("valid regex"));

/// A named copy of playground code. Field names follow the persisted format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Snippet {
    pub fn new(name: String, code: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name,
            code,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_code(&mut self, code: String) {
        self.code = code;
        self.updated_at = Utc::now();
    }

    /// File name used when the snippet is exported
    pub fn export_file_name(&self) -> String {
        format!(
            "{}.js",
            UNSAFE_FILE_CHARS
                .replace_all(&self.name, "_")
                .to_lowercase()
        )
    }

    pub fn formatted_date(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }

    pub fn get_line_count(&self) -> usize {
        self.code.lines().count()
    }
}
