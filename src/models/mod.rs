pub mod buffer;
pub mod export;
pub mod share;
pub mod snippet;
pub mod snippet_store;
pub mod storage;
pub mod theme;

pub use buffer::CodeBuffer;
pub use snippet::Snippet;
pub use snippet_store::SnippetStore;
pub use storage::StorageManager;
pub use theme::{Theme, ThemeState};
