//! ContactStore の実装
//!
//! - [`JsonFileContactStore`]: JSON ドキュメントとしてディスクに保存（本番用）
//! - [`InMemoryContactStore`]: プロセス内に保持するだけの実装（テスト・永続化なしの起動用）

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileContactStore;
pub use memory::InMemoryContactStore;
