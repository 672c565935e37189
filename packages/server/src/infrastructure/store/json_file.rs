//! JSON ファイルによる ContactStore 実装
//!
//! 保存は毎回ドキュメント全体の書き換え。一時ファイルに書き込んでから rename するため、
//! 書き込み途中でプロセスが落ちても直前のドキュメントが残ります。
//! 読み込みに失敗した場合（ファイルなし・壊れた JSON）は空の状態で起動します。

use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ContactBook, ContactStore, StoreError},
    infrastructure::dto::store::{ContactBookDocument, Reconciled},
};

/// JSON ファイルに保存する ContactStore
pub struct JsonFileContactStore {
    /// ドキュメントのパス
    path: PathBuf,
    /// 保存処理同士が重ならないようにするためのロック
    write_lock: Mutex<()>,
}

impl JsonFileContactStore {
    /// 新しい JsonFileContactStore を作成（ファイルはまだ読み書きしない）
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// ドキュメントのパス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 同じディレクトリ内の一時ファイルのパス
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| OsString::from("timechat-data.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl ContactStore for JsonFileContactStore {
    async fn load(&self) -> ContactBook {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    "No contact store at '{}', starting empty",
                    self.path.display()
                );
                return ContactBook::new();
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read contact store '{}', starting empty: {}",
                    self.path.display(),
                    e
                );
                return ContactBook::new();
            }
        };

        let document: ContactBookDocument = match serde_json::from_slice(&bytes) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    "Contact store '{}' is corrupt, starting empty: {}",
                    self.path.display(),
                    e
                );
                return ContactBook::new();
            }
        };

        let Reconciled { book, repairs } = document.reconcile();
        tracing::info!(
            "Loaded contact store '{}' ({} pending requests, {} aliases with contacts)",
            self.path.display(),
            book.pending_count(),
            book.contact_alias_count()
        );

        if repairs > 0 {
            tracing::warn!(
                "Repaired {} inconsistent entries in contact store '{}'",
                repairs,
                self.path.display()
            );
            if let Err(e) = self.save(&book).await {
                tracing::error!("Failed to save repaired contact store: {}", e);
            }
        }

        book
    }

    async fn save(&self, book: &ContactBook) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&ContactBookDocument::from_book(book))?;

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::debug!(
            "Saved contact store '{}' ({} bytes)",
            self.path.display(),
            json.len()
        );
        Ok(())
    }
}
