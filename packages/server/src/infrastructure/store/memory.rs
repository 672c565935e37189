//! インメモリ ContactStore 実装
//!
//! 最後に保存された ContactBook をプロセス内に保持するだけの実装。
//! 同じインスタンスを共有すれば、リポジトリを作り直すことで再起動を再現できます。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ContactBook, ContactStore, StoreError};

/// インメモリ ContactStore
#[derive(Default)]
pub struct InMemoryContactStore {
    saved: Mutex<Option<ContactBook>>,
}

impl InMemoryContactStore {
    /// 空の InMemoryContactStore を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存された回数に関係なく、最後に保存された状態を返す
    pub async fn last_saved(&self) -> Option<ContactBook> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn load(&self) -> ContactBook {
        self.saved.lock().await.clone().unwrap_or_default()
    }

    async fn save(&self, book: &ContactBook) -> Result<(), StoreError> {
        *self.saved.lock().await = Some(book.clone());
        Ok(())
    }
}
