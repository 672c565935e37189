//! ContactStore に永続化する ContactRepository 実装
//!
//! ContactBook 全体を 1 つの Mutex で保護し、変更と保存をそのロックの中で行います。
//! そのため保存処理同士は重ならず、呼び出し側に結果が返った時点で保存は完了しています
//! （通知より先に永続化）。
//!
//! 保存に失敗してもメモリ上の変更は取り消しません。エラーはログに出力するだけです。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Alias, ContactBook, ContactError, ContactRemoval, ContactRepository, ContactRequest,
    ContactStore, RequestId, Timestamp,
};

/// ContactStore に永続化する ContactRepository
pub struct StoredContactRepository {
    /// 永続化先
    store: Arc<dyn ContactStore>,
    /// 現在の状態
    book: Mutex<ContactBook>,
}

impl StoredContactRepository {
    /// ストアから状態を読み込んで StoredContactRepository を作成
    pub async fn open(store: Arc<dyn ContactStore>) -> Self {
        let book = store.load().await;
        Self {
            store,
            book: Mutex::new(book),
        }
    }

    /// 変更を適用し、成功した場合のみ保存する
    async fn mutate<T, F>(&self, operation: &str, apply: F) -> Result<T, ContactError>
    where
        F: FnOnce(&mut ContactBook) -> Result<T, ContactError> + Send,
        T: Send,
    {
        let mut book = self.book.lock().await;
        let output = apply(&mut book)?;
        if let Err(e) = self.store.save(&book).await {
            tracing::error!(
                "Failed to persist contact book after {}; keeping in-memory state: {}",
                operation,
                e
            );
        }
        Ok(output)
    }
}

#[async_trait]
impl ContactRepository for StoredContactRepository {
    async fn contacts_of(&self, alias: &Alias) -> Vec<Alias> {
        self.book.lock().await.contacts_of(alias)
    }

    async fn pending_for(&self, alias: &Alias) -> Vec<ContactRequest> {
        self.book.lock().await.pending_for(alias)
    }

    async fn send_request(
        &self,
        from: Alias,
        to: Alias,
        id: RequestId,
        created_at: Timestamp,
    ) -> Result<ContactRequest, ContactError> {
        self.mutate("send_request", |book| {
            book.send_request(from, to, id, created_at)
        })
        .await
    }

    async fn accept_request(
        &self,
        acceptor: &Alias,
        id: &RequestId,
        at: Timestamp,
    ) -> Result<ContactRequest, ContactError> {
        self.mutate("accept_request", |book| book.accept_request(acceptor, id, at))
            .await
    }

    async fn reject_request(
        &self,
        rejector: &Alias,
        id: &RequestId,
        at: Timestamp,
    ) -> Result<ContactRequest, ContactError> {
        self.mutate("reject_request", |book| book.reject_request(rejector, id, at))
            .await
    }

    async fn delete_contact(
        &self,
        me: &Alias,
        other: &Alias,
    ) -> Result<ContactRemoval, ContactError> {
        self.mutate("delete_contact", |book| book.delete_contact(me, other))
            .await
    }

    async fn snapshot(&self) -> ContactBook {
        self.book.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockContactStore, StoreError},
        infrastructure::store::InMemoryContactStore,
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 変更系の操作が成功した場合のみ保存されること
    // - 保存に失敗してもメモリ上の変更が維持されること
    // - 同じストアから作り直すと状態が復元されること（再起動相当）
    // ========================================

    fn alias(s: &str) -> Alias {
        Alias::new(s.to_string()).unwrap()
    }

    fn request_id(s: &str) -> RequestId {
        RequestId::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_successful_mutation_is_saved() {
        // テスト項目: リクエスト送信が成功すると保存される
        // given (前提条件):
        let store = Arc::new(InMemoryContactStore::new());
        let repo = StoredContactRepository::open(store.clone()).await;

        // when (操作):
        repo.send_request(alias("cat"), alias("dog"), request_id("r1"), Timestamp::new(1))
            .await
            .unwrap();

        // then (期待する結果):
        let saved = store.last_saved().await.unwrap();
        assert_eq!(saved.pending_for(&alias("dog")).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_is_not_saved() {
        // テスト項目: ポリシー違反の操作では保存が呼ばれない
        // given (前提条件):
        let mut store = MockContactStore::new();
        store.expect_load().times(1).returning(ContactBook::new);
        store.expect_save().times(0);
        let repo = StoredContactRepository::open(Arc::new(store)).await;

        // when (操作):
        let result = repo
            .accept_request(&alias("dog"), &request_id("missing"), Timestamp::new(1))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(ContactError::RequestNotFound { .. })));
    }

    #[tokio::test]
    async fn test_save_failure_keeps_in_memory_state() {
        // テスト項目: 保存に失敗してもメモリ上の変更は維持される
        // given (前提条件):
        let mut store = MockContactStore::new();
        store.expect_load().returning(ContactBook::new);
        store.expect_save().times(2).returning(|_| {
            Err(StoreError::Io {
                path: "/read-only/data.json".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });
        let repo = StoredContactRepository::open(Arc::new(store)).await;

        // when (操作):
        repo.send_request(alias("cat"), alias("dog"), request_id("r1"), Timestamp::new(1))
            .await
            .unwrap();
        let accepted = repo
            .accept_request(&alias("dog"), &request_id("r1"), Timestamp::new(2))
            .await;

        // then (期待する結果):
        assert!(accepted.is_ok());
        assert_eq!(repo.contacts_of(&alias("cat")).await, vec![alias("dog")]);
    }

    #[tokio::test]
    async fn test_reopen_restores_contacts_after_accept() {
        // テスト項目: 承認後に作り直しても連絡先が復元され、そのペアの pending は残らない
        // given (前提条件):
        let store = Arc::new(InMemoryContactStore::new());
        let repo = StoredContactRepository::open(store.clone()).await;
        repo.send_request(alias("cat"), alias("dog"), request_id("r1"), Timestamp::new(1))
            .await
            .unwrap();
        repo.accept_request(&alias("dog"), &request_id("r1"), Timestamp::new(2))
            .await
            .unwrap();

        // when (操作):
        let reopened = StoredContactRepository::open(store).await;

        // then (期待する結果):
        assert_eq!(reopened.contacts_of(&alias("cat")).await, vec![alias("dog")]);
        assert_eq!(reopened.contacts_of(&alias("dog")).await, vec![alias("cat")]);
        assert!(reopened.pending_for(&alias("dog")).await.is_empty());
        assert!(reopened.pending_for(&alias("cat")).await.is_empty());
    }
}
