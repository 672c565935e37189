//! UseCase: 連絡先リクエスト承認処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AcceptRequestUseCase::execute() メソッド
//! - 双方向の連絡先追加と、両者への contact_added / open_chat 通知
//!
//! ### なぜこのテストが必要か
//! - 承認後に両者が同じルーム ID を受け取り、会話を始められることを保証
//! - 宛先ではないエイリアスが他人のリクエストを承認できないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者がオンライン・オフライン
//! - 異常系：存在しない ID、他人宛てのリクエスト、空の ID、未登録

use std::sync::Arc;

use crate::{
    domain::{Alias, ContactError, ContactRepository, ContactRequest, RoomId, Timestamp},
    infrastructure::{
        dto::websocket::{FailureReason, ServerMessage},
        registry::ConnectionRegistry,
    },
};

use super::{parse_request_id, require_alias};

/// 連絡先リクエスト承認のユースケース
pub struct AcceptRequestUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ContactRepository>,
    /// エイリアスごとの接続
    connections: Arc<ConnectionRegistry>,
}

impl AcceptRequestUseCase {
    /// 新しい AcceptRequestUseCase を作成
    pub fn new(repository: Arc<dyn ContactRepository>, connections: Arc<ConnectionRegistry>) -> Self {
        Self {
            repository,
            connections,
        }
    }

    /// リクエスト承認を実行
    ///
    /// # Arguments
    ///
    /// * `acceptor` - 要求元の接続に登録されたエイリアス（リクエストの宛先であること）
    /// * `request_id` - 承認するリクエストの ID
    ///
    /// # Returns
    ///
    /// 要求元に返す `request_accept_ok`
    pub async fn execute(&self, acceptor: Option<&Alias>, request_id: &str) -> ServerMessage {
        match self.accept(acceptor, request_id).await {
            Ok(request) => ServerMessage::RequestAcceptOk {
                ok: true,
                with: Some(request.from.into_string()),
                request_id: Some(request.id.into_string()),
                reason: None,
            },
            Err(e) => {
                tracing::info!("request_accept rejected: {}", e);
                ServerMessage::RequestAcceptOk {
                    ok: false,
                    with: None,
                    request_id: None,
                    reason: Some(FailureReason::from(&e)),
                }
            }
        }
    }

    async fn accept(
        &self,
        acceptor: Option<&Alias>,
        request_id: &str,
    ) -> Result<ContactRequest, ContactError> {
        let acceptor = require_alias(acceptor)?;
        let id = parse_request_id(request_id)?;

        // 1. 永続化
        let request = self
            .repository
            .accept_request(acceptor, &id, Timestamp::now())
            .await?;
        let room = RoomId::for_pair(&request.from, &request.to);
        tracing::info!(
            "ACCEPT {} '{}' <-> '{}' (room: {})",
            request.id,
            request.from,
            request.to,
            room
        );

        // 2. 送信者へ通知
        let sender = &request.from;
        self.connections
            .push(
                sender,
                &ServerMessage::ContactAdded {
                    with: request.to.as_str().to_string(),
                },
            )
            .await;
        self.connections
            .push(
                sender,
                &ServerMessage::OpenChat {
                    with: request.to.as_str().to_string(),
                    room: room.as_str().to_string(),
                },
            )
            .await;
        self.connections
            .push(
                sender,
                &ServerMessage::RequestAccepted {
                    by: request.to.as_str().to_string(),
                    request_id: request.id.as_str().to_string(),
                },
            )
            .await;

        // 3. 承認者の全接続（要求元を含む）へ通知
        self.connections
            .push(
                &request.to,
                &ServerMessage::ContactAdded {
                    with: sender.as_str().to_string(),
                },
            )
            .await;
        self.connections
            .push(
                &request.to,
                &ServerMessage::OpenChat {
                    with: sender.as_str().to_string(),
                    room: room.into_string(),
                },
            )
            .await;

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::RequestId,
        usecase::test_support::{TestContext, alias, drain, types},
    };

    async fn seed_request(ctx: &TestContext, id: &str, from: &str, to: &str) {
        ctx.repository
            .send_request(
                alias(from),
                alias(to),
                RequestId::new(id.to_string()).unwrap(),
                Timestamp::new(1),
            )
            .await
            .unwrap();
    }

    fn failure(reason: FailureReason) -> ServerMessage {
        ServerMessage::RequestAcceptOk {
            ok: false,
            with: None,
            request_id: None,
            reason: Some(reason),
        }
    }

    #[tokio::test]
    async fn test_accept_request_notifies_both_sides() {
        // テスト項目: 承認すると両者が連絡先になり、同じルームの open_chat を受け取る
        // given (前提条件):
        let ctx = TestContext::new().await;
        seed_request(&ctx, "r1", "cat", "dog").await;
        let (_cat, mut cat_rx) = ctx.connect("cat").await;
        let (dog, mut dog_rx) = ctx.connect("dog").await;
        let usecase = AcceptRequestUseCase::new(ctx.repository.clone(), ctx.connections.clone());

        // when (操作):
        let reply = usecase.execute(dog.alias.as_ref(), "r1").await;

        // then (期待する結果):
        assert_eq!(
            reply,
            ServerMessage::RequestAcceptOk {
                ok: true,
                with: Some("cat".to_string()),
                request_id: Some("r1".to_string()),
                reason: None,
            }
        );

        let cat_frames = drain(&mut cat_rx);
        assert_eq!(
            types(&cat_frames),
            vec!["contact_added", "open_chat", "request_accepted"]
        );
        assert_eq!(cat_frames[0]["with"], "dog");
        assert_eq!(cat_frames[1]["room"], "cat_dog");
        assert_eq!(cat_frames[2]["by"], "dog");
        assert_eq!(cat_frames[2]["requestId"], "r1");

        let dog_frames = drain(&mut dog_rx);
        assert_eq!(types(&dog_frames), vec!["contact_added", "open_chat"]);
        assert_eq!(dog_frames[0]["with"], "cat");
        assert_eq!(dog_frames[1]["room"], "cat_dog");

        assert_eq!(ctx.repository.contacts_of(&alias("cat")).await, vec![alias("dog")]);
        assert_eq!(ctx.repository.contacts_of(&alias("dog")).await, vec![alias("cat")]);
        assert!(ctx.repository.pending_for(&alias("dog")).await.is_empty());
    }

    #[tokio::test]
    async fn test_accept_request_with_offline_sender() {
        // テスト項目: 送信者がオフラインでも承認は保存される
        // given (前提条件):
        let ctx = TestContext::new().await;
        seed_request(&ctx, "r1", "cat", "dog").await;
        let usecase = AcceptRequestUseCase::new(ctx.repository.clone(), ctx.connections.clone());

        // when (操作):
        let reply = usecase.execute(Some(&alias("dog")), "r1").await;

        // then (期待する結果):
        assert!(matches!(reply, ServerMessage::RequestAcceptOk { ok: true, .. }));
        let saved = ctx.store.last_saved().await.unwrap();
        assert!(saved.are_contacts(&alias("cat"), &alias("dog")));
    }

    #[tokio::test]
    async fn test_accept_request_by_non_recipient_fails() {
        // テスト項目: 宛先以外のエイリアス（送信者自身を含む）は承認できない
        // given (前提条件):
        let ctx = TestContext::new().await;
        seed_request(&ctx, "r1", "cat", "dog").await;
        let usecase = AcceptRequestUseCase::new(ctx.repository.clone(), ctx.connections.clone());

        // when (操作):
        let by_sender = usecase.execute(Some(&alias("cat")), "r1").await;
        let by_stranger = usecase.execute(Some(&alias("fox")), "r1").await;

        // then (期待する結果):
        assert_eq!(by_sender, failure(FailureReason::NotFound));
        assert_eq!(by_stranger, failure(FailureReason::NotFound));
        assert_eq!(ctx.repository.pending_for(&alias("dog")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_accept_request_twice_fails() {
        // テスト項目: 承認済みのリクエストは再度承認できない
        // given (前提条件):
        let ctx = TestContext::new().await;
        seed_request(&ctx, "r1", "cat", "dog").await;
        let usecase = AcceptRequestUseCase::new(ctx.repository.clone(), ctx.connections.clone());
        usecase.execute(Some(&alias("dog")), "r1").await;

        // when (操作):
        let reply = usecase.execute(Some(&alias("dog")), "r1").await;

        // then (期待する結果):
        assert_eq!(reply, failure(FailureReason::NotFound));
    }

    #[tokio::test]
    async fn test_accept_request_invalid_input_fails() {
        // テスト項目: 空の ID・未登録の接続は bad_request
        // given (前提条件):
        let ctx = TestContext::new().await;
        let usecase = AcceptRequestUseCase::new(ctx.repository.clone(), ctx.connections.clone());

        // when (操作):
        let empty_id = usecase.execute(Some(&alias("dog")), "").await;
        let unregistered = usecase.execute(None, "r1").await;

        // then (期待する結果):
        assert_eq!(empty_id, failure(FailureReason::BadRequest));
        assert_eq!(unregistered, failure(FailureReason::BadRequest));
    }
}
