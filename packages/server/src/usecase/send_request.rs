//! UseCase: 連絡先リクエスト送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendRequestUseCase::execute() メソッド
//! - pending リクエストの作成と、受信者の全接続への request_received 通知
//!
//! ### なぜこのテストが必要か
//! - 同じペアの間に pending が 1 件しか存在しないことを保証
//! - 失敗時には何も保存・通知されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：ID 指定あり・なし（サーバーで生成）
//! - 異常系：未登録、自分宛て、既に連絡先、既に pending（逆方向も含む）
//! - エッジケース：受信者がオフライン（保存のみ行われ、bootstrap で受け取る）

use std::sync::Arc;

use crate::{
    domain::{Alias, ContactError, ContactRepository, RequestIdFactory, Timestamp},
    infrastructure::{
        dto::websocket::{ContactRequestDto, FailureReason, ServerMessage},
        registry::ConnectionRegistry,
    },
};

use super::{parse_alias, parse_request_id, require_alias};

/// 連絡先リクエスト送信のユースケース
pub struct SendRequestUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ContactRepository>,
    /// エイリアスごとの接続
    connections: Arc<ConnectionRegistry>,
}

impl SendRequestUseCase {
    /// 新しい SendRequestUseCase を作成
    pub fn new(repository: Arc<dyn ContactRepository>, connections: Arc<ConnectionRegistry>) -> Self {
        Self {
            repository,
            connections,
        }
    }

    /// リクエスト送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 要求元の接続に登録されたエイリアス
    /// * `to` - 相手のエイリアス（未検証）
    /// * `request_id` - クライアント指定の ID。省略・空文字ならサーバーで生成する
    ///
    /// # Returns
    ///
    /// 要求元に返す `request_sent`
    pub async fn execute(
        &self,
        from: Option<&Alias>,
        to: &str,
        request_id: Option<String>,
    ) -> ServerMessage {
        match self.send(from, to, request_id).await {
            Ok((id, to)) => ServerMessage::RequestSent {
                ok: true,
                request_id: Some(id),
                to: Some(to),
                reason: None,
            },
            Err(e) => {
                tracing::info!("request_send rejected: {}", e);
                ServerMessage::RequestSent {
                    ok: false,
                    request_id: None,
                    to: None,
                    reason: Some(FailureReason::from(&e)),
                }
            }
        }
    }

    async fn send(
        &self,
        from: Option<&Alias>,
        to: &str,
        request_id: Option<String>,
    ) -> Result<(String, String), ContactError> {
        let from = require_alias(from)?.clone();
        let to = parse_alias(to)?;
        let id = match request_id.as_deref() {
            None | Some("") => RequestIdFactory::generate(),
            Some(raw) => parse_request_id(raw)?,
        };

        // 1. 永続化（完了するまで通知しない）
        let request = self
            .repository
            .send_request(from, to, id, Timestamp::now())
            .await?;
        tracing::info!(
            "REQUEST {} '{}' -> '{}'",
            request.id,
            request.from,
            request.to
        );

        // 2. 受信者の全接続に通知
        self.connections
            .push(
                &request.to,
                &ServerMessage::RequestReceived {
                    request: ContactRequestDto::from(&request),
                },
            )
            .await;

        Ok((request.id.into_string(), request.to.into_string()))
    }
}
