//! UseCase: 連絡先リクエスト拒否処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RejectRequestUseCase::execute() メソッド
//! - pending の削除と、送信者への request_rejected 通知
//!
//! ### なぜこのテストが必要か
//! - 拒否後に同じペアで再度リクエストできることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：拒否、拒否後の再送信
//! - 異常系：存在しない ID、未登録

use std::sync::Arc;

use crate::{
    domain::{Alias, ContactError, ContactRepository, ContactRequest, Timestamp},
    infrastructure::{
        dto::websocket::{FailureReason, ServerMessage},
        registry::ConnectionRegistry,
    },
};

use super::{parse_request_id, require_alias};

/// 連絡先リクエスト拒否のユースケース
pub struct RejectRequestUseCase {
    repository: Arc<dyn ContactRepository>,
    connections: Arc<ConnectionRegistry>,
}

impl RejectRequestUseCase {
    pub fn new(repository: Arc<dyn ContactRepository>, connections: Arc<ConnectionRegistry>) -> Self {
        Self {
            repository,
            connections,
        }
    }

    /// リクエスト拒否を実行し、要求元に返す `request_reject_ok` を返す
    pub async fn execute(&self, rejector: Option<&Alias>, request_id: &str) -> ServerMessage {
        match self.reject(rejector, request_id).await {
            Ok(request) => ServerMessage::RequestRejectOk {
                ok: true,
                request_id: Some(request.id.into_string()),
                reason: None,
            },
            Err(e) => {
                tracing::info!("request_reject rejected: {}", e);
                ServerMessage::RequestRejectOk {
                    ok: false,
                    request_id: None,
                    reason: Some(FailureReason::from(&e)),
                }
            }
        }
    }

    async fn reject(
        &self,
        rejector: Option<&Alias>,
        request_id: &str,
    ) -> Result<ContactRequest, ContactError> {
        let rejector = require_alias(rejector)?;
        let id = parse_request_id(request_id)?;

        let request = self
            .repository
            .reject_request(rejector, &id, Timestamp::now())
            .await?;
        tracing::info!("REJECT {} '{}' -> '{}'", request.id, request.from, request.to);

        self.connections
            .push(
                &request.from,
                &ServerMessage::RequestRejected {
                    by: request.to.as_str().to_string(),
                    request_id: request.id.as_str().to_string(),
                },
            )
            .await;

        Ok(request)
    }
}
