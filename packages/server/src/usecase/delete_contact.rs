//! UseCase: 連絡先削除処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DeleteContactUseCase::execute() メソッド
//! - 双方向の連絡先削除と、両者への contact_removed 通知
//!
//! ### なぜこのテストが必要か
//! - 削除後に再度リクエストから関係を作り直せることを保証
//! - 連絡先でない相手の削除がエラーにならない（冪等）ことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：連絡先の削除、削除後の再リクエスト
//! - エッジケース：連絡先でない相手、pending だけがある相手
//! - 異常系：自分自身、未登録

use std::sync::Arc;

use crate::{
    domain::{Alias, ContactError, ContactRepository},
    infrastructure::{
        dto::websocket::{FailureReason, ServerMessage},
        registry::ConnectionRegistry,
    },
};

use super::{parse_alias, require_alias};

/// 連絡先削除のユースケース
pub struct DeleteContactUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ContactRepository>,
    /// エイリアスごとの接続
    connections: Arc<ConnectionRegistry>,
}

impl DeleteContactUseCase {
    /// 新しい DeleteContactUseCase を作成
    pub fn new(repository: Arc<dyn ContactRepository>, connections: Arc<ConnectionRegistry>) -> Self {
        Self {
            repository,
            connections,
        }
    }

    /// 連絡先削除を実行し、要求元に返す `contact_delete_ok` を返す
    pub async fn execute(&self, me: Option<&Alias>, with: &str) -> ServerMessage {
        match self.delete(me, with).await {
            Ok(other) => ServerMessage::ContactDeleteOk {
                ok: true,
                with: Some(other.into_string()),
                reason: None,
            },
            Err(e) => {
                tracing::info!("contact_delete rejected: {}", e);
                ServerMessage::ContactDeleteOk {
                    ok: false,
                    with: None,
                    reason: Some(FailureReason::from(&e)),
                }
            }
        }
    }

    async fn delete(&self, me: Option<&Alias>, with: &str) -> Result<Alias, ContactError> {
        let me = require_alias(me)?;
        let other = parse_alias(with)?;

        let removal = self.repository.delete_contact(me, &other).await?;
        tracing::info!(
            "DELETE '{}' <-> '{}' (was contact: {}, purged requests: {})",
            me,
            other,
            removal.was_contact,
            removal.purged_requests
        );

        // 両者の全接続に通知（連絡先でなかった場合も同じ）
        self.connections
            .push(
                me,
                &ServerMessage::ContactRemoved {
                    with: other.as_str().to_string(),
                },
            )
            .await;
        self.connections
            .push(
                &other,
                &ServerMessage::ContactRemoved {
                    with: me.as_str().to_string(),
                },
            )
            .await;

        Ok(other)
    }
}
