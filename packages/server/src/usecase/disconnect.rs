//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - 切断された接続をエイリアス・ルームの両レジストリから取り除く処理
//!
//! ### なぜこのテストが必要か
//! - 同じエイリアスの他の接続には影響しないことを保証
//! - 切断しても連絡先・pending は残る（永続データは触らない）ことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：最後の接続の切断、複数接続のうち 1 つの切断
//! - エッジケース：未登録・ルーム未参加の接続の切断

use std::sync::Arc;

use crate::{
    domain::{Alias, RoomId},
    infrastructure::registry::{ConnectionRegistry, RoomRegistry},
    ui::state::ConnectionState,
};

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// 登録されていたエイリアスと、その残りの接続数
    pub alias: Option<(Alias, usize)>,
    /// 参加していたルームと、その残りのメンバー数
    pub room: Option<(RoomId, usize)>,
}

/// 切断処理のユースケース
pub struct DisconnectUseCase {
    /// エイリアスごとの接続
    connections: Arc<ConnectionRegistry>,
    /// ルームごとの接続
    rooms: Arc<RoomRegistry>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(connections: Arc<ConnectionRegistry>, rooms: Arc<RoomRegistry>) -> Self {
        Self { connections, rooms }
    }

    /// 切断処理を実行
    ///
    /// 接続状態は消費される。
    pub async fn execute(&self, connection: ConnectionState) -> DisconnectOutcome {
        let id = connection.handle.id;

        let alias = match connection.alias {
            Some(alias) => {
                let remaining = self.connections.unregister(&alias, &id).await;
                Some((alias, remaining))
            }
            None => None,
        };
        let room = match connection.room {
            Some(room) => {
                let remaining = self.rooms.leave(&id, &room).await;
                Some((room, remaining))
            }
            None => None,
        };

        match &alias {
            Some((alias, remaining)) => tracing::info!(
                "DISCONNECT {} '{}' (remaining connections: {})",
                id,
                alias,
                remaining
            ),
            None => tracing::info!("DISCONNECT {} (unregistered)", id),
        }

        DisconnectOutcome { alias, room }
    }
}
