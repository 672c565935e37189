//! UseCase: ルーム内中継処理
//!
//! `message` / `typing` / `left` のフレームは中身を解釈せず、
//! 受け取った文字列のまま同じルームの他のメンバーへ転送します。

use std::sync::Arc;

use crate::{infrastructure::registry::RoomRegistry, ui::state::ConnectionState};

/// ルーム内中継のユースケース
pub struct RelayPayloadUseCase {
    rooms: Arc<RoomRegistry>,
}

impl RelayPayloadUseCase {
    pub fn new(rooms: Arc<RoomRegistry>) -> Self {
        Self { rooms }
    }

    /// フレームを中継し、届いたメンバー数を返す
    ///
    /// ルームに参加していない接続からのフレームは破棄する。
    pub async fn execute(&self, connection: &ConnectionState, frame: &str) -> usize {
        let Some(room) = connection.room.as_ref() else {
            tracing::debug!(
                "Dropping room payload from {}: not in a room",
                connection.handle.id
            );
            return 0;
        };
        self.rooms
            .broadcast(room, &connection.handle.id, frame)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::{
        JoinRoomUseCase,
        test_support::{TestContext, unregistered_connection},
    };

    #[tokio::test]
    async fn test_relay_reaches_other_members_verbatim() {
        // テスト項目: フレームは送信者以外のメンバーへそのまま届く
        // given (前提条件):
        let ctx = TestContext::new().await;
        let join = JoinRoomUseCase::new(ctx.rooms.clone());
        let usecase = RelayPayloadUseCase::new(ctx.rooms.clone());
        let (mut cat, mut cat_rx) = unregistered_connection();
        let (mut dog, mut dog_rx) = unregistered_connection();
        let (mut owl, mut owl_rx) = unregistered_connection();
        join.execute(&mut cat, "cat_dog".to_string()).await.unwrap();
        join.execute(&mut dog, "cat_dog".to_string()).await.unwrap();
        join.execute(&mut owl, "cat_owl".to_string()).await.unwrap();
        let frame = r#"{"type":"message","payload":{"from":"cat","body":"hi","extra":[1,2]}}"#;

        // when (操作):
        let reached = usecase.execute(&cat, frame).await;

        // then (期待する結果):
        assert_eq!(reached, 1);
        assert_eq!(dog_rx.try_recv().unwrap(), frame);
        assert!(cat_rx.try_recv().is_err());
        assert!(owl_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_without_room_is_dropped() {
        // テスト項目: ルーム未参加の接続からのフレームはどこにも届かない
        // given (前提条件):
        let ctx = TestContext::new().await;
        let usecase = RelayPayloadUseCase::new(ctx.rooms.clone());
        let (connection, _rx) = unregistered_connection();

        // when (操作):
        let reached = usecase
            .execute(&connection, r#"{"type":"typing"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(reached, 0);
    }
}
