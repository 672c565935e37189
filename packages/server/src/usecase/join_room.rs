//! UseCase: ルーム参加処理
//!
//! 接続は同時に 1 つのルームにだけ参加します。新しいルームに参加すると、
//! 直前のルームからは自動的に外れます。

use std::sync::Arc;

use crate::{
    domain::{RoomId, ValueObjectError},
    infrastructure::registry::RoomRegistry,
    ui::state::ConnectionState,
};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    rooms: Arc<RoomRegistry>,
}

impl JoinRoomUseCase {
    pub fn new(rooms: Arc<RoomRegistry>) -> Self {
        Self { rooms }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 参加後のルームのメンバー数
    /// * `Err(ValueObjectError)` - ルーム ID が空または長すぎる（副作用なし）
    pub async fn execute(
        &self,
        connection: &mut ConnectionState,
        room: String,
    ) -> Result<usize, ValueObjectError> {
        let room = RoomId::new(room)?;
        let members = self
            .rooms
            .join(&connection.handle, connection.room.as_ref(), room.clone())
            .await;
        tracing::debug!(
            "JOIN {} -> room '{}' (members: {})",
            connection.handle.id,
            room,
            members
        );
        connection.room = Some(room);
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{TestContext, unregistered_connection};

    fn room(s: &str) -> RoomId {
        RoomId::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_room_success() {
        // テスト項目: ルームに参加するとメンバー数が返り、接続状態が更新される
        // given (前提条件):
        let ctx = TestContext::new().await;
        let usecase = JoinRoomUseCase::new(ctx.rooms.clone());
        let (mut first, _rx1) = unregistered_connection();
        let (mut second, _rx2) = unregistered_connection();

        // when (操作):
        usecase.execute(&mut first, "cat_dog".to_string()).await.unwrap();
        let members = usecase
            .execute(&mut second, "cat_dog".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(members, 2);
        assert_eq!(second.room, Some(room("cat_dog")));
    }

    #[tokio::test]
    async fn test_join_other_room_leaves_previous() {
        // テスト項目: 別のルームに参加すると前のルームから外れる
        // given (前提条件):
        let ctx = TestContext::new().await;
        let usecase = JoinRoomUseCase::new(ctx.rooms.clone());
        let (mut connection, _rx) = unregistered_connection();
        usecase
            .execute(&mut connection, "cat_dog".to_string())
            .await
            .unwrap();

        // when (操作):
        usecase
            .execute(&mut connection, "cat_owl".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(ctx.rooms.member_count(&room("cat_dog")).await, 0);
        assert_eq!(ctx.rooms.member_count(&room("cat_owl")).await, 1);
        assert_eq!(ctx.rooms.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_join_empty_room_is_ignored() {
        // テスト項目: 空のルーム ID では何も変わらない
        // given (前提条件):
        let ctx = TestContext::new().await;
        let usecase = JoinRoomUseCase::new(ctx.rooms.clone());
        let (mut connection, _rx) = unregistered_connection();
        usecase
            .execute(&mut connection, "cat_dog".to_string())
            .await
            .unwrap();

        // when (操作):
        let result = usecase.execute(&mut connection, String::new()).await;

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::RoomIdEmpty));
        assert_eq!(connection.room, Some(room("cat_dog")));
        assert_eq!(ctx.rooms.member_count(&room("cat_dog")).await, 1);
    }
}
