//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層（WebSocket のディスパッチャ）から呼び出され、Domain 層とレジストリを操作します。
//!
//! 各ユースケースは要求元の接続に返す応答（`ServerMessage`）を返し、
//! 他のエイリアスへの通知は永続化が完了した後に自分で配信します。

pub mod accept_request;
pub mod delete_contact;
pub mod disconnect;
pub mod join_room;
pub mod register_alias;
pub mod reject_request;
pub mod relay_payload;
pub mod send_request;

#[cfg(test)]
pub(crate) mod test_support;

pub use accept_request::AcceptRequestUseCase;
pub use delete_contact::DeleteContactUseCase;
pub use disconnect::{DisconnectOutcome, DisconnectUseCase};
pub use join_room::JoinRoomUseCase;
pub use register_alias::RegisterAliasUseCase;
pub use reject_request::RejectRequestUseCase;
pub use relay_payload::RelayPayloadUseCase;
pub use send_request::SendRequestUseCase;

use crate::domain::{Alias, ContactError, RequestId, ValueObjectError};

/// 要求元の接続に登録済みのエイリアスを取り出す（未登録ならエラー）
fn require_alias(alias: Option<&Alias>) -> Result<&Alias, ContactError> {
    alias.ok_or(ContactError::InvalidInput(ValueObjectError::AliasEmpty))
}

/// クライアントから受け取った相手エイリアスを検証
fn parse_alias(raw: &str) -> Result<Alias, ContactError> {
    Ok(Alias::new(raw.to_string())?)
}

/// クライアントから受け取ったリクエスト ID を検証
fn parse_request_id(raw: &str) -> Result<RequestId, ContactError> {
    Ok(RequestId::new(raw.to_string())?)
}
