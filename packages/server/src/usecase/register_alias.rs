//! UseCase: エイリアス登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterAliasUseCase::execute() メソッド
//! - 接続をエイリアスに紐付け、登録直後のスナップショット（bootstrap）を構築する処理
//!
//! ### なぜこのテストが必要か
//! - 同じエイリアスで複数の接続（複数タブ・端末）を持てることを保証
//! - 再接続したクライアントが連絡先と未処理のリクエストを受け取れることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規登録、連絡先・pending 付きの bootstrap
//! - 異常系：空のエイリアス
//! - エッジケース：同じ接続で別のエイリアスに登録し直す

use std::sync::Arc;

use crate::{
    domain::{Alias, ContactRepository, ValueObjectError},
    infrastructure::{
        dto::websocket::{ContactRequestDto, ServerMessage},
        registry::ConnectionRegistry,
    },
    ui::state::ConnectionState,
};

/// エイリアス登録のユースケース
pub struct RegisterAliasUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ContactRepository>,
    /// エイリアスごとの接続
    connections: Arc<ConnectionRegistry>,
}

impl RegisterAliasUseCase {
    /// 新しい RegisterAliasUseCase を作成
    pub fn new(repository: Arc<dyn ContactRepository>, connections: Arc<ConnectionRegistry>) -> Self {
        Self {
            repository,
            connections,
        }
    }

    /// エイリアス登録を実行
    ///
    /// `registered` と `bootstrap` は ConnectionRegistry のロック内でこの接続に
    /// 直接積まれる。そのため、他の接続からの通知が挨拶より先に届くことはなく、
    /// スナップショット構築後に作られたリクエストも取りこぼさない。
    ///
    /// # Arguments
    ///
    /// * `connection` - 登録する接続の状態
    /// * `raw_alias` - クライアントが送ってきたエイリアス（前後の空白は除去される）
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 登録後のこのエイリアスの接続数
    /// * `Err(ValueObjectError)` - エイリアスが不正（副作用なし）
    pub async fn execute(
        &self,
        connection: &mut ConnectionState,
        raw_alias: String,
    ) -> Result<usize, ValueObjectError> {
        let alias = Alias::new(raw_alias)?;

        // 1. 別のエイリアスで登録済みなら、先に外す
        if let Some(previous) = connection.alias.take()
            && previous != alias
        {
            self.connections
                .unregister(&previous, &connection.handle.id)
                .await;
            tracing::info!(
                "Connection {} moved from alias '{}' to '{}'",
                connection.handle.id,
                previous,
                alias
            );
        }

        // 2. registered と bootstrap を積んでから、エイリアスの接続集合に追加
        let greeting = async {
            vec![
                ServerMessage::Registered {
                    alias: alias.as_str().to_string(),
                },
                self.build_bootstrap(&alias).await,
            ]
        };
        let count = self
            .connections
            .register_with(alias.clone(), &connection.handle, greeting)
            .await;
        tracing::info!("REGISTER '{}' (connections: {})", alias, count);
        connection.alias = Some(alias);

        Ok(count)
    }

    /// 連絡先と自分宛ての pending リクエストのスナップショットを構築
    pub async fn build_bootstrap(&self, alias: &Alias) -> ServerMessage {
        let contacts = self
            .repository
            .contacts_of(alias)
            .await
            .into_iter()
            .map(Alias::into_string)
            .collect();
        let pending_requests = self
            .repository
            .pending_for(alias)
            .await
            .iter()
            .map(ContactRequestDto::from)
            .collect();

        ServerMessage::Bootstrap {
            alias: alias.as_str().to_string(),
            contacts,
            pending_requests,
        }
    }
}
