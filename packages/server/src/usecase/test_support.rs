//! UseCase テスト用のヘルパー

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
    domain::Alias,
    infrastructure::{
        registry::{ConnectionHandle, ConnectionRegistry, RoomRegistry},
        repository::StoredContactRepository,
        store::InMemoryContactStore,
    },
    ui::state::ConnectionState,
};

/// テスト用の依存関係一式
pub(crate) struct TestContext {
    pub store: Arc<InMemoryContactStore>,
    pub repository: Arc<StoredContactRepository>,
    pub connections: Arc<ConnectionRegistry>,
    pub rooms: Arc<RoomRegistry>,
}

impl TestContext {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryContactStore::new());
        let repository = Arc::new(StoredContactRepository::open(store.clone()).await);
        Self {
            store,
            repository,
            connections: Arc::new(ConnectionRegistry::new()),
            rooms: Arc::new(RoomRegistry::new()),
        }
    }

    /// エイリアス付きの接続を作成し、ConnectionRegistry に登録する
    pub async fn connect(&self, name: &str) -> (ConnectionState, UnboundedReceiver<String>) {
        let (mut state, rx) = unregistered_connection();
        let alias = alias(name);
        self.connections.register(alias.clone(), &state.handle).await;
        state.alias = Some(alias);
        (state, rx)
    }
}

/// 未登録の接続を作成
pub(crate) fn unregistered_connection() -> (ConnectionState, UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ConnectionState::new(ConnectionHandle::new(tx)), rx)
}

pub(crate) fn alias(s: &str) -> Alias {
    Alias::new(s.to_string()).unwrap()
}

/// 受信済みのフレームを全て JSON として取り出す
pub(crate) fn drain(rx: &mut UnboundedReceiver<String>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}

/// フレームの type 一覧
pub(crate) fn types(frames: &[Value]) -> Vec<&str> {
    frames
        .iter()
        .map(|f| f["type"].as_str().unwrap_or_default())
        .collect()
}
