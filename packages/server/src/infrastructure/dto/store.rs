//! On-disk document of the contact book.
//!
//! ```text
//! JSON → ContactBookDocument (DTO) → reconcile → ContactBook (ドメインモデル)
//! ```
//!
//! 読み込んだ内容は信用せず、ドメインの不変条件を満たすように正規化してから
//! `ContactBook` に変換します。修正した件数は呼び出し側でログに出力します。

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{Alias, ContactBook, ContactRequest, RequestId, Timestamp};

use super::websocket::ContactRequestDto;

/// 永続化ドキュメント全体
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBookDocument {
    /// 受信者エイリアス → pending リクエスト（古い順）
    #[serde(default)]
    pub requests_by_to: BTreeMap<String, Vec<ContactRequestDto>>,
    /// エイリアス → 連絡先エイリアス（追加順）
    #[serde(default)]
    pub contacts_by_alias: BTreeMap<String, Vec<String>>,
}

/// 正規化の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub book: ContactBook,
    /// 修正（破棄・補完）した項目の数
    pub repairs: usize,
}

impl ContactBookDocument {
    /// ドメインモデルからドキュメントを作成
    pub fn from_book(book: &ContactBook) -> Self {
        let requests_by_to = book
            .requests_by_to()
            .iter()
            .map(|(to, requests)| {
                (
                    to.as_str().to_string(),
                    requests.iter().map(ContactRequestDto::from).collect(),
                )
            })
            .collect();
        let contacts_by_alias = book
            .contacts_by_alias()
            .iter()
            .map(|(alias, contacts)| {
                (
                    alias.as_str().to_string(),
                    contacts.iter().map(|c| c.as_str().to_string()).collect(),
                )
            })
            .collect();

        Self {
            requests_by_to,
            contacts_by_alias,
        }
    }

    /// ドキュメントを正規化してドメインモデルに変換
    ///
    /// 1. 連絡先: 不正なエイリアス・自己参照・重複を破棄し、片側だけのエッジは補完する
    /// 2. リクエスト: pending 以外、キーと `to` の不一致、連絡先同士、ペア重複を破棄する
    ///    （同じペアでは最も古いものを残す）
    pub fn reconcile(self) -> Reconciled {
        let mut book = ContactBook::new();
        let mut repairs = 0;

        // 1. 連絡先
        let mut edges: Vec<(Alias, Alias)> = Vec::new();
        for (owner, contacts) in &self.contacts_by_alias {
            let Some(owner) = normalize_alias(owner, &mut repairs) else {
                repairs += contacts.len();
                continue;
            };
            for contact in contacts {
                match normalize_alias(contact, &mut repairs) {
                    Some(contact) if contact != owner => edges.push((owner.clone(), contact)),
                    _ => repairs += 1,
                }
            }
        }

        // 保存された順序のまま各リストを再構築する
        for (owner, contact) in &edges {
            if !book.restore_contact(owner, contact) {
                // 同じリスト内の重複
                repairs += 1;
            }
        }

        // 片側だけのエッジは逆向きを末尾に補完する
        let directed: HashSet<(&Alias, &Alias)> = edges.iter().map(|(a, b)| (a, b)).collect();
        for (owner, contact) in &edges {
            if !directed.contains(&(contact, owner)) && book.restore_contact(contact, owner) {
                repairs += 1;
            }
        }

        // 2. リクエスト
        let mut requests: Vec<ContactRequest> = Vec::new();
        for (key, records) in self.requests_by_to {
            let key = normalize_alias(&key, &mut repairs);
            for record in records {
                match (key.as_ref(), to_domain_request(record, &mut repairs)) {
                    (Some(key), Some(request)) if request.to == *key => requests.push(request),
                    _ => repairs += 1,
                }
            }
        }

        // 同じペアでは古いものを優先する
        requests.sort_by_key(|r| r.created_at);
        for request in requests {
            if !book.restore_pending(request) {
                repairs += 1;
            }
        }

        Reconciled { book, repairs }
    }
}

/// トリム済みの有効なエイリアスに変換。トリムが必要だった場合も修正として数える
fn normalize_alias(raw: &str, repairs: &mut usize) -> Option<Alias> {
    let alias = Alias::new(raw.to_string()).ok()?;
    if alias.as_str() != raw {
        *repairs += 1;
    }
    Some(alias)
}

fn to_domain_request(record: ContactRequestDto, repairs: &mut usize) -> Option<ContactRequest> {
    let id = RequestId::new(record.id).ok()?;
    let from = normalize_alias(&record.from, repairs)?;
    let to = normalize_alias(&record.to, repairs)?;
    Some(ContactRequest {
        id,
        from,
        to,
        status: record.status,
        created_at: Timestamp::new(record.created_at),
        updated_at: record.updated_at.map(Timestamp::new),
    })
}
