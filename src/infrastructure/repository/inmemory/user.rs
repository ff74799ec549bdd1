//! InMemory User Directory 実装
//!
//! ID プロバイダのスタブ。バッチ検索にはドキュメントストアと同じ
//! 上限（ID_BATCH_LIMIT 件）を課すため、呼び出し側のチャンク処理が
//! テストで検証できます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ID_BATCH_LIMIT, RepositoryError, UserDirectory, UserId, UserProfile};

/// インメモリ User Directory 実装
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserDirectory {
    /// プロフィール一覧からディレクトリを作成
    pub fn new(profiles: Vec<UserProfile>) -> Self {
        let users = profiles
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect::<HashMap<_, _>>();
        Self {
            users: Mutex::new(users),
        }
    }

    /// プロフィールを追加（テスト・シード用）
    pub async fn insert(&self, profile: UserProfile) {
        let mut users = self.users.lock().await;
        users.insert(profile.id.clone(), profile);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users.get(user_id).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<UserProfile>, RepositoryError> {
        if ids.len() > ID_BATCH_LIMIT {
            return Err(RepositoryError::BatchTooLarge {
                max: ID_BATCH_LIMIT,
                actual: ids.len(),
            });
        }
        let users = self.users.lock().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}
