//! プロフィール一括解決
//!
//! ディレクトリの `in` 検索は 1 回あたり ID_BATCH_LIMIT 件までという
//! 制約があるため、ID リストをチャンクに分割して問い合わせ、結果を
//! マージします。

use std::collections::HashMap;

use crate::domain::{ID_BATCH_LIMIT, UserDirectory, UserId, UserProfile};

use super::error::ChatError;

/// Resolve a set of user ids to profiles, chunking directory lookups at
/// the batch limit. Duplicate ids are resolved once; unknown ids are
/// simply absent from the result map.
pub async fn load_profiles(
    directory: &dyn UserDirectory,
    ids: &[UserId],
) -> Result<HashMap<UserId, UserProfile>, ChatError> {
    let mut unique: Vec<UserId> = Vec::new();
    for id in ids {
        if !unique.contains(id) {
            unique.push(id.clone());
        }
    }

    let mut profiles = HashMap::with_capacity(unique.len());
    for chunk in unique.chunks(ID_BATCH_LIMIT) {
        for profile in directory.find_by_ids(chunk).await? {
            profiles.insert(profile.id.clone(), profile);
        }
    }
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::UserRole, infrastructure::repository::InMemoryUserDirectory};

    fn profile(id: &str) -> UserProfile {
        UserProfile::new(
            UserId::new(id.to_string()).unwrap(),
            format!("User {id}"),
            UserRole::Student,
        )
    }

    #[tokio::test]
    async fn test_load_profiles_chunks_large_id_lists() {
        // テスト項目: バッチ上限（10 件）を超える ID リストも分割して全件解決できる
        // given (前提条件): 25 人のユーザー
        let profiles: Vec<UserProfile> = (0..25).map(|i| profile(&format!("stu-{i:02}"))).collect();
        let directory = InMemoryUserDirectory::new(profiles);
        let ids: Vec<UserId> = (0..25)
            .map(|i| UserId::new(format!("stu-{i:02}")).unwrap())
            .collect();

        // when (操作):
        let resolved = load_profiles(&directory, &ids).await.unwrap();

        // then (期待する結果):
        assert_eq!(resolved.len(), 25);
    }

    #[tokio::test]
    async fn test_load_profiles_dedupes_ids() {
        // テスト項目: 重複 ID は 1 回だけ解決される
        // given (前提条件):
        let directory = InMemoryUserDirectory::new(vec![profile("alice")]);
        let alice = UserId::new("alice".to_string()).unwrap();
        let ids = vec![alice.clone(), alice.clone(), alice.clone()];

        // when (操作):
        let resolved = load_profiles(&directory, &ids).await.unwrap();

        // then (期待する結果):
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains_key(&alice));
    }

    #[tokio::test]
    async fn test_load_profiles_skips_unknown_ids() {
        // テスト項目: 未登録 ID は結果に含まれない
        // given (前提条件):
        let directory = InMemoryUserDirectory::new(vec![profile("alice")]);
        let ids = vec![
            UserId::new("alice".to_string()).unwrap(),
            UserId::new("mallory".to_string()).unwrap(),
        ];

        // when (操作):
        let resolved = load_profiles(&directory, &ids).await.unwrap();

        // then (期待する結果):
        assert_eq!(resolved.len(), 1);
    }
}
