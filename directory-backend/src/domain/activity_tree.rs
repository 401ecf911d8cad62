// src/domain/activity_tree.rs

//! 活動ツリーのサブツリー解決
//!
//! 親IDから直下の子IDを引く手段 (`ActivityChildLookup`) さえあれば、
//! ストレージに依存せずに子孫を列挙できる。

use crate::error::AppResult;
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};

/// 直下の子IDを返す（ストレージ往復が発生し得る）
#[async_trait]
pub trait ActivityChildLookup: Send + Sync {
    async fn child_ids(&self, parent_id: i32) -> AppResult<Vec<i32>>;
}

/// `root_id` 自身とその全子孫のIDを返す
///
/// 順序は保証しない（集合として扱うこと）。
pub async fn collect_subtree_ids<L>(lookup: &L, root_id: i32) -> AppResult<Vec<i32>>
where
    L: ActivityChildLookup + ?Sized,
{
    let nodes = collect_subtree_depths(lookup, root_id).await?;
    Ok(nodes.into_iter().map(|(id, _)| id).collect())
}

/// `root_id` 自身と全子孫を、根からの深さ（根は 0）付きで返す
///
/// 幅優先で辿るので、深さは根からの最短距離になる。
/// 訪問済み集合を持つので、万一ツリーが循環していても停止する。
pub async fn collect_subtree_depths<L>(lookup: &L, root_id: i32) -> AppResult<Vec<(i32, i32)>>
where
    L: ActivityChildLookup + ?Sized,
{
    let mut result = Vec::new();
    let mut visited = HashSet::from([root_id]);
    let mut pending = VecDeque::from([(root_id, 0)]);

    while let Some((current, depth)) = pending.pop_front() {
        result.push((current, depth));

        for child in lookup.child_ids(current).await? {
            if visited.insert(child) {
                pending.push_back((child, depth + 1));
            }
        }
    }

    Ok(result)
}

/// 根から最も深い子孫までの距離（子が無ければ 0）
pub fn max_depth(nodes: &[(i32, i32)]) -> i32 {
    nodes.iter().map(|(_, depth)| *depth).max().unwrap_or(0)
}
