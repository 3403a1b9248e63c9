//! 积分增量计算
//!
//! - INSERT: 新建即点赞 +1，新建即点踩 -1
//! - REMOVE: 删除一个赞 -1，删除一个踩 +1
//! - MODIFY: 踩变赞 +2，赞变踩 -2，状态未变 0

use likes_shared::events::LikeChange;

/// 计算一次变更带来的积分增量
pub fn point_delta(change: &LikeChange) -> i32 {
    match change {
        LikeChange::Created { new } => {
            if new.liked {
                1
            } else {
                -1
            }
        }
        LikeChange::Removed { old } => {
            if old.liked {
                -1
            } else {
                1
            }
        }
        LikeChange::Modified { old, new } => transition_points(old.liked, new.liked),
    }
}

/// MODIFY 时 liked 由 old 跳变到 new 的积分
pub fn transition_points(old_liked: bool, new_liked: bool) -> i32 {
    match (old_liked, new_liked) {
        (false, true) => 2,
        (true, false) => -2,
        (false, false) | (true, true) => 0,
    }
}
