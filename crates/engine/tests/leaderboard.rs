//! Integration tests for leaderboard ranking and rank lookup.

mod common;

use studyforge_core::leaderboard::LeaderboardMetric;

#[tokio::test]
async fn total_xp_board_orders_descending() {
    let (store, service) = common::service();
    store.with_stats(1, |s| s.total_xp = 100).await;
    store.with_stats(2, |s| s.total_xp = 300).await;
    store.with_stats(3, |s| s.total_xp = 200).await;

    let board = service
        .get_leaderboard(LeaderboardMetric::TotalXp, Some(3))
        .await
        .unwrap();

    let values: Vec<i32> = board.iter().map(|e| e.value).collect();
    assert_eq!(values, [300, 200, 100]);
    let users: Vec<i64> = board.iter().map(|e| e.user_id).collect();
    assert_eq!(users, [2, 3, 1]);
    let ranks: Vec<u32> = board.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, [1, 2, 3]);
}

#[tokio::test]
async fn rank_lookup_matches_board_position() {
    let (store, service) = common::service();
    store.with_stats(1, |s| s.total_xp = 100).await;
    store.with_stats(2, |s| s.total_xp = 300).await;
    store.with_stats(3, |s| s.total_xp = 200).await;

    let rank = service
        .get_user_rank(3, LeaderboardMetric::TotalXp)
        .await
        .unwrap();
    assert_eq!(rank, Some(2));
}

#[tokio::test]
async fn unknown_user_has_no_rank() {
    let (store, service) = common::service();
    store.with_stats(1, |s| s.total_xp = 100).await;

    let rank = service
        .get_user_rank(99, LeaderboardMetric::TotalXp)
        .await
        .unwrap();
    assert_eq!(rank, None);
}

#[tokio::test]
async fn ties_break_by_insertion_order() {
    let (store, service) = common::service();
    store.with_stats(10, |s| s.weekly_xp = 40).await;
    store.with_stats(11, |s| s.weekly_xp = 40).await;
    store.with_stats(12, |s| s.weekly_xp = 70).await;

    let board = service
        .get_leaderboard(LeaderboardMetric::WeeklyXp, Some(10))
        .await
        .unwrap();

    let users: Vec<i64> = board.iter().map(|e| e.user_id).collect();
    assert_eq!(users, [12, 10, 11]);
}

#[tokio::test]
async fn limit_is_clamped_and_applied() {
    let (store, service) = common::service();
    for user_id in 1..=5 {
        store
            .with_stats(user_id, |s| s.current_streak = user_id as i32)
            .await;
    }

    let board = service
        .get_leaderboard(LeaderboardMetric::Streak, Some(2))
        .await
        .unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].value, 5);

    // Nonsensical limits fall back to at least one row.
    let board = service
        .get_leaderboard(LeaderboardMetric::Streak, Some(-7))
        .await
        .unwrap();
    assert_eq!(board.len(), 1);
}

#[tokio::test]
async fn level_board_ranks_by_level() {
    let (store, service) = common::service();
    store.with_stats(1, |s| s.level = 3).await;
    store.with_stats(2, |s| s.level = 9).await;

    let board = service
        .get_leaderboard(LeaderboardMetric::Level, None)
        .await
        .unwrap();

    assert_eq!(board[0].user_id, 2);
    assert_eq!(board[0].value, 9);
    assert_eq!(board[0].level, 9);
}
