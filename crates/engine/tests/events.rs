//! Integration tests for event application: XP awards, leveling, streaks,
//! validation, and per-user serialization.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Days, Utc};
use studyforge_core::error::CoreError;
use studyforge_core::xp::{EventKind, LearningEvent};
use studyforge_engine::service::QuizReport;
use studyforge_engine::EngineError;

// ---------------------------------------------------------------------------
// XP awards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn explanation_awards_ten_xp() {
    let (_store, service) = common::service();

    let result = service.report_explanation(1, None, None).await.unwrap();

    assert_eq!(result.event, EventKind::Explanation);
    assert_eq!(result.xp_earned, 10);
    assert_eq!(result.total_xp, 10);
    assert_eq!(result.level, 1);
    assert!(!result.leveled_up);
}

#[tokio::test]
async fn passed_quiz_awards_thirty_xp() {
    let (_store, service) = common::service();

    let result = service
        .report_quiz_completion(
            1,
            QuizReport {
                passed: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result.xp_earned, 30);
}

#[tokio::test]
async fn failed_quiz_awards_twenty_xp() {
    let (_store, service) = common::service();

    let result = service
        .report_quiz_completion(1, QuizReport::default())
        .await
        .unwrap();

    assert_eq!(result.xp_earned, 20);
}

#[tokio::test]
async fn five_flashcards_award_ten_xp() {
    let (_store, service) = common::service();

    let result = service.report_flashcards_studied(1, 5, 0).await.unwrap();

    assert_eq!(result.xp_earned, 10);
}

#[tokio::test]
async fn focus_session_awards_caller_xp_and_tracks_minutes() {
    let (_store, service) = common::service();

    let result = service.report_focus_session(1, 25, 15).await.unwrap();
    assert_eq!(result.xp_earned, 15);

    let stats = service.get_stats(1).await.unwrap();
    assert_eq!(stats.focus_sessions_completed, 1);
    assert_eq!(stats.total_study_time_minutes, 25);
}

// ---------------------------------------------------------------------------
// Leveling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn crossing_the_level_boundary_sets_leveled_up() {
    let (store, service) = common::service();
    store.with_stats(1, |s| s.total_xp = 95).await;

    let result = service.report_explanation(1, None, None).await.unwrap();

    assert_eq!(result.total_xp, 105);
    assert_eq!(result.level, 2);
    assert!(result.leveled_up);
}

#[tokio::test]
async fn xp_and_level_never_decrease_across_event_sequences() {
    let (_store, service) = common::service();
    let mut last_xp = 0;
    let mut last_level = 1;

    let events = [
        LearningEvent::Explanation {
            topic: None,
            subject: None,
        },
        LearningEvent::QuizCompleted {
            passed: true,
            topic: None,
            subject: None,
            score: None,
            total_questions: None,
            correct_answers: None,
        },
        LearningEvent::FlashcardsStudied {
            card_count: 12,
            mastered_count: 3,
        },
        LearningEvent::FocusSession {
            duration_minutes: 30,
            xp_to_award: 20,
        },
        LearningEvent::QuizCompleted {
            passed: false,
            topic: None,
            subject: None,
            score: None,
            total_questions: None,
            correct_answers: None,
        },
    ];
    for event in events {
        let result = service.apply_event(7, event).await.unwrap();
        assert!(result.total_xp >= last_xp);
        assert!(result.level >= last_level);
        last_xp = result.total_xp;
        last_level = result.level;
    }
}

// ---------------------------------------------------------------------------
// Streaks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn consecutive_day_extends_streak_and_same_day_repeat_does_not() {
    let (store, service) = common::service();
    let yesterday = Utc::now().date_naive().checked_sub_days(Days::new(1)).unwrap();
    store
        .with_stats(1, |s| {
            s.last_activity_date = Some(yesterday);
            s.current_streak = 5;
            s.longest_streak = 5;
        })
        .await;

    service.report_explanation(1, None, None).await.unwrap();
    let stats = service.get_stats(1).await.unwrap();
    assert_eq!(stats.current_streak, 6);
    assert_eq!(stats.longest_streak, 6);

    // Second event on the same day leaves the count alone.
    service.report_explanation(1, None, None).await.unwrap();
    let stats = service.get_stats(1).await.unwrap();
    assert_eq!(stats.current_streak, 6);
}

#[tokio::test]
async fn long_gap_resets_streak_to_one() {
    let (store, service) = common::service();
    let ten_days_ago = Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(10))
        .unwrap();
    store
        .with_stats(1, |s| {
            s.last_activity_date = Some(ten_days_ago);
            s.current_streak = 5;
            s.longest_streak = 8;
        })
        .await;

    service.report_explanation(1, None, None).await.unwrap();

    let stats = service.get_stats(1).await.unwrap();
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.longest_streak, 8);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn negative_card_count_is_an_invalid_event() {
    let (_store, service) = common::service();

    let err = service.report_flashcards_studied(1, -3, 0).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::InvalidEvent(_)));

    // Nothing was recorded.
    let stats = service.get_stats(1).await.unwrap();
    assert_eq!(stats.total_xp, 0);
    assert_eq!(stats.flashcards_studied, 0);
}

#[tokio::test]
async fn out_of_range_focus_xp_is_a_validation_error() {
    let (_store, service) = common::service();

    let err = service.report_focus_session(1, 30, 90).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

#[tokio::test]
async fn out_of_range_quiz_score_is_a_validation_error() {
    let (_store, service) = common::service();

    let err = service
        .report_quiz_completion(
            1,
            QuizReport {
                passed: true,
                score: Some(140.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Progress side effect
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scored_quiz_merges_topic_progress() {
    let (store, service) = common::service();

    service
        .report_quiz_completion(
            1,
            QuizReport {
                passed: true,
                topic: Some("Derivatives".to_string()),
                subject: Some("Math".to_string()),
                score: Some(80.0),
                total_questions: Some(10),
                correct_answers: Some(8),
            },
        )
        .await
        .unwrap();

    use studyforge_engine::store::GamificationStore;
    let progress = store.user_progress(1).await.unwrap();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].topic, "Derivatives");
    assert_eq!(progress[0].quiz_completed, 1);
    assert_eq!(progress[0].total_questions, 10);
    assert_eq!(progress[0].correct_answers, 8);
    assert!((progress[0].average_score - 80.0).abs() < 1e-9);
}

#[tokio::test]
async fn repeat_quizzes_recompute_average_from_totals() {
    let (store, service) = common::service();

    for (total, correct) in [(10, 8), (10, 4)] {
        service
            .report_quiz_completion(
                1,
                QuizReport {
                    passed: true,
                    topic: Some("Derivatives".to_string()),
                    total_questions: Some(total),
                    correct_answers: Some(correct),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    use studyforge_engine::store::GamificationStore;
    let progress = store.user_progress(1).await.unwrap();
    assert_eq!(progress[0].quiz_completed, 2);
    assert!((progress[0].average_score - 60.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_events_for_one_user_lose_no_updates() {
    let (_store, service) = common::service();
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .report_quiz_completion(
                    42,
                    QuizReport {
                        passed: true,
                        ..Default::default()
                    },
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stats = service.get_stats(42).await.unwrap();
    assert_eq!(stats.quizzes_completed, 8);
    assert_eq!(stats.total_xp, 8 * 30);
}

#[tokio::test]
async fn events_for_different_users_are_independent() {
    let (_store, service) = common::service();
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for user_id in 1..=4 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.report_explanation(user_id, None, None).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for user_id in 1..=4 {
        let stats = service.get_stats(user_id).await.unwrap();
        assert_eq!(stats.total_xp, 10);
    }
}
