//! Persistence shape acceptance: partial payloads default field by field,
//! corrupt payloads start fresh, and the serialized form round-trips.

use akq_engine::pack::PackConfig;
use akq_engine::{Pack, QuestionType, QuizItem, UserProgress, session};
use chrono::{NaiveDate, NaiveDateTime};
use smallvec::smallvec;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn empty_object_loads_all_defaults() {
    init_logs();
    let progress = UserProgress::from_json("{}");
    assert_eq!(progress, UserProgress::default());
    assert_eq!(progress.coins, 10);
    assert_eq!(progress.unlocked_themes, vec!["forest".to_string()]);
    assert_eq!(progress.unlocked_packs.len(), 6);
}

#[test]
fn older_partial_payload_is_forward_migrated() {
    init_logs();
    // A blob written before streaks, dailies, and pack stats existed.
    let progress = UserProgress::from_json(
        r#"{
            "coins": 34,
            "xp": 260,
            "completedPacks": ["mammals"],
            "badges": ["first-quiz"]
        }"#,
    );
    assert_eq!(progress.coins, 34);
    assert_eq!(progress.level(), 3);
    assert!(progress.is_pack_completed("mammals"));
    assert!(progress.has_badge("first-quiz"));
    assert_eq!(progress.current_streak, 0);
    assert!(progress.last_played_date.is_none());
    assert!(progress.daily_challenge_history.is_empty());
    assert!(progress.pack_stats.is_empty());
    assert_eq!(progress.lifetime_stats.total_questions_answered, 0);
}

#[test]
fn nested_lifetime_stats_merge_field_by_field() {
    init_logs();
    let progress = UserProgress::from_json(
        r#"{"lifetimeStats": {"totalQuestionsAnswered": 40, "totalCorrectAnswers": 31}}"#,
    );
    assert_eq!(progress.lifetime_stats.total_questions_answered, 40);
    assert_eq!(progress.lifetime_stats.total_correct_answers, 31);
    assert_eq!(progress.lifetime_stats.total_score, 0);
    assert!(progress.lifetime_stats.fastest_correct_answer_ms.is_none());
    assert_eq!(progress.lifetime_stats.perfect_games, 0);
}

#[test]
fn corrupt_payload_never_propagates_an_error() {
    init_logs();
    for garbage in ["", "not json", "[1,2,3]", "{\"coins\": \"ten\"}"] {
        let progress = UserProgress::from_json(garbage);
        assert_eq!(progress, UserProgress::default(), "payload: {garbage:?}");
    }
}

#[test]
fn played_state_round_trips_exactly() {
    init_logs();
    let pack = Pack::from_config_and_items(
        PackConfig {
            id: "mammals".to_string(),
            name: "Mammals".to_string(),
            description: None,
            icon: None,
            unlock_cost: 0,
        },
        (0..3)
            .map(|n| QuizItem {
                id: format!("mammals-{n}"),
                name: format!("mammals-{n}"),
                fact: String::new(),
                question: "?".to_string(),
                question_type: QuestionType::MultipleChoice,
                options: smallvec!["A".to_string(), "B".to_string()],
                answer: "A".to_string(),
                media: None,
            })
            .collect(),
    )
    .unwrap();

    let mut progress = UserProgress::default();
    let now = noon(2026, 8, 4);
    session::start_pack(&mut progress, &pack, now);
    session::answer(&mut progress, &pack, "A", Some(2_500), now);
    session::answer(&mut progress, &pack, "B", Some(4_000), now);
    session::answer(&mut progress, &pack, "A", None, now);

    let json = progress.to_json().unwrap();
    let reloaded = UserProgress::from_json(&json);
    assert_eq!(reloaded, progress);

    // Day-granularity dates persist as plain ISO dates.
    assert!(json.contains("\"lastPlayedDate\":\"2026-08-04\""));
    assert!(json.contains("\"lifetimeStats\""));
}

#[test]
fn storage_key_is_stable() {
    assert_eq!(akq_engine::STORAGE_KEY, "animalQuizProgress");
}
