use quiz_quest::data::load_quiz_str;
use quiz_quest::model::Quiz;
use quiz_quest::rewards::local::LocalGamification;
use quiz_quest::storage::{FileStorage, MemoryStorage, SessionStorage, StorageSlot};
use quiz_quest::{QuizSession, Step};

const QUIZ: &str = r#"
id: colors
title: Colors
difficulty: hard
questions:
  - id: primary
    prompt: Which are primary colors of light?
    options: [Red, Green, Blue, Yellow]
    correct_answer: [Red, Green, Blue]
  - id: sky
    prompt: What color is a clear sky?
    options: [Blue, Green]
    correct_answer: Blue
"#;

fn quiz() -> Quiz {
    load_quiz_str(QUIZ).unwrap()
}

#[test]
fn multi_answer_is_correct_only_for_the_exact_set() {
    let options = ["Red", "Green", "Blue", "Yellow"];

    for mask in 0_u32..16 {
        let mut session = QuizSession::new(quiz(), MemoryStorage::new(), LocalGamification::new());
        let chosen: Vec<&str> = options
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, o)| *o)
            .collect();
        for option in &chosen {
            session.handle_answer(0, option).unwrap();
        }

        let expected = chosen.len() == 3 && !chosen.contains(&"Yellow");
        assert_eq!(session.is_answer_correct(0), expected, "selection {chosen:?}");
    }
}

#[test]
fn session_survives_restart_and_reset_wipes_it() {
    let dir = tempfile::tempdir().unwrap();
    {
        let storage = FileStorage::new(dir.path()).unwrap();
        let mut session = QuizSession::new(quiz(), storage, LocalGamification::new());
        for color in ["Red", "Green", "Blue"] {
            session.handle_answer(0, color).unwrap();
        }
        assert!(matches!(session.handle_next().unwrap(), Step::Advanced(1)));
    }

    let storage = FileStorage::new(dir.path()).unwrap();
    let mut session = QuizSession::new(quiz(), storage, LocalGamification::new()).with_user("ada");
    assert_eq!(session.current_question(), 1);
    assert!(session.is_answer_correct(0));

    session.handle_answer(1, "Blue").unwrap();
    let Step::Completed(outcome) = session.handle_next().unwrap() else {
        panic!("last question should complete the quiz");
    };
    assert_eq!(outcome.result.score, 2);
    // 100 base XP + 50 perfect bonus, doubled for hard
    assert_eq!(outcome.result.xp_earned, 300);
    for slot in StorageSlot::ALL {
        assert!(session.storage().get(&slot.key("colors")).unwrap().is_some());
    }

    session.reset().unwrap();
    let storage = FileStorage::new(dir.path()).unwrap();
    for slot in StorageSlot::ALL {
        assert_eq!(storage.get(&slot.key("colors")).unwrap(), None);
    }
}

#[test]
fn completed_session_rejects_further_input() {
    let mut session = QuizSession::new(quiz(), MemoryStorage::new(), LocalGamification::new());
    session.calculate_results().unwrap();

    assert!(session.handle_answer(0, "Red").is_err());
    assert!(session.handle_next().is_err());
    assert!(session.calculate_results().is_err());
}

#[test]
fn similar_quiz_ids_keep_separate_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let with_id = |id: &str| Quiz {
        id: id.to_string(),
        ..quiz()
    };

    let mut dotted = QuizSession::new(
        with_id("intro.1"),
        FileStorage::new(dir.path()).unwrap(),
        LocalGamification::new(),
    );
    dotted.handle_answer(1, "Blue").unwrap();

    let mut underscored = QuizSession::new(
        with_id("intro_1"),
        FileStorage::new(dir.path()).unwrap(),
        LocalGamification::new(),
    );
    assert!(underscored.selected_answers().iter().all(Option::is_none));
    underscored.reset().unwrap();

    let dotted = QuizSession::new(
        with_id("intro.1"),
        FileStorage::new(dir.path()).unwrap(),
        LocalGamification::new(),
    );
    assert!(dotted.is_answer_correct(1));
}
