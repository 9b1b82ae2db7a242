use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use quiz_quest::data::sample_quiz;
use quiz_quest::rewards::http::HttpGamification;
use quiz_quest::rewards::local::LocalGamification;
use quiz_quest::rewards::{GamificationService, RewardStep};
use quiz_quest::server::serve;
use quiz_quest::storage::MemoryStorage;
use quiz_quest::{Error, QuizOutcome, QuizSession, Step};

fn start_server() -> (String, Arc<LocalGamification>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let engine = Arc::new(LocalGamification::new());
    let served = Arc::clone(&engine);
    thread::spawn(move || serve(listener, &*served));
    (url, engine)
}

fn client(results_url: &str, gamification_url: &str) -> HttpGamification {
    HttpGamification::new(results_url, gamification_url, Duration::from_secs(5)).unwrap()
}

/// Answers every question of the sample quiz correctly
fn play_sample<G: GamificationService>(
    session: &mut QuizSession<MemoryStorage, G>,
) -> QuizOutcome {
    let answers: Vec<(usize, Vec<String>)> = session
        .quiz()
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| (i, q.correct_answer.as_slice().to_vec()))
        .collect();

    for (i, correct) in answers {
        for answer in &correct {
            session.handle_answer(i, answer).unwrap();
        }
        if let Step::Completed(outcome) = session.handle_next().unwrap() {
            return *outcome;
        }
    }
    panic!("quiz never completed");
}

#[test]
fn full_quiz_over_http() {
    let (url, engine) = start_server();
    let mut session = QuizSession::new(sample_quiz().unwrap(), MemoryStorage::new(), client(&url, &url))
        .with_user("grace hopper");

    let outcome = play_sample(&mut session);
    let rewards = &outcome.rewards;

    assert!(rewards.failures.is_empty(), "{:?}", rewards.failures);
    assert!(rewards.result_saved);
    assert_eq!(outcome.result.score, 4);
    assert_eq!(rewards.experience.as_ref().map(|e| e.gained), Some(225));
    assert!(rewards.leveled_up());
    assert_eq!(rewards.streak.as_ref().map(|s| s.current), Some(1));
    let achievements: Vec<_> = rewards.achievements.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(achievements, vec!["first_quiz", "perfect_score", "speed_runner"]);
    assert!(rewards.completed_quests().any(|q| q.quest_id == "first-steps"));
    assert!(outcome.celebrate);

    let profile = engine.profile("grace hopper").unwrap();
    assert_eq!(profile.quizzes_completed, 1);
    assert_eq!(profile.total_xp, 225);
    assert_eq!(engine.stored_results(), 1);
}

#[test]
fn failed_result_save_does_not_block_rewards() {
    let (url, engine) = start_server();
    let broken_results = format!("{url}/missing");
    let mut session = QuizSession::new(
        sample_quiz().unwrap(),
        MemoryStorage::new(),
        client(&broken_results, &url),
    )
    .with_user("ada");

    let outcome = play_sample(&mut session);

    assert!(!outcome.rewards.result_saved);
    assert_eq!(outcome.rewards.failures.len(), 1);
    assert_eq!(outcome.rewards.failures[0].step, RewardStep::SaveResult);
    assert!(outcome.rewards.experience.is_some());
    assert_eq!(engine.stored_results(), 0);
    // The checks still counted the quiz for the player
    assert_eq!(engine.profile("ada").unwrap().quizzes_completed, 1);
}

#[test]
fn unreachable_services_leave_session_completed() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{port}");
    let mut session =
        QuizSession::new(sample_quiz().unwrap(), MemoryStorage::new(), client(&url, &url))
            .with_user("ada");

    let outcome = play_sample(&mut session);

    assert_eq!(outcome.rewards.failures.len(), 6);
    assert!(session.is_completed());
    assert_eq!(outcome.result.score, 4);
    assert!(outcome.celebrate, "perfect score celebrates even offline");
}

#[test]
fn http_errors_carry_status() {
    let (url, _engine) = start_server();
    let http = client(&format!("{url}/nope"), &url);
    let result = {
        let mut session = QuizSession::new(
            sample_quiz().unwrap(),
            MemoryStorage::new(),
            LocalGamification::new(),
        );
        session.calculate_results().unwrap().result
    };

    match http.save_result(&result) {
        Err(Error::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected 404, got {other:?}"),
    }
}

#[test]
fn server_rejects_non_json_bodies() {
    let (url, _engine) = start_server();
    let response = reqwest::blocking::Client::new()
        .post(format!("{url}/api/gamification/users/ada/experience"))
        .header("Content-Type", "text/plain")
        .body("100")
        .send()
        .unwrap();
    assert_eq!(response.status().as_u16(), 415);

    let response = reqwest::blocking::Client::new()
        .post(format!("{url}/api/gamification/users/ada/experience"))
        .header("Content-Type", "application/json")
        .body("{\"amount\": \"lots\"}")
        .send()
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let health = reqwest::blocking::get(format!("{url}/health")).unwrap();
    assert_eq!(health.text().unwrap(), "ok");
}
