use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use quiz_quest::config::Config;
use quiz_quest::data::{load_quiz_file, sample_quiz};
use quiz_quest::model::Quiz;
use quiz_quest::rewards::http::HttpGamification;
use quiz_quest::rewards::local::LocalGamification;
use quiz_quest::rewards::{GamificationService, RewardSummary};
use quiz_quest::storage::{FileStorage, SessionStorage};
use quiz_quest::view_models::{QuestionView, review_rows, score_line};
use quiz_quest::{QuizOutcome, QuizSession, Result, Step};

#[derive(Parser)]
#[command(name = "quiz_quest", version, about = "Play gamified quizzes in the terminal")]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a quiz (the bundled sample when no file is given)
    Play {
        quiz: Option<PathBuf>,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        storage_dir: Option<PathBuf>,
        /// Send results to the configured HTTP services instead of the local engine
        #[arg(long)]
        remote: bool,
    },
    /// Check that a quiz file parses and is playable
    Validate { quiz: PathBuf },
    /// Forget the saved session of a quiz
    Reset {
        quiz_id: String,
        #[arg(long)]
        storage_dir: Option<PathBuf>,
    },
}

type Session = QuizSession<FileStorage, Box<dyn GamificationService>>;

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Validate { quiz } => {
            let quiz = load_quiz_file(&quiz)?;
            println!("{} ({}): {} questions, OK", quiz.title, quiz.id, quiz.questions.len());
            Ok(())
        }
        Command::Reset {
            quiz_id,
            storage_dir,
        } => {
            if let Some(dir) = storage_dir {
                config.storage_dir = dir;
            }
            let mut storage = FileStorage::new(&config.storage_dir)?;
            storage.clear_quiz(&quiz_id)?;
            println!("Saved session for {quiz_id} cleared.");
            Ok(())
        }
        Command::Play {
            quiz,
            user,
            storage_dir,
            remote,
        } => {
            if let Some(dir) = storage_dir {
                config.storage_dir = dir;
            }
            if user.is_some() {
                config.user_id = user;
            }
            let quiz = match quiz {
                Some(path) => load_quiz_file(&path)?,
                None => sample_quiz()?,
            };
            play(quiz, &config, remote)
        }
    }
}

fn play(quiz: Quiz, config: &Config, remote: bool) -> Result<()> {
    let storage = FileStorage::new(&config.storage_dir)?;
    let rewards: Box<dyn GamificationService> = if remote {
        info!("sending rewards to {}", config.gamification_url);
        Box::new(HttpGamification::from_config(config)?)
    } else {
        Box::new(LocalGamification::open(&config.profiles_path)?)
    };

    let mut session: Session = QuizSession::new(quiz, storage, rewards);
    if let Some(user) = &config.user_id {
        session = session.with_user(user.clone());
    }

    println!("== {} ==", session.quiz().title);
    if let Some(description) = &session.quiz().description {
        println!("{description}");
    }
    println!("Type option numbers to answer (e.g. `1` or `1,3`), Enter/n next, p previous, r restart, q quit.\n");

    if session.is_completed() {
        if let Some(result) = session.result() {
            println!("Already completed: {}", score_line(result));
        }
        if !confirm("Play again? [y/N] ")? {
            return Ok(());
        }
        session.reset()?;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(view) = QuestionView::from_session(&session) else {
            break;
        };
        println!("{}", view.header());
        println!("{}", view.prompt);
        if let Some(image) = &view.image {
            println!("(image: {image})");
        }
        for option in &view.options {
            println!("  {}", option.label());
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!("\nProgress saved.");
            return Ok(());
        };
        let input = line?;

        match input.trim() {
            "q" => {
                println!("Progress saved.");
                return Ok(());
            }
            "" | "n" => match session.handle_next()? {
                Step::Advanced(_) => println!(),
                Step::Completed(outcome) => {
                    print_outcome(&session, &outcome);
                    return Ok(());
                }
            },
            "p" => {
                session.handle_previous()?;
                println!();
            }
            "r" => {
                session.reset()?;
                println!("Starting over.\n");
            }
            other => answer_options(&mut session, other),
        }
    }
    Ok(())
}

/// Applies every option number typed on the line to the current question
fn answer_options(session: &mut Session, input: &str) {
    let index = session.current_question();
    for token in input.split([',', ' ']).filter(|t| !t.is_empty()) {
        match token.parse::<usize>() {
            Ok(n) if n > 0 => {
                if let Err(err) = session.handle_answer_option(index, n - 1) {
                    println!("  {err}");
                }
            }
            _ => println!("  `{token}` is not an option number"),
        }
    }
}

fn print_outcome(session: &Session, outcome: &QuizOutcome) {
    println!();
    if outcome.celebrate {
        println!("🎉🎉🎉");
    }
    println!("{}", score_line(&outcome.result));

    for row in review_rows(session) {
        println!("  {}", row.label());
        if !row.is_correct {
            println!("     correct: {}", row.correct.join(", "));
            if let Some(explanation) = &row.explanation {
                println!("     {explanation}");
            }
        }
    }
    print_rewards(&outcome.rewards);
}

fn print_rewards(rewards: &RewardSummary) {
    if let Some(xp) = &rewards.experience {
        println!("XP: {} total, level {} ({})", xp.total_xp, xp.level, xp.title);
        if xp.leveled_up() {
            println!("⬆ Level up! {} → {}", xp.previous_level, xp.level);
        }
    }
    if let Some(streak) = &rewards.streak {
        println!("Streak: {} day(s), best {}", streak.current, streak.best);
    }
    for achievement in &rewards.achievements {
        println!("🏆 {}: {}", achievement.title, achievement.description);
    }
    for badge in &rewards.badges {
        println!("🎖 {}: {}", badge.name, badge.description);
    }
    for quest in &rewards.quests {
        if quest.newly_completed {
            println!("⚔ Quest complete: {}", quest.title);
        } else {
            println!("⚔ {}: {}/{}", quest.title, quest.progress, quest.target);
        }
    }
    for failure in &rewards.failures {
        println!("(could not update {}: {})", failure.step.as_str(), failure.message);
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
