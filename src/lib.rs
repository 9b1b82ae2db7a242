pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod rewards;
pub mod server;
pub mod session;
pub mod storage;
pub mod view_models;

pub use error::{Error, Result};
pub use session::{QuizOutcome, QuizSession, Step};
