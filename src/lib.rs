// src/lib.rs

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod models;
pub mod session;

// Re-export the surface the presentation layer wires together.
pub use catalog::{QuizCatalog, QuizOverview};
pub use gateway::{QuizGateway, RestGateway};
pub use identity::StudentContext;
pub use session::{QuizSession, SessionPhase, SubmitOutcome};
