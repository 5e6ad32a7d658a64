//! Orchestration layer of the StudyForge gamification engine.
//!
//! Learning events come in through [`service::GamificationService`]; XP,
//! levels, streaks, and badge unlocks come out. The engine talks to
//! persistence through the [`store::GamificationStore`] port — backed by
//! PostgreSQL in production ([`pg::PgStore`]) and by an in-memory table set
//! in tests ([`memory::MemoryStore`]).

pub mod badges;
pub mod error;
pub mod leaderboard;
pub mod locks;
pub mod memory;
pub mod pg;
pub mod recommend;
pub mod service;
pub mod store;
pub mod views;

pub use error::{EngineError, EngineResult};
pub use service::GamificationService;
pub use store::GamificationStore;
