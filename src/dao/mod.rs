/// Backend-agnostic records exchanged with the store.
pub mod models;
/// Question and leaderboard store abstraction and its SQL backend.
pub mod quiz_store;
/// Storage error shared by every backend.
pub mod storage;
