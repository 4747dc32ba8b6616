// src/games/mod.rs
//! テーブルの上で動くゲームたち。

pub mod memory;

pub use memory::MemoryRules;
