// src/lib.rs
pub mod data {
    pub mod provider;
    pub mod in_memory;
}

pub mod run {
    pub mod config;
    pub mod catalog;
    pub mod exclusion;
    pub mod export;
    pub mod sink;
    pub mod task;
}
