//! studycomp-core: quiz synthesis, knowledge base, and readiness scoring.
//!
//! This crate holds the data model, the curated knowledge base, the quiz
//! engine, and the scoring logic that the rest of studycomp builds on.

pub mod engine;
pub mod error;
pub mod knowledge;
pub mod model;
pub mod report;
pub mod scoring;
pub mod syllabus;
pub mod synthesis;
pub mod traits;
