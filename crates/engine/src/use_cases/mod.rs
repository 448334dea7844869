//! Use cases - orchestration over the import pipeline.

pub mod bestiary;
