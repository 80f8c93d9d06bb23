//! Symptom Intake: scripted symptom dialogue and regional care guidelines.

pub mod checker;
pub mod config;
pub mod dataset;
pub mod error;
pub mod intake;
pub mod store;
