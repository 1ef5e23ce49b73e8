//! Request-processing pipeline.
//!
//! One invocation flows decode → transcribe → translate, with an independent
//! speak step for either text field.  Stage failures are typed and never
//! abort downstream stages.

pub mod runner;

pub use runner::{
    Pipeline, PipelineOutput, StageError, TRANSCRIPTION_SENTINEL, TRANSLATION_SENTINEL,
};
