//! Core data model types: attachment records, evaluation results and view requests.

pub mod attachment;
pub mod decision;
pub mod intent;
