pub mod source;
pub mod extraction;
pub mod annotation;
pub mod fields;
pub mod pages;
pub mod record;
pub mod parser; // Document → CandidateRecord orchestrator
pub mod batch; // Directory fan-out over a bounded worker pool
