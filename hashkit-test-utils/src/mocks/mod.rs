//! Mock implementations for testing

mod policy;

pub use policy::RecordingPolicy;
