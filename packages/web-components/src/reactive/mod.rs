//! Reactive Module
//!
//! Reactive properties with attribute sync, computed values and batched
//! update flushing.

pub mod config;
pub mod manager;

pub use config::{
    AttributeBinding, BatchConfig, ChangeCallback, ComputeFn, ReactivePropertyConfig, Transform,
    Validator,
};
pub use manager::{
    ComputedSnapshot, PropertyAccessor, PropertySnapshot, ReactiveManager, ReactiveStateSnapshot,
    SetOutcome,
};
