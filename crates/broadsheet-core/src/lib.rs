//! Animated archive reader: per-actor favorites and hidden pages, a filtered
//! page catalog, two-phase page turns and a rotating ad slot.

pub mod ads;
pub mod app;
pub mod catalog;
pub mod document;
pub mod feedback;
pub mod intents;
pub mod navigation;
pub mod preferences;
pub mod render;
pub mod selection;
pub mod settings;
pub mod text_policy;
