// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod detail_view_model;
pub mod favorites_store;
pub mod gallery_view_model;
pub mod gemini_client;
pub mod image_source;
pub mod state_holder;
pub mod unsplash_client;

pub use detail_view_model::*;
pub use favorites_store::*;
pub use gallery_view_model::*;
pub use gemini_client::*;
pub use image_source::*;
pub use state_holder::*;
pub use unsplash_client::*;
