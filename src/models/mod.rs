// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod favorite;
pub mod photo;
pub mod state;

pub use favorite::*;
pub use photo::*;
pub use state::*;
