// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod favorite_repository;

pub use favorite_repository::*;
