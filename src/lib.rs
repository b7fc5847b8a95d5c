// src/lib.rs
// DOCUMENTATION: Library root
// PURPOSE: Gallery and detail view models over Unsplash, Gemini and a local favorites store

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;

pub use errors::GalleryError;
