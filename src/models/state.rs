// src/models/state.rs
// DOCUMENTATION: Observable screen states
// PURPOSE: Snapshots published by the gallery and detail view models

use std::path::PathBuf;

use super::photo::PhotoRecord;

/// Gallery screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeState {
    Loading,
    Error {
        message: String,
    },
    Success {
        photos: Vec<PhotoRecord>,
        favorite_photos: Vec<PhotoRecord>,
        show_favorites_only: bool,
    },
}

impl HomeState {
    /// Fresh success state with no favorites and the filter off
    pub fn success(photos: Vec<PhotoRecord>) -> Self {
        HomeState::Success {
            photos,
            favorite_photos: Vec::new(),
            show_favorites_only: false,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, HomeState::Success { .. })
    }

    /// Photos the grid should draw
    /// DOCUMENTATION: Favorites when the filter is on, the fetched page
    /// otherwise. Empty for Loading and Error
    pub fn displayed_photos(&self) -> &[PhotoRecord] {
        match self {
            HomeState::Success {
                photos,
                favorite_photos,
                show_favorites_only,
            } => {
                if *show_favorites_only {
                    favorite_photos
                } else {
                    photos
                }
            }
            HomeState::Loading | HomeState::Error { .. } => &[],
        }
    }

    /// True when the favorites filter is on and there is nothing to show,
    /// in which case the screen renders a notice instead of an empty grid
    pub fn shows_empty_favorites(&self) -> bool {
        match self {
            HomeState::Success {
                favorite_photos,
                show_favorites_only,
                ..
            } => *show_favorites_only && favorite_photos.is_empty(),
            HomeState::Loading | HomeState::Error { .. } => false,
        }
    }
}

/// Handle to an image bundled with the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource(pub PathBuf);

impl ImageResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ImageResource(path.into())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.0
    }
}

/// Which photo the detail screen is showing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayContext {
    pub image_resource: Option<ImageResource>,
    pub image_url: Option<String>,
    pub photographer_name: Option<String>,
    pub photo_id: Option<String>,
    pub alt_description: Option<String>,
}

/// Lifecycle of one describe request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPhase {
    Initial,
    Loading,
    Success { output_text: String, is_favorite: bool },
    Error { message: String },
}

/// Detail screen state
/// DOCUMENTATION: The display context lives beside the phase, so every
/// phase transition keeps it unless it is replaced explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
    pub context: DisplayContext,
    pub phase: DetailPhase,
}

impl DetailState {
    pub fn initial(context: DisplayContext) -> Self {
        DetailState {
            context,
            phase: DetailPhase::Initial,
        }
    }

    /// Same context, new phase
    pub fn with_phase(&self, phase: DetailPhase) -> Self {
        DetailState {
            context: self.context.clone(),
            phase,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.phase, DetailPhase::Success { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.phase,
            DetailPhase::Success { .. } | DetailPhase::Error { .. }
        )
    }
}

impl Default for DetailState {
    fn default() -> Self {
        DetailState::initial(DisplayContext::default())
    }
}
