pub mod artwork_view;
pub mod backdrop;
pub mod detail_content;
pub mod detail_screen;
pub mod detail_view;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use artwork_view::{ArtworkView, ArtworkViewProps};
pub use backdrop::{Backdrop, BackdropProps};
pub use detail_content::{DetailContent, DetailContentProps};
pub use detail_screen::{DetailScreen, DetailScreenProps, ERROR_LABEL};
pub use detail_view::{DetailView, DetailViewProps};

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: u16 = 2;
/// Content inset from the screen edge (columns, rows).
pub const CONTENT_PADDING: (u16, u16) = (3, 1);
