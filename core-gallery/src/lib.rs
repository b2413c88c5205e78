//! # Gallery Core
//!
//! The embeddable gallery component: configuration, the selection/view
//! state machine, and the wiring that turns host bridges into a running
//! controller.
//!
//! ## Overview
//!
//! A host builds a [`GalleryController`] once through [`GalleryBuilder`],
//! subscribes to its observable state, and forwards UI events as commands:
//!
//! ```ignore
//! use core_gallery::{GalleryBuilder, GalleryCallbacks, GalleryConfig};
//!
//! let config = GalleryConfig::builder()
//!     .group_by_album(true)
//!     .max_selection_count(10)
//!     .build();
//!
//! let controller = GalleryBuilder::new(config)
//!     .callbacks(GalleryCallbacks::new().on_media_selected(|items| {
//!         println!("selected {} items", items.len());
//!     }))
//!     .permissions(permissions)
//!     .media_store(media_store)
//!     .build()?;
//!
//! let mut states = controller.state_watch();
//! controller.start().await;
//! while states.changed().await.is_ok() {
//!     render(&states.borrow());
//! }
//! ```
//!
//! The rendering layer stays external: it reads whole state values from the
//! watch handle and never mutates the model directly.

pub mod builder;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod state;

pub use builder::GalleryBuilder;
pub use config::{GalleryCallbacks, GalleryConfig, SelectionMode, ViewMode};
pub use controller::GalleryController;
pub use error::{GalleryError, Result};
pub use state::{GalleryState, GalleryView};
