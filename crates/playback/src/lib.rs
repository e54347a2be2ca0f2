//! Route playback engine.
//!
//! Turns a parsed route into a dense [`AnimationPath`] and plays a marker
//! along it, pausing at stops. The engine is single-threaded and never
//! blocks: frames are requested from a [`Scheduler`] and drawn on a
//! [`RenderSurface`], both supplied by the host.
//!
//! # Example
//!
//! ```
//! use routeplay_core::config::ConfigSchema;
//! use routeplay_geo::parse_route;
//! use routeplay_playback::{run_virtual, RecordingSurface, RouteView, StopSet, VirtualScheduler};
//!
//! let doc = parse_route("<coordinates>-92.1,44.0,0 -92.11,44.01,0</coordinates>");
//! let config = ConfigSchema::default();
//! let mut view = RouteView::from_document(&doc, StopSet::empty(), &config).unwrap();
//!
//! let mut surface = RecordingSurface::new();
//! view.register(&mut surface);
//! let mut scheduler = VirtualScheduler::new(config.playback.frame_interval());
//!
//! let summary = run_virtual(&mut view, &mut scheduler, &mut surface);
//! assert!(summary.completed);
//! ```

mod error;
pub mod live;
mod path;
mod player;
pub mod render;
mod reveal;
mod runner;
pub mod scheduler;
mod state;
mod stops;
mod trail;
mod view;

pub use error::{PlaybackError, Result};
pub use live::{ChangeBatch, Direction, LiveTracker, PositionUpdate, GEO_POSITION};
pub use path::AnimationPath;
pub use player::{Player, RunStats};
pub use render::{layers, LayerKind, RecordingSurface, RenderSurface};
pub use reveal::RouteReveal;
pub use runner::{run_virtual, RunSummary};
pub use scheduler::{Due, Scheduler, Task, Ticket, VirtualScheduler};
pub use state::{advance_frame, DwellPolicy, Frame, NextFrame, Phase, PlaybackState};
pub use stops::{Stop, StopSet};
pub use trail::Trail;
pub use view::RouteView;
