pub mod canvas;
pub mod config;
pub mod edit;
pub mod history;
pub mod playback;
pub mod resolve;
pub mod shortcuts;
pub mod store;
pub mod timeline;

pub use canvas::{AlignmentGuides, CanvasDrag};
pub use config::{CanvasSettings, EditorConfig, Zoom};
pub use edit::{Edit, apply_edit};
pub use history::History;
pub use playback::{FrameHandle, FrameLoop, FrameScheduler, ManualScheduler, PlaybackClock, Tick, Transport};
pub use resolve::{AnimationPhase, LayerFrame, resolve};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{EditorStore, HostAction, UiState};
pub use timeline::{Grab, TimelineDrag, Timing};
