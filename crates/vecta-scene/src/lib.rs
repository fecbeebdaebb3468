//! # vecta-scene
//!
//! The transactional mutation layer of the Vecta editor: typed properties,
//! animation tracks, path geometry and the command history that is the only
//! way scene state changes.

pub mod animator;
pub mod builder;
pub mod command;
pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod owner;
pub mod path;
pub mod property;
pub mod references;
pub mod scripting;
pub mod snapshot;
pub mod track;
pub mod validate;
pub mod value;

pub use animator::Animator;
pub use command::{Command, Macro, Outcome};
pub use document::{Document, Slot};
pub use editor::{Editor, MacroScope};
pub use error::{SceneError, SceneResult};
pub use history::{HistoryManager, MacroToken};
pub use owner::{ObjectType, OwnerCategory, OwnerId, OwnerKind, PropertyOwner, TagType, ToolType};
pub use path::{CubicSegment, Knot, KnotMode, PathGeometry};
pub use property::{Constraints, Property};
pub use references::ReferenceHolder;
pub use snapshot::DocumentSnapshot;
pub use track::{Interpolation, Keyframe, PropertyPath, Tangents, Track};
pub use validate::validate_document;
pub use value::{PropertyKind, Value};
