use crate::owner::OwnerId;
use crate::value::PropertyKind;

/// A specialized Result type for scene mutation.
pub type SceneResult<T> = Result<T, SceneError>;

/// Everything that can go wrong while reading or mutating a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("type mismatch on '{property}': expected {expected}, found {found}")]
    TypeMismatch {
        property: String,
        expected: PropertyKind,
        found: PropertyKind,
    },

    /// Reported by validation only; assignments clamp instead.
    #[error("value of '{property}' is out of range: {detail}")]
    OutOfRange { property: String, detail: String },

    #[error("removal would leave {count} owner(s) with a dangling reference")]
    DanglingReference { count: usize },

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("history corrupted while replaying '{label}': {reason}")]
    HistoryCorruption { label: String, reason: String },

    #[error("unknown owner {0}")]
    UnknownOwner(OwnerId),

    #[error("owner {owner} has no property '{property}'")]
    UnknownProperty { owner: OwnerId, property: String },

    #[error("properties of kind {0} cannot be animated")]
    NotAnimatable(PropertyKind),

    #[error("property '{0}' has no track")]
    NoTrack(String),

    #[error("a keyframe already exists at frame {0}")]
    KeyframeExists(i32),

    #[error("no keyframe at frame {0}")]
    NoKeyframe(i32),

    #[error("moving the keyframe at frame {frame} by {offset} leaves the frame range")]
    FrameOverflow { frame: i32, offset: i32 },

    #[error("reference from '{property}' to {target} is not allowed")]
    InvalidReference { property: String, target: OwnerId },

    #[error("knot index {index} out of bounds for path with {len} knots")]
    InvalidKnotIndex { index: usize, len: usize },

    #[error("owner {0} is not a path")]
    NotAPath(OwnerId),

    #[error("cannot move {0} beneath itself")]
    CyclicParent(OwnerId),

    #[error("invalid parent for {owner}: {reason}")]
    InvalidParent { owner: OwnerId, reason: String },

    #[error("macro error: {0}")]
    MacroState(String),

    #[error("invalid document: {0}")]
    Validation(String),
}
