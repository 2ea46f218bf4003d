pub mod editor;

pub use editor::{EditorState, FenceEditor};
