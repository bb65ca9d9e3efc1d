pub mod buffer;
#[cfg(feature = "clipboard")]
pub mod clipboard;
pub mod delete;
pub mod error;
pub mod ex;
pub mod join;
pub mod key;
pub mod motion;
pub mod offset;
pub mod operator;
pub mod options;
pub mod range;
pub mod register;
pub mod search;
pub mod session;
pub mod traits;
pub mod types;

pub use crate::buffer::RopeEditor;
#[cfg(feature = "clipboard")]
pub use crate::clipboard::SystemClipboard;
pub use crate::error::{ExError, ExResult};
pub use crate::ex::execute;
pub use crate::key::{KeyCode, KeyEvent, Modifiers};
pub use crate::offset::{LineOffset, LinePointer, Offset, Pointer};
pub use crate::options::{ClipboardMode, Options};
pub use crate::range::{OperatedRange, ShiftType, VimRange};
pub use crate::register::{Register, RegisterGroup, RegisterOp};
pub use crate::session::{Session, SessionBuilder, SessionSnapshot};
pub use crate::traits::{CaretId, Clipboard, ClipboardContent, HostUi, MarkerId, SettingsStore, TransferableItem, VimEditor};
pub use crate::types::{Direction, LineRange, Mode, Position, SelectionType};
