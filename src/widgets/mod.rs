//! Built-in widgets: Panel, Paragraph (with Label and Header), Button, CheckBox.

pub mod button;
pub mod checkbox;
pub mod panel;
pub mod paragraph;

pub use button::{Button, ButtonSkin};
pub use checkbox::CheckBox;
pub use panel::{Overflow, Panel, PanelSkin};
pub use paragraph::{Paragraph, ParagraphKind};
