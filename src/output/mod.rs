//! Output rendering: table/JSON/YAML, colorized with
//! `colored`, tabulated with `comfy-table`.

pub mod context;
pub mod table;
pub mod theme;
pub mod view;

pub use context::{OutputContext, OutputFormat};
pub use theme::Theme;
pub use view::RecordView;
