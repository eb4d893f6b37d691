#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::too_many_lines,
    clippy::cast_lossless,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::module_name_repetitions
)]
mod error;
pub use error::*;

mod cpix;
pub use cpix::*;

mod color;
pub use color::*;

mod palette;
pub use palette::*;

mod grid;
pub use grid::*;

mod patch;
pub use patch::*;

mod layer;
pub use layer::*;

mod document;
pub use document::*;

pub mod diff;

mod project_file;
pub use project_file::*;
