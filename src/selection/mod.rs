mod controller;
mod model;

pub use controller::SelectionController;
pub use model::{FileSaver, MapSurface, Notice, NoticeLevel, Presenter};
