pub mod config;
pub mod controller;
pub mod renderer;
pub mod selection;
pub mod transport;

pub use config::{load_settings, Settings};
pub use controller::{Completion, PageView, UploadController, UploadTicket};
pub use renderer::{render, ProbabilityBar, ResultView};
pub use selection::{SelectionHandler, NO_FILE_INDICATOR};
pub use transport::{ClassificationTransport, HttpClassificationTransport, FILE_FIELD};
