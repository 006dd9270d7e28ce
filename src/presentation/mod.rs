// Presentation layer seam between the controller and whatever displays it

mod terminal;

pub use terminal::TerminalPresenter;

use crate::models::FormInput;
use crate::render::ResultsView;

/// Label of the search trigger while idle
pub const TRIGGER_IDLE_LABEL: &str = "Search";

/// Label of the search trigger while a search runs
pub const TRIGGER_BUSY_LABEL: &str = "Searching...";

/// Progress text shown right after a search is submitted
pub const PROGRESS_INITIAL_MESSAGE: &str = "Initializing search...";

/// Display primitives the controller drives.
///
/// Methods take `&self` because the controller calls them from its polling
/// task as well as from the caller of `start_search`; implementations hold
/// their own interior state. Calls are never made concurrently for the same
/// controller.
pub trait Presenter: Send + Sync + 'static {
    /// Current contents of the part-number field and website checkboxes
    fn read_form(&self) -> FormInput;

    /// Enable or disable the search trigger and set its label
    fn set_trigger(&self, enabled: bool, label: &str);

    /// Set the progress bar width (0..=100) and its status text
    fn set_progress(&self, percent: f64, message: &str);

    fn set_progress_visible(&self, visible: bool);

    /// Replace the results area
    fn show_results(&self, view: &ResultsView);
}
