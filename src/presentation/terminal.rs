// Terminal presenter used by the command-line binary

use super::Presenter;
use crate::models::FormInput;
use crate::render::{render_text, ResultsView};
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

const BAR_WIDTH: usize = 30;

/// Presents a search on stdout/stderr.
///
/// The form is fixed at construction from command-line input. Progress goes
/// to stderr as a redrawn bar when stderr is a terminal and as plain lines
/// otherwise; rendered results go to stdout.
pub struct TerminalPresenter {
    form: FormInput,
    last_view: Mutex<Option<ResultsView>>,
    progress_visible: AtomicBool,
    interactive: bool,
}

impl TerminalPresenter {
    pub fn new(form: FormInput) -> Self {
        Self {
            form,
            last_view: Mutex::new(None),
            progress_visible: AtomicBool::new(false),
            interactive: std::io::stderr().is_terminal(),
        }
    }

    /// The most recent view shown, if any
    pub fn last_view(&self) -> Option<ResultsView> {
        self.last_view.lock().ok().and_then(|view| view.clone())
    }
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

impl Presenter for TerminalPresenter {
    fn read_form(&self) -> FormInput {
        self.form.clone()
    }

    fn set_trigger(&self, enabled: bool, label: &str) {
        log::debug!(
            "Search trigger {} ({})",
            if enabled { "enabled" } else { "disabled" },
            label
        );
    }

    fn set_progress(&self, percent: f64, message: &str) {
        if !self.progress_visible.load(Ordering::SeqCst) {
            return;
        }

        let mut stderr = std::io::stderr().lock();
        let _ = if self.interactive {
            // \x1b[2K clears the previous, possibly longer, line
            write!(
                stderr,
                "\r\x1b[2K{} {:>3.0}% {}",
                progress_bar(percent),
                percent,
                message
            )
        } else {
            writeln!(stderr, "{:>3.0}% {}", percent, message)
        };
        let _ = stderr.flush();
    }

    fn set_progress_visible(&self, visible: bool) {
        let was_visible = self.progress_visible.swap(visible, Ordering::SeqCst);
        if was_visible && !visible && self.interactive {
            let mut stderr = std::io::stderr().lock();
            let _ = write!(stderr, "\r\x1b[2K");
            let _ = stderr.flush();
        }
    }

    fn show_results(&self, view: &ResultsView) {
        if let Ok(mut last) = self.last_view.lock() {
            *last = Some(view.clone());
        }

        // The idle prompt is for interactive forms; here the form is already filled
        if *view == ResultsView::idle() {
            return;
        }

        if self.interactive && self.progress_visible.load(Ordering::SeqCst) {
            let mut stderr = std::io::stderr().lock();
            let _ = write!(stderr, "\r\x1b[2K");
            let _ = stderr.flush();
        }

        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}", render_text(view));
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Website;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(100.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(
            progress_bar(50.0),
            format!("[{}{}]", "#".repeat(15), "-".repeat(15))
        );
    }

    #[test]
    fn test_read_form_returns_construction_input() {
        let form = FormInput::new("LM358", [Website::DataIo]);
        let presenter = TerminalPresenter::new(form.clone());
        assert_eq!(presenter.read_form(), form);
        assert!(presenter.last_view().is_none());
    }

    #[test]
    fn test_show_results_remembers_view() {
        let presenter = TerminalPresenter::new(FormInput::default());
        presenter.show_results(&ResultsView::idle());
        assert_eq!(presenter.last_view(), Some(ResultsView::idle()));
    }
}
