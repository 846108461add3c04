use super::PanelView;
use dioxus::prelude::*;

/// Panel state rendered by [`crate::components::RemotePanel`].
///
/// Signals are `Copy`, so the controller holds its own handles and writes go
/// straight into the component tree.
#[derive(Clone, Copy)]
pub struct SignalPanelView {
    pub elapsed: Signal<String>,
    pub total: Signal<String>,
    pub progress: Signal<f64>,
    pub images: Signal<Vec<String>>,
}

impl PanelView for SignalPanelView {
    fn set_elapsed(&self, text: &str) {
        let mut elapsed = self.elapsed;
        if *elapsed.peek() != text {
            elapsed.set(text.to_string());
        }
    }

    fn set_total(&self, text: &str) {
        let mut total = self.total;
        if *total.peek() != text {
            total.set(text.to_string());
        }
    }

    fn set_progress(&self, percent: f64) {
        let mut progress = self.progress;
        if *progress.peek() != percent {
            progress.set(percent);
        }
    }

    fn set_image_source(&self, index: usize, src: &str) {
        let mut images = self.images;
        images.with_mut(|list| {
            if let Some(slot) = list.get_mut(index) {
                *slot = src.to_string();
            }
        });
    }
}
