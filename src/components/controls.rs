use crate::api::{ActionId, BarGeometry};
use dioxus::prelude::*;
use std::rc::Rc;
use tracing::warn;

/// Transport button; its element id is the action token, which is also what
/// it reports when pressed.
#[component]
pub(super) fn ActionButton(action: ActionId, onpress: EventHandler<&'static str>) -> Element {
    rsx! {
        button {
            id: action.as_str(),
            class: "action",
            r#type: "button",
            title: action.label(),
            onclick: move |_| onpress.call(action.as_str()),
            "{action.label()}"
        }
    }
}

/// Clickable progress bar. Reports the click position together with the
/// bar's geometry measured at click time, so resizes never use a stale width.
#[component]
pub(super) fn ProgressBar(
    progress: Signal<f64>,
    onseek: EventHandler<(f64, BarGeometry)>,
) -> Element {
    let mut bar = use_signal(|| None::<Rc<MountedData>>);
    let width = progress();

    rsx! {
        div {
            id: "bar",
            class: "bar",
            onmounted: move |evt: MountedEvent| bar.set(Some(evt.data())),
            onclick: move |evt: MouseEvent| {
                let click_x = evt.client_coordinates().x;
                let Some(element) = bar() else {
                    return;
                };
                spawn(async move {
                    match element.get_client_rect().await {
                        Ok(rect) => {
                            onseek.call((click_x, BarGeometry::new(rect.origin.x, rect.size.width)))
                        }
                        Err(err) => warn!("cannot measure progress bar: {err:?}"),
                    }
                });
            },
            div { id: "position", class: "position", style: "width: {width}%" }
        }
    }
}
