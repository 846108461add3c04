use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

mod api;
mod components;
mod config;
mod error;

use components::RemotePanel;

const PANEL_CSS: Asset = asset!("/assets/styling/panel.css");

fn main() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    dioxus::logger::init(level).expect("failed to initialize logger");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "mpv remote" }
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1",
        }
        document::Meta { name: "theme-color", content: "#1d1f24" }
        document::Stylesheet { href: PANEL_CSS }

        RemotePanel {}
    }
}
