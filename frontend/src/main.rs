//! Single-page super-admin console: dashboard KPIs, organizations,
//! subscriptions, plans, payments and the audit log.

mod api;
mod components;
mod context;
mod pages;
mod router;
mod utils;

use yew::prelude::*;

use crate::context::SessionProvider;

#[function_component(App)]
fn app() -> Html {
    html! {
        <SessionProvider>
            <router::AppRouter />
        </SessionProvider>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
