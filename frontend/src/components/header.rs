use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    context::{SessionAction, SessionContext},
    router::Route,
    utils::event_value,
};

#[function_component(Header)]
pub fn header() -> Html {
    let session = use_context::<SessionContext>();
    let route = use_route::<Route>();
    let token_input = use_state(String::new);

    let on_token_input = {
        let token_input = token_input.clone();
        Callback::from(move |e: InputEvent| token_input.set(event_value(&e)))
    };

    let on_sign_in = {
        let session = session.clone();
        let token_input = token_input.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Some(session) = session.as_ref() {
                session.dispatch(SessionAction::SignIn((*token_input).clone()));
            }
            token_input.set(String::new());
        })
    };

    let on_sign_out = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(session) = session.as_ref() {
                session.dispatch(SessionAction::SignOut);
            }
        })
    };

    let nav_link = |target: Route, label: &'static str| {
        let active = route.as_ref() == Some(&target);
        let classes = classes!(
            "rounded-lg",
            "px-3",
            "py-1.5",
            "text-sm",
            "font-semibold",
            if active { "bg-[var(--primary)] text-white" } else { "text-[var(--text)] hover:text-[var(--primary)]" }
        );
        html! {
            <Link<Route> to={target} {classes}>{ label }</Link<Route>>
        }
    };

    let signed_in = session.as_ref().is_some_and(|session| session.is_signed_in());
    let expired = session.as_ref().is_some_and(|session| session.expired);

    html! {
        <header class="border-b border-[var(--border)] bg-[var(--surface)]">
            <div class="mx-auto flex max-w-6xl flex-wrap items-center justify-between gap-3 px-4 py-3">
                <div class="flex items-center gap-4">
                    <span class="text-lg font-bold">{ "GymDesk Admin" }</span>
                    <nav class="flex gap-1" aria-label="Main">
                        { nav_link(Route::Dashboard, "Dashboard") }
                        { nav_link(Route::Organizations, "Organizations") }
                        { nav_link(Route::Subscriptions, "Subscriptions") }
                        { nav_link(Route::Plans, "Plans") }
                        { nav_link(Route::Payments, "Payments") }
                        { nav_link(Route::Logs, "Logs") }
                    </nav>
                </div>
                if signed_in {
                    <button type="button" class="text-sm text-[var(--muted)] hover:underline" onclick={on_sign_out}>
                        { "Sign out" }
                    </button>
                } else {
                    <form class="flex items-center gap-2" onsubmit={on_sign_in}>
                        if expired {
                            <span class="text-xs text-red-600">{ "Session expired, sign in again" }</span>
                        }
                        <input type="password" placeholder="Admin token"
                               class="h-9 rounded-lg border border-[var(--border)] px-3 text-sm"
                               value={(*token_input).clone()} oninput={on_token_input} />
                        <button type="submit" class="h-9 rounded-lg bg-[var(--primary)] px-3 text-sm text-white">
                            { "Sign in" }
                        </button>
                    </form>
                }
            </div>
        </header>
    }
}
