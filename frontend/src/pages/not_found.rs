use yew::prelude::*;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <main class="mx-auto max-w-3xl px-4 py-10">
            <h2 class="text-xl font-bold">{ "404 - Page not found" }</h2>
            <p class="text-sm text-[var(--muted)]">{ "The page you requested does not exist." }</p>
        </main>
    }
}
