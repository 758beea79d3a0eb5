use yew::prelude::*;
use yew_router::prelude::*;

use crate::{components::header::Header, pages};

#[derive(Routable, Clone, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Organizations,

    #[at("/subscriptions")]
    Subscriptions,

    #[at("/plans")]
    Plans,

    #[at("/payments")]
    Payments,

    #[at("/logs")]
    Logs,

    #[at("/dashboard")]
    Dashboard,

    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    match route {
        Route::Organizations => html! { <pages::organizations::OrganizationsPage /> },
        Route::Subscriptions => html! { <pages::subscriptions::SubscriptionsPage /> },
        Route::Plans => html! { <pages::plans::PlansPage /> },
        Route::Payments => html! { <pages::payments::PaymentsPage /> },
        Route::Logs => html! { <pages::logs::LogsPage /> },
        Route::Dashboard => html! { <pages::dashboard::DashboardPage /> },
        Route::NotFound => html! { <pages::not_found::NotFoundPage /> },
    }
}

#[function_component(AppRouter)]
pub fn app_router() -> Html {
    html! {
        <BrowserRouter>
            <div class="flex flex-col bg-[var(--bg)]" style="min-height: 100vh; min-height: 100svh;">
                <Header />
                <div class="flex-1 pt-[var(--space-sm)]">
                    <Switch<Route> render={switch} />
                </div>
            </div>
        </BrowserRouter>
    }
}
