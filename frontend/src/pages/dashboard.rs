use gymdesk_shared::DashboardKpis;
use yew::prelude::*;

use crate::{
    api,
    components::{
        error_banner::ErrorBanner,
        loading_spinner::{LoadingSpinner, SpinnerSize},
    },
    context::{report_failure, session_token, SessionContext},
};

fn kpi_cards(kpis: &DashboardKpis) -> [(&'static str, String); 7] {
    [
        ("Total gyms", kpis.total_gyms.to_string()),
        ("Active gyms", kpis.active_gyms.to_string()),
        ("Suspended gyms", kpis.suspended_gyms.to_string()),
        ("Total members", kpis.total_members.to_string()),
        ("Revenue this month", format!("{:.2}", kpis.monthly_revenue)),
        ("Revenue overall", format!("{:.2}", kpis.total_revenue)),
        ("Expiring soon", kpis.upcoming_expiry.to_string()),
    ]
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let session = use_context::<SessionContext>();
    let token = session_token(session.as_ref());
    let kpis = use_state(|| None::<DashboardKpis>);
    let error = use_state(|| None::<String>);

    {
        let kpis = kpis.clone();
        let error = error.clone();
        use_effect_with(token, move |token| {
            let token = token.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::fetch_kpis(token.as_deref()).await {
                    Ok(data) => kpis.set(Some(data)),
                    Err(err) => {
                        kpis.set(Some(DashboardKpis::default()));
                        error.set(Some(report_failure(session.as_ref(), &err)));
                    },
                }
            });
            || ()
        });
    }

    html! {
        <main class="mx-auto flex max-w-6xl flex-col gap-4 px-4 py-6">
            <h1 class="text-2xl font-bold">{ "Dashboard" }</h1>
            if let Some(message) = (*error).clone() {
                <ErrorBanner {message} />
            }
            if let Some(kpis) = (*kpis).as_ref() {
                <div class="grid grid-cols-2 gap-4 md:grid-cols-4">
                    { for kpi_cards(kpis).into_iter().map(|(label, value)| html! {
                        <div key={label} class="rounded-xl border border-[var(--border)] bg-[var(--surface)] p-4">
                            <p class="text-xs uppercase text-[var(--muted)]">{ label }</p>
                            <p class="mt-1 text-2xl font-bold">{ value }</p>
                        </div>
                    }) }
                </div>
            } else {
                <LoadingSpinner size={SpinnerSize::Medium} />
            }
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revenue_cards_use_two_decimals() {
        let kpis = DashboardKpis {
            total_gyms: 12,
            monthly_revenue: 1500.0,
            total_revenue: 20999.5,
            ..DashboardKpis::default()
        };
        let cards = kpi_cards(&kpis);
        assert_eq!(cards[0], ("Total gyms", "12".to_string()));
        assert_eq!(cards[4].1, "1500.00");
        assert_eq!(cards[5].1, "20999.50");
    }
}
