use gymdesk_shared::{
    wire::{SubscriptionAction, SubscriptionQuery, DEFAULT_EXTEND_DAYS, SUBSCRIPTIONS_CSV_FILE},
    BillingCycle, SubscriptionRecord,
};
use yew::prelude::*;

use crate::{
    api,
    components::{
        error_banner::ErrorBanner,
        loading_spinner::{LoadingSpinner, SpinnerSize},
        pagination::Pagination,
        status_badge::StatusBadge,
    },
    context::{report_failure, session_token, SessionContext},
    utils::{download_csv, event_value},
};

const STATUSES: [&str; 4] = ["active", "expired", "suspended", "cancelled"];

fn action_label(action: SubscriptionAction) -> String {
    match action {
        SubscriptionAction::Renew(cycle) => format!("Renew ({cycle})"),
        SubscriptionAction::Extend {
            days,
        } => format!("Extend {days}d"),
        SubscriptionAction::Suspend => "Suspend".to_string(),
        SubscriptionAction::Cancel => "Cancel".to_string(),
    }
}

#[function_component(SubscriptionsPage)]
pub fn subscriptions_page() -> Html {
    let session = use_context::<SessionContext>();
    let token = session_token(session.as_ref());
    let query = use_state(SubscriptionQuery::default);
    let subscriptions = use_state(Vec::<SubscriptionRecord>::new);
    let total = use_state(|| 0_usize);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let reload = use_state(|| 0_u32);
    let exporting = use_state(|| false);

    {
        let subscriptions = subscriptions.clone();
        let total = total.clone();
        let loading = loading.clone();
        let error = error.clone();
        let session = session.clone();
        use_effect_with(((*query).clone(), *reload, token.clone()), move |(query, _, token)| {
            let query = query.clone();
            let token = token.clone();
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match api::fetch_subscriptions(token.as_deref(), &query).await {
                    Ok(page) => {
                        subscriptions.set(page.items);
                        total.set(page.total);
                        error.set(None);
                    },
                    Err(err) => error.set(Some(report_failure(session.as_ref(), &err))),
                }
                loading.set(false);
            });
            || ()
        });
    }

    let on_status = {
        let query = query.clone();
        Callback::from(move |e: Event| {
            query.set(SubscriptionQuery {
                status: event_value(&e),
                page: 0,
                ..(*query).clone()
            });
        })
    };

    let on_page_change = {
        let query = query.clone();
        Callback::from(move |page: usize| {
            query.set(SubscriptionQuery {
                page: page.saturating_sub(1),
                ..(*query).clone()
            });
        })
    };

    let on_export = {
        let exporting = exporting.clone();
        let error = error.clone();
        let session = session.clone();
        let token = token.clone();
        Callback::from(move |_: MouseEvent| {
            if *exporting {
                return;
            }
            exporting.set(true);
            let exporting = exporting.clone();
            let error = error.clone();
            let session = session.clone();
            let token = token.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = match api::export_subscriptions_csv(token.as_deref()).await {
                    Ok(csv) => download_csv(SUBSCRIPTIONS_CSV_FILE, &csv),
                    Err(err) => Err(report_failure(session.as_ref(), &err)),
                };
                if let Err(message) = result {
                    error.set(Some(message));
                }
                exporting.set(false);
            });
        })
    };

    let run_action = {
        let reload = reload.clone();
        let error = error.clone();
        Callback::from(move |(id, action): (String, SubscriptionAction)| {
            let reload = reload.clone();
            let error = error.clone();
            let session = session.clone();
            let token = token.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::subscription_action(token.as_deref(), &id, action).await {
                    Ok(()) => {
                        tracing::info!(subscription = %id, ?action, "subscription updated");
                        reload.set(*reload + 1);
                    },
                    Err(err) => error.set(Some(report_failure(session.as_ref(), &err))),
                }
            });
        })
    };

    let total_pages = total.div_ceil(query.limit.max(1));
    let rows = subscriptions.iter().map(|sub| {
        let cycle = sub.billing_cycle.parse().unwrap_or(BillingCycle::Monthly);
        let actions = [
            SubscriptionAction::Renew(cycle),
            SubscriptionAction::Extend {
                days: DEFAULT_EXTEND_DAYS,
            },
            SubscriptionAction::Suspend,
            SubscriptionAction::Cancel,
        ]
        .into_iter()
        .map(|action| {
            let run_action = run_action.clone();
            let id = sub.id.clone();
            let onclick = Callback::from(move |_: MouseEvent| run_action.emit((id.clone(), action)));
            html! {
                <button type="button" class="text-xs font-semibold text-[var(--primary)] hover:underline" {onclick}>
                    { action_label(action) }
                </button>
            }
        });
        html! {
            <tr key={sub.id.clone()} class="border-t border-[var(--border)]">
                <td class="px-3 py-2 font-semibold">{ sub.organization_name() }</td>
                <td class="px-3 py-2">{ sub.plan.as_ref().map(|plan| plan.name.clone()).unwrap_or_default() }</td>
                <td class="px-3 py-2">{ sub.billing_cycle.clone() }</td>
                <td class="px-3 py-2"><StatusBadge status={sub.status.clone()} /></td>
                <td class="px-3 py-2">
                    { sub.expiry_date.as_deref().and_then(|raw| raw.get(..10)).unwrap_or("—").to_string() }
                </td>
                <td class="px-3 py-2"><div class="flex flex-wrap gap-2">{ for actions }</div></td>
            </tr>
        }
    });

    html! {
        <main class="mx-auto flex max-w-6xl flex-col gap-4 px-4 py-6">
            <div class="flex flex-wrap items-center justify-between gap-3">
                <h1 class="text-2xl font-bold">{ "Subscriptions" }</h1>
                <button type="button" class="rounded-lg border border-[var(--border)] px-4 py-2 text-sm font-semibold"
                        onclick={on_export} disabled={*exporting}>
                    { if *exporting { "Exporting…" } else { "Export CSV" } }
                </button>
            </div>
            if let Some(message) = (*error).clone() {
                <ErrorBanner {message} />
            }
            <select class="h-10 w-48 rounded-lg border border-[var(--border)] px-3 text-sm" onchange={on_status}>
                <option value="" selected={query.status.is_empty()}>{ "All statuses" }</option>
                { for STATUSES.into_iter().map(|status| html! {
                    <option value={status} selected={query.status == status}>{ status }</option>
                }) }
            </select>
            if *loading {
                <LoadingSpinner size={SpinnerSize::Medium} />
            } else {
                <div class="overflow-x-auto rounded-xl border border-[var(--border)]">
                    <table class="w-full text-left text-sm">
                        <thead class="bg-[var(--surface-alt)] text-xs uppercase text-[var(--muted)]">
                            <tr>
                                <th class="px-3 py-2">{ "Organization" }</th>
                                <th class="px-3 py-2">{ "Plan" }</th>
                                <th class="px-3 py-2">{ "Cycle" }</th>
                                <th class="px-3 py-2">{ "Status" }</th>
                                <th class="px-3 py-2">{ "Expires" }</th>
                                <th class="px-3 py-2">{ "Actions" }</th>
                            </tr>
                        </thead>
                        <tbody>{ for rows }</tbody>
                    </table>
                </div>
            }
            <div class="flex items-center justify-between text-sm text-[var(--muted)]">
                <span>{ format!("{} subscriptions", *total) }</span>
                <Pagination current_page={query.page + 1} {total_pages} {on_page_change} />
            </div>
        </main>
    }
}
