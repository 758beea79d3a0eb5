use gymdesk_shared::{
    models::{ORG_STATUS_ACTIVE, ORG_STATUS_SUSPENDED},
    wire::{OrganizationAction, OrganizationQuery, DEFAULT_PAGE_SIZE},
    CreatedOrganization, OrganizationSummary, Plan,
};
use web_sys::window;
use yew::prelude::*;

use crate::{
    api,
    components::{
        creation_dialog::CreateOrganizationDialog,
        error_banner::ErrorBanner,
        loading_spinner::{LoadingSpinner, SpinnerSize},
        pagination::Pagination,
        status_badge::StatusBadge,
    },
    context::{report_failure, session_token, SessionContext},
    utils::{event_value, format_date},
};

const PAGE_SIZES: [usize; 3] = [10, 25, 50];

/// Row actions that make sense for an organization in `status`.
fn actions_for(status: &str) -> Vec<OrganizationAction> {
    OrganizationAction::ALL
        .into_iter()
        .filter(|action| match action {
            OrganizationAction::Suspend => status == ORG_STATUS_ACTIVE,
            OrganizationAction::Reactivate => status == ORG_STATUS_SUSPENDED,
            OrganizationAction::Delete | OrganizationAction::ResetPassword => true,
        })
        .collect()
}

fn confirm(message: &str) -> bool {
    window()
        .and_then(|win| win.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[function_component(OrganizationsPage)]
pub fn organizations_page() -> Html {
    let session = use_context::<SessionContext>();
    let token = session_token(session.as_ref());
    let query = use_state(OrganizationQuery::default);
    let search_input = use_state(String::new);
    let organizations = use_state(Vec::<OrganizationSummary>::new);
    let total = use_state(|| 0_usize);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let notice = use_state(|| None::<String>);
    let plans = use_state(Vec::<Plan>::new);
    let dialog_open = use_state(|| false);
    let reload = use_state(|| 0_u32);

    {
        let plans = plans.clone();
        let error = error.clone();
        let session = session.clone();
        use_effect_with(token.clone(), move |token| {
            let token = token.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::fetch_plans(token.as_deref()).await {
                    Ok(data) => plans.set(data),
                    Err(err) => error.set(Some(report_failure(session.as_ref(), &err))),
                }
            });
            || ()
        });
    }

    {
        let organizations = organizations.clone();
        let total = total.clone();
        let loading = loading.clone();
        let error = error.clone();
        let session = session.clone();
        use_effect_with(((*query).clone(), *reload, token.clone()), move |(query, _, token)| {
            let query = query.clone();
            let token = token.clone();
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match api::fetch_organizations(token.as_deref(), &query).await {
                    Ok(page) => {
                        organizations.set(page.items);
                        total.set(page.total);
                        error.set(None);
                    },
                    Err(err) => {
                        organizations.set(Vec::new());
                        total.set(0);
                        error.set(Some(report_failure(session.as_ref(), &err)));
                    },
                }
                loading.set(false);
            });
            || ()
        });
    }

    let on_search_input = {
        let search_input = search_input.clone();
        Callback::from(move |e: InputEvent| search_input.set(event_value(&e)))
    };

    let on_search = {
        let query = query.clone();
        let search_input = search_input.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            query.set(OrganizationQuery {
                search: (*search_input).trim().to_string(),
                page: 0,
                ..(*query).clone()
            });
        })
    };

    let on_status = {
        let query = query.clone();
        Callback::from(move |e: Event| {
            query.set(OrganizationQuery {
                status: event_value(&e),
                page: 0,
                ..(*query).clone()
            });
        })
    };

    let on_page_size = {
        let query = query.clone();
        Callback::from(move |e: Event| {
            let limit = event_value(&e).parse().unwrap_or(DEFAULT_PAGE_SIZE);
            query.set(OrganizationQuery {
                limit,
                page: 0,
                ..(*query).clone()
            });
        })
    };

    let on_page_change = {
        let query = query.clone();
        Callback::from(move |page: usize| {
            query.set(OrganizationQuery {
                page: page.saturating_sub(1),
                ..(*query).clone()
            });
        })
    };

    let open_dialog = {
        let dialog_open = dialog_open.clone();
        Callback::from(move |_: MouseEvent| dialog_open.set(true))
    };
    let close_dialog = {
        let dialog_open = dialog_open.clone();
        Callback::from(move |_: ()| dialog_open.set(false))
    };
    let on_created = {
        let dialog_open = dialog_open.clone();
        let reload = reload.clone();
        let notice = notice.clone();
        Callback::from(move |created: CreatedOrganization| {
            dialog_open.set(false);
            notice.set(Some(if created.name.is_empty() {
                "Organization created".to_string()
            } else {
                format!("Organization \"{}\" created", created.name)
            }));
            reload.set(*reload + 1);
        })
    };

    let run_action = {
        let reload = reload.clone();
        let error = error.clone();
        let notice = notice.clone();
        let session = session.clone();
        let token = token.clone();
        Callback::from(move |(id, name, action): (String, String, OrganizationAction)| {
            if action == OrganizationAction::Delete
                && !confirm(&format!("Delete organization \"{name}\"? This cannot be undone."))
            {
                return;
            }
            let reload = reload.clone();
            let error = error.clone();
            let notice = notice.clone();
            let session = session.clone();
            let token = token.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::organization_action(token.as_deref(), &id, action).await {
                    Ok(()) => {
                        tracing::info!(organization = %id, "{} done", action.label());
                        notice.set(Some(format!("{}: {name}", action.label())));
                        reload.set(*reload + 1);
                    },
                    Err(err) => error.set(Some(report_failure(session.as_ref(), &err))),
                }
            });
        })
    };

    let limit = query.limit.max(1);
    let total_pages = total.div_ceil(limit);
    let rows = organizations.iter().map(|org| {
        let actions = actions_for(&org.status).into_iter().map(|action| {
            let run_action = run_action.clone();
            let payload = (org.id.clone(), org.name.clone(), action);
            let onclick = Callback::from(move |_: MouseEvent| run_action.emit(payload.clone()));
            html! {
                <button type="button" class="text-xs font-semibold text-[var(--primary)] hover:underline" {onclick}>
                    { action.label() }
                </button>
            }
        });
        html! {
            <tr key={org.id.clone()} class="border-t border-[var(--border)]">
                <td class="px-3 py-2 font-semibold">{ org.name.clone() }</td>
                <td class="px-3 py-2">
                    <div>{ org.owner_name.clone() }</div>
                    <div class="text-xs text-[var(--muted)]">{ org.owner_email.clone() }</div>
                </td>
                <td class="px-3 py-2">{ org.plan_name().unwrap_or("—") }</td>
                <td class="px-3 py-2"><StatusBadge status={org.status.clone()} /></td>
                <td class="px-3 py-2">{ format_date(org.expiry_date()) }</td>
                <td class="px-3 py-2"><div class="flex flex-wrap gap-2">{ for actions }</div></td>
            </tr>
        }
    });

    html! {
        <main class="mx-auto flex max-w-6xl flex-col gap-4 px-4 py-6">
            <div class="flex flex-wrap items-center justify-between gap-3">
                <h1 class="text-2xl font-bold">{ "Organizations" }</h1>
                <button type="button"
                        class="rounded-lg bg-[var(--primary)] px-4 py-2 text-sm font-semibold text-white"
                        onclick={open_dialog}>
                    { "+ New organization" }
                </button>
            </div>

            if let Some(message) = (*error).clone() {
                <ErrorBanner {message} />
            }
            if let Some(message) = (*notice).clone() {
                <p class="rounded-lg bg-emerald-500/10 px-4 py-2 text-sm text-emerald-700" role="status">
                    { message }
                </p>
            }

            <div class="flex flex-wrap items-center gap-3">
                <form class="flex gap-2" onsubmit={on_search}>
                    <input type="search" placeholder="Search by name or email"
                           class="h-10 rounded-lg border border-[var(--border)] px-3 text-sm"
                           value={(*search_input).clone()} oninput={on_search_input} />
                    <button type="submit" class="h-10 rounded-lg border border-[var(--border)] px-3 text-sm">
                        { "Search" }
                    </button>
                </form>
                <select class="h-10 rounded-lg border border-[var(--border)] px-3 text-sm" onchange={on_status}>
                    <option value="" selected={query.status.is_empty()}>{ "All statuses" }</option>
                    <option value={ORG_STATUS_ACTIVE} selected={query.status == ORG_STATUS_ACTIVE}>{ "Active" }</option>
                    <option value={ORG_STATUS_SUSPENDED} selected={query.status == ORG_STATUS_SUSPENDED}>{ "Suspended" }</option>
                </select>
                <select class="h-10 rounded-lg border border-[var(--border)] px-3 text-sm" onchange={on_page_size}>
                    { for PAGE_SIZES.into_iter().map(|size| html! {
                        <option value={size.to_string()} selected={size == limit}>{ format!("{size} / page") }</option>
                    }) }
                </select>
            </div>

            if *loading {
                <LoadingSpinner size={SpinnerSize::Medium} />
            } else if organizations.is_empty() {
                <p class="py-10 text-center text-sm text-[var(--muted)]">{ "No organizations found" }</p>
            } else {
                <div class="overflow-x-auto rounded-xl border border-[var(--border)]">
                    <table class="w-full text-left text-sm">
                        <thead class="bg-[var(--surface-alt)] text-xs uppercase text-[var(--muted)]">
                            <tr>
                                <th class="px-3 py-2">{ "Organization" }</th>
                                <th class="px-3 py-2">{ "Owner" }</th>
                                <th class="px-3 py-2">{ "Plan" }</th>
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
                <span>{ format!("{} organizations", *total) }</span>
                <Pagination current_page={query.page + 1} {total_pages} {on_page_change} />
            </div>

            if *dialog_open {
                <CreateOrganizationDialog
                    plans={(*plans).clone()}
                    on_close={close_dialog}
                    {on_created}
                />
            }
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suspend_and_reactivate_follow_status() {
        let active = actions_for(ORG_STATUS_ACTIVE);
        assert!(active.contains(&OrganizationAction::Suspend));
        assert!(!active.contains(&OrganizationAction::Reactivate));

        let suspended = actions_for(ORG_STATUS_SUSPENDED);
        assert!(suspended.contains(&OrganizationAction::Reactivate));
        assert!(!suspended.contains(&OrganizationAction::Suspend));
        assert!(suspended.contains(&OrganizationAction::Delete));
    }
}
