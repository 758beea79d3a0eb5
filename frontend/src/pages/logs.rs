use gymdesk_shared::{models::AUDIT_ACTIONS, wire::LogQuery, AuditLogEntry};
use yew::prelude::*;

use crate::{
    api,
    components::{
        error_banner::ErrorBanner,
        loading_spinner::{LoadingSpinner, SpinnerSize},
        pagination::Pagination,
    },
    context::{report_failure, session_token, SessionContext},
    utils::event_value,
};

/// `2026-02-01T10:15:00.000Z` → `2026-02-01 10:15`.
fn log_time(entry: &AuditLogEntry) -> String {
    entry
        .timestamp
        .as_deref()
        .and_then(|raw| raw.get(..16))
        .map(|stamp| stamp.replacen('T', " ", 1))
        .unwrap_or_else(|| "—".to_string())
}

#[function_component(LogsPage)]
pub fn logs_page() -> Html {
    let session = use_context::<SessionContext>();
    let token = session_token(session.as_ref());
    let query = use_state(LogQuery::default);
    let search_input = use_state(String::new);
    let logs = use_state(Vec::<AuditLogEntry>::new);
    let total = use_state(|| 0_usize);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);

    {
        let logs = logs.clone();
        let total = total.clone();
        let loading = loading.clone();
        let error = error.clone();
        use_effect_with(((*query).clone(), token), move |(query, token)| {
            let query = query.clone();
            let token = token.clone();
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match api::fetch_logs(token.as_deref(), &query).await {
                    Ok(page) => {
                        logs.set(page.items);
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

    let on_search_input = {
        let search_input = search_input.clone();
        Callback::from(move |e: InputEvent| search_input.set(event_value(&e)))
    };

    let on_search = {
        let query = query.clone();
        let search_input = search_input.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            query.set(LogQuery {
                search: (*search_input).trim().to_string(),
                page: 0,
                ..(*query).clone()
            });
        })
    };

    let on_action = {
        let query = query.clone();
        Callback::from(move |e: Event| {
            query.set(LogQuery {
                action: event_value(&e),
                page: 0,
                ..(*query).clone()
            });
        })
    };

    let on_page_change = {
        let query = query.clone();
        Callback::from(move |page: usize| {
            query.set(LogQuery {
                page: page.saturating_sub(1),
                ..(*query).clone()
            });
        })
    };

    let total_pages = total.div_ceil(query.limit.max(1));
    let rows = logs.iter().map(|entry| {
        html! {
            <tr key={entry.id.clone()} class="border-t border-[var(--border)] align-top">
                <td class="whitespace-nowrap px-3 py-2">{ log_time(entry) }</td>
                <td class="px-3 py-2 font-semibold">{ entry.action.clone() }</td>
                <td class="px-3 py-2">{ entry.organization_name() }</td>
                <td class="px-3 py-2">{ entry.performed_by_name() }</td>
                <td class="break-all px-3 py-2 text-xs text-[var(--muted)]">{ entry.details_text() }</td>
            </tr>
        }
    });

    html! {
        <main class="mx-auto flex max-w-6xl flex-col gap-4 px-4 py-6">
            <h1 class="text-2xl font-bold">{ "Audit logs" }</h1>
            if let Some(message) = (*error).clone() {
                <ErrorBanner {message} />
            }
            <div class="flex flex-wrap items-center gap-3">
                <form class="flex gap-2" onsubmit={on_search}>
                    <input type="search" placeholder="Search details"
                           class="h-10 rounded-lg border border-[var(--border)] px-3 text-sm"
                           value={(*search_input).clone()} oninput={on_search_input} />
                    <button type="submit" class="h-10 rounded-lg border border-[var(--border)] px-3 text-sm">
                        { "Search" }
                    </button>
                </form>
                <select class="h-10 rounded-lg border border-[var(--border)] px-3 text-sm" onchange={on_action}>
                    <option value="" selected={query.action.is_empty()}>{ "All actions" }</option>
                    { for AUDIT_ACTIONS.into_iter().map(|action| html! {
                        <option value={action} selected={query.action == action}>{ action }</option>
                    }) }
                </select>
            </div>
            if *loading {
                <LoadingSpinner size={SpinnerSize::Medium} />
            } else if logs.is_empty() {
                <p class="py-10 text-center text-sm text-[var(--muted)]">{ "No log entries" }</p>
            } else {
                <div class="overflow-x-auto rounded-xl border border-[var(--border)]">
                    <table class="w-full text-left text-sm">
                        <thead class="bg-[var(--surface-alt)] text-xs uppercase text-[var(--muted)]">
                            <tr>
                                <th class="px-3 py-2">{ "Time" }</th>
                                <th class="px-3 py-2">{ "Action" }</th>
                                <th class="px-3 py-2">{ "Organization" }</th>
                                <th class="px-3 py-2">{ "By" }</th>
                                <th class="px-3 py-2">{ "Details" }</th>
                            </tr>
                        </thead>
                        <tbody>{ for rows }</tbody>
                    </table>
                </div>
            }
            <div class="flex items-center justify-between text-sm text-[var(--muted)]">
                <span>{ format!("{} entries", *total) }</span>
                <Pagination current_page={query.page + 1} {total_pages} {on_page_change} />
            </div>
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_time_drops_seconds_and_zone() {
        let entry: AuditLogEntry = serde_json::from_value(serde_json::json!({
            "_id": "log-1",
            "timestamp": "2026-02-01T10:15:42.000Z"
        }))
        .expect("entry");
        assert_eq!(log_time(&entry), "2026-02-01 10:15");

        let undated: AuditLogEntry = serde_json::from_value(serde_json::json!({ "_id": "log-2" })).expect("entry");
        assert_eq!(log_time(&undated), "—");
    }
}
