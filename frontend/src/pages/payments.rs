use gymdesk_shared::{
    wire::{OrganizationQuery, PaymentQuery},
    BillingCycle, NewPayment, OrganizationSummary, PaymentMode, PaymentRecord,
};
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

/// Organizations offered in the payment form; large enough for a picker.
const ORGANIZATION_PICKER_LIMIT: usize = 100;

/// Fills in the organization and the subscription it is billed under.
fn pick_organization(payment: &mut NewPayment, organizations: &[OrganizationSummary], id: &str) {
    let picked = organizations.iter().find(|org| org.id == id);
    payment.gym_organization = picked.map(|org| org.id.clone()).unwrap_or_default();
    payment.subscription_id = picked
        .and_then(OrganizationSummary::subscription_id)
        .unwrap_or_default()
        .to_string();
}

fn payment_date(record: &PaymentRecord) -> String {
    record
        .payment_date
        .as_deref()
        .and_then(|raw| raw.get(..10))
        .unwrap_or("—")
        .to_string()
}

#[function_component(PaymentsPage)]
pub fn payments_page() -> Html {
    let session = use_context::<SessionContext>();
    let token = session_token(session.as_ref());
    let query = use_state(PaymentQuery::default);
    let payments = use_state(Vec::<PaymentRecord>::new);
    let total = use_state(|| 0_usize);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let notice = use_state(|| None::<String>);
    let organizations = use_state(Vec::<OrganizationSummary>::new);
    let draft = use_state(NewPayment::default);
    let amount_input = use_state(String::new);
    let recording = use_state(|| false);
    let reload = use_state(|| 0_u32);

    {
        let organizations = organizations.clone();
        let error = error.clone();
        let session = session.clone();
        use_effect_with(token.clone(), move |token| {
            let token = token.clone();
            let query = OrganizationQuery {
                limit: ORGANIZATION_PICKER_LIMIT,
                ..OrganizationQuery::default()
            };
            wasm_bindgen_futures::spawn_local(async move {
                match api::fetch_organizations(token.as_deref(), &query).await {
                    Ok(page) => organizations.set(page.items),
                    Err(err) => error.set(Some(report_failure(session.as_ref(), &err))),
                }
            });
            || ()
        });
    }

    {
        let payments = payments.clone();
        let total = total.clone();
        let loading = loading.clone();
        let error = error.clone();
        let session = session.clone();
        use_effect_with(((*query).clone(), *reload, token.clone()), move |(query, _, token)| {
            let query = query.clone();
            let token = token.clone();
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match api::fetch_payments(token.as_deref(), &query).await {
                    Ok(page) => {
                        payments.set(page.items);
                        total.set(page.total);
                    },
                    Err(err) => error.set(Some(report_failure(session.as_ref(), &err))),
                }
                loading.set(false);
            });
            || ()
        });
    }

    let on_organization = {
        let draft = draft.clone();
        let organizations = organizations.clone();
        Callback::from(move |e: Event| {
            let mut next = (*draft).clone();
            pick_organization(&mut next, &organizations, &event_value(&e));
            draft.set(next);
        })
    };

    let on_amount = {
        let amount_input = amount_input.clone();
        Callback::from(move |e: InputEvent| amount_input.set(event_value(&e)))
    };

    let on_cycle = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            if let Ok(cycle) = event_value(&e).parse::<BillingCycle>() {
                draft.set(NewPayment {
                    billing_cycle: cycle,
                    ..(*draft).clone()
                });
            }
        })
    };

    let on_mode = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            if let Ok(mode) = event_value(&e).parse::<PaymentMode>() {
                draft.set(NewPayment {
                    payment_mode: mode,
                    ..(*draft).clone()
                });
            }
        })
    };

    let on_reference = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            draft.set(NewPayment {
                transaction_reference: event_value(&e),
                ..(*draft).clone()
            });
        })
    };

    let on_notes = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            draft.set(NewPayment {
                notes: event_value(&e),
                ..(*draft).clone()
            });
        })
    };

    let on_record = {
        let draft = draft.clone();
        let amount_input = amount_input.clone();
        let recording = recording.clone();
        let error = error.clone();
        let notice = notice.clone();
        let reload = reload.clone();
        let session = session.clone();
        let token = token.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *recording {
                return;
            }
            let payment = NewPayment {
                amount: amount_input.trim().parse().unwrap_or(0.0),
                ..(*draft).clone()
            };
            if let Err(err) = payment.validate() {
                error.set(Some(err.user_message()));
                return;
            }
            recording.set(true);
            let draft = draft.clone();
            let amount_input = amount_input.clone();
            let recording = recording.clone();
            let error = error.clone();
            let notice = notice.clone();
            let reload = reload.clone();
            let session = session.clone();
            let token = token.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::record_payment(token.as_deref(), &payment).await {
                    Ok(()) => {
                        tracing::info!(organization = %payment.gym_organization, amount = payment.amount, "payment recorded");
                        notice.set(Some(format!("Payment of {:.2} recorded", payment.amount)));
                        error.set(None);
                        draft.set(NewPayment::default());
                        amount_input.set(String::new());
                        reload.set(*reload + 1);
                    },
                    Err(err) => error.set(Some(report_failure(session.as_ref(), &err))),
                }
                recording.set(false);
            });
        })
    };

    let on_page_change = {
        let query = query.clone();
        Callback::from(move |page: usize| {
            query.set(PaymentQuery {
                page: page.saturating_sub(1),
                ..(*query).clone()
            });
        })
    };

    let total_pages = total.div_ceil(query.limit.max(1));
    let rows = payments.iter().map(|payment| {
        html! {
            <tr key={payment.id.clone()} class="border-t border-[var(--border)]">
                <td class="px-3 py-2">{ payment_date(payment) }</td>
                <td class="px-3 py-2 font-semibold">{ payment.organization_name() }</td>
                <td class="px-3 py-2">{ format!("{:.2}", payment.amount) }</td>
                <td class="px-3 py-2">{ payment.payment_mode.clone() }</td>
                <td class="px-3 py-2">{ payment.billing_cycle.clone() }</td>
                <td class="px-3 py-2">{ payment.transaction_reference.clone() }</td>
                <td class="px-3 py-2">{ payment.entered_by_name() }</td>
            </tr>
        }
    });

    let field_class = "h-10 rounded-lg border border-[var(--border)] px-3 text-sm";

    html! {
        <main class="mx-auto flex max-w-6xl flex-col gap-4 px-4 py-6">
            <h1 class="text-2xl font-bold">{ "Payments" }</h1>
            if let Some(message) = (*error).clone() {
                <ErrorBanner {message} />
            }
            if let Some(message) = (*notice).clone() {
                <p class="rounded-lg bg-emerald-500/10 px-4 py-2 text-sm text-emerald-700" role="status">
                    { message }
                </p>
            }

            <form class="rounded-xl border border-[var(--border)] bg-[var(--surface)] p-5" onsubmit={on_record}>
                <fieldset class="grid grid-cols-1 gap-3 md:grid-cols-3" disabled={*recording}>
                    <select class={field_class} onchange={on_organization}>
                        <option value="" selected={draft.gym_organization.is_empty()}>{ "Select organization" }</option>
                        { for organizations.iter().map(|org| html! {
                            <option key={org.id.clone()} value={org.id.clone()}
                                    selected={draft.gym_organization == org.id}>
                                { org.name.clone() }
                            </option>
                        }) }
                    </select>
                    <input type="number" step="0.01" min="0" placeholder="Amount" class={field_class}
                           value={(*amount_input).clone()} oninput={on_amount} />
                    <select class={field_class} onchange={on_cycle}>
                        { for [BillingCycle::Monthly, BillingCycle::Yearly].into_iter().map(|cycle| html! {
                            <option value={cycle.as_str()} selected={draft.billing_cycle == cycle}>{ cycle.as_str() }</option>
                        }) }
                    </select>
                    <select class={field_class} onchange={on_mode}>
                        { for PaymentMode::ALL.into_iter().map(|mode| html! {
                            <option value={mode.as_str()} selected={draft.payment_mode == mode}>{ mode.label() }</option>
                        }) }
                    </select>
                    <input type="text" placeholder="Transaction reference" class={field_class}
                           value={draft.transaction_reference.clone()} oninput={on_reference} />
                    <input type="text" placeholder="Notes" class={field_class}
                           value={draft.notes.clone()} oninput={on_notes} />
                </fieldset>
                if !draft.gym_organization.is_empty() && draft.subscription_id.is_empty() {
                    <p class="mt-2 text-xs text-amber-700">{ "This organization has no subscription to credit" }</p>
                }
                <div class="mt-3 flex justify-end">
                    <button type="submit" class="rounded-lg bg-[var(--primary)] px-4 py-2 text-sm font-semibold text-white"
                            disabled={*recording}>
                        { if *recording { "Recording…" } else { "Record payment" } }
                    </button>
                </div>
            </form>

            if *loading {
                <LoadingSpinner size={SpinnerSize::Medium} />
            } else if payments.is_empty() {
                <p class="py-10 text-center text-sm text-[var(--muted)]">{ "No payments recorded" }</p>
            } else {
                <div class="overflow-x-auto rounded-xl border border-[var(--border)]">
                    <table class="w-full text-left text-sm">
                        <thead class="bg-[var(--surface-alt)] text-xs uppercase text-[var(--muted)]">
                            <tr>
                                <th class="px-3 py-2">{ "Date" }</th>
                                <th class="px-3 py-2">{ "Organization" }</th>
                                <th class="px-3 py-2">{ "Amount" }</th>
                                <th class="px-3 py-2">{ "Mode" }</th>
                                <th class="px-3 py-2">{ "Cycle" }</th>
                                <th class="px-3 py-2">{ "Reference" }</th>
                                <th class="px-3 py-2">{ "Entered by" }</th>
                            </tr>
                        </thead>
                        <tbody>{ for rows }</tbody>
                    </table>
                </div>
            }
            <div class="flex items-center justify-between text-sm text-[var(--muted)]">
                <span>{ format!("{} payments", *total) }</span>
                <Pagination current_page={query.page + 1} {total_pages} {on_page_change} />
            </div>
        </main>
    }
}
