use gymdesk_shared::{models::PLAN_FEATURES, Plan, PlanInput};
use web_sys::HtmlInputElement;
use yew::{prelude::*, TargetCast};

use crate::{
    api,
    components::{
        error_banner::ErrorBanner,
        loading_spinner::{LoadingSpinner, SpinnerSize},
    },
    context::{report_failure, session_token, SessionContext},
    utils::event_value,
};

fn branch_limit_label(plan: &Plan) -> String {
    match plan.max_additional_branches() {
        None => "Unlimited branches".to_string(),
        Some(_) => format!("Up to {} branches", plan.branch_limit),
    }
}

fn feature_label(key: &str) -> String {
    PLAN_FEATURES
        .into_iter()
        .find(|(feature, _)| *feature == key)
        .map_or_else(|| key.to_string(), |(_, label)| label.to_string())
}

/// Writes one editor field. Numbers that fail to parse leave the field as it was.
fn apply_plan_field(input: &mut PlanInput, field: &str, value: &str) {
    match field {
        "name" => input.name = value.to_string(),
        "description" => input.description = value.to_string(),
        "branchLimit" => {
            if let Ok(limit) = value.trim().parse() {
                input.branch_limit = limit;
            }
        },
        "memberLimitPerBranch" => {
            if let Ok(limit) = value.trim().parse() {
                input.member_limit_per_branch = limit;
            }
        },
        "priceMonthly" => {
            if let Ok(price) = value.trim().parse() {
                input.price_monthly = price;
            }
        },
        "priceYearly" => {
            if let Ok(price) = value.trim().parse() {
                input.price_yearly = price;
            }
        },
        _ => {},
    }
}

/// Plan being edited; `id` is `None` for a new plan.
#[derive(Clone, PartialEq)]
struct PlanEditor {
    id: Option<String>,
    input: PlanInput,
}

#[function_component(PlansPage)]
pub fn plans_page() -> Html {
    let session = use_context::<SessionContext>();
    let token = session_token(session.as_ref());
    let plans = use_state(Vec::<Plan>::new);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let editor = use_state(|| None::<PlanEditor>);
    let saving = use_state(|| false);
    let reload = use_state(|| 0_u32);

    {
        let plans = plans.clone();
        let loading = loading.clone();
        let error = error.clone();
        let session = session.clone();
        use_effect_with((*reload, token.clone()), move |(_, token)| {
            let token = token.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::fetch_plans(token.as_deref()).await {
                    Ok(data) => plans.set(data),
                    Err(err) => error.set(Some(report_failure(session.as_ref(), &err))),
                }
                loading.set(false);
            });
            || ()
        });
    }

    let open_new = {
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| {
            editor.set(Some(PlanEditor {
                id: None,
                input: PlanInput::default(),
            }));
        })
    };

    let close_editor = {
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| editor.set(None))
    };

    let on_field = {
        let editor = editor.clone();
        Callback::from(move |(field, value): (&'static str, String)| {
            if let Some(mut current) = (*editor).clone() {
                apply_plan_field(&mut current.input, field, &value);
                editor.set(Some(current));
            }
        })
    };

    let on_feature = {
        let editor = editor.clone();
        Callback::from(move |(key, enabled): (&'static str, bool)| {
            if let Some(mut current) = (*editor).clone() {
                current.input.features.insert(key.to_string(), enabled);
                editor.set(Some(current));
            }
        })
    };

    let on_save = {
        let editor = editor.clone();
        let saving = saving.clone();
        let error = error.clone();
        let reload = reload.clone();
        let session = session.clone();
        let token = token.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(current) = (*editor).clone() else {
                return;
            };
            if *saving {
                return;
            }
            if let Err(err) = current.input.validate() {
                error.set(Some(err.user_message()));
                return;
            }
            saving.set(true);
            let editor = editor.clone();
            let saving = saving.clone();
            let error = error.clone();
            let reload = reload.clone();
            let session = session.clone();
            let token = token.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::save_plan(token.as_deref(), current.id.as_deref(), &current.input).await {
                    Ok(()) => {
                        tracing::info!(plan = %current.input.name, "plan saved");
                        editor.set(None);
                        error.set(None);
                        reload.set(*reload + 1);
                    },
                    Err(err) => error.set(Some(report_failure(session.as_ref(), &err))),
                }
                saving.set(false);
            });
        })
    };

    let on_toggle = {
        let error = error.clone();
        let reload = reload.clone();
        let session = session.clone();
        let token = token.clone();
        Callback::from(move |id: String| {
            let error = error.clone();
            let reload = reload.clone();
            let session = session.clone();
            let token = token.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::toggle_plan(token.as_deref(), &id).await {
                    Ok(()) => reload.set(*reload + 1),
                    Err(err) => error.set(Some(report_failure(session.as_ref(), &err))),
                }
            });
        })
    };

    let cards = plans.iter().map(|plan| {
        let features = plan
            .features
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(key, _)| html! { <li key={key.clone()}>{ feature_label(key) }</li> });
        let edit = {
            let editor = editor.clone();
            let next = PlanEditor {
                id: Some(plan.id.clone()),
                input: PlanInput::from(plan),
            };
            Callback::from(move |_: MouseEvent| editor.set(Some(next.clone())))
        };
        let toggle = {
            let on_toggle = on_toggle.clone();
            let id = plan.id.clone();
            Callback::from(move |_: MouseEvent| on_toggle.emit(id.clone()))
        };
        html! {
            <article key={plan.id.clone()}
                     class="flex flex-col gap-2 rounded-xl border border-[var(--border)] bg-[var(--surface)] p-5">
                <div class="flex items-center justify-between">
                    <h2 class="text-lg font-bold">{ plan.name.clone() }</h2>
                    if !plan.is_active {
                        <span class="text-xs uppercase text-[var(--muted)]">{ "inactive" }</span>
                    }
                </div>
                <p class="text-sm text-[var(--muted)]">{ plan.description.clone() }</p>
                <p class="text-sm">
                    { format!("{:.2} / month · {:.2} / year", plan.price_monthly, plan.price_yearly) }
                </p>
                <p class="text-sm">{ branch_limit_label(plan) }</p>
                <p class="text-sm">{ format!("{} members per branch", plan.member_limit_per_branch) }</p>
                <ul class="list-disc pl-5 text-xs text-[var(--muted)]">{ for features }</ul>
                <div class="mt-auto flex gap-3 pt-2">
                    <button type="button" class="text-xs font-semibold text-[var(--primary)] hover:underline" onclick={edit}>
                        { "Edit" }
                    </button>
                    <button type="button" class="text-xs font-semibold text-[var(--primary)] hover:underline" onclick={toggle}>
                        { if plan.is_active { "Deactivate" } else { "Activate" } }
                    </button>
                </div>
            </article>
        }
    });

    let editor_view = (*editor).clone().map(|current| {
        let text_input = |field: &'static str, label: &'static str, kind: &'static str, value: String| {
            let on_field = on_field.clone();
            let oninput = Callback::from(move |e: InputEvent| on_field.emit((field, event_value(&e))));
            html! {
                <label class="flex flex-col gap-1 text-sm">
                    <span class="font-semibold">{ label }</span>
                    <input type={kind} name={field} {value} {oninput}
                           class="h-10 rounded-lg border border-[var(--border)] px-3" />
                </label>
            }
        };
        let features = PLAN_FEATURES.into_iter().map(|(key, label)| {
            let on_feature = on_feature.clone();
            let checked = current.input.features.get(key).copied().unwrap_or(false);
            let onchange = Callback::from(move |e: Event| {
                let enabled = e.target_dyn_into::<HtmlInputElement>().is_some_and(|input| input.checked());
                on_feature.emit((key, enabled));
            });
            html! {
                <label key={key} class="flex items-center gap-2 text-sm">
                    <input type="checkbox" {checked} {onchange} />
                    { label }
                </label>
            }
        });
        let title = if current.id.is_some() { "Edit plan" } else { "New plan" };
        html! {
            <form class="flex flex-col gap-3 rounded-xl border border-[var(--border)] bg-[var(--surface)] p-5"
                  onsubmit={on_save.clone()}>
                <h2 class="text-lg font-bold">{ title }</h2>
                <fieldset class="grid grid-cols-1 gap-3 md:grid-cols-2" disabled={*saving}>
                    { text_input("name", "Name", "text", current.input.name.clone()) }
                    { text_input("description", "Description", "text", current.input.description.clone()) }
                    { text_input("branchLimit", "Branch limit", "number", current.input.branch_limit.to_string()) }
                    { text_input("memberLimitPerBranch", "Members per branch", "number",
                        current.input.member_limit_per_branch.to_string()) }
                    { text_input("priceMonthly", "Monthly price", "number", current.input.price_monthly.to_string()) }
                    { text_input("priceYearly", "Yearly price", "number", current.input.price_yearly.to_string()) }
                    <div class="flex flex-col gap-1 md:col-span-2">{ for features }</div>
                </fieldset>
                <div class="flex justify-end gap-2">
                    <button type="button" class="rounded-lg border border-[var(--border)] px-4 py-2 text-sm"
                            onclick={close_editor.clone()} disabled={*saving}>
                        { "Cancel" }
                    </button>
                    <button type="submit" class="rounded-lg bg-[var(--primary)] px-4 py-2 text-sm font-semibold text-white"
                            disabled={*saving}>
                        { if *saving { "Saving…" } else { "Save plan" } }
                    </button>
                </div>
            </form>
        }
    });

    html! {
        <main class="mx-auto flex max-w-6xl flex-col gap-4 px-4 py-6">
            <div class="flex flex-wrap items-center justify-between gap-3">
                <h1 class="text-2xl font-bold">{ "Plans" }</h1>
                <button type="button"
                        class="rounded-lg bg-[var(--primary)] px-4 py-2 text-sm font-semibold text-white"
                        onclick={open_new}>
                    { "+ New plan" }
                </button>
            </div>
            if let Some(message) = (*error).clone() {
                <ErrorBanner {message} />
            }
            { editor_view.unwrap_or_default() }
            if *loading {
                <LoadingSpinner size={SpinnerSize::Medium} />
            } else {
                <div class="grid grid-cols-1 gap-4 md:grid-cols-3">{ for cards }</div>
            }
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(name: &str, branch_limit: u32) -> Plan {
        serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "name": name,
            "branchLimit": branch_limit
        }))
        .expect("plan")
    }

    #[test]
    fn only_enterprise_reads_as_unlimited() {
        assert_eq!(branch_limit_label(&plan("Enterprise", 1)), "Unlimited branches");
        assert_eq!(branch_limit_label(&plan("Starter", 0)), "Up to 0 branches");
        assert_eq!(branch_limit_label(&plan("Pro", 5)), "Up to 5 branches");
    }

    #[test]
    fn editor_fields_keep_old_value_on_bad_numbers() {
        let mut input = PlanInput::default();
        apply_plan_field(&mut input, "name", "Gold");
        apply_plan_field(&mut input, "branchLimit", "4");
        apply_plan_field(&mut input, "priceMonthly", "49.5");
        apply_plan_field(&mut input, "memberLimitPerBranch", "lots");
        assert_eq!(input.name, "Gold");
        assert_eq!(input.branch_limit, 4);
        assert_eq!(input.price_monthly, 49.5);
        assert_eq!(input.member_limit_per_branch, 300);
    }

    #[test]
    fn feature_keys_show_their_labels() {
        let (key, label) = PLAN_FEATURES[0];
        assert_eq!(feature_label(key), label);
        assert_eq!(feature_label("unknown"), "unknown");
    }
}
