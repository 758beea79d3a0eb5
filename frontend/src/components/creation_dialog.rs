use std::rc::Rc;

use gymdesk_shared::{
    BillingCycle, BranchDraft, CreatedOrganization, CreationDialog, FieldUpdate, FormError, Plan,
};
use web_sys::File;
use yew::prelude::*;

use crate::{
    api,
    components::error_banner::ErrorBanner,
    context::{report_failure, session_token, SessionContext},
    utils::{event_file, event_value, format_date, today},
};

const INPUT_CLASSES: &str = "h-10 rounded-lg border border-[var(--border)] bg-[var(--surface)] px-3 \
                             text-sm text-[var(--text)] focus:border-[var(--primary)] focus:outline-none";
const SECTION_CLASSES: &str = "grid grid-cols-1 gap-3 md:grid-cols-2";

#[derive(Properties, PartialEq)]
pub struct CreateOrganizationDialogProps {
    pub plans: Vec<Plan>,
    pub on_close: Callback<()>,
    pub on_created: Callback<CreatedOrganization>,
}

fn text_field(label: &'static str, kind: &'static str, value: String, oninput: Callback<InputEvent>) -> Html {
    html! {
        <label class="flex flex-col gap-1 text-sm">
            <span class="font-semibold text-[var(--text)]">{ label }</span>
            <input type={kind} class={INPUT_CLASSES} value={value} {oninput} />
        </label>
    }
}

fn section_title(title: &'static str) -> Html {
    html! {
        <h3 class="mt-4 mb-2 text-xs font-semibold uppercase tracking-[0.08em] text-[var(--muted)]">
            { title }
        </h3>
    }
}

/// Inputs shared by the main branch and every additional branch. `prefix`
/// is the dotted path of the branch record.
fn branch_fields(
    prefix: &str,
    branch: &BranchDraft,
    on_input: &dyn Fn(String) -> Callback<InputEvent>,
) -> Html {
    let path = |field: &str| format!("{prefix}.{field}");
    html! {
        <div class={SECTION_CLASSES}>
            { text_field("Branch name", "text", branch.name.clone(), on_input(path("name"))) }
            { text_field("Phone", "tel", branch.phone.clone(), on_input(path("phone"))) }
            { text_field("Street", "text", branch.address.street.clone(), on_input(path("address.street"))) }
            { text_field("City", "text", branch.address.city.clone(), on_input(path("address.city"))) }
            { text_field("State", "text", branch.address.state.clone(), on_input(path("address.state"))) }
            { text_field("Pincode", "text", branch.address.pincode.clone(), on_input(path("address.pincode"))) }
            { text_field("Floors", "number", branch.floor_count.to_string(), on_input(path("floorCount"))) }
        </div>
    }
}

/// Only the Enterprise plan reports no bound; every other plan, `branchLimit`
/// 0 included, shows its maximum.
fn capacity_hint(plan: Option<&Plan>, current: usize) -> String {
    match plan {
        None => "Select a plan to add branches".to_string(),
        Some(plan) => match plan.max_additional_branches() {
            None => format!("{current} additional branches (unlimited on {})", plan.name),
            Some(max) => format!("{current} of {max} additional branches on {}", plan.name),
        },
    }
}

#[function_component(CreateOrganizationDialog)]
pub fn create_organization_dialog(props: &CreateOrganizationDialogProps) -> Html {
    let dialog = use_mut_ref(|| {
        let mut dialog = CreationDialog::<File>::new();
        dialog.open();
        dialog
    });
    let refresh = use_force_update();
    let local_error = use_state(|| None::<String>);
    let session = use_context::<SessionContext>();

    let edit: Rc<dyn Fn(String, String)> = {
        let dialog = dialog.clone();
        let refresh = refresh.clone();
        let local_error = local_error.clone();
        Rc::new(move |path: String, raw: String| {
            let applied = FieldUpdate::from_path(&path, &raw).and_then(|update| {
                dialog
                    .borrow_mut()
                    .form_mut()
                    .map(|form| form.apply_at(update, today()))
            });
            match applied {
                Ok(()) => local_error.set(None),
                // the inputs are disabled while submitting; a late event changes nothing
                Err(FormError::SubmissionInFlight) => {},
                Err(err) => local_error.set(Some(err.user_message())),
            }
            refresh.force_update();
        })
    };
    let on_input = |path: String| {
        let edit = edit.clone();
        Callback::from(move |e: InputEvent| edit(path.clone(), event_value(&e)))
    };
    let on_select = |path: &'static str| {
        let edit = edit.clone();
        Callback::from(move |e: Event| edit(path.to_string(), event_value(&e)))
    };

    let on_add_branch = {
        let dialog = dialog.clone();
        let refresh = refresh.clone();
        let local_error = local_error.clone();
        let plans = props.plans.clone();
        Callback::from(move |_: MouseEvent| {
            let added = dialog
                .borrow_mut()
                .form_mut()
                .and_then(|form| form.add_branch(&plans));
            match added {
                Ok(id) => {
                    tracing::debug!(branch = id.get(), "branch row added");
                    local_error.set(None);
                },
                Err(FormError::SubmissionInFlight) => {},
                Err(err) => local_error.set(Some(err.user_message())),
            }
            refresh.force_update();
        })
    };

    let on_main_logo = {
        let dialog = dialog.clone();
        let refresh = refresh.clone();
        Callback::from(move |e: Event| {
            if let Ok(form) = dialog.borrow_mut().form_mut() {
                match event_file(&e) {
                    Some(file) => form.set_main_logo(file),
                    None => form.clear_main_logo(),
                }
            }
            refresh.force_update();
        })
    };

    let on_cancel = {
        let dialog = dialog.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            if dialog.borrow_mut().close() {
                on_close.emit(());
            }
        })
    };

    let on_submit = {
        let dialog = dialog.clone();
        let refresh = refresh.clone();
        let local_error = local_error.clone();
        let on_created = props.on_created.clone();
        let session = session.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let started = dialog.borrow_mut().begin_submit();
            let submission = match started {
                Ok(submission) => submission,
                Err(FormError::SubmissionInFlight) => return,
                Err(err) => {
                    local_error.set(Some(err.user_message()));
                    return;
                },
            };
            local_error.set(None);
            refresh.force_update();

            let dialog = dialog.clone();
            let refresh = refresh.clone();
            let on_created = on_created.clone();
            let session = session.clone();
            let token = session_token(session.as_ref());
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = api::create_organization(token.as_deref(), &submission).await;
                if let Err(err) = &outcome {
                    report_failure(session.as_ref(), err);
                }
                let finished = dialog.borrow_mut().finish_submit(outcome);
                refresh.force_update();
                if let Ok(created) = finished {
                    on_created.emit(created);
                }
            });
        })
    };

    let state = dialog.borrow();
    let form = state.form();
    let draft = form.draft();
    let selected_plan = form.selected_plan(&props.plans);
    let submitting = state.is_submitting();
    let error_message = (*local_error)
        .clone()
        .or_else(|| state.last_error().map(str::to_string))
        .unwrap_or_default();
    let main_logo_name = form.attachments().main().map(File::name);

    let branch_rows = draft.branches.iter().enumerate().filter_map(|(index, branch)| {
        let id = form.branch_id(index)?;
        let logo_name = form.branch_logo(index).map(File::name);
        let on_remove = {
            let dialog = dialog.clone();
            let refresh = refresh.clone();
            Callback::from(move |_: MouseEvent| {
                if let Ok(form) = dialog.borrow_mut().form_mut() {
                    form.remove_branch_by_id(id);
                }
                refresh.force_update();
            })
        };
        let on_logo = {
            let dialog = dialog.clone();
            let refresh = refresh.clone();
            Callback::from(move |e: Event| {
                if let (Some(file), Ok(form)) = (event_file(&e), dialog.borrow_mut().form_mut()) {
                    form.set_branch_logo_by_id(id, file);
                }
                refresh.force_update();
            })
        };
        Some(html! {
            <div key={id.get()} class="rounded-xl border border-[var(--border)] p-4">
                <div class="mb-3 flex items-center justify-between">
                    <span class="text-sm font-semibold">{ format!("Branch {}", index + 1) }</span>
                    <button type="button" class="text-sm text-red-600 hover:underline" onclick={on_remove}>
                        { "Remove" }
                    </button>
                </div>
                { branch_fields(&format!("branches.{index}"), branch, &on_input) }
                <label class="mt-3 flex flex-col gap-1 text-sm">
                    <span class="font-semibold">{ "Branch logo" }</span>
                    <input type="file" accept="image/*" onchange={on_logo} />
                    if let Some(name) = logo_name {
                        <span class="text-xs text-[var(--muted)]">{ name }</span>
                    }
                </label>
            </div>
        })
    });

    html! {
        <div class="fixed inset-0 z-40 flex items-start justify-center overflow-y-auto bg-black/40 p-6"
             role="dialog" aria-modal="true" aria-label="Create organization">
            <form class="w-full max-w-3xl rounded-2xl bg-[var(--surface)] p-6 shadow-xl" onsubmit={on_submit}>
                <h2 class="text-lg font-bold">{ "Create organization" }</h2>
                if !error_message.is_empty() {
                    <div class="mt-3">
                        <ErrorBanner message={error_message} auto_dismiss={false} />
                    </div>
                }

                <fieldset class="m-0 min-w-0 border-0 p-0 disabled:opacity-60" disabled={submitting}>
                { section_title("Organization") }
                <div class={SECTION_CLASSES}>
                    { text_field("Gym name", "text", draft.gym_name.clone(), on_input("gymName".to_string())) }
                    { text_field("Contact email", "email", draft.contact_email.clone(), on_input("contactEmail".to_string())) }
                    { text_field("Contact phone", "tel", draft.contact_phone.clone(), on_input("contactPhone".to_string())) }
                    { text_field("Street", "text", draft.address.street.clone(), on_input("address.street".to_string())) }
                    { text_field("City", "text", draft.address.city.clone(), on_input("address.city".to_string())) }
                    { text_field("State", "text", draft.address.state.clone(), on_input("address.state".to_string())) }
                    { text_field("Pincode", "text", draft.address.pincode.clone(), on_input("address.pincode".to_string())) }
                    { text_field("Notes", "text", draft.notes.clone(), on_input("notes".to_string())) }
                </div>

                { section_title("Owner") }
                <div class={SECTION_CLASSES}>
                    { text_field("Name", "text", draft.owner.name.clone(), on_input("owner.name".to_string())) }
                    { text_field("Email", "email", draft.owner.email.clone(), on_input("owner.email".to_string())) }
                    { text_field("Password", "password", draft.owner.password.clone(), on_input("owner.password".to_string())) }
                    { text_field("Phone", "tel", draft.owner.phone.clone(), on_input("owner.phone".to_string())) }
                </div>

                { section_title("Subscription") }
                <div class={SECTION_CLASSES}>
                    <label class="flex flex-col gap-1 text-sm">
                        <span class="font-semibold">{ "Plan" }</span>
                        <select class={INPUT_CLASSES} onchange={on_select("subscription.planId")}>
                            <option value="" selected={draft.subscription.plan_id.is_empty()}>{ "Select a plan" }</option>
                            { for props.plans.iter().filter(|plan| plan.is_active).map(|plan| html! {
                                <option key={plan.id.clone()} value={plan.id.clone()}
                                        selected={plan.id == draft.subscription.plan_id}>
                                    { format!("{} ({:.2}/mo)", plan.name, plan.price_monthly) }
                                </option>
                            }) }
                        </select>
                    </label>
                    <label class="flex flex-col gap-1 text-sm">
                        <span class="font-semibold">{ "Billing cycle" }</span>
                        <select class={INPUT_CLASSES} onchange={on_select("subscription.billingCycle")}>
                            { for [BillingCycle::Monthly, BillingCycle::Yearly].into_iter().map(|cycle| html! {
                                <option value={cycle.as_str()} selected={cycle == draft.subscription.billing_cycle}>
                                    { cycle.as_str() }
                                </option>
                            }) }
                        </select>
                    </label>
                    <p class="text-sm text-[var(--muted)]">
                        { format!("Expires: {}", format_date(draft.subscription.expiry_date)) }
                    </p>
                </div>

                { section_title("Main branch") }
                { branch_fields("mainBranch", &draft.main_branch, &on_input) }
                <label class="mt-3 flex flex-col gap-1 text-sm">
                    <span class="font-semibold">{ "Main branch logo" }</span>
                    <input type="file" accept="image/*" onchange={on_main_logo} />
                    if let Some(name) = main_logo_name {
                        <span class="text-xs text-[var(--muted)]">{ name }</span>
                    }
                </label>

                { section_title("Additional branches") }
                <p class="mb-2 text-xs text-[var(--muted)]">
                    { capacity_hint(selected_plan, draft.branches.len()) }
                </p>
                <div class="flex flex-col gap-3">
                    { for branch_rows }
                </div>
                <button type="button" class="mt-3 text-sm font-semibold text-[var(--primary)] hover:underline"
                        onclick={on_add_branch}>
                    { "+ Add branch" }
                </button>
                </fieldset>

                <div class="mt-6 flex justify-end gap-3">
                    <button type="button" class="rounded-lg border border-[var(--border)] px-4 py-2 text-sm"
                            disabled={submitting} onclick={on_cancel}>
                        { "Cancel" }
                    </button>
                    <button type="submit"
                            class="rounded-lg bg-[var(--primary)] px-4 py-2 text-sm font-semibold text-white disabled:opacity-50"
                            disabled={submitting}>
                        { if submitting { "Creating..." } else { "Create organization" } }
                    </button>
                </div>
            </form>
        </div>
    }
}
