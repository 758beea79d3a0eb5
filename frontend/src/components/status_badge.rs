use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    pub status: String,
}

fn badge_class(status: &str) -> Classes {
    let base = classes!(
        "inline-flex",
        "items-center",
        "rounded-full",
        "px-2",
        "py-0.5",
        "text-xs",
        "font-semibold",
        "uppercase",
        "tracking-[0.06em]"
    );
    match status {
        "active" => classes!(base, "bg-emerald-500/15", "text-emerald-700", "dark:text-emerald-200"),
        "suspended" | "expired" => classes!(base, "bg-amber-500/15", "text-amber-700", "dark:text-amber-200"),
        "cancelled" => classes!(base, "bg-red-500/15", "text-red-700", "dark:text-red-200"),
        _ => classes!(base, "bg-[var(--surface-alt)]", "text-[var(--muted)]"),
    }
}

#[function_component(StatusBadge)]
pub fn status_badge(props: &StatusBadgeProps) -> Html {
    let label = if props.status.trim().is_empty() { "unknown" } else { props.status.as_str() };
    html! {
        <span class={badge_class(&props.status)}>{ label.to_string() }</span>
    }
}
