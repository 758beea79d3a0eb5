use yew::prelude::*;
use yew::use_effect_with;
use yew_hooks::prelude::use_timeout;

const AUTO_DISMISS_MS: u32 = 5000;

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: String,
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
    #[prop_or(true)]
    pub auto_dismiss: bool,
}

#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    let is_open = use_state(|| true);

    let dismiss = {
        let is_open = is_open.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: ()| {
            if !*is_open {
                return;
            }
            is_open.set(false);
            if let Some(cb) = on_close.as_ref() {
                cb.emit(());
            }
        })
    };

    let auto_timeout = {
        let dismiss = dismiss.clone();
        use_timeout(move || dismiss.emit(()), if props.auto_dismiss { AUTO_DISMISS_MS } else { 0 })
    };

    // a new message re-opens a dismissed banner
    {
        let is_open = is_open.clone();
        use_effect_with(props.message.clone(), move |_| {
            is_open.set(true);
        });
    }

    {
        let auto_timeout = auto_timeout.clone();
        use_effect_with(
            (*is_open, props.auto_dismiss, props.message.clone()),
            move |(visible, auto_dismiss, _message)| {
                if *auto_dismiss && *visible {
                    auto_timeout.reset();
                } else {
                    auto_timeout.cancel();
                }
            },
        );
    }

    if props.message.trim().is_empty() || !*is_open {
        return Html::default();
    }

    let on_close_click = Callback::from(move |_: MouseEvent| dismiss.emit(()));

    html! {
        <div
            class={classes!(
                "error-banner",
                "flex",
                "items-start",
                "gap-3",
                "rounded-xl",
                "border",
                "border-red-500/30",
                "bg-red-500/10",
                "px-4",
                "py-3",
                "text-sm",
                "text-red-700",
                "dark:text-red-200"
            )}
            role="alert"
            aria-live="assertive"
        >
            <p class="flex-1">{ props.message.clone() }</p>
            <button
                type="button"
                class="inline-flex h-6 w-6 items-center justify-center rounded-full hover:bg-black/10"
                aria-label="Dismiss error"
                onclick={on_close_click}
            >
                {"×"}
            </button>
        </div>
    }
}
