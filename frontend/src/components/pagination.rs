use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    /// 1-based.
    pub current_page: usize,
    pub total_pages: usize,
    pub on_page_change: Callback<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageSlot {
    Page(usize),
    Gap,
}

/// First, last, and up to two pages either side of `current`, with gaps
/// where pages are skipped.
fn page_window(current: usize, total: usize) -> Vec<PageSlot> {
    let mut slots = Vec::new();
    let mut last_shown = 0;
    for page in 1..=total {
        let near_current = page + 2 >= current && page <= current + 2;
        if page == 1 || page == total || near_current {
            if last_shown + 1 < page {
                slots.push(PageSlot::Gap);
            }
            slots.push(PageSlot::Page(page));
            last_shown = page;
        }
    }
    slots
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    if props.total_pages <= 1 {
        return Html::default();
    }

    let total_pages = props.total_pages;
    let current_page = props.current_page.clamp(1, total_pages);
    let go_to = |page: usize| {
        let on_page_change = props.on_page_change.clone();
        Callback::from(move |_: MouseEvent| on_page_change.emit(page))
    };

    let button_classes = classes!(
        "inline-flex",
        "h-9",
        "min-w-[2.25rem]",
        "items-center",
        "justify-center",
        "rounded-lg",
        "border",
        "border-[var(--border)]",
        "px-2",
        "text-sm",
        "font-semibold",
        "hover:border-[var(--primary)]",
        "disabled:opacity-50",
        "disabled:cursor-not-allowed"
    );

    html! {
        <nav class="flex items-center gap-2" aria-label="Pagination">
            <button
                type="button"
                class={button_classes.clone()}
                disabled={current_page <= 1}
                onclick={go_to(current_page.saturating_sub(1).max(1))}
                aria-label="Previous page"
            >
                {"<"}
            </button>
            { for page_window(current_page, total_pages).into_iter().map(|slot| match slot {
                PageSlot::Page(page) => {
                    let current = page == current_page;
                    html! {
                        <button
                            key={format!("page-{page}")}
                            type="button"
                            class={classes!(
                                button_classes.clone(),
                                current.then_some("bg-[var(--primary)] text-white border-transparent")
                            )}
                            aria-current={current.then_some(AttrValue::from("page"))}
                            disabled={current}
                            onclick={go_to(page)}
                        >
                            { page }
                        </button>
                    }
                },
                PageSlot::Gap => html! {
                    <span class="px-1 text-[var(--muted)]" aria-hidden="true">{"…"}</span>
                },
            }) }
            <button
                type="button"
                class={button_classes}
                disabled={current_page >= total_pages}
                onclick={go_to((current_page + 1).min(total_pages))}
                aria-label="Next page"
            >
                {">"}
            </button>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_ranges_show_every_page() {
        assert_eq!(
            page_window(2, 4),
            vec![PageSlot::Page(1), PageSlot::Page(2), PageSlot::Page(3), PageSlot::Page(4)]
        );
    }

    #[test]
    fn long_ranges_collapse_into_gaps() {
        assert_eq!(
            page_window(10, 20),
            vec![
                PageSlot::Page(1),
                PageSlot::Gap,
                PageSlot::Page(8),
                PageSlot::Page(9),
                PageSlot::Page(10),
                PageSlot::Page(11),
                PageSlot::Page(12),
                PageSlot::Gap,
                PageSlot::Page(20),
            ]
        );
    }
}
