use chrono::NaiveDate;
use js_sys::Date;
use wasm_bindgen::JsCast;
use web_sys::{window, Event, HtmlAnchorElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::TargetCast;

/// Today in the browser's local calendar.
pub fn today() -> NaiveDate {
    let now = Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1, // JS months are 0-indexed
        now.get_date(),
    )
    .unwrap_or_default()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "—".to_string())
}

/// Current value of whichever form control fired `event`.
pub fn event_value(event: &Event) -> String {
    let Some(target) = event.target() else {
        return String::new();
    };
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        return select.value();
    }
    target
        .dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
        .unwrap_or_default()
}

/// First file picked in the `<input type="file">` that fired `event`.
pub fn event_file(event: &Event) -> Option<web_sys::File> {
    let input: HtmlInputElement = event.target_dyn_into()?;
    input.files().and_then(|files| files.get(0))
}

/// `data:` URL carrying `csv` as a UTF-8 text download.
pub fn csv_data_url(csv: &str) -> String {
    format!("data:text/csv;charset=utf-8,{}", urlencoding::encode(csv))
}

/// Hands `csv` to the browser as a file download named `file_name`.
pub fn download_csv(file_name: &str, csv: &str) -> Result<(), String> {
    let document = window()
        .and_then(|win| win.document())
        .ok_or_else(|| "No document to download into".to_string())?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|err| format!("{err:?}"))?
        .dyn_into()
        .map_err(|_| "Anchor element unavailable".to_string())?;
    anchor.set_href(&csv_data_url(csv));
    anchor.set_download(file_name);
    anchor.click();
    Ok(())
}
