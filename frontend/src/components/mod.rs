// Reusable components live here.

pub mod creation_dialog;
pub mod error_banner;
pub mod header;
pub mod loading_spinner;
pub mod pagination;
pub mod status_badge;
