use std::rc::Rc;

use web_sys::window;
use yew::prelude::*;

const TOKEN_KEY: &str = "gymdesk:token";

fn storage() -> Option<web_sys::Storage> {
    window().and_then(|win| win.local_storage().ok().flatten())
}

/// Bearer token saved by the login flow, if any. Read once when the session
/// provider mounts; requests take the token from the session instead.
fn stored_token() -> Option<String> {
    storage()
        .and_then(|store| store.get_item(TOKEN_KEY).ok().flatten())
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn store_token(token: Option<&str>) {
    let Some(store) = storage() else {
        return;
    };
    let result = match token {
        Some(token) => store.set_item(TOKEN_KEY, token),
        None => store.remove_item(TOKEN_KEY),
    };
    if result.is_err() {
        tracing::warn!("localStorage is not writable; session kept in memory only");
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub token: Option<String>,
    /// Set when the server rejected the stored token.
    pub expired: bool,
}

impl SessionState {
    pub fn from_storage() -> Self {
        Self {
            token: stored_token(),
            expired: false,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// Token to send as `Authorization: Bearer`, never blank.
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|token| !token.is_empty())
    }
}

pub enum SessionAction {
    SignIn(String),
    SignOut,
    Expired,
}

impl Reducible for SessionState {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match action {
            SessionAction::SignIn(token) => {
                let token = token.trim().to_string();
                if token.is_empty() {
                    return self;
                }
                store_token(Some(&token));
                SessionState {
                    token: Some(token),
                    expired: false,
                }
            },
            SessionAction::SignOut => {
                store_token(None);
                SessionState::default()
            },
            SessionAction::Expired => {
                tracing::warn!("session expired; clearing stored token");
                store_token(None);
                SessionState {
                    token: None,
                    expired: true,
                }
            },
        };
        Rc::new(next)
    }
}

pub type SessionContext = UseReducerHandle<SessionState>;

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Html,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let state = use_reducer(SessionState::from_storage);
    html! {
        <ContextProvider<SessionContext> context={state}>
            {props.children.clone()}
        </ContextProvider<SessionContext>>
    }
}

/// Token of the current session, for passing into the `api` calls.
pub fn session_token(session: Option<&SessionContext>) -> Option<String> {
    session.and_then(|session| session.bearer().map(str::to_string))
}

/// Routes an API failure through the session: token failures sign the user
/// out, everything else comes back as a displayable message.
pub fn report_failure(session: Option<&SessionContext>, err: &gymdesk_shared::ApiError) -> String {
    if let (true, Some(session)) = (err.is_session_expired(), session) {
        session.dispatch(SessionAction::Expired);
    }
    err.user_message()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_comes_from_session_state() {
        let signed_in = SessionState {
            token: Some(" tok-1 ".to_string()),
            expired: false,
        };
        assert_eq!(signed_in.bearer(), Some("tok-1"));

        let blank = SessionState {
            token: Some("  ".to_string()),
            expired: false,
        };
        assert_eq!(blank.bearer(), None);
        assert_eq!(SessionState::default().bearer(), None);
    }
}
