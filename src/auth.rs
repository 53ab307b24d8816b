use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{FromRequest, Outcome, Request};
use serde::Serialize;

const GATE_COOKIE: &str = "kolom_gate";

/// Admin gate for one visitor session.
///
/// `Locked` → `Unlocked` on the stored password, `Locked` → `ChangingPassword`
/// on the recovery phrase, `ChangingPassword` → `Locked` once a new password
/// is saved. A wrong password leaves the state as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Locked,
    Unlocked,
    ChangingPassword,
}

/// Result of comparing a submitted password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Matches,
    Recovery,
    Wrong,
}

impl GateState {
    pub fn after_check(self, check: PasswordCheck) -> GateState {
        match check {
            PasswordCheck::Matches => GateState::Unlocked,
            PasswordCheck::Recovery => GateState::ChangingPassword,
            PasswordCheck::Wrong => self,
        }
    }

    /// State after a new password was stored.
    pub fn after_password_change(self) -> GateState {
        match self {
            GateState::ChangingPassword => GateState::Locked,
            other => other,
        }
    }

    pub fn is_unlocked(self) -> bool {
        self == GateState::Unlocked
    }

    fn cookie_value(self) -> Option<&'static str> {
        match self {
            GateState::Locked => None,
            GateState::Unlocked => Some("unlocked"),
            GateState::ChangingPassword => Some("changing"),
        }
    }

    fn from_cookie_value(value: &str) -> GateState {
        match value {
            "unlocked" => GateState::Unlocked,
            "changing" => GateState::ChangingPassword,
            _ => GateState::Locked,
        }
    }
}

/// The admin password as kept in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminPassword {
    Hashed(String),
    /// Plaintext carried over from a browser export; replaced by a hash on
    /// the next password change.
    Plain(String),
}

impl AdminPassword {
    pub fn from_stored(raw: String) -> Self {
        if raw.starts_with("$2") {
            AdminPassword::Hashed(raw)
        } else {
            AdminPassword::Plain(raw)
        }
    }

    pub fn matches(&self, input: &str) -> bool {
        match self {
            AdminPassword::Hashed(hash) => verify_password(input, hash),
            AdminPassword::Plain(plain) => plain == input,
        }
    }
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, String> {
    bcrypt::hash(password, cost).map_err(|e| e.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Current gate state from the private session cookie.
pub fn gate_state(cookies: &CookieJar<'_>) -> GateState {
    cookies
        .get_private(GATE_COOKIE)
        .map(|c| GateState::from_cookie_value(c.value()))
        .unwrap_or(GateState::Locked)
}

/// Persist the gate state for the rest of the browser session (no expiry).
pub fn set_gate_state(cookies: &CookieJar<'_>, state: GateState) {
    match state.cookie_value() {
        Some(value) => {
            let mut cookie = Cookie::new(GATE_COOKIE, value);
            cookie.set_http_only(true);
            cookie.set_same_site(SameSite::Strict);
            cookie.set_path("/");
            cookies.add_private(cookie);
        }
        None => cookies.remove_private(Cookie::from(GATE_COOKIE)),
    }
}

/// Guard that ensures the visitor has unlocked the admin gate.
pub struct AdminSession;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminSession {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        if gate_state(request.cookies()).is_unlocked() {
            Outcome::Success(AdminSession)
        } else {
            Outcome::Error((Status::Unauthorized, ()))
        }
    }
}
