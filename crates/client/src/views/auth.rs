use civil_codes_backend::models::user::{Credentials, SignUpRequest};
use civil_codes_backend::BackendClient;

use crate::notify::Toaster;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

/// Sign-in and sign-up forms. A successful call updates the session; the shell follows it.
pub struct AuthView {
    client: BackendClient,
    toaster: Toaster,
}

impl AuthView {
    pub fn new(client: BackendClient, toaster: Toaster) -> Self {
        Self { client, toaster }
    }

    pub async fn submit(&self, mode: AuthMode, alias: &str, password: &str) -> bool {
        let result = match mode {
            AuthMode::SignIn => {
                self.client
                    .sign_in(&Credentials {
                        alias: alias.to_string(),
                        password: password.to_string(),
                    })
                    .await
            }
            AuthMode::SignUp => {
                self.client
                    .sign_up(&SignUpRequest {
                        alias: alias.to_string(),
                        password: password.to_string(),
                    })
                    .await
            }
        };
        match result {
            Ok(identity) => {
                self.toaster.success(match mode {
                    AuthMode::SignIn => format!("Welcome back, {}!", identity.alias),
                    AuthMode::SignUp => format!("Account created, welcome {}!", identity.alias),
                });
                true
            }
            Err(e) => {
                self.toaster.error(e.to_string());
                false
            }
        }
    }

    pub fn render(&self) -> String {
        [
            "── Sign in to CIVIL CODES ──",
            "login <alias> <password>    sign in",
            "signup <alias> <password>   create an account",
        ]
        .join("\n")
    }
}
