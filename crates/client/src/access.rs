use civil_codes_backend::models::user::{Identity, UserId};

/// Decides which manage actions the UI offers.
///
/// This only hides controls. The backend re-checks the stored role on every edit and delete.
#[derive(Clone, Debug, Default)]
pub struct AccessPolicy {
    admin_id: Option<UserId>,
}

impl AccessPolicy {
    pub fn new(admin_id: Option<UserId>) -> Self {
        Self { admin_id }
    }

    pub fn can_manage(&self, identity: Option<&Identity>) -> bool {
        identity.is_some_and(|identity| {
            identity.role.is_admin() || self.admin_id == Some(identity.id)
        })
    }
}

#[cfg(test)]
mod tests {
    use civil_codes_backend::models::user::UserRole;
    use uuid::Uuid;

    use super::*;

    fn identity(role: UserRole) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            alias: "someone".to_string(),
            role,
        }
    }

    #[test]
    fn role_or_configured_id_grants_manage() {
        let regular = identity(UserRole::Regular);
        let policy = AccessPolicy::default();
        assert!(!policy.can_manage(None));
        assert!(!policy.can_manage(Some(&regular)));
        assert!(policy.can_manage(Some(&identity(UserRole::Admin))));

        let policy = AccessPolicy::new(Some(regular.id));
        assert!(policy.can_manage(Some(&regular)));
    }
}
