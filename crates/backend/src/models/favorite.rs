use serde::{Deserialize, Serialize};

use crate::models::resource::ResourceId;
use crate::models::user::UserId;

/// A row of `user_favorites`; its existence marks the resource as a favorite of the user.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub user_id: UserId,
    pub pdf_id: ResourceId,
}
