//! SeaORM entities of the blog.
//!
//! Cascades on delete, enforced by the foreign keys created in [`crate::schema`]:
//!
//! | parent       | child                                 | on delete |
//! |--------------|---------------------------------------|-----------|
//! | user         | profile settings, posts, likes        | cascade   |
//! | user         | notifications it provided             | cascade   |
//! | user         | notifications it received, comments   | set null  |
//! | category     | posts                                 | cascade   |
//! | post         | comments, likes, notifications        | cascade   |
//! | comment      | replies                               | cascade   |

pub mod prelude;

pub mod category;
pub mod comment;
pub mod notification;
pub mod post;
pub mod post_like;
pub mod profile_settings;
pub mod user;

use sea_orm::{ActiveValue, Value};
use std::fmt::Display;

/// Render an optional related record the way a missing reference prints: `None`
pub(crate) fn display_or_none<T: Display>(value: Option<&T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "None".to_owned(),
    }
}

/// The value of an active field if it is set or loaded from the database
pub(crate) fn loaded<V>(value: &ActiveValue<V>) -> Option<&V>
where
    V: Into<Value>,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
        ActiveValue::NotSet => None,
    }
}
