pub use super::category::{
    ActiveModel as CategoryActiveModel, Entity as Category, Model as CategoryModel,
};
pub use super::comment::{
    ActiveModel as CommentActiveModel, Entity as Comment, Model as CommentModel,
};
pub use super::notification::{
    ActiveModel as NotificationActiveModel, Entity as Notification,
    Model as NotificationModel, NotificationType,
};
pub use super::post::{ActiveModel as PostActiveModel, Entity as Post, Model as PostModel};
pub use super::post_like::Entity as PostLike;
pub use super::profile_settings::{
    ActiveModel as ProfileSettingsActiveModel, Entity as ProfileSettings,
    Model as ProfileSettingsModel,
};
pub use super::user::{ActiveModel as UserActiveModel, Entity as User, Model as UserModel};
