pub mod import {
    pub use super::super::import::*;
    pub use crate::{model::export::*, db::export::*};
    pub use diesel::prelude::*;
}

pub mod export {
    pub use super::api::*;
}
pub use export::*;

pub mod error {
    #[derive(Debug, Fail)]
    pub enum Error {
        #[fail(display = "favorite operations require a user context")]
        NoUserContext,
    }
}

pub mod api {
    use super::{import::*, error::{Error as E}};
    use crate::app::tag;

    fn require_user(user: Option<Uid>) -> Res<Uid> {
        user.ok_or(E::NoUserContext.into())
    }

    fn require_tag(id: Tid, c: &db::Connection) -> Res<Tag> {
        Tag::by_id(id, c)?
            .ok_or(tag::error::Error::TagNotFound { names: id.to_string() }.into())
    }

    /// Record that `user` favorited the tag. Repeats are
    /// absorbed by the membership's primary key.
    pub fn favorite_tag(tag: Tid, user: Option<Uid>, c: &db::Connection) -> Res<()> {
        let user = require_user(user)?;
        require_tag(tag, c)?;
        UserFavoriteTag::insert_ignore(&UserFavoriteTag { user_id: user, tag_id: tag }, c)?;
        Ok(())
    }

    /// The inverse of favorite_tag
    pub fn unfavorite_tag(tag: Tid, user: Option<Uid>, c: &db::Connection) -> Res<()> {
        let user = require_user(user)?;
        require_tag(tag, c)?;
        UserFavoriteTag::delete(&UserFavoriteTag { user_id: user, tag_id: tag }, c)?;
        Ok(())
    }

    /// The subset of `tags` the user has favorited. Used to
    /// annotate tag listings with a per-row boolean.
    pub fn favorited_ids(tags: &Vec<Tid>, user: Option<Uid>, c: &db::Connection) -> Res<Vec<Tid>> {
        let user = require_user(user)?;
        UserFavoriteTag::favorited_ids(tags, user, c)
    }
}

#[cfg(test)]
mod suite {
    use super::{api, import::*};
    use crate::app::tag;
    use crate::db::test;

    #[test]
    fn check_favorite_roundtrip() {
        let c = test::connection();
        let t = tag::api::get_or_create("starred", TagKind::Custom, &c).unwrap();
        assert_eq!(api::favorited_ids(&vec![t.id], Some(3), &c).unwrap(), vec![]);
        api::favorite_tag(t.id, Some(3), &c).unwrap();
        assert_eq!(api::favorited_ids(&vec![t.id], Some(3), &c).unwrap(), vec![t.id]);
        api::unfavorite_tag(t.id, Some(3), &c).unwrap();
        assert_eq!(api::favorited_ids(&vec![t.id], Some(3), &c).unwrap(), vec![]);
    }

    #[test]
    fn check_favorite_is_idempotent() {
        let c = test::connection();
        let t = tag::api::get_or_create("starred", TagKind::Custom, &c).unwrap();
        api::favorite_tag(t.id, Some(3), &c).unwrap();
        api::favorite_tag(t.id, Some(3), &c).unwrap();
        assert_eq!(api::favorited_ids(&vec![t.id], Some(3), &c).unwrap(), vec![t.id]);
    }

    #[test]
    fn check_favorite_requires_user() {
        let c = test::connection();
        let t = tag::api::get_or_create("starred", TagKind::Custom, &c).unwrap();
        assert!(api::favorite_tag(t.id, None, &c).is_err());
        assert!(api::unfavorite_tag(t.id, None, &c).is_err());
        assert!(api::favorited_ids(&vec![t.id], None, &c).is_err());
    }

    #[test]
    fn check_favorite_requires_tag() {
        let c = test::connection();
        assert!(api::favorite_tag(404, Some(3), &c).is_err());
    }

    #[test]
    fn check_favorites_are_per_user() {
        let c = test::connection();
        let t = tag::api::get_or_create("starred", TagKind::Custom, &c).unwrap();
        api::favorite_tag(t.id, Some(3), &c).unwrap();
        assert_eq!(api::favorited_ids(&vec![t.id], Some(4), &c).unwrap(), vec![]);
    }
}
