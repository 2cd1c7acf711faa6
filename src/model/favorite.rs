use crate::model::export::*;
use super::import::*;

/// Membership row for "user favorited this tag".
/// Independent of object favoriting, which goes through
/// `favorited_by:` tags on the objects themselves.
#[derive(Debug, Identifiable, Insertable, Queryable, Associations, PartialEq, Eq, Hash, Clone, Copy)]
#[belongs_to(Tag)]
#[primary_key(user_id, tag_id)]
#[table_name="user_favorite_tags"]
pub struct UserFavoriteTag {
    pub user_id: Uid,
    pub tag_id: Tid,
}

impl UserFavoriteTag {

    /// Insert the membership unless it exists
    pub fn insert_ignore(value: &Self, c: &db::Connection) -> Res<usize> {
        Ok(diesel::insert_or_ignore_into(user_favorite_tags::table).values(value).execute(c.get())?)
    }

    /// Remove the membership, reporting how many rows matched
    pub fn delete(value: &Self, c: &db::Connection) -> Res<usize> {
        Ok(diesel::delete(user_favorite_tags::table
            .filter(user_favorite_tags::user_id.eq(value.user_id))
            .filter(user_favorite_tags::tag_id.eq(value.tag_id)))
            .execute(c.get())?)
    }

    /// The subset of `tags` favorited by `user`
    pub fn favorited_ids(tags: &Vec<Tid>, user: Uid, c: &db::Connection) -> Res<Vec<Tid>> {
        Ok(user_favorite_tags::table
            .select(user_favorite_tags::tag_id)
            .filter(user_favorite_tags::user_id.eq(user))
            .filter(user_favorite_tags::tag_id.eq_any(tags))
            .get_results(c.get())?)
    }
}

use core::fmt::{Display, Formatter, Error as FmtError};
impl Display for UserFavoriteTag {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        write!(f, "UserFavoriteTag[{}][{}]", self.user_id, self.tag_id)
    }
}
