use super::import::*;

/// The stored discriminant of `tags.kind`. Only `Custom`
/// tags are reachable from the public surface; the other
/// three kinds are system-managed.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum TagKind {
    Custom = 1,
    Type = 2,
    Owner = 3,
    FavoritedBy = 4,
}

impl TagKind {
    pub fn from_i64(x: i64) -> Self {
        match x {
            1 => { Self::Custom },
            2 => { Self::Type },
            3 => { Self::Owner },
            4 => { Self::FavoritedBy },
            _ => panic!("bug: invalid enum variant"),
        }
    }
    pub fn to_i64(self) -> i64 {
        self as i64
    }
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Type => "type",
            Self::Owner => "owner",
            Self::FavoritedBy => "favorited_by",
        }
    }
}

#[derive(Debug, Identifiable, AsChangeset, Queryable, Associations, PartialEq, Eq, Hash, Clone)]
#[table_name="tags"]
pub struct Tag {
    pub id: Tid,
    pub name: String,
    pub kind: i64,
    pub description: Option<String>,
}

#[derive(Debug, Insertable)]
#[table_name="tags"]
pub struct Insert<'a> {
    pub name: &'a str,
    pub kind: i64,
    pub description: Option<&'a str>,
}

impl Tag {

    pub fn kind(&self) -> TagKind {
        TagKind::from_i64(self.kind)
    }

    /// Find a tag by id
    pub fn by_id(id: Tid, c: &db::Connection) -> Res<Option<Self>> {
        Ok(tags::table.find(id).first(c.get()).optional()?)
    }

    /// Find a tag by its unique (name, kind) identity
    pub fn by_identity(name: &str, kind: TagKind, c: &db::Connection) -> Res<Option<Self>> {
        Ok(tags::table
            .filter(tags::name.eq(name))
            .filter(tags::kind.eq(kind.to_i64()))
            .first(c.get())
            .optional()?)
    }

    /// Insert a tag unless its (name, kind) identity exists.
    /// The unique constraint is the arbiter here, so racing
    /// identical inserts converge instead of duplicating.
    pub fn insert_ignore(value: &Insert, c: &db::Connection) -> Res<usize> {
        Ok(diesel::insert_or_ignore_into(tags::table).values(value).execute(c.get())?)
    }

    /// Delete tags from the database, by id
    pub fn delete_ids(ids: &Vec<Tid>, c: &db::Connection) -> Res<usize> {
        Ok(diesel::delete(tags::table.filter(tags::id.eq_any(ids))).execute(c.get())?)
    }
}

use core::fmt::{Display, Formatter, Error as FmtError};
impl Display for Tag {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        write!(f, "Tag[{}]", self.id)
    }
}
