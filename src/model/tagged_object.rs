use crate::{model::export::*, util::{sql}};
use super::import::*;

pub const IDS:
    (tagged_objects::object_kind, tagged_objects::object_id) =
    (tagged_objects::object_kind, tagged_objects::object_id);

/// The taggable domain kinds. `object_id` is polymorphic:
/// which domain table it points into is decided by this
/// discriminant, not by a foreign key.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum ObjectKind {
    Dashboard = 1,
    Chart = 2,
    Query = 3,
    Dataset = 4,
}

impl ObjectKind {

    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Dashboard,
        ObjectKind::Chart,
        ObjectKind::Query,
        ObjectKind::Dataset,
    ];

    pub fn from_i64(x: i64) -> Self {
        match x {
            1 => { Self::Dashboard },
            2 => { Self::Chart },
            3 => { Self::Query },
            4 => { Self::Dataset },
            _ => panic!("bug: invalid enum variant"),
        }
    }
    pub fn to_i64(self) -> i64 {
        self as i64
    }
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Chart => "chart",
            Self::Query => "query",
            Self::Dataset => "dataset",
        }
    }
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dashboard" => Some(Self::Dashboard),
            "chart" => Some(Self::Chart),
            "query" => Some(Self::Query),
            "dataset" => Some(Self::Dataset),
            _ => None,
        }
    }
}

#[derive(Debug, Identifiable, Insertable, Queryable, Associations, PartialEq, Eq, Hash, Clone, Copy)]
#[belongs_to(Tag)]
#[primary_key(tag_id, object_kind, object_id)]
#[table_name="tagged_objects"]
pub struct TaggedObject {
    pub tag_id: Tid,
    pub object_kind: i64,
    pub object_id: Oid,
}

impl TaggedObject {

    pub fn object_kind(&self) -> ObjectKind {
        ObjectKind::from_i64(self.object_kind)
    }

    /// WHERE (kind, id) IN (VALUES ( ... ))
    pub fn with_pairs<'a>(pairs: &'a Vec<Pair>) -> SqlLiteral<Bool> {
        sql::with_pairs(("`tagged_objects`.`object_kind`", "`tagged_objects`.`object_id`"), pairs)
    }

    /// WHERE kind = K AND id = O
    pub fn with_object(kind: ObjectKind, id: Oid) -> And<Eq<tagged_objects::object_kind, i64>, Eq<tagged_objects::object_id, i64>> {
        tagged_objects::object_kind.eq(kind.to_i64()).and(tagged_objects::object_id.eq(id))
    }

    /// Insert associations, skipping any that already exist.
    /// The composite primary key arbitrates: a conflicting row
    /// means the association is already satisfied.
    pub fn insert_ignore_all(values: &Vec<Self>, c: &db::Connection) -> Res<usize> {
        Ok(diesel::insert_or_ignore_into(tagged_objects::table).values(values).execute(c.get())?)
    }

    /// Delete the given pairs scoped to one tag
    pub fn delete_pairs(tag: Tid, pairs: &Vec<Pair>, c: &db::Connection) -> Res<usize> {
        if pairs.is_empty() { return Ok(0) }
        Ok(diesel::delete(tagged_objects::table
            .filter(tagged_objects::tag_id.eq(tag))
            .filter(Self::with_pairs(pairs)))
            .execute(c.get())?)
    }

    /// Delete every association row referencing an object
    pub fn delete_object(kind: ObjectKind, id: Oid, c: &db::Connection) -> Res<usize> {
        Ok(diesel::delete(tagged_objects::table
            .filter(Self::with_object(kind, id)))
            .execute(c.get())?)
    }
}

use core::fmt::{Display, Formatter, Error as FmtError};
impl Display for TaggedObject {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        write!(f, "TaggedObject[{}][{}:{}]", self.tag_id, self.object_kind, self.object_id)
    }
}
