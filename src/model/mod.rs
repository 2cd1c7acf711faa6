pub mod tag;
pub mod tagged_object;
pub mod favorite;

pub mod prelude {
    /// User ids
    pub type Uid = i64;
    /// Tag ids
    pub type Tid = i64;
    /// Domain object ids
    pub type Oid = i64;
    /// A raw (object_kind, object_id) pair as stored
    pub type Pair = (i64, i64);
}

pub mod import {
    pub use super::super::import::*;
    pub use super::prelude::*;
    pub use crate::db::export::*;
    pub use diesel::{
        prelude::*,
        expression::{SqlLiteral},
        sql_types::{Bool},
        dsl::*,
    };
}

pub mod export {
    pub use super::prelude::*;
    pub use super::tag::*;
    pub use super::tagged_object::*;
    pub use super::favorite::*;
}
pub use export::*;
