pub mod tag;
pub mod reconcile;
pub mod lifecycle;
pub mod favorite;
pub mod listing;

pub mod import {
    pub use super::super::import::*;
}

pub mod export {
    pub use super::api::*;
    pub use super::tag::export::*;
    pub use super::reconcile::export::*;
    pub use super::lifecycle::export::*;
    pub use super::favorite::export::*;
    pub use super::listing::export::*;
}
pub use export::*;

pub mod api {
    use super::import::*;
    use crate::{model::export::*, db::export::*};
    use super::{tag, reconcile, lifecycle, favorite, listing};
    use super::{reconcile::Mode, lifecycle::Taggable, listing::{ObjectSource, ObjectSummary}};

    /// The database connection is the only persistent
    /// state needed in our api struct. Callers hand it a
    /// connection from their own unit of work, so anything
    /// done here commits (or rolls back) with the caller.
    pub struct TagLayer {
        pub connection: db::Connection,
    }

    impl TagLayer {

        /// Create a new api instance
        pub fn new(connection: db::Connection) -> Self {
            Self { connection }
        }

        /// Get or lazily create a tag by its (name, kind) identity
        pub fn get_or_create_tag(&self, name: &str, kind: TagKind) -> Res<Tag> {
            tag::api::get_or_create(name, kind, &self.connection)
        }

        /// Converge the stored association set of `tag` toward `desired`
        pub fn reconcile(&self, tag: &Tag, desired: &HashSet<(ObjectKind, Oid)>, mode: Mode) -> Res<()> {
            reconcile::api::run(tag, desired, mode, &self.connection)
        }

        /// Attach a batch of custom tags to one object
        pub fn create_custom_tags(&self, kind: ObjectKind, id: Oid, names: &Vec<&str>) -> Res<Vec<TaggedObject>> {
            reconcile::api::create_custom_tags(kind, id, names, &self.connection)
        }

        /// Detach a single named custom tag from one object
        pub fn delete_association(&self, kind: ObjectKind, id: Oid, name: &str) -> Res<()> {
            reconcile::api::delete_association(kind, id, name, &self.connection)
        }

        /// Delete custom tags outright, associations included
        pub fn delete_tags(&self, names: &Vec<&str>) -> Res<usize> {
            tag::api::delete_tags(names, &self.connection)
        }

        /// Denormalized listing of tagged objects per kind
        pub fn list_tagged_objects(
            &self,
            tag_names: Option<&Vec<&str>>,
            kinds: Option<&Vec<ObjectKind>>,
            source: &dyn ObjectSource,
        ) -> Res<Vec<ObjectSummary>> {
            listing::api::list_tagged_objects(tag_names, kinds, source, &self.connection)
        }

        pub fn favorite_tag(&self, tag: Tid, user: Option<Uid>) -> Res<()> {
            favorite::api::favorite_tag(tag, user, &self.connection)
        }

        pub fn unfavorite_tag(&self, tag: Tid, user: Option<Uid>) -> Res<()> {
            favorite::api::unfavorite_tag(tag, user, &self.connection)
        }

        pub fn favorited_ids(&self, tags: &Vec<Tid>, user: Option<Uid>) -> Res<Vec<Tid>> {
            favorite::api::favorited_ids(tags, user, &self.connection)
        }

        /// Lifecycle hook: a taggable object was created
        pub fn object_created(&self, obj: &dyn Taggable) -> Res<()> {
            lifecycle::api::object_created(obj, &self.connection)
        }

        /// Lifecycle hook: a taggable object's owner set changed
        pub fn owners_changed(&self, obj: &dyn Taggable) -> Res<()> {
            lifecycle::api::owners_changed(obj, &self.connection)
        }

        /// Lifecycle hook: a taggable object was deleted
        pub fn object_deleted(&self, kind: ObjectKind, id: Oid) -> Res<()> {
            lifecycle::api::object_deleted(kind, id, &self.connection)
        }

        /// Lifecycle hook: a user favorited an object
        pub fn object_favorited(&self, user: Uid, kind: ObjectKind, id: Oid) -> Res<()> {
            lifecycle::api::object_favorited(user, kind, id, &self.connection)
        }

        /// Lifecycle hook: a user unfavorited an object
        pub fn object_unfavorited(&self, user: Uid, id: Oid) -> Res<()> {
            lifecycle::api::object_unfavorited(user, id, &self.connection)
        }

        /// Best-effort sweep re-deriving implicit tags
        pub fn repair(&self, objs: &Vec<&dyn Taggable>) -> Res<usize> {
            lifecycle::api::repair(objs, &self.connection)
        }

        /// Return all tags
        pub fn all_tags(&self) -> Res<Vec<Tag>> {
            tag::api::all_tags(&self.connection)
        }

        /// Forget custom tags that no longer tag anything
        pub fn clean(&self) -> Res<usize> {
            match tag::api::clean(&self.connection) {
                Ok(cleaned) => { info!("cleaned: {} Tags", cleaned); Ok(cleaned) }
                e => e,
            }
        }
    }
}
