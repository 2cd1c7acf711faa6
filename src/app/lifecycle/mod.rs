pub mod prelude {
    use crate::model::export::*;

    /// The narrow face a domain object shows this subsystem.
    /// Each taggable kind supplies an adapter at the call site;
    /// referential integrity for `object_id` lives here, not in
    /// the schema.
    pub trait Taggable {
        fn object_kind(&self) -> ObjectKind;
        fn object_id(&self) -> Oid;
        fn owner_ids(&self) -> Vec<Uid>;
    }
}

pub mod import {
    pub use super::super::import::*;
    pub use super::prelude::*;
    pub use crate::{model::export::*, db::export::*};
    pub use diesel::prelude::*;
}

pub mod export {
    pub use super::api::*;
    pub use super::prelude::*;
}
pub use export::*;

pub mod api {
    use super::import::*;
    use crate::app::{tag, reconcile::{self, Mode}};

    fn only(obj: &dyn Taggable) -> HashSet<(ObjectKind, Oid)> {
        let mut set = HashSet::with_capacity(1);
        set.insert((obj.object_kind(), obj.object_id()));
        set
    }

    /// Hook: a taggable object was created. Derives the
    /// `type:` tag and one `owner:` tag per current owner.
    /// Runs on the caller's connection; committing stays the
    /// caller's job.
    pub fn object_created(obj: &dyn Taggable, c: &db::Connection) -> Res<()> {
        let desired = only(obj);
        let kind_tag = tag::api::get_or_create(&tag::api::type_tag_name(obj.object_kind()), TagKind::Type, c)?;
        reconcile::api::run(&kind_tag, &desired, Mode::Bulk, c)?;
        for owner in obj.owner_ids() {
            let owner_tag = tag::api::get_or_create(&tag::api::owner_tag_name(owner), TagKind::Owner, c)?;
            reconcile::api::run(&owner_tag, &desired, Mode::Bulk, c)?;
        }
        Ok(())
    }

    /// Hook: the owner set may have changed. Owner tags are
    /// recomputed from scratch: every stored `owner:` row of
    /// this object goes, then one row per current owner comes
    /// back.
    pub fn owners_changed(obj: &dyn Taggable, c: &db::Connection) -> Res<()> {
        c.get().transaction::<_, Error, _>(|| {
            let owner_tids: Vec<Tid> = tagged_objects::table
                .inner_join(tags::table)
                .filter(TaggedObject::with_object(obj.object_kind(), obj.object_id()))
                .filter(tags::kind.eq(TagKind::Owner.to_i64()))
                .select(tagged_objects::tag_id)
                .get_results(c.get())?;
            let deleted = diesel::delete(tagged_objects::table
                .filter(tagged_objects::tag_id.eq_any(&owner_tids))
                .filter(TaggedObject::with_object(obj.object_kind(), obj.object_id())))
                .execute(c.get())?;
            info!("DELETE: {} TaggedObject(s)", deleted);
            let mut rows = Vec::with_capacity(obj.owner_ids().len());
            for owner in obj.owner_ids() {
                let owner_tag = tag::api::get_or_create(&tag::api::owner_tag_name(owner), TagKind::Owner, c)?;
                rows.push(TaggedObject {
                    tag_id: owner_tag.id,
                    object_kind: obj.object_kind().to_i64(),
                    object_id: obj.object_id(),
                });
            }
            let inserted = TaggedObject::insert_ignore_all(&rows, c)?;
            info!("INSERT: {} TaggedObject(s)", inserted);
            Ok(())
        })
    }

    /// Hook: a taggable object was deleted. Every association
    /// row referencing it goes, whatever the tag kind.
    pub fn object_deleted(kind: ObjectKind, id: Oid, c: &db::Connection) -> Res<()> {
        let deleted = TaggedObject::delete_object(kind, id, c)?;
        info!("DELETE: {} TaggedObject(s)", deleted);
        Ok(())
    }

    /// Hook: a user favorited an object
    pub fn object_favorited(user: Uid, kind: ObjectKind, id: Oid, c: &db::Connection) -> Res<()> {
        let fav_tag = tag::api::get_or_create(&tag::api::favorited_by_tag_name(user), TagKind::FavoritedBy, c)?;
        TaggedObject::insert_ignore_all(&vec![TaggedObject {
            tag_id: fav_tag.id,
            object_kind: kind.to_i64(),
            object_id: id,
        }], c)?;
        Ok(())
    }

    /// Hook: a user unfavorited an object. Matches on the tag
    /// and the object id alone, mirroring the favorite event
    /// stream this reacts to.
    pub fn object_unfavorited(user: Uid, id: Oid, c: &db::Connection) -> Res<()> {
        if let Some(fav_tag) = tag::api::lookup(&tag::api::favorited_by_tag_name(user), TagKind::FavoritedBy, c)? {
            let deleted = diesel::delete(tagged_objects::table
                .filter(tagged_objects::tag_id.eq(fav_tag.id))
                .filter(tagged_objects::object_id.eq(id)))
                .execute(c.get())?;
            info!("DELETE: {} TaggedObject(s)", deleted);
        }
        Ok(())
    }

    /// Best-effort maintenance sweep: re-derive the implicit
    /// tags of existing objects, e.g. after a backfill or an
    /// import of legacy data. A failing adapter is logged and
    /// skipped so one bad object cannot sink the batch.
    pub fn repair(objs: &Vec<&dyn Taggable>, c: &db::Connection) -> Res<usize> {
        let mut repaired = 0usize;
        for obj in objs.iter() {
            let swept = object_created(*obj, c)
                .and_then(|_| owners_changed(*obj, c));
            match swept {
                Ok(()) => { repaired += 1; }
                Err(e) => {
                    warn!("skipping {}[{}]: {}", obj.object_kind().as_str(), obj.object_id(), e);
                }
            }
        }
        info!("repaired: {} object(s)", repaired);
        Ok(repaired)
    }
}
