pub mod prelude {
    /// Deletion policy for one reconciliation pass.
    /// `Bulk` only ever adds: batch flows hold a partial view
    /// of the objects to tag and must not clobber unrelated,
    /// pre-existing associations. `Single` converges the stored
    /// set to exactly the desired one.
    #[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
    pub enum Mode {
        Single,
        Bulk,
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

pub mod error {
    #[derive(Debug, Fail)]
    pub enum Error {
        #[fail(display = "association not found: '{}' on {}[{}]", tag, kind, id)]
        AssociationNotFound { tag: String, kind: String, id: i64, },
    }
}

pub mod api {
    use super::{import::*, error::{Error as E}};
    use crate::app::tag;
    use crate::util::{collections::Diff, string};

    fn current_pairs(tag: &Tag, c: &db::Connection) -> Res<Vec<Pair>> {
        use crate::model::tagged_object;
        Ok(tagged_objects::table
            .select(tagged_object::IDS)
            .filter(tagged_objects::tag_id.eq(tag.id))
            .get_results(c.get())?)
    }

    /// Converge the stored association set for `tag` toward
    /// `desired` with a minimal insert/delete diff. Reads and
    /// writes share one transaction; a failure partway rolls
    /// back every pending change of this call.
    pub fn run(tag: &Tag, desired: &HashSet<(ObjectKind, Oid)>, mode: Mode, c: &db::Connection) -> Res<()> {
        c.get().transaction::<_, Error, _>(|| {
            let mut diff = Diff::with_capacity(desired.len());
            diff.stored().extend(current_pairs(tag, c)?);
            diff.wanted().extend(desired.iter().map(|(kind, id)| (kind.to_i64(), *id)));
            let (del, ins) = diff.diff();
            let ins: Vec<TaggedObject> = ins
                .map(|(kind, id)| TaggedObject { tag_id: tag.id, object_kind: *kind, object_id: *id })
                .collect();
            let inserted = TaggedObject::insert_ignore_all(&ins, c)?;
            info!("INSERT: {} TaggedObject(s)", inserted);
            if let Mode::Single = mode {
                let del: Vec<Pair> = del.map(|pair| *pair).collect();
                let deleted = TaggedObject::delete_pairs(tag.id, &del, c)?;
                info!("DELETE: {} TaggedObject(s)", deleted);
            }
            Ok(())
        })
    }

    /// Attach a batch of custom tags to one object. Each distinct
    /// trimmed name resolves to one tag and at most one new
    /// association row; pairs that already exist are left alone.
    pub fn create_custom_tags(kind: ObjectKind, id: Oid, names: &Vec<&str>, c: &db::Connection) -> Res<Vec<TaggedObject>> {
        tag::api::validate(names)?;
        c.get().transaction::<_, Error, _>(|| {
            let mut created = Vec::new();
            for name in string::normalize_distinct(names) {
                let tag = tag::api::get_or_create(name, TagKind::Custom, c)?;
                let row = TaggedObject { tag_id: tag.id, object_kind: kind.to_i64(), object_id: id };
                TaggedObject::insert_ignore_all(&vec![row], c)?;
                created.push(row);
            }
            info!("INSERT: {} TaggedObject(s)", created.len());
            Ok(created)
        })
    }

    /// Detach a single named custom tag from one object
    pub fn delete_association(kind: ObjectKind, id: Oid, name: &str, c: &db::Connection) -> Res<()> {
        let tag = tag::api::lookup(name, TagKind::Custom, c)?
            .ok_or(tag::error::Error::TagNotFound { names: string::normalize(name).into() })?;
        let deleted = diesel::delete(tagged_objects::table
            .filter(tagged_objects::tag_id.eq(tag.id))
            .filter(TaggedObject::with_object(kind, id)))
            .execute(c.get())?;
        if deleted == 0 {
            return Err(E::AssociationNotFound {
                tag: tag.name,
                kind: kind.as_str().into(),
                id,
            }.into())
        }
        info!("DELETE: {} TaggedObject(s)", deleted);
        Ok(())
    }
}

#[cfg(test)]
mod suite {
    use super::{api, import::*};
    use crate::app::tag;
    use crate::db::test;
    use crate::model::tagged_object;

    fn pairs_of(tag: &Tag, c: &db::Connection) -> Vec<Pair> {
        let mut pairs: Vec<Pair> = tagged_objects::table
            .select(tagged_object::IDS)
            .filter(tagged_objects::tag_id.eq(tag.id))
            .get_results(c.get())
            .unwrap();
        pairs.sort();
        pairs
    }

    fn desired(pairs: &[(ObjectKind, Oid)]) -> HashSet<(ObjectKind, Oid)> {
        pairs.iter().map(|pair| *pair).collect()
    }

    #[test]
    fn check_single_converges_to_desired() {
        let c = test::connection();
        let urgent = tag::api::get_or_create("urgent", TagKind::Custom, &c).unwrap();
        api::run(&urgent, &desired(&[(ObjectKind::Dashboard, 1), (ObjectKind::Chart, 2)]), Mode::Single, &c).unwrap();
        api::run(&urgent, &desired(&[(ObjectKind::Chart, 2), (ObjectKind::Chart, 3)]), Mode::Single, &c).unwrap();
        assert_eq!(pairs_of(&urgent, &c), vec![
            (ObjectKind::Chart.to_i64(), 2),
            (ObjectKind::Chart.to_i64(), 3),
        ]);
    }

    #[test]
    fn check_single_empty_detaches_all() {
        let c = test::connection();
        let urgent = tag::api::get_or_create("urgent", TagKind::Custom, &c).unwrap();
        api::run(&urgent, &desired(&[(ObjectKind::Dashboard, 1), (ObjectKind::Chart, 2)]), Mode::Single, &c).unwrap();
        api::run(&urgent, &desired(&[]), Mode::Single, &c).unwrap();
        assert_eq!(pairs_of(&urgent, &c), vec![]);
        // the tag row itself survives
        assert!(tag::api::lookup("urgent", TagKind::Custom, &c).unwrap().is_some());
    }

    #[test]
    fn check_bulk_never_deletes() {
        let c = test::connection();
        let urgent = tag::api::get_or_create("urgent", TagKind::Custom, &c).unwrap();
        api::run(&urgent, &desired(&[(ObjectKind::Dashboard, 1)]), Mode::Single, &c).unwrap();
        api::run(&urgent, &desired(&[(ObjectKind::Chart, 2)]), Mode::Bulk, &c).unwrap();
        assert_eq!(pairs_of(&urgent, &c), vec![
            (ObjectKind::Dashboard.to_i64(), 1),
            (ObjectKind::Chart.to_i64(), 2),
        ]);
    }

    #[test]
    fn check_reconcile_is_idempotent() {
        let c = test::connection();
        let urgent = tag::api::get_or_create("urgent", TagKind::Custom, &c).unwrap();
        let want = desired(&[(ObjectKind::Query, 9)]);
        api::run(&urgent, &want, Mode::Single, &c).unwrap();
        api::run(&urgent, &want, Mode::Single, &c).unwrap();
        assert_eq!(pairs_of(&urgent, &c).len(), 1);
    }

    #[test]
    fn check_create_custom_tags_deduplicates() {
        let c = test::connection();
        let created = api::create_custom_tags(ObjectKind::Chart, 9, &vec!["a", "a", " a "], &c).unwrap();
        assert_eq!(created.len(), 1);
        let tag = tag::api::lookup("a", TagKind::Custom, &c).unwrap().unwrap();
        assert_eq!(pairs_of(&tag, &c), vec![(ObjectKind::Chart.to_i64(), 9)]);
        assert_eq!(tag::api::all_tags(&c).unwrap().len(), 1);
    }

    #[test]
    fn check_create_custom_tags_rejects_reserved() {
        let c = test::connection();
        assert!(api::create_custom_tags(ObjectKind::Chart, 9, &vec!["fine", "owner:1"], &c).is_err());
        // rejection covers the whole batch
        assert!(tag::api::lookup("fine", TagKind::Custom, &c).unwrap().is_none());
    }

    #[test]
    fn check_create_custom_tags_existing_pair() {
        let c = test::connection();
        api::create_custom_tags(ObjectKind::Chart, 9, &vec!["a"], &c).unwrap();
        api::create_custom_tags(ObjectKind::Chart, 9, &vec!["a", "b"], &c).unwrap();
        let a = tag::api::lookup("a", TagKind::Custom, &c).unwrap().unwrap();
        assert_eq!(pairs_of(&a, &c).len(), 1);
    }

    #[test]
    fn check_delete_association() {
        let c = test::connection();
        api::create_custom_tags(ObjectKind::Chart, 9, &vec!["sales"], &c).unwrap();
        api::delete_association(ObjectKind::Chart, 9, " sales ", &c).unwrap();
        let sales = tag::api::lookup("sales", TagKind::Custom, &c).unwrap().unwrap();
        assert_eq!(pairs_of(&sales, &c), vec![]);
    }

    #[test]
    fn check_delete_association_missing_tag() {
        let c = test::connection();
        assert!(api::delete_association(ObjectKind::Chart, 9, "ghost", &c).is_err());
    }

    #[test]
    fn check_delete_association_missing_row() {
        let c = test::connection();
        api::create_custom_tags(ObjectKind::Chart, 9, &vec!["sales"], &c).unwrap();
        assert!(api::delete_association(ObjectKind::Dashboard, 9, "sales", &c).is_err());
    }
}
