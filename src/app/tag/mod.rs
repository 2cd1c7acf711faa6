pub mod prelude {
    /// The separator reserved to namespace implicit tags
    pub const RESERVED: char = ':';

    /// Name prefixes of the system-managed kinds
    pub const TYPE_PREFIX: &'static str = "type:";
    pub const OWNER_PREFIX: &'static str = "owner:";
    pub const FAVORITED_BY_PREFIX: &'static str = "favorited_by:";
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
        #[fail(display = "invalid tag name(s): '{}'", names)]
        InvalidTagName { names: String, },
        #[fail(display = "tag(s) not found: '{}'", names)]
        TagNotFound { names: String, },
    }
}

pub mod api {
    use super::{import::*, error::{Error as E}};
    use crate::model::tag;
    use crate::util::string;
    use regex::Regex;

    lazy_static! {
        /// Regex for (in)validating user-authored tag names
        static ref INVALID: Regex = {
            let sep = regex::escape(&RESERVED.to_string());
            Regex::new(&format!(r".*{}.*", sep))
                .expect("failed to compile regex")
        };
    }

    /// Batch validation for user-authored names. The whole
    /// batch is rejected when any name is empty after trimming
    /// or collides with the implicit namespaces; every offender
    /// is reported, not just the first.
    pub fn validate(names: &Vec<&str>) -> Res<()> {
        let invalid: Vec<&str> = names.iter()
            .map(|n| string::normalize(n))
            .filter(|n| n.is_empty() || INVALID.is_match(n))
            .collect();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(E::InvalidTagName { names: invalid.join(", ") }.into())
        }
    }

    pub fn type_tag_name(kind: ObjectKind) -> String {
        format!("{}{}", TYPE_PREFIX, kind.as_str())
    }

    pub fn owner_tag_name(owner: Uid) -> String {
        format!("{}{}", OWNER_PREFIX, owner)
    }

    pub fn favorited_by_tag_name(user: Uid) -> String {
        format!("{}{}", FAVORITED_BY_PREFIX, user)
    }

    /// Look up a tag by its (name, kind) identity. Applies the
    /// same normalization as the create path.
    pub fn lookup(name: &str, kind: TagKind, c: &db::Connection) -> Res<Option<Tag>> {
        Tag::by_identity(string::normalize(name), kind, c)
    }

    /// Get-or-create of a (name, kind) identity. Insert-or-ignore
    /// followed by a lookup, so concurrent or repeated calls with
    /// identical inputs converge on a single row.
    pub fn get_or_create(name: &str, kind: TagKind, c: &db::Connection) -> Res<Tag> {
        let name = string::normalize(name);
        Tag::insert_ignore(&tag::Insert { name, kind: kind.to_i64(), description: None }, c)?;
        Tag::by_identity(name, kind, c)?
            .ok_or(E::TagNotFound { names: name.into() }.into())
    }

    /// Resolve every name as a custom tag, aggregating the
    /// missing ones into a single error.
    pub fn resolve_custom(names: &Vec<&str>, c: &db::Connection) -> Res<Vec<Tag>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names.iter() {
            match lookup(name, TagKind::Custom, c)? {
                Some(tag) => found.push(tag),
                None => missing.push(string::normalize(name)),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(E::TagNotFound { names: missing.join(", ") }.into())
        }
    }

    /// Delete custom tags by name: every association row first,
    /// then the tag rows, all-or-nothing.
    pub fn delete_tags(names: &Vec<&str>, c: &db::Connection) -> Res<usize> {
        c.get().transaction::<_, Error, _>(|| {
            let tags = resolve_custom(names, c)?;
            let ids: Vec<Tid> = tags.iter().map(|t| t.id).collect();
            let associations = diesel::delete(
                tagged_objects::table.filter(tagged_objects::tag_id.eq_any(&ids))
            ).execute(c.get())?;
            let deleted = Tag::delete_ids(&ids, c)?;
            info!("DELETE: {} TaggedObject(s)", associations);
            info!("DELETE: {} Tag(s)", deleted);
            Ok(deleted)
        })
    }

    /// Forget custom tags that no longer tag anything. Implicit
    /// tags stay: they are cheap and their lifecycle belongs to
    /// the maintainer, not to garbage collection.
    pub fn clean(c: &db::Connection) -> Res<usize> {
        c.get().transaction::<_, Error, _>(|| {
            let used_tids = tagged_objects::table.select(tagged_objects::tag_id).distinct();
            let deleted = diesel::delete(
                tags::table
                    .filter(tags::id.ne_all(used_tids))
                    .filter(tags::kind.eq(TagKind::Custom.to_i64()))
            ).execute(c.get())?;
            info!("DELETE: {} Tag(s)", deleted);
            Ok(deleted)
        })
    }

    /// Return all tags
    pub fn all_tags(c: &db::Connection) -> Res<Vec<Tag>> {
        Ok(tags::table.get_results(c.get())?)
    }
}

#[cfg(test)]
mod suite {
    use super::{api, import::*};
    use crate::db::test;

    #[test]
    fn check_validate() {
        assert!(api::validate(&vec!["alpha", "beta"]).is_ok());
        assert!(api::validate(&vec![" alpha "]).is_ok());
        assert!(api::validate(&vec![]).is_ok());
        assert!(api::validate(&vec!["owner:1"]).is_err());
        assert!(api::validate(&vec!["alpha", "a:b"]).is_err());
        assert!(api::validate(&vec!["  "]).is_err());
    }

    #[test]
    fn check_validate_aggregates() {
        let err = api::validate(&vec!["ok", "a:b", "c:d"]).unwrap_err();
        let message = format!("{}", err);
        assert!(message.contains("a:b"));
        assert!(message.contains("c:d"));
        assert!(!message.contains("ok"));
    }

    #[test]
    fn check_get_or_create_idempotent() {
        let c = test::connection();
        let a = api::get_or_create("finance", TagKind::Custom, &c).unwrap();
        let b = api::get_or_create("finance", TagKind::Custom, &c).unwrap();
        let trimmed = api::get_or_create("  finance ", TagKind::Custom, &c).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, trimmed.id);
        assert_eq!(api::all_tags(&c).unwrap().len(), 1);
    }

    #[test]
    fn check_get_or_create_kinds_are_distinct() {
        let c = test::connection();
        let custom = api::get_or_create("finance", TagKind::Custom, &c).unwrap();
        let owner = api::get_or_create("finance", TagKind::Owner, &c).unwrap();
        assert_ne!(custom.id, owner.id);
    }

    #[test]
    fn check_lookup_normalizes() {
        let c = test::connection();
        let tag = api::get_or_create("finance", TagKind::Custom, &c).unwrap();
        let found = api::lookup(" finance ", TagKind::Custom, &c).unwrap().unwrap();
        assert_eq!(tag.id, found.id);
        assert!(api::lookup("absent", TagKind::Custom, &c).unwrap().is_none());
    }

    #[test]
    fn check_implicit_names() {
        assert_eq!(api::type_tag_name(ObjectKind::Chart), "type:chart");
        assert_eq!(api::owner_tag_name(5), "owner:5");
        assert_eq!(api::favorited_by_tag_name(12), "favorited_by:12");
    }

    #[test]
    fn check_delete_tags_unknown_name() {
        let c = test::connection();
        api::get_or_create("known", TagKind::Custom, &c).unwrap();
        let err = api::delete_tags(&vec!["known", "ghost"], &c).unwrap_err();
        assert!(format!("{}", err).contains("ghost"));
        // nothing was deleted
        assert_eq!(api::all_tags(&c).unwrap().len(), 1);
    }

    #[test]
    fn check_delete_tags() {
        let c = test::connection();
        api::get_or_create("doomed", TagKind::Custom, &c).unwrap();
        api::get_or_create("spared", TagKind::Custom, &c).unwrap();
        assert_eq!(api::delete_tags(&vec!["doomed"], &c).unwrap(), 1);
        let left = api::all_tags(&c).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "spared");
    }

    #[test]
    fn check_clean_spares_implicit_tags() {
        let c = test::connection();
        api::get_or_create("orphan", TagKind::Custom, &c).unwrap();
        api::get_or_create("type:chart", TagKind::Type, &c).unwrap();
        assert_eq!(api::clean(&c).unwrap(), 1);
        let left = api::all_tags(&c).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "type:chart");
    }
}
