pub mod prelude {
    use crate::import::*;
    use crate::model::export::*;
    use chrono::NaiveDateTime;

    /// What a domain adapter knows about one of its objects.
    /// The adapter decides the internal ordering of its records.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ObjectRecord {
        pub id: Oid,
        pub name: String,
        pub url: String,
        pub owners: Vec<Uid>,
        pub changed_on: NaiveDateTime,
    }

    /// One denormalized listing row
    #[derive(Debug, Clone, PartialEq)]
    pub struct ObjectSummary {
        pub id: Oid,
        pub kind: ObjectKind,
        pub name: String,
        pub url: String,
        pub owners: Vec<Uid>,
        pub tags: Vec<String>,
        pub changed_on: NaiveDateTime,
    }

    /// Resolves object ids to records, one kind at a time.
    /// Implemented over the platform's domain tables, which
    /// live outside this subsystem.
    pub trait ObjectSource {
        fn records(&self, kind: ObjectKind, ids: &Vec<Oid>) -> Res<Vec<ObjectRecord>>;
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
        #[fail(display = "invalid object kind(s): '{}'", kinds)]
        InvalidObjectKind { kinds: String, },
    }
}

pub mod api {
    use super::{import::*, error::{Error as E}};
    use crate::util::string;

    /// Parse kind strings from the API boundary. Every
    /// unrecognized kind in the batch is reported at once.
    pub fn parse_object_kinds(names: &Vec<&str>) -> Res<Vec<ObjectKind>> {
        let mut kinds = Vec::with_capacity(names.len());
        let mut invalid = Vec::new();
        for name in names.iter().map(|n| string::normalize(n)) {
            match ObjectKind::parse(name) {
                Some(kind) => kinds.push(kind),
                None => invalid.push(name),
            }
        }
        if invalid.is_empty() {
            Ok(kinds)
        } else {
            Err(E::InvalidObjectKind { kinds: invalid.join(", ") }.into())
        }
    }

    fn tag_ids_by_names(names: &Vec<&str>, c: &db::Connection) -> Res<Vec<Tid>> {
        let names: Vec<&str> = names.iter().map(|n| string::normalize(n)).collect();
        Ok(tags::table
            .select(tags::id)
            .filter(tags::name.eq_any(&names))
            .get_results(c.get())?)
    }

    fn object_ids(kind: ObjectKind, tag_ids: Option<&Vec<Tid>>, c: &db::Connection) -> Res<Vec<Oid>> {
        let query = tagged_objects::table
            .select(tagged_objects::object_id)
            .filter(tagged_objects::object_kind.eq(kind.to_i64()))
            .distinct();
        match tag_ids {
            Some(tids) => Ok(query.filter(tagged_objects::tag_id.eq_any(tids)).get_results(c.get())?),
            None => Ok(query.get_results(c.get())?),
        }
    }

    fn tag_names_by_object(kind: ObjectKind, ids: &Vec<Oid>, c: &db::Connection) -> Res<HashMap<Oid, Vec<String>>> {
        let rows: Vec<(Oid, String)> = tagged_objects::table
            .inner_join(tags::table)
            .filter(tagged_objects::object_kind.eq(kind.to_i64()))
            .filter(tagged_objects::object_id.eq_any(ids))
            .select((tagged_objects::object_id, tags::name))
            .get_results(c.get())?;
        let mut names: HashMap<Oid, Vec<String>> = HashMap::with_capacity(ids.len());
        for (id, name) in rows {
            names.entry(id).or_insert_with(Vec::new).push(name);
        }
        Ok(names)
    }

    /// Denormalized projection over every requested kind (all
    /// kinds when unspecified), restricted to objects carrying
    /// any of the named tags (any tag when unspecified). The
    /// per-kind record order of the source is preserved; there
    /// is no global sort across kinds.
    pub fn list_tagged_objects(
        tag_names: Option<&Vec<&str>>,
        kinds: Option<&Vec<ObjectKind>>,
        source: &dyn ObjectSource,
        c: &db::Connection,
    ) -> Res<Vec<ObjectSummary>> {
        let tids = match tag_names {
            Some(names) => Some(tag_ids_by_names(names, c)?),
            None => None,
        };
        let all = ObjectKind::ALL.to_vec();
        let kinds = match kinds {
            Some(kinds) => kinds,
            None => &all,
        };
        let mut summaries = Vec::new();
        for kind in kinds.iter() {
            let ids = object_ids(*kind, tids.as_ref(), c)?;
            if ids.is_empty() { continue }
            let mut names = tag_names_by_object(*kind, &ids, c)?;
            for record in source.records(*kind, &ids)? {
                let mut tags = names.remove(&record.id).unwrap_or_else(Vec::new);
                tags.sort();
                summaries.push(ObjectSummary {
                    id: record.id,
                    kind: *kind,
                    name: record.name,
                    url: record.url,
                    owners: record.owners,
                    tags,
                    changed_on: record.changed_on,
                });
            }
        }
        info!("listed: {} object(s)", summaries.len());
        Ok(summaries)
    }
}
