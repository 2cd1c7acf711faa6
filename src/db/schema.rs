table! {
    tagged_objects (tag_id, object_kind, object_id) {
        tag_id -> BigInt,
        object_kind -> BigInt,
        object_id -> BigInt,
    }
}

table! {
    tags (id) {
        id -> BigInt,
        name -> Text,
        kind -> BigInt,
        description -> Nullable<Text>,
    }
}

table! {
    user_favorite_tags (user_id, tag_id) {
        user_id -> BigInt,
        tag_id -> BigInt,
    }
}

joinable!(tagged_objects -> tags (tag_id));
joinable!(user_favorite_tags -> tags (tag_id));

allow_tables_to_appear_in_same_query!(
    tagged_objects,
    tags,
    user_favorite_tags,
);
