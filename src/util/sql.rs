use diesel::sql_types::Bool;
use diesel::expression::sql_literal::{SqlLiteral, sql};
use std::fmt::Display;

// {{{ Sqlite

/// WHERE (a, b) IN (VALUES ( ... ))
pub fn with_pairs<'a, T: Display>(columns: (&'a str, &'a str), values: &'a Vec<(T, T)>) -> SqlLiteral<Bool>
{
    let len = values.len();
    if len == 0 { return sql_false() }
    let mut s = String::with_capacity(values.len() * 5);
    for (i, (a, b)) in values.iter().enumerate() {
        s.push_str(&format!("('{}','{}')", a, b));
        if i != len-1 { s.push(','); }
    }
    sql::<Bool>(&format!("({}, {}) IN (VALUES {})", columns.0, columns.1, s))
}

pub fn sql_false() -> SqlLiteral<Bool>
{ sql::<Bool>("FALSE") }

// }}}
