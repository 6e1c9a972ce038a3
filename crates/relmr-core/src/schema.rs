//! The closed relation catalog.
//!
//! Every relation maps to one backing record file and one ordered column
//! list. The registry is built once on first access and is read-only from
//! then on, so compiled mappers and reducers on any thread can consult it
//! without synchronization.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A named, fixed-schema record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Relation {
    Users,
    Zipcodes,
    Movies,
    Rating,
}

impl Relation {
    pub const ALL: [Relation; 4] = [
        Relation::Users,
        Relation::Zipcodes,
        Relation::Movies,
        Relation::Rating,
    ];

    /// Upper-case name; also the tag the join mapper prefixes values with.
    pub const fn name(self) -> &'static str {
        match self {
            Relation::Users => "USERS",
            Relation::Zipcodes => "ZIPCODES",
            Relation::Movies => "MOVIES",
            Relation::Rating => "RATING",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Relation {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Relation::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SchemaError::UnknownRelation(trimmed.to_lowercase()))
    }
}

impl TryFrom<String> for Relation {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Relation> for String {
    fn from(r: Relation) -> Self {
        r.name().to_string()
    }
}

/// Ordered columns of one relation with both lookup directions.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    relation: Relation,
    file_name: &'static str,
    columns: Vec<&'static str>,
    positions: HashMap<&'static str, usize>,
}

impl ColumnSchema {
    fn new(relation: Relation, file_name: &'static str, columns: &[&'static str]) -> Self {
        let positions = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, i))
            .collect();
        Self {
            relation,
            file_name,
            columns: columns.to_vec(),
            positions,
        }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, column: &str) -> Result<usize, SchemaError> {
        self.positions
            .get(column)
            .copied()
            .ok_or_else(|| SchemaError::UnknownColumn {
                relation: self.relation,
                column: column.to_string(),
            })
    }

    pub fn name_at(&self, index: usize) -> Result<&'static str, SchemaError> {
        self.columns
            .get(index)
            .copied()
            .ok_or(SchemaError::IndexOutOfRange {
                relation: self.relation,
                index,
                len: self.columns.len(),
            })
    }
}

/// Unordered relation pair → shared column.
///
/// Pairs are normalized on both insert and lookup, so `get(a, b)` and
/// `get(b, a)` always agree. A missing entry means "no common key".
#[derive(Debug, Clone, Default)]
pub struct JoinKeyTable {
    entries: HashMap<(Relation, Relation), &'static str>,
}

impl JoinKeyTable {
    fn normalize(a: Relation, b: Relation) -> (Relation, Relation) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    fn insert(&mut self, a: Relation, b: Relation, column: &'static str) {
        self.entries.insert(Self::normalize(a, b), column);
    }

    pub fn get(&self, a: Relation, b: Relation) -> Option<&'static str> {
        self.entries.get(&Self::normalize(a, b)).copied()
    }
}

/// Process-wide catalog: one `ColumnSchema` per relation plus the join keys.
#[derive(Debug)]
pub struct SchemaRegistry {
    users: ColumnSchema,
    zipcodes: ColumnSchema,
    movies: ColumnSchema,
    rating: ColumnSchema,
    join_keys: JoinKeyTable,
}

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::builtin);

/// The shared registry.
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

impl SchemaRegistry {
    fn builtin() -> Self {
        let users = ColumnSchema::new(
            Relation::Users,
            "users.csv",
            &["userid", "age", "gender", "occupation", "zipcode"],
        );
        let zipcodes = ColumnSchema::new(
            Relation::Zipcodes,
            "zipcodes.csv",
            &["zipcode", "zipcodetype", "city", "state"],
        );
        let movies = ColumnSchema::new(
            Relation::Movies,
            "movies.csv",
            &[
                "movieid",
                "title",
                "releasedate",
                "unknown",
                "Action",
                "Adventure",
                "Animation",
                "Children",
                "Comedy",
                "Crime",
                "Documentary",
                "Drama",
                "Fantasy",
                "Film_Noir",
                "Horror",
                "Musical",
                "Mystery",
                "Romance",
                "Sci_Fi",
                "Thriller",
                "War",
                "Western",
                "Rating",
            ],
        );
        let rating = ColumnSchema::new(
            Relation::Rating,
            "rating.csv",
            &["userid", "movieid", "rating", "timestamp"],
        );

        let mut join_keys = JoinKeyTable::default();
        join_keys.insert(Relation::Users, Relation::Zipcodes, "zipcode");
        join_keys.insert(Relation::Users, Relation::Rating, "userid");
        join_keys.insert(Relation::Movies, Relation::Rating, "movieid");

        Self {
            users,
            zipcodes,
            movies,
            rating,
            join_keys,
        }
    }

    pub fn schema(&self, relation: Relation) -> &ColumnSchema {
        match relation {
            Relation::Users => &self.users,
            Relation::Zipcodes => &self.zipcodes,
            Relation::Movies => &self.movies,
            Relation::Rating => &self.rating,
        }
    }

    pub fn column_index(&self, relation: Relation, column: &str) -> Result<usize, SchemaError> {
        self.schema(relation).index_of(column)
    }

    pub fn column_name(&self, relation: Relation, index: usize) -> Result<&'static str, SchemaError> {
        self.schema(relation).name_at(index)
    }

    pub fn column_count(&self, relation: Relation) -> usize {
        self.schema(relation).len()
    }

    pub fn file_name(&self, relation: Relation) -> &'static str {
        self.schema(relation).file_name()
    }

    /// Shared column of two relations, `None` when they have no common key.
    pub fn join_key(&self, a: Relation, b: Relation) -> Option<&'static str> {
        self.join_keys.get(a, b)
    }
}

pub fn column_index(relation: Relation, column: &str) -> Result<usize, SchemaError> {
    registry().column_index(relation, column)
}

pub fn column_name(relation: Relation, index: usize) -> Result<&'static str, SchemaError> {
    registry().column_name(relation, index)
}

pub fn column_count(relation: Relation) -> usize {
    registry().column_count(relation)
}

pub fn file_name(relation: Relation) -> &'static str {
    registry().file_name(relation)
}

pub fn join_key(a: Relation, b: Relation) -> Option<&'static str> {
    registry().join_key(a, b)
}

pub fn schema(relation: Relation) -> &'static ColumnSchema {
    registry().schema(relation)
}

/// Declared column names in order.
pub fn columns(relation: Relation) -> &'static [&'static str] {
    registry().schema(relation).columns()
}
