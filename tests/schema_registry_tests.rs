//! Schema registry laws over the whole catalog

use relmr_core::error::SchemaError;
use relmr_core::schema::{self, registry, Relation};

#[test]
fn test_join_key_is_symmetric_for_every_pair() {
    for a in Relation::ALL {
        for b in Relation::ALL {
            assert_eq!(
                schema::join_key(a, b),
                schema::join_key(b, a),
                "join key of {a}/{b} depends on order"
            );
        }
    }
}

#[test]
fn test_known_join_keys() {
    assert_eq!(schema::join_key(Relation::Users, Relation::Zipcodes), Some("zipcode"));
    assert_eq!(schema::join_key(Relation::Rating, Relation::Users), Some("userid"));
    assert_eq!(schema::join_key(Relation::Movies, Relation::Rating), Some("movieid"));
    assert_eq!(schema::join_key(Relation::Movies, Relation::Users), None);
    assert_eq!(schema::join_key(Relation::Zipcodes, Relation::Rating), None);
    assert_eq!(schema::join_key(Relation::Users, Relation::Users), None);
}

#[test]
fn test_join_key_column_exists_on_both_sides() {
    for a in Relation::ALL {
        for b in Relation::ALL {
            if let Some(key) = schema::join_key(a, b) {
                assert!(schema::column_index(a, key).is_ok());
                assert!(schema::column_index(b, key).is_ok());
            }
        }
    }
}

#[test]
fn test_name_index_round_trip_for_all_columns() {
    for relation in Relation::ALL {
        let n = schema::column_count(relation);
        assert!(n > 0, "{relation} has no columns");
        for i in 0..n {
            let name = schema::column_name(relation, i).expect("index in range");
            assert_eq!(schema::column_index(relation, name), Ok(i));
        }
        for name in registry().schema(relation).columns() {
            let i = schema::column_index(relation, name).expect("declared column");
            assert_eq!(schema::column_name(relation, i), Ok(*name));
        }
    }
}

#[test]
fn test_catalog_shapes() {
    assert_eq!(schema::column_count(Relation::Users), 5);
    assert_eq!(schema::column_count(Relation::Zipcodes), 4);
    assert_eq!(schema::column_count(Relation::Movies), 23);
    assert_eq!(schema::column_count(Relation::Rating), 4);
    assert_eq!(schema::file_name(Relation::Movies), "movies.csv");
    assert_eq!(schema::column_name(Relation::Movies, 22), Ok("Rating"));
}

#[test]
fn test_unknown_lookups_are_schema_errors() {
    assert!(matches!(
        "orders".parse::<Relation>(),
        Err(SchemaError::UnknownRelation(_))
    ));
    assert!(matches!(
        schema::column_index(Relation::Users, "salary"),
        Err(SchemaError::UnknownColumn { .. })
    ));
    // Column names are case-sensitive.
    assert!(schema::column_index(Relation::Users, "UserId").is_err());
    assert!(matches!(
        schema::column_name(Relation::Rating, 4),
        Err(SchemaError::IndexOutOfRange { index: 4, len: 4, .. })
    ));
}

#[test]
fn test_relation_names_parse_case_insensitively() {
    for relation in Relation::ALL {
        assert_eq!(relation.name().to_lowercase().parse::<Relation>(), Ok(relation));
        assert_eq!(relation.name().parse::<Relation>(), Ok(relation));
    }
}

#[test]
fn test_schema_view_matches_free_functions() {
    for relation in Relation::ALL {
        let view = schema::schema(relation);
        assert_eq!(view.relation(), relation);
        assert_eq!(view.columns(), schema::columns(relation));
        assert_eq!(view.len(), schema::column_count(relation));
        assert_eq!(view.file_name(), schema::file_name(relation));
    }
    assert_eq!(
        schema::columns(Relation::Zipcodes),
        ["zipcode", "zipcodetype", "city", "state"]
    );
}
