//! Human-readable "before ---> after" shapes for each phase of a job.
//!
//! Rendering is pure: it reads the resolved query and never touches the
//! operators, so an explain never changes what a run does.

use relmr_core::query::AggregateFunction;
use relmr_core::result::PlanDescription;
use relmr_core::schema::{columns, Relation};

use crate::logical::{ResolvedGroupBy, ResolvedJoin};

const ARROW: &str = " ---> ";

fn all_columns(relation: Relation) -> Vec<&'static str> {
    columns(relation).to_vec()
}

fn non_key_columns(relation: Relation, key_index: usize) -> Vec<&'static str> {
    columns(relation)
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != key_index)
        .map(|(_, c)| *c)
        .collect()
}

fn join_mapper(resolved: &ResolvedJoin, relation: Relation, key_index: usize) -> String {
    let mut out = format!(
        "<serial_number, ({})>{ARROW}<{}, ({})>",
        all_columns(relation).join(", "),
        resolved.join_key,
        non_key_columns(relation, key_index).join(", "),
    );
    if let Some(p) = resolved.predicate_for(relation) {
        out.push_str(&format!(" WHERE {} = '{}'", p.column, p.value));
    }
    out
}

pub fn explain_join(resolved: &ResolvedJoin) -> PlanDescription {
    let mut both = non_key_columns(resolved.left, resolved.left_key_index);
    both.extend(non_key_columns(resolved.right, resolved.right_key_index));
    let both = both.join(", ");

    PlanDescription::Join {
        first_mapper: join_mapper(resolved, resolved.left, resolved.left_key_index),
        second_mapper: join_mapper(resolved, resolved.right, resolved.right_key_index),
        reducer: format!(
            "<{jk}, List({both})>{ARROW}<{jk}, ({both})>",
            jk = resolved.join_key
        ),
    }
}

fn grouping_label(resolved: &ResolvedGroupBy) -> String {
    let names: Vec<&str> = resolved.grouping.iter().map(|(c, _)| c.as_str()).collect();
    format!("({})", names.join(", "))
}

fn value_list(resolved: &ResolvedGroupBy, last: &str) -> String {
    match resolved.function() {
        AggregateFunction::Count => "{1, 1, 1, ... 1}".to_string(),
        _ => {
            let v = resolved.aggregate.column_label();
            format!("{{{v}(1), {v}(2), ... {v}({last})}}")
        }
    }
}

pub fn explain_group_by(resolved: &ResolvedGroupBy) -> PlanDescription {
    let key = grouping_label(resolved);
    let aggregate = resolved.aggregate.to_string();
    let threshold = resolved.threshold;
    let prefilter = resolved.function().filters_before_reduce();

    let emitted = match resolved.function() {
        AggregateFunction::Count => "1",
        _ => resolved.aggregate.column_label(),
    };
    let mut mapper = format!(
        "<serial_number, ({})>{ARROW}<{key}, {emitted}>",
        all_columns(resolved.relation).join(", ")
    );
    if prefilter {
        mapper.push_str(&format!(" if {emitted} > {threshold}"));
    }

    let mut combiner = format!(
        "<{key}, {}>{ARROW}<{key}, {aggregate}>",
        value_list(resolved, "k")
    );
    if prefilter {
        combiner.push_str(&format!(" if {aggregate} > {threshold}"));
    }

    let reducer = format!(
        "<{key}, {}>{ARROW}<{key}, {aggregate}> if {aggregate} > {threshold}",
        value_list(resolved, "n")
    );

    PlanDescription::GroupBy {
        mapper,
        combiner: Some(combiner),
        reducer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmr_core::query::{EqualityPredicate, GroupByQuery, JoinQuery};

    fn group_by(columns: &[&str], threshold: i64) -> PlanDescription {
        let resolved = ResolvedGroupBy::resolve(&GroupByQuery {
            relation: Relation::Rating,
            columns: columns.iter().map(|s| s.to_string()).collect(),
            threshold,
        })
        .unwrap();
        explain_group_by(&resolved)
    }

    #[test]
    fn join_shapes() {
        let resolved = ResolvedJoin::resolve(&JoinQuery {
            left: Relation::Users,
            right: Relation::Zipcodes,
            predicate: Some(EqualityPredicate {
                relation: Relation::Zipcodes,
                column: "state".into(),
                value: "MA".into(),
            }),
        })
        .unwrap();
        let PlanDescription::Join {
            first_mapper,
            second_mapper,
            reducer,
        } = explain_join(&resolved)
        else {
            panic!("expected a join description");
        };
        assert_eq!(
            first_mapper,
            "<serial_number, (userid, age, gender, occupation, zipcode)> ---> \
             <zipcode, (userid, age, gender, occupation)>"
        );
        assert_eq!(
            second_mapper,
            "<serial_number, (zipcode, zipcodetype, city, state)> ---> \
             <zipcode, (zipcodetype, city, state)> WHERE state = 'MA'"
        );
        assert_eq!(
            reducer,
            "<zipcode, List(userid, age, gender, occupation, zipcodetype, city, state)> ---> \
             <zipcode, (userid, age, gender, occupation, zipcodetype, city, state)>"
        );
    }

    #[test]
    fn max_shapes_carry_the_prefilter() {
        let PlanDescription::GroupBy {
            mapper,
            combiner,
            reducer,
        } = group_by(&["movieid", "MAX(rating)"], 3)
        else {
            panic!("expected a group-by description");
        };
        assert_eq!(
            mapper,
            "<serial_number, (userid, movieid, rating, timestamp)> ---> \
             <(movieid), rating> if rating > 3"
        );
        assert_eq!(
            combiner.as_deref(),
            Some(
                "<(movieid), {rating(1), rating(2), ... rating(k)}> ---> \
                 <(movieid), MAX(rating)> if MAX(rating) > 3"
            )
        );
        assert_eq!(
            reducer,
            "<(movieid), {rating(1), rating(2), ... rating(n)}> ---> \
             <(movieid), MAX(rating)> if MAX(rating) > 3"
        );
    }

    #[test]
    fn count_shapes_use_unit_values() {
        let PlanDescription::GroupBy {
            mapper,
            combiner,
            reducer,
        } = group_by(&["userid", "movieid", "COUNT(*)"], 1)
        else {
            panic!("expected a group-by description");
        };
        assert!(mapper.ends_with("<(userid, movieid), 1>"));
        assert!(!combiner.unwrap().contains(" if "));
        assert_eq!(
            reducer,
            "<(userid, movieid), {1, 1, 1, ... 1}> ---> \
             <(userid, movieid), COUNT(*)> if COUNT(*) > 1"
        );
    }
}
