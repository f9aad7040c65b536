//! Build entry point tests
//!
//! Each build owns its environment: results depend only on the tree and the
//! configuration, never on earlier or concurrent builds.

#[cfg(test)]
mod build_tests {
    use std::sync::Arc;
    use std::thread;

    use cypher_builder::ast::{Expression, MatchClause, Parameter, Query, ReturnClause, Variable};
    use cypher_builder::pattern::{Direction, NodePattern, Pattern, RelationshipPattern};
    use cypher_builder::{build, BuildConfig, CypherBuildError, NameClass, ToCypher};
    use serde_json::json;

    fn movies_query() -> Query {
        let person = Variable::node();
        let movie = Variable::node();
        Query::new()
            .then(
                MatchClause::new(
                    Pattern::new(NodePattern::new(person.clone()).with_label("Person"))
                        .related(RelationshipPattern::anonymous().with_type("ACTED_IN"))
                        .with_direction(Direction::Right)
                        .to(NodePattern::new(movie.clone()).with_label("Movie")),
                )
                .with_where(Expression::eq(person.property("name"), json!("Tom Hanks"))),
            )
            .then(ReturnClause::new([movie.property("title")]))
    }

    #[test]
    fn test_build_is_deterministic() {
        let query = movies_query();
        let config = BuildConfig::new().with_prefix("q_");
        let first = build(&query, &config).unwrap();
        let second = build(&query, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.cypher,
            "MATCH (q_this0:Person)-[q_this1:ACTED_IN]->(q_this2:Movie)\n\
             WHERE q_this0.name = $q_param0\n\
             RETURN q_this2.title"
        );
    }

    #[test]
    fn test_concurrent_builds_are_independent() {
        let query = Arc::new(movies_query());
        let expected = build(query.as_ref(), &BuildConfig::default()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let query = Arc::clone(&query);
                thread::spawn(move || {
                    let config = BuildConfig::new().with_prefix(format!("t{}_", i));
                    (i, build(query.as_ref(), &config).unwrap())
                })
            })
            .collect();

        for handle in handles {
            let (i, result) = handle.join().unwrap();
            let prefix = format!("t{}_", i);
            assert_eq!(
                result.cypher,
                expected
                    .cypher
                    .replace("this", &format!("{}this", prefix))
                    .replace("$param", &format!("${}param", prefix))
            );
            assert_eq!(result.params[&format!("{}param0", prefix)], json!("Tom Hanks"));
        }
    }

    #[test]
    fn test_extra_params_are_merged() {
        let config = BuildConfig::new()
            .with_extra_param("tenant", json!("acme"))
            .with_extra_param("limit", json!(25));
        let result = build(&movies_query(), &config).unwrap();
        let keys: Vec<&String> = result.params.keys().collect();
        assert_eq!(keys, vec!["param0", "tenant", "limit"]);
        assert_eq!(result.params["limit"], json!(25));
    }

    #[test]
    fn test_colliding_extra_param_fails_whole_build() {
        let query = ReturnClause::new([Expression::from(Parameter::named("tenant", "x"))]);
        let config = BuildConfig::new().with_extra_param("tenant", json!("acme"));
        assert_eq!(
            build(&query, &config),
            Err(CypherBuildError::NameCollision {
                name: "tenant".to_string(),
                class: NameClass::Parameter,
            })
        );

        let config = BuildConfig::new()
            .with_extra_param("a", json!(1))
            .with_extra_param("a", json!(2));
        assert!(matches!(
            build(&Pattern::new(NodePattern::anonymous()), &config),
            Err(CypherBuildError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_distinct_parameters_with_same_name_collide() {
        let query = ReturnClause::new([
            Expression::from(Parameter::named("x", 1)),
            Expression::from(Parameter::named("x", 2)),
        ]);
        assert!(matches!(
            query.build(),
            Err(CypherBuildError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        assert!(matches!(
            build(&movies_query(), &BuildConfig::new().with_prefix("$x")),
            Err(CypherBuildError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_result_serializes_to_json() {
        let pattern = Pattern::new(NodePattern::anonymous().with_properties([("id", json!(3))]));
        let result = pattern.build().unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"cypher": "(this0 {id: $param0})", "params": {"param0": 3}})
        );
    }
}
