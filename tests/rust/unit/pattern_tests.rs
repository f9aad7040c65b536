//! Pattern compiler tests

#[cfg(test)]
mod pattern_tests {
    use cypher_builder::pattern::{Direction, NodePattern, Pattern, RelationshipPattern, VariableLength};
    use cypher_builder::ast::{Parameter, Variable};
    use cypher_builder::{BuildConfig, CypherBuildError, LabelOperator, ToCypher};
    use serde_json::json;

    fn knows(length: impl Into<VariableLength>) -> Result<Pattern, CypherBuildError> {
        Ok(Pattern::new(NodePattern::anonymous().with_label("Person"))
            .related(RelationshipPattern::anonymous().with_type("KNOWS"))
            .with_length(length)?
            .to(NodePattern::anonymous().with_label("Person")))
    }

    #[test]
    fn test_movie_pattern() {
        let pattern = Pattern::new(NodePattern::anonymous().with_label("Person"))
            .related(RelationshipPattern::anonymous().with_type("ACTED_IN"))
            .with_direction(Direction::Left)
            .to(NodePattern::anonymous().with_label("Movie"));

        let result = pattern.build().unwrap();
        assert_eq!(
            result.cypher,
            "(this0:Person)<-[this1:ACTED_IN]-(this2:Movie)"
        );
        assert!(result.params.is_empty());
    }

    #[test]
    fn test_quantifier_forms() {
        assert_eq!(
            knows(5u32).unwrap().build().unwrap().cypher,
            "(this0:Person)-[this1:KNOWS*5]->(this2:Person)"
        );
        assert_eq!(
            knows(1u32..=3).unwrap().build().unwrap().cypher,
            "(this0:Person)-[this1:KNOWS*1..3]->(this2:Person)"
        );
        assert_eq!(
            knows(..).unwrap().build().unwrap().cypher,
            "(this0:Person)-[this1:KNOWS*]->(this2:Person)"
        );
    }

    #[test]
    fn test_quantifier_min_greater_than_max() {
        assert_eq!(
            knows(3u32..=1).unwrap_err(),
            CypherBuildError::InvalidQuantifier { min: 3, max: 1 }
        );
        assert!(RelationshipPattern::anonymous()
            .with_length(VariableLength::range(7, 2))
            .is_err());
    }

    #[test]
    fn test_cycle_back_to_start() {
        let a = Variable::node();
        let pattern = Pattern::new(NodePattern::new(a.clone()).with_label("Person"))
            .related(RelationshipPattern::anonymous().with_type("FOLLOWS"))
            .to(NodePattern::anonymous().with_label("Person"))
            .related(RelationshipPattern::anonymous().with_type("FOLLOWS"))
            .to(NodePattern::new(a).with_label("Person"));
        assert_eq!(
            pattern.build().unwrap().cypher,
            "(this0:Person)-[this1:FOLLOWS]->(this2:Person)-[this3:FOLLOWS]->(this0)"
        );
    }

    #[test]
    fn test_dangling_pattern_yields_no_output() {
        let partial = Pattern::new(NodePattern::anonymous())
            .related(RelationshipPattern::anonymous().with_type("KNOWS"));
        assert_eq!(
            partial.build_with(&BuildConfig::default()),
            Err(CypherBuildError::IncompletePattern)
        );
    }

    #[test]
    fn test_one_parameter_entry_per_parameter() {
        let since = Parameter::new(2020);
        let pattern = Pattern::new(NodePattern::anonymous())
            .related(RelationshipPattern::anonymous().with_properties([("since", &since)]))
            .to(NodePattern::anonymous())
            .related(RelationshipPattern::anonymous().with_properties([("since", &since)]))
            .to(NodePattern::anonymous());

        let result = pattern.build().unwrap();
        assert_eq!(
            result.cypher,
            "(this0)-[this1 {since: $param0}]->(this2)-[this3 {since: $param0}]->(this4)"
        );
        assert_eq!(result.params.len(), 1);
        assert_eq!(result.params["param0"], json!(2020));
    }

    #[test]
    fn test_equal_values_are_distinct_parameters() {
        let pattern = Pattern::new(NodePattern::anonymous().with_properties([("a", json!(1))]))
            .with_properties([("b", json!(1))]);
        let result = pattern.build().unwrap();
        assert_eq!(result.cypher, "(this0 {a: $param0, b: $param1})");
        assert_eq!(result.params.len(), 2);
    }

    #[test]
    fn test_multi_label_operators() {
        let pattern = Pattern::new(NodePattern::anonymous().with_labels(["Person", "Director"]));
        assert_eq!(
            pattern.build().unwrap().cypher,
            "(this0:Person:Director)"
        );
        let config = BuildConfig::new().with_label_operator(LabelOperator::Ampersand);
        assert_eq!(
            pattern.build_with(&config).unwrap().cypher,
            "(this0:Person&Director)"
        );
    }
}
