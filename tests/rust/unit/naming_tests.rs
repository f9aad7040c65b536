//! Naming tests
//!
//! Generated names, explicit names and prefixes as seen through `build`.

#[cfg(test)]
mod naming_tests {
    use cypher_builder::ast::{Expression, Parameter, ReturnClause, Variable};
    use cypher_builder::pattern::{NodePattern, Pattern, RelationshipPattern};
    use cypher_builder::{BuildConfig, CypherBuildError, NameClass, ToCypher};
    use serde_json::json;

    #[test]
    fn test_one_counter_for_all_variable_kinds() {
        let value = Variable::new();
        let node = Variable::node();
        let path = Variable::path();
        let ret = ReturnClause::new([
            Expression::from(&value),
            Expression::from(&node),
            Expression::from(&path),
        ]);
        assert_eq!(ret.build().unwrap().cypher, "RETURN var0, this1, p2");
    }

    #[test]
    fn test_same_variable_same_name_everywhere() {
        let person = Variable::node();
        let ret = ReturnClause::new([
            person.property("name"),
            person.property("born"),
            Expression::from(&person),
        ]);
        assert_eq!(
            ret.build().unwrap().cypher,
            "RETURN this0.name, this0.born, this0"
        );
    }

    #[test]
    fn test_prefix_applies_to_generated_names_only() {
        let named = Variable::named_node("movie");
        let pattern = Pattern::new(NodePattern::new(named).with_properties([(
            "title",
            Parameter::named("title", "Heat"),
        )]))
        .related(RelationshipPattern::anonymous())
        .to(NodePattern::anonymous().with_properties([("name", json!("Al"))]));

        let result = pattern
            .build_with(&BuildConfig::new().with_prefix("sub_"))
            .unwrap();
        assert_eq!(
            result.cypher,
            "(movie {title: $title})-[sub_this0]->(sub_this1 {name: $sub_param0})"
        );
        assert_eq!(result.params["title"], json!("Heat"));
        assert_eq!(result.params["sub_param0"], json!("Al"));
    }

    #[test]
    fn test_generated_names_skip_explicit_names() {
        let pattern = Pattern::new(Variable::named_node("this0"))
            .related(RelationshipPattern::anonymous())
            .to(NodePattern::anonymous());
        assert_eq!(
            pattern.build().unwrap().cypher,
            "(this0)-[this1]->(this2)"
        );
    }

    #[test]
    fn test_variables_and_parameters_do_not_share_names() {
        let ret = ReturnClause::new([
            Expression::from(Variable::named("param0")),
            Expression::from(json!(1)),
        ]);
        let result = ret.build().unwrap();
        assert_eq!(result.cypher, "RETURN param0, $param0");
        assert_eq!(result.params["param0"], json!(1));
    }

    #[test]
    fn test_explicit_name_collision() {
        let ret = ReturnClause::new([
            Expression::from(Variable::named("n")),
            Expression::from(Variable::named("n")),
        ]);
        assert_eq!(
            ret.build(),
            Err(CypherBuildError::NameCollision {
                name: "n".to_string(),
                class: NameClass::Variable,
            })
        );
    }

    #[test]
    fn test_explicit_name_needing_escape() {
        let ret = ReturnClause::new([Variable::named("my var")]);
        assert_eq!(ret.build().unwrap().cypher, "RETURN `my var`");
    }
}
