//! Clause and expression rendering through the public builder API

#[cfg(test)]
mod clause_tests {
    use cypher_builder::ast::{
        Column, CreateClause, DeleteClause, Expression, Literal, MatchClause, PropertyAccess,
        Query, ReturnClause, SetClause, SortOrder, UnwindClause, Variable, WithClause,
    };
    use cypher_builder::pattern::{NodePattern, Pattern, RelationshipPattern};
    use cypher_builder::{CypherBuildError, Environment, NameClass, ToCypher};
    use serde_json::json;

    #[test]
    fn test_match_with_return_pipeline() {
        let person = Variable::node();
        let movie = Variable::node();
        let count = Variable::new();

        let query = Query::new()
            .then(
                MatchClause::new(
                    Pattern::new(NodePattern::new(person.clone()).with_label("Person"))
                        .related(RelationshipPattern::anonymous().with_type("ACTED_IN"))
                        .to(NodePattern::new(movie.clone()).with_label("Movie")),
                )
                .with_where(Expression::gt(movie.property("released"), json!(2000))),
            )
            .then(
                WithClause::new([
                    Column::from(&person),
                    Column::aliased(Expression::function("count", [&movie]), &count),
                ])
                .with_where(Expression::gte(&count, Literal::from(3i64))),
            )
            .then(
                ReturnClause::new([person.property("name")])
                    .order_by(&count, SortOrder::Desc)
                    .limit(json!(10)),
            );

        let result = query.build().unwrap();
        assert_eq!(
            result.cypher,
            "MATCH (this0:Person)-[this1:ACTED_IN]->(this2:Movie)\n\
             WHERE this2.released > $param0\n\
             WITH this0, count(this2) AS var3\n\
             WHERE var3 >= 3\n\
             RETURN this0.name\n\
             ORDER BY var3 DESC\n\
             LIMIT $param1"
        );
        assert_eq!(result.params["param0"], json!(2000));
        assert_eq!(result.params["param1"], json!(10));
    }

    #[test]
    fn test_write_clauses() {
        let row = Variable::new();
        let person = Variable::node();
        let query = Query::new()
            .then(UnwindClause {
                expression: Expression::from(json!(["Ann", "Bo"])),
                alias: row.clone(),
            })
            .then(CreateClause::new(Pattern::new(
                NodePattern::new(person.clone()).with_label("Person"),
            )))
            .then(SetClause::new().with_item(
                PropertyAccess {
                    base: Box::new(Expression::from(&person)),
                    key: "name".to_string(),
                },
                &row,
            ))
            .then(DeleteClause {
                detach: true,
                items: vec![Expression::from(&person)],
            });

        let result = query.build().unwrap();
        assert_eq!(
            result.cypher,
            "UNWIND $param0 AS var0\nCREATE (this1:Person)\nSET this1.name = var0\nDETACH DELETE this1"
        );
        assert_eq!(result.params["param0"], json!(["Ann", "Bo"]));
    }

    #[test]
    fn test_named_alias_cannot_shadow_generated_name() {
        let n = Variable::node();
        let query = Query::new()
            .then(MatchClause::new(Pattern::new(&n)))
            .then(WithClause::new([Column::aliased(Literal::from(1i64), "this0")]))
            .then(ReturnClause::new([&n]));
        assert_eq!(
            query.build(),
            Err(CypherBuildError::NameCollision {
                name: "this0".to_string(),
                class: NameClass::Variable,
            })
        );
    }

    #[test]
    fn test_named_alias_claims_its_name() {
        let n = Variable::node();
        let total = Variable::named("total");
        let query = Query::new()
            .then(MatchClause::new(Pattern::new(&n)))
            .then(WithClause::new([
                Column::from(&n),
                Column::aliased(Expression::function("count", [&n]), &total),
            ]))
            .then(ReturnClause::new([Column::aliased(&total, "total")]));
        assert!(matches!(
            query.build(),
            Err(CypherBuildError::NameCollision { .. })
        ));

        let query = Query::new()
            .then(MatchClause::new(Pattern::new(&n)))
            .then(WithClause::new([
                Column::from(&n),
                Column::aliased(Expression::function("count", [&n]), &total),
            ]))
            .then(ReturnClause::new([Column::from(&n), Column::aliased(&total, "amount")]));
        assert_eq!(
            query.build().unwrap().cypher,
            "MATCH (this0)\nWITH this0, count(this0) AS total\nRETURN this0, total AS amount"
        );
    }

    #[test]
    fn test_identity_labels_and_boolean_logic() {
        let n = Variable::node();
        let condition = Expression::and([
            Expression::eq(n.id(), json!(42)),
            Expression::or([
                Expression::in_list(Literal::from("Admin"), n.labels()),
                Expression::not(Expression::is_null(n.property("email"))),
            ]),
        ]);
        let mut env = Environment::default();
        assert_eq!(
            condition.to_cypher(&mut env).unwrap(),
            "(id(this0) = $param0 AND ('Admin' IN labels(this0) OR NOT (this0.email IS NULL)))"
        );
    }

    #[test]
    fn test_malformed_trees_are_rejected() {
        assert!(matches!(
            Query::new().build(),
            Err(CypherBuildError::MalformedAst(_))
        ));
        assert!(matches!(
            Expression::and(Vec::<Expression>::new()).build(),
            Err(CypherBuildError::MalformedAst(_))
        ));
        assert!(matches!(
            Literal::Float(f64::NAN).build(),
            Err(CypherBuildError::MalformedAst(_))
        ));
    }

    /// Constructs outside the crate plug into the same environment
    struct Exists(Pattern);

    impl ToCypher for Exists {
        fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
            Ok(format!("EXISTS {{ {} }}", self.0.to_cypher(env)?))
        }
    }

    #[test]
    fn test_custom_node_shares_naming() {
        let person = Variable::node();
        let exists = Exists(
            Pattern::new(&person)
                .related(RelationshipPattern::anonymous().with_type("DIRECTED"))
                .to(NodePattern::anonymous()),
        );
        let nodes: Vec<Box<dyn ToCypher>> = vec![
            Box::new(Expression::from(&person)),
            Box::new(exists),
        ];

        let mut env = Environment::default();
        let rendered: Vec<String> = nodes
            .iter()
            .map(|node| node.to_cypher(&mut env).unwrap())
            .collect();
        assert_eq!(
            rendered,
            vec!["this0", "EXISTS { (this0)-[this1:DIRECTED]->(this2) }"]
        );
    }
}
