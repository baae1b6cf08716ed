#[cfg(test)]
mod parser_tests {
    use rox::ast::{Expr, Stmt};
    use rox::ast_printer::AstPrinter;
    use rox::error::LoxError;
    use rox::parser::Parser;
    use rox::scanner::scan_tokens;

    fn print_expression(source: &str) -> String {
        let (tokens, errors) = scan_tokens(source);
        assert!(errors.is_empty());

        let expr = Parser::new(&tokens)
            .parse_expression()
            .unwrap_or_else(|e| panic!("parse failed: {:?}", e));
        AstPrinter::print(&expr)
    }

    fn parse_program(source: &str) -> Result<Vec<Stmt>, Vec<LoxError>> {
        let (tokens, errors) = scan_tokens(source);
        assert!(errors.is_empty());

        Parser::new(&tokens).parse()
    }

    fn parse_errors(source: &str) -> Vec<String> {
        parse_program(source)
            .expect_err("expected syntax errors")
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_parser_01_precedence() {
        assert_eq!(print_expression("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
        assert_eq!(print_expression("-123 * (45.67)"), "(* (- 123.0) (group 45.67))");
        assert_eq!(print_expression("1 < 2 == !false"), "(== (< 1.0 2.0) (! false))");
    }

    #[test]
    fn test_parser_02_left_associativity() {
        assert_eq!(print_expression("8 - 4 - 2"), "(- (- 8.0 4.0) 2.0)");
        assert_eq!(print_expression("8 / 4 / 2"), "(/ (/ 8.0 4.0) 2.0)");
    }

    #[test]
    fn test_parser_03_logical_and_assignment() {
        assert_eq!(print_expression("a or b and c"), "(or a (and b c))");
        assert_eq!(print_expression("a = b = nil"), "(= a (= b nil))");
    }

    #[test]
    fn test_parser_04_calls_and_properties() {
        assert_eq!(print_expression("f(1)(2, \"x\")"), "(call (call f 1.0) 2.0 x)");
        assert_eq!(print_expression("a.b.c = 3"), "(= (. (. a b) c) 3.0)");
        assert_eq!(print_expression("super.go(this)"), "(call (super go) this)");
    }

    #[test]
    fn test_parser_05_for_is_lowered_to_while() {
        let program = parse_program("for (var i = 0; i < 3; i = i + 1) print i;").unwrap();

        assert_eq!(program.len(), 1);
        let Stmt::Block(outer) = &program[0] else {
            panic!("expected a block, got {:?}", program[0]);
        };

        assert!(matches!(outer[0], Stmt::Var { .. }));
        let Stmt::While { body, .. } = &outer[1] else {
            panic!("expected a while loop, got {:?}", outer[1]);
        };

        let Stmt::Block(inner) = &**body else {
            panic!("expected the body block, got {:?}", body);
        };
        assert!(matches!(inner[0], Stmt::Print(_)));
        assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
    }

    #[test]
    fn test_parser_06_empty_for_clauses() {
        let program = parse_program("for (;;) print 1;").unwrap();

        assert!(matches!(&program[0], Stmt::While { body, .. } if matches!(**body, Stmt::Print(_))));
    }

    #[test]
    fn test_parser_07_class_declaration() {
        let program = parse_program("class B < A { init(x) { this.x = x; } go() {} }").unwrap();

        let Stmt::Class {
            name,
            superclass,
            methods,
        } = &program[0]
        else {
            panic!("expected a class, got {:?}", program[0]);
        };

        assert_eq!(name.lexeme, "B");
        assert!(matches!(superclass, Some(Expr::Variable { name, .. }) if name.lexeme == "A"));
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].params.len(), 1);
    }

    #[test]
    fn test_parser_08_errors_are_collected_after_synchronizing() {
        let errors = parse_errors("var = 1;\nprint 2;\nprint (3;\nvar ok = 4;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Expect variable name.",
                "[line 3] Error at ';': Expect ')' after expression.",
            ]
        );
    }

    #[test]
    fn test_parser_09_error_at_end() {
        let errors = parse_errors("print 1");

        assert_eq!(errors, vec!["[line 1] Error at end: Expect ';' after value."]);
    }

    #[test]
    fn test_parser_10_invalid_assignment_target_is_not_fatal() {
        let errors = parse_errors("1 + 2 = 3; print;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Invalid assignment target.",
                "[line 1] Error at ';': Expect expression.",
            ]
        );
    }

    #[test]
    fn test_parser_11_argument_limit() {
        let arguments: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", arguments.join(", "));

        let errors = parse_errors(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Can't have more than 255 arguments."));
    }

    #[test]
    fn test_parser_12_parameter_limit() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let errors = parse_errors(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Can't have more than 255 parameters."));
    }

    #[test]
    fn test_parser_13_expression_ids_are_unique_across_parsers() {
        let (first, _) = scan_tokens("a; b;");
        let mut parser = Parser::starting_at(&first, 10);
        parser.parse().unwrap();
        assert_eq!(parser.next_free_id(), 12);

        let (second, _) = scan_tokens("c;");
        let program = Parser::starting_at(&second, parser.next_free_id())
            .parse()
            .unwrap();

        assert!(matches!(
            &program[0],
            Stmt::Expression(Expr::Variable { id, .. }) if id.0 == 12
        ));
    }

    #[test]
    fn test_parser_14_trailing_tokens_after_expression() {
        let (tokens, _) = scan_tokens("1 2");
        let errors = Parser::new(&tokens).parse_expression().unwrap_err();

        assert_eq!(errors[0].to_string(), "[line 1] Error at '2': Expect end of expression.");
    }
}
