mod common;

#[cfg(test)]
mod interpreter_tests {
    use super::common::{output, run, runtime_error, session};

    use rox::error::RunError;
    use rox::interpreter::Interpreter;
    use rox::parser::Parser;
    use rox::scanner::scan_tokens;
    use rox::value::Value;

    fn evaluate(source: &str) -> Value {
        let (tokens, _) = scan_tokens(source);
        let expr = Parser::new(&tokens).parse_expression().unwrap();
        Interpreter::with_output(Box::new(std::io::sink()))
            .evaluate(&expr)
            .unwrap()
    }

    #[test]
    fn test_interpreter_01_arithmetic_and_stringification() {
        assert_eq!(
            output("print 8 / 4; print 1 + 2 * 3; print 7 / 2; print -(3 - 5);"),
            vec!["2", "7", "3.5", "2"]
        );
    }

    #[test]
    fn test_interpreter_02_division_follows_ieee() {
        assert_eq!(
            output("print 1 / 0; print -1 / 0; print 0 / 0 == 0 / 0;"),
            vec!["Infinity", "-Infinity", "false"]
        );
    }

    #[test]
    fn test_interpreter_03_string_concatenation() {
        assert_eq!(output("var a = \"foo\"; print a + \"bar\";"), vec!["foobar"]);
    }

    #[test]
    fn test_interpreter_04_truthiness_and_equality() {
        assert_eq!(
            output(
                "print nil == false; print nil == nil; print 1 == 1; print \"a\" != \"a\";\n\
                 if (0) print \"zero\"; if (\"\") print \"empty\"; if (nil) print \"nil\";\n\
                 print !nil; print !0;"
            ),
            vec!["false", "true", "true", "false", "zero", "empty", "true", "false"]
        );
    }

    #[test]
    fn test_interpreter_05_logical_operators_return_deciding_operand() {
        assert_eq!(
            output("print nil or \"yes\"; print 0 or 1; print nil and boom; print 1 and 2;"),
            vec!["yes", "0", "nil", "2"]
        );
    }

    #[test]
    fn test_interpreter_06_shadowing_does_not_leak() {
        assert_eq!(
            output("var a = 1; { var a = 2; print a; } print a;"),
            vec!["2", "1"]
        );
    }

    #[test]
    fn test_interpreter_07_assignment_reaches_enclosing_scope() {
        assert_eq!(
            output("var a = 1; { a = 2; { a = a + 1; } } print a;"),
            vec!["3"]
        );
    }

    #[test]
    fn test_interpreter_08_for_loop_desugaring() {
        assert_eq!(
            output("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["0", "1", "2"]
        );

        assert_eq!(
            runtime_error("for (var i = 0; i < 1; i = i + 1) {} print i;"),
            "Undefined variable 'i'.\n[line 1]"
        );
    }

    #[test]
    fn test_interpreter_09_while_and_if_else() {
        assert_eq!(
            output(
                "var n = 0; while (n < 5) { if (n == 2) print \"two\"; else print n; n = n + 1; }"
            ),
            vec!["0", "1", "two", "3", "4"]
        );
    }

    #[test]
    fn test_interpreter_10_closures_capture_by_reference() {
        let source = r#"
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    return i;
                }
                return count;
            }

            var counter = makeCounter();
            print counter();
            print counter();
            var other = makeCounter();
            print other();
        "#;

        assert_eq!(output(source), vec!["1", "2", "1"]);
    }

    #[test]
    fn test_interpreter_11_closure_binds_statically() {
        let source = r#"
            var a = "global";
            {
                fun show() { print a; }
                show();
                var a = "block";
                show();
            }
        "#;

        assert_eq!(output(source), vec!["global", "global"]);
    }

    #[test]
    fn test_interpreter_12_recursion_and_early_return() {
        let source = r#"
            fun fib(n) {
                if (n < 2) return n;
                return fib(n - 1) + fib(n - 2);
            }
            print fib(15);

            fun first(limit) {
                for (var i = 0; i < limit; i = i + 1) {
                    while (true) {
                        if (i == 3) return i;
                        break_out();
                    }
                }
            }
            fun break_out() {}
        "#;

        // `first` is never called, the infinite inner loop is never entered.
        assert_eq!(output(source), vec!["610"]);
    }

    #[test]
    fn test_interpreter_13_return_unwinds_nested_blocks() {
        let source = r#"
            fun find() {
                var i = 0;
                while (true) {
                    { if (i == 3) return i; }
                    i = i + 1;
                }
            }
            print find();
            var after = "scope restored";
            print after;
        "#;

        assert_eq!(output(source), vec!["3", "scope restored"]);
    }

    #[test]
    fn test_interpreter_14_function_without_return_yields_nil() {
        assert_eq!(output("fun f() {} print f();"), vec!["nil"]);
    }

    #[test]
    fn test_interpreter_15_callable_display() {
        assert_eq!(
            output("fun f() {} print f; print clock; class C {} print C; print C();"),
            vec!["<fn f>", "<native fn>", "C", "C instance"]
        );
    }

    #[test]
    fn test_interpreter_16_clock_is_seconds_since_epoch() {
        assert_eq!(output("print clock() > 1000000000;"), vec!["true"]);
    }

    #[test]
    fn test_interpreter_17_type_errors() {
        assert_eq!(runtime_error("print -\"a\";"), "Operand must be a number.\n[line 1]");
        assert_eq!(runtime_error("print 1 < \"2\";"), "Operands must be numbers.\n[line 1]");
        assert_eq!(
            runtime_error("print 1 + \"2\";"),
            "Operands must be two numbers or two strings.\n[line 1]"
        );
    }

    #[test]
    fn test_interpreter_18_undefined_variable() {
        assert_eq!(
            runtime_error("\nprint missing;"),
            "Undefined variable 'missing'.\n[line 2]"
        );
        assert_eq!(
            runtime_error("missing = 1;"),
            "Undefined variable 'missing'.\n[line 1]"
        );
    }

    #[test]
    fn test_interpreter_19_arity_is_checked_before_the_body_runs() {
        let (lines, result) = run("fun f(a, b) { print \"ran\"; } f(1);");

        assert!(lines.is_empty());
        match result {
            Err(RunError::Runtime(e)) => {
                assert_eq!(e.to_string(), "Expected 2 arguments but got 1.\n[line 1]")
            }
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_interpreter_20_calling_non_callables() {
        assert_eq!(
            runtime_error("\"str\"();"),
            "Can only call functions and classes.\n[line 1]"
        );
    }

    #[test]
    fn test_interpreter_21_runaway_recursion_is_a_runtime_error() {
        let (mut lox, buffer) = session();

        match lox.run("fun f() { f(); } f();") {
            Err(RunError::Runtime(e)) => assert_eq!(e.to_string(), "Stack overflow.\n[line 1]"),
            other => panic!("expected a runtime error, got {:?}", other),
        }

        lox.run("print \"still running\";").unwrap();
        assert_eq!(buffer.lines(), vec!["still running"]);
    }

    #[test]
    fn test_interpreter_21a_deep_recursion_on_the_default_stack() {
        let source = r#"
            fun depth(n) {
                if (n > 0) return depth(n - 1) + 1;
                return 0;
            }
            print depth(1500);
            print "done";
        "#;

        assert_eq!(output(source), vec!["1500", "done"]);
    }

    #[test]
    fn test_interpreter_21b_deeply_nested_syntax() {
        let grouped = format!("print {}1{};", "(".repeat(3000), ")".repeat(3000));
        assert_eq!(output(&grouped), vec!["1"]);

        let negated = format!("print {}1;", "-".repeat(3000));
        assert_eq!(output(&negated), vec!["1"]);

        let blocks = format!("var a = 2; {}print a;{}", "{".repeat(2000), "}".repeat(2000));
        assert_eq!(output(&blocks), vec!["2"]);
    }

    #[test]
    fn test_interpreter_21c_large_and_small_numbers_use_exponent_form() {
        assert_eq!(
            output("print 100000000000000000000000.0; print 12345678; print 1234567; print 0.0001;"),
            vec!["1.0E23", "1.2345678E7", "1234567", "1.0E-4"]
        );
    }

    #[test]
    fn test_interpreter_22_runtime_error_stops_remaining_statements() {
        let (lines, result) = run("print 1; print nil + 1; print 2;");

        assert_eq!(lines, vec!["1"]);
        assert!(matches!(result, Err(RunError::Runtime(_))));
    }

    #[test]
    fn test_interpreter_23_session_keeps_globals_across_runs() {
        let (mut lox, buffer) = session();

        lox.run("var a = 1; fun inc() { a = a + 1; return a; }").unwrap();
        lox.run("print inc();").unwrap();

        // A failed run leaves the session usable.
        assert!(lox.run("print undefined;").is_err());
        assert!(lox.run("print (;").is_err());

        lox.run("{ var b = inc(); print b; }").unwrap();

        assert_eq!(buffer.lines(), vec!["2", "3"]);
    }

    #[test]
    fn test_interpreter_24_session_recovers_from_error_inside_call() {
        let (mut lox, buffer) = session();

        assert!(lox.run("var x = \"outer\"; fun f() { var x = 1; return x + nil; } f();").is_err());
        lox.run("print x;").unwrap();

        assert_eq!(buffer.lines(), vec!["outer"]);
    }

    #[test]
    fn test_interpreter_25_runs_are_deterministic() {
        let source = "var s = \"\"; for (var i = 0; i < 4; i = i + 1) s = s + \"x\"; print s;";

        assert_eq!(output(source), output(source));
    }

    #[test]
    fn test_interpreter_26_single_expression_evaluation() {
        assert_eq!(evaluate("(1 + 2) * 4"), Value::Number(12.0));
        assert_eq!(evaluate("\"a\" + \"b\""), Value::String("ab".into()));
        assert_eq!(evaluate("!(1 == 2)"), Value::Bool(true));
    }
}
