// ABOUTME: End-to-end tests driving the full pipeline through the public API

use minischeme::env::Environment;
use minischeme::error::SchemeError;
use minischeme::eval::eval_source;
use minischeme::initial_environment;
use std::rc::Rc;

/// Fresh environment with built-ins and the prelude loaded
fn setup() -> Rc<Environment> {
    initial_environment().expect("prelude must load")
}

/// Evaluate a program and return the printed form of its last value
fn eval_to_string(source: &str, env: &Rc<Environment>) -> String {
    eval_source(source, env)
        .unwrap_or_else(|e| panic!("evaluation of {:?} failed: {}", source, e))
        .to_string()
}

// ============================================================================
// End-to-End Scenarios
// ============================================================================

#[test]
fn test_arithmetic_pipeline() {
    let env = setup();
    assert_eq!(eval_to_string("(+ 1 2 3)", &env), "6");
    assert_eq!(eval_to_string("(+ 1 2.0)", &env), "3.0");
    assert_eq!(eval_to_string("(* (+ 1 2) 3)", &env), "9");
    assert_eq!(eval_to_string("(/ 20 4)", &env), "5.0");
}

#[test]
fn test_pair_construction() {
    let env = setup();
    assert_eq!(eval_to_string("(car (cons 1 (cons 2 '())))", &env), "1");
    assert_eq!(eval_to_string("(cdr (cons 1 (cons 2 '())))", &env), "(2)");
    assert_eq!(eval_to_string("(cons 1 2)", &env), "(1 . 2)");
}

#[test]
fn test_factorial() {
    let env = setup();
    let result = eval_to_string(
        "(define (fact n) (if (< n 2) 1 (* n (fact (- n 1))))) (fact 5)",
        &env,
    );
    assert_eq!(result, "120");
}

#[test]
fn test_quasiquote_scenario() {
    let env = setup();
    assert_eq!(
        eval_to_string("`(1 ,(+ 1 1) ,@(list 3 4) 5)", &env),
        "(1 2 3 4 5)"
    );
}

#[test]
fn test_variadic_function_scenario() {
    let env = setup();
    assert_eq!(eval_to_string("(define (f . xs) xs) (f 1 2 3)", &env), "(1 2 3)");
}

#[test]
fn test_lambda_scenario() {
    let env = setup();
    assert_eq!(eval_to_string("((lambda (x y) (+ x y)) 3 4)", &env), "7");
}

// ============================================================================
// Universal Properties
// ============================================================================

#[test]
fn test_self_evaluating_atoms() {
    let env = setup();
    for source in ["42", "2.5", "#t", "#f", "#\\a", "\"hi\""] {
        let direct = eval_to_string(source, &env);
        let again = eval_to_string(&direct, &env);
        assert_eq!(direct, again);
    }
}

#[test]
fn test_quote_identity() {
    let env = setup();
    // (quote x) gives the same tree the parser produced for x
    assert_eq!(eval_to_string("'(a (b 1 2.0) \"s\" #\\c)", &env), "(a (b 1 2.0) \"s\" #\\c)");
    assert_eq!(eval_to_string("''x", &env), "(quote x)");
}

#[test]
fn test_arithmetic_identities() {
    let env = setup();
    assert_eq!(eval_to_string("(+)", &env), "0");
    assert_eq!(eval_to_string("(*)", &env), "1");
    assert_eq!(eval_to_string("(+ 7)", &env), "7");
    assert_eq!(eval_to_string("(* 7)", &env), "7");
    assert_eq!(eval_to_string("(- 7)", &env), "-7");
    assert_eq!(eval_to_string("(+ 2.5)", &env), "2.5");
    assert_eq!(eval_to_string("(- 2.5)", &env), "-2.5");
}

#[test]
fn test_comparison_chaining_matches_pairwise() {
    let env = setup();
    let triples = [(1, 2, 3), (1, 3, 2), (2, 2, 3), (3, 2, 1)];
    for (a, b, c) in triples {
        let chained = eval_to_string(&format!("(< {a} {b} {c})"), &env);
        let pairwise = eval_to_string(
            &format!("(if (< {a} {b}) (< {b} {c}) #f)"),
            &env,
        );
        assert_eq!(chained, pairwise, "mismatch for ({a} {b} {c})");
    }
}

#[test]
fn test_if_truthiness_for_every_kind_of_value() {
    let env = setup();
    for truthy in ["0", "0.0", "\"\"", "'()", "'sym", "(lambda (x) x)", "1"] {
        assert_eq!(
            eval_to_string(&format!("(if {truthy} 'then 'else)"), &env),
            "then",
            "{truthy} should be truthy"
        );
    }
    assert_eq!(eval_to_string("(if #f 'then 'else)", &env), "else");
}

#[test]
fn test_string_roundtrip_property() {
    let env = setup();
    let result = eval_to_string(
        "(define s (make-string 4 #\\y)) (string-ref s 3)",
        &env,
    );
    assert_eq!(result, "#\\y");
    assert_eq!(eval_to_string("(string-length s)", &env), "4");
}

#[test]
fn test_string_mutation_property() {
    let env = setup();
    eval_source("(define s (make-string 3 #\\a))", &env).unwrap();
    eval_source("(string-set! s 1 #\\b)", &env).unwrap();
    assert_eq!(eval_to_string("s", &env), "\"aba\"");
    assert_eq!(eval_to_string("(string-ref s 0)", &env), "#\\a");
    assert_eq!(eval_to_string("(string-ref s 1)", &env), "#\\b");
}

#[test]
fn test_strings_are_reference_semantic() {
    let env = setup();
    eval_source("(define s (make-string 2 #\\a)) (define alias s)", &env).unwrap();
    eval_source("(string-set! s 0 #\\z)", &env).unwrap();
    assert_eq!(eval_to_string("alias", &env), "\"za\"");
}

// ============================================================================
// Characters and Predicates
// ============================================================================

#[test]
fn test_character_literals_and_comparisons() {
    let env = setup();
    assert_eq!(eval_to_string("#\\space", &env), "#\\space");
    assert_eq!(eval_to_string("#\\newline", &env), "#\\newline");
    assert_eq!(eval_to_string("(char<? #\\a #\\b)", &env), "#t");
    assert_eq!(eval_to_string("(char=? #\\space #\\space)", &env), "#t");
    assert_eq!(eval_to_string("(char>=? #\\a #\\b)", &env), "#f");
}

#[test]
fn test_numeric_predicates() {
    let env = setup();
    assert_eq!(eval_to_string("(number? 1)", &env), "#t");
    assert_eq!(eval_to_string("(integer? 1.5)", &env), "#t"); // tower aliases
    assert_eq!(eval_to_string("(real? 'x)", &env), "#f");
    assert_eq!(eval_to_string("(exact? 1)", &env), "#t");
    assert_eq!(eval_to_string("(exact? 1.0)", &env), "#f");
    assert_eq!(eval_to_string("(inexact? 1.0)", &env), "#t");
}

#[test]
fn test_equivalence_predicates() {
    let env = setup();
    assert_eq!(eval_to_string("(eqv? 'a 'a)", &env), "#t");
    assert_eq!(eval_to_string("(eqv? 1 1.0)", &env), "#t");
    assert_eq!(eval_to_string("(eq? \"s\" \"s\")", &env), "#t");
    assert_eq!(eval_to_string("(eqv? (cons 1 2) (cons 1 2))", &env), "#f");
    assert_eq!(
        eval_to_string("(define p (cons 1 2)) (eqv? p p)", &env),
        "#t"
    );
}

// ============================================================================
// Scoping and State
// ============================================================================

#[test]
fn test_closures_keep_private_state() {
    let env = setup();
    eval_source(
        "(define (make-counter)
           (define count 0)
           (lambda () (set! count (+ count 1)) count))
         (define c1 (make-counter))
         (define c2 (make-counter))",
        &env,
    )
    .unwrap();

    assert_eq!(eval_to_string("(c1)", &env), "1");
    assert_eq!(eval_to_string("(c1)", &env), "2");
    // the second counter is independent
    assert_eq!(eval_to_string("(c2)", &env), "1");
}

#[test]
fn test_set_walks_to_global_frame() {
    let env = setup();
    eval_source(
        "(define total 0)
         (define (add n) (set! total (+ total n)))
         (add 3) (add 4)",
        &env,
    )
    .unwrap();
    assert_eq!(eval_to_string("total", &env), "7");
}

#[test]
fn test_parameters_shadow_globals() {
    let env = setup();
    eval_source("(define x 'global) (define (f x) x)", &env).unwrap();
    assert_eq!(eval_to_string("(f 'local)", &env), "local");
    assert_eq!(eval_to_string("x", &env), "global");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_error_taxonomy_is_reachable() {
    let env = setup();

    assert!(matches!(
        eval_source("@", &env),
        Err(SchemeError::Lexical { .. })
    ));
    assert!(matches!(
        eval_source("(1 2", &env),
        Err(SchemeError::Syntax { .. })
    ));
    assert!(matches!(
        eval_source("(car 5)", &env),
        Err(SchemeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        eval_source("(cons 1)", &env),
        Err(SchemeError::Arity { .. })
    ));
    assert!(matches!(
        eval_source("(make-string (- 3))", &env),
        Err(SchemeError::InvalidArgument { .. })
    ));
    assert!(matches!(
        eval_source("nowhere", &env),
        Err(SchemeError::UndefinedVariable(_))
    ));
    assert!(matches!(
        eval_source("(define twice 1) (define twice 2)", &env),
        Err(SchemeError::RedefinedVariable(_))
    ));
    assert!(matches!(
        eval_source("(42 1)", &env),
        Err(SchemeError::NotCallable(_))
    ));
}

#[test]
fn test_error_messages_name_the_operation() {
    let env = setup();

    let type_err = eval_source("(car 5)", &env).unwrap_err().to_string();
    assert!(type_err.contains("car"), "{}", type_err);
    assert!(type_err.contains("a pair"), "{}", type_err);
    assert!(type_err.contains("integer"), "{}", type_err);

    let arity_err = eval_source("(string-ref \"abc\")", &env).unwrap_err().to_string();
    assert!(arity_err.contains("string-ref"), "{}", arity_err);

    let bounds_err = eval_source("(string-ref \"abc\" 7)", &env).unwrap_err().to_string();
    assert!(bounds_err.contains("out of bounds"), "{}", bounds_err);
}

#[test]
fn test_environment_survives_a_failed_expression() {
    let env = setup();
    eval_source("(define x 1)", &env).unwrap();
    assert!(eval_source("(car x)", &env).is_err());
    // the earlier binding is still there
    assert_eq!(eval_to_string("x", &env), "1");
}

#[test]
fn test_deep_recursion_within_reason() {
    let env = setup();
    eval_source(
        "(define (count-down n) (if (= n 0) 'done (count-down (- n 1))))",
        &env,
    )
    .unwrap();
    assert_eq!(eval_to_string("(count-down 1000)", &env), "done");
}

#[test]
fn test_multi_form_program_threads_environment() {
    let env = setup();
    let result = eval_to_string(
        "(define a 1)
         (define b (+ a 1))
         (define (both) (list a b))
         (both)",
        &env,
    );
    assert_eq!(result, "(1 2)");
}

#[test]
fn test_no_prelude_environment_is_bare() {
    let env = minischeme::bare_environment();
    assert!(matches!(
        eval_source("(map (lambda (x) x) '(1 2))", &env),
        Err(SchemeError::UndefinedVariable(_))
    ));
    // built-ins are still present
    assert_eq!(eval_to_string("(+ 1 2)", &env), "3");
}
