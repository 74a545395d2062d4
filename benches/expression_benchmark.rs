use criterion::{Criterion, criterion_group, criterion_main};
use docexpr::parser::tokenize;
use docexpr::{Context, ExpressionEngine, Value, Variables, evaluate, parse};
use std::hint::black_box;

const EXPRESSIONS: [&str; 5] = [
    "price * quantity",
    "If(total > 100, 'bulk', 'retail')",
    "Calc(100% - 2 * 10pt)",
    "Rgb(50%, Round(ratio * 255), 0)",
    "Concat(first, ' ', last) ?? 'anonymous'",
];

fn bindings() -> Variables {
    let mut variables = Variables::default();
    variables.insert("price".to_string(), Value::Double(9.95));
    variables.insert("quantity".to_string(), Value::Integer(12));
    variables.insert("total".to_string(), Value::Integer(140));
    variables.insert("ratio".to_string(), Value::Double(0.4));
    variables.insert("first".to_string(), Value::from("Ada"));
    variables.insert("last".to_string(), Value::from("Lovelace"));
    variables
}

fn benchmark_tokenizer(c: &mut Criterion) {
    c.bench_function("tokenize", |b| {
        b.iter(|| {
            for expression in EXPRESSIONS {
                black_box(tokenize(black_box(expression)).map(|tokens| tokens.len()).ok());
            }
        })
    });
}

fn benchmark_parser(c: &mut Criterion) {
    let context = Context::shared();
    for (i, expression) in EXPRESSIONS.into_iter().enumerate() {
        c.bench_function(&format!("parse_{i}"), |b| {
            b.iter(|| black_box(parse(black_box(expression), context)))
        });
    }
}

fn benchmark_evaluation(c: &mut Criterion) {
    let context = Context::shared();
    let variables = bindings();
    for (i, text) in EXPRESSIONS.into_iter().enumerate() {
        let expression = parse(text, context).expect("benchmark expression parses");
        c.bench_function(&format!("evaluate_{i}"), |b| {
            b.iter(|| black_box(evaluate(black_box(&expression), &variables, context)))
        });
    }
}

fn benchmark_engine_cache(c: &mut Criterion) {
    let engine = ExpressionEngine::new();
    let variables = bindings();
    c.bench_function("engine_cached_evaluate", |b| {
        b.iter(|| {
            for expression in EXPRESSIONS {
                black_box(engine.evaluate(black_box(expression), &variables).ok());
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_tokenizer,
    benchmark_parser,
    benchmark_evaluation,
    benchmark_engine_cache
);
criterion_main!(benches);
