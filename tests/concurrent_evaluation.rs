// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for evaluating shared expressions from several threads

use docexpr::{
    CacheConfig, Context, EngineConfig, Expression, ExpressionEngine, Value, Variables, evaluate,
    parse,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const ITERATIONS: i64 = 200;

fn bindings(row: i64) -> Variables {
    let mut variables = Variables::default();
    variables.insert("row".to_string(), Value::Integer(row));
    variables.insert("label".to_string(), Value::from(format!("Row {row}")));
    variables
}

#[test]
fn test_shared_expression_across_threads() {
    let context = Context::shared();
    let expression: Arc<Expression> = Arc::new(
        parse("If(row % 2 == 0, label + ' (even)', row * 10)", context).unwrap(),
    );

    let handles: Vec<_> = (0..THREADS as i64)
        .map(|thread_id| {
            let expression = Arc::clone(&expression);
            thread::spawn(move || {
                for i in 0..ITERATIONS {
                    let row = thread_id * ITERATIONS + i;
                    let result = evaluate(&expression, &bindings(row), Context::shared()).unwrap();
                    let expected = if row % 2 == 0 {
                        Value::from(format!("Row {row} (even)"))
                    } else {
                        Value::Integer(row * 10)
                    };
                    assert_eq!(result, expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = Arc::new(ExpressionEngine::with_config(EngineConfig {
        cache: CacheConfig::high_performance(),
        ..EngineConfig::default()
    }));
    let text = "Calc(row * 1pt + 2pt)";

    let compiled: Vec<Arc<Expression>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS as i64)
            .map(|row| {
                let engine = Arc::clone(&engine);
                scope.spawn(move || {
                    let value = engine.evaluate(text, &bindings(row)).unwrap();
                    assert_eq!(value, Value::Unit(docexpr::Unit::points(row as f64 + 2.0)));
                    engine.compile(text).unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker thread panicked"))
            .collect()
    });

    assert_eq!(engine.cache_len(), 1);
    for expression in &compiled {
        assert!(Arc::ptr_eq(expression, &compiled[0]));
    }
}
