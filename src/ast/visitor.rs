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

//! Visitor pattern for AST traversal

use super::expression::Expression;
use super::operator::{BinaryOperator, UnaryOperator};
use crate::model::Value;

/// Trait for visiting AST nodes
pub trait Visitor: Sized {
    /// The result type of visiting a node
    type Result;

    /// Visit an expression node
    fn visit_expression(&mut self, expr: &Expression) -> Self::Result {
        walk_expression(self, expr)
    }

    /// Visit a literal
    fn visit_literal(&mut self, value: &Value) -> Self::Result;

    /// Visit a variable reference
    fn visit_variable(&mut self, name: &str) -> Self::Result;

    /// Visit a unary operation
    fn visit_unary_op(&mut self, op: UnaryOperator, operand: &Expression) -> Self::Result;

    /// Visit a binary operation
    fn visit_binary_op(
        &mut self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> Self::Result;

    /// Visit a function call
    fn visit_function_call(&mut self, name: &str, args: &[Expression]) -> Self::Result;
}

/// Default implementation of walking an expression tree
pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) -> V::Result {
    match expr {
        Expression::Literal(value) => visitor.visit_literal(value),
        Expression::Variable(name) => visitor.visit_variable(name),
        Expression::Unary { op, operand } => visitor.visit_unary_op(*op, operand),
        Expression::Binary(data) => visitor.visit_binary_op(data.op, &data.left, &data.right),
        Expression::Call(data) => visitor.visit_function_call(&data.name, &data.args),
    }
}

/// Collects names in first-use order, without duplicates
#[derive(Default)]
struct NameCollector {
    variables: Vec<String>,
    functions: Vec<String>,
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
    }
}

impl Visitor for NameCollector {
    type Result = ();

    fn visit_literal(&mut self, _value: &Value) {}

    fn visit_variable(&mut self, name: &str) {
        push_unique(&mut self.variables, name);
    }

    fn visit_unary_op(&mut self, _op: UnaryOperator, operand: &Expression) {
        self.visit_expression(operand);
    }

    fn visit_binary_op(&mut self, _op: BinaryOperator, left: &Expression, right: &Expression) {
        self.visit_expression(left);
        self.visit_expression(right);
    }

    fn visit_function_call(&mut self, name: &str, args: &[Expression]) {
        push_unique(&mut self.functions, name);
        for arg in args {
            self.visit_expression(arg);
        }
    }
}

/// Variable names the expression reads, in first-use order
pub fn referenced_variables(expr: &Expression) -> Vec<String> {
    let mut collector = NameCollector::default();
    collector.visit_expression(expr);
    collector.variables
}

/// Function names the expression calls, in first-use order
pub fn called_functions(expr: &Expression) -> Vec<String> {
    let mut collector = NameCollector::default();
    collector.visit_expression(expr);
    collector.functions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referenced_variables_dedup_in_order() {
        let expr = Expression::binary(
            BinaryOperator::Add,
            Expression::variable("b"),
            Expression::binary(
                BinaryOperator::Multiply,
                Expression::variable("a"),
                Expression::variable("b"),
            ),
        );
        assert_eq!(referenced_variables(&expr), vec!["b", "a"]);
        assert!(called_functions(&expr).is_empty());
    }
}
