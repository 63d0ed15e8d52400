//! Operator overloading for `Expression`.
//!
//! `+`, `-`, `*`, `/` and unary `-` build the same nodes the parser builds,
//! so programmatic trees render with the parser's canonical text.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::expression::{BinaryOp, Expression};

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        Expression::neg(self)
    }
}

impl Neg for &Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        Expression::neg(self.clone())
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait for Expression {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                Expression::binary($op, self, rhs)
            }
        }

        impl $trait for &Expression {
            type Output = Expression;

            fn $method(self, rhs: &Expression) -> Expression {
                Expression::binary($op, self.clone(), rhs.clone())
            }
        }

        impl $trait<&Expression> for Expression {
            type Output = Expression;

            fn $method(self, rhs: &Expression) -> Expression {
                Expression::binary($op, self, rhs.clone())
            }
        }

        impl $trait<Expression> for &Expression {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                Expression::binary($op, self.clone(), rhs)
            }
        }

        // Scalar operands
        impl $trait<f64> for Expression {
            type Output = Expression;

            fn $method(self, rhs: f64) -> Expression {
                Expression::binary($op, self, Expression::constant(rhs))
            }
        }

        impl $trait<f64> for &Expression {
            type Output = Expression;

            fn $method(self, rhs: f64) -> Expression {
                Expression::binary($op, self.clone(), Expression::constant(rhs))
            }
        }

        impl $trait<Expression> for f64 {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                Expression::binary($op, Expression::constant(self), rhs)
            }
        }

        impl $trait<&Expression> for f64 {
            type Output = Expression;

            fn $method(self, rhs: &Expression) -> Expression {
                Expression::binary($op, Expression::constant(self), rhs.clone())
            }
        }
    };
}

binary_operator!(Add, add, BinaryOp::Add);
binary_operator!(Sub, sub, BinaryOp::Sub);
binary_operator!(Mul, mul, BinaryOp::Mul);
binary_operator!(Div, div, BinaryOp::Div);
