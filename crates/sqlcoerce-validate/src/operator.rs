//! Operator and function operand coercion
//!
//! This module reconciles the operands of builtin operators:
//! - Arithmetic (`+ - * /` and `MOD`), with character operands read as numbers
//! - Comparison and BETWEEN, over a comparison common type
//! - Concatenation of character or binary strings
//! - Function operands constrained by a type family per position

use crate::{CastTarget, CoercionError, ImplicitCast, Result, StatementCoercer};
use serde::{Deserialize, Serialize};
use sqlcoerce_types::{TypeDescriptor, TypeFactory, TypeFamily};

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Plus,
    Minus,
    Multiply,
    Divide,
    Mod,
}

impl ArithmeticOp {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Mod => "MOD",
        }
    }
}

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    IsDistinctFrom,
    IsNotDistinctFrom,
}

impl ComparisonOp {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::IsDistinctFrom => "IS DISTINCT FROM",
            Self::IsNotDistinctFrom => "IS NOT DISTINCT FROM",
        }
    }

    /// Whether the comparison treats NULL as a value and never yields NULL
    pub const fn is_null_safe(&self) -> bool {
        matches!(self, Self::IsDistinctFrom | Self::IsNotDistinctFrom)
    }
}

/// Operand types of a function call after coercion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandCoercion {
    pub operand_types: Vec<TypeDescriptor>,
    pub casts: Vec<ImplicitCast>,
}

/// Operand types and result type of an operator after coercion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorCoercion {
    pub operand_types: Vec<TypeDescriptor>,
    pub result_type: TypeDescriptor,
    pub casts: Vec<ImplicitCast>,
}

impl OperatorCoercion {
    fn new(operands: &[TypeDescriptor], operand_types: Vec<TypeDescriptor>, result_type: TypeDescriptor) -> Self {
        let casts = record_casts(operands, &operand_types);
        Self {
            operand_types,
            result_type,
            casts,
        }
    }
}

/// Outcome of a rule that decides a comparison on its own
enum Comparison {
    Common(TypeDescriptor),
    Incomparable,
}

impl<F: TypeFactory> StatementCoercer<F> {
    /// Coerce the operands of a binary arithmetic operator
    pub fn arithmetic(
        &self,
        op: ArithmeticOp,
        left: &TypeDescriptor,
        right: &TypeDescriptor,
    ) -> Result<OperatorCoercion> {
        let operands = [left.clone(), right.clone()];
        if op == ArithmeticOp::Mod {
            return self.modulus(&operands);
        }
        let incompatible = || incompatible_operands(op.symbol(), infix_signature(op.symbol(), &operands));

        if [left, right].iter().any(|t| t.is_datetime() || t.is_interval()) {
            let result_type = self.temporal_result(op, left, right).ok_or_else(incompatible)?;
            return Ok(OperatorCoercion::new(&operands, operands.to_vec(), result_type));
        }

        let max = self.factory().max_precision_scale_decimal();
        let l = arithmetic_operand(left, right, &max).ok_or_else(incompatible)?;
        let r = arithmetic_operand(right, left, &max).ok_or_else(incompatible)?;
        let result_type = self.numeric_result(op, &l, &r).ok_or_else(incompatible)?;
        Ok(OperatorCoercion::new(&operands, vec![l, r], result_type))
    }

    /// `MOD` casts each operand into EXACT_NUMERIC
    fn modulus(&self, operands: &[TypeDescriptor; 2]) -> Result<OperatorCoercion> {
        let operand_types = operands
            .iter()
            .enumerate()
            .map(|(index, ty)| self.cast_into(index, ty, TypeFamily::ExactNumeric))
            .collect::<Result<Vec<_>>>()?;
        let result_type = self
            .factory()
            .derive_modulus_type(&operand_types[0], &operand_types[1])
            .ok_or_else(|| incompatible_operands("MOD", call_signature("MOD", operands)))?;
        Ok(OperatorCoercion::new(operands, operand_types, result_type))
    }

    /// Result of arithmetic over numeric operands
    fn numeric_result(
        &self,
        op: ArithmeticOp,
        left: &TypeDescriptor,
        right: &TypeDescriptor,
    ) -> Option<TypeDescriptor> {
        let factory = self.factory();
        if (left.is_exact_integer() && right.is_exact_integer())
            || left.is_approximate()
            || right.is_approximate()
        {
            return factory.least_restrictive(&[left.clone(), right.clone()]);
        }
        match op {
            ArithmeticOp::Plus | ArithmeticOp::Minus => factory.derive_sum_type(left, right),
            ArithmeticOp::Multiply => factory.derive_product_type(left, right),
            ArithmeticOp::Divide => factory.derive_quotient_type(left, right),
            ArithmeticOp::Mod => factory.derive_modulus_type(left, right),
        }
    }

    /// Result of arithmetic involving datetimes or intervals; operands are
    /// never cast
    fn temporal_result(
        &self,
        op: ArithmeticOp,
        left: &TypeDescriptor,
        right: &TypeDescriptor,
    ) -> Option<TypeDescriptor> {
        use ArithmeticOp::{Divide, Minus, Multiply, Plus};

        let result = match op {
            Plus | Minus if left.is_datetime() && right.is_interval() => left.clone(),
            Plus if left.is_interval() && right.is_datetime() => right.clone(),
            // mixed interval classes have no least restrictive type
            Plus | Minus if left.is_interval() && right.is_interval() => {
                self.factory().least_restrictive(&[left.clone(), right.clone()])?
            }
            Multiply | Divide if left.is_interval() && right.is_numeric() => left.clone(),
            Multiply if left.is_numeric() && right.is_interval() => right.clone(),
            _ => return None,
        };
        Some(result.with_nullable(left.nullable || right.nullable))
    }

    /// Coerce the operands of a binary comparison
    ///
    /// The result is BOOLEAN, nullable when either operand is, except for
    /// `IS [NOT] DISTINCT FROM`, which is always NOT NULL.
    pub fn comparison(
        &self,
        op: ComparisonOp,
        left: &TypeDescriptor,
        right: &TypeDescriptor,
    ) -> Result<OperatorCoercion> {
        let operands = [left.clone(), right.clone()];
        let common = self.comparison_type(left, right).ok_or_else(|| {
            log::debug!("no comparison type for {} {} {}", left, op.symbol(), right);
            incompatible_operands(op.symbol(), infix_signature(op.symbol(), &operands))
        })?;
        let nullable = !op.is_null_safe() && (left.nullable || right.nullable);
        Ok(OperatorCoercion::new(
            &operands,
            operands.iter().map(|t| common.with_nullable(t.nullable)).collect(),
            TypeDescriptor::boolean().with_nullable(nullable),
        ))
    }

    /// Coerce the operands of `value BETWEEN low AND high`
    pub fn between(
        &self,
        value: &TypeDescriptor,
        low: &TypeDescriptor,
        high: &TypeDescriptor,
    ) -> Result<OperatorCoercion> {
        let operands = [value.clone(), low.clone(), high.clone()];
        let common = self
            .comparison_type(value, low)
            .and_then(|t| self.comparison_type(&t, high))
            .ok_or_else(|| {
                let signature = format!(
                    "<{}> BETWEEN <{}> AND <{}>",
                    value.type_name(),
                    low.type_name(),
                    high.type_name()
                );
                incompatible_operands("BETWEEN", signature)
            })?;
        let nullable = operands.iter().any(|t| t.nullable);
        Ok(OperatorCoercion::new(
            &operands,
            operands.iter().map(|t| common.with_nullable(t.nullable)).collect(),
            TypeDescriptor::boolean().with_nullable(nullable),
        ))
    }

    /// The type two operands are compared as
    ///
    /// Character strings yield to the datetime, numeric, boolean or binary
    /// they are compared with; otherwise the tightest common type, then the wider
    /// type without string promotion.
    pub fn comparison_type(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> Option<TypeDescriptor> {
        let nullable = a.nullable || b.nullable;
        if a.equals_sans_nullability(b) {
            return Some(a.with_nullable(nullable));
        }
        let max = self.factory().max_precision_scale_decimal();
        match comparison_rule(a, b, &max).or_else(|| comparison_rule(b, a, &max)) {
            Some(Comparison::Common(ty)) => Some(ty.with_nullable(nullable)),
            Some(Comparison::Incomparable) => None,
            None => self
                .coercer
                .tightest_common_type(a, b)
                .or_else(|| self.coercer.wider_type(a, b, false)),
        }
    }

    /// Coerce the operands of an n-ary `||`
    ///
    /// Operands that are not strings are cast to CHARACTER. The result is
    /// fixed-length when every operand is, with the summed length capped at
    /// the configured maximum.
    pub fn concat(&self, operands: &[TypeDescriptor]) -> Result<OperatorCoercion> {
        let signature = || infix_signature("||", operands);
        if operands.is_empty() {
            return Err(incompatible_operands("||", signature()));
        }
        let binary = operands.iter().any(TypeDescriptor::is_binary);

        let operand_types = operands
            .iter()
            .enumerate()
            .map(|(index, ty)| {
                if ty.is_null() {
                    let string = if binary {
                        TypeDescriptor::varbinary(None)
                    } else {
                        TypeDescriptor::varchar(None)
                    };
                    Ok(string.with_nullable(true))
                } else if ty.is_string() {
                    Ok(ty.clone())
                } else if ty.is_interval() || ty.is_composite() {
                    Err(CoercionError::InvalidConcatOperand {
                        index,
                        source_type: ty.full_type_string(),
                    })
                } else {
                    self.cast_into(index, ty, TypeFamily::Character)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        if binary && operand_types.iter().any(TypeDescriptor::is_character) {
            log::debug!("concatenation mixes character and binary strings");
            return Err(CoercionError::MixedConcatenation { operands: signature() });
        }

        let config = self.factory().config();
        let fixed = operand_types.iter().all(TypeDescriptor::is_fixed_length);
        let total = operand_types
            .iter()
            .try_fold(0u32, |acc, t| t.length().map(|n| acc.saturating_add(n)));
        let result = if binary {
            match total.map(|n| n.min(config.max_binary_length)) {
                Some(n) if fixed => TypeDescriptor::binary(n),
                n => TypeDescriptor::varbinary(n),
            }
        } else {
            match total.map(|n| n.min(config.max_char_length)) {
                Some(n) if fixed => TypeDescriptor::char(n),
                n => TypeDescriptor::varchar(n),
            }
        };
        let nullable = operands.iter().any(|t| t.nullable);
        Ok(OperatorCoercion::new(operands, operand_types, result.with_nullable(nullable)))
    }

    /// Coerce function operands into the family declared for each position
    ///
    /// Operands already in their family are left alone.
    pub fn function_operands(
        &self,
        function: &str,
        operands: &[TypeDescriptor],
        families: &[TypeFamily],
    ) -> Result<OperandCoercion> {
        if operands.len() != families.len() {
            return Err(incompatible_operands(function, call_signature(function, operands)));
        }
        let operand_types = operands
            .iter()
            .zip(families)
            .enumerate()
            .map(|(index, (ty, family))| {
                if family.contains(ty) {
                    Ok(ty.clone())
                } else {
                    self.cast_into(index, ty, *family)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        let casts = record_casts(operands, &operand_types);
        Ok(OperandCoercion { operand_types, casts })
    }

    fn cast_into(&self, index: usize, ty: &TypeDescriptor, family: TypeFamily) -> Result<TypeDescriptor> {
        self.coercer.implicit_cast(ty, family).ok_or_else(|| {
            log::debug!("operand {} of type {} has no implicit cast to {}", index, ty, family);
            CoercionError::IllegalImplicitCast {
                index,
                source_type: ty.full_type_string(),
                family: family.to_string(),
            }
        })
    }
}

/// Target of one arithmetic operand given the other
///
/// Numeric operands are kept. A character operand takes the type of a
/// non-DECIMAL numeric partner and becomes the widest DECIMAL otherwise; a
/// NULL takes its partner's type. The target keeps the operand's nullability.
fn arithmetic_operand(
    this: &TypeDescriptor,
    other: &TypeDescriptor,
    max_decimal: &TypeDescriptor,
) -> Option<TypeDescriptor> {
    let target = if this.is_numeric() {
        this.clone()
    } else if this.is_null() {
        if other.is_numeric() {
            other.clone()
        } else if other.is_null() {
            TypeDescriptor::integer()
        } else if other.is_character() {
            max_decimal.clone()
        } else {
            return None;
        }
    } else if this.is_character() {
        if other.is_numeric() && !other.is_decimal() {
            other.clone()
        } else if other.is_numeric() || other.is_character() || other.is_null() {
            max_decimal.clone()
        } else {
            return None;
        }
    } else {
        return None;
    };
    Some(target.with_nullable(this.nullable))
}

/// Comparison rules that take precedence over type widening, tried with `a`
/// on either side
fn comparison_rule(a: &TypeDescriptor, b: &TypeDescriptor, max_decimal: &TypeDescriptor) -> Option<Comparison> {
    if a.is_datetime() && b.is_character() {
        return Some(Comparison::Common(a.clone()));
    }
    if a.is_date() && b.is_timestamp() {
        return Some(Comparison::Common(b.clone()));
    }
    if a.is_string() && b.is_null() {
        return Some(Comparison::Common(a.clone()));
    }
    if a.is_decimal() && b.is_character() {
        return Some(Comparison::Common(max_decimal.clone()));
    }
    if a.is_binary() && b.is_approximate() {
        return Some(Comparison::Incomparable);
    }
    if (a.is_numeric() || a.is_boolean() || a.is_binary()) && b.is_character() {
        return Some(Comparison::Common(a.clone()));
    }
    None
}

fn record_casts(operands: &[TypeDescriptor], targets: &[TypeDescriptor]) -> Vec<ImplicitCast> {
    operands
        .iter()
        .zip(targets)
        .enumerate()
        .filter_map(|(i, (from, to))| ImplicitCast::between(CastTarget::Operand(i), from, to))
        .collect()
}

fn incompatible_operands(operator: &str, operands: String) -> CoercionError {
    CoercionError::IncompatibleOperands {
        operator: operator.to_string(),
        operands,
    }
}

fn infix_signature(symbol: &str, operands: &[TypeDescriptor]) -> String {
    operands
        .iter()
        .map(|t| format!("<{}>", t.type_name()))
        .collect::<Vec<_>>()
        .join(&format!(" {} ", symbol))
}

fn call_signature(function: &str, operands: &[TypeDescriptor]) -> String {
    let args: Vec<String> = operands.iter().map(|t| format!("<{}>", t.type_name())).collect();
    format!("{}({})", function, args.join(", "))
}
