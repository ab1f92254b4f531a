//! Structural type unification.
//!
//! Unification is the single compatibility check in the system: every
//! compound node runs it over its children's types at construction, so an
//! ill-typed tree cannot be built in the first place.

use crate::core::Type;
use crate::error::{mismatch, TypeError};

/// Unify two types structurally.
///
/// Symmetric in its operands. Two types unify iff they are the same variant
/// and all their components unify recursively; function types additionally
/// require equal arity, pairwise-unifying parameters, and a unifying result.
/// On success the unified type is returned; on failure the error names both
/// operands.
pub fn unify(a: &Type, b: &Type) -> Result<Type, TypeError> {
    match (a, b) {
        (Type::Void, Type::Void) => Ok(Type::Void),

        (Type::Basic(ka), Type::Basic(kb)) if ka == kb => Ok(Type::Basic(*ka)),

        (
            Type::Function {
                params: params_a,
                result: result_a,
            },
            Type::Function {
                params: params_b,
                result: result_b,
            },
        ) => {
            if params_a.len() != params_b.len() {
                return Err(TypeError::ArityMismatch {
                    expected: params_a.len(),
                    found: params_b.len(),
                });
            }

            let mut params = Vec::with_capacity(params_a.len());
            for (pa, pb) in params_a.iter().zip(params_b.iter()) {
                params.push(unify(pa, pb)?);
            }

            let result = unify(result_a, result_b)?;
            Ok(Type::function(params, result))
        }

        // Mismatched variants, or same variant with disagreeing kinds.
        (Type::Void | Type::Basic(_) | Type::Function { .. }, _) => Err(mismatch(a, b)),
    }
}
