//! Rule primitives called by generated validators.
//!
//! Each function evaluates one rule against one value and returns `true` when
//! the value satisfies it. They never record anything: the generated caller
//! reports through the [`PathContext`](crate::PathContext) on `false`.
//!
//! | Field kind | Module | Constraint ids |
//! |---|---|---|
//! | numeric scalars | [`number`] | `int32.lt`, `double.finite`, `sint64.in`, ... |
//! | `bool` | [`bool`] | `bool.const` |
//! | `string` | [`string`] | `string.min_len`, `string.email`, ... |
//! | `bytes` | [`bytes`] | `bytes.max_len`, `bytes.ipv4`, ... |
//! | `repeated` | [`repeated`] | `repeated.min_items`, `repeated.unique`, ... |
//! | `map` | [`map`] | `map.min_pairs`, `map.no_sparse`, ... |
//! | `enum` | [`enum_rules`] | `enum.defined_only`, `enum.in`, ... |
//! | `google.protobuf.Any` | [`any`] | `any.in`, `any.not_in` |

pub mod any;
pub mod bool;
pub mod bytes;
pub mod enum_rules;
pub mod map;
pub mod number;
#[cfg(feature = "pattern")]
pub mod pattern;
pub mod repeated;
pub mod string;
