/// Complex number support.
///
/// Defines the `ComplexNumber` type every numeric value is built on, the
/// fuzzy epsilon used for display and comparison, and the arithmetic,
/// power and elementary functions over complex operands.
pub mod complex;
/// The runtime `Value` enum.
///
/// Covers numbers, text, lists, objects, callables and quoted syntax trees,
/// together with conversions, truthiness, deep duplication and display.
pub mod core;
/// Cycle detection for walks over shared list and object handles.
pub mod ancestors;
/// Callable values.
///
/// User functions carry parameters, a body and a captured closure; builtins
/// wrap a native Rust closure behind a name.
pub mod function;
