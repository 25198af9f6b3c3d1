/// Numeric conversion helpers.
///
/// Every index, count and step in the language arrives as a double-precision
/// real part. These helpers turn such values into machine integers without
/// silently truncating fractions or wrapping out-of-range values, and turn
/// lengths back into reals.
pub mod num;
/// Stack growth for deep recursion.
///
/// The evaluator recurses once per syntax tree level and once per function
/// application; deeply nested or recursive programs would otherwise overflow
/// the native stack before reaching the call depth limit.
pub mod stack;
