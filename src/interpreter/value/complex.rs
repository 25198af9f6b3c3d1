use std::{cmp::Ordering, fmt::Display, ops};

use ordered_float::OrderedFloat;

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Components within this distance of zero are treated as zero for display,
/// equality and modulus eligibility.
pub const TINY: f64 = 1e-10;

/// `0` as a complex number; the additive identity and the only falsy value.
pub const ZERO: ComplexNumber = ComplexNumber::new(0.0, 0.0);
/// `1` as a complex number; what comparisons return for true.
pub const ONE: ComplexNumber = ComplexNumber::new(1.0, 0.0);

/// The only numeric type: reals are numbers whose imaginary part is zero.
#[derive(Debug, Clone, Copy)]
pub struct ComplexNumber {
    pub real:      f64,
    pub imaginary: f64,
}

/// Formats the number, hiding components that are within [`TINY`] of zero.
///
/// # Example
/// ```
/// use tbl::interpreter::value::complex::ComplexNumber;
///
/// assert_eq!(ComplexNumber::new(7.0, 0.0).to_string(), "7");
/// assert_eq!(ComplexNumber::new(0.0, 2.0).to_string(), "2i");
/// assert_eq!(ComplexNumber::new(1.0, -2.0).to_string(), "1 - 2i");
/// assert_eq!(ComplexNumber::new(1e-12, 1e-12).to_string(), "0");
/// ```
impl Display for ComplexNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero_fuzzy() {
            write!(f, "0")
        } else if self.is_real_fuzzy() {
            write!(f, "{}", self.real)
        } else if self.is_imaginary_fuzzy() {
            write!(f, "{}i", self.imaginary)
        } else if self.imaginary > 0.0 {
            write!(f, "{} + {}i", self.real, self.imaginary)
        } else {
            write!(f, "{} - {}i", self.real, -self.imaginary)
        }
    }
}

impl ComplexNumber {
    #[must_use]
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Self { real, imaginary }
    }

    /// Returns `ONE` for `true` and `ZERO` for `false`.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { ONE } else { ZERO }
    }

    /// Whether the imaginary part is exactly zero.
    #[must_use]
    pub fn is_real_strict(&self) -> bool {
        self.imaginary == 0.0
    }

    /// Whether the real part is exactly zero.
    #[must_use]
    pub fn is_imaginary_strict(&self) -> bool {
        self.real == 0.0
    }

    /// Whether both parts are exactly zero.
    #[must_use]
    pub fn is_zero_strict(&self) -> bool {
        self.is_real_strict() && self.is_imaginary_strict()
    }

    /// Whether the imaginary part is within [`TINY`] of zero.
    #[must_use]
    pub fn is_real_fuzzy(&self) -> bool {
        self.imaginary.abs() < TINY
    }

    /// Whether the real part is within [`TINY`] of zero.
    #[must_use]
    pub fn is_imaginary_fuzzy(&self) -> bool {
        self.real.abs() < TINY
    }

    /// Whether both parts are within [`TINY`] of zero.
    #[must_use]
    pub fn is_zero_fuzzy(&self) -> bool {
        self.is_real_fuzzy() && self.is_imaginary_fuzzy()
    }

    /// Component-wise equality within [`TINY`].
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::value::complex::ComplexNumber;
    /// let a = ComplexNumber::new(0.1 + 0.2, 0.0);
    /// assert!(a.fuzzy_eq(&ComplexNumber::new(0.3, 0.0)));
    /// ```
    #[must_use]
    pub fn fuzzy_eq(&self, other: &Self) -> bool {
        self == other || (*self - *other).is_zero_fuzzy()
    }

    /// Orders two numbers: along the real axis when both are real, along the
    /// imaginary axis when both are imaginary, by magnitude otherwise.
    ///
    /// # Example
    /// ```
    /// use std::cmp::Ordering;
    ///
    /// use tbl::interpreter::value::complex::ComplexNumber;
    ///
    /// let a = ComplexNumber::new(-3.0, 0.0);
    /// let b = ComplexNumber::new(2.0, 0.0);
    /// assert_eq!(a.compare(&b), Ordering::Less);
    ///
    /// // Mixed pairs compare by magnitude.
    /// let c = ComplexNumber::new(3.0, 4.0);
    /// assert_eq!(c.compare(&ComplexNumber::new(6.0, 0.0)), Ordering::Less);
    /// ```
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        if self.is_real_fuzzy() && other.is_real_fuzzy() {
            OrderedFloat(self.real).cmp(&OrderedFloat(other.real))
        } else if self.is_imaginary_fuzzy() && other.is_imaginary_fuzzy() {
            OrderedFloat(self.imaginary).cmp(&OrderedFloat(other.imaginary))
        } else {
            OrderedFloat(self.abs()).cmp(&OrderedFloat(other.abs()))
        }
    }

    /// Distance from the origin.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::value::complex::ComplexNumber;
    /// assert_eq!(ComplexNumber::new(3.0, 4.0).abs(), 5.0);
    /// ```
    #[must_use]
    pub fn abs(&self) -> f64 {
        self.real.hypot(self.imaginary)
    }

    /// Angle from the positive real axis, in `(-pi, pi]`.
    #[must_use]
    pub fn arg(self) -> f64 {
        self.imaginary.atan2(self.real)
    }

    /// Builds a number from polar coordinates.
    #[must_use]
    pub fn from_polar(length: f64, phase: f64) -> Self {
        let (sin, cos) = phase.sin_cos();
        Self::new(length * cos, length * sin)
    }

    /// Raises the number to a complex power.
    ///
    /// Real bases and exponents use real exponentiation unless the base is
    /// non-positive with a fractional exponent, or zero with a negative
    /// exponent. Those cases, and all genuinely complex ones, use the polar
    /// form `|a|^b * e^(i * b * arg a)`.
    ///
    /// # Errors
    /// `RuntimeError::InvalidArgument` when raising zero to a negative or
    /// complex power.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::value::complex::ComplexNumber;
    ///
    /// let r = ComplexNumber::new(2.0, 0.0).pow(ComplexNumber::new(10.0, 0.0)).unwrap();
    /// assert_eq!(r.real, 1024.0);
    ///
    /// let i = ComplexNumber::new(-1.0, 0.0).pow(ComplexNumber::new(0.5, 0.0)).unwrap();
    /// assert!(i.real.abs() < 1e-10);
    /// assert!((i.imaginary - 1.0).abs() < 1e-10);
    ///
    /// assert!(ComplexNumber::new(0.0, 0.0).pow(ComplexNumber::new(-1.0, 0.0)).is_err());
    /// ```
    pub fn pow(self, exp: Self) -> EvalResult<Self> {
        if self.is_real_strict() && exp.is_real_strict() {
            let (base, power) = (self.real, exp.real);
            let fractional = power.fract() != 0.0;
            if !(base <= 0.0 && fractional) && !(base == 0.0 && power < 0.0) {
                return Ok(Self::from(base.powf(power)));
            }
        }

        if exp.is_zero_strict() {
            return Ok(ONE);
        }
        if self.is_zero_strict() {
            if exp.imaginary != 0.0 || exp.real < 0.0 {
                return Err(RuntimeError::invalid_argument("can not raise 0 to a negative or complex power"));
            }
            return Ok(ZERO);
        }

        let modulus = self.abs();
        let theta = self.arg();
        let mut length = modulus.powf(exp.real);
        let mut phase = theta * exp.real;
        if !exp.is_real_strict() {
            length /= (theta * exp.imaginary).exp();
            phase += exp.imaginary * modulus.ln();
        }

        Ok(Self::from_polar(length, phase))
    }

    /// Remainder of two fuzzy-real numbers, using the host `%` on the real
    /// parts.
    ///
    /// Returns `None` when either operand has a non-negligible imaginary
    /// part.
    #[must_use]
    pub fn checked_rem(self, rhs: Self) -> Option<Self> {
        (self.is_real_fuzzy() && rhs.is_real_fuzzy()).then(|| Self::from(self.real % rhs.real))
    }

    /// Principal square root; the imaginary part takes the sign of the
    /// operand's imaginary part.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::value::complex::ComplexNumber;
    /// let s = ComplexNumber::new(-9.0, 0.0).sqrt();
    /// assert!(s.real.abs() < 1e-10);
    /// assert!((s.imaginary - 3.0).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn sqrt(self) -> Self {
        let r = self.abs();
        Self::new(f64::midpoint(r, self.real).sqrt(),
                  ((r - self.real) / 2.0).sqrt().copysign(self.imaginary))
    }

    /// `e` raised to this number.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::value::complex::ComplexNumber;
    /// let z = ComplexNumber::new(0.0, std::f64::consts::PI).exp();
    /// assert!((z.real + 1.0).abs() < 1e-10);
    /// assert!(z.imaginary.abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn exp(self) -> Self {
        Self::from_polar(self.real.exp(), self.imaginary)
    }
}

macro_rules! componentwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl ops::$trait for ComplexNumber {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self::new(self.real $op rhs.real, self.imaginary $op rhs.imaginary)
            }
        }
    };
}

componentwise!(Add, add, +);
componentwise!(Sub, sub, -);

impl ops::Mul for ComplexNumber {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let Self { real: a, imaginary: b } = self;
        let Self { real: c, imaginary: d } = rhs;
        Self::new(a.mul_add(c, -(b * d)), a.mul_add(d, b * c))
    }
}

/// Two strictly real operands divide as floats, so `1 / 0` is infinity
/// rather than `NaN`.
impl ops::Div for ComplexNumber {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        if self.is_real_strict() && rhs.is_real_strict() {
            return Self::from(self.real / rhs.real);
        }

        let Self { real: a, imaginary: b } = self;
        let Self { real: c, imaginary: d } = rhs;
        let norm = c.mul_add(c, d * d);
        Self::new(a.mul_add(c, b * d) / norm, b.mul_add(c, -(a * d)) / norm)
    }
}

impl<T: Into<f64>> From<T> for ComplexNumber {
    fn from(real: T) -> Self {
        Self::new(real.into(), 0.0)
    }
}

/// Exact structural equality; the language's `=` uses [`ComplexNumber::fuzzy_eq`].
impl PartialEq for ComplexNumber {
    fn eq(&self, other: &Self) -> bool {
        (OrderedFloat(self.real), OrderedFloat(self.imaginary))
        == (OrderedFloat(other.real), OrderedFloat(other.imaginary))
    }
}
