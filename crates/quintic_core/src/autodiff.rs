use num_traits::{Float, FromPrimitive, Num, One, ToPrimitive, Zero};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

/// Dual number for forward-mode differentiation.
/// val: real part
/// eps: infinitesimal part (the derivative being carried)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dual {
    pub val: f64,
    pub eps: f64,
}

impl Dual {
    pub fn new(val: f64, eps: f64) -> Self {
        Self { val, eps }
    }

    /// Seeds an independent variable: x + 1ε.
    pub fn variable(val: f64) -> Self {
        Self::new(val, 1.0)
    }

    pub fn constant(val: f64) -> Self {
        Self::new(val, 0.0)
    }

    /// Applies a scalar function given its value and derivative at `self.val`.
    fn chain(self, value: f64, derivative: f64) -> Self {
        Self::new(value, derivative * self.eps)
    }
}

/// Derivative of `f` at `x`, evaluated exactly (up to rounding) with dual numbers.
pub fn derivative(f: impl Fn(Dual) -> Dual, x: f64) -> f64 {
    f(Dual::variable(x)).eps
}

impl Zero for Dual {
    fn zero() -> Self {
        Self::constant(0.0)
    }
    fn is_zero(&self) -> bool {
        self.val == 0.0 && self.eps == 0.0
    }
}

impl One for Dual {
    fn one() -> Self {
        Self::constant(1.0)
    }
}

impl Add for Dual {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.val + rhs.val, self.eps + rhs.eps)
    }
}

impl Sub for Dual {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.val - rhs.val, self.eps - rhs.eps)
    }
}

impl Mul for Dual {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.val * rhs.val, self.val * rhs.eps + self.eps * rhs.val)
    }
}

impl Div for Dual {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(
            self.val / rhs.val,
            (self.eps * rhs.val - self.val * rhs.eps) / (rhs.val * rhs.val),
        )
    }
}

impl Neg for Dual {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.val, -self.eps)
    }
}

impl Rem for Dual {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self {
        // a % b = a - b * trunc(a / b); trunc is locally constant.
        let q = (self.val / rhs.val).trunc();
        Self::new(self.val % rhs.val, self.eps - q * rhs.eps)
    }
}

impl AddAssign for Dual {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl SubAssign for Dual {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl MulAssign for Dual {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
impl DivAssign for Dual {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}
impl RemAssign for Dual {
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

impl Num for Dual {
    type FromStrRadixErr = <f64 as Num>::FromStrRadixErr;
    fn from_str_radix(str: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        f64::from_str_radix(str, radix).map(Self::constant)
    }
}

impl ToPrimitive for Dual {
    fn to_i64(&self) -> Option<i64> {
        self.val.to_i64()
    }
    fn to_u64(&self) -> Option<u64> {
        self.val.to_u64()
    }
    fn to_f64(&self) -> Option<f64> {
        Some(self.val)
    }
}

impl FromPrimitive for Dual {
    fn from_i64(n: i64) -> Option<Self> {
        Some(Self::constant(n as f64))
    }
    fn from_u64(n: u64) -> Option<Self> {
        Some(Self::constant(n as f64))
    }
    fn from_f64(n: f64) -> Option<Self> {
        Some(Self::constant(n))
    }
}

impl num_traits::NumCast for Dual {
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        n.to_f64().map(Self::constant)
    }
}

impl Float for Dual {
    fn nan() -> Self {
        Self::constant(f64::NAN)
    }
    fn infinity() -> Self {
        Self::constant(f64::INFINITY)
    }
    fn neg_infinity() -> Self {
        Self::constant(f64::NEG_INFINITY)
    }
    fn neg_zero() -> Self {
        Self::new(-0.0, -0.0)
    }
    fn min_value() -> Self {
        Self::constant(f64::MIN)
    }
    fn min_positive_value() -> Self {
        Self::constant(f64::MIN_POSITIVE)
    }
    fn max_value() -> Self {
        Self::constant(f64::MAX)
    }
    fn is_nan(self) -> bool {
        self.val.is_nan()
    }
    fn is_infinite(self) -> bool {
        self.val.is_infinite()
    }
    fn is_finite(self) -> bool {
        self.val.is_finite()
    }
    fn is_normal(self) -> bool {
        self.val.is_normal()
    }
    fn classify(self) -> std::num::FpCategory {
        self.val.classify()
    }

    // Step functions are flat almost everywhere.
    fn floor(self) -> Self {
        self.chain(self.val.floor(), 0.0)
    }
    fn ceil(self) -> Self {
        self.chain(self.val.ceil(), 0.0)
    }
    fn round(self) -> Self {
        self.chain(self.val.round(), 0.0)
    }
    fn trunc(self) -> Self {
        self.chain(self.val.trunc(), 0.0)
    }
    fn signum(self) -> Self {
        self.chain(self.val.signum(), 0.0)
    }

    fn fract(self) -> Self {
        self.chain(self.val.fract(), 1.0)
    }
    fn abs(self) -> Self {
        let slope = if self.val >= 0.0 { 1.0 } else { -1.0 };
        self.chain(self.val.abs(), slope)
    }
    fn is_sign_positive(self) -> bool {
        self.val.is_sign_positive()
    }
    fn is_sign_negative(self) -> bool {
        self.val.is_sign_negative()
    }
    fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }
    fn recip(self) -> Self {
        self.chain(self.val.recip(), -1.0 / (self.val * self.val))
    }

    fn powi(self, n: i32) -> Self {
        self.chain(self.val.powi(n), f64::from(n) * self.val.powi(n - 1))
    }
    fn powf(self, n: Self) -> Self {
        // x^y = exp(y ln x)
        let value = self.val.powf(n.val);
        Self::new(
            value,
            value * (n.eps * self.val.ln() + n.val * self.eps / self.val),
        )
    }
    fn sqrt(self) -> Self {
        let s = self.val.sqrt();
        self.chain(s, 0.5 / s)
    }
    fn cbrt(self) -> Self {
        let c = self.val.cbrt();
        self.chain(c, 1.0 / (3.0 * c * c))
    }

    fn exp(self) -> Self {
        let e = self.val.exp();
        self.chain(e, e)
    }
    fn exp2(self) -> Self {
        (self * Self::constant(std::f64::consts::LN_2)).exp()
    }
    fn exp_m1(self) -> Self {
        self.chain(self.val.exp_m1(), self.val.exp())
    }
    fn ln(self) -> Self {
        self.chain(self.val.ln(), 1.0 / self.val)
    }
    fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }
    fn log2(self) -> Self {
        self.ln() / Self::constant(std::f64::consts::LN_2)
    }
    fn log10(self) -> Self {
        self.ln() / Self::constant(std::f64::consts::LN_10)
    }
    fn ln_1p(self) -> Self {
        self.chain(self.val.ln_1p(), 1.0 / (1.0 + self.val))
    }

    fn max(self, other: Self) -> Self {
        if self.val > other.val {
            self
        } else {
            other
        }
    }
    fn min(self, other: Self) -> Self {
        if self.val < other.val {
            self
        } else {
            other
        }
    }
    fn abs_sub(self, other: Self) -> Self {
        if self.val > other.val {
            self - other
        } else {
            Self::zero()
        }
    }
    fn hypot(self, other: Self) -> Self {
        (self * self + other * other).sqrt()
    }

    fn sin(self) -> Self {
        self.chain(self.val.sin(), self.val.cos())
    }
    fn cos(self) -> Self {
        self.chain(self.val.cos(), -self.val.sin())
    }
    fn tan(self) -> Self {
        self.sin() / self.cos()
    }
    fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }
    fn asin(self) -> Self {
        self.atan2((Self::one() - self * self).sqrt())
    }
    fn acos(self) -> Self {
        (Self::one() - self * self).sqrt().atan2(self)
    }
    fn atan(self) -> Self {
        self.chain(self.val.atan(), 1.0 / (1.0 + self.val * self.val))
    }
    fn atan2(self, other: Self) -> Self {
        let denom = self.val * self.val + other.val * other.val;
        Self::new(
            self.val.atan2(other.val),
            (other.val * self.eps - self.val * other.eps) / denom,
        )
    }

    fn sinh(self) -> Self {
        self.chain(self.val.sinh(), self.val.cosh())
    }
    fn cosh(self) -> Self {
        self.chain(self.val.cosh(), self.val.sinh())
    }
    fn tanh(self) -> Self {
        self.sinh() / self.cosh()
    }
    // Inverse hyperbolics through their logarithmic forms.
    fn asinh(self) -> Self {
        (self + (self * self + Self::one()).sqrt()).ln()
    }
    fn acosh(self) -> Self {
        (self + (self * self - Self::one()).sqrt()).ln()
    }
    fn atanh(self) -> Self {
        ((Self::one() + self) / (Self::one() - self)).ln() * Self::constant(0.5)
    }

    fn integer_decode(self) -> (u64, i16, i8) {
        self.val.integer_decode()
    }
}

#[cfg(test)]
mod tests {
    use super::{derivative, Dual};
    use num_traits::Float;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * (1.0 + b.abs())
    }

    #[test]
    fn product_and_quotient_rules() {
        let x = Dual::variable(2.0);
        let y = x * x * x;
        assert_eq!(y.val, 8.0);
        assert_eq!(y.eps, 12.0);

        let q = Dual::constant(1.0) / x;
        assert_eq!(q.val, 0.5);
        assert_eq!(q.eps, -0.25);
    }

    #[test]
    fn elementary_functions_match_closed_form_derivatives() {
        let x = 0.7;
        assert!(close(derivative(|v| v.exp(), x), x.exp()));
        assert!(close(derivative(|v| v.ln(), x), 1.0 / x));
        assert!(close(derivative(|v| v.sin(), x), x.cos()));
        assert!(close(derivative(|v| v.sqrt(), x), 0.5 / x.sqrt()));
        assert!(close(derivative(|v| v.powi(4), x), 4.0 * x.powi(3)));
        assert!(close(derivative(|v| v.atan(), x), 1.0 / (1.0 + x * x)));
        assert!(close(derivative(|v| v.tanh(), x), 1.0 - x.tanh().powi(2)));
    }

    #[test]
    fn composed_inverses_keep_values_and_slopes() {
        let x = 0.3;
        for (value, expected) in [
            (Dual::variable(x).asin().val, x.asin()),
            (Dual::variable(x).acos().val, x.acos()),
            (Dual::variable(x).atanh().val, x.atanh()),
            (Dual::variable(x).asinh().val, x.asinh()),
            (Dual::variable(1.0 + x).acosh().val, (1.0 + x).acosh()),
            (Dual::variable(x).log10().val, x.log10()),
        ] {
            assert!(close(value, expected), "{value} vs {expected}");
        }
        assert!(close(derivative(|v| v.asin(), x), 1.0 / (1.0 - x * x).sqrt()));
        assert!(close(derivative(|v| v.acos(), x), -1.0 / (1.0 - x * x).sqrt()));
        assert!(close(derivative(|v| v.atanh(), x), 1.0 / (1.0 - x * x)));
        assert!(close(derivative(|v| v.exp2(), x), x.exp2() * std::f64::consts::LN_2));
        assert!(close(derivative(|v| v.powi(-2), x), -2.0 / x.powi(3)));
    }

    #[test]
    fn exponential_decay_times_polynomial() {
        // d/dx [x e^{-3x}] = (1 - 3x) e^{-3x}
        let x = 0.4;
        let d = derivative(|v| v * (Dual::constant(-3.0) * v).exp(), x);
        assert!(close(d, (1.0 - 3.0 * x) * (-3.0 * x).exp()));
    }
}
