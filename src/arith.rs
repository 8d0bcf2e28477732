//! Operand normalisation and the fast paths in front of each layout's general
//! algorithms. Operands are cloned first, so neither side is ever mutated.

use std::cmp::Ordering;

use log::{debug, trace};

use crate::{
    bitvector::BitVector,
    error::{Error, Result},
    ONE, ZERO,
};

/// Clones both operands into the receiver's layout, in sign and magnitude form.
fn operands<T: BitVector, O: BitVector>(a: &T, b: &O) -> (T, T) {
    let mut a = a.clone();
    let mut b = T::convert(b);
    a.normalize();
    b.normalize();
    (a, b)
}

#[inline]
fn same_magnitude<T: BitVector, O: BitVector>(a: &T, b: &O) -> bool {
    a.compare_magnitudes(b) == Ordering::Equal
}

fn with_sign<T: BitVector>(mut v: T, signum: i8) -> T {
    v.trim();
    v.fields_mut().signum = signum;
    v
}

/// Adds or removes one unit of magnitude, leaving the sign alone.
/// Decrement expects a nonzero magnitude.
fn step_magnitude<T: BitVector>(mut v: T, up: bool) -> T {
    // increment turns the trailing ones to zeros, decrement the trailing zeros to ones
    let (seek, fill) = if up { (0, 1) } else { (1, 0) };
    let width = v.width();
    let i = (0..=width).find(|&i| v.bit(i) == seek).unwrap_or(width);
    v.extend_to(i + 1);
    v.put(i, fill);
    (0..i).for_each(|j| v.put(j, seek));
    v.trim();
    v
}

pub(crate) fn add<T: BitVector, O: BitVector>(a: &T, b: &O) -> T {
    let (a, b) = operands(a, b);
    sum(a, b)
}

fn sum<T: BitVector>(mut a: T, b: T) -> T {
    if a.equals(&b) {
        trace!("add: doubling {} bits", a.width());
        a.shift_left(1);
        return a;
    }
    if a.is_zero() {
        return b;
    }
    if b.is_zero() {
        return a;
    }
    if a.signum() == b.signum() {
        if same_magnitude(&a, &*ONE) {
            trace!("add: increment");
            return step_magnitude(b, true);
        }
        if same_magnitude(&b, &*ONE) {
            trace!("add: increment");
            return step_magnitude(a, true);
        }
    }
    trace!("add: ripple carry over {} and {} bits", a.width(), b.width());
    T::addition(a, b)
}

pub(crate) fn subtract<T: BitVector, O: BitVector>(a: &T, b: &O) -> T {
    let (a, mut b) = operands(a, b);
    if a.equals(&b) {
        return T::convert(&*ZERO);
    }
    if b.is_zero() {
        return a;
    }
    let s = b.signum();
    if a.is_zero() {
        b.fields_mut().signum = -s;
        return b;
    }
    if b.equals(&*ONE) {
        trace!("subtract: step by one");
        let up = a.signum() < 0;
        return step_magnitude(a, up);
    }
    b.fields_mut().signum = -s;
    sum(a, b)
}

pub(crate) fn multiply<T: BitVector, O: BitVector>(a: &T, b: &O) -> T {
    let (mut a, mut b) = operands(a, b);
    if a.is_zero() || b.is_zero() {
        return T::convert(&*ZERO);
    }
    let signum = a.signum() * b.signum();
    let product = if a.equals(&b) {
        trace!("multiply: square of {} bits", a.width());
        T::multiplication(a, b)
    } else if same_magnitude(&a, &*ONE) {
        b
    } else if same_magnitude(&b, &*ONE) {
        a
    } else if same_magnitude(&a, T::two()) {
        b.shift_left(1);
        b
    } else if same_magnitude(&b, T::two()) {
        a.shift_left(1);
        a
    } else {
        trace!("multiply: shift and add over {} x {} bits", a.width(), b.width());
        T::multiplication(a, b)
    };
    with_sign(product, signum)
}

pub(crate) fn divide<T: BitVector, O: BitVector>(a: &T, b: &O) -> Result<T> {
    let (mut a, b) = operands(a, b);
    if b.is_zero() {
        let err = if a.is_zero() {
            Error::Indeterminate
        } else {
            Error::DivisionByZero
        };
        debug!("divide: {}", err);
        return Err(err);
    }
    if a.equals(&b) {
        return Ok(T::convert(&*ONE));
    }
    if a.is_zero() || a.compare_magnitudes(&b) == Ordering::Less {
        return Ok(T::convert(&*ZERO));
    }
    let signum = a.signum() * b.signum();
    let quotient = if same_magnitude(&b, &*ONE) {
        a
    } else if same_magnitude(&b, T::two()) {
        a.shift_right(1);
        a
    } else {
        trace!("divide: restoring division over {} bits", a.width());
        T::division(a, b)
    };
    Ok(with_sign(quotient, signum))
}
