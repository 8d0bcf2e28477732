use std::{borrow::Cow, cmp::Ordering, convert::TryFrom};

use crate::{
    arith,
    error::{Error, Result},
    BitVectorBe, BitVectorLe,
};

/// State shared by both storage layouts.
///
/// `bits.len()` is the allocated capacity. Only `len` logical positions are
/// stored; every slot of `bits` outside the stored region holds 0. Reads past
/// the stored region return `complement`.
#[doc(hidden)]
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawFields")
)]
pub struct Fields {
    pub(crate) bits: Vec<u8>,
    pub(crate) len: usize,
    pub(crate) signum: i8,
    pub(crate) complement: u8,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawFields {
    bits: Vec<u8>,
    len: usize,
    signum: i8,
    complement: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFields> for Fields {
    type Error = Error;

    fn try_from(raw: RawFields) -> Result<Self> {
        check_bits(&raw.bits)?;
        check_bit(raw.complement)?;
        if raw.signum != 0 {
            check_sign(i64::from(raw.signum))?;
        }
        if raw.len > raw.bits.len() {
            return Err(Error::IllegalOperation("stored length exceeds capacity"));
        }
        // both layouts keep the stored region at the front
        if raw.bits[raw.len..].iter().any(|&b| b != 0) {
            return Err(Error::IllegalOperation("nonzero bit past the stored length"));
        }
        Ok(Fields {
            bits: raw.bits,
            len: raw.len,
            signum: raw.signum,
            complement: raw.complement,
        })
    }
}

#[inline]
pub(crate) fn check_bit(bit: u8) -> Result<u8> {
    if bit > 1 {
        Err(Error::InvalidBit(bit))
    } else {
        Ok(bit)
    }
}

pub(crate) fn check_bits(bits: &[u8]) -> Result<()> {
    bits.iter().try_for_each(|&b| check_bit(b).map(drop))
}

pub(crate) fn check_sign(signum: i64) -> Result<i8> {
    match signum {
        1 => Ok(1),
        -1 => Ok(-1),
        _ => Err(Error::InvalidSign(signum)),
    }
}

#[inline]
pub(crate) fn check_index(index: isize) -> Result<usize> {
    if index < 0 {
        Err(Error::IllegalAccess(index))
    } else {
        Ok(index as usize)
    }
}

pub(crate) fn check_range(from: isize, to: isize) -> Result<(usize, usize)> {
    let start = check_index(from)?;
    if to < from {
        return Err(Error::IllegalOperation("range end precedes its start"));
    }
    Ok((start, to as usize))
}

#[inline]
pub(crate) fn check_shift(n: isize) -> Result<usize> {
    if n < 0 {
        Err(Error::NegativeShift(n))
    } else {
        Ok(n as usize)
    }
}

/// A signed integer of unbounded width stored one bit per element.
///
/// Logical bit `0` is always the least significant bit; the two layouts only
/// differ in where that bit sits in the backing array. Every read at or past
/// the stored length returns the sign extension bit, so a vector behaves as an
/// infinitely wide two's complement pattern.
///
/// The value is `signum() * magnitude`, where the magnitude is the stored
/// pattern when the extension bit is 0, and the two's complement negation of
/// `...111 pattern` when it is 1.
///
/// Bitwise operators mutate in place and return `&mut Self` for chaining;
/// arithmetic never touches its operands and returns a new vector.
pub trait BitVector: Clone + Sized + 'static {
    #[doc(hidden)]
    fn fields(&self) -> &Fields;
    #[doc(hidden)]
    fn fields_mut(&mut self) -> &mut Fields;
    /// Builds a vector from stored bits given least significant first.
    #[doc(hidden)]
    fn from_logical(bits: Vec<u8>, signum: i8, complement: u8) -> Self;

    /// This layout's representation of two.
    fn two() -> &'static Self;

    // layout primitives

    /// Stored bit at `index`, or the extension bit past the stored region.
    #[doc(hidden)]
    fn bit(&self, index: usize) -> u8;
    /// Overwrites a stored bit; `index` must be below the stored length.
    #[doc(hidden)]
    fn put(&mut self, index: usize, value: u8);
    /// Grows the stored region to `to` positions, filling with the extension bit.
    #[doc(hidden)]
    fn extend_to(&mut self, to: usize);
    /// Drops stored leading bits that equal the extension bit.
    #[doc(hidden)]
    fn trim(&mut self);
    #[doc(hidden)]
    fn push_msb(&mut self, bit: u8);
    #[doc(hidden)]
    fn push_lsb(&mut self, bit: u8);
    #[doc(hidden)]
    fn remove(&mut self, index: usize) -> u8;
    #[doc(hidden)]
    fn shift_left(&mut self, n: usize);
    #[doc(hidden)]
    fn shift_right(&mut self, n: usize);
    /// Two's complement transform of the pattern; toggles the extension bit
    /// and leaves `signum` alone.
    #[doc(hidden)]
    fn complement_bits(&mut self);
    /// One's complement transform of the pattern; toggles the extension bit.
    #[doc(hidden)]
    fn invert_bits(&mut self);

    // general algorithms over normalised, nonzero operands

    /// Ripple carry addition.
    #[doc(hidden)]
    fn addition(a: Self, b: Self) -> Self;
    /// Shift and add; the sign of the result is left to the caller.
    #[doc(hidden)]
    fn multiplication(a: Self, b: Self) -> Self;
    /// Restoring division of magnitudes; the sign is left to the caller.
    #[doc(hidden)]
    fn division(a: Self, b: Self) -> Self;

    /// Pops the most significant stored bit.
    fn pop(&mut self) -> Option<u8>;

    // conversion

    fn convert<O: BitVector>(other: &O) -> Self {
        let f = other.fields();
        Self::from_logical(other.logical_bits(), f.signum, f.complement)
    }

    fn to_le(&self) -> BitVectorLe {
        BitVectorLe::convert(self)
    }

    fn to_be(&self) -> BitVectorBe {
        BitVectorBe::convert(self)
    }

    fn from_i64(value: i64) -> Self {
        let magnitude = value.unsigned_abs();
        let width = (u64::BITS - magnitude.leading_zeros()) as usize;
        let bits = (0..width).map(|i| ((magnitude >> i) & 1) as u8).collect();
        Self::from_logical(bits, value.signum() as i8, 0)
    }

    fn to_i64(&self) -> Result<i64> {
        let m = self.uncomplemented();
        let width = m.length();
        if width > u64::BITS as usize {
            return Err(Error::Overflow);
        }
        let magnitude = (0..width).fold(0u64, |acc, i| acc | (u64::from(m.bit(i)) << i));
        i64::try_from(i128::from(magnitude) * i128::from(self.signum())).map_err(|_| Error::Overflow)
    }

    /// Stored bits, least significant first.
    fn logical_bits(&self) -> Vec<u8> {
        (0..self.width()).map(|i| self.bit(i)).collect()
    }

    // getters

    fn get(&self, index: isize) -> Result<u8> {
        Ok(self.bit(check_index(index)?))
    }

    /// Index one past the highest stored bit that differs from the extension bit.
    fn length(&self) -> usize {
        let f = self.fields();
        (0..f.len)
            .rev()
            .find(|&i| self.bit(i) != f.complement)
            .map_or(0, |i| i + 1)
    }

    /// Number of stored positions, leading extension bits included.
    fn width(&self) -> usize {
        self.fields().len
    }

    fn capacity(&self) -> usize {
        self.fields().bits.len()
    }

    fn is_empty(&self) -> bool {
        self.fields().len == 0
    }

    fn is_zero(&self) -> bool {
        self.fields().complement == 0 && self.length() == 0
    }

    fn complement(&self) -> u8 {
        self.fields().complement
    }

    /// -1, 0 or 1. Zero only for the value zero, whatever sign the vector was
    /// declared with.
    fn signum(&self) -> i8 {
        if self.is_zero() {
            return 0;
        }
        let f = self.fields();
        match f.signum {
            0 if f.complement == 0 => 1,
            0 => -1,
            s => s,
        }
    }

    /// 1 when negative, else 0.
    fn sign(&self) -> u8 {
        (self.signum() == -1) as u8
    }

    /// Copy of the backing array in physical order.
    fn to_byte_array(&self) -> Vec<u8> {
        self.fields().bits.clone()
    }

    // bit manipulation

    fn append(&mut self, bit: u8) -> Result<&mut Self> {
        let bit = check_bit(bit)?;
        self.mark_written();
        self.push_msb(bit);
        Ok(self)
    }

    fn prepend(&mut self, bit: u8) -> Result<&mut Self> {
        let bit = check_bit(bit)?;
        self.mark_written();
        self.push_lsb(bit);
        Ok(self)
    }

    /// Removes the bit at `index`; higher stored bits move down by one.
    /// Past the stored region nothing is removed and the extension bit is returned.
    fn pop_at(&mut self, index: isize) -> Result<u8> {
        let index = check_index(index)?;
        if index >= self.width() {
            return Ok(self.complement());
        }
        Ok(self.remove(index))
    }

    /// Multiplies by `2^n`.
    fn shl(&mut self, n: isize) -> Result<&mut Self> {
        let n = check_shift(n)?;
        self.shift_left(n);
        Ok(self)
    }

    /// Drops the `n` lowest stored bits. Shifting past the stored length
    /// leaves an empty vector.
    fn shr(&mut self, n: isize) -> Result<&mut Self> {
        let n = check_shift(n)?;
        self.shift_right(n);
        Ok(self)
    }

    fn set_range(&mut self, from: isize, to: isize, value: bool) -> Result<&mut Self> {
        let (from, to) = check_range(from, to)?;
        self.mark_written();
        self.extend_to(to);
        (from..to).for_each(|i| self.put(i, value as u8));
        Ok(self)
    }

    fn set(&mut self, from: isize, to: isize) -> Result<&mut Self> {
        self.set_range(from, to, true)
    }

    fn set_bit(&mut self, index: isize) -> Result<&mut Self> {
        self.set_range(index, index.saturating_add(1), true)
    }

    fn clear(&mut self, from: isize, to: isize) -> Result<&mut Self> {
        self.set_range(from, to, false)
    }

    fn clear_bit(&mut self, index: isize) -> Result<&mut Self> {
        self.set_range(index, index.saturating_add(1), false)
    }

    fn flip(&mut self, from: isize, to: isize) -> Result<&mut Self> {
        let (from, to) = check_range(from, to)?;
        self.mark_written();
        self.extend_to(to);
        for i in from..to {
            let bit = self.bit(i) ^ 1;
            self.put(i, bit);
        }
        Ok(self)
    }

    fn flip_bit(&mut self, index: isize) -> Result<&mut Self> {
        self.flip(index, index.saturating_add(1))
    }

    fn reset(&mut self) {
        *self.fields_mut() = Fields::default();
    }

    fn flip_sign(&mut self) -> Result<&mut Self> {
        match self.signum() {
            0 => Err(Error::IllegalOperation("cannot invert null signature")),
            s => {
                self.fields_mut().signum = -s;
                Ok(self)
            }
        }
    }

    fn ones_complement(&mut self) -> Result<&mut Self> {
        let s = self.signum();
        if s == 0 {
            return Err(Error::IllegalOperation("cannot invert null signature"));
        }
        self.invert_bits();
        self.fields_mut().signum = -s;
        Ok(self)
    }

    /// Arithmetic negation carried out on the bits: the pattern above the
    /// lowest set bit flips, the extension bit toggles and so does the sign.
    fn twos_complement(&mut self) -> Result<&mut Self> {
        let s = self.signum();
        if s == 0 {
            return Err(Error::IllegalOperation("cannot invert null signature"));
        }
        self.complement_bits();
        self.fields_mut().signum = -s;
        Ok(self)
    }

    // bitwise operations

    /// Flips every stored bit; the extension bit is untouched.
    fn inverse(&mut self) -> &mut Self {
        for i in 0..self.width() {
            let bit = self.bit(i) ^ 1;
            self.put(i, bit);
        }
        self
    }

    fn and<O: BitVector>(&mut self, other: &O) -> &mut Self {
        self.combine(other, |a, b| a & b)
    }

    fn or<O: BitVector>(&mut self, other: &O) -> &mut Self {
        self.combine(other, |a, b| a | b)
    }

    fn xor<O: BitVector>(&mut self, other: &O) -> &mut Self {
        self.combine(other, |a, b| a ^ b)
    }

    /// Elementwise over both stored regions, extension bits included. The
    /// result is read as a two's complement pattern.
    #[doc(hidden)]
    fn combine<O: BitVector>(&mut self, other: &O, op: fn(u8, u8) -> u8) -> &mut Self {
        let n = self.width().max(other.width());
        let ext = op(self.complement(), other.complement());
        self.extend_to(n);
        for i in 0..n {
            let bit = op(self.bit(i), other.bit(i));
            self.put(i, bit);
        }
        let f = self.fields_mut();
        f.complement = ext;
        f.signum = if ext == 1 { -1 } else { 1 };
        self
    }

    /// `!x`, i.e. `-x - 1`, as a new vector.
    fn bitwise_not(&self) -> Self {
        let mut v = self.clone();
        if v.signum() < 0 && v.complement() == 0 {
            v.complement_bits();
        }
        v.invert_bits();
        let f = v.fields_mut();
        f.signum = if f.complement == 1 { -1 } else { 1 };
        v
    }

    fn negated(&self) -> Self {
        let mut v = self.clone();
        let s = v.signum();
        v.fields_mut().signum = -s;
        v
    }

    // arithmetic

    fn add<O: BitVector>(&self, other: &O) -> Self {
        arith::add(self, other)
    }

    fn subtract<O: BitVector>(&self, other: &O) -> Self {
        arith::subtract(self, other)
    }

    fn multiply<O: BitVector>(&self, other: &O) -> Self {
        arith::multiply(self, other)
    }

    /// Quotient truncated toward zero, as `/` does on primitive integers:
    /// `-7 / 3 == -2`.
    fn divide<O: BitVector>(&self, other: &O) -> Result<Self> {
        arith::divide(self, other)
    }

    // comparison

    /// Scans from the most significant bit down and returns the first nonzero
    /// difference scaled by its position. Meaningful only when both operands
    /// share an extension bit.
    fn compare_significands<O: BitVector>(&self, other: &O) -> isize {
        let n = self.width().max(other.width());
        let flip = if self.complement() == 1 { -1 } else { 1 };
        (0..n)
            .rev()
            .map(|i| (i, self.bit(i) as isize - other.bit(i) as isize))
            .find(|&(_, dif)| dif != 0)
            .map_or(0, |(i, dif)| dif * (i as isize + 1) * flip)
    }

    fn compare_magnitudes<O: BitVector>(&self, other: &O) -> Ordering {
        if self.complement() == other.complement() {
            return self.compare_significands(other).cmp(&0);
        }
        let a = self.uncomplemented();
        let b = other.uncomplemented();
        a.compare_significands(&*b).cmp(&0)
    }

    fn compare_to<O: BitVector>(&self, other: &O) -> Ordering {
        let (sa, sb) = (self.signum(), other.signum());
        if sa != sb {
            return sa.cmp(&sb);
        }
        let magnitude = self.compare_magnitudes(other);
        if sa < 0 {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    /// Same sign, same significant length and same significant bits once both
    /// sides are in sign and magnitude form.
    fn equals<O: BitVector>(&self, other: &O) -> bool {
        let a = self.uncomplemented();
        let b = other.uncomplemented();
        a.signum() == b.signum() && a.length() == b.length() && a.compare_significands(&*b) == 0
    }

    // internal state helpers

    #[doc(hidden)]
    fn uncomplemented(&self) -> Cow<'_, Self> {
        if self.complement() == 0 {
            Cow::Borrowed(self)
        } else {
            let mut v = self.clone();
            v.complement_bits();
            Cow::Owned(v)
        }
    }

    /// Sign and magnitude form with no leading bits; the value is unchanged.
    #[doc(hidden)]
    fn normalize(&mut self) {
        let s = self.signum();
        if self.complement() == 1 {
            self.complement_bits();
        }
        self.fields_mut().signum = s;
        self.trim();
    }

    /// A first write into a sign-less vector takes its sign from the extension bit.
    #[doc(hidden)]
    fn mark_written(&mut self) {
        let f = self.fields_mut();
        if f.signum == 0 {
            f.signum = if f.complement == 0 { 1 } else { -1 };
        }
    }

    /// Binary digits, most significant first, with a leading `-` when negative.
    fn render(&self) -> String {
        let s = self.signum();
        if s == 0 {
            return "0".to_string();
        }
        let m = self.uncomplemented();
        let mut out = String::with_capacity(m.width() + 1);
        if s < 0 {
            out.push('-');
        }
        out.extend((0..m.width()).rev().map(|i| if m.bit(i) == 1 { '1' } else { '0' }));
        out
    }
}

#[test]
fn test_checks() {
    assert_eq!(check_bit(1), Ok(1));
    assert_eq!(check_bit(2), Err(Error::InvalidBit(2)));
    assert_eq!(check_bits(&[0, 1, 1, 0]), Ok(()));
    assert_eq!(check_bits(&[0, 1, 7]), Err(Error::InvalidBit(7)));
    assert_eq!(check_sign(-1), Ok(-1));
    assert_eq!(check_sign(0), Err(Error::InvalidSign(0)));
    assert_eq!(check_index(-3), Err(Error::IllegalAccess(-3)));
    assert_eq!(check_range(2, 5), Ok((2, 5)));
    assert_eq!(check_range(-1, 5), Err(Error::IllegalAccess(-1)));
    assert!(matches!(check_range(5, 2), Err(Error::IllegalOperation(_))));
    assert_eq!(check_shift(-1), Err(Error::NegativeShift(-1)));
}
