// used for stay dates
use chrono::NaiveDate;
// used for prices
use bigdecimal::{BigDecimal, Signed, Zero};

// used when parsing a price from a string
use std::str::FromStr;
// used to print out readable forms of a data type
use std::fmt;
use std::ops;

use crate::error::{InnkeeperError, Result};

/// Dates are always written in this unambiguous form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Whole nights between check-in and (exclusive) check-out.
pub fn nights(check_in: &NaiveDate, check_out: &NaiveDate) -> i64 {
    check_out.signed_duration_since(*check_in).num_days()
}

// ------------- Price -------------
// A strictly positive decimal amount. Arbitrary precision so that
// prices read from a file are written back exactly as they were.
#[derive(Eq, PartialEq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct Price(BigDecimal);

impl Price {
    pub fn new(amount: BigDecimal) -> Result<Price> {
        if amount.is_positive() {
            Ok(Price(amount))
        } else {
            Err(InnkeeperError::InvalidPrice(amount.to_string()))
        }
    }
    /// The cost of staying a number of nights at this price.
    pub fn times(&self, nights: i64) -> Amount {
        Amount(&self.0 * &BigDecimal::from(nights))
    }
}
impl FromStr for Price {
    type Err = InnkeeperError;
    fn from_str(s: &str) -> Result<Price> {
        match BigDecimal::from_str(s.trim()) {
            Ok(decimal) => Price::new(decimal),
            Err(_) => Err(InnkeeperError::InvalidPrice(s.to_string())),
        }
    }
}
impl TryFrom<u32> for Price {
    type Error = InnkeeperError;
    fn try_from(amount: u32) -> Result<Price> {
        Price::new(BigDecimal::from(amount))
    }
}
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl ops::Deref for Price {
    type Target = BigDecimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ------------- Amount -------------
// A computed sum of money, which unlike a price may be zero.
#[derive(Eq, PartialEq, Hash, PartialOrd, Ord, Clone, Debug, Default)]
pub struct Amount(BigDecimal);

impl Amount {
    pub fn zero() -> Amount {
        Amount(BigDecimal::zero())
    }
}
impl From<u32> for Amount {
    fn from(amount: u32) -> Amount {
        Amount(BigDecimal::from(amount))
    }
}
impl ops::Add for Amount {
    type Output = Amount;
    fn add(self, other: Amount) -> Amount {
        Amount(self.0 + other.0)
    }
}
impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::zero(), |total, a| total + a)
    }
}
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
