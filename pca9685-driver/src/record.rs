//! Last-transaction record
//!
//! The handle keeps a record of the most recent bus transaction. Error
//! information from every operation ends up here, whether or not the
//! caller looks at the returned `Result`.

use derive_more::Display;

use crate::error::Pca9685Error;

/// Symbolic name of the last attempted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Handle constructed, nothing attempted yet
    #[default]
    #[display("init")]
    Init,
    /// Register read
    #[display("i2c_read")]
    I2cRead,
    /// Register write
    #[display("i2c_write")]
    I2cWrite,
    /// Construction found a missing bus callback
    #[display("cb_check")]
    CbCheck,
    /// Construction read/write round trip
    #[display("rw_check")]
    RwCheck,
}

impl Command {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::I2cRead => "i2c_read",
            Self::I2cWrite => "i2c_write",
            Self::CbCheck => "cb_check",
            Self::RwCheck => "rw_check",
        }
    }
}

/// Outcome of the last operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    #[default]
    #[display("ok")]
    Ok,
    #[display("{_0}")]
    Error(Pca9685Error),
}

impl Status {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The recorded error, if any
    pub fn error(&self) -> Option<Pca9685Error> {
        match self {
            Self::Ok => None,
            Self::Error(e) => Some(*e),
        }
    }
}

impl From<Result<(), Pca9685Error>> for Status {
    fn from(result: Result<(), Pca9685Error>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(e) => Self::Error(e),
        }
    }
}

/// Most recent transaction on a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransactionRecord {
    /// Value of the last register read or written
    pub data: u8,
    /// Address of the last register read or written
    pub address: u8,
    /// Last attempted operation
    pub command: Command,
    /// `Ok` or the error the last operation produced
    pub status: Status,
}
