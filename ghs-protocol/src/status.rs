//! Integer ⇄ symbol tables for status codes and domain enumerations.
//!
//! Every table is a Rust enum generated by [`ghs_enum!`]: the variants carry
//! the wire integer and the symbolic name used by the mainframe interface.
//! The free functions [`to_symbol`] and [`from_symbol`] work on raw integers
//! for values that may not belong to the table.

use std::fmt;
use thiserror::Error;

/// A static table mapping symbolic names to wire integers.
pub trait EnumTable: Sized + Copy + 'static {
    /// Table name, used in diagnostics.
    const NAME: &'static str;

    /// `(symbol, code)` pairs in declaration order.
    const ENTRIES: &'static [(&'static str, i64)];

    fn code(self) -> i64;

    fn from_code(code: i64) -> Option<Self>;

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        from_symbol::<Self>(name).and_then(Self::from_code)
    }
}

/// Returns the first symbol in `T` whose code equals `value`.
pub fn to_symbol<T: EnumTable>(value: i64) -> Option<&'static str> {
    T::ENTRIES
        .iter()
        .find(|(_, code)| *code == value)
        .map(|(symbol, _)| *symbol)
}

/// Returns the code mapped to `symbol` in `T`.
pub fn from_symbol<T: EnumTable>(symbol: &str) -> Option<i64> {
    T::ENTRIES
        .iter()
        .find(|(name, _)| *name == symbol)
        .map(|(_, code)| *code)
}

/// A symbol that does not belong to the table it was parsed against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {table} symbol: {symbol}")]
pub struct UnknownSymbol {
    pub table: &'static str,
    pub symbol: String,
}

/// Declares an enumeration table.
///
/// ```ignore
/// ghs_enum! {
///     pub enum Access: "GHSAccess" {
///         ReadOnly = 0 => "ReadOnly",
///         ReadWrite = 1 => "ReadWrite",
///     }
/// }
/// ```
macro_rules! ghs_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $table:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $symbol:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Wire integer for this value.
            pub fn code(self) -> i64 {
                match self {
                    $( Self::$variant => $code, )+
                }
            }

            /// Decodes a wire integer. Returns `None` for unknown codes.
            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Symbolic name as used by the mainframe interface.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $symbol, )+
                }
            }
        }

        impl $crate::status::EnumTable for $name {
            const NAME: &'static str = $table;
            const ENTRIES: &'static [(&'static str, i64)] = &[ $( ($symbol, $code), )+ ];

            fn code(self) -> i64 {
                $name::code(self)
            }

            fn from_code(code: i64) -> Option<Self> {
                $name::from_code(code)
            }

            fn name(self) -> &'static str {
                $name::name(self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::status::UnknownSymbol;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::status::EnumTable>::from_name(s).ok_or_else(|| {
                    $crate::status::UnknownSymbol {
                        table: $table,
                        symbol: s.to_string(),
                    }
                })
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64(self.code())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = <i64 as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_code(code).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown {} code {}", $table, code))
                })
            }
        }

        impl From<$name> for $crate::status::EnumArg<$name> {
            fn from(value: $name) -> Self {
                $crate::status::EnumArg::Value(value)
            }
        }
    };
}

pub(crate) use ghs_enum;

ghs_enum! {
    /// Status code returned by every mainframe call.
    ///
    /// Doubles as transport and domain outcome: failures on the client side
    /// are reported with the same codes as failures on the mainframe.
    pub enum ReturnValue: "GHSReturnValue" {
        Reserved = 0 => "Reserved",
        Ok = 1 => "OK",
        Nok = 2 => "NOK",
        EmptySlot = 3 => "EmptySlot",
        NullPtrArgument = 4 => "NullPtrArgument",
        InvalidSlotId = 5 => "InvalidSlotID",
        SystemNotIdle = 6 => "SystemNotIdle",
        SystemNotRecording = 7 => "SystemNotRecording",
        SystemNotPaused = 8 => "SystemNotPaused",
        InvalidSampleRate = 9 => "InvalidSampleRate",
        InvalidHandle = 10 => "InvalidHandle",
        ApiMismatch = 11 => "APIMismatch",
        ConnectionFailed = 12 => "ConnectionFailed",
        InvalidIp = 13 => "InvalidIP",
        MainframeTimeout = 14 => "MainframeTimeout",
        InsufficientDiskSpace = 15 => "InsufficientDiskSpace",
        CreateRecordingFailed = 16 => "CreateRecordingFailed",
        NoConnection = 17 => "NoConnection",
        IncompatibleStorage = 18 => "IncompatibleStorage",
        RecordingNotFound = 19 => "RecordingNotFound",
        SystemNotInPreview = 20 => "SystemNotInPreview",
        AlreadyConnected = 21 => "AlreadyConnected",
        InvalidRecordingName = 22 => "InvalidRecordingName",
        InvalidChannelIndex = 23 => "InvalidChannelIndex",
        InvalidUserMode = 24 => "InvalidUserMode",
        InvalidChannelType = 25 => "InvalidChannelType",
        InvalidTriggerPosition = 26 => "InvalidTriggerPosition",
        InvalidSweepMode = 27 => "InvalidSweepMode",
        NoRecordersInMainframe = 28 => "NoRecordersInMainframe",
        InvalidContinuousMode = 29 => "InvalidContinuousMode",
        InvalidModeForTriggerPosition = 30 => "InvalidModeForTriggerPosition",
        Adapted = 31 => "Adapted",
        InvalidUtf8Character = 32 => "InvalidUTF8Character",
        DuplicateChannelName = 33 => "DuplicateChannelName",
        InvalidDataType = 34 => "InvalidDataType",
        MethodNotFound = 35 => "MethodNotFound",
        InvalidJsonFormat = 36 => "InvalidJSONFormat",
        UnknownErrorMessage = 37 => "UnknownErrorMessage",
        FieldBusAlreadyEnabled = 39 => "FieldBusAlready_Enabled",
        CanBusNotFound = 46 => "CANBusNotFound",
        WriteAccessBlocked = 47 => "WriteAccessBlocked",
        InvalidOutputNumber = 49 => "InvalidOutputNumber",
        IncompatibleDigitalOutputMode = 50 => "IncompatibleDigitalOutputMode",
    }
}

impl ReturnValue {
    pub fn is_ok(self) -> bool {
        self == ReturnValue::Ok
    }

    /// Decodes a wire integer, falling back to `Reserved` for codes outside
    /// the table.
    pub fn from_code_lossy(code: i64) -> Self {
        Self::from_code(code).unwrap_or_else(|| {
            tracing::warn!("unknown status code {} mapped to Reserved", code);
            ReturnValue::Reserved
        })
    }
}

/// An enumerated argument given either as the typed value, its symbolic
/// name, or its raw wire integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumArg<T> {
    Value(T),
    Name(String),
    Code(i64),
}

impl<T: EnumTable> EnumArg<T> {
    /// Normalizes the argument against `T`. Returns `None` if a name or code
    /// is not part of the table.
    pub fn resolve(&self) -> Option<T> {
        match self {
            EnumArg::Value(value) => Some(*value),
            EnumArg::Name(name) => T::from_name(name),
            EnumArg::Code(code) => T::from_code(*code),
        }
    }
}

impl<T> From<&str> for EnumArg<T> {
    fn from(name: &str) -> Self {
        EnumArg::Name(name.to_string())
    }
}

impl<T> From<String> for EnumArg<T> {
    fn from(name: String) -> Self {
        EnumArg::Name(name)
    }
}

impl<T> From<i64> for EnumArg<T> {
    fn from(code: i64) -> Self {
        EnumArg::Code(code)
    }
}

impl<T: EnumTable> fmt::Display for EnumArg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumArg::Value(value) => f.write_str(value.name()),
            EnumArg::Name(name) => f.write_str(name),
            EnumArg::Code(code) => write!(f, "{}", code),
        }
    }
}
