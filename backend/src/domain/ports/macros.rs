//! `define_port_error!`: error enums for driven ports.
//!
//! Each variant carries a display message and gets a snake-case constructor
//! whose parameters accept anything convertible into the field type, so
//! adapters can write `AccountRepositoryError::query(err.to_string())` or
//! `::query("pool exhausted")` alike.

macro_rules! define_port_error {
    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant {
                    $($field: $field.into()),*
                }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Failures of an imaginary ledger store.
        pub enum LedgerError {
            /// Store unreachable.
            Offline => "ledger offline",
            /// Query rejected.
            Query { message: String } => "ledger query failed: {message}",
            /// Too many rows.
            Overflow { rows: u32, limit: u32 } => "ledger returned {rows} rows (limit {limit})",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(LedgerError::offline(), LedgerError::Offline);
        assert_eq!(LedgerError::offline().to_string(), "ledger offline");
    }

    #[test]
    fn string_fields_accept_borrowed_text() {
        let err = LedgerError::query("timeout");

        assert_eq!(err.to_string(), "ledger query failed: timeout");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        let err = LedgerError::overflow(12_u32, 10_u32);

        assert_eq!(
            err,
            LedgerError::Overflow {
                rows: 12,
                limit: 10
            }
        );
        assert_eq!(err.to_string(), "ledger returned 12 rows (limit 10)");
    }
}
