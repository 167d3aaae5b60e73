//! Declarative generator for token-kind and scanner-state enums.

/// Declares a fieldless enum with stable variant names and implements either
/// [`TokenKind`](crate::TokenKind) or [`ScannerState`](crate::ScannerState)
/// for it.
///
/// ```text
/// token_set! {
///     pub enum CsvKind: TokenKind(eos = Eos, unknown = Unknown) {
///         Field, Comma, Unknown, Eos,
///     }
/// }
///
/// token_set! {
///     pub enum CsvState: ScannerState { WithinRecord, WithinQuoted }
/// }
/// ```
///
/// The generated enum derives `Clone, Copy, Debug, PartialEq, Eq, Hash`,
/// implements `Display` with the variant name, and exposes `ALL`, `name()`
/// and `from_name()`.
#[macro_export]
macro_rules! token_set {
    (@enum
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        #[allow(dead_code, reason = "generated for every set; private sets use only part of it")]
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable name of the variant, identical to its identifier.
            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            /// Looks a variant up by its stable name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : TokenKind(eos = $eos:ident, unknown = $unknown:ident) {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $crate::token_set!(@enum
            $(#[$meta])*
            $vis enum $name {
                $($(#[$vmeta])* $variant),+
            }
        );

        impl $crate::TokenKind for $name {
            const EOS: Self = $name::$eos;
            const UNKNOWN: Self = $name::$unknown;

            fn name(self) -> &'static str {
                $name::name(self)
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : ScannerState {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $crate::token_set!(@enum
            $(#[$meta])*
            $vis enum $name {
                $($(#[$vmeta])* $variant),+
            }
        );

        impl $crate::ScannerState for $name {
            fn name(self) -> &'static str {
                $name::name(self)
            }

            fn from_name(name: &str) -> Option<Self> {
                $name::from_name(name)
            }
        }
    };
}
