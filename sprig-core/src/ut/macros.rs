// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

#[macro_export]
macro_rules! impl_enum_dispatch {
    // Case when the method returns a result whose value is mapped to a shared type
    ($enum_name:ident, $($variant:ident),*; $fn_name:ident(&self) -> Result<$ret:ty, $err:ty> => $map:expr) => {
        impl $enum_name {
            pub fn $fn_name(&self) -> Result<$ret, $err> {
                match self {
                    $(Self::$variant(v) => v.$fn_name().map($map),)*
                }
            }
        }
    };

    // Case when the method takes &self and has NO arguments
    ($enum_name:ident, $($variant:ident),*; $fn_name:ident(&self) -> $ret:ty) => {
        impl $enum_name {
            pub fn $fn_name(&self) -> $ret {
                match self {
                    $(Self::$variant(v) => v.$fn_name(),)*
                }
            }
        }
    };
}
