// Taken from rustls <https://github.com/rustls/rustls>
//
// Copyright (c) 2016 Joe Birr-Pixton and rustls project contributors
// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

/// A macro which defines an enum type carried on the wire as a `u8` or a
/// big-endian `u16`. Values without a variant decode to `Unknown(x)` and
/// encode back unchanged.
#[macro_export]
macro_rules! enum_builder {
    (
    @impl
    $(#[$comment:meta])*
        $int: ty, $getter: ident, $enum_name: ident;
        $( $enum_var: ident => $enum_val: expr ),*
    ) => {
        $(#[$comment])*
        #[derive(Debug, PartialEq, Eq, Clone, Copy)]
        pub enum $enum_name {
            $( $enum_var),*
            ,Unknown($int)
        }
        impl $enum_name {
            pub fn $getter(&self) -> $int {
                match *self {
                    $( $enum_name::$enum_var => $enum_val),*
                    ,$enum_name::Unknown(x) => x
                }
            }
        }
        impl Codec for $enum_name {
            fn encode(&self, bytes: &mut Writer) -> Result<usize, $crate::codec::EncodeErr> {
                self.$getter().encode(bytes)
            }

            fn read(r: &mut Reader) -> Option<Self> {
                Some(match <$int>::read(r) {
                    None => return None,
                    $( Some($enum_val) => $enum_name::$enum_var),*
                    ,Some(x) => $enum_name::Unknown(x)
                })
            }
        }
    };
    (
    $(#[$comment:meta])*
    @U8
        EnumName: $enum_name: ident;
        EnumVal { $( $enum_var: ident => $enum_val: expr ),* }
    ) => {
        $crate::enum_builder! {
            @impl
            $(#[$comment])*
            u8, get_u8, $enum_name;
            $( $enum_var => $enum_val ),*
        }
    };
    (
    $(#[$comment:meta])*
    @U16
        EnumName: $enum_name: ident;
        EnumVal { $( $enum_var: ident => $enum_val: expr ),* }
    ) => {
        $crate::enum_builder! {
            @impl
            $(#[$comment])*
            u16, get_u16, $enum_name;
            $( $enum_var => $enum_val ),*
        }
    };
}
