//! Helpers for table-driven tests shared across the workspace.

/// A result type useful in tests, that wraps any error implementation.
pub type Result<T = ()> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Shortcut for `<string>.parse().unwrap()`.
///
/// Accepts a string literal or any expression evaluating to a `&str`, such as a
/// `param_test!` argument.
#[macro_export]
macro_rules! parse {
    ($string:expr) => {
        $string.parse().unwrap()
    };
}

/// Macro for creating parametrized tests.
///
/// The `param_test!` macro accepts the name of an existing function, followed by a list of case
/// names and their arguments. It expands to a module named after the function, with one
/// `#[test]` function per case that calls the named function with the case's arguments.
///
/// # Examples
///
/// ```
/// # use test_utils::param_test;
/// #
/// param_test! {
///     counts_octets: [
///         ipv4: ("10.0.0.1", 4),
///         short: ("10.0.1", 3)
///     ]
/// }
/// fn counts_octets(address: &str, expected: usize) {
///     assert_eq!(address.split('.').count(), expected);
/// }
/// ```
///
/// Test functions may return a [`Result`], in which case the return type follows the name:
///
/// ```
/// # use std::net::Ipv4Addr;
/// # use test_utils::param_test;
/// #
/// param_test! {
///     parses_octets -> test_utils::Result: [
///         loopback: ("127.0.0.1", [127, 0, 0, 1]),
///         private: ("192.168.1.7", [192, 168, 1, 7])
///     ]
/// }
/// fn parses_octets(address: &str, expected: [u8; 4]) -> test_utils::Result {
///     assert_eq!(address.parse::<Ipv4Addr>()?.octets(), expected);
///     Ok(())
/// }
/// ```
///
/// Attributes such as `#[ignore]` may be added to individual cases:
///
/// ```
/// # use test_utils::param_test;
/// #
/// param_test! {
///     is_even: [
///         #[ignore] odd: (3),
///         even: (4)
///     ]
/// }
/// fn is_even(value: u32) {
///     assert_eq!(value % 2, 0);
/// }
/// ```
#[macro_export]
macro_rules! param_test {
    ($func_name:ident -> $return_ty:ty: [
        $( $(#[$outer:meta])* $case_name:ident: ( $($args:expr),+ )  ),+$(,)?
    ]) => {
        mod $func_name {
            use super::*;

            $(
                #[test]
                $(#[$outer])*
                fn $case_name() -> $return_ty {
                    $func_name($($args),+)
                }
            )*
        }
    };
    ($func_name:ident: [
        $( $(#[$outer:meta])* $case_name:ident: ( $($args:expr),+ ) ),+$(,)?
    ]) => {
        param_test!($func_name -> (): [ $( $(#[$outer])* $case_name: ( $($args),+ ) ),+ ]);
    };
}

#[cfg(test)]
mod tests {
    use std::net::Ipv6Addr;

    param_test! {
        test_with_no_return: [
            matching: (true, 1, 1),
            differing: (false, 3, 4)
        ]
    }
    fn test_with_no_return(expected: bool, lhs: usize, rhs: u32) {
        assert_eq!(expected, lhs == rhs as usize);
    }

    param_test! {
        test_with_return -> crate::Result: [
            loopback: ("::1", 1),
            documentation: ("2001:db8::7", 7)
        ]
    }
    fn test_with_return(to_parse: &str, last_segment: u16) -> crate::Result {
        let address: Ipv6Addr = to_parse.parse()?;
        assert_eq!(address.segments()[7], last_segment);
        Ok(())
    }

    #[test]
    fn parse_shortcut() {
        let value: u8 = parse!("255");
        assert_eq!(value, u8::MAX);

        let text = String::from("::1");
        let address: Ipv6Addr = parse!(text.as_str());
        assert_eq!(address, Ipv6Addr::LOCALHOST);
    }
}
