//! macros used across reddit2wallpaper

/// helper macro for generating validators
///
/// every rule is checked, and every failing rule is reported as
/// `"<field>: <message>"`
#[macro_export]
macro_rules! validator {
    ($struct_name:ty, $( $field:ident => $requirement:expr, $err_msg:expr );* $(;)? ) => {
        impl $crate::config::validate::Validate for $struct_name {
            fn validate(&self) -> ::std::result::Result<(), Vec<String>> {
                let mut errors: Vec<String> = Vec::new();

                $(
                    if !($requirement)(&self.$field) {
                        errors.push(format!("{}: {}", stringify!($field), $err_msg));
                    }
                )*

                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(errors)
                }
            }
        }
    };
}

/// print a progress line without a trailing newline and flush stdout
#[macro_export]
macro_rules! progress {
    ($($arg:tt)*) => {{
        use ::std::io::Write as _;
        print!($($arg)*);
        let _ = ::std::io::stdout().flush();
    }};
}
